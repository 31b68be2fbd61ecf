use std::path::{Path, PathBuf};

use clap::Parser;

const PREFS_FILE: &str = "prefs.json";
const LOG_FILE: &str = "app.log";

#[derive(Debug, Parser)]
#[command(name = "quadtimer", version, about = "Four-panel clock, countdown, stopwatch and counter board")]
pub struct Args {
    /// Preference file (defaults to prefs.json next to the executable)
    #[arg(long, value_name = "PATH")]
    pub prefs: Option<PathBuf>,

    /// Log file (defaults to app.log next to the executable)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: log::LevelFilter,

    /// Disable audio cues
    #[arg(long)]
    pub mute: bool,
}

impl Args {
    pub fn prefs_path(&self) -> PathBuf {
        self.prefs.clone().unwrap_or_else(|| app_dir().join(PREFS_FILE))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| app_dir().join(LOG_FILE))
    }
}

/// Directory holding the executable, or the working directory if unknown.
fn app_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
