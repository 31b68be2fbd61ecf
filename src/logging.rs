use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use log::{LevelFilter, Log, Metadata, Record};

/// The log is cleared once it grows past this
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// Appends timestamped lines to a single file.
pub struct FileLogger {
    level: LevelFilter,
    max_size: u64,
    file: Mutex<File>,
}

impl FileLogger {
    pub fn open(path: &Path, level: LevelFilter) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            level,
            max_size: MAX_LOG_SIZE,
            file: Mutex::new(file),
        })
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        if file.metadata()?.len() > self.max_size {
            file.set_len(0)?;
            writeln!(
                file,
                "[{}] [INFO] log cleared after exceeding {} bytes",
                timestamp(),
                self.max_size
            )?;
        }
        writeln!(file, "{}", line)
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[{}] [{}] {}", timestamp(), record.level(), record.args());
        // Nowhere left to report a failing log write
        self.append(&line).ok();
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            file.flush().ok();
        }
    }
}

pub fn init(path: &Path, level: LevelFilter) -> anyhow::Result<()> {
    let logger = FileLogger::open(path, level)
        .with_context(|| format!("can't open log file {}", path.display()))?;
    log::set_boxed_logger(Box::new(logger)).context("logger already installed")?;
    log::set_max_level(level);
    Ok(())
}
