//! Capabilities the engine calls out to. The shell provides the real ones;
//! the engine never blocks on them and treats every failure as non-fatal.

use std::fmt;

use chrono::NaiveTime;
use thiserror::Error;

use crate::card::{Card, RunState, Span};
use crate::layout::Layout;
use crate::prefs::ThemeMode;

#[derive(Debug, Error)]
pub enum CapError {
    #[error("sleep control failed: {0}")]
    Sleep(String),

    #[error("cue {cue} failed: {reason}")]
    Cue { cue: Cue, reason: String },

    #[error("preference store failed: {0}")]
    Storage(String),

    #[error("window operation failed: {0}")]
    Window(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Start,
    Tick,
    End,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Start => "start",
            Cue::Tick => "tick",
            Cue::End => "end",
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub trait SleepControl {
    fn prevent_sleep(&mut self) -> Result<(), CapError>;
    fn allow_sleep(&mut self) -> Result<(), CapError>;
}

pub trait CuePlayer {
    fn play(&mut self, cue: Cue) -> Result<(), CapError>;
    fn stop(&mut self, cue: Cue) -> Result<(), CapError>;
}

pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), CapError>;
    fn remove(&mut self, key: &str) -> Result<(), CapError>;
}

pub trait Window {
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), CapError>;
    fn minimize(&mut self) -> Result<(), CapError>;
    fn close(&mut self) -> Result<(), CapError>;
}

pub trait WallClock {
    fn now(&self) -> NaiveTime;
}

/// Local time of day from the system clock
pub struct LocalClock;

impl WallClock for LocalClock {
    fn now(&self) -> NaiveTime {
        chrono::Local::now().time()
    }
}

/// Everything the view needs to draw one visible card.
#[derive(Clone, Debug, PartialEq)]
pub struct CardView {
    pub id: u8,
    /// 1-based position among visible cards
    pub zone: usize,
    pub span: Span,
    pub display: String,
    pub status: RunState,
    pub warning: bool,
    pub color: String,
    pub font_size: f32,
}

pub trait View {
    fn render_all(&mut self, layout: Layout, cards: &[CardView]);
    fn update_one(&mut self, card_id: u8, display: &str, status: RunState, warning: bool);
    fn set_theme(&mut self, theme: ThemeMode);
    fn show_config(&mut self, card: &Card);
    fn hide_config(&mut self);
    fn show_settings(&mut self, layout: Layout, token: Option<&str>);
    fn hide_settings(&mut self);
    fn set_cursor_hidden(&mut self, hidden: bool);
    fn set_drag_region(&mut self, enabled: bool);
}

pub struct Services {
    pub sleep: Box<dyn SleepControl>,
    pub cues: Box<dyn CuePlayer>,
    pub prefs: Box<dyn PreferenceStore>,
    pub view: Box<dyn View>,
    pub window: Box<dyn Window>,
    pub clock: Box<dyn WallClock>,
}

pub(crate) fn play_cue(cues: &mut dyn CuePlayer, cue: Cue) {
    if let Err(e) = cues.play(cue) {
        log::warn!("{}", e);
    }
}

pub(crate) fn stop_cue(cues: &mut dyn CuePlayer, cue: Cue) {
    if let Err(e) = cues.stop(cue) {
        log::warn!("{}", e);
    }
}
