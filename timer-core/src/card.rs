use chrono::NaiveTime;

use crate::{format_clock, format_hms, parse_field};

pub const CARD_COUNT: usize = 4;
pub const DEFAULT_COLOR: &str = "#FFFF00";
pub const DEFAULT_FONT_SIZE: f32 = 6.0;
const DEFAULT_HOURS: u64 = 2;
// Countdown seconds left at or below which the tick cue sounds
const WARNING_SECS: u64 = 5;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    Clock,
    Countdown,
    Stopwatch,
    Counter,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Clock, Mode::Countdown, Mode::Stopwatch, Mode::Counter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Clock => "clock",
            Mode::Countdown => "countdown",
            Mode::Stopwatch => "stopwatch",
            Mode::Counter => "counter",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

/// Layout-assigned role of a card slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Span {
    Normal,
    MergePrimary,
    MergeSecondary,
    Full,
    Hidden,
}

/// Paused is only reachable from Running, so "paused but stopped" cannot exist.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunState {
    Idle,
    Running,
    Paused,
}

impl RunState {
    pub fn class_name(&self) -> &'static str {
        match self {
            RunState::Idle => "status-idle",
            RunState::Running => "status-running",
            RunState::Paused => "status-paused",
        }
    }
}

/// What a tick asks the cue player to do after the card has been updated.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickSignal {
    Quiet,
    Tick,
    End,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self { hours, minutes, seconds }
    }

    /// Carry seconds into minutes, then minutes into hours. Saturates
    /// instead of overflowing on absurd field values.
    pub fn normalized(self) -> Self {
        let minutes = self.minutes.saturating_add(self.seconds / 60);
        Self {
            hours: self.hours.saturating_add(minutes / 60),
            minutes: minutes % 60,
            seconds: self.seconds % 60,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

/// Raw contents of the configuration dialog.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigForm {
    pub mode: Mode,
    pub color: String,
    pub font_size: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl ConfigForm {
    /// Prefill the form from a card's current settings.
    pub fn from_card(card: &Card) -> Self {
        Self {
            mode: card.mode,
            color: card.color.clone(),
            font_size: format!("{:.1}", card.font_size),
            hours: card.duration.hours.to_string(),
            minutes: card.duration.minutes.to_string(),
            seconds: card.duration.seconds.to_string(),
        }
    }

    pub fn duration(&self) -> Hms {
        Hms::new(
            parse_field(&self.hours),
            parse_field(&self.minutes),
            parse_field(&self.seconds),
        )
    }

    pub fn font_size(&self) -> f32 {
        match self.font_size.trim().parse::<f32>() {
            Ok(size) if size.is_finite() && size > 0.0 => size,
            _ => DEFAULT_FONT_SIZE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub id: u8,
    pub mode: Mode,
    pub color: String,
    pub font_size: f32,
    pub span: Span,
    pub duration: Hms,
    pub configured_secs: u64,
    pub remaining_secs: u64,
    pub stopwatch_secs: u64,
    pub counter_secs: u64,
    pub state: RunState,
}

impl Card {
    pub fn new(id: u8) -> Self {
        let duration = Hms::new(DEFAULT_HOURS, 0, 0);
        Self {
            id,
            mode: Mode::Countdown,
            color: DEFAULT_COLOR.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            span: Span::Normal,
            duration,
            configured_secs: duration.total_secs(),
            remaining_secs: duration.total_secs(),
            stopwatch_secs: 0,
            counter_secs: 0,
            state: RunState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state != RunState::Idle
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    /// Running and not paused: the only state in which ticks advance the card.
    pub fn is_active(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn configure(&mut self, mode: Mode, color: &str, font_size: f32, duration: Hms) {
        self.mode = mode;
        self.color = color.to_string();
        self.font_size = font_size;
        self.duration = duration.normalized();
        self.configured_secs = self.duration.total_secs();

        // A live countdown (running or paused) keeps going; the new duration
        // only applies from the next reset.
        let live_countdown =
            self.mode == Mode::Countdown && self.is_running() && self.remaining_secs > 0;
        if !live_countdown {
            self.remaining_secs = self.configured_secs;
        }
    }

    /// Returns true when the card moved into running-unpaused.
    pub fn start(&mut self) -> bool {
        if self.state == RunState::Running {
            return false;
        }
        self.state = RunState::Running;
        true
    }

    /// Returns true when the pause flag flipped.
    pub fn toggle_pause(&mut self) -> bool {
        self.state = match self.state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
            RunState::Idle => return false,
        };
        true
    }

    pub fn pause(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Paused;
        }
    }

    /// Stop and restore the live field of the current mode.
    pub fn reset(&mut self) {
        self.state = RunState::Idle;
        match self.mode {
            Mode::Countdown => self.remaining_secs = self.configured_secs,
            Mode::Stopwatch => self.stopwatch_secs = 0,
            Mode::Counter => self.counter_secs = 0,
            Mode::Clock => {}
        }
    }

    /// Stop and restore every time field regardless of mode.
    pub fn reset_all(&mut self) {
        self.state = RunState::Idle;
        self.remaining_secs = self.configured_secs;
        self.stopwatch_secs = 0;
        self.counter_secs = 0;
    }

    pub fn advance_one_tick(&mut self) -> TickSignal {
        if !self.is_active() {
            return TickSignal::Quiet;
        }
        match self.mode {
            Mode::Countdown => {
                if self.remaining_secs == 0 {
                    // Started while already exhausted
                    self.state = RunState::Idle;
                    return TickSignal::Quiet;
                }
                self.remaining_secs -= 1;
                if self.remaining_secs == 0 {
                    self.state = RunState::Idle;
                    TickSignal::End
                } else if self.remaining_secs <= WARNING_SECS {
                    TickSignal::Tick
                } else {
                    TickSignal::Quiet
                }
            }
            Mode::Stopwatch => {
                self.stopwatch_secs += 1;
                TickSignal::Quiet
            }
            Mode::Counter => {
                self.counter_secs += 1;
                TickSignal::Quiet
            }
            Mode::Clock => TickSignal::Quiet,
        }
    }

    /// Countdown in its last few seconds while actively running.
    pub fn is_warning(&self) -> bool {
        self.mode == Mode::Countdown
            && self.is_active()
            && self.remaining_secs > 0
            && self.remaining_secs <= WARNING_SECS
    }

    pub fn display(&self, wall: &NaiveTime) -> String {
        match self.mode {
            Mode::Clock => format_clock(wall),
            Mode::Countdown => format_hms(self.remaining_secs),
            Mode::Stopwatch => format_hms(self.stopwatch_secs),
            Mode::Counter => format_hms(self.counter_secs),
        }
    }
}
