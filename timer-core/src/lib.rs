//! Timer engine for the four-card board.
//! No platform dependencies: the shell plugs its window, audio, sleep
//! control, preference file and view in through the traits in [`caps`].

pub mod board;
pub mod caps;
pub mod card;
mod dispatch;
pub mod engine;
pub mod heartbeat;
pub mod idle;
pub mod layout;
pub mod prefs;
mod tick;

#[cfg(test)]
mod fakes;

use chrono::Timelike;

pub use board::Board;
pub use caps::{CapError, CardView, Cue, CuePlayer, LocalClock, PreferenceStore, Services, SleepControl, View, WallClock, Window};
pub use card::{Card, ConfigForm, Hms, Mode, RunState, Span, TickSignal};
pub use dispatch::Input;
pub use engine::Engine;
pub use layout::{apply_layout, key_to_card_index, Layout};
pub use prefs::ThemeMode;

/// Format a second count as "HH:MM:SS". Hours keep growing past 99.
pub fn format_hms(total_secs: u64) -> String {
    let h = total_secs / 3600;
    let m = (total_secs % 3600) / 60;
    let s = total_secs % 60;
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// Format a wall-clock time as "HH:MM:SS"
pub fn format_clock<T: Timelike>(time: &T) -> String {
    format!("{:02}:{:02}:{:02}", time.hour(), time.minute(), time.second())
}

/// Lenient integer parse for form fields: anything unparsable is 0.
pub fn parse_field(s: &str) -> u64 {
    s.trim().parse::<u64>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(7200), "02:00:00");
    }

    #[test]
    fn test_format_hms_past_a_day() {
        assert_eq!(format_hms(100 * 3600 + 5), "100:00:05");
    }

    #[test]
    fn test_format_clock() {
        let t = NaiveTime::from_hms_opt(9, 5, 7).unwrap();
        assert_eq!(format_clock(&t), "09:05:07");
    }

    #[test]
    fn test_parse_field() {
        assert_eq!(parse_field("42"), 42);
        assert_eq!(parse_field(" 7 "), 7);
        assert_eq!(parse_field(""), 0);
        assert_eq!(parse_field("abc"), 0);
        assert_eq!(parse_field("-3"), 0);
    }
}
