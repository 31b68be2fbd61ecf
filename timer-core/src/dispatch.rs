use crate::caps::{play_cue, Cue};
use crate::card::Card;
use crate::engine::Engine;
use crate::layout::key_to_card_index;

/// A discrete user action, already decoded by the shell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Input {
    /// Tap on a card's zone label
    TapLabel(u8),
    /// Tap anywhere else on a card
    TapCard(u8),
    /// Number key 1-4
    Digit(u8),
    Space,
    F11,
    F12,
    Escape,
    MouseMove,
    Maximize,
    Minimize,
    Close,
}

impl Engine {
    /// Number keys and space belong to an open dialog's text fields.
    pub fn intercepts(&self, input: Input) -> bool {
        match input {
            Input::Digit(_) | Input::Space => !self.is_dialog_open(),
            _ => true,
        }
    }

    pub fn handle(&mut self, input: Input, now_ms: u64) {
        if !self.intercepts(input) {
            return;
        }
        match input {
            Input::TapLabel(id) => self.reset_card(id),
            Input::TapCard(id) => self.open_config(id),
            Input::Digit(key) => self.toggle_by_key(key),
            Input::Space => self.toggle_all(),
            Input::F11 | Input::Maximize => {
                let fullscreen = !self.fullscreen;
                self.set_fullscreen(fullscreen, now_ms);
            }
            Input::F12 => self.reset_stopped_cards(),
            Input::Escape => self.escape(now_ms),
            Input::MouseMove => self.mouse_moved(now_ms),
            Input::Minimize => {
                if let Err(e) = self.services.window.minimize() {
                    log::warn!("{}", e);
                }
            }
            Input::Close => {
                if let Err(e) = self.services.window.close() {
                    log::warn!("{}", e);
                }
            }
        }
    }

    pub fn reset_card(&mut self, id: u8) {
        if let Some(card) = self.board.get_mut(id) {
            card.reset();
            log::debug!("card {} reset", id);
            self.settle();
        }
    }

    /// Start an idle card (with the start cue) or flip pause on a running one.
    fn toggle_by_key(&mut self, key: u8) {
        let Some(index) = key_to_card_index(self.layout, key) else {
            return;
        };
        let card = &mut self.board.cards_mut()[index];
        if !card.is_running() {
            card.start();
            log::debug!("card {} started", card.id);
            play_cue(self.services.cues.as_mut(), Cue::Start);
        } else {
            card.toggle_pause();
            log::debug!("card {} paused={}", card.id, card.is_paused());
        }
        self.settle();
    }

    /// Pause everything if anything is ticking, otherwise start all four.
    fn toggle_all(&mut self) {
        if self.board.any_active() {
            self.board.cards_mut().iter_mut().for_each(Card::pause);
            log::debug!("all cards paused");
        } else {
            for card in self.board.cards_mut().iter_mut() {
                card.start();
            }
            log::debug!("all cards started");
            play_cue(self.services.cues.as_mut(), Cue::Start);
        }
        self.settle();
    }

    /// Full reset of every card that is not actively ticking.
    fn reset_stopped_cards(&mut self) {
        for card in self.board.cards_mut().iter_mut().filter(|c| !c.is_active()) {
            card.reset_all();
        }
        self.settle();
    }

    fn escape(&mut self, now_ms: u64) {
        if self.editing.is_some() {
            self.close_config();
        } else if self.settings_open {
            self.close_settings();
        } else if self.fullscreen {
            self.set_fullscreen(false, now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Mode, RunState};
    use crate::fakes::{Call, Harness};
    use crate::layout::Layout;

    fn states(engine: &Engine) -> Vec<RunState> {
        engine.board().cards().iter().map(|c| c.state).collect()
    }

    #[test]
    fn test_digit_starts_then_toggles_pause() {
        let h = Harness::new();
        let mut engine = h.engine();

        engine.handle(Input::Digit(2), 0);
        assert_eq!(engine.board().cards()[1].state, RunState::Running);
        assert_eq!(h.take_cues(), vec![Call::Play(Cue::Start)]);

        engine.handle(Input::Digit(2), 0);
        assert_eq!(engine.board().cards()[1].state, RunState::Paused);
        engine.handle(Input::Digit(2), 0);
        assert_eq!(engine.board().cards()[1].state, RunState::Running);
        assert!(h.take_cues().is_empty());
    }

    #[test]
    fn test_digit_follows_layout() {
        let h = Harness::new();
        let mut engine = h.engine();
        engine.set_layout(Layout::LeftRight);

        engine.handle(Input::Digit(2), 0);
        assert_eq!(
            states(&engine),
            vec![RunState::Idle, RunState::Idle, RunState::Running, RunState::Idle]
        );

        engine.handle(Input::Digit(3), 0);
        engine.handle(Input::Digit(4), 0);
        assert_eq!(
            states(&engine),
            vec![RunState::Idle, RunState::Idle, RunState::Running, RunState::Idle]
        );
    }

    #[test]
    fn test_digits_pass_through_open_dialog() {
        let h = Harness::new();
        let mut engine = h.engine();
        engine.handle(Input::TapCard(1), 0);
        assert!(!engine.intercepts(Input::Digit(1)));
        assert!(!engine.intercepts(Input::Space));
        assert!(engine.intercepts(Input::Escape));

        engine.handle(Input::Digit(1), 0);
        engine.handle(Input::Space, 0);
        assert!(states(&engine).iter().all(|s| *s == RunState::Idle));

        engine.handle(Input::Escape, 0);
        engine.open_settings();
        engine.handle(Input::Digit(1), 0);
        assert_eq!(engine.board().cards()[0].state, RunState::Idle);
    }

    #[test]
    fn test_space_pauses_running_cards() {
        let h = Harness::new();
        let mut engine = h.engine();
        engine.handle(Input::Digit(1), 0);
        engine.handle(Input::Digit(2), 0);
        engine.handle(Input::Digit(2), 0);
        h.take();

        engine.handle(Input::Space, 0);
        assert_eq!(
            states(&engine),
            vec![RunState::Paused, RunState::Paused, RunState::Idle, RunState::Idle]
        );
        assert!(h.take_cues().is_empty());
    }

    #[test]
    fn test_space_starts_everything_with_one_cue() {
        let h = Harness::new();
        let mut engine = h.engine();
        engine.handle(Input::Digit(3), 0);
        engine.handle(Input::Digit(3), 0);
        h.take();

        engine.handle(Input::Space, 0);
        assert!(states(&engine).iter().all(|s| *s == RunState::Running));
        assert_eq!(h.take_cues(), vec![Call::Play(Cue::Start)]);
        assert!(engine.sleep_prevented());
    }

    #[test]
    fn test_label_tap_resets_card() {
        let h = Harness::new();
        let mut engine = h.engine();
        engine.handle(Input::Digit(1), 0);
        engine.tick();
        engine.handle(Input::TapLabel(1), 0);
        let card = &engine.board().cards()[0];
        assert_eq!(card.state, RunState::Idle);
        assert_eq!(card.remaining_secs, 7200);
        assert!(!engine.sleep_prevented());
    }

    #[test]
    fn test_f12_spares_running_cards() {
        let h = Harness::new();
        let mut engine = h.engine();
        engine.handle(Input::Space, 0);
        engine.tick();
        engine.handle(Input::Digit(2), 0);
        engine.handle(Input::Digit(3), 0);
        if let Some(card) = engine.board.get_mut(3) {
            card.reset();
            card.mode = Mode::Stopwatch;
            card.stopwatch_secs = 40;
        }

        engine.handle(Input::F12, 0);
        let cards = engine.board().cards();
        assert_eq!(cards[0].state, RunState::Running);
        assert_eq!(cards[0].remaining_secs, 7199);
        assert_eq!(cards[1].state, RunState::Idle);
        assert_eq!(cards[1].remaining_secs, 7200);
        assert_eq!(cards[2].stopwatch_secs, 0);
        assert_eq!(cards[3].state, RunState::Running);
    }

    #[test]
    fn test_escape_priority() {
        let h = Harness::new();
        let mut engine = h.engine();
        engine.handle(Input::F11, 0);
        engine.open_settings();
        engine.open_config(1);
        h.take();

        engine.handle(Input::Escape, 10);
        assert_eq!(h.take(), vec![Call::HideConfig]);
        engine.handle(Input::Escape, 10);
        assert_eq!(h.take(), vec![Call::HideSettings]);
        engine.handle(Input::Escape, 10);
        assert_eq!(
            h.take(),
            vec![Call::Fullscreen(false), Call::CursorHidden(false), Call::DragRegion(true)]
        );
        assert!(!engine.is_fullscreen());

        engine.handle(Input::Escape, 10);
        assert!(h.take().is_empty());
    }

    #[test]
    fn test_maximize_matches_f11() {
        let h = Harness::new();
        let mut engine = h.engine();
        engine.handle(Input::Maximize, 0);
        assert!(engine.is_fullscreen());
        engine.handle(Input::F11, 0);
        assert!(!engine.is_fullscreen());
    }

    #[test]
    fn test_window_chrome_forwarded() {
        let h = Harness::new();
        let mut engine = h.engine();
        engine.handle(Input::Minimize, 0);
        engine.handle(Input::Close, 0);
        assert_eq!(h.take(), vec![Call::Minimize, Call::Close]);
    }

    #[test]
    fn test_mouse_move_outside_fullscreen_is_ignored() {
        let h = Harness::new();
        let mut engine = h.engine();
        engine.handle(Input::MouseMove, 0);
        assert!(h.take().is_empty());
    }

    #[test]
    fn test_idle_prevention_follows_commands() {
        let h = Harness::new();
        let mut engine = h.engine();
        engine.handle(Input::Digit(1), 0);
        engine.handle(Input::Digit(1), 0);
        engine.handle(Input::Digit(1), 0);
        let sleep_calls: Vec<Call> = h
            .take()
            .into_iter()
            .filter(|c| matches!(c, Call::PreventSleep | Call::AllowSleep))
            .collect();
        assert_eq!(
            sleep_calls,
            vec![Call::PreventSleep, Call::AllowSleep, Call::PreventSleep]
        );
    }
}
