use crate::board::Board;
use crate::caps::SleepControl;

/// Keeps the system awake while any card is actively running. Only edge
/// transitions reach the sleep capability; a failed call leaves the flag
/// unchanged so the next evaluation retries it.
#[derive(Debug, Default)]
pub struct IdleGuard {
    sleep_prevented: bool,
}

impl IdleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleep_prevented(&self) -> bool {
        self.sleep_prevented
    }

    pub fn evaluate(&mut self, board: &Board, sleep: &mut dyn SleepControl) {
        let should_prevent = board.any_active();
        if should_prevent && !self.sleep_prevented {
            match sleep.prevent_sleep() {
                Ok(()) => {
                    self.sleep_prevented = true;
                    log::info!("sleep prevention on");
                }
                Err(e) => log::error!("{}", e),
            }
        } else if !should_prevent && self.sleep_prevented {
            match sleep.allow_sleep() {
                Ok(()) => {
                    self.sleep_prevented = false;
                    log::info!("sleep prevention off");
                }
                Err(e) => log::error!("{}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{Call, Harness};

    fn sleep_calls(h: &Harness) -> Vec<Call> {
        h.take()
            .into_iter()
            .filter(|c| matches!(c, Call::PreventSleep | Call::AllowSleep))
            .collect()
    }

    #[test]
    fn test_edges_only() {
        let h = Harness::new();
        let mut sleep = h.sleep();
        let mut guard = IdleGuard::new();
        let mut board = Board::new();

        board.cards_mut()[0].start();
        guard.evaluate(&board, &mut sleep);
        guard.evaluate(&board, &mut sleep);
        assert_eq!(sleep_calls(&h), vec![Call::PreventSleep]);
        assert!(guard.sleep_prevented());

        board.cards_mut()[0].toggle_pause();
        guard.evaluate(&board, &mut sleep);
        guard.evaluate(&board, &mut sleep);
        assert_eq!(sleep_calls(&h), vec![Call::AllowSleep]);
        assert!(!guard.sleep_prevented());

        guard.evaluate(&board, &mut sleep);
        assert!(sleep_calls(&h).is_empty());
    }

    #[test]
    fn test_failed_prevent_is_retried() {
        let h = Harness::new();
        let mut sleep = h.sleep();
        let mut guard = IdleGuard::new();
        let mut board = Board::new();
        board.cards_mut()[2].start();

        h.fail_sleep.set(true);
        guard.evaluate(&board, &mut sleep);
        assert!(!guard.sleep_prevented());

        h.fail_sleep.set(false);
        guard.evaluate(&board, &mut sleep);
        assert!(guard.sleep_prevented());
        assert_eq!(sleep_calls(&h), vec![Call::PreventSleep, Call::PreventSleep]);
    }

    #[test]
    fn test_failed_allow_keeps_flag() {
        let h = Harness::new();
        let mut sleep = h.sleep();
        let mut guard = IdleGuard::new();
        let mut board = Board::new();
        board.cards_mut()[0].start();
        guard.evaluate(&board, &mut sleep);

        board.cards_mut()[0].reset();
        h.fail_sleep.set(true);
        guard.evaluate(&board, &mut sleep);
        assert!(guard.sleep_prevented());
    }
}
