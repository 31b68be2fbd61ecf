use crate::caps::{play_cue, stop_cue, Cue};
use crate::card::TickSignal;
use crate::engine::Engine;

impl Engine {
    /// Advance virtual time. Runs one tick per elapsed heartbeat period and
    /// services the cursor-hide deadline. Returns the number of ticks run.
    pub fn pump(&mut self, now_ms: u64) -> u32 {
        let fired = self.heartbeat.due(now_ms);
        for _ in 0..fired {
            self.tick();
        }
        self.poll_mouse_hide(now_ms);
        fired
    }

    /// One heartbeat: advance every card in id order, sound cues for
    /// boundary crossings, then refresh the view and re-evaluate idle
    /// prevention.
    pub fn tick(&mut self) {
        for card in self.board.cards_mut().iter_mut() {
            match card.advance_one_tick() {
                TickSignal::Quiet => {}
                TickSignal::Tick => play_cue(self.services.cues.as_mut(), Cue::Tick),
                TickSignal::End => {
                    log::info!("card {} countdown finished", card.id);
                    stop_cue(self.services.cues.as_mut(), Cue::Tick);
                    play_cue(self.services.cues.as_mut(), Cue::End);
                }
            }
        }
        self.settle();
    }
}
