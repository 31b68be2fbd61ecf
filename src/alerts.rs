use std::io::Write;

use timer_core::{CapError, Cue, CuePlayer};

/// Terminal-bell cues. The end cue rings three times so it stands out from
/// the per-second tick.
pub struct BellCues<W: Write> {
    out: W,
    muted: bool,
}

impl<W: Write> BellCues<W> {
    pub fn new(out: W, muted: bool) -> Self {
        Self { out, muted }
    }

    fn rings(cue: Cue) -> usize {
        match cue {
            Cue::Start | Cue::Tick => 1,
            Cue::End => 3,
        }
    }
}

impl<W: Write> CuePlayer for BellCues<W> {
    fn play(&mut self, cue: Cue) -> Result<(), CapError> {
        if self.muted {
            return Ok(());
        }
        let bells = "\x07".repeat(Self::rings(cue));
        self.out
            .write_all(bells.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| CapError::Cue { cue, reason: e.to_string() })
    }

    fn stop(&mut self, _cue: Cue) -> Result<(), CapError> {
        // A bell cannot be cut short
        Ok(())
    }
}
