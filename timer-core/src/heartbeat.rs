//! Virtual-time scheduling. Callers feed in a monotonic millisecond clock,
//! so tests can step time without sleeping.

pub const TICK_PERIOD_MS: u64 = 1000;

/// A recurring task that never stops once started.
#[derive(Debug)]
pub struct Heartbeat {
    period_ms: u64,
    next_due_ms: u64,
}

impl Heartbeat {
    pub fn start(now_ms: u64, period_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: now_ms + period_ms,
        }
    }

    /// Number of firings that came due up to `now_ms`. A late caller gets
    /// every missed firing so no time is lost.
    pub fn due(&mut self, now_ms: u64) -> u32 {
        let mut fired = 0;
        while now_ms >= self.next_due_ms {
            self.next_due_ms += self.period_ms;
            fired += 1;
        }
        fired
    }

    pub fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }
}

/// A one-shot timer that can be re-armed or cancelled.
#[derive(Debug, Default)]
pub struct Deadline {
    at_ms: Option<u64>,
}

impl Deadline {
    pub fn arm(&mut self, now_ms: u64, delay_ms: u64) {
        self.at_ms = Some(now_ms + delay_ms);
    }

    pub fn cancel(&mut self) {
        self.at_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.at_ms.is_some()
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.at_ms {
            Some(at) if now_ms >= at => {
                self.at_ms = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heartbeat_period() {
        let mut hb = Heartbeat::start(500, TICK_PERIOD_MS);
        assert_eq!(hb.due(500), 0);
        assert_eq!(hb.due(1499), 0);
        assert_eq!(hb.due(1500), 1);
        assert_eq!(hb.due(1600), 0);
        assert_eq!(hb.due(2500), 1);
    }

    #[test]
    fn test_heartbeat_catches_up() {
        let mut hb = Heartbeat::start(0, TICK_PERIOD_MS);
        assert_eq!(hb.due(3200), 3);
        assert_eq!(hb.next_due_ms(), 4000);
    }

    #[test]
    fn test_deadline() {
        let mut d = Deadline::default();
        assert!(!d.fire(10_000));

        d.arm(0, 2000);
        assert!(!d.fire(1999));
        assert!(d.fire(2000));
        assert!(!d.fire(3000));

        d.arm(0, 2000);
        d.arm(1500, 2000);
        assert!(!d.fire(2000));
        assert!(d.fire(3500));

        d.arm(0, 100);
        d.cancel();
        assert!(!d.is_armed());
        assert!(!d.fire(200));
    }
}
