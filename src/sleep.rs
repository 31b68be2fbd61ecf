use keepawake::KeepAwake;
use timer_core::{CapError, SleepControl};

/// Keeps the system awake while it holds a guard. Dropping the guard
/// releases the platform assertion.
pub struct SleepInhibitor<G = KeepAwake> {
    acquire: fn() -> Result<G, CapError>,
    guard: Option<G>,
}

impl SleepInhibitor<KeepAwake> {
    pub fn new() -> Self {
        Self::with_acquire(keep_awake)
    }
}

impl<G> SleepInhibitor<G> {
    pub fn with_acquire(acquire: fn() -> Result<G, CapError>) -> Self {
        Self { acquire, guard: None }
    }

    pub fn is_held(&self) -> bool {
        self.guard.is_some()
    }
}

fn keep_awake() -> Result<KeepAwake, CapError> {
    keepawake::Builder::default()
        .display(true)
        .idle(true)
        .sleep(true)
        .reason("timer running")
        .app_name("QuadTimer")
        .app_reverse_domain("io.github.quadtimer")
        .create()
        .map_err(|e| CapError::Sleep(format!("can't keep the system awake: {:?}", e)))
}

impl<G> SleepControl for SleepInhibitor<G> {
    fn prevent_sleep(&mut self) -> Result<(), CapError> {
        if self.guard.is_none() {
            self.guard = Some((self.acquire)()?);
        }
        Ok(())
    }

    fn allow_sleep(&mut self) -> Result<(), CapError> {
        self.guard = None;
        Ok(())
    }
}
