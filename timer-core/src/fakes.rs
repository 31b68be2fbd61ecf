//! Recording capabilities for driving the engine in tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use chrono::NaiveTime;

use crate::caps::{CapError, CardView, Cue, CuePlayer, PreferenceStore, Services, SleepControl, View, WallClock, Window};
use crate::card::{Card, RunState};
use crate::engine::Engine;
use crate::layout::Layout;
use crate::prefs::ThemeMode;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    PreventSleep,
    AllowSleep,
    Play(Cue),
    Stop(Cue),
    Fullscreen(bool),
    Minimize,
    Close,
    /// (card id, zone) of every rendered card
    RenderAll(Vec<(u8, usize)>),
    Update { id: u8, display: String, status: RunState, warning: bool },
    Theme(ThemeMode),
    ShowConfig(u8),
    HideConfig,
    ShowSettings(Layout, Option<String>),
    HideSettings,
    CursorHidden(bool),
    DragRegion(bool),
}

type CallLog = Rc<RefCell<Vec<Call>>>;

pub struct Harness {
    pub log: CallLog,
    pub fail_sleep: Rc<Cell<bool>>,
    pub prefs: Rc<RefCell<HashMap<String, String>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            fail_sleep: Rc::new(Cell::new(false)),
            prefs: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    pub fn with_pref(self, key: &str, value: &str) -> Self {
        self.prefs.borrow_mut().insert(key.to_string(), value.to_string());
        self
    }

    pub fn sleep(&self) -> FakeSleep {
        FakeSleep { log: self.log.clone(), fail: self.fail_sleep.clone() }
    }

    pub fn services(&self) -> Services {
        Services {
            sleep: Box::new(self.sleep()),
            cues: Box::new(FakeCues { log: self.log.clone() }),
            prefs: Box::new(SharedPrefs { values: self.prefs.clone() }),
            view: Box::new(FakeView { log: self.log.clone() }),
            window: Box::new(FakeWindow { log: self.log.clone() }),
            clock: Box::new(FixedClock),
        }
    }

    /// Engine started at virtual time 0, with the start-up calls drained.
    pub fn engine(&self) -> Engine {
        let engine = Engine::new(self.services(), 0);
        self.take();
        engine
    }

    pub fn take(&self) -> Vec<Call> {
        self.log.borrow_mut().drain(..).collect()
    }

    pub fn take_cues(&self) -> Vec<Call> {
        self.take()
            .into_iter()
            .filter(|c| matches!(c, Call::Play(_) | Call::Stop(_)))
            .collect()
    }

    pub fn pref(&self, key: &str) -> Option<String> {
        self.prefs.borrow().get(key).cloned()
    }
}

pub struct FakeSleep {
    log: CallLog,
    fail: Rc<Cell<bool>>,
}

impl FakeSleep {
    fn result(&self) -> Result<(), CapError> {
        if self.fail.get() {
            Err(CapError::Sleep("inhibitor unavailable".into()))
        } else {
            Ok(())
        }
    }
}

impl SleepControl for FakeSleep {
    fn prevent_sleep(&mut self) -> Result<(), CapError> {
        self.log.borrow_mut().push(Call::PreventSleep);
        self.result()
    }

    fn allow_sleep(&mut self) -> Result<(), CapError> {
        self.log.borrow_mut().push(Call::AllowSleep);
        self.result()
    }
}

struct FakeCues {
    log: CallLog,
}

impl CuePlayer for FakeCues {
    fn play(&mut self, cue: Cue) -> Result<(), CapError> {
        self.log.borrow_mut().push(Call::Play(cue));
        Ok(())
    }

    fn stop(&mut self, cue: Cue) -> Result<(), CapError> {
        self.log.borrow_mut().push(Call::Stop(cue));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPrefs {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CapError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CapError> {
        self.values.remove(key);
        Ok(())
    }
}

struct SharedPrefs {
    values: Rc<RefCell<HashMap<String, String>>>,
}

impl PreferenceStore for SharedPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CapError> {
        self.values.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), CapError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

struct FakeView {
    log: CallLog,
}

impl View for FakeView {
    fn render_all(&mut self, _layout: Layout, cards: &[CardView]) {
        let ids = cards.iter().map(|c| (c.id, c.zone)).collect();
        self.log.borrow_mut().push(Call::RenderAll(ids));
    }

    fn update_one(&mut self, card_id: u8, display: &str, status: RunState, warning: bool) {
        self.log.borrow_mut().push(Call::Update {
            id: card_id,
            display: display.to_string(),
            status,
            warning,
        });
    }

    fn set_theme(&mut self, theme: ThemeMode) {
        self.log.borrow_mut().push(Call::Theme(theme));
    }

    fn show_config(&mut self, card: &Card) {
        self.log.borrow_mut().push(Call::ShowConfig(card.id));
    }

    fn hide_config(&mut self) {
        self.log.borrow_mut().push(Call::HideConfig);
    }

    fn show_settings(&mut self, layout: Layout, token: Option<&str>) {
        self.log.borrow_mut().push(Call::ShowSettings(layout, token.map(str::to_string)));
    }

    fn hide_settings(&mut self) {
        self.log.borrow_mut().push(Call::HideSettings);
    }

    fn set_cursor_hidden(&mut self, hidden: bool) {
        self.log.borrow_mut().push(Call::CursorHidden(hidden));
    }

    fn set_drag_region(&mut self, enabled: bool) {
        self.log.borrow_mut().push(Call::DragRegion(enabled));
    }
}

struct FakeWindow {
    log: CallLog,
}

impl Window for FakeWindow {
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), CapError> {
        self.log.borrow_mut().push(Call::Fullscreen(fullscreen));
        Ok(())
    }

    fn minimize(&mut self) -> Result<(), CapError> {
        self.log.borrow_mut().push(Call::Minimize);
        Ok(())
    }

    fn close(&mut self) -> Result<(), CapError> {
        self.log.borrow_mut().push(Call::Close);
        Ok(())
    }
}

/// Always 13:04:05
struct FixedClock;

impl WallClock for FixedClock {
    fn now(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(13, 4, 5).unwrap()
    }
}
