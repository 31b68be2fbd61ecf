use crate::board::Board;
use crate::caps::{CardView, Services};
use crate::card::{ConfigForm, Span};
use crate::heartbeat::{Deadline, Heartbeat, TICK_PERIOD_MS};
use crate::idle::IdleGuard;
use crate::layout::Layout;
use crate::prefs::{self, ThemeMode, KEY_LAYOUT, KEY_THEME, KEY_TOKEN};

/// Idle time in full screen before the cursor is hidden
pub const MOUSE_HIDE_DELAY_MS: u64 = 2000;

/// Owns the card board and every piece of UI state the timers depend on.
/// Time only moves when the caller pumps it with a monotonic millisecond
/// value; inputs arrive through [`Engine::handle`].
pub struct Engine {
    pub(crate) board: Board,
    pub(crate) layout: Layout,
    pub(crate) theme: ThemeMode,
    pub(crate) idle: IdleGuard,
    pub(crate) heartbeat: Heartbeat,
    pub(crate) mouse_hide: Deadline,
    pub(crate) editing: Option<u8>,
    pub(crate) settings_open: bool,
    pub(crate) fullscreen: bool,
    pub(crate) services: Services,
}

impl Engine {
    /// Builds the board from stored preferences and starts the heartbeat.
    pub fn new(services: Services, now_ms: u64) -> Self {
        let layout = prefs::load_layout(services.prefs.as_ref());
        let theme = prefs::load_theme(services.prefs.as_ref());
        let mut board = Board::new();
        board.apply_layout(layout);
        log::info!("starting with layout {} and theme {}", layout.key(), theme.key());

        let mut engine = Self {
            board,
            layout,
            theme,
            idle: IdleGuard::new(),
            heartbeat: Heartbeat::start(now_ms, TICK_PERIOD_MS),
            mouse_hide: Deadline::default(),
            editing: None,
            settings_open: false,
            fullscreen: false,
            services,
        };
        engine.services.view.set_theme(theme);
        engine.render_all();
        engine
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn sleep_prevented(&self) -> bool {
        self.idle.sleep_prevented()
    }

    pub fn editing(&self) -> Option<u8> {
        self.editing
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn is_dialog_open(&self) -> bool {
        self.editing.is_some() || self.settings_open
    }

    /// Visible cards numbered by zone in index order.
    pub fn card_views(&self) -> Vec<CardView> {
        let wall = self.services.clock.now();
        self.board
            .cards()
            .iter()
            .filter(|c| c.span != Span::Hidden)
            .enumerate()
            .map(|(i, card)| CardView {
                id: card.id,
                zone: i + 1,
                span: card.span,
                display: card.display(&wall),
                status: card.state,
                warning: card.is_warning(),
                color: card.color.clone(),
                font_size: card.font_size,
            })
            .collect()
    }

    pub(crate) fn render_all(&mut self) {
        let views = self.card_views();
        self.services.view.render_all(self.layout, &views);
    }

    /// Push display strings and status for every visible card.
    pub(crate) fn refresh(&mut self) {
        let wall = self.services.clock.now();
        for card in self.board.cards().iter().filter(|c| c.span != Span::Hidden) {
            self.services
                .view
                .update_one(card.id, &card.display(&wall), card.state, card.is_warning());
        }
    }

    pub(crate) fn evaluate_idle(&mut self) {
        self.idle.evaluate(&self.board, self.services.sleep.as_mut());
    }

    /// View refresh followed by idle evaluation, after any run-state change.
    pub(crate) fn settle(&mut self) {
        self.refresh();
        self.evaluate_idle();
    }

    pub fn open_config(&mut self, id: u8) {
        if let Some(card) = self.board.get(id) {
            self.editing = Some(id);
            self.services.view.show_config(card);
        }
    }

    pub fn save_config(&mut self, form: &ConfigForm) {
        let Some(id) = self.editing else {
            return;
        };
        if let Some(card) = self.board.get_mut(id) {
            card.configure(form.mode, &form.color, form.font_size(), form.duration());
            log::debug!(
                "card {} configured: {} {}s",
                id,
                card.mode.as_str(),
                card.configured_secs
            );
        }
        self.close_config();
        self.render_all();
    }

    pub fn close_config(&mut self) {
        if self.editing.take().is_some() {
            self.services.view.hide_config();
        }
    }

    pub fn open_settings(&mut self) {
        self.settings_open = true;
        let token = prefs::load_token(self.services.prefs.as_ref());
        self.services.view.show_settings(self.layout, token.as_deref());
    }

    /// Apply and persist the settings dialog. A blank token removes the stored one.
    pub fn save_settings(&mut self, layout: Layout, token: &str) {
        if layout != self.layout {
            self.set_layout(layout);
            prefs::save(self.services.prefs.as_mut(), KEY_LAYOUT, layout.key());
        }
        let token = token.trim();
        if token.is_empty() {
            prefs::remove(self.services.prefs.as_mut(), KEY_TOKEN);
        } else {
            prefs::save(self.services.prefs.as_mut(), KEY_TOKEN, token);
        }
        self.close_settings();
    }

    pub fn close_settings(&mut self) {
        if self.settings_open {
            self.settings_open = false;
            self.services.view.hide_settings();
        }
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.board.apply_layout(layout);
        log::info!("layout set to {}", layout.key());
        self.render_all();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.next();
        prefs::save(self.services.prefs.as_mut(), KEY_THEME, self.theme.key());
        log::info!("theme set to {}", self.theme.key());
        self.services.view.set_theme(self.theme);
    }

    pub(crate) fn set_fullscreen(&mut self, fullscreen: bool, now_ms: u64) {
        self.fullscreen = fullscreen;
        if let Err(e) = self.services.window.set_fullscreen(fullscreen) {
            log::warn!("{}", e);
        }
        if fullscreen {
            self.mouse_moved(now_ms);
            self.services.view.set_drag_region(false);
        } else {
            self.mouse_hide.cancel();
            self.services.view.set_cursor_hidden(false);
            self.services.view.set_drag_region(true);
        }
    }

    /// Show the cursor and restart the hide countdown. Only in full screen.
    pub fn mouse_moved(&mut self, now_ms: u64) {
        if !self.fullscreen {
            return;
        }
        self.services.view.set_cursor_hidden(false);
        self.mouse_hide.arm(now_ms, MOUSE_HIDE_DELAY_MS);
    }

    pub(crate) fn poll_mouse_hide(&mut self, now_ms: u64) {
        if self.mouse_hide.fire(now_ms) && self.fullscreen {
            self.services.view.set_cursor_hidden(true);
        }
    }
}
