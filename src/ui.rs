use std::cell::{Cell, RefCell};
use std::io::{self, Write};
use std::rc::Rc;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::KeyCode;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use timer_core::card::DEFAULT_FONT_SIZE;
use timer_core::{CapError, Card, CardView, ConfigForm, Layout, RunState, ThemeMode, View, Window};

use crate::forms::{ConfigDraft, ConfigField, FormAction, SettingsDraft, SettingsField};

const TITLE: &str = "QuadTimer";
const HINTS: &str = "1-4 start/pause  space all  F11 full  F12 reset  s settings  t theme  q quit";
const CHROME_BUTTONS: &str = "[_][#][x]";
const BUTTON_WIDTH: u16 = 3;
const DIALOG_WIDTH: u16 = 48;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.x && col < self.x + self.width && row >= self.y && row < self.y + self.height
    }
}

/// What a mouse click landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    /// The zone label on a card's top edge
    Label(u8),
    Body(u8),
    Minimize,
    Maximize,
    Close,
}

/// Everything the terminal draws, fed by [`TerminalView`] and [`TerminalWindow`].
pub struct Screen {
    size: (u16, u16),
    layout: Layout,
    cards: Vec<CardView>,
    theme: ThemeMode,
    config: Option<ConfigDraft>,
    settings: Option<SettingsDraft>,
    fullscreen: bool,
    cursor_hidden: bool,
    drag_region: bool,
    dirty: bool,
}

impl Screen {
    pub fn new(size: (u16, u16)) -> Self {
        Self {
            size,
            layout: Layout::default(),
            cards: Vec::new(),
            theme: ThemeMode::default(),
            config: None,
            settings: None,
            fullscreen: false,
            cursor_hidden: false,
            drag_region: true,
            dirty: true,
        }
    }

    pub fn resize(&mut self, size: (u16, u16)) {
        self.size = size;
        self.dirty = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Feed a key to the open config dialog. Returns the form when the key saves it.
    pub fn config_key(&mut self, code: KeyCode) -> Option<ConfigForm> {
        let draft = self.config.as_mut()?;
        let action = draft.key(code);
        self.dirty = true;
        (action == FormAction::Save).then(|| draft.form.clone())
    }

    /// Feed a key to the open settings dialog. Returns layout and token on save.
    pub fn settings_key(&mut self, code: KeyCode) -> Option<(Layout, String)> {
        let draft = self.settings.as_mut()?;
        let action = draft.key(code);
        self.dirty = true;
        (action == FormAction::Save).then(|| (draft.layout, draft.token.clone()))
    }

    fn show_chrome(&self) -> bool {
        !self.fullscreen && self.size.1 > 2
    }

    /// Area left for the cards once the title and status rows are placed.
    pub fn board_area(&self) -> Rect {
        let (width, height) = self.size;
        if self.show_chrome() {
            Rect { x: 0, y: 1, width, height: height - 2 }
        } else {
            Rect { x: 0, y: 0, width, height }
        }
    }

    /// Grid cell of every visible card, in zone order.
    pub fn card_rects(&self) -> Vec<(u8, Rect)> {
        let area = self.board_area();
        let (cols, rows) = self.layout.grid();
        self.cards
            .iter()
            .take((cols * rows) as usize)
            .enumerate()
            .map(|(i, card)| {
                let i = i as u16;
                let (x, width) = split(area.x, area.width, cols, i % cols);
                let (y, height) = split(area.y, area.height, rows, i / cols);
                (card.id, Rect { x, y, width, height })
            })
            .collect()
    }

    pub fn hit_test(&self, col: u16, row: u16) -> Option<Hit> {
        if self.show_chrome() && self.drag_region && row == 0 {
            let first = self.size.0.saturating_sub(CHROME_BUTTONS.len() as u16);
            if col < first {
                return None;
            }
            return match (col - first) / BUTTON_WIDTH {
                0 => Some(Hit::Minimize),
                1 => Some(Hit::Maximize),
                _ => Some(Hit::Close),
            };
        }
        self.card_rects()
            .into_iter()
            .find(|(_, rect)| rect.contains(col, row))
            .map(|(id, rect)| if row == rect.y { Hit::Label(id) } else { Hit::Body(id) })
    }

    fn theme_colors(&self) -> (Color, Color) {
        match self.theme {
            ThemeMode::Auto => (Color::Reset, Color::Reset),
            ThemeMode::Light => (Color::Black, Color::White),
            ThemeMode::Dark => (Color::White, Color::Black),
        }
    }

    pub fn draw<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let (fg, bg) = self.theme_colors();
        queue!(out, SetForegroundColor(fg), SetBackgroundColor(bg), Clear(ClearType::All))?;

        if self.show_chrome() {
            self.draw_chrome(out, fg)?;
        }
        for (card, (_, rect)) in self.cards.iter().zip(self.card_rects()) {
            draw_card(out, card, rect, fg)?;
        }
        if let Some(draft) = &self.config {
            self.draw_config(out, draft, fg)?;
        } else if let Some(draft) = &self.settings {
            self.draw_settings(out, draft, fg)?;
        }

        let (width, height) = self.size;
        queue!(out, MoveTo(width.saturating_sub(1), height.saturating_sub(1)))?;
        if self.cursor_hidden {
            queue!(out, Hide)?;
        } else {
            queue!(out, Show)?;
        }
        queue!(out, ResetColor)?;
        out.flush()?;
        self.dirty = false;
        Ok(())
    }

    fn draw_chrome<W: Write>(&self, out: &mut W, fg: Color) -> io::Result<()> {
        let (width, height) = self.size;
        if self.drag_region {
            put(out, 0, 0, width, TITLE, fg)?;
            let first = width.saturating_sub(CHROME_BUTTONS.len() as u16);
            put(out, first, 0, width - first, CHROME_BUTTONS, fg)?;
        }
        let status = format!("theme: {}  layout: {}  {}", self.theme.key(), self.layout.key(), HINTS);
        put(out, 0, height - 1, width, &status, Color::DarkGrey)
    }

    fn dialog_rect(&self, lines: u16) -> Rect {
        let (width, height) = self.size;
        let w = DIALOG_WIDTH.min(width);
        let h = (lines + 2).min(height);
        Rect {
            x: (width - w) / 2,
            y: (height - h) / 2,
            width: w,
            height: h,
        }
    }

    fn draw_config<W: Write>(&self, out: &mut W, draft: &ConfigDraft, fg: Color) -> io::Result<()> {
        let mut lines = Vec::new();
        for field in ConfigField::ALL {
            let marker = if field == draft.field { '>' } else { ' ' };
            lines.push(format!("{} {:<10} {}", marker, field.label(), draft.value(field)));
        }
        lines.push(String::new());
        lines.push("Tab field  Left/Right change  Enter save  Esc cancel".into());
        let title = format!(" Card {} ", draft.card_id);
        draw_dialog(out, self.dialog_rect(lines.len() as u16), &title, &lines, fg)
    }

    fn draw_settings<W: Write>(&self, out: &mut W, draft: &SettingsDraft, fg: Color) -> io::Result<()> {
        let marker = |field: SettingsField| if field == draft.field { '>' } else { ' ' };
        let lines = vec![
            format!(
                "{} Layout     < {} ({}) >",
                marker(SettingsField::Layout),
                draft.layout.label(),
                draft.layout.key()
            ),
            format!("{} Token      {}", marker(SettingsField::Token), "*".repeat(draft.token.chars().count())),
            String::new(),
            "1-4 pick layout  Tab field  Enter save  Esc cancel".into(),
        ];
        draw_dialog(out, self.dialog_rect(lines.len() as u16), " Settings ", &lines, fg)
    }
}

/// Split `len` cells into `parts`, giving the remainder to the last part.
fn split(start: u16, len: u16, parts: u16, index: u16) -> (u16, u16) {
    let base = len / parts;
    let size = if index + 1 == parts { len - base * index } else { base };
    (start + base * index, size)
}

/// "#RRGGBB" to a terminal color
pub fn parse_hex(color: &str) -> Option<Color> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

fn status_text(status: RunState) -> &'static str {
    match status {
        RunState::Idle => "idle",
        RunState::Running => "running",
        RunState::Paused => "paused",
    }
}

fn put<W: Write>(out: &mut W, x: u16, y: u16, width: u16, text: &str, color: Color) -> io::Result<()> {
    let clipped: String = text.chars().take(width as usize).collect();
    queue!(out, MoveTo(x, y), SetForegroundColor(color), Print(clipped))
}

fn draw_box<W: Write>(out: &mut W, rect: Rect, fg: Color) -> io::Result<()> {
    if rect.width < 2 || rect.height < 2 {
        return Ok(());
    }
    let inner = (rect.width - 2) as usize;
    let bottom = rect.y + rect.height - 1;
    put(out, rect.x, rect.y, rect.width, &format!("+{}+", "-".repeat(inner)), fg)?;
    for row in rect.y + 1..bottom {
        put(out, rect.x, row, rect.width, &format!("|{}|", " ".repeat(inner)), fg)?;
    }
    put(out, rect.x, bottom, rect.width, &format!("+{}+", "-".repeat(inner)), fg)
}

fn draw_card<W: Write>(out: &mut W, card: &CardView, rect: Rect, fg: Color) -> io::Result<()> {
    draw_box(out, rect, fg)?;
    if rect.width < 4 || rect.height < 3 {
        return Ok(());
    }
    let label_color = match card.status {
        _ if card.warning => Color::Red,
        RunState::Running => Color::Green,
        RunState::Paused => Color::Yellow,
        RunState::Idle => Color::DarkGrey,
    };
    let label = format!(" {} {} ", card.zone, status_text(card.status));
    put(out, rect.x + 2, rect.y, rect.width - 4, &label, label_color)?;

    // Large fonts are approximated by letter spacing when there is room
    let inner = rect.width - 2;
    let spaced: String = card.display.chars().flat_map(|c| [c, ' ']).collect();
    let spaced = spaced.trim_end();
    let text = if card.font_size >= DEFAULT_FONT_SIZE && spaced.chars().count() <= inner as usize {
        spaced
    } else {
        card.display.as_str()
    };
    let len = text.chars().count().min(inner as usize) as u16;
    let x = rect.x + 1 + (inner - len) / 2;
    let y = rect.y + rect.height / 2;
    let color = if card.warning {
        Color::Red
    } else {
        parse_hex(&card.color).unwrap_or(fg)
    };
    queue!(out, SetAttribute(Attribute::Bold))?;
    put(out, x, y, inner, text, color)?;
    queue!(out, SetAttribute(Attribute::NormalIntensity))
}

fn draw_dialog<W: Write>(out: &mut W, rect: Rect, title: &str, lines: &[String], fg: Color) -> io::Result<()> {
    draw_box(out, rect, fg)?;
    if rect.width < 4 {
        return Ok(());
    }
    put(out, rect.x + 2, rect.y, rect.width - 4, title, fg)?;
    for (row, line) in (rect.y + 1..rect.y + rect.height.saturating_sub(1)).zip(lines) {
        put(out, rect.x + 2, row, rect.width - 4, line, fg)?;
    }
    Ok(())
}

/// [`View`] that records the engine's state into the shared [`Screen`].
pub struct TerminalView {
    screen: Rc<RefCell<Screen>>,
}

impl TerminalView {
    pub fn new(screen: Rc<RefCell<Screen>>) -> Self {
        Self { screen }
    }

    fn with<F: FnOnce(&mut Screen)>(&self, f: F) {
        let mut screen = self.screen.borrow_mut();
        f(&mut screen);
        screen.dirty = true;
    }
}

impl View for TerminalView {
    fn render_all(&mut self, layout: Layout, cards: &[CardView]) {
        self.with(|s| {
            s.layout = layout;
            s.cards = cards.to_vec();
        });
    }

    fn update_one(&mut self, card_id: u8, display: &str, status: RunState, warning: bool) {
        self.with(|s| {
            if let Some(card) = s.cards.iter_mut().find(|c| c.id == card_id) {
                card.display = display.to_string();
                card.status = status;
                card.warning = warning;
            }
        });
    }

    fn set_theme(&mut self, theme: ThemeMode) {
        self.with(|s| s.theme = theme);
    }

    fn show_config(&mut self, card: &Card) {
        let draft = ConfigDraft::new(card.id, ConfigForm::from_card(card));
        self.with(|s| s.config = Some(draft));
    }

    fn hide_config(&mut self) {
        self.with(|s| s.config = None);
    }

    fn show_settings(&mut self, layout: Layout, token: Option<&str>) {
        let draft = SettingsDraft::new(layout, token);
        self.with(|s| s.settings = Some(draft));
    }

    fn hide_settings(&mut self) {
        self.with(|s| s.settings = None);
    }

    fn set_cursor_hidden(&mut self, hidden: bool) {
        self.with(|s| s.cursor_hidden = hidden);
    }

    fn set_drag_region(&mut self, enabled: bool) {
        self.with(|s| s.drag_region = enabled);
    }
}

/// The terminal stands in for the window: full screen drops the title and
/// status rows, close ends the main loop.
pub struct TerminalWindow {
    screen: Rc<RefCell<Screen>>,
    quit: Rc<Cell<bool>>,
}

impl TerminalWindow {
    pub fn new(screen: Rc<RefCell<Screen>>, quit: Rc<Cell<bool>>) -> Self {
        Self { screen, quit }
    }
}

impl Window for TerminalWindow {
    fn set_fullscreen(&mut self, fullscreen: bool) -> Result<(), CapError> {
        let mut screen = self.screen.borrow_mut();
        screen.fullscreen = fullscreen;
        screen.dirty = true;
        Ok(())
    }

    fn minimize(&mut self) -> Result<(), CapError> {
        Err(CapError::Window("a terminal cannot be minimized".into()))
    }

    fn close(&mut self) -> Result<(), CapError> {
        self.quit.set(true);
        Ok(())
    }
}
