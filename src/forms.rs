use crossterm::event::KeyCode;
use timer_core::{ConfigForm, Layout, Mode};

/// Swatches offered by the color field
pub const PALETTE: [&str; 6] = ["#FFFF00", "#FFFFFF", "#FF4D4D", "#4DFF88", "#4DB8FF", "#FF9F1A"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormAction {
    None,
    Save,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigField {
    Mode,
    Hours,
    Minutes,
    Seconds,
    Color,
    FontSize,
}

impl ConfigField {
    pub const ALL: [ConfigField; 6] = [
        ConfigField::Mode,
        ConfigField::Hours,
        ConfigField::Minutes,
        ConfigField::Seconds,
        ConfigField::Color,
        ConfigField::FontSize,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConfigField::Mode => "Mode",
            ConfigField::Hours => "Hours",
            ConfigField::Minutes => "Minutes",
            ConfigField::Seconds => "Seconds",
            ConfigField::Color => "Color",
            ConfigField::FontSize => "Font size",
        }
    }
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let pos = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (pos + 1) % all.len()
    } else {
        (pos + all.len() - 1) % all.len()
    };
    all[next]
}

/// Card configuration dialog being edited in the terminal.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigDraft {
    pub card_id: u8,
    pub form: ConfigForm,
    pub field: ConfigField,
}

impl ConfigDraft {
    pub fn new(card_id: u8, form: ConfigForm) -> Self {
        Self {
            card_id,
            form,
            field: ConfigField::Mode,
        }
    }

    /// Text currently shown for a field
    pub fn value(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::Mode => self.form.mode.as_str(),
            ConfigField::Hours => &self.form.hours,
            ConfigField::Minutes => &self.form.minutes,
            ConfigField::Seconds => &self.form.seconds,
            ConfigField::Color => &self.form.color,
            ConfigField::FontSize => &self.form.font_size,
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.field {
            ConfigField::Hours => Some(&mut self.form.hours),
            ConfigField::Minutes => Some(&mut self.form.minutes),
            ConfigField::Seconds => Some(&mut self.form.seconds),
            ConfigField::FontSize => Some(&mut self.form.font_size),
            ConfigField::Mode | ConfigField::Color => None,
        }
    }

    fn step(&mut self, forward: bool) {
        match self.field {
            ConfigField::Mode => self.form.mode = cycle(&Mode::ALL, self.form.mode, forward),
            ConfigField::Color => {
                let current = PALETTE
                    .iter()
                    .copied()
                    .find(|c| c.eq_ignore_ascii_case(&self.form.color))
                    .unwrap_or(PALETTE[0]);
                self.form.color = cycle(&PALETTE, current, forward).to_string();
            }
            _ => {}
        }
    }

    pub fn key(&mut self, code: KeyCode) -> FormAction {
        match code {
            KeyCode::Enter => return FormAction::Save,
            KeyCode::Tab | KeyCode::Down => self.field = cycle(&ConfigField::ALL, self.field, true),
            KeyCode::BackTab | KeyCode::Up => self.field = cycle(&ConfigField::ALL, self.field, false),
            KeyCode::Left => self.step(false),
            KeyCode::Right => self.step(true),
            KeyCode::Backspace => {
                if let Some(text) = self.text_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(c) => {
                let allow_dot = self.field == ConfigField::FontSize;
                if let Some(text) = self.text_mut() {
                    if c.is_ascii_digit() || (allow_dot && c == '.') {
                        text.push(c);
                    }
                }
            }
            _ => {}
        }
        FormAction::None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsField {
    Layout,
    Token,
}

/// Settings dialog: layout picker and the stored access token.
#[derive(Clone, Debug, PartialEq)]
pub struct SettingsDraft {
    pub layout: Layout,
    pub token: String,
    pub field: SettingsField,
}

impl SettingsDraft {
    pub fn new(layout: Layout, token: Option<&str>) -> Self {
        Self {
            layout,
            token: token.unwrap_or_default().to_string(),
            field: SettingsField::Layout,
        }
    }

    pub fn key(&mut self, code: KeyCode) -> FormAction {
        match (self.field, code) {
            (_, KeyCode::Enter) => return FormAction::Save,
            (_, KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down) => {
                self.field = match self.field {
                    SettingsField::Layout => SettingsField::Token,
                    SettingsField::Token => SettingsField::Layout,
                }
            }
            (SettingsField::Layout, KeyCode::Left) => self.layout = cycle(&Layout::ALL, self.layout, false),
            (SettingsField::Layout, KeyCode::Right) => self.layout = cycle(&Layout::ALL, self.layout, true),
            (SettingsField::Layout, KeyCode::Char(c @ '1'..='4')) => {
                self.layout = Layout::ALL[(c as u8 - b'1') as usize];
            }
            (SettingsField::Token, KeyCode::Backspace) => {
                self.token.pop();
            }
            (SettingsField::Token, KeyCode::Char(c)) => self.token.push(c),
            _ => {}
        }
        FormAction::None
    }
}
