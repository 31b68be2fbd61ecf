use crate::caps::PreferenceStore;
use crate::layout::Layout;

pub const KEY_THEME: &str = "themeMode";
pub const KEY_LAYOUT: &str = "layoutMode";
pub const KEY_TOKEN: &str = "githubToken";

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum ThemeMode {
    /// Follow the system preference
    #[default]
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    pub fn key(&self) -> &'static str {
        match self {
            ThemeMode::Auto => "auto",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "auto" => Some(ThemeMode::Auto),
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    /// auto -> light -> dark -> auto
    pub fn next(&self) -> Self {
        match self {
            ThemeMode::Auto => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Auto,
        }
    }
}

pub fn load_theme(store: &dyn PreferenceStore) -> ThemeMode {
    match store.get(KEY_THEME) {
        Some(value) => ThemeMode::from_key(&value).unwrap_or_else(|| {
            log::warn!("ignoring unknown theme mode {:?}", value);
            ThemeMode::default()
        }),
        None => ThemeMode::default(),
    }
}

pub fn load_layout(store: &dyn PreferenceStore) -> Layout {
    match store.get(KEY_LAYOUT) {
        Some(value) => Layout::from_key(&value).unwrap_or_else(|| {
            log::warn!("ignoring unknown layout {:?}", value);
            Layout::default()
        }),
        None => Layout::default(),
    }
}

pub fn load_token(store: &dyn PreferenceStore) -> Option<String> {
    store.get(KEY_TOKEN).filter(|t| !t.is_empty())
}

pub(crate) fn save(store: &mut dyn PreferenceStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        log::error!("Failed to save {}: {}", key, e);
    }
}

pub(crate) fn remove(store: &mut dyn PreferenceStore, key: &str) {
    if let Err(e) = store.remove(key) {
        log::error!("Failed to remove {}: {}", key, e);
    }
}
