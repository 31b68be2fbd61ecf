use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use timer_core::{CapError, PreferenceStore};

/// String preferences kept in a flat JSON object, rewritten on every change.
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePrefs {
    /// A missing or unreadable file starts out empty.
    pub fn load(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::error!("Ignoring corrupt preferences {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::error!("Failed to read preferences {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    /// Sibling file the new contents are written to before replacing the original
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn persist(&self) -> Result<(), CapError> {
        let text = serde_json::to_string_pretty(&self.values)
            .map_err(|e| CapError::Storage(e.to_string()))?;
        let staging = self.staging_path();
        fs::write(&staging, text)
            .and_then(|_| fs::rename(&staging, &self.path))
            .map_err(|e| CapError::Storage(format!("{}: {}", self.path.display(), e)))
    }
}

impl PreferenceStore for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CapError> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: &str) -> Result<(), CapError> {
        if self.values.remove(key).is_some() {
            self.persist()
        } else {
            Ok(())
        }
    }
}
