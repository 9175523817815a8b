use crate::traits::PreferenceObserver;
use crate::PreferenceError;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DARK_MODE_KEY: &str = "darkMode";
const PREFERENCE_DIR: &str = "resume-search";
const PREFERENCE_FILE: &str = "preferences.json";

pub fn default_preference_path() -> Result<PathBuf, PreferenceError> {
    dirs::config_dir()
        .map(|dir| dir.join(PREFERENCE_DIR).join(PREFERENCE_FILE))
        .ok_or_else(|| PreferenceError::MissingLocation("no config directory".to_string()))
}

/// Persists the dark-mode flag in a JSON key-value file and pushes every change to the
/// subscribed observers. Last write wins.
pub struct DisplayPreferenceStore {
    path: PathBuf,
    dark_mode: Mutex<bool>,
    observers: Mutex<Vec<Box<dyn PreferenceObserver + Send + Sync>>>,
}

impl DisplayPreferenceStore {
    /// Opens the store and reads the persisted value. A missing or unreadable value
    /// starts out as `false`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let dark_mode = read_dark_mode(&path);
        debug!(path = %path.display(), dark_mode, "display preference loaded");
        Self {
            path,
            dark_mode: Mutex::new(dark_mode),
            observers: Mutex::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> bool {
        *self.dark_mode.lock()
    }

    /// Writes `dark_mode` to disk and re-applies it to observers if it changed.
    pub fn set(&self, dark_mode: bool) -> Result<(), PreferenceError> {
        let mut current = self.dark_mode.lock();
        self.store(&mut current, dark_mode)
    }

    /// Flips the value under the same lock as the write, so concurrent toggles never
    /// collapse into one.
    pub fn toggle(&self) -> Result<bool, PreferenceError> {
        let mut current = self.dark_mode.lock();
        let next = !*current;
        self.store(&mut current, next)?;
        Ok(next)
    }

    // Observers run while the value lock is held and must not call back into the store.
    fn store(&self, current: &mut bool, dark_mode: bool) -> Result<(), PreferenceError> {
        write_dark_mode(&self.path, dark_mode)?;
        let changed = *current != dark_mode;
        *current = dark_mode;
        if changed {
            for observer in self.observers.lock().iter() {
                observer.apply(dark_mode);
            }
        }
        Ok(())
    }

    /// Registers an observer and applies the current value to it right away.
    pub fn subscribe(&self, observer: impl PreferenceObserver + Send + Sync + 'static) {
        observer.apply(self.get());
        self.observers.lock().push(Box::new(observer));
    }
}

fn read_dark_mode(path: &Path) -> bool {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return false,
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(value) => value
            .get(DARK_MODE_KEY)
            .and_then(Value::as_bool)
            .unwrap_or(false),
        Err(error) => {
            warn!(path = %path.display(), error = %error, "ignoring unparsable preference file");
            false
        }
    }
}

fn write_dark_mode(path: &Path, dark_mode: bool) -> Result<(), PreferenceError> {
    let mut entries = fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<Map<String, Value>>(&raw).ok())
        .unwrap_or_default();
    entries.insert(DARK_MODE_KEY.to_string(), Value::Bool(dark_mode));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(&Value::Object(entries))?)?;
    Ok(())
}
