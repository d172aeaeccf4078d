use crate::config::FoundationConfig;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use strum_macros::{Display, EnumIter};
use tracing::{debug, error, info};

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("profile store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("profile store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage port: raw JSON values by key. Writes are persisted before `store` returns.
pub trait KeyValueStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn store(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// A typed key with the value returned when nothing (valid) is stored.
pub struct StorageKey<T> {
    pub name: &'static str,
    default: fn() -> T,
}

impl<T> StorageKey<T> {
    pub const fn new(name: &'static str, default: fn() -> T) -> Self {
        Self { name, default }
    }

    pub fn default_value(&self) -> T {
        (self.default)()
    }
}

pub fn read_or_default<T, S>(store: &S, key: &StorageKey<T>) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.load(key.name) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                error!("Stored value for '{}' is unreadable, using default: {}", key.name, e);
                key.default_value()
            }
        },
        Ok(None) => key.default_value(),
        Err(e) => {
            error!("Failed to read '{}', using default: {}", key.name, e);
            key.default_value()
        }
    }
}

pub fn write<T, S>(store: &S, key: &StorageKey<T>, value: &T) -> Result<(), StoreError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.store(key.name, &raw)
}

/// Read-modify-write, returns the value that was written.
pub fn update<T, S, F>(store: &S, key: &StorageKey<T>, f: F) -> Result<T, StoreError>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore + ?Sized,
    F: FnOnce(&mut T),
{
    let mut value = read_or_default(store, key);
    f(&mut value);
    write(store, key, &value)?;
    Ok(value)
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All keys in one JSON object file, replaced atomically on every write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write of the whole file
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Map::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.get(key).map(|v| v.to_string()))
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(StoreError::Serialization(e)) => {
                // Unreadable file, the write replaces it
                error!(
                    "Profile file {} is corrupt, overwriting it: {}",
                    self.path.display(),
                    e
                );
                Map::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_string(), serde_json::from_str(value)?);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(&values)?)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Stored '{}' in {}", key, self.path.display());
        Ok(())
    }
}

/// File-backed store when a profile path is configured, in-memory otherwise.
pub fn open_store(config: &FoundationConfig) -> Box<dyn KeyValueStore> {
    match &config.profile_path {
        Some(path) => {
            info!("Using profile file {}", path.display());
            Box::new(JsonFileStore::new(path.clone()))
        }
        None => {
            info!("No profile path configured, profile will not survive restarts");
            Box::new(MemoryStore::new())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub new_breach_alerts: bool,
    pub weekly_summary: bool,
    pub security_tips: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub notifications: NotificationSettings,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Alex Doe".to_string(),
            email: "alex.doe@example.com".to_string(),
            notifications: NotificationSettings {
                new_breach_alerts: true,
                weekly_summary: false,
                security_tips: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Notification {
    NewBreachAlerts,
    WeeklySummary,
    SecurityTips,
}

impl NotificationSettings {
    pub fn get(&self, notification: Notification) -> bool {
        match notification {
            Notification::NewBreachAlerts => self.new_breach_alerts,
            Notification::WeeklySummary => self.weekly_summary,
            Notification::SecurityTips => self.security_tips,
        }
    }

    pub fn set(&mut self, notification: Notification, enabled: bool) {
        match notification {
            Notification::NewBreachAlerts => self.new_breach_alerts = enabled,
            Notification::WeeklySummary => self.weekly_summary = enabled,
            Notification::SecurityTips => self.security_tips = enabled,
        }
    }
}

pub const PROFILE_KEY: StorageKey<UserProfile> =
    StorageKey::new("privacyGuardProfile", UserProfile::default);

pub fn load_profile<S: KeyValueStore + ?Sized>(store: &S) -> UserProfile {
    read_or_default(store, &PROFILE_KEY)
}

pub fn save_profile<S: KeyValueStore + ?Sized>(
    store: &S,
    profile: &UserProfile,
) -> Result<(), StoreError> {
    write(store, &PROFILE_KEY, profile)
}

pub fn set_notification<S: KeyValueStore + ?Sized>(
    store: &S,
    notification: Notification,
    enabled: bool,
) -> Result<UserProfile, StoreError> {
    debug!("Setting notification {} to {}", notification, enabled);
    update(store, &PROFILE_KEY, |profile| {
        profile.notifications.set(notification, enabled)
    })
}

pub fn update_identity<S: KeyValueStore + ?Sized>(
    store: &S,
    name: &str,
    email: &str,
) -> Result<UserProfile, StoreError> {
    update(store, &PROFILE_KEY, |profile| {
        profile.name = name.trim().to_string();
        profile.email = email.trim().to_string();
    })
}
