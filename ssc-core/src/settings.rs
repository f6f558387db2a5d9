use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::StoreHandle;

pub const STORAGE_KEY: &str = "settings";
pub const DELETE_MODE: &str = "delete_mode";

static DEFAULT_SETTINGS: Lazy<Map<String, Value>> = Lazy::new(|| {
    let mut defaults = Map::new();
    defaults.insert(DELETE_MODE.to_owned(), Value::from(DeleteMode::Hide.as_str()));
    defaults
});

/// How deleted stream items are displayed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    #[default]
    Hide,
    Compact,
}

impl DeleteMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hide => "hide",
            Self::Compact => "compact",
        }
    }

    /// Only an explicit `"hide"` hides; any other value compacts.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("hide") => Self::Hide,
            _ => Self::Compact,
        }
    }
}

impl fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User settings persisted as one JSON object. Reads always layer the stored
/// object over the defaults, so new defaults show up without a migration.
pub struct SettingsRegistry {
    store: StoreHandle,
}

impl SettingsRegistry {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.merged().remove(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.merged().contains_key(name)
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) {
        let mut persisted = self.persisted().unwrap_or_else(|| DEFAULT_SETTINGS.clone());
        persisted.insert(name.to_owned(), value.into());
        if let Err(err) = self.store.set(STORAGE_KEY, &Value::Object(persisted)) {
            log::error!("failed to save {}: {}", STORAGE_KEY, err);
        }
    }

    pub fn delete_mode(&self) -> DeleteMode {
        DeleteMode::from_value(self.get(DELETE_MODE).as_ref())
    }

    pub fn set_delete_mode(&self, mode: DeleteMode) {
        self.set(DELETE_MODE, mode.as_str());
    }

    fn merged(&self) -> Map<String, Value> {
        let mut merged = DEFAULT_SETTINGS.clone();
        if let Some(persisted) = self.persisted() {
            merged.extend(persisted);
        }
        merged
    }

    fn persisted(&self) -> Option<Map<String, Value>> {
        match self.store.get(STORAGE_KEY) {
            Ok(Some(Value::Object(map))) => Some(map),
            Ok(Some(other)) => {
                log::warn!("ignoring malformed {}: {}", STORAGE_KEY, other);
                None
            }
            Ok(None) => None,
            Err(err) => {
                log::warn!("failed to read {}: {}", STORAGE_KEY, err);
                None
            }
        }
    }
}
