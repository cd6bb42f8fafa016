//! User preferences: a flat, fixed-schema structure persisted whole.
//! Callers read-modify-write the entire struct; there are no partial-key
//! updates.

use serde::{Deserialize, Serialize};

use crate::logging::{json_warn, obj, v_str};
use crate::store::{KvStore, KEY_PREFERENCES};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub alert_threshold: u32,
    pub dark_mode: bool,
    pub notifications: bool,
    pub default_view: String,
    pub refresh_interval: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            alert_threshold: 60,
            dark_mode: true,
            notifications: true,
            default_view: "dashboard".to_string(),
            refresh_interval: 5,
        }
    }
}

/// Read preferences, returning the documented defaults when nothing is
/// persisted, the stored text does not parse, or the read itself fails.
/// A stored older shape with missing keys fills those keys from defaults.
pub fn load_preferences(store: &KvStore) -> Preferences {
    match store.get(KEY_PREFERENCES) {
        Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|_| {
            json_warn("prefs", obj(&[("event", v_str("parse_failure"))]));
            Preferences::default()
        }),
        Ok(None) => Preferences::default(),
        Err(err) => {
            json_warn(
                "prefs",
                obj(&[("event", v_str("read_failure")), ("error", v_str(&err.to_string()))]),
            );
            Preferences::default()
        }
    }
}

/// Persist the whole structure in a single write. Returns `false` and leaves
/// the prior persisted state untouched on serialization or storage failure.
pub fn save_preferences(store: &mut KvStore, prefs: &Preferences) -> bool {
    let text = match serde_json::to_string(prefs) {
        Ok(text) => text,
        Err(err) => {
            json_warn(
                "prefs",
                obj(&[("event", v_str("serialize_failure")), ("error", v_str(&err.to_string()))]),
            );
            return false;
        }
    };
    match store.put(KEY_PREFERENCES, &text) {
        Ok(()) => true,
        Err(err) => {
            json_warn(
                "prefs",
                obj(&[("event", v_str("write_failure")), ("error", v_str(&err.to_string()))]),
            );
            false
        }
    }
}
