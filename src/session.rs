//! Session record and bookmarks. Both degrade the way the preference store
//! does: unreadable state reads as absent, failed writes report rather than
//! propagate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logging::{json_warn, obj, v_str};
use crate::store::{KvStore, KEY_BOOKMARKS, KEY_LAST_SESSION};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRecord {
    pub view: String,
    pub timestamp: String,
}

/// Save the session record, stamping the current time. Returns `false` on
/// failure, prior state untouched.
pub fn save_session(store: &mut KvStore, view: &str) -> bool {
    let record =
        SessionRecord { view: view.to_string(), timestamp: Utc::now().to_rfc3339() };
    let text = match serde_json::to_string(&record) {
        Ok(text) => text,
        Err(_) => return false,
    };
    match store.put(KEY_LAST_SESSION, &text) {
        Ok(()) => true,
        Err(err) => {
            json_warn(
                "session",
                obj(&[("event", v_str("write_failure")), ("error", v_str(&err.to_string()))]),
            );
            false
        }
    }
}

pub fn load_last_session(store: &KvStore) -> Option<SessionRecord> {
    let text = store.get(KEY_LAST_SESSION).ok()??;
    serde_json::from_str(&text).ok()
}

/// Whole days elapsed since the recorded session, for the returning-visitor
/// greeting. `None` when the stored timestamp does not parse.
pub fn days_since(record: &SessionRecord, now: DateTime<Utc>) -> Option<i64> {
    let then = DateTime::parse_from_rfc3339(&record.timestamp).ok()?;
    Some((now - then.with_timezone(&Utc)).num_days())
}

pub fn load_bookmarks(store: &KvStore) -> Vec<u32> {
    match store.get(KEY_BOOKMARKS) {
        Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Add the id if absent, remove it if present, persist the whole list, and
/// return the new list. Storage errors degrade to the empty list.
pub fn toggle_bookmark(store: &mut KvStore, id: u32) -> Vec<u32> {
    let mut bookmarks = load_bookmarks(store);
    if let Some(pos) = bookmarks.iter().position(|&b| b == id) {
        bookmarks.remove(pos);
    } else {
        bookmarks.push(id);
    }
    let text = match serde_json::to_string(&bookmarks) {
        Ok(text) => text,
        Err(_) => return Vec::new(),
    };
    match store.put(KEY_BOOKMARKS, &text) {
        Ok(()) => bookmarks,
        Err(err) => {
            json_warn(
                "session",
                obj(&[("event", v_str("bookmark_write_failure")), ("error", v_str(&err.to_string()))]),
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_store() -> KvStore {
        let mut store = KvStore::open_in_memory().unwrap();
        store.init().unwrap();
        store
    }

    #[test]
    fn test_session_save_load() {
        let mut store = make_store();
        assert!(load_last_session(&store).is_none());
        assert!(save_session(&mut store, "dashboard"));
        let record = load_last_session(&store).unwrap();
        assert_eq!(record.view, "dashboard");
        assert!(DateTime::parse_from_rfc3339(&record.timestamp).is_ok());
    }

    #[test]
    fn test_days_since() {
        let now = Utc::now();
        let record = SessionRecord {
            view: "dashboard".to_string(),
            timestamp: (now - Duration::days(3)).to_rfc3339(),
        };
        assert_eq!(days_since(&record, now), Some(3));

        let fresh =
            SessionRecord { view: String::new(), timestamp: now.to_rfc3339() };
        assert_eq!(days_since(&fresh, now), Some(0));

        let bad = SessionRecord { view: String::new(), timestamp: "yesterday".to_string() };
        assert_eq!(days_since(&bad, now), None);
    }

    #[test]
    fn test_toggle_bookmark_round_trip() {
        let mut store = make_store();
        assert_eq!(toggle_bookmark(&mut store, 3), vec![3]);
        assert_eq!(toggle_bookmark(&mut store, 7), vec![3, 7]);
        // Toggling again removes.
        assert_eq!(toggle_bookmark(&mut store, 3), vec![7]);
        assert_eq!(load_bookmarks(&store), vec![7]);
    }

    #[test]
    fn test_bookmarks_garbage_reads_empty() {
        let mut store = make_store();
        store.put(KEY_BOOKMARKS, "oops").unwrap();
        assert!(load_bookmarks(&store).is_empty());
    }
}
