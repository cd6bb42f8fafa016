use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

// Fixed storage keys. Values under these keys are JSON text.
pub const KEY_BACKUP: &str = "backup";
pub const KEY_BACKUP_DIGEST: &str = "backup_digest";
pub const KEY_PREFERENCES: &str = "preferences";
pub const KEY_LAST_SESSION: &str = "last_session";
pub const KEY_BOOKMARKS: &str = "bookmarks";

const ALL_KEYS: &[&str] =
    &[KEY_BACKUP, KEY_BACKUP_DIGEST, KEY_PREFERENCES, KEY_LAST_SESSION, KEY_BOOKMARKS];

/// Durable key-value store backing the pipeline: the data backup slot, user
/// preferences, session record, and bookmarks all live here. Each write is a
/// single statement, so persisted values are replaced whole or not at all.
pub struct KvStore {
    conn: Connection,
}

impl KvStore {
    pub fn open(path: &str) -> Result<Self> {
        Ok(Self { conn: Connection::open(path)? })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self { conn: Connection::open_in_memory()? })
    }

    pub fn init(&mut self) -> Result<()> {
        self.conn.execute_batch(
            "BEGIN;
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            COMMIT;",
        )?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    pub fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Remove every key this crate owns. Unknown keys in the table are left
    /// alone so a shared database is not clobbered.
    pub fn clear(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for key in ALL_KEYS {
            tx.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_store() -> KvStore {
        let mut store = KvStore::open_in_memory().unwrap();
        store.init().unwrap();
        store
    }

    #[test]
    fn test_put_get_overwrite() {
        let mut store = make_store();
        assert_eq!(store.get(KEY_BACKUP).unwrap(), None);
        store.put(KEY_BACKUP, "[]").unwrap();
        assert_eq!(store.get(KEY_BACKUP).unwrap().as_deref(), Some("[]"));
        store.put(KEY_BACKUP, "[1]").unwrap();
        assert_eq!(store.get(KEY_BACKUP).unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = make_store();
        store.put(KEY_PREFERENCES, "{}").unwrap();
        store.put(KEY_BOOKMARKS, "[1,2]").unwrap();
        store.put("foreign_key", "kept").unwrap();

        store.remove(KEY_PREFERENCES).unwrap();
        assert_eq!(store.get(KEY_PREFERENCES).unwrap(), None);

        store.clear().unwrap();
        assert_eq!(store.get(KEY_BOOKMARKS).unwrap(), None);
        assert_eq!(store.get("foreign_key").unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn test_init_idempotent() {
        let mut store = make_store();
        store.put(KEY_BACKUP, "x").unwrap();
        store.init().unwrap();
        assert_eq!(store.get(KEY_BACKUP).unwrap().as_deref(), Some("x"));
    }
}
