//! Playground store implementation using SQLite.
//!
//! The playground persists small blobs of editor state between runs: the
//! graph arrangement, the active drafting thread, the last created flow id.
//! A single key/value table covers all of it.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use whatsflow_graph::GraphDocument;
use whatsflow_types::{FlowId, ThreadId};

use crate::error::Result;

// ─────────────────────────────────────────────────────────────────────────────
// Schema
// ─────────────────────────────────────────────────────────────────────────────

/// Bumped when the table layout changes.
const SCHEMA_VERSION: i32 = 1;

/// Editor graph arrangement, a serialized [`GraphDocument`].
pub const KEY_FLOW_DATA: &str = "flowData";
/// The active drafting thread.
pub const KEY_THREAD_ID: &str = "thread_id";
/// The most recently created flow on the Graph API.
pub const KEY_FLOW_ID: &str = "flow_id";

// ─────────────────────────────────────────────────────────────────────────────
// Playground Store
// ─────────────────────────────────────────────────────────────────────────────

/// Playground state store backed by SQLite.
///
/// WAL journaling; writes serialize through the mutex.
pub struct PlaygroundStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for PlaygroundStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaygroundStore").finish_non_exhaustive()
    }
}

impl PlaygroundStore {
    /// Open or create a playground store at the given path, creating
    /// parent directories on first use.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.migrate()?;

        info!(path = %path.display(), "playground store opened");
        Ok(store)
    }

    /// An ephemeral store for tests.
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Apply pragmas and bring the schema up to date.
    fn migrate(&self) -> Result<()> {
        let conn = self.conn();

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap_or(0);

        if version >= SCHEMA_VERSION {
            debug!(version, "playground schema current");
            return Ok(());
        }

        conn.execute_batch(
            r#"
            -- Playground key/value state
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        info!(from = version, to = SCHEMA_VERSION, "playground schema migrated");
        Ok(())
    }

    /// Serialize access to the connection.
    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Raw key/value API
    // ─────────────────────────────────────────────────────────────────────────

    /// Get the raw string stored under a key.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Store a raw string under a key, replacing any previous value.
    pub fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn();
        conn.execute(
            r#"
            INSERT INTO kv (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3
            "#,
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        debug!(key, "stored playground value");
        Ok(())
    }

    /// Delete a key. Returns whether it existed.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let conn = self.conn();
        let rows_affected = conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(rows_affected > 0)
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typed JSON API
    // ─────────────────────────────────────────────────────────────────────────

    /// Get and deserialize the JSON stored under a key.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Serialize a value to JSON and store it under a key.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.put_raw(key, &json)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Well-known playground state
    // ─────────────────────────────────────────────────────────────────────────

    /// The saved editor graph, if any.
    pub fn graph(&self) -> Result<Option<GraphDocument>> {
        self.get(KEY_FLOW_DATA)
    }

    pub fn set_graph(&self, graph: &GraphDocument) -> Result<()> {
        self.put(KEY_FLOW_DATA, graph)
    }

    /// The active drafting thread, if any.
    pub fn thread_id(&self) -> Result<Option<ThreadId>> {
        Ok(self.get_raw(KEY_THREAD_ID)?.map(ThreadId::from))
    }

    pub fn set_thread_id(&self, thread_id: &ThreadId) -> Result<()> {
        self.put_raw(KEY_THREAD_ID, thread_id.as_str())
    }

    /// The most recently created flow id, if any.
    pub fn flow_id(&self) -> Result<Option<FlowId>> {
        Ok(self.get_raw(KEY_FLOW_ID)?.map(FlowId::from))
    }

    pub fn set_flow_id(&self, flow_id: &FlowId) -> Result<()> {
        self.put_raw(KEY_FLOW_ID, flow_id.as_str())
    }

    /// Drop the saved graph, thread, and flow id, as the editor's Clear
    /// button does.
    pub fn clear_flow_data(&self) -> Result<()> {
        self.delete(KEY_FLOW_DATA)?;
        self.delete(KEY_THREAD_ID)?;
        self.delete(KEY_FLOW_ID)?;
        Ok(())
    }
}
