//! Core DocStore implementation

use std::path::Path;

use chrono::Utc;
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

/// A single record from an append-only event collection
#[derive(Debug, Clone, serde::Serialize)]
pub struct EventRecord {
    /// Unique record ID (UUIDv7, so lexically sortable by creation time)
    pub id: String,
    /// The stored JSON body
    pub body: Value,
    /// Insertion timestamp (UTC, RFC 3339)
    pub created_at: String,
}

/// SQLite-backed document store
///
/// Two tables: `documents` holds one JSON body per `(collection, key)` with
/// INSERT OR REPLACE overwrite semantics; `events` holds append-only rows
/// keyed by UUID. The store never mutates an event row after insertion.
pub struct DocStore {
    conn: Connection,
}

impl DocStore {
    /// Open or create a document store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(?path, "DocStore::open: called");
        let conn = Connection::open(path).context(format!("Failed to open database: {}", path.display()))?;
        Self::init_schema(&conn)?;
        debug!(?path, "DocStore::open: schema ready");
        Ok(Self { conn })
    }

    /// Open an in-memory store (tests, ephemeral runs)
    pub fn open_in_memory() -> Result<Self> {
        debug!("DocStore::open_in_memory: called");
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS documents (
                collection  TEXT NOT NULL,
                key         TEXT NOT NULL,
                body        TEXT NOT NULL,
                updated_at  TEXT NOT NULL,
                PRIMARY KEY (collection, key)
            );
            CREATE TABLE IF NOT EXISTS events (
                id          TEXT PRIMARY KEY,
                collection  TEXT NOT NULL,
                body        TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );",
        )
        .context("Failed to initialize schema")?;
        Ok(())
    }

    /// Fetch a document by key, or None if absent
    pub fn get(&self, collection: &str, key: &str) -> Result<Option<Value>> {
        debug!(%collection, %key, "DocStore::get: called");
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
                params![collection, key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query document")?;

        match body {
            Some(text) => {
                let value = serde_json::from_str(&text).context(format!("Stored document is not valid JSON: {}", key))?;
                Ok(Some(value))
            }
            None => {
                debug!(%collection, %key, "DocStore::get: not found");
                Ok(None)
            }
        }
    }

    /// Store a document, fully overwriting any existing body at the same key
    pub fn put(&self, collection: &str, key: &str, doc: &Value) -> Result<()> {
        debug!(%collection, %key, "DocStore::put: called");
        let body = serde_json::to_string(doc).context("Failed to serialize document")?;
        let updated_at = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT OR REPLACE INTO documents (collection, key, body, updated_at) VALUES (?1, ?2, ?3, ?4)",
                params![collection, key, body, updated_at],
            )
            .context("Failed to write document")?;
        Ok(())
    }

    /// Append a record to an event collection, returning its generated ID
    ///
    /// Event rows are write-once; there is no update or delete path.
    pub fn append(&self, collection: &str, doc: &Value) -> Result<String> {
        let id = Uuid::now_v7().to_string();
        debug!(%collection, %id, "DocStore::append: called");
        let body = serde_json::to_string(doc).context("Failed to serialize event")?;
        let created_at = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO events (id, collection, body, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![id, collection, body, created_at],
            )
            .context("Failed to append event")?;
        Ok(id)
    }

    /// List all document keys in a collection
    pub fn list(&self, collection: &str) -> Result<Vec<String>> {
        debug!(%collection, "DocStore::list: called");
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM documents WHERE collection = ?1 ORDER BY key")
            .context("Failed to prepare list query")?;
        let keys = stmt
            .query_map(params![collection], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to list documents")?;
        info!(%collection, count = keys.len(), "DocStore::list: done");
        Ok(keys)
    }

    /// Fetch the most recent `limit` records from an event collection
    pub fn tail(&self, collection: &str, limit: usize) -> Result<Vec<EventRecord>> {
        debug!(%collection, %limit, "DocStore::tail: called");
        let mut stmt = self
            .conn
            .prepare("SELECT id, body, created_at FROM events WHERE collection = ?1 ORDER BY id DESC LIMIT ?2")
            .context("Failed to prepare tail query")?;
        let mut records = stmt
            .query_map(params![collection, limit as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to read events")?
            .into_iter()
            .map(|(id, body, created_at)| {
                let body = serde_json::from_str(&body).context(format!("Stored event is not valid JSON: {}", id))?;
                Ok(EventRecord { id, body, created_at })
            })
            .collect::<Result<Vec<_>>>()?;
        // Oldest first for display
        records.reverse();
        Ok(records)
    }
}
