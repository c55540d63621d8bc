//! DocStore - SQLite-backed keyed-document persistence
//!
//! Stores whole JSON documents addressed by `(collection, key)` with
//! full-overwrite semantics, plus append-only event collections that are
//! written but never updated. No partial updates, no transactions spanning
//! calls, no secondary indexes.
//!
//! # Example
//!
//! ```ignore
//! use docstore::DocStore;
//!
//! let store = DocStore::open("weekplan.db")?;
//! store.put("weekly_plans", "default__2026-W08", &doc)?;
//! let doc = store.get("weekly_plans", "default__2026-W08")?;
//! store.append("events_log", &event)?;
//! ```

pub mod cli;
mod store;

pub use store::{DocStore, EventRecord};

/// Default database file name when none is configured
pub const DEFAULT_DB_FILE: &str = "docstore.db";
