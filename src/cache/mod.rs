//! Local persistence for the dog collection.
//!
//! A single flat table keyed by a storage-assigned identifier:
//! - Bulk upsert replaces whole records sharing an identifier
//! - Full reads come back in row order
//! - No per-record freshness tracking

mod record;
mod storage;

pub use record::DogRecord;
pub use storage::{LocalStore, SqliteStorage};
