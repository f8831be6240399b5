//! Local store trait and SQLite implementation.

use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::dogs::DogId;
use crate::error::StoreError;

use super::record::DogRecord;

/// Trait for dog cache backends.
///
/// Calls are blocking; async callers should run them on a blocking thread.
pub trait LocalStore: Send + Sync {
  /// All cached records, in row order.
  fn read_all(&self) -> Result<Vec<DogRecord>, StoreError>;

  /// Insert records, replacing any stored record with the same identifier.
  fn upsert_all(&self, records: &[DogRecord]) -> Result<(), StoreError>;

  /// Remove every cached record.
  fn clear(&self) -> Result<(), StoreError>;
}

/// SQLite-based dog cache.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

/// Schema for the dog cache.
const CACHE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS dogs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    age INTEGER NOT NULL CHECK (age >= 0),
    image_url TEXT NOT NULL
);
"#;

impl SqliteStorage {
  /// Open or create the cache database at `path`.
  pub fn open(path: &Path) -> Result<Self, StoreError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path).map_err(|source| StoreError::Open {
      path: path.display().to_string(),
      source,
    })?;

    Self::with_connection(conn)
  }

  /// Open a throwaway in-memory cache.
  #[cfg(test)]
  pub fn open_in_memory() -> Result<Self, StoreError> {
    let conn = Connection::open_in_memory().map_err(|source| StoreError::Open {
      path: ":memory:".to_string(),
      source,
    })?;

    Self::with_connection(conn)
  }

  /// Get the default database path.
  pub fn default_path() -> Option<PathBuf> {
    dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .map(|dir| dir.join("dogview").join("dogs_db.sqlite"))
  }

  fn with_connection(conn: Connection) -> Result<Self, StoreError> {
    conn.execute_batch(CACHE_SCHEMA)?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
    self.conn.lock().map_err(|_| StoreError::LockPoisoned)
  }
}

impl LocalStore for SqliteStorage {
  fn read_all(&self) -> Result<Vec<DogRecord>, StoreError> {
    let conn = self.lock()?;

    let mut stmt =
      conn.prepare("SELECT id, name, description, age, image_url FROM dogs ORDER BY id")?;

    let records = stmt
      .query_map([], |row| {
        Ok(DogRecord {
          id: Some(DogId(row.get(0)?)),
          name: row.get(1)?,
          description: row.get(2)?,
          age: row.get(3)?,
          image_url: row.get(4)?,
        })
      })?
      .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
  }

  fn upsert_all(&self, records: &[DogRecord]) -> Result<(), StoreError> {
    let mut conn = self.lock()?;
    let tx = conn.transaction()?;

    {
      let mut stmt = tx.prepare(
        "INSERT OR REPLACE INTO dogs (id, name, description, age, image_url)
         VALUES (?1, ?2, ?3, ?4, ?5)",
      )?;

      for record in records {
        stmt.execute(params![
          record.id.map(|id| id.0),
          record.name,
          record.description,
          record.age,
          record.image_url,
        ])?;
      }
    }

    tx.commit()?;
    debug!(count = records.len(), "Upserted dog records");
    Ok(())
  }

  fn clear(&self) -> Result<(), StoreError> {
    let conn = self.lock()?;
    let removed = conn.execute("DELETE FROM dogs", [])?;
    debug!(removed, "Cleared dog cache");
    Ok(())
  }
}
