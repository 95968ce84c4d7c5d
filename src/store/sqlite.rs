//! SQLite-backed saved-coins store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::market::Coin;

use super::{SavedCoinStore, SavedRecord};

/// Schema for the saved-coins table.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS saved_coins (
    id TEXT PRIMARY KEY,
    symbol TEXT NOT NULL,
    name TEXT NOT NULL,
    archived INTEGER NOT NULL DEFAULT 0,
    saved_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

pub struct SqliteSavedStore {
  conn: Mutex<Connection>,
}

impl SqliteSavedStore {
  /// Open or create the store at the default location.
  pub fn open() -> Result<Self> {
    Self::open_at(&Self::default_path()?)
  }

  /// Open or create the store at an explicit path.
  pub fn open_at(path: &Path) -> Result<Self> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| Error::Storage(format!("failed to create store directory: {}", e)))?;
    }

    let conn = Connection::open(path)
      .map_err(|e| Error::Storage(format!("failed to open store at {}: {}", path.display(), e)))?;

    let store = Self {
      conn: Mutex::new(conn),
    };
    store.run_migrations()?;

    Ok(store)
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| Error::Storage("could not determine data directory".to_string()))?;

    Ok(data_dir.join("coinwatch").join("saved.db"))
  }

  fn run_migrations(&self) -> Result<()> {
    let conn = self.lock()?;
    conn
      .execute_batch(SCHEMA)
      .map_err(|e| Error::Storage(format!("failed to run migrations: {}", e)))?;
    Ok(())
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
    self
      .conn
      .lock()
      .map_err(|e| Error::Storage(format!("lock poisoned: {}", e)))
  }
}

#[async_trait]
impl SavedCoinStore for SqliteSavedStore {
  async fn list_saved(&self) -> Result<Vec<SavedRecord>> {
    let conn = self.lock()?;

    let mut stmt =
      conn.prepare("SELECT id, archived, saved_at FROM saved_coins ORDER BY saved_at, id")?;

    let records = stmt
      .query_map([], |row| {
        Ok((
          row.get::<_, String>(0)?,
          row.get::<_, bool>(1)?,
          row.get::<_, String>(2)?,
        ))
      })?
      .collect::<std::result::Result<Vec<_>, _>>()?;

    records
      .into_iter()
      .map(|(id, archived, saved_at)| {
        Ok(SavedRecord {
          id,
          archived,
          saved_at: parse_datetime(&saved_at)?,
        })
      })
      .collect()
  }

  async fn save(&self, coin: &Coin) -> Result<()> {
    let conn = self.lock()?;

    // Re-saving an archived coin revives it; saved_at is kept from the
    // first save.
    conn.execute(
      "INSERT INTO saved_coins (id, symbol, name, archived) VALUES (?, ?, ?, 0)
       ON CONFLICT(id) DO UPDATE SET archived = 0, symbol = excluded.symbol, name = excluded.name",
      params![coin.id, coin.symbol, coin.name],
    )?;

    Ok(())
  }

  async fn remove(&self, id: &str) -> Result<()> {
    let conn = self.lock()?;
    conn.execute("DELETE FROM saved_coins WHERE id = ?", params![id])?;
    Ok(())
  }

  async fn set_archived(&self, id: &str, archived: bool) -> Result<()> {
    let conn = self.lock()?;
    conn.execute(
      "UPDATE saved_coins SET archived = ? WHERE id = ?",
      params![archived, id],
    )?;
    Ok(())
  }
}

/// Parse a datetime string from SQLite format.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
  // SQLite stores as "YYYY-MM-DD HH:MM:SS"
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .map_err(|e| Error::Storage(format!("failed to parse datetime '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn coin(id: &str) -> Coin {
    Coin {
      id: id.to_string(),
      symbol: id[..3.min(id.len())].to_string(),
      name: id.to_string(),
      image: None,
      current_price: None,
      market_cap: None,
      market_cap_rank: None,
      price_change_percentage_24h: None,
    }
  }

  fn open_temp() -> (tempfile::TempDir, SqliteSavedStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteSavedStore::open_at(&dir.path().join("saved.db")).unwrap();
    (dir, store)
  }

  #[tokio::test]
  async fn test_save_and_list_roundtrip() {
    let (_dir, store) = open_temp();

    store.save(&coin("bitcoin")).await.unwrap();
    store.save(&coin("ethereum")).await.unwrap();

    let records = store.list_saved().await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().any(|r| r.id == "bitcoin" && !r.archived));
    assert!(records.iter().any(|r| r.id == "ethereum" && !r.archived));
  }

  #[tokio::test]
  async fn test_save_twice_is_idempotent() {
    let (_dir, store) = open_temp();

    store.save(&coin("bitcoin")).await.unwrap();
    store.save(&coin("bitcoin")).await.unwrap();

    assert_eq!(store.list_saved().await.unwrap().len(), 1);
  }

  #[tokio::test]
  async fn test_archive_keeps_the_row() {
    let (_dir, store) = open_temp();

    store.save(&coin("bitcoin")).await.unwrap();
    store.set_archived("bitcoin", true).await.unwrap();

    let records = store.list_saved().await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0].archived);
  }

  #[tokio::test]
  async fn test_resave_unarchives() {
    let (_dir, store) = open_temp();

    store.save(&coin("bitcoin")).await.unwrap();
    store.set_archived("bitcoin", true).await.unwrap();
    store.save(&coin("bitcoin")).await.unwrap();

    let records = store.list_saved().await.unwrap();
    assert_eq!(records.len(), 1);
    assert!(!records[0].archived);
  }

  #[tokio::test]
  async fn test_remove_deletes_the_row() {
    let (_dir, store) = open_temp();

    store.save(&coin("bitcoin")).await.unwrap();
    store.remove("bitcoin").await.unwrap();

    assert!(store.list_saved().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_reopen_preserves_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.db");

    {
      let store = SqliteSavedStore::open_at(&path).unwrap();
      store.save(&coin("bitcoin")).await.unwrap();
    }

    let store = SqliteSavedStore::open_at(&path).unwrap();
    let records = store.list_saved().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "bitcoin");
  }
}
