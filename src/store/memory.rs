//! In-memory saved-coins store.
//!
//! Used by tests and by callers that want the saved list to live only as
//! long as the process.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::market::Coin;

use super::{SavedCoinStore, SavedRecord};

#[derive(Default)]
pub struct MemorySavedStore {
  rows: Mutex<Vec<SavedRecord>>,
}

impl MemorySavedStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Pre-populate the store, e.g. for tests.
  pub fn with_records(records: Vec<SavedRecord>) -> Self {
    Self {
      rows: Mutex::new(records),
    }
  }

  fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<SavedRecord>>> {
    self
      .rows
      .lock()
      .map_err(|e| Error::Storage(format!("lock poisoned: {}", e)))
  }
}

#[async_trait]
impl SavedCoinStore for MemorySavedStore {
  async fn list_saved(&self) -> Result<Vec<SavedRecord>> {
    Ok(self.lock()?.clone())
  }

  async fn save(&self, coin: &Coin) -> Result<()> {
    let mut rows = self.lock()?;
    if let Some(row) = rows.iter_mut().find(|r| r.id == coin.id) {
      row.archived = false;
    } else {
      rows.push(SavedRecord {
        id: coin.id.clone(),
        archived: false,
        saved_at: Utc::now(),
      });
    }
    Ok(())
  }

  async fn remove(&self, id: &str) -> Result<()> {
    self.lock()?.retain(|r| r.id != id);
    Ok(())
  }

  async fn set_archived(&self, id: &str, archived: bool) -> Result<()> {
    let mut rows = self.lock()?;
    if let Some(row) = rows.iter_mut().find(|r| r.id == id) {
      row.archived = archived;
    }
    Ok(())
  }
}
