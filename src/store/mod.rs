//! Local persistence for the user's saved coins.

mod memory;
mod sqlite;

pub use memory::MemorySavedStore;
pub use sqlite::SqliteSavedStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::market::Coin;

/// A saved-coin row as persisted locally.
///
/// Archived rows stay in the store (they may still be referenced by other
/// app data) but are excluded from the in-memory saved set.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedRecord {
  pub id: String,
  pub archived: bool,
  pub saved_at: DateTime<Utc>,
}

/// Store backend for the saved-coins list. All operations fail with
/// `Error::Storage`.
#[async_trait]
pub trait SavedCoinStore: Send + Sync {
  /// Snapshot of all saved rows, archived ones included, ordered by save
  /// time.
  async fn list_saved(&self) -> Result<Vec<SavedRecord>>;

  /// Insert a coin, or unarchive it if it is already present.
  async fn save(&self, coin: &Coin) -> Result<()>;

  /// Delete a coin's row entirely.
  async fn remove(&self, id: &str) -> Result<()>;

  /// Flip the archived flag without deleting the row.
  async fn set_archived(&self, id: &str, archived: bool) -> Result<()>;
}
