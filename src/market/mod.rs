//! Remote market data: domain types, wire types, and the HTTP client.

pub mod api_types;
mod client;
mod types;

pub use client::CoinGeckoClient;
pub use types::Coin;

use async_trait::async_trait;

use crate::error::Result;

/// The remote catalog the browser fetches from.
///
/// `list_coins` serves paged browsing ordered by market cap; `search_coins`
/// serves free-text lookup. Both fail with `Error::Network` or
/// `Error::Decoding`.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
  /// Fetch one page of the market listing. Pages are 1-indexed.
  async fn list_coins(&self, page: u32) -> Result<Vec<Coin>>;

  /// Search the catalog by name or symbol.
  async fn search_coins(&self, query: &str) -> Result<Vec<Coin>>;
}
