//! Paged coin browsing with search, result caches, and a saved list.
//!
//! `CoinBrowser` owns everything the presentation layer observes: the
//! visible coins, the loading flags, the surfaced error message, and the
//! saved-ids set. It serves paged results in list mode and query results in
//! search mode, each backed by its own cache so repeated navigation never
//! re-fetches. A single caller drives it (`&mut self` throughout); cache
//! hits return synchronously, only remote calls suspend.

use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::market::{Coin, MarketDataSource};
use crate::store::SavedCoinStore;

pub struct CoinBrowser<S> {
  source: S,

  /// Coins currently visible: pages 1..=current_page concatenated in list
  /// mode, the active query's results in search mode.
  coins: Vec<Coin>,

  /// Fetched pages, kept for the lifetime of the browser. Never mixed with
  /// search results.
  page_cache: HashMap<u32, Vec<Coin>>,

  /// Search results keyed by the literal query string.
  search_cache: HashMap<String, Vec<Coin>>,

  current_page: u32,
  search_mode: bool,

  is_loading: bool,
  is_loading_more: bool,

  /// Ids of coins the user saved, mirrored in memory for instant toggling.
  /// Persistence belongs to the `SavedCoinStore` collaborator.
  saved_ids: HashSet<String>,

  error_message: Option<String>,
}

impl<S: MarketDataSource> CoinBrowser<S> {
  pub fn new(source: S) -> Self {
    Self {
      source,
      coins: Vec::new(),
      page_cache: HashMap::new(),
      search_cache: HashMap::new(),
      current_page: 1,
      search_mode: false,
      is_loading: false,
      is_loading_more: false,
      saved_ids: HashSet::new(),
      error_message: None,
    }
  }

  /// Fetch one page of the market listing. Page 1 replaces the visible
  /// coins; later pages append.
  ///
  /// In list mode a cached page is served without touching the remote
  /// source. On failure the visible coins and `current_page` are left
  /// unchanged and the error is surfaced via [`error_message`](Self::error_message).
  pub async fn fetch_page(&mut self, page: u32) {
    self.is_loading = true;
    self.error_message = None;

    if !self.search_mode {
      if let Some(cached) = self.page_cache.get(&page) {
        debug!(page, coins = cached.len(), "serving page from cache");
        if page > 1 {
          self.coins.extend(cached.iter().cloned());
        } else {
          self.coins = cached.clone();
        }
        self.current_page = page;
        self.is_loading = false;
        return;
      }
    }

    match self.source.list_coins(page).await {
      Ok(fetched) => {
        // The user may have started a search while this request was in
        // flight; search-mode results must never land in the page cache.
        if !self.search_mode {
          self.page_cache.insert(page, fetched.clone());
        }
        if page > 1 {
          self.coins.extend(fetched);
        } else {
          self.coins = fetched;
        }
        self.current_page = page;
      }
      Err(e) => {
        warn!(page, error = %e, "page fetch failed");
        self.error_message = Some(e.to_string());
      }
    }

    self.is_loading = false;
  }

  /// Fetch the next page when `coin` is the last visible one.
  ///
  /// No-op in search mode, when `coin` is not at the end of the visible
  /// list, or while a previous trigger is still running (`is_loading_more`).
  pub async fn fetch_next_page_if_needed(&mut self, coin: &Coin) {
    if self.search_mode || self.is_loading_more {
      return;
    }
    if self.coins.last().map(|last| last.id.as_str()) != Some(coin.id.as_str()) {
      return;
    }

    self.is_loading_more = true;
    let next = self.current_page + 1;
    self.fetch_page(next).await;
    self.is_loading_more = false;
  }

  /// Search the catalog for `query`.
  ///
  /// In search mode a previously fetched result for the same literal query
  /// is served from cache. Fresh results are always cached under the query
  /// string, even if the mode flipped back to list while the request was in
  /// flight: keyed by the literal text, the entry can only ever be served
  /// to a later search for that same text.
  pub async fn search(&mut self, query: &str) {
    if self.search_mode {
      if let Some(cached) = self.search_cache.get(query) {
        debug!(query, coins = cached.len(), "serving search from cache");
        self.coins = cached.clone();
        return;
      }
    }

    self.is_loading = true;
    self.error_message = None;

    match self.source.search_coins(query).await {
      Ok(fetched) => {
        self.search_cache.insert(query.to_string(), fetched.clone());
        self.coins = fetched;
      }
      Err(e) => {
        warn!(query, error = %e, "search failed");
        self.error_message = Some(e.to_string());
      }
    }

    self.is_loading = false;
  }

  /// Apply a debounced query change. This is the only path that switches
  /// between list mode and search mode.
  ///
  /// An empty query leaves search mode: the page counter resets to 1 and
  /// the visible coins are rebuilt from `fetch_page(1)`, which usually
  /// hits the page cache since leaving search does not clear it.
  pub async fn handle_query_change(&mut self, query: &str) {
    if query.is_empty() {
      self.search_mode = false;
      self.current_page = 1;
      self.coins.clear();
      self.fetch_page(1).await;
    } else {
      self.search_mode = true;
      self.search(query).await;
    }
  }

  /// Replace the in-memory saved set from a store snapshot, dropping rows
  /// flagged archived. On a store failure the set is left unchanged and
  /// the error is surfaced.
  pub async fn load_saved_ids(&mut self, store: &dyn SavedCoinStore) {
    match store.list_saved().await {
      Ok(records) => {
        self.saved_ids = records
          .into_iter()
          .filter(|r| !r.archived)
          .map(|r| r.id)
          .collect();
      }
      Err(e) => {
        warn!(error = %e, "failed to load saved coins");
        self.error_message = Some(e.to_string());
      }
    }
  }

  /// Toggle a coin in the in-memory saved set. Returns `true` when the coin
  /// is saved after the call. The caller mirrors the change to the store.
  pub fn toggle_saved(&mut self, coin: &Coin) -> bool {
    if self.saved_ids.insert(coin.id.clone()) {
      true
    } else {
      self.saved_ids.remove(&coin.id);
      false
    }
  }

  pub fn is_saved(&self, coin: &Coin) -> bool {
    self.saved_ids.contains(&coin.id)
  }

  // Accessors for the presentation layer

  pub fn coins(&self) -> &[Coin] {
    &self.coins
  }

  pub fn current_page(&self) -> u32 {
    self.current_page
  }

  pub fn is_search_mode(&self) -> bool {
    self.search_mode
  }

  pub fn is_loading(&self) -> bool {
    self.is_loading
  }

  pub fn is_loading_more(&self) -> bool {
    self.is_loading_more
  }

  pub fn error_message(&self) -> Option<&str> {
    self.error_message.as_deref()
  }
}
