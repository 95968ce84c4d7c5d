//! Paged market browsing for crypto coins.
//!
//! The heart of the crate is [`CoinBrowser`]: it serves paged market
//! listings and debounced free-text search over a [`market::MarketDataSource`],
//! memoizes both kinds of results, and mirrors the user's saved coins from a
//! [`store::SavedCoinStore`]. The presentation layer (CLI, TUI, whatever)
//! observes its state and triggers its operations; the browser itself knows
//! nothing about rendering.

pub mod browser;
pub mod config;
pub mod debounce;
pub mod error;
pub mod market;
pub mod store;

pub use browser::CoinBrowser;
pub use debounce::QueryDebouncer;
pub use error::{Error, Result};
