//! Serde-deserializable types matching the market API responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use serde::Deserialize;

use super::types::Coin;

/// A row from the `/coins/markets` endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiMarketCoin {
  pub id: String,
  #[serde(default)]
  pub symbol: String,
  #[serde(default)]
  pub name: String,
  pub image: Option<String>,
  pub current_price: Option<f64>,
  pub market_cap: Option<f64>,
  pub market_cap_rank: Option<u32>,
  pub price_change_percentage_24h: Option<f64>,
}

impl ApiMarketCoin {
  pub fn into_coin(self) -> Coin {
    Coin {
      id: self.id,
      symbol: self.symbol,
      name: self.name,
      image: self.image,
      current_price: self.current_price,
      market_cap: self.market_cap,
      market_cap_rank: self.market_cap_rank,
      price_change_percentage_24h: self.price_change_percentage_24h,
    }
  }
}

/// Response envelope of the `/search` endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiSearchResponse {
  #[serde(default)]
  pub coins: Vec<ApiSearchCoin>,
}

/// A search hit. Search results carry no price data.
#[derive(Debug, Deserialize)]
pub struct ApiSearchCoin {
  pub id: String,
  #[serde(default)]
  pub symbol: String,
  #[serde(default)]
  pub name: String,
  pub thumb: Option<String>,
  pub large: Option<String>,
  pub market_cap_rank: Option<u32>,
}

impl ApiSearchCoin {
  pub fn into_coin(self) -> Coin {
    Coin {
      id: self.id,
      symbol: self.symbol,
      name: self.name,
      image: self.large.or(self.thumb),
      current_price: None,
      market_cap: None,
      market_cap_rank: self.market_cap_rank,
      price_change_percentage_24h: None,
    }
  }
}
