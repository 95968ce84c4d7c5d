/// A single coin from the market catalog.
///
/// Market fields are optional because the search endpoint returns catalog
/// entries without price data. Identity is the `id` field; the rest is
/// display data.
#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
  pub id: String,
  pub symbol: String,
  pub name: String,
  pub image: Option<String>,
  pub current_price: Option<f64>,
  pub market_cap: Option<f64>,
  pub market_cap_rank: Option<u32>,
  pub price_change_percentage_24h: Option<f64>,
}
