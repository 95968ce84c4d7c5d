use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};

use super::api_types::{ApiMarketCoin, ApiSearchResponse};
use super::types::Coin;
use super::MarketDataSource;

/// Market API client (CoinGecko v3 compatible).
#[derive(Clone)]
pub struct CoinGeckoClient {
  http: reqwest::Client,
  base: Url,
  currency: String,
  per_page: u32,
  api_key: Option<String>,
}

impl CoinGeckoClient {
  pub fn new(config: &Config) -> Result<Self> {
    let http = reqwest::Client::builder()
      .user_agent(concat!("coinwatch/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| Error::Network(format!("failed to create HTTP client: {}", e)))?;

    let base = Url::parse(&config.api.url)
      .map_err(|e| Error::Config(format!("invalid API url '{}': {}", config.api.url, e)))?;
    if base.cannot_be_a_base() {
      return Err(Error::Config(format!(
        "API url '{}' cannot be used as a base",
        config.api.url
      )));
    }

    Ok(Self {
      http,
      base,
      currency: config.api.currency.clone(),
      per_page: config.api.per_page,
      api_key: Config::get_api_key(),
    })
  }

  fn endpoint(&self, segments: &[&str]) -> Url {
    let mut url = self.base.clone();
    // new() rejects cannot-be-a-base urls, so path_segments_mut succeeds.
    if let Ok(mut path) = url.path_segments_mut() {
      path.pop_if_empty().extend(segments);
    }
    url
  }

  fn markets_url(&self, page: u32) -> Url {
    let mut url = self.endpoint(&["coins", "markets"]);
    url
      .query_pairs_mut()
      .append_pair("vs_currency", &self.currency)
      .append_pair("order", "market_cap_desc")
      .append_pair("per_page", &self.per_page.to_string())
      .append_pair("page", &page.to_string())
      .append_pair("sparkline", "false");
    url
  }

  fn search_url(&self, query: &str) -> Url {
    let mut url = self.endpoint(&["search"]);
    url.query_pairs_mut().append_pair("query", query);
    url
  }

  async fn get(&self, url: Url) -> Result<reqwest::Response> {
    let mut request = self.http.get(url.clone());
    if let Some(key) = &self.api_key {
      request = request.header("x-cg-demo-api-key", key);
    }

    let response = request
      .send()
      .await
      .map_err(|e| Error::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      return Err(Error::Network(format!("{} returned HTTP {}", url, status)));
    }

    Ok(response)
  }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
  async fn list_coins(&self, page: u32) -> Result<Vec<Coin>> {
    let url = self.markets_url(page);
    debug!(%url, page, "fetching market page");

    let rows: Vec<ApiMarketCoin> = self
      .get(url)
      .await?
      .json()
      .await
      .map_err(|e| Error::Decoding(e.to_string()))?;

    debug!(page, coins = rows.len(), "market page fetched");
    Ok(rows.into_iter().map(ApiMarketCoin::into_coin).collect())
  }

  async fn search_coins(&self, query: &str) -> Result<Vec<Coin>> {
    let url = self.search_url(query);
    debug!(%url, query, "searching coins");

    let response: ApiSearchResponse = self
      .get(url)
      .await?
      .json()
      .await
      .map_err(|e| Error::Decoding(e.to_string()))?;

    debug!(query, coins = response.coins.len(), "search completed");
    Ok(
      response
        .coins
        .into_iter()
        .map(|c| c.into_coin())
        .collect(),
    )
  }
}
