use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use std::time::Duration;

use coinwatch::browser::CoinBrowser;
use coinwatch::config::Config;
use coinwatch::debounce::QueryDebouncer;
use coinwatch::market::{CoinGeckoClient, MarketDataSource};
use coinwatch::store::{SavedCoinStore, SqliteSavedStore};

#[derive(Parser, Debug)]
#[command(name = "coinwatch")]
#[command(about = "Browse and track crypto coins from the terminal")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/coinwatch/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List coins by market cap
  List {
    /// Number of pages to fetch
    #[arg(short, long, default_value_t = 1)]
    pages: u32,
  },
  /// Search coins by name or symbol
  Search {
    query: String,
  },
  /// Toggle a coin on the saved list
  Save {
    /// Coin id, e.g. "bitcoin"
    id: String,
  },
  /// Show the saved list
  Saved,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;
  init_tracing();

  let args = Args::parse();
  let config = Config::load(args.config.as_deref())?;

  let client = CoinGeckoClient::new(&config)?;
  let store = SqliteSavedStore::open()?;
  let mut browser = CoinBrowser::new(client.clone());
  browser.load_saved_ids(&store).await;

  match args.command {
    Command::List { pages } => {
      browser.fetch_page(1).await;

      // Keep triggering while the last visible coin is reached and the
      // result set still grows; the browser itself never remembers
      // end-of-data.
      for _ in 1..pages {
        let before = browser.coins().len();
        let Some(last) = browser.coins().last().cloned() else {
          break;
        };
        browser.fetch_next_page_if_needed(&last).await;
        if browser.coins().len() == before {
          break;
        }
      }

      print_coins(&browser);
    }

    Command::Search { query } => {
      let mut debouncer = QueryDebouncer::new(Duration::from_millis(config.debounce_ms));
      debouncer.on_query_changed(query.as_str());
      if let Some(dispatched) = debouncer.next().await {
        browser.handle_query_change(&dispatched).await;
      }

      print_coins(&browser);
    }

    Command::Save { id } => {
      let matches = client.search_coins(&id).await?;
      let coin = matches
        .into_iter()
        .find(|c| c.id == id)
        .ok_or_else(|| color_eyre::eyre::eyre!("no coin with id '{}'", id))?;

      if browser.toggle_saved(&coin) {
        store.save(&coin).await?;
        println!("Saved {} ({})", coin.name, coin.symbol.to_uppercase());
      } else {
        store.remove(&coin.id).await?;
        println!("Removed {} ({})", coin.name, coin.symbol.to_uppercase());
      }
    }

    Command::Saved => {
      let records = store.list_saved().await?;
      let active: Vec<_> = records.into_iter().filter(|r| !r.archived).collect();
      if active.is_empty() {
        println!("No saved coins.");
      } else {
        for record in active {
          println!("{}  (saved {})", record.id, record.saved_at.format("%Y-%m-%d"));
        }
      }
    }
  }

  if let Some(message) = browser.error_message() {
    eprintln!("Error: {}", message);
    std::process::exit(1);
  }

  Ok(())
}

fn init_tracing() {
  use tracing_subscriber::EnvFilter;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| "coinwatch=info".into()),
    )
    .with_writer(std::io::stderr)
    .init();
}

fn print_coins<S: MarketDataSource>(browser: &CoinBrowser<S>) {
  if browser.coins().is_empty() {
    println!("No coins found.");
    return;
  }

  for coin in browser.coins() {
    let saved = if browser.is_saved(coin) { "*" } else { " " };
    println!(
      "{} {:>4}  {:<8} {:<24} {:>14}  {:>8}",
      saved,
      coin
        .market_cap_rank
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string()),
      coin.symbol.to_uppercase(),
      coin.name,
      format_price(coin.current_price),
      format_change(coin.price_change_percentage_24h),
    );
  }
}

fn format_price(price: Option<f64>) -> String {
  match price {
    Some(p) if p >= 1.0 => format!("${:.2}", p),
    Some(p) => format!("${:.6}", p),
    None => "-".to_string(),
  }
}

fn format_change(change: Option<f64>) -> String {
  match change {
    Some(c) => format!("{:+.2}%", c),
    None => "-".to_string(),
  }
}
