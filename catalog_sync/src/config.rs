//! Command-line and environment configuration

use crate::crawler::CrawlConfig;
use crate::listing::CrawlSelectors;
use crate::market::{MarketConfig, DEFAULT_MARKET_URL, DEFAULT_PLATFORM};
use crate::stats::OrderFilter;
use crate::sync::ModsSlotPolicy;
use crate::wiki::{WikiUrls, DEFAULT_MODS_URL_EN, DEFAULT_MODS_URL_RU};
use clap::{Parser, Subcommand};
use market_common::{Locale, OrderType, Slot, UserStatus};
use std::path::PathBuf;
use std::time::Duration;

/// Game catalog sync - wiki mods, market items and order prices
#[derive(Parser, Debug)]
#[command(name = "catalog_sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the snapshot slot files
    #[arg(long, env = "CATALOG_DATA_DIR", default_value_t = default_data_dir())]
    pub data_dir: String,

    /// Market API base URL
    #[arg(long, env = "MARKET_URL", default_value = DEFAULT_MARKET_URL)]
    pub market_url: String,

    /// Value for the market `Cookie_Auth` header
    #[arg(long, env = "MARKET_COOKIE_AUTH", hide_env_values = true)]
    pub cookie_auth: Option<String>,

    /// Market platform: pc, xbox, ps4 or switch
    #[arg(long, env = "MARKET_PLATFORM", default_value = DEFAULT_PLATFORM)]
    pub platform: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "CATALOG_TIMEOUT_SECS", default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Maximum listing pages followed per crawl
    #[arg(long, env = "CATALOG_MAX_PAGES", default_value_t = crate::crawler::DEFAULT_MAX_PAGES)]
    pub max_pages: usize,

    /// English wiki mod category URL
    #[arg(long, env = "WIKI_MODS_URL_EN", default_value = DEFAULT_MODS_URL_EN)]
    pub wiki_en: String,

    /// Russian wiki mod category URL
    #[arg(long, env = "WIKI_MODS_URL_RU", default_value = DEFAULT_MODS_URL_RU)]
    pub wiki_ru: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run one full catalog sync cycle
    Sync {
        /// Also overwrite mods_<locale> with the tradable subset
        #[arg(long, default_value_t = false)]
        overwrite_mods: bool,
    },
    /// Fetch an item's order book and print price statistics
    Orders {
        /// Item url_name, e.g. mirage_prime_systems
        url_name: String,

        /// Only orders from users with this status (ingame, online, offline)
        #[arg(long)]
        status: Option<UserStatus>,

        /// Only sell or buy orders
        #[arg(long)]
        order_type: Option<OrderType>,

        /// Include orders not updated this year
        #[arg(long, default_value_t = false)]
        all_years: bool,

        #[arg(long, default_value = "en")]
        locale: Locale,
    },
    /// Print the names stored in a slot, e.g. tradable_mods_en
    Show { slot: Slot },
}

/// Returns the default data directory: ~/.local/share/catalog_sync
pub fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("catalog_sync")
        .to_string_lossy()
        .to_string()
}

/// Settings consumed by the library, resolved from [`Cli`]
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub data_dir: PathBuf,
    pub market: MarketConfig,
    pub crawl: CrawlConfig,
    pub wiki: WikiUrls,
    pub timeout: Duration,
}

impl Cli {
    pub fn to_config(&self) -> SyncConfig {
        let timeout = Duration::from_secs(self.timeout_secs);
        SyncConfig {
            data_dir: PathBuf::from(&self.data_dir),
            market: MarketConfig {
                base_url: self.market_url.clone(),
                cookie_auth: self.cookie_auth.clone().filter(|c| !c.trim().is_empty()),
                platform: self.platform.clone(),
                timeout,
            },
            crawl: CrawlConfig {
                selectors: CrawlSelectors::default(),
                max_pages: self.max_pages,
            },
            wiki: WikiUrls {
                en: self.wiki_en.clone(),
                ru: self.wiki_ru.clone(),
            },
            timeout,
        }
    }
}

impl Command {
    /// Slot policy for `sync`; `Separate` for every other command
    pub fn policy(&self) -> ModsSlotPolicy {
        match self {
            Command::Sync {
                overwrite_mods: true,
            } => ModsSlotPolicy::OverwriteRaw,
            _ => ModsSlotPolicy::Separate,
        }
    }

    /// Order filter for `orders`
    pub fn order_filter(&self) -> Option<OrderFilter> {
        match self {
            Command::Orders {
                status,
                order_type,
                all_years,
                ..
            } => Some(OrderFilter {
                status: *status,
                order_type: *order_type,
                current_year_only: !all_years,
            }),
            _ => None,
        }
    }
}
