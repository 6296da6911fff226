//! Catalog Sync - wiki mod names reconciled with market items
//!
//! Crawls paginated wiki listings for mod names, fetches tradable item names from
//! the market API, stores both as sorted snapshot slots and intersects them.
//! Also computes price statistics over market order books.

pub mod config;
pub mod crawler;
pub mod listing;
pub mod market;
pub mod reconcile;
pub mod stats;
pub mod store;
pub mod sync;
pub mod wiki;

pub use crawler::{CrawlConfig, Crawler, HttpPageFetcher, PageFetcher};
pub use listing::{CrawlSelectors, ListingPage, ListingParser};
pub use market::{MarketClient, MarketConfig};
pub use reconcile::intersect;
pub use stats::{analyze_orders, analyze_orders_in_year, OrderFilter, PriceStatistics};
pub use store::{persist, FileSnapshotStore, MemorySnapshotStore, SnapshotStore, StagedStore};
pub use sync::{CatalogSync, ItemSource, ModSource, ModsSlotPolicy, SyncReport};
pub use wiki::{WikiModSource, WikiUrls};
