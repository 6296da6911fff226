//! Market API client for item listings and order books

mod client;

pub use client::{MarketClient, MarketConfig, DEFAULT_MARKET_URL, DEFAULT_PLATFORM};
