//! Shared types for game catalog operations
//!
//! Locales, snapshot slots, market API payloads and the unified error type used
//! by the sync and statistics code.

pub mod error;
pub mod market;
pub mod models;

pub use error::{CatalogError, Result};
pub use market::{
    ItemsResponse, MarketItem, OrderRecord, OrderType, OrderUser, OrdersResponse, UserStatus,
};
pub use models::{EntityClass, Locale, NameSet, ParseEnumError, Slot};
