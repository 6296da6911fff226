//! Market API payload types (item listing and order books)

use crate::models::ParseEnumError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Tradable item from the market item listing
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MarketItem {
    pub item_name: String,
    #[serde(default)]
    pub url_name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub thumb: Option<String>,
}

/// Whether an order sells or buys the item
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Sell,
    Buy,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Sell => "sell",
            OrderType::Buy => "buy",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sell" => Ok(OrderType::Sell),
            "buy" => Ok(OrderType::Buy),
            _ => Err(ParseEnumError {
                kind: "order type",
                value: s.to_string(),
                expected: "sell, buy",
            }),
        }
    }
}

/// Presence of the user who placed an order
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Ingame,
    Online,
    Offline,
    /// Any status string the market adds later
    #[serde(other)]
    Unknown,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Ingame => "ingame",
            UserStatus::Online => "online",
            UserStatus::Offline => "offline",
            UserStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ingame" => Ok(UserStatus::Ingame),
            "online" => Ok(UserStatus::Online),
            "offline" => Ok(UserStatus::Offline),
            _ => Err(ParseEnumError {
                kind: "user status",
                value: s.to_string(),
                expected: "ingame, online, offline",
            }),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OrderUser {
    pub status: UserStatus,
    #[serde(default)]
    pub ingame_name: Option<String>,
}

/// One trade offer from an item's order book
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OrderRecord {
    pub platinum: f64,
    pub quantity: u32,
    pub order_type: OrderType,
    pub last_update: DateTime<Utc>,
    pub user: OrderUser,
}

/// `{ payload: { items: [...] } }`
#[derive(Debug, Deserialize)]
pub struct ItemsResponse {
    pub payload: ItemsPayload,
}

#[derive(Debug, Deserialize)]
pub struct ItemsPayload {
    pub items: Vec<MarketItem>,
}

/// `{ payload: { orders: [...] } }`
#[derive(Debug, Deserialize)]
pub struct OrdersResponse {
    pub payload: OrdersPayload,
}

#[derive(Debug, Deserialize)]
pub struct OrdersPayload {
    pub orders: Vec<OrderRecord>,
}
