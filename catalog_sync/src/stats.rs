//! Price statistics over market order books

use chrono::{Datelike, Local};
use market_common::{OrderRecord, OrderType, UserStatus};
use std::fmt;

/// Which orders take part in the statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<UserStatus>,
    pub order_type: Option<OrderType>,
    /// Only orders last updated in the reference year
    pub current_year_only: bool,
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self {
            status: None,
            order_type: None,
            current_year_only: true,
        }
    }
}

impl OrderFilter {
    fn matches(&self, order: &OrderRecord, year: i32) -> bool {
        if self.status.is_some_and(|s| order.user.status != s) {
            return false;
        }
        if self.order_type.is_some_and(|t| order.order_type != t) {
            return false;
        }
        if self.current_year_only && order.last_update.year() != year {
            return false;
        }
        true
    }
}

impl fmt::Display for OrderFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.status.map_or("any", |s| s.as_str());
        let order_type = self.order_type.map_or("any", |t| t.as_str());
        write!(
            f,
            "status={}, order_type={}, current_year_only={}",
            status, order_type, self.current_year_only
        )
    }
}

/// Platinum price summary over the matching orders
#[derive(Debug, Clone, PartialEq)]
pub struct PriceStatistics {
    pub min_platinum: f64,
    pub max_platinum: f64,
    /// Quantity-weighted mean
    pub average_platinum: f64,
    pub order_count: usize,
    pub total_quantity: u64,
    pub total_platinum: f64,
}

/// Statistics over the orders matching `filter`, using the current local year.
pub fn analyze_orders(orders: &[OrderRecord], filter: &OrderFilter) -> Option<PriceStatistics> {
    analyze_orders_in_year(orders, filter, Local::now().year())
}

/// Statistics over the orders matching `filter`, with `year` as the current year.
///
/// Returns `None` when no order matches.
pub fn analyze_orders_in_year(
    orders: &[OrderRecord],
    filter: &OrderFilter,
    year: i32,
) -> Option<PriceStatistics> {
    let selected: Vec<&OrderRecord> = orders.iter().filter(|o| filter.matches(o, year)).collect();

    let total_quantity: u64 = selected.iter().map(|o| u64::from(o.quantity)).sum();
    if selected.is_empty() || total_quantity == 0 {
        log::warn!("No orders with parameters: {}", filter);
        return None;
    }

    let total_platinum: f64 = selected
        .iter()
        .map(|o| o.platinum * f64::from(o.quantity))
        .sum();
    let min_platinum = selected
        .iter()
        .map(|o| o.platinum)
        .fold(f64::INFINITY, f64::min);
    let max_platinum = selected
        .iter()
        .map(|o| o.platinum)
        .fold(f64::NEG_INFINITY, f64::max);

    Some(PriceStatistics {
        min_platinum,
        max_platinum,
        average_platinum: total_platinum / total_quantity as f64,
        order_count: selected.len(),
        total_quantity,
        total_platinum,
    })
}

pub fn format_statistics(item: &str, filter: &OrderFilter, stats: &PriceStatistics) -> String {
    let mut output = String::new();

    output.push_str(&format!("Order statistics for {item} ({filter})\n"));
    output.push_str("-----------------------------------------------\n");
    output.push_str(&format!(
        "Orders: {} ({} units)\n",
        stats.order_count, stats.total_quantity
    ));
    output.push_str(&format!("Cheapest platinum: {}\n", stats.min_platinum));
    output.push_str(&format!("Most expensive platinum: {}\n", stats.max_platinum));
    output.push_str(&format!("Average platinum: {:.2}\n", stats.average_platinum));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use market_common::OrderUser;

    const YEAR: i32 = 2026;

    // Helper to create an order updated on January 15th of `year`
    fn order(
        platinum: f64,
        quantity: u32,
        order_type: OrderType,
        status: UserStatus,
        year: i32,
    ) -> OrderRecord {
        OrderRecord {
            platinum,
            quantity,
            order_type,
            last_update: Utc.with_ymd_and_hms(year, 1, 15, 12, 0, 0).unwrap(),
            user: OrderUser {
                status,
                ingame_name: None,
            },
        }
    }

    fn sell(platinum: f64, quantity: u32) -> OrderRecord {
        order(platinum, quantity, OrderType::Sell, UserStatus::Ingame, YEAR)
    }

    fn no_filter() -> OrderFilter {
        OrderFilter {
            current_year_only: false,
            ..OrderFilter::default()
        }
    }

    // ==================== Reduction Tests ====================

    #[test]
    fn test_weighted_average_min_max() {
        let orders = vec![sell(10.0, 2), sell(20.0, 1)];
        let stats = analyze_orders_in_year(&orders, &OrderFilter::default(), YEAR).unwrap();

        assert_eq!(stats.total_quantity, 3);
        assert!((stats.total_platinum - 40.0).abs() < 1e-9);
        assert!((stats.average_platinum - 40.0 / 3.0).abs() < 1e-9);
        assert!((stats.min_platinum - 10.0).abs() < 1e-9);
        assert!((stats.max_platinum - 20.0).abs() < 1e-9);
        assert_eq!(stats.order_count, 2);
    }

    #[test]
    fn test_single_order() {
        let stats = analyze_orders_in_year(&[sell(35.0, 4)], &no_filter(), YEAR).unwrap();
        assert!((stats.average_platinum - 35.0).abs() < 1e-9);
        assert!((stats.min_platinum - stats.max_platinum).abs() < 1e-9);
    }

    #[test]
    fn test_free_orders_count() {
        let stats = analyze_orders_in_year(&[sell(0.0, 1), sell(10.0, 1)], &no_filter(), YEAR)
            .unwrap();
        assert!((stats.min_platinum - 0.0).abs() < 1e-9);
        assert!((stats.average_platinum - 5.0).abs() < 1e-9);
    }

    // ==================== Filter Tests ====================

    #[test]
    fn test_filter_by_status() {
        let orders = vec![
            order(10.0, 1, OrderType::Sell, UserStatus::Ingame, YEAR),
            order(50.0, 1, OrderType::Sell, UserStatus::Offline, YEAR),
        ];
        let filter = OrderFilter {
            status: Some(UserStatus::Ingame),
            ..no_filter()
        };

        let stats = analyze_orders_in_year(&orders, &filter, YEAR).unwrap();
        assert_eq!(stats.order_count, 1);
        assert!((stats.max_platinum - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_filter_by_order_type() {
        let orders = vec![
            order(10.0, 1, OrderType::Sell, UserStatus::Online, YEAR),
            order(8.0, 3, OrderType::Buy, UserStatus::Online, YEAR),
        ];
        let filter = OrderFilter {
            order_type: Some(OrderType::Buy),
            ..no_filter()
        };

        let stats = analyze_orders_in_year(&orders, &filter, YEAR).unwrap();
        assert_eq!(stats.total_quantity, 3);
        assert!((stats.average_platinum - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_current_year_only_drops_old_orders() {
        let orders = vec![
            order(10.0, 1, OrderType::Sell, UserStatus::Ingame, YEAR),
            order(99.0, 1, OrderType::Sell, UserStatus::Ingame, YEAR - 1),
        ];

        let current = analyze_orders_in_year(&orders, &OrderFilter::default(), YEAR).unwrap();
        assert_eq!(current.order_count, 1);

        let all = analyze_orders_in_year(&orders, &no_filter(), YEAR).unwrap();
        assert_eq!(all.order_count, 2);
        assert!((all.max_platinum - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_filters_combine() {
        let orders = vec![
            order(10.0, 1, OrderType::Sell, UserStatus::Ingame, YEAR),
            order(12.0, 1, OrderType::Buy, UserStatus::Ingame, YEAR),
            order(14.0, 1, OrderType::Sell, UserStatus::Online, YEAR),
            order(16.0, 1, OrderType::Sell, UserStatus::Ingame, YEAR - 2),
        ];
        let filter = OrderFilter {
            status: Some(UserStatus::Ingame),
            order_type: Some(OrderType::Sell),
            current_year_only: true,
        };

        let stats = analyze_orders_in_year(&orders, &filter, YEAR).unwrap();
        assert_eq!(stats.order_count, 1);
        assert!((stats.average_platinum - 10.0).abs() < 1e-9);
    }

    // ==================== Empty Result Tests ====================

    #[test]
    fn test_empty_input_is_none() {
        assert!(analyze_orders_in_year(&[], &no_filter(), YEAR).is_none());
        assert!(analyze_orders_in_year(&[], &OrderFilter::default(), YEAR).is_none());
    }

    #[test]
    fn test_no_match_is_none_for_every_filter_combination() {
        // Offline buy orders from last year
        let orders = vec![order(10.0, 1, OrderType::Buy, UserStatus::Offline, YEAR - 1)];

        for status in [None, Some(UserStatus::Ingame), Some(UserStatus::Online)] {
            for order_type in [None, Some(OrderType::Sell), Some(OrderType::Buy)] {
                for current_year_only in [false, true] {
                    let filter = OrderFilter {
                        status,
                        order_type,
                        current_year_only,
                    };
                    let admits_order = status.is_none()
                        && order_type != Some(OrderType::Sell)
                        && !current_year_only;
                    let stats = analyze_orders_in_year(&orders, &filter, YEAR);
                    assert_eq!(stats.is_some(), admits_order, "unexpected result for {filter}");
                }
            }
        }
        // Only the year filter excludes it
        assert!(analyze_orders_in_year(&orders, &OrderFilter::default(), YEAR).is_none());
    }

    #[test]
    fn test_zero_total_quantity_is_none() {
        let orders = vec![sell(10.0, 0)];
        assert!(analyze_orders_in_year(&orders, &no_filter(), YEAR).is_none());
    }

    // ==================== Formatting Tests ====================

    #[test]
    fn test_filter_display_names_parameters() {
        let filter = OrderFilter {
            status: Some(UserStatus::Online),
            order_type: None,
            current_year_only: true,
        };
        assert_eq!(
            filter.to_string(),
            "status=online, order_type=any, current_year_only=true"
        );
    }

    #[test]
    fn test_format_statistics() {
        let stats = analyze_orders_in_year(&[sell(10.0, 2), sell(20.0, 1)], &no_filter(), YEAR)
            .unwrap();
        let output = format_statistics("serration", &no_filter(), &stats);

        assert!(output.starts_with("Order statistics for serration"));
        assert!(output.contains("Orders: 2 (3 units)"));
        assert!(output.contains("Average platinum: 13.33"));
    }
}
