//! Delivery route records.

use chrono::NaiveDate;

/// Separator used when a stop or order chain is rendered as text.
pub const CHAIN_SEPARATOR: &str = " > ";

/// A planned vehicle route for one warehouse on one date.
///
/// `stops` starts at the warehouse. `total_distance` (km) covers the closed
/// tour, return leg included.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use smart_routage::models::Route;
///
/// let route = Route {
///     warehouse: "Rennes".into(),
///     date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
///     stops: vec!["Rennes".into(), "Vitré".into()],
///     orders: vec!["o1".into(), "o2".into()],
///     n_units: 6,
///     total_distance: 74.6,
///     fill_volume: 21.0,
/// };
/// assert_eq!(route.stop_chain(), "Rennes > Vitré");
/// assert_eq!(route.num_stops(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub warehouse: String,
    pub date: NaiveDate,
    pub stops: Vec<String>,
    pub orders: Vec<String>,
    pub n_units: u64,
    pub total_distance: f64,
    pub fill_volume: f64,
}

impl Route {
    /// Stops joined with [`CHAIN_SEPARATOR`].
    pub fn stop_chain(&self) -> String {
        self.stops.join(CHAIN_SEPARATOR)
    }

    /// Order ids joined with [`CHAIN_SEPARATOR`].
    pub fn order_chain(&self) -> String {
        self.orders.join(CHAIN_SEPARATOR)
    }

    /// Number of delivery stops, warehouse excluded.
    pub fn num_stops(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }

    /// Human-readable summary: header line, stops, orders.
    pub fn summary(&self, index: usize) -> String {
        format!(
            "Route {} : {:.0} km\n  Stops : {}\n  Orders : {}",
            index,
            self.total_distance,
            self.stop_chain(),
            self.order_chain()
        )
    }
}

/// Splits a rendered chain back into its items. An empty chain has no items.
pub fn split_chain(chain: &str) -> Vec<String> {
    if chain.is_empty() {
        return Vec::new();
    }
    chain.split(CHAIN_SEPARATOR).map(str::to_string).collect()
}
