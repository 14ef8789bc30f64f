//! Customer order records.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// A customer order to deliver from a warehouse.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use smart_routage::models::Order;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let order = Order::new("o1", "Lyon", 12.5, 4, date, "Avignon");
/// assert_eq!(order.delivery_location, "Lyon");
/// assert_eq!(order.n_units, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    /// City name; must match an entry of the city table.
    pub delivery_location: String,
    pub order_total_volume: f64,
    pub n_units: u32,
    /// Planning date. Timestamps are truncated to the date on input.
    #[serde(deserialize_with = "deserialize_date")]
    pub delivered_date: NaiveDate,
    pub from_warehouse: String,
}

impl Order {
    /// Creates an order.
    pub fn new(
        order_id: impl Into<String>,
        delivery_location: impl Into<String>,
        order_total_volume: f64,
        n_units: u32,
        delivered_date: NaiveDate,
        from_warehouse: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            delivery_location: delivery_location.into(),
            order_total_volume,
            n_units,
            delivered_date,
            from_warehouse: from_warehouse.into(),
        }
    }
}

/// Parses `YYYY-MM-DD`, or a timestamp whose first ten characters are one.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts.date());
        }
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_date("2024-03-01"), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_parse_timestamp_truncates() {
        assert_eq!(parse_date("2024-03-01 17:45:00"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024-03-01T08:00:00"), Some(ymd(2024, 3, 1)));
        assert_eq!(parse_date("2024-03-01 08:00:00+01:00"), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_date("01/03/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_deserialize_from_json() {
        let json = r#"{
            "order_id": "o7",
            "delivery_location": "Nantes",
            "order_total_volume": 3.5,
            "n_units": 2,
            "delivered_date": "2024-05-02 00:00:00",
            "from_warehouse": "Rennes"
        }"#;
        let order: Order = serde_json::from_str(json).expect("valid order");
        assert_eq!(order.delivered_date, ymd(2024, 5, 2));
        assert_eq!(order.from_warehouse, "Rennes");
    }
}
