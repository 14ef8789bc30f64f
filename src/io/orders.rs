use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use super::read_entries;
use crate::error::PlanError;
use crate::models::Order;

/// Reads orders from CSV with the columns
/// `order_id,delivery_location,order_total_volume,n_units,delivered_date,from_warehouse`.
///
/// # Examples
///
/// ```
/// use smart_routage::io::read_orders;
///
/// let data = "\
/// order_id,delivery_location,order_total_volume,n_units,delivered_date,from_warehouse
/// o1,Lyon,12.5,3,2024-03-01 08:30:00,Avignon
/// ";
/// let orders = read_orders(data.as_bytes()).unwrap();
/// assert_eq!(orders[0].delivered_date.to_string(), "2024-03-01");
/// ```
pub fn read_orders<R: Read>(reader: R) -> Result<Vec<Order>, PlanError> {
    read_entries(reader)
}

/// Reads orders from a CSV file.
pub fn read_orders_file(path: impl AsRef<Path>) -> Result<Vec<Order>, PlanError> {
    let path = path.as_ref();
    let orders = read_orders(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), orders = orders.len(), "orders loaded");
    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::NaiveDate;

    const HEADER: &str =
        "order_id,delivery_location,order_total_volume,n_units,delivered_date,from_warehouse\n";

    #[test]
    fn test_read_orders_mixed_dates() {
        let data = format!(
            "{HEADER}a,Lyon,1.5,2,2024-03-01,Avignon\nb,Nîmes,0,1,2024-03-02T17:45:00,Avignon\n"
        );
        let orders = read_orders(data.as_bytes()).expect("valid csv");
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_total_volume, 1.5);
        assert_eq!(orders[1].delivery_location, "Nîmes");
        assert_eq!(
            orders[1].delivered_date,
            NaiveDate::from_ymd_opt(2024, 3, 2).expect("valid date")
        );
    }

    #[test]
    fn test_bad_date_is_input_error() {
        let data = format!("{HEADER}a,Lyon,1.5,2,yesterday,Avignon\n");
        let err = read_orders(data.as_bytes()).expect_err("bad date");
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_missing_file() {
        let err = read_orders_file("/nonexistent/orders.csv").expect_err("missing");
        assert!(matches!(err, PlanError::Io(_)));
    }
}
