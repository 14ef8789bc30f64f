use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::read_entries;
use crate::error::PlanError;
use crate::models::{split_chain, Route};

/// One row of the route output file.
///
/// `truck_id` and `duration` are reserved columns and always empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub truck_id: Option<String>,
    pub duration: Option<String>,
    pub fill_volume: f64,
    pub n_units: u64,
    pub orders: String,
    pub from_warehouse: String,
    pub route_date: NaiveDate,
    pub stops: String,
    pub total_distance: f64,
}

impl From<&Route> for RouteRecord {
    fn from(route: &Route) -> Self {
        Self {
            truck_id: None,
            duration: None,
            fill_volume: route.fill_volume,
            n_units: route.n_units,
            orders: route.order_chain(),
            from_warehouse: route.warehouse.clone(),
            route_date: route.date,
            stops: route.stop_chain(),
            total_distance: route.total_distance,
        }
    }
}

impl From<RouteRecord> for Route {
    fn from(record: RouteRecord) -> Self {
        Self {
            warehouse: record.from_warehouse,
            date: record.route_date,
            stops: split_chain(&record.stops),
            orders: split_chain(&record.orders),
            n_units: record.n_units,
            total_distance: record.total_distance,
            fill_volume: record.fill_volume,
        }
    }
}

/// Writes routes as CSV, header included.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use smart_routage::io::write_routes;
/// use smart_routage::models::Route;
///
/// let route = Route {
///     warehouse: "Cergy".into(),
///     date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
///     stops: vec!["Cergy".into(), "Pontoise".into()],
///     orders: vec!["o1".into(), "o2".into()],
///     n_units: 3,
///     total_distance: 5.4,
///     fill_volume: 20.0,
/// };
/// let mut out = Vec::new();
/// write_routes(&mut out, &[route]).unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("truck_id,duration,fill_volume,n_units,orders,"));
/// assert!(text.contains(",,20.0,3,o1 > o2,Cergy,2024-04-01,Cergy > Pontoise,5.4"));
/// ```
pub fn write_routes<W: Write>(writer: W, routes: &[Route]) -> Result<(), PlanError> {
    let mut writer = csv::Writer::from_writer(writer);
    for route in routes {
        writer.serialize(RouteRecord::from(route))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes routes to a CSV file, replacing it.
pub fn write_routes_file(path: impl AsRef<Path>, routes: &[Route]) -> Result<(), PlanError> {
    let path = path.as_ref();
    write_routes(File::create(path)?, routes)?;
    debug!(path = %path.display(), routes = routes.len(), "routes written");
    Ok(())
}

/// Reads routes written by [`write_routes`].
pub fn read_routes<R: Read>(reader: R) -> Result<Vec<Route>, PlanError> {
    let records: Vec<RouteRecord> = read_entries(reader)?;
    Ok(records.into_iter().map(Route::from).collect())
}

/// Reads routes from a CSV file.
pub fn read_routes_file(path: impl AsRef<Path>) -> Result<Vec<Route>, PlanError> {
    read_routes(BufReader::new(File::open(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> Vec<Route> {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date");
        vec![
            Route {
                warehouse: "Montauban".into(),
                date,
                stops: vec!["Montauban".into(), "Castelsarrasin".into(), "Moissac".into()],
                orders: vec!["m-17".into(), "m-3".into(), "m-9".into()],
                n_units: 14,
                total_distance: 61.237,
                fill_volume: 77.05,
            },
            Route {
                warehouse: "Montauban".into(),
                date,
                stops: vec!["Montauban".into(), "Caussade".into()],
                orders: vec!["m-4".into()],
                n_units: 1,
                total_distance: 48.5,
                fill_volume: 0.35,
            },
        ]
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("routes.csv");
        let original = routes();
        write_routes_file(&path, &original).expect("written");
        let back = read_routes_file(&path).expect("read back");
        assert_eq!(back, original);
    }

    #[test]
    fn test_reserved_columns_empty() {
        let mut out = Vec::new();
        write_routes(&mut out, &routes()[1..]).expect("written");
        let text = String::from_utf8(out).expect("utf8");
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("truck_id,duration,fill_volume,n_units,orders,from_warehouse,route_date,stops,total_distance")
        );
        let row = lines.next().expect("one row");
        assert!(row.starts_with(",,"));

        let records: Vec<RouteRecord> = read_entries(text.as_bytes()).expect("parse");
        assert_eq!(records[0].truck_id, None);
        assert_eq!(records[0].duration, None);
    }

    #[test]
    fn test_empty_output_has_no_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("none.csv");
        write_routes_file(&path, &[]).expect("written");
        assert!(read_routes_file(&path).expect("read back").is_empty());
    }
}
