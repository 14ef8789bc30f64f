//! CSV input and output.
//!
//! - [`read_orders`] — order records, dates truncated to the calendar day
//! - [`read_cities`] — city reference table (`city,lat,lng`)
//! - [`write_routes`] / [`read_routes`] — route records

mod cities;
mod orders;
mod routes;

pub use cities::{read_cities, read_cities_file};
pub use orders::{read_orders, read_orders_file};
pub use routes::{read_routes, read_routes_file, write_routes, write_routes_file, RouteRecord};

use std::io::Read;

use serde::de::DeserializeOwned;

use crate::error::PlanError;

/// Deserializes every row of a headed CSV stream.
fn read_entries<T, R>(reader: R) -> Result<Vec<T>, PlanError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv::Reader::from_reader(reader);
    let mut entries = vec![];
    for entry in reader.deserialize() {
        entries.push(entry?);
    }
    Ok(entries)
}
