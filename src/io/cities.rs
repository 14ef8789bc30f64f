use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use super::read_entries;
use crate::error::PlanError;
use crate::models::{City, CityTable};

/// Reads the city table from CSV with at least the columns `city,lat,lng`.
/// Other columns are ignored.
pub fn read_cities<R: Read>(reader: R) -> Result<CityTable, PlanError> {
    let cities: Vec<City> = read_entries(reader)?;
    Ok(CityTable::new(cities))
}

/// Reads the city table from a CSV file.
pub fn read_cities_file(path: impl AsRef<Path>) -> Result<CityTable, PlanError> {
    let path = path.as_ref();
    let table = read_cities(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), cities = table.len(), "city table loaded");
    Ok(table)
}
