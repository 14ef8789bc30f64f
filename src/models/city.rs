//! City reference table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// A named location with WGS84 coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(rename = "city")]
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl City {
    /// Creates a city.
    pub fn new(name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lng,
        }
    }
}

/// Immutable lookup from city name to coordinates.
///
/// Built once per run and shared by reference. Later duplicates of a name
/// are ignored, the first entry wins.
///
/// # Examples
///
/// ```
/// use smart_routage::models::{City, CityTable};
///
/// let table = CityTable::new(vec![City::new("Rennes", 48.11, -1.68)]);
/// assert!(table.get("Rennes").is_some());
/// assert!(table.get("Brest").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CityTable {
    cities: HashMap<String, City>,
}

impl CityTable {
    /// Builds the table from a list of cities.
    pub fn new(cities: Vec<City>) -> Self {
        let mut map = HashMap::with_capacity(cities.len());
        for city in cities {
            map.entry(city.name.clone()).or_insert(city);
        }
        Self { cities: map }
    }

    /// Looks up a city by exact name.
    pub fn get(&self, name: &str) -> Option<&City> {
        self.cities.get(name)
    }

    /// Looks up a city, failing with [`PlanError::UnknownLocation`].
    pub fn resolve(&self, name: &str) -> Result<&City, PlanError> {
        self.get(name)
            .ok_or_else(|| PlanError::UnknownLocation(name.to_string()))
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Returns `true` if the table holds no city.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
