//! Distance and cost matrices.
//!
//! Great-circle distances in kilometers over node coordinates, and the
//! scaled integer cost matrix the solver works with.

mod haversine;
mod matrix;

pub use haversine::{great_circle_km, EARTH_RADIUS_KM};
pub use matrix::{route_cost, ArcCost, CostMatrix, DistanceMatrix};
