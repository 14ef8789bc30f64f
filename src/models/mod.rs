//! Domain model types for delivery planning.
//!
//! Input records (orders, cities), the per-instance working types (delivery
//! nodes, the integer CVRP instance, raw solver output) and the final route
//! records.

mod city;
mod instance;
mod node;
mod order;
mod route;
mod solution;

pub use city::{City, CityTable};
pub use instance::{
    scale_capacity, scale_demand, CvrpInstance, DEMAND_SCALE, DISTANCE_SCALE,
};
pub use node::DeliveryNode;
pub use order::{parse_date, Order};
pub use route::{split_chain, Route, CHAIN_SEPARATOR};
pub use solution::{RouteResult, VehicleRoute, Violation, ViolationType};
