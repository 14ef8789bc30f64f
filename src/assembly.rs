//! Conversion of raw solver output into route records.

use chrono::NaiveDate;

use crate::models::{DeliveryNode, Route, RouteResult, DISTANCE_SCALE};

/// Builds one [`Route`] per vehicle slot that visits at least one node.
///
/// Stops start at the depot. Order ids follow visit order. Distance is
/// scaled back to km; fill volume sums the exact node volumes.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use smart_routage::assembly::assemble_routes;
/// use smart_routage::models::{DeliveryNode, RouteResult, VehicleRoute};
///
/// let mut stop = DeliveryNode::depot("Vitré", 48.12, -1.21);
/// stop.volume = 12.5;
/// stop.units = 3;
/// stop.order_groups = vec![vec!["o1".into()]];
/// let nodes = vec![DeliveryNode::depot("Rennes", 48.11, -1.68), stop];
///
/// let result = RouteResult::new(vec![
///     VehicleRoute { path: vec![0, 1], distance: 69_824, load: 1250 },
///     VehicleRoute::empty(0),
/// ]);
/// let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
/// let routes = assemble_routes(&result, &nodes, "Rennes", date);
///
/// assert_eq!(routes.len(), 1);
/// assert_eq!(routes[0].stops, vec!["Rennes", "Vitré"]);
/// assert_eq!(routes[0].fill_volume, 12.5);
/// assert_eq!(routes[0].total_distance, 69.824);
/// ```
pub fn assemble_routes(
    result: &RouteResult,
    nodes: &[DeliveryNode],
    warehouse: &str,
    date: NaiveDate,
) -> Vec<Route> {
    result
        .vehicles()
        .iter()
        .filter(|v| !v.is_empty())
        .map(|vehicle| {
            let visited: Vec<&DeliveryNode> = vehicle.path.iter().map(|&i| &nodes[i]).collect();
            Route {
                warehouse: warehouse.to_string(),
                date,
                stops: visited.iter().map(|n| n.location.clone()).collect(),
                orders: visited
                    .iter()
                    .flat_map(|n| n.order_ids())
                    .map(str::to_string)
                    .collect(),
                n_units: visited.iter().map(|n| u64::from(n.units)).sum(),
                total_distance: vehicle.distance as f64 / DISTANCE_SCALE,
                fill_volume: visited.iter().map(|n| n.volume).sum(),
            }
        })
        .collect()
}
