//! Path-cheapest-arc constructive heuristic.
//!
//! Builds routes greedily: starting from the depot, always extend the path
//! with the unassigned node reachable by the cheapest arc that still fits in
//! the vehicle. When nothing fits, close the route and start the next
//! vehicle.
//!
//! # Complexity
//!
//! O(n²) where n = number of nodes.

use super::check_demands;
use crate::error::SolveError;
use crate::models::CvrpInstance;

/// Constructs an initial solution with the path-cheapest-arc rule.
///
/// Returns one node sequence per used vehicle (depot excluded), or
/// [`SolveError`] if some node cannot be placed.
///
/// # Examples
///
/// ```
/// use smart_routage::distance::CostMatrix;
/// use smart_routage::models::CvrpInstance;
/// use smart_routage::constructive::path_cheapest_arc;
///
/// // Depot and three nodes on a line, one unit apart.
/// let costs = CostMatrix::from_data(4, vec![
///     0, 1, 2, 3,
///     1, 0, 1, 2,
///     2, 1, 0, 1,
///     3, 2, 1, 0,
/// ]).unwrap();
/// let inst = CvrpInstance::new(costs, vec![0, 10, 10, 10], 30, 5).unwrap();
///
/// let routes = path_cheapest_arc(&inst).unwrap();
/// assert_eq!(routes, vec![vec![1, 2, 3]]);
/// ```
pub fn path_cheapest_arc(instance: &CvrpInstance) -> Result<Vec<Vec<usize>>, SolveError> {
    check_demands(instance)?;

    let n = instance.num_nodes();
    let depot = instance.depot();
    let costs = instance.costs();

    let mut assigned = vec![false; n];
    assigned[depot] = true;
    let mut remaining = n - 1;
    let mut routes = Vec::new();

    while remaining > 0 {
        if routes.len() >= instance.max_vehicles() {
            return Err(SolveError::FleetExhausted {
                unassigned: remaining,
                vehicles: routes.len(),
            });
        }

        let mut current = depot;
        let mut route = Vec::new();
        let mut load = 0;

        loop {
            // Cheapest arc from the path end to an unassigned node that fits
            let mut best: Option<(usize, i64)> = None;
            for i in 0..n {
                if assigned[i] || load + instance.demand(i) > instance.capacity() {
                    continue;
                }
                let c = costs.get(current, i);
                if best.is_none_or(|(_, b)| c < b) {
                    best = Some((i, c));
                }
            }

            match best {
                Some((next, _)) => {
                    assigned[next] = true;
                    remaining -= 1;
                    load += instance.demand(next);
                    route.push(next);
                    current = next;
                }
                None => break,
            }
        }

        routes.push(route);
    }

    Ok(routes)
}
