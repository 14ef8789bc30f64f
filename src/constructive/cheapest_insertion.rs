//! Cheapest-insertion constructive heuristic.
//!
//! Grows one route at a time: repeatedly insert the unassigned node and
//! position pair that adds the least cost while respecting the remaining
//! capacity. When no node fits, the route is closed and the next vehicle
//! starts empty.
//!
//! # Complexity
//!
//! O(n³) where n = number of nodes.

use super::check_demands;
use crate::error::SolveError;
use crate::models::CvrpInstance;

/// Constructs an initial solution by cheapest insertion.
///
/// # Examples
///
/// ```
/// use smart_routage::distance::CostMatrix;
/// use smart_routage::models::CvrpInstance;
/// use smart_routage::constructive::cheapest_insertion;
///
/// let costs = CostMatrix::from_data(3, vec![0, 4, 5, 4, 0, 2, 5, 2, 0]).unwrap();
/// let inst = CvrpInstance::new(costs, vec![0, 1, 1], 10, 2).unwrap();
///
/// let routes = cheapest_insertion(&inst).unwrap();
/// assert_eq!(routes.len(), 1);
/// assert_eq!(routes[0].len(), 2);
/// ```
pub fn cheapest_insertion(instance: &CvrpInstance) -> Result<Vec<Vec<usize>>, SolveError> {
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

        let mut route: Vec<usize> = Vec::new();
        let mut load = 0;

        loop {
            // (node, position, added cost)
            let mut best: Option<(usize, usize, i64)> = None;
            for node in 0..n {
                if assigned[node] || load + instance.demand(node) > instance.capacity() {
                    continue;
                }
                for pos in 0..=route.len() {
                    let prev = if pos == 0 { depot } else { route[pos - 1] };
                    let next = if pos == route.len() { depot } else { route[pos] };
                    let added = costs.get(prev, node) + costs.get(node, next) - costs.get(prev, next);
                    if best.is_none_or(|(_, _, b)| added < b) {
                        best = Some((node, pos, added));
                    }
                }
            }

            match best {
                Some((node, pos, _)) => {
                    assigned[node] = true;
                    remaining -= 1;
                    load += instance.demand(node);
                    route.insert(pos, node);
                }
                None => break,
            }
        }

        routes.push(route);
    }

    Ok(routes)
}
