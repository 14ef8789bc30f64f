//! Inter-route node relocation operator.
//!
//! # Algorithm
//!
//! Tries moving each node from its current route to the best insertion
//! position in another route. Applies the best move that reduces total cost
//! and keeps the receiving route within capacity.
//!
//! # Complexity
//!
//! O(n² × R) per pass where n = nodes per route, R = number of routes.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::Neighborhood;
use crate::distance::ArcCost;

/// A relocate move: move node from one route to another.
#[derive(Debug, Clone)]
struct RelocateMove {
    from_route: usize,
    from_pos: usize,
    to_route: usize,
    to_pos: usize,
    delta: i64,
}

/// Applies the best improving inter-route relocation, if any.
///
/// Returns `true` if a move was applied. An empty route in `routes` acts as
/// an available vehicle.
///
/// # Examples
///
/// ```
/// use smart_routage::distance::CostMatrix;
/// use smart_routage::local_search::{relocate_move, Neighborhood};
///
/// let cm = CostMatrix::from_data(3, vec![0, 5, 5, 5, 0, 1, 5, 1, 0]).unwrap();
/// let demands = [0, 1, 1];
/// let nb = Neighborhood::new(&cm, &demands, 10, 0);
///
/// let mut routes = vec![vec![1], vec![2]];
/// assert!(relocate_move(&mut routes, &nb));
/// assert!(routes.iter().any(|r| r.len() == 2));
/// ```
pub fn relocate_move<C: ArcCost + ?Sized>(routes: &mut [Vec<usize>], nb: &Neighborhood<'_, C>) -> bool {
    if routes.len() < 2 {
        return false;
    }
    match find_best_relocate(routes, nb) {
        Some(mv) => {
            let node = routes[mv.from_route].remove(mv.from_pos);
            routes[mv.to_route].insert(mv.to_pos, node);
            true
        }
        None => false,
    }
}

/// Finds the best single relocate move across all route pairs.
fn find_best_relocate<C: ArcCost + ?Sized>(
    routes: &[Vec<usize>],
    nb: &Neighborhood<'_, C>,
) -> Option<RelocateMove> {
    let loads: Vec<i64> = routes.iter().map(|r| nb.load(r)).collect();
    let mut best: Option<RelocateMove> = None;

    for (from_r, from_route) in routes.iter().enumerate() {
        for from_pos in 0..from_route.len() {
            let node = from_route[from_pos];
            let removal_delta = removal_cost(from_route, from_pos, nb);
            let mut tried_empty = false;

            for (to_r, to_route) in routes.iter().enumerate() {
                if to_r == from_r {
                    continue;
                }
                // All empty routes are interchangeable
                if to_route.is_empty() {
                    if tried_empty || from_route.len() == 1 {
                        continue;
                    }
                    tried_empty = true;
                }
                if loads[to_r] + nb.demands[node] > nb.capacity {
                    continue;
                }

                for to_pos in 0..=to_route.len() {
                    let delta = removal_delta + insertion_cost(to_route, to_pos, node, nb);
                    if delta < 0 && best.as_ref().is_none_or(|b| delta < b.delta) {
                        best = Some(RelocateMove {
                            from_route: from_r,
                            from_pos,
                            to_route: to_r,
                            to_pos,
                            delta,
                        });
                    }
                }
            }
        }
    }

    best
}

/// Cost of removing the node at `pos` from route.
fn removal_cost<C: ArcCost + ?Sized>(route: &[usize], pos: usize, nb: &Neighborhood<'_, C>) -> i64 {
    let prev = nb.prev(route, pos);
    let next = nb.at(route, pos + 1);
    let node = route[pos];

    // Old: prev → node → next
    // New: prev → next
    nb.cost.arc(prev, next) - nb.cost.arc(prev, node) - nb.cost.arc(node, next)
}

/// Cost of inserting `node` at `pos` in route.
fn insertion_cost<C: ArcCost + ?Sized>(
    route: &[usize],
    pos: usize,
    node: usize,
    nb: &Neighborhood<'_, C>,
) -> i64 {
    let prev = nb.prev(route, pos);
    let next = nb.at(route, pos);

    // Old: prev → next
    // New: prev → node → next
    nb.cost.arc(prev, node) + nb.cost.arc(node, next) - nb.cost.arc(prev, next)
}
