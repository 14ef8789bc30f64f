//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For each pair of positions (i, j) in a route, compute the change in cost
//! from reversing the segment between them:
//!
//! ```text
//! delta = c(prev_i, r[j]) + c(r[i], next_j) - c(prev_i, r[i]) - c(r[j], next_j)
//! ```
//!
//! If delta < 0, reverse the segment [i..=j] and accept the improvement.
//! Repeat until no further improvements are found (first-improvement strategy).
//! Costs are assumed symmetric, so the reversed interior keeps its cost.
//!
//! # Complexity
//!
//! O(n²) per pass, O(n³) worst case for convergence.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use super::Neighborhood;
use crate::distance::{route_cost, ArcCost};

/// Applies 2-opt improvement to a single route (given as a sequence of node IDs).
///
/// The route is assumed to start and end at `depot`. Returns the improved
/// sequence and its closed-tour cost.
///
/// # Examples
///
/// ```
/// use smart_routage::distance::CostMatrix;
/// use smart_routage::local_search::two_opt_improve;
///
/// // Depot at (0,0), nodes at (1,1), (2,0), (1,-1), costs ×10
/// let cm = CostMatrix::from_data(4, vec![
///     0, 14, 20, 14,
///     14, 0, 14, 20,
///     20, 14, 0, 14,
///     14, 20, 14, 0,
/// ]).unwrap();
///
/// let (improved, cost) = two_opt_improve(&[1, 3, 2], 0, &cm);
/// assert_eq!(cost, 56);
/// assert!(improved == vec![1, 2, 3] || improved == vec![3, 2, 1]);
/// ```
pub fn two_opt_improve<C: ArcCost + ?Sized>(route: &[usize], depot: usize, cost: &C) -> (Vec<usize>, i64) {
    let mut current = route.to_vec();
    if current.len() < 2 {
        let c = route_cost(cost, &current, depot);
        return (current, c);
    }

    let mut improved = true;
    while improved {
        improved = false;
        let n = current.len();

        for i in 0..n - 1 {
            for j in i + 1..n {
                if two_opt_delta(&current, depot, cost, i, j) < 0 {
                    current[i..=j].reverse();
                    improved = true;
                }
            }
        }
    }

    let c = route_cost(cost, &current, depot);
    (current, c)
}

/// Applies 2-opt to every route. Returns `true` if any route changed.
pub fn two_opt_move<C: ArcCost + ?Sized>(routes: &mut [Vec<usize>], nb: &Neighborhood<'_, C>) -> bool {
    let mut changed = false;
    for route in routes.iter_mut() {
        if route.len() < 2 {
            continue;
        }
        let (improved, _) = two_opt_improve(route, nb.depot, nb.cost);
        if improved != *route {
            *route = improved;
            changed = true;
        }
    }
    changed
}

/// Computes the cost change from reversing positions `i..=j`.
///
/// Before: ...-prev_i - route[i] - ... - route[j] - next_j-...
/// After:  ...-prev_i - route[j] - ... - route[i] - next_j-...
fn two_opt_delta<C: ArcCost + ?Sized>(route: &[usize], depot: usize, cost: &C, i: usize, j: usize) -> i64 {
    let n = route.len();
    let prev_i = if i == 0 { depot } else { route[i - 1] };
    let next_j = if j == n - 1 { depot } else { route[j + 1] };

    let old_cost = cost.arc(prev_i, route[i]) + cost.arc(route[j], next_j);
    let new_cost = cost.arc(prev_i, route[j]) + cost.arc(route[i], next_j);

    new_cost - old_cost
}
