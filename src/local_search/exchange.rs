//! Inter-route exchange operator (2-opt*).
//!
//! # Algorithm
//!
//! The 2-opt* operator swaps tail segments between two routes.
//! Given routes R1 = [a₁, ..., aᵢ, aᵢ₊₁, ..., aₙ] and
//! R2 = [b₁, ..., bⱼ, bⱼ₊₁, ..., bₘ], produce:
//!
//! R1' = [a₁, ..., aᵢ, bⱼ₊₁, ..., bₘ]
//! R2' = [b₁, ..., bⱼ, aᵢ₊₁, ..., aₙ]
//!
//! Cuts may fall before the first node or after the last one, so a whole
//! route can be appended to another.
//!
//! # Complexity
//!
//! O(n² × R²) per pass, where n = nodes per route, R = number of routes.
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational Research
//! Society* 46(12), 1433-1446.

use super::Neighborhood;
use crate::distance::ArcCost;

/// Applies the best improving tail exchange over all route pairs.
///
/// Returns `true` if a move was applied.
///
/// # Examples
///
/// ```
/// use smart_routage::distance::{CostMatrix, route_cost};
/// use smart_routage::local_search::{exchange_move, Neighborhood};
///
/// // Two crossing routes around a depot at 0
/// let cm = CostMatrix::from_data(5, vec![
///     0, 14, 14, 14, 14,
///     14, 0, 20, 28, 20,
///     14, 20, 0, 20, 28,
///     14, 28, 20, 0, 20,
///     14, 20, 28, 20, 0,
/// ]).unwrap();
/// let demands = [0, 5, 5, 5, 5];
/// let nb = Neighborhood::new(&cm, &demands, 10, 0);
///
/// let mut routes = vec![vec![1, 3], vec![2, 4]];
/// assert!(exchange_move(&mut routes, &nb));
/// let total: i64 = routes.iter().map(|r| route_cost(&cm, r, 0)).sum();
/// assert_eq!(total, 96);
/// ```
pub fn exchange_move<C: ArcCost + ?Sized>(routes: &mut [Vec<usize>], nb: &Neighborhood<'_, C>) -> bool {
    let mut best: Option<(usize, usize, usize, usize, i64)> = None;

    for r1 in 0..routes.len() {
        for r2 in (r1 + 1)..routes.len() {
            if let Some((cut1, cut2, delta)) = find_best_exchange(&routes[r1], &routes[r2], nb) {
                if best.is_none_or(|b| delta < b.4) {
                    best = Some((r1, r2, cut1, cut2, delta));
                }
            }
        }
    }

    let Some((r1, r2, cut1, cut2, _)) = best else {
        return false;
    };
    let tail1 = routes[r1].split_off(cut1);
    let tail2 = routes[r2].split_off(cut2);
    routes[r1].extend(tail2);
    routes[r2].extend(tail1);
    true
}

/// Finds the best tail exchange between two routes.
/// Returns (cut_pos_r1, cut_pos_r2, delta) if an improvement exists.
fn find_best_exchange<C: ArcCost + ?Sized>(
    route1: &[usize],
    route2: &[usize],
    nb: &Neighborhood<'_, C>,
) -> Option<(usize, usize, i64)> {
    let n1 = route1.len();
    let n2 = route2.len();
    if n1 == 0 && n2 == 0 {
        return None;
    }

    // prefix[k] = load of the first k nodes
    let prefix1 = prefix_loads(route1, nb);
    let prefix2 = prefix_loads(route2, nb);
    let total1 = prefix1[n1];
    let total2 = prefix2[n2];

    let mut best: Option<(usize, usize, i64)> = None;

    for cut1 in 0..=n1 {
        for cut2 in 0..=n2 {
            // R1' = route1[..cut1] + route2[cut2..]
            // R2' = route2[..cut2] + route1[cut1..]
            let new_load1 = prefix1[cut1] + (total2 - prefix2[cut2]);
            let new_load2 = prefix2[cut2] + (total1 - prefix1[cut1]);
            if new_load1 > nb.capacity || new_load2 > nb.capacity {
                continue;
            }

            let prev1 = nb.prev(route1, cut1);
            let next1 = nb.at(route1, cut1);
            let prev2 = nb.prev(route2, cut2);
            let next2 = nb.at(route2, cut2);

            let old_edges = nb.cost.arc(prev1, next1) + nb.cost.arc(prev2, next2);
            let new_edges = nb.cost.arc(prev1, next2) + nb.cost.arc(prev2, next1);
            let delta = new_edges - old_edges;

            if delta < 0 && best.is_none_or(|b| delta < b.2) {
                best = Some((cut1, cut2, delta));
            }
        }
    }

    best
}

fn prefix_loads<C: ArcCost + ?Sized>(route: &[usize], nb: &Neighborhood<'_, C>) -> Vec<i64> {
    let mut prefix = Vec::with_capacity(route.len() + 1);
    prefix.push(0);
    for &node in route {
        let last = prefix[prefix.len() - 1];
        prefix.push(last + nb.demands[node]);
    }
    prefix
}
