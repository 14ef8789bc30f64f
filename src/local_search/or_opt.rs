//! Intra-route Or-opt improvement.
//!
//! # Algorithm
//!
//! Moves a segment of 1, 2 or 3 consecutive nodes to another position in the
//! same route, keeping its orientation. The best improving relocation for
//! each segment length is applied until none remains.
//!
//! # Complexity
//!
//! O(n²) per pass.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use super::Neighborhood;
use crate::distance::{route_cost, ArcCost};

/// Applies Or-opt improvement to a single route.
///
/// Returns the improved sequence and its closed-tour cost.
///
/// # Examples
///
/// ```
/// use smart_routage::distance::{CostMatrix, route_cost};
/// use smart_routage::local_search::or_opt_improve;
///
/// let cm = CostMatrix::from_data(4, vec![
///     0, 1, 2, 3,
///     1, 0, 1, 2,
///     2, 1, 0, 1,
///     3, 2, 1, 0,
/// ]).unwrap();
///
/// let (improved, cost) = or_opt_improve(&[2, 3, 1], 0, &cm);
/// assert!(cost <= route_cost(&cm, &[2, 3, 1], 0));
/// assert_eq!(cost, 6);
/// assert_eq!(improved.len(), 3);
/// ```
pub fn or_opt_improve<C: ArcCost + ?Sized>(route: &[usize], depot: usize, cost: &C) -> (Vec<usize>, i64) {
    let mut current = route.to_vec();
    let mut improved = current.len() >= 2;

    while improved {
        improved = false;
        for seg_len in 1..=3.min(current.len() - 1) {
            if try_or_opt_pass(&mut current, depot, cost, seg_len) {
                improved = true;
            }
        }
    }

    let c = route_cost(cost, &current, depot);
    (current, c)
}

/// Applies Or-opt to every route. Returns `true` if any route changed.
pub fn or_opt_move<C: ArcCost + ?Sized>(routes: &mut [Vec<usize>], nb: &Neighborhood<'_, C>) -> bool {
    let mut changed = false;
    for route in routes.iter_mut() {
        if route.len() < 2 {
            continue;
        }
        let (improved, _) = or_opt_improve(route, nb.depot, nb.cost);
        if improved != *route {
            *route = improved;
            changed = true;
        }
    }
    changed
}

/// One pass of Or-opt for a given segment length. Returns true if improved.
fn try_or_opt_pass<C: ArcCost + ?Sized>(route: &mut Vec<usize>, depot: usize, cost: &C, seg_len: usize) -> bool {
    let n = route.len();
    if n < seg_len + 1 {
        return false;
    }

    let at = |r: &[usize], i: usize| r.get(i).copied().unwrap_or(depot);

    // (from, insert position in the route without the segment, delta)
    let mut best: Option<(usize, usize, i64)> = None;

    for from in 0..=(n - seg_len) {
        let prev = if from == 0 { depot } else { route[from - 1] };
        let after = at(route, from + seg_len);
        let first = route[from];
        let last = route[from + seg_len - 1];

        // Old edges: prev→first + last→after, replaced by prev→after
        let removal_gain = cost.arc(prev, first) + cost.arc(last, after) - cost.arc(prev, after);

        let rest: Vec<usize> = route[..from]
            .iter()
            .chain(route[from + seg_len..].iter())
            .copied()
            .collect();

        for to in 0..=rest.len() {
            if to == from {
                continue;
            }
            let ins_prev = if to == 0 { depot } else { rest[to - 1] };
            let ins_next = at(&rest, to);
            let insertion = cost.arc(ins_prev, first) + cost.arc(last, ins_next) - cost.arc(ins_prev, ins_next);
            let delta = insertion - removal_gain;

            if delta < 0 && best.is_none_or(|b| delta < b.2) {
                best = Some((from, to, delta));
            }
        }
    }

    let Some((from, to, _)) = best else {
        return false;
    };
    let segment: Vec<usize> = route.drain(from..from + seg_len).collect();
    for (i, node) in segment.into_iter().enumerate() {
        route.insert(to + i, node);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::CostMatrix;

    fn line() -> CostMatrix {
        CostMatrix::from_data(
            4,
            vec![
                0, 1, 2, 3, //
                1, 0, 1, 2, //
                2, 1, 0, 1, //
                3, 2, 1, 0,
            ],
        )
        .expect("valid")
    }

    #[test]
    fn test_or_opt_already_optimal() {
        let (improved, c) = or_opt_improve(&[1, 2, 3], 0, &line());
        assert_eq!(improved, vec![1, 2, 3]);
        assert_eq!(c, 6);
    }

    #[test]
    fn test_or_opt_empty() {
        let (improved, c) = or_opt_improve(&[], 0, &line());
        assert!(improved.is_empty());
        assert_eq!(c, 0);
    }

    #[test]
    fn test_or_opt_single() {
        let (improved, c) = or_opt_improve(&[2], 0, &line());
        assert_eq!(improved, vec![2]);
        assert_eq!(c, 4);
    }

    #[test]
    fn test_or_opt_moves_segment() {
        // [2, 3, 1]: 2 + 1 + 2 + 1 = 6 already; [3, 1, 2]: 3 + 2 + 1 + 2 = 8
        let (improved, c) = or_opt_improve(&[3, 1, 2], 0, &line());
        assert_eq!(c, 6);
        let mut sorted = improved.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3]);
    }

    #[test]
    fn test_or_opt_keeps_nodes() {
        let cm = CostMatrix::from_data(
            5,
            vec![
                0, 14, 14, 14, 14, //
                14, 0, 20, 28, 20, //
                14, 20, 0, 20, 28, //
                14, 28, 20, 0, 20, //
                14, 20, 28, 20, 0,
            ],
        )
        .expect("valid");
        let initial = [1, 3, 2, 4];
        let before = route_cost(&cm, &initial, 0);
        let (improved, after) = or_opt_improve(&initial, 0, &cm);
        assert!(after < before);
        let mut sorted = improved.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4]);
    }
}
