//! Inter-route node swap operator.
//!
//! Exchanges one node of a route with one node of another route, keeping
//! both positions. Complements relocation when both routes are full.

use super::Neighborhood;
use crate::distance::ArcCost;

/// Applies the best improving node swap between two routes.
///
/// Returns `true` if a move was applied.
///
/// # Examples
///
/// ```
/// use smart_routage::distance::CostMatrix;
/// use smart_routage::local_search::{swap_move, Neighborhood};
///
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
/// assert!(swap_move(&mut routes, &nb));
/// ```
pub fn swap_move<C: ArcCost + ?Sized>(routes: &mut [Vec<usize>], nb: &Neighborhood<'_, C>) -> bool {
    let loads: Vec<i64> = routes.iter().map(|r| nb.load(r)).collect();
    // (route a, pos a, route b, pos b, delta)
    let mut best: Option<(usize, usize, usize, usize, i64)> = None;

    for ra in 0..routes.len() {
        for rb in (ra + 1)..routes.len() {
            for pa in 0..routes[ra].len() {
                for pb in 0..routes[rb].len() {
                    let a = routes[ra][pa];
                    let b = routes[rb][pb];
                    let da = nb.demands[a];
                    let db = nb.demands[b];
                    if loads[ra] - da + db > nb.capacity || loads[rb] - db + da > nb.capacity {
                        continue;
                    }
                    let delta = replace_cost(&routes[ra], pa, b, nb) + replace_cost(&routes[rb], pb, a, nb);
                    if delta < 0 && best.is_none_or(|m| delta < m.4) {
                        best = Some((ra, pa, rb, pb, delta));
                    }
                }
            }
        }
    }

    let Some((ra, pa, rb, pb, _)) = best else {
        return false;
    };
    let a = routes[ra][pa];
    routes[ra][pa] = routes[rb][pb];
    routes[rb][pb] = a;
    true
}

/// Cost change of putting `node` in place of `route[pos]`.
fn replace_cost<C: ArcCost + ?Sized>(
    route: &[usize],
    pos: usize,
    node: usize,
    nb: &Neighborhood<'_, C>,
) -> i64 {
    let prev = nb.prev(route, pos);
    let next = nb.at(route, pos + 1);
    let old = route[pos];
    nb.cost.arc(prev, node) + nb.cost.arc(node, next) - nb.cost.arc(prev, old) - nb.cost.arc(old, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{route_cost, CostMatrix};

    fn square() -> CostMatrix {
        CostMatrix::from_data(
            5,
            vec![
                0, 14, 14, 14, 14, //
                14, 0, 20, 28, 20, //
                14, 20, 0, 20, 28, //
                14, 28, 20, 0, 20, //
                14, 20, 28, 20, 0,
            ],
        )
        .expect("valid")
    }

    #[test]
    fn test_swap_uncrosses_full_routes() {
        let cm = square();
        let demands = [0, 5, 5, 5, 5];
        let nb = Neighborhood::new(&cm, &demands, 10, 0);
        let mut routes = vec![vec![1, 3], vec![2, 4]];
        assert!(swap_move(&mut routes, &nb));
        let total: i64 = routes.iter().map(|r| route_cost(&cm, r, 0)).sum();
        assert_eq!(total, 96);
    }

    #[test]
    fn test_swap_capacity_blocks() {
        let cm = square();
        let demands = [0, 2, 8, 5, 5];
        let nb = Neighborhood::new(&cm, &demands, 10, 0);
        // Swapping 1 with 2 would load the first route to 13
        let mut routes = vec![vec![1, 3], vec![2]];
        let before = routes.clone();
        let moved = swap_move(&mut routes, &nb);
        for r in &routes {
            assert!(nb.load(r) <= 10);
        }
        if !moved {
            assert_eq!(routes, before);
        }
    }

    #[test]
    fn test_replace_cost() {
        let cm = square();
        let demands = [0, 5, 5, 5, 5];
        let nb = Neighborhood::new(&cm, &demands, 10, 0);
        // [1, 3] → [1, 2]: 14 + 20 + 14 - (14 + 28 + 14)
        assert_eq!(replace_cost(&[1, 3], 1, 2, &nb), -8);
    }
}
