//! Local search operators for improving CVRP solutions.
//!
//! - [`two_opt_move`] — Intra-route 2-opt edge reversal
//! - [`or_opt_move`] — Intra-route segment relocation
//! - [`relocate_move`] — Inter-route node relocation
//! - [`swap_move`] — Inter-route node exchange
//! - [`exchange_move`] — Inter-route tail exchange (2-opt*)
//!
//! Every operator works on plain node sequences (depot excluded), evaluates
//! moves under an [`ArcCost`], only accepts strictly improving moves, and
//! never breaks vehicle capacity.

mod exchange;
mod or_opt;
mod relocate;
mod swap;
mod two_opt;

pub use exchange::exchange_move;
pub use or_opt::{or_opt_improve, or_opt_move};
pub use relocate::relocate_move;
pub use swap::swap_move;
pub use two_opt::{two_opt_improve, two_opt_move};

use crate::distance::ArcCost;

/// The data a move needs: arc costs, node demands, and vehicle capacity.
pub struct Neighborhood<'a, C: ArcCost + ?Sized> {
    pub cost: &'a C,
    pub demands: &'a [i64],
    pub capacity: i64,
    pub depot: usize,
}

impl<'a, C: ArcCost + ?Sized> Neighborhood<'a, C> {
    /// Creates a neighborhood over the given cost and demands.
    pub fn new(cost: &'a C, demands: &'a [i64], capacity: i64, depot: usize) -> Self {
        Self {
            cost,
            demands,
            capacity,
            depot,
        }
    }

    /// Total demand of a route.
    pub fn load(&self, route: &[usize]) -> i64 {
        route.iter().map(|&n| self.demands[n]).sum()
    }

    /// Node before position `pos`, or the depot.
    fn prev(&self, route: &[usize], pos: usize) -> usize {
        if pos == 0 {
            self.depot
        } else {
            route[pos - 1]
        }
    }

    /// Node at position `pos`, or the depot past the end.
    fn at(&self, route: &[usize], pos: usize) -> usize {
        route.get(pos).copied().unwrap_or(self.depot)
    }
}

/// Applies improving moves until none is left or `should_stop` returns true.
///
/// Returns the number of moves applied.
///
/// # Examples
///
/// ```
/// use smart_routage::distance::{CostMatrix, route_cost};
/// use smart_routage::local_search::{descend, Neighborhood};
///
/// // Depot and three nodes on a line; start from a poor order.
/// let cm = CostMatrix::from_data(4, vec![
///     0, 1, 2, 3,
///     1, 0, 1, 2,
///     2, 1, 0, 1,
///     3, 2, 1, 0,
/// ]).unwrap();
/// let demands = [0, 1, 1, 1];
/// let nb = Neighborhood::new(&cm, &demands, 10, 0);
///
/// let mut routes = vec![vec![2], vec![1, 3]];
/// descend(&mut routes, &nb, &|| false);
/// let total: i64 = routes.iter().map(|r| route_cost(&cm, r, 0)).sum();
/// assert_eq!(total, 6);
/// ```
pub fn descend<C: ArcCost + ?Sized>(
    routes: &mut [Vec<usize>],
    nb: &Neighborhood<'_, C>,
    should_stop: &dyn Fn() -> bool,
) -> usize {
    let mut moves = 0;
    loop {
        if should_stop() {
            break;
        }
        let improved = relocate_move(routes, nb)
            || exchange_move(routes, nb)
            || swap_move(routes, nb)
            || two_opt_move(routes, nb)
            || or_opt_move(routes, nb);
        if !improved {
            break;
        }
        moves += 1;
    }
    moves
}
