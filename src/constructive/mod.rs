//! Constructive heuristics for building initial CVRP solutions.
//!
//! - [`path_cheapest_arc`] — Extend each path by its cheapest feasible arc, O(n²)
//! - [`cheapest_insertion`] — Least-cost feasible insertion, O(n³)

mod cheapest_insertion;
mod path_cheapest_arc;

pub use cheapest_insertion::cheapest_insertion;
pub use path_cheapest_arc::path_cheapest_arc;

use crate::config::FirstSolution;
use crate::error::SolveError;
use crate::models::CvrpInstance;

/// Runs the configured first-solution heuristic.
pub fn construct(
    instance: &CvrpInstance,
    strategy: FirstSolution,
) -> Result<Vec<Vec<usize>>, SolveError> {
    match strategy {
        FirstSolution::PathCheapestArc => path_cheapest_arc(instance),
        FirstSolution::CheapestInsertion => cheapest_insertion(instance),
    }
}

/// Fails if any single node needs more than a whole vehicle.
fn check_demands(instance: &CvrpInstance) -> Result<(), SolveError> {
    match instance
        .demands()
        .iter()
        .position(|&d| d > instance.capacity())
    {
        Some(node) => Err(SolveError::DemandExceedsCapacity {
            node,
            demand: instance.demand(node),
            capacity: instance.capacity(),
        }),
        None => Ok(()),
    }
}
