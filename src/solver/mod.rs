//! CVRP solving.
//!
//! - [`CvrpSolver`] — the solve contract: instance + termination in, vehicle
//!   routes or a [`SolveError`] out
//! - [`GuidedLocalSearch`] — construction heuristic followed by guided local
//!   search until the termination fires
//! - [`Termination`] — wall-clock budget, optional iteration cap, and an
//!   external cancellation flag

mod gls;
mod termination;

pub use gls::GuidedLocalSearch;
pub use termination::Termination;

use crate::error::SolveError;
use crate::models::{CvrpInstance, RouteResult};

/// Solves one CVRP instance.
///
/// Implementations must return a result where every non-depot node is
/// visited exactly once and no route exceeds capacity, or an error.
pub trait CvrpSolver: Send + Sync {
    /// Solves `instance`, stopping when `termination` fires.
    fn solve(
        &self,
        instance: &CvrpInstance,
        termination: &Termination,
    ) -> Result<RouteResult, SolveError>;
}
