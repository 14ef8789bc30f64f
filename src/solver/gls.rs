//! Guided local search for the CVRP.
//!
//! # Algorithm
//!
//! 1. Build a first solution with the configured constructive heuristic.
//! 2. Descend to a local optimum with the local search operators.
//! 3. Repeat until termination: penalize the arcs of the current local
//!    optimum with the highest utility `c(i,j) / (1 + p(i,j))`, then descend
//!    again under the augmented cost `c(i,j) + λ·p(i,j)`. Keep the best
//!    solution by true cost.
//!
//! Every move preserves capacity and coverage, so every visited solution is
//! feasible.
//!
//! # Reference
//!
//! Voudouris, C. & Tsang, E. (1999). "Guided local search and its application
//! to the traveling salesman problem", *European Journal of Operational
//! Research* 113(2), 469-499.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use super::{CvrpSolver, Termination};
use crate::config::SolverConfig;
use crate::constructive::construct;
use crate::distance::{route_cost, ArcCost, CostMatrix};
use crate::error::SolveError;
use crate::evaluation::RouteEvaluator;
use crate::local_search::{descend, Neighborhood};
use crate::models::{CvrpInstance, RouteResult};

/// Construction + guided local search solver.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use smart_routage::config::SolverConfig;
/// use smart_routage::distance::CostMatrix;
/// use smart_routage::models::CvrpInstance;
/// use smart_routage::solver::{CvrpSolver, GuidedLocalSearch, Termination};
///
/// let costs = CostMatrix::from_data(4, vec![
///     0, 1, 2, 3,
///     1, 0, 1, 2,
///     2, 1, 0, 1,
///     3, 2, 1, 0,
/// ]).unwrap();
/// let inst = CvrpInstance::new(costs, vec![0, 10, 10, 10], 20, 5).unwrap();
///
/// let solver = GuidedLocalSearch::new(SolverConfig::default());
/// let term = Termination::after(Duration::from_millis(50));
/// let result = solver.solve(&inst, &term).unwrap();
/// assert_eq!(result.num_vehicles(), 5);
/// assert_eq!(result.num_served(), 3);
/// assert!(result.vehicles().iter().all(|v| v.load <= 20));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GuidedLocalSearch {
    config: SolverConfig,
}

impl GuidedLocalSearch {
    /// Creates a solver with the given configuration.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl CvrpSolver for GuidedLocalSearch {
    fn solve(
        &self,
        instance: &CvrpInstance,
        termination: &Termination,
    ) -> Result<RouteResult, SolveError> {
        let evaluator = RouteEvaluator::new(instance);
        let mut routes = construct(instance, self.config.first_solution)?;

        // Nothing to improve with at most one node
        if instance.num_nodes() <= 2 {
            return Ok(evaluator.build_result(&routes));
        }

        let depot = instance.depot();
        let costs = instance.costs();
        let stop = || termination.is_expired();
        let plain = Neighborhood::new(costs, instance.demands(), instance.capacity(), depot);

        normalize(&mut routes, instance.max_vehicles());
        descend(&mut routes, &plain, &stop);

        let mut best = routes.clone();
        let mut best_cost = total_cost(costs, &best, depot);
        let first_optimum = best_cost;

        let arcs: usize = routes
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| r.len() + 1)
            .sum();
        let lambda = if arcs == 0 || self.config.lambda_coefficient <= 0.0 {
            0
        } else {
            let raw = self.config.lambda_coefficient * best_cost as f64 / arcs as f64;
            (raw.round() as i64).max(1)
        };

        let mut penalties = Penalties::new(instance.num_nodes());
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut iterations = 0;

        while !termination.is_expired() && !termination.iterations_exhausted(iterations) {
            iterations += 1;
            penalties.penalize(&routes, costs, depot);

            let augmented = PenalizedCost {
                base: costs,
                penalties: &penalties,
                lambda,
            };
            let guided = Neighborhood::new(&augmented, instance.demands(), instance.capacity(), depot);

            routes.shuffle(&mut rng);
            normalize(&mut routes, instance.max_vehicles());
            descend(&mut routes, &guided, &stop);

            let cost = total_cost(costs, &routes, depot);
            if cost < best_cost {
                debug!(iterations, cost, previous = best_cost, "new best solution");
                best_cost = cost;
                best.clone_from(&routes);
            }
        }

        debug!(
            nodes = instance.num_nodes(),
            iterations,
            lambda,
            first_optimum,
            best_cost,
            "guided local search finished"
        );

        let result = evaluator.build_result(&best);
        debug_assert!(evaluator.evaluate_result(&result).1.is_empty());
        Ok(result)
    }
}

/// Drops empty routes and keeps one spare empty route while vehicles remain.
fn normalize(routes: &mut Vec<Vec<usize>>, max_vehicles: usize) {
    routes.retain(|r| !r.is_empty());
    if routes.len() < max_vehicles {
        routes.push(Vec::new());
    }
}

fn total_cost(costs: &CostMatrix, routes: &[Vec<usize>], depot: usize) -> i64 {
    routes.iter().map(|r| route_cost(costs, r, depot)).sum()
}

/// Arc penalty counts, symmetric.
struct Penalties {
    counts: Vec<u32>,
    size: usize,
}

impl Penalties {
    fn new(size: usize) -> Self {
        Self {
            counts: vec![0; size * size],
            size,
        }
    }

    fn index(&self, a: usize, b: usize) -> usize {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        lo * self.size + hi
    }

    fn get(&self, a: usize, b: usize) -> u32 {
        self.counts[self.index(a, b)]
    }

    /// Increments the penalty of every arc of `routes` with maximal utility.
    fn penalize(&mut self, routes: &[Vec<usize>], costs: &CostMatrix, depot: usize) {
        let mut arcs = Vec::new();
        for route in routes.iter().filter(|r| !r.is_empty()) {
            let mut prev = depot;
            for &node in route {
                arcs.push((prev, node));
                prev = node;
            }
            arcs.push((prev, depot));
        }

        let utility = |&(a, b): &(usize, usize)| costs.get(a, b) as f64 / (1.0 + self.get(a, b) as f64);
        let max_utility = arcs.iter().map(utility).fold(f64::NEG_INFINITY, f64::max);
        if max_utility <= 0.0 {
            return;
        }

        let chosen: Vec<(usize, usize)> = arcs
            .iter()
            .filter(|arc| utility(*arc) >= max_utility - 1e-9)
            .copied()
            .collect();
        for (a, b) in chosen {
            let idx = self.index(a, b);
            self.counts[idx] += 1;
        }
    }
}

/// Arc cost augmented with `λ · penalty`.
struct PenalizedCost<'a> {
    base: &'a CostMatrix,
    penalties: &'a Penalties,
    lambda: i64,
}

impl ArcCost for PenalizedCost<'_> {
    fn arc(&self, from: usize, to: usize) -> i64 {
        self.base.get(from, to) + self.lambda * self.penalties.get(from, to) as i64
    }
}
