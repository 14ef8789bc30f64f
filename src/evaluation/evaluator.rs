//! Route evaluator that computes distance, load, and feasibility.

use crate::models::{CvrpInstance, RouteResult, VehicleRoute, Violation, ViolationType};

/// Evaluates routes against a CVRP instance: closed-tour distance,
/// cumulative load, capacity and coverage checks.
///
/// # Examples
///
/// ```
/// use smart_routage::distance::CostMatrix;
/// use smart_routage::evaluation::RouteEvaluator;
/// use smart_routage::models::CvrpInstance;
///
/// let costs = CostMatrix::from_data(3, vec![0, 5, 8, 5, 0, 4, 8, 4, 0]).unwrap();
/// let inst = CvrpInstance::new(costs, vec![0, 10, 20], 50, 2).unwrap();
///
/// let evaluator = RouteEvaluator::new(&inst);
/// let (route, violations) = evaluator.build_route(&[1, 2]);
/// assert_eq!(route.path, vec![0, 1, 2]);
/// assert_eq!(route.distance, 17);
/// assert_eq!(route.load, 30);
/// assert!(violations.is_empty());
/// ```
pub struct RouteEvaluator<'a> {
    instance: &'a CvrpInstance,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator for the given instance.
    pub fn new(instance: &'a CvrpInstance) -> Self {
        Self { instance }
    }

    /// Builds a vehicle route from a sequence of node ids (depot excluded).
    ///
    /// Returns the route and any capacity violation found.
    pub fn build_route(&self, stops: &[usize]) -> (VehicleRoute, Vec<Violation>) {
        let depot = self.instance.depot();
        let costs = self.instance.costs();
        let mut violations = Vec::new();

        let mut path = Vec::with_capacity(stops.len() + 1);
        path.push(depot);
        let mut load = 0;
        let mut distance = 0;
        let mut prev = depot;

        for &node in stops {
            distance += costs.get(prev, node);
            load += self.instance.demand(node);
            path.push(node);
            prev = node;
        }
        distance += costs.get(prev, depot);

        if load > self.instance.capacity() {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                route_index: 0,
                load,
                capacity: self.instance.capacity(),
            }));
        }

        (
            VehicleRoute {
                path,
                distance,
                load,
            },
            violations,
        )
    }

    /// Builds the full vehicle-slot result from per-route node sequences.
    ///
    /// Slots beyond the given routes are filled with empty routes up to the
    /// instance's vehicle bound.
    pub fn build_result(&self, routes: &[Vec<usize>]) -> RouteResult {
        let depot = self.instance.depot();
        let mut vehicles: Vec<VehicleRoute> = routes
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| self.build_route(r).0)
            .collect();
        while vehicles.len() < self.instance.max_vehicles() {
            vehicles.push(VehicleRoute::empty(depot));
        }
        RouteResult::new(vehicles)
    }

    /// Evaluates an entire result, returning `(total distance, violations)`.
    ///
    /// Besides capacity, checks that every non-depot node is visited exactly
    /// once and that no more vehicles are used than available.
    pub fn evaluate_result(&self, result: &RouteResult) -> (i64, Vec<Violation>) {
        let n = self.instance.num_nodes();
        let mut seen = vec![false; n];
        let mut total = 0;
        let mut all_violations = Vec::new();

        for (idx, vehicle) in result.vehicles().iter().enumerate() {
            let (route, violations) = self.build_route(vehicle.stops());
            for mut v in violations {
                if let ViolationType::CapacityExceeded { route_index, .. } = &mut v.kind {
                    *route_index = idx;
                }
                all_violations.push(v);
            }
            for &node in vehicle.stops() {
                if node == self.instance.depot() || seen[node] {
                    all_violations.push(Violation::new(ViolationType::DuplicateVisit { node }));
                }
                seen[node] = true;
            }
            total += route.distance;
        }

        for (node, &visited) in seen.iter().enumerate().skip(1) {
            if !visited {
                all_violations.push(Violation::new(ViolationType::MissingVisit { node }));
            }
        }

        let used = result.num_used();
        if used > self.instance.max_vehicles() {
            all_violations.push(Violation::new(ViolationType::TooManyRoutes {
                routes: used,
                max_vehicles: self.instance.max_vehicles(),
            }));
        }

        (total, all_violations)
    }
}
