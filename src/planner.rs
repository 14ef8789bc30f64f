//! Planning runs over every (date, warehouse) instance.
//!
//! A run validates its inputs, batches planning dates, groups orders into
//! instances and solves them in parallel. Infeasible instances are recorded
//! in [`PlanOutcome::failures`] while the rest of the run proceeds.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::assembly::assemble_routes;
use crate::config::PlannerConfig;
use crate::distance::DistanceMatrix;
use crate::error::{PlanError, SolveError};
use crate::models::{CityTable, CvrpInstance, Order, Route, CHAIN_SEPARATOR};
use crate::planning::{batch_dates, build_nodes};
use crate::solver::{CvrpSolver, GuidedLocalSearch, Termination};

/// One finished instance, reported to a [`ProgressSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Instances finished so far, this one included.
    pub completed: usize,
    pub total: usize,
    pub date: NaiveDate,
    pub warehouse: String,
}

/// Receives progress events. Called from worker threads.
pub trait ProgressSink: Sync {
    fn report(&self, progress: &Progress);
}

/// Discards progress events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: &Progress) {}
}

impl<F> ProgressSink for F
where
    F: Fn(&Progress) + Sync,
{
    fn report(&self, progress: &Progress) {
        self(progress)
    }
}

/// An instance the solver could not route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedInstance {
    pub date: NaiveDate,
    pub warehouse: String,
    pub reason: SolveError,
}

/// Result of a planning run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanOutcome {
    /// Routes in (date, warehouse) order.
    pub routes: Vec<Route>,
    pub failures: Vec<FailedInstance>,
    /// Orders destined for their own warehouse.
    pub unrouted: Vec<String>,
}

struct InstanceOutcome {
    routes: Vec<Route>,
    unrouted: Vec<String>,
    failure: Option<FailedInstance>,
}

/// Delivery planner: configuration, city reference and solver.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use smart_routage::config::PlannerConfig;
/// use smart_routage::models::{City, CityTable, Order};
/// use smart_routage::planner::{NoProgress, Planner};
///
/// let cities = Arc::new(CityTable::new(vec![
///     City::new("Rennes", 48.11, -1.68),
///     City::new("Vitré", 48.12, -1.21),
///     City::new("Fougères", 48.35, -1.20),
/// ]));
/// let mut config = PlannerConfig::default();
/// config.solver.time_budget_ms = 50;
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
/// let orders = vec![
///     Order::new("o1", "Vitré", 20.0, 2, date, "Rennes"),
///     Order::new("o2", "Fougères", 30.0, 1, date, "Rennes"),
/// ];
///
/// let planner = Planner::new(config, cities).unwrap();
/// let outcome = planner.plan(&orders, None, 1, &NoProgress).unwrap();
/// assert_eq!(outcome.routes.len(), 1);
/// assert_eq!(outcome.routes[0].fill_volume, 50.0);
/// assert!(outcome.failures.is_empty());
/// ```
pub struct Planner {
    config: PlannerConfig,
    cities: Arc<CityTable>,
    solver: Arc<dyn CvrpSolver>,
    cancel: Arc<AtomicBool>,
}

impl Planner {
    /// Creates a planner using [`GuidedLocalSearch`].
    ///
    /// # Errors
    ///
    /// Configuration errors from [`PlannerConfig::validate`].
    pub fn new(config: PlannerConfig, cities: Arc<CityTable>) -> Result<Self, PlanError> {
        config.validate()?;
        let solver = Arc::new(GuidedLocalSearch::new(config.solver.clone()));
        Ok(Self {
            config,
            cities,
            solver,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Replaces the solver.
    pub fn with_solver(mut self, solver: Arc<dyn CvrpSolver>) -> Self {
        self.solver = solver;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Flag that cuts every running and pending solve short when set.
    ///
    /// Cut-short solves still return their best feasible solution.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Plans every (date, warehouse) instance of `orders`.
    ///
    /// `selection` restricts the planned warehouses; `None` plans all of
    /// them. `delay` is the batch width in days.
    ///
    /// # Errors
    ///
    /// Input and configuration errors, all raised before any instance is
    /// solved. Solver failures are reported in [`PlanOutcome::failures`].
    pub fn plan(
        &self,
        orders: &[Order],
        selection: Option<&[String]>,
        delay: usize,
        progress: &dyn ProgressSink,
    ) -> Result<PlanOutcome, PlanError> {
        if let Some(selected) = selection {
            for warehouse in selected {
                self.config.check_warehouse(warehouse)?;
            }
        }
        self.validate_orders(orders)?;
        let batched = batch_dates(orders, delay)?;

        let mut instances: BTreeMap<(NaiveDate, &str), Vec<&Order>> = BTreeMap::new();
        for order in &batched {
            let selected = selection
                .is_none_or(|s| s.iter().any(|w| *w == order.from_warehouse));
            if selected {
                instances
                    .entry((order.delivered_date, order.from_warehouse.as_str()))
                    .or_default()
                    .push(order);
            }
        }
        let instances: Vec<_> = instances.into_iter().collect();
        let total = instances.len();

        info!(
            orders = orders.len(),
            instances = total,
            delay,
            workers = self.config.workers,
            "planning started"
        );

        let completed = AtomicUsize::new(0);
        let run = || {
            instances
                .par_iter()
                .map(|((date, warehouse), members)| {
                    let outcome = self.solve_instance(*date, warehouse, members)?;
                    progress.report(&Progress {
                        completed: completed.fetch_add(1, Ordering::Relaxed) + 1,
                        total,
                        date: *date,
                        warehouse: warehouse.to_string(),
                    });
                    Ok(outcome)
                })
                .collect::<Result<Vec<_>, PlanError>>()
        };

        let results = if self.config.workers > 0 {
            rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.workers)
                .build()
                .map_err(|e| PlanError::InvalidConfig(e.to_string()))?
                .install(run)?
        } else {
            run()?
        };

        let mut outcome = PlanOutcome::default();
        for result in results {
            outcome.routes.extend(result.routes);
            outcome.unrouted.extend(result.unrouted);
            outcome.failures.extend(result.failure);
        }

        info!(
            routes = outcome.routes.len(),
            failures = outcome.failures.len(),
            unrouted = outcome.unrouted.len(),
            "planning finished"
        );
        Ok(outcome)
    }

    /// Rejects orders the run cannot interpret at all.
    ///
    /// Ids and locations must not contain [`CHAIN_SEPARATOR`], or the route
    /// output could not be read back.
    fn validate_orders(&self, orders: &[Order]) -> Result<(), PlanError> {
        for order in orders {
            let invalid = |reason: String| PlanError::InvalidOrder {
                order_id: order.order_id.clone(),
                reason,
            };
            if !order.order_total_volume.is_finite() || order.order_total_volume < 0.0 {
                return Err(invalid(format!("invalid volume {}", order.order_total_volume)));
            }
            for (field, value) in [
                ("order_id", &order.order_id),
                ("delivery_location", &order.delivery_location),
                ("from_warehouse", &order.from_warehouse),
            ] {
                if value.contains(CHAIN_SEPARATOR) {
                    return Err(invalid(format!("{field} contains '{CHAIN_SEPARATOR}'")));
                }
            }
            self.config.check_warehouse(&order.from_warehouse)?;
            self.cities.resolve(&order.delivery_location)?;
            self.cities.resolve(&order.from_warehouse)?;
        }
        Ok(())
    }

    fn solve_instance(
        &self,
        date: NaiveDate,
        warehouse: &str,
        orders: &[&Order],
    ) -> Result<InstanceOutcome, PlanError> {
        let set = build_nodes(orders, warehouse, self.config.capacity, &self.cities)?;
        if set.num_deliveries() == 0 {
            debug!(%date, warehouse, "no deliverable nodes");
            return Ok(InstanceOutcome {
                routes: Vec::new(),
                unrouted: set.unrouted,
                failure: None,
            });
        }

        let distances = DistanceMatrix::from_nodes(&set.nodes);
        let instance = CvrpInstance::from_nodes(
            &set.nodes,
            &distances,
            self.config.capacity,
            self.config.max_vehicles,
        )
        .ok_or_else(|| {
            PlanError::InvalidConfig(format!("inconsistent instance for {warehouse} on {date}"))
        })?;

        let termination = Termination::after(self.config.solver.time_budget())
            .with_max_iterations(self.config.solver.max_iterations)
            .with_cancel(Arc::clone(&self.cancel));

        match self.solver.solve(&instance, &termination) {
            Ok(result) => {
                let routes = assemble_routes(&result, &set.nodes, warehouse, date);
                info!(
                    %date,
                    warehouse,
                    nodes = set.num_deliveries(),
                    routes = routes.len(),
                    "instance solved"
                );
                Ok(InstanceOutcome {
                    routes,
                    unrouted: set.unrouted,
                    failure: None,
                })
            }
            Err(reason) => {
                warn!(%date, warehouse, %reason, "instance infeasible");
                Ok(InstanceOutcome {
                    routes: Vec::new(),
                    unrouted: set.unrouted,
                    failure: Some(FailedInstance {
                        date,
                        warehouse: warehouse.to_string(),
                        reason,
                    }),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::great_circle_km;
    use crate::error::ErrorKind;
    use crate::models::{City, RouteResult};
    use std::sync::Mutex;

    fn cities() -> Arc<CityTable> {
        Arc::new(CityTable::new(vec![
            City::new("Cergy", 49.036, 2.063),
            City::new("Avignon", 43.949, 4.806),
            City::new("Pontoise", 49.050, 2.100),
            City::new("Mantes", 48.990, 1.717),
            City::new("Orange", 44.138, 4.807),
        ]))
    }

    fn config() -> PlannerConfig {
        let mut config = PlannerConfig {
            capacity: 50.0,
            ..PlannerConfig::default()
        };
        config.solver.time_budget_ms = 200;
        config.solver.max_iterations = Some(10);
        config
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).expect("valid date")
    }

    fn order(id: &str, to: &str, volume: f64, units: u32, d: u32, from: &str) -> Order {
        Order::new(id, to, volume, units, date(d), from)
    }

    fn planner() -> Planner {
        Planner::new(config(), cities()).expect("valid config")
    }

    #[test]
    fn test_single_route_end_to_end() {
        let orders = vec![
            order("p1", "Pontoise", 10.0, 2, 1, "Cergy"),
            order("m1", "Mantes", 20.0, 5, 1, "Cergy"),
            order("p2", "Pontoise", 10.0, 1, 1, "Cergy"),
        ];
        let outcome = planner().plan(&orders, None, 1, &NoProgress).expect("valid");

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.routes.len(), 1);
        let route = &outcome.routes[0];
        assert_eq!(route.warehouse, "Cergy");
        assert_eq!(route.date, date(1));
        assert_eq!(route.fill_volume, 40.0);
        assert_eq!(route.n_units, 8);
        assert_eq!(route.stops[0], "Cergy");
        assert_eq!(route.num_stops(), 2);
        assert!(
            route.orders == ["p1", "p2", "m1"] || route.orders == ["m1", "p1", "p2"],
            "{:?}",
            route.orders
        );

        let cergy = (49.036, 2.063);
        let pontoise = (49.050, 2.100);
        let mantes = (48.990, 1.717);
        let tour = great_circle_km(cergy, pontoise)
            + great_circle_km(pontoise, mantes)
            + great_circle_km(mantes, cergy);
        assert!((route.total_distance - tour).abs() < 0.002);
    }

    #[test]
    fn test_infeasible_instance_recorded() {
        let orders = vec![
            order("big", "Orange", 60.0, 1, 1, "Avignon"),
            order("p1", "Pontoise", 10.0, 1, 1, "Cergy"),
        ];
        let outcome = planner().plan(&orders, None, 1, &NoProgress).expect("valid");

        assert_eq!(outcome.routes.len(), 1);
        assert_eq!(outcome.routes[0].warehouse, "Cergy");
        assert_eq!(outcome.failures.len(), 1);
        let failure = &outcome.failures[0];
        assert_eq!(failure.warehouse, "Avignon");
        assert_eq!(failure.date, date(1));
        assert!(matches!(
            failure.reason,
            SolveError::DemandExceedsCapacity { .. }
        ));
    }

    #[test]
    fn test_results_ordered_by_date_then_warehouse() {
        let orders = vec![
            order("c2", "Pontoise", 1.0, 1, 2, "Cergy"),
            order("a2", "Orange", 1.0, 1, 2, "Avignon"),
            order("c1", "Pontoise", 1.0, 1, 1, "Cergy"),
            order("a1", "Orange", 1.0, 1, 1, "Avignon"),
        ];
        let outcome = planner().plan(&orders, None, 1, &NoProgress).expect("valid");
        let keys: Vec<(NaiveDate, &str)> = outcome
            .routes
            .iter()
            .map(|r| (r.date, r.warehouse.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (date(1), "Avignon"),
                (date(1), "Cergy"),
                (date(2), "Avignon"),
                (date(2), "Cergy"),
            ]
        );
    }

    #[test]
    fn test_delay_merges_instances() {
        let orders = vec![
            order("c1", "Pontoise", 1.0, 1, 1, "Cergy"),
            order("c2", "Mantes", 1.0, 1, 2, "Cergy"),
            order("c3", "Mantes", 1.0, 1, 3, "Cergy"),
        ];
        let outcome = planner().plan(&orders, None, 2, &NoProgress).expect("valid");
        let dates: Vec<NaiveDate> = outcome.routes.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(1), date(3)]);
        assert_eq!(outcome.routes[0].orders.len(), 2);
    }

    #[test]
    fn test_selection_restricts_warehouses() {
        let orders = vec![
            order("a1", "Orange", 1.0, 1, 1, "Avignon"),
            order("c1", "Pontoise", 1.0, 1, 1, "Cergy"),
        ];
        let selection = vec!["Avignon".to_string()];
        let outcome = planner()
            .plan(&orders, Some(&selection), 1, &NoProgress)
            .expect("valid");
        assert_eq!(outcome.routes.len(), 1);
        assert_eq!(outcome.routes[0].warehouse, "Avignon");
    }

    #[test]
    fn test_unknown_warehouse_selection() {
        let selection = vec!["Lille".to_string()];
        let err = planner()
            .plan(&[], Some(&selection), 1, &NoProgress)
            .expect_err("not configured");
        assert!(matches!(err, PlanError::UnknownWarehouse(ref w) if w == "Lille"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_unknown_location_is_fatal() {
        let orders = vec![
            order("c1", "Pontoise", 1.0, 1, 1, "Cergy"),
            order("x", "Atlantis", 1.0, 1, 1, "Cergy"),
        ];
        let err = planner()
            .plan(&orders, None, 1, &NoProgress)
            .expect_err("unknown destination");
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_invalid_volume_is_fatal() {
        let orders = vec![order("bad", "Pontoise", f64::NAN, 1, 1, "Cergy")];
        let err = planner()
            .plan(&orders, None, 1, &NoProgress)
            .expect_err("NaN volume");
        assert!(matches!(err, PlanError::InvalidOrder { ref order_id, .. } if order_id == "bad"));
    }

    #[test]
    fn test_zero_volume_orders_routed() {
        let orders = vec![
            order("z1", "Pontoise", 0.0, 1, 1, "Cergy"),
            order("z2", "Mantes", 0.0, 2, 1, "Cergy"),
        ];
        let outcome = planner().plan(&orders, None, 1, &NoProgress).expect("valid");
        assert!(outcome.failures.is_empty());
        assert!(outcome.unrouted.is_empty());
        assert_eq!(outcome.routes.len(), 1);
        let mut routed = outcome.routes[0].orders.clone();
        routed.sort();
        assert_eq!(routed, vec!["z1", "z2"]);
        assert_eq!(outcome.routes[0].fill_volume, 0.0);
    }

    #[test]
    fn test_rounding_never_overloads_a_vehicle() {
        let config = PlannerConfig {
            capacity: 81.25,
            ..config()
        };
        let planner = Planner::new(config, cities()).expect("valid");
        let orders = vec![
            order("a", "Pontoise", 27.084, 1, 1, "Cergy"),
            order("b", "Mantes", 27.084, 1, 1, "Cergy"),
            order("c", "Orange", 27.084, 1, 1, "Cergy"),
        ];
        let outcome = planner.plan(&orders, None, 1, &NoProgress).expect("valid");
        assert_eq!(outcome.routes.len(), 2);
        let routed: usize = outcome.routes.iter().map(|r| r.orders.len()).sum();
        assert_eq!(routed, 3);
        for route in &outcome.routes {
            assert!(route.fill_volume <= 81.25, "{}", route.fill_volume);
        }
    }

    #[test]
    fn test_separator_in_order_id_is_fatal() {
        let orders = vec![order("a > b", "Pontoise", 1.0, 1, 1, "Cergy")];
        let err = planner()
            .plan(&orders, None, 1, &NoProgress)
            .expect_err("ambiguous chain");
        assert!(matches!(err, PlanError::InvalidOrder { ref order_id, .. } if order_id == "a > b"));
    }

    #[test]
    fn test_unconfigured_warehouse_is_fatal() {
        let cities = CityTable::new(vec![
            City::new("Lille", 50.63, 3.06),
            City::new("Roubaix", 50.69, 3.17),
        ]);
        let planner = Planner::new(config(), Arc::new(cities)).expect("valid");
        let orders = vec![order("l1", "Roubaix", 1.0, 1, 1, "Lille")];
        let err = planner
            .plan(&orders, None, 1, &NoProgress)
            .expect_err("Lille is not configured");
        assert!(matches!(err, PlanError::UnknownWarehouse(ref w) if w == "Lille"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_zero_delay_is_fatal() {
        let err = planner()
            .plan(&[], None, 0, &NoProgress)
            .expect_err("zero delay");
        assert!(matches!(err, PlanError::InvalidDelay(0)));
    }

    #[test]
    fn test_warehouse_only_instance() {
        let orders = vec![order("self", "Cergy", 5.0, 1, 1, "Cergy")];
        let outcome = planner().plan(&orders, None, 1, &NoProgress).expect("valid");
        assert!(outcome.routes.is_empty());
        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.unrouted, vec!["self".to_string()]);
    }

    #[test]
    fn test_progress_reported_per_instance() {
        let orders = vec![
            order("a1", "Orange", 1.0, 1, 1, "Avignon"),
            order("c1", "Pontoise", 1.0, 1, 1, "Cergy"),
            order("c2", "Pontoise", 1.0, 1, 2, "Cergy"),
        ];
        let events = Mutex::new(Vec::new());
        let sink = |p: &Progress| events.lock().expect("not poisoned").push(p.clone());
        planner().plan(&orders, None, 1, &sink).expect("valid");

        let mut events = events.into_inner().expect("not poisoned");
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|p| p.total == 3));
        events.sort_by_key(|p| p.completed);
        let completed: Vec<usize> = events.iter().map(|p| p.completed).collect();
        assert_eq!(completed, vec![1, 2, 3]);
    }

    #[test]
    fn test_sequential_worker_pool() {
        let config = PlannerConfig {
            workers: 1,
            ..config()
        };
        let planner = Planner::new(config, cities()).expect("valid");
        let orders = vec![
            order("c1", "Pontoise", 30.0, 1, 1, "Cergy"),
            order("c2", "Mantes", 30.0, 1, 1, "Cergy"),
        ];
        let outcome = planner.plan(&orders, None, 1, &NoProgress).expect("valid");
        assert_eq!(outcome.routes.len(), 2);
        for route in &outcome.routes {
            assert!(route.fill_volume <= 50.0);
        }
    }

    struct AlwaysFull;

    impl CvrpSolver for AlwaysFull {
        fn solve(&self, instance: &CvrpInstance, _: &Termination) -> Result<RouteResult, SolveError> {
            Err(SolveError::FleetExhausted {
                unassigned: instance.num_nodes() - 1,
                vehicles: instance.max_vehicles(),
            })
        }
    }

    #[test]
    fn test_substituted_solver() {
        let planner = planner().with_solver(Arc::new(AlwaysFull));
        let orders = vec![order("c1", "Pontoise", 1.0, 1, 1, "Cergy")];
        let outcome = planner.plan(&orders, None, 1, &NoProgress).expect("valid");
        assert!(outcome.routes.is_empty());
        assert_eq!(
            outcome.failures[0].reason,
            SolveError::FleetExhausted {
                unassigned: 1,
                vehicles: 50
            }
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PlannerConfig {
            max_vehicles: 0,
            ..config()
        };
        assert!(Planner::new(config, cities()).is_err());
    }
}
