//! Planner and solver configuration.
//!
//! Every field has a default, so a partial JSON file (or none at all) is a
//! valid configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Initial-solution heuristic used before local search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FirstSolution {
    /// Extend each path with the cheapest arc from its last node.
    #[default]
    PathCheapestArc,
    /// Insert the node/position pair of least added cost.
    CheapestInsertion,
}

/// Parameters of one CVRP solve.
///
/// # Examples
///
/// ```
/// use smart_routage::config::{FirstSolution, SolverConfig};
///
/// let cfg = SolverConfig::default();
/// assert_eq!(cfg.time_budget().as_millis(), 1000);
/// assert_eq!(cfg.first_solution, FirstSolution::PathCheapestArc);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Wall-clock budget per instance, in milliseconds.
    pub time_budget_ms: u64,
    pub first_solution: FirstSolution,
    /// Scales the arc penalty weight of guided local search.
    pub lambda_coefficient: f64,
    /// Stops guided local search after this many penalty rounds.
    pub max_iterations: Option<usize>,
    /// Seed for neighborhood ordering.
    pub seed: u64,
}

impl SolverConfig {
    /// Time budget as a [`Duration`].
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: 1000,
            first_solution: FirstSolution::default(),
            lambda_coefficient: 0.1,
            max_iterations: None,
            seed: 42,
        }
    }
}

/// Parameters of a full planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Vehicle capacity in volume units.
    pub capacity: f64,
    /// Upper bound on vehicles per instance.
    pub max_vehicles: usize,
    /// Date batch width in days (1 = no batching).
    pub delay: usize,
    /// Warehouses a selection may name. Empty accepts any.
    pub warehouses: Vec<String>,
    /// Parallel workers; 0 uses the rayon default.
    pub workers: usize,
    pub solver: SolverConfig,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            capacity: 81.25,
            max_vehicles: 50,
            delay: 1,
            warehouses: ["Cergy", "Rennes", "Épinal", "Montauban", "Avignon"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            workers: 0,
            solver: SolverConfig::default(),
        }
    }
}

impl PlannerConfig {
    /// Reads a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let text = std::fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&text)?;
        Ok(cfg)
    }

    /// Checks the values that would make every instance meaningless.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.delay < 1 {
            return Err(PlanError::InvalidDelay(self.delay));
        }
        if !self.capacity.is_finite() || self.capacity <= 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "capacity must be positive, got {}",
                self.capacity
            )));
        }
        if self.max_vehicles == 0 {
            return Err(PlanError::InvalidConfig(
                "max_vehicles must be at least 1".into(),
            ));
        }
        if !self.solver.lambda_coefficient.is_finite() || self.solver.lambda_coefficient < 0.0 {
            return Err(PlanError::InvalidConfig(
                "lambda_coefficient must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Checks a warehouse selection against the configured list.
    pub fn check_warehouse(&self, warehouse: &str) -> Result<(), PlanError> {
        if self.warehouses.is_empty() || self.warehouses.iter().any(|w| w == warehouse) {
            Ok(())
        } else {
            Err(PlanError::UnknownWarehouse(warehouse.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = PlannerConfig::default();
        assert_eq!(cfg.capacity, 81.25);
        assert_eq!(cfg.max_vehicles, 50);
        assert_eq!(cfg.delay, 1);
        assert_eq!(cfg.warehouses.len(), 5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_invalid_delay() {
        let cfg = PlannerConfig {
            delay: 0,
            ..PlannerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(PlanError::InvalidDelay(0))));
    }

    #[test]
    fn test_invalid_capacity() {
        let cfg = PlannerConfig {
            capacity: -1.0,
            ..PlannerConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(PlanError::InvalidConfig(_))));
    }

    #[test]
    fn test_check_warehouse() {
        let cfg = PlannerConfig::default();
        assert!(cfg.check_warehouse("Rennes").is_ok());
        assert!(matches!(
            cfg.check_warehouse("Lille"),
            Err(PlanError::UnknownWarehouse(_))
        ));

        let open = PlannerConfig {
            warehouses: vec![],
            ..PlannerConfig::default()
        };
        assert!(open.check_warehouse("Lille").is_ok());
    }

    #[test]
    fn test_partial_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"capacity": 50.0, "solver": {{"time_budget_ms": 200}}}}"#)
            .expect("write");
        let cfg = PlannerConfig::from_json_file(file.path()).expect("parse");
        assert_eq!(cfg.capacity, 50.0);
        assert_eq!(cfg.max_vehicles, 50);
        assert_eq!(cfg.solver.time_budget_ms, 200);
        assert_eq!(cfg.solver.seed, 42);
    }

    #[test]
    fn test_first_solution_serde() {
        let json = serde_json::to_string(&FirstSolution::CheapestInsertion).expect("ser");
        assert_eq!(json, "\"cheapest_insertion\"");
    }
}
