//! Error types for planning runs and individual solver instances.

use thiserror::Error;

/// Broad class of a fatal planning error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input data.
    Input,
    /// Invalid run parameters.
    Configuration,
}

/// A fatal error that aborts a planning run before any instance is solved.
///
/// # Examples
///
/// ```
/// use smart_routage::error::{ErrorKind, PlanError};
///
/// let err = PlanError::InvalidDelay(0);
/// assert_eq!(err.kind(), ErrorKind::Configuration);
/// assert!(err.to_string().contains("at least 1"));
/// ```
#[derive(Debug, Error)]
pub enum PlanError {
    /// An order record has an invalid field value.
    #[error("order {order_id}: {reason}")]
    InvalidOrder {
        /// Offending order.
        order_id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A location is absent from the city reference table.
    #[error("location '{0}' is not in the city table")]
    UnknownLocation(String),

    /// Batch width below one.
    #[error("invalid delay {0}: batch width must be at least 1")]
    InvalidDelay(usize),

    /// Warehouse selection outside the configured warehouse list.
    #[error("unknown warehouse '{0}'")]
    UnknownWarehouse(String),

    /// Any other invalid configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file: {0}")]
    Json(#[from] serde_json::Error),
}

impl PlanError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlanError::InvalidDelay(_)
            | PlanError::UnknownWarehouse(_)
            | PlanError::InvalidConfig(_)
            | PlanError::Json(_) => ErrorKind::Configuration,
            PlanError::InvalidOrder { .. }
            | PlanError::UnknownLocation(_)
            | PlanError::Csv(_)
            | PlanError::Io(_) => ErrorKind::Input,
        }
    }
}

/// A per-instance solver failure. Recorded, never fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// A single node needs more than one vehicle can carry.
    #[error("node {node} demand {demand} exceeds vehicle capacity {capacity}")]
    DemandExceedsCapacity {
        node: usize,
        demand: i64,
        capacity: i64,
    },

    /// All vehicles are full and some nodes remain unassigned.
    #[error("{unassigned} node(s) left unassigned after using {vehicles} vehicle(s)")]
    FleetExhausted { unassigned: usize, vehicles: usize },
}
