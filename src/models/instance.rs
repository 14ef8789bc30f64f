//! Integer-domain CVRP instance.

use crate::distance::{CostMatrix, DistanceMatrix};
use crate::models::DeliveryNode;

/// Factor converting kilometers to solver distance units (meters).
pub const DISTANCE_SCALE: f64 = 1000.0;

/// Factor converting volume to solver demand units.
pub const DEMAND_SCALE: f64 = 100.0;

/// One capacitated vehicle routing instance. Node 0 is the depot.
///
/// All quantities are integers so that objective and capacity comparisons
/// inside the solver are exact.
///
/// # Examples
///
/// ```
/// use smart_routage::distance::CostMatrix;
/// use smart_routage::models::CvrpInstance;
///
/// let costs = CostMatrix::from_data(2, vec![0, 7, 7, 0]).unwrap();
/// let inst = CvrpInstance::new(costs, vec![0, 30], 100, 5).unwrap();
/// assert_eq!(inst.num_nodes(), 2);
/// assert_eq!(inst.depot(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct CvrpInstance {
    costs: CostMatrix,
    demands: Vec<i64>,
    capacity: i64,
    max_vehicles: usize,
}

impl CvrpInstance {
    /// Creates an instance.
    ///
    /// Returns `None` if the demand vector and matrix sizes disagree, the
    /// depot demand is non-zero, or any demand is negative.
    pub fn new(
        costs: CostMatrix,
        demands: Vec<i64>,
        capacity: i64,
        max_vehicles: usize,
    ) -> Option<Self> {
        if costs.size() != demands.len() || demands.is_empty() {
            return None;
        }
        if demands[0] != 0 || demands.iter().any(|&d| d < 0) {
            return None;
        }
        Some(Self {
            costs,
            demands,
            capacity,
            max_vehicles,
        })
    }

    /// Builds the scaled instance for a node list and its km distance matrix.
    ///
    /// Distances are scaled by [`DISTANCE_SCALE`] and rounded, demands by
    /// [`DEMAND_SCALE`] and rounded up, capacity by [`DEMAND_SCALE`] and
    /// truncated.
    pub fn from_nodes(
        nodes: &[DeliveryNode],
        distances: &DistanceMatrix,
        capacity: f64,
        max_vehicles: usize,
    ) -> Option<Self> {
        let costs = distances.scaled(DISTANCE_SCALE);
        let demands = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| if i == 0 { 0 } else { scale_demand(n.volume) })
            .collect();
        Self::new(costs, demands, scale_capacity(capacity), max_vehicles)
    }

    /// Arc costs.
    pub fn costs(&self) -> &CostMatrix {
        &self.costs
    }

    /// Demand of every node (index 0 = depot, always 0).
    pub fn demands(&self) -> &[i64] {
        &self.demands
    }

    /// Demand of one node.
    pub fn demand(&self, node: usize) -> i64 {
        self.demands[node]
    }

    /// Uniform vehicle capacity.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Upper bound on vehicles.
    pub fn max_vehicles(&self) -> usize {
        self.max_vehicles
    }

    /// Number of nodes including the depot.
    pub fn num_nodes(&self) -> usize {
        self.demands.len()
    }

    /// Depot index.
    pub fn depot(&self) -> usize {
        0
    }
}

/// Converts a volume into demand units, rounding up.
///
/// Rounding up keeps the integer capacity check conservative: a route whose
/// scaled load fits never carries more than the capacity in volume.
pub fn scale_demand(volume: f64) -> i64 {
    (volume * DEMAND_SCALE - 1e-9).ceil() as i64
}

/// Converts a capacity into demand units, truncating.
pub fn scale_capacity(capacity: f64) -> i64 {
    (capacity * DEMAND_SCALE) as i64
}
