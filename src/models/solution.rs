//! Raw solver output and constraint violations.

/// A type of constraint violation in a solver result.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// Vehicle capacity exceeded.
    CapacityExceeded {
        /// Vehicle slot in the result.
        route_index: usize,
        /// Load that exceeded capacity.
        load: i64,
        /// Vehicle capacity.
        capacity: i64,
    },
    /// A node is visited by more than one route, or twice by one route.
    DuplicateVisit {
        /// Node visited again.
        node: usize,
    },
    /// A node is visited by no route.
    MissingVisit {
        /// Node never visited.
        node: usize,
    },
    /// More routes than vehicles.
    TooManyRoutes {
        /// Routes in the result.
        routes: usize,
        /// Vehicle upper bound.
        max_vehicles: usize,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// One vehicle slot of a solver result.
///
/// `path` starts at the depot and lists visited nodes in order; the return
/// leg to the depot is implicit but included in `distance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VehicleRoute {
    pub path: Vec<usize>,
    /// Closed-tour distance, in solver units.
    pub distance: i64,
    /// Sum of demands, in solver units.
    pub load: i64,
}

impl VehicleRoute {
    /// An unused vehicle slot.
    pub fn empty(depot: usize) -> Self {
        Self {
            path: vec![depot],
            distance: 0,
            load: 0,
        }
    }

    /// Returns `true` if the vehicle visits no node besides the depot.
    pub fn is_empty(&self) -> bool {
        self.path.len() <= 1
    }

    /// Visited nodes, without the leading depot.
    pub fn stops(&self) -> &[usize] {
        self.path.get(1..).unwrap_or(&[])
    }
}

/// Raw solver output: one entry per vehicle slot, used or not.
///
/// # Examples
///
/// ```
/// use smart_routage::models::{RouteResult, VehicleRoute};
///
/// let result = RouteResult::new(vec![
///     VehicleRoute { path: vec![0, 2, 1], distance: 40, load: 7 },
///     VehicleRoute::empty(0),
/// ]);
/// assert_eq!(result.num_vehicles(), 2);
/// assert_eq!(result.num_used(), 1);
/// assert_eq!(result.total_distance(), 40);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteResult {
    vehicles: Vec<VehicleRoute>,
}

impl RouteResult {
    /// Wraps vehicle slots.
    pub fn new(vehicles: Vec<VehicleRoute>) -> Self {
        Self { vehicles }
    }

    /// All vehicle slots.
    pub fn vehicles(&self) -> &[VehicleRoute] {
        &self.vehicles
    }

    /// Number of vehicle slots.
    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    /// Number of slots visiting at least one node.
    pub fn num_used(&self) -> usize {
        self.vehicles.iter().filter(|v| !v.is_empty()).count()
    }

    /// Total distance across all slots.
    pub fn total_distance(&self) -> i64 {
        self.vehicles.iter().map(|v| v.distance).sum()
    }

    /// Total number of nodes served.
    pub fn num_served(&self) -> usize {
        self.vehicles.iter().map(|v| v.stops().len()).sum()
    }
}
