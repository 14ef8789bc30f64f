//! Dense distance matrices.

use super::great_circle_km;
use crate::models::DeliveryNode;

/// Arc cost in the solver's integer domain.
///
/// Implemented by [`CostMatrix`] for true distances and by the guided local
/// search for penalized distances, so the same neighborhood operators run
/// against either.
pub trait ArcCost {
    /// Cost of traveling from `from` to `to`.
    fn arc(&self, from: usize, to: usize) -> i64;
}

/// A dense n×n kilometer distance matrix stored in row-major order.
///
/// # Examples
///
/// ```
/// use smart_routage::models::DeliveryNode;
/// use smart_routage::distance::DistanceMatrix;
///
/// let nodes = vec![
///     DeliveryNode::depot("Rennes", 48.1173, -1.6778),
///     DeliveryNode::depot("Nantes", 47.2184, -1.5536),
/// ];
/// let dm = DistanceMatrix::from_nodes(&nodes);
/// assert_eq!(dm.size(), 2);
/// assert_eq!(dm.get(0, 0), 0.0);
/// assert!((dm.get(0, 1) - 100.3).abs() < 1.0);
/// assert!(dm.is_symmetric(0.0));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes great-circle distances between node coordinates.
    ///
    /// Each pair is computed once and mirrored, so the result is exactly
    /// symmetric with a zero diagonal.
    pub fn from_nodes(nodes: &[DeliveryNode]) -> Self {
        let n = nodes.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = great_circle_km((nodes[i].lat, nodes[i].lng), (nodes[j].lat, nodes[j].lng));
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Creates a distance matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Multiplies every entry by `factor` and rounds to integer costs.
    pub fn scaled(&self, factor: f64) -> CostMatrix {
        CostMatrix {
            data: self.data.iter().map(|d| (d * factor).round() as i64).collect(),
            size: self.size,
        }
    }
}

/// A dense n×n integer cost matrix, the solver's view of distances.
///
/// # Examples
///
/// ```
/// use smart_routage::distance::{ArcCost, CostMatrix};
///
/// let cm = CostMatrix::from_data(2, vec![0, 12, 12, 0]).unwrap();
/// assert_eq!(cm.arc(0, 1), 12);
/// assert_eq!(cm.route_cost(&[1], 0), 24);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    data: Vec<i64>,
    size: usize,
}

impl CostMatrix {
    /// Creates a cost matrix from an explicit n×n grid.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<i64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the cost from `from` to `to`.
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Number of locations.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Closed-tour cost: `depot → route[0] → … → route[n-1] → depot`.
    pub fn route_cost(&self, route: &[usize], depot: usize) -> i64 {
        route_cost(self, route, depot)
    }
}

impl ArcCost for CostMatrix {
    fn arc(&self, from: usize, to: usize) -> i64 {
        self.get(from, to)
    }
}

/// Closed-tour cost of `route` under any [`ArcCost`]. Empty routes cost 0.
pub fn route_cost<C: ArcCost + ?Sized>(cost: &C, route: &[usize], depot: usize) -> i64 {
    let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
        return 0;
    };
    let inner: i64 = route.windows(2).map(|w| cost.arc(w[0], w[1])).sum();
    cost.arc(depot, first) + inner + cost.arc(last, depot)
}
