//! Delivery nodes: the stop candidates of one routing instance.

/// A stop candidate: one location's aggregated (or split) demand.
///
/// Order ids are kept as one group per stop-visit, so aggregated and split
/// nodes share the same shape. The depot carries no group.
///
/// # Examples
///
/// ```
/// use smart_routage::models::DeliveryNode;
///
/// let depot = DeliveryNode::depot("Cergy", 49.03, 2.06);
/// assert!(depot.is_depot());
/// assert_eq!(depot.volume, 0.0);
/// assert!(depot.order_ids().next().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryNode {
    pub location: String,
    pub volume: f64,
    pub units: u32,
    pub order_groups: Vec<Vec<String>>,
    pub lat: f64,
    pub lng: f64,
}

impl DeliveryNode {
    /// Creates a zero-demand depot node.
    pub fn depot(location: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            location: location.into(),
            volume: 0.0,
            units: 0,
            order_groups: Vec::new(),
            lat,
            lng,
        }
    }

    /// Returns `true` if this node carries no orders.
    pub fn is_depot(&self) -> bool {
        self.order_groups.is_empty()
    }

    /// All order ids of this node, group by group.
    pub fn order_ids(&self) -> impl Iterator<Item = &str> {
        self.order_groups.iter().flatten().map(String::as_str)
    }
}
