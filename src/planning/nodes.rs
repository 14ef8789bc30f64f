//! Delivery node construction for one (date, warehouse) instance.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::PlanError;
use crate::models::{CityTable, DeliveryNode, Order};

/// Nodes of one instance plus the orders left out of routing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSet {
    /// Depot at index 0, then aggregated nodes by location name, then split
    /// nodes in input order.
    pub nodes: Vec<DeliveryNode>,
    /// Ids of orders destined for the warehouse itself.
    pub unrouted: Vec<String>,
}

impl NodeSet {
    /// Number of delivery nodes, depot excluded.
    pub fn num_deliveries(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }
}

#[derive(Default)]
struct Group<'a> {
    volume: f64,
    units: u32,
    orders: Vec<&'a Order>,
}

/// Builds the delivery nodes of one instance.
///
/// Orders are grouped by destination. A group whose volume reaches
/// `capacity` is replaced by one node per order. Nodes located at
/// `warehouse` are dropped and their orders reported in
/// [`NodeSet::unrouted`]. A fresh zero-demand depot node is placed at index 0.
///
/// # Errors
///
/// [`PlanError::UnknownLocation`] if the warehouse or a destination is not in
/// `cities`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use smart_routage::models::{City, CityTable, Order};
/// use smart_routage::planning::build_nodes;
///
/// let cities = CityTable::new(vec![
///     City::new("Rennes", 48.11, -1.68),
///     City::new("Vitré", 48.12, -1.21),
/// ]);
/// let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
/// let a = Order::new("a", "Vitré", 4.0, 2, date, "Rennes");
/// let b = Order::new("b", "Vitré", 6.0, 1, date, "Rennes");
///
/// let set = build_nodes(&[&a, &b], "Rennes", 81.25, &cities).unwrap();
/// assert_eq!(set.nodes.len(), 2);
/// assert!(set.nodes[0].is_depot());
/// assert_eq!(set.nodes[1].volume, 10.0);
/// assert_eq!(set.nodes[1].units, 3);
/// ```
pub fn build_nodes(
    orders: &[&Order],
    warehouse: &str,
    capacity: f64,
    cities: &CityTable,
) -> Result<NodeSet, PlanError> {
    let mut groups: BTreeMap<&str, Group<'_>> = BTreeMap::new();
    for &order in orders {
        let group = groups.entry(order.delivery_location.as_str()).or_default();
        group.volume += order.order_total_volume;
        group.units = group.units.saturating_add(order.n_units);
        group.orders.push(order);
    }

    let mut aggregated = Vec::new();
    let mut oversized = Vec::new();
    for (location, group) in &groups {
        if group.volume >= capacity {
            oversized.push(*location);
            continue;
        }
        aggregated.push(DeliveryNode {
            location: (*location).to_string(),
            volume: group.volume,
            units: group.units,
            order_groups: vec![group.orders.iter().map(|o| o.order_id.clone()).collect()],
            lat: 0.0,
            lng: 0.0,
        });
    }

    let split = orders
        .iter()
        .filter(|o| oversized.contains(&o.delivery_location.as_str()))
        .map(|o| DeliveryNode {
            location: o.delivery_location.clone(),
            volume: o.order_total_volume,
            units: o.n_units,
            order_groups: vec![vec![o.order_id.clone()]],
            lat: 0.0,
            lng: 0.0,
        });

    let depot_city = cities.resolve(warehouse)?;
    let mut nodes = vec![DeliveryNode::depot(warehouse, depot_city.lat, depot_city.lng)];
    let mut unrouted = Vec::new();

    for mut node in aggregated.into_iter().chain(split) {
        if node.location == warehouse {
            unrouted.extend(node.order_ids().map(str::to_string));
            continue;
        }
        let city = cities.resolve(&node.location)?;
        node.lat = city.lat;
        node.lng = city.lng;
        nodes.push(node);
    }

    if !unrouted.is_empty() {
        warn!(
            warehouse,
            orders = unrouted.len(),
            "orders destined for their own warehouse are not routed"
        );
    }
    debug!(
        warehouse,
        orders = orders.len(),
        nodes = nodes.len() - 1,
        split = oversized.len(),
        "delivery nodes built"
    );

    Ok(NodeSet { nodes, unrouted })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::City;
    use chrono::NaiveDate;

    fn cities() -> CityTable {
        CityTable::new(vec![
            City::new("Avignon", 43.95, 4.81),
            City::new("A", 44.0, 4.9),
            City::new("B", 43.8, 4.6),
            City::new("C", 44.1, 5.0),
        ])
    }

    fn order(id: &str, to: &str, volume: f64, units: u32) -> Order {
        let date = NaiveDate::from_ymd_opt(2024, 1, 8).expect("valid date");
        Order::new(id, to, volume, units, date, "Avignon")
    }

    #[test]
    fn test_split_over_capacity_group() {
        let orders = [
            order("b1", "B", 30.0, 1),
            order("a1", "A", 10.0, 2),
            order("b2", "B", 30.0, 3),
        ];
        let refs: Vec<&Order> = orders.iter().collect();
        let set = build_nodes(&refs, "Avignon", 50.0, &cities()).expect("valid");

        assert_eq!(set.nodes.len(), 4);
        assert!(set.nodes[0].is_depot());
        assert_eq!(set.nodes[0].location, "Avignon");

        assert_eq!(set.nodes[1].location, "A");
        assert_eq!(set.nodes[1].volume, 10.0);
        assert_eq!(set.nodes[1].order_groups, vec![vec!["a1".to_string()]]);

        assert_eq!(set.nodes[2].location, "B");
        assert_eq!(set.nodes[2].volume, 30.0);
        assert_eq!(set.nodes[2].units, 1);
        assert_eq!(set.nodes[2].order_groups, vec![vec!["b1".to_string()]]);
        assert_eq!(set.nodes[3].order_groups, vec![vec!["b2".to_string()]]);
        assert_eq!(set.nodes[3].units, 3);
        assert!(set.unrouted.is_empty());
    }

    #[test]
    fn test_volume_equal_to_capacity_is_split() {
        let orders = [order("c1", "C", 20.0, 1), order("c2", "C", 30.0, 1)];
        let refs: Vec<&Order> = orders.iter().collect();
        let set = build_nodes(&refs, "Avignon", 50.0, &cities()).expect("valid");
        assert_eq!(set.num_deliveries(), 2);
    }

    #[test]
    fn test_aggregated_sorted_by_location() {
        let orders = [
            order("c1", "C", 1.0, 1),
            order("b1", "B", 1.0, 1),
            order("a1", "A", 1.0, 1),
            order("b2", "B", 2.0, 1),
        ];
        let refs: Vec<&Order> = orders.iter().collect();
        let set = build_nodes(&refs, "Avignon", 50.0, &cities()).expect("valid");
        let locations: Vec<&str> = set.nodes.iter().map(|n| n.location.as_str()).collect();
        assert_eq!(locations, vec!["Avignon", "A", "B", "C"]);
        assert_eq!(
            set.nodes[2].order_groups,
            vec![vec!["b1".to_string(), "b2".to_string()]]
        );
        assert_eq!(set.nodes[2].volume, 3.0);
    }

    #[test]
    fn test_warehouse_destination_reported_unrouted() {
        let orders = [order("w1", "Avignon", 5.0, 1), order("a1", "A", 1.0, 1)];
        let refs: Vec<&Order> = orders.iter().collect();
        let set = build_nodes(&refs, "Avignon", 50.0, &cities()).expect("valid");
        assert_eq!(set.nodes.len(), 2);
        assert_eq!(set.nodes[0].volume, 0.0);
        assert!(set.nodes[0].is_depot());
        assert_eq!(set.unrouted, vec!["w1".to_string()]);
    }

    #[test]
    fn test_unknown_destination() {
        let orders = [order("x", "Nowhere", 1.0, 1)];
        let refs: Vec<&Order> = orders.iter().collect();
        let err = build_nodes(&refs, "Avignon", 50.0, &cities()).expect_err("unknown city");
        assert!(matches!(err, PlanError::UnknownLocation(name) if name == "Nowhere"));
    }

    #[test]
    fn test_coordinates_resolved() {
        let orders = [order("a1", "A", 1.0, 1)];
        let refs: Vec<&Order> = orders.iter().collect();
        let set = build_nodes(&refs, "Avignon", 50.0, &cities()).expect("valid");
        assert_eq!((set.nodes[0].lat, set.nodes[0].lng), (43.95, 4.81));
        assert_eq!((set.nodes[1].lat, set.nodes[1].lng), (44.0, 4.9));
    }
}
