//! Order preparation ahead of routing.
//!
//! - [`batch_dates`] — coarsens planning dates into batches of `delay` days
//! - [`build_nodes`] — turns one (date, warehouse) order set into delivery
//!   nodes with the depot at index 0

mod batching;
mod nodes;

pub use batching::batch_dates;
pub use nodes::{build_nodes, NodeSet};
