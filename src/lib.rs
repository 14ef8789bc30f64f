//! # smart-routage
//!
//! Same-day delivery planning. Orders are batched by date, grouped per
//! (date, warehouse), turned into capacitated vehicle routing instances and
//! solved with cheapest-arc construction followed by guided local search.
//!
//! ## Modules
//!
//! - [`models`] — Domain types (Order, City, DeliveryNode, CvrpInstance, Route)
//! - [`planning`] — Date batching and delivery node construction
//! - [`distance`] — Great-circle distance and scaled cost matrices
//! - [`evaluation`] — Route feasibility checking and cost evaluation
//! - [`constructive`] — First-solution heuristics (path cheapest arc, cheapest insertion)
//! - [`local_search`] — Capacity-preserving move operators (relocate, 2-opt*, swap, 2-opt, Or-opt)
//! - [`solver`] — Guided local search behind the [`solver::CvrpSolver`] trait
//! - [`assembly`] — Solver output to route records
//! - [`planner`] — Parallel planning over every (date, warehouse) instance
//! - [`io`] — CSV input and output
//! - [`config`] — Planner and solver configuration
//! - [`error`] — Error types

pub mod assembly;
pub mod config;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod local_search;
pub mod models;
pub mod planner;
pub mod planning;
pub mod solver;
