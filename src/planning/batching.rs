//! Date batching.
//!
//! # Algorithm
//!
//! Distinct planning dates are sorted ascending. For each batch start
//! `index = 0, delay, 2·delay, …` with `index < len − delay`, the following
//! `delay − 1` dates are rewritten to `dates[index]`. A trailing group that
//! does not satisfy the bound keeps its dates.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::PlanError;
use crate::models::Order;

/// Returns a copy of `orders` with planning dates batched by `delay` days.
///
/// `delay == 1` leaves every date unchanged.
///
/// # Errors
///
/// [`PlanError::InvalidDelay`] if `delay == 0`.
///
/// # Examples
///
/// ```
/// use chrono::{Datelike, NaiveDate};
/// use smart_routage::models::Order;
/// use smart_routage::planning::batch_dates;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let orders: Vec<Order> = (1..=5)
///     .map(|d| Order::new(format!("o{d}"), "Lyon", 1.0, 1, day(d), "Avignon"))
///     .collect();
///
/// let batched = batch_dates(&orders, 2).unwrap();
/// let dates: Vec<u32> = batched.iter().map(|o| o.delivered_date.day()).collect();
/// assert_eq!(dates, vec![1, 1, 3, 3, 5]);
/// ```
pub fn batch_dates(orders: &[Order], delay: usize) -> Result<Vec<Order>, PlanError> {
    if delay == 0 {
        return Err(PlanError::InvalidDelay(delay));
    }

    let mut batched = orders.to_vec();
    if delay == 1 {
        return Ok(batched);
    }

    let mut dates: Vec<NaiveDate> = orders.iter().map(|o| o.delivered_date).collect();
    dates.sort_unstable();
    dates.dedup();

    let mut remap: BTreeMap<NaiveDate, NaiveDate> = BTreeMap::new();
    let bound = dates.len().saturating_sub(delay);
    for index in (0..bound).step_by(delay) {
        for &date in &dates[index + 1..index + delay] {
            remap.insert(date, dates[index]);
        }
    }

    for order in &mut batched {
        if let Some(&target) = remap.get(&order.delivered_date) {
            order.delivered_date = target;
        }
    }
    Ok(batched)
}
