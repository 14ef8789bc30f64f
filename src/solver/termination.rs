//! Stopping conditions for a solve.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// When a solve must stop: a deadline, an optional iteration cap, and an
/// optional shared cancellation flag.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::time::Duration;
/// use smart_routage::solver::Termination;
///
/// let cancel = Arc::new(AtomicBool::new(false));
/// let term = Termination::after(Duration::from_secs(60)).with_cancel(cancel.clone());
/// assert!(!term.is_expired());
/// cancel.store(true, Ordering::Relaxed);
/// assert!(term.is_expired());
/// ```
#[derive(Debug, Clone)]
pub struct Termination {
    deadline: Instant,
    max_iterations: Option<usize>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Termination {
    /// Expires `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            deadline: Instant::now() + budget,
            max_iterations: None,
            cancel: None,
        }
    }

    /// Caps the number of improvement iterations.
    pub fn with_max_iterations(mut self, max: Option<usize>) -> Self {
        self.max_iterations = max;
        self
    }

    /// Stops as soon as `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Returns `true` once the deadline passed or cancellation was requested.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline || self.is_cancelled()
    }

    /// Returns `true` if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Returns `true` if `iterations` reached the cap.
    pub fn iterations_exhausted(&self, iterations: usize) -> bool {
        self.max_iterations.is_some_and(|max| iterations >= max)
    }
}
