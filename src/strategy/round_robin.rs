//! Round-robin selection

use crate::domain::{Candidate, Strategy};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Rotates through candidates using a shared counter
#[derive(Debug, Default)]
pub struct RoundRobinStrategy {
    counter: AtomicUsize,
}

impl RoundRobinStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Strategy for RoundRobinStrategy {
    fn select(&self, candidates: &[&dyn Candidate]) -> Option<usize> {
        if candidates.is_empty() {
            return None;
        }
        let ticket = self.counter.fetch_add(1, Ordering::Relaxed);
        Some(ticket % candidates.len())
    }

    fn name(&self) -> &str {
        "round_robin"
    }
}
