//! Generation counters for discarding superseded results

use std::sync::atomic::{AtomicU64, Ordering};

/// Token handed out when an operation starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic counter; only the most recently issued ticket is current
#[derive(Debug, Default)]
pub struct Generation(AtomicU64);

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new operation, superseding every earlier ticket
    pub fn begin(&self) -> Ticket {
        Ticket(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Observe the current ticket without superseding anything
    pub fn current(&self) -> Ticket {
        Ticket(self.0.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.0.load(Ordering::SeqCst) == ticket.0
    }
}
