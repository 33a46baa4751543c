//! Observable transport status
//!
//! Each serial transport moves `Connecting -> Online` or
//! `Connecting -> Disabled`, and `Online -> Disabled` if its link dies.
//! `Disabled` is terminal for the process lifetime; there is no external
//! restart signal. The cell makes that state queryable instead of being
//! only a log line.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LinkStatus {
    /// Acquiring the transport (initial state)
    Connecting = 0,
    /// Transport acquired and serving
    Online = 1,
    /// Transport permanently unavailable for this process
    Disabled = 2,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Connecting => write!(f, "connecting"),
            LinkStatus::Online => write!(f, "online"),
            LinkStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// Shared handle on one transport's status
#[derive(Debug, Clone)]
pub struct StatusCell(Arc<AtomicU8>);

impl StatusCell {
    pub fn new() -> Self {
        Self(Arc::new(AtomicU8::new(LinkStatus::Connecting as u8)))
    }

    pub fn set(&self, status: LinkStatus) {
        self.0.store(status as u8, Ordering::SeqCst);
    }

    pub fn get(&self) -> LinkStatus {
        match self.0.load(Ordering::SeqCst) {
            0 => LinkStatus::Connecting,
            1 => LinkStatus::Online,
            _ => LinkStatus::Disabled,
        }
    }
}

impl Default for StatusCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_starts_connecting() {
        let cell = StatusCell::new();
        assert_eq!(cell.get(), LinkStatus::Connecting);
    }

    #[test]
    fn test_status_is_shared_across_clones() {
        let cell = StatusCell::new();
        let observer = cell.clone();
        cell.set(LinkStatus::Disabled);
        assert_eq!(observer.get(), LinkStatus::Disabled);
    }
}
