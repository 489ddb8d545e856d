//! The single shared cancellation flag (spec.md §5 "Cancellation"): polled
//! at the head of every long-running loop; once set, every waiter wakes and
//! exits with a cancellation error.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner(AtomicBool);

/// Cheaply cloneable handle to one scan's interrupt flag.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<Inner>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.0 .0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0 .0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let flag = InterruptFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_set());
        flag.set();
        assert!(clone.is_set());
    }
}
