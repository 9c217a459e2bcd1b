//! Cooperative cancellation shared between the signal listener and the pump.

use parking_lot::Mutex;
use std::sync::Arc;

/// A one-way "please stop" flag.
///
/// Starts out false and can only ever move to true. Clones share the same
/// flag, so the signal listener and the pump each hold their own handle.
#[derive(Clone, Debug, Default)]
pub struct CancellationFlag {
    requested: Arc<Mutex<bool>>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stop has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.requested.lock()
    }

    /// Request a stop.
    ///
    /// Returns true only for the call that flipped the flag.
    pub fn cancel(&self) -> bool {
        let mut requested = self.requested.lock();
        let first = !*requested;
        *requested = true;
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_clear() {
        assert!(!CancellationFlag::new().is_cancelled());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let flag = CancellationFlag::new();
        assert!(flag.cancel());
        assert!(!flag.cancel());
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = CancellationFlag::new();
        let handle = flag.clone();
        handle.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_concurrent_cancel_flips_once() {
        let flag = CancellationFlag::new();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let flag = flag.clone();
                std::thread::spawn(move || flag.cancel())
            })
            .collect();

        let flips = threads
            .into_iter()
            .map(|t| t.join().unwrap())
            .filter(|&flipped| flipped)
            .count();
        assert_eq!(flips, 1);
        assert!(flag.is_cancelled());
    }
}
