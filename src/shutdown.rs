use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process-wide "terminate requested" flag.
///
/// Set from the termination signal handler or the hotkey, polled by the
/// event loop. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag(Arc<AtomicBool>);

impl ShutdownFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true only for the call that actually set the flag.
    pub fn request(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_starts_clear() {
        assert!(!ShutdownFlag::new().is_requested());
    }

    #[test]
    fn test_transitions_once() {
        let flag = ShutdownFlag::new();
        assert!(flag.request());
        assert!(!flag.request());
        assert!(flag.is_requested());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = ShutdownFlag::new();
        let signal_side = flag.clone();
        signal_side.request();
        assert!(flag.is_requested());
    }

    #[test]
    fn test_single_transition_across_threads() {
        let flag = ShutdownFlag::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let f = flag.clone();
                thread::spawn(move || f.request())
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(winners, 1);
        assert!(flag.is_requested());
    }
}
