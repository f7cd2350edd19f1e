//! Single-flight guard for check cycles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process-local "cycle in progress" flag.
///
/// Owned by one orchestrator; clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    running: Arc<AtomicBool>,
}

impl SingleFlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip `Idle → Running` in one atomic step.
    ///
    /// Returns `None` when a cycle already holds the flag. The returned guard
    /// flips the flag back when dropped, including during unwinding.
    #[must_use]
    pub fn try_acquire(&self) -> Option<FlightGuard> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard {
                running: Arc::clone(&self.running),
            })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Proof that the holder owns the running cycle.
#[derive(Debug)]
pub struct FlightGuard {
    running: Arc<AtomicBool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_while_held() {
        let flight = SingleFlight::new();
        let guard = flight.try_acquire().expect("first acquire");
        assert!(flight.is_running());
        assert!(flight.try_acquire().is_none());
        drop(guard);
        assert!(!flight.is_running());
        assert!(flight.try_acquire().is_some());
    }

    #[test]
    fn clones_share_the_flag() {
        let flight = SingleFlight::new();
        let other = flight.clone();
        let _guard = flight.try_acquire().unwrap();
        assert!(other.try_acquire().is_none());
    }

    #[test]
    fn guard_released_on_panic() {
        let flight = SingleFlight::new();
        let inner = flight.clone();
        let result = std::panic::catch_unwind(move || {
            let _guard = inner.try_acquire().unwrap();
            panic!("cycle blew up");
        });
        assert!(result.is_err());
        assert!(!flight.is_running());
    }
}
