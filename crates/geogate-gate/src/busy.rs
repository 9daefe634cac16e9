//! Re-entrancy guard for actions with a pending backend call.

use geogate_core::error::{GeogateError, Result};
use geogate_core::models::GateAction;
use std::sync::atomic::{AtomicBool, Ordering};

/// Pending-call flag shared by all actions of one gate
#[derive(Debug, Default)]
pub struct BusyFlag(AtomicBool);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the gate busy for the lifetime of the returned guard
    ///
    /// Fails with `AlreadyInProgress` while another guard is alive.
    pub fn try_acquire(&self, action: GateAction) -> Result<BusyGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| GeogateError::AlreadyInProgress { action })?;
        Ok(BusyGuard { flag: &self.0 })
    }
}

/// Clears the busy flag on drop, including when the pending call is cancelled
#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_until_released() {
        let flag = BusyFlag::new();
        assert!(!flag.is_busy());

        let guard = flag.try_acquire(GateAction::CheckIn).unwrap();
        assert!(flag.is_busy());

        let err = flag.try_acquire(GateAction::CheckOut).unwrap_err();
        assert!(matches!(err, GeogateError::AlreadyInProgress { action: GateAction::CheckOut }));

        drop(guard);
        assert!(!flag.is_busy());
        assert!(flag.try_acquire(GateAction::CheckOut).is_ok());
    }
}
