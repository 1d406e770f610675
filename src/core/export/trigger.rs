//! Per-format export triggers

use std::sync::atomic::{AtomicBool, Ordering};

/// Idle/busy flag guarding one export format
///
/// While an export runs the trigger is busy and further requests for the same
/// format are refused. The returned guard restores idle when dropped, whether
/// the export succeeded or not.
#[derive(Debug, Default)]
pub struct TriggerControl {
    busy: AtomicBool,
}

impl TriggerControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the trigger to busy, or returns `None` if it already is
    pub fn try_begin(&self) -> Option<TriggerGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| TriggerGuard { control: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Holds a [`TriggerControl`] busy until dropped
#[derive(Debug)]
pub struct TriggerGuard<'a> {
    control: &'a TriggerControl,
}

impl Drop for TriggerGuard<'_> {
    fn drop(&mut self) {
        self.control.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_while_guard_alive() {
        let trigger = TriggerControl::new();
        assert!(!trigger.is_busy());

        let guard = trigger.try_begin().unwrap();
        assert!(trigger.is_busy());
        assert!(trigger.try_begin().is_none());

        drop(guard);
        assert!(!trigger.is_busy());
        assert!(trigger.try_begin().is_some());
    }

    #[test]
    fn test_guard_restores_idle_on_unwind() {
        let trigger = TriggerControl::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = trigger.try_begin().unwrap();
            panic!("export failed");
        }));
        assert!(result.is_err());
        assert!(!trigger.is_busy());
    }
}
