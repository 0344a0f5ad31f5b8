//! Per-target export exclusion
//!
//! A second export of the same target is rejected while the first is still
//! running. The slot is released when the returned ticket drops, including on
//! early returns and errors.

use crate::{ExportError, ExportTarget, Result};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Tracks which export targets are currently running
#[derive(Debug, Clone, Default)]
pub struct ExportGuard {
    active: Arc<Mutex<BTreeSet<ExportTarget>>>,
}

impl ExportGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `target`, failing with `InProgress` if it is already claimed
    pub fn begin(&self, target: ExportTarget) -> Result<ExportTicket> {
        let mut active = self.lock();
        if !active.insert(target) {
            tracing::debug!("Rejected concurrent {} export", target);
            return Err(ExportError::InProgress(target));
        }
        Ok(ExportTicket {
            target,
            active: Arc::clone(&self.active),
        })
    }

    pub fn is_active(&self, target: ExportTarget) -> bool {
        self.lock().contains(&target)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<ExportTarget>> {
        // A panic while holding the lock cannot leave the set inconsistent
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Proof of an outstanding export; releases its target on drop
#[derive(Debug)]
pub struct ExportTicket {
    target: ExportTarget,
    active: Arc<Mutex<BTreeSet<ExportTarget>>>,
}

impl ExportTicket {
    pub fn target(&self) -> ExportTarget {
        self.target
    }
}

impl Drop for ExportTicket {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        active.remove(&self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_target_rejected() {
        let guard = ExportGuard::new();
        let _ticket = guard.begin(ExportTarget::Png).unwrap();
        match guard.begin(ExportTarget::Png) {
            Err(ExportError::InProgress(ExportTarget::Png)) => {}
            other => panic!("expected InProgress, got {:?}", other),
        }
    }

    #[test]
    fn test_different_targets_overlap() {
        let guard = ExportGuard::new();
        let _svg = guard.begin(ExportTarget::Svg).unwrap();
        let _pptx = guard.begin(ExportTarget::Pptx).unwrap();
        assert!(guard.is_active(ExportTarget::Svg));
        assert!(guard.is_active(ExportTarget::Pptx));
    }

    #[test]
    fn test_drop_releases() {
        let guard = ExportGuard::new();
        let ticket = guard.begin(ExportTarget::Jpeg).unwrap();
        assert_eq!(ticket.target(), ExportTarget::Jpeg);
        drop(ticket);
        assert!(!guard.is_active(ExportTarget::Jpeg));
        assert!(guard.begin(ExportTarget::Jpeg).is_ok());
    }

    #[test]
    fn test_clones_share_state() {
        let guard = ExportGuard::new();
        let other = guard.clone();
        let _ticket = guard.begin(ExportTarget::Svg).unwrap();
        assert!(other.begin(ExportTarget::Svg).is_err());
    }
}
