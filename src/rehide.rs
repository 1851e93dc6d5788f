//! Debounced second hide pass.
//!
//! Some applications ignore a hide request that arrives while they are
//! still being raised by the same activation.  After every activation a
//! second hide pass is scheduled [`DEFAULT_REHIDE_DELAY_MS`] later to catch
//! those stragglers.
//!
//! Only one pass can be pending at a time.  Scheduling replaces the pending
//! pass, so a burst of activations collapses into a single pass for the
//! most recently requested workspace.  A superseded workspace never gets a
//! stale pass run against the newer state.

use crate::model::WorkspaceId;
use std::time::{Duration, Instant};

/// Delay between an activation and its re-hide pass.
pub const DEFAULT_REHIDE_DELAY_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    workspace: WorkspaceId,
    due: Instant,
}

/// Single-slot, trailing-edge debouncer keyed by workspace.
#[derive(Debug, Clone)]
pub struct RehideScheduler {
    delay: Duration,
    pending: Option<Pending>,
}

impl RehideScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule a pass for `workspace`, replacing any pending one.
    pub fn schedule(&mut self, workspace: WorkspaceId, now: Instant) {
        self.pending = Some(Pending {
            workspace,
            due: now + self.delay,
        });
    }

    /// The workspace whose pass is pending, if any.
    pub fn pending(&self) -> Option<WorkspaceId> {
        self.pending.map(|p| p.workspace)
    }

    /// When the pending pass becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    /// Take the pending pass if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<WorkspaceId> {
        match self.pending {
            Some(p) if p.due <= now => {
                self.pending = None;
                Some(p.workspace)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl Default for RehideScheduler {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_REHIDE_DELAY_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_is_not_due_before_delay() {
        let mut s = RehideScheduler::default();
        let t0 = Instant::now();
        s.schedule(WorkspaceId(1), t0);
        assert_eq!(s.take_due(t0 + Duration::from_millis(199)), None);
        assert_eq!(s.take_due(t0 + Duration::from_millis(200)), Some(WorkspaceId(1)));
        assert_eq!(s.take_due(t0 + Duration::from_millis(400)), None);
    }

    #[test]
    fn burst_coalesces_to_latest_workspace() {
        let mut s = RehideScheduler::default();
        let t0 = Instant::now();
        s.schedule(WorkspaceId(1), t0);
        s.schedule(WorkspaceId(2), t0 + Duration::from_millis(50));
        assert_eq!(s.pending(), Some(WorkspaceId(2)));
        // The deadline moved with the second request.
        assert_eq!(s.take_due(t0 + Duration::from_millis(200)), None);
        assert_eq!(s.take_due(t0 + Duration::from_millis(250)), Some(WorkspaceId(2)));
        assert_eq!(s.pending(), None);
    }

    #[test]
    fn cancel_drops_pending_pass() {
        let mut s = RehideScheduler::new(Duration::from_millis(10));
        let t0 = Instant::now();
        s.schedule(WorkspaceId(3), t0);
        s.cancel();
        assert_eq!(s.deadline(), None);
        assert_eq!(s.take_due(t0 + Duration::from_secs(1)), None);
    }
}
