//! Per-tick context threaded through node stepping.

use std::time::Duration;

use crate::ActionNode;

/// State shared by every node stepped during one scheduler tick.
///
/// Carries the tick's timestamp and collects roots spawned by
/// [`Detached`](crate::ActionKind::Detached) nodes. Spawned roots are
/// submitted by the scheduler once all current roots have been stepped.
pub struct TickContext {
    now: Duration,
    spawned: Vec<ActionNode>,
}

impl TickContext {
    pub(crate) fn new(now: Duration) -> Self {
        Self {
            now,
            spawned: Vec::new(),
        }
    }

    /// Timestamp sampled at the start of this tick.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn spawn(&mut self, node: ActionNode) {
        self.spawned.push(node);
    }

    pub(crate) fn take_spawned(&mut self) -> Vec<ActionNode> {
        std::mem::take(&mut self.spawned)
    }
}
