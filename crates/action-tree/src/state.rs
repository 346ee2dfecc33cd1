//! Lifecycle state of an action node.

/// Where a node is in its lifecycle.
///
/// # Transitions
///
/// Every activation moves `Pending → Running → {Finished | Cancelled}`:
/// - A node becomes `Running` on the tick it is first stepped
/// - `Finished` means the node's completion rule was satisfied
/// - `Cancelled` means the node was interrupted (externally, by a timeout,
///   by a racing sibling, or because a child failed)
///
/// A root cancelled before its first tick goes straight from `Pending` to
/// `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// Built or submitted, not yet stepped.
    Pending,

    /// Stepped at least once and not yet done.
    Running,

    /// Completed normally.
    Finished,

    /// Interrupted before completing.
    Cancelled,
}

impl NodeState {
    /// Returns `true` for `Finished` and `Cancelled`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, NodeState::Finished | NodeState::Cancelled)
    }

    /// Returns `true` if this state is `Running`.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, NodeState::Running)
    }

    /// Returns `true` if this state is `Finished`.
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, NodeState::Finished)
    }

    /// Returns `true` if this state is `Cancelled`.
    #[inline]
    pub fn is_cancelled(self) -> bool {
        matches!(self, NodeState::Cancelled)
    }
}

/// Result of advancing a node's variant logic by one step.
///
/// `Aborted` is how a failure travels upward: the node that produced it
/// becomes `Cancelled` and its parent composite aborts in turn, up to the
/// nearest timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Running,
    Finished,
    Aborted,
}
