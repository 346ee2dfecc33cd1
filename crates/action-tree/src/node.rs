//! The action node: a tagged union of leaf and composite variants.
//!
//! This module defines [`ActionNode`], the single schedulable unit, and
//! [`ActionKind`], the variant it carries. Stepping and cancellation are
//! dispatched by matching on the kind; composite and decorator logic lives
//! in [`crate::composite`] and [`crate::decorator`].

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::composite::{self, Sequential};
use crate::decorator::{Detached, Timeout};
use crate::state::Outcome;
use crate::{NodeState, Requirements, SubsystemId, Task, TaskStatus, TickContext};

/// Side effect run by an `Instant` node.
pub type Effect = Box<dyn FnMut() + Send>;

/// Condition polled by a `WaitUntil` node.
pub type Predicate = Box<dyn FnMut() -> bool + Send>;

/// The variant carried by an [`ActionNode`].
pub enum ActionKind {
    /// Runs its effect once and finishes in the same tick.
    Instant(Effect),

    /// Finishes on the first tick its predicate returns `true`.
    WaitUntil(Predicate),

    /// Leaf driven by an external collaborator.
    Task(Box<dyn Task>),

    /// Children one after another.
    Sequential(Sequential),

    /// All children at once; finishes when every child has finished.
    Parallel(Vec<ActionNode>),

    /// All children at once; finishes when the first child finishes.
    RacingParallel(Vec<ActionNode>),

    /// Bounds its inner node by a duration.
    Timeout(Timeout),

    /// Submits its inner node as an independent root and finishes.
    Detached(Detached),

    /// A sequence that restarts every time it completes.
    RepeatingSequence(Sequential),
}

impl ActionKind {
    /// Short name of the variant, used in logs and debug output.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Instant(_) => "instant",
            ActionKind::WaitUntil(_) => "wait_until",
            ActionKind::Task(_) => "task",
            ActionKind::Sequential(_) => "sequence",
            ActionKind::Parallel(_) => "parallel",
            ActionKind::RacingParallel(_) => "race",
            ActionKind::Timeout(_) => "timeout",
            ActionKind::Detached(_) => "detached",
            ActionKind::RepeatingSequence(_) => "repeating",
        }
    }
}

/// A unit of schedulable work.
///
/// Nodes are built by the functions in [`crate::builder`], composed into a
/// tree, and handed to the [`Scheduler`](crate::Scheduler), which owns the
/// tree from then on.
pub struct ActionNode {
    name: Cow<'static, str>,
    kind: ActionKind,
    state: NodeState,
    requirements: Requirements,
    started_at: Option<Duration>,
}

impl ActionNode {
    /// Creates a pending node with no requirements.
    pub fn new(name: impl Into<Cow<'static, str>>, kind: ActionKind) -> Self {
        Self {
            name: name.into(),
            kind,
            state: NodeState::Pending,
            requirements: Requirements::new(),
            started_at: None,
        }
    }

    /// Replaces the node's name.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Declares that this node claims `subsystem` while it is live.
    pub fn requiring(mut self, subsystem: SubsystemId) -> Self {
        self.requirements.insert(subsystem);
        self
    }

    /// Declares several requirements at once.
    pub fn with_requirements(mut self, subsystems: impl IntoIterator<Item = SubsystemId>) -> Self {
        self.requirements.extend(subsystems);
        self
    }

    /// Wraps this node in a [`Timeout`].
    pub fn with_timeout(self, duration: Duration) -> ActionNode {
        crate::builder::timeout(self, duration)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Requirements declared on this node itself, not its descendants.
    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    /// Time of the tick this node was first stepped, if it has started.
    pub fn started_at(&self) -> Option<Duration> {
        self.started_at
    }

    /// The timeout bound, for `Timeout` nodes.
    pub fn deadline(&self) -> Option<Duration> {
        match &self.kind {
            ActionKind::Timeout(timeout) => Some(timeout.duration()),
            _ => None,
        }
    }

    /// Direct children in declared order.
    ///
    /// A `Timeout` has its inner node as its only child. A `Detached` node
    /// has none: its inner node belongs to a different root.
    pub fn children(&self) -> &[ActionNode] {
        match &self.kind {
            ActionKind::Sequential(seq) | ActionKind::RepeatingSequence(seq) => seq.children(),
            ActionKind::Parallel(children) | ActionKind::RacingParallel(children) => children,
            ActionKind::Timeout(timeout) => std::slice::from_ref(timeout.inner()),
            _ => &[],
        }
    }

    fn children_mut(&mut self) -> &mut [ActionNode] {
        match &mut self.kind {
            ActionKind::Sequential(seq) | ActionKind::RepeatingSequence(seq) => {
                seq.children_mut()
            }
            ActionKind::Parallel(children) | ActionKind::RacingParallel(children) => children,
            ActionKind::Timeout(timeout) => std::slice::from_mut(timeout.inner_mut()),
            _ => &mut [],
        }
    }

    /// Union of requirements over every non-terminal node of this tree.
    ///
    /// This is what a root holds in the registry. An empty set means the
    /// tree is exempt from conflict checking.
    pub fn claimed_requirements(&self) -> Requirements {
        let mut out = Requirements::new();
        self.collect_requirements(&mut out);
        out
    }

    /// Returns `true` if the tree currently claims nothing.
    pub fn is_exempt(&self) -> bool {
        self.claimed_requirements().is_empty()
    }

    fn collect_requirements(&self, out: &mut Requirements) {
        if self.state.is_terminal() {
            return;
        }
        if let ActionKind::RepeatingSequence(_) = self.kind {
            // finished children run again on the next lap
            self.collect_declared(out);
            return;
        }
        out.extend(self.requirements.iter().copied());
        for child in self.children() {
            child.collect_requirements(out);
        }
    }

    fn collect_declared(&self, out: &mut Requirements) {
        out.extend(self.requirements.iter().copied());
        for child in self.children() {
            child.collect_declared(out);
        }
    }

    /// Names of `WaitUntil` nodes with no `Timeout` ancestor.
    ///
    /// A wait whose predicate never holds stalls its enclosing sequence
    /// forever. Behaviors that are meant to terminate should return an
    /// empty list here. Detached inners are audited as their own roots.
    pub fn unguarded_waits(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_unguarded_waits(false, &mut out);
        out
    }

    fn collect_unguarded_waits<'a>(&'a self, guarded: bool, out: &mut Vec<&'a str>) {
        match &self.kind {
            ActionKind::WaitUntil(_) => {
                if !guarded {
                    out.push(&self.name);
                }
            }
            ActionKind::Timeout(timeout) => timeout.inner().collect_unguarded_waits(true, out),
            ActionKind::Detached(detached) => {
                if let Some(inner) = detached.pending_inner() {
                    inner.collect_unguarded_waits(false, out);
                }
            }
            _ => {
                for child in self.children() {
                    child.collect_unguarded_waits(guarded, out);
                }
            }
        }
    }

    /// Advances this node by one step and returns its resulting state.
    ///
    /// Stepping a terminal node is a no-op.
    pub(crate) fn step(&mut self, ctx: &mut TickContext) -> NodeState {
        let first = match self.state {
            NodeState::Finished | NodeState::Cancelled => return self.state,
            NodeState::Pending => {
                self.state = NodeState::Running;
                self.started_at = Some(ctx.now());
                trace!(node = %self.name, kind = self.kind.label(), "started");
                true
            }
            NodeState::Running => false,
        };
        let started_at = self.started_at.unwrap_or(ctx.now());

        let outcome = match &mut self.kind {
            ActionKind::Instant(effect) => {
                effect();
                Outcome::Finished
            }
            ActionKind::WaitUntil(predicate) => {
                if predicate() {
                    Outcome::Finished
                } else {
                    Outcome::Running
                }
            }
            ActionKind::Task(task) => step_task(task.as_mut(), first, ctx.now(), &self.name),
            ActionKind::Sequential(seq) => seq.step(ctx),
            ActionKind::Parallel(children) => composite::step_parallel(children, ctx),
            ActionKind::RacingParallel(children) => composite::step_race(children, ctx),
            ActionKind::Timeout(timeout) => timeout.step(started_at, ctx),
            ActionKind::Detached(detached) => detached.step(ctx),
            ActionKind::RepeatingSequence(seq) => seq.step_repeating(ctx),
        };

        match outcome {
            Outcome::Running => {}
            Outcome::Finished => {
                self.state = NodeState::Finished;
                trace!(node = %self.name, "finished");
            }
            Outcome::Aborted => {
                self.state = NodeState::Cancelled;
                debug!(node = %self.name, kind = self.kind.label(), "aborted by child failure");
            }
        }
        self.state
    }

    /// Cancels this node and every running descendant, bottom-up.
    ///
    /// Children are torn down before the node itself is marked cancelled.
    /// Children that never started are left untouched. Cancelling a
    /// terminal node does nothing, so teardown runs at most once.
    pub(crate) fn cancel(&mut self) {
        match self.state {
            NodeState::Finished | NodeState::Cancelled => return,
            NodeState::Pending => {
                self.state = NodeState::Cancelled;
                trace!(node = %self.name, "cancelled before start");
                return;
            }
            NodeState::Running => {}
        }

        if let ActionKind::Task(task) = &mut self.kind {
            task.end(true);
        }
        composite::cancel_running(self.children_mut());

        self.state = NodeState::Cancelled;
        debug!(node = %self.name, kind = self.kind.label(), "cancelled");
    }

    /// Returns this subtree to `Pending` for another activation.
    ///
    /// Only a repeating sequence re-activates its children.
    pub(crate) fn rearm(&mut self) {
        self.state = NodeState::Pending;
        self.started_at = None;
        if let ActionKind::Sequential(seq) | ActionKind::RepeatingSequence(seq) = &mut self.kind {
            seq.reset_cursor();
        }
        for child in self.children_mut() {
            child.rearm();
        }
    }
}

fn step_task(task: &mut dyn Task, first: bool, now: Duration, name: &str) -> Outcome {
    if first {
        task.start(now);
    }
    match task.poll(now) {
        TaskStatus::Running => Outcome::Running,
        TaskStatus::Finished => {
            task.end(false);
            Outcome::Finished
        }
        TaskStatus::Failed => {
            warn!(node = %name, "task failed");
            task.end(true);
            Outcome::Aborted
        }
    }
}

impl fmt::Debug for ActionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionNode")
            .field("name", &self.name)
            .field("kind", &self.kind.label())
            .field("state", &self.state)
            .field("requirements", &self.requirements)
            .field("children", &self.children())
            .finish()
    }
}
