//! Fixed-rate scheduler for action trees.
//!
//! The scheduler owns every submitted root, steps each one once per
//! [`tick`](Scheduler::tick) in submission order, keeps the
//! [`ResourceRegistry`] in sync with what each root still needs, and tears
//! roots down on completion, cancellation or preemption.
//!
//! It is single-threaded and cooperative: nothing blocks, and all waiting is
//! expressed as nodes that are re-polled on the next tick.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::error::{Result, SchedulerError};
use crate::registry::ClaimResult;
use crate::{ActionNode, Clock, MonotonicClock, NodeState, ResourceRegistry, SubsystemId, TickContext};

/// Handle to a submitted root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(u64);

impl ActionId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

/// What to do when a submission needs a subsystem another root holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Cancel the older holder and admit the new root (last submitted wins).
    #[default]
    Preempt,
    /// Refuse the new root with [`SchedulerError::ResourceConflict`].
    Reject,
}

struct ActiveRoot {
    id: ActionId,
    node: ActionNode,
}

/// Steps active roots and arbitrates their subsystem claims.
pub struct Scheduler<K: Clock = MonotonicClock> {
    clock: K,
    policy: ConflictPolicy,
    roots: Vec<ActiveRoot>,
    registry: ResourceRegistry,
    next_id: u64,
    ticks: u64,
}

impl Default for Scheduler<MonotonicClock> {
    fn default() -> Self {
        Self::new(MonotonicClock::new())
    }
}

impl<K: Clock> Scheduler<K> {
    /// Creates a scheduler with the default preempt-on-submit policy.
    pub fn new(clock: K) -> Self {
        Self {
            clock,
            policy: ConflictPolicy::default(),
            roots: Vec::new(),
            registry: ResourceRegistry::new(),
            next_id: 1,
            ticks: 0,
        }
    }

    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// Current time on the scheduler's clock.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Registers `node` as an active root.
    ///
    /// The root claims the requirements of every non-terminal node in its
    /// tree. Under [`ConflictPolicy::Preempt`] conflicting holders are
    /// cancelled (and their claims released) before this returns; the new
    /// root is first stepped on the next [`tick`](Self::tick).
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::ResourceConflict`] under
    /// [`ConflictPolicy::Reject`] if any requirement is held by another
    /// root. Nothing is changed in that case.
    pub fn submit(&mut self, node: ActionNode) -> Result<ActionId> {
        let requirements = node.claimed_requirements();
        let conflicts = self.registry.conflicts(&requirements, None);

        if let Some(&(subsystem, held_by)) = conflicts.first() {
            match self.policy {
                ConflictPolicy::Reject => {
                    warn!(
                        name = node.name(),
                        %subsystem,
                        %held_by,
                        "submission rejected: subsystem in use"
                    );
                    return Err(SchedulerError::ResourceConflict { subsystem, held_by });
                }
                ConflictPolicy::Preempt => {
                    let mut holders: Vec<ActionId> =
                        conflicts.iter().map(|(_, holder)| *holder).collect();
                    holders.sort();
                    holders.dedup();
                    for holder in holders {
                        info!(preempted = %holder, by = node.name(), "preempting older behavior");
                        self.cancel(holder);
                    }
                }
            }
        }

        let id = ActionId(self.next_id);
        self.next_id += 1;
        for subsystem in &requirements {
            if let ClaimResult::Rejected { held_by } = self.registry.try_claim(*subsystem, id) {
                // preemption above cleared every conflicting claim
                warn!(%subsystem, %held_by, "claim still held after preemption");
            }
        }

        info!(action = %id, name = node.name(), ?requirements, "behavior submitted");
        self.roots.push(ActiveRoot { id, node });
        Ok(id)
    }

    /// Advances every active root by exactly one step.
    ///
    /// After a root is stepped, claims it no longer needs are released.
    /// Roots that reached `Finished` or `Cancelled` release everything and
    /// are dropped. Trees spawned by detached nodes are submitted after all
    /// roots have been stepped.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.ticks += 1;
        let mut ctx = TickContext::new(now);
        trace!(tick = self.ticks, now_ms = now.as_millis() as u64, roots = self.roots.len(), "tick");

        for root in &mut self.roots {
            let state = root.node.step(&mut ctx);
            if state.is_terminal() {
                let released = self.registry.release_all(root.id);
                info!(action = %root.id, name = root.node.name(), ?state, ?released, "behavior ended");
            } else {
                let live = root.node.claimed_requirements();
                let released = self.registry.retain(root.id, &live);
                if !released.is_empty() {
                    debug!(action = %root.id, ?released, "requirements released");
                }
            }
        }
        self.roots.retain(|root| !root.node.state().is_terminal());

        for node in ctx.take_spawned() {
            if let Err(err) = self.submit(node) {
                warn!(%err, "detached behavior not started");
            }
        }
    }

    /// Cancels an active root and releases its claims.
    ///
    /// Returns `false` if `id` is not active (already ended or unknown),
    /// in which case nothing happens.
    pub fn cancel(&mut self, id: ActionId) -> bool {
        let Some(index) = self.roots.iter().position(|root| root.id == id) else {
            return false;
        };

        let mut root = self.roots.remove(index);
        root.node.cancel();
        let released = self.registry.release_all(id);
        info!(action = %id, name = root.node.name(), ?released, "behavior cancelled");
        true
    }

    /// Cancels every active root, most recent first.
    pub fn cancel_all(&mut self) {
        let ids: Vec<ActionId> = self.roots.iter().rev().map(|root| root.id).collect();
        for id in ids {
            self.cancel(id);
        }
    }

    pub fn is_active(&self, id: ActionId) -> bool {
        self.roots.iter().any(|root| root.id == id)
    }

    /// State of an active root's top node.
    pub fn state(&self, id: ActionId) -> Option<NodeState> {
        self.root(id).map(ActionNode::state)
    }

    /// An active root's tree, for inspection.
    pub fn root(&self, id: ActionId) -> Option<&ActionNode> {
        self.roots
            .iter()
            .find(|root| root.id == id)
            .map(|root| &root.node)
    }

    /// The root currently claiming `subsystem`.
    pub fn holder(&self, subsystem: SubsystemId) -> Option<ActionId> {
        self.registry.holder(subsystem)
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn active_count(&self) -> usize {
        self.roots.len()
    }

    /// Active roots in submission order.
    pub fn active(&self) -> Vec<(ActionId, &str)> {
        self.roots
            .iter()
            .map(|root| (root.id, root.node.name()))
            .collect()
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
