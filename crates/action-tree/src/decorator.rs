//! Decorator action nodes.
//!
//! Decorators wrap a single inner node and change how long it may run or
//! where it runs: [`Timeout`] (time bound) and [`Detached`] (fire-and-forget
//! onto its own root).

use std::time::Duration;

use tracing::debug;

use crate::state::Outcome;
use crate::{ActionNode, NodeState, TickContext};

/// Bounds an inner node by a duration measured from the timeout's first tick.
///
/// # Semantics
///
/// - If the inner node finishes first, the timeout finishes
/// - On the first tick where `elapsed >= duration`, the inner node is
///   cancelled (same teardown as an external cancel) and the timeout
///   finishes
/// - Expiry is checked before the inner node is stepped, so an expired
///   inner node never gets an extra tick
/// - If the inner node aborts, the timeout still finishes: a bounded step
///   that gives up early ends like one that ran out of time, and the
///   enclosing behavior carries on
pub struct Timeout {
    inner: Box<ActionNode>,
    duration: Duration,
}

impl Timeout {
    pub fn new(inner: ActionNode, duration: Duration) -> Self {
        Self {
            inner: Box::new(inner),
            duration,
        }
    }

    pub fn inner(&self) -> &ActionNode {
        &self.inner
    }

    pub(crate) fn inner_mut(&mut self) -> &mut ActionNode {
        &mut self.inner
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub(crate) fn step(&mut self, started_at: Duration, ctx: &mut TickContext) -> Outcome {
        let elapsed = ctx.now().saturating_sub(started_at);
        if elapsed >= self.duration {
            if !self.inner.state().is_terminal() {
                debug!(
                    node = self.inner.name(),
                    limit_ms = self.duration.as_millis() as u64,
                    "timed out"
                );
            }
            self.inner.cancel();
            return Outcome::Finished;
        }

        match self.inner.step(ctx) {
            NodeState::Finished => Outcome::Finished,
            NodeState::Cancelled => {
                debug!(node = self.inner.name(), "bounded step aborted; continuing");
                Outcome::Finished
            }
            NodeState::Pending | NodeState::Running => Outcome::Running,
        }
    }
}

/// Where a detached node gets the tree it submits.
enum Spawn {
    /// A single prebuilt tree, consumed on first activation.
    Once(Option<Box<ActionNode>>),
    /// Builds a fresh tree on every activation.
    Factory(Box<dyn FnMut() -> ActionNode + Send>),
}

/// Submits its inner tree as an independent root and finishes at once.
///
/// The detached tree's lifetime is decoupled from the parent: cancelling
/// the parent does not cancel it, and it is subject to the scheduler's
/// conflict policy like any other submission.
pub struct Detached {
    spawn: Spawn,
}

impl Detached {
    pub fn new(inner: ActionNode) -> Self {
        Self {
            spawn: Spawn::Once(Some(Box::new(inner))),
        }
    }

    /// Builds the detached tree anew each time the node runs.
    ///
    /// Use this inside repeating sequences, where a prebuilt tree could only
    /// be submitted once.
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: FnMut() -> ActionNode + Send + 'static,
    {
        Self {
            spawn: Spawn::Factory(Box::new(factory)),
        }
    }

    /// The prebuilt tree, if it has not been submitted yet.
    pub fn pending_inner(&self) -> Option<&ActionNode> {
        match &self.spawn {
            Spawn::Once(inner) => inner.as_deref(),
            Spawn::Factory(_) => None,
        }
    }

    pub(crate) fn step(&mut self, ctx: &mut TickContext) -> Outcome {
        match &mut self.spawn {
            Spawn::Once(inner) => match inner.take() {
                Some(node) => ctx.spawn(*node),
                None => debug!("detached tree already submitted; skipping"),
            },
            Spawn::Factory(factory) => ctx.spawn(factory()),
        }
        Outcome::Finished
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use crate::builder::{
        delay, detached, detached_with, instant, parallel, sequence, start_end, task, timeout,
        wait_until,
    };
    use crate::{NodeState, Task, TaskStatus, TickContext};

    fn ctx(ms: u64) -> TickContext {
        TickContext::new(Duration::from_millis(ms))
    }

    struct GiveUp;

    impl Task for GiveUp {
        fn poll(&mut self, _now: Duration) -> TaskStatus {
            TaskStatus::Failed
        }
    }

    #[test]
    fn timeout_finishes_when_inner_finishes() {
        let mut node = timeout(instant("quick", || {}), Duration::from_secs(1));
        assert_eq!(node.step(&mut ctx(0)), NodeState::Finished);
        assert_eq!(node.children()[0].state(), NodeState::Finished);
    }

    #[test]
    fn timeout_cancels_inner_on_expiry() {
        let stops = Arc::new(AtomicU32::new(0));
        let counter = stops.clone();
        let mut node = timeout(
            start_end("hold", || {}, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
            Duration::from_millis(100),
        );

        assert_eq!(node.step(&mut ctx(1000)), NodeState::Running);
        assert_eq!(node.step(&mut ctx(1080)), NodeState::Running);
        assert_eq!(node.step(&mut ctx(1100)), NodeState::Finished);
        assert_eq!(node.children()[0].state(), NodeState::Cancelled);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn timeout_finishes_when_inner_fails() {
        let mut node = timeout(task("turn", GiveUp), Duration::from_secs(1));
        assert_eq!(node.step(&mut ctx(0)), NodeState::Finished);
        assert_eq!(node.children()[0].state(), NodeState::Cancelled);
    }

    #[test]
    fn failure_inside_a_timeout_lets_the_sequence_continue() {
        let tail = Arc::new(AtomicU32::new(0));
        let counter = tail.clone();
        let mut node = sequence(vec![
            parallel(vec![timeout(task("turn", GiveUp), Duration::from_secs(1))]),
            instant("stow", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        ]);

        for ms in (0..100).step_by(20) {
            node.step(&mut ctx(ms));
        }
        assert_eq!(node.state(), NodeState::Finished);
        assert_eq!(tail.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn delay_is_a_bounded_wait() {
        let mut node = delay(Duration::from_millis(350));
        assert_eq!(node.deadline(), Some(Duration::from_millis(350)));

        let mut now = 0;
        while node.step(&mut ctx(now)) == NodeState::Running {
            now += 10;
        }
        assert_eq!(now, 350);
    }

    #[test]
    fn zero_timeout_never_starts_inner() {
        let mut node = timeout(wait_until("never", || false), Duration::ZERO);
        assert_eq!(node.step(&mut ctx(0)), NodeState::Finished);
        assert_eq!(node.children()[0].state(), NodeState::Cancelled);
        assert_eq!(node.children()[0].started_at(), None);
    }

    #[test]
    fn detached_hands_inner_to_the_tick() {
        let mut node = detached(instant("spawned", || {}));
        let mut tick = ctx(0);

        assert_eq!(node.step(&mut tick), NodeState::Finished);
        let spawned = tick.take_spawned();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].name(), "spawned");
        assert_eq!(spawned[0].state(), NodeState::Pending);
    }

    #[test]
    fn detached_factory_builds_each_activation() {
        let builds = Arc::new(AtomicU32::new(0));
        let counter = builds.clone();
        let mut node = detached_with(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            instant("fresh", || {})
        });

        let mut tick = ctx(0);
        node.step(&mut tick);
        node.rearm();
        node.step(&mut tick);

        assert_eq!(tick.take_spawned().len(), 2);
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }
}
