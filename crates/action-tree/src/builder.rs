//! Builder utilities for ergonomic action tree construction.
//!
//! Instead of writing `ActionNode::new("sequence",
//! ActionKind::Sequential(Sequential::new(vec![...])))`, use the shorter
//! functions here, e.g. `sequence(vec![...])`. Composites get a generic
//! name; rename them with [`ActionNode::named`].

use std::borrow::Cow;
use std::time::Duration;

use crate::composite::Sequential;
use crate::decorator::{Detached, Timeout};
use crate::task::StartEnd;
use crate::{ActionKind, ActionNode, Task};

/// Creates an instant node that runs `effect` once.
#[inline]
pub fn instant<F>(name: impl Into<Cow<'static, str>>, effect: F) -> ActionNode
where
    F: FnMut() + Send + 'static,
{
    ActionNode::new(name, ActionKind::Instant(Box::new(effect)))
}

/// Creates a node that finishes the first tick `predicate` holds.
#[inline]
pub fn wait_until<F>(name: impl Into<Cow<'static, str>>, predicate: F) -> ActionNode
where
    F: FnMut() -> bool + Send + 'static,
{
    ActionNode::new(name, ActionKind::WaitUntil(Box::new(predicate)))
}

/// Wraps a collaborator [`Task`] as a leaf node.
#[inline]
pub fn task<T>(name: impl Into<Cow<'static, str>>, task: T) -> ActionNode
where
    T: Task + 'static,
{
    ActionNode::new(name, ActionKind::Task(Box::new(task)))
}

/// Creates a leaf that runs `start` once, holds, and runs `end` when stopped.
#[inline]
pub fn start_end<S, E>(name: impl Into<Cow<'static, str>>, start: S, end: E) -> ActionNode
where
    S: FnMut() + Send + 'static,
    E: FnMut() + Send + 'static,
{
    task(name, StartEnd::new(start, end))
}

/// Creates a sequential node.
#[inline]
pub fn sequence(children: Vec<ActionNode>) -> ActionNode {
    ActionNode::new("sequence", ActionKind::Sequential(Sequential::new(children)))
}

/// Creates a parallel node that finishes when every child has.
#[inline]
pub fn parallel(children: Vec<ActionNode>) -> ActionNode {
    ActionNode::new("parallel", ActionKind::Parallel(children))
}

/// Creates a racing node that finishes when the first child does.
#[inline]
pub fn race(children: Vec<ActionNode>) -> ActionNode {
    ActionNode::new("race", ActionKind::RacingParallel(children))
}

/// Creates a repeating sequence that only ends when cancelled.
#[inline]
pub fn repeating(children: Vec<ActionNode>) -> ActionNode {
    ActionNode::new(
        "repeating",
        ActionKind::RepeatingSequence(Sequential::new(children)),
    )
}

/// Bounds `inner` by `duration`.
#[inline]
pub fn timeout(inner: ActionNode, duration: Duration) -> ActionNode {
    ActionNode::new("timeout", ActionKind::Timeout(Timeout::new(inner, duration)))
}

/// Waits for `duration`.
///
/// A timeout around a wait that never holds.
#[inline]
pub fn delay(duration: Duration) -> ActionNode {
    timeout(wait_until("wait", || false), duration).named("delay")
}

/// Submits `inner` as its own root and finishes immediately.
#[inline]
pub fn detached(inner: ActionNode) -> ActionNode {
    ActionNode::new("detached", ActionKind::Detached(Detached::new(inner)))
}

/// Like [`detached`], building a fresh tree on every activation.
#[inline]
pub fn detached_with<F>(factory: F) -> ActionNode
where
    F: FnMut() -> ActionNode + Send + 'static,
{
    ActionNode::new(
        "detached",
        ActionKind::Detached(Detached::with_factory(factory)),
    )
}
