//! Composite action nodes.
//!
//! Composites control when their children start and what it means for the
//! group to be done: [`Sequential`] (one after another), parallel (all must
//! finish), race (first to finish wins), and a repeating sequence that never
//! finishes on its own.
//!
//! # Failure
//!
//! A child that ends `Cancelled` on its own aborts the composite. The
//! composite cancels whatever else is still running and becomes `Cancelled`
//! itself, so collaborator failures surface as ordinary cancellation. The
//! abort stops at the nearest [`Timeout`](crate::Timeout), which finishes
//! instead.

use tracing::trace;

use crate::state::Outcome;
use crate::{ActionNode, NodeState, TickContext};

/// Ordered children plus a cursor at the current child.
///
/// Used by both `Sequential` and `RepeatingSequence` kinds.
///
/// # Semantics
///
/// - Only the child under the cursor is stepped
/// - When it finishes, the next child is stepped in the same tick
/// - The sequence finishes after its last child; an empty sequence
///   finishes on its first tick
/// - Children after the cursor never start if the sequence is cancelled
pub struct Sequential {
    children: Vec<ActionNode>,
    current: usize,
}

impl Sequential {
    pub fn new(children: Vec<ActionNode>) -> Self {
        Self {
            children,
            current: 0,
        }
    }

    pub fn children(&self) -> &[ActionNode] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut [ActionNode] {
        &mut self.children
    }

    /// Index of the child currently being run.
    pub fn current(&self) -> usize {
        self.current
    }

    pub(crate) fn reset_cursor(&mut self) {
        self.current = 0;
    }

    pub(crate) fn step(&mut self, ctx: &mut TickContext) -> Outcome {
        while let Some(child) = self.children.get_mut(self.current) {
            match child.step(ctx) {
                NodeState::Finished => self.current += 1,
                NodeState::Cancelled => return Outcome::Aborted,
                NodeState::Pending | NodeState::Running => return Outcome::Running,
            }
        }
        Outcome::Finished
    }

    /// Steps as a sequence that starts over once it completes.
    ///
    /// A completed iteration is restarted on the following tick, so a loop
    /// made only of instant children advances one lap per tick.
    pub(crate) fn step_repeating(&mut self, ctx: &mut TickContext) -> Outcome {
        if self.current >= self.children.len() {
            self.current = 0;
            for child in &mut self.children {
                child.rearm();
            }
            trace!(children = self.children.len(), "repeating sequence restarted");
        }

        match self.step(ctx) {
            Outcome::Finished => Outcome::Running,
            other => other,
        }
    }
}

/// Steps every unfinished child in declared order.
///
/// Finishes once all children have finished; never earlier.
pub(crate) fn step_parallel(children: &mut [ActionNode], ctx: &mut TickContext) -> Outcome {
    let mut all_finished = true;
    for index in 0..children.len() {
        match children[index].step(ctx) {
            NodeState::Finished => {}
            NodeState::Cancelled => {
                cancel_running(children);
                return Outcome::Aborted;
            }
            NodeState::Pending | NodeState::Running => all_finished = false,
        }
    }

    if all_finished {
        Outcome::Finished
    } else {
        Outcome::Running
    }
}

/// Steps every child in declared order; the first to finish wins.
///
/// All children are stepped each tick before the winner is picked, so
/// every child starts on the first tick even if an earlier one finishes
/// at once. Ties go to the earliest child in declared order; every other
/// running child is then cancelled. An empty race finishes immediately.
pub(crate) fn step_race(children: &mut [ActionNode], ctx: &mut TickContext) -> Outcome {
    if children.is_empty() {
        return Outcome::Finished;
    }

    let mut winner = None;
    for index in 0..children.len() {
        match children[index].step(ctx) {
            NodeState::Finished => {
                winner.get_or_insert(index);
            }
            NodeState::Cancelled => {
                cancel_running(children);
                return Outcome::Aborted;
            }
            NodeState::Pending | NodeState::Running => {}
        }
    }

    match winner {
        Some(index) => {
            trace!(winner = children[index].name(), "race decided");
            cancel_running(children);
            Outcome::Finished
        }
        None => Outcome::Running,
    }
}

/// Cancels every child that has started and not yet ended.
pub(crate) fn cancel_running(children: &mut [ActionNode]) {
    for child in children.iter_mut().filter(|child| child.state().is_running()) {
        child.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::builder::{instant, parallel, race, repeating, sequence, start_end, wait_until};
    use crate::{NodeState, TickContext};

    fn ctx(ms: u64) -> TickContext {
        TickContext::new(Duration::from_millis(ms))
    }

    fn flag() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(false))
    }

    #[test]
    fn sequence_runs_children_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let gate = flag();

        let (a, b) = (log.clone(), log.clone());
        let open = gate.clone();
        let mut seq = sequence(vec![
            instant("first", move || a.lock().unwrap().push("first")),
            wait_until("gate", move || open.load(Ordering::SeqCst)),
            instant("second", move || b.lock().unwrap().push("second")),
        ]);

        assert_eq!(seq.step(&mut ctx(0)), NodeState::Running);
        assert_eq!(*log.lock().unwrap(), vec!["first"]);
        assert_eq!(seq.children()[2].state(), NodeState::Pending);

        gate.store(true, Ordering::SeqCst);
        assert_eq!(seq.step(&mut ctx(20)), NodeState::Finished);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
        assert_eq!(seq.children()[2].started_at(), Some(Duration::from_millis(20)));
    }

    #[test]
    fn empty_sequence_finishes_immediately() {
        let mut seq = sequence(Vec::new());
        assert_eq!(seq.step(&mut ctx(0)), NodeState::Finished);
    }

    #[test]
    fn cancelled_sequence_leaves_later_children_unstarted() {
        let stops = Arc::new(AtomicU32::new(0));
        let counter = stops.clone();
        let mut seq = sequence(vec![
            instant("done", || {}),
            start_end("hold", || {}, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
            instant("never", || panic!("must not run")),
        ]);

        seq.step(&mut ctx(0));
        seq.cancel();

        assert_eq!(seq.state(), NodeState::Cancelled);
        assert_eq!(seq.children()[0].state(), NodeState::Finished);
        assert_eq!(seq.children()[1].state(), NodeState::Cancelled);
        assert_eq!(seq.children()[2].state(), NodeState::Pending);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn parallel_waits_for_every_child() {
        let left = flag();
        let right = flag();
        let (l, r) = (left.clone(), right.clone());
        let mut group = parallel(vec![
            wait_until("left", move || l.load(Ordering::SeqCst)),
            wait_until("right", move || r.load(Ordering::SeqCst)),
        ]);

        assert_eq!(group.step(&mut ctx(0)), NodeState::Running);
        left.store(true, Ordering::SeqCst);
        assert_eq!(group.step(&mut ctx(20)), NodeState::Running);
        assert_eq!(group.children()[0].state(), NodeState::Finished);

        right.store(true, Ordering::SeqCst);
        assert_eq!(group.step(&mut ctx(40)), NodeState::Finished);
    }

    #[test]
    fn parallel_starts_children_in_the_same_tick() {
        let mut group = parallel(vec![
            wait_until("a", || false),
            wait_until("b", || false),
        ]);

        group.step(&mut ctx(60));
        for child in group.children() {
            assert_eq!(child.started_at(), Some(Duration::from_millis(60)));
        }
    }

    #[test]
    fn race_cancels_losers() {
        let stops = Arc::new(AtomicU32::new(0));
        let counter = stops.clone();
        let done = flag();
        let finish = done.clone();
        let mut group = race(vec![
            start_end("loser", || {}, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
            wait_until("winner", move || finish.load(Ordering::SeqCst)),
        ]);

        assert_eq!(group.step(&mut ctx(0)), NodeState::Running);
        done.store(true, Ordering::SeqCst);
        assert_eq!(group.step(&mut ctx(20)), NodeState::Finished);
        assert_eq!(group.children()[0].state(), NodeState::Cancelled);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn race_starts_every_child_even_when_one_finishes_at_once() {
        let stops = Arc::new(AtomicU32::new(0));
        let counter = stops.clone();
        let mut group = race(vec![
            instant("quick", || {}),
            start_end("slow", || {}, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        ]);

        assert_eq!(group.step(&mut ctx(0)), NodeState::Finished);
        assert_eq!(group.children()[0].state(), NodeState::Finished);
        // started, then cancelled as the loser
        assert_eq!(group.children()[1].state(), NodeState::Cancelled);
        assert!(group.children()[1].started_at().is_some());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn repeating_sequence_never_finishes() {
        let laps = Arc::new(AtomicU32::new(0));
        let counter = laps.clone();
        let mut looped = repeating(vec![instant("lap", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })]);

        for tick in 0..5 {
            assert_eq!(looped.step(&mut ctx(tick * 20)), NodeState::Running);
        }
        assert_eq!(laps.load(Ordering::SeqCst), 5);

        looped.cancel();
        assert_eq!(looped.state(), NodeState::Cancelled);
    }
}
