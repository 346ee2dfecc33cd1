//! Collaborator-implemented leaf actions.
//!
//! A [`Task`] is the seam for work this crate does not implement itself:
//! path following, drivetrain turns, or any leaf that needs its own
//! start/stop hooks. The scheduler drives it like any other leaf.

use std::time::Duration;

/// Status reported by a task on each poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Still working; poll again next tick.
    Running,

    /// Done; the node becomes `Finished`.
    Finished,

    /// Gave up; the node becomes `Cancelled` and its parent aborts.
    Failed,
}

/// A leaf whose lifecycle is owned by an external collaborator.
///
/// # Lifecycle
///
/// - [`start`](Task::start) runs once, on the node's first tick
/// - [`poll`](Task::poll) runs every tick including the first
/// - [`end`](Task::end) runs exactly once per activation: with
///   `interrupted == false` after `Finished`, with `true` after `Failed` or
///   cancellation. A task cancelled before it started is never ended.
pub trait Task: Send {
    fn start(&mut self, _now: Duration) {}

    fn poll(&mut self, now: Duration) -> TaskStatus;

    fn end(&mut self, _interrupted: bool) {}
}

/// Runs `start` on the first tick, never finishes, runs `end` when stopped.
///
/// Pair with a timeout for pulses:
///
/// ```rust,ignore
/// timeout(start_end("vibrate", start, stop), Duration::from_secs(1))
/// ```
pub struct StartEnd<S, E> {
    start: S,
    end: E,
}

impl<S, E> StartEnd<S, E>
where
    S: FnMut() + Send,
    E: FnMut() + Send,
{
    pub fn new(start: S, end: E) -> Self {
        Self { start, end }
    }
}

impl<S, E> Task for StartEnd<S, E>
where
    S: FnMut() + Send,
    E: FnMut() + Send,
{
    fn start(&mut self, _now: Duration) {
        (self.start)();
    }

    fn poll(&mut self, _now: Duration) -> TaskStatus {
        TaskStatus::Running
    }

    fn end(&mut self, _interrupted: bool) {
        (self.end)();
    }
}
