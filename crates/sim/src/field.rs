//! Simulated drivetrain, path planner and driver-station collaborators.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use action_tree::builder::task;
use action_tree::{ActionNode, SubsystemId, Task, TaskStatus};
use robot_core::{
    Alliance, AllianceProvider, Drivetrain, OperatorFeedback, PathConstraints, PathPlanner,
    Pose2d, StatusColor, StatusSink, ids,
};
use tracing::debug;

use crate::proxies::{Command, CommandLog};

// ============================================================================
// Drivetrain
// ============================================================================

pub struct SimDrivetrain {
    distance: Mutex<f64>,
    lead: f64,
    turn_time: Duration,
    turn_failing: AtomicBool,
    log: Arc<CommandLog>,
}

impl SimDrivetrain {
    pub fn new(distance: f64, lead: f64, turn_time: f64, log: Arc<CommandLog>) -> Self {
        Self {
            distance: Mutex::new(distance),
            lead,
            turn_time: Duration::try_from_secs_f64(turn_time).unwrap_or_default(),
            turn_failing: AtomicBool::new(false),
            log,
        }
    }

    /// Makes newly built turns fail on their first poll.
    pub fn set_turn_failing(&self, failing: bool) {
        self.turn_failing.store(failing, Ordering::SeqCst);
    }

    /// Moves the robot to `distance` meters from the speaker.
    pub fn set_distance(&self, distance: f64) {
        *self.distance.lock().unwrap() = distance;
    }
}

impl Drivetrain for SimDrivetrain {
    fn id(&self) -> SubsystemId {
        ids::DRIVETRAIN
    }

    fn distance_to_target(&self) -> f64 {
        *self.distance.lock().unwrap()
    }

    fn predicted_distance(&self) -> f64 {
        self.distance_to_target() + self.lead
    }

    fn turn_in_place(&self) -> ActionNode {
        let turn = TurnTask {
            duration: self.turn_time,
            fail: self.turn_failing.load(Ordering::SeqCst),
            started: Duration::ZERO,
            log: Arc::clone(&self.log),
        };
        task("turn_in_place", turn).requiring(ids::DRIVETRAIN)
    }
}

struct TurnTask {
    duration: Duration,
    fail: bool,
    started: Duration,
    log: Arc<CommandLog>,
}

impl Task for TurnTask {
    fn start(&mut self, now: Duration) {
        self.started = now;
        self.log.record(Command::TurnStarted);
    }

    fn poll(&mut self, now: Duration) -> TaskStatus {
        if self.fail {
            TaskStatus::Failed
        } else if now.saturating_sub(self.started) >= self.duration {
            TaskStatus::Finished
        } else {
            TaskStatus::Running
        }
    }

    fn end(&mut self, interrupted: bool) {
        self.log.record(Command::TurnEnded { interrupted });
    }
}

// ============================================================================
// Path planner
// ============================================================================

/// Planner whose paths take a fixed time to drive.
///
/// With [`set_failing`](Self::set_failing) enabled, newly planned paths
/// fail halfway, as if the target became unreachable.
pub struct SimPathPlanner {
    path_time: Duration,
    failing: AtomicBool,
    log: Arc<CommandLog>,
}

impl SimPathPlanner {
    pub fn new(path_time: f64, log: Arc<CommandLog>) -> Self {
        Self {
            path_time: Duration::try_from_secs_f64(path_time).unwrap_or_default(),
            failing: AtomicBool::new(false),
            log,
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl PathPlanner for SimPathPlanner {
    fn plan_path(
        &self,
        target: Pose2d,
        constraints: PathConstraints,
        end_velocity: f64,
        rotation_delay_distance: f64,
    ) -> ActionNode {
        debug!(?target, ?constraints, end_velocity, rotation_delay_distance, "path planned");
        let path = PathTask {
            target,
            duration: self.path_time,
            fail: self.failing.load(Ordering::SeqCst),
            started: Duration::ZERO,
            failed: false,
            log: Arc::clone(&self.log),
        };
        task("follow_path", path).requiring(ids::DRIVETRAIN)
    }
}

struct PathTask {
    target: Pose2d,
    duration: Duration,
    fail: bool,
    started: Duration,
    failed: bool,
    log: Arc<CommandLog>,
}

impl Task for PathTask {
    fn start(&mut self, now: Duration) {
        self.started = now;
        self.log.record(Command::PathStarted(self.target));
    }

    fn poll(&mut self, now: Duration) -> TaskStatus {
        let elapsed = now.saturating_sub(self.started);
        if self.fail && elapsed >= self.duration / 2 {
            self.failed = true;
            self.log.record(Command::PathFailed);
            TaskStatus::Failed
        } else if elapsed >= self.duration {
            TaskStatus::Finished
        } else {
            TaskStatus::Running
        }
    }

    fn end(&mut self, interrupted: bool) {
        match (interrupted, self.failed) {
            (false, _) => self.log.record(Command::PathFinished),
            (true, false) => self.log.record(Command::PathInterrupted),
            (true, true) => {}
        }
    }
}

// ============================================================================
// Driver station
// ============================================================================

pub struct FixedAlliance(Mutex<Alliance>);

impl FixedAlliance {
    pub fn new(alliance: Alliance) -> Self {
        Self(Mutex::new(alliance))
    }

    pub fn set(&self, alliance: Alliance) {
        *self.0.lock().unwrap() = alliance;
    }
}

impl AllianceProvider for FixedAlliance {
    fn alliance(&self) -> Alliance {
        *self.0.lock().unwrap()
    }
}

/// LED strip. `None` is the default pattern.
pub struct SimStatus {
    color: Mutex<Option<StatusColor>>,
    log: Arc<CommandLog>,
}

impl SimStatus {
    pub fn new(log: Arc<CommandLog>) -> Self {
        Self {
            color: Mutex::new(None),
            log,
        }
    }

    pub fn color(&self) -> Option<StatusColor> {
        *self.color.lock().unwrap()
    }
}

impl StatusSink for SimStatus {
    fn set_color(&self, color: StatusColor) {
        *self.color.lock().unwrap() = Some(color);
        self.log.record(Command::Color(color));
    }

    fn set_default_color(&self) {
        *self.color.lock().unwrap() = None;
        self.log.record(Command::DefaultColor);
    }
}

pub struct SimFeedback {
    vibrating: AtomicBool,
    log: Arc<CommandLog>,
}

impl SimFeedback {
    pub fn new(log: Arc<CommandLog>) -> Self {
        Self {
            vibrating: AtomicBool::new(false),
            log,
        }
    }

    pub fn is_vibrating(&self) -> bool {
        self.vibrating.load(Ordering::SeqCst)
    }
}

impl OperatorFeedback for SimFeedback {
    fn start_vibrate(&self) {
        self.vibrating.store(true, Ordering::SeqCst);
        self.log.record(Command::VibrateStart);
    }

    fn stop_vibrate(&self) {
        self.vibrating.store(false, Ordering::SeqCst);
        self.log.record(Command::VibrateStop);
    }
}
