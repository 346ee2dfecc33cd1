//! Simulated subsystem proxies.
//!
//! Each proxy models its mechanism as a first-order [`Axis`] that slews
//! toward its target at a fixed rate. Physics only advances in
//! [`SimRobot::step`], which the runner calls once per period before the
//! scheduler ticks, so proxies never move in the middle of a tick.
//!
//! Every command a proxy receives is appended to a shared [`CommandLog`]
//! with the simulated time it arrived.

mod amp;
mod climber;
mod intake;
mod shooter;

pub use amp::SimAmp;
pub use climber::SimClimber;
pub use intake::SimIntake;
pub use shooter::SimShooter;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use action_tree::{Clock, ManualClock};
use robot_core::{Alliance, Pose2d, Robot, StatusColor};

use crate::field::{FixedAlliance, SimDrivetrain, SimFeedback, SimPathPlanner, SimStatus};

/// A command observed by a simulated proxy or collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ClimberTarget(f64),
    ClimberOutput(f64),
    ClimberReset,
    ShooterTarget { left: f64, right: f64 },
    ShooterOutput(f64),
    IntakeOutput(f64),
    AmpTarget(f64),
    Color(StatusColor),
    DefaultColor,
    VibrateStart,
    VibrateStop,
    PathStarted(Pose2d),
    PathFinished,
    PathFailed,
    PathInterrupted,
    TurnStarted,
    TurnEnded { interrupted: bool },
}

/// Time-stamped record of every command, in arrival order.
pub struct CommandLog {
    clock: ManualClock,
    entries: Mutex<Vec<(Duration, Command)>>,
}

impl CommandLog {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn record(&self, command: Command) {
        let now = self.clock.now();
        self.entries.lock().unwrap().push((now, command));
    }

    pub fn entries(&self) -> Vec<(Duration, Command)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.entries().into_iter().map(|(_, command)| command).collect()
    }

    /// Time of the first entry matching `predicate`.
    pub fn first_time<F>(&self, mut predicate: F) -> Option<Duration>
    where
        F: FnMut(&Command) -> bool,
    {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|(_, command)| predicate(command))
            .map(|(at, _)| *at)
    }

    /// Index of the first entry matching `predicate`.
    pub fn position<F>(&self, predicate: F) -> Option<usize>
    where
        F: FnMut(&Command) -> bool,
    {
        self.commands().iter().position(predicate)
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

/// First-order mechanism model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub position: f64,
    pub target: f64,
    /// Units per second.
    pub rate: f64,
    pub tolerance: f64,
}

impl Axis {
    pub const fn new(rate: f64, tolerance: f64) -> Self {
        Self {
            position: 0.0,
            target: 0.0,
            rate,
            tolerance,
        }
    }

    pub fn step(&mut self, dt: Duration) {
        let max_move = self.rate * dt.as_secs_f64();
        let error = self.target - self.position;
        if error.abs() <= max_move {
            self.position = self.target;
        } else {
            self.position += max_move.copysign(error);
        }
    }

    pub fn at_target(&self) -> bool {
        (self.target - self.position).abs() <= self.tolerance
    }
}

/// Mechanism rates and tolerances for the simulated robot.
#[derive(Debug, Clone, PartialEq)]
pub struct SimTuning {
    pub climber: Axis,
    pub climber_interpolation: f64,
    pub shooter: Axis,
    pub shooter_max_rpm: f64,
    pub amp: Axis,
    /// Seconds a planned path takes to drive.
    pub path_time: f64,
    /// Seconds a turn-in-place takes.
    pub turn_time: f64,
    /// Distance to the speaker, in meters.
    pub distance: f64,
    /// Distance added by the robot's motion when predicting.
    pub distance_lead: f64,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            climber: Axis::new(1.0, 0.02),
            climber_interpolation: 0.15,
            shooter: Axis::new(6000.0, 50.0),
            shooter_max_rpm: 5500.0,
            amp: Axis::new(2.0, 0.02),
            path_time: 1.5,
            turn_time: 0.4,
            distance: 3.0,
            distance_lead: 0.0,
        }
    }
}

/// The whole simulated robot.
///
/// Concrete handles are kept alongside the [`Robot`] bundle so tests and
/// the runner can inspect and perturb state the behavior library cannot
/// see.
pub struct SimRobot {
    pub clock: ManualClock,
    pub log: Arc<CommandLog>,
    pub climber: Arc<SimClimber>,
    pub shooter: Arc<SimShooter>,
    pub intake: Arc<SimIntake>,
    pub amp: Arc<SimAmp>,
    pub drivetrain: Arc<SimDrivetrain>,
    pub path_planner: Arc<SimPathPlanner>,
    pub alliance: Arc<FixedAlliance>,
    pub status: Arc<SimStatus>,
    pub feedback: Arc<SimFeedback>,
}

impl SimRobot {
    pub fn new(clock: ManualClock, alliance: Alliance) -> Self {
        Self::with_tuning(clock, alliance, SimTuning::default())
    }

    pub fn with_tuning(clock: ManualClock, alliance: Alliance, tuning: SimTuning) -> Self {
        let log = Arc::new(CommandLog::new(clock.clone()));
        Self {
            climber: Arc::new(SimClimber::new(
                tuning.climber,
                tuning.climber_interpolation,
                Arc::clone(&log),
            )),
            shooter: Arc::new(SimShooter::new(
                tuning.shooter,
                tuning.shooter_max_rpm,
                Arc::clone(&log),
            )),
            intake: Arc::new(SimIntake::new(Arc::clone(&log))),
            amp: Arc::new(SimAmp::new(tuning.amp, Arc::clone(&log))),
            drivetrain: Arc::new(SimDrivetrain::new(
                tuning.distance,
                tuning.distance_lead,
                tuning.turn_time,
                Arc::clone(&log),
            )),
            path_planner: Arc::new(SimPathPlanner::new(tuning.path_time, Arc::clone(&log))),
            alliance: Arc::new(FixedAlliance::new(alliance)),
            status: Arc::new(SimStatus::new(Arc::clone(&log))),
            feedback: Arc::new(SimFeedback::new(Arc::clone(&log))),
            clock,
            log,
        }
    }

    /// Handle bundle for the behavior library.
    pub fn robot(&self) -> Robot {
        Robot {
            climber: self.climber.clone(),
            shooter: self.shooter.clone(),
            intake: self.intake.clone(),
            amp: self.amp.clone(),
            drivetrain: self.drivetrain.clone(),
            path_planner: self.path_planner.clone(),
            alliance: self.alliance.clone(),
            status: self.status.clone(),
            feedback: self.feedback.clone(),
        }
    }

    /// Advances every mechanism by `dt`.
    pub fn step(&self, dt: Duration) {
        self.climber.step(dt);
        self.shooter.step(dt);
        self.amp.step(dt);
    }
}
