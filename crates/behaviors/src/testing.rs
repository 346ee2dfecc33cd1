//! Recording stubs for unit tests.
//!
//! Every proxy writes into one shared [`StubLog`], so tests can assert the
//! global order of commands across subsystems.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use action_tree::builder::instant;
use action_tree::{ActionNode, ManualClock, Scheduler, SubsystemId};
use robot_core::{
    Alliance, AllianceProvider, Climber, Drivetrain, Intake, OperatorFeedback, PathConstraints,
    PathPlanner, Pose2d, Robot, Shooter, StatusColor, StatusSink, SubsystemProxy, ids,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ClimberActuate(f64),
    ClimberOutput(f64),
    ClimberReset,
    ShooterActuate(f64),
    ShooterSpin(f64, f64),
    ShooterOutput(f64),
    IntakeOutput(f64),
    AmpActuate(f64),
    Color(StatusColor),
    DefaultColor,
    VibrateStart,
    VibrateStop,
    PathPlanned(Pose2d),
    PathRun,
    Turn,
}

#[derive(Default)]
pub struct StubLog {
    calls: Mutex<Vec<Call>>,
    climber_ready: AtomicBool,
    shooter_ready: AtomicBool,
    amp_ready: AtomicBool,
    alliance: Mutex<Alliance>,
}

impl StubLog {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_climber_ready(&self, ready: bool) {
        self.climber_ready.store(ready, Ordering::SeqCst);
    }

    pub fn set_shooter_ready(&self, ready: bool) {
        self.shooter_ready.store(ready, Ordering::SeqCst);
    }

    pub fn set_amp_ready(&self, ready: bool) {
        self.amp_ready.store(ready, Ordering::SeqCst);
    }

    pub fn set_all_ready(&self) {
        self.set_climber_ready(true);
        self.set_shooter_ready(true);
        self.set_amp_ready(true);
    }

    pub fn set_alliance(&self, alliance: Alliance) {
        *self.alliance.lock().unwrap() = alliance;
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

struct Stub {
    id: SubsystemId,
    log: Arc<StubLog>,
}

impl Stub {
    fn ready(&self) -> bool {
        let flag = match self.id {
            ids::CLIMBER => &self.log.climber_ready,
            ids::SHOOTER => &self.log.shooter_ready,
            ids::AMP => &self.log.amp_ready,
            _ => return true,
        };
        flag.load(Ordering::SeqCst)
    }
}

impl SubsystemProxy for Stub {
    fn id(&self) -> SubsystemId {
        self.id
    }

    fn actuate(&self, target: f64) {
        let call = match self.id {
            ids::CLIMBER => Call::ClimberActuate(target),
            ids::SHOOTER => Call::ShooterActuate(target),
            ids::AMP => Call::AmpActuate(target),
            _ => Call::IntakeOutput(target),
        };
        self.log.push(call);
    }

    fn is_at_setpoint(&self) -> bool {
        self.ready()
    }

    fn reset(&self) {
        self.log.push(Call::ClimberReset);
    }
}

impl Climber for Stub {
    fn set_output(&self, power: f64) {
        self.log.push(Call::ClimberOutput(power));
    }

    fn interpolate(&self, distance: f64) -> f64 {
        distance / 10.0
    }
}

impl Shooter for Stub {
    fn spin(&self, left_rpm: f64, right_rpm: f64) {
        self.log.push(Call::ShooterSpin(left_rpm, right_rpm));
    }

    fn set_output(&self, power: f64) {
        self.log.push(Call::ShooterOutput(power));
    }
}

impl Intake for Stub {
    fn set_output(&self, power: f64) {
        self.log.push(Call::IntakeOutput(power));
    }
}

struct StubField(Arc<StubLog>);

impl Drivetrain for StubField {
    fn id(&self) -> SubsystemId {
        ids::DRIVETRAIN
    }

    fn distance_to_target(&self) -> f64 {
        4.0
    }

    fn predicted_distance(&self) -> f64 {
        6.0
    }

    fn turn_in_place(&self) -> ActionNode {
        let log = Arc::clone(&self.0);
        instant("turn_in_place", move || log.push(Call::Turn)).requiring(ids::DRIVETRAIN)
    }
}

impl PathPlanner for StubField {
    fn plan_path(
        &self,
        target: Pose2d,
        _constraints: PathConstraints,
        _end_velocity: f64,
        _rotation_delay_distance: f64,
    ) -> ActionNode {
        self.0.push(Call::PathPlanned(target));
        let log = Arc::clone(&self.0);
        instant("follow_path", move || log.push(Call::PathRun)).requiring(ids::DRIVETRAIN)
    }
}

impl AllianceProvider for StubField {
    fn alliance(&self) -> Alliance {
        *self.0.alliance.lock().unwrap()
    }
}

impl StatusSink for StubField {
    fn set_color(&self, color: StatusColor) {
        self.0.push(Call::Color(color));
    }

    fn set_default_color(&self) {
        self.0.push(Call::DefaultColor);
    }
}

impl OperatorFeedback for StubField {
    fn start_vibrate(&self) {
        self.0.push(Call::VibrateStart);
    }

    fn stop_vibrate(&self) {
        self.0.push(Call::VibrateStop);
    }
}

pub fn stub_robot() -> (Robot, Arc<StubLog>) {
    let log = Arc::new(StubLog::default());
    let stub = |id| {
        Arc::new(Stub {
            id,
            log: Arc::clone(&log),
        })
    };
    let field = Arc::new(StubField(Arc::clone(&log)));

    let robot = Robot {
        climber: stub(ids::CLIMBER),
        shooter: stub(ids::SHOOTER),
        intake: stub(ids::INTAKE),
        amp: stub(ids::AMP),
        drivetrain: field.clone(),
        path_planner: field.clone(),
        alliance: field.clone(),
        status: field.clone(),
        feedback: field,
    };
    (robot, log)
}

pub fn scheduler() -> (Scheduler<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (Scheduler::new(clock.clone()), clock)
}

/// Ticks `scheduler`, advancing `clock` by `step` before each tick.
pub fn run_for(
    scheduler: &mut Scheduler<ManualClock>,
    clock: &ManualClock,
    step: Duration,
    ticks: usize,
) {
    for _ in 0..ticks {
        clock.advance(step);
        scheduler.tick();
    }
}
