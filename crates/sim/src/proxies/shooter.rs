use std::sync::{Arc, Mutex};
use std::time::Duration;

use action_tree::SubsystemId;
use robot_core::{Shooter, SubsystemProxy, ids};

use super::{Axis, Command, CommandLog};

struct Flywheels {
    left: Axis,
    right: Axis,
    output: f64,
}

/// Twin flywheels that accelerate toward their speed targets.
pub struct SimShooter {
    wheels: Mutex<Flywheels>,
    max_rpm: f64,
    log: Arc<CommandLog>,
}

impl SimShooter {
    pub fn new(axis: Axis, max_rpm: f64, log: Arc<CommandLog>) -> Self {
        Self {
            wheels: Mutex::new(Flywheels {
                left: axis,
                right: axis,
                output: 0.0,
            }),
            max_rpm,
            log,
        }
    }

    /// Current `(left, right)` speeds in rpm.
    pub fn speeds(&self) -> (f64, f64) {
        let wheels = self.wheels.lock().unwrap();
        (wheels.left.position, wheels.right.position)
    }

    pub fn targets(&self) -> (f64, f64) {
        let wheels = self.wheels.lock().unwrap();
        (wheels.left.target, wheels.right.target)
    }

    /// Last open-loop power, or the closed-loop fraction of `max_rpm`.
    pub fn output(&self) -> f64 {
        self.wheels.lock().unwrap().output
    }

    pub(crate) fn step(&self, dt: Duration) {
        let mut wheels = self.wheels.lock().unwrap();
        wheels.left.step(dt);
        wheels.right.step(dt);
    }
}

impl SubsystemProxy for SimShooter {
    fn id(&self) -> SubsystemId {
        ids::SHOOTER
    }

    fn actuate(&self, target: f64) {
        self.spin(target, target);
    }

    fn is_at_setpoint(&self) -> bool {
        let wheels = self.wheels.lock().unwrap();
        wheels.left.at_target() && wheels.right.at_target()
    }

    fn reset(&self) {
        self.set_output(0.0);
    }
}

impl Shooter for SimShooter {
    fn spin(&self, left_rpm: f64, right_rpm: f64) {
        let mut wheels = self.wheels.lock().unwrap();
        wheels.left.target = left_rpm;
        wheels.right.target = right_rpm;
        wheels.output = left_rpm.max(right_rpm) / self.max_rpm;
        self.log.record(Command::ShooterTarget {
            left: left_rpm,
            right: right_rpm,
        });
    }

    fn set_output(&self, power: f64) {
        let mut wheels = self.wheels.lock().unwrap();
        wheels.left.target = power * self.max_rpm;
        wheels.right.target = power * self.max_rpm;
        wheels.output = power;
        self.log.record(Command::ShooterOutput(power));
    }
}
