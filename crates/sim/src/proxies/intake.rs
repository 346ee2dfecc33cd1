use std::sync::{Arc, Mutex};

use action_tree::SubsystemId;
use robot_core::{Intake, SubsystemProxy, ids};

use super::{Command, CommandLog};

/// Rollers with no dynamics: power applies immediately.
pub struct SimIntake {
    power: Mutex<f64>,
    log: Arc<CommandLog>,
}

impl SimIntake {
    pub fn new(log: Arc<CommandLog>) -> Self {
        Self {
            power: Mutex::new(0.0),
            log,
        }
    }

    pub fn power(&self) -> f64 {
        *self.power.lock().unwrap()
    }
}

impl SubsystemProxy for SimIntake {
    fn id(&self) -> SubsystemId {
        ids::INTAKE
    }

    fn actuate(&self, target: f64) {
        self.set_output(target);
    }

    fn is_at_setpoint(&self) -> bool {
        true
    }

    fn reset(&self) {
        self.set_output(0.0);
    }
}

impl Intake for SimIntake {
    fn set_output(&self, power: f64) {
        *self.power.lock().unwrap() = power;
        self.log.record(Command::IntakeOutput(power));
    }
}
