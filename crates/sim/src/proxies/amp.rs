use std::sync::{Arc, Mutex};
use std::time::Duration;

use action_tree::SubsystemId;
use robot_core::{SubsystemProxy, ids};

use super::{Axis, Command, CommandLog};

/// Amp flap pivot.
pub struct SimAmp {
    axis: Mutex<Axis>,
    log: Arc<CommandLog>,
}

impl SimAmp {
    pub fn new(axis: Axis, log: Arc<CommandLog>) -> Self {
        Self {
            axis: Mutex::new(axis),
            log,
        }
    }

    pub fn position(&self) -> f64 {
        self.axis.lock().unwrap().position
    }

    pub(crate) fn step(&self, dt: Duration) {
        self.axis.lock().unwrap().step(dt);
    }
}

impl SubsystemProxy for SimAmp {
    fn id(&self) -> SubsystemId {
        ids::AMP
    }

    fn actuate(&self, target: f64) {
        self.axis.lock().unwrap().target = target;
        self.log.record(Command::AmpTarget(target));
    }

    fn is_at_setpoint(&self) -> bool {
        self.axis.lock().unwrap().at_target()
    }

    fn reset(&self) {
        self.actuate(0.0);
    }
}
