use std::sync::{Arc, Mutex};
use std::time::Duration;

use action_tree::SubsystemId;
use robot_core::{Climber, SubsystemProxy, ids};

use super::{Axis, Command, CommandLog};

struct ClimberState {
    axis: Axis,
    /// Open-loop power; overrides the closed-loop target while set.
    output: Option<f64>,
}

/// Elevator that slews toward its height target.
pub struct SimClimber {
    state: Mutex<ClimberState>,
    interpolation: f64,
    log: Arc<CommandLog>,
}

impl SimClimber {
    pub fn new(axis: Axis, interpolation: f64, log: Arc<CommandLog>) -> Self {
        Self {
            state: Mutex::new(ClimberState { axis, output: None }),
            interpolation,
            log,
        }
    }

    pub fn height(&self) -> f64 {
        self.state.lock().unwrap().axis.position
    }

    pub fn target(&self) -> f64 {
        self.state.lock().unwrap().axis.target
    }

    pub fn output(&self) -> Option<f64> {
        self.state.lock().unwrap().output
    }

    pub(crate) fn step(&self, dt: Duration) {
        let mut state = self.state.lock().unwrap();
        match state.output {
            Some(power) => {
                let delta = power * state.axis.rate * dt.as_secs_f64();
                state.axis.position += delta;
                state.axis.target = state.axis.position;
            }
            None => state.axis.step(dt),
        }
    }
}

impl SubsystemProxy for SimClimber {
    fn id(&self) -> SubsystemId {
        ids::CLIMBER
    }

    fn actuate(&self, target: f64) {
        let mut state = self.state.lock().unwrap();
        state.output = None;
        state.axis.target = target;
        self.log.record(Command::ClimberTarget(target));
    }

    fn is_at_setpoint(&self) -> bool {
        self.state.lock().unwrap().axis.at_target()
    }

    fn reset(&self) {
        let mut state = self.state.lock().unwrap();
        state.output = None;
        state.axis.position = 0.0;
        state.axis.target = 0.0;
        self.log.record(Command::ClimberReset);
    }
}

impl Climber for SimClimber {
    fn set_output(&self, power: f64) {
        let mut state = self.state.lock().unwrap();
        // zero power holds position under closed loop
        state.output = (power != 0.0).then_some(power);
        state.axis.target = state.axis.position;
        self.log.record(Command::ClimberOutput(power));
    }

    fn interpolate(&self, distance: f64) -> f64 {
        distance * self.interpolation
    }
}
