//! Return to the stowed, safe configuration.

use action_tree::ActionNode;
use action_tree::builder::{delay, parallel, sequence};
use robot_core::ClimberSetpoint;
use tracing::debug;

use crate::BehaviorLibrary;
use crate::nodes::actions::{
    climb_to, reset_climber, run_rollers_unconditional, set_climber_output, set_shooter_output,
};
use crate::nodes::conditions::at_setpoint;

impl BehaviorLibrary {
    /// Stops the rollers and flywheels, retracts the climber, seats it with
    /// a short homing pulse and resets it.
    ///
    /// Idempotent: running it from any state converges to the same stowed
    /// configuration. `should_stall` is accepted for the intake stall hold,
    /// which this robot does not use; it has no effect.
    pub fn neutral(&self, should_stall: bool) -> ActionNode {
        if should_stall {
            debug!("neutral: intake stall hold requested, ignoring");
        }
        let robot = &self.robot;
        let climber = &self.config.climber;
        sequence(vec![
            run_rollers_unconditional(&robot.intake, 0.0),
            set_shooter_output(&robot.shooter, 0.0),
            climb_to(&robot.climber, climber.height(ClimberSetpoint::Retracted)),
            self.settle("climber_ready", at_setpoint(&robot.climber)),
            set_climber_output(&robot.climber, climber.home_output),
            delay(self.timing.climber_home_pulse),
            set_climber_output(&robot.climber, 0.0),
            parallel(vec![
                sequence(vec![
                    delay(self.timing.climber_reset_delay),
                    reset_climber(&robot.climber),
                ]),
            ]),
        ])
        .named("neutral")
    }
}
