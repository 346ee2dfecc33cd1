//! Speaker shots: ramp-up, fire, feed.
//!
//! Every shot runs the same tail: fire the rollers without claiming the
//! intake, hold briefly for the piece to clear, then return to neutral.

use std::sync::Arc;
use std::time::Duration;

use action_tree::ActionNode;
use action_tree::builder::{delay, parallel, repeating, sequence, timeout};
use robot_core::{ClimberSetpoint, ConfigurationError};

use crate::BehaviorLibrary;
use crate::nodes::actions::{climb_to, climb_to_with, run_rollers_unconditional, spin_split, spin_to};
use crate::nodes::conditions::both_at_setpoint;

impl BehaviorLibrary {
    // ========================================================================
    // Ramp-up
    // ========================================================================

    /// Raises the climber to `height` and spins the shooter to `rpm`, then
    /// waits until both are at setpoint.
    ///
    /// # Errors
    ///
    /// Rejects an `rpm` outside `(0, max_rpm]` or a `height` outside the
    /// climber range.
    pub fn ramp_up(&self, rpm: f64, height: f64) -> Result<ActionNode, ConfigurationError> {
        let rpm = self.check_rpm(rpm)?;
        let height = self.check_height(height)?;
        Ok(self.ramp_up_node(rpm, climb_to(&self.robot.climber, height)))
    }

    /// Like [`ramp_up`](Self::ramp_up), reading the height from `height`
    /// when the climb starts.
    pub fn ramp_up_with<F>(&self, rpm: f64, height: F) -> Result<ActionNode, ConfigurationError>
    where
        F: FnMut() -> f64 + Send + 'static,
    {
        let rpm = self.check_rpm(rpm)?;
        let climb = climb_to_with(&self.robot.climber, self.clamped(height));
        Ok(self.ramp_up_node(rpm, climb))
    }

    /// Ramps to `max_rpm` at the height interpolated from the current
    /// distance to the target.
    pub fn ramp_up_default(&self) -> ActionNode {
        let climber = Arc::clone(&self.robot.climber);
        let drivetrain = Arc::clone(&self.robot.drivetrain);
        let height = move || climber.interpolate(drivetrain.distance_to_target());
        let climb = climb_to_with(&self.robot.climber, self.clamped(height));
        self.ramp_up_node(self.config.shooter.max_rpm, climb)
    }

    fn ramp_up_node(&self, rpm: f64, climb: ActionNode) -> ActionNode {
        let robot = &self.robot;
        sequence(vec![
            climb,
            spin_to(&robot.shooter, rpm),
            self.settle(
                "climber_and_shooter_ready",
                both_at_setpoint(&robot.climber, &robot.shooter),
            ),
        ])
        .named("ramp_up")
    }

    /// Spins the shooter to `rpm` and keeps retargeting the climber to
    /// `height()` every `timing.continuous_refresh`.
    ///
    /// Never finishes on its own; cancel it or submit a conflicting
    /// behavior to stop it.
    pub fn ramp_up_continuous<F>(
        &self,
        rpm: f64,
        height: F,
    ) -> Result<ActionNode, ConfigurationError>
    where
        F: FnMut() -> f64 + Send + 'static,
    {
        let rpm = self.check_rpm(rpm)?;
        Ok(self.ramp_up_continuous_node(rpm, height))
    }

    /// Continuous ramp-up at `max_rpm`, aiming at the predicted distance.
    pub fn ramp_up_continuous_default(&self) -> ActionNode {
        let climber = Arc::clone(&self.robot.climber);
        let drivetrain = Arc::clone(&self.robot.drivetrain);
        let height = move || climber.interpolate(drivetrain.predicted_distance());
        self.ramp_up_continuous_node(self.config.shooter.max_rpm, height)
    }

    fn ramp_up_continuous_node<F>(&self, rpm: f64, height: F) -> ActionNode
    where
        F: FnMut() -> f64 + Send + 'static,
    {
        let robot = &self.robot;
        sequence(vec![
            spin_to(&robot.shooter, rpm),
            repeating(vec![
                climb_to_with(&robot.climber, self.clamped(height)),
                delay(self.timing.continuous_refresh),
            ])
            .named("retarget_climber"),
        ])
        .named("ramp_up_continuous")
    }

    /// Raises the climber to the ram-shot height and spins both wheels to
    /// `ram_shot_rpm` without waiting for either.
    pub fn ramp_ram(&self) -> ActionNode {
        sequence(self.ram_setpoints()).named("ramp_ram")
    }

    fn ram_setpoints(&self) -> Vec<ActionNode> {
        let robot = &self.robot;
        let rpm = self.config.shooter.ram_shot_rpm;
        let height = self.config.climber.height(ClimberSetpoint::RamShot);
        vec![
            climb_to(&robot.climber, height),
            spin_split(&robot.shooter, rpm, rpm),
        ]
    }

    // ========================================================================
    // Shots
    // ========================================================================

    /// Ramps up for at most `shooter.ramp_time`, fires, holds for
    /// `timing.shot_settle` and returns to neutral.
    ///
    /// # Errors
    ///
    /// Same as [`ramp_up`](Self::ramp_up).
    pub fn shoot(&self, rpm: f64, height: f64) -> Result<ActionNode, ConfigurationError> {
        let ramp = self.ramp_up(rpm, height)?;
        let prelude = timeout(ramp, self.timing.ramp_time);
        Ok(self.fire(prelude, self.timing.shot_settle).named("shoot"))
    }

    /// Ramps up from the measured distance while turning toward the target,
    /// then fires.
    ///
    /// The turn is bounded by `drivetrain.turn_timeout` and the ramp by
    /// `shooter.ramp_time`; the shot fires when both have ended.
    pub fn auto_shoot(&self) -> ActionNode {
        let prelude = parallel(vec![
            timeout(self.ramp_up_default(), self.timing.ramp_time),
            timeout(self.robot.drivetrain.turn_in_place(), self.timing.turn_timeout),
        ])
        .named("aim");
        self.fire(prelude, self.timing.shot_settle).named("auto_shoot")
    }

    /// Shot from against the subwoofer at the fixed ram-shot setpoints.
    pub fn ram_shot(&self) -> ActionNode {
        let robot = &self.robot;
        let mut prelude = self.ram_setpoints();
        prelude.push(self.settle(
            "climber_and_shooter_ready",
            both_at_setpoint(&robot.climber, &robot.shooter),
        ));
        self.fire(sequence(prelude).named("ramp_ram"), self.timing.shot_settle)
            .named("ram_shot")
    }

    /// Passes a piece across the field: like [`shoot`](Self::shoot) with a
    /// shorter hold of `timing.feed_settle`.
    ///
    /// # Errors
    ///
    /// Same as [`ramp_up`](Self::ramp_up).
    pub fn feed(&self, rpm: f64, height: f64) -> Result<ActionNode, ConfigurationError> {
        let ramp = self.ramp_up(rpm, height)?;
        // bounded by the settle timeout inside the ramp-up, not by ramp_time
        let prelude = parallel(vec![ramp]);
        Ok(self.fire(prelude, self.timing.feed_settle).named("feed"))
    }

    fn fire(&self, prelude: ActionNode, hold: Duration) -> ActionNode {
        sequence(vec![
            prelude,
            run_rollers_unconditional(&self.robot.intake, self.config.intake.outtake_power),
            delay(hold),
            self.neutral(false),
        ])
    }
}
