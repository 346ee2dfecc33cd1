//! The behavior library handle.

use std::borrow::Cow;
use std::time::Duration;

use action_tree::ActionNode;
use action_tree::builder::{timeout, wait_until};
use robot_core::config::seconds;
use robot_core::{BehaviorConfig, ConfigurationError, Robot};

/// Factory for named behaviors.
///
/// Holds the injected [`Robot`] handles and a validated [`BehaviorConfig`].
/// Each recipe method builds a new tree; nothing is shared between trees
/// except the proxy handles themselves.
pub struct BehaviorLibrary {
    pub(crate) robot: Robot,
    pub(crate) config: BehaviorConfig,
    pub(crate) timing: Timings,
}

/// Config delays converted once at construction.
pub(crate) struct Timings {
    pub(crate) ramp_time: Duration,
    pub(crate) turn_timeout: Duration,
    pub(crate) shot_settle: Duration,
    pub(crate) feed_settle: Duration,
    pub(crate) amp_outtake: Duration,
    pub(crate) climber_home_pulse: Duration,
    pub(crate) climber_reset_delay: Duration,
    pub(crate) continuous_refresh: Duration,
    pub(crate) vibrate: Duration,
    pub(crate) settle_timeout: Duration,
}

impl Timings {
    fn from_config(config: &BehaviorConfig) -> Result<Self, ConfigurationError> {
        let timing = &config.timing;
        Ok(Self {
            ramp_time: seconds("shooter.ramp_time", config.shooter.ramp_time)?,
            turn_timeout: seconds("drivetrain.turn_timeout", config.drivetrain.turn_timeout)?,
            shot_settle: seconds("timing.shot_settle", timing.shot_settle)?,
            feed_settle: seconds("timing.feed_settle", timing.feed_settle)?,
            amp_outtake: seconds("timing.amp_outtake", timing.amp_outtake)?,
            climber_home_pulse: seconds("timing.climber_home_pulse", timing.climber_home_pulse)?,
            climber_reset_delay: seconds(
                "timing.climber_reset_delay",
                timing.climber_reset_delay,
            )?,
            continuous_refresh: seconds("timing.continuous_refresh", timing.continuous_refresh)?,
            vibrate: seconds("timing.vibrate", timing.vibrate)?,
            settle_timeout: seconds("timing.settle_timeout", timing.settle_timeout)?,
        })
    }
}

impl BehaviorLibrary {
    /// Validates `config` and binds it to `robot`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigurationError`] found in `config`.
    pub fn new(robot: Robot, config: BehaviorConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let timing = Timings::from_config(&config)?;
        Ok(Self {
            robot,
            config,
            timing,
        })
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn config(&self) -> &BehaviorConfig {
        &self.config
    }

    /// Waits for `predicate`, giving up after `timing.settle_timeout`.
    pub(crate) fn settle<F>(&self, name: impl Into<Cow<'static, str>>, predicate: F) -> ActionNode
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let name = name.into();
        timeout(wait_until(name.clone(), predicate), self.timing.settle_timeout)
            .named(format!("settle({name})"))
    }

    /// Accepts an `rpm` argument from a caller.
    pub(crate) fn check_rpm(&self, rpm: f64) -> Result<f64, ConfigurationError> {
        self.config.shooter.check_rpm("rpm", rpm)
    }

    /// Accepts a climber `height` argument from a caller.
    pub(crate) fn check_height(&self, height: f64) -> Result<f64, ConfigurationError> {
        self.config.climber.check_height("height", height)
    }

    /// Wraps a height supplier so its output stays in the climber range.
    ///
    /// `NaN` maps to the retracted height.
    pub(crate) fn clamped<F>(&self, mut height: F) -> impl FnMut() -> f64 + Send + use<F>
    where
        F: FnMut() -> f64 + Send + 'static,
    {
        let climber = &self.config.climber;
        let (min, max, fallback) = (climber.min_height, climber.max_height, climber.retracted);
        move || {
            let target = height();
            if target.is_nan() {
                fallback
            } else {
                target.clamp(min, max)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::stub_robot;

    #[test]
    fn rejects_invalid_config() {
        let (robot, _) = stub_robot();
        let mut config = BehaviorConfig::default();
        config.shooter.ram_shot_rpm = -1.0;

        assert!(matches!(
            BehaviorLibrary::new(robot, config),
            Err(ConfigurationError::InvalidRpm { .. })
        ));
    }

    #[test]
    fn settle_is_a_guarded_wait() {
        let (robot, _) = stub_robot();
        let library = BehaviorLibrary::new(robot, BehaviorConfig::default()).unwrap();

        let node = library.settle("never", || false);

        assert_eq!(node.name(), "settle(never)");
        assert_eq!(node.deadline(), Some(Duration::from_secs(3)));
        assert!(node.unguarded_waits().is_empty());
    }

    #[test]
    fn computed_heights_are_clamped() {
        let (robot, _) = stub_robot();
        let library = BehaviorLibrary::new(robot, BehaviorConfig::default()).unwrap();

        let clamp = |value: f64| (library.clamped(move || value))();

        assert_eq!(clamp(1.7), 1.0);
        assert_eq!(clamp(-0.2), 0.0);
        assert_eq!(clamp(0.4), 0.4);
        assert_eq!(clamp(f64::NAN), 0.0);
    }
}
