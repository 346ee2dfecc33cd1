//! Numeric configuration for the behavior library.
//!
//! Every constant a recipe uses lives here, grouped by subsystem. Sections
//! default individually, so a TOML file only needs the fields it overrides.
//! [`BehaviorConfig::validate`] must pass before any behavior is built.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::collaborators::{PathConstraints, Pose2d};
use crate::error::ConfigurationError;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub shooter: ShooterConfig,
    pub climber: ClimberConfig,
    pub intake: IntakeConfig,
    pub amp: AmpConfig,
    pub drivetrain: DrivetrainConfig,
    pub timing: TimingConfig,
    pub align: AlignConfig,
}

impl BehaviorConfig {
    /// Checks every section, reporting the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.shooter.validate()?;
        self.climber.validate()?;
        self.intake.validate()?;
        self.amp.validate()?;
        self.drivetrain.validate()?;
        self.timing.validate()?;
        self.align.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    pub max_rpm: f64,
    pub amp_rpm: f64,
    pub ram_shot_rpm: f64,
    /// Seconds allowed for the shooter and climber to reach their setpoints
    /// before a shot fires anyway.
    pub ramp_time: f64,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            max_rpm: 5500.0,
            amp_rpm: 2000.0,
            ram_shot_rpm: 4000.0,
            ramp_time: 3.0,
        }
    }
}

impl ShooterConfig {
    /// Accepts `rpm` if it is positive, finite and within `max_rpm`.
    pub fn check_rpm(&self, field: &'static str, rpm: f64) -> Result<f64, ConfigurationError> {
        if rpm.is_finite() && rpm > 0.0 && rpm <= self.max_rpm {
            Ok(rpm)
        } else {
            Err(ConfigurationError::InvalidRpm {
                field,
                value: rpm,
                max: self.max_rpm,
            })
        }
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        positive_limit("shooter.max_rpm", self.max_rpm)?;
        self.check_rpm("shooter.amp_rpm", self.amp_rpm)?;
        self.check_rpm("shooter.ram_shot_rpm", self.ram_shot_rpm)?;
        seconds("shooter.ramp_time", self.ramp_time)?;
        Ok(())
    }
}

/// Named climber heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimberSetpoint {
    Retracted,
    Amp,
    RamShot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimberConfig {
    pub min_height: f64,
    pub max_height: f64,
    pub retracted: f64,
    pub amp: f64,
    pub ram_shot: f64,
    /// Open-loop power of the homing pulse that seats the climber.
    pub home_output: f64,
}

impl Default for ClimberConfig {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            max_height: 1.0,
            retracted: 0.0,
            amp: 0.9,
            ram_shot: 0.35,
            home_output: -0.5,
        }
    }
}

impl ClimberConfig {
    pub fn height(&self, setpoint: ClimberSetpoint) -> f64 {
        match setpoint {
            ClimberSetpoint::Retracted => self.retracted,
            ClimberSetpoint::Amp => self.amp,
            ClimberSetpoint::RamShot => self.ram_shot,
        }
    }

    /// Accepts `height` if it lies within `[min_height, max_height]`.
    pub fn check_height(
        &self,
        field: &'static str,
        height: f64,
    ) -> Result<f64, ConfigurationError> {
        if !height.is_finite() {
            return Err(ConfigurationError::NotFinite {
                field,
                value: height,
            });
        }
        if height < self.min_height || height > self.max_height {
            return Err(ConfigurationError::SetpointOutOfRange {
                field,
                value: height,
                min: self.min_height,
                max: self.max_height,
            });
        }
        Ok(height)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        finite("climber.min_height", self.min_height)?;
        finite("climber.max_height", self.max_height)?;
        if self.min_height >= self.max_height {
            return Err(ConfigurationError::EmptyRange {
                min: self.min_height,
                max: self.max_height,
            });
        }
        self.check_height("climber.retracted", self.retracted)?;
        self.check_height("climber.amp", self.amp)?;
        self.check_height("climber.ram_shot", self.ram_shot)?;
        power("climber.home_output", self.home_output)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Roller power that feeds a game piece into the shooter.
    pub outtake_power: f64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self { outtake_power: 1.0 }
    }
}

impl IntakeConfig {
    fn validate(&self) -> Result<(), ConfigurationError> {
        power("intake.outtake_power", self.outtake_power)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmpConfig {
    pub extended: f64,
    pub retracted: f64,
}

impl Default for AmpConfig {
    fn default() -> Self {
        Self {
            extended: 1.0,
            retracted: 0.0,
        }
    }
}

impl AmpConfig {
    fn validate(&self) -> Result<(), ConfigurationError> {
        finite("amp.extended", self.extended)?;
        finite("amp.retracted", self.retracted)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivetrainConfig {
    pub max_speed: f64,
    pub max_accel: f64,
    pub max_angular_speed: f64,
    pub max_angular_accel: f64,
    /// Seconds allowed for the turn toward the target during auto-shoot.
    pub turn_timeout: f64,
}

impl Default for DrivetrainConfig {
    fn default() -> Self {
        Self {
            max_speed: 4.5,
            max_accel: 3.0,
            max_angular_speed: 9.4,
            max_angular_accel: 12.0,
            turn_timeout: 1.0,
        }
    }
}

impl DrivetrainConfig {
    pub fn constraints(&self) -> PathConstraints {
        PathConstraints {
            max_speed: self.max_speed,
            max_accel: self.max_accel,
            max_angular_speed: self.max_angular_speed,
            max_angular_accel: self.max_angular_accel,
        }
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        positive_limit("drivetrain.max_speed", self.max_speed)?;
        positive_limit("drivetrain.max_accel", self.max_accel)?;
        positive_limit("drivetrain.max_angular_speed", self.max_angular_speed)?;
        positive_limit("drivetrain.max_angular_accel", self.max_angular_accel)?;
        seconds("drivetrain.turn_timeout", self.turn_timeout)?;
        Ok(())
    }
}

/// Fixed delays used by the recipes, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Hold after the intake fires before returning to neutral.
    pub shot_settle: f64,
    /// Hold after feeding before returning to neutral.
    pub feed_settle: f64,
    /// Hold while the intake scores into the amp.
    pub amp_outtake: f64,
    pub climber_home_pulse: f64,
    pub climber_reset_delay: f64,
    /// Period between height retargets during continuous ramp-up.
    pub continuous_refresh: f64,
    pub vibrate: f64,
    /// Upper bound on any setpoint wait inside a terminating behavior.
    pub settle_timeout: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            shot_settle: 0.35,
            feed_settle: 0.1,
            amp_outtake: 1.5,
            climber_home_pulse: 0.1,
            climber_reset_delay: 0.5,
            continuous_refresh: 0.1,
            vibrate: 1.0,
            settle_timeout: 3.0,
        }
    }
}

impl TimingConfig {
    fn validate(&self) -> Result<(), ConfigurationError> {
        seconds("timing.shot_settle", self.shot_settle)?;
        seconds("timing.feed_settle", self.feed_settle)?;
        seconds("timing.amp_outtake", self.amp_outtake)?;
        seconds("timing.climber_home_pulse", self.climber_home_pulse)?;
        seconds("timing.climber_reset_delay", self.climber_reset_delay)?;
        seconds("timing.continuous_refresh", self.continuous_refresh)?;
        seconds("timing.vibrate", self.vibrate)?;
        seconds("timing.settle_timeout", self.settle_timeout)?;
        Ok(())
    }
}

/// Amp scoring pose for auto-alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    pub amp_x_red: f64,
    pub amp_x_blue: f64,
    pub amp_y: f64,
    pub amp_heading_degrees: f64,
    pub end_velocity: f64,
    pub rotation_delay_distance: f64,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            amp_x_red: 14.6,
            amp_x_blue: 1.94,
            amp_y: 7.75,
            amp_heading_degrees: 90.0,
            end_velocity: 0.0,
            rotation_delay_distance: 0.0,
        }
    }
}

impl AlignConfig {
    /// Amp pose for the given side. Unknown alliances use the blue pose.
    pub fn amp_pose(&self, red: bool) -> Pose2d {
        let x = if red { self.amp_x_red } else { self.amp_x_blue };
        Pose2d::new(x, self.amp_y, self.amp_heading_degrees)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        finite("align.amp_x_red", self.amp_x_red)?;
        finite("align.amp_x_blue", self.amp_x_blue)?;
        finite("align.amp_y", self.amp_y)?;
        finite("align.amp_heading_degrees", self.amp_heading_degrees)?;
        finite("align.end_velocity", self.end_velocity)?;
        finite("align.rotation_delay_distance", self.rotation_delay_distance)?;
        Ok(())
    }
}

/// Converts `value` seconds after checking it is finite and non-negative.
pub fn seconds(field: &'static str, value: f64) -> Result<Duration, ConfigurationError> {
    Duration::try_from_secs_f64(value)
        .map_err(|_| ConfigurationError::InvalidDuration { field, value })
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::NotFinite { field, value })
    }
}

fn positive_limit(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidLimit { field, value })
    }
}

fn power(field: &'static str, value: f64) -> Result<(), ConfigurationError> {
    if value.is_finite() && (-1.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidLimit { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(BehaviorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_negative_rpm() {
        let mut config = BehaviorConfig::default();
        config.shooter.amp_rpm = -100.0;

        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidRpm {
                field: "shooter.amp_rpm",
                ..
            })
        ));
    }

    #[test]
    fn rejects_rpm_above_max() {
        let shooter = ShooterConfig::default();
        assert!(shooter.check_rpm("rpm", shooter.max_rpm).is_ok());
        assert!(shooter.check_rpm("rpm", shooter.max_rpm + 1.0).is_err());
    }

    #[test]
    fn rejects_out_of_range_setpoint() {
        let mut config = BehaviorConfig::default();
        config.climber.amp = 1.5;

        assert_eq!(
            config.validate(),
            Err(ConfigurationError::SetpointOutOfRange {
                field: "climber.amp",
                value: 1.5,
                min: 0.0,
                max: 1.0,
            })
        );
    }

    #[test]
    fn rejects_bad_durations() {
        let mut config = BehaviorConfig::default();
        config.timing.shot_settle = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidDuration {
                field: "timing.shot_settle",
                ..
            })
        ));

        config.timing.shot_settle = -0.1;
        assert!(config.validate().is_err());

        config.timing.shot_settle = 1e30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_climber_range() {
        let mut config = BehaviorConfig::default();
        config.climber.max_height = config.climber.min_height;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::EmptyRange { .. })
        ));
    }

    #[test]
    fn seconds_converts_fractional_values() {
        assert_eq!(
            seconds("delay", 0.35),
            Ok(Duration::from_secs_f64(0.35))
        );
        assert_eq!(seconds("delay", 0.0), Ok(Duration::ZERO));
    }

    #[test]
    fn amp_pose_mirrors_for_red() {
        let align = AlignConfig::default();
        assert_eq!(align.amp_pose(true), Pose2d::new(14.6, 7.75, 90.0));
        assert_eq!(align.amp_pose(false), Pose2d::new(1.94, 7.75, 90.0));
    }
}
