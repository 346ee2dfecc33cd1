//! External collaborators and the types they exchange.
//!
//! These are consumed, not implemented, by the behavior library. Path
//! planning and drivetrain turns are opaque: they hand back an
//! [`ActionNode`] that the scheduler runs like any other node.

use action_tree::{ActionNode, SubsystemId};

/// Match alliance reported by the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alliance {
    Red,
    Blue,
    #[default]
    Unknown,
}

impl Alliance {
    /// Returns `true` only for a known red alliance.
    ///
    /// Target selection mirrors for red; blue and unknown share the
    /// unmirrored field coordinates.
    pub fn is_red(self) -> bool {
        matches!(self, Alliance::Red)
    }
}

/// Field pose in meters and degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2d {
    pub x: f64,
    pub y: f64,
    pub heading_degrees: f64,
}

impl Pose2d {
    pub const fn new(x: f64, y: f64, heading_degrees: f64) -> Self {
        Self {
            x,
            y,
            heading_degrees,
        }
    }
}

/// Kinematic limits handed to the path planner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathConstraints {
    /// Meters per second.
    pub max_speed: f64,
    /// Meters per second squared.
    pub max_accel: f64,
    /// Radians per second.
    pub max_angular_speed: f64,
    /// Radians per second squared.
    pub max_angular_accel: f64,
}

/// Status LED colors behaviors ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusColor {
    /// Generic auto-alignment in progress.
    Align,
    /// Aligning to, or scoring in, the amp.
    Amp,
}

/// Produces path-following nodes.
///
/// A node that cannot reach its target should fail (its task reports
/// `Failed`); the orchestration core never retries.
pub trait PathPlanner: Send + Sync {
    fn plan_path(
        &self,
        target: Pose2d,
        constraints: PathConstraints,
        end_velocity: f64,
        rotation_delay_distance: f64,
    ) -> ActionNode;
}

/// Swerve drivetrain queries used for aiming.
pub trait Drivetrain: Send + Sync {
    fn id(&self) -> SubsystemId;

    /// Current distance to the scoring target, in meters.
    fn distance_to_target(&self) -> f64;

    /// Distance to the scoring target projected along the current motion.
    fn predicted_distance(&self) -> f64;

    /// Node that rotates the robot in place to face the scoring target.
    fn turn_in_place(&self) -> ActionNode;
}

pub trait AllianceProvider: Send + Sync {
    fn alliance(&self) -> Alliance;
}

/// Sink for status LED requests.
pub trait StatusSink: Send + Sync {
    fn set_color(&self, color: StatusColor);
    fn set_default_color(&self);
}

/// Driver controller rumble.
pub trait OperatorFeedback: Send + Sync {
    fn start_vibrate(&self);
    fn stop_vibrate(&self);
}
