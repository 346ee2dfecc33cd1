//! Robot-side contracts consumed by the behavior library.
//!
//! `robot-core` defines what the orchestration layer needs from the robot
//! without implementing any of it: subsystem proxy traits, external
//! collaborator traits (path planning, alliance, status and operator
//! feedback), the domain types they exchange, and the validated numeric
//! configuration behaviors are built from.
//!
//! Proxies are injected as `Arc<dyn ...>` handles through [`Robot`]; there
//! is no global subsystem state.
pub mod collaborators;
pub mod config;
pub mod error;
pub mod ids;
pub mod proxy;
pub mod robot;

pub use collaborators::{
    Alliance, AllianceProvider, Drivetrain, OperatorFeedback, PathConstraints, PathPlanner,
    Pose2d, StatusColor, StatusSink,
};
pub use config::{
    AlignConfig, AmpConfig, BehaviorConfig, ClimberConfig, ClimberSetpoint, DrivetrainConfig,
    IntakeConfig, ShooterConfig, TimingConfig,
};
pub use error::ConfigurationError;
pub use proxy::{Climber, Intake, Shooter, SubsystemProxy};
pub use robot::Robot;
