//! Injected handle bundle.

use std::sync::Arc;

use crate::collaborators::{AllianceProvider, Drivetrain, OperatorFeedback, PathPlanner, StatusSink};
use crate::proxy::{Climber, Intake, Shooter, SubsystemProxy};

/// Every proxy and collaborator a behavior may touch.
///
/// Cloning is cheap: all fields are shared handles. Behaviors capture only
/// the handles they use.
#[derive(Clone)]
pub struct Robot {
    pub climber: Arc<dyn Climber>,
    pub shooter: Arc<dyn Shooter>,
    pub intake: Arc<dyn Intake>,
    /// Amp flap; `actuate` targets a position.
    pub amp: Arc<dyn SubsystemProxy>,
    pub drivetrain: Arc<dyn Drivetrain>,
    pub path_planner: Arc<dyn PathPlanner>,
    pub alliance: Arc<dyn AllianceProvider>,
    pub status: Arc<dyn StatusSink>,
    pub feedback: Arc<dyn OperatorFeedback>,
}
