//! Leaf actions that command a single subsystem.
//!
//! Every action here is an instant: it issues one request to a proxy and
//! finishes in the tick it runs. Motion completes asynchronously; pair an
//! action with a predicate from [`conditions`](super::conditions) to wait
//! for it.

use std::sync::Arc;

use action_tree::ActionNode;
use action_tree::builder::instant;
use robot_core::{Climber, Intake, Shooter, StatusColor, StatusSink, SubsystemProxy};
use tracing::trace;

// ============================================================================
// Climber
// ============================================================================

/// Targets a fixed climber height.
pub fn climb_to(climber: &Arc<dyn Climber>, height: f64) -> ActionNode {
    let id = climber.id();
    let climber = Arc::clone(climber);
    instant(format!("climb_to({height})"), move || climber.actuate(height)).requiring(id)
}

/// Targets the height `height` reports when the action runs.
///
/// The supplier is re-read every time the node is activated, so inside a
/// repeating sequence it retargets on each iteration.
pub fn climb_to_with<F>(climber: &Arc<dyn Climber>, mut height: F) -> ActionNode
where
    F: FnMut() -> f64 + Send + 'static,
{
    let id = climber.id();
    let climber = Arc::clone(climber);
    instant("climb_to(dynamic)", move || {
        let target = height();
        trace!(target, "climber retarget");
        climber.actuate(target);
    })
    .requiring(id)
}

pub fn set_climber_output(climber: &Arc<dyn Climber>, power: f64) -> ActionNode {
    let id = climber.id();
    let climber = Arc::clone(climber);
    instant(format!("set_climber_output({power})"), move || {
        climber.set_output(power)
    })
    .requiring(id)
}

pub fn reset_climber(climber: &Arc<dyn Climber>) -> ActionNode {
    let id = climber.id();
    let climber = Arc::clone(climber);
    instant("reset_climber", move || climber.reset()).requiring(id)
}

// ============================================================================
// Shooter
// ============================================================================

/// Targets `rpm` on both flywheels.
pub fn spin_to(shooter: &Arc<dyn Shooter>, rpm: f64) -> ActionNode {
    let id = shooter.id();
    let shooter = Arc::clone(shooter);
    instant(format!("spin_to({rpm})"), move || shooter.actuate(rpm)).requiring(id)
}

/// Targets independent flywheel speeds.
pub fn spin_split(shooter: &Arc<dyn Shooter>, left_rpm: f64, right_rpm: f64) -> ActionNode {
    let id = shooter.id();
    let shooter = Arc::clone(shooter);
    instant(format!("spin_split({left_rpm}, {right_rpm})"), move || {
        shooter.spin(left_rpm, right_rpm)
    })
    .requiring(id)
}

pub fn set_shooter_output(shooter: &Arc<dyn Shooter>, power: f64) -> ActionNode {
    let id = shooter.id();
    let shooter = Arc::clone(shooter);
    instant(format!("set_shooter_output({power})"), move || {
        shooter.set_output(power)
    })
    .requiring(id)
}

// ============================================================================
// Intake
// ============================================================================

/// Runs the rollers at `power`, claiming the intake.
pub fn run_rollers(intake: &Arc<dyn Intake>, power: f64) -> ActionNode {
    let id = intake.id();
    let intake = Arc::clone(intake);
    instant(format!("run_rollers({power})"), move || intake.set_output(power)).requiring(id)
}

/// Runs the rollers at `power` without claiming the intake.
///
/// Used when a shot must fire regardless of who else is driving the intake.
pub fn run_rollers_unconditional(intake: &Arc<dyn Intake>, power: f64) -> ActionNode {
    let intake = Arc::clone(intake);
    instant(format!("run_rollers_unconditional({power})"), move || {
        intake.set_output(power)
    })
}

// ============================================================================
// Amp mechanism
// ============================================================================

pub fn move_amp(amp: &Arc<dyn SubsystemProxy>, position: f64) -> ActionNode {
    let id = amp.id();
    let amp = Arc::clone(amp);
    instant(format!("move_amp({position})"), move || amp.actuate(position)).requiring(id)
}

// ============================================================================
// Status
// ============================================================================

pub fn set_status_color(status: &Arc<dyn StatusSink>, color: StatusColor) -> ActionNode {
    let status = Arc::clone(status);
    instant(format!("set_status_color({color:?})"), move || {
        status.set_color(color)
    })
}

pub fn set_default_color(status: &Arc<dyn StatusSink>) -> ActionNode {
    let status = Arc::clone(status);
    instant("set_default_color", move || status.set_default_color())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, stub_robot};

    #[test]
    fn writers_claim_their_subsystem() {
        let (robot, _) = stub_robot();

        assert!(climb_to(&robot.climber, 0.4).requirements().contains(&robot.climber.id()));
        assert!(spin_to(&robot.shooter, 3000.0).requirements().contains(&robot.shooter.id()));
        assert!(run_rollers(&robot.intake, 1.0).requirements().contains(&robot.intake.id()));
        assert!(move_amp(&robot.amp, 1.0).requirements().contains(&robot.amp.id()));
    }

    #[test]
    fn unconditional_and_status_writers_are_exempt() {
        let (robot, _) = stub_robot();

        assert!(run_rollers_unconditional(&robot.intake, 1.0).is_exempt());
        assert!(set_status_color(&robot.status, StatusColor::Amp).is_exempt());
        assert!(set_default_color(&robot.status).is_exempt());
    }

    #[test]
    fn dynamic_climb_reads_supplier_when_run() {
        let (robot, log) = stub_robot();
        let (mut scheduler, _clock) = crate::testing::scheduler();

        let node = climb_to_with(&robot.climber, || 0.7);
        assert!(log.calls().is_empty());

        scheduler.submit(node).unwrap();
        scheduler.tick();

        assert_eq!(log.calls(), vec![Call::ClimberActuate(0.7)]);
    }
}
