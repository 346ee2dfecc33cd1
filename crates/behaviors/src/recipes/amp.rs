//! Amp scoring.

use action_tree::ActionNode;
use action_tree::builder::{delay, detached_with, sequence};
use robot_core::ClimberSetpoint;

use crate::BehaviorLibrary;
use crate::nodes::actions::{climb_to, move_amp, run_rollers, spin_to};
use crate::nodes::conditions::{at_setpoint, both_at_setpoint};
use crate::recipes::amp_align;

impl BehaviorLibrary {
    /// Scores into the amp: raise, spin, extend the flap, feed, retract,
    /// return to neutral.
    ///
    /// Unlike speaker shots, the feed claims the intake.
    pub fn amp_shoot(&self) -> ActionNode {
        let robot = &self.robot;
        let amp = &self.config.amp;
        sequence(vec![
            climb_to(&robot.climber, self.config.climber.height(ClimberSetpoint::Amp)),
            spin_to(&robot.shooter, self.config.shooter.amp_rpm),
            self.settle("climber_ready", at_setpoint(&robot.climber)),
            move_amp(&robot.amp, amp.extended),
            self.settle(
                "amp_and_shooter_ready",
                both_at_setpoint(&robot.amp, &robot.shooter),
            ),
            run_rollers(&robot.intake, self.config.intake.outtake_power),
            delay(self.timing.amp_outtake),
            move_amp(&robot.amp, amp.retracted),
            self.settle("amp_ready", at_setpoint(&robot.amp)),
            self.neutral(false),
        ])
        .named("amp_shoot")
    }

    /// Starts amp alignment as its own behavior and readies the climber,
    /// shooter and flap for [`amp_shoot`](Self::amp_shoot).
    ///
    /// The alignment tree is built when this behavior starts, so it uses the
    /// alliance reported at that time.
    pub fn ramp_up_amp(&self) -> ActionNode {
        let robot = &self.robot;
        let spawn_robot = robot.clone();
        let align = self.config.align.clone();
        let constraints = self.config.drivetrain.constraints();

        sequence(vec![
            detached_with(move || amp_align(&spawn_robot, &align, constraints)),
            climb_to(&robot.climber, self.config.climber.height(ClimberSetpoint::Amp)),
            spin_to(&robot.shooter, self.config.shooter.amp_rpm),
            self.settle("climber_ready", at_setpoint(&robot.climber)),
            move_amp(&robot.amp, self.config.amp.extended),
        ])
        .named("ramp_up_amp")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use robot_core::{BehaviorConfig, ids};

    use super::*;
    use crate::testing::{Call, run_for, scheduler, stub_robot};

    #[test]
    fn amp_behaviors_are_guarded() {
        let (robot, _) = stub_robot();
        let library = BehaviorLibrary::new(robot, BehaviorConfig::default()).unwrap();

        assert!(library.amp_shoot().unguarded_waits().is_empty());
        assert!(library.ramp_up_amp().unguarded_waits().is_empty());
    }

    #[test]
    fn amp_shoot_claims_the_intake() {
        let (robot, _) = stub_robot();
        let library = BehaviorLibrary::new(robot, BehaviorConfig::default()).unwrap();

        let claims = library.amp_shoot().claimed_requirements();

        for id in [ids::CLIMBER, ids::SHOOTER, ids::AMP, ids::INTAKE] {
            assert!(claims.contains(&id), "{id}");
        }
    }

    #[test]
    fn ramp_up_amp_spawns_alignment_separately() {
        let (robot, log) = stub_robot();
        let library = BehaviorLibrary::new(robot, BehaviorConfig::default()).unwrap();
        let (mut scheduler, clock) = scheduler();
        log.set_all_ready();

        let node = library.ramp_up_amp();
        // the alignment's drivetrain claim belongs to the spawned root
        assert!(!node.claimed_requirements().contains(&ids::DRIVETRAIN));
        assert!(log.calls().is_empty());

        let id = scheduler.submit(node).unwrap();
        run_for(&mut scheduler, &clock, Duration::from_millis(20), 1);

        assert!(!scheduler.is_active(id));
        assert_eq!(scheduler.active_count(), 1);
        assert_eq!(scheduler.holder(ids::DRIVETRAIN).map(|_| ()), Some(()));
        let calls = log.calls();
        assert!(matches!(calls[0], Call::PathPlanned(_)));
        assert_eq!(calls[1], Call::ClimberActuate(0.9));
        assert_eq!(calls[2], Call::ShooterActuate(2000.0));
        assert_eq!(calls[3], Call::AmpActuate(1.0));

        run_for(&mut scheduler, &clock, Duration::from_millis(20), 1);
        assert_eq!(
            &log.calls()[4..],
            &[Call::Color(robot_core::StatusColor::Amp), Call::PathRun, Call::DefaultColor]
        );
        assert_eq!(scheduler.active_count(), 0);
    }
}
