//! Drive-to-pose alignment.
//!
//! Targets are resolved when the behavior is built, from the alliance
//! reported at that moment.

use action_tree::ActionNode;
use action_tree::builder::sequence;
use robot_core::{AlignConfig, Alliance, PathConstraints, Pose2d, Robot, StatusColor};
use tracing::debug;

use crate::BehaviorLibrary;
use crate::nodes::actions::{set_default_color, set_status_color};

impl BehaviorLibrary {
    /// Follows a planned path to `target(alliance)`, showing the align
    /// color while driving.
    pub fn auto_align<F>(&self, target: F) -> ActionNode
    where
        F: FnOnce(Alliance) -> Pose2d,
    {
        let pose = target(self.robot.alliance.alliance());
        align_to(
            &self.robot,
            StatusColor::Align,
            pose,
            &self.config.align,
            self.config.drivetrain.constraints(),
        )
        .named("auto_align")
    }

    /// Drives to the amp scoring pose for the current alliance.
    pub fn auto_amp_align(&self) -> ActionNode {
        amp_align(
            &self.robot,
            &self.config.align,
            self.config.drivetrain.constraints(),
        )
    }
}

/// Amp alignment built from owned handles, for trees built on activation.
pub(crate) fn amp_align(
    robot: &Robot,
    align: &AlignConfig,
    constraints: PathConstraints,
) -> ActionNode {
    let pose = align.amp_pose(robot.alliance.alliance().is_red());
    align_to(robot, StatusColor::Amp, pose, align, constraints).named("auto_amp_align")
}

fn align_to(
    robot: &Robot,
    color: StatusColor,
    pose: Pose2d,
    align: &AlignConfig,
    constraints: PathConstraints,
) -> ActionNode {
    debug!(?pose, ?color, "planning alignment path");
    sequence(vec![
        set_status_color(&robot.status, color),
        robot.path_planner.plan_path(
            pose,
            constraints,
            align.end_velocity,
            align.rotation_delay_distance,
        ),
        set_default_color(&robot.status),
    ])
}

#[cfg(test)]
mod tests {
    use robot_core::BehaviorConfig;

    use super::*;
    use crate::testing::{Call, scheduler, stub_robot};

    #[test]
    fn amp_pose_follows_alliance() {
        let (robot, log) = stub_robot();
        let library = BehaviorLibrary::new(robot, BehaviorConfig::default()).unwrap();

        log.set_alliance(Alliance::Red);
        library.auto_amp_align();
        log.set_alliance(Alliance::Blue);
        library.auto_amp_align();
        log.set_alliance(Alliance::Unknown);
        library.auto_amp_align();

        assert_eq!(
            log.calls(),
            vec![
                Call::PathPlanned(Pose2d::new(14.6, 7.75, 90.0)),
                Call::PathPlanned(Pose2d::new(1.94, 7.75, 90.0)),
                Call::PathPlanned(Pose2d::new(1.94, 7.75, 90.0)),
            ]
        );
    }

    #[test]
    fn align_brackets_the_path_with_status_colors() {
        let (robot, log) = stub_robot();
        let library = BehaviorLibrary::new(robot, BehaviorConfig::default()).unwrap();
        let (mut scheduler, _clock) = scheduler();

        let node = library.auto_align(|alliance| match alliance {
            Alliance::Red => Pose2d::new(10.0, 2.0, 0.0),
            _ => Pose2d::new(6.0, 2.0, 180.0),
        });
        scheduler.submit(node).unwrap();
        scheduler.tick();

        assert_eq!(
            log.calls(),
            vec![
                Call::PathPlanned(Pose2d::new(6.0, 2.0, 180.0)),
                Call::Color(StatusColor::Align),
                Call::PathRun,
                Call::DefaultColor,
            ]
        );
    }
}
