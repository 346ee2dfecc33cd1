//! Operator feedback.

use std::sync::Arc;

use action_tree::ActionNode;
use action_tree::builder::{detached, start_end, timeout};

use crate::BehaviorLibrary;

impl BehaviorLibrary {
    /// Rumbles the driver controller for `timing.vibrate`.
    ///
    /// The pulse runs as its own root, so the calling behavior finishes
    /// immediately and cancelling it does not cut the pulse short.
    pub fn vibrate_controller(&self) -> ActionNode {
        let start = Arc::clone(&self.robot.feedback);
        let stop = Arc::clone(&self.robot.feedback);
        let pulse = start_end(
            "vibrate",
            move || start.start_vibrate(),
            move || stop.stop_vibrate(),
        );
        detached(timeout(pulse, self.timing.vibrate).named("vibrate_pulse"))
            .named("vibrate_controller")
    }
}
