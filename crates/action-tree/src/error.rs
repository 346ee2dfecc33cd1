//! Errors surfaced across the scheduler boundary.
//!
//! Timeouts, preemption and collaborator failures are handled inside the
//! engine and never appear here. Only a submission refused under
//! [`ConflictPolicy::Reject`](crate::ConflictPolicy::Reject) is reported.

use thiserror::Error;

use crate::{ActionId, SubsystemId};

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("subsystem {subsystem} is already claimed by {held_by}")]
    ResourceConflict {
        subsystem: SubsystemId,
        held_by: ActionId,
    },
}
