//! Conventional subsystem identifiers.
//!
//! Proxies report their own id through [`SubsystemProxy::id`]; these are
//! the names the shipped robot and the simulator use.
//!
//! [`SubsystemProxy::id`]: crate::SubsystemProxy::id

use action_tree::SubsystemId;

pub const CLIMBER: SubsystemId = SubsystemId::new("climber");
pub const SHOOTER: SubsystemId = SubsystemId::new("shooter");
pub const INTAKE: SubsystemId = SubsystemId::new("intake");
pub const AMP: SubsystemId = SubsystemId::new("amp");
pub const DRIVETRAIN: SubsystemId = SubsystemId::new("drivetrain");
