//! Tick-driven action composition and scheduling for multi-actuator robots.
//!
//! This library composes primitive actions (set a setpoint, wait for a
//! condition, follow a path) into time-bounded behaviors and runs them under
//! a fixed-rate control loop.
//!
//! - **Tick-based**: every node is advanced at most once per scheduler tick
//! - **Cooperative**: nothing blocks; waiting is a node polled each tick
//! - **Exclusive subsystems**: a registry arbitrates actuator ownership,
//!   newer submissions preempt older ones
//! - **Total cancellation**: cancelling a tree tears down every running
//!   descendant, bottom-up, before the call returns
//!
//! # Architecture
//!
//! - [`ActionNode`]: the schedulable unit, carrying an [`ActionKind`]
//! - [`NodeState`]: Pending, Running, Finished or Cancelled
//! - Composites: sequences, parallel groups, races, repeating sequences
//! - Decorators: [`Timeout`], [`Detached`]
//! - [`Task`]: seam for collaborator-implemented leaves
//! - [`Scheduler`] and [`ResourceRegistry`]: execution and arbitration

pub mod builder;
pub mod clock;
pub mod composite;
pub mod context;
pub mod decorator;
pub mod error;
pub mod node;
pub mod registry;
pub mod scheduler;
pub mod state;
pub mod subsystem;
pub mod task;

// Re-export core types for ergonomic API
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use composite::Sequential;
pub use context::TickContext;
pub use decorator::{Detached, Timeout};
pub use error::{Result, SchedulerError};
pub use node::{ActionKind, ActionNode, Effect, Predicate};
pub use registry::{ClaimResult, ResourceRegistry};
pub use scheduler::{ActionId, ConflictPolicy, Scheduler};
pub use state::NodeState;
pub use subsystem::{Requirements, SubsystemId};
pub use task::{StartEnd, Task, TaskStatus};
