//! Layer 1: single-subsystem leaves and setpoint predicates.
//!
//! Writers declare the subsystem they drive; `*_unconditional` writers and
//! all predicates declare nothing and are exempt from arbitration.

pub mod actions;
pub mod conditions;
