//! Subsystem identifiers used as claimable resources.

use std::collections::BTreeSet;
use std::fmt;

/// Names one actuator subsystem (climber, shooter, ...).
///
/// Identifiers are compared by name, so two proxies that report the same
/// name are the same resource as far as the registry is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubsystemId(&'static str);

impl SubsystemId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for SubsystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Set of subsystems a node claims while it is live.
///
/// Ordered so that conflict reports and log output are deterministic.
pub type Requirements = BTreeSet<SubsystemId>;
