//! Resource registry: which root currently claims which subsystem.
//!
//! The registry is the sole arbiter of subsystem ownership. It holds at most
//! one claimant per subsystem; exempt roots (no requirements) never appear.
//! Conflict *policy* lives in the scheduler; the registry only records and
//! reports.

use std::collections::BTreeMap;

use tracing::trace;

use crate::{ActionId, Requirements, SubsystemId};

/// Result of a claim attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimResult {
    /// Claim recorded.
    Acquired,
    /// The caller already held the claim.
    AlreadyHeld,
    /// Another root holds the subsystem.
    Rejected {
        /// Who holds the claim.
        held_by: ActionId,
    },
}

/// Subsystem → claiming root.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    claims: BTreeMap<SubsystemId, ActionId>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current holder of `subsystem`, if any.
    pub fn holder(&self, subsystem: SubsystemId) -> Option<ActionId> {
        self.claims.get(&subsystem).copied()
    }

    /// Attempts to claim `subsystem` for `owner`.
    pub fn try_claim(&mut self, subsystem: SubsystemId, owner: ActionId) -> ClaimResult {
        match self.claims.get(&subsystem) {
            Some(&held_by) if held_by == owner => ClaimResult::AlreadyHeld,
            Some(&held_by) => ClaimResult::Rejected { held_by },
            None => {
                self.claims.insert(subsystem, owner);
                trace!(%subsystem, %owner, "claimed");
                ClaimResult::Acquired
            }
        }
    }

    /// Releases `subsystem` if `owner` holds it.
    ///
    /// Returns `false` when the claim belongs to someone else or is absent.
    pub fn release(&mut self, subsystem: SubsystemId, owner: ActionId) -> bool {
        if self.holder(subsystem) == Some(owner) {
            self.claims.remove(&subsystem);
            trace!(%subsystem, %owner, "released");
            true
        } else {
            false
        }
    }

    /// Releases every claim held by `owner`, returning what was released.
    pub fn release_all(&mut self, owner: ActionId) -> Vec<SubsystemId> {
        self.release_where(owner, |_| true)
    }

    /// Releases claims of `owner` that are no longer in `live`.
    pub fn retain(&mut self, owner: ActionId, live: &Requirements) -> Vec<SubsystemId> {
        self.release_where(owner, |subsystem| !live.contains(subsystem))
    }

    fn release_where(
        &mut self,
        owner: ActionId,
        mut should_release: impl FnMut(&SubsystemId) -> bool,
    ) -> Vec<SubsystemId> {
        let mut released = Vec::new();
        self.claims.retain(|subsystem, holder| {
            if *holder == owner && should_release(subsystem) {
                released.push(*subsystem);
                false
            } else {
                true
            }
        });
        released
    }

    /// Every subsystem currently held by `owner`.
    pub fn claims_of(&self, owner: ActionId) -> Requirements {
        self.claims
            .iter()
            .filter(|(_, holder)| **holder == owner)
            .map(|(subsystem, _)| *subsystem)
            .collect()
    }

    /// Claims in `requirements` held by roots other than `owner`.
    ///
    /// Pass `None` for a root that has not been registered yet.
    pub fn conflicts(
        &self,
        requirements: &Requirements,
        owner: Option<ActionId>,
    ) -> Vec<(SubsystemId, ActionId)> {
        requirements
            .iter()
            .filter_map(|subsystem| {
                self.holder(*subsystem)
                    .filter(|holder| Some(*holder) != owner)
                    .map(|holder| (*subsystem, holder))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
