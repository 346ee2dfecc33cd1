//! Named robot behaviors built from action trees.
//!
//! The library is layered the same way its trees are:
//!
//! ```text
//! BehaviorLibrary::shoot(rpm, height)          ← recipes
//!   └─ sequence
//!       ├─ timeout(ramp_up(rpm, height))       ← recipes
//!       │   ├─ climb_to / spin_to              ← nodes::actions
//!       │   └─ settle(climber ∧ shooter)       ← nodes::conditions
//!       ├─ run_rollers_unconditional           ← nodes::actions
//!       ├─ delay
//!       └─ neutral(false)                      ← recipes
//! ```
//!
//! Every recipe returns a fresh tree per call. Recipes that end on their
//! own bound each setpoint wait by `timing.settle_timeout`, so none of them
//! can stall on a subsystem that never arrives.
//!
//! ```rust,ignore
//! let library = BehaviorLibrary::new(robot, config)?;
//! let id = scheduler.submit(library.shoot(3000.0, 0.5)?)?;
//! ```

pub mod library;
pub mod nodes;
mod recipes;

#[cfg(test)]
mod testing;

pub use library::BehaviorLibrary;
