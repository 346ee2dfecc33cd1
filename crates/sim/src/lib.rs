//! Simulated robot for exercising the behavior library.
//!
//! Provides in-memory implementations of every subsystem proxy and
//! collaborator, driven by a [`ManualClock`](action_tree::ManualClock),
//! plus a fixed-rate [`Session`] runner. The `robot-sim` binary runs a
//! scripted session; the scenario tests in `tests/` drive the same pieces
//! tick by tick.

pub mod config;
pub mod field;
pub mod proxies;
pub mod session;

pub use config::SimConfig;
pub use proxies::{Axis, Command, CommandLog, SimRobot, SimTuning};
pub use session::{Request, Script, Session, SessionReport};
