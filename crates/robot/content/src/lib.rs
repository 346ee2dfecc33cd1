//! Data-driven robot configuration.
//!
//! This crate reads [`BehaviorConfig`](robot_core::BehaviorConfig) from TOML
//! files and bundles the default tuning shipped with the robot
//! (`data/behavior.toml`).
//!
//! Loaded configuration is validated before it is returned, so anything a
//! loader hands back can be given straight to the behavior library.

pub mod loaders;

pub use loaders::{ConfigLoader, LoadResult};
