//! Layer 2: named behaviors.
//!
//! Each submodule adds one family of recipes to
//! [`BehaviorLibrary`](crate::BehaviorLibrary).

mod align;
mod amp;
mod feedback;
mod neutral;
mod shooting;

pub(crate) use align::amp_align;
