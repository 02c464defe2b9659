//! Nested named timers for measuring backend setup and solve phases.

#[allow(clippy::module_inception)]
mod timers;
pub use timers::*;
