//! Decision-making systems and the elicitation cycle
//!
//! Ties the refiner, the feedback provider and the per-decision-maker
//! histories together into one synchronous elicitation cycle.

pub mod cycle;
pub mod dms;

pub mod prelude {
    pub use super::cycle::{CycleReport, ElicitationCycle, ReferenceSetsConstructor};
    pub use super::dms::DecisionMakingSystem;
}
