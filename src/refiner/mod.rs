//! Refiner
//!
//! Termination filters decide whether to elicit at all; reduction filters
//! shrink the superset the reference sets are drawn from.

pub mod reduction;
#[allow(clippy::module_inception)]
pub mod refiner;
pub mod termination;

pub mod prelude {
    pub use super::reduction::{ReductionFilter, RemoveDominated, RemoveDuplicates};
    pub use super::refiner::{ReductionStep, Refiner, RefinerResult, RefinerStatus};
    pub use super::termination::{
        MaxInteractions, MinAlternatives, RequiredIterationGap, TerminationFilter,
        TerminationOutcome,
    };
}
