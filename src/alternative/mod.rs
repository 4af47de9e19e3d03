//! Alternatives and criteria
//!
//! This module provides the value types the whole pipeline passes around.

#[allow(clippy::module_inception)]
pub mod alternative;
pub mod criteria;

pub mod prelude {
    pub use super::alternative::*;
    pub use super::criteria::*;
}
