//! Preference statements
//!
//! Pairwise comparisons produced by feedback sources and their recorded
//! form inside a [`History`](crate::history::History).

#[allow(clippy::module_inception)]
pub mod statement;
pub mod wrapper;

pub mod prelude {
    pub use super::statement::{PreferenceStatement, StatementKind};
    pub use super::wrapper::{PreferenceInformationWrapper, WrapperKey};
}
