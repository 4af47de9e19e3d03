//! Feedback collection
//!
//! This module provides reference sets, feedback sources (artificial and
//! interactive), form constructors and the [`FeedbackProvider`] that routes
//! reference sets to sources.
//!
//! [`FeedbackProvider`]: provider::FeedbackProvider

pub mod artificial;
pub mod forms;
pub mod human;
pub mod provider;
pub mod reference_sets;
pub mod source;

pub mod prelude {
    pub use super::artificial::ArtificialValueDM;
    pub use super::forms::{FormConstructor, PairwiseComparisons};
    pub use super::human::{InteractiveDM, Responder};
    pub use super::provider::{FeedbackProvider, FeedbackResult};
    pub use super::reference_sets::{ReferenceSet, ReferenceSets, ReferenceSetsResult};
    pub use super::source::{
        BoundContext, ContextBinding, FeedbackSource, SourceFeedback, StatementIds,
    };
}
