//! Feedback sources
//!
//! A feedback source turns reference sets into preference statements. It is
//! bound to a context and a decision maker for the duration of one
//! generation; [`ContextBinding`] makes sure the binding is released.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::reference_sets::ReferenceSets;
use crate::context::{DMContext, DecisionMakerId};
use crate::error::{Component, ElicitError, ElicitResult};
use crate::statement::statement::PreferenceStatement;
use crate::statement::wrapper::PreferenceInformationWrapper;

/// State a source holds while bound
#[derive(Clone, Debug, PartialEq)]
pub struct BoundContext {
    /// Iteration of the bound context
    pub iteration: usize,
    /// Timestamp of the bound context
    pub timestamp: Option<DateTime<Utc>>,
    /// Decision maker the source answers for
    pub decision_maker: DecisionMakerId,
}

impl BoundContext {
    /// Capture the parts of `context` a source needs
    pub fn new(context: &DMContext, decision_maker: &DecisionMakerId) -> Self {
        Self {
            iteration: context.iteration,
            timestamp: context.timestamp,
            decision_maker: decision_maker.clone(),
        }
    }

    /// Precondition error for sources asked to generate while unbound
    pub fn missing(source: &str) -> ElicitError {
        ElicitError::precondition(
            Component::FeedbackSource,
            "the source is not bound to a context",
        )
        .with_handler(source)
    }
}

/// Statements produced by one source for one decision maker
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceFeedback {
    /// Produced statements, already wrapped
    pub statements: Vec<PreferenceInformationWrapper>,
    /// Time spent producing them
    pub elapsed: Duration,
}

impl SourceFeedback {
    /// Number of produced statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// Whether nothing was produced
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Source of preference statements
///
/// # Example
///
/// ```rust,ignore
/// use pref_elicit::prelude::*;
///
/// let hidden = LNorm::chebyshev(Some(vec![0.5, 0.5]));
/// let mut dm = ArtificialValueDM::new(hidden);
/// let ctx = DMContext::builder(1).build();
///
/// let feedback = {
///     let mut bound = ContextBinding::bind(&mut dm, &ctx, &"dm1".into())?;
///     bound.generate(&reference_sets)?
/// };
/// assert!(!dm.is_bound());
/// ```
pub trait FeedbackSource: Send {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Attach the source to a context and decision maker
    fn bind(&mut self, context: &DMContext, decision_maker: &DecisionMakerId) -> ElicitResult<()>;

    /// Release the binding; a no-op when unbound
    fn unbind(&mut self);

    /// Whether a binding is active
    fn is_bound(&self) -> bool;

    /// Produce statements for the given reference sets. Requires a binding.
    fn generate(&mut self, reference_sets: &ReferenceSets) -> ElicitResult<SourceFeedback>;

    /// Check the source's own configuration
    fn validate(&self) -> ElicitResult<()> {
        Ok(())
    }
}

impl<S: FeedbackSource + ?Sized> FeedbackSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn bind(&mut self, context: &DMContext, decision_maker: &DecisionMakerId) -> ElicitResult<()> {
        (**self).bind(context, decision_maker)
    }

    fn unbind(&mut self) {
        (**self).unbind()
    }

    fn is_bound(&self) -> bool {
        (**self).is_bound()
    }

    fn generate(&mut self, reference_sets: &ReferenceSets) -> ElicitResult<SourceFeedback> {
        (**self).generate(reference_sets)
    }

    fn validate(&self) -> ElicitResult<()> {
        (**self).validate()
    }
}

/// Scoped binding of a source; unbinds when dropped
pub struct ContextBinding<'a, S: FeedbackSource + ?Sized> {
    source: &'a mut S,
}

impl<'a, S: FeedbackSource + ?Sized> ContextBinding<'a, S> {
    /// Bind `source`; the binding lasts until the guard is dropped
    pub fn bind(
        source: &'a mut S,
        context: &DMContext,
        decision_maker: &DecisionMakerId,
    ) -> ElicitResult<Self> {
        source.bind(context, decision_maker)?;
        Ok(Self { source })
    }
}

impl<S: FeedbackSource + ?Sized> Deref for ContextBinding<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.source
    }
}

impl<S: FeedbackSource + ?Sized> DerefMut for ContextBinding<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.source
    }
}

impl<S: FeedbackSource + ?Sized> Drop for ContextBinding<'_, S> {
    fn drop(&mut self) {
        self.source.unbind();
    }
}

/// Monotone id sequence for wrapping produced statements
#[derive(Clone, Debug, Default)]
pub struct StatementIds {
    next: u64,
}

impl StatementIds {
    /// Sequence starting at `first`
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Take the next id; fails once the id space is exhausted
    pub fn take(&mut self) -> ElicitResult<u64> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or_else(|| {
            ElicitError::configuration(
                Component::FeedbackSource,
                format!("id {} leaves no room for another id", id),
            )
        })?;
        Ok(id)
    }

    /// Wrap produced statements with consecutive ids
    pub fn wrap_all(
        &mut self,
        statements: Vec<PreferenceStatement>,
        bound: &BoundContext,
    ) -> ElicitResult<Vec<PreferenceInformationWrapper>> {
        statements
            .into_iter()
            .map(|s| {
                let id = self.take()?;
                Ok(PreferenceInformationWrapper::new(s, id, bound.iteration, bound.timestamp))
            })
            .collect()
    }

    /// Id handed out next
    pub fn peek(&self) -> u64 {
        self.next
    }
}
