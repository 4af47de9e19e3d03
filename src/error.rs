//! Error types for pref-elicit
//!
//! All failures are reported through a single [`ElicitError`] carrying the
//! component that produced it, the kind of failure and optional structured
//! context. Errors raised deeper in the pipeline are kept as the `cause`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Component that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    /// Alternatives and alternative sets
    Alternative,
    /// Preference models
    Model,
    /// Preference statements
    Statement,
    /// Preference history store
    History,
    /// Refiner and its filters
    Refiner,
    /// Feedback provider
    FeedbackProvider,
    /// A single feedback source (artificial or interactive decision maker)
    FeedbackSource,
    /// Form constructors turning reference sets into statements
    FormConstructor,
    /// Decision-making system and elicitation cycle
    System,
    /// Configuration loading
    Config,
}

impl Component {
    /// Human-readable component name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Alternative => "alternative",
            Self::Model => "model",
            Self::Statement => "statement",
            Self::History => "history",
            Self::Refiner => "refiner",
            Self::FeedbackProvider => "feedback provider",
            Self::FeedbackSource => "feedback source",
            Self::FormConstructor => "form constructor",
            Self::System => "system",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of failure
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ErrorKind {
    /// Component misconfigured (detected by `validate()` or at construction)
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Operation input missing or malformed
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Batch violates the chronological ordering of the history
    #[error("ordering violation: {0}")]
    Ordering(String),

    /// Entry already present
    #[error("duplicate entry: {0}")]
    Duplicate(String),

    /// Entry expected to be present is missing
    #[error("missing entry: {0}")]
    Membership(String),

    /// Preference model could not score an alternative
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    /// Vector lengths disagree
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Serialization or deserialization failure
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO failure while persisting
    #[error("io error: {0}")]
    Io(String),

    /// Persisted data failed its integrity check
    #[error("corrupted data: {0}")]
    Corrupted(String),
}

/// Optional structured context attached to an error
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// Name of the handler (filter, source, decision maker, history) involved
    pub handler: Option<String>,
    /// Elicitation iteration during which the failure occurred
    pub iteration: Option<usize>,
    /// The item that triggered the failure (alternative, statement, ...)
    pub subject: Option<String>,
}

impl ErrorContext {
    /// Whether no context was recorded
    pub fn is_empty(&self) -> bool {
        self.handler.is_none() && self.iteration.is_none() && self.subject.is_none()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let mut parts = Vec::new();
        if let Some(handler) = &self.handler {
            parts.push(format!("handler = {}", handler));
        }
        if let Some(iteration) = self.iteration {
            parts.push(format!("iteration = {}", iteration));
        }
        if let Some(subject) = &self.subject {
            parts.push(format!("subject = {}", subject));
        }
        write!(f, " ({})", parts.join(", "))
    }
}

/// Error raised by any component of the elicitation pipeline
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{component} error: {kind}{context}")]
pub struct ElicitError {
    /// Producing component
    pub component: Component,
    /// What went wrong
    pub kind: ErrorKind,
    /// Where it went wrong
    pub context: ErrorContext,
    /// Underlying error from a collaborator, if any
    #[source]
    pub cause: Option<Box<ElicitError>>,
}

impl ElicitError {
    /// Create an error with no context
    pub fn new(component: Component, kind: ErrorKind) -> Self {
        Self {
            component,
            kind,
            context: ErrorContext::default(),
            cause: None,
        }
    }

    /// Configuration error
    pub fn configuration(component: Component, message: impl Into<String>) -> Self {
        Self::new(component, ErrorKind::Configuration(message.into()))
    }

    /// Precondition error
    pub fn precondition(component: Component, message: impl Into<String>) -> Self {
        Self::new(component, ErrorKind::Precondition(message.into()))
    }

    /// Evaluation error
    pub fn evaluation(component: Component, message: impl Into<String>) -> Self {
        Self::new(component, ErrorKind::Evaluation(message.into()))
    }

    /// Dimension mismatch error
    pub fn dimension_mismatch(component: Component, expected: usize, actual: usize) -> Self {
        Self::new(component, ErrorKind::DimensionMismatch { expected, actual })
    }

    /// Attach the handler name
    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.context.handler = Some(handler.into());
        self
    }

    /// Attach the iteration
    pub fn with_iteration(mut self, iteration: usize) -> Self {
        self.context.iteration = Some(iteration);
        self
    }

    /// Attach the triggering subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.context.subject = Some(subject.into());
        self
    }

    /// Record the underlying error
    pub fn caused_by(mut self, cause: ElicitError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Wrap `cause` in a new error from `component` keeping the cause's kind
    pub fn wrap(component: Component, cause: ElicitError) -> Self {
        Self::new(component, cause.kind.clone()).caused_by(cause)
    }

    /// The innermost error in the cause chain
    pub fn root_cause(&self) -> &ElicitError {
        let mut current = self;
        while let Some(cause) = &current.cause {
            current = cause;
        }
        current
    }
}

/// Result type alias for elicitation operations
pub type ElicitResult<T> = Result<T, ElicitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_without_context() {
        let err = ElicitError::precondition(Component::Refiner, "criteria are missing");
        assert_eq!(
            err.to_string(),
            "refiner error: precondition failed: criteria are missing"
        );
    }

    #[test]
    fn test_error_display_with_context() {
        let err = ElicitError::new(Component::History, ErrorKind::Duplicate("PC(A1 > A2)".into()))
            .with_handler("dm1")
            .with_iteration(3);
        assert_eq!(
            err.to_string(),
            "history error: duplicate entry: PC(A1 > A2) (handler = dm1, iteration = 3)"
        );
    }

    #[test]
    fn test_dimension_mismatch_display() {
        let err = ElicitError::dimension_mismatch(Component::Model, 3, 2);
        assert_eq!(
            err.to_string(),
            "model error: dimension mismatch: expected 3, got 2"
        );
    }

    #[test]
    fn test_wrap_keeps_kind_and_cause() {
        let inner = ElicitError::evaluation(Component::Model, "zero direction")
            .with_subject("A1");
        let outer = ElicitError::wrap(Component::FeedbackProvider, inner.clone())
            .with_handler("dm1");

        assert_eq!(outer.component, Component::FeedbackProvider);
        assert_eq!(outer.kind, inner.kind);
        assert_eq!(outer.root_cause(), &inner);
        assert!(std::error::Error::source(&outer).is_some());
    }
}
