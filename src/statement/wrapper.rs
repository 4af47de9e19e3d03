//! Timestamped, identified preference statements

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::statement::{PreferenceStatement, StatementKind};

/// A preference statement as recorded in a history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreferenceInformationWrapper {
    statement: PreferenceStatement,
    id: u64,
    iteration: usize,
    timestamp: Option<DateTime<Utc>>,
}

/// Rendered identity of a wrapper, used for duplicate detection
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WrapperKey {
    pub kind: StatementKind,
    pub first: String,
    pub second: String,
    pub id: u64,
    pub iteration: usize,
}

impl PreferenceInformationWrapper {
    /// Wrap a statement elicited at `iteration`
    pub fn new(
        statement: PreferenceStatement,
        id: u64,
        iteration: usize,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            statement,
            id,
            iteration,
            timestamp,
        }
    }

    /// Wrap a statement without a timestamp
    pub fn untimed(statement: PreferenceStatement, id: u64, iteration: usize) -> Self {
        Self::new(statement, id, iteration, None)
    }

    /// The wrapped statement
    pub fn statement(&self) -> &PreferenceStatement {
        &self.statement
    }

    /// Unique identifier within a history
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Elicitation iteration that produced the statement
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Wall-clock time of elicitation, if recorded
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Same entry under a different id
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }

    /// Consume the wrapper, returning the statement
    pub fn into_statement(self) -> PreferenceStatement {
        self.statement
    }

    /// Identity key: statement kind, both alternative names, id and iteration
    pub fn key(&self) -> WrapperKey {
        WrapperKey {
            kind: self.statement.kind(),
            first: self.statement.first().name().to_string(),
            second: self.statement.second().name().to_string(),
            id: self.id,
            iteration: self.iteration,
        }
    }

    /// Whether `self` may precede `next` in a chronologically ordered batch.
    ///
    /// Iterations must not decrease. Within the same iteration timestamps
    /// must not decrease when both are present.
    pub fn may_precede(&self, next: &Self) -> bool {
        if self.iteration != next.iteration {
            return self.iteration < next.iteration;
        }
        match (self.timestamp, next.timestamp) {
            (Some(a), Some(b)) => a <= b,
            _ => true,
        }
    }
}

/// Structural equality on `(statement value, id)`
impl PartialEq for PreferenceInformationWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.statement == other.statement
    }
}

impl fmt::Display for PreferenceInformationWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [id = {}, iteration = {}]",
            self.statement, self.id, self.iteration
        )
    }
}
