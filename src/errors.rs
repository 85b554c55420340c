use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Record families the data store can fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Budget,
    Goal,
    Transaction,
    Generator,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Budget => "budget",
            RecordKind::Goal => "goal",
            RecordKind::Transaction => "transaction",
            RecordKind::Generator => "generator",
        };
        f.write_str(label)
    }
}

/// Error type shared by the projection engine, its services, and the stores.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("invalid window: end {end} is before start {start}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
    #[error("{kind} {id} not found")]
    NotFound { kind: RecordKind, id: Uuid },
    #[error("generator {generator} has an invalid recurrence rule: {reason}")]
    InvalidRecurrenceRule { generator: Uuid, reason: String },
    #[error("decimal overflow while {context}")]
    ArithmeticOverflow { context: String },
    #[error("generator {generator} exceeded the limit of {limit} occurrences")]
    OccurrenceLimit { generator: Uuid, limit: usize },
    #[error("goal {goal}: projecting budget {budget} failed: {source}")]
    GoalBudget {
        goal: Uuid,
        budget: Uuid,
        #[source]
        source: Box<ProjectionError>,
    },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl ProjectionError {
    pub fn not_found(kind: RecordKind, id: Uuid) -> Self {
        ProjectionError::NotFound { kind, id }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        ProjectionError::ArithmeticOverflow {
            context: context.into(),
        }
    }
}

impl From<std::io::Error> for ProjectionError {
    fn from(err: std::io::Error) -> Self {
        ProjectionError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ProjectionError {
    fn from(err: serde_json::Error) -> Self {
        ProjectionError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
