use std::error::Error;

use thiserror::Error;

/// Rejected task inputs. Raised before a task touches its flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("task name is required when no work function is given")]
    MissingName,

    #[error("task name must not be empty")]
    EmptyName,

    #[error("{field} must be {expected}; received {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("retries must be -1 (unlimited) or greater; received {0}")]
    RetriesOutOfRange(i64),

    #[error("unknown trigger '{0}'")]
    UnknownTrigger(String),

    #[error("unknown task option '{0}'")]
    UnknownField(String),
}

/// Refusals raised by a flow while registering tasks or relationships.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("flow '{flow}' already has a task named '{task}'")]
    DuplicateTask { flow: String, task: String },

    #[error("task '{task}' is not registered with flow '{flow}'")]
    UnknownTask { flow: String, task: String },

    #[error("relationship '{before}' -> '{after}' would introduce a cycle")]
    Cycle { before: String, after: String },
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("tasks must be created with a flow or inside a flow scope")]
    NoOwningFlow,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Flow(#[from] FlowError),

    #[error("deserialized object is not a task; found {found}")]
    NotATask { found: &'static str },

    #[error("serialized task belongs to flow '{found}', expected '{expected}'")]
    FlowMismatch { expected: String, found: String },

    #[error("serialization failed: {0}")]
    Serialization(#[source] Box<dyn Error + Send + Sync>),

    #[error("persistence failed: {0}")]
    Persistence(#[source] Box<dyn Error + Send + Sync>),

    #[error("task '{task}' failed: {source}")]
    Run {
        task: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl TaskError {
    /// True for the failures that mean no owning flow could be resolved.
    pub fn is_configuration(&self) -> bool {
        matches!(self, TaskError::NoOwningFlow)
    }
}
