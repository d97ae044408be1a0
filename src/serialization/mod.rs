//! Transportable form of tasks.
//!
//! Everything that crosses a [`SerializationPort`] is a [`Serialized`] value, so a
//! decoder can always tell what it received and reject shapes it does not know.

use std::error::Error;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::storage::FlowRecord;
use crate::task::Params;

mod json;

pub use json::JsonSerializer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Serialized {
    Task(TaskRepr),
    Flow(FlowRecord),
}

impl Serialized {
    pub fn kind(&self) -> &'static str {
        match self {
            Serialized::Task(_) => "task",
            Serialized::Flow(_) => "flow",
        }
    }
}

/// Schema of a serialized task. The work function itself is not transportable;
/// only its name travels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRepr {
    pub name: String,
    pub flow_id: String,
    pub retries: i64,
    pub retry_delay: Duration,
    pub trigger: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<String>,
}

pub trait SerializationPort: Send + Sync {
    fn serialize(&self, value: &Serialized) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>>;

    fn deserialize(&self, bytes: &[u8]) -> Result<Serialized, Box<dyn Error + Send + Sync>>;
}
