use std::error::Error;

use serde::{Deserialize, Serialize};

pub mod implementations;
pub mod sqlite_storage;
pub use implementations::*;

/// Persisted form of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub id: String,
    pub name: String,
}

/// Persisted form of a task, keyed by the task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    pub flow: FlowRecord,
}

/// Backing store tasks synchronise with through `save` and `reload`.
#[async_trait::async_trait]
pub trait PersistencePort: Send + Sync {
    async fn init(&self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Inserts the record or replaces the one stored under the same id.
    /// The nested flow record is upserted as well.
    async fn upsert(&self, record: &TaskRecord) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Returns the record stored under `key`, or an error when there is none.
    async fn fetch(&self, key: &str) -> Result<TaskRecord, Box<dyn Error + Send + Sync>>;
}
