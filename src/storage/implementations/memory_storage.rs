use async_trait::async_trait;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::storage::{FlowRecord, PersistencePort, TaskRecord};

/// In-memory implementation of PersistencePort for testing
#[derive(Clone, Default)]
pub struct MemoryStorage {
    tasks: Arc<Mutex<HashMap<String, TaskRecord>>>,
    flows: Arc<Mutex<HashMap<String, FlowRecord>>>,
    upsert_calls: Arc<Mutex<Vec<TaskRecord>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStorage {
    /// Create a new empty memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the stored record for a task id
    pub fn get_task(&self, key: &str) -> Option<TaskRecord> {
        lock(&self.tasks).get(key).cloned()
    }

    /// Get the stored record for a flow id
    pub fn get_flow(&self, key: &str) -> Option<FlowRecord> {
        lock(&self.flows).get(key).cloned()
    }

    /// Get all upsert calls made to this storage
    pub fn get_upsert_calls(&self) -> Vec<TaskRecord> {
        lock(&self.upsert_calls).clone()
    }
}

#[async_trait]
impl PersistencePort for MemoryStorage {
    async fn init(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        // Nothing to initialize for in-memory storage
        Ok(())
    }

    async fn upsert(&self, record: &TaskRecord) -> Result<(), Box<dyn Error + Send + Sync>> {
        lock(&self.upsert_calls).push(record.clone());

        lock(&self.flows).insert(record.flow.id.clone(), record.flow.clone());
        lock(&self.tasks).insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn fetch(&self, key: &str) -> Result<TaskRecord, Box<dyn Error + Send + Sync>> {
        let record = lock(&self.tasks)
            .get(key)
            .cloned()
            .ok_or_else(|| format!("task record '{}' not found", key))?;

        // The flow row may have been updated by another task's upsert.
        let flow = lock(&self.flows)
            .get(&record.flow.id)
            .cloned()
            .unwrap_or(record.flow);

        Ok(TaskRecord { flow, ..record })
    }
}
