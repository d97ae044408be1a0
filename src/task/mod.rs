use log::{debug, info};
use serde_json::{Map, Value};
use std::fmt;
use std::ops::{BitOr, Shl, Shr};
use std::sync::Arc;
use std::time::Duration;

mod builder;
mod options;
pub mod retry;
mod state;
mod trigger;
mod work;

pub use builder::TaskBuilder;
pub use options::TaskOptions;
pub use retry::RetryPolicy;
pub use state::TaskState;
pub use trigger::{TriggerRef, ALL_SUCCESS};
pub use work::{work_fn, Arguments, FnWork, Work};

use crate::error::{TaskError, ValidationError};
use crate::flow::FlowGraph;
use crate::serialization::{SerializationPort, Serialized, TaskRepr};
use crate::storage::{PersistencePort, TaskRecord};

/// Parameter bindings carried by a task. Not interpreted by the task itself.
pub type Params = Map<String, Value>;

/// One unit of work in a flow, together with its retry and trigger policy.
///
/// A task is only a descriptor: it registers itself and its ordering edges with its
/// flow and can run its work function once, but retries and triggers are left to
/// whatever executes the flow.
pub struct Task {
    name: String,
    flow: Arc<dyn FlowGraph>,
    work: Option<Arc<dyn Work>>,
    params: Option<Params>,
    retry_policy: RetryPolicy,
    trigger: TriggerRef,
    /// Key of the record this task was last saved under or reloaded from
    saved_key: Option<String>,
}

impl Task {
    pub fn builder() -> TaskBuilder {
        TaskBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the task locally. The flow is not told; persist with [`Task::save`].
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// `<flow id>/<task name>`, recomputed on every call.
    pub fn id(&self) -> String {
        format!("{}/{}", self.flow.id(), self.name)
    }

    pub fn flow(&self) -> &Arc<dyn FlowGraph> {
        &self.flow
    }

    pub fn work(&self) -> Option<&Arc<dyn Work>> {
        self.work.as_ref()
    }

    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    pub fn retries(&self) -> i64 {
        self.retry_policy.max_retries()
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_policy.retry_delay()
    }

    pub fn trigger(&self) -> &TriggerRef {
        &self.trigger
    }

    /// Asks the flow to run this task before each of `tasks`.
    pub fn run_before(&self, tasks: &[&Task]) -> Result<(), TaskError> {
        for task in tasks {
            self.flow.add_relationship(self, task)?;
        }
        Ok(())
    }

    /// Asks the flow to run this task after each of `tasks`.
    pub fn run_after(&self, tasks: &[&Task]) -> Result<(), TaskError> {
        for task in tasks {
            self.flow.add_relationship(task, self)?;
        }
        Ok(())
    }

    /// Calls the work function, if there is one.
    pub fn run(&self, arguments: &Arguments) -> Result<Option<Value>, TaskError> {
        let Some(work) = &self.work else {
            return Ok(None);
        };
        work.call(arguments)
            .map(Some)
            .map_err(|source| TaskError::Run {
                task: self.id(),
                source,
            })
    }

    pub fn to_repr(&self) -> TaskRepr {
        TaskRepr {
            name: self.name.clone(),
            flow_id: self.flow.id(),
            retries: self.retries(),
            retry_delay: self.retry_delay(),
            trigger: self.trigger.name().to_string(),
            params: self.params.clone(),
            work: self.work.as_ref().map(|work| work.name().to_string()),
        }
    }

    pub fn serialize(&self, port: &dyn SerializationPort) -> Result<Vec<u8>, TaskError> {
        port.serialize(&Serialized::Task(self.to_repr()))
            .map_err(TaskError::Serialization)
    }

    /// Rebuilds a task inside `flow`, which must be the flow it was serialized from.
    ///
    /// Only built-in triggers are resolved; see [`Task::from_serialized_with`] for
    /// custom ones. The task comes back without work.
    pub fn from_serialized(
        bytes: &[u8],
        port: &dyn SerializationPort,
        flow: Arc<dyn FlowGraph>,
    ) -> Result<Task, TaskError> {
        Self::from_serialized_with(bytes, port, flow, |_| None)
    }

    /// Like [`Task::from_serialized`], resolving trigger names that are not built in
    /// through `triggers`.
    ///
    /// The repr is validated like a constructed task. The task is registered with
    /// `flow` only when the flow does not hold its name yet.
    pub fn from_serialized_with<F>(
        bytes: &[u8],
        port: &dyn SerializationPort,
        flow: Arc<dyn FlowGraph>,
        triggers: F,
    ) -> Result<Task, TaskError>
    where
        F: Fn(&str) -> Option<TriggerRef>,
    {
        let repr = match port.deserialize(bytes).map_err(TaskError::Serialization)? {
            Serialized::Task(repr) => repr,
            other => return Err(TaskError::NotATask { found: other.kind() }),
        };

        let expected = flow.id();
        if repr.flow_id != expected {
            return Err(TaskError::FlowMismatch {
                expected,
                found: repr.flow_id,
            });
        }

        if repr.name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let retry_policy = RetryPolicy::new(repr.retries, repr.retry_delay)?;
        let trigger = TriggerRef::builtin(&repr.trigger)
            .or_else(|| triggers(&repr.trigger))
            .ok_or(ValidationError::UnknownTrigger(repr.trigger))?;

        let task = Task {
            name: repr.name,
            flow,
            work: None,
            params: repr.params,
            retry_policy,
            trigger,
            saved_key: None,
        };
        if !task.flow.contains_task(&task.name) {
            task.flow.add_task(&task)?;
        }
        debug!("Restored task '{}'", task.id());
        Ok(task)
    }

    pub fn as_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id(),
            name: self.name.clone(),
            flow: self.flow.as_record(),
        }
    }

    /// Upserts this task's record and returns it.
    pub async fn save(&mut self, store: &dyn PersistencePort) -> Result<TaskRecord, TaskError> {
        let record = self.as_record();
        store
            .upsert(&record)
            .await
            .map_err(TaskError::Persistence)?;
        info!("Saved task '{}'", record.id);
        self.saved_key = Some(record.id.clone());
        Ok(record)
    }

    /// Overwrites the name with the persisted one. Nothing else is touched.
    ///
    /// The record is looked up under the key of the last save or reload, falling
    /// back to the current id for a task that was never saved.
    pub async fn reload(&mut self, store: &dyn PersistencePort) -> Result<(), TaskError> {
        let key = self.saved_key.clone().unwrap_or_else(|| self.id());
        let record = store.fetch(&key).await.map_err(TaskError::Persistence)?;
        info!("Reloaded task '{}' as '{}'", key, record.name);
        self.name = record.name;
        self.saved_key = Some(key);
        Ok(())
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id())
            .field("work", &self.work.as_ref().map(|work| work.name()))
            .field("params", &self.params)
            .field("retry_policy", &self.retry_policy)
            .field("trigger", &self.trigger)
            .finish()
    }
}

/// `&a >> &b` runs `a` before `b`.
impl<'a> Shr<&'a Task> for &'a Task {
    type Output = Result<(), TaskError>;

    fn shr(self, rhs: &'a Task) -> Self::Output {
        self.run_before(&[rhs])
    }
}

/// `&a | &b` runs `a` before `b`.
impl<'a> BitOr<&'a Task> for &'a Task {
    type Output = Result<(), TaskError>;

    fn bitor(self, rhs: &'a Task) -> Self::Output {
        self.run_before(&[rhs])
    }
}

/// `&a << &b` runs `a` after `b`.
impl<'a> Shl<&'a Task> for &'a Task {
    type Output = Result<(), TaskError>;

    fn shl(self, rhs: &'a Task) -> Self::Output {
        self.run_after(&[rhs])
    }
}
