use log::debug;
use std::sync::Arc;
use std::time::Duration;

use super::retry::{RetryPolicy, DEFAULT_RETRY_DELAY};
use super::{Params, Task, TriggerRef, Work};
use crate::error::{TaskError, ValidationError};
use crate::flow::{current_flow, FlowGraph};

/// Collects the inputs of a [`Task`] and validates them in [`TaskBuilder::build`].
pub struct TaskBuilder {
    name: Option<String>,
    flow: Option<Arc<dyn FlowGraph>>,
    work: Option<Arc<dyn Work>>,
    params: Option<Params>,
    retries: i64,
    retry_delay: Duration,
    trigger: Option<TriggerRef>,
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self {
            name: None,
            flow: None,
            work: None,
            params: None,
            retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
            trigger: None,
        }
    }
}

impl TaskBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    /// Owning flow. Without one, the ambient flow of the current [`crate::FlowScope`] is used.
    pub fn with_flow(mut self, value: Arc<dyn FlowGraph>) -> Self {
        self.flow = Some(value);
        self
    }

    pub fn with_work<W: Work + 'static>(mut self, value: W) -> Self {
        self.work = Some(Arc::new(value));
        self
    }

    pub fn with_shared_work(mut self, value: Arc<dyn Work>) -> Self {
        self.work = Some(value);
        self
    }

    pub fn with_params(mut self, value: Params) -> Self {
        self.params = Some(value);
        self
    }

    /// Number of retries, `-1` for unlimited.
    pub fn with_retries(mut self, value: i64) -> Self {
        self.retries = value;
        self
    }

    pub fn with_retry_delay(mut self, value: Duration) -> Self {
        self.retry_delay = value;
        self
    }

    pub fn with_trigger(mut self, value: TriggerRef) -> Self {
        self.trigger = Some(value);
        self
    }

    /// Validates the inputs and registers the task with its flow.
    ///
    /// Registration is the last step: a task that fails validation never reaches
    /// the flow.
    pub fn build(self) -> Result<Task, TaskError> {
        let flow = match self.flow {
            Some(flow) => flow,
            None => current_flow().ok_or(TaskError::NoOwningFlow)?,
        };

        let name = match self.name {
            Some(name) => name,
            None => self
                .work
                .as_ref()
                .map(|work| work.name().to_string())
                .ok_or(ValidationError::MissingName)?,
        };
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let retry_policy = RetryPolicy::new(self.retries, self.retry_delay)?;
        let trigger = self.trigger.unwrap_or_else(TriggerRef::all_success);

        let task = Task {
            name,
            flow,
            work: self.work,
            params: self.params,
            retry_policy,
            trigger,
            saved_key: None,
        };

        task.flow.add_task(&task)?;
        debug!("Built task '{}'", task.id());
        Ok(task)
    }
}
