/// What a flow does when a task name is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateTasks {
    /// Re-registering a name is a no-op.
    #[default]
    Ignore,
    /// Re-registering a name fails with `FlowError::DuplicateTask`.
    Reject,
}

#[derive(Debug, Clone)]
pub struct FlowOptions {
    /// Handling of repeated task names
    pub duplicate_tasks: DuplicateTasks,
    /// Refuse relationships that would close a cycle
    pub reject_cycles: bool,
}

impl Default for FlowOptions {
    fn default() -> Self {
        Self {
            duplicate_tasks: DuplicateTasks::Ignore,
            reject_cycles: true,
        }
    }
}

impl FlowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duplicate_tasks(mut self, value: DuplicateTasks) -> Self {
        self.duplicate_tasks = value;
        self
    }

    pub fn with_reject_cycles(mut self, value: bool) -> Self {
        self.reject_cycles = value;
        self
    }
}
