use std::fmt;
use std::sync::Arc;

use super::state::TaskState;

/// Name of the default trigger.
pub const ALL_SUCCESS: &str = "all_success";

type Predicate = dyn Fn(&[TaskState]) -> bool + Send + Sync;

/// Reference to the predicate that decides whether a task may run, given the
/// states of its upstream tasks.
///
/// Two references are equal when they carry the same name; predicates are never
/// compared. Names are what gets serialized, so a predicate built with
/// [`TriggerRef::new`] under a built-in name such as [`ALL_SUCCESS`] is treated as
/// that built-in and comes back as it after a serialization round trip.
#[derive(Clone)]
pub struct TriggerRef {
    name: String,
    predicate: Arc<Predicate>,
}

impl TriggerRef {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&[TaskState]) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Every upstream task finished successfully.
    pub fn all_success() -> Self {
        Self::new(ALL_SUCCESS, |upstream| {
            upstream.iter().all(TaskState::is_successful)
        })
    }

    /// Looks up a built-in trigger by name.
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            ALL_SUCCESS => Some(Self::all_success()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_all_success(&self) -> bool {
        self.name == ALL_SUCCESS
    }

    pub fn evaluate(&self, upstream: &[TaskState]) -> bool {
        (self.predicate)(upstream)
    }
}

impl Default for TriggerRef {
    fn default() -> Self {
        Self::all_success()
    }
}

impl PartialEq for TriggerRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TriggerRef {}

impl fmt::Debug for TriggerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TriggerRef").field(&self.name).finish()
    }
}
