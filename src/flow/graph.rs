use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use super::options::{DuplicateTasks, FlowOptions};
use super::validation;
use super::FlowGraph;
use crate::error::FlowError;
use crate::storage::FlowRecord;
use crate::task::Task;

/// A directed ordering edge between two task names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relationship {
    pub before: String,
    pub after: String,
}

impl Relationship {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }
}

#[derive(Default)]
struct FlowState {
    /// Registered task names, in registration order
    tasks: Vec<String>,
    /// Ordering edges, in insertion order
    relationships: Vec<Relationship>,
}

/// In-memory flow. Stores task names and edges only; tasks stay owned by the caller.
pub struct Flow {
    id: RwLock<String>,
    name: String,
    options: FlowOptions,
    state: Mutex<FlowState>,
}

impl Flow {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_options(id, FlowOptions::default())
    }

    pub fn with_options(id: impl Into<String>, options: FlowOptions) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id: RwLock::new(id),
            options,
            state: Mutex::new(FlowState::default()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }

    /// Changes the flow id. Ids of member tasks follow immediately.
    pub fn set_id(&self, id: impl Into<String>) {
        *self.id.write().unwrap_or_else(PoisonError::into_inner) = id.into();
    }

    pub fn tasks(&self) -> Vec<String> {
        self.lock().tasks.clone()
    }

    pub fn relationships(&self) -> Vec<Relationship> {
        self.lock().relationships.clone()
    }

    /// Tasks that must run before `name`.
    pub fn upstream(&self, name: &str) -> Vec<String> {
        self.lock()
            .relationships
            .iter()
            .filter(|edge| edge.after == name)
            .map(|edge| edge.before.clone())
            .collect()
    }

    /// Tasks that must run after `name`.
    pub fn downstream(&self, name: &str) -> Vec<String> {
        self.lock()
            .relationships
            .iter()
            .filter(|edge| edge.before == name)
            .map(|edge| edge.after.clone())
            .collect()
    }

    /// Whether `task` was built against this very flow, not just one with the same id.
    fn owns(&self, task: &Task) -> bool {
        std::ptr::eq(
            Arc::as_ptr(task.flow()) as *const (),
            self as *const Flow as *const (),
        )
    }

    fn lock(&self) -> MutexGuard<'_, FlowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FlowGraph for Flow {
    fn id(&self) -> String {
        self.id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn add_task(&self, task: &Task) -> Result<(), FlowError> {
        let mut state = self.lock();
        if state.tasks.iter().any(|name| name == task.name()) {
            return match self.options.duplicate_tasks {
                DuplicateTasks::Ignore => {
                    warn!(
                        "Flow '{}': task '{}' is already registered, ignoring",
                        self.id(),
                        task.name()
                    );
                    Ok(())
                }
                DuplicateTasks::Reject => Err(FlowError::DuplicateTask {
                    flow: self.id(),
                    task: task.name().to_string(),
                }),
            };
        }

        debug!("Flow '{}': registered task '{}'", self.id(), task.name());
        state.tasks.push(task.name().to_string());
        Ok(())
    }

    fn contains_task(&self, name: &str) -> bool {
        self.lock().tasks.iter().any(|task| task == name)
    }

    fn add_relationship(&self, before: &Task, after: &Task) -> Result<(), FlowError> {
        let mut state = self.lock();
        for task in [before, after] {
            if !self.owns(task) || !state.tasks.iter().any(|name| name == task.name()) {
                return Err(FlowError::UnknownTask {
                    flow: self.id(),
                    task: task.name().to_string(),
                });
            }
        }

        let edge = Relationship::new(before.name(), after.name());
        if state.relationships.contains(&edge) {
            return Ok(());
        }

        if self.options.reject_cycles
            && validation::creates_cycle(&state.relationships, &edge.before, &edge.after)
        {
            return Err(FlowError::Cycle {
                before: edge.before,
                after: edge.after,
            });
        }

        debug!(
            "Flow '{}': '{}' runs before '{}'",
            self.id(),
            edge.before,
            edge.after
        );
        state.relationships.push(edge);
        Ok(())
    }

    fn as_record(&self) -> FlowRecord {
        FlowRecord {
            id: self.id(),
            name: self.name.clone(),
        }
    }
}
