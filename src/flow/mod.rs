//! The flow a task belongs to.
//!
//! Tasks only talk to their flow through [`FlowGraph`]. [`Flow`] is the in-memory
//! implementation; [`FlowScope`] makes a flow the ambient owner for tasks built
//! without an explicit one.

mod context;
mod graph;
mod options;
mod tests;
mod validation;

pub use context::{current_flow, with_flow, FlowScope};
pub use graph::{Flow, Relationship};
pub use options::{DuplicateTasks, FlowOptions};

use crate::error::FlowError;
use crate::storage::FlowRecord;
use crate::task::Task;

/// Owning graph of a set of tasks.
///
/// Implementations decide how duplicate task names and cyclic relationships are
/// handled; tasks perform neither check. Both registration methods take `&self`, so an
/// implementation shared across threads has to synchronise internally.
pub trait FlowGraph: Send + Sync {
    fn id(&self) -> String;

    /// Called once by every successfully validated task, as the last step of its
    /// construction. Deserialized tasks only call it when their name is not registered.
    fn add_task(&self, task: &Task) -> Result<(), FlowError>;

    /// Whether a task named `name` is registered.
    fn contains_task(&self, name: &str) -> bool;

    /// Records that `before` must run before `after`. Both tasks must belong to this
    /// graph.
    fn add_relationship(&self, before: &Task, after: &Task) -> Result<(), FlowError>;

    fn as_record(&self) -> FlowRecord;
}
