//! # Task Flow
//!
//! Task nodes for building workflow graphs: each task carries its work function,
//! a retry policy and a trigger, and registers itself and its ordering
//! relationships with the flow that owns it.
//!
//! ## Features
//!
//! - Validated task construction through [`TaskBuilder`] or declarative [`TaskOptions`]
//! - Stable task ids of the form `<flow id>/<task name>`
//! - `run_before` / `run_after` relationships, with `>>`, `|` and `<<` shorthands
//! - Ambient flow scopes, so tasks can be built without passing the flow around
//! - Explicit serialization schema behind a [`SerializationPort`]
//! - Task persistence behind a [`PersistencePort`], with in-memory and SQLite backends
//!
//! Tasks do not execute flows. Retries and triggers are declared on a task and
//! left to whatever schedules it.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use task_flow::{Flow, FlowScope, Relationship, Task};
//!
//! # fn main() -> Result<(), task_flow::TaskError> {
//! let flow = Arc::new(Flow::new("pipeline"));
//!
//! let (extract, load) = {
//!     let _scope = FlowScope::enter(flow.clone());
//!     let extract = Task::builder().with_name("extract").build()?;
//!     let load = Task::builder().with_name("load").with_retries(3).build()?;
//!     (extract, load)
//! };
//!
//! (&extract >> &load)?;
//!
//! assert_eq!(extract.id(), "pipeline/extract");
//! assert_eq!(flow.relationships(), vec![Relationship::new("extract", "load")]);
//! assert_eq!(load.retries(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under the MIT license. See the [LICENSE](LICENSE) file for details.

pub mod error;
pub mod flow;
pub mod serialization;
pub mod storage;
pub mod task;

pub use error::{FlowError, TaskError, ValidationError};
pub use flow::{
    current_flow, with_flow, DuplicateTasks, Flow, FlowGraph, FlowOptions, FlowScope,
    Relationship,
};
pub use serialization::{JsonSerializer, SerializationPort, Serialized, TaskRepr};
pub use storage::{FlowRecord, PersistencePort, TaskRecord};
pub use task::{
    work_fn, Arguments, Params, RetryPolicy, Task, TaskBuilder, TaskOptions, TaskState,
    TriggerRef, Work,
};
