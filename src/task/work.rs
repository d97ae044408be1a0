use std::error::Error;
use std::fmt;

use serde_json::{Map, Value};

/// Arguments handed to a task's work function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.into(), value.into());
        self
    }
}

/// The callable a task runs.
///
/// `name` doubles as the task name when a task is built without one.
pub trait Work: Send + Sync {
    fn name(&self) -> &str;

    fn call(&self, arguments: &Arguments) -> Result<Value, Box<dyn Error + Send + Sync>>;
}

/// [`Work`] backed by a closure.
pub struct FnWork<F> {
    name: String,
    f: F,
}

impl<F> Work for FnWork<F>
where
    F: Fn(&Arguments) -> Result<Value, Box<dyn Error + Send + Sync>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, arguments: &Arguments) -> Result<Value, Box<dyn Error + Send + Sync>> {
        (self.f)(arguments)
    }
}

impl<F> fmt::Debug for FnWork<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnWork").field("name", &self.name).finish()
    }
}

/// Wraps a named closure as [`Work`].
pub fn work_fn<F>(name: impl Into<String>, f: F) -> FnWork<F>
where
    F: Fn(&Arguments) -> Result<Value, Box<dyn Error + Send + Sync>> + Send + Sync,
{
    FnWork {
        name: name.into(),
        f,
    }
}
