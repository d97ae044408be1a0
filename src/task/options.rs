use serde_json::Value;
use std::time::Duration;

use super::retry::DEFAULT_RETRY_DELAY;
use super::{Params, TaskBuilder, TriggerRef};
use crate::error::ValidationError;

/// Declarative task settings, as read from a JSON object such as
///
/// ```json
/// { "name": "extract", "retries": 3, "retry_delay": 30, "trigger": "all_success" }
/// ```
///
/// `retry_delay` is either whole seconds or `{ "secs": .., "nanos": .. }`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOptions {
    pub name: Option<String>,
    pub params: Option<Params>,
    pub retries: i64,
    pub retry_delay: Duration,
    pub trigger: Option<TriggerRef>,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            name: None,
            params: None,
            retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
            trigger: None,
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "an integer",
        Value::Number(_) => "a float",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn wrong_type(field: &'static str, expected: &'static str, found: &Value) -> ValidationError {
    ValidationError::WrongType {
        field,
        expected,
        found: type_name(found),
    }
}

impl TaskOptions {
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let object = value
            .as_object()
            .ok_or_else(|| wrong_type("task options", "an object", value))?;

        let mut options = TaskOptions::default();
        for (key, field) in object {
            match key.as_str() {
                "name" => {
                    let name = field
                        .as_str()
                        .ok_or_else(|| wrong_type("name", "a string", field))?;
                    options.name = Some(name.to_string());
                }
                "retries" => {
                    options.retries = field
                        .as_i64()
                        .ok_or_else(|| wrong_type("retries", "an integer", field))?;
                }
                "retry_delay" => {
                    options.retry_delay = parse_duration(field)
                        .ok_or_else(|| wrong_type("retry_delay", "a duration", field))?;
                }
                "trigger" => {
                    let name = field
                        .as_str()
                        .ok_or_else(|| wrong_type("trigger", "a string", field))?;
                    let trigger = TriggerRef::builtin(name)
                        .ok_or_else(|| ValidationError::UnknownTrigger(name.to_string()))?;
                    options.trigger = Some(trigger);
                }
                "params" => {
                    let params = field
                        .as_object()
                        .ok_or_else(|| wrong_type("params", "an object", field))?;
                    options.params = Some(params.clone());
                }
                other => return Err(ValidationError::UnknownField(other.to_string())),
            }
        }
        Ok(options)
    }

    /// A builder carrying these settings. Flow and work are still to be supplied.
    pub fn into_builder(self) -> TaskBuilder {
        let mut builder = TaskBuilder::new()
            .with_retries(self.retries)
            .with_retry_delay(self.retry_delay);
        if let Some(name) = self.name {
            builder = builder.with_name(name);
        }
        if let Some(params) = self.params {
            builder = builder.with_params(params);
        }
        if let Some(trigger) = self.trigger {
            builder = builder.with_trigger(trigger);
        }
        builder
    }
}

fn parse_duration(value: &Value) -> Option<Duration> {
    match value {
        Value::Number(n) => n.as_u64().map(Duration::from_secs),
        Value::Object(_) => serde_json::from_value(value.clone()).ok(),
        _ => None,
    }
}
