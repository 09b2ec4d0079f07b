//! The `Date` global. Only the clock is exposed.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::evaluator::{ExecutionError, RuntimeError};
use crate::values::Value;

/// Milliseconds since the Unix epoch.
fn date_now(_this: &Value, _args: &[Value]) -> Result<Value, ExecutionError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|err| RuntimeError::Host {
            message: format!("system clock is before the epoch: {err}"),
        })?;
    Ok(Value::Number((elapsed.as_secs_f64() * 1000.0).floor()))
}

pub fn build_date_package() -> Value {
    Value::object([("now", Value::function("now", date_now))])
}
