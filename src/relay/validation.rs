use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::RelayError;

/// Kinds of collaborative edits that can be relayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutationKind {
    Draw,
    TodoAdd,
    TodoUpdate,
    TodoDelete,
    TodoToggle,
}

/// A mutate event that passed the shape check
#[derive(Debug, Clone)]
pub struct ValidatedMutation {
    pub room_key: String,
    pub kind: MutationKind,
}

fn malformed(reason: impl Into<String>) -> RelayError {
    RelayError::MalformedEvent(reason.into())
}

fn require_str<'a>(fields: &'a Value, name: &str) -> Result<&'a str, RelayError> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(format!("missing string field `{}`", name)))
}

fn require_number(fields: &Value, name: &str) -> Result<f64, RelayError> {
    fields
        .get(name)
        .and_then(Value::as_f64)
        .ok_or_else(|| malformed(format!("missing numeric field `{}`", name)))
}

fn optional_number(fields: &Value, name: &str) -> Result<(), RelayError> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(()),
        Some(v) if v.is_number() => Ok(()),
        Some(_) => Err(malformed(format!("field `{}` must be numeric", name))),
    }
}

fn optional_bool(fields: &Value, name: &str) -> Result<(), RelayError> {
    match fields.get(name) {
        None | Some(Value::Null) | Some(Value::Bool(_)) => Ok(()),
        Some(_) => Err(malformed(format!("field `{}` must be a boolean", name))),
    }
}

/// Checks the minimal shape of a mutate payload:
/// `{ "roomKey": "...", "payload": { "kind": "...", ... } }`.
///
/// The payload itself is never rewritten; only the fields the receiving
/// clients rely on are checked.
pub fn validate_mutation(event: &Value) -> Result<ValidatedMutation, RelayError> {
    let room_key = require_str(event, "roomKey")?;
    if room_key.is_empty() {
        return Err(malformed("empty roomKey"));
    }

    let body = event
        .get("payload")
        .filter(|v| v.is_object())
        .ok_or_else(|| malformed("missing payload object"))?;

    let kind: MutationKind = body
        .get("kind")
        .cloned()
        .ok_or_else(|| malformed("missing mutation kind"))
        .and_then(|k| {
            serde_json::from_value(k).map_err(|e| malformed(format!("unknown kind: {}", e)))
        })?;

    match kind {
        MutationKind::Draw => {
            require_number(body, "x")?;
            require_number(body, "y")?;
            require_str(body, "color")?;
            optional_number(body, "prevX")?;
            optional_number(body, "prevY")?;
            optional_number(body, "size")?;
        }
        MutationKind::TodoAdd | MutationKind::TodoUpdate => {
            require_str(body, "id")?;
            require_str(body, "text")?;
        }
        MutationKind::TodoDelete => {
            require_str(body, "id")?;
        }
        MutationKind::TodoToggle => {
            require_str(body, "id")?;
            optional_bool(body, "completed")?;
        }
    }

    Ok(ValidatedMutation {
        room_key: room_key.to_string(),
        kind,
    })
}
