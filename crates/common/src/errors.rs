//! Structured errors with typed causes
//!
//! Every error has a kind (mirroring the classic `Error`/`TypeError`/
//! `SyntaxError`/`RangeError` split), a message, and an optional cause. A
//! cause is either a previous error or a plain object describing the context:
//!
//! ```text
//! UtilError { kind, message, cause }
//!                              ↓
//!          ErrorCause::Error(UtilError) | ErrorCause::Object({ name, status, ... })
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Error,
    TypeError,
    SyntaxError,
    RangeError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::RangeError => "RangeError",
        };
        f.write_str(name)
    }
}

/// Context attached to an error; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCauseObject {
    /// Error that was previously raised
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<ErrorCause>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Byte offset in a buffer or file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    /// Process exit code or HTTP status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Anything else worth reporting
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ErrorCauseObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{ cause: error }`
    pub fn caused_by(error: UtilError) -> Self {
        Self {
            cause: Some(Box::new(ErrorCause::from(error))),
            ..Self::default()
        }
    }

    /// `{ received: value }`, for rejected input
    pub fn received(value: impl Into<Value>) -> Self {
        Self::new().with_field("received", value)
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<ErrorCause>) -> Self {
        self.cause = Some(Box::new(cause.into()));
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl fmt::Display for ErrorCauseObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(untagged)]
pub enum ErrorCause {
    #[error(transparent)]
    Error(Box<UtilError>),

    #[error("{0}")]
    Object(ErrorCauseObject),
}

impl From<UtilError> for ErrorCause {
    fn from(error: UtilError) -> Self {
        ErrorCause::Error(Box::new(error))
    }
}

impl From<ErrorCauseObject> for ErrorCause {
    fn from(object: ErrorCauseObject) -> Self {
        ErrorCause::Object(object)
    }
}

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct UtilError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<ErrorCause>,
}

impl UtilError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<ErrorCause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// The cause when it is a context object
    pub fn cause_object(&self) -> Option<&ErrorCauseObject> {
        match &self.cause {
            Some(ErrorCause::Object(object)) => Some(object),
            _ => None,
        }
    }
}

fn create(kind: ErrorKind, message: impl Into<String>, cause: Option<ErrorCause>) -> UtilError {
    UtilError {
        kind,
        message: message.into(),
        cause,
    }
}

pub fn error(message: impl Into<String>, cause: Option<ErrorCause>) -> UtilError {
    create(ErrorKind::Error, message, cause)
}

pub fn type_error(message: impl Into<String>, cause: Option<ErrorCause>) -> UtilError {
    create(ErrorKind::TypeError, message, cause)
}

pub fn syntax_error(message: impl Into<String>, cause: Option<ErrorCause>) -> UtilError {
    create(ErrorKind::SyntaxError, message, cause)
}

pub fn range_error(message: impl Into<String>, cause: Option<ErrorCause>) -> UtilError {
    create(ErrorKind::RangeError, message, cause)
}

/// Any JSON object (not an array, not null) counts as a cause object
pub fn is_error_cause_object(value: &Value) -> bool {
    value.is_object()
}

/// An error whose cause is a context object rather than another error
pub fn is_error_root(err: &UtilError) -> bool {
    matches!(err.cause, Some(ErrorCause::Object(_)))
}

/// Turn an arbitrary value into a cause
///
/// Objects become context objects; everything else becomes an error with the
/// value's text as message.
pub fn as_error_cause(value: Value) -> ErrorCause {
    match value {
        Value::Object(map) => {
            let object = serde_json::from_value(Value::Object(map.clone())).unwrap_or_else(|_| {
                ErrorCauseObject {
                    extra: map,
                    ..ErrorCauseObject::default()
                }
            });
            ErrorCause::Object(object)
        }
        Value::Null => error("Unknown error", None).into(),
        Value::String(text) if text.is_empty() => error("Unknown error", None).into(),
        Value::String(text) => error(text, None).into(),
        other => error(other.to_string(), None).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error as _;

    #[test]
    fn test_is_error_cause_object() {
        assert!(is_error_cause_object(&json!({})));
        assert!(is_error_cause_object(&json!({ "name": "test" })));
        assert!(is_error_cause_object(&json!({ "status": 404 })));

        assert!(!is_error_cause_object(&Value::Null));
        assert!(!is_error_cause_object(&json!("string")));
        assert!(!is_error_cause_object(&json!(123)));
        assert!(!is_error_cause_object(&json!([])));
    }

    #[test]
    fn test_is_error_root() {
        let root = error(
            "test",
            Some(ErrorCauseObject {
                name: Some("cause".to_string()),
                ..ErrorCauseObject::default()
            }
            .into()),
        );
        assert!(is_error_root(&root));

        assert!(!is_error_root(&error("test", None)));
        assert!(!is_error_root(&error("outer", Some(error("inner", None).into()))));
    }

    #[test]
    fn test_as_error_cause() {
        match as_error_cause(json!({ "name": "test", "status": 404, "retry": true })) {
            ErrorCause::Object(object) => {
                assert_eq!(object.name.as_deref(), Some("test"));
                assert_eq!(object.status, Some(404));
                assert_eq!(object.field("retry"), Some(&json!(true)));
            }
            other => panic!("expected cause object, got {other:?}"),
        }

        // Mistyped well-known fields are kept as extras
        match as_error_cause(json!({ "status": "teapot" })) {
            ErrorCause::Object(object) => {
                assert_eq!(object.status, None);
                assert_eq!(object.field("status"), Some(&json!("teapot")));
            }
            other => panic!("expected cause object, got {other:?}"),
        }

        let message_of = |cause: ErrorCause| match cause {
            ErrorCause::Error(err) => err.message,
            ErrorCause::Object(_) => panic!("expected error"),
        };
        assert_eq!(message_of(as_error_cause(json!("message"))), "message");
        assert_eq!(message_of(as_error_cause(Value::Null)), "Unknown error");
        assert_eq!(message_of(as_error_cause(json!(""))), "Unknown error");
        assert_eq!(message_of(as_error_cause(json!(42))), "42");
    }

    #[test]
    fn test_error_creators() {
        let err = error("test message", None);
        assert_eq!(err.kind, ErrorKind::Error);
        assert_eq!(err.message, "test message");
        assert_eq!(err.to_string(), "Error: test message");
        assert!(err.cause.is_none());

        let cause = ErrorCauseObject::received("x");
        let err = type_error("bad input", Some(cause.clone().into()));
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert_eq!(err.cause_object(), Some(&cause));

        assert_eq!(syntax_error("s", None).kind, ErrorKind::SyntaxError);
        assert_eq!(range_error("r", None).kind, ErrorKind::RangeError);
    }

    #[test]
    fn test_source_chain() {
        let inner = range_error("too large", None);
        let outer = error("could not resize", Some(inner.into()));

        let source = outer.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("RangeError: too large"));
    }

    #[test]
    fn test_cause_serialization() {
        let cause = ErrorCauseObject::new()
            .with_field("reason", "stopped")
            .with_cause(error("inner", None));
        assert_eq!(
            cause.to_json(),
            json!({
                "cause": { "kind": "Error", "message": "inner" },
                "reason": "stopped"
            })
        );
    }
}
