use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Status code carried by a [`ValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    /// A required parameter is absent and has no default
    #[serde(rename = "REQUIRED_ERROR")]
    Required,
    /// Null or empty value for a non-nullable parameter
    #[serde(rename = "NULL_ERROR")]
    Null,
    /// Value does not satisfy a primitive type tag
    #[serde(rename = "TYPE_ERROR")]
    Type,
    /// Value is not one of the allowed choices
    #[serde(rename = "CHOICES_ERROR")]
    Choices,
    /// The choices predicate itself failed
    #[serde(rename = "CHOICES_RUN_ERROR")]
    ChoicesRun,
    /// A custom type coercion failed
    #[serde(rename = "CONVER_ERROR")]
    Conver,
    /// The post-validation conversion failed
    #[serde(rename = "COVER_ERROR")]
    Cover,
}

impl ErrorCode {
    /// Wire name of the code, e.g. `REQUIRED_ERROR`
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Required => "REQUIRED_ERROR",
            ErrorCode::Null => "NULL_ERROR",
            ErrorCode::Type => "TYPE_ERROR",
            ErrorCode::Choices => "CHOICES_ERROR",
            ErrorCode::ChoicesRun => "CHOICES_RUN_ERROR",
            ErrorCode::Conver => "CONVER_ERROR",
            ErrorCode::Cover => "COVER_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context attached to a [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorInfo {
    /// Declared parameter name
    pub key: String,
    /// Rejected value, when there was one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Code-specific detail (expected type, allowed choices, failure reason)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub others: Option<Value>,
}

/// A request-scoped parameter validation failure.
///
/// Returned as data, never raised: the dispatcher renders it as the body of
/// a 403 response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Failure class
    pub code: ErrorCode,
    /// Human readable message derived from `code` and `info`
    pub message: String,
    /// Which parameter failed and why
    pub info: ErrorInfo,
}

impl ValidationError {
    /// Build an error and render its message.
    #[must_use]
    pub fn new(code: ErrorCode, key: &str, value: Option<Value>, others: Option<Value>) -> Self {
        let info = ErrorInfo {
            key: key.to_string(),
            value,
            others,
        };
        let message = render_message(code, &info);
        Self {
            code,
            message,
            info,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

fn detail<'a>(info: &'a ErrorInfo, field: &str) -> &'a str {
    info.others
        .as_ref()
        .and_then(|o| o.get(field))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
}

/// Render the message template for `code`.
#[must_use]
pub fn render_message(code: ErrorCode, info: &ErrorInfo) -> String {
    let key = &info.key;
    match code {
        ErrorCode::Required => format!("\"{key}\" is required"),
        ErrorCode::Null => format!("\"{key}\" can not be null or empty"),
        ErrorCode::Type => {
            // serde_json quotes strings and brackets arrays on its own
            let shown = info
                .value
                .as_ref()
                .map_or_else(|| "null".to_string(), Value::to_string);
            format!(
                "{shown} of \"{key}\" is not {} type",
                detail(info, "type")
            )
        }
        ErrorCode::Choices => match &info.others {
            Some(choices @ Value::Array(_)) => format!("\"{key}\" must be one of {choices}"),
            _ => format!("\"{key}\" is not an allowed value"),
        },
        ErrorCode::ChoicesRun => {
            format!("Choices check for \"{key}\" failed: {}", detail(info, "reason"))
        }
        ErrorCode::Conver => {
            format!("Can not convert \"{key}\" to {} type", detail(info, "type"))
        }
        ErrorCode::Cover => {
            format!("Conversion of \"{key}\" failed: {}", detail(info, "reason"))
        }
    }
}

/// Schema construction error
///
/// Returned by [`ParamSchema::add`](super::ParamSchema::add) and when parsing
/// a type tag from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The parameter name is already declared (or used as an alias)
    DuplicateParameter {
        /// Offending name
        name: String,
    },
    /// The alias collides with a declared parameter name or another alias
    AliasCollision {
        /// Parameter being declared
        name: String,
        /// Colliding alias
        alias: String,
    },
    /// A type tag that is not recognised
    UnknownType {
        /// The tag as written
        token: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::DuplicateParameter { name } => {
                write!(f, "parameter '{name}' is already declared")
            }
            SchemaError::AliasCollision { name, alias } => {
                write!(
                    f,
                    "alias '{alias}' of parameter '{name}' collides with an existing parameter"
                )
            }
            SchemaError::UnknownType { token } => write!(f, "unknown parameter type '{token}'"),
        }
    }
}

impl std::error::Error for SchemaError {}
