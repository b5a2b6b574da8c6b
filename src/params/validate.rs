//! The per-parameter validation pipeline.
//!
//! For every declared parameter, in declaration order:
//!
//! 1. default substitution (a default makes `required` irrelevant)
//! 2. required check
//! 3. null / empty check
//! 4. type check, or coercion for [`ParamType::Custom`]
//! 5. choices
//! 6. lower-casing, then trimming (strings only)
//! 7. custom conversion
//! 8. placement under the alias or the declared name
//!
//! Optional parameters that are absent and have no default are left out of
//! the result.

use serde_json::{json, Map, Value};
use tracing::debug;

use super::error::{ErrorCode, ValidationError};
use super::rule::{Choices, ParamRule, ParamType};
use super::schema::ParamSchema;

/// Validate `input` against `schema`, stopping at the first failure.
///
/// # Errors
///
/// The [`ValidationError`] of the first failing parameter in declaration
/// order.
pub fn validate(
    schema: &ParamSchema,
    input: &Map<String, Value>,
) -> Result<Map<String, Value>, ValidationError> {
    let mut output = Map::new();
    for (name, rule) in schema.iter() {
        match check_param(name, rule, input) {
            Ok(Some((key, value))) => {
                output.insert(key, value);
            }
            Ok(None) => {}
            Err(err) => {
                debug!(param = %name, code = %err.code, "Parameter validation failed");
                return Err(err);
            }
        }
    }
    Ok(output)
}

/// Validate `input` against `schema`, collecting every failure.
///
/// # Errors
///
/// All failures, in declaration order, when at least one parameter fails.
pub fn validate_all(
    schema: &ParamSchema,
    input: &Map<String, Value>,
) -> Result<Map<String, Value>, Vec<ValidationError>> {
    let mut output = Map::new();
    let mut errors = Vec::new();
    for (name, rule) in schema.iter() {
        match check_param(name, rule, input) {
            Ok(Some((key, value))) => {
                output.insert(key, value);
            }
            Ok(None) => {}
            Err(err) => errors.push(err),
        }
    }
    if errors.is_empty() {
        Ok(output)
    } else {
        debug!(error_count = errors.len(), "Parameter validation failed");
        Err(errors)
    }
}

fn is_null_or_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn check_param(
    name: &str,
    rule: &ParamRule,
    input: &Map<String, Value>,
) -> Result<Option<(String, Value)>, ValidationError> {
    let out_key = rule.alias.as_deref().unwrap_or(name).to_string();

    let mut value = match (input.get(name), &rule.default) {
        (Some(present), _) => present.clone(),
        (None, Some(default)) => default.clone(),
        (None, None) if rule.required => {
            return Err(ValidationError::new(ErrorCode::Required, name, None, None));
        }
        (None, None) => return Ok(None),
    };

    if is_null_or_empty(&value) {
        if !rule.nullable {
            return Err(ValidationError::new(ErrorCode::Null, name, Some(value), None));
        }
        if value.is_null() {
            return Ok(Some((out_key, Value::Null)));
        }
    }

    match &rule.kind {
        ParamType::Custom(coercer) => {
            value = coercer.apply(&value).map_err(|reason| {
                ValidationError::new(
                    ErrorCode::Conver,
                    name,
                    Some(value.clone()),
                    Some(json!({ "type": coercer.target(), "reason": reason })),
                )
            })?;
        }
        kind if !kind.accepts(&value) => {
            return Err(ValidationError::new(
                ErrorCode::Type,
                name,
                Some(value),
                Some(json!({ "type": kind.name() })),
            ));
        }
        _ => {}
    }

    match &rule.choices {
        Some(Choices::Values(allowed)) if !allowed.contains(&value) => {
            return Err(ValidationError::new(
                ErrorCode::Choices,
                name,
                Some(value),
                Some(Value::Array(allowed.clone())),
            ));
        }
        Some(Choices::Predicate(predicate)) => match predicate(&value) {
            Ok(true) => {}
            Ok(false) => {
                return Err(ValidationError::new(ErrorCode::Choices, name, Some(value), None));
            }
            Err(reason) => {
                return Err(ValidationError::new(
                    ErrorCode::ChoicesRun,
                    name,
                    Some(value),
                    Some(json!({ "reason": reason })),
                ));
            }
        },
        _ => {}
    }

    if let Value::String(s) = &mut value {
        if rule.lowercase {
            *s = s.to_lowercase();
        }
        if rule.trim {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
    }

    if let Some(converter) = &rule.convert {
        let original = value.clone();
        value = converter.apply(value).map_err(|reason| {
            ValidationError::new(
                ErrorCode::Cover,
                name,
                Some(original),
                Some(json!({ "reason": reason })),
            )
        })?;
    }

    Ok(Some((out_key, value)))
}
