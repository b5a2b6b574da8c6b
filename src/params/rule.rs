//! Parameter rules and the option builder used to declare them.

use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::error::SchemaError;

type CoerceFn = dyn Fn(&Value) -> Result<Value, String> + Send + Sync;
type PredicateFn = dyn Fn(&Value) -> Result<bool, String> + Send + Sync;
type ConvertFn = dyn Fn(Value) -> Result<Value, String> + Send + Sync;

/// A named coercion step used as a parameter type.
///
/// `target` names the resulting type and appears in the
/// `Can not convert "<key>" to <target> type` message when coercion fails.
#[derive(Clone)]
pub struct Coercer {
    target: String,
    func: Arc<CoerceFn>,
}

impl Coercer {
    /// Wrap an arbitrary coercion function.
    pub fn new<F>(target: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self {
            target: target.into(),
            func: Arc::new(func),
        }
    }

    /// Integers, as JSON numbers or decimal strings.
    #[must_use]
    pub fn int() -> Self {
        Self::new("number", |value| match value {
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
            Value::String(s) => s
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| format!("'{s}' is not an integer: {e}")),
            other => Err(format!("{other} is not an integer")),
        })
    }

    /// Finite floats, as JSON numbers or decimal strings.
    #[must_use]
    pub fn float() -> Self {
        Self::new("number", |value| match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("'{s}' is not a number")),
            other => Err(format!("{other} is not a number")),
        })
    }

    /// Booleans, as JSON booleans or `true`/`false`/`1`/`0` strings.
    #[must_use]
    pub fn boolean() -> Self {
        Self::new("boolean", |value| match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) => match s.as_str() {
                "true" | "1" => Ok(Value::Bool(true)),
                "false" | "0" => Ok(Value::Bool(false)),
                _ => Err(format!("'{s}' is not a boolean")),
            },
            other => Err(format!("{other} is not a boolean")),
        })
    }

    /// Name of the type this coercer produces
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Run the coercion.
    ///
    /// # Errors
    ///
    /// Returns the coercer's own failure description.
    pub fn apply(&self, value: &Value) -> Result<Value, String> {
        (self.func)(value)
    }
}

impl fmt::Debug for Coercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coercer")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

/// Declared type of a parameter.
///
/// The primitive tags only check; values must already carry the right JSON
/// type. [`ParamType::Custom`] coerces.
#[derive(Debug, Clone, Default)]
pub enum ParamType {
    /// Anything is accepted
    #[default]
    Any,
    /// JSON string
    String,
    /// JSON number
    Number,
    /// JSON boolean
    Boolean,
    /// JSON object
    Object,
    /// JSON array
    Array,
    /// Coercion function
    Custom(Coercer),
}

impl ParamType {
    /// Name used in error messages
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            ParamType::Any => "any",
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Object => "object",
            ParamType::Array => "array",
            ParamType::Custom(c) => c.target(),
        }
    }

    /// Whether `value` satisfies a primitive tag. Always true for `Any` and
    /// `Custom`, which are handled by the coercion step.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamType::Any | ParamType::Custom(_) => true,
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Object => value.is_object(),
            ParamType::Array => value.is_array(),
        }
    }
}

impl FromStr for ParamType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(ParamType::Any),
            "string" | "str" => Ok(ParamType::String),
            "number" => Ok(ParamType::Number),
            "boolean" | "bool" => Ok(ParamType::Boolean),
            "object" => Ok(ParamType::Object),
            "array" => Ok(ParamType::Array),
            "int" | "integer" => Ok(ParamType::Custom(Coercer::int())),
            "float" => Ok(ParamType::Custom(Coercer::float())),
            _ => Err(SchemaError::UnknownType {
                token: s.to_string(),
            }),
        }
    }
}

/// Allowed values for a parameter.
#[derive(Clone)]
pub enum Choices {
    /// Membership by equality
    Values(Vec<Value>),
    /// Predicate; an `Err` is reported as `CHOICES_RUN_ERROR`
    Predicate(Arc<PredicateFn>),
}

impl fmt::Debug for Choices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choices::Values(values) => f.debug_tuple("Values").field(values).finish(),
            Choices::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Post-validation transform applied last in the pipeline.
#[derive(Clone)]
pub struct Converter(Arc<ConvertFn>);

impl Converter {
    /// Wrap a conversion function
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self(Arc::new(func))
    }

    /// Run the conversion.
    ///
    /// # Errors
    ///
    /// Returns the converter's own failure description.
    pub fn apply(&self, value: Value) -> Result<Value, String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Converter(..)")
    }
}

/// Fully resolved rule for one parameter.
#[derive(Debug, Clone)]
pub struct ParamRule {
    /// Absent values fail with `REQUIRED_ERROR` unless `default` is set
    pub required: bool,
    /// Null and `""` are accepted
    pub nullable: bool,
    /// Substituted when the parameter is absent
    pub default: Option<Value>,
    /// Type check or coercion
    pub kind: ParamType,
    /// Allowed values
    pub choices: Option<Choices>,
    /// Lower-case string values
    pub lowercase: bool,
    /// Strip surrounding whitespace from string values after lowercasing
    pub trim: bool,
    /// Final transform
    pub convert: Option<Converter>,
    /// Output key; the declared name is used when unset
    pub alias: Option<String>,
}

impl Default for ParamRule {
    fn default() -> Self {
        Self {
            required: false,
            nullable: true,
            default: None,
            kind: ParamType::Any,
            choices: None,
            lowercase: false,
            trim: false,
            convert: None,
            alias: None,
        }
    }
}

/// Partial rule, layered over schema defaults and then [`ParamRule::default`].
///
/// ```rust
/// use brrtrest::params::{ParamOptions, ParamType};
///
/// let _opts = ParamOptions::new()
///     .required(true)
///     .kind(ParamType::String)
///     .choices(["man", "woman"])
///     .alias("gender");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParamOptions {
    /// Fail with `REQUIRED_ERROR` when the key is absent
    pub required: Option<bool>,
    /// Accept an explicit `null` instead of failing with `NULL_ERROR`
    pub nullable: Option<bool>,
    /// Value substituted when the key is absent
    pub default: Option<Value>,
    /// Expected type; a custom coercer rewrites the value instead
    pub kind: Option<ParamType>,
    /// Allowed values or a predicate checked after coercion
    pub choices: Option<Choices>,
    /// Lowercase string values once choices have passed
    pub lowercase: Option<bool>,
    /// Strip surrounding whitespace from string values after lowercasing
    pub trim: Option<bool>,
    /// Final transformation applied to the validated value
    pub convert: Option<Converter>,
    /// Key to report the value under in the output map
    pub alias: Option<String>,
}

impl ParamOptions {
    /// Empty options; every field falls back to the schema defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the parameter as required
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Allow an explicit `null`
    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Value used when the key is missing
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Require values of type `kind`
    #[must_use]
    pub fn kind(mut self, kind: ParamType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Coerce with an ad-hoc function producing `target`
    #[must_use]
    pub fn coerce<F>(self, target: &str, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.kind(ParamType::Custom(Coercer::new(target, func)))
    }

    /// Restrict the value to a fixed list
    #[must_use]
    pub fn choices<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(Choices::Values(values.into_iter().map(Into::into).collect()));
        self
    }

    /// Restrict the value with a predicate; an `Err` becomes `CHOICES_RUN_ERROR`
    #[must_use]
    pub fn choices_fn<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Value) -> Result<bool, String> + Send + Sync + 'static,
    {
        self.choices = Some(Choices::Predicate(Arc::new(predicate)));
        self
    }

    /// Lowercase string values
    #[must_use]
    pub fn lowercase(mut self, lowercase: bool) -> Self {
        self.lowercase = Some(lowercase);
        self
    }

    /// Trim string values
    #[must_use]
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = Some(trim);
        self
    }

    /// Run `func` on the value after all other checks; an `Err` becomes `COVER_ERROR`
    #[must_use]
    pub fn convert<F>(mut self, func: F) -> Self
    where
        F: Fn(Value) -> Result<Value, String> + Send + Sync + 'static,
    {
        self.convert = Some(Converter::new(func));
        self
    }

    /// Report the value under `alias` instead of its input key
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Resolve against schema-wide defaults. Fields set here win; the alias
    /// is never inherited.
    #[must_use]
    pub fn resolve(self, defaults: &ParamOptions) -> ParamRule {
        let base = ParamRule::default();
        ParamRule {
            required: self.required.or(defaults.required).unwrap_or(base.required),
            nullable: self.nullable.or(defaults.nullable).unwrap_or(base.nullable),
            default: self.default.or_else(|| defaults.default.clone()),
            kind: self
                .kind
                .or_else(|| defaults.kind.clone())
                .unwrap_or(base.kind),
            choices: self.choices.or_else(|| defaults.choices.clone()),
            lowercase: self.lowercase.or(defaults.lowercase).unwrap_or(base.lowercase),
            trim: self.trim.or(defaults.trim).unwrap_or(base.trim),
            convert: self.convert.or_else(|| defaults.convert.clone()),
            alias: self.alias,
        }
    }
}
