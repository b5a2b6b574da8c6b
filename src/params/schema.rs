use serde_json::{Map, Value};
use tracing::debug;

use super::error::{SchemaError, ValidationError};
use super::rule::{ParamOptions, ParamRule};
use super::validate;

/// Ordered set of named parameter rules.
///
/// Built before the server starts and read-only while requests are handled.
/// `add`/`remove` take `&mut self`, so mutation after the schema is shared
/// requires rebuilding it.
#[derive(Debug, Clone, Default)]
pub struct ParamSchema {
    defaults: ParamOptions,
    rules: Vec<(String, ParamRule)>,
}

impl ParamSchema {
    /// Empty schema with the built-in base defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty schema whose rules inherit `defaults` before per-parameter options
    #[must_use]
    pub fn with_defaults(defaults: ParamOptions) -> Self {
        Self {
            defaults,
            rules: Vec::new(),
        }
    }

    /// Declare a parameter.
    ///
    /// # Errors
    ///
    /// * [`SchemaError::DuplicateParameter`] when `name` is already declared
    ///   or is the alias of another parameter
    /// * [`SchemaError::AliasCollision`] when the alias equals another
    ///   parameter's name or alias
    pub fn add(&mut self, name: &str, options: ParamOptions) -> Result<(), SchemaError> {
        let name_taken = self
            .rules
            .iter()
            .any(|(n, r)| n == name || r.alias.as_deref() == Some(name));
        if name_taken {
            return Err(SchemaError::DuplicateParameter {
                name: name.to_string(),
            });
        }

        if let Some(alias) = options.alias.as_deref() {
            let alias_taken = self
                .rules
                .iter()
                .any(|(n, r)| n == alias || r.alias.as_deref() == Some(alias));
            if alias_taken {
                return Err(SchemaError::AliasCollision {
                    name: name.to_string(),
                    alias: alias.to_string(),
                });
            }
        }

        let rule = options.resolve(&self.defaults);
        debug!(param = %name, rule = ?rule, "Parameter declared");
        self.rules.push((name.to_string(), rule));
        Ok(())
    }

    /// Builder form of [`ParamSchema::add`].
    ///
    /// # Errors
    ///
    /// Same as [`ParamSchema::add`].
    pub fn param(mut self, name: &str, options: ParamOptions) -> Result<Self, SchemaError> {
        self.add(name, options)?;
        Ok(self)
    }

    /// Remove a parameter; returns whether it was declared.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|(n, _)| n != name);
        before != self.rules.len()
    }

    /// Remove several parameters. Unknown names are ignored.
    pub fn remove_many<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.remove(name.as_ref());
        }
    }

    /// Rule for `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamRule> {
        self.rules.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// Whether `name` is declared
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Rules in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamRule)> {
        self.rules.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Number of declared parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no parameter is declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Shorthand for [`validate::validate`]
    ///
    /// # Errors
    ///
    /// The first failing parameter in declaration order.
    pub fn validate(&self, input: &Map<String, Value>) -> Result<Map<String, Value>, ValidationError> {
        validate::validate(self, input)
    }
}
