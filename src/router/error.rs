use std::fmt;

/// Route registration error
///
/// Returned by [`Route::compile`](super::Route::compile) and by the
/// registration methods on [`Router`](super::Router). All variants are
/// programmer errors surfaced at startup, never at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The same placeholder name appears twice in one pattern
    DuplicateVariable {
        /// The offending pattern
        pattern: String,
        /// The repeated placeholder name
        name: String,
    },
    /// A placeholder uses a type token other than `str`, `int`, `float` or `path`
    UnknownType {
        /// The offending pattern
        pattern: String,
        /// The unrecognised type token
        kind: String,
    },
    /// Unbalanced `<`/`>` or an invalid placeholder body
    MalformedRule {
        /// The offending pattern
        pattern: String,
        /// What is wrong with the rule
        reason: String,
    },
    /// The exact pattern string is already registered on this router
    DuplicateRoute {
        /// The pattern registered twice
        pattern: String,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::DuplicateVariable { pattern, name } => {
                write!(f, "variable name '{name}' used more than once in route '{pattern}'")
            }
            RouteError::UnknownType { pattern, kind } => {
                write!(f, "unknown placeholder type '{kind}' in route '{pattern}'")
            }
            RouteError::MalformedRule { pattern, reason } => {
                write!(f, "malformed route rule '{pattern}': {reason}")
            }
            RouteError::DuplicateRoute { pattern } => {
                write!(f, "route '{pattern}' is already registered")
            }
        }
    }
}

impl std::error::Error for RouteError {}
