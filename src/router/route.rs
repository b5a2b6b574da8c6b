//! Route pattern compilation.
//!
//! A pattern is literal text with embedded placeholders written `<name>` or
//! `<type:name>`. Compilation is a single eager pass that produces a list of
//! [`Segment`]s, an anchored regex built from them and a specificity weight.

use regex::Regex;
use std::sync::Arc;
use tracing::debug;

use super::core::ParamVec;
use super::error::RouteError;

/// Weight contributed by each literal character of a pattern.
const LITERAL_CHAR_WEIGHT: u32 = 1;

/// Type of a placeholder capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    /// ASCII word characters only (`[A-Za-z0-9_]+`). Used when no type is given.
    Str,
    /// ASCII decimal digits (`[0-9]+`)
    Int,
    /// ASCII digits with a mandatory fractional part (`[0-9]+\.[0-9]+`)
    Float,
    /// Anything, slashes included (non-greedy)
    Path,
}

impl PlaceholderKind {
    /// Resolve a type token as written inside `<type:name>`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "str" | "string" => Some(Self::Str),
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    /// Regex fragment matched by this placeholder (without the capture group).
    #[must_use]
    pub fn regex(self) -> &'static str {
        match self {
            Self::Str => r"[A-Za-z0-9_]+",
            Self::Int => r"[0-9]+",
            Self::Float => r"[0-9]+\.[0-9]+",
            Self::Path => r".+?",
        }
    }

    /// Specificity score added to the route weight.
    #[must_use]
    pub fn weight(self) -> u32 {
        match self {
            Self::Path => 200,
            Self::Int | Self::Float => 50,
            Self::Str => 100,
        }
    }
}

/// One compiled piece of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text that must appear verbatim
    Literal(String),
    /// A typed capture bound to a variable name
    Capture {
        /// Capture type
        kind: PlaceholderKind,
        /// Variable name the captured text is reported under
        name: Arc<str>,
    },
}

/// A compiled path pattern.
///
/// Immutable once built. Matching is purely syntactic: captured values are
/// always strings and any numeric coercion happens in the parameter validator.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: String,
    segments: Vec<Segment>,
    variable_names: Vec<Arc<str>>,
    weight: u32,
    matcher: Regex,
}

impl Route {
    /// Compile a pattern such as `/books/<int:id>/<page>`.
    ///
    /// # Errors
    ///
    /// * [`RouteError::DuplicateVariable`] when a name repeats
    /// * [`RouteError::UnknownType`] for a type token outside `str|int|float|path`
    /// * [`RouteError::MalformedRule`] for unbalanced brackets or an invalid name
    pub fn compile(pattern: &str) -> Result<Self, RouteError> {
        let segments = parse_segments(pattern)?;

        let mut source = String::with_capacity(pattern.len() + 16);
        source.push('^');
        let mut variable_names = Vec::new();
        let mut weight = 0u32;
        for segment in &segments {
            match segment {
                Segment::Literal(text) => {
                    source.push_str(&regex::escape(text));
                    weight += text.chars().count() as u32 * LITERAL_CHAR_WEIGHT;
                }
                Segment::Capture { kind, name } => {
                    source.push('(');
                    source.push_str(kind.regex());
                    source.push(')');
                    weight += kind.weight();
                    variable_names.push(Arc::clone(name));
                }
            }
        }
        source.push('$');

        let matcher = Regex::new(&source).map_err(|e| RouteError::MalformedRule {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        debug!(
            pattern = %pattern,
            regex = %source,
            weight = weight,
            variables = ?variable_names,
            "Route compiled"
        );

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            variable_names,
            weight,
            matcher,
        })
    }

    /// The original pattern text
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Compiled segments in pattern order
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Placeholder names in pattern order
    #[must_use]
    pub fn variable_names(&self) -> &[Arc<str>] {
        &self.variable_names
    }

    /// Specificity weight; higher is more specific
    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Match a request path against the whole pattern.
    ///
    /// Returns the captured values keyed by variable name, or `None` when the
    /// path does not match from start to end.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<ParamVec> {
        let captures = self.matcher.captures(path)?;
        let mut params = ParamVec::new();
        for (index, name) in self.variable_names.iter().enumerate() {
            let value = captures.get(index + 1)?;
            params.push((Arc::clone(name), value.as_str().to_string()));
        }
        Some(params)
    }
}

fn malformed(pattern: &str, reason: impl Into<String>) -> RouteError {
    RouteError::MalformedRule {
        pattern: pattern.to_string(),
        reason: reason.into(),
    }
}

fn parse_segments(pattern: &str) -> Result<Vec<Segment>, RouteError> {
    let mut segments = Vec::new();
    let mut rest = pattern;
    let mut offset = 0usize;

    while !rest.is_empty() {
        let Some(open) = rest.find(['<', '>']) else {
            segments.push(Segment::Literal(rest.to_string()));
            break;
        };
        if rest[open..].starts_with('>') {
            return Err(malformed(
                pattern,
                format!("unmatched '>' at byte {}", offset + open),
            ));
        }
        if open > 0 {
            segments.push(Segment::Literal(rest[..open].to_string()));
        }

        let body_start = open + 1;
        let after = &rest[body_start..];
        let close = match after.find(['<', '>']) {
            Some(i) if after[i..].starts_with('>') => i,
            _ => {
                return Err(malformed(
                    pattern,
                    format!("unmatched '<' at byte {}", offset + open),
                ))
            }
        };

        let (kind, name) = parse_placeholder(pattern, &after[..close])?;
        let duplicate = segments
            .iter()
            .any(|s| matches!(s, Segment::Capture { name: existing, .. } if existing.as_ref() == name));
        if duplicate {
            return Err(RouteError::DuplicateVariable {
                pattern: pattern.to_string(),
                name: name.to_string(),
            });
        }
        segments.push(Segment::Capture {
            kind,
            name: Arc::from(name),
        });

        let consumed = body_start + close + 1;
        rest = &rest[consumed..];
        offset += consumed;
    }

    Ok(segments)
}

fn parse_placeholder<'a>(
    pattern: &str,
    rule: &'a str,
) -> Result<(PlaceholderKind, &'a str), RouteError> {
    let (kind, name) = match rule.split_once(':') {
        Some((token, name)) => {
            let kind =
                PlaceholderKind::from_token(token).ok_or_else(|| RouteError::UnknownType {
                    pattern: pattern.to_string(),
                    kind: token.to_string(),
                })?;
            (kind, name)
        }
        None => (PlaceholderKind::Str, rule),
    };

    let valid_name = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_name {
        return Err(malformed(pattern, format!("invalid variable name '{name}'")));
    }

    Ok((kind, name))
}
