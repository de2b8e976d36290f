//! Output checks: a named output paired with a predicate it must satisfy.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::domain::error::HarnessError;
use crate::domain::output::{OutputSet, OutputValue};

/// Function type for caller-supplied predicates.
pub type PredicateFn = Arc<dyn Fn(&OutputValue) -> bool + Send + Sync>;

/// What an output value must satisfy.
#[derive(Clone)]
pub enum Predicate {
    /// Rendered value is non-empty.
    NotEmpty,
    /// Rendered value equals the string exactly.
    Equals(String),
    /// Rendered value matches the regex.
    Matches(Regex),
    /// Caller-supplied predicate with a description for failure messages.
    Custom {
        description: String,
        func: PredicateFn,
    },
}

impl Predicate {
    /// Wrap a closure as a predicate.
    pub fn custom(
        description: impl Into<String>,
        func: impl Fn(&OutputValue) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Custom {
            description: description.into(),
            func: Arc::new(func),
        }
    }

    /// Compile `pattern` into a `Matches` predicate.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` if the pattern does not compile.
    pub fn matches(pattern: &str) -> Result<Self, HarnessError> {
        Regex::new(pattern)
            .map(Self::Matches)
            .map_err(|e| HarnessError::Config(format!("invalid regex '{pattern}': {e}")))
    }

    #[must_use]
    pub fn is_satisfied_by(&self, value: &OutputValue) -> bool {
        match self {
            Self::NotEmpty => !value.is_empty(),
            Self::Equals(expected) => value.render() == *expected,
            Self::Matches(re) => re.is_match(&value.render()),
            Self::Custom { func, .. } => func(value),
        }
    }

    /// Human description used in failure messages ("expected ...").
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::NotEmpty => "a non-empty value".to_string(),
            Self::Equals(expected) => format!("{expected:?}"),
            Self::Matches(re) => format!("a value matching /{}/", re.as_str()),
            Self::Custom { description, .. } => description.clone(),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// One `(output name, predicate)` pair.
#[derive(Debug, Clone)]
pub struct OutputCheck {
    pub output: String,
    pub predicate: Predicate,
}

impl OutputCheck {
    pub fn new(output: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            output: output.into(),
            predicate,
        }
    }

    /// Shorthand for the common "output must be set" check.
    pub fn not_empty(output: impl Into<String>) -> Self {
        Self::new(output, Predicate::NotEmpty)
    }

    pub fn equals(output: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::new(output, Predicate::Equals(expected.into()))
    }

    /// Evaluate against the applied outputs.
    ///
    /// # Errors
    ///
    /// `MissingOutput` if the template produced no such output, `Assertion`
    /// if the predicate does not hold.
    pub fn evaluate(&self, outputs: &OutputSet) -> Result<(), HarnessError> {
        let value = outputs
            .get(&self.output)
            .ok_or_else(|| HarnessError::MissingOutput {
                output: self.output.clone(),
            })?;
        if self.predicate.is_satisfied_by(value) {
            Ok(())
        } else {
            Err(HarnessError::Assertion {
                output: self.output.clone(),
                value: value.display(),
                expected: self.predicate.describe(),
            })
        }
    }
}
