//! Rule type: one named stage of the conversion pipeline.

use regex::{Captures, Regex};

use crate::Result;

/// Type alias for stage transform functions
pub type TransformFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// A rule rewrites the whole working text in one pass.
pub struct Rule {
    transform: TransformFn,
}

impl Rule {
    /// Create a rule from an arbitrary string transform
    pub fn map<F>(transform: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            transform: Box::new(transform),
        }
    }

    /// Create a rule that rewrites every non-overlapping match of `pattern`
    pub fn replace<F>(pattern: Regex, replacement: F) -> Self
    where
        F: Fn(&Captures) -> String + Send + Sync + 'static,
    {
        Self::map(move |input| {
            pattern
                .replace_all(input, |caps: &Captures| replacement(caps))
                .into_owned()
        })
    }

    /// Compile `pattern` and create a replacing rule from it
    pub fn pattern<F>(pattern: &str, replacement: F) -> Result<Self>
    where
        F: Fn(&Captures) -> String + Send + Sync + 'static,
    {
        Ok(Self::replace(Regex::new(pattern)?, replacement))
    }

    /// Apply this rule to the working text
    pub fn apply(&self, input: &str) -> String {
        (self.transform)(input)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").finish_non_exhaustive()
    }
}
