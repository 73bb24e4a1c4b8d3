//! Glob matching for override rules
//!
//! Patterns support `*` and `?` (never crossing `/`), `**` (any depth),
//! character classes, and brace alternation `{a,b}`. A leading `!` negates a
//! pattern: it never matches positively and instead excludes the paths it
//! matches from the rule.
//!
//! Paths are normalized to a forward-slash, root-relative form before
//! matching. Matching is case-sensitive.

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};

use crate::error::{OverrideError, Result};

/// Normalize a path to forward-slash, root-relative form.
///
/// Backslashes become `/`; leading `/`, empty segments, and `.` segments are
/// dropped. `..` segments are kept as written.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Strip root markers (`./`, `/`) from the front of a pattern body
fn strip_root(body: &str) -> &str {
    let mut rest = body;
    loop {
        if let Some(r) = rest.strip_prefix("./") {
            rest = r;
        } else if let Some(r) = rest.strip_prefix('/') {
            rest = r;
        } else {
            return rest;
        }
    }
}

fn invalid(pattern: &str, reason: impl Into<String>) -> OverrideError {
    OverrideError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.into(),
    }
}

fn compile_glob(body: &str, source: &str) -> Result<Glob> {
    GlobBuilder::new(body)
        .literal_separator(true)
        .case_insensitive(false)
        .backslash_escape(true)
        .build()
        .map_err(|e| invalid(source, e.kind().to_string()))
}

/// Split a pattern into its negation flag and glob body
fn split_negation(pattern: &str) -> Result<(bool, &str)> {
    let (negated, body) = match pattern.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let body = strip_root(body);
    if body.is_empty() {
        return Err(invalid(pattern, "empty pattern"));
    }
    Ok((negated, body))
}

/// How a single pattern relates to a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMatch {
    /// A positive pattern matched
    Included,
    /// A negated pattern matched; the path is excluded
    Excluded,
    /// The glob body did not match
    NoMatch,
}

/// A single compiled pattern
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    negated: bool,
    matcher: GlobMatcher,
}

impl Pattern {
    /// Compile a pattern, failing fast on malformed syntax
    pub fn new(pattern: &str) -> Result<Self> {
        let (negated, body) = split_negation(pattern)?;
        let glob = compile_glob(body, pattern)?;
        Ok(Self {
            source: pattern.to_string(),
            negated,
            matcher: glob.compile_matcher(),
        })
    }

    /// The pattern as written
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Classify `path` against this pattern
    pub fn evaluate(&self, path: &str) -> PatternMatch {
        if !self.matcher.is_match(normalize_path(path)) {
            PatternMatch::NoMatch
        } else if self.negated {
            PatternMatch::Excluded
        } else {
            PatternMatch::Included
        }
    }

    /// Whether the pattern positively matches `path`.
    ///
    /// A negated pattern never does; see `evaluate` for exclusions.
    pub fn is_match(&self, path: &str) -> bool {
        self.evaluate(path) == PatternMatch::Included
    }
}

/// Whether `pattern` positively matches `path`.
///
/// Negated patterns only exclude, so they always return `false` here.
pub fn matches(pattern: &str, path: &str) -> Result<bool> {
    Ok(Pattern::new(pattern)?.is_match(path))
}

/// The compiled pattern list of one override rule.
///
/// A path matches when at least one positive pattern matches and no negated
/// pattern matches.
#[derive(Debug, Clone)]
pub struct RuleMatcher {
    include: GlobSet,
    exclude: GlobSet,
}

impl RuleMatcher {
    /// Compile every pattern; the first malformed one fails the whole list
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut include = GlobSetBuilder::new();
        let mut exclude = GlobSetBuilder::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let (negated, body) = split_negation(pattern)?;
            let glob = compile_glob(body, pattern)?;
            if negated {
                exclude.add(glob);
            } else {
                include.add(glob);
            }
        }

        let joined = || {
            patterns
                .iter()
                .map(|p| p.as_ref())
                .collect::<Vec<_>>()
                .join(", ")
        };

        Ok(Self {
            include: include.build().map_err(|e| invalid(&joined(), e.to_string()))?,
            exclude: exclude.build().map_err(|e| invalid(&joined(), e.to_string()))?,
        })
    }

    /// Number of positive patterns
    pub fn positive_count(&self) -> usize {
        self.include.len()
    }

    /// Number of negated patterns
    pub fn negated_count(&self) -> usize {
        self.exclude.len()
    }

    /// False when no path can ever match
    pub fn can_match(&self) -> bool {
        !self.include.is_empty()
    }

    /// Match a path in any form; it is normalized first
    pub fn is_match(&self, path: &str) -> bool {
        self.is_match_normalized(&normalize_path(path))
    }

    /// Match a path already in normalized form
    pub fn is_match_normalized(&self, path: &str) -> bool {
        self.include.is_match(path) && !self.exclude.is_match(path)
    }
}
