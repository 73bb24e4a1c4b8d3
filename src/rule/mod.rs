//! Override rules
//!
//! An `OverrideRule` pairs a pattern list with a partial option map. It is
//! validated once at construction: every pattern must compile and every
//! option must be a recognized key with a value of the right kind.
//!
//! `RawOverride` is the host-supplied description, in the shape formatter
//! configs use:
//!
//! ```json
//! { "files": ["*.yml", "*.yaml"], "excludeFiles": "vendor/**", "options": { "tabWidth": 2 } }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{OverrideError, Result};
use crate::options::PartialOptions;
use crate::pattern::RuleMatcher;

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn string_or_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// Unvalidated override description supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOverride {
    /// Patterns the rule applies to; `!`-prefixed entries exclude
    #[serde(alias = "patterns", deserialize_with = "string_or_list")]
    pub files: Vec<String>,

    /// Patterns excluded from the rule, equivalent to `!`-prefixed `files`
    #[serde(default, deserialize_with = "string_or_list")]
    pub exclude_files: Vec<String>,

    /// Partial option map keyed by option name
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl RawOverride {
    /// Build from patterns and a JSON object of options.
    ///
    /// Fails with `Malformed` when `options` is not an object.
    pub fn new<S: Into<String>>(files: impl IntoIterator<Item = S>, options: Value) -> Result<Self> {
        let options = match options {
            Value::Object(map) => map,
            other => {
                return Err(OverrideError::Malformed(format!(
                    "override: options must be an object, found {}",
                    other
                )))
            }
        };
        Ok(Self {
            files: files.into_iter().map(Into::into).collect(),
            exclude_files: Vec::new(),
            options,
        })
    }

    /// Parse from a JSON value
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| OverrideError::Malformed(format!("override: {}", e)))
    }

    /// Full pattern list, with `excludeFiles` folded in as negated entries
    pub fn patterns(&self) -> Vec<String> {
        let excluded = self.exclude_files.iter().map(|p| {
            if p.starts_with('!') {
                p.clone()
            } else {
                format!("!{}", p)
            }
        });
        self.files.iter().cloned().chain(excluded).collect()
    }
}

/// Why a rule can never change a resolved configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleWarningKind {
    /// The pattern list is empty, so the rule never matches
    NoPatterns,
    /// Only negated patterns, so the rule never matches
    OnlyNegatedPatterns,
    /// The rule matches paths but overrides nothing
    NoOptions,
}

/// A no-op rule found while building a resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleWarning {
    /// Position of the rule in declaration order
    pub rule_index: usize,
    pub kind: RuleWarningKind,
}

impl fmt::Display for RuleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            RuleWarningKind::NoPatterns => "has no patterns and never matches",
            RuleWarningKind::OnlyNegatedPatterns => {
                "has only negated patterns and never matches"
            }
            RuleWarningKind::NoOptions => "sets no options",
        };
        write!(f, "override #{} {}", self.rule_index, what)
    }
}

/// A validated, immutable override rule
#[derive(Debug, Clone, Serialize)]
pub struct OverrideRule {
    patterns: Vec<String>,
    options: PartialOptions,
    #[serde(skip)]
    matcher: RuleMatcher,
}

impl OverrideRule {
    /// Build a rule from patterns and already-typed options
    pub fn new<S: AsRef<str>>(patterns: &[S], options: PartialOptions) -> Result<Self> {
        let matcher = RuleMatcher::new(patterns)?;
        let patterns: Vec<String> = patterns.iter().map(|p| p.as_ref().to_string()).collect();

        tracing::debug!(
            patterns = ?patterns,
            options = options.len(),
            "compiled override rule"
        );

        Ok(Self {
            patterns,
            options,
            matcher,
        })
    }

    /// Validate a host description
    pub fn from_raw(raw: &RawOverride) -> Result<Self> {
        let options = PartialOptions::from_object(&raw.options)?;
        let patterns = raw.patterns();
        Self::new(patterns.as_slice(), options)
    }

    /// Parse and validate a JSON override description
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_raw(&RawOverride::from_value(value)?)
    }

    /// Patterns as declared
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn options(&self) -> &PartialOptions {
        &self.options
    }

    /// Whether the rule applies to `path`
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    pub(crate) fn matches_normalized(&self, path: &str) -> bool {
        self.matcher.is_match_normalized(path)
    }

    /// Reasons this rule is a no-op, if any
    pub fn warning_kinds(&self) -> Vec<RuleWarningKind> {
        let mut kinds = Vec::new();
        if self.patterns.is_empty() {
            kinds.push(RuleWarningKind::NoPatterns);
        } else if !self.matcher.can_match() {
            kinds.push(RuleWarningKind::OnlyNegatedPatterns);
        }
        if self.options.is_empty() {
            kinds.push(RuleWarningKind::NoOptions);
        }
        kinds
    }
}
