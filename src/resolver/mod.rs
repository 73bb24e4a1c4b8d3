//! Effective option resolution
//!
//! A `ConfigResolver` owns a base option set and an ordered rule list, both
//! fixed for its lifetime. `resolve` starts from a copy of the base and, for
//! each rule in declaration order that matches the path, overwrites the keys
//! that rule sets. Precedence is per key: a later matching rule replaces only
//! the keys it names, so independent rules compose.
//!
//! A resolver holds no mutable state; it is `Send + Sync` and `resolve` may
//! run concurrently from any number of threads.

mod explain;

pub use explain::{OptionOrigin, Resolution};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::error::{OverrideError, Result};
use crate::options::{FormatOptions, PartialOptions};
use crate::pattern::normalize_path;
use crate::rule::{OverrideRule, RawOverride, RuleWarning};

/// A whole host configuration: top-level options plus an `overrides` list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub overrides: Vec<RawOverride>,

    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl RawConfig {
    /// Parse from a JSON value
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::deserialize(value).map_err(|e| OverrideError::Malformed(e.to_string()))
    }
}

#[derive(Serialize)]
struct FingerprintInput<'a> {
    base: &'a FormatOptions,
    rules: &'a [OverrideRule],
}

/// Resolves the effective options for any path
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    base: FormatOptions,
    rules: Vec<OverrideRule>,
    warnings: Vec<RuleWarning>,
    fingerprint: String,
}

impl ConfigResolver {
    /// Build a resolver from a complete base and validated rules
    pub fn new(base: FormatOptions, rules: Vec<OverrideRule>) -> Result<Self> {
        let warnings: Vec<RuleWarning> = rules
            .iter()
            .enumerate()
            .flat_map(|(rule_index, rule)| {
                rule.warning_kinds()
                    .into_iter()
                    .map(move |kind| RuleWarning { rule_index, kind })
            })
            .collect();

        for warning in &warnings {
            tracing::warn!(rule = warning.rule_index, "{}", warning);
        }

        let fingerprint = Self::compute_fingerprint(&base, &rules)?;

        tracing::debug!(
            rules = rules.len(),
            warnings = warnings.len(),
            fingerprint = %fingerprint,
            "built config resolver"
        );

        Ok(Self {
            base,
            rules,
            warnings,
            fingerprint,
        })
    }

    /// Build a resolver, validating host rule descriptions in order
    pub fn from_raw(base: FormatOptions, raw_rules: &[RawOverride]) -> Result<Self> {
        let rules = raw_rules
            .iter()
            .map(OverrideRule::from_raw)
            .collect::<Result<Vec<_>>>()?;
        Self::new(base, rules)
    }

    /// Build a resolver from a host config object.
    ///
    /// Top-level keys are options layered over the built-in defaults; the
    /// `overrides` array supplies the rules.
    pub fn from_raw_config(raw: &RawConfig) -> Result<Self> {
        let options = PartialOptions::from_object(&raw.options)?;
        let base = FormatOptions::default().with_overrides(&options);
        Self::from_raw(base, &raw.overrides)
    }

    /// Parse and build from a JSON host config object
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_raw_config(&RawConfig::from_value(value)?)
    }

    /// SHA-256 of the canonical JSON (RFC 8785) of base and rules
    fn compute_fingerprint(base: &FormatOptions, rules: &[OverrideRule]) -> Result<String> {
        let jcs_bytes = serde_json_canonicalizer::to_vec(&FingerprintInput { base, rules })
            .map_err(|e| OverrideError::Fingerprint(e.to_string()))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    pub fn base(&self) -> &FormatOptions {
        &self.base
    }

    /// Rules in declaration order
    pub fn rules(&self) -> &[OverrideRule] {
        &self.rules
    }

    /// No-op rules found at construction
    pub fn warnings(&self) -> &[RuleWarning] {
        &self.warnings
    }

    /// Digest identifying this resolver's base and rules
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Effective options for `path`
    pub fn resolve(&self, path: &str) -> FormatOptions {
        self.resolve_normalized(&normalize_path(path))
    }

    pub(crate) fn resolve_normalized(&self, path: &str) -> FormatOptions {
        let mut effective = self.base.clone();
        let mut matched = 0usize;
        for rule in &self.rules {
            if rule.matches_normalized(path) {
                effective.apply(rule.options());
                matched += 1;
            }
        }
        tracing::trace!(path, matched, "resolved options");
        effective
    }

    /// Resolve many paths in parallel; output order follows input order
    pub fn resolve_many<S>(&self, paths: &[S]) -> Vec<FormatOptions>
    where
        S: AsRef<str> + Sync,
    {
        paths.par_iter().map(|p| self.resolve(p.as_ref())).collect()
    }

    /// Indices of the rules matching `path`, in declaration order
    pub fn matching_rules(&self, path: &str) -> Vec<usize> {
        let normalized = normalize_path(path);
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.matches_normalized(&normalized))
            .map(|(i, _)| i)
            .collect()
    }

    /// Resolve `path` and record where each value came from
    pub fn explain(&self, path: &str) -> Resolution {
        let matched = self.matching_rules(path);
        Resolution::build(normalize_path(path), &self.base, &self.rules, matched)
    }
}
