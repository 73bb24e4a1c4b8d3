//! Explain output for a resolution
//!
//! Records which rules matched a path and where each effective value came
//! from, in structured and human-readable form.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::options::{FormatOptions, OptionKey};
use crate::rule::OverrideRule;

/// Where an effective value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum OptionOrigin {
    Base,
    Override { rule_index: usize },
}

/// Effective options for one path with full provenance
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// The path in normalized form
    pub path: String,

    /// Effective options; identical to `ConfigResolver::resolve`
    pub options: FormatOptions,

    /// Indices of matching rules, in declaration order
    pub matched_rules: Vec<usize>,

    /// Origin of every option that an override set
    pub origins: BTreeMap<OptionKey, OptionOrigin>,

    /// Human-readable explanation
    pub explanation: String,
}

impl Resolution {
    pub(crate) fn build(
        path: String,
        base: &FormatOptions,
        rules: &[OverrideRule],
        matched_rules: Vec<usize>,
    ) -> Self {
        let mut options = base.clone();
        let mut origins = BTreeMap::new();

        for &index in &matched_rules {
            let rule = &rules[index];
            options.apply(rule.options());
            for key in rule.options().keys() {
                origins.insert(key, OptionOrigin::Override { rule_index: index });
            }
        }

        let explanation = Self::generate_explanation(&path, &options, rules, &matched_rules, &origins);

        Self {
            path,
            options,
            matched_rules,
            origins,
            explanation,
        }
    }

    /// Origin of the effective value for `key`
    pub fn origin(&self, key: OptionKey) -> OptionOrigin {
        self.origins.get(&key).copied().unwrap_or(OptionOrigin::Base)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn generate_explanation(
        path: &str,
        options: &FormatOptions,
        rules: &[OverrideRule],
        matched: &[usize],
        origins: &BTreeMap<OptionKey, OptionOrigin>,
    ) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Path: {}", path));
        lines.push(String::new());

        if matched.is_empty() {
            lines.push("Matched overrides: none (base configuration applies)".to_string());
        } else {
            lines.push("Matched overrides:".to_string());
            for &index in matched {
                lines.push(format!("  #{} [{}]", index, rules[index].patterns().join(", ")));
            }
        }

        lines.push(String::new());
        lines.push("Effective options:".to_string());
        for (key, value) in options.iter() {
            match origins.get(&key) {
                Some(OptionOrigin::Override { rule_index }) => {
                    lines.push(format!("  {} = {} (override #{})", key, value, rule_index))
                }
                _ => lines.push(format!("  {} = {}", key, value)),
            }
        }

        lines.join("\n")
    }
}
