//! format-overrides - effective formatter options per file
//!
//! This crate collapses a base set of formatter options and an ordered list
//! of file-pattern override rules into the effective option set for any
//! path. Rules are applied in declaration order and a later matching rule
//! replaces only the keys it sets.

pub mod cache;
pub mod error;
pub mod options;
pub mod pattern;
pub mod resolver;
pub mod rule;

pub use cache::{CacheStats, ResolutionCache};
pub use error::{OverrideError, Result};
pub use options::{FormatOptions, OptionKey, OptionValue, PartialOptions, ValueKind};
pub use pattern::{matches, normalize_path, Pattern, PatternMatch, RuleMatcher};
pub use resolver::{ConfigResolver, OptionOrigin, RawConfig, Resolution};
pub use rule::{OverrideRule, RawOverride, RuleWarning, RuleWarningKind};
