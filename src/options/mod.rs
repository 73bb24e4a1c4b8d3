//! Formatter option schema
//!
//! The option universe is closed: every key is an `OptionKey` variant and
//! every value is checked against its key's `ValueKind` when it enters a
//! `PartialOptions` or `FormatOptions`. Lookups on a `FormatOptions` are
//! therefore total.
//!
//! Layering:
//! 1. Built-in defaults (`defaults`)
//! 2. Host base options (top-level keys of the host config)
//! 3. Matching override rules, applied per path by the resolver

mod defaults;

pub use defaults::{builtin_value, builtin_values};

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{OverrideError, Result};

/// A recognized formatter option
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionKey {
    PrintWidth,
    TabWidth,
    UseTabs,
    Semi,
    SingleQuote,
    JsxSingleQuote,
    QuoteProps,
    TrailingComma,
    BracketSpacing,
    BracketSameLine,
    ArrowParens,
    ProseWrap,
    HtmlWhitespaceSensitivity,
    EndOfLine,
    EmbeddedLanguageFormatting,
    SingleAttributePerLine,
    VueIndentScriptAndStyle,
}

impl OptionKey {
    /// Number of recognized options
    pub const COUNT: usize = 17;

    /// Every recognized option, in declaration order
    pub const ALL: [OptionKey; OptionKey::COUNT] = [
        OptionKey::PrintWidth,
        OptionKey::TabWidth,
        OptionKey::UseTabs,
        OptionKey::Semi,
        OptionKey::SingleQuote,
        OptionKey::JsxSingleQuote,
        OptionKey::QuoteProps,
        OptionKey::TrailingComma,
        OptionKey::BracketSpacing,
        OptionKey::BracketSameLine,
        OptionKey::ArrowParens,
        OptionKey::ProseWrap,
        OptionKey::HtmlWhitespaceSensitivity,
        OptionKey::EndOfLine,
        OptionKey::EmbeddedLanguageFormatting,
        OptionKey::SingleAttributePerLine,
        OptionKey::VueIndentScriptAndStyle,
    ];

    /// Wire spelling of the key
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::PrintWidth => "printWidth",
            OptionKey::TabWidth => "tabWidth",
            OptionKey::UseTabs => "useTabs",
            OptionKey::Semi => "semi",
            OptionKey::SingleQuote => "singleQuote",
            OptionKey::JsxSingleQuote => "jsxSingleQuote",
            OptionKey::QuoteProps => "quoteProps",
            OptionKey::TrailingComma => "trailingComma",
            OptionKey::BracketSpacing => "bracketSpacing",
            OptionKey::BracketSameLine => "bracketSameLine",
            OptionKey::ArrowParens => "arrowParens",
            OptionKey::ProseWrap => "proseWrap",
            OptionKey::HtmlWhitespaceSensitivity => "htmlWhitespaceSensitivity",
            OptionKey::EndOfLine => "endOfLine",
            OptionKey::EmbeddedLanguageFormatting => "embeddedLanguageFormatting",
            OptionKey::SingleAttributePerLine => "singleAttributePerLine",
            OptionKey::VueIndentScriptAndStyle => "vueIndentScriptAndStyle",
        }
    }

    /// Kind of value this option accepts
    pub fn kind(&self) -> ValueKind {
        match self {
            OptionKey::PrintWidth | OptionKey::TabWidth => ValueKind::Integer,
            OptionKey::UseTabs
            | OptionKey::Semi
            | OptionKey::SingleQuote
            | OptionKey::JsxSingleQuote
            | OptionKey::BracketSpacing
            | OptionKey::BracketSameLine
            | OptionKey::SingleAttributePerLine
            | OptionKey::VueIndentScriptAndStyle => ValueKind::Bool,
            OptionKey::QuoteProps => ValueKind::Choice(&["as-needed", "consistent", "preserve"]),
            OptionKey::TrailingComma => ValueKind::Choice(&["all", "es5", "none"]),
            OptionKey::ArrowParens => ValueKind::Choice(&["always", "avoid"]),
            OptionKey::ProseWrap => ValueKind::Choice(&["always", "never", "preserve"]),
            OptionKey::HtmlWhitespaceSensitivity => ValueKind::Choice(&["css", "strict", "ignore"]),
            OptionKey::EndOfLine => ValueKind::Choice(&["lf", "crlf", "cr", "auto"]),
            OptionKey::EmbeddedLanguageFormatting => ValueKind::Choice(&["auto", "off"]),
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OptionKey {
    type Err = OverrideError;

    fn from_str(s: &str) -> Result<Self> {
        OptionKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| OverrideError::UnknownOption { key: s.to_string() })
    }
}

impl Serialize for OptionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Shape of the values an option accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    /// Non-negative integer
    Integer,
    /// One of a fixed set of strings
    Choice(&'static [&'static str]),
}

impl ValueKind {
    /// Whether `value` has this kind
    pub fn accepts(&self, value: &OptionValue) -> bool {
        match (self, value) {
            (ValueKind::Bool, OptionValue::Bool(_)) => true,
            (ValueKind::Integer, OptionValue::Int(_)) => true,
            (ValueKind::Choice(allowed), OptionValue::Choice(c)) => allowed.contains(c),
            _ => false,
        }
    }

    /// Human-readable description used in error messages
    pub fn describe(&self) -> String {
        match self {
            ValueKind::Bool => "boolean".to_string(),
            ValueKind::Integer => "non-negative integer".to_string(),
            ValueKind::Choice(allowed) => format!("one of [{}]", allowed.join(", ")),
        }
    }
}

/// A single option value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionValue {
    Bool(bool),
    Int(u64),
    Choice(&'static str),
}

impl OptionValue {
    /// Parse a JSON value for `key`, checking it against the key's kind
    pub fn from_json(key: OptionKey, value: &Value) -> Result<Self> {
        let kind = key.kind();
        let parsed = match (kind, value) {
            (ValueKind::Bool, Value::Bool(b)) => Some(OptionValue::Bool(*b)),
            (ValueKind::Integer, Value::Number(n)) => n.as_u64().map(OptionValue::Int),
            (ValueKind::Choice(allowed), Value::String(s)) => allowed
                .iter()
                .find(|c| **c == s.as_str())
                .map(|c| OptionValue::Choice(*c)),
            _ => None,
        };

        parsed.ok_or_else(|| OverrideError::InvalidValue {
            key: key.as_str().to_string(),
            expected: kind.describe(),
            found: value.to_string(),
        })
    }

    /// Convert to a JSON value
    pub fn to_json(&self) -> Value {
        match self {
            OptionValue::Bool(b) => Value::Bool(*b),
            OptionValue::Int(n) => Value::Number((*n).into()),
            OptionValue::Choice(s) => Value::String(s.to_string()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            OptionValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            OptionValue::Choice(s) => Some(*s),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(n) => write!(f, "{}", n),
            OptionValue::Choice(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl Serialize for OptionValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            OptionValue::Bool(b) => serializer.serialize_bool(*b),
            OptionValue::Int(n) => serializer.serialize_u64(*n),
            OptionValue::Choice(s) => serializer.serialize_str(s),
        }
    }
}

fn check_kind(key: OptionKey, value: &OptionValue) -> Result<()> {
    let kind = key.kind();
    if kind.accepts(value) {
        Ok(())
    } else {
        Err(OverrideError::InvalidValue {
            key: key.as_str().to_string(),
            expected: kind.describe(),
            found: value.to_string(),
        })
    }
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| OverrideError::Malformed(format!("{} must be an object, found {}", what, value)))
}

/// A partial option map, as carried by an override rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialOptions {
    values: BTreeMap<OptionKey, OptionValue>,
}

impl PartialOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object keyed by option name
    pub fn from_value(value: &Value) -> Result<Self> {
        Self::from_object(as_object(value, "options")?)
    }

    pub(crate) fn from_object(map: &Map<String, Value>) -> Result<Self> {
        let mut options = Self::new();
        for (name, raw) in map {
            let key: OptionKey = name.parse()?;
            options.values.insert(key, OptionValue::from_json(key, raw)?);
        }
        Ok(options)
    }

    /// Set a value, checking it against the key's kind
    pub fn insert(&mut self, key: OptionKey, value: OptionValue) -> Result<()> {
        check_kind(key, &value)?;
        self.values.insert(key, value);
        Ok(())
    }

    /// Builder form of `insert`
    pub fn with(mut self, key: OptionKey, value: OptionValue) -> Result<Self> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: OptionKey) -> Option<&OptionValue> {
        self.values.get(&key)
    }

    pub fn contains(&self, key: OptionKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionKey, &OptionValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = OptionKey> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.as_str().to_string(), v.to_json()))
                .collect(),
        )
    }
}

impl Serialize for PartialOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

/// A complete option set: the base configuration, or the resolved
/// configuration for one path. Every recognized key has a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    values: [OptionValue; OptionKey::COUNT],
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            values: builtin_values(),
        }
    }
}

impl FormatOptions {
    /// Build a strict base configuration; every key must be present
    pub fn from_complete(options: &PartialOptions) -> Result<Self> {
        if let Some(missing) = OptionKey::ALL.iter().find(|k| !options.contains(**k)) {
            return Err(OverrideError::MissingOption {
                key: missing.as_str().to_string(),
            });
        }
        Ok(Self::default().with_overrides(options))
    }

    /// Parse a JSON object of options layered over the built-in defaults.
    ///
    /// Unknown keys fail with `UnknownOption`. Keys that are not options
    /// (such as `overrides`) must be removed by the caller first.
    pub fn from_value(value: &Value) -> Result<Self> {
        let partial = PartialOptions::from_value(value)?;
        Ok(Self::default().with_overrides(&partial))
    }

    /// Copy of `self` with every value in `overrides` applied
    pub fn with_overrides(&self, overrides: &PartialOptions) -> Self {
        let mut out = self.clone();
        out.apply(overrides);
        out
    }

    /// Apply `overrides` in place; later values replace earlier ones per key
    pub fn apply(&mut self, overrides: &PartialOptions) {
        for (key, value) in overrides.iter() {
            self.values[key.index()] = *value;
        }
    }

    pub fn get(&self, key: OptionKey) -> &OptionValue {
        &self.values[key.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionKey, &OptionValue)> + '_ {
        OptionKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    // Values are kind-checked on insert; a mismatch falls back to the built-in
    fn int(&self, key: OptionKey) -> u64 {
        match (self.get(key), &builtin_value(key)) {
            (OptionValue::Int(n), _) | (_, OptionValue::Int(n)) => *n,
            _ => 0,
        }
    }

    fn flag(&self, key: OptionKey) -> bool {
        match (self.get(key), &builtin_value(key)) {
            (OptionValue::Bool(b), _) | (_, OptionValue::Bool(b)) => *b,
            _ => false,
        }
    }

    pub fn print_width(&self) -> u64 {
        self.int(OptionKey::PrintWidth)
    }

    pub fn tab_width(&self) -> u64 {
        self.int(OptionKey::TabWidth)
    }

    pub fn use_tabs(&self) -> bool {
        self.flag(OptionKey::UseTabs)
    }

    /// Keys whose values differ between `self` and `other`
    pub fn diff(&self, other: &FormatOptions) -> Vec<OptionKey> {
        OptionKey::ALL
            .iter()
            .copied()
            .filter(|k| self.get(*k) != other.get(*k))
            .collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.as_str().to_string(), v.to_json()))
                .collect(),
        )
    }
}

impl Serialize for FormatOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(OptionKey::COUNT))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}
