//! Built-in option defaults (layer 1)
//!
//! Hardcoded values used to complete a base configuration that only names
//! some of the recognized options.

use super::{OptionKey, OptionValue};

/// Built-in default value for a single option
pub fn builtin_value(key: OptionKey) -> OptionValue {
    match key {
        OptionKey::PrintWidth => OptionValue::Int(80),
        OptionKey::TabWidth => OptionValue::Int(2),
        OptionKey::UseTabs => OptionValue::Bool(false),
        OptionKey::Semi => OptionValue::Bool(true),
        OptionKey::SingleQuote => OptionValue::Bool(false),
        OptionKey::JsxSingleQuote => OptionValue::Bool(false),
        OptionKey::QuoteProps => OptionValue::Choice("as-needed"),
        OptionKey::TrailingComma => OptionValue::Choice("all"),
        OptionKey::BracketSpacing => OptionValue::Bool(true),
        OptionKey::BracketSameLine => OptionValue::Bool(false),
        OptionKey::ArrowParens => OptionValue::Choice("always"),
        OptionKey::ProseWrap => OptionValue::Choice("preserve"),
        OptionKey::HtmlWhitespaceSensitivity => OptionValue::Choice("css"),
        OptionKey::EndOfLine => OptionValue::Choice("lf"),
        OptionKey::EmbeddedLanguageFormatting => OptionValue::Choice("auto"),
        OptionKey::SingleAttributePerLine => OptionValue::Bool(false),
        OptionKey::VueIndentScriptAndStyle => OptionValue::Bool(false),
    }
}

/// Built-in defaults for every recognized option, indexed by key position
pub fn builtin_values() -> [OptionValue; OptionKey::COUNT] {
    OptionKey::ALL.map(builtin_value)
}
