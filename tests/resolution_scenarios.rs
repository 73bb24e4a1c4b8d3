//! Resolution scenario tests
//!
//! End-to-end checks of resolver behavior through the public API: rule
//! precedence, negation, fallback to the base, and construction failures.

use format_overrides::{
    ConfigResolver, FormatOptions, OptionKey, OptionValue, OverrideError, OverrideRule,
    PartialOptions, RawOverride,
};
use serde_json::{json, Value};

// Base used by most scenarios
fn base() -> FormatOptions {
    FormatOptions::from_value(&json!({
        "printWidth": 90,
        "tabWidth": 4,
        "useTabs": true,
        "trailingComma": "all"
    }))
    .unwrap()
}

fn rule(files: &[&str], options: Value) -> OverrideRule {
    OverrideRule::from_raw(&RawOverride::new(files.iter().copied(), options).unwrap()).unwrap()
}

fn resolver(rules: Vec<OverrideRule>) -> ConfigResolver {
    ConfigResolver::new(base(), rules).unwrap()
}

const SAMPLE_PATHS: &[&str] = &[
    "main.js",
    "config.yml",
    "docs/readme.md",
    "vendor/readme.md",
    "src/a/b/c.test.js",
    ".github/workflows/ci.yaml",
    "notes.md",
];

// =============================================================================
// Concrete scenarios
// =============================================================================

#[test]
fn test_yaml_override_applies_only_to_yaml() {
    let resolver = resolver(vec![rule(&["*.yml", "*.yaml"], json!({"tabWidth": 2}))]);

    let resolved = resolver.resolve("config.yml");
    assert_eq!(resolved.get(OptionKey::PrintWidth), &OptionValue::Int(90));
    assert_eq!(resolved.get(OptionKey::TabWidth), &OptionValue::Int(2));
    assert_eq!(resolved.get(OptionKey::UseTabs), &OptionValue::Bool(true));
    assert_eq!(
        resolved.get(OptionKey::TrailingComma),
        &OptionValue::Choice("all")
    );

    assert_eq!(resolver.resolve("main.js"), base());
}

#[test]
fn test_later_rule_wins() {
    let resolver = resolver(vec![
        rule(&["*.md"], json!({"tabWidth": 2})),
        rule(&["docs/*.md"], json!({"tabWidth": 8})),
    ]);

    assert_eq!(resolver.resolve("docs/readme.md").tab_width(), 8);
    assert_eq!(resolver.resolve("notes.md").tab_width(), 2);
}

#[test]
fn test_double_star_matches_any_depth() {
    let resolver = resolver(vec![rule(&["**/*.test.js"], json!({"printWidth": 120}))]);

    assert_eq!(resolver.resolve("src/a/b/c.test.js").print_width(), 120);
    assert_eq!(resolver.resolve("src/a/b/c.js").print_width(), 90);
}

#[test]
fn test_unknown_option_fails_construction() {
    let err = OverrideRule::from_raw(&RawOverride::new(["*.js"], json!({"unknownKey": 1})).unwrap())
        .unwrap_err();
    assert!(matches!(err, OverrideError::UnknownOption { ref key } if key == "unknownKey"));
}

#[test]
fn test_unterminated_brace_fails_construction() {
    let err = OverrideRule::from_raw(&RawOverride::new(["{unterminated"], json!({"tabWidth": 2})).unwrap())
        .unwrap_err();
    assert!(matches!(err, OverrideError::InvalidPattern { .. }));
}

#[test]
fn test_construction_fails_as_a_whole() {
    let raw = vec![
        RawOverride::new(["*.md"], json!({"tabWidth": 2})).unwrap(),
        RawOverride::new(["*.js"], json!({"unknownKey": 1})).unwrap(),
    ];
    let result = ConfigResolver::from_raw(base(), &raw);
    assert!(result.is_err());
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_identity_with_no_rules() {
    let resolver = resolver(vec![]);
    for path in SAMPLE_PATHS {
        assert_eq!(resolver.resolve(path), base(), "path {}", path);
    }
}

#[test]
fn test_idempotence() {
    let resolver = resolver(vec![
        rule(&["*.md"], json!({"tabWidth": 2})),
        rule(&["**/*.yaml"], json!({"useTabs": false})),
    ]);
    for path in SAMPLE_PATHS {
        assert_eq!(resolver.resolve(path), resolver.resolve(path));
    }
}

#[test]
fn test_order_sensitivity() {
    let a = rule(&["**/*.md"], json!({"tabWidth": 2}));
    let b = rule(&["docs/**"], json!({"tabWidth": 6}));

    let forward = resolver(vec![a.clone(), b.clone()]);
    let reversed = resolver(vec![b, a]);

    assert_eq!(forward.resolve("docs/readme.md").tab_width(), 6);
    assert_eq!(reversed.resolve("docs/readme.md").tab_width(), 2);
}

#[test]
fn test_disjoint_composition() {
    let resolver = resolver(vec![
        rule(&["src/**"], json!({"tabWidth": 2})),
        rule(&["**/*.ts"], json!({"semi": false, "quoteProps": "preserve"})),
    ]);

    let resolved = resolver.resolve("src/app/main.ts");
    assert_eq!(resolved.tab_width(), 2);
    assert_eq!(resolved.get(OptionKey::Semi), &OptionValue::Bool(false));
    assert_eq!(
        resolved.get(OptionKey::QuoteProps),
        &OptionValue::Choice("preserve")
    );
    // Untouched base keys
    assert_eq!(resolved.print_width(), 90);
    assert!(resolved.use_tabs());
    assert_eq!(base().diff(&resolved).len(), 3);
}

#[test]
fn test_negation() {
    let resolver = resolver(vec![rule(&["**/*.md", "!vendor/**"], json!({"tabWidth": 2}))]);

    assert_eq!(resolver.resolve("docs/readme.md").tab_width(), 2);
    assert_eq!(resolver.resolve("vendor/readme.md"), base());
}

#[test]
fn test_no_match_fallback() {
    let resolver = resolver(vec![
        rule(&["*.md"], json!({"tabWidth": 2})),
        rule(&["docs/**"], json!({"printWidth": 100})),
    ]);

    for path in ["main.js", "src/docs/a.ts", "README.MD"] {
        assert!(resolver.matching_rules(path).is_empty());
        assert_eq!(resolver.resolve(path), base());
    }
}

#[test]
fn test_resolution_never_mutates_resolver_state() {
    let resolver = resolver(vec![rule(&["*.md"], json!({"tabWidth": 2}))]);
    let fingerprint = resolver.fingerprint().to_string();

    for path in SAMPLE_PATHS {
        let _ = resolver.resolve(path);
    }

    assert_eq!(resolver.base(), &base());
    assert_eq!(resolver.fingerprint(), fingerprint);
    assert_eq!(
        resolver.rules()[0].options().get(OptionKey::TabWidth),
        Some(&OptionValue::Int(2))
    );
}

#[test]
fn test_dead_rule_is_a_warning_not_an_error() {
    let empty: [&str; 0] = [];
    let dead = OverrideRule::new(
        &empty,
        PartialOptions::new()
            .with(OptionKey::TabWidth, OptionValue::Int(2))
            .unwrap(),
    )
    .unwrap();

    let resolver = resolver(vec![dead]);
    assert_eq!(resolver.warnings().len(), 1);
    for path in SAMPLE_PATHS {
        assert_eq!(resolver.resolve(path), base());
    }
}

// =============================================================================
// Host config shape
// =============================================================================

#[test]
fn test_host_config_object() {
    let resolver = ConfigResolver::from_value(&json!({
        "printWidth": 90,
        "quoteProps": "consistent",
        "tabWidth": 4,
        "trailingComma": "all",
        "useTabs": true,
        "overrides": [
            {"files": ["./**/*.yml", "./**/*.yaml"], "options": {"tabWidth": 2}},
            {"files": "**/*.md", "excludeFiles": "CHANGELOG.md", "options": {"proseWrap": "always"}}
        ]
    }))
    .unwrap();

    assert_eq!(resolver.resolve("config.yml").tab_width(), 2);
    assert_eq!(resolver.resolve(".github/workflows/ci.yaml").tab_width(), 2);
    assert_eq!(resolver.resolve("src/main.rs").tab_width(), 4);

    assert_eq!(
        resolver.resolve("docs/guide.md").get(OptionKey::ProseWrap),
        &OptionValue::Choice("always")
    );
    assert_eq!(
        resolver.resolve("CHANGELOG.md").get(OptionKey::ProseWrap),
        &OptionValue::Choice("preserve")
    );
}

#[test]
fn test_batch_matches_individual_resolution() {
    let resolver = resolver(vec![
        rule(&["*.md"], json!({"tabWidth": 2})),
        rule(&["**/*.yaml"], json!({"useTabs": false})),
    ]);

    let batch = resolver.resolve_many(SAMPLE_PATHS);
    assert_eq!(batch.len(), SAMPLE_PATHS.len());
    for (path, resolved) in SAMPLE_PATHS.iter().zip(&batch) {
        assert_eq!(resolved, &resolver.resolve(path));
    }
}
