use confjson_core::{resolve, ConfigError, Registry, Value, DEFAULT_DOCUMENT};

/// Helper: registry with one strict-JSON document loaded as "default".
fn registry_with(json: &str) -> Registry {
    let mut registry = Registry::new();
    registry.load_text(DEFAULT_DOCUMENT, json, true).unwrap();
    registry
}

fn primary() -> Registry {
    registry_with(r#"{"Primary":{"energy":10.0,"particle":"e-"}}"#)
}

// ============================================================================
// Resolution
// ============================================================================

#[test]
fn nested_double_resolves() {
    let registry = primary();
    assert_eq!(registry.accessor().get_double("Primary/energy").unwrap(), 10.0);
}

#[test]
fn contains_reports_missing_keys() {
    let registry = primary();
    let config = registry.accessor();
    assert!(config.contains("Primary"));
    assert!(config.contains("Primary/particle"));
    assert!(!config.contains("Primary/missing"));
    assert!(!config.contains("Secondary/energy"));
}

#[test]
fn contains_is_false_without_active_document() {
    let registry = Registry::new();
    assert!(!registry.accessor().contains("Primary"));
}

#[test]
fn missing_key_is_key_not_found() {
    let registry = primary();
    let err = registry.accessor().get_string("Primary/missing").unwrap_err();
    assert!(matches!(err, ConfigError::KeyNotFound { ref path } if path == "Primary/missing"));
}

#[test]
fn scalar_stops_resolution_and_ignores_the_rest() {
    let registry = registry_with(r#"{"Run":{"Seed":7}}"#);
    let config = registry.accessor();
    assert_eq!(config.get_int("Run/Seed/anything/else").unwrap(), 7);
    assert!(config.contains("Run/Seed/x"));
}

#[test]
fn empty_segments_are_skipped() {
    let registry = primary();
    let config = registry.accessor();
    assert_eq!(config.get_double("/Primary//energy/").unwrap(), 10.0);
}

#[test]
fn empty_path_resolves_to_root() {
    let registry = primary();
    let root = registry.accessor().resolve("").unwrap();
    assert!(root.get("Primary").is_some());
}

#[test]
fn resolve_works_on_a_bare_tree() {
    let tree = Value::from(serde_json::json!({"a": {"b": {"c": [1, 2]}}}));
    assert_eq!(resolve(&tree, "a/b/c").map(Value::kind), Some("array"));
    assert!(resolve(&tree, "a/x/c").is_none());
}

#[test]
fn getters_fail_without_active_document() {
    let mut registry = Registry::new();
    registry.load_text("alt", "{ a: 1 }", false).unwrap();
    let err = registry.accessor().get_int("a").unwrap_err();
    assert!(matches!(err, ConfigError::NoActiveDocument));
}

// ============================================================================
// Scalar getters
// ============================================================================

#[test]
fn string_getter_rejects_number() {
    let registry = primary();
    let err = registry.accessor().get_string("Primary/energy").unwrap_err();
    match err {
        ConfigError::TypeMismatch {
            path,
            expected,
            actual,
        } => {
            assert_eq!(path, "Primary/energy");
            assert_eq!(expected, "string");
            assert_eq!(actual, "number");
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn numeric_getters_reject_strings() {
    let registry = primary();
    let config = registry.accessor();
    for err in [
        config.get_int("Primary/particle").unwrap_err(),
        config.get_long("Primary/particle").unwrap_err(),
        config.get_float("Primary/particle").unwrap_err(),
        config.get_double("Primary/particle").unwrap_err(),
    ] {
        assert!(matches!(
            err,
            ConfigError::TypeMismatch {
                expected: "number",
                actual: "string",
                ..
            }
        ));
    }
}

#[test]
fn bool_getter() {
    let registry = registry_with(r#"{"Run":{"serial":true,"threads":4}}"#);
    let config = registry.accessor();
    assert!(config.get_bool("Run/serial").unwrap());
    assert!(matches!(
        config.get_bool("Run/threads"),
        Err(ConfigError::TypeMismatch { expected: "bool", .. })
    ));
}

#[test]
fn integer_getters_truncate_toward_zero() {
    let registry = registry_with(r#"{"up":12.9,"down":-3.7,"big":5000000000}"#);
    let config = registry.accessor();
    assert_eq!(config.get_int("up").unwrap(), 12);
    assert_eq!(config.get_int("down").unwrap(), -3);
    assert_eq!(config.get_long("down").unwrap(), -3);
    assert_eq!(config.get_long("big").unwrap(), 5_000_000_000);
}

#[test]
fn float_getter_narrows() {
    let registry = registry_with(r#"{"x":0.1}"#);
    let config = registry.accessor();
    assert_eq!(config.get_float("x").unwrap(), 0.1f32);
    assert_eq!(config.get_double("x").unwrap(), 0.1f64);
}

#[test]
fn integral_literals_read_as_doubles() {
    let registry = registry_with(r#"{"n":3}"#);
    assert_eq!(registry.accessor().get_double("n").unwrap(), 3.0);
}

#[test]
fn object_is_not_a_scalar() {
    let registry = primary();
    let err = registry.accessor().get_double("Primary").unwrap_err();
    assert!(matches!(
        err,
        ConfigError::TypeMismatch {
            actual: "object",
            ..
        }
    ));
}

// ============================================================================
// Array getters
// ============================================================================

#[test]
fn double_array_full_success() {
    let registry = registry_with(r#"{"Primary":{"position":[0,0.5,-50]}}"#);
    let mut out = Vec::new();
    let n = registry
        .accessor()
        .get_double_array("Primary/position", &mut out)
        .unwrap();
    assert_eq!(n, 3);
    assert_eq!(out, [0.0, 0.5, -50.0]);
}

#[test]
fn int_array_degrades_on_mismatch() {
    let registry = registry_with(r#"{"a":[1, 2, "x", 4]}"#);
    let mut out = Vec::new();
    let n = registry.accessor().get_int_array("a", &mut out).unwrap();
    assert_eq!(n, 0);
    assert_eq!(out, [1, 2]);
}

#[test]
fn mismatch_on_first_element_leaves_output_empty() {
    let registry = registry_with(r#"{"a":["x", 1]}"#);
    let mut out = vec![9.0];
    let n = registry.accessor().get_double_array("a", &mut out).unwrap();
    assert_eq!(n, 0);
    assert!(out.is_empty());
}

#[test]
fn output_is_cleared_before_filling() {
    let registry = registry_with(r#"{"a":[1, 2]}"#);
    let mut out = vec![7, 8, 9];
    let n = registry.accessor().get_long_array("a", &mut out).unwrap();
    assert_eq!(n, 2);
    assert_eq!(out, [1, 2]);
}

#[test]
fn empty_array_returns_zero() {
    let registry = registry_with(r#"{"a":[]}"#);
    let mut out: Vec<String> = vec!["stale".into()];
    assert_eq!(registry.accessor().get_string_array("a", &mut out).unwrap(), 0);
    assert!(out.is_empty());
}

#[test]
fn typed_arrays() {
    let registry = registry_with(
        r#"{"flags":[true,false],"ids":[1.9,-2.9],"w":[0.25],"names":["e-","gamma"]}"#,
    );
    let config = registry.accessor();

    let mut flags = Vec::new();
    assert_eq!(config.get_bool_array("flags", &mut flags).unwrap(), 2);
    assert_eq!(flags, [true, false]);

    let mut ids = Vec::new();
    assert_eq!(config.get_int_array("ids", &mut ids).unwrap(), 2);
    assert_eq!(ids, [1, -2]);

    let mut w = Vec::new();
    assert_eq!(config.get_float_array("w", &mut w).unwrap(), 1);
    assert_eq!(w, [0.25f32]);

    let mut names = Vec::new();
    assert_eq!(config.get_string_array("names", &mut names).unwrap(), 2);
    assert_eq!(names, ["e-", "gamma"]);
}

#[test]
fn array_getter_on_scalar_is_type_mismatch() {
    let registry = primary();
    let mut out = Vec::new();
    let err = registry
        .accessor()
        .get_double_array("Primary/energy", &mut out)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::TypeMismatch {
            expected: "array",
            actual: "number",
            ..
        }
    ));
}

#[test]
fn array_getter_on_missing_key() {
    let registry = primary();
    let mut out = Vec::new();
    let err = registry
        .accessor()
        .get_bool_array("Primary/flags", &mut out)
        .unwrap_err();
    assert!(matches!(err, ConfigError::KeyNotFound { .. }));
}

// ============================================================================
// Lenient input end to end
// ============================================================================

#[test]
fn lenient_document_reads_back() {
    let mut registry = Registry::new();
    registry
        .load_text(
            DEFAULT_DOCUMENT,
            "{\n  Primary: {\n    particle: 'gamma'\n    energy: .5   // GeV\n    direction: [0, 0, +1]\n  }\n  Run: { start: 08:30:00 }\n}",
            false,
        )
        .unwrap();

    let config = registry.accessor();
    assert_eq!(config.get_string("Primary/particle").unwrap(), "gamma");
    assert_eq!(config.get_double("Primary/energy").unwrap(), 0.5);
    let mut direction = Vec::new();
    assert_eq!(config.get_double_array("Primary/direction", &mut direction).unwrap(), 3);
    assert_eq!(direction, [0.0, 0.0, 1.0]);
    assert_eq!(config.get_string("Run/start").unwrap(), "08:30:00");
}

#[test]
fn render_tree_of_active_document() {
    let registry = registry_with(
        r#"{"Primary":{"particle":"e-","energy":10.0,"position":[0,0,-50]},"Run":{"Seed":7}}"#,
    );
    let dump = registry.accessor().render_tree().unwrap();
    assert_eq!(
        dump,
        "Primary :\n  particle : \"e-\"\n  energy : 10\n  position : [0,0,-50]\nRun :\n  Seed : 7\n"
    );
}
