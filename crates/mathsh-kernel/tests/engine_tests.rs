//! Integration tests for end-to-end command execution.
//!
//! These tests drive the public Engine API the way the REPL does:
//! raw tokens in, values or errors out.

use mathsh_kernel::{Engine, EngineConfig, Error, Value};

fn raw(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}

fn make_engine() -> Engine {
    Engine::new(EngineConfig::default())
}

// ============================================================================
// Arithmetic through the full pipeline
// ============================================================================

#[test]
fn literal_arithmetic() {
    let mut engine = make_engine();
    assert_eq!(
        engine.execute_operation("add", &raw(&["2", "3"])).unwrap(),
        Value::Int(5)
    );
    assert_eq!(
        engine.execute_operation("divide", &raw(&["7", "2"])).unwrap(),
        Value::Float(3.5)
    );
    assert_eq!(
        engine.execute_operation("sum", &raw(&["1", "2", "3", "4"])).unwrap(),
        Value::Int(10)
    );
}

#[test]
fn variables_flow_into_operations() {
    let mut engine = make_engine();
    engine.execute_operation("set", &raw(&["a", "3"])).unwrap();
    engine.execute_operation("set", &raw(&["b", "4"])).unwrap();
    assert_eq!(
        engine
            .execute_operation("multiply", &raw(&["$a", "$b"]))
            .unwrap(),
        Value::Int(12)
    );
}

#[test]
fn results_can_be_chained_through_variables() {
    let mut engine = make_engine();
    engine.execute_operation("set", &raw(&["x", "5"])).unwrap();
    let sq = engine
        .execute_operation("multiply", &raw(&["$x", "$x"]))
        .unwrap();
    engine.vars_mut().set("sq", sq).unwrap();
    assert_eq!(
        engine.execute_operation("add", &raw(&["$sq", "1"])).unwrap(),
        Value::Int(26)
    );
}

// ============================================================================
// User functions
// ============================================================================

#[test]
fn defined_functions_are_callable() {
    let mut engine = make_engine();
    engine
        .execute_operation("def", &raw(&["double", "x", "=", "multiply", "$x", "2"]))
        .unwrap();
    assert_eq!(
        engine.execute_operation("double", &raw(&["5"])).unwrap(),
        Value::Int(10)
    );
}

#[test]
fn function_composition_keeps_scopes_separate() {
    let mut engine = make_engine();
    engine
        .define_function("double", vec!["x".into()], "multiply $x 2")
        .unwrap();
    engine
        .define_function("double_plus", vec!["x".into(), "y".into()], "double $x")
        .unwrap();

    // The outer binding of y must not reach the inner call
    assert_eq!(
        engine
            .execute_operation("double_plus", &raw(&["4", "99"]))
            .unwrap(),
        Value::Int(8)
    );
    // And the bindings are gone afterwards
    assert!(!engine.vars().has("x"));
    assert!(!engine.vars().has("y"));
}

#[test]
fn function_parameters_shadow_globals() {
    let mut engine = make_engine();
    engine.vars_mut().set("x", Value::Int(100)).unwrap();
    engine
        .define_function("double", vec!["x".into()], "multiply $x 2")
        .unwrap();
    assert_eq!(
        engine.execute_operation("double", &raw(&["5"])).unwrap(),
        Value::Int(10)
    );
    // The global survives untouched
    assert_eq!(engine.vars().get("x").unwrap(), Value::Int(100));
}

#[test]
fn undef_removes_function() {
    let mut engine = make_engine();
    engine
        .define_function("double", vec!["x".into()], "multiply $x 2")
        .unwrap();
    engine.execute_operation("undef", &raw(&["double"])).unwrap();
    assert!(matches!(
        engine.execute_operation("double", &raw(&["5"])),
        Err(Error::UnknownOperation(_))
    ));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn arity_errors_name_the_operation() {
    let mut engine = make_engine();
    let err = engine.execute_operation("add", &raw(&["1"])).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("add"), "{msg}");
    assert!(msg.contains("2"), "{msg}");
    assert!(msg.contains("1"), "{msg}");
}

#[test]
fn recursion_limit_reports_and_recovers() {
    let mut engine = Engine::new(EngineConfig::default().with_max_depth(16));
    engine
        .define_function("spin", vec!["n".into()], "spin $n")
        .unwrap();
    assert!(matches!(
        engine.execute_operation("spin", &raw(&["0"])),
        Err(Error::RecursionLimitExceeded { limit: 16 })
    ));
    // The engine is still usable afterwards
    assert_eq!(engine.vars().scope_depth(), 0);
    assert_eq!(
        engine.execute_operation("add", &raw(&["1", "1"])).unwrap(),
        Value::Int(2)
    );
}

#[test]
fn domain_errors_propagate_from_function_bodies() {
    let mut engine = make_engine();
    engine
        .define_function("bad", vec!["x".into()], "divide $x 0")
        .unwrap();
    assert!(matches!(
        engine.execute_operation("bad", &raw(&["1"])),
        Err(Error::Domain(_))
    ));
    assert_eq!(engine.vars().scope_depth(), 0);
}

// ============================================================================
// Introspection
// ============================================================================

#[test]
fn schema_snapshot_is_stable_and_sorted() {
    let engine = make_engine();
    let names: Vec<_> = engine.schemas().iter().map(|s| s.name.clone()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(names.iter().any(|n| n == "add"));
    assert!(names.iter().any(|n| n == "def"));
}

#[test]
fn ops_listing_mentions_every_builtin_category() {
    let mut engine = make_engine();
    let listing = engine
        .execute_operation("ops", &raw(&[]))
        .unwrap()
        .to_string();
    assert!(listing.contains("arithmetic:"), "{listing}");
    assert!(listing.contains("scripting:"), "{listing}");
    assert!(listing.contains("factorial"), "{listing}");
}
