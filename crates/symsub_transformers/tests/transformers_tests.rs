//! Substitution and branch folding over parsed programs.

use bumpalo::Bump;
use symsub_ast::node::SourceFile;
use symsub_core::StringInterner;
use symsub_evaluator::{bindings_from_json, Bindings, EvaluationError};
use symsub_parser::Parser;
use symsub_printer::print_source_file;
use symsub_transformers::{BranchFolder, BranchRecord, SymbolicSubstitution, Transformer};

/// Helper: parse `source`, which must parse cleanly, and run `f` on it.
fn with_file<R>(source: &str, f: impl for<'a> FnOnce(&'a Bump, &SourceFile<'a>) -> R) -> R {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let mut parser = Parser::new(&arena, &interner, "test.js", source);
    let file = parser.parse_source_file();
    let diagnostics = parser.take_diagnostics();
    assert!(!diagnostics.has_errors(), "{:?}", diagnostics.diagnostics());
    f(&arena, &file)
}

fn substitute(source: &str) -> String {
    with_file(source, |arena, file| {
        let output = SymbolicSubstitution::new(arena).transform(file);
        print_source_file(&output)
    })
}

fn branches(source: &str, input: serde_json::Value) -> Result<Vec<BranchRecord>, EvaluationError> {
    let bindings = bindings_from_json(&input).expect("valid input");
    with_file(source, |_, file| BranchFolder::new(&bindings).fold(file))
}

fn record(start: u32, end: u32, taken: bool) -> BranchRecord {
    BranchRecord { start, end, taken }
}

const CHAINED: &str = "function fun(a, b, c) {
    if (a + 1 + b < c) {
        return 1;
    } else if (a + 1 + b < c * 2) {
        return 2;
    } else {
        return 3;
    }
}";

// ============================================================================
// Substitution
// ============================================================================

#[test]
fn test_substitute_empty_program() {
    assert_eq!(substitute(""), "");
}

#[test]
fn test_root_statements_are_kept() {
    assert_eq!(substitute("let x = 0;"), "let x = 0;");
    assert_eq!(substitute("let x = 1;\nx = x + 1;"), "let x = 1;\nx = 1 + 1;");
}

#[test]
fn test_parameter_assignments_are_kept() {
    assert_eq!(
        substitute("function f(a, b, c){\n   a=0;\n   b=1;\n   c=2;\n}"),
        "function f(a, b, c) {\n    a = 0;\n    b = 1;\n    c = 2;\n}"
    );
}

#[test]
fn test_locals_inlined_into_branches() {
    let source = "function foo(x, y, z){
    let a = x + 1;
    let b = a + y;
    let c = 0;

    if (b < z) {
        c = c + 5;
        return x + y + z + c;
    } else if (b < z * 2) {
        c = c + x + 5;
        return x + y + z + c;
    } else {
        c = c + z + 5;
        return x + y + z + c;
    }
}";
    assert_eq!(
        substitute(source),
        "function foo(x, y, z) {\n    if (x + 1 + y < z) {\n        return x + y + z + (0 + 5);\n    } else if (x + 1 + y < z * 2) {\n        return x + y + z + (0 + x + 5);\n    } else {\n        return x + y + z + (0 + z + 5);\n    }\n}"
    );
}

#[test]
fn test_loop_keeps_parameter_accumulation() {
    let source = "function foo(x, y, z){
    let a = x + 1;
    let b = a + y;
    let c = 0;

    while (a < z) {
        c = a + b;
        z = c * 2;
    }

    return z;
}";
    assert_eq!(
        substitute(source),
        "function foo(x, y, z) {\n    while (x + 1 < z) {\n        z = (x + 1 + (x + 1 + y)) * 2;\n    }\n    return z;\n}"
    );
}

#[test]
fn test_root_names_are_observable_in_functions() {
    let source = "let total = 0;\nfunction add(n) { let doubled = n * 2; total = total + doubled; }";
    assert_eq!(
        substitute(source),
        "let total = 0;\nfunction add(n) {\n    total = 0 + n * 2;\n}"
    );
}

#[test]
fn test_free_identifiers_pass_through() {
    assert_eq!(
        substitute("function f(a) { let t = g(a, h); return t + k; }"),
        "function f(a) {\n    return g(a, h) + k;\n}"
    );
}

#[test]
fn test_shadowing_does_not_leak_across_blocks() {
    let source = "function f(a) {
    let t = a;
    if (a) { let t = 1; a = t; } else { a = t; }
    return t;
}";
    assert_eq!(
        substitute(source),
        "function f(a) {\n    if (a) {\n        a = 1;\n    } else {\n        a = a;\n    }\n    return a;\n}"
    );
}

#[test]
fn test_compound_assignment_expands() {
    assert_eq!(
        substitute("function f(a) { let s = a; s *= 3; return s; }"),
        "function f(a) {\n    return a * 3;\n}"
    );
}

#[test]
fn test_substitution_is_idempotent() {
    let once = substitute("function f(a, b) { let s = a + b; let t = s * s; return t - 1; }");
    assert_eq!(once, "function f(a, b) {\n    return (a + b) * (a + b) - 1;\n}");
    assert_eq!(substitute(&once), once);
}

#[test]
fn test_nested_function_restores_outer_parameters() {
    let source = "function outer(a) {
    function inner(b) { a = b; }
    a = 2;
}";
    assert_eq!(
        substitute(source),
        "function outer(a) {\n    function inner(b) {\n    }\n    a = 2;\n}"
    );
}

// ============================================================================
// Branch folding
// ============================================================================

#[test]
fn test_no_conditionals_gives_no_records() {
    assert_eq!(branches("let x = 0;", serde_json::json!({})), Ok(vec![]));
    assert_eq!(branches("", serde_json::json!({})), Ok(vec![]));
}

#[test]
fn test_false_then_true_in_chain() {
    let records = branches(CHAINED, serde_json::json!({"a": 6, "b": 6, "c": 10})).unwrap();
    assert_eq!(records, vec![record(32, 45, false), record(82, 99, true)]);
}

#[test]
fn test_first_taken_ends_chain() {
    let records = branches(CHAINED, serde_json::json!({"a": 6, "b": 6, "c": 20})).unwrap();
    assert_eq!(records, vec![record(32, 45, true)]);
}

#[test]
fn test_all_false_visits_trailing_else() {
    let source = "if (x > 1) { y = 1; } else if (x > 0) { y = 2; } else { if (x == 0) { y = 3; } }";
    let records = branches(source, serde_json::json!({"x": 0})).unwrap();
    let taken: Vec<bool> = records.iter().map(|r| r.taken).collect();
    assert_eq!(taken, vec![false, false, true]);
}

#[test]
fn test_ranges_match_test_text() {
    with_file(CHAINED, |_, file| {
        let bindings: Bindings = bindings_from_json(&serde_json::json!({"a": 6, "b": 6, "c": 10})).unwrap();
        let records = BranchFolder::new(&bindings).fold(file).unwrap();
        let texts: Vec<&str> = records.iter().map(|r| file.text_of(r.range())).collect();
        assert_eq!(texts, vec!["a + 1 + b < c", "a + 1 + b < c * 2"]);
    });
}

#[test]
fn test_untaken_consequent_is_not_visited() {
    let source = "if (flag) { if (missing) { } }";
    assert_eq!(
        branches(source, serde_json::json!({"flag": false})),
        Ok(vec![record(4, 8, false)])
    );
}

#[test]
fn test_taken_consequent_is_visited() {
    let source = "if (flag) { if (n > 2) { } }";
    assert_eq!(
        branches(source, serde_json::json!({"flag": true, "n": 3})),
        Ok(vec![record(4, 8, true), record(16, 21, true)])
    );
}

#[test]
fn test_unbound_identifier_aborts() {
    let source = "if (a) { } if (b) { }";
    assert_eq!(
        branches(source, serde_json::json!({"b": 1})),
        Err(EvaluationError::UnboundIdentifier("a".to_string()))
    );
}

#[test]
fn test_records_serialize_as_objects() {
    let json = serde_json::to_value(record(1, 4, true)).unwrap();
    assert_eq!(json, serde_json::json!({"start": 1, "end": 4, "taken": true}));
}
