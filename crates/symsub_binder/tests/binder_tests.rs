//! Binder integration tests.
//!
//! Drives the binder by hand over parsed trees and checks resolution and
//! parameter-set bookkeeping.

use bumpalo::Bump;
use symsub_ast::node::*;
use symsub_binder::Binder;
use symsub_core::intern::StringInterner;
use symsub_parser::Parser;
use symsub_printer::expression_to_string;

/// Helper: parse `source`, which must parse cleanly, and run `f` on it.
fn with_tree<R>(source: &str, f: impl for<'a> FnOnce(&'a Bump, &SourceFile<'a>, &StringInterner) -> R) -> R {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let mut parser = Parser::new(&arena, &interner, "test.js", source);
    let file = parser.parse_source_file();
    assert!(!parser.take_diagnostics().has_errors());
    f(&arena, &file, &interner)
}

fn function<'t, 'a>(stmt: &'t Statement<'a>) -> &'t FunctionDeclaration<'a> {
    match stmt {
        Statement::FunctionDeclaration(func) => func,
        _ => panic!("expected function declaration"),
    }
}

fn assignment<'t, 'a>(stmt: &'t Statement<'a>) -> &'t AssignmentExpression<'a> {
    match stmt {
        Statement::ExpressionStatement(stmt) => stmt.as_assignment().expect("assignment"),
        _ => panic!("expected expression statement"),
    }
}

fn declaration<'t, 'a>(stmt: &'t Statement<'a>) -> &'t VariableDeclaration<'a> {
    match stmt {
        Statement::VariableStatement(stmt) => &stmt.declaration_list.declarations[0],
        _ => panic!("expected variable statement"),
    }
}

// ============================================================================
// Parameters
// ============================================================================

#[test]
fn test_parameters_resolve_to_themselves() {
    with_tree("function f(a, b) {}", |arena, file, _| {
        let func = function(&file.statements[0]);
        let mut binder = Binder::new(arena);
        binder.enter_program();
        binder.enter_function(func.parameters);

        let a = &func.parameters[0].name;
        let resolved = binder.resolve(a).expect("parameter bound");
        assert_eq!(expression_to_string(resolved), "a");
        assert!(binder.is_observable(a.text));

        binder.exit_function();
        binder.exit_program();
        assert_eq!(binder.depth(), 0);
    });
}

#[test]
fn test_parameter_set_includes_program_level_names() {
    with_tree("let g = 1; let h; function f(a) {}", |arena, file, interner| {
        let mut binder = Binder::new(arena);
        binder.enter_program();
        for stmt in &file.statements[..2] {
            let decl = declaration(stmt);
            binder.record_declaration(&decl.name, decl.initializer);
        }
        assert!(!binder.has_parameter_set());

        let func = function(&file.statements[2]);
        binder.enter_function(func.parameters);
        assert!(binder.has_parameter_set());
        assert!(binder.is_observable(interner.intern("a")));
        assert!(binder.is_observable(interner.intern("g")));
        assert!(binder.is_observable(interner.intern("h")));
        assert!(!binder.is_observable(interner.intern("local")));

        binder.exit_function();
        assert!(!binder.has_parameter_set());
        binder.exit_program();
    });
}

#[test]
fn test_nested_function_restores_enclosing_parameter_set() {
    with_tree("function outer(a) {}\nfunction inner(b) {}", |arena, file, interner| {
        let outer = function(&file.statements[0]);
        let inner = function(&file.statements[1]);
        let mut binder = Binder::new(arena);
        binder.enter_program();
        binder.enter_function(outer.parameters);
        binder.enter_function(inner.parameters);
        assert!(binder.is_observable(interner.intern("b")));
        assert!(!binder.is_observable(interner.intern("a")));
        binder.exit_function();
        assert!(binder.is_observable(interner.intern("a")));
        assert!(!binder.is_observable(interner.intern("b")));
        binder.exit_function();
        binder.exit_program();
    });
}

// ============================================================================
// Declarations and assignments
// ============================================================================

#[test]
fn test_declaration_without_initializer_does_not_resolve() {
    with_tree("let x;", |arena, file, _| {
        let decl = declaration(&file.statements[0]);
        let mut binder = Binder::new(arena);
        binder.enter_program();
        binder.record_declaration(&decl.name, decl.initializer);
        assert!(binder.resolve(&decl.name).is_none());
        binder.exit_program();
    });
}

#[test]
fn test_block_bindings_are_discarded_on_exit() {
    with_tree("x = 1;", |arena, file, _| {
        let assign = assignment(&file.statements[0]);
        let mut binder = Binder::new(arena);
        binder.enter_program();
        binder.enter_block();
        binder.record_assignment(&assign.target, assign.operator_token.kind(), assign.value);
        assert!(binder.resolve(&assign.target).is_some());
        binder.exit_block();
        assert!(binder.resolve(&assign.target).is_none());
        binder.exit_program();
    });
}

#[test]
fn test_compound_assignment_combines_with_current_value() {
    with_tree("function f(a) {}\na = a + 1;\na *= b + c;", |arena, file, _| {
        let func = function(&file.statements[0]);
        let first = assignment(&file.statements[1]);
        let second = assignment(&file.statements[2]);
        let mut binder = Binder::new(arena);
        binder.enter_program();
        binder.enter_function(func.parameters);
        binder.record_assignment(&first.target, first.operator_token.kind(), first.value);
        binder.record_assignment(&second.target, second.operator_token.kind(), second.value);

        let resolved = binder.resolve(&second.target).expect("bound");
        assert_eq!(expression_to_string(resolved), "(a + 1) * (b + c)");
        binder.exit_function();
        binder.exit_program();
    });
}

#[test]
fn test_compound_assignment_to_free_name() {
    with_tree("total += 2;", |arena, file, _| {
        let assign = assignment(&file.statements[0]);
        let mut binder = Binder::new(arena);
        binder.enter_program();
        binder.record_assignment(&assign.target, assign.operator_token.kind(), assign.value);
        let resolved = binder.resolve(&assign.target).expect("bound");
        assert_eq!(expression_to_string(resolved), "total + 2");
        binder.exit_program();
    });
}

#[test]
#[should_panic(expected = "empty scope stack")]
fn test_unbalanced_exit_panics() {
    let arena = Bump::new();
    let mut binder = Binder::new(&arena);
    binder.exit_block();
}
