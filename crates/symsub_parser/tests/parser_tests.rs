//! Parser integration tests.
//!
//! Verifies the tree shapes, node ranges and diagnostics the parser produces.

use bumpalo::Bump;
use symsub_ast::node::*;
use symsub_ast::syntax_kind::SyntaxKind;
use symsub_ast::types::VariableKind;
use symsub_core::intern::StringInterner;
use symsub_core::text::TextRange;
use symsub_diagnostics::{messages, DiagnosticCollection};
use symsub_parser::Parser;

/// Helper: parse source text and hand the tree and diagnostics to `f`.
fn parse_with<R>(source: &str, f: impl FnOnce(&SourceFile<'_>, &DiagnosticCollection) -> R) -> R {
    let arena = Bump::new();
    let interner = StringInterner::new();
    let mut parser = Parser::new(&arena, &interner, "test.js", source);
    let file = parser.parse_source_file();
    let diagnostics = parser.take_diagnostics();
    f(&file, &diagnostics)
}

/// Helper: assert a clean parse with the expected number of top-level statements.
fn assert_statement_count(source: &str, expected: usize) {
    parse_with(source, |file, diagnostics| {
        assert!(diagnostics.is_empty(), "source: {}\n{}", source, diagnostics);
        assert_eq!(file.statements.len(), expected, "source: {}", source);
    });
}

fn error_codes(source: &str) -> Vec<u32> {
    parse_with(source, |_, diagnostics| {
        diagnostics.diagnostics().iter().map(|d| d.code).collect()
    })
}

/// Helper: the expression of a single expression statement.
fn with_expression<R>(source: &str, f: impl FnOnce(&Expression<'_>) -> R) -> R {
    parse_with(source, |file, diagnostics| {
        assert!(diagnostics.is_empty(), "{}", diagnostics);
        match &file.statements[0] {
            Statement::ExpressionStatement(stmt) => f(stmt.expression),
            other => panic!("expected expression statement, got {:?}", other.kind()),
        }
    })
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_parse_empty_source() {
    assert_statement_count("", 0);
    assert_statement_count("  // nothing here\n", 0);
}

#[test]
fn test_parse_variable_declarations() {
    assert_statement_count("let x = 0;", 1);
    assert_statement_count("const a = 1; let b = 2; var c = 3;", 3);
    assert_statement_count("let a, b = 1, c;", 1);
}

#[test]
fn test_parse_function_declaration() {
    parse_with("function foo(x, y, z){\n}", |file, diagnostics| {
        assert!(diagnostics.is_empty());
        let Statement::FunctionDeclaration(func) = &file.statements[0] else {
            panic!("expected function declaration");
        };
        assert_eq!(func.name.text_name, "foo");
        let names: Vec<&str> = func.parameters.iter().map(|p| p.name.text_name).collect();
        assert_eq!(names, vec!["x", "y", "z"]);
        assert!(func.body.statements.is_empty());
        assert_eq!(func.data.range, TextRange::new(0, 24));
    });
}

#[test]
fn test_parse_control_flow() {
    assert_statement_count("if (a) { b = 1; } else if (c) { b = 2; } else { b = 3; }", 1);
    assert_statement_count("while (i < 3) { i = i + 1; }", 1);
    assert_statement_count("do { i = i + 1; } while (i < 3)", 1);
    assert_statement_count("for (let i = 0; i < 3; i = i + 1) { x = i; }", 1);
    assert_statement_count("for (;;) { break; }", 1);
    assert_statement_count("while (true) { continue; }", 1);
    assert_statement_count(";;", 2);
    assert_statement_count("{ let a = 1; }", 1);
}

#[test]
fn test_else_if_chain_shape() {
    parse_with("if (a) {} else if (b) {} else {}", |file, _| {
        let Statement::IfStatement(outer) = &file.statements[0] else {
            panic!("expected if statement");
        };
        let Some(Statement::IfStatement(inner)) = outer.else_statement else {
            panic!("expected else-if");
        };
        assert!(matches!(inner.else_statement, Some(Statement::Block(_))));
    });
}

#[test]
fn test_do_while_semicolon_is_optional() {
    assert_statement_count("do { x = 1; } while (x < 3) y = 2;", 2);
}

#[test]
fn test_return_without_expression_before_line_break() {
    parse_with("function f() {\n    return\n    x\n}", |file, _| {
        let Statement::FunctionDeclaration(func) = &file.statements[0] else {
            panic!("expected function declaration");
        };
        assert_eq!(func.body.statements.len(), 2);
        let Statement::ReturnStatement(ret) = &func.body.statements[0] else {
            panic!("expected return");
        };
        assert!(ret.expression.is_none());
    });
}

#[test]
fn test_variable_kind_recorded() {
    parse_with("const a = 1; let b; var c;", |file, _| {
        let kinds: Vec<VariableKind> = file
            .statements
            .iter()
            .map(|stmt| match stmt {
                Statement::VariableStatement(v) => v.declaration_list.variable_kind(),
                _ => panic!("expected variable statement"),
            })
            .collect();
        assert_eq!(kinds, vec![VariableKind::Const, VariableKind::Let, VariableKind::Var]);
    });
}

// ============================================================================
// Ranges
// ============================================================================

#[test]
fn test_if_condition_range_excludes_parentheses() {
    parse_with("function fun(a, b, c) {\n    if (a + 1 + b < c) {\n    }\n}", |file, _| {
        let Statement::FunctionDeclaration(func) = &file.statements[0] else {
            panic!("expected function declaration");
        };
        let Statement::IfStatement(if_stmt) = &func.body.statements[0] else {
            panic!("expected if statement");
        };
        assert_eq!(if_stmt.expression.range(), TextRange::new(32, 45));
        assert_eq!(file.text_of(if_stmt.expression.range()), "a + 1 + b < c");
    });
}

#[test]
fn test_node_ranges_end_at_last_token() {
    parse_with("let x = 0;   \n", |file, _| {
        let Statement::VariableStatement(stmt) = &file.statements[0] else {
            panic!("expected variable statement");
        };
        assert_eq!(stmt.data.range, TextRange::new(0, 10));
        let decl = &stmt.declaration_list.declarations[0];
        assert_eq!(decl.data.range, TextRange::new(4, 9));
        assert_eq!(decl.name.data.range, TextRange::new(4, 5));
        assert_eq!(file.data.range, TextRange::new(0, 14));
    });
}

#[test]
fn test_ranges_are_byte_offsets() {
    parse_with("let ä = 1;", |file, _| {
        let Statement::VariableStatement(stmt) = &file.statements[0] else {
            panic!("expected variable statement");
        };
        let name = &stmt.declaration_list.declarations[0].name;
        assert_eq!(name.text_name, "ä");
        assert_eq!(name.data.range, TextRange::new(4, 6));
    });
}

#[test]
fn test_parenthesized_range_includes_parentheses() {
    with_expression("x = (a + b) * c;", |expr| {
        let Expression::Assignment(assignment) = expr else {
            panic!("expected assignment");
        };
        let Expression::Binary(product) = assignment.value else {
            panic!("expected binary");
        };
        assert_eq!(product.left.range(), TextRange::new(4, 11));
        assert_eq!(product.data.range, TextRange::new(4, 15));
    });
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_multiplication_binds_tighter() {
    with_expression("a + b * c;", |expr| {
        let Expression::Binary(sum) = expr else { panic!("expected binary") };
        assert_eq!(sum.operator_token.kind(), SyntaxKind::PlusToken);
        let Expression::Binary(product) = sum.right else { panic!("expected binary") };
        assert_eq!(product.operator_token.kind(), SyntaxKind::AsteriskToken);
    });
}

#[test]
fn test_subtraction_is_left_associative() {
    with_expression("a - b - c;", |expr| {
        let Expression::Binary(outer) = expr else { panic!("expected binary") };
        assert!(matches!(outer.left, Expression::Binary(_)));
        assert!(matches!(outer.right, Expression::Identifier(_)));
    });
}

#[test]
fn test_exponent_is_right_associative() {
    with_expression("a ** b ** c;", |expr| {
        let Expression::Binary(outer) = expr else { panic!("expected binary") };
        assert!(matches!(outer.left, Expression::Identifier(_)));
        assert!(matches!(outer.right, Expression::Binary(_)));
    });
}

#[test]
fn test_assignment_is_right_associative() {
    with_expression("a = b = 1;", |expr| {
        let Expression::Assignment(outer) = expr else { panic!("expected assignment") };
        assert_eq!(outer.target.text_name, "a");
        let Expression::Assignment(inner) = outer.value else { panic!("expected assignment") };
        assert_eq!(inner.target.text_name, "b");
    });
}

#[test]
fn test_compound_assignment_operator() {
    with_expression("total += step;", |expr| {
        let Expression::Assignment(assignment) = expr else { panic!("expected assignment") };
        assert_eq!(assignment.operator_token.kind(), SyntaxKind::PlusEqualsToken);
    });
}

#[test]
fn test_parenthesized_assignment_target() {
    with_expression("(a) = 1;", |expr| {
        let Expression::Assignment(assignment) = expr else { panic!("expected assignment") };
        assert_eq!(assignment.target.text_name, "a");
    });
}

#[test]
fn test_call_arguments() {
    with_expression("report(a, b + 1, 'c');", |expr| {
        let Expression::Call(call) = expr else { panic!("expected call") };
        assert_eq!(call.arguments.len(), 3);
        assert!(matches!(call.expression, Expression::Identifier(id) if id.text_name == "report"));
    });
}

#[test]
fn test_literals() {
    with_expression("x = 0x1F;", |expr| {
        let Expression::Assignment(assignment) = expr else { panic!("expected assignment") };
        let Expression::NumericLiteral(lit) = assignment.value else { panic!("expected number") };
        assert_eq!(lit.text, "0x1F");
        assert_eq!(lit.value, 31.0);
    });
    with_expression("x = 'a\\nb';", |expr| {
        let Expression::Assignment(assignment) = expr else { panic!("expected assignment") };
        let Expression::StringLiteral(lit) = assignment.value else { panic!("expected string") };
        assert_eq!(lit.text, "a\nb");
        assert!(lit.is_single_quote);
    });
    with_expression("x = !true && null;", |expr| {
        let Expression::Assignment(assignment) = expr else { panic!("expected assignment") };
        let Expression::Binary(and) = assignment.value else { panic!("expected binary") };
        assert!(matches!(and.left, Expression::PrefixUnary(u) if u.operator == SyntaxKind::ExclamationToken));
        assert!(matches!(and.right, Expression::NullKeyword(_)));
    });
}

// ============================================================================
// Automatic semicolon insertion
// ============================================================================

#[test]
fn test_semicolon_inserted_at_line_break() {
    assert_statement_count("let a = 1\nlet b = 2", 2);
    assert_statement_count("function f() { return 1 }", 1);
}

#[test]
fn test_missing_semicolon_on_same_line() {
    parse_with("let a = 1 let b = 2", |file, diagnostics| {
        assert_eq!(file.statements.len(), 2);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.diagnostics()[0].to_string(),
            "test.js(10): error SYM1105: ';' expected."
        );
    });
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_unsupported_syntax() {
    let unsupported = messages::UNSUPPORTED_SYNTAX_0.code;
    for source in [
        "x++;",
        "--x;",
        "a.b;",
        "a[0];",
        "a ? b : c;",
        "class A {}",
        "x = typeof y;",
        "x = [1];",
        "x = function () {};",
        "for (k in o) {}",
        "outer: while (a) { break outer; }",
        "function f(a = 1) {}",
    ] {
        let codes = error_codes(source);
        assert!(codes.contains(&unsupported), "source: {} codes: {:?}", source, codes);
    }
}

#[test]
fn test_invalid_assignment_target() {
    assert_eq!(
        error_codes("1 = x;"),
        vec![messages::THE_LEFT_HAND_SIDE_OF_AN_ASSIGNMENT_MUST_BE_A_VARIABLE.code]
    );
    assert_eq!(
        error_codes("a + b = c;"),
        vec![messages::THE_LEFT_HAND_SIDE_OF_AN_ASSIGNMENT_MUST_BE_A_VARIABLE.code]
    );
}

#[test]
fn test_const_requires_initializer() {
    assert_eq!(error_codes("const a;"), vec![messages::CONST_DECLARATIONS_MUST_BE_INITIALIZED.code]);
    assert!(error_codes("let a;").is_empty());
}

#[test]
fn test_expression_expected() {
    let codes = error_codes("x = ;");
    assert_eq!(codes, vec![messages::EXPRESSION_EXPECTED.code]);
}

#[test]
fn test_stray_close_brace() {
    assert_eq!(error_codes("}"), vec![messages::DECLARATION_OR_STATEMENT_EXPECTED.code]);
}

#[test]
fn test_missing_close_paren() {
    let codes = error_codes("if (a { b = 1; }");
    assert!(codes.contains(&messages::_0_EXPECTED.code));
}

#[test]
fn test_recovery_continues_after_error() {
    parse_with("let = ;\nlet y = 1;", |file, diagnostics| {
        assert!(diagnostics.has_errors());
        let Some(Statement::VariableStatement(last)) = file.statements.last() else {
            panic!("expected trailing variable statement");
        };
        assert_eq!(last.declaration_list.declarations[0].name.text_name, "y");
    });
}

#[test]
fn test_unreachable_code_is_a_warning() {
    parse_with("function f() {\n    return 1;\n    x = 2;\n    y = 3;\n}", |_, diagnostics| {
        assert!(!diagnostics.has_errors());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.diagnostics()[0].code, messages::UNREACHABLE_CODE_DETECTED.code);
    });
}

#[test]
fn test_scanner_errors_are_reported() {
    let codes = error_codes("let s = \"open");
    assert!(codes.contains(&messages::UNTERMINATED_STRING_LITERAL.code));
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let source = format!("x = {}1{};", "(".repeat(5000), ")".repeat(5000));
    let codes = error_codes(&source);
    assert_eq!(codes, vec![messages::CODE_NESTED_TOO_DEEPLY.code]);
}

#[test]
fn test_long_operator_chain_is_bounded() {
    let source = format!("x = 1{};", " + 1".repeat(1000));
    assert_eq!(error_codes(&source), vec![messages::CODE_NESTED_TOO_DEEPLY.code]);
}

#[test]
fn test_moderate_operator_chain_is_fine() {
    let source = format!("x = 1{};", " + 1".repeat(100));
    assert_statement_count(&source, 1);
}

#[test]
fn test_deeply_nested_blocks_are_bounded() {
    let source = format!("{}{}", "{".repeat(1000), "}".repeat(1000));
    assert_eq!(error_codes(&source), vec![messages::CODE_NESTED_TOO_DEEPLY.code]);

    let unclosed = "{".repeat(5000);
    assert_eq!(error_codes(&unclosed), vec![messages::CODE_NESTED_TOO_DEEPLY.code]);
}

#[test]
fn test_deeply_nested_ifs_are_bounded() {
    let source = format!("{}x = 1;", "if (a) ".repeat(1000));
    assert_eq!(error_codes(&source), vec![messages::CODE_NESTED_TOO_DEEPLY.code]);
}

#[test]
fn test_moderately_nested_blocks_are_fine() {
    let source = format!("function f(a) {{ {}a = 1;{} }}", "{ if (a) { ".repeat(20), "} } ".repeat(20));
    assert_statement_count(&source, 1);
}

#[test]
fn test_nullish_mixed_with_logical_is_unsupported() {
    assert_eq!(error_codes("x = a || b ?? c;"), vec![messages::UNSUPPORTED_SYNTAX_0.code]);
    assert_eq!(error_codes("x = a ?? b && c;"), vec![messages::UNSUPPORTED_SYNTAX_0.code]);
    assert!(error_codes("x = (a || b) ?? c;").is_empty());
    assert!(error_codes("x = a ?? (b && c) ?? d;").is_empty());
}
