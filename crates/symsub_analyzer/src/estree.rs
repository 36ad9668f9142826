//! ESTree JSON for parsed programs.
//!
//! Parentheses have no node of their own in ESTree; a parenthesized
//! expression serializes as its contents.

use serde_json::{json, Value};
use symsub_ast::node::*;
use symsub_ast::syntax_kind::SyntaxKind;
use symsub_core::TextRange;

pub(crate) fn program(file: &SourceFile<'_>) -> Value {
    json!({
        "type": "Program",
        "body": statements(file, file.statements),
        "range": range(file.data.range),
    })
}

fn range(range: TextRange) -> Value {
    json!([range.pos, range.end])
}

fn statements(file: &SourceFile<'_>, list: &[Statement<'_>]) -> Value {
    Value::Array(list.iter().map(|stmt| statement(file, stmt)).collect())
}

fn statement(file: &SourceFile<'_>, stmt: &Statement<'_>) -> Value {
    match stmt {
        Statement::VariableStatement(n) => declaration_list(file, &n.declaration_list, n.data.range),
        Statement::FunctionDeclaration(n) => json!({
            "type": "FunctionDeclaration",
            "id": identifier(&n.name),
            "params": n.parameters.iter().map(|p| identifier(&p.name)).collect::<Vec<_>>(),
            "body": block(file, &n.body),
            "generator": false,
            "expression": false,
            "async": false,
            "range": range(n.data.range),
        }),
        Statement::Block(n) => block(file, n),
        Statement::EmptyStatement(data) => json!({"type": "EmptyStatement", "range": range(data.range)}),
        Statement::ExpressionStatement(n) => json!({
            "type": "ExpressionStatement",
            "expression": expression(file, n.expression),
            "range": range(n.data.range),
        }),
        Statement::IfStatement(n) => json!({
            "type": "IfStatement",
            "test": expression(file, n.expression),
            "consequent": statement(file, n.then_statement),
            "alternate": n.else_statement.map(|alt| statement(file, alt)),
            "range": range(n.data.range),
        }),
        Statement::DoStatement(n) => json!({
            "type": "DoWhileStatement",
            "body": statement(file, n.statement),
            "test": expression(file, n.expression),
            "range": range(n.data.range),
        }),
        Statement::WhileStatement(n) => json!({
            "type": "WhileStatement",
            "test": expression(file, n.expression),
            "body": statement(file, n.statement),
            "range": range(n.data.range),
        }),
        Statement::ForStatement(n) => {
            let init = match &n.initializer {
                Some(ForInitializer::VariableDeclarationList(list)) => {
                    declaration_list(file, list, list.data.range)
                }
                Some(ForInitializer::Expression(expr)) => expression(file, expr),
                None => Value::Null,
            };
            json!({
                "type": "ForStatement",
                "init": init,
                "test": n.condition.map(|expr| expression(file, expr)),
                "update": n.incrementor.map(|expr| expression(file, expr)),
                "body": statement(file, n.statement),
                "range": range(n.data.range),
            })
        }
        Statement::ContinueStatement(data) => {
            json!({"type": "ContinueStatement", "label": null, "range": range(data.range)})
        }
        Statement::BreakStatement(data) => {
            json!({"type": "BreakStatement", "label": null, "range": range(data.range)})
        }
        Statement::ReturnStatement(n) => json!({
            "type": "ReturnStatement",
            "argument": n.expression.map(|expr| expression(file, expr)),
            "range": range(n.data.range),
        }),
    }
}

fn block(file: &SourceFile<'_>, block: &Block<'_>) -> Value {
    json!({
        "type": "BlockStatement",
        "body": statements(file, block.statements),
        "range": range(block.data.range),
    })
}

fn declaration_list(file: &SourceFile<'_>, list: &VariableDeclarationList<'_>, span: TextRange) -> Value {
    let declarations: Vec<Value> = list
        .declarations
        .iter()
        .map(|decl| {
            json!({
                "type": "VariableDeclarator",
                "id": identifier(&decl.name),
                "init": decl.initializer.map(|init| expression(file, init)),
                "range": range(decl.data.range),
            })
        })
        .collect();
    json!({
        "type": "VariableDeclaration",
        "declarations": declarations,
        "kind": list.variable_kind().as_str(),
        "range": range(span),
    })
}

fn identifier(id: &Identifier<'_>) -> Value {
    json!({"type": "Identifier", "name": id.text_name, "range": range(id.data.range)})
}

fn expression(file: &SourceFile<'_>, expr: &Expression<'_>) -> Value {
    match expr {
        Expression::Identifier(id) => identifier(id),
        Expression::NumericLiteral(n) => literal(number(n.value), n.text, n.data.range),
        Expression::StringLiteral(n) => literal(json!(n.text), file.text_of(n.data.range), n.data.range),
        Expression::NullKeyword(data) => literal(Value::Null, "null", data.range),
        Expression::TrueKeyword(data) => literal(json!(true), "true", data.range),
        Expression::FalseKeyword(data) => literal(json!(false), "false", data.range),
        Expression::Parenthesized(n) => expression(file, n.expression),
        Expression::Call(n) => json!({
            "type": "CallExpression",
            "callee": expression(file, n.expression),
            "arguments": n.arguments.iter().map(|arg| expression(file, arg)).collect::<Vec<_>>(),
            "range": range(n.data.range),
        }),
        Expression::PrefixUnary(n) => json!({
            "type": "UnaryExpression",
            "operator": operator(n.operator),
            "argument": expression(file, n.operand),
            "prefix": true,
            "range": range(n.data.range),
        }),
        Expression::Binary(n) => {
            let kind = n.operator_token.kind();
            let node_type = match kind {
                SyntaxKind::AmpersandAmpersandToken | SyntaxKind::BarBarToken | SyntaxKind::QuestionQuestionToken => {
                    "LogicalExpression"
                }
                _ => "BinaryExpression",
            };
            json!({
                "type": node_type,
                "operator": operator(kind),
                "left": expression(file, n.left),
                "right": expression(file, n.right),
                "range": range(n.data.range),
            })
        }
        Expression::Assignment(n) => json!({
            "type": "AssignmentExpression",
            "operator": operator(n.operator_token.kind()),
            "left": identifier(&n.target),
            "right": expression(file, n.value),
            "range": range(n.data.range),
        }),
    }
}

fn literal(value: Value, raw: &str, span: TextRange) -> Value {
    json!({"type": "Literal", "value": value, "raw": raw, "range": range(span)})
}

/// Integral values serialize without a fraction, as JavaScript prints them.
fn number(value: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        json!(value as i64)
    } else {
        serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

fn operator(kind: SyntaxKind) -> &'static str {
    kind.token_text().unwrap_or("?")
}
