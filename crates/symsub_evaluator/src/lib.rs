//! symsub_evaluator: Concrete expression evaluation.
//!
//! Computes the value of an expression subtree given values for its free
//! identifiers, following JavaScript semantics for numbers, strings,
//! booleans and `null`. Evaluation is pure; anything that would need a
//! runtime (calls, assignments) is reported as unsupported.

mod value;

use rustc_hash::FxHashMap;
use symsub_ast::node::*;
use symsub_ast::syntax_kind::SyntaxKind;
use thiserror::Error;

pub use value::{number_to_string, string_to_number, ConstantValue};

/// Values for the free identifiers of an expression, by name.
pub type Bindings = FxHashMap<String, ConstantValue>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("'{0}' is not defined in the input")]
    UnboundIdentifier(String),
    #[error("cannot evaluate {0}")]
    Unsupported(String),
    #[error("input values must be numbers, strings, booleans or null, found {0}")]
    InvalidInput(String),
}

/// Evaluate `expr` with `bindings` supplying identifier values.
pub fn evaluate(expr: &Expression<'_>, bindings: &Bindings) -> Result<ConstantValue, EvaluationError> {
    match expr {
        Expression::Identifier(id) => bindings
            .get(id.text_name)
            .cloned()
            .ok_or_else(|| EvaluationError::UnboundIdentifier(id.text_name.to_string())),
        Expression::NumericLiteral(n) => Ok(ConstantValue::Number(n.value)),
        Expression::StringLiteral(s) => Ok(ConstantValue::String(s.text.to_string())),
        Expression::TrueKeyword(_) => Ok(ConstantValue::Boolean(true)),
        Expression::FalseKeyword(_) => Ok(ConstantValue::Boolean(false)),
        Expression::NullKeyword(_) => Ok(ConstantValue::Null),
        Expression::Parenthesized(paren) => evaluate(paren.expression, bindings),
        Expression::PrefixUnary(unary) => {
            let operand = evaluate(unary.operand, bindings)?;
            evaluate_prefix_unary(unary.operator, &operand)
        }
        Expression::Binary(binary) => evaluate_binary(binary, bindings),
        Expression::Call(_) => Err(EvaluationError::Unsupported("a function call".to_string())),
        Expression::Assignment(_) => Err(EvaluationError::Unsupported("an assignment".to_string())),
    }
}

/// Build bindings from a JSON object such as `{"a": 6, "b": "x"}`.
pub fn bindings_from_json(value: &serde_json::Value) -> Result<Bindings, EvaluationError> {
    let serde_json::Value::Object(map) = value else {
        return Err(EvaluationError::InvalidInput(format!(
            "{} where an object of input values was expected",
            json_kind(value)
        )));
    };
    map.iter()
        .map(|(name, value)| ConstantValue::try_from(value).map(|value| (name.clone(), value)))
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn evaluate_prefix_unary(operator: SyntaxKind, operand: &ConstantValue) -> Result<ConstantValue, EvaluationError> {
    Ok(match operator {
        SyntaxKind::MinusToken => ConstantValue::Number(-operand.to_number()),
        SyntaxKind::PlusToken => ConstantValue::Number(operand.to_number()),
        SyntaxKind::ExclamationToken => ConstantValue::Boolean(!operand.is_truthy()),
        SyntaxKind::TildeToken => ConstantValue::Number(!operand.to_int32() as f64),
        other => return Err(unsupported_operator(other)),
    })
}

fn evaluate_binary(node: &BinaryExpression<'_>, bindings: &Bindings) -> Result<ConstantValue, EvaluationError> {
    let operator = node.operator_token.kind();

    // Short-circuit operators only evaluate the right side when needed.
    match operator {
        SyntaxKind::AmpersandAmpersandToken => {
            let left = evaluate(node.left, bindings)?;
            return if left.is_truthy() { evaluate(node.right, bindings) } else { Ok(left) };
        }
        SyntaxKind::BarBarToken => {
            let left = evaluate(node.left, bindings)?;
            return if left.is_truthy() { Ok(left) } else { evaluate(node.right, bindings) };
        }
        SyntaxKind::QuestionQuestionToken => {
            let left = evaluate(node.left, bindings)?;
            return if left == ConstantValue::Null { evaluate(node.right, bindings) } else { Ok(left) };
        }
        _ => {}
    }

    let left = evaluate(node.left, bindings)?;
    let right = evaluate(node.right, bindings)?;
    apply_binary_operator(operator, &left, &right)
}

/// Apply a non-short-circuit binary operator to two values.
pub fn apply_binary_operator(
    operator: SyntaxKind,
    left: &ConstantValue,
    right: &ConstantValue,
) -> Result<ConstantValue, EvaluationError> {
    use std::cmp::Ordering::*;
    use ConstantValue::{Boolean, Number};

    Ok(match operator {
        SyntaxKind::PlusToken => match (left, right) {
            (ConstantValue::String(_), _) | (_, ConstantValue::String(_)) => {
                ConstantValue::String(format!("{}{}", left, right))
            }
            _ => Number(left.to_number() + right.to_number()),
        },
        SyntaxKind::MinusToken => Number(left.to_number() - right.to_number()),
        SyntaxKind::AsteriskToken => Number(left.to_number() * right.to_number()),
        SyntaxKind::SlashToken => Number(left.to_number() / right.to_number()),
        SyntaxKind::PercentToken => Number(left.to_number() % right.to_number()),
        SyntaxKind::AsteriskAsteriskToken => Number(js_pow(left.to_number(), right.to_number())),

        SyntaxKind::LessThanToken => Boolean(left.compare(right) == Some(Less)),
        SyntaxKind::GreaterThanToken => Boolean(left.compare(right) == Some(Greater)),
        SyntaxKind::LessThanEqualsToken => Boolean(matches!(left.compare(right), Some(Less | Equal))),
        SyntaxKind::GreaterThanEqualsToken => Boolean(matches!(left.compare(right), Some(Greater | Equal))),

        SyntaxKind::EqualsEqualsToken => Boolean(left.loose_equals(right)),
        SyntaxKind::ExclamationEqualsToken => Boolean(!left.loose_equals(right)),
        SyntaxKind::EqualsEqualsEqualsToken => Boolean(left.strict_equals(right)),
        SyntaxKind::ExclamationEqualsEqualsToken => Boolean(!left.strict_equals(right)),

        SyntaxKind::AmpersandToken => Number((left.to_int32() & right.to_int32()) as f64),
        SyntaxKind::BarToken => Number((left.to_int32() | right.to_int32()) as f64),
        SyntaxKind::CaretToken => Number((left.to_int32() ^ right.to_int32()) as f64),
        SyntaxKind::LessThanLessThanToken => {
            Number(left.to_int32().wrapping_shl(right.to_uint32() & 31) as f64)
        }
        SyntaxKind::GreaterThanGreaterThanToken => {
            Number(left.to_int32().wrapping_shr(right.to_uint32() & 31) as f64)
        }
        SyntaxKind::GreaterThanGreaterThanGreaterThanToken => {
            Number(left.to_uint32().wrapping_shr(right.to_uint32() & 31) as f64)
        }
        other => return Err(unsupported_operator(other)),
    })
}

/// `**` differs from `powf` where the base is ±1 and the exponent is not finite.
fn js_pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

fn unsupported_operator(kind: SyntaxKind) -> EvaluationError {
    let text = kind.token_text().unwrap_or("unknown");
    EvaluationError::Unsupported(format!("operator '{}'", text))
}
