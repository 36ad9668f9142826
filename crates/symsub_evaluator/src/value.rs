//! Runtime values and their JavaScript conversions.

use std::cmp::Ordering;
use std::fmt;

use crate::EvaluationError;

/// The result of evaluating a constant expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
}

impl ConstantValue {
    /// JavaScript truthiness.
    pub fn is_truthy(&self) -> bool {
        match self {
            ConstantValue::Number(n) => *n != 0.0 && !n.is_nan(),
            ConstantValue::String(s) => !s.is_empty(),
            ConstantValue::Boolean(b) => *b,
            ConstantValue::Null => false,
        }
    }

    /// `ToNumber`.
    pub fn to_number(&self) -> f64 {
        match self {
            ConstantValue::Number(n) => *n,
            ConstantValue::String(s) => string_to_number(s),
            ConstantValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            ConstantValue::Null => 0.0,
        }
    }

    /// `ToInt32`.
    pub fn to_int32(&self) -> i32 {
        to_uint32(self.to_number()) as i32
    }

    /// `ToUint32`.
    pub fn to_uint32(&self) -> u32 {
        to_uint32(self.to_number())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ConstantValue::Number(_) => "number",
            ConstantValue::String(_) => "string",
            ConstantValue::Boolean(_) => "boolean",
            ConstantValue::Null => "null",
        }
    }

    /// `==`
    pub fn loose_equals(&self, other: &ConstantValue) -> bool {
        use ConstantValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Null, _) | (_, Null) => false,
            (Number(a), Number(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            (Boolean(_), _) => Number(self.to_number()).loose_equals(other),
            (_, Boolean(_)) => self.loose_equals(&Number(other.to_number())),
            (Number(a), String(_)) => *a == other.to_number(),
            (String(_), Number(b)) => self.to_number() == *b,
        }
    }

    /// `===`
    pub fn strict_equals(&self, other: &ConstantValue) -> bool {
        use ConstantValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Number(a), Number(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Boolean(a), Boolean(b)) => a == b,
            _ => false,
        }
    }

    /// Abstract relational comparison. `None` when either side is NaN.
    pub fn compare(&self, other: &ConstantValue) -> Option<Ordering> {
        match (self, other) {
            (ConstantValue::String(a), ConstantValue::String(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
            _ => self.to_number().partial_cmp(&other.to_number()),
        }
    }
}

/// `ToString`.
impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Number(n) => f.write_str(&number_to_string(*n)),
            ConstantValue::String(s) => f.write_str(s),
            ConstantValue::Boolean(b) => write!(f, "{}", b),
            ConstantValue::Null => f.write_str("null"),
        }
    }
}

impl From<f64> for ConstantValue {
    fn from(value: f64) -> Self {
        ConstantValue::Number(value)
    }
}

impl From<bool> for ConstantValue {
    fn from(value: bool) -> Self {
        ConstantValue::Boolean(value)
    }
}

impl From<&str> for ConstantValue {
    fn from(value: &str) -> Self {
        ConstantValue::String(value.to_string())
    }
}

impl TryFrom<&serde_json::Value> for ConstantValue {
    type Error = EvaluationError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => Ok(ConstantValue::Null),
            serde_json::Value::Bool(b) => Ok(ConstantValue::Boolean(*b)),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(ConstantValue::Number)
                .ok_or_else(|| EvaluationError::InvalidInput(n.to_string())),
            serde_json::Value::String(s) => Ok(ConstantValue::String(s.clone())),
            serde_json::Value::Array(_) => Err(EvaluationError::InvalidInput("array".to_string())),
            serde_json::Value::Object(_) => Err(EvaluationError::InvalidInput("object".to_string())),
        }
    }
}

/// Non-finite numbers have no JSON form and become `null`.
impl From<&ConstantValue> for serde_json::Value {
    fn from(value: &ConstantValue) -> Self {
        match value {
            ConstantValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            ConstantValue::String(s) => serde_json::Value::String(s.clone()),
            ConstantValue::Boolean(b) => serde_json::Value::Bool(*b),
            ConstantValue::Null => serde_json::Value::Null,
        }
    }
}

fn to_uint32(n: f64) -> u32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32
}

/// `Number::toString` for radix 10.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if (1e-6..1e21).contains(&n.abs()) {
        return format!("{}", n);
    }
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => format!("{}e+{}", mantissa, exponent),
        _ => formatted,
    }
}

/// `StringToNumber`: whitespace-trimmed decimal, `Infinity`, or a
/// `0x`/`0o`/`0b` integer. Anything else is NaN.
pub fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if digits.is_empty() {
            return f64::NAN;
        }
        let mut value = 0.0;
        for ch in digits.chars() {
            match ch.to_digit(radix) {
                Some(d) => value = value * radix as f64 + d as f64,
                None => return f64::NAN,
            }
        }
        return value;
    }

    let is_decimal_literal = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !is_decimal_literal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!ConstantValue::Number(0.0).is_truthy());
        assert!(!ConstantValue::Number(f64::NAN).is_truthy());
        assert!(ConstantValue::Number(-1.0).is_truthy());
        assert!(!ConstantValue::from("").is_truthy());
        assert!(ConstantValue::from("0").is_truthy());
        assert!(!ConstantValue::Null.is_truthy());
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(5.0), "5");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1e-7), "1e-7");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("  42\n"), 42.0);
        assert_eq!(string_to_number("0x1f"), 31.0);
        assert_eq!(string_to_number("-2.5e1"), -25.0);
        assert!(string_to_number("12px").is_nan());
        assert!(string_to_number("inf").is_nan());
    }

    #[test]
    fn test_loose_equality() {
        assert!(ConstantValue::Number(1.0).loose_equals(&ConstantValue::from("1")));
        assert!(ConstantValue::Boolean(true).loose_equals(&ConstantValue::Number(1.0)));
        assert!(!ConstantValue::Null.loose_equals(&ConstantValue::Number(0.0)));
        assert!(!ConstantValue::Number(f64::NAN).loose_equals(&ConstantValue::Number(f64::NAN)));
    }

    #[test]
    fn test_string_comparison_uses_code_units() {
        let a = ConstantValue::from("a");
        let b = ConstantValue::from("b");
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(ConstantValue::from("10").compare(&ConstantValue::from("9")), Some(Ordering::Less));
        assert_eq!(ConstantValue::from("10").compare(&ConstantValue::Number(9.0)), Some(Ordering::Greater));
    }

    #[test]
    fn test_int32_wraps() {
        assert_eq!(ConstantValue::Number(4_294_967_295.0).to_int32(), -1);
        assert_eq!(ConstantValue::Number(-1.5).to_int32(), -1);
        assert_eq!(ConstantValue::Number(f64::INFINITY).to_int32(), 0);
    }

    #[test]
    fn test_json_conversion() {
        let json = serde_json::json!(3.5);
        assert_eq!(ConstantValue::try_from(&json), Ok(ConstantValue::Number(3.5)));
        assert!(ConstantValue::try_from(&serde_json::json!([1])).is_err());
        assert_eq!(serde_json::Value::from(&ConstantValue::Number(f64::NAN)), serde_json::Value::Null);
    }
}
