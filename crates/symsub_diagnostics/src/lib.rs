//! symsub_diagnostics: Diagnostic messages and error reporting.
//!
//! The scanner and parser report every problem they find as a
//! [`Diagnostic`] built from a [`DiagnosticMessage`] in the [`messages`]
//! catalog. Diagnostics accumulate in a [`DiagnosticCollection`]; any error
//! in the collection makes the parse a syntax error.

use symsub_core::text::TextSpan;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    /// May contain `{0}`, `{1}`, ... placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The file the diagnostic belongs to, if known.
    pub file: Option<String>,
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    pub fn with_location(
        file: String,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: Some(file),
            span: Some(span),
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(
            f,
            "{} SYM{}: {}",
            self.category, self.code, self.message_text
        )
    }
}

/// Replace `{0}`, `{1}`, etc. in a template with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Diagnostics accumulated while processing one source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.file.cmp(&b.file).then_with(|| {
                let a_pos = a.span.map(|s| s.start).unwrap_or(0);
                let b_pos = b.span.map(|s| s.start).unwrap_or(0);
                a_pos.cmp(&b_pos)
            })
        });
    }
}

impl fmt::Display for DiagnosticCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Scanner errors (1000-1099)
    // ========================================================================
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, "Unterminated string literal.");
    pub const ASTERISK_SLASH_EXPECTED: DiagnosticMessage = diag!(1010, Error, "'*/' expected.");
    pub const DIGIT_EXPECTED: DiagnosticMessage = diag!(1024, Error, "Digit expected.");
    pub const HEXADECIMAL_DIGIT_EXPECTED: DiagnosticMessage = diag!(1025, Error, "Hexadecimal digit expected.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1027, Error, "Invalid character.");
    pub const AN_IDENTIFIER_CANNOT_FOLLOW_A_NUMERIC_LITERAL: DiagnosticMessage = diag!(1051, Error, "An identifier or keyword cannot immediately follow a numeric literal.");

    // ========================================================================
    // Parser errors (1100-1199)
    // ========================================================================
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1103, Error, "Identifier expected.");
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1105, Error, "'{0}' expected.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1109, Error, "Expression expected.");
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1112, Error, "Unexpected token.");
    pub const DECLARATION_OR_STATEMENT_EXPECTED: DiagnosticMessage = diag!(1128, Error, "Declaration or statement expected.");
    pub const VARIABLE_DECLARATION_EXPECTED: DiagnosticMessage = diag!(1134, Error, "Variable declaration expected.");
    pub const THE_LEFT_HAND_SIDE_OF_AN_ASSIGNMENT_MUST_BE_A_VARIABLE: DiagnosticMessage = diag!(1150, Error, "The left-hand side of an assignment expression must be a variable.");
    pub const CONST_DECLARATIONS_MUST_BE_INITIALIZED: DiagnosticMessage = diag!(1155, Error, "'const' declarations must be initialized.");
    pub const UNSUPPORTED_SYNTAX_0: DiagnosticMessage = diag!(1160, Error, "Unsupported syntax '{0}'.");
    pub const CODE_NESTED_TOO_DEEPLY: DiagnosticMessage = diag!(1170, Error, "Code is nested too deeply.");

    // ========================================================================
    // Warnings (1900-1999)
    // ========================================================================
    pub const UNREACHABLE_CODE_DETECTED: DiagnosticMessage = diag!(1901, Warning, "Unreachable code detected.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        let d = Diagnostic::new(&messages::_0_EXPECTED, &[")"]);
        assert_eq!(d.message_text, "')' expected.");
        assert_eq!(d.code, 1105);
        assert!(d.is_error());
    }

    #[test]
    fn test_display_with_location() {
        let d = Diagnostic::with_location(
            "input.js".to_string(),
            TextSpan::new(12, 1),
            &messages::EXPRESSION_EXPECTED,
            &[],
        );
        assert_eq!(d.to_string(), "input.js(12): error SYM1109: Expression expected.");
    }

    #[test]
    fn test_collection_counts_errors_only() {
        let mut collection = DiagnosticCollection::new();
        assert!(!collection.has_errors());
        collection.add(Diagnostic::new(&messages::UNREACHABLE_CODE_DETECTED, &[]));
        assert!(!collection.has_errors());
        collection.add(Diagnostic::new(&messages::INVALID_CHARACTER, &[]));
        assert!(collection.has_errors());
        assert_eq!(collection.error_count(), 1);
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_sort_by_position() {
        let mut collection = DiagnosticCollection::new();
        let at = |pos| {
            Diagnostic::with_location("f".into(), TextSpan::new(pos, 0), &messages::UNEXPECTED_TOKEN, &[])
        };
        collection.add(at(9));
        collection.add(at(3));
        collection.sort();
        let starts: Vec<_> = collection.diagnostics().iter().map(|d| d.span.unwrap().start).collect();
        assert_eq!(starts, vec![3, 9]);
    }
}
