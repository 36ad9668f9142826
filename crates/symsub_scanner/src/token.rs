//! Token information produced by the scanner.

use symsub_ast::syntax_kind::SyntaxKind;
use symsub_ast::types::TokenFlags;
use symsub_core::text::TextRange;

/// A snapshot of one scanned token.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub kind: SyntaxKind,
    /// Byte range of the token, excluding leading trivia.
    pub range: TextRange,
    /// Identifier name, literal spelling or cooked string value.
    pub text: String,
    pub flags: TokenFlags,
}

impl TokenInfo {
    /// Whether there was a line break before this token.
    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }
}
