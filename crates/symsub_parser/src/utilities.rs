//! Parser utility functions.

use symsub_ast::syntax_kind::SyntaxKind;

/// Check if a token kind can start a statement. Used to resynchronize after
/// a syntax error.
pub fn can_start_statement(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::OpenBraceToken
            | SyntaxKind::VarKeyword
            | SyntaxKind::LetKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::IfKeyword
            | SyntaxKind::DoKeyword
            | SyntaxKind::WhileKeyword
            | SyntaxKind::ForKeyword
            | SyntaxKind::ContinueKeyword
            | SyntaxKind::BreakKeyword
            | SyntaxKind::ReturnKeyword
            | SyntaxKind::SemicolonToken
            | SyntaxKind::CloseBraceToken
    )
}

/// Tokens the parser never skips over when recovering inside an expression,
/// since an enclosing construct still needs them.
pub fn is_list_terminator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::EndOfFileToken
            | SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::SemicolonToken
            | SyntaxKind::OpenBraceToken
    )
}

/// Human-readable name of a construct the parser recognizes but does not
/// support, keyed by the token that introduces it.
pub fn unsupported_construct_name(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::PlusPlusToken => "++",
        SyntaxKind::MinusMinusToken => "--",
        SyntaxKind::DotToken | SyntaxKind::OpenBracketToken => "member access",
        SyntaxKind::QuestionToken => "?:",
        SyntaxKind::FunctionKeyword => "function expression",
        SyntaxKind::EqualsGreaterThanToken => "=>",
        SyntaxKind::OpenBraceToken => "object literal",
        SyntaxKind::CommaToken => ",",
        SyntaxKind::QuestionQuestionToken => "?? mixed with || or &&",
        _ => kind.keyword_text().unwrap_or("token"),
    }
}
