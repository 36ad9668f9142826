//! The scanner.
//!
//! Works directly on the UTF-8 bytes of the source so that token positions
//! are byte offsets, which is what node ranges and branch records report.
//! ASCII is handled byte-wise; other characters are decoded on demand.

use crate::char_codes::*;
use crate::token::TokenInfo;
use memchr::{memchr2, memmem};
use symsub_ast::syntax_kind::SyntaxKind;
use symsub_ast::types::TokenFlags;
use symsub_core::text::{TextRange, TextSpan};
use symsub_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};

/// The scanner converts source text into tokens.
pub struct Scanner<'t> {
    text: &'t str,
    /// Current byte position in the text.
    pos: usize,
    /// Start of the current token (after leading trivia).
    token_start: usize,
    token: SyntaxKind,
    /// Identifier name, literal spelling or cooked string value.
    token_value: String,
    token_flags: TokenFlags,
    diagnostics: DiagnosticCollection,
}

impl<'t> Scanner<'t> {
    pub fn new(text: &'t str) -> Self {
        Self {
            text,
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::NONE,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    pub fn text(&self) -> &'t str {
        self.text
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Start of the current token (after trivia).
    #[inline]
    pub fn token_start(&self) -> u32 {
        self.token_start as u32
    }

    /// End of the current token (exclusive).
    #[inline]
    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    #[inline]
    pub fn token_range(&self) -> TextRange {
        TextRange::new(self.token_start(), self.token_end())
    }

    /// The current token exactly as written.
    #[inline]
    pub fn token_text(&self) -> &'t str {
        &self.text[self.token_start..self.pos]
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            kind: self.token,
            range: self.token_range(),
            text: self.token_value.clone(),
            flags: self.token_flags,
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn error(&mut self, message: &DiagnosticMessage, start: usize, end: usize) {
        let mut diagnostic = Diagnostic::new(message, &[]);
        diagnostic.span = Some(TextSpan::from_bounds(start as u32, end as u32));
        self.diagnostics.add(diagnostic);
    }

    /// Skip whitespace and comments, setting token_flags for line breaks.
    fn skip_trivia(&mut self) {
        let text = self.text;
        let bytes = text.as_bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\r' | b'\n' => {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    self.pos += 1;
                }
                b' ' | b'\t' | 0x0B | 0x0C => self.pos += 1,
                b'/' if self.byte_at(1) == Some(b'/') => {
                    let body_start = self.pos + 2;
                    self.pos = match memchr2(b'\n', b'\r', &bytes[body_start..]) {
                        Some(offset) => body_start + offset,
                        None => bytes.len(),
                    };
                }
                b'/' if self.byte_at(1) == Some(b'*') => {
                    let body_start = self.pos + 2;
                    let body_end = match memmem::find(&bytes[body_start..], b"*/") {
                        Some(offset) => body_start + offset,
                        None => {
                            self.error(&messages::ASTERISK_SLASH_EXPECTED, bytes.len(), bytes.len());
                            bytes.len()
                        }
                    };
                    if memchr2(b'\n', b'\r', &bytes[body_start..body_end]).is_some() {
                        self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    }
                    self.pos = (body_end + 2).min(bytes.len());
                }
                b if b.is_ascii() => return,
                _ => {
                    let Some(ch) = self.current_char() else { return };
                    if is_line_break(ch) {
                        self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                    } else if !is_white_space_single_line(ch) {
                        return;
                    }
                    self.pos += ch.len_utf8();
                }
            }
        }
    }

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();

        self.skip_trivia();
        self.token_start = self.pos;

        if self.is_eof() {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        }

        use SyntaxKind::*;
        let ch = self.text.as_bytes()[self.pos];
        self.token = match ch {
            b'(' => self.scan_operator(&[("(", OpenParenToken)]),
            b')' => self.scan_operator(&[(")", CloseParenToken)]),
            b'{' => self.scan_operator(&[("{", OpenBraceToken)]),
            b'}' => self.scan_operator(&[("}", CloseBraceToken)]),
            b'[' => self.scan_operator(&[("[", OpenBracketToken)]),
            b']' => self.scan_operator(&[("]", CloseBracketToken)]),
            b';' => self.scan_operator(&[(";", SemicolonToken)]),
            b',' => self.scan_operator(&[(",", CommaToken)]),
            b':' => self.scan_operator(&[(":", ColonToken)]),
            b'~' => self.scan_operator(&[("~", TildeToken)]),
            b'.' if self.byte_at(1).map_or(false, |b| b.is_ascii_digit()) => self.scan_number(),
            b'.' => self.scan_operator(&[(".", DotToken)]),
            b'?' => self.scan_operator(&[
                ("??=", QuestionQuestionEqualsToken),
                ("??", QuestionQuestionToken),
                ("?", QuestionToken),
            ]),
            b'<' => self.scan_operator(&[
                ("<<=", LessThanLessThanEqualsToken),
                ("<<", LessThanLessThanToken),
                ("<=", LessThanEqualsToken),
                ("<", LessThanToken),
            ]),
            b'>' => self.scan_operator(&[
                (">>>=", GreaterThanGreaterThanGreaterThanEqualsToken),
                (">>>", GreaterThanGreaterThanGreaterThanToken),
                (">>=", GreaterThanGreaterThanEqualsToken),
                (">>", GreaterThanGreaterThanToken),
                (">=", GreaterThanEqualsToken),
                (">", GreaterThanToken),
            ]),
            b'=' => self.scan_operator(&[
                ("===", EqualsEqualsEqualsToken),
                ("==", EqualsEqualsToken),
                ("=>", EqualsGreaterThanToken),
                ("=", EqualsToken),
            ]),
            b'!' => self.scan_operator(&[
                ("!==", ExclamationEqualsEqualsToken),
                ("!=", ExclamationEqualsToken),
                ("!", ExclamationToken),
            ]),
            b'+' => self.scan_operator(&[("++", PlusPlusToken), ("+=", PlusEqualsToken), ("+", PlusToken)]),
            b'-' => self.scan_operator(&[("--", MinusMinusToken), ("-=", MinusEqualsToken), ("-", MinusToken)]),
            b'*' => self.scan_operator(&[
                ("**=", AsteriskAsteriskEqualsToken),
                ("**", AsteriskAsteriskToken),
                ("*=", AsteriskEqualsToken),
                ("*", AsteriskToken),
            ]),
            b'/' => self.scan_operator(&[("/=", SlashEqualsToken), ("/", SlashToken)]),
            b'%' => self.scan_operator(&[("%=", PercentEqualsToken), ("%", PercentToken)]),
            b'&' => self.scan_operator(&[
                ("&&=", AmpersandAmpersandEqualsToken),
                ("&&", AmpersandAmpersandToken),
                ("&=", AmpersandEqualsToken),
                ("&", AmpersandToken),
            ]),
            b'|' => self.scan_operator(&[
                ("||=", BarBarEqualsToken),
                ("||", BarBarToken),
                ("|=", BarEqualsToken),
                ("|", BarToken),
            ]),
            b'^' => self.scan_operator(&[("^=", CaretEqualsToken), ("^", CaretToken)]),
            b'\'' | b'"' => self.scan_string_literal(ch),
            b'0'..=b'9' => self.scan_number(),
            _ => match self.current_char() {
                Some(c) if is_identifier_start(c) => self.scan_identifier(),
                Some(c) => {
                    let start = self.pos;
                    self.pos += c.len_utf8();
                    self.error(&messages::INVALID_CHARACTER, start, self.pos);
                    SyntaxKind::Unknown
                }
                None => SyntaxKind::EndOfFileToken,
            },
        };

        self.token
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    /// Consume the first (longest) spelling in `candidates` that matches.
    fn scan_operator(&mut self, candidates: &[(&str, SyntaxKind)]) -> SyntaxKind {
        let rest = &self.text[self.pos..];
        for (spelling, kind) in candidates {
            if rest.starts_with(*spelling) {
                self.pos += spelling.len();
                return *kind;
            }
        }
        self.pos += 1;
        SyntaxKind::Unknown
    }

    fn scan_string_literal(&mut self, quote: u8) -> SyntaxKind {
        if quote == b'\'' {
            self.token_flags |= TokenFlags::SINGLE_QUOTE;
        }
        self.pos += 1; // skip opening quote
        let mut result = String::new();
        loop {
            let Some(ch) = self.current_char() else {
                self.error(&messages::UNTERMINATED_STRING_LITERAL, self.token_start, self.pos);
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            };
            if ch == quote as char {
                self.pos += 1;
                break;
            }
            if ch == '\\' {
                self.token_flags |= TokenFlags::CONTAINS_ESCAPE;
                self.pos += 1;
                self.scan_escape_sequence(&mut result);
                continue;
            }
            if ch == '\n' || ch == '\r' {
                self.error(&messages::UNTERMINATED_STRING_LITERAL, self.token_start, self.pos);
                self.token_flags |= TokenFlags::UNTERMINATED;
                break;
            }
            result.push(ch);
            self.pos += ch.len_utf8();
        }
        self.token_value = result;
        SyntaxKind::StringLiteral
    }

    /// Scan the escape after a backslash, appending the character it denotes.
    fn scan_escape_sequence(&mut self, out: &mut String) {
        let Some(ch) = self.current_char() else { return };
        self.pos += ch.len_utf8();
        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' if !self.byte_at(0).map_or(false, |b| b.is_ascii_digit()) => out.push('\0'),
            'x' => {
                if let Some(c) = self.scan_hex_escape(2) {
                    out.push(c);
                }
            }
            'u' if self.byte_at(0) == Some(b'{') => {
                self.pos += 1;
                let digits_start = self.pos;
                while self.byte_at(0).map_or(false, |b| b.is_ascii_hexdigit()) {
                    self.pos += 1;
                }
                let value = u32::from_str_radix(&self.text[digits_start..self.pos], 16).ok();
                match (value.and_then(char::from_u32), self.byte_at(0)) {
                    (Some(c), Some(b'}')) => {
                        self.pos += 1;
                        out.push(c);
                    }
                    _ => self.error(&messages::HEXADECIMAL_DIGIT_EXPECTED, digits_start, self.pos),
                }
            }
            'u' => {
                if let Some(c) = self.scan_hex_escape(4) {
                    out.push(c);
                }
            }
            // Line continuation
            '\r' => {
                if self.byte_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            '\n' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR => {}
            other => out.push(other),
        }
    }

    fn scan_hex_escape(&mut self, digit_count: usize) -> Option<char> {
        let start = self.pos;
        let digits = self.text.get(start..start + digit_count)?;
        let value = if digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
        } else {
            None
        };
        match value {
            Some(c) => {
                self.pos += digit_count;
                Some(c)
            }
            None => {
                self.error(&messages::HEXADECIMAL_DIGIT_EXPECTED, start, start);
                None
            }
        }
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;

        if self.byte_at(0) == Some(b'0') {
            match self.byte_at(1) {
                Some(b'x') | Some(b'X') => {
                    return self.scan_radix_number(start, TokenFlags::HEX_SPECIFIER, |b| b.is_ascii_hexdigit())
                }
                Some(b'b') | Some(b'B') => {
                    return self.scan_radix_number(start, TokenFlags::BINARY_SPECIFIER, is_binary_digit)
                }
                Some(b'o') | Some(b'O') => {
                    return self.scan_radix_number(start, TokenFlags::OCTAL_SPECIFIER, is_octal_digit)
                }
                _ => {}
            }
        }

        self.scan_digits();
        if self.byte_at(0) == Some(b'.') {
            self.pos += 1;
            self.scan_digits();
        }

        if let Some(b'e') | Some(b'E') = self.byte_at(0) {
            self.pos += 1;
            self.token_flags |= TokenFlags::SCIENTIFIC;
            if let Some(b'+') | Some(b'-') = self.byte_at(0) {
                self.pos += 1;
            }
            if self.scan_digits() == 0 {
                self.error(&messages::DIGIT_EXPECTED, self.pos, self.pos);
            }
        }

        self.finish_numeric_literal(start)
    }

    fn scan_radix_number(&mut self, start: usize, flag: TokenFlags, is_digit: fn(u8) -> bool) -> SyntaxKind {
        self.pos += 2; // skip 0x / 0b / 0o
        self.token_flags |= flag;
        let digits_start = self.pos;
        while self.byte_at(0).map_or(false, is_digit) {
            self.pos += 1;
        }
        if self.pos == digits_start {
            let message = if flag == TokenFlags::HEX_SPECIFIER {
                &messages::HEXADECIMAL_DIGIT_EXPECTED
            } else {
                &messages::DIGIT_EXPECTED
            };
            self.error(message, self.pos, self.pos);
        }
        self.finish_numeric_literal(start)
    }

    /// Returns the number of digits consumed.
    fn scan_digits(&mut self) -> usize {
        let start = self.pos;
        while self.byte_at(0).map_or(false, |b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    fn finish_numeric_literal(&mut self, start: usize) -> SyntaxKind {
        self.token_value.push_str(&self.text[start..self.pos]);
        if self.current_char().map_or(false, is_identifier_start) {
            self.error(&messages::AN_IDENTIFIER_CANNOT_FOLLOW_A_NUMERIC_LITERAL, self.pos, self.pos);
        }
        SyntaxKind::NumericLiteral
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        let text = &self.text[start..self.pos];
        self.token_value.push_str(text);
        SyntaxKind::from_keyword(text).unwrap_or(SyntaxKind::Identifier)
    }
}

/// The numeric value of a numeric literal's spelling.
///
/// Malformed spellings (already reported by the scanner) evaluate to NaN.
pub fn parse_numeric_literal(text: &str) -> f64 {
    let radix = match text.get(..2) {
        Some("0x") | Some("0X") => 16,
        Some("0b") | Some("0B") => 2,
        Some("0o") | Some("0O") => 8,
        _ => return text.parse::<f64>().unwrap_or(f64::NAN),
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, digit| acc * radix as f64 + digit as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_simple_tokens() {
        let mut scanner = Scanner::new("( ) { } ; , :");
        assert_eq!(scanner.scan(), SyntaxKind::OpenParenToken);
        assert_eq!(scanner.scan(), SyntaxKind::CloseParenToken);
        assert_eq!(scanner.scan(), SyntaxKind::OpenBraceToken);
        assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
        assert_eq!(scanner.scan(), SyntaxKind::SemicolonToken);
        assert_eq!(scanner.scan(), SyntaxKind::CommaToken);
        assert_eq!(scanner.scan(), SyntaxKind::ColonToken);
        assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
    }

    #[test]
    fn test_longest_operator_wins() {
        let mut scanner = Scanner::new(">>>= >>= >= > **= ===");
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanGreaterThanEqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanEqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
        assert_eq!(scanner.scan(), SyntaxKind::AsteriskAsteriskEqualsToken);
        assert_eq!(scanner.scan(), SyntaxKind::EqualsEqualsEqualsToken);
    }

    #[test]
    fn test_token_positions_are_byte_offsets() {
        let mut scanner = Scanner::new("'é' + x");
        assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
        assert_eq!(scanner.token_range(), TextRange::new(0, 4));
        assert_eq!(scanner.scan(), SyntaxKind::PlusToken);
        assert_eq!(scanner.token_range(), TextRange::new(5, 6));
        assert_eq!(scanner.scan(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_range(), TextRange::new(7, 8));
    }

    #[test]
    fn test_parse_numeric_literal() {
        assert_eq!(parse_numeric_literal("42"), 42.0);
        assert_eq!(parse_numeric_literal("1.5e2"), 150.0);
        assert_eq!(parse_numeric_literal(".5"), 0.5);
        assert_eq!(parse_numeric_literal("0xff"), 255.0);
        assert_eq!(parse_numeric_literal("0b101"), 5.0);
        assert_eq!(parse_numeric_literal("0o17"), 15.0);
        assert!(parse_numeric_literal("0x").is_nan());
    }
}
