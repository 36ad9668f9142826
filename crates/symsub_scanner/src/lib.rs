//! symsub_scanner: Lexer for the analyzed language.
//!
//! Produces tokens with exact byte offsets into the source text, skipping
//! whitespace and comments. String literal values are cooked (escapes
//! resolved); numeric literals keep their spelling and can be converted
//! with [`parse_numeric_literal`].

mod char_codes;
mod scanner;
mod token;

pub use char_codes::{is_identifier_part, is_identifier_start, is_line_break};
pub use scanner::{parse_numeric_literal, Scanner};
pub use token::TokenInfo;
