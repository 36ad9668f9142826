//! symsub_parser: Recursive descent parser for the analyzed language.
//!
//! Parses the scanner's token stream into an arena-allocated tree whose
//! nodes carry exact `[pos, end)` byte ranges. Malformed input is reported
//! through diagnostics; the parser recovers and keeps going so that every
//! problem in a file is reported at once.

mod parser;
mod utilities;

pub use parser::{Parser, MAX_RECURSION_DEPTH};
