//! symsub_core: Core utilities shared by every stage of the analyzer.
//!
//! Provides source positions, string interning and the per-call arena
//! that owns syntax trees.

pub mod arena;
pub mod intern;
pub mod text;

// Re-export commonly used types
pub use arena::{alloc_vec_in, AnalysisArena};
pub use intern::{InternedString, StringInterner};
pub use text::{TextRange, TextSpan};
