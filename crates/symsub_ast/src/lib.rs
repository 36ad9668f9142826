//! symsub_ast: Syntax tree definitions for the analyzed language.
//!
//! Defines the node types, the SyntaxKind enum, operator precedence and the
//! flag types shared by the parser, the printer and the rewrite passes.
//! Trees are allocated in a bump arena and refer to children by reference.

pub mod generated;
pub mod node;
pub mod precedence;
pub mod syntax_kind;
pub mod types;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use precedence::OperatorPrecedence;
pub use syntax_kind::SyntaxKind;
pub use types::*;
