//! symsub_transformers: Tree passes over parsed programs.
//!
//! - [`SymbolicSubstitution`] rewrites a program into a new tree where every
//!   read of a local is replaced by the expression it was last assigned.
//! - [`BranchFolder`] evaluates conditional tests against concrete input
//!   and records which ones were taken.

mod branch_folder;
mod substitution;

pub use branch_folder::{BranchFolder, BranchRecord};
pub use substitution::SymbolicSubstitution;

use symsub_ast::node::SourceFile;

/// A pass that produces a new tree from an existing one.
///
/// The result lives in the same arena as the input.
pub trait Transformer<'a> {
    fn transform(&mut self, source_file: &SourceFile<'a>) -> SourceFile<'a>;
}
