//! symsub_analyzer: Symbolic substitution and branch evaluation.
//!
//! The entry points a caller needs:
//!
//! - [`substitute`] inlines every local of every function into the
//!   expressions that read it and returns the rewritten source.
//! - [`evaluate_branches`] evaluates the `if` tests reached under concrete
//!   input values and reports each one's source range and outcome.
//! - [`parse_tree`] returns the parsed program as ESTree-shaped JSON.
//!
//! Each call parses its input into a fresh arena and keeps no state
//! between calls, so calls may run concurrently.

mod estree;
mod highlight;

use bumpalo::Bump;
use symsub_ast::node::SourceFile;
use symsub_core::{AnalysisArena, StringInterner};
use symsub_parser::Parser;
use symsub_printer::Printer;
use symsub_transformers::{BranchFolder, SymbolicSubstitution, Transformer};
use thiserror::Error;

pub use highlight::highlight;
pub use symsub_diagnostics::{Diagnostic, DiagnosticCollection};
pub use symsub_printer::PrinterOptions;
pub use symsub_evaluator::{bindings_from_json, Bindings, ConstantValue, EvaluationError};
pub use symsub_transformers::BranchRecord;

/// File name used in diagnostics when the caller does not supply one.
pub const DEFAULT_FILE_NAME: &str = "input.js";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyzeError {
    /// The source does not parse. Holds every diagnostic, warnings included.
    #[error("{0}")]
    Syntax(DiagnosticCollection),
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

#[derive(Debug, Clone)]
pub struct AnalyzerOptions {
    pub printer: PrinterOptions,
    pub file_name: String,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            printer: PrinterOptions::default(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl AnalyzerOptions {
    pub fn from_config(config: &symsub_options::SymsubConfig) -> Self {
        Self {
            printer: config.printer_options(),
            ..Self::default()
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

/// Rewrite `source` with every local read replaced by its definition.
pub fn substitute(source: &str) -> Result<String, AnalyzeError> {
    substitute_with_options(source, &AnalyzerOptions::default())
}

pub fn substitute_with_options(source: &str, options: &AnalyzerOptions) -> Result<String, AnalyzeError> {
    let _span = tracing::debug_span!("substitute", file = %options.file_name).entered();
    with_parsed(source, &options.file_name, |arena, file| {
        let mut pass = SymbolicSubstitution::new(arena);
        let rewritten = pass.transform(file);
        Ok(Printer::with_options(options.printer.clone()).print_source_file(&rewritten))
    })
}

/// The `if` tests reached under `bindings`, in source order.
pub fn evaluate_branches(source: &str, bindings: &Bindings) -> Result<Vec<BranchRecord>, AnalyzeError> {
    evaluate_branches_with_options(source, bindings, &AnalyzerOptions::default())
}

pub fn evaluate_branches_with_options(
    source: &str,
    bindings: &Bindings,
    options: &AnalyzerOptions,
) -> Result<Vec<BranchRecord>, AnalyzeError> {
    let _span = tracing::debug_span!("evaluate_branches", file = %options.file_name).entered();
    with_parsed(source, &options.file_name, |_, file| {
        let records = BranchFolder::new(bindings).fold(file)?;
        tracing::debug!(records = records.len(), "folded branches");
        Ok(records)
    })
}

/// The parsed program as an ESTree JSON document with `range` on every node.
pub fn parse_tree(source: &str) -> Result<serde_json::Value, AnalyzeError> {
    let _span = tracing::debug_span!("parse_tree").entered();
    with_parsed(source, DEFAULT_FILE_NAME, |_, file| Ok(estree::program(file)))
}

/// Parse `source` into a fresh arena and run `f` on the tree. Any error
/// diagnostic fails the call before `f` runs.
fn with_parsed<R>(
    source: &str,
    file_name: &str,
    f: impl for<'a> FnOnce(&'a Bump, &SourceFile<'a>) -> Result<R, AnalyzeError>,
) -> Result<R, AnalyzeError> {
    let arena = AnalysisArena::for_source(source.len());
    let interner = StringInterner::new();
    let mut parser = Parser::new(arena.bump(), &interner, file_name, source);
    let file = parser.parse_source_file();
    let diagnostics = parser.take_diagnostics();
    if diagnostics.has_errors() {
        tracing::debug!(errors = diagnostics.error_count(), "source does not parse");
        return Err(AnalyzeError::Syntax(diagnostics));
    }
    for warning in diagnostics.diagnostics() {
        tracing::warn!(%warning, "parse warning");
    }
    let result = f(arena.bump(), &file);
    tracing::trace!(bytes = arena.allocated_bytes(), "arena usage");
    result
}
