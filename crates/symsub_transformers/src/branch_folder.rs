//! Conditional branch folding.
//!
//! Walks a program in source order and evaluates each `if` test that
//! execution would reach under the given input. Within an `if`/`else if`
//! chain, evaluation stops at the first taken test; a test that is false
//! has its consequent skipped while its alternate is still walked.

use serde::Serialize;
use symsub_ast::node::*;
use symsub_ast::visitor::AstVisitor;
use symsub_core::TextRange;
use symsub_evaluator::{evaluate, Bindings, EvaluationError};

/// The source range of one evaluated test and its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BranchRecord {
    pub start: u32,
    pub end: u32,
    pub taken: bool,
}

impl BranchRecord {
    pub fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }
}

pub struct BranchFolder<'b> {
    bindings: &'b Bindings,
    records: Vec<BranchRecord>,
    error: Option<EvaluationError>,
}

impl<'b> BranchFolder<'b> {
    pub fn new(bindings: &'b Bindings) -> Self {
        Self {
            bindings,
            records: Vec::new(),
            error: None,
        }
    }

    /// Walk `source_file` and return the records in source order. The first
    /// test that cannot be evaluated aborts the walk.
    pub fn fold(mut self, source_file: &SourceFile<'_>) -> Result<Vec<BranchRecord>, EvaluationError> {
        self.visit_source_file(source_file);
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.records),
        }
    }

    /// Evaluate one member of a chain. `chain_decided` is set once an
    /// earlier member was taken, in which case nothing later is reached.
    fn fold_conditional<'a>(&mut self, node: &IfStatement<'a>, chain_decided: bool) {
        if chain_decided || self.error.is_some() {
            return;
        }

        let range = node.expression.range();
        let taken = match evaluate(node.expression, self.bindings) {
            Ok(value) => value.is_truthy(),
            Err(error) => {
                tracing::debug!(?range, %error, "test could not be evaluated");
                self.error = Some(error);
                return;
            }
        };
        tracing::debug!(?range, taken, "evaluated test");
        self.records.push(BranchRecord {
            start: range.pos,
            end: range.end,
            taken,
        });

        if taken {
            self.visit_statement(node.then_statement);
        }
        match node.else_statement {
            Some(Statement::IfStatement(next)) => self.fold_conditional(next, taken),
            Some(alternate) if !taken => self.visit_statement(alternate),
            _ => {}
        }
    }
}

impl<'a, 'b> AstVisitor<'a> for BranchFolder<'b> {
    fn visit_if_statement(&mut self, node: &IfStatement<'a>) {
        self.fold_conditional(node, false);
    }
}
