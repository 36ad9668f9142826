//! The binder drives the scope stack for a rewrite pass.
//!
//! A pass calls the `enter_*`/`exit_*` pairs as it walks into and out of
//! programs, functions and blocks, asks [`Binder::resolve`] for the
//! expression an identifier read stands for, and reports declarations and
//! assignments after their right-hand sides have been rewritten.

use bumpalo::Bump;
use rustc_hash::FxHashSet;
use symsub_ast::node::*;
use symsub_ast::syntax_kind::SyntaxKind;
use symsub_core::intern::InternedString;

use crate::scope::{FrameKind, ScopeStack};

/// Scope state for one rewrite. Create a fresh binder per pass.
pub struct Binder<'a> {
    arena: &'a Bump,
    scopes: ScopeStack<'a>,
    /// Names whose assignments are observable outside the function being
    /// rewritten. `None` outside any function.
    parameter_set: Option<FxHashSet<InternedString>>,
    /// Parameter sets of enclosing functions.
    saved_parameter_sets: Vec<Option<FxHashSet<InternedString>>>,
}

impl<'a> Binder<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self {
            arena,
            scopes: ScopeStack::new(),
            parameter_set: None,
            saved_parameter_sets: Vec::new(),
        }
    }

    // ========================================================================
    // Frames
    // ========================================================================

    pub fn enter_program(&mut self) {
        self.push(FrameKind::Program);
    }

    pub fn exit_program(&mut self) {
        self.pop();
    }

    /// Open a function frame. The parameter set becomes the function's
    /// parameters plus every name declared at program level, and each
    /// parameter is bound to itself.
    pub fn enter_function(&mut self, parameters: &[ParameterDeclaration<'a>]) {
        let mut parameter_set: FxHashSet<InternedString> = parameters.iter().map(|p| p.name.text).collect();
        if let Some(root) = self.scopes.root() {
            parameter_set.extend(root.names());
        }
        tracing::trace!(observable = parameter_set.len(), "activated parameter set");
        self.saved_parameter_sets.push(self.parameter_set.replace(parameter_set));

        self.push(FrameKind::Function);
        for param in parameters {
            let identity: &'a Expression<'a> = self.arena.alloc(Expression::Identifier(param.name));
            self.scopes.bind(param.name.text, identity);
        }
    }

    pub fn exit_function(&mut self) {
        self.pop();
        self.parameter_set = self.saved_parameter_sets.pop().flatten();
    }

    pub fn enter_block(&mut self) {
        self.push(FrameKind::Block);
    }

    pub fn exit_block(&mut self) {
        self.pop();
    }

    fn push(&mut self, kind: FrameKind) {
        self.scopes.push_frame(kind);
        tracing::trace!(?kind, depth = self.scopes.depth(), "push frame");
    }

    fn pop(&mut self) {
        let frame = self.scopes.pop_frame();
        tracing::trace!(kind = ?frame.kind, bindings = frame.len(), depth = self.scopes.depth(), "pop frame");
    }

    // ========================================================================
    // Bindings
    // ========================================================================

    /// The expression an identifier read currently stands for, if any.
    pub fn resolve(&self, name: &Identifier<'a>) -> Option<&'a Expression<'a>> {
        self.scopes.resolve(name.text)
    }

    /// Record `let name = initializer`. Without an initializer the name is
    /// only declared.
    pub fn record_declaration(&mut self, name: &Identifier<'a>, initializer: Option<&'a Expression<'a>>) {
        match initializer {
            Some(value) => {
                tracing::debug!(name = name.text_name, "recorded declaration");
                self.scopes.bind(name.text, value);
            }
            None => self.scopes.declare(name.text),
        }
    }

    /// Record `target op= value`. A compound assignment binds
    /// `target op value`, with `target` itself resolved first.
    pub fn record_assignment(&mut self, target: &Identifier<'a>, operator: SyntaxKind, value: &'a Expression<'a>) {
        let bound = match operator.compound_assignment_operator() {
            Some(binary_operator) => {
                let current: &'a Expression<'a> = match self.resolve(target) {
                    Some(expr) => expr,
                    None => self.arena.alloc(Expression::Identifier(*target)),
                };
                let combined: &'a Expression<'a> = self.arena.alloc(Expression::Binary(BinaryExpression {
                    data: NodeData::synthesized(SyntaxKind::BinaryExpression),
                    left: current,
                    operator_token: Token::synthesized(binary_operator),
                    right: value,
                }));
                combined
            }
            None => value,
        };
        tracing::debug!(name = target.text_name, ?operator, "recorded assignment");
        self.scopes.bind(target.text, bound);
    }

    // ========================================================================
    // Parameter set
    // ========================================================================

    /// Whether a function's parameter set is active.
    pub fn has_parameter_set(&self) -> bool {
        self.parameter_set.is_some()
    }

    /// Whether assignments to `name` must be kept.
    pub fn is_observable(&self, name: InternedString) -> bool {
        self.parameter_set.as_ref().is_some_and(|set| set.contains(&name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }
}
