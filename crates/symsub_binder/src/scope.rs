//! Binding frames and the scope stack.

use rustc_hash::{FxHashMap, FxHashSet};
use symsub_ast::node::Expression;
use symsub_core::intern::InternedString;

/// The construct that opened a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Program,
    Function,
    Block,
}

/// Bindings for one lexical scope: each name maps to the expression most
/// recently assigned to it within the scope.
#[derive(Debug)]
pub struct BindingFrame<'a> {
    pub kind: FrameKind,
    bindings: FxHashMap<InternedString, &'a Expression<'a>>,
    /// Names declared here without an initializer. They have no value to
    /// substitute but still count as declared in this scope.
    declared: FxHashSet<InternedString>,
}

impl<'a> BindingFrame<'a> {
    pub fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            bindings: FxHashMap::default(),
            declared: FxHashSet::default(),
        }
    }

    pub fn get(&self, name: InternedString) -> Option<&'a Expression<'a>> {
        self.bindings.get(&name).copied()
    }

    /// Every name bound or declared in this frame.
    pub fn names(&self) -> impl Iterator<Item = InternedString> + '_ {
        self.bindings.keys().chain(self.declared.iter().filter(|n| !self.bindings.contains_key(*n))).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Ordered sequence of binding frames, innermost last.
#[derive(Debug, Default)]
pub struct ScopeStack<'a> {
    frames: Vec<BindingFrame<'a>>,
}

impl<'a> ScopeStack<'a> {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push_frame(&mut self, kind: FrameKind) {
        self.frames.push(BindingFrame::new(kind));
    }

    /// Remove the innermost frame.
    ///
    /// # Panics
    ///
    /// Panics when the stack is empty: frames are pushed and popped in
    /// matched pairs, so this is a traversal bug.
    pub fn pop_frame(&mut self) -> BindingFrame<'a> {
        match self.frames.pop() {
            Some(frame) => frame,
            None => panic!("invariant violation: pop_frame on an empty scope stack"),
        }
    }

    /// Look `name` up from the innermost frame outwards.
    ///
    /// # Panics
    ///
    /// Panics when no frame is open.
    pub fn resolve(&self, name: InternedString) -> Option<&'a Expression<'a>> {
        if self.frames.is_empty() {
            panic!("invariant violation: resolve with no open scope");
        }
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Set `name` in the innermost frame, replacing any earlier binding there.
    ///
    /// # Panics
    ///
    /// Panics when no frame is open.
    pub fn bind(&mut self, name: InternedString, expression: &'a Expression<'a>) {
        self.innermost_mut().bindings.insert(name, expression);
    }

    /// Record that `name` is declared in the innermost frame without a value.
    pub fn declare(&mut self, name: InternedString) {
        self.innermost_mut().declared.insert(name);
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The outermost frame.
    pub fn root(&self) -> Option<&BindingFrame<'a>> {
        self.frames.first()
    }

    pub fn innermost(&self) -> Option<&BindingFrame<'a>> {
        self.frames.last()
    }

    fn innermost_mut(&mut self) -> &mut BindingFrame<'a> {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => panic!("invariant violation: binding with no open scope"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use symsub_ast::node::NodeData;
    use symsub_ast::syntax_kind::SyntaxKind;
    use symsub_core::intern::StringInterner;

    fn literal(kind: SyntaxKind) -> Expression<'static> {
        let data = NodeData::new(kind, 0, 0);
        match kind {
            SyntaxKind::TrueKeyword => Expression::TrueKeyword(data),
            SyntaxKind::FalseKeyword => Expression::FalseKeyword(data),
            _ => Expression::NullKeyword(data),
        }
    }

    #[test]
    fn test_resolve_prefers_innermost_frame() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let outer = literal(SyntaxKind::TrueKeyword);
        let inner = literal(SyntaxKind::FalseKeyword);

        let mut stack = ScopeStack::new();
        stack.push_frame(FrameKind::Program);
        stack.bind(x, &outer);
        stack.push_frame(FrameKind::Block);
        stack.bind(x, &inner);
        assert!(matches!(stack.resolve(x), Some(Expression::FalseKeyword(_))));

        stack.pop_frame();
        assert!(matches!(stack.resolve(x), Some(Expression::TrueKeyword(_))));
    }

    #[test]
    fn test_unbound_name_is_absent() {
        let interner = StringInterner::new();
        let mut stack = ScopeStack::new();
        stack.push_frame(FrameKind::Program);
        assert!(stack.resolve(interner.intern("free")).is_none());
    }

    #[test]
    fn test_rebinding_overwrites_in_same_frame() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let first = literal(SyntaxKind::TrueKeyword);
        let second = literal(SyntaxKind::NullKeyword);

        let mut stack = ScopeStack::new();
        stack.push_frame(FrameKind::Program);
        stack.bind(x, &first);
        stack.bind(x, &second);
        assert!(matches!(stack.resolve(x), Some(Expression::NullKeyword(_))));
        assert_eq!(stack.innermost().map(BindingFrame::len), Some(1));
    }

    #[test]
    fn test_declared_names_do_not_resolve() {
        let interner = StringInterner::new();
        let x = interner.intern("x");
        let mut stack = ScopeStack::new();
        stack.push_frame(FrameKind::Program);
        stack.declare(x);
        assert!(stack.resolve(x).is_none());
        let names: Vec<_> = stack.root().map(|f| f.names().collect()).unwrap_or_default();
        assert_eq!(names, vec![x]);
    }

    #[test]
    #[should_panic(expected = "empty scope stack")]
    fn test_pop_empty_stack_panics() {
        let mut stack = ScopeStack::new();
        stack.pop_frame();
    }

    #[test]
    #[should_panic(expected = "no open scope")]
    fn test_resolve_without_frame_panics() {
        let interner = StringInterner::new();
        let stack = ScopeStack::new();
        stack.resolve(interner.intern("x"));
    }
}
