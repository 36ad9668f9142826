//! Syntax node definitions.
//!
//! Nodes reference child nodes via arena-allocated references. Every node
//! carries a [`NodeData`] with its kind, its `[pos, end)` byte range in the
//! source text and its flags. The verbatim source a node spans is recovered
//! with [`SourceFile::text_of`].

use crate::syntax_kind::SyntaxKind;
use crate::types::*;
use symsub_core::intern::InternedString;
use symsub_core::text::TextRange;

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all syntax nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeData {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub flags: NodeFlags,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
            flags: NodeFlags::NONE,
        }
    }

    /// Data for a node built by a rewrite pass.
    pub fn synthesized(kind: SyntaxKind) -> Self {
        Self {
            kind,
            range: TextRange::empty(0),
            flags: NodeFlags::SYNTHESIZED,
        }
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn is_synthesized(&self) -> bool {
        self.flags.contains(NodeFlags::SYNTHESIZED)
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

/// An optional arena-allocated node.
pub type OptionalNode<'a, T> = Option<&'a T>;

// ============================================================================
// Source File
// ============================================================================

#[derive(Debug)]
pub struct SourceFile<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Statement<'a>>,
    pub file_name: String,
    pub text: String,
}

impl<'a> SourceFile<'a> {
    /// The verbatim source substring a range spans.
    pub fn text_of(&self, range: TextRange) -> &str {
        range.slice(&self.text)
    }
}

// ============================================================================
// Token
// ============================================================================

/// A simple token with kind and range.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub data: NodeData,
}

impl Token {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            data: NodeData::new(kind, pos, end),
        }
    }

    pub fn synthesized(kind: SyntaxKind) -> Self {
        Self {
            data: NodeData::synthesized(kind),
        }
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }
}

// ============================================================================
// Identifier
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct Identifier<'a> {
    pub data: NodeData,
    /// Interned name, used for scope lookups.
    pub text: InternedString,
    /// The name as written.
    pub text_name: &'a str,
}

impl<'a> Identifier<'a> {
    /// Whether this identifier was produced by error recovery.
    pub fn is_missing(&self) -> bool {
        self.text_name.is_empty()
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug)]
pub enum Expression<'a> {
    Identifier(Identifier<'a>),
    NumericLiteral(NumericLiteral<'a>),
    StringLiteral(StringLiteral<'a>),
    Parenthesized(ParenthesizedExpression<'a>),
    Call(CallExpression<'a>),
    PrefixUnary(PrefixUnaryExpression<'a>),
    Binary(BinaryExpression<'a>),
    Assignment(AssignmentExpression<'a>),
    // Keyword expressions
    NullKeyword(NodeData),
    TrueKeyword(NodeData),
    FalseKeyword(NodeData),
}

impl<'a> Expression<'a> {
    /// Look through any number of enclosing parentheses.
    pub fn skip_parentheses(&self) -> &Expression<'a> {
        let mut expr = self;
        while let Expression::Parenthesized(paren) = expr {
            expr = paren.expression;
        }
        expr
    }

    pub fn as_identifier(&self) -> Option<&Identifier<'a>> {
        match self {
            Expression::Identifier(id) => Some(id),
            _ => None,
        }
    }
}

// -- Literal Expressions --

#[derive(Debug, Clone, Copy)]
pub struct NumericLiteral<'a> {
    pub data: NodeData,
    /// The literal as written, e.g. `0x1F` or `1e3`.
    pub text: &'a str,
    pub value: f64,
    pub numeric_literal_flags: TokenFlags,
}

#[derive(Debug, Clone, Copy)]
pub struct StringLiteral<'a> {
    pub data: NodeData,
    /// The literal's value with escapes resolved.
    pub text: &'a str,
    pub is_single_quote: bool,
}

// -- Compound Expressions --

#[derive(Debug)]
pub struct ParenthesizedExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct CallExpression<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub arguments: NodeList<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct PrefixUnaryExpression<'a> {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub operand: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct BinaryExpression<'a> {
    pub data: NodeData,
    pub left: &'a Expression<'a>,
    pub operator_token: Token,
    pub right: &'a Expression<'a>,
}

/// `target = value` or a compound form such as `target += value`.
///
/// Only plain identifiers can be assigned to.
#[derive(Debug)]
pub struct AssignmentExpression<'a> {
    pub data: NodeData,
    pub target: Identifier<'a>,
    pub operator_token: Token,
    pub value: &'a Expression<'a>,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug)]
pub enum Statement<'a> {
    VariableStatement(VariableStatement<'a>),
    FunctionDeclaration(FunctionDeclaration<'a>),
    Block(Block<'a>),
    EmptyStatement(NodeData),
    ExpressionStatement(ExpressionStatement<'a>),
    IfStatement(IfStatement<'a>),
    DoStatement(DoStatement<'a>),
    WhileStatement(WhileStatement<'a>),
    ForStatement(ForStatement<'a>),
    ContinueStatement(NodeData),
    BreakStatement(NodeData),
    ReturnStatement(ReturnStatement<'a>),
}

#[derive(Debug)]
pub struct Block<'a> {
    pub data: NodeData,
    pub statements: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct VariableStatement<'a> {
    pub data: NodeData,
    pub declaration_list: VariableDeclarationList<'a>,
}

/// `let a = 1, b`. The `let`/`const` keyword is recorded in the flags.
#[derive(Debug)]
pub struct VariableDeclarationList<'a> {
    pub data: NodeData,
    pub declarations: NodeList<'a, VariableDeclaration<'a>>,
}

impl<'a> VariableDeclarationList<'a> {
    pub fn variable_kind(&self) -> VariableKind {
        VariableKind::from_flags(self.data.flags)
    }
}

#[derive(Debug)]
pub struct VariableDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub initializer: OptionalNode<'a, Expression<'a>>,
}

#[derive(Debug)]
pub struct ExpressionStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

impl<'a> ExpressionStatement<'a> {
    /// The assignment this statement consists of, if it is one.
    pub fn as_assignment(&self) -> Option<&AssignmentExpression<'a>> {
        match self.expression {
            Expression::Assignment(assignment) => Some(assignment),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct IfStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub then_statement: &'a Statement<'a>,
    pub else_statement: OptionalNode<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct DoStatement<'a> {
    pub data: NodeData,
    pub statement: &'a Statement<'a>,
    pub expression: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct WhileStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
    pub statement: &'a Statement<'a>,
}

#[derive(Debug)]
pub struct ForStatement<'a> {
    pub data: NodeData,
    pub initializer: Option<ForInitializer<'a>>,
    pub condition: OptionalNode<'a, Expression<'a>>,
    pub incrementor: OptionalNode<'a, Expression<'a>>,
    pub statement: &'a Statement<'a>,
}

#[derive(Debug)]
pub enum ForInitializer<'a> {
    VariableDeclarationList(VariableDeclarationList<'a>),
    Expression(&'a Expression<'a>),
}

#[derive(Debug)]
pub struct ReturnStatement<'a> {
    pub data: NodeData,
    pub expression: OptionalNode<'a, Expression<'a>>,
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug)]
pub struct ParameterDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
}

#[derive(Debug)]
pub struct FunctionDeclaration<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub parameters: NodeList<'a, ParameterDeclaration<'a>>,
    pub body: Block<'a>,
}
