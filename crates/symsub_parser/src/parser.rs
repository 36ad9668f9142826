//! The parser implementation.
//!
//! A recursive descent parser over the scanner's token stream. Nodes are
//! allocated in the caller's bump arena and carry exact byte ranges: a node
//! ends where the last token it consumed ends, never at the start of the
//! following token.

use bumpalo::collections::Vec as BumpVec;
use bumpalo::Bump;
use symsub_ast::node::*;
use symsub_ast::precedence::{get_binary_operator_precedence, is_right_associative};
use symsub_ast::syntax_kind::SyntaxKind;
use symsub_ast::types::*;
use symsub_ast::OperatorPrecedence;
use symsub_core::intern::StringInterner;
use symsub_core::text::{TextRange, TextSpan};
use symsub_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use symsub_scanner::{parse_numeric_literal, Scanner};

use crate::utilities::{can_start_statement, is_list_terminator, unsupported_construct_name};

/// Maximum nesting depth of statements and expressions before the parser
/// gives up on a file. Each nested statement, block, unary operand,
/// parenthesized expression and folded binary operator counts one level.
pub const MAX_RECURSION_DEPTH: u32 = 200;

/// The parser converts tokens into a syntax tree.
pub struct Parser<'a> {
    arena: &'a Bump,
    scanner: Scanner<'a>,
    interner: StringInterner,
    file_name: String,
    source_text: &'a str,
    diagnostics: DiagnosticCollection,
    /// End of the most recently consumed token.
    last_token_end: u32,
    recursion_depth: u32,
    /// Set once the nesting limit is hit; later errors are suppressed.
    nesting_overflowed: bool,
}

impl<'a> Parser<'a> {
    pub fn new(
        arena: &'a Bump,
        interner: &StringInterner,
        file_name: impl Into<String>,
        source_text: &'a str,
    ) -> Self {
        let mut scanner = Scanner::new(source_text);
        scanner.scan();
        Self {
            arena,
            scanner,
            interner: interner.clone(),
            file_name: file_name.into(),
            source_text,
            diagnostics: DiagnosticCollection::new(),
            last_token_end: 0,
            recursion_depth: 0,
            nesting_overflowed: false,
        }
    }

    /// Parse the whole source text.
    pub fn parse_source_file(&mut self) -> SourceFile<'a> {
        let statements = self.parse_statement_list(true);
        let end = self.source_text.len() as u32;
        tracing::debug!(
            file = %self.file_name,
            statements = statements.len(),
            errors = self.diagnostics.error_count(),
            "parsed source file"
        );
        SourceFile {
            data: NodeData::new(SyntaxKind::SourceFile, 0, end),
            statements,
            file_name: self.file_name.clone(),
            text: self.source_text.to_string(),
        }
    }

    /// Scanner and parser diagnostics, ordered by position.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        let mut all = DiagnosticCollection::new();
        let file_name = &self.file_name;
        all.extend(self.scanner.take_diagnostics().into_diagnostics().into_iter().map(
            |mut diagnostic| {
                diagnostic.file.get_or_insert_with(|| file_name.clone());
                diagnostic
            },
        ));
        all.extend(std::mem::take(&mut self.diagnostics).into_diagnostics());
        all.sort();
        all
    }

    // ========================================================================
    // Token helpers
    // ========================================================================

    #[inline]
    fn current_token(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    fn token_pos(&self) -> u32 {
        self.scanner.token_start()
    }

    #[inline]
    fn token_end(&self) -> u32 {
        self.scanner.token_end()
    }

    fn next_token(&mut self) -> SyntaxKind {
        self.last_token_end = self.scanner.token_end();
        self.scanner.scan()
    }

    fn optional_token(&mut self, kind: SyntaxKind) -> bool {
        if self.current_token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn expect_token(&mut self, kind: SyntaxKind) -> bool {
        if self.optional_token(kind) {
            return true;
        }
        let text = kind.token_text().unwrap_or("token");
        self.error(&messages::_0_EXPECTED, &[text]);
        false
    }

    /// Consume a statement terminator, applying automatic semicolon insertion:
    /// the `;` may be omitted before `}`, at end of input, or when the next
    /// token is on a new line.
    fn parse_expected_semicolon(&mut self) {
        if self.optional_token(SyntaxKind::SemicolonToken) {
            return;
        }
        let can_insert = matches!(
            self.current_token(),
            SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.scanner.has_preceding_line_break();
        if !can_insert {
            self.error(&messages::_0_EXPECTED, &[";"]);
        }
    }

    fn error(&mut self, msg: &DiagnosticMessage, args: &[&str]) {
        let range = TextRange::new(self.token_pos(), self.token_end());
        self.error_at(range, msg, args);
    }

    fn error_at(&mut self, range: TextRange, msg: &DiagnosticMessage, args: &[&str]) {
        if self.nesting_overflowed {
            return;
        }
        self.diagnostics.add(Diagnostic::with_location(
            self.file_name.clone(),
            TextSpan::from_bounds(range.pos, range.end),
            msg,
            args,
        ));
    }

    fn unsupported(&mut self, kind: SyntaxKind) {
        self.error(&messages::UNSUPPORTED_SYNTAX_0, &[unsupported_construct_name(kind)]);
    }

    fn alloc<T>(&self, value: T) -> &'a T {
        self.arena.alloc(value)
    }

    // ========================================================================
    // Statement parsing
    // ========================================================================

    fn parse_statement_list(&mut self, is_top_level: bool) -> &'a [Statement<'a>] {
        let mut statements = BumpVec::new_in(self.arena);
        let mut unreachable_reported = false;
        let mut exited = false;

        loop {
            match self.current_token() {
                SyntaxKind::EndOfFileToken => break,
                SyntaxKind::CloseBraceToken if !is_top_level => break,
                SyntaxKind::CloseBraceToken => {
                    self.error(&messages::DECLARATION_OR_STATEMENT_EXPECTED, &[]);
                    self.next_token();
                    continue;
                }
                _ => {}
            }

            let saved_pos = self.token_pos();
            let stmt = self.parse_statement();

            if exited && !unreachable_reported && !matches!(stmt, Statement::FunctionDeclaration(_)) {
                self.error_at(stmt.range(), &messages::UNREACHABLE_CODE_DETECTED, &[]);
                unreachable_reported = true;
            }
            if matches!(
                stmt,
                Statement::ReturnStatement(_) | Statement::BreakStatement(_) | Statement::ContinueStatement(_)
            ) {
                exited = true;
            }
            statements.push(stmt);

            if self.token_pos() == saved_pos {
                self.skip_to_next_statement();
            }
        }

        statements.into_bump_slice()
    }

    /// Error recovery: skip at least one token, then up to a token that can
    /// start a new statement.
    fn skip_to_next_statement(&mut self) {
        if self.current_token() == SyntaxKind::EndOfFileToken {
            return;
        }
        self.next_token();
        while self.current_token() != SyntaxKind::EndOfFileToken
            && !can_start_statement(self.current_token())
        {
            self.next_token();
        }
    }

    fn parse_statement(&mut self) -> Statement<'a> {
        if !self.enter_nesting() {
            return Statement::EmptyStatement(
                NodeData::new(SyntaxKind::EmptyStatement, self.last_token_end, self.last_token_end)
                    .with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
            );
        }
        let stmt = self.parse_statement_worker();
        self.recursion_depth -= 1;
        stmt
    }

    fn parse_statement_worker(&mut self) -> Statement<'a> {
        match self.current_token() {
            SyntaxKind::SemicolonToken => {
                let pos = self.token_pos();
                self.next_token();
                Statement::EmptyStatement(NodeData::new(SyntaxKind::EmptyStatement, pos, self.last_token_end))
            }
            SyntaxKind::OpenBraceToken => Statement::Block(self.parse_block()),
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => {
                self.parse_variable_statement()
            }
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => self.parse_break_or_continue_statement(),
            kind if kind.is_keyword() && !kind.is_supported_keyword() => {
                let pos = self.token_pos();
                self.unsupported(kind);
                self.skip_to_next_statement();
                Statement::EmptyStatement(
                    NodeData::new(SyntaxKind::EmptyStatement, pos, self.last_token_end)
                        .with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
                )
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_block(&mut self) -> Block<'a> {
        let pos = self.token_pos();
        self.expect_token(SyntaxKind::OpenBraceToken);
        let statements = if self.enter_nesting() {
            let statements = self.parse_statement_list(false);
            self.recursion_depth -= 1;
            statements
        } else {
            &[]
        };
        self.expect_token(SyntaxKind::CloseBraceToken);
        Block {
            data: NodeData::new(SyntaxKind::Block, pos, self.last_token_end),
            statements,
        }
    }

    fn parse_variable_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        let declaration_list = self.parse_variable_declaration_list();
        self.parse_expected_semicolon();
        Statement::VariableStatement(VariableStatement {
            data: NodeData::new(SyntaxKind::VariableStatement, pos, self.last_token_end),
            declaration_list,
        })
    }

    fn parse_variable_declaration_list(&mut self) -> VariableDeclarationList<'a> {
        let pos = self.token_pos();
        let kind = match self.current_token() {
            SyntaxKind::LetKeyword => VariableKind::Let,
            SyntaxKind::ConstKeyword => VariableKind::Const,
            _ => VariableKind::Var,
        };
        self.next_token();

        let mut declarations = BumpVec::new_in(self.arena);
        loop {
            if self.current_token() != SyntaxKind::Identifier {
                self.error(&messages::VARIABLE_DECLARATION_EXPECTED, &[]);
                break;
            }
            let declaration = self.parse_variable_declaration();
            if kind == VariableKind::Const && declaration.initializer.is_none() {
                self.error_at(declaration.data.range, &messages::CONST_DECLARATIONS_MUST_BE_INITIALIZED, &[]);
            }
            declarations.push(declaration);
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }

        VariableDeclarationList {
            data: NodeData::new(SyntaxKind::VariableDeclarationList, pos, self.last_token_end)
                .with_flags(kind.flags()),
            declarations: declarations.into_bump_slice(),
        }
    }

    fn parse_variable_declaration(&mut self) -> VariableDeclaration<'a> {
        let pos = self.token_pos();
        let name = self.parse_binding_identifier();
        let initializer = if self.optional_token(SyntaxKind::EqualsToken) {
            Some(self.parse_assignment_expression_and_alloc())
        } else {
            None
        };
        VariableDeclaration {
            data: NodeData::new(SyntaxKind::VariableDeclaration, pos, self.last_token_end),
            name,
            initializer,
        }
    }

    fn parse_function_declaration(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token(); // function
        let name = self.parse_binding_identifier();

        self.expect_token(SyntaxKind::OpenParenToken);
        let mut parameters = BumpVec::new_in(self.arena);
        while self.current_token() != SyntaxKind::CloseParenToken
            && self.current_token() != SyntaxKind::EndOfFileToken
        {
            let param_pos = self.token_pos();
            let param_name = self.parse_binding_identifier();
            if self.current_token() == SyntaxKind::EqualsToken {
                self.error(&messages::UNSUPPORTED_SYNTAX_0, &["parameter initializer"]);
                self.next_token();
                self.parse_assignment_expression();
            }
            parameters.push(ParameterDeclaration {
                data: NodeData::new(SyntaxKind::Parameter, param_pos, self.last_token_end),
                name: param_name,
            });
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken);

        let body = self.parse_block();
        Statement::FunctionDeclaration(FunctionDeclaration {
            data: NodeData::new(SyntaxKind::FunctionDeclaration, pos, self.last_token_end),
            name,
            parameters: parameters.into_bump_slice(),
            body,
        })
    }

    /// Parse a parenthesized condition. The returned expression's range
    /// covers only what is between the parentheses.
    fn parse_parenthesized_condition(&mut self) -> &'a Expression<'a> {
        self.expect_token(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression_and_alloc();
        self.expect_token(SyntaxKind::CloseParenToken);
        expression
    }

    fn parse_if_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token(); // if
        let expression = self.parse_parenthesized_condition();
        let then_statement = self.parse_statement();
        let then_statement = self.alloc(then_statement);
        let else_statement = if self.optional_token(SyntaxKind::ElseKeyword) {
            let stmt = self.parse_statement();
            Some(self.alloc(stmt))
        } else {
            None
        };
        Statement::IfStatement(IfStatement {
            data: NodeData::new(SyntaxKind::IfStatement, pos, self.last_token_end),
            expression,
            then_statement,
            else_statement,
        })
    }

    fn parse_do_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token(); // do
        let statement = self.parse_statement();
        let statement = self.alloc(statement);
        self.expect_token(SyntaxKind::WhileKeyword);
        let expression = self.parse_parenthesized_condition();
        // A semicolon is always insertable after do-while.
        self.optional_token(SyntaxKind::SemicolonToken);
        Statement::DoStatement(DoStatement {
            data: NodeData::new(SyntaxKind::DoStatement, pos, self.last_token_end),
            statement,
            expression,
        })
    }

    fn parse_while_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token(); // while
        let expression = self.parse_parenthesized_condition();
        let statement = self.parse_statement();
        Statement::WhileStatement(WhileStatement {
            data: NodeData::new(SyntaxKind::WhileStatement, pos, self.last_token_end),
            expression,
            statement: self.alloc(statement),
        })
    }

    fn parse_for_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token(); // for
        self.expect_token(SyntaxKind::OpenParenToken);

        let initializer = match self.current_token() {
            SyntaxKind::SemicolonToken => None,
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword | SyntaxKind::ConstKeyword => Some(
                ForInitializer::VariableDeclarationList(self.parse_variable_declaration_list()),
            ),
            _ => Some(ForInitializer::Expression(self.parse_expression_and_alloc())),
        };
        if self.current_token() == SyntaxKind::InKeyword {
            self.error(&messages::UNSUPPORTED_SYNTAX_0, &["for-in"]);
        }
        self.expect_token(SyntaxKind::SemicolonToken);

        let condition = if self.current_token() != SyntaxKind::SemicolonToken {
            Some(self.parse_expression_and_alloc())
        } else {
            None
        };
        self.expect_token(SyntaxKind::SemicolonToken);

        let incrementor = if self.current_token() != SyntaxKind::CloseParenToken {
            Some(self.parse_expression_and_alloc())
        } else {
            None
        };
        self.expect_token(SyntaxKind::CloseParenToken);

        let statement = self.parse_statement();
        Statement::ForStatement(ForStatement {
            data: NodeData::new(SyntaxKind::ForStatement, pos, self.last_token_end),
            initializer,
            condition,
            incrementor,
            statement: self.alloc(statement),
        })
    }

    fn parse_return_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        self.next_token(); // return
        let has_expression = !matches!(
            self.current_token(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) && !self.scanner.has_preceding_line_break();
        let expression = if has_expression {
            Some(self.parse_expression_and_alloc())
        } else {
            None
        };
        self.parse_expected_semicolon();
        Statement::ReturnStatement(ReturnStatement {
            data: NodeData::new(SyntaxKind::ReturnStatement, pos, self.last_token_end),
            expression,
        })
    }

    fn parse_break_or_continue_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        let is_break = self.current_token() == SyntaxKind::BreakKeyword;
        self.next_token();
        if self.current_token() == SyntaxKind::Identifier && !self.scanner.has_preceding_line_break() {
            self.error(&messages::UNSUPPORTED_SYNTAX_0, &["label"]);
            self.next_token();
        }
        self.parse_expected_semicolon();
        if is_break {
            Statement::BreakStatement(NodeData::new(SyntaxKind::BreakStatement, pos, self.last_token_end))
        } else {
            Statement::ContinueStatement(NodeData::new(SyntaxKind::ContinueStatement, pos, self.last_token_end))
        }
    }

    fn parse_expression_statement(&mut self) -> Statement<'a> {
        let pos = self.token_pos();
        let expression = self.parse_expression_and_alloc();
        self.parse_expected_semicolon();
        Statement::ExpressionStatement(ExpressionStatement {
            data: NodeData::new(SyntaxKind::ExpressionStatement, pos, self.last_token_end),
            expression,
        })
    }

    // ========================================================================
    // Expression parsing
    // ========================================================================

    fn parse_expression_and_alloc(&mut self) -> &'a Expression<'a> {
        let expr = self.parse_expression();
        self.alloc(expr)
    }

    fn parse_assignment_expression_and_alloc(&mut self) -> &'a Expression<'a> {
        let expr = self.parse_assignment_expression();
        self.alloc(expr)
    }

    fn parse_expression(&mut self) -> Expression<'a> {
        let expr = self.parse_assignment_expression();
        if self.current_token() == SyntaxKind::CommaToken {
            self.unsupported(SyntaxKind::CommaToken);
            while self.optional_token(SyntaxKind::CommaToken) {
                self.parse_assignment_expression();
            }
        }
        expr
    }

    /// Bump the nesting depth; false once the limit is exceeded.
    fn enter_nesting(&mut self) -> bool {
        if self.nesting_overflowed {
            return false;
        }
        if self.recursion_depth >= MAX_RECURSION_DEPTH {
            self.error(&messages::CODE_NESTED_TOO_DEEPLY, &[]);
            self.nesting_overflowed = true;
            // Nothing after this point can be trusted; stop at end of input.
            while self.current_token() != SyntaxKind::EndOfFileToken {
                self.next_token();
            }
            return false;
        }
        self.recursion_depth += 1;
        true
    }

    fn parse_assignment_expression(&mut self) -> Expression<'a> {
        if !self.enter_nesting() {
            return self.missing_expression();
        }
        let expr = self.parse_assignment_expression_worker();
        self.recursion_depth -= 1;
        expr
    }

    fn parse_assignment_expression_worker(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let expr = self.parse_binary_expression(OperatorPrecedence::Comma);

        match self.current_token() {
            SyntaxKind::QuestionToken | SyntaxKind::EqualsGreaterThanToken => {
                self.unsupported(self.current_token());
                self.next_token();
                self.parse_assignment_expression();
                return expr;
            }
            kind if kind.is_assignment_operator() => {}
            _ => return expr,
        }

        let operator_token = Token::new(self.current_token(), self.token_pos(), self.token_end());
        let target = match expr.skip_parentheses() {
            Expression::Identifier(id) => *id,
            other => {
                let range = other.range();
                self.error_at(range, &messages::THE_LEFT_HAND_SIDE_OF_AN_ASSIGNMENT_MUST_BE_A_VARIABLE, &[]);
                self.missing_identifier(range.pos)
            }
        };
        self.next_token();
        let value = self.parse_assignment_expression_and_alloc();

        Expression::Assignment(AssignmentExpression {
            data: NodeData::new(SyntaxKind::AssignmentExpression, pos, self.last_token_end),
            target,
            operator_token,
            value,
        })
    }

    /// Precedence climbing: folds operators binding tighter than
    /// `min_precedence` into `left`.
    ///
    /// Every fold deepens the tree by one level, so each one is charged
    /// against the nesting limit until the whole chain is built.
    fn parse_binary_expression(&mut self, min_precedence: OperatorPrecedence) -> Expression<'a> {
        let pos = self.token_pos();
        let mut left = self.parse_unary_expression();
        let mut folded = 0;

        loop {
            let operator = self.current_token();
            let precedence = get_binary_operator_precedence(operator);
            if precedence == OperatorPrecedence::Invalid || precedence <= min_precedence {
                break;
            }
            if !self.enter_nesting() {
                break;
            }
            folded += 1;

            let operator_token = Token::new(operator, self.token_pos(), self.token_end());
            self.next_token();

            // `**` groups to the right: its right operand may itself contain `**`.
            let right_precedence = if is_right_associative(operator) {
                OperatorPrecedence::Multiplicative
            } else {
                precedence
            };
            let right = self.parse_binary_expression(right_precedence);

            if operator == SyntaxKind::QuestionQuestionToken && (is_logical(&left) || is_logical(&right)) {
                self.error_at(
                    operator_token.data.range,
                    &messages::UNSUPPORTED_SYNTAX_0,
                    &[unsupported_construct_name(operator)],
                );
            }

            left = Expression::Binary(BinaryExpression {
                data: NodeData::new(SyntaxKind::BinaryExpression, pos, self.last_token_end),
                left: self.alloc(left),
                operator_token,
                right: self.alloc(right),
            });
        }

        self.recursion_depth -= folded;
        left
    }

    fn parse_unary_expression(&mut self) -> Expression<'a> {
        if !self.enter_nesting() {
            return self.missing_expression();
        }
        let expr = self.parse_unary_expression_worker();
        self.recursion_depth -= 1;
        expr
    }

    fn parse_unary_expression_worker(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        match self.current_token() {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::TildeToken => {
                let operator = self.current_token();
                self.next_token();
                let operand = self.parse_unary_expression();
                Expression::PrefixUnary(PrefixUnaryExpression {
                    data: NodeData::new(SyntaxKind::PrefixUnaryExpression, pos, self.last_token_end),
                    operator,
                    operand: self.alloc(operand),
                })
            }
            SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                self.unsupported(self.current_token());
                self.next_token();
                self.parse_unary_expression()
            }
            _ => {
                let expr = self.parse_left_hand_side_expression();
                if matches!(self.current_token(), SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
                    && !self.scanner.has_preceding_line_break()
                {
                    self.unsupported(self.current_token());
                    self.next_token();
                }
                expr
            }
        }
    }

    fn parse_left_hand_side_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let mut expr = self.parse_primary_expression();

        loop {
            match self.current_token() {
                SyntaxKind::OpenParenToken => {
                    let arguments = self.parse_argument_list();
                    expr = Expression::Call(CallExpression {
                        data: NodeData::new(SyntaxKind::CallExpression, pos, self.last_token_end),
                        expression: self.alloc(expr),
                        arguments,
                    });
                }
                SyntaxKind::DotToken => {
                    self.unsupported(SyntaxKind::DotToken);
                    self.next_token();
                    if self.current_token() == SyntaxKind::Identifier || self.current_token().is_keyword() {
                        self.next_token();
                    }
                }
                SyntaxKind::OpenBracketToken => {
                    self.unsupported(SyntaxKind::OpenBracketToken);
                    self.next_token();
                    self.parse_expression();
                    self.expect_token(SyntaxKind::CloseBracketToken);
                }
                _ => break,
            }
        }

        expr
    }

    fn parse_argument_list(&mut self) -> &'a [Expression<'a>] {
        self.expect_token(SyntaxKind::OpenParenToken);
        let mut arguments = BumpVec::new_in(self.arena);
        while self.current_token() != SyntaxKind::CloseParenToken
            && self.current_token() != SyntaxKind::EndOfFileToken
        {
            arguments.push(self.parse_assignment_expression());
            if !self.optional_token(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect_token(SyntaxKind::CloseParenToken);
        arguments.into_bump_slice()
    }

    fn parse_primary_expression(&mut self) -> Expression<'a> {
        let pos = self.token_pos();
        let end = self.token_end();
        match self.current_token() {
            SyntaxKind::Identifier => Expression::Identifier(self.parse_identifier()),
            SyntaxKind::NumericLiteral => {
                let text = self.scanner.token_text();
                let numeric_literal_flags = self.scanner.token_flags() & TokenFlags::NUMERIC_LITERAL_FLAGS;
                self.next_token();
                Expression::NumericLiteral(NumericLiteral {
                    data: NodeData::new(SyntaxKind::NumericLiteral, pos, end),
                    text,
                    value: parse_numeric_literal(text),
                    numeric_literal_flags,
                })
            }
            SyntaxKind::StringLiteral => {
                let text = self.arena.alloc_str(self.scanner.token_value());
                let is_single_quote = self.scanner.token_flags().contains(TokenFlags::SINGLE_QUOTE);
                self.next_token();
                Expression::StringLiteral(StringLiteral {
                    data: NodeData::new(SyntaxKind::StringLiteral, pos, end),
                    text,
                    is_single_quote,
                })
            }
            SyntaxKind::TrueKeyword => {
                self.next_token();
                Expression::TrueKeyword(NodeData::new(SyntaxKind::TrueKeyword, pos, end))
            }
            SyntaxKind::FalseKeyword => {
                self.next_token();
                Expression::FalseKeyword(NodeData::new(SyntaxKind::FalseKeyword, pos, end))
            }
            SyntaxKind::NullKeyword => {
                self.next_token();
                Expression::NullKeyword(NodeData::new(SyntaxKind::NullKeyword, pos, end))
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let expression = self.parse_expression_and_alloc();
                self.expect_token(SyntaxKind::CloseParenToken);
                Expression::Parenthesized(ParenthesizedExpression {
                    data: NodeData::new(SyntaxKind::ParenthesizedExpression, pos, self.last_token_end),
                    expression,
                })
            }
            SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken | SyntaxKind::FunctionKeyword => {
                let kind = self.current_token();
                let name = if kind == SyntaxKind::OpenBracketToken {
                    "array literal"
                } else {
                    unsupported_construct_name(kind)
                };
                self.error(&messages::UNSUPPORTED_SYNTAX_0, &[name]);
                self.next_token();
                self.missing_expression()
            }
            kind if kind.is_keyword() && !kind.is_supported_keyword() => {
                self.unsupported(kind);
                self.next_token();
                self.missing_expression()
            }
            kind => {
                self.error(&messages::EXPRESSION_EXPECTED, &[]);
                if !is_list_terminator(kind) {
                    self.next_token();
                }
                self.missing_expression()
            }
        }
    }

    fn parse_identifier(&mut self) -> Identifier<'a> {
        let pos = self.token_pos();
        let end = self.token_end();
        let text_name = self.scanner.token_text();
        let text = self.interner.intern(text_name);
        self.next_token();
        Identifier {
            data: NodeData::new(SyntaxKind::Identifier, pos, end),
            text,
            text_name,
        }
    }

    /// Parse the name in a declaration or parameter list.
    fn parse_binding_identifier(&mut self) -> Identifier<'a> {
        if self.current_token() == SyntaxKind::Identifier {
            return self.parse_identifier();
        }
        let pos = self.token_pos();
        self.error(&messages::IDENTIFIER_EXPECTED, &[]);
        if !is_list_terminator(self.current_token()) {
            self.next_token();
        }
        self.missing_identifier(pos)
    }

    fn missing_identifier(&self, pos: u32) -> Identifier<'a> {
        Identifier {
            data: NodeData::new(SyntaxKind::Identifier, pos, pos).with_flags(NodeFlags::THIS_NODE_HAS_ERROR),
            text: self.interner.intern(""),
            text_name: "",
        }
    }

    fn missing_expression(&self) -> Expression<'a> {
        Expression::Identifier(self.missing_identifier(self.token_pos()))
    }
}

/// An unparenthesized `&&` or `||`, which may not be mixed with `??`.
fn is_logical(expr: &Expression<'_>) -> bool {
    matches!(
        expr,
        Expression::Binary(binary) if matches!(
            binary.operator_token.kind(),
            SyntaxKind::AmpersandAmpersandToken | SyntaxKind::BarBarToken
        )
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (usize, DiagnosticCollection) {
        let arena = Bump::new();
        let interner = StringInterner::new();
        let mut parser = Parser::new(&arena, &interner, "test.js", text);
        let file = parser.parse_source_file();
        (file.statements.len(), parser.take_diagnostics())
    }

    #[test]
    fn test_empty_source() {
        let (count, diagnostics) = parse("");
        assert_eq!(count, 0);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_diagnostics_carry_file_name() {
        let (_, diagnostics) = parse("let x = 'open");
        assert!(diagnostics.has_errors());
        assert!(diagnostics
            .diagnostics()
            .iter()
            .all(|d| d.file.as_deref() == Some("test.js")));
    }

    #[test]
    fn test_nesting_limit_reports_once() {
        let depth = MAX_RECURSION_DEPTH as usize + 50;
        let text = format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth));
        let (_, diagnostics) = parse(&text);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.diagnostics()[0].code, messages::CODE_NESTED_TOO_DEEPLY.code);
    }

    #[test]
    fn test_moderate_nesting_is_fine() {
        let text = format!("x = {}1{};", "(".repeat(50), ")".repeat(50));
        let (count, diagnostics) = parse(&text);
        assert_eq!(count, 1);
        assert!(diagnostics.is_empty());
    }
}
