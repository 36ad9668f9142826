//! Symbolic substitution.
//!
//! Folds a program into a new tree. Identifier reads are replaced by the
//! expression most recently bound to them in an enclosing scope, and block
//! statements that only bind locals are dropped once every later read has
//! been rewritten. Assignments to parameters and program-level names are
//! kept since their effect is visible outside the function.
//!
//! Unchanged leaves of the input tree are shared with the output rather
//! than copied. Both trees live in the same arena.

use bumpalo::Bump;
use symsub_ast::node::*;
use symsub_binder::Binder;
use symsub_core::alloc_vec_in;

use crate::Transformer;

pub struct SymbolicSubstitution<'a> {
    arena: &'a Bump,
    binder: Binder<'a>,
    dropped_statements: usize,
}

impl<'a> SymbolicSubstitution<'a> {
    pub fn new(arena: &'a Bump) -> Self {
        Self {
            arena,
            binder: Binder::new(arena),
            dropped_statements: 0,
        }
    }

    /// Statements removed by the last [`Transformer::transform`] call.
    pub fn dropped_statements(&self) -> usize {
        self.dropped_statements
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn fold_statement(&mut self, stmt: &'a Statement<'a>) -> Statement<'a> {
        match stmt {
            Statement::VariableStatement(n) => Statement::VariableStatement(VariableStatement {
                data: n.data,
                declaration_list: self.fold_declaration_list(&n.declaration_list),
            }),
            Statement::FunctionDeclaration(n) => Statement::FunctionDeclaration(self.fold_function(n)),
            Statement::Block(n) => Statement::Block(self.fold_block(n)),
            Statement::EmptyStatement(data) => Statement::EmptyStatement(*data),
            Statement::ExpressionStatement(n) => Statement::ExpressionStatement(ExpressionStatement {
                data: n.data,
                expression: self.fold_expression(n.expression),
            }),
            Statement::IfStatement(n) => {
                let expression = self.fold_expression(n.expression);
                let then_statement = self.fold_nested(n.then_statement);
                let else_statement = n.else_statement.map(|stmt| self.fold_nested(stmt));
                Statement::IfStatement(IfStatement {
                    data: n.data,
                    expression,
                    then_statement,
                    else_statement,
                })
            }
            Statement::DoStatement(n) => {
                let statement = self.fold_nested(n.statement);
                let expression = self.fold_expression(n.expression);
                Statement::DoStatement(DoStatement {
                    data: n.data,
                    statement,
                    expression,
                })
            }
            Statement::WhileStatement(n) => {
                let expression = self.fold_expression(n.expression);
                let statement = self.fold_nested(n.statement);
                Statement::WhileStatement(WhileStatement {
                    data: n.data,
                    expression,
                    statement,
                })
            }
            Statement::ForStatement(n) => {
                let initializer = n.initializer.as_ref().map(|init| match init {
                    ForInitializer::VariableDeclarationList(list) => {
                        ForInitializer::VariableDeclarationList(self.fold_declaration_list(list))
                    }
                    ForInitializer::Expression(expr) => ForInitializer::Expression(self.fold_expression(*expr)),
                });
                let condition = n.condition.map(|expr| self.fold_expression(expr));
                let incrementor = n.incrementor.map(|expr| self.fold_expression(expr));
                let statement = self.fold_nested(n.statement);
                Statement::ForStatement(ForStatement {
                    data: n.data,
                    initializer,
                    condition,
                    incrementor,
                    statement,
                })
            }
            Statement::ContinueStatement(data) => Statement::ContinueStatement(*data),
            Statement::BreakStatement(data) => Statement::BreakStatement(*data),
            Statement::ReturnStatement(n) => Statement::ReturnStatement(ReturnStatement {
                data: n.data,
                expression: n.expression.map(|expr| self.fold_expression(expr)),
            }),
        }
    }

    fn fold_nested(&mut self, stmt: &'a Statement<'a>) -> &'a Statement<'a> {
        let folded = self.fold_statement(stmt);
        self.arena.alloc(folded)
    }

    fn fold_declaration_list(&mut self, list: &'a VariableDeclarationList<'a>) -> VariableDeclarationList<'a> {
        let mut declarations = Vec::with_capacity(list.declarations.len());
        for decl in list.declarations.iter() {
            let initializer = decl.initializer.map(|init| self.fold_expression(init));
            self.binder.record_declaration(&decl.name, initializer);
            declarations.push(VariableDeclaration {
                data: decl.data,
                name: decl.name,
                initializer,
            });
        }
        VariableDeclarationList {
            data: list.data,
            declarations: alloc_vec_in(self.arena, declarations),
        }
    }

    fn fold_function(&mut self, func: &'a FunctionDeclaration<'a>) -> FunctionDeclaration<'a> {
        self.binder.enter_function(func.parameters);
        let body = self.fold_block(&func.body);
        self.binder.exit_function();
        FunctionDeclaration {
            data: func.data,
            name: func.name,
            parameters: func.parameters,
            body,
        }
    }

    fn fold_block(&mut self, block: &'a Block<'a>) -> Block<'a> {
        self.binder.enter_block();
        let statements = self.fold_statement_list(block.statements);
        let statements = if self.binder.has_parameter_set() {
            statements.into_iter().filter(|stmt| self.is_retained(stmt)).collect()
        } else {
            statements
        };
        self.binder.exit_block();
        Block {
            data: block.data,
            statements: alloc_vec_in(self.arena, statements),
        }
    }

    fn fold_statement_list(&mut self, statements: &'a [Statement<'a>]) -> Vec<Statement<'a>> {
        statements.iter().map(|stmt| self.fold_statement(stmt)).collect()
    }

    /// Declarations and assignments to unobservable names are dead once
    /// their reads have been substituted.
    fn is_retained(&mut self, stmt: &Statement<'a>) -> bool {
        let retained = match stmt {
            Statement::VariableStatement(_) => false,
            Statement::ExpressionStatement(expr_stmt) => match expr_stmt.as_assignment() {
                Some(assignment) => self.binder.is_observable(assignment.target.text),
                None => true,
            },
            _ => true,
        };
        if !retained {
            self.dropped_statements += 1;
            tracing::trace!(range = ?stmt.range(), "dropped local binding statement");
        }
        retained
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Substituted expressions are taken as bound and not folded again.
    fn fold_expression(&mut self, expr: &'a Expression<'a>) -> &'a Expression<'a> {
        match expr {
            Expression::Identifier(id) => self.binder.resolve(id).unwrap_or(expr),
            Expression::NumericLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::NullKeyword(_)
            | Expression::TrueKeyword(_)
            | Expression::FalseKeyword(_) => expr,
            Expression::Parenthesized(n) => {
                let expression = self.fold_expression(n.expression);
                self.arena.alloc(Expression::Parenthesized(ParenthesizedExpression {
                    data: n.data,
                    expression,
                }))
            }
            Expression::Call(n) => {
                let callee = self.fold_expression(n.expression);
                let arguments: Vec<Expression<'a>> = n
                    .arguments
                    .iter()
                    .map(|arg| self.fold_argument(arg))
                    .collect();
                self.arena.alloc(Expression::Call(CallExpression {
                    data: n.data,
                    expression: callee,
                    arguments: alloc_vec_in(self.arena, arguments),
                }))
            }
            Expression::PrefixUnary(n) => {
                let operand = self.fold_expression(n.operand);
                self.arena.alloc(Expression::PrefixUnary(PrefixUnaryExpression {
                    data: n.data,
                    operator: n.operator,
                    operand,
                }))
            }
            Expression::Binary(n) => {
                let left = self.fold_expression(n.left);
                let right = self.fold_expression(n.right);
                self.arena.alloc(Expression::Binary(BinaryExpression {
                    data: n.data,
                    left,
                    operator_token: n.operator_token,
                    right,
                }))
            }
            Expression::Assignment(n) => {
                let value = self.fold_expression(n.value);
                self.binder.record_assignment(&n.target, n.operator_token.kind(), value);
                self.arena.alloc(Expression::Assignment(AssignmentExpression {
                    data: n.data,
                    target: n.target,
                    operator_token: n.operator_token,
                    value,
                }))
            }
        }
    }

    /// Call arguments are stored inline, so a substituted argument is
    /// wrapped in parentheses that print transparently.
    fn fold_argument(&mut self, arg: &'a Expression<'a>) -> Expression<'a> {
        let folded = self.fold_expression(arg);
        Expression::Parenthesized(ParenthesizedExpression {
            data: NodeData::synthesized(symsub_ast::syntax_kind::SyntaxKind::ParenthesizedExpression),
            expression: folded,
        })
    }
}

impl<'a> Transformer<'a> for SymbolicSubstitution<'a> {
    fn transform(&mut self, source_file: &SourceFile<'a>) -> SourceFile<'a> {
        self.binder = Binder::new(self.arena);
        self.dropped_statements = 0;

        self.binder.enter_program();
        let statements = self.fold_statement_list(source_file.statements);
        self.binder.exit_program();
        debug_assert_eq!(self.binder.depth(), 0);

        tracing::debug!(
            file = %source_file.file_name,
            statements = statements.len(),
            dropped = self.dropped_statements,
            "substituted source file"
        );

        SourceFile {
            data: source_file.data,
            statements: alloc_vec_in(self.arena, statements),
            file_name: source_file.file_name.clone(),
            text: source_file.text.clone(),
        }
    }
}
