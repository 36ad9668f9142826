//! Visitor trait for traversing the syntax tree.
//!
//! Default implementations walk into children in source order.

use crate::node::*;

/// A visitor that traverses the tree. Default implementations walk into
/// children.
pub trait AstVisitor<'a> {
    fn visit_source_file(&mut self, node: &SourceFile<'a>) {
        for stmt in node.statements.iter() {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Statement<'a>) {
        match stmt {
            Statement::VariableStatement(n) => self.visit_variable_statement(n),
            Statement::FunctionDeclaration(n) => self.visit_function_declaration(n),
            Statement::Block(n) => self.visit_block(n),
            Statement::EmptyStatement(_) => {}
            Statement::ExpressionStatement(n) => self.visit_expression_statement(n),
            Statement::IfStatement(n) => self.visit_if_statement(n),
            Statement::DoStatement(n) => self.visit_do_statement(n),
            Statement::WhileStatement(n) => self.visit_while_statement(n),
            Statement::ForStatement(n) => self.visit_for_statement(n),
            Statement::ContinueStatement(_) => {}
            Statement::BreakStatement(_) => {}
            Statement::ReturnStatement(n) => self.visit_return_statement(n),
        }
    }

    // -- Statements --

    fn visit_variable_statement(&mut self, node: &VariableStatement<'a>) {
        self.visit_variable_declaration_list(&node.declaration_list);
    }

    fn visit_variable_declaration_list(&mut self, node: &VariableDeclarationList<'a>) {
        for decl in node.declarations.iter() {
            self.visit_variable_declaration(decl);
        }
    }

    fn visit_variable_declaration(&mut self, node: &VariableDeclaration<'a>) {
        self.visit_identifier(&node.name);
        if let Some(init) = node.initializer {
            self.visit_expression(init);
        }
    }

    fn visit_function_declaration(&mut self, node: &FunctionDeclaration<'a>) {
        self.visit_identifier(&node.name);
        for param in node.parameters.iter() {
            self.visit_identifier(&param.name);
        }
        self.visit_block(&node.body);
    }

    fn visit_block(&mut self, node: &Block<'a>) {
        for stmt in node.statements.iter() {
            self.visit_statement(stmt);
        }
    }

    fn visit_expression_statement(&mut self, node: &ExpressionStatement<'a>) {
        self.visit_expression(node.expression);
    }

    fn visit_if_statement(&mut self, node: &IfStatement<'a>) {
        self.visit_expression(node.expression);
        self.visit_statement(node.then_statement);
        if let Some(else_stmt) = node.else_statement {
            self.visit_statement(else_stmt);
        }
    }

    fn visit_do_statement(&mut self, node: &DoStatement<'a>) {
        self.visit_statement(node.statement);
        self.visit_expression(node.expression);
    }

    fn visit_while_statement(&mut self, node: &WhileStatement<'a>) {
        self.visit_expression(node.expression);
        self.visit_statement(node.statement);
    }

    fn visit_for_statement(&mut self, node: &ForStatement<'a>) {
        match &node.initializer {
            Some(ForInitializer::VariableDeclarationList(list)) => {
                self.visit_variable_declaration_list(list)
            }
            Some(ForInitializer::Expression(expr)) => self.visit_expression(expr),
            None => {}
        }
        if let Some(cond) = node.condition {
            self.visit_expression(cond);
        }
        if let Some(inc) = node.incrementor {
            self.visit_expression(inc);
        }
        self.visit_statement(node.statement);
    }

    fn visit_return_statement(&mut self, node: &ReturnStatement<'a>) {
        if let Some(expr) = node.expression {
            self.visit_expression(expr);
        }
    }

    // -- Expressions --

    fn visit_expression(&mut self, expr: &Expression<'a>) {
        match expr {
            Expression::Identifier(n) => self.visit_identifier(n),
            Expression::Parenthesized(n) => self.visit_expression(n.expression),
            Expression::Call(n) => self.visit_call_expression(n),
            Expression::PrefixUnary(n) => self.visit_expression(n.operand),
            Expression::Binary(n) => self.visit_binary_expression(n),
            Expression::Assignment(n) => self.visit_assignment_expression(n),
            Expression::NumericLiteral(_)
            | Expression::StringLiteral(_)
            | Expression::NullKeyword(_)
            | Expression::TrueKeyword(_)
            | Expression::FalseKeyword(_) => {}
        }
    }

    fn visit_identifier(&mut self, _node: &Identifier<'a>) {}

    fn visit_call_expression(&mut self, node: &CallExpression<'a>) {
        self.visit_expression(node.expression);
        for arg in node.arguments.iter() {
            self.visit_expression(arg);
        }
    }

    fn visit_binary_expression(&mut self, node: &BinaryExpression<'a>) {
        self.visit_expression(node.left);
        self.visit_expression(node.right);
    }

    fn visit_assignment_expression(&mut self, node: &AssignmentExpression<'a>) {
        self.visit_identifier(&node.target);
        self.visit_expression(node.value);
    }
}
