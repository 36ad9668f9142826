//! symsub_printer: Tree to source text.
//!
//! Renders a syntax tree back into source code with a fixed layout:
//! four-space indentation, one statement per line and single-quoted
//! strings. Parentheses written in the source are not preserved; the
//! printer inserts exactly the parentheses operator precedence requires,
//! which is what makes substituted subtrees print correctly.

use symsub_ast::node::*;
use symsub_ast::precedence::{get_binary_operator_precedence, get_expression_precedence, is_right_associative};
use symsub_ast::syntax_kind::SyntaxKind;
use symsub_ast::OperatorPrecedence;

/// Options for the printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterOptions {
    /// Indentation string.
    pub indent_str: String,
    /// Newline string.
    pub new_line: String,
    /// Whether to emit a trailing newline.
    pub trailing_newline: bool,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            indent_str: "    ".to_string(),
            new_line: "\n".to_string(),
            trailing_newline: false,
        }
    }
}

/// The printer converts tree nodes to text.
pub struct Printer {
    output: String,
    indent_level: u32,
    options: PrinterOptions,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self::with_options(PrinterOptions::default())
    }

    pub fn with_options(options: PrinterOptions) -> Self {
        Self {
            output: String::with_capacity(4096),
            indent_level: 0,
            options,
        }
    }

    /// Print a source file to a string.
    pub fn print_source_file(&mut self, source_file: &SourceFile<'_>) -> String {
        self.output.clear();
        self.indent_level = 0;
        for (i, stmt) in source_file.statements.iter().enumerate() {
            if i > 0 {
                self.write_newline();
            }
            self.write_indent();
            self.print_statement(stmt);
        }
        if self.options.trailing_newline && !self.output.is_empty() {
            self.write_newline();
        }
        std::mem::take(&mut self.output)
    }

    /// Print a single expression to a string.
    pub fn print_expression_text(&mut self, expr: &Expression<'_>) -> String {
        self.output.clear();
        self.print_expression(expr);
        std::mem::take(&mut self.output)
    }

    // ========================================================================
    // Statement printing
    // ========================================================================

    fn print_statement(&mut self, stmt: &Statement<'_>) {
        match stmt {
            Statement::EmptyStatement(_) => self.write(";"),
            Statement::ExpressionStatement(n) => {
                self.print_expression(n.expression);
                self.write(";");
            }
            Statement::VariableStatement(n) => {
                self.print_variable_declaration_list(&n.declaration_list);
                self.write(";");
            }
            Statement::ReturnStatement(n) => {
                self.write("return");
                if let Some(expr) = n.expression {
                    self.write(" ");
                    self.print_expression(expr);
                }
                self.write(";");
            }
            Statement::IfStatement(n) => self.print_if_statement(n),
            Statement::Block(n) => self.print_block(n),
            Statement::FunctionDeclaration(n) => self.print_function_declaration(n),
            Statement::WhileStatement(n) => {
                self.write("while (");
                self.print_expression(n.expression);
                self.write(")");
                self.print_body(n.statement);
            }
            Statement::DoStatement(n) => {
                self.write("do");
                self.print_body(n.statement);
                self.write_separator_after(n.statement);
                self.write("while (");
                self.print_expression(n.expression);
                self.write(");");
            }
            Statement::ForStatement(n) => self.print_for_statement(n),
            Statement::BreakStatement(_) => self.write("break;"),
            Statement::ContinueStatement(_) => self.write("continue;"),
        }
    }

    fn print_variable_declaration_list(&mut self, node: &VariableDeclarationList<'_>) {
        self.write(node.variable_kind().as_str());
        self.write(" ");
        for (i, decl) in node.declarations.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(decl.name.text_name);
            if let Some(init) = decl.initializer {
                self.write(" = ");
                self.print_operand(init, needs_parens_below(init, OperatorPrecedence::Assignment));
            }
        }
    }

    fn print_if_statement(&mut self, node: &IfStatement<'_>) {
        self.write("if (");
        self.print_expression(node.expression);
        self.write(")");
        self.print_body(node.then_statement);
        if let Some(else_stmt) = node.else_statement {
            self.write_separator_after(node.then_statement);
            self.write("else");
            if let Statement::IfStatement(else_if) = else_stmt {
                self.write(" ");
                self.print_if_statement(else_if);
            } else {
                self.print_body(else_stmt);
            }
        }
    }

    fn print_for_statement(&mut self, node: &ForStatement<'_>) {
        self.write("for (");
        match &node.initializer {
            Some(ForInitializer::VariableDeclarationList(list)) => self.print_variable_declaration_list(list),
            Some(ForInitializer::Expression(expr)) => self.print_expression(expr),
            None => {}
        }
        self.write(";");
        if let Some(condition) = node.condition {
            self.write(" ");
            self.print_expression(condition);
        }
        self.write(";");
        if let Some(incrementor) = node.incrementor {
            self.write(" ");
            self.print_expression(incrementor);
        }
        self.write(")");
        self.print_body(node.statement);
    }

    fn print_block(&mut self, node: &Block<'_>) {
        self.write("{");
        self.increase_indent();
        for stmt in node.statements.iter() {
            self.write_newline();
            self.write_indent();
            self.print_statement(stmt);
        }
        self.decrease_indent();
        self.write_newline();
        self.write_indent();
        self.write("}");
    }

    fn print_function_declaration(&mut self, node: &FunctionDeclaration<'_>) {
        self.write("function ");
        self.write(node.name.text_name);
        self.write("(");
        for (i, param) in node.parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(param.name.text_name);
        }
        self.write(") ");
        self.print_block(&node.body);
    }

    /// Body of a compound statement: a block stays on the header line,
    /// anything else goes on its own indented line.
    fn print_body(&mut self, stmt: &Statement<'_>) {
        if let Statement::Block(block) = stmt {
            self.write(" ");
            self.print_block(block);
        } else {
            self.increase_indent();
            self.write_newline();
            self.write_indent();
            self.print_statement(stmt);
            self.decrease_indent();
        }
    }

    /// Whitespace before a trailing `else` or `while` keyword.
    fn write_separator_after(&mut self, body: &Statement<'_>) {
        if matches!(body, Statement::Block(_)) {
            self.write(" ");
        } else {
            self.write_newline();
            self.write_indent();
        }
    }

    // ========================================================================
    // Expression printing
    // ========================================================================

    fn print_expression(&mut self, expr: &Expression<'_>) {
        match expr {
            Expression::Identifier(id) => self.write(id.text_name),
            Expression::NumericLiteral(n) => self.write(n.text),
            Expression::StringLiteral(n) => {
                let quoted = quote_string(n.text);
                self.write(&quoted);
            }
            Expression::NullKeyword(_) => self.write("null"),
            Expression::TrueKeyword(_) => self.write("true"),
            Expression::FalseKeyword(_) => self.write("false"),
            Expression::Parenthesized(n) => self.print_expression(n.expression),
            Expression::Call(n) => {
                self.print_operand(n.expression, needs_parens_below(n.expression, OperatorPrecedence::LeftHandSide));
                self.write("(");
                for (i, arg) in n.arguments.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.print_operand(arg, needs_parens_below(arg, OperatorPrecedence::Assignment));
                }
                self.write(")");
            }
            Expression::PrefixUnary(n) => {
                let operator = operator_to_string(n.operator);
                self.write(operator);
                let operand = n.operand.skip_parentheses();
                if let Expression::PrefixUnary(inner) = operand {
                    // `- -x`, not `--x`.
                    if matches!(
                        (n.operator, inner.operator),
                        (SyntaxKind::MinusToken, SyntaxKind::MinusToken) | (SyntaxKind::PlusToken, SyntaxKind::PlusToken)
                    ) {
                        self.write(" ");
                    }
                }
                self.print_operand(n.operand, needs_parens_below(n.operand, OperatorPrecedence::Unary));
            }
            Expression::Binary(n) => self.print_binary_expression(n),
            Expression::Assignment(n) => {
                self.write(n.target.text_name);
                self.write(" ");
                self.write(operator_to_string(n.operator_token.kind()));
                self.write(" ");
                self.print_operand(n.value, needs_parens_below(n.value, OperatorPrecedence::Assignment));
            }
        }
    }

    fn print_binary_expression(&mut self, node: &BinaryExpression<'_>) {
        let operator = node.operator_token.kind();
        let precedence = get_binary_operator_precedence(operator);
        let left_precedence = get_expression_precedence(node.left);
        let right_precedence = get_expression_precedence(node.right);

        let (left_parens, right_parens) = if is_right_associative(operator) {
            // `(-a) ** b`: a unary left operand of `**` must be wrapped.
            let unary_left = matches!(node.left.skip_parentheses(), Expression::PrefixUnary(_));
            (left_precedence <= precedence || unary_left, right_precedence < precedence)
        } else {
            (left_precedence < precedence, right_precedence <= precedence)
        };

        self.print_operand(node.left, left_parens || mixes_nullish(operator, node.left));
        self.write(" ");
        self.write(operator_to_string(operator));
        self.write(" ");
        self.print_operand(node.right, right_parens || mixes_nullish(operator, node.right));
    }

    fn print_operand(&mut self, expr: &Expression<'_>, parenthesize: bool) {
        if parenthesize {
            self.write("(");
            self.print_expression(expr);
            self.write(")");
        } else {
            self.print_expression(expr);
        }
    }

    // ========================================================================
    // Output helpers
    // ========================================================================

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_newline(&mut self) {
        self.output.push_str(&self.options.new_line);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.options.indent_str);
        }
    }

    fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

/// Print a source file with default options.
pub fn print_source_file(source_file: &SourceFile<'_>) -> String {
    Printer::new().print_source_file(source_file)
}

/// Print an expression with default options.
pub fn expression_to_string(expr: &Expression<'_>) -> String {
    Printer::new().print_expression_text(expr)
}

fn needs_parens_below(expr: &Expression<'_>, precedence: OperatorPrecedence) -> bool {
    get_expression_precedence(expr) < precedence
}

/// `??` cannot be mixed with `&&` or `||` without parentheses.
fn mixes_nullish(operator: SyntaxKind, operand: &Expression<'_>) -> bool {
    let Expression::Binary(inner) = operand.skip_parentheses() else {
        return false;
    };
    let inner = inner.operator_token.kind();
    let is_logical = |kind: SyntaxKind| matches!(kind, SyntaxKind::AmpersandAmpersandToken | SyntaxKind::BarBarToken);
    (operator == SyntaxKind::QuestionQuestionToken && is_logical(inner))
        || (is_logical(operator) && inner == SyntaxKind::QuestionQuestionToken)
}

fn operator_to_string(kind: SyntaxKind) -> &'static str {
    kind.token_text().unwrap_or("?")
}

/// Render a cooked string value as a single-quoted literal.
fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{b}' => out.push_str("\\v"),
            '\0' if !chars.peek().is_some_and(|next| next.is_ascii_digit()) => out.push_str("\\0"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
