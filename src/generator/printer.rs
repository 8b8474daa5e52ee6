//! # Printer
//!
//! Walks the (possibly rewritten) AST and emits JavaScript source text,
//! handling operator precedence, parenthesization, and the small amount of
//! ASI safety a synchronous, statement-at-a-time printer needs. Decoder and
//! comment-marker passes attach `leading_comments` to a handful of statement
//! kinds (`decrypt failed: ...`, `TOLOOK: ...`); the printer is the only
//! place that turns those back into `/* ... */` text.

use crate::generator::{GeneratorConfig, GeneratorResult, OutputFormat};
use crate::parser::ast_types::*;

/// Operator precedence levels, higher binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Precedence {
    Sequence,
    Assignment,
    Conditional,
    NullishCoalescing,
    LogicalOr,
    LogicalAnd,
    BitwiseOr,
    BitwiseXor,
    BitwiseAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Exponentiation,
    Unary,
    Postfix,
    Call,
    Member,
    Primary,
}

pub struct Printer {
    config: GeneratorConfig,
    output: String,
    warnings: Vec<String>,
    indent_level: usize,
}

impl Printer {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            config: config.clone(),
            output: String::with_capacity(1024),
            warnings: Vec::new(),
            indent_level: 0,
        }
    }

    pub fn print_program(&mut self, program: &Program) -> GeneratorResult<String> {
        self.output.clear();
        self.warnings.clear();

        for stmt in &program.body {
            self.print_indent()?;
            self.print_statement(stmt)?;
            self.print_newline()?;
        }

        Ok(self.output.clone())
    }

    pub fn get_warnings(&self) -> Vec<String> {
        self.warnings.clone()
    }

    fn print_statement(&mut self, stmt: &Statement) -> GeneratorResult<()> {
        match stmt {
            Statement::VariableDeclaration { declarations, kind, leading_comments } => {
                self.print_leading_comments(leading_comments)?;
                self.print_variable_declaration(declarations, kind)
            }
            Statement::FunctionDeclaration { id, params, body, is_async, is_generator } => {
                self.print_function(id.as_ref(), params, body, *is_async, *is_generator, true)
            }
            Statement::ClassDeclaration { id, super_class, body } => {
                self.print_class(id.as_ref(), super_class.as_deref(), body)?;
                Ok(())
            }
            Statement::ExpressionStatement { expression, leading_comments } => {
                self.print_leading_comments(leading_comments)?;
                self.print_expression_statement(expression)
            }
            Statement::BlockStatement { body } => self.print_block(body),
            Statement::ReturnStatement { argument } => {
                self.write("return")?;
                if let Some(arg) = argument {
                    self.write(" ")?;
                    self.print_expression(arg, Precedence::Sequence)?;
                }
                self.print_semicolon()
            }
            Statement::IfStatement { test, consequent, alternate } => {
                self.write("if(")?;
                self.print_expression(test, Precedence::Sequence)?;
                self.write(")")?;
                self.print_clause_body(consequent)?;
                if let Some(alt) = alternate {
                    self.print_space()?;
                    self.write("else")?;
                    self.print_space()?;
                    self.print_statement(alt)?;
                }
                Ok(())
            }
            Statement::WhileStatement { test, body } => {
                self.write("while(")?;
                self.print_expression(test, Precedence::Sequence)?;
                self.write(")")?;
                self.print_clause_body(body)
            }
            Statement::DoWhileStatement { body, test } => {
                self.write("do")?;
                self.print_clause_body(body)?;
                self.write("while(")?;
                self.print_expression(test, Precedence::Sequence)?;
                self.write(")")?;
                self.print_semicolon()
            }
            Statement::ForStatement { init, test, update, body } => {
                self.write("for(")?;
                if let Some(init) = init {
                    self.print_for_init(init)?;
                }
                self.write(";")?;
                if let Some(test) = test {
                    self.print_expression(test, Precedence::Sequence)?;
                }
                self.write(";")?;
                if let Some(update) = update {
                    self.print_expression(update, Precedence::Sequence)?;
                }
                self.write(")")?;
                self.print_clause_body(body)
            }
            Statement::ForInStatement { left, right, body } => {
                self.write("for(")?;
                self.print_for_init(left)?;
                self.write(" in ")?;
                self.print_expression(right, Precedence::Sequence)?;
                self.write(")")?;
                self.print_clause_body(body)
            }
            Statement::ForOfStatement { left, right, body, is_await } => {
                self.write("for")?;
                if *is_await {
                    self.write(" await")?;
                }
                self.write("(")?;
                self.print_for_init(left)?;
                self.write(" of ")?;
                self.print_expression(right, Precedence::Sequence)?;
                self.write(")")?;
                self.print_clause_body(body)
            }
            Statement::SwitchStatement { discriminant, cases } => {
                self.write("switch(")?;
                self.print_expression(discriminant, Precedence::Sequence)?;
                self.write("){")?;
                for case in cases {
                    match &case.test {
                        Some(test) => {
                            self.write("case ")?;
                            self.print_expression(test, Precedence::Sequence)?;
                        }
                        None => self.write("default")?,
                    }
                    self.write(":")?;
                    for stmt in &case.consequent {
                        self.print_statement(stmt)?;
                    }
                }
                self.write("}")?;
                Ok(())
            }
            Statement::ThrowStatement { argument } => {
                self.write("throw ")?;
                self.print_expression(argument, Precedence::Sequence)?;
                self.print_semicolon()
            }
            Statement::TryStatement { block, handler, finalizer } => {
                self.write("try")?;
                self.print_block(&block.body)?;
                if let Some(handler) = handler {
                    self.write("catch")?;
                    if let Some(param) = &handler.param {
                        self.write("(")?;
                        self.print_pattern(param)?;
                        self.write(")")?;
                    }
                    self.print_block(&handler.body.body)?;
                }
                if let Some(finalizer) = finalizer {
                    self.write("finally")?;
                    self.print_block(&finalizer.body)?;
                }
                Ok(())
            }
            Statement::LabeledStatement { label, body } => {
                self.print_identifier(label)?;
                self.write(":")?;
                self.print_statement(body)
            }
            Statement::BreakStatement { label } => {
                self.write("break")?;
                if let Some(label) = label {
                    self.write(" ")?;
                    self.print_identifier(label)?;
                }
                self.print_semicolon()
            }
            Statement::ContinueStatement { label } => {
                self.write("continue")?;
                if let Some(label) = label {
                    self.write(" ")?;
                    self.print_identifier(label)?;
                }
                self.print_semicolon()
            }
            Statement::DebuggerStatement { leading_comments } => {
                self.print_leading_comments(leading_comments)?;
                self.write("debugger")?;
                self.print_semicolon()
            }
            Statement::EmptyStatement => self.write(";"),
            Statement::ImportDeclaration { specifiers, source } => {
                self.print_import_declaration(specifiers, source)
            }
            Statement::ExportNamedDeclaration { declaration, specifiers, source } => {
                self.write("export ")?;
                if let Some(decl) = declaration {
                    self.print_statement(decl)
                } else {
                    self.write("{")?;
                    for (i, spec) in specifiers.iter().enumerate() {
                        if i > 0 {
                            self.write(",")?;
                        }
                        let ExportSpecifier::ExportSpecifier { local, exported } = spec;
                        self.print_identifier(local)?;
                        if local.name != exported.name {
                            self.write(" as ")?;
                            self.print_identifier(exported)?;
                        }
                    }
                    self.write("}")?;
                    if let Some(source) = source {
                        self.write(" from ")?;
                        self.print_string_literal(source)?;
                    }
                    self.print_semicolon()
                }
            }
        }
    }

    fn print_leading_comments(&mut self, comments: &[LeadingComment]) -> GeneratorResult<()> {
        if matches!(self.config.preserve_comments, crate::generator::CommentPreservation::None) {
            return Ok(());
        }
        for comment in comments {
            self.write("/* ")?;
            self.write(&comment.text)?;
            self.write(" */")?;
            self.print_newline()?;
            self.print_indent()?;
        }
        Ok(())
    }

    fn print_clause_body(&mut self, stmt: &Statement) -> GeneratorResult<()> {
        if let Statement::BlockStatement { body } = stmt {
            self.print_block(body)
        } else {
            self.print_statement(stmt)
        }
    }

    fn print_for_init(&mut self, init: &ForInit) -> GeneratorResult<()> {
        match init {
            ForInit::VariableDeclaration { declarations, kind } => {
                self.print_declaration_kind(kind)?;
                self.write(" ")?;
                self.print_declarator_list(declarations)
            }
            ForInit::Expression(expr) => self.print_expression(expr, Precedence::Sequence),
            ForInit::Pattern(pattern) => self.print_pattern(pattern),
        }
    }

    fn print_variable_declaration(
        &mut self,
        declarations: &[VariableDeclarator],
        kind: &VariableDeclarationKind,
    ) -> GeneratorResult<()> {
        self.print_declaration_kind(kind)?;
        self.write(" ")?;
        self.print_declarator_list(declarations)?;
        self.print_semicolon()
    }

    fn print_declaration_kind(&mut self, kind: &VariableDeclarationKind) -> GeneratorResult<()> {
        self.write(match kind {
            VariableDeclarationKind::Var => "var",
            VariableDeclarationKind::Let => "let",
            VariableDeclarationKind::Const => "const",
        })
    }

    fn print_declarator_list(&mut self, declarations: &[VariableDeclarator]) -> GeneratorResult<()> {
        for (i, decl) in declarations.iter().enumerate() {
            if i > 0 {
                self.write(",")?;
            }
            self.print_pattern(&decl.id)?;
            if let Some(init) = &decl.init {
                self.write("=")?;
                self.print_expression(init, Precedence::Assignment)?;
            }
        }
        Ok(())
    }

    fn print_function(
        &mut self,
        id: Option<&Identifier>,
        params: &[Pattern],
        body: &BlockStatement,
        is_async: bool,
        is_generator: bool,
        declaration: bool,
    ) -> GeneratorResult<()> {
        if is_async {
            self.write("async ")?;
        }
        self.write("function")?;
        if is_generator {
            self.write("*")?;
        }
        if let Some(id) = id {
            self.write(" ")?;
            self.print_identifier(id)?;
        } else if declaration {
            self.write(" ")?;
        }
        self.write("(")?;
        self.print_parameter_list(params)?;
        self.write(")")?;
        self.print_block(&body.body)
    }

    fn print_class(
        &mut self,
        id: Option<&Identifier>,
        super_class: Option<&Expression>,
        body: &ClassBody,
    ) -> GeneratorResult<()> {
        self.write("class")?;
        if let Some(id) = id {
            self.write(" ")?;
            self.print_identifier(id)?;
        }
        if let Some(sup) = super_class {
            self.write(" extends ")?;
            self.print_expression(sup, Precedence::Unary)?;
        }
        self.write("{")?;
        for element in &body.body {
            match element {
                ClassElement::PropertyDefinition { key, value, is_static, .. } => {
                    if *is_static {
                        self.write("static ")?;
                    }
                    self.print_property_key(key)?;
                    if let Some(value) = value {
                        self.write("=")?;
                        self.print_expression(value, Precedence::Assignment)?;
                    }
                    self.write(";")?;
                }
                ClassElement::MethodDefinition { key, value, kind, is_static, .. } => {
                    if *is_static {
                        self.write("static ")?;
                    }
                    match kind {
                        MethodKind::Get => self.write("get ")?,
                        MethodKind::Set => self.write("set ")?,
                        MethodKind::Constructor | MethodKind::Method => {}
                    }
                    if value.is_async {
                        self.write("async ")?;
                    }
                    if value.is_generator {
                        self.write("*")?;
                    }
                    self.print_property_key(key)?;
                    self.write("(")?;
                    self.print_parameter_list(&value.params)?;
                    self.write(")")?;
                    self.print_block(&value.body.body)?;
                }
            }
        }
        self.write("}")
    }

    fn print_import_declaration(
        &mut self,
        specifiers: &[ImportSpecifier],
        source: &StringLiteral,
    ) -> GeneratorResult<()> {
        self.write("import ")?;
        let mut named = Vec::new();
        for spec in specifiers {
            match spec {
                ImportSpecifier::ImportDefaultSpecifier { local } => {
                    self.print_identifier(local)?;
                    self.write(",")?;
                }
                ImportSpecifier::ImportNamespaceSpecifier { local } => {
                    self.write("* as ")?;
                    self.print_identifier(local)?;
                    self.write(",")?;
                }
                ImportSpecifier::ImportSpecifier { imported, local } => named.push((imported, local)),
            }
        }
        if !named.is_empty() {
            self.write("{")?;
            for (i, (imported, local)) in named.iter().enumerate() {
                if i > 0 {
                    self.write(",")?;
                }
                self.print_identifier(imported)?;
                if imported.name != local.name {
                    self.write(" as ")?;
                    self.print_identifier(local)?;
                }
            }
            self.write("}")?;
        }
        self.write(" from ")?;
        self.print_string_literal(source)?;
        self.print_semicolon()
    }

    fn print_expression_statement(&mut self, expression: &Expression) -> GeneratorResult<()> {
        let needs_wrapping = starts_with_object_or_function(expression);
        if needs_wrapping {
            self.write("(")?;
        }
        self.print_expression(expression, Precedence::Sequence)?;
        if needs_wrapping {
            self.write(")")?;
        }
        self.print_semicolon()
    }

    fn print_block(&mut self, body: &[Statement]) -> GeneratorResult<()> {
        self.write("{")?;
        self.indent_level += 1;
        for stmt in body {
            self.print_newline()?;
            self.print_indent()?;
            self.print_statement(stmt)?;
        }
        self.indent_level -= 1;
        if !body.is_empty() {
            self.print_newline()?;
            self.print_indent()?;
        }
        self.write("}")
    }

    fn print_expression(&mut self, expr: &Expression, parent: Precedence) -> GeneratorResult<()> {
        let own = precedence_of(expr);
        let needs_parens = own < parent;
        if needs_parens {
            self.write("(")?;
        }
        match expr {
            Expression::Identifier(id) => self.print_identifier(id)?,
            Expression::Literal(lit) => self.print_literal(lit)?,
            Expression::ThisExpression => {
                self.write("this")?;
            }
            Expression::BinaryExpression { left, operator, right } => {
                let prec = binary_precedence(*operator);
                self.print_expression(left, prec)?;
                self.print_binary_operator(*operator)?;
                self.print_expression(right, bump(prec))?;
            }
            Expression::UnaryExpression { operator, argument, prefix } => {
                if *prefix {
                    self.write(unary_operator_str(*operator))?;
                    if matches!(operator, UnaryOperator::Typeof | UnaryOperator::Void | UnaryOperator::Delete) {
                        self.write(" ")?;
                    }
                    self.print_expression(argument, Precedence::Unary)?;
                } else {
                    self.print_expression(argument, Precedence::Postfix)?;
                    self.write(unary_operator_str(*operator))?;
                }
            }
            Expression::AssignmentExpression { left, operator, right } => {
                self.print_expression(left, Precedence::Call)?;
                self.write(assignment_operator_str(*operator))?;
                self.print_expression(right, Precedence::Assignment)?;
            }
            Expression::UpdateExpression { operator, argument, prefix } => {
                let op = match operator {
                    UpdateOperator::Increment => "++",
                    UpdateOperator::Decrement => "--",
                };
                if *prefix {
                    self.write(op)?;
                    self.print_expression(argument, Precedence::Unary)?;
                } else {
                    self.print_expression(argument, Precedence::Postfix)?;
                    self.write(op)?;
                }
            }
            Expression::CallExpression { callee, arguments } => {
                self.print_expression(callee, Precedence::Call)?;
                self.write("(")?;
                self.print_arguments(arguments)?;
                self.write(")")?;
            }
            Expression::NewExpression { callee, arguments } => {
                self.write("new ")?;
                self.print_expression(callee, Precedence::Member)?;
                self.write("(")?;
                self.print_arguments(arguments)?;
                self.write(")")?;
            }
            Expression::MemberExpression { object, property, computed } => {
                self.print_expression(object, Precedence::Member)?;
                if *computed {
                    self.write("[")?;
                    self.print_expression(property, Precedence::Sequence)?;
                    self.write("]")?;
                } else {
                    self.write(".")?;
                    self.print_expression(property, Precedence::Primary)?;
                }
            }
            Expression::FunctionExpression(func) => {
                self.print_function(func.id.as_ref(), &func.params, &func.body, func.is_async, func.is_generator, false)?;
            }
            Expression::ArrowFunctionExpression { params, body, is_async } => {
                if *is_async {
                    self.write("async ")?;
                }
                self.write("(")?;
                self.print_parameter_list(params)?;
                self.write(")=>")?;
                match body {
                    ArrowFunctionBody::BlockStatement(block) => self.print_block(&block.body)?,
                    ArrowFunctionBody::Expression(expr) => {
                        let wrap = matches!(expr.as_ref(), Expression::ObjectExpression { .. });
                        if wrap {
                            self.write("(")?;
                        }
                        self.print_expression(expr, Precedence::Assignment)?;
                        if wrap {
                            self.write(")")?;
                        }
                    }
                }
            }
            Expression::ObjectExpression { properties } => {
                self.write("{")?;
                for (i, prop) in properties.iter().enumerate() {
                    if i > 0 {
                        self.write(",")?;
                    }
                    match prop {
                        ObjectProperty::Property { key, value, shorthand, method, kind, .. } => {
                            if *method || matches!(kind, PropertyKind::Get | PropertyKind::Set) {
                                if matches!(kind, PropertyKind::Get) {
                                    self.write("get ")?;
                                } else if matches!(kind, PropertyKind::Set) {
                                    self.write("set ")?;
                                }
                                self.print_property_key(key)?;
                                if let Expression::FunctionExpression(func) = value {
                                    self.write("(")?;
                                    self.print_parameter_list(&func.params)?;
                                    self.write(")")?;
                                    self.print_block(&func.body.body)?;
                                }
                            } else if *shorthand {
                                self.print_property_key(key)?;
                            } else {
                                self.print_property_key(key)?;
                                self.write(":")?;
                                self.print_expression(value, Precedence::Assignment)?;
                            }
                        }
                        ObjectProperty::SpreadElement { argument } => {
                            self.write("...")?;
                            self.print_expression(argument, Precedence::Assignment)?;
                        }
                    }
                }
                self.write("}")?;
            }
            Expression::ArrayExpression { elements } => {
                self.write("[")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(",")?;
                    }
                    if let Some(elem) = elem {
                        self.print_expression(elem, Precedence::Assignment)?;
                    }
                }
                self.write("]")?;
            }
            Expression::SequenceExpression { expressions } => {
                for (i, expr) in expressions.iter().enumerate() {
                    if i > 0 {
                        self.write(",")?;
                    }
                    self.print_expression(expr, Precedence::Assignment)?;
                }
            }
            Expression::TemplateLiteral { quasis, expressions } => {
                self.write("`")?;
                for (i, quasi) in quasis.iter().enumerate() {
                    self.write(&escape_template_element(&quasi.value))?;
                    if !quasi.tail && i < expressions.len() {
                        self.write("${")?;
                        self.print_expression(&expressions[i], Precedence::Sequence)?;
                        self.write("}")?;
                    }
                }
                self.write("`")?;
            }
            Expression::ConditionalExpression { test, consequent, alternate } => {
                self.print_expression(test, Precedence::NullishCoalescing)?;
                self.write("?")?;
                self.print_expression(consequent, Precedence::Assignment)?;
                self.write(":")?;
                self.print_expression(alternate, Precedence::Assignment)?;
            }
        }
        if needs_parens {
            self.write(")")?;
        }
        Ok(())
    }

    fn print_arguments(&mut self, arguments: &[Argument]) -> GeneratorResult<()> {
        for (i, arg) in arguments.iter().enumerate() {
            if i > 0 {
                self.write(",")?;
            }
            match arg {
                Argument::Expression(expr) => self.print_expression(expr, Precedence::Assignment)?,
                Argument::SpreadElement(expr) => {
                    self.write("...")?;
                    self.print_expression(expr, Precedence::Assignment)?;
                }
            }
        }
        Ok(())
    }

    fn print_binary_operator(&mut self, op: BinaryOperator) -> GeneratorResult<()> {
        self.write(binary_operator_str(op))
    }

    fn print_identifier(&mut self, id: &Identifier) -> GeneratorResult<()> {
        self.write(&id.name)?;
        Ok(())
    }

    fn print_literal(&mut self, lit: &Literal) -> GeneratorResult<()> {
        match lit {
            Literal::String(s) => self.print_string_literal(s),
            Literal::Number(n) => {
                self.write(&canonicalize_number(n.value))?;
                Ok(())
            }
            Literal::Boolean(b) => {
                self.write(if b.value { "true" } else { "false" })?;
                Ok(())
            }
            Literal::Null => {
                self.write("null")?;
                Ok(())
            }
            Literal::RegExp(r) => {
                self.write(&format!("/{}/{}", r.pattern, r.flags))?;
                Ok(())
            }
        }
    }

    fn print_string_literal(&mut self, lit: &StringLiteral) -> GeneratorResult<()> {
        let quote = self.choose_quote(&lit.value);
        self.write(&format!("{quote}{}{quote}", escape_string(&lit.value, quote)))?;
        Ok(())
    }

    fn choose_quote(&self, content: &str) -> char {
        match self.config.quote {
            crate::generator::QuoteStrategy::Single => '\'',
            crate::generator::QuoteStrategy::Double => '"',
            crate::generator::QuoteStrategy::Auto => {
                let singles = content.matches('\'').count();
                let doubles = content.matches('"').count();
                if singles <= doubles { '\'' } else { '"' }
            }
        }
    }

    fn print_property_key(&mut self, key: &PropertyKey) -> GeneratorResult<()> {
        match key {
            PropertyKey::Identifier(id) => self.print_identifier(id),
            PropertyKey::Literal(lit) => self.print_literal(lit),
            PropertyKey::PrivateName(name) => self.write(&format!("#{}", name.name)),
            PropertyKey::Computed(expr) => {
                self.write("[")?;
                self.print_expression(expr, Precedence::Assignment)?;
                self.write("]")
            }
        }
    }

    fn print_pattern(&mut self, pattern: &Pattern) -> GeneratorResult<()> {
        match pattern {
            Pattern::Identifier(id) => self.print_identifier(id),
            Pattern::ArrayPattern { elements } => {
                self.write("[")?;
                for (i, elem) in elements.iter().enumerate() {
                    if i > 0 {
                        self.write(",")?;
                    }
                    if let Some(elem) = elem {
                        self.print_pattern(elem)?;
                    }
                }
                self.write("]")
            }
            Pattern::ObjectPattern { properties } => {
                self.write("{")?;
                for (i, prop) in properties.iter().enumerate() {
                    if i > 0 {
                        self.write(",")?;
                    }
                    match prop {
                        ObjectPatternProperty::Property { key, value, shorthand, .. } => {
                            if *shorthand {
                                self.print_pattern(value)?;
                            } else {
                                self.print_property_key(key)?;
                                self.write(":")?;
                                self.print_pattern(value)?;
                            }
                        }
                        ObjectPatternProperty::RestElement { argument } => {
                            self.write("...")?;
                            self.print_pattern(argument)?;
                        }
                    }
                }
                self.write("}")
            }
            Pattern::AssignmentPattern { left, right } => {
                self.print_pattern(left)?;
                self.write("=")?;
                self.print_expression(right, Precedence::Assignment)
            }
            Pattern::RestElement { argument } => {
                self.write("...")?;
                self.print_pattern(argument)
            }
        }
    }

    fn print_parameter_list(&mut self, params: &[Pattern]) -> GeneratorResult<()> {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(",")?;
            }
            self.print_pattern(param)?;
        }
        Ok(())
    }

    fn write(&mut self, s: &str) -> GeneratorResult<()> {
        self.output.push_str(s);
        Ok(())
    }

    fn print_space(&mut self) -> GeneratorResult<()> {
        self.write(" ")
    }

    fn print_newline(&mut self) -> GeneratorResult<()> {
        match self.config.format {
            OutputFormat::Compact => Ok(()),
            OutputFormat::Readable | OutputFormat::Pretty => self.write("\n"),
        }
    }

    fn print_indent(&mut self) -> GeneratorResult<()> {
        if matches!(self.config.format, OutputFormat::Pretty) {
            let indent = "  ".repeat(self.indent_level);
            self.write(&indent)?;
        }
        Ok(())
    }

    fn print_semicolon(&mut self) -> GeneratorResult<()> {
        match self.config.semicolon {
            crate::generator::SemicolonStrategy::Remove => Ok(()),
            _ => self.write(";"),
        }
    }
}

fn starts_with_object_or_function(expr: &Expression) -> bool {
    match expr {
        Expression::ObjectExpression { .. } | Expression::FunctionExpression(_) => true,
        Expression::AssignmentExpression { left, .. } => starts_with_object_or_function(left),
        Expression::BinaryExpression { left, .. } => starts_with_object_or_function(left),
        Expression::SequenceExpression { expressions } => {
            expressions.first().map_or(false, starts_with_object_or_function)
        }
        Expression::CallExpression { callee, .. } | Expression::MemberExpression { object: callee, .. } => {
            starts_with_object_or_function(callee)
        }
        _ => false,
    }
}

fn precedence_of(expr: &Expression) -> Precedence {
    match expr {
        Expression::Identifier(_)
        | Expression::Literal(_)
        | Expression::ThisExpression
        | Expression::ArrayExpression { .. }
        | Expression::ObjectExpression { .. }
        | Expression::FunctionExpression(_)
        | Expression::TemplateLiteral { .. } => Precedence::Primary,
        Expression::MemberExpression { .. } => Precedence::Member,
        Expression::CallExpression { .. } | Expression::NewExpression { .. } => Precedence::Call,
        Expression::UpdateExpression { prefix: false, .. } => Precedence::Postfix,
        Expression::UpdateExpression { prefix: true, .. } | Expression::UnaryExpression { .. } => Precedence::Unary,
        Expression::BinaryExpression { operator, .. } => binary_precedence(*operator),
        Expression::ConditionalExpression { .. } => Precedence::Conditional,
        Expression::AssignmentExpression { .. } | Expression::ArrowFunctionExpression { .. } => Precedence::Assignment,
        Expression::SequenceExpression { .. } => Precedence::Sequence,
    }
}

fn bump(p: Precedence) -> Precedence {
    use Precedence::*;
    match p {
        Sequence => Assignment,
        Assignment => Conditional,
        Conditional => NullishCoalescing,
        NullishCoalescing => LogicalOr,
        LogicalOr => LogicalAnd,
        LogicalAnd => BitwiseOr,
        BitwiseOr => BitwiseXor,
        BitwiseXor => BitwiseAnd,
        BitwiseAnd => Equality,
        Equality => Relational,
        Relational => Shift,
        Shift => Additive,
        Additive => Multiplicative,
        Multiplicative => Exponentiation,
        Exponentiation => Unary,
        Unary => Postfix,
        Postfix => Call,
        Call => Member,
        Member => Primary,
        Primary => Primary,
    }
}

fn binary_precedence(op: BinaryOperator) -> Precedence {
    use BinaryOperator::*;
    match op {
        LogicalOr => Precedence::LogicalOr,
        LogicalAnd => Precedence::LogicalAnd,
        BitwiseOr => Precedence::BitwiseOr,
        BitwiseXor => Precedence::BitwiseXor,
        BitwiseAnd => Precedence::BitwiseAnd,
        Equal | NotEqual | StrictEqual | StrictNotEqual => Precedence::Equality,
        LessThan | LessThanEqual | GreaterThan | GreaterThanEqual | In | Instanceof => Precedence::Relational,
        LeftShift | RightShift | UnsignedRightShift => Precedence::Shift,
        Add | Subtract => Precedence::Additive,
        Multiply | Divide | Remainder => Precedence::Multiplicative,
        Exponentiation => Precedence::Exponentiation,
    }
}

fn binary_operator_str(op: BinaryOperator) -> &'static str {
    use BinaryOperator::*;
    match op {
        Add => "+",
        Subtract => "-",
        Multiply => "*",
        Divide => "/",
        Remainder => "%",
        Exponentiation => "**",
        Equal => "==",
        NotEqual => "!=",
        StrictEqual => "===",
        StrictNotEqual => "!==",
        LessThan => "<",
        LessThanEqual => "<=",
        GreaterThan => ">",
        GreaterThanEqual => ">=",
        LeftShift => "<<",
        RightShift => ">>",
        UnsignedRightShift => ">>>",
        BitwiseAnd => "&",
        BitwiseOr => "|",
        BitwiseXor => "^",
        LogicalAnd => "&&",
        LogicalOr => "||",
        In => " in ",
        Instanceof => " instanceof ",
    }
}

fn unary_operator_str(op: UnaryOperator) -> &'static str {
    match op {
        UnaryOperator::Plus => "+",
        UnaryOperator::Minus => "-",
        UnaryOperator::LogicalNot => "!",
        UnaryOperator::BitwiseNot => "~",
        UnaryOperator::Typeof => "typeof",
        UnaryOperator::Void => "void",
        UnaryOperator::Delete => "delete",
    }
}

fn assignment_operator_str(op: AssignmentOperator) -> &'static str {
    use AssignmentOperator::*;
    match op {
        Assign => "=",
        AddAssign => "+=",
        SubtractAssign => "-=",
        MultiplyAssign => "*=",
        DivideAssign => "/=",
        RemainderAssign => "%=",
        ExponentiationAssign => "**=",
        LeftShiftAssign => "<<=",
        RightShiftAssign => ">>=",
        UnsignedRightShiftAssign => ">>>=",
        BitwiseAndAssign => "&=",
        BitwiseOrAssign => "|=",
        BitwiseXorAssign => "^=",
        LogicalAndAssign => "&&=",
        LogicalOrAssign => "||=",
        NullishCoalescingAssign => "??=",
    }
}

fn escape_string(content: &str, quote: char) -> String {
    let mut result = String::with_capacity(content.len());
    for ch in content.chars() {
        match ch {
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\\' => result.push_str("\\\\"),
            c if c == quote => {
                result.push('\\');
                result.push(c);
            }
            c => result.push(c),
        }
    }
    result
}

fn escape_template_element(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '`' => result.push_str("\\`"),
            '\\' => result.push_str("\\\\"),
            '$' if chars.peek() == Some(&'{') => {
                result.push_str("\\${");
                chars.next();
            }
            c => result.push(c),
        }
    }
    result
}

fn canonicalize_number(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorConfig;

    fn program_of(body: Vec<Statement>) -> Program {
        Program { body, source_type: ProgramSourceType::Script }
    }

    #[test]
    fn prints_simple_variable_declaration() {
        let config = GeneratorConfig::default();
        let mut printer = Printer::new(&config);
        let program = program_of(vec![Statement::VariableDeclaration {
            declarations: vec![VariableDeclarator {
                id: Pattern::Identifier(Identifier { name: "x".to_string() }),
                init: Some(Expression::Literal(Literal::Number(NumberLiteral { value: 5.0 }))),
            }],
            kind: VariableDeclarationKind::Let,
            leading_comments: vec![],
        }]);

        let result = printer.print_program(&program).unwrap();
        assert_eq!(result.trim(), "let x=5;");
    }

    #[test]
    fn parenthesizes_lower_precedence_left_operand() {
        let config = GeneratorConfig::default();
        let mut printer = Printer::new(&config);
        // (1 + 2) * 3
        let expr = Expression::BinaryExpression {
            left: Box::new(Expression::BinaryExpression {
                left: Box::new(Expression::Literal(Literal::Number(NumberLiteral { value: 1.0 }))),
                operator: BinaryOperator::Add,
                right: Box::new(Expression::Literal(Literal::Number(NumberLiteral { value: 2.0 }))),
            }),
            operator: BinaryOperator::Multiply,
            right: Box::new(Expression::Literal(Literal::Number(NumberLiteral { value: 3.0 }))),
        };
        let program = program_of(vec![Statement::ExpressionStatement { expression: expr, leading_comments: vec![] }]);
        let result = printer.print_program(&program).unwrap();
        assert_eq!(result.trim(), "(1+2)*3;");
    }

    #[test]
    fn wraps_leading_object_literal_expression_statement() {
        let config = GeneratorConfig::default();
        let mut printer = Printer::new(&config);
        let program = program_of(vec![Statement::ExpressionStatement {
            expression: Expression::ObjectExpression { properties: vec![] },
            leading_comments: vec![],
        }]);
        let result = printer.print_program(&program).unwrap();
        assert_eq!(result.trim(), "({});");
    }

    #[test]
    fn emits_decrypt_failed_comment_when_preserving() {
        let mut config = GeneratorConfig::default();
        config.preserve_comments = crate::generator::CommentPreservation::All;
        let mut printer = Printer::new(&config);
        let program = program_of(vec![Statement::ExpressionStatement {
            expression: Expression::Identifier(Identifier { name: "x".to_string() }),
            leading_comments: vec![LeadingComment { text: "decrypt failed: timeout".to_string() }],
        }]);
        let result = printer.print_program(&program).unwrap();
        assert!(result.contains("decrypt failed: timeout"));
    }
}
