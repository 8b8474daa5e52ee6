//! # AST Traversal
//!
//! A generic pre-order visitor over the owned AST. Each transform pass
//! implements [`Visitor`] and overrides only the node kinds it cares about;
//! `walk_*` drives the recursion and is shared across every pass so a single
//! fixpoint loop in `transformer` can run them all the same way.
//!
//! Visiting is pre-order: a visitor sees a node before its children. A
//! visitor that replaces a node with a new subtree does not get a second
//! pass over the replacement in the same walk — the next fixpoint iteration
//! picks it up. Returning [`VisitControl::SkipChildren`] from a hook stops
//! the walk from descending into that node's children at all.

use crate::parser::ast_types::{
    ArrowFunctionBody, ClassElement, Expression, ForInit, ObjectPatternProperty, ObjectProperty,
    Pattern, Program, PropertyKey, Statement,
};

/// Whether the driver should continue into a node's children after a hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    Continue,
    SkipChildren,
}

impl Default for VisitControl {
    fn default() -> Self {
        VisitControl::Continue
    }
}

/// Callbacks invoked for every statement and expression node encountered
/// during a walk. Default implementations continue into children untouched.
pub trait Visitor {
    fn visit_statement(&mut self, _stmt: &mut Statement) -> VisitControl {
        VisitControl::Continue
    }

    fn visit_expression(&mut self, _expr: &mut Expression) -> VisitControl {
        VisitControl::Continue
    }

    fn visit_pattern(&mut self, _pattern: &mut Pattern) -> VisitControl {
        VisitControl::Continue
    }
}

pub fn walk_program(program: &mut Program, visitor: &mut dyn Visitor) {
    for stmt in &mut program.body {
        walk_statement(stmt, visitor);
    }
}

pub fn walk_statement(stmt: &mut Statement, visitor: &mut dyn Visitor) {
    if visitor.visit_statement(stmt) == VisitControl::SkipChildren {
        return;
    }

    match stmt {
        Statement::VariableDeclaration { declarations, .. } => {
            for decl in declarations {
                walk_pattern(&mut decl.id, visitor);
                if let Some(init) = &mut decl.init {
                    walk_expression(init, visitor);
                }
            }
        }
        Statement::FunctionDeclaration { params, body, .. } => {
            for param in params {
                walk_pattern(param, visitor);
            }
            for stmt in &mut body.body {
                walk_statement(stmt, visitor);
            }
        }
        Statement::ClassDeclaration { super_class, body, .. } => {
            if let Some(super_class) = super_class {
                walk_expression(super_class, visitor);
            }
            walk_class_body(body, visitor);
        }
        Statement::ExpressionStatement { expression, .. } => {
            walk_expression(expression, visitor);
        }
        Statement::BlockStatement { body } => {
            for stmt in body {
                walk_statement(stmt, visitor);
            }
        }
        Statement::ReturnStatement { argument } => {
            if let Some(argument) = argument {
                walk_expression(argument, visitor);
            }
        }
        Statement::IfStatement { test, consequent, alternate } => {
            walk_expression(test, visitor);
            walk_statement(consequent, visitor);
            if let Some(alternate) = alternate {
                walk_statement(alternate, visitor);
            }
        }
        Statement::WhileStatement { test, body } | Statement::DoWhileStatement { test, body } => {
            walk_expression(test, visitor);
            walk_statement(body, visitor);
        }
        Statement::ForStatement { init, test, update, body } => {
            if let Some(init) = init {
                walk_for_init(init, visitor);
            }
            if let Some(test) = test {
                walk_expression(test, visitor);
            }
            if let Some(update) = update {
                walk_expression(update, visitor);
            }
            walk_statement(body, visitor);
        }
        Statement::ForInStatement { left, right, body }
        | Statement::ForOfStatement { left, right, body, .. } => {
            walk_for_init(left, visitor);
            walk_expression(right, visitor);
            walk_statement(body, visitor);
        }
        Statement::SwitchStatement { discriminant, cases } => {
            walk_expression(discriminant, visitor);
            for case in cases {
                if let Some(test) = &mut case.test {
                    walk_expression(test, visitor);
                }
                for stmt in &mut case.consequent {
                    walk_statement(stmt, visitor);
                }
            }
        }
        Statement::ThrowStatement { argument } => {
            walk_expression(argument, visitor);
        }
        Statement::TryStatement { block, handler, finalizer } => {
            for stmt in &mut block.body {
                walk_statement(stmt, visitor);
            }
            if let Some(handler) = handler {
                if let Some(param) = &mut handler.param {
                    walk_pattern(param, visitor);
                }
                for stmt in &mut handler.body.body {
                    walk_statement(stmt, visitor);
                }
            }
            if let Some(finalizer) = finalizer {
                for stmt in &mut finalizer.body {
                    walk_statement(stmt, visitor);
                }
            }
        }
        Statement::LabeledStatement { body, .. } => {
            walk_statement(body, visitor);
        }
        Statement::BreakStatement { .. }
        | Statement::ContinueStatement { .. }
        | Statement::DebuggerStatement { .. }
        | Statement::EmptyStatement => {}
        Statement::ImportDeclaration { .. } => {}
        Statement::ExportNamedDeclaration { declaration, .. } => {
            if let Some(declaration) = declaration {
                walk_statement(declaration, visitor);
            }
        }
    }
}

fn walk_for_init(init: &mut ForInit, visitor: &mut dyn Visitor) {
    match init {
        ForInit::VariableDeclaration { declarations, .. } => {
            for decl in declarations {
                walk_pattern(&mut decl.id, visitor);
                if let Some(init) = &mut decl.init {
                    walk_expression(init, visitor);
                }
            }
        }
        ForInit::Expression(expr) => walk_expression(expr, visitor),
        ForInit::Pattern(pattern) => walk_pattern(pattern, visitor),
    }
}

fn walk_class_body(body: &mut crate::parser::ast_types::ClassBody, visitor: &mut dyn Visitor) {
    for element in &mut body.body {
        match element {
            ClassElement::PropertyDefinition { key, value, .. } => {
                walk_property_key(key, visitor);
                if let Some(value) = value {
                    walk_expression(value, visitor);
                }
            }
            ClassElement::MethodDefinition { key, value, .. } => {
                walk_property_key(key, visitor);
                for param in &mut value.params {
                    walk_pattern(param, visitor);
                }
                for stmt in &mut value.body.body {
                    walk_statement(stmt, visitor);
                }
            }
        }
    }
}

fn walk_property_key(key: &mut PropertyKey, visitor: &mut dyn Visitor) {
    if let PropertyKey::Computed(expr) = key {
        walk_expression(expr, visitor);
    }
}

pub fn walk_expression(expr: &mut Expression, visitor: &mut dyn Visitor) {
    if visitor.visit_expression(expr) == VisitControl::SkipChildren {
        return;
    }

    match expr {
        Expression::Identifier(_) | Expression::Literal(_) | Expression::ThisExpression => {}
        Expression::BinaryExpression { left, right, .. } => {
            walk_expression(left, visitor);
            walk_expression(right, visitor);
        }
        Expression::UnaryExpression { argument, .. } => walk_expression(argument, visitor),
        Expression::AssignmentExpression { left, right, .. } => {
            walk_expression(left, visitor);
            walk_expression(right, visitor);
        }
        Expression::UpdateExpression { argument, .. } => walk_expression(argument, visitor),
        Expression::CallExpression { callee, arguments }
        | Expression::NewExpression { callee, arguments } => {
            walk_expression(callee, visitor);
            for arg in arguments {
                match arg {
                    crate::parser::ast_types::Argument::Expression(expr)
                    | crate::parser::ast_types::Argument::SpreadElement(expr) => {
                        walk_expression(expr, visitor);
                    }
                }
            }
        }
        Expression::MemberExpression { object, property, .. } => {
            walk_expression(object, visitor);
            walk_expression(property, visitor);
        }
        Expression::FunctionExpression(func) => {
            for param in &mut func.params {
                walk_pattern(param, visitor);
            }
            for stmt in &mut func.body.body {
                walk_statement(stmt, visitor);
            }
        }
        Expression::ArrowFunctionExpression { params, body, .. } => {
            for param in params {
                walk_pattern(param, visitor);
            }
            match body {
                ArrowFunctionBody::BlockStatement(block) => {
                    for stmt in &mut block.body {
                        walk_statement(stmt, visitor);
                    }
                }
                ArrowFunctionBody::Expression(expr) => walk_expression(expr, visitor),
            }
        }
        Expression::ObjectExpression { properties } => {
            for prop in properties {
                match prop {
                    ObjectProperty::Property { key, value, .. } => {
                        walk_property_key(key, visitor);
                        walk_expression(value, visitor);
                    }
                    ObjectProperty::SpreadElement { argument } => walk_expression(argument, visitor),
                }
            }
        }
        Expression::ArrayExpression { elements } => {
            for elem in elements.iter_mut().flatten() {
                walk_expression(elem, visitor);
            }
        }
        Expression::SequenceExpression { expressions } => {
            for expr in expressions {
                walk_expression(expr, visitor);
            }
        }
        Expression::TemplateLiteral { expressions, .. } => {
            for expr in expressions {
                walk_expression(expr, visitor);
            }
        }
        Expression::ConditionalExpression { test, consequent, alternate } => {
            walk_expression(test, visitor);
            walk_expression(consequent, visitor);
            walk_expression(alternate, visitor);
        }
    }
}

pub fn walk_pattern(pattern: &mut Pattern, visitor: &mut dyn Visitor) {
    if visitor.visit_pattern(pattern) == VisitControl::SkipChildren {
        return;
    }

    match pattern {
        Pattern::Identifier(_) => {}
        Pattern::ArrayPattern { elements } => {
            for elem in elements.iter_mut().flatten() {
                walk_pattern(elem, visitor);
            }
        }
        Pattern::ObjectPattern { properties } => {
            for prop in properties {
                match prop {
                    ObjectPatternProperty::Property { key, value, .. } => {
                        walk_property_key(key, visitor);
                        walk_pattern(value, visitor);
                    }
                    ObjectPatternProperty::RestElement { argument } => walk_pattern(argument, visitor),
                }
            }
        }
        Pattern::AssignmentPattern { left, right } => {
            walk_pattern(left, visitor);
            walk_expression(right, visitor);
        }
        Pattern::RestElement { argument } => walk_pattern(argument, visitor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast_types::{Literal, NumberLiteral, ProgramSourceType};

    struct CountLiterals {
        count: u32,
    }

    impl Visitor for CountLiterals {
        fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
            if matches!(expr, Expression::Literal(Literal::Number(_))) {
                self.count += 1;
            }
            VisitControl::Continue
        }
    }

    fn program_with(body: Vec<Statement>) -> Program {
        Program { body, source_type: ProgramSourceType::Script }
    }

    #[test]
    fn visits_nested_literals() {
        let mut program = program_with(vec![Statement::ExpressionStatement {
            expression: Expression::BinaryExpression {
                left: Box::new(Expression::Literal(Literal::Number(NumberLiteral { value: 1.0 }))),
                operator: crate::parser::ast_types::BinaryOperator::Add,
                right: Box::new(Expression::Literal(Literal::Number(NumberLiteral { value: 2.0 }))),
            },
            leading_comments: vec![],
        }]);

        let mut counter = CountLiterals { count: 0 };
        walk_program(&mut program, &mut counter);
        assert_eq!(counter.count, 2);
    }

    struct DoubleNumbers;

    impl Visitor for DoubleNumbers {
        fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
            if let Expression::Literal(Literal::Number(n)) = expr {
                n.value *= 2.0;
            }
            VisitControl::Continue
        }
    }

    #[test]
    fn mutates_in_place() {
        let mut program = program_with(vec![Statement::ExpressionStatement {
            expression: Expression::Literal(Literal::Number(NumberLiteral { value: 21.0 })),
            leading_comments: vec![],
        }]);

        walk_program(&mut program, &mut DoubleNumbers);

        match &program.body[0] {
            Statement::ExpressionStatement { expression: Expression::Literal(Literal::Number(n)), .. } => {
                assert_eq!(n.value, 42.0);
            }
            _ => panic!("expected expression statement"),
        }
    }

    struct StopAtCall {
        visited_inner: bool,
    }

    impl Visitor for StopAtCall {
        fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
            match expr {
                Expression::CallExpression { .. } => VisitControl::SkipChildren,
                Expression::Identifier(id) if id.name == "inner" => {
                    self.visited_inner = true;
                    VisitControl::Continue
                }
                _ => VisitControl::Continue,
            }
        }
    }

    #[test]
    fn skip_children_stops_descent() {
        let mut program = program_with(vec![Statement::ExpressionStatement {
            expression: Expression::CallExpression {
                callee: Box::new(Expression::Identifier(crate::parser::ast_types::Identifier {
                    name: "inner".to_string(),
                })),
                arguments: vec![],
            },
            leading_comments: vec![],
        }]);

        let mut probe = StopAtCall { visited_inner: false };
        walk_program(&mut program, &mut probe);
        assert!(!probe.visited_inner);
    }
}
