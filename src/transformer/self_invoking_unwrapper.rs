//! # Self-Invoking Unwrapper
//!
//! Obfuscators wrap an entire script, or an inlined helper, in an
//! immediately-invoked function expression purely for variable-name
//! isolation: `!function(){ ...body... }();`. When the wrapper captures no
//! outer state through its parameters, its body can run directly in the
//! enclosing scope. This pass also beta-reduces the simplest call form,
//! `(function(a){ return a+1; })(x)` -> substituting `x` for `a` in the body,
//! when every parameter is passed a side-effect-free argument used at most
//! once.

use crate::analyzer::scope_utils;
use crate::parser::ast_types::*;
use crate::traversal::{self, Visitor, VisitControl};

pub fn unwrap_self_invoking(program: &mut Program) -> u32 {
    unwrap_in_block(&mut program.body)
}

fn unwrap_in_block(body: &mut Vec<Statement>) -> u32 {
    let mut changes = 0;
    let mut new_body = Vec::with_capacity(body.len());

    for stmt in body.drain(..) {
        match unwrap_statement(stmt) {
            Ok((mut unwrapped, count)) => {
                changes += count;
                changes += recurse_children(&mut unwrapped);
                // Keep the unwrapped body in its own block so any
                // let/const/class/function it declares stays block-scoped
                // instead of merging into the surrounding statement list.
                new_body.push(Statement::BlockStatement { body: unwrapped });
            }
            Err(mut stmt) => {
                changes += recurse_children_single(&mut stmt);
                new_body.push(stmt);
            }
        }
    }

    *body = new_body;
    changes
}

fn recurse_children(stmts: &mut [Statement]) -> u32 {
    stmts.iter_mut().map(recurse_children_single).sum()
}

fn recurse_children_single(stmt: &mut Statement) -> u32 {
    match stmt {
        Statement::BlockStatement { body } => unwrap_in_block(body),
        Statement::FunctionDeclaration { body, .. } => unwrap_in_block(&mut body.body),
        Statement::IfStatement { consequent, alternate, .. } => {
            let mut changes = recurse_children_single(consequent);
            if let Some(alt) = alternate {
                changes += recurse_children_single(alt);
            }
            changes
        }
        Statement::WhileStatement { body, .. } | Statement::DoWhileStatement { body, .. } => recurse_children_single(body),
        Statement::ForStatement { body, .. }
        | Statement::ForInStatement { body, .. }
        | Statement::ForOfStatement { body, .. } => recurse_children_single(body),
        _ => 0,
    }
}

/// Tries to unwrap `stmt` into a flat list of replacement statements.
/// Returns `Err(stmt)` unchanged when the statement doesn't match an
/// unwrappable shape.
fn unwrap_statement(stmt: Statement) -> Result<(Vec<Statement>, u32), Statement> {
    match stmt {
        Statement::ExpressionStatement { expression, .. } => match unwrap_iife(expression) {
            Ok(body) => Ok((body, 1)),
            Err(expr) => Err(Statement::ExpressionStatement { expression: expr, leading_comments: vec![] }),
        },
        other => Err(other),
    }
}

/// Recognizes `!function(){...}();`, `(function(){...})();` and their
/// parameter-bearing beta-reducible form; returns the unwrapped statement
/// list on success or the original expression on failure.
fn unwrap_iife(expr: Expression) -> Result<Vec<Statement>, Expression> {
    let call = match expr {
        Expression::UnaryExpression { operator: UnaryOperator::LogicalNot, argument, .. } => match *argument {
            call @ Expression::CallExpression { .. } => call,
            other => return Err(Expression::UnaryExpression { operator: UnaryOperator::LogicalNot, argument: Box::new(other), prefix: true }),
        },
        call @ Expression::CallExpression { .. } => call,
        other => return Err(other),
    };

    let Expression::CallExpression { callee, arguments } = call else { unreachable!() };

    let func = match *callee {
        Expression::FunctionExpression(func) => func,
        other => return Err(Expression::CallExpression { callee: Box::new(other), arguments }),
    };

    if func.is_generator || func.is_async || func.id.is_some() {
        return Err(Expression::CallExpression { callee: Box::new(Expression::FunctionExpression(func)), arguments });
    }

    if !captures_no_external_state(&func.body.body) {
        return Err(Expression::CallExpression { callee: Box::new(Expression::FunctionExpression(func)), arguments });
    }

    let mut body = func.body.body;

    if !func.params.is_empty() && func.params.len() == arguments.len() {
        for (param, arg) in func.params.iter().zip(arguments.iter()) {
            if let (Pattern::Identifier(id), Argument::Expression(value)) = (param, arg) {
                if is_substitutable(value) {
                    substitute_identifier(&mut body, &id.name, value);
                }
            }
        }
    }

    Ok(body)
}

/// A wrapper is safe to inline in place only if it never references `this`
/// or `arguments`, since those would resolve differently once unwrapped.
fn captures_no_external_state(body: &[Statement]) -> bool {
    struct Checker {
        safe: bool,
    }
    impl Visitor for Checker {
        fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
            match expr {
                Expression::ThisExpression => self.safe = false,
                Expression::Identifier(id) if id.name == "arguments" => self.safe = false,
                _ => {}
            }
            VisitControl::Continue
        }
    }
    let mut checker = Checker { safe: true };
    let mut clone: Vec<Statement> = body.to_vec();
    for stmt in clone.iter_mut() {
        traversal::walk_statement(stmt, &mut checker);
    }
    checker.safe
}

fn is_substitutable(expr: &Expression) -> bool {
    matches!(expr, Expression::Identifier(_) | Expression::Literal(_))
}

fn substitute_identifier(body: &mut Vec<Statement>, name: &str, value: &Expression) {
    match value {
        Expression::Identifier(id) => scope_utils::rename_fast(body, name, &id.name),
        _ => {
            struct Substituter<'a> {
                name: &'a str,
                value: Expression,
            }
            impl Visitor for Substituter<'_> {
                fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
                    if let Expression::Identifier(id) = expr {
                        if id.name == self.name {
                            *expr = self.value.clone();
                        }
                    }
                    VisitControl::Continue
                }
            }
            let mut sub = Substituter { name, value: value.clone() };
            for stmt in body.iter_mut() {
                traversal::walk_statement(stmt, &mut sub);
            }
        }
    }
}
