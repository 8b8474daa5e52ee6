//! # Unused Declaration Remover
//!
//! Deletes a `var`/`let`/`const`/function declaration that nothing in its
//! enclosing block ever reads or calls. Runs last in the default pipeline so
//! it can clean up the dead declarations every other pass leaves behind
//! (`constant_inliner`'s inlined bindings, `function_indirection_collapser`'s
//! redirected wrappers, `unreachable_branch_collapser`'s hoisted names).

use crate::parser::ast_types::*;
use crate::traversal::{self, Visitor, VisitControl};

pub fn remove_unused_declarations(program: &mut Program) -> u32 {
    remove_in_block(&mut program.body)
}

fn remove_in_block(body: &mut Vec<Statement>) -> u32 {
    let mut changes = 0;
    let mut removed_any = true;

    // Iterate to a local fixpoint: removing `function a(){ return b(); }`
    // can make `b` itself dead if `a` was its only caller.
    while removed_any {
        removed_any = false;
        let mut new_body = Vec::with_capacity(body.len());

        for (i, stmt) in body.iter().enumerate() {
            if let Some(name) = declared_name(stmt) {
                let referenced_elsewhere = body
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != i && references(other, &name));
                if !referenced_elsewhere && !is_exported_surface(&name) {
                    changes += 1;
                    removed_any = true;
                    continue;
                }
            }
            new_body.push(stmt.clone());
        }

        *body = new_body;
    }

    for stmt in body.iter_mut() {
        changes += recurse_into(stmt);
    }

    changes
}

fn recurse_into(stmt: &mut Statement) -> u32 {
    match stmt {
        Statement::BlockStatement { body } => remove_in_block(body),
        Statement::FunctionDeclaration { body, .. } => remove_in_block(&mut body.body),
        Statement::IfStatement { consequent, alternate, .. } => {
            let mut changes = recurse_into(consequent);
            if let Some(alt) = alternate {
                changes += recurse_into(alt);
            }
            changes
        }
        Statement::WhileStatement { body, .. } | Statement::DoWhileStatement { body, .. } => recurse_into(body),
        Statement::ForStatement { body, .. }
        | Statement::ForInStatement { body, .. }
        | Statement::ForOfStatement { body, .. } => recurse_into(body),
        Statement::TryStatement { block, handler, finalizer } => {
            let mut changes = remove_in_block(&mut block.body);
            if let Some(handler) = handler {
                changes += remove_in_block(&mut handler.body.body);
            }
            if let Some(finalizer) = finalizer {
                changes += remove_in_block(&mut finalizer.body);
            }
            changes
        }
        Statement::SwitchStatement { cases, .. } => cases.iter_mut().map(|c| remove_in_block(&mut c.consequent)).sum(),
        Statement::LabeledStatement { body, .. } => recurse_into(body),
        _ => 0,
    }
}

/// `main`/`init`-style top-level entry points are conventionally invoked by
/// a host page via inline `onload`/script tags rather than from within the
/// file itself; treating every unreferenced top-level function as dead would
/// delete them. A narrow, explicit allowlist avoids that without requiring a
/// host-binding model this crate doesn't have.
fn is_exported_surface(name: &str) -> bool {
    matches!(name, "main" | "init")
}

fn declared_name(stmt: &Statement) -> Option<String> {
    match stmt {
        Statement::VariableDeclaration { declarations, .. } if declarations.len() == 1 => match &declarations[0].id {
            Pattern::Identifier(id) => Some(id.name.clone()),
            _ => None,
        },
        Statement::FunctionDeclaration { id: Some(id), .. } => Some(id.name.clone()),
        _ => None,
    }
}

fn references(stmt: &Statement, name: &str) -> bool {
    struct Checker<'a> {
        name: &'a str,
        found: bool,
    }
    impl Visitor for Checker<'_> {
        fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
            if let Expression::Identifier(id) = expr {
                if id.name == self.name {
                    self.found = true;
                }
            }
            VisitControl::Continue
        }
    }

    let mut checker = Checker { name, found: false };
    let mut clone = stmt.clone();
    traversal::walk_statement(&mut clone, &mut checker);
    checker.found
}
