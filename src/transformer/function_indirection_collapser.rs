//! # Function Indirection Collapser
//!
//! Collapses a function declared purely to forward its arguments to another
//! function, e.g. `function a(b,c){ return d(b,c); }`, by replacing every
//! call to `a` with a call to `d` directly and dropping the now-unused
//! declaration. `unused_declaration_remover` runs after this in the pipeline
//! and cleans up the dangling `function a(...)`.

use crate::parser::ast_types::*;
use crate::traversal::{self, Visitor, VisitControl};
use std::collections::HashMap;

pub fn collapse_indirection(program: &mut Program) -> u32 {
    let aliases = find_forwarding_aliases(&program.body);
    if aliases.is_empty() {
        return 0;
    }

    let mut rewriter = AliasRewriter { aliases, changes: 0 };
    for stmt in program.body.iter_mut() {
        traversal::walk_statement(stmt, &mut rewriter);
    }
    rewriter.changes
}

/// Maps an alias function's name to the name of the function it forwards to,
/// for every top-level declaration shaped like `function a(...p){ return
/// target(...p); }` with parameters forwarded in order and unmodified.
fn find_forwarding_aliases(body: &[Statement]) -> HashMap<String, String> {
    let mut aliases = HashMap::new();
    for stmt in body {
        if let Statement::FunctionDeclaration { id: Some(id), params, body, .. } = stmt {
            if let Some(target) = forwarding_target(params, &body.body) {
                if target != id.name {
                    aliases.insert(id.name.clone(), target);
                }
            }
        }
    }
    aliases
}

fn forwarding_target(params: &[Pattern], body: &[Statement]) -> Option<String> {
    let [Statement::ReturnStatement { argument: Some(Expression::CallExpression { callee, arguments }) }] = body else {
        return None;
    };

    let Expression::Identifier(target) = callee.as_ref() else {
        return None;
    };

    if arguments.len() != params.len() {
        return None;
    }

    for (param, arg) in params.iter().zip(arguments.iter()) {
        let (Pattern::Identifier(param_id), Argument::Expression(Expression::Identifier(arg_id))) = (param, arg) else {
            return None;
        };
        if param_id.name != arg_id.name {
            return None;
        }
    }

    Some(target.name.clone())
}

struct AliasRewriter {
    aliases: HashMap<String, String>,
    changes: u32,
}

impl Visitor for AliasRewriter {
    fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
        if let Expression::CallExpression { callee, .. } = expr {
            if let Expression::Identifier(id) = callee.as_mut() {
                if let Some(target) = self.aliases.get(&id.name) {
                    id.name = target.clone();
                    self.changes += 1;
                }
            }
        }
        VisitControl::Continue
    }
}
