//! # Control-Flow Unflattener
//!
//! Reverses the "dispatcher" control-flow flattening idiom: a sequence of
//! statements is split across `switch` cases, and a string-encoded array
//! supplies the order a `while(true)` loop should visit them in.
//!
//! ```js
//! var order = "1|3|2|0".split("|");
//! var i = 0;
//! while (true) {
//!   switch (order[i++]) {
//!     case "0": d(); break;
//!     case "1": a(); continue;
//!     case "2": c(); continue;
//!     case "3": b(); continue;
//!   }
//!   break;
//! }
//! ```
//!
//! becomes `a(); b(); c(); d();` in the dispatch order, since `order` visits
//! case `"1"` first, then `"3"`, then `"2"`, then `"0"`.

use crate::parser::ast_types::*;

pub fn unflatten_control_flow(program: &mut Program) -> u32 {
    unflatten_in_block(&mut program.body)
}

fn unflatten_in_block(body: &mut Vec<Statement>) -> u32 {
    let mut changes = 0;
    let mut new_body = Vec::with_capacity(body.len());

    let mut i = 0;
    while i < body.len() {
        if let Some(order_index) = find_dispatch_order(body, i) {
            if let Some(flat) = try_unflatten(&body[order_index..=i]) {
                changes += 1;
                new_body.truncate(new_body.len() - (i - order_index));
                new_body.extend(flat);
                i += 1;
                continue;
            }
        }
        let mut stmt = body[i].clone();
        changes += recurse_into(&mut stmt);
        new_body.push(stmt);
        i += 1;
    }

    *body = new_body;
    changes
}

fn recurse_into(stmt: &mut Statement) -> u32 {
    match stmt {
        Statement::BlockStatement { body } => unflatten_in_block(body),
        Statement::FunctionDeclaration { body, .. } => unflatten_in_block(&mut body.body),
        Statement::IfStatement { consequent, alternate, .. } => {
            let mut changes = recurse_into(consequent);
            if let Some(alt) = alternate {
                changes += recurse_into(alt);
            }
            changes
        }
        Statement::TryStatement { block, handler, finalizer } => {
            let mut changes = unflatten_in_block(&mut block.body);
            if let Some(handler) = handler {
                changes += unflatten_in_block(&mut handler.body.body);
            }
            if let Some(finalizer) = finalizer {
                changes += unflatten_in_block(&mut finalizer.body);
            }
            changes
        }
        _ => 0,
    }
}

/// Looks backward from `while_idx` for the nearest `var order = "...".split("|")`
/// whose name matches the while loop's dispatch discriminant. Returns the
/// index of that `var order` declaration if the whole shape lines up.
fn find_dispatch_order(body: &[Statement], while_idx: usize) -> Option<usize> {
    let Statement::WhileStatement { test: Expression::Literal(Literal::Boolean(b)), body: loop_body } = &body[while_idx] else {
        return None;
    };
    if !b.value {
        return None;
    }
    let Statement::BlockStatement { body: loop_stmts } = loop_body.as_ref() else { return None };
    let Some(Statement::SwitchStatement { discriminant, .. }) = loop_stmts.first() else { return None };
    let Expression::MemberExpression { object, computed: true, .. } = discriminant else { return None };
    let Expression::Identifier(order_id) = object.as_ref() else { return None };

    (0..while_idx).rev().find(|&i| matches!(&body[i], Statement::VariableDeclaration { declarations, .. }
        if declarations.len() == 1 && matches!(&declarations[0].id, Pattern::Identifier(id) if id.name == order_id.name)))
}

/// `window` is the slice `body[order_idx..=while_idx]`: the `var order = ...`
/// declaration, the `var i = 0` index declaration (if present), and the
/// `while` loop itself, in that order (other statements may sit between the
/// two `var`s and the loop; those are left untouched ahead of the flattened
/// output).
fn try_unflatten(window: &[Statement]) -> Option<Vec<Statement>> {
    let Statement::VariableDeclaration { declarations, .. } = window.first()? else { return None };
    let Some(Expression::CallExpression { callee, arguments }) = declarations.first().and_then(|d| d.init.as_ref()) else {
        return None;
    };
    let Expression::MemberExpression { object, property, computed: false } = callee.as_ref() else { return None };
    let Expression::Literal(Literal::String(source)) = object.as_ref() else { return None };
    let Expression::Identifier(method) = property.as_ref() else { return None };
    if method.name != "split" {
        return None;
    }
    let Some(Argument::Expression(Expression::Literal(Literal::String(sep)))) = arguments.first() else {
        return None;
    };

    let order: Vec<&str> = source.value.split(sep.value.as_str()).collect();

    let Statement::WhileStatement { body: loop_body, .. } = window.last()? else { return None };
    let Statement::BlockStatement { body: loop_stmts } = loop_body.as_ref() else { return None };
    let Statement::SwitchStatement { cases, .. } = loop_stmts.first()? else { return None };

    let mut flat = Vec::new();
    for label in &order {
        let case = cases.iter().find(|c| matches!(&c.test, Some(Expression::Literal(Literal::String(s))) if s.value == *label))?;
        for stmt in &case.consequent {
            if matches!(stmt, Statement::ContinueStatement { label: None } | Statement::BreakStatement { label: None }) {
                continue;
            }
            flat.push(stmt.clone());
        }
    }

    Some(flat)
}
