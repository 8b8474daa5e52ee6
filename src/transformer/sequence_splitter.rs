//! # Sequence Splitter
//!
//! Breaks a comma-expression used in a statement-ish position into its own
//! statements, keeping the final value in its original role. This undoes the
//! obfuscator habit of packing several independent effects into one
//! `SequenceExpression` to save bytes (`a=1,b=2;` instead of `a=1;b=2;`).

use crate::parser::ast_types::*;

/// Splits sequence expressions throughout `program`, recursing into every
/// nested block. Returns the number of statements produced by a split.
pub fn split_sequences(program: &mut Program) -> u32 {
    split_in_block(&mut program.body)
}

fn split_in_block(body: &mut Vec<Statement>) -> u32 {
    let mut changes = 0;
    let mut new_body = Vec::with_capacity(body.len());

    for mut stmt in body.drain(..) {
        changes += recurse_into(&mut stmt);
        changes += split_statement(stmt, &mut new_body);
    }

    *body = new_body;
    changes
}

/// Recurses into every nested statement list reachable from `stmt` without
/// touching `stmt` itself (that happens in [`split_statement`]).
fn recurse_into(stmt: &mut Statement) -> u32 {
    match stmt {
        Statement::BlockStatement { body } => split_in_block(body),
        Statement::FunctionDeclaration { body, .. } => split_in_block(&mut body.body),
        Statement::IfStatement { consequent, alternate, .. } => {
            let mut changes = recurse_into(consequent);
            if let Some(alt) = alternate {
                changes += recurse_into(alt);
            }
            changes
        }
        Statement::WhileStatement { body, .. } | Statement::DoWhileStatement { body, .. } => {
            recurse_into(body)
        }
        Statement::ForStatement { body, .. }
        | Statement::ForInStatement { body, .. }
        | Statement::ForOfStatement { body, .. } => recurse_into(body),
        Statement::TryStatement { block, handler, finalizer } => {
            let mut changes = split_in_block(&mut block.body);
            if let Some(handler) = handler {
                changes += split_in_block(&mut handler.body.body);
            }
            if let Some(finalizer) = finalizer {
                changes += split_in_block(&mut finalizer.body);
            }
            changes
        }
        Statement::SwitchStatement { cases, .. } => {
            cases.iter_mut().map(|case| split_in_block(&mut case.consequent)).sum()
        }
        Statement::LabeledStatement { body, .. } => recurse_into(body),
        _ => 0,
    }
}

/// Splits `stmt` itself if it embeds a sequence expression in a splittable
/// position, pushing the resulting statements onto `out`.
fn split_statement(stmt: Statement, out: &mut Vec<Statement>) -> u32 {
    match stmt {
        Statement::ForStatement { init: Some(ForInit::Expression(Expression::SequenceExpression { expressions })), test, update, mut body } => {
            if let Some(changes) = hoist_for_init(expressions.clone(), &mut body, test.clone(), update.clone(), out) {
                return changes;
            }
            out.push(Statement::ForStatement {
                init: Some(ForInit::Expression(Expression::SequenceExpression { expressions })),
                test,
                update,
                body,
            });
            0
        }
        Statement::ExpressionStatement { expression: Expression::SequenceExpression { expressions }, leading_comments } => {
            emit_sequence_as_statements(expressions, leading_comments, out)
        }
        Statement::ReturnStatement { argument: Some(Expression::SequenceExpression { mut expressions }) } => {
            let last = expressions.pop();
            let changes = emit_leading(&mut expressions, out);
            out.push(Statement::ReturnStatement { argument: last });
            changes
        }
        Statement::ThrowStatement { argument: Expression::SequenceExpression { mut expressions } } => {
            let last = expressions.pop().expect("sequence expression has at least one element");
            let changes = emit_leading(&mut expressions, out);
            out.push(Statement::ThrowStatement { argument: last });
            changes
        }
        Statement::IfStatement { test: Expression::SequenceExpression { mut expressions }, consequent, alternate } => {
            let last = expressions.pop().expect("sequence expression has at least one element");
            let changes = emit_leading(&mut expressions, out);
            out.push(Statement::IfStatement { test: last, consequent, alternate });
            changes
        }
        Statement::SwitchStatement { discriminant: Expression::SequenceExpression { mut expressions }, cases } => {
            let last = expressions.pop().expect("sequence expression has at least one element");
            let changes = emit_leading(&mut expressions, out);
            out.push(Statement::SwitchStatement { discriminant: last, cases });
            changes
        }
        other => {
            out.push(other);
            0
        }
    }
}

fn emit_sequence_as_statements(expressions: Vec<Expression>, leading_comments: Vec<LeadingComment>, out: &mut Vec<Statement>) -> u32 {
    let mut changes = 0;
    let len = expressions.len();
    for (i, expr) in expressions.into_iter().enumerate() {
        out.push(Statement::ExpressionStatement {
            expression: expr,
            leading_comments: if i == 0 { leading_comments.clone() } else { vec![] },
        });
        if i + 1 < len {
            changes += 1;
        }
    }
    changes
}

fn emit_leading(expressions: &mut Vec<Expression>, out: &mut Vec<Statement>) -> u32 {
    let changes = expressions.len() as u32;
    for expr in expressions.drain(..) {
        out.push(Statement::ExpressionStatement { expression: expr, leading_comments: vec![] });
    }
    changes
}

/// Recognizes `for(a=1, b=2, tailExpr; test; update) { var a; var b; ...body }`
/// and hoists the leading assignments as `var` declarations before the loop,
/// dropping the now-redundant empty `var` declarators in the body.
fn hoist_for_init(
    mut expressions: Vec<Expression>,
    body: &mut Box<Statement>,
    test: Option<Expression>,
    update: Option<Expression>,
    out: &mut Vec<Statement>,
) -> Option<u32> {
    let hoistable_count = expressions
        .iter()
        .take_while(|e| matches!(e, Expression::AssignmentExpression { left, operator: AssignmentOperator::Assign, .. } if matches!(left.as_ref(), Expression::Identifier(_))))
        .count();

    if hoistable_count == 0 {
        return None;
    }

    let tail: Vec<Expression> = expressions.split_off(hoistable_count);
    let mut hoisted_names = Vec::new();

    for assign in expressions {
        if let Expression::AssignmentExpression { left, right, .. } = assign {
            if let Expression::Identifier(id) = *left {
                hoisted_names.push(id.name.clone());
                out.push(Statement::VariableDeclaration {
                    declarations: vec![VariableDeclarator {
                        id: Pattern::Identifier(id),
                        init: Some(*right),
                    }],
                    kind: VariableDeclarationKind::Var,
                    leading_comments: vec![],
                });
            }
        }
    }

    if let Statement::BlockStatement { body: block_body } = body.as_mut() {
        remove_empty_var_decls(block_body, &hoisted_names);
    }

    let new_init = match tail.len() {
        0 => None,
        1 => Some(ForInit::Expression(tail.into_iter().next().unwrap())),
        _ => Some(ForInit::Expression(Expression::SequenceExpression { expressions: tail })),
    };

    out.push(Statement::ForStatement { init: new_init, test, update, body: std::mem::replace(body, Box::new(Statement::EmptyStatement)) });

    Some(hoisted_names.len() as u32)
}

fn remove_empty_var_decls(body: &mut Vec<Statement>, names: &[String]) {
    body.retain(|stmt| {
        if let Statement::VariableDeclaration { declarations, kind: VariableDeclarationKind::Var, .. } = stmt {
            if declarations.len() == 1 && declarations[0].init.is_none() {
                if let Pattern::Identifier(id) = &declarations[0].id {
                    if names.contains(&id.name) {
                        return false;
                    }
                }
            }
        }
        true
    });
}
