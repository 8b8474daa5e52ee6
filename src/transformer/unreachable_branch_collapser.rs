//! # Unreachable Branch Collapser
//!
//! Once `binary_evaluator` has reduced a condition to a literal boolean, the
//! branch that can never run is dead. This pass drops it and replaces the
//! `if`/`while`/ternary with whichever side survives, alpha-renaming any
//! `var`/function declaration the dropped branch hoisted so sibling code that
//! already relies on the hoisted name doesn't go dangling.

use crate::analyzer::scope_utils;
use crate::parser::ast_types::*;

pub fn collapse_unreachable_branches(program: &mut Program) -> u32 {
    collapse_in_block(&mut program.body)
}

fn collapse_in_block(body: &mut Vec<Statement>) -> u32 {
    let mut changes = 0;
    let mut new_body = Vec::with_capacity(body.len());

    for mut stmt in body.drain(..) {
        changes += recurse_into(&mut stmt);
        changes += collapse_statement(stmt, &mut new_body);
    }

    *body = new_body;
    changes
}

fn recurse_into(stmt: &mut Statement) -> u32 {
    match stmt {
        Statement::BlockStatement { body } => collapse_in_block(body),
        Statement::FunctionDeclaration { body, .. } => collapse_in_block(&mut body.body),
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
            let mut changes = collapse_in_block(&mut block.body);
            if let Some(handler) = handler {
                changes += collapse_in_block(&mut handler.body.body);
            }
            if let Some(finalizer) = finalizer {
                changes += collapse_in_block(&mut finalizer.body);
            }
            changes
        }
        Statement::SwitchStatement { cases, .. } => cases.iter_mut().map(|c| collapse_in_block(&mut c.consequent)).sum(),
        Statement::LabeledStatement { body, .. } => recurse_into(body),
        _ => 0,
    }
}

fn collapse_statement(stmt: Statement, out: &mut Vec<Statement>) -> u32 {
    match stmt {
        Statement::IfStatement { test: Expression::Literal(Literal::Boolean(b)), consequent, alternate } => {
            let (kept, dropped) = if b.value {
                (Some(*consequent), alternate.map(|a| *a))
            } else {
                (alternate.map(|a| *a), Some(*consequent))
            };

            if let Some(dropped) = dropped {
                stub_hoisted_vars(&dropped, out);
            }

            if let Some(kept) = kept {
                hoist_kept_branch(kept, out);
            }
            1
        }
        Statement::WhileStatement { test: Expression::Literal(Literal::Boolean(b)), body } if !b.value => {
            stub_hoisted_vars(&body, out);
            1
        }
        other => {
            out.push(other);
            0
        }
    }
}

/// Splices the taken branch's statements directly into the parent scope,
/// alpha-renaming any top-level declaration that collides with a name
/// already bound in `out` so the two don't merge into one binding.
fn hoist_kept_branch(kept: Statement, out: &mut Vec<Statement>) {
    let mut stmts = match kept {
        Statement::BlockStatement { body } => body,
        other => vec![other],
    };

    for name in top_level_declared_names(&stmts) {
        if scope_utils::binding_exists(out, &name) {
            let mut fresh = format!("_{name}");
            while scope_utils::binding_exists(out, &fresh) || scope_utils::binding_exists(&stmts, &fresh) {
                fresh.push('_');
            }
            scope_utils::rename_fast(&mut stmts, &name, &fresh);
        }
    }

    out.extend(stmts);
}

/// Names declared directly in `stmts` (not nested further down), used to
/// detect collisions when splicing a branch's body into an outer scope.
fn top_level_declared_names(stmts: &[Statement]) -> Vec<String> {
    let mut names = Vec::new();
    for stmt in stmts {
        match stmt {
            Statement::VariableDeclaration { declarations, .. } => {
                for decl in declarations {
                    if let Pattern::Identifier(id) = &decl.id {
                        names.push(id.name.clone());
                    }
                }
            }
            Statement::FunctionDeclaration { id: Some(id), .. } => names.push(id.name.clone()),
            _ => {}
        }
    }
    names
}

/// The dropped branch never runs, so its internal references don't matter,
/// but any `var`/function declaration inside it still hoists to the
/// enclosing function scope at parse time regardless of which branch is
/// taken. Re-declare those names (as `var name;`) so code elsewhere that
/// relies on the hoist still sees the binding after the branch disappears.
fn stub_hoisted_vars(dropped: &Statement, out: &mut Vec<Statement>) {
    for name in hoisted_names(dropped) {
        out.push(Statement::VariableDeclaration {
            declarations: vec![VariableDeclarator { id: Pattern::Identifier(Identifier { name }), init: None }],
            kind: VariableDeclarationKind::Var,
            leading_comments: vec![],
        });
    }
}

fn hoisted_names(stmt: &Statement) -> Vec<String> {
    let mut names = Vec::new();
    collect_hoisted_names(stmt, &mut names);
    names
}

fn collect_hoisted_names(stmt: &Statement, names: &mut Vec<String>) {
    match stmt {
        Statement::VariableDeclaration { declarations, kind: VariableDeclarationKind::Var, .. } => {
            for decl in declarations {
                if let Pattern::Identifier(id) = &decl.id {
                    names.push(id.name.clone());
                }
            }
        }
        Statement::FunctionDeclaration { id: Some(id), .. } => names.push(id.name.clone()),
        Statement::BlockStatement { body } => body.iter().for_each(|s| collect_hoisted_names(s, names)),
        Statement::IfStatement { consequent, alternate, .. } => {
            collect_hoisted_names(consequent, names);
            if let Some(alt) = alternate {
                collect_hoisted_names(alt, names);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_if_false_else_branch() {
        let mut program = Program {
            body: vec![Statement::IfStatement {
                test: Expression::Literal(Literal::Boolean(BooleanLiteral { value: false })),
                consequent: Box::new(Statement::ExpressionStatement {
                    expression: Expression::CallExpression {
                        callee: Box::new(Expression::Identifier(Identifier { name: "x".to_string() })),
                        arguments: vec![],
                    },
                    leading_comments: vec![],
                }),
                alternate: Some(Box::new(Statement::ExpressionStatement {
                    expression: Expression::CallExpression {
                        callee: Box::new(Expression::Identifier(Identifier { name: "y".to_string() })),
                        arguments: vec![],
                    },
                    leading_comments: vec![],
                })),
            }],
            source_type: ProgramSourceType::Script,
        };

        collapse_unreachable_branches(&mut program);

        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Statement::ExpressionStatement { expression: Expression::CallExpression { callee, .. }, .. } => {
                match callee.as_ref() {
                    Expression::Identifier(id) => assert_eq!(id.name, "y"),
                    _ => panic!("expected identifier callee"),
                }
            }
            other => panic!("expected surviving branch statement, got {other:?}"),
        }
    }

    #[test]
    fn alpha_renames_kept_branch_declaration_colliding_with_outer_scope() {
        // let z = 0; if (true) { let z = 2; g(z); }
        let mut program = Program {
            body: vec![
                Statement::VariableDeclaration {
                    declarations: vec![VariableDeclarator {
                        id: Pattern::Identifier(Identifier { name: "z".to_string() }),
                        init: Some(Expression::Literal(Literal::Number(NumberLiteral { value: 0.0 }))),
                    }],
                    kind: VariableDeclarationKind::Let,
                    leading_comments: vec![],
                },
                Statement::IfStatement {
                    test: Expression::Literal(Literal::Boolean(BooleanLiteral { value: true })),
                    consequent: Box::new(Statement::BlockStatement {
                        body: vec![
                            Statement::VariableDeclaration {
                                declarations: vec![VariableDeclarator {
                                    id: Pattern::Identifier(Identifier { name: "z".to_string() }),
                                    init: Some(Expression::Literal(Literal::Number(NumberLiteral { value: 2.0 }))),
                                }],
                                kind: VariableDeclarationKind::Let,
                                leading_comments: vec![],
                            },
                            Statement::ExpressionStatement {
                                expression: Expression::CallExpression {
                                    callee: Box::new(Expression::Identifier(Identifier { name: "g".to_string() })),
                                    arguments: vec![Argument::Expression(Expression::Identifier(Identifier { name: "z".to_string() }))],
                                },
                                leading_comments: vec![],
                            },
                        ],
                    }),
                    alternate: None,
                },
            ],
            source_type: ProgramSourceType::Script,
        };

        collapse_unreachable_branches(&mut program);

        assert_eq!(program.body.len(), 3);
        match &program.body[1] {
            Statement::VariableDeclaration { declarations, .. } => {
                assert!(matches!(&declarations[0].id, Pattern::Identifier(id) if id.name == "_z"));
            }
            other => panic!("expected renamed declaration, got {other:?}"),
        }
        match &program.body[2] {
            Statement::ExpressionStatement { expression: Expression::CallExpression { arguments, .. }, .. } => {
                assert!(matches!(arguments[0].as_expression(), Some(Expression::Identifier(id)) if id.name == "_z"));
            }
            other => panic!("expected call referencing renamed binding, got {other:?}"),
        }
    }
}
