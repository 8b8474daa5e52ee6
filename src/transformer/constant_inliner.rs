//! # Constant Inliner
//!
//! Inlines a `let`/`const` binding whose initializer is a literal and which
//! is never reassigned, substituting the literal at every read and dropping
//! the now-redundant declaration. Runs after `sequence_splitter` so an
//! assignment folded out of a comma expression is visible as its own
//! statement before this pass decides whether a binding is ever written to.

use crate::parser::ast_types::*;
use crate::traversal::{self, Visitor, VisitControl};

pub fn inline_constants(program: &mut Program) -> u32 {
    inline_in_block(&mut program.body)
}

fn inline_in_block(body: &mut Vec<Statement>) -> u32 {
    let mut changes = 0;

    let candidates: Vec<(String, Expression)> = body
        .iter()
        .filter_map(|stmt| constant_candidate(stmt))
        .filter(|(name, _)| !is_reassigned(body, name))
        .collect();

    for (name, literal) in candidates {
        let mut inliner = Inliner { name: name.clone(), literal: literal.clone(), changes: 0 };
        for stmt in body.iter_mut() {
            traversal::walk_statement(stmt, &mut inliner);
        }
        if inliner.changes > 0 {
            changes += inliner.changes;
            body.retain(|stmt| !declares_exactly(stmt, &name));
        }
    }

    for stmt in body.iter_mut() {
        changes += recurse_into(stmt);
    }

    changes
}

fn recurse_into(stmt: &mut Statement) -> u32 {
    match stmt {
        Statement::BlockStatement { body } => inline_in_block(body),
        Statement::FunctionDeclaration { body, .. } => inline_in_block(&mut body.body),
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
            let mut changes = inline_in_block(&mut block.body);
            if let Some(handler) = handler {
                changes += inline_in_block(&mut handler.body.body);
            }
            if let Some(finalizer) = finalizer {
                changes += inline_in_block(&mut finalizer.body);
            }
            changes
        }
        Statement::SwitchStatement { cases, .. } => cases.iter_mut().map(|c| inline_in_block(&mut c.consequent)).sum(),
        Statement::LabeledStatement { body, .. } => recurse_into(body),
        _ => 0,
    }
}

fn constant_candidate(stmt: &Statement) -> Option<(String, Expression)> {
    if let Statement::VariableDeclaration { declarations, kind: VariableDeclarationKind::Let | VariableDeclarationKind::Const, .. } = stmt {
        if declarations.len() == 1 {
            if let (Pattern::Identifier(id), Some(init)) = (&declarations[0].id, &declarations[0].init) {
                if matches!(init, Expression::Literal(_)) {
                    return Some((id.name.clone(), init.clone()));
                }
            }
        }
    }
    None
}

fn declares_exactly(stmt: &Statement, name: &str) -> bool {
    matches!(stmt, Statement::VariableDeclaration { declarations, .. }
        if declarations.len() == 1 && matches!(&declarations[0].id, Pattern::Identifier(id) if id.name == name))
}

fn is_reassigned(body: &[Statement], name: &str) -> bool {
    struct Checker<'a> {
        name: &'a str,
        reassigned: bool,
    }
    impl Visitor for Checker<'_> {
        fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
            match expr {
                Expression::AssignmentExpression { left, .. } => {
                    if let Expression::Identifier(id) = left.as_ref() {
                        if id.name == self.name {
                            self.reassigned = true;
                        }
                    }
                }
                Expression::UpdateExpression { argument, .. } => {
                    if let Expression::Identifier(id) = argument.as_ref() {
                        if id.name == self.name {
                            self.reassigned = true;
                        }
                    }
                }
                _ => {}
            }
            VisitControl::Continue
        }
    }

    let mut checker = Checker { name, reassigned: false };
    let mut clone: Vec<Statement> = body.to_vec();
    for stmt in clone.iter_mut() {
        traversal::walk_statement(stmt, &mut checker);
    }
    checker.reassigned
}

/// True if `body` re-declares `name` as a `var`/`let`/`const` binding or a
/// function, shadowing any outer binding of the same name for that scope.
fn block_shadows(body: &[Statement], name: &str) -> bool {
    body.iter().any(|stmt| match stmt {
        Statement::VariableDeclaration { declarations, .. } => {
            declarations.iter().any(|d| matches!(&d.id, Pattern::Identifier(id) if id.name == name))
        }
        Statement::FunctionDeclaration { id: Some(id), .. } => id.name == name,
        _ => false,
    })
}

struct Inliner {
    name: String,
    literal: Expression,
    changes: u32,
}

impl Visitor for Inliner {
    fn visit_statement(&mut self, stmt: &mut Statement) -> VisitControl {
        match stmt {
            // A re-declaration anywhere in a block/function body shadows `name`
            // for every statement in that scope, not just the declaring one, so
            // the whole scope must be skipped rather than just its own node.
            Statement::BlockStatement { body } if block_shadows(body, &self.name) => VisitControl::SkipChildren,
            Statement::FunctionDeclaration { params, body, .. }
                if params.iter().any(|p| matches!(p, Pattern::Identifier(id) if id.name == self.name))
                    || block_shadows(&body.body, &self.name) =>
            {
                VisitControl::SkipChildren
            }
            _ => VisitControl::Continue,
        }
    }

    fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
        if let Expression::Identifier(id) = expr {
            if id.name == self.name {
                *expr = self.literal.clone();
                self.changes += 1;
                return VisitControl::Continue;
            }
        }
        VisitControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inlines_single_use_const_literal() {
        let mut program = Program {
            body: vec![
                Statement::VariableDeclaration {
                    declarations: vec![VariableDeclarator {
                        id: Pattern::Identifier(Identifier { name: "k".to_string() }),
                        init: Some(Expression::Literal(Literal::Number(NumberLiteral { value: 42.0 }))),
                    }],
                    kind: VariableDeclarationKind::Const,
                    leading_comments: vec![],
                },
                Statement::ExpressionStatement {
                    expression: Expression::CallExpression {
                        callee: Box::new(Expression::Identifier(Identifier { name: "f".to_string() })),
                        arguments: vec![Argument::Expression(Expression::Identifier(Identifier { name: "k".to_string() }))],
                    },
                    leading_comments: vec![],
                },
            ],
            source_type: ProgramSourceType::Script,
        };

        let changes = inline_constants(&mut program);
        assert_eq!(changes, 1);
        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Statement::ExpressionStatement { expression: Expression::CallExpression { arguments, .. }, .. } => {
                assert!(matches!(arguments[0].as_expression(), Some(Expression::Literal(Literal::Number(n))) if n.value == 42.0));
            }
            other => panic!("unexpected statement {other:?}"),
        }
    }

    #[test]
    fn does_not_inline_reassigned_binding() {
        let mut program = Program {
            body: vec![
                Statement::VariableDeclaration {
                    declarations: vec![VariableDeclarator {
                        id: Pattern::Identifier(Identifier { name: "k".to_string() }),
                        init: Some(Expression::Literal(Literal::Number(NumberLiteral { value: 1.0 }))),
                    }],
                    kind: VariableDeclarationKind::Let,
                    leading_comments: vec![],
                },
                Statement::ExpressionStatement {
                    expression: Expression::AssignmentExpression {
                        left: Box::new(Expression::Identifier(Identifier { name: "k".to_string() })),
                        operator: AssignmentOperator::Assign,
                        right: Box::new(Expression::Literal(Literal::Number(NumberLiteral { value: 2.0 }))),
                    },
                    leading_comments: vec![],
                },
            ],
            source_type: ProgramSourceType::Script,
        };

        let changes = inline_constants(&mut program);
        assert_eq!(changes, 0);
        assert_eq!(program.body.len(), 2);
    }

    #[test]
    fn does_not_inline_into_a_function_that_shadows_the_name() {
        // let k = 1; function f(){ let k = 2; return k; }
        let mut program = Program {
            body: vec![
                Statement::VariableDeclaration {
                    declarations: vec![VariableDeclarator {
                        id: Pattern::Identifier(Identifier { name: "k".to_string() }),
                        init: Some(Expression::Literal(Literal::Number(NumberLiteral { value: 1.0 }))),
                    }],
                    kind: VariableDeclarationKind::Let,
                    leading_comments: vec![],
                },
                Statement::FunctionDeclaration {
                    id: Some(Identifier { name: "f".to_string() }),
                    params: vec![],
                    body: BlockStatement {
                        body: vec![
                            Statement::VariableDeclaration {
                                declarations: vec![VariableDeclarator {
                                    id: Pattern::Identifier(Identifier { name: "k".to_string() }),
                                    init: Some(Expression::Literal(Literal::Number(NumberLiteral { value: 2.0 }))),
                                }],
                                kind: VariableDeclarationKind::Let,
                                leading_comments: vec![],
                            },
                            Statement::ReturnStatement {
                                argument: Some(Expression::Identifier(Identifier { name: "k".to_string() })),
                            },
                        ],
                    },
                    is_async: false,
                    is_generator: false,
                },
            ],
            source_type: ProgramSourceType::Script,
        };

        inline_constants(&mut program);

        match &program.body[1] {
            Statement::FunctionDeclaration { body, .. } => match &body.body[1] {
                Statement::ReturnStatement { argument: Some(Expression::Identifier(id)) } => {
                    assert_eq!(id.name, "k", "shadowed inner k must not be replaced by the outer literal");
                }
                other => panic!("unexpected return statement shape {other:?}"),
            },
            other => panic!("expected function declaration, got {other:?}"),
        }
    }
}
