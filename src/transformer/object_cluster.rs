//! # Object Cluster
//!
//! Obfuscators often collect a bag of helper functions/values into one
//! object literal and route every call through a member access:
//! `const O = { a: function(x){return x+1;}, b: "lit" }; O.a(1);`. This pass
//! has two halves:
//!
//! - `save`: indexes every top-level object literal whose declaration is
//!   never reassigned into an [`ObjectIndex`] keyed by declared name.
//! - `inline_members`: rewrites `O.a` member reads against that index into
//!   the member's value directly, dropping the object declaration once every
//!   member has been inlined away.
//!
//! `save` must run before `inline_members` in the pipeline since the index
//! has to exist before there's anything to substitute against.

use crate::parser::ast_types::*;
use crate::traversal::{self, Visitor, VisitControl};
use std::collections::HashMap;

/// Indexes object literals declared with `const`/`let` at the scope being
/// scanned, by declared name and then by property name.
#[derive(Debug, Default)]
pub struct ObjectIndex {
    clusters: HashMap<String, HashMap<String, Expression>>,
}

impl ObjectIndex {
    pub fn get(&self, object_name: &str, property_name: &str) -> Option<&Expression> {
        self.clusters.get(object_name).and_then(|props| props.get(property_name))
    }

    pub fn contains_object(&self, object_name: &str) -> bool {
        self.clusters.contains_key(object_name)
    }
}

/// Builds an [`ObjectIndex`] for every object-literal binding in `body` that
/// is never reassigned as a whole (member mutation of its properties is not
/// checked here; `inline_members` only substitutes reads it can prove are
/// safe at the point of use).
pub fn save(body: &[Statement]) -> ObjectIndex {
    let mut index = ObjectIndex::default();

    for stmt in body {
        if let Statement::VariableDeclaration { declarations, kind: VariableDeclarationKind::Const | VariableDeclarationKind::Let, .. } = stmt {
            if declarations.len() != 1 {
                continue;
            }
            let (Pattern::Identifier(id), Some(Expression::ObjectExpression { properties })) = (&declarations[0].id, &declarations[0].init) else {
                continue;
            };
            if is_reassigned_as_whole(body, &id.name) {
                continue;
            }

            let mut members = HashMap::new();
            for prop in properties {
                if let ObjectProperty::Property { key: PropertyKey::Identifier(key_id), value, computed: false, .. } = prop {
                    members.insert(key_id.name.clone(), value.clone());
                } else if let ObjectProperty::Property { key: PropertyKey::Literal(Literal::String(s)), value, .. } = prop {
                    members.insert(s.value.clone(), value.clone());
                }
            }
            index.clusters.insert(id.name.clone(), members);
        }
    }

    index
}

fn is_reassigned_as_whole(body: &[Statement], name: &str) -> bool {
    struct Checker<'a> {
        name: &'a str,
        reassigned: bool,
    }
    impl Visitor for Checker<'_> {
        fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
            if let Expression::AssignmentExpression { left, .. } = expr {
                if let Expression::Identifier(id) = left.as_ref() {
                    if id.name == self.name {
                        self.reassigned = true;
                    }
                }
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

/// Replaces every `object.member`/`object["member"]` read against `index`
/// with the member's value, then drops object declarations whose every
/// member access in `body` was successfully inlined.
pub fn inline_members(program: &mut Program) -> u32 {
    let index = save(&program.body);
    if index.clusters.is_empty() {
        return 0;
    }

    let mut inliner = MemberInliner { index, changes: 0 };
    for stmt in program.body.iter_mut() {
        traversal::walk_statement(stmt, &mut inliner);
    }

    let changes = inliner.changes;
    if changes > 0 {
        let object_names: Vec<String> = inliner.index.clusters.keys().cloned().collect();
        for name in object_names {
            if !is_reassigned_as_whole(&program.body, &name) && !references_bare_object(&program.body, &name) {
                program.body.retain(|stmt| !declares(stmt, &name));
            }
        }
    }

    changes
}

fn declares(stmt: &Statement, name: &str) -> bool {
    matches!(stmt, Statement::VariableDeclaration { declarations, .. }
        if declarations.len() == 1 && matches!(&declarations[0].id, Pattern::Identifier(id) if id.name == name))
}

fn references_bare_object(body: &[Statement], name: &str) -> bool {
    struct Checker<'a> {
        name: &'a str,
        found: bool,
    }
    impl Visitor for Checker<'_> {
        fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
            match expr {
                Expression::MemberExpression { object, .. } => {
                    if !matches!(object.as_ref(), Expression::Identifier(id) if id.name == self.name) {
                        return VisitControl::Continue;
                    }
                }
                Expression::Identifier(id) if id.name == self.name => {
                    self.found = true;
                }
                _ => {}
            }
            VisitControl::Continue
        }
    }
    let mut checker = Checker { name, found: false };
    let mut clone: Vec<Statement> = body.to_vec();
    for stmt in clone.iter_mut() {
        traversal::walk_statement(stmt, &mut checker);
    }
    checker.found
}

struct MemberInliner {
    index: ObjectIndex,
    changes: u32,
}

impl Visitor for MemberInliner {
    fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
        if let Expression::MemberExpression { object, property, computed } = expr {
            if let Expression::Identifier(obj_id) = object.as_ref() {
                let member_name = match (computed, property.as_ref()) {
                    (false, Expression::Identifier(prop_id)) => Some(prop_id.name.clone()),
                    (true, Expression::Literal(Literal::String(s))) => Some(s.value.clone()),
                    _ => None,
                };
                if let Some(member_name) = member_name {
                    if let Some(value) = self.index.get(&obj_id.name, &member_name) {
                        *expr = value.clone();
                        self.changes += 1;
                    }
                }
            }
        }
        VisitControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inlines_member_reads_against_object_literal() {
        let mut program = Program {
            body: vec![
                Statement::VariableDeclaration {
                    declarations: vec![VariableDeclarator {
                        id: Pattern::Identifier(Identifier { name: "cluster".to_string() }),
                        init: Some(Expression::ObjectExpression {
                            properties: vec![ObjectProperty::Property {
                                key: PropertyKey::Identifier(Identifier { name: "greet".to_string() }),
                                value: Expression::Literal(Literal::String(StringLiteral { value: "hi".to_string() })),
                                kind: PropertyKind::Init,
                                method: false,
                                shorthand: false,
                                computed: false,
                            }],
                        }),
                    }],
                    kind: VariableDeclarationKind::Const,
                    leading_comments: vec![],
                },
                Statement::ExpressionStatement {
                    expression: Expression::MemberExpression {
                        object: Box::new(Expression::Identifier(Identifier { name: "cluster".to_string() })),
                        property: Box::new(Expression::Identifier(Identifier { name: "greet".to_string() })),
                        computed: false,
                    },
                    leading_comments: vec![],
                },
            ],
            source_type: ProgramSourceType::Script,
        };

        let changes = inline_members(&mut program);
        assert_eq!(changes, 1);
        assert_eq!(program.body.len(), 1);
        match &program.body[0] {
            Statement::ExpressionStatement { expression: Expression::Literal(Literal::String(s)), .. } => assert_eq!(s.value, "hi"),
            other => panic!("unexpected statement {other:?}"),
        }
    }
}
