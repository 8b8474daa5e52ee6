//! # Scope Utilities
//!
//! Rename helpers shared by several rewrite passes (`unreachable_branch_collapser`
//! hoisting a shadowed name, `decoder::rename_designated` aliasing a decoder).
//!
//! The AST carries no scope/binding ids on its nodes (see `parser::ast_types`),
//! so renaming works directly over a subtree: it walks every `Identifier` in
//! the given statement list and renames the ones bound to `old_name`, but
//! stops descending into any nested function/block that redeclares
//! `old_name` itself, since those occurrences belong to a shadowing binding.

use crate::parser::ast_types::{Identifier, Pattern, Statement};
use crate::traversal::{self, Visitor, VisitControl};

/// Renames every occurrence of `old_name` to `new_name` within `body`,
/// respecting shadowing: a nested scope that redeclares `old_name` keeps its
/// own occurrences untouched.
///
/// If `new_name` is already used as a binding anywhere in `body`, that
/// existing binding is renamed out of the way first (suffixed with `_`,
/// repeating until the name is free), matching the spec's conflict
/// resolution for `rename_fast`.
pub fn rename_fast(body: &mut [Statement], old_name: &str, new_name: &str) {
    if binding_exists(body, new_name) {
        let mut fresh = format!("_{new_name}");
        while binding_exists(body, &fresh) {
            fresh.push('_');
        }
        rename_fast(body, new_name, &fresh);
    }

    let mut renamer = Renamer { old_name: old_name.to_string(), new_name: new_name.to_string() };
    for stmt in body.iter_mut() {
        traversal::walk_statement(stmt, &mut renamer);
    }
}

/// Renames function parameters `0..names.len()` in place using `rename_fast`
/// semantics applied to the function body.
pub fn rename_parameters(params: &[Pattern], body: &mut [Statement], names: &[&str]) {
    for (param, new_name) in params.iter().zip(names.iter()) {
        if let Pattern::Identifier(id) = param {
            rename_fast(body, &id.name, new_name);
        }
    }
}

pub fn binding_exists(body: &[Statement], name: &str) -> bool {
    let mut finder = BindingFinder { name: name.to_string(), found: false };
    for stmt in body {
        let mut clone = stmt.clone();
        traversal::walk_statement(&mut clone, &mut finder);
        if finder.found {
            return true;
        }
    }
    false
}

struct BindingFinder {
    name: String,
    found: bool,
}

impl Visitor for BindingFinder {
    fn visit_statement(&mut self, stmt: &mut Statement) -> VisitControl {
        match stmt {
            Statement::VariableDeclaration { declarations, .. } => {
                for decl in declarations {
                    if pattern_declares(&decl.id, &self.name) {
                        self.found = true;
                    }
                }
            }
            Statement::FunctionDeclaration { id: Some(id), .. } if id.name == self.name => {
                self.found = true;
            }
            _ => {}
        }
        if self.found {
            VisitControl::SkipChildren
        } else {
            VisitControl::Continue
        }
    }
}

fn pattern_declares(pattern: &Pattern, name: &str) -> bool {
    match pattern {
        Pattern::Identifier(id) => id.name == name,
        Pattern::ArrayPattern { elements } => {
            elements.iter().flatten().any(|p| pattern_declares(p, name))
        }
        Pattern::ObjectPattern { properties } => properties.iter().any(|p| match p {
            crate::parser::ast_types::ObjectPatternProperty::Property { value, .. } => {
                pattern_declares(value, name)
            }
            crate::parser::ast_types::ObjectPatternProperty::RestElement { argument } => {
                pattern_declares(argument, name)
            }
        }),
        Pattern::AssignmentPattern { left, .. } => pattern_declares(left, name),
        Pattern::RestElement { argument } => pattern_declares(argument, name),
    }
}

struct Renamer {
    old_name: String,
    new_name: String,
}

impl Renamer {
    fn rename_if_match(&self, id: &mut Identifier) {
        if id.name == self.old_name {
            id.name = self.new_name.clone();
        }
    }
}

impl Visitor for Renamer {
    fn visit_statement(&mut self, stmt: &mut Statement) -> VisitControl {
        // A nested declaration of the same name shadows it; stop here so
        // its subtree's references are left alone.
        if let Statement::VariableDeclaration { declarations, .. } = stmt {
            if declarations.iter().any(|d| pattern_declares(&d.id, &self.old_name)) {
                return VisitControl::SkipChildren;
            }
        }
        if let Statement::FunctionDeclaration { id: Some(id), params, .. } = stmt {
            if id.name == self.old_name {
                return VisitControl::SkipChildren;
            }
            if params.iter().any(|p| pattern_declares(p, &self.old_name)) {
                return VisitControl::SkipChildren;
            }
        }
        if let Statement::LabeledStatement { label, .. } = stmt {
            self.rename_if_match(label);
        }
        VisitControl::Continue
    }

    fn visit_expression(&mut self, expr: &mut crate::parser::ast_types::Expression) -> VisitControl {
        use crate::parser::ast_types::Expression;
        match expr {
            Expression::Identifier(id) => self.rename_if_match(id),
            Expression::FunctionExpression(func) => {
                if func.params.iter().any(|p| pattern_declares(p, &self.old_name)) {
                    return VisitControl::SkipChildren;
                }
            }
            Expression::ArrowFunctionExpression { params, .. } => {
                if params.iter().any(|p| pattern_declares(p, &self.old_name)) {
                    return VisitControl::SkipChildren;
                }
            }
            _ => {}
        }
        VisitControl::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast_types::*;

    fn ident(name: &str) -> Expression {
        Expression::Identifier(Identifier { name: name.to_string() })
    }

    #[test]
    fn renames_matching_identifier_reads() {
        let mut body = vec![
            Statement::VariableDeclaration {
                declarations: vec![VariableDeclarator {
                    id: Pattern::Identifier(Identifier { name: "a".to_string() }),
                    init: Some(Expression::Literal(Literal::Number(NumberLiteral { value: 1.0 }))),
                }],
                kind: VariableDeclarationKind::Var,
                leading_comments: vec![],
            },
            Statement::ExpressionStatement { expression: ident("a"), leading_comments: vec![] },
        ];

        rename_fast(&mut body, "a", "renamed");

        match &body[0] {
            Statement::VariableDeclaration { declarations, .. } => {
                assert!(matches!(&declarations[0].id, Pattern::Identifier(id) if id.name == "renamed"));
            }
            _ => panic!("expected variable declaration"),
        }
        match &body[1] {
            Statement::ExpressionStatement { expression: Expression::Identifier(id), .. } => {
                assert_eq!(id.name, "renamed");
            }
            _ => panic!("expected expression statement"),
        }
    }

    #[test]
    fn does_not_rename_into_shadowing_function() {
        let mut body = vec![Statement::FunctionDeclaration {
            id: Some(Identifier { name: "f".to_string() }),
            params: vec![Pattern::Identifier(Identifier { name: "a".to_string() })],
            body: BlockStatement {
                body: vec![Statement::ExpressionStatement { expression: ident("a"), leading_comments: vec![] }],
            },
            is_async: false,
            is_generator: false,
        }];

        rename_fast(&mut body, "a", "renamed");

        match &body[0] {
            Statement::FunctionDeclaration { body, .. } => match &body.body[0] {
                Statement::ExpressionStatement { expression: Expression::Identifier(id), .. } => {
                    assert_eq!(id.name, "a");
                }
                _ => panic!("expected expression statement"),
            },
            _ => panic!("expected function declaration"),
        }
    }
}
