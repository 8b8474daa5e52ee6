//! # Comment Marker
//!
//! Tags statements a human should double check with a `TOLOOK:` leading
//! comment: calls to `eval`/`Function` (dynamic code the engine can't trace
//! through) and, when the caller supplies `--mark-keywords`, any statement
//! referencing one of those identifier names. Markers are additive; running
//! this pass twice over the same statement does not duplicate its comment.

use crate::parser::ast_types::*;
use crate::traversal::{self, Visitor, VisitControl};

const DYNAMIC_CODE_CALLEES: [&str; 2] = ["eval", "Function"];

pub fn mark_statements(program: &mut Program, keywords: &[String]) -> u32 {
    let mut marker = Marker { keywords, changes: 0 };
    for stmt in program.body.iter_mut() {
        mark_statement(stmt, &mut marker);
    }
    marker.changes
}

struct Marker<'a> {
    keywords: &'a [String],
    changes: u32,
}

fn mark_statement(stmt: &mut Statement, marker: &mut Marker) {
    let reason = find_reason(stmt, marker.keywords);
    if let Some(reason) = reason {
        add_marker(stmt, &reason, marker);
    }

    match stmt {
        Statement::BlockStatement { body } => body.iter_mut().for_each(|s| mark_statement(s, marker)),
        Statement::FunctionDeclaration { body, .. } => body.body.iter_mut().for_each(|s| mark_statement(s, marker)),
        Statement::IfStatement { consequent, alternate, .. } => {
            mark_statement(consequent, marker);
            if let Some(alt) = alternate {
                mark_statement(alt, marker);
            }
        }
        Statement::WhileStatement { body, .. } | Statement::DoWhileStatement { body, .. } => mark_statement(body, marker),
        Statement::ForStatement { body, .. } | Statement::ForInStatement { body, .. } | Statement::ForOfStatement { body, .. } => {
            mark_statement(body, marker)
        }
        Statement::TryStatement { block, handler, finalizer } => {
            block.body.iter_mut().for_each(|s| mark_statement(s, marker));
            if let Some(handler) = handler {
                handler.body.body.iter_mut().for_each(|s| mark_statement(s, marker));
            }
            if let Some(finalizer) = finalizer {
                finalizer.body.iter_mut().for_each(|s| mark_statement(s, marker));
            }
        }
        Statement::SwitchStatement { cases, .. } => cases.iter_mut().for_each(|c| c.consequent.iter_mut().for_each(|s| mark_statement(s, marker))),
        Statement::LabeledStatement { body, .. } => mark_statement(body, marker),
        _ => {}
    }
}

fn find_reason(stmt: &Statement, keywords: &[String]) -> Option<String> {
    struct Finder<'a> {
        keywords: &'a [String],
        reason: Option<String>,
    }
    impl Visitor for Finder<'_> {
        fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
            if self.reason.is_some() {
                return VisitControl::Continue;
            }
            if let Expression::CallExpression { callee, .. } = expr {
                if let Expression::Identifier(id) = callee.as_ref() {
                    if DYNAMIC_CODE_CALLEES.contains(&id.name.as_str()) {
                        self.reason = Some(format!("dynamic code via {}", id.name));
                    }
                }
            }
            if let Expression::Identifier(id) = expr {
                if self.keywords.iter().any(|k| k == &id.name) {
                    self.reason = Some(format!("references marked keyword {}", id.name));
                }
            }
            VisitControl::Continue
        }
    }

    let mut finder = Finder { keywords, reason: None };
    let mut clone = stmt.clone();
    traversal::walk_statement(&mut clone, &mut finder);
    finder.reason
}

fn add_marker(stmt: &mut Statement, reason: &str, marker: &mut Marker) {
    let text = format!("TOLOOK: {reason}");
    let comments = match stmt {
        Statement::VariableDeclaration { leading_comments, .. }
        | Statement::ExpressionStatement { leading_comments, .. }
        | Statement::DebuggerStatement { leading_comments } => leading_comments,
        _ => return,
    };
    if comments.iter().any(|c| c.text == text) {
        return;
    }
    comments.push(LeadingComment { text });
    marker.changes += 1;
}
