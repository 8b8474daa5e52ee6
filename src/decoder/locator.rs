//! # Decoder Location Strategies
//!
//! Obfuscators hide a string table behind either a heavily-called helper
//! function or a single large array literal threaded through a "rotator"
//! IIFE. Both strategies are name-based scans over the program's top-level
//! statements (the AST carries no scope ids — see `analyzer::scope_utils`),
//! tried in order by `decoder::mod`; the first that finds a candidate wins.

use crate::matcher::{self, Captures};
use crate::parser::ast_types::*;
use crate::traversal::{self, Visitor, VisitControl};

/// A located decoder: the function/binding name to treat as the decoder,
/// and how much of the program (by top-level statement index, inclusive) is
/// "setup code" that must run before any call site can be evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderLocation {
    pub decoder_name: String,
    pub rotator_index: Option<usize>,
    pub setup_end: usize,
}

/// Scans top-level function declarations for one whose name is referenced
/// at least `threshold` times anywhere in the program. Obfuscated decoder
/// helpers are typically called once per encoded string, so a real decoder
/// tends to dwarf ordinary helper call counts.
pub fn by_call_count(body: &[Statement], threshold: u32) -> Option<DecoderLocation> {
    let mut candidate: Option<(usize, String)> = None;

    for (index, stmt) in body.iter().enumerate() {
        let Statement::FunctionDeclaration { id: Some(id), .. } = stmt else { continue };
        let count = count_references(body, &id.name);
        if count >= threshold {
            candidate = Some((index, id.name.clone()));
        }
    }

    candidate.map(|(index, name)| DecoderLocation { decoder_name: name, rotator_index: None, setup_end: index })
}

/// Scans top-level declarations for an array literal with at least
/// `threshold` elements, then classifies how its binding is used: a
/// reference as the object of a member access marks the containing
/// declaration as the decoder, a reference as a call argument marks an
/// expression statement as the rotator that permutes the array at load time.
pub fn by_big_array(body: &[Statement], threshold: usize) -> Option<DecoderLocation> {
    let is_big_array_decl = matcher::single_declarator_with_init(matcher::array_expression(Some(threshold)));

    let (array_index, array_name) = body.iter().enumerate().find_map(|(index, stmt)| {
        let mut captures = Captures::new();
        if !is_big_array_decl(stmt, &mut captures) {
            return None;
        }
        let Statement::VariableDeclaration { declarations, .. } = stmt else { return None };
        let Pattern::Identifier(id) = &declarations[0].id else { return None };
        Some((index, id.name.clone()))
    })?;

    let reference_count = count_references(body, &array_name);
    if reference_count >= 10 {
        return None;
    }

    let mut decoder_index = None;
    let mut rotator_index = None;

    for (index, stmt) in body.iter().enumerate() {
        match classify_reference(stmt, &array_name) {
            ReferenceRole::None => {}
            ReferenceRole::MemberObject => decoder_index = decoder_index.or(Some(index)),
            ReferenceRole::CallArgument => rotator_index = rotator_index.or(Some(index)),
        }
    }

    let decoder_index = decoder_index?;
    let Statement::FunctionDeclaration { id: Some(id), .. } = &body[decoder_index] else {
        return None;
    };

    let setup_end = [Some(array_index), Some(decoder_index), rotator_index].into_iter().flatten().max().unwrap_or(decoder_index);

    Some(DecoderLocation { decoder_name: id.name.clone(), rotator_index, setup_end })
}

enum ReferenceRole {
    None,
    MemberObject,
    CallArgument,
}

fn classify_reference(stmt: &Statement, name: &str) -> ReferenceRole {
    struct Classifier<'a> {
        name: &'a str,
        role: ReferenceRole,
    }
    impl Visitor for Classifier<'_> {
        fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
            if let Expression::MemberExpression { object, .. } = expr {
                if matches!(object.as_ref(), Expression::Identifier(id) if id.name == self.name) {
                    self.role = ReferenceRole::MemberObject;
                }
            }
            if let Expression::CallExpression { arguments, .. } = expr {
                let references_name = arguments.iter().any(|arg| matches!(arg.as_expression(), Some(Expression::Identifier(id)) if id.name == self.name));
                if references_name {
                    self.role = ReferenceRole::CallArgument;
                }
            }
            VisitControl::Continue
        }
    }

    let mut classifier = Classifier { name, role: ReferenceRole::None };
    let mut clone = stmt.clone();
    traversal::walk_statement(&mut clone, &mut classifier);
    classifier.role
}

fn count_references(body: &[Statement], name: &str) -> u32 {
    struct Counter<'a> {
        name: &'a str,
        count: u32,
    }
    impl Visitor for Counter<'_> {
        fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
            if let Expression::Identifier(id) = expr {
                if id.name == self.name {
                    self.count += 1;
                }
            }
            VisitControl::Continue
        }
    }

    let mut counter = Counter { name, count: 0 };
    for stmt in body {
        let mut clone = stmt.clone();
        traversal::walk_statement(&mut clone, &mut counter);
    }
    counter.count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl_fn(name: &str) -> Statement {
        Statement::FunctionDeclaration {
            id: Some(Identifier { name: name.to_string() }),
            params: vec![],
            body: BlockStatement { body: vec![] },
            is_async: false,
            is_generator: false,
        }
    }

    fn call_stmt(name: &str) -> Statement {
        Statement::ExpressionStatement {
            expression: Expression::CallExpression {
                callee: Box::new(Expression::Identifier(Identifier { name: name.to_string() })),
                arguments: vec![],
            },
            leading_comments: vec![],
        }
    }

    #[test]
    fn finds_decoder_by_call_count_threshold() {
        let mut body = vec![decl_fn("decode")];
        for _ in 0..5 {
            body.push(call_stmt("decode"));
        }
        let location = by_call_count(&body, 5).expect("decoder located");
        assert_eq!(location.decoder_name, "decode");
        assert_eq!(location.setup_end, 0);
    }

    #[test]
    fn call_count_below_threshold_finds_nothing() {
        let mut body = vec![decl_fn("decode")];
        body.push(call_stmt("decode"));
        assert!(by_call_count(&body, 5).is_none());
    }
}
