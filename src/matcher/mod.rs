//! # Pattern Matchers
//!
//! Small composable predicates over AST nodes, used by the rewrite passes in
//! `transformer` to recognize obfuscator output shapes (`a,a=b,a` sequence
//! chains, `_0x1234[_0x5678]` computed member lookups, and so on) without
//! every pass re-deriving its own `match` arm soup.
//!
//! A matcher is a closure of `Fn(&Node, &mut Captures) -> bool`. Matchers
//! compose: [`or`] tries alternatives, [`capture`] records a sub-match under
//! a name so the caller can pull it back out of the returned [`Captures`]
//! once the whole pattern succeeds.

use std::collections::HashMap;

use crate::parser::ast_types::{Expression, Literal, Statement, VariableDeclarationKind};

/// A node captured by a named sub-pattern.
#[derive(Debug, Clone)]
pub enum Captured {
    Expr(Expression),
    Stmt(Statement),
}

/// The set of named captures collected while matching one pattern.
#[derive(Debug, Clone, Default)]
pub struct Captures(HashMap<&'static str, Captured>);

impl Captures {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn expr(&self, name: &str) -> Option<&Expression> {
        match self.0.get(name) {
            Some(Captured::Expr(e)) => Some(e),
            _ => None,
        }
    }

    pub fn stmt(&self, name: &str) -> Option<&Statement> {
        match self.0.get(name) {
            Some(Captured::Stmt(s)) => Some(s),
            _ => None,
        }
    }
}

pub type ExprMatcher = Box<dyn Fn(&Expression, &mut Captures) -> bool>;
pub type StmtMatcher = Box<dyn Fn(&Statement, &mut Captures) -> bool>;

/// Matches any expression whatsoever.
pub fn anything() -> ExprMatcher {
    Box::new(|_, _| true)
}

/// Tries each alternative in order, short-circuiting on the first success.
pub fn or(alternatives: Vec<ExprMatcher>) -> ExprMatcher {
    Box::new(move |expr, caps| alternatives.iter().any(|m| m(expr, caps)))
}

/// Records the match of `inner` under `name` so it can be read back out of
/// the `Captures` once matching succeeds.
pub fn capture(name: &'static str, inner: ExprMatcher) -> ExprMatcher {
    Box::new(move |expr, caps| {
        if inner(expr, caps) {
            caps.0.insert(name, Captured::Expr(expr.clone()));
            true
        } else {
            false
        }
    })
}

pub fn capture_stmt(name: &'static str, inner: StmtMatcher) -> StmtMatcher {
    Box::new(move |stmt, caps| {
        if inner(stmt, caps) {
            caps.0.insert(name, Captured::Stmt(stmt.clone()));
            true
        } else {
            false
        }
    })
}

/// Matches a literal, optionally constrained to one that satisfies `predicate`.
pub fn literal(predicate: Option<Box<dyn Fn(&Literal) -> bool>>) -> ExprMatcher {
    Box::new(move |expr, _| match expr {
        Expression::Literal(lit) => predicate.as_ref().map_or(true, |p| p(lit)),
        _ => false,
    })
}

/// Matches an identifier, optionally constrained to an exact `name`.
pub fn identifier(name: Option<String>) -> ExprMatcher {
    Box::new(move |expr, _| match expr {
        Expression::Identifier(id) => name.as_ref().map_or(true, |n| &id.name == n),
        _ => false,
    })
}

/// Matches a member expression; `object`/`property` sub-matchers are optional.
pub fn member_expression(object: Option<ExprMatcher>, property: Option<ExprMatcher>) -> ExprMatcher {
    Box::new(move |expr, caps| match expr {
        Expression::MemberExpression { object: obj, property: prop, .. } => {
            object.as_ref().map_or(true, |m| m(obj, caps))
                && property.as_ref().map_or(true, |m| m(prop, caps))
        }
        _ => false,
    })
}

/// Matches a call expression; `callee` is optional, `min_args` lower-bounds
/// the argument count (spreads count as one argument).
pub fn call_expression(callee: Option<ExprMatcher>, min_args: Option<usize>) -> ExprMatcher {
    Box::new(move |expr, caps| match expr {
        Expression::CallExpression { callee: c, arguments } => {
            callee.as_ref().map_or(true, |m| m(c, caps))
                && min_args.map_or(true, |n| arguments.len() >= n)
        }
        _ => false,
    })
}

/// Matches a sequence expression (`a, b, c`) with at least `min_len` parts.
pub fn sequence_expression(min_len: Option<usize>) -> ExprMatcher {
    Box::new(move |expr, _| match expr {
        Expression::SequenceExpression { expressions } => {
            min_len.map_or(true, |n| expressions.len() >= n)
        }
        _ => false,
    })
}

/// Matches an array literal with at least `min_len` elements, e.g. to find
/// the big string table an obfuscator builds at load time.
pub fn array_expression(min_len: Option<usize>) -> ExprMatcher {
    Box::new(move |expr, _| match expr {
        Expression::ArrayExpression { elements } => min_len.map_or(true, |n| elements.len() >= n),
        _ => false,
    })
}

/// Matches a variable declaration statement, optionally constrained to `kind`.
pub fn variable_declaration(kind: Option<VariableDeclarationKind>) -> StmtMatcher {
    Box::new(move |stmt, _| match stmt {
        Statement::VariableDeclaration { kind: k, .. } => kind.map_or(true, |expected| *k == expected),
        _ => false,
    })
}

/// Matches a declaration with exactly one declarator whose initializer
/// satisfies `init`, e.g. to find `var _0x1234 = [...]` string-array setups.
pub fn single_declarator_with_init(init: ExprMatcher) -> StmtMatcher {
    Box::new(move |stmt, caps| match stmt {
        Statement::VariableDeclaration { declarations, .. } if declarations.len() == 1 => {
            declarations[0].init.as_ref().map_or(false, |e| init(e, caps))
        }
        _ => false,
    })
}

/// Matches a `for (... in ...)` statement whose `right` side satisfies `right`.
pub fn for_in_statement(right: Option<ExprMatcher>) -> StmtMatcher {
    Box::new(move |stmt, caps| match stmt {
        Statement::ForInStatement { right: r, .. } => right.as_ref().map_or(true, |m| m(r, caps)),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast_types::{Identifier, NumberLiteral};

    #[test]
    fn identifier_matches_exact_name() {
        let m = identifier(Some("_0x1234".to_string()));
        let mut caps = Captures::new();
        assert!(m(&Expression::Identifier(Identifier { name: "_0x1234".to_string() }), &mut caps));
        assert!(!m(&Expression::Identifier(Identifier { name: "other".to_string() }), &mut caps));
    }

    #[test]
    fn capture_records_and_returns_matched_node() {
        let m = capture("n", literal(None));
        let mut caps = Captures::new();
        let lit = Expression::Literal(Literal::Number(NumberLiteral { value: 7.0 }));
        assert!(m(&lit, &mut caps));
        assert!(matches!(caps.expr("n"), Some(Expression::Literal(Literal::Number(n))) if n.value == 7.0));
    }

    #[test]
    fn or_tries_alternatives() {
        let m = or(vec![identifier(Some("a".to_string())), identifier(Some("b".to_string()))]);
        let mut caps = Captures::new();
        assert!(m(&Expression::Identifier(Identifier { name: "b".to_string() }), &mut caps));
        assert!(!m(&Expression::Identifier(Identifier { name: "c".to_string() }), &mut caps));
    }

    #[test]
    fn member_expression_matches_computed_lookup() {
        let m = member_expression(
            Some(identifier(Some("_0x1234".to_string()))),
            Some(identifier(None)),
        );
        let mut caps = Captures::new();
        let expr = Expression::MemberExpression {
            object: Box::new(Expression::Identifier(Identifier { name: "_0x1234".to_string() })),
            property: Box::new(Expression::Identifier(Identifier { name: "_0x5".to_string() })),
            computed: true,
        };
        assert!(m(&expr, &mut caps));
    }
}
