//! # Binary Evaluator
//!
//! Folds binary and unary expressions whose operands are already literals,
//! e.g. `!![]` -> `true`, `"a"+"b"` -> `"ab"`, `1+2` -> `3`. Uses a small
//! JS-semantics evaluator rather than Rust's native numeric/string ops
//! directly, since `+` on mixed operand kinds needs JS's coercion rules.

use crate::parser::ast_types::*;
use crate::traversal::{self, Visitor, VisitControl};

pub fn evaluate_constants(program: &mut Program) -> u32 {
    let mut folder = Folder { changes: 0 };
    for stmt in program.body.iter_mut() {
        traversal::walk_statement(stmt, &mut folder);
    }
    folder.changes
}

struct Folder {
    changes: u32,
}

impl Visitor for Folder {
    fn visit_expression(&mut self, expr: &mut Expression) -> VisitControl {
        if let Some(replacement) = try_fold(expr) {
            *expr = replacement;
            self.changes += 1;
        }
        VisitControl::Continue
    }
}

fn try_fold(expr: &Expression) -> Option<Expression> {
    match expr {
        Expression::UnaryExpression { operator, argument, .. } => {
            let value = literal_value(argument)?;
            fold_unary(*operator, &value)
        }
        Expression::BinaryExpression { left, operator, right } => {
            let lv = literal_value(left)?;
            let rv = literal_value(right)?;
            fold_binary(*operator, &lv, &rv)
        }
        _ => None,
    }
}

/// The small set of compile-time-known JS values this pass reasons about.
enum JsValue {
    Number(f64),
    String(String),
    Bool(bool),
    Undefined,
    Null,
}

fn literal_value(expr: &Expression) -> Option<JsValue> {
    match expr {
        Expression::Literal(Literal::Number(n)) => Some(JsValue::Number(n.value)),
        Expression::Literal(Literal::String(s)) => Some(JsValue::String(s.value.clone())),
        Expression::Literal(Literal::Boolean(b)) => Some(JsValue::Bool(b.value)),
        Expression::Literal(Literal::Null) => Some(JsValue::Null),
        Expression::Identifier(id) if id.name == "undefined" => Some(JsValue::Undefined),
        Expression::ArrayExpression { elements } if elements.is_empty() => Some(JsValue::String(String::new())),
        Expression::UnaryExpression { .. } | Expression::BinaryExpression { .. } => {
            try_fold(expr).and_then(|folded| literal_value(&folded))
        }
        _ => None,
    }
}

fn to_number(value: &JsValue) -> f64 {
    match value {
        JsValue::Number(n) => *n,
        JsValue::Bool(b) => if *b { 1.0 } else { 0.0 },
        JsValue::Null => 0.0,
        JsValue::Undefined => f64::NAN,
        JsValue::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() { 0.0 } else { trimmed.parse().unwrap_or(f64::NAN) }
        }
    }
}

fn to_bool(value: &JsValue) -> bool {
    match value {
        JsValue::Number(n) => *n != 0.0 && !n.is_nan(),
        JsValue::Bool(b) => *b,
        JsValue::Null | JsValue::Undefined => false,
        JsValue::String(s) => !s.is_empty(),
    }
}

fn to_js_string(value: &JsValue) -> String {
    match value {
        JsValue::Number(n) => canonical_number_string(*n),
        JsValue::Bool(b) => b.to_string(),
        JsValue::Null => "null".to_string(),
        JsValue::Undefined => "undefined".to_string(),
        JsValue::String(s) => s.clone(),
    }
}

fn canonical_number_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn num_literal(n: f64) -> Expression {
    Expression::Literal(Literal::Number(NumberLiteral { value: n }))
}

fn bool_literal(b: bool) -> Expression {
    Expression::Literal(Literal::Boolean(BooleanLiteral { value: b }))
}

fn string_literal(s: String) -> Expression {
    Expression::Literal(Literal::String(StringLiteral { value: s }))
}

fn fold_unary(operator: UnaryOperator, value: &JsValue) -> Option<Expression> {
    match operator {
        UnaryOperator::LogicalNot => Some(bool_literal(!to_bool(value))),
        UnaryOperator::Minus => Some(num_literal(-to_number(value))),
        UnaryOperator::Plus => Some(num_literal(to_number(value))),
        UnaryOperator::Void => Some(Expression::Identifier(Identifier { name: "undefined".to_string() })),
        UnaryOperator::Typeof => Some(string_literal(
            match value {
                JsValue::Number(_) => "number",
                JsValue::String(_) => "string",
                JsValue::Bool(_) => "boolean",
                JsValue::Undefined => "undefined",
                JsValue::Null => "object",
            }
            .to_string(),
        )),
        _ => None,
    }
}

fn fold_binary(operator: BinaryOperator, lv: &JsValue, rv: &JsValue) -> Option<Expression> {
    match operator {
        BinaryOperator::Add => {
            if matches!(lv, JsValue::String(_)) || matches!(rv, JsValue::String(_)) {
                Some(string_literal(format!("{}{}", to_js_string(lv), to_js_string(rv))))
            } else {
                Some(num_literal(to_number(lv) + to_number(rv)))
            }
        }
        BinaryOperator::Subtract => Some(num_literal(to_number(lv) - to_number(rv))),
        BinaryOperator::Multiply => Some(num_literal(to_number(lv) * to_number(rv))),
        BinaryOperator::Divide => Some(num_literal(to_number(lv) / to_number(rv))),
        BinaryOperator::Remainder => Some(num_literal(to_number(lv) % to_number(rv))),
        BinaryOperator::Exponentiation => Some(num_literal(to_number(lv).powf(to_number(rv)))),
        BinaryOperator::StrictEqual => Some(bool_literal(strict_equals(lv, rv))),
        BinaryOperator::StrictNotEqual => Some(bool_literal(!strict_equals(lv, rv))),
        BinaryOperator::Equal => Some(bool_literal(loose_equals(lv, rv))),
        BinaryOperator::NotEqual => Some(bool_literal(!loose_equals(lv, rv))),
        BinaryOperator::LessThan => Some(bool_literal(to_number(lv) < to_number(rv))),
        BinaryOperator::LessThanEqual => Some(bool_literal(to_number(lv) <= to_number(rv))),
        BinaryOperator::GreaterThan => Some(bool_literal(to_number(lv) > to_number(rv))),
        BinaryOperator::GreaterThanEqual => Some(bool_literal(to_number(lv) >= to_number(rv))),
        BinaryOperator::BitwiseAnd => Some(num_literal(((to_number(lv) as i32) & (to_number(rv) as i32)) as f64)),
        BinaryOperator::BitwiseOr => Some(num_literal(((to_number(lv) as i32) | (to_number(rv) as i32)) as f64)),
        BinaryOperator::BitwiseXor => Some(num_literal(((to_number(lv) as i32) ^ (to_number(rv) as i32)) as f64)),
        _ => None,
    }
}

fn strict_equals(lv: &JsValue, rv: &JsValue) -> bool {
    match (lv, rv) {
        (JsValue::Number(a), JsValue::Number(b)) => a == b,
        (JsValue::String(a), JsValue::String(b)) => a == b,
        (JsValue::Bool(a), JsValue::Bool(b)) => a == b,
        (JsValue::Null, JsValue::Null) | (JsValue::Undefined, JsValue::Undefined) => true,
        _ => false,
    }
}

fn loose_equals(lv: &JsValue, rv: &JsValue) -> bool {
    match (lv, rv) {
        (JsValue::Null, JsValue::Undefined) | (JsValue::Undefined, JsValue::Null) => true,
        _ if std::mem::discriminant(lv) == std::mem::discriminant(rv) => strict_equals(lv, rv),
        _ => to_number(lv) == to_number(rv),
    }
}
