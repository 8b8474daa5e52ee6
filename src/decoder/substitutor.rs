//! # Decoder Call-Site Substitutor
//!
//! Replaces calls to a located decoder function with the string literal the
//! sandbox produces for that call's (constant) arguments. Each call site is
//! evaluated independently against a fresh interpreter primed with the
//! decoder's setup code, so a failure on one call site never blocks the
//! others in the same statement — on failure the call is left in place with
//! a `decrypt failed: <message>` leading comment instead.

use crate::decoder::sandbox::{Sandbox, SandboxError, SandboxValue};
use crate::parser::ast_types::*;

pub struct SubstitutionReport {
    pub substituted: u32,
    pub failed: u32,
}

/// Walks every statement looking for calls to `decoder_name` whose arguments
/// are all literals, evaluates each against `setup_code` in `sandbox`, and
/// substitutes the literal result in place.
pub fn substitute_calls(program: &mut Program, decoder_name: &str, setup_code: &str, sandbox: &dyn Sandbox) -> SubstitutionReport {
    let mut report = SubstitutionReport { substituted: 0, failed: 0 };
    for stmt in program.body.iter_mut() {
        substitute_in_statement(stmt, decoder_name, setup_code, sandbox, &mut report);
    }
    report
}

fn substitute_in_statement(stmt: &mut Statement, decoder_name: &str, setup_code: &str, sandbox: &dyn Sandbox, report: &mut SubstitutionReport) {
    let mut failure: Option<String> = None;

    match stmt {
        Statement::ExpressionStatement { expression, .. } => {
            substitute_in_expression(expression, decoder_name, setup_code, sandbox, report, &mut failure)
        }
        Statement::VariableDeclaration { declarations, .. } => {
            for decl in declarations.iter_mut() {
                if let Some(init) = decl.init.as_mut() {
                    substitute_in_expression(init, decoder_name, setup_code, sandbox, report, &mut failure);
                }
            }
        }
        Statement::ReturnStatement { argument: Some(expr) } | Statement::ThrowStatement { argument: expr } => {
            substitute_in_expression(expr, decoder_name, setup_code, sandbox, report, &mut failure)
        }
        Statement::BlockStatement { body } => {
            for s in body.iter_mut() {
                substitute_in_statement(s, decoder_name, setup_code, sandbox, report);
            }
        }
        Statement::FunctionDeclaration { body, .. } => {
            for s in body.body.iter_mut() {
                substitute_in_statement(s, decoder_name, setup_code, sandbox, report);
            }
        }
        Statement::IfStatement { consequent, alternate, .. } => {
            substitute_in_statement(consequent, decoder_name, setup_code, sandbox, report);
            if let Some(alt) = alternate {
                substitute_in_statement(alt, decoder_name, setup_code, sandbox, report);
            }
        }
        _ => {}
    }

    if let Some(message) = failure {
        add_failure_comment(stmt, &message);
        report.failed += 1;
    }
}

fn substitute_in_expression(
    expr: &mut Expression,
    decoder_name: &str,
    setup_code: &str,
    sandbox: &dyn Sandbox,
    report: &mut SubstitutionReport,
    failure: &mut Option<String>,
) {
    if let Expression::CallExpression { callee, arguments } = expr {
        if matches!(callee.as_ref(), Expression::Identifier(id) if id.name == decoder_name) {
            if let Some(arg_source) = literal_argument_source(arguments) {
                let code = format!("(() => {{ {setup_code}; return {decoder_name}({arg_source}); }})()");
                match sandbox.evaluate(&code) {
                    Ok(value) => match string_value(&value) {
                        Some(s) => {
                            *expr = Expression::Literal(Literal::String(StringLiteral { value: s }));
                            report.substituted += 1;
                        }
                        None => *failure = Some("sandbox returned a non-string value".to_string()),
                    },
                    Err(SandboxError::Timeout(_)) => *failure = Some("sandbox evaluation timed out".to_string()),
                    Err(e) => *failure = Some(e.to_string()),
                }
            }
        }
    }
}

fn literal_argument_source(arguments: &[Argument]) -> Option<String> {
    let mut parts = Vec::with_capacity(arguments.len());
    for arg in arguments {
        let Argument::Expression(expr) = arg else { return None };
        parts.push(literal_source(expr)?);
    }
    Some(parts.join(", "))
}

fn literal_source(expr: &Expression) -> Option<String> {
    match expr {
        Expression::Literal(Literal::String(s)) => Some(format!("{:?}", s.value)),
        Expression::Literal(Literal::Number(n)) => Some(n.value.to_string()),
        Expression::Literal(Literal::Boolean(b)) => Some(b.value.to_string()),
        Expression::Literal(Literal::Null) => Some("null".to_string()),
        _ => None,
    }
}

fn string_value(value: &SandboxValue) -> Option<String> {
    value.as_str().map(|s| s.to_string())
}

fn add_failure_comment(stmt: &mut Statement, message: &str) {
    let text = format!("decrypt failed: {message}");
    let comments = match stmt {
        Statement::VariableDeclaration { leading_comments, .. } | Statement::ExpressionStatement { leading_comments, .. } => leading_comments,
        _ => return,
    };
    if comments.iter().any(|c| c.text == text) {
        return;
    }
    comments.push(LeadingComment { text });
}
