//! End-to-end pipeline tests, one per scenario the rewrite library is meant
//! to handle, plus idempotence and non-convergence checks.

use super::*;
use crate::generator::{CommentPreservation, Generator, GeneratorConfig, OutputFormat};
use crate::parser::{self, ParserConfig};

fn run(source: &str) -> String {
    let parse_result = parser::parse_js(source, "<test>", &ParserConfig::default());
    assert!(parse_result.errors.is_empty(), "input failed to parse: {:?}", parse_result.errors);
    let program = parse_result.ast.expect("parsed program");

    let result = transform_ast(program, &TransformerConfig::default()).expect("transform succeeds");

    let config = GeneratorConfig { format: OutputFormat::Compact, preserve_comments: CommentPreservation::All, ..GeneratorConfig::default() };
    Generator::new(config).generate(&result.transformed_ast, Some(source)).expect("generation succeeds").code
}

#[test]
fn splits_leading_sequence_assignment_statement() {
    let output = run("a = 1, b = 2; console.log(a);");
    assert!(output.contains("a = 1"));
    assert!(output.contains("b = 2"));
    assert!(output.contains("console.log(a)"));
}

#[test]
fn inlines_object_member_read_and_drops_dead_object() {
    let output = run(r#"var r = { k: "hello" }; console.log(r["k"]);"#);
    assert!(output.contains(r#"console.log("hello")"#));
    assert!(!output.contains("var r"));
}

#[test]
fn inlines_single_use_string_constant() {
    let output = run(r#"let a = "debugger"; f(a);"#);
    assert!(output.contains(r#"f("debugger")"#));
    assert!(!output.contains("let a"));
}

#[test]
fn collapses_statically_false_if_branch() {
    let output = run("if(false){x()}else{y()}");
    assert!(output.contains("y()"));
    assert!(!output.contains("x()"));
}

#[test]
fn unwraps_bang_iife_into_enclosing_statements() {
    let output = run("!function(){a()}();");
    assert!(output.contains("a()"));
    assert!(!output.contains("function"));
}

#[test]
fn hoists_for_init_sequence_assignments() {
    let output = run(r#"for(a=1, w="2|1|2|3".split("|"), void 0;;){ var a; var w; break; }"#);
    assert!(output.contains("a = 1"));
    assert!(output.contains(r#"w = "2|1|2|3".split("|")"#));
    assert!(output.contains("for (void 0;;"));
}

#[test]
fn unflattens_dispatcher_control_flow_in_function_body() {
    let source = r#"
        function run(n) {
            var o = "1|3|2|0".split("|"), i = 0;
            while (true) {
                switch (o[i++]) {
                    case "0": return x;
                    case "1": if (n) return; continue;
                    case "2": x.c = "u"; continue;
                    case "3": var x = d(n); continue;
                }
                break;
            }
        }
    "#;
    let output = run(source);
    let a_pos = output.find("if (n)").expect("case 1 body present");
    let b_pos = output.find("var x = d(n)").expect("case 3 body present");
    let c_pos = output.find("x.c = \"u\"").expect("case 2 body present");
    let d_pos = output.find("return x").expect("case 0 body present");
    assert!(a_pos < b_pos && b_pos < c_pos && c_pos < d_pos, "case bodies must appear in dispatch order 1,3,2,0");
    assert!(!output.contains("while (true)"));
}

#[test]
fn pipeline_is_idempotent_on_already_clean_input() {
    let source = "function add(x, y) { return x + y; } console.log(add(1, 2));";
    let first = run(source);
    let second = run(&first);
    assert_eq!(first, second);
}

#[test]
fn reports_non_convergence_when_iteration_cap_is_too_low() {
    let parse_result = parser::parse_js("a = 1, b = 2;", "<test>", &ParserConfig::default());
    let program = parse_result.ast.expect("parsed program");
    let config = TransformerConfig { iteration_cap: 0, ..TransformerConfig::default() };
    let result = transform_ast(program, &config);
    assert!(matches!(result, Err(TransformError::NonConvergence(0))));
}
