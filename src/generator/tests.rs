use super::*;
use crate::parser::ast_types::*;

fn program(body: Vec<Statement>) -> Program {
    Program { body, source_type: ProgramSourceType::Script }
}

#[test]
fn generates_readable_output_by_default() {
    let generator = Generator::new(GeneratorConfig::default());
    let prog = program(vec![Statement::VariableDeclaration {
        declarations: vec![VariableDeclarator {
            id: Pattern::Identifier(Identifier { name: "total".to_string() }),
            init: Some(Expression::BinaryExpression {
                left: Box::new(Expression::Literal(Literal::Number(NumberLiteral { value: 1.0 }))),
                operator: BinaryOperator::Add,
                right: Box::new(Expression::Literal(Literal::Number(NumberLiteral { value: 2.0 }))),
            }),
        }],
        kind: VariableDeclarationKind::Const,
        leading_comments: vec![],
    }]);

    let result = generator.generate(&prog, None).unwrap();
    assert_eq!(result.code.trim(), "const total=1+2;");
}

#[test]
fn compact_format_drops_newlines_between_statements() {
    let mut config = GeneratorConfig::default();
    config.format = OutputFormat::Compact;
    let generator = Generator::new(config);

    let prog = program(vec![
        Statement::ExpressionStatement {
            expression: Expression::Identifier(Identifier { name: "a".to_string() }),
            leading_comments: vec![],
        },
        Statement::ExpressionStatement {
            expression: Expression::Identifier(Identifier { name: "b".to_string() }),
            leading_comments: vec![],
        },
    ]);

    let result = generator.generate(&prog, None).unwrap();
    assert!(!result.code.contains('\n'));
    assert!(result.code.contains("a;"));
    assert!(result.code.contains("b;"));
}

#[test]
fn preserves_decoder_failure_comment_by_default() {
    let generator = Generator::new(GeneratorConfig::default());
    let prog = program(vec![Statement::ExpressionStatement {
        expression: Expression::AssignmentExpression {
            left: Box::new(Expression::Identifier(Identifier { name: "x".to_string() })),
            operator: AssignmentOperator::Assign,
            right: Box::new(Expression::Identifier(Identifier { name: "undefined_call_result".to_string() })),
        },
        leading_comments: vec![LeadingComment { text: "decrypt failed: sandbox timeout".to_string() }],
    }]);

    let result = generator.generate(&prog, None).unwrap();
    assert!(result.code.contains("decrypt failed: sandbox timeout"));
}

#[test]
fn drops_comments_when_preservation_is_none() {
    let mut config = GeneratorConfig::default();
    config.preserve_comments = CommentPreservation::None;
    let generator = Generator::new(config);

    let prog = program(vec![Statement::ExpressionStatement {
        expression: Expression::Identifier(Identifier { name: "x".to_string() }),
        leading_comments: vec![LeadingComment { text: "TOLOOK: reconstructed control flow".to_string() }],
    }]);

    let result = generator.generate(&prog, None).unwrap();
    assert!(!result.code.contains("TOLOOK"));
}

#[test]
fn generates_function_declaration_with_parameters() {
    let generator = Generator::new(GeneratorConfig::default());
    let prog = program(vec![Statement::FunctionDeclaration {
        id: Some(Identifier { name: "add".to_string() }),
        params: vec![
            Pattern::Identifier(Identifier { name: "a".to_string() }),
            Pattern::Identifier(Identifier { name: "b".to_string() }),
        ],
        body: BlockStatement {
            body: vec![Statement::ReturnStatement {
                argument: Some(Expression::BinaryExpression {
                    left: Box::new(Expression::Identifier(Identifier { name: "a".to_string() })),
                    operator: BinaryOperator::Add,
                    right: Box::new(Expression::Identifier(Identifier { name: "b".to_string() })),
                }),
            }],
        },
        is_async: false,
        is_generator: false,
    }]);

    let result = generator.generate(&prog, None).unwrap();
    assert!(result.code.contains("function add(a,b)"));
    assert!(result.code.contains("return a+b;"));
}

#[test]
fn reports_generated_size_diagnostics() {
    let generator = Generator::new(GeneratorConfig::default());
    let prog = program(vec![Statement::EmptyStatement]);
    let result = generator.generate(&prog, Some("obfuscated source")).unwrap();
    assert_eq!(result.diagnostics.original_size, "obfuscated source".len());
    assert_eq!(result.diagnostics.generated_size, result.code.len());
}
