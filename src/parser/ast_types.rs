//! # AST Types Module
//!
//! This module defines the Abstract Syntax Tree (AST) node types produced by the
//! parser. It is a simplified, serializable, owned representation of the `oxc`
//! arena AST: every node is reachable through `Box`/`Vec`, so the tree can be
//! rewritten in place without parent pointers or arena indices.

use oxc_ast::ast as oxc;
use serde::{Deserialize, Serialize};

/// Root program node containing all statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Statement>,
    pub source_type: ProgramSourceType,
}

/// Program source type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramSourceType {
    Script,
    Module,
}

/// A leading comment attached to a statement, used to surface decoder
/// failures and keyword markers without needing a side channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadingComment {
    pub text: String,
}

/// JavaScript statements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    VariableDeclaration {
        declarations: Vec<VariableDeclarator>,
        kind: VariableDeclarationKind,
        #[serde(default)]
        leading_comments: Vec<LeadingComment>,
    },
    FunctionDeclaration {
        id: Option<Identifier>,
        params: Vec<Pattern>,
        body: BlockStatement,
        is_async: bool,
        is_generator: bool,
    },
    ClassDeclaration {
        id: Option<Identifier>,
        super_class: Option<Box<Expression>>,
        body: ClassBody,
    },
    ExpressionStatement {
        expression: Expression,
        #[serde(default)]
        leading_comments: Vec<LeadingComment>,
    },
    BlockStatement {
        body: Vec<Statement>,
    },
    ReturnStatement {
        argument: Option<Expression>,
    },
    IfStatement {
        test: Expression,
        consequent: Box<Statement>,
        alternate: Option<Box<Statement>>,
    },
    WhileStatement {
        test: Expression,
        body: Box<Statement>,
    },
    DoWhileStatement {
        body: Box<Statement>,
        test: Expression,
    },
    ForStatement {
        init: Option<ForInit>,
        test: Option<Expression>,
        update: Option<Expression>,
        body: Box<Statement>,
    },
    ForInStatement {
        left: ForInit,
        right: Expression,
        body: Box<Statement>,
    },
    ForOfStatement {
        left: ForInit,
        right: Expression,
        body: Box<Statement>,
        is_await: bool,
    },
    SwitchStatement {
        discriminant: Expression,
        cases: Vec<SwitchCase>,
    },
    ThrowStatement {
        argument: Expression,
    },
    TryStatement {
        block: BlockStatement,
        handler: Option<CatchClause>,
        finalizer: Option<BlockStatement>,
    },
    LabeledStatement {
        label: Identifier,
        body: Box<Statement>,
    },
    BreakStatement {
        label: Option<Identifier>,
    },
    ContinueStatement {
        label: Option<Identifier>,
    },
    DebuggerStatement {
        #[serde(default)]
        leading_comments: Vec<LeadingComment>,
    },
    EmptyStatement,
    ImportDeclaration {
        specifiers: Vec<ImportSpecifier>,
        source: StringLiteral,
    },
    ExportNamedDeclaration {
        declaration: Option<Box<Statement>>,
        specifiers: Vec<ExportSpecifier>,
        source: Option<StringLiteral>,
    },
}

/// Variable declaration kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableDeclarationKind {
    Var,
    Let,
    Const,
}

/// Variable declarator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub id: Pattern,
    pub init: Option<Expression>,
}

/// Block statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockStatement {
    pub body: Vec<Statement>,
}

/// `switch` case; `test: None` marks the `default:` clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchCase {
    pub test: Option<Expression>,
    pub consequent: Vec<Statement>,
}

/// `catch` clause of a `try` statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatchClause {
    pub param: Option<Pattern>,
    pub body: BlockStatement,
}

/// Class body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassBody {
    pub body: Vec<ClassElement>,
}

/// Class element (method, property, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClassElement {
    PropertyDefinition {
        key: PropertyKey,
        value: Option<Expression>,
        is_static: bool,
        is_private: bool,
    },
    MethodDefinition {
        key: PropertyKey,
        value: FunctionExpression,
        kind: MethodKind,
        is_static: bool,
        is_private: bool,
    },
}

/// Method kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

/// `for`/`for-in`/`for-of` left-hand/init slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ForInit {
    VariableDeclaration {
        declarations: Vec<VariableDeclarator>,
        kind: VariableDeclarationKind,
    },
    Expression(Expression),
    /// Bare pattern target, used by `for (x in obj)` where `x` already exists.
    Pattern(Pattern),
}

/// Import specifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ImportSpecifier {
    ImportDefaultSpecifier { local: Identifier },
    ImportNamespaceSpecifier { local: Identifier },
    ImportSpecifier { imported: Identifier, local: Identifier },
}

/// Export specifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExportSpecifier {
    ExportSpecifier { local: Identifier, exported: Identifier },
}

/// JavaScript expressions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    Identifier(Identifier),
    Literal(Literal),
    BinaryExpression {
        left: Box<Expression>,
        operator: BinaryOperator,
        right: Box<Expression>,
    },
    UnaryExpression {
        operator: UnaryOperator,
        argument: Box<Expression>,
        prefix: bool,
    },
    AssignmentExpression {
        left: Box<Expression>,
        operator: AssignmentOperator,
        right: Box<Expression>,
    },
    UpdateExpression {
        operator: UpdateOperator,
        argument: Box<Expression>,
        prefix: bool,
    },
    CallExpression {
        callee: Box<Expression>,
        arguments: Vec<Argument>,
    },
    NewExpression {
        callee: Box<Expression>,
        arguments: Vec<Argument>,
    },
    MemberExpression {
        object: Box<Expression>,
        property: Box<Expression>,
        computed: bool,
    },
    FunctionExpression(FunctionExpression),
    ArrowFunctionExpression {
        params: Vec<Pattern>,
        body: ArrowFunctionBody,
        is_async: bool,
    },
    ObjectExpression {
        properties: Vec<ObjectProperty>,
    },
    ArrayExpression {
        elements: Vec<Option<Expression>>,
    },
    SequenceExpression {
        expressions: Vec<Expression>,
    },
    TemplateLiteral {
        quasis: Vec<TemplateElement>,
        expressions: Vec<Expression>,
    },
    ConditionalExpression {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
    },
    ThisExpression,
}

/// An argument in a call/new expression; spreads are kept distinct so the
/// printer and transforms can tell `f(a)` from `f(...a)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Argument {
    Expression(Expression),
    SpreadElement(Expression),
}

impl Argument {
    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Argument::Expression(e) => Some(e),
            Argument::SpreadElement(_) => None,
        }
    }
}

/// Function expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionExpression {
    pub id: Option<Identifier>,
    pub params: Vec<Pattern>,
    pub body: BlockStatement,
    pub is_async: bool,
    pub is_generator: bool,
}

/// Arrow function body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ArrowFunctionBody {
    BlockStatement(BlockStatement),
    Expression(Box<Expression>),
}

/// Object property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectProperty {
    Property {
        key: PropertyKey,
        value: Expression,
        kind: PropertyKind,
        method: bool,
        shorthand: bool,
        computed: bool,
    },
    SpreadElement {
        argument: Expression,
    },
}

/// Property kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    Init,
    Get,
    Set,
}

/// Property key. `computed` keys carry the evaluated expression so inlining
/// passes can still reason about string/number keys computed from literals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PropertyKey {
    Identifier(Identifier),
    Literal(Literal),
    PrivateName(PrivateName),
    Computed(Box<Expression>),
}

/// Private name (#x).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateName {
    pub name: String,
}

/// Template element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateElement {
    pub value: String,
    pub tail: bool,
}

/// Patterns (for destructuring, parameters, etc.)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    Identifier(Identifier),
    ArrayPattern { elements: Vec<Option<Pattern>> },
    ObjectPattern { properties: Vec<ObjectPatternProperty> },
    AssignmentPattern { left: Box<Pattern>, right: Expression },
    RestElement { argument: Box<Pattern> },
}

/// Object pattern property.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ObjectPatternProperty {
    Property {
        key: PropertyKey,
        value: Pattern,
        computed: bool,
        shorthand: bool,
    },
    RestElement { argument: Pattern },
}

/// Identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
}

/// Literal values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Literal {
    String(StringLiteral),
    Number(NumberLiteral),
    Boolean(BooleanLiteral),
    Null,
    RegExp(RegExpLiteral),
}

/// String literal. Printed from `value` directly; no raw slice is kept, so
/// `transformer::string_canonicalizer` has nothing to normalize away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringLiteral {
    pub value: String,
}

/// Number literal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberLiteral {
    pub value: f64,
}

/// Boolean literal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BooleanLiteral {
    pub value: bool,
}

/// Regular expression literal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegExpLiteral {
    pub pattern: String,
    pub flags: String,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Exponentiation,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    LeftShift,
    RightShift,
    UnsignedRightShift,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    In,
    Instanceof,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Plus,
    Minus,
    LogicalNot,
    BitwiseNot,
    Typeof,
    Void,
    Delete,
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentOperator {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    RemainderAssign,
    ExponentiationAssign,
    LeftShiftAssign,
    RightShiftAssign,
    UnsignedRightShiftAssign,
    BitwiseAndAssign,
    BitwiseOrAssign,
    BitwiseXorAssign,
    LogicalAndAssign,
    LogicalOrAssign,
    NullishCoalescingAssign,
}

/// Update operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

impl Program {
    /// Convert from an `oxc` arena program into this owned tree.
    pub fn from_oxc(oxc_program: &oxc::Program<'_>) -> Self {
        let body = oxc_program.body.iter().filter_map(Statement::from_oxc).collect();

        let source_type = if oxc_program.source_type.is_module() {
            ProgramSourceType::Module
        } else {
            ProgramSourceType::Script
        };

        Self { body, source_type }
    }
}

impl Statement {
    pub fn from_oxc(oxc_stmt: &oxc::Statement<'_>) -> Option<Self> {
        match oxc_stmt {
            oxc::Statement::VariableDeclaration(decl) => {
                let kind = VariableDeclarationKind::from_oxc(decl.kind)?;
                let declarations =
                    decl.declarations.iter().filter_map(VariableDeclarator::from_oxc).collect();

                Some(Statement::VariableDeclaration { declarations, kind, leading_comments: vec![] })
            }
            oxc::Statement::FunctionDeclaration(func) => {
                let id = func.id.as_ref().map(Identifier::from_oxc);
                let params =
                    func.params.items.iter().filter_map(|param| Pattern::from_oxc(&param.pattern)).collect();
                let body = BlockStatement {
                    body: func.body.as_ref()?.statements.iter().filter_map(Statement::from_oxc).collect(),
                };

                Some(Statement::FunctionDeclaration {
                    id,
                    params,
                    body,
                    is_async: func.r#async,
                    is_generator: func.generator,
                })
            }
            oxc::Statement::ClassDeclaration(class) => {
                let id = class.id.as_ref().map(Identifier::from_oxc);
                let super_class = class.super_class.as_ref().and_then(Expression::from_oxc).map(Box::new);
                let body = ClassBody {
                    body: class.body.body.iter().filter_map(ClassElement::from_oxc).collect(),
                };

                Some(Statement::ClassDeclaration { id, super_class, body })
            }
            oxc::Statement::ExpressionStatement(stmt) => Expression::from_oxc(&stmt.expression)
                .map(|expression| Statement::ExpressionStatement { expression, leading_comments: vec![] }),
            oxc::Statement::BlockStatement(block) => {
                let body = block.body.iter().filter_map(Statement::from_oxc).collect();
                Some(Statement::BlockStatement { body })
            }
            oxc::Statement::ReturnStatement(stmt) => {
                let argument = stmt.argument.as_ref().and_then(Expression::from_oxc);
                Some(Statement::ReturnStatement { argument })
            }
            oxc::Statement::IfStatement(if_stmt) => {
                let test = Expression::from_oxc(&if_stmt.test)?;
                let consequent = Box::new(Statement::from_oxc(&if_stmt.consequent)?);
                let alternate =
                    if_stmt.alternate.as_ref().and_then(Statement::from_oxc).map(Box::new);

                Some(Statement::IfStatement { test, consequent, alternate })
            }
            oxc::Statement::WhileStatement(while_stmt) => {
                let test = Expression::from_oxc(&while_stmt.test)?;
                let body = Box::new(Statement::from_oxc(&while_stmt.body)?);

                Some(Statement::WhileStatement { test, body })
            }
            oxc::Statement::DoWhileStatement(do_stmt) => {
                let body = Box::new(Statement::from_oxc(&do_stmt.body)?);
                let test = Expression::from_oxc(&do_stmt.test)?;
                Some(Statement::DoWhileStatement { body, test })
            }
            oxc::Statement::ForStatement(for_stmt) => {
                let init = for_stmt.init.as_ref().and_then(ForInit::from_oxc_for_init);
                let test = for_stmt.test.as_ref().and_then(Expression::from_oxc);
                let update = for_stmt.update.as_ref().and_then(Expression::from_oxc);
                let body = Box::new(Statement::from_oxc(&for_stmt.body)?);

                Some(Statement::ForStatement { init, test, update, body })
            }
            oxc::Statement::ForInStatement(for_in) => {
                let left = ForInit::from_oxc_for_stmt_left(&for_in.left)?;
                let right = Expression::from_oxc(&for_in.right)?;
                let body = Box::new(Statement::from_oxc(&for_in.body)?);
                Some(Statement::ForInStatement { left, right, body })
            }
            oxc::Statement::ForOfStatement(for_of) => {
                let left = ForInit::from_oxc_for_stmt_left(&for_of.left)?;
                let right = Expression::from_oxc(&for_of.right)?;
                let body = Box::new(Statement::from_oxc(&for_of.body)?);
                Some(Statement::ForOfStatement { left, right, body, is_await: for_of.r#await })
            }
            oxc::Statement::SwitchStatement(switch) => {
                let discriminant = Expression::from_oxc(&switch.discriminant)?;
                let cases = switch
                    .cases
                    .iter()
                    .map(|case| SwitchCase {
                        test: case.test.as_ref().and_then(Expression::from_oxc),
                        consequent: case.consequent.iter().filter_map(Statement::from_oxc).collect(),
                    })
                    .collect();
                Some(Statement::SwitchStatement { discriminant, cases })
            }
            oxc::Statement::ThrowStatement(throw) => {
                let argument = Expression::from_oxc(&throw.argument)?;
                Some(Statement::ThrowStatement { argument })
            }
            oxc::Statement::TryStatement(try_stmt) => {
                let block = BlockStatement {
                    body: try_stmt.block.body.iter().filter_map(Statement::from_oxc).collect(),
                };
                let handler = try_stmt.handler.as_ref().map(|h| CatchClause {
                    param: h.param.as_ref().and_then(|p| Pattern::from_oxc(&p.pattern)),
                    body: BlockStatement {
                        body: h.body.body.iter().filter_map(Statement::from_oxc).collect(),
                    },
                });
                let finalizer = try_stmt.finalizer.as_ref().map(|f| BlockStatement {
                    body: f.body.iter().filter_map(Statement::from_oxc).collect(),
                });
                Some(Statement::TryStatement { block, handler, finalizer })
            }
            oxc::Statement::LabeledStatement(labeled) => {
                let label = Identifier { name: labeled.label.name.to_string() };
                let body = Box::new(Statement::from_oxc(&labeled.body)?);
                Some(Statement::LabeledStatement { label, body })
            }
            oxc::Statement::BreakStatement(brk) => Some(Statement::BreakStatement {
                label: brk.label.as_ref().map(|l| Identifier { name: l.name.to_string() }),
            }),
            oxc::Statement::ContinueStatement(cont) => Some(Statement::ContinueStatement {
                label: cont.label.as_ref().map(|l| Identifier { name: l.name.to_string() }),
            }),
            oxc::Statement::DebuggerStatement(_) => {
                Some(Statement::DebuggerStatement { leading_comments: vec![] })
            }
            oxc::Statement::EmptyStatement(_) => Some(Statement::EmptyStatement),
            _ => None,
        }
    }
}

impl VariableDeclarationKind {
    fn from_oxc(kind: oxc::VariableDeclarationKind) -> Option<Self> {
        match kind {
            oxc::VariableDeclarationKind::Var => Some(VariableDeclarationKind::Var),
            oxc::VariableDeclarationKind::Let => Some(VariableDeclarationKind::Let),
            oxc::VariableDeclarationKind::Const => Some(VariableDeclarationKind::Const),
            _ => None,
        }
    }
}

impl ForInit {
    fn from_oxc_for_init(init: &oxc::ForStatementInit<'_>) -> Option<Self> {
        if let Some(expr) = init.as_expression() {
            return Expression::from_oxc(expr).map(ForInit::Expression);
        }
        if let oxc::ForStatementInit::VariableDeclaration(decl) = init {
            let kind = VariableDeclarationKind::from_oxc(decl.kind)?;
            let declarations = decl.declarations.iter().filter_map(VariableDeclarator::from_oxc).collect();
            return Some(ForInit::VariableDeclaration { declarations, kind });
        }
        None
    }

    fn from_oxc_for_stmt_left(left: &oxc::ForStatementLeft<'_>) -> Option<Self> {
        match left {
            oxc::ForStatementLeft::VariableDeclaration(decl) => {
                let kind = VariableDeclarationKind::from_oxc(decl.kind)?;
                let declarations =
                    decl.declarations.iter().filter_map(VariableDeclarator::from_oxc).collect();
                Some(ForInit::VariableDeclaration { declarations, kind })
            }
            oxc::ForStatementLeft::AssignmentTargetIdentifier(id) => {
                Some(ForInit::Expression(Expression::Identifier(Identifier { name: id.name.to_string() })))
            }
            oxc::ForStatementLeft::StaticMemberExpression(expr) => {
                let object = Box::new(Expression::from_oxc(&expr.object)?);
                let property = Box::new(Expression::Identifier(Identifier { name: expr.property.name.to_string() }));
                Some(ForInit::Expression(Expression::MemberExpression { object, property, computed: false }))
            }
            oxc::ForStatementLeft::ComputedMemberExpression(expr) => {
                let object = Box::new(Expression::from_oxc(&expr.object)?);
                let property = Box::new(Expression::from_oxc(&expr.expression)?);
                Some(ForInit::Expression(Expression::MemberExpression { object, property, computed: true }))
            }
            _ => None,
        }
    }
}

impl VariableDeclarator {
    pub fn from_oxc(oxc_decl: &oxc::VariableDeclarator<'_>) -> Option<Self> {
        let id = Pattern::from_oxc(&oxc_decl.id)?;
        let init = oxc_decl.init.as_ref().and_then(Expression::from_oxc);

        Some(Self { id, init })
    }
}

impl ClassElement {
    pub fn from_oxc(oxc_elem: &oxc::ClassElement<'_>) -> Option<Self> {
        match oxc_elem {
            oxc::ClassElement::PropertyDefinition(prop) => {
                let key = PropertyKey::from_oxc(&prop.key)?;
                let value = prop.value.as_ref().and_then(Expression::from_oxc);
                let is_static = prop.r#static;
                let is_private = matches!(&prop.key, oxc::PropertyKey::PrivateIdentifier(_));

                Some(ClassElement::PropertyDefinition { key, value, is_static, is_private })
            }
            oxc::ClassElement::MethodDefinition(method) => {
                let key = PropertyKey::from_oxc(&method.key)?;
                let value = FunctionExpression::from_oxc(&method.value)?;
                let kind = match method.kind {
                    oxc::MethodDefinitionKind::Constructor => MethodKind::Constructor,
                    oxc::MethodDefinitionKind::Method => MethodKind::Method,
                    oxc::MethodDefinitionKind::Get => MethodKind::Get,
                    oxc::MethodDefinitionKind::Set => MethodKind::Set,
                };
                let is_static = method.r#static;
                let is_private = matches!(&method.key, oxc::PropertyKey::PrivateIdentifier(_));

                Some(ClassElement::MethodDefinition { key, value, kind, is_static, is_private })
            }
            _ => None,
        }
    }
}

impl Expression {
    pub fn from_oxc(oxc_expr: &oxc::Expression<'_>) -> Option<Self> {
        match oxc_expr {
            oxc::Expression::Identifier(id) => {
                Some(Expression::Identifier(Identifier { name: id.name.to_string() }))
            }
            oxc::Expression::NumericLiteral(lit) => {
                Some(Expression::Literal(Literal::Number(NumberLiteral { value: lit.value })))
            }
            oxc::Expression::StringLiteral(lit) => {
                Some(Expression::Literal(Literal::String(StringLiteral { value: lit.value.to_string() })))
            }
            oxc::Expression::BooleanLiteral(lit) => {
                Some(Expression::Literal(Literal::Boolean(BooleanLiteral { value: lit.value })))
            }
            oxc::Expression::NullLiteral(_) => Some(Expression::Literal(Literal::Null)),
            oxc::Expression::ThisExpression(_) => Some(Expression::ThisExpression),
            oxc::Expression::BinaryExpression(expr) => {
                let left = Box::new(Expression::from_oxc(&expr.left)?);
                let right = Box::new(Expression::from_oxc(&expr.right)?);
                let operator = BinaryOperator::from_oxc(expr.operator)?;

                Some(Expression::BinaryExpression { left, operator, right })
            }
            oxc::Expression::LogicalExpression(expr) => {
                let left = Box::new(Expression::from_oxc(&expr.left)?);
                let right = Box::new(Expression::from_oxc(&expr.right)?);
                let operator = match expr.operator {
                    oxc::LogicalOperator::And => BinaryOperator::LogicalAnd,
                    oxc::LogicalOperator::Or => BinaryOperator::LogicalOr,
                    oxc::LogicalOperator::Coalesce => return None,
                };
                Some(Expression::BinaryExpression { left, operator, right })
            }
            oxc::Expression::UnaryExpression(expr) => {
                let argument = Box::new(Expression::from_oxc(&expr.argument)?);
                let operator = UnaryOperator::from_oxc(expr.operator)?;
                Some(Expression::UnaryExpression { operator, argument, prefix: true })
            }
            oxc::Expression::UpdateExpression(expr) => {
                let argument = Box::new(Expression::from_oxc_simple_assignment_target(&expr.argument)?);
                let operator = match expr.operator {
                    oxc::UpdateOperator::Increment => UpdateOperator::Increment,
                    oxc::UpdateOperator::Decrement => UpdateOperator::Decrement,
                };
                Some(Expression::UpdateExpression { operator, argument, prefix: expr.prefix })
            }
            oxc::Expression::AssignmentExpression(expr) => {
                let left = Box::new(Expression::from_oxc_assignment_target(&expr.left)?);
                let right = Box::new(Expression::from_oxc(&expr.right)?);
                let operator = AssignmentOperator::from_oxc(expr.operator)?;
                Some(Expression::AssignmentExpression { left, operator, right })
            }
            oxc::Expression::SequenceExpression(seq) => {
                let expressions = seq.expressions.iter().filter_map(Expression::from_oxc).collect();
                Some(Expression::SequenceExpression { expressions })
            }
            oxc::Expression::ConditionalExpression(expr) => {
                let test = Box::new(Expression::from_oxc(&expr.test)?);
                let consequent = Box::new(Expression::from_oxc(&expr.consequent)?);
                let alternate = Box::new(Expression::from_oxc(&expr.alternate)?);
                Some(Expression::ConditionalExpression { test, consequent, alternate })
            }
            oxc::Expression::ArrayExpression(arr) => {
                let elements = arr
                    .elements
                    .iter()
                    .map(|el| match el {
                        oxc::ArrayExpressionElement::Elision(_) => None,
                        oxc::ArrayExpressionElement::SpreadElement(_) => None,
                        _ => el.as_expression().and_then(Expression::from_oxc),
                    })
                    .collect();
                Some(Expression::ArrayExpression { elements })
            }
            oxc::Expression::ObjectExpression(obj) => {
                let properties = obj.properties.iter().filter_map(ObjectProperty::from_oxc).collect();
                Some(Expression::ObjectExpression { properties })
            }
            oxc::Expression::TemplateLiteral(tmpl) => {
                let quasis = tmpl
                    .quasis
                    .iter()
                    .map(|quasi| TemplateElement {
                        value: quasi.value.cooked.as_ref().map(|c| c.to_string()).unwrap_or_else(|| quasi.value.raw.to_string()),
                        tail: quasi.tail,
                    })
                    .collect();

                let expressions = tmpl.expressions.iter().filter_map(Expression::from_oxc).collect();

                Some(Expression::TemplateLiteral { quasis, expressions })
            }
            oxc::Expression::FunctionExpression(func) => {
                Some(Expression::FunctionExpression(FunctionExpression::from_oxc(func)?))
            }
            oxc::Expression::ArrowFunctionExpression(arrow) => {
                let params =
                    arrow.params.items.iter().filter_map(|param| Pattern::from_oxc(&param.pattern)).collect();
                let body = if arrow.expression {
                    let expr_stmt = arrow.body.statements.first()?;
                    if let oxc::Statement::ExpressionStatement(stmt) = expr_stmt {
                        ArrowFunctionBody::Expression(Box::new(Expression::from_oxc(&stmt.expression)?))
                    } else {
                        return None;
                    }
                } else {
                    ArrowFunctionBody::BlockStatement(BlockStatement {
                        body: arrow.body.statements.iter().filter_map(Statement::from_oxc).collect(),
                    })
                };
                Some(Expression::ArrowFunctionExpression { params, body, is_async: arrow.r#async })
            }
            oxc::Expression::CallExpression(call) => {
                let callee = Box::new(Expression::from_oxc(&call.callee)?);
                let arguments = call.arguments.iter().filter_map(Argument::from_oxc).collect();

                Some(Expression::CallExpression { callee, arguments })
            }
            oxc::Expression::NewExpression(new_expr) => {
                let callee = Box::new(Expression::from_oxc(&new_expr.callee)?);
                let arguments = new_expr.arguments.iter().filter_map(Argument::from_oxc).collect();
                Some(Expression::NewExpression { callee, arguments })
            }
            oxc::Expression::StaticMemberExpression(expr) => {
                let object = Box::new(Expression::from_oxc(&expr.object)?);
                let property = Box::new(Expression::Identifier(Identifier { name: expr.property.name.to_string() }));
                Some(Expression::MemberExpression { object, property, computed: false })
            }
            oxc::Expression::ComputedMemberExpression(expr) => {
                let object = Box::new(Expression::from_oxc(&expr.object)?);
                let property = Box::new(Expression::from_oxc(&expr.expression)?);
                Some(Expression::MemberExpression { object, property, computed: true })
            }
            oxc::Expression::ParenthesizedExpression(expr) => Expression::from_oxc(&expr.expression),
            oxc::Expression::RegExpLiteral(regex) => {
                Some(Expression::Literal(Literal::RegExp(RegExpLiteral {
                    pattern: regex.regex.pattern.to_string(),
                    flags: regex.regex.flags.to_string(),
                })))
            }
            _ => None,
        }
    }

    fn from_oxc_assignment_target(target: &oxc::AssignmentTarget<'_>) -> Option<Self> {
        match target {
            oxc::AssignmentTarget::AssignmentTargetIdentifier(id) => {
                Some(Expression::Identifier(Identifier { name: id.name.to_string() }))
            }
            oxc::AssignmentTarget::StaticMemberExpression(expr) => {
                let object = Box::new(Expression::from_oxc(&expr.object)?);
                let property = Box::new(Expression::Identifier(Identifier { name: expr.property.name.to_string() }));
                Some(Expression::MemberExpression { object, property, computed: false })
            }
            oxc::AssignmentTarget::ComputedMemberExpression(expr) => {
                let object = Box::new(Expression::from_oxc(&expr.object)?);
                let property = Box::new(Expression::from_oxc(&expr.expression)?);
                Some(Expression::MemberExpression { object, property, computed: true })
            }
            _ => None,
        }
    }

    fn from_oxc_simple_assignment_target(target: &oxc::SimpleAssignmentTarget<'_>) -> Option<Self> {
        match target {
            oxc::SimpleAssignmentTarget::AssignmentTargetIdentifier(id) => {
                Some(Expression::Identifier(Identifier { name: id.name.to_string() }))
            }
            oxc::SimpleAssignmentTarget::StaticMemberExpression(expr) => {
                let object = Box::new(Expression::from_oxc(&expr.object)?);
                let property = Box::new(Expression::Identifier(Identifier { name: expr.property.name.to_string() }));
                Some(Expression::MemberExpression { object, property, computed: false })
            }
            oxc::SimpleAssignmentTarget::ComputedMemberExpression(expr) => {
                let object = Box::new(Expression::from_oxc(&expr.object)?);
                let property = Box::new(Expression::from_oxc(&expr.expression)?);
                Some(Expression::MemberExpression { object, property, computed: true })
            }
            _ => None,
        }
    }
}

impl Argument {
    fn from_oxc(arg: &oxc::Argument<'_>) -> Option<Self> {
        match arg {
            oxc::Argument::SpreadElement(spread) => {
                Expression::from_oxc(&spread.argument).map(Argument::SpreadElement)
            }
            _ => arg.as_expression().and_then(Expression::from_oxc).map(Argument::Expression),
        }
    }
}

impl ObjectProperty {
    fn from_oxc(prop: &oxc::ObjectPropertyKind<'_>) -> Option<Self> {
        match prop {
            oxc::ObjectPropertyKind::ObjectProperty(p) => {
                let key = PropertyKey::from_oxc(&p.key)?;
                let value = Expression::from_oxc(&p.value)?;
                let kind = match p.kind {
                    oxc::PropertyKind::Init => PropertyKind::Init,
                    oxc::PropertyKind::Get => PropertyKind::Get,
                    oxc::PropertyKind::Set => PropertyKind::Set,
                };
                Some(ObjectProperty::Property {
                    key,
                    value,
                    kind,
                    method: p.method,
                    shorthand: p.shorthand,
                    computed: p.computed,
                })
            }
            oxc::ObjectPropertyKind::SpreadProperty(spread) => {
                Expression::from_oxc(&spread.argument).map(|argument| ObjectProperty::SpreadElement { argument })
            }
        }
    }
}

impl Pattern {
    pub fn from_oxc(oxc_pattern: &oxc::BindingPattern<'_>) -> Option<Self> {
        match &oxc_pattern.kind {
            oxc::BindingPatternKind::BindingIdentifier(id) => Some(Pattern::Identifier(Identifier::from_oxc(id))),
            oxc::BindingPatternKind::ArrayPattern(arr) => {
                let elements = arr.elements.iter().map(|el| el.as_ref().and_then(Pattern::from_oxc)).collect();
                Some(Pattern::ArrayPattern { elements })
            }
            oxc::BindingPatternKind::ObjectPattern(obj) => {
                let properties = obj
                    .properties
                    .iter()
                    .filter_map(|p| {
                        let key = PropertyKey::from_oxc(&p.key)?;
                        let value = Pattern::from_oxc(&p.value)?;
                        Some(ObjectPatternProperty::Property {
                            key,
                            value,
                            computed: p.computed,
                            shorthand: p.shorthand,
                        })
                    })
                    .collect();
                Some(Pattern::ObjectPattern { properties })
            }
            oxc::BindingPatternKind::AssignmentPattern(assign) => {
                let left = Box::new(Pattern::from_oxc(&assign.left)?);
                let right = Expression::from_oxc(&assign.right)?;
                Some(Pattern::AssignmentPattern { left, right })
            }
        }
    }
}

impl Identifier {
    pub fn from_oxc(oxc_id: &oxc::BindingIdentifier<'_>) -> Self {
        Self { name: oxc_id.name.to_string() }
    }
}

impl BinaryOperator {
    pub fn from_oxc(oxc_op: oxc::BinaryOperator) -> Option<Self> {
        match oxc_op {
            oxc::BinaryOperator::Addition => Some(BinaryOperator::Add),
            oxc::BinaryOperator::Subtraction => Some(BinaryOperator::Subtract),
            oxc::BinaryOperator::Multiplication => Some(BinaryOperator::Multiply),
            oxc::BinaryOperator::Division => Some(BinaryOperator::Divide),
            oxc::BinaryOperator::Remainder => Some(BinaryOperator::Remainder),
            oxc::BinaryOperator::Exponential => Some(BinaryOperator::Exponentiation),
            oxc::BinaryOperator::Equality => Some(BinaryOperator::Equal),
            oxc::BinaryOperator::Inequality => Some(BinaryOperator::NotEqual),
            oxc::BinaryOperator::StrictEquality => Some(BinaryOperator::StrictEqual),
            oxc::BinaryOperator::StrictInequality => Some(BinaryOperator::StrictNotEqual),
            oxc::BinaryOperator::LessThan => Some(BinaryOperator::LessThan),
            oxc::BinaryOperator::LessEqualThan => Some(BinaryOperator::LessThanEqual),
            oxc::BinaryOperator::GreaterThan => Some(BinaryOperator::GreaterThan),
            oxc::BinaryOperator::GreaterEqualThan => Some(BinaryOperator::GreaterThanEqual),
            oxc::BinaryOperator::ShiftLeft => Some(BinaryOperator::LeftShift),
            oxc::BinaryOperator::ShiftRight => Some(BinaryOperator::RightShift),
            oxc::BinaryOperator::ShiftRightZeroFill => Some(BinaryOperator::UnsignedRightShift),
            oxc::BinaryOperator::BitwiseAnd => Some(BinaryOperator::BitwiseAnd),
            oxc::BinaryOperator::BitwiseOR => Some(BinaryOperator::BitwiseOr),
            oxc::BinaryOperator::BitwiseXOR => Some(BinaryOperator::BitwiseXor),
            oxc::BinaryOperator::In => Some(BinaryOperator::In),
            oxc::BinaryOperator::Instanceof => Some(BinaryOperator::Instanceof),
        }
    }
}

impl UnaryOperator {
    fn from_oxc(op: oxc::UnaryOperator) -> Option<Self> {
        match op {
            oxc::UnaryOperator::UnaryPlus => Some(UnaryOperator::Plus),
            oxc::UnaryOperator::UnaryNegation => Some(UnaryOperator::Minus),
            oxc::UnaryOperator::LogicalNot => Some(UnaryOperator::LogicalNot),
            oxc::UnaryOperator::BitwiseNot => Some(UnaryOperator::BitwiseNot),
            oxc::UnaryOperator::Typeof => Some(UnaryOperator::Typeof),
            oxc::UnaryOperator::Void => Some(UnaryOperator::Void),
            oxc::UnaryOperator::Delete => Some(UnaryOperator::Delete),
        }
    }
}

impl AssignmentOperator {
    fn from_oxc(op: oxc::AssignmentOperator) -> Option<Self> {
        match op {
            oxc::AssignmentOperator::Assign => Some(AssignmentOperator::Assign),
            oxc::AssignmentOperator::Addition => Some(AssignmentOperator::AddAssign),
            oxc::AssignmentOperator::Subtraction => Some(AssignmentOperator::SubtractAssign),
            oxc::AssignmentOperator::Multiplication => Some(AssignmentOperator::MultiplyAssign),
            oxc::AssignmentOperator::Division => Some(AssignmentOperator::DivideAssign),
            oxc::AssignmentOperator::Remainder => Some(AssignmentOperator::RemainderAssign),
            oxc::AssignmentOperator::Exponential => Some(AssignmentOperator::ExponentiationAssign),
            oxc::AssignmentOperator::ShiftLeft => Some(AssignmentOperator::LeftShiftAssign),
            oxc::AssignmentOperator::ShiftRight => Some(AssignmentOperator::RightShiftAssign),
            oxc::AssignmentOperator::ShiftRightZeroFill => Some(AssignmentOperator::UnsignedRightShiftAssign),
            oxc::AssignmentOperator::BitwiseAnd => Some(AssignmentOperator::BitwiseAndAssign),
            oxc::AssignmentOperator::BitwiseOR => Some(AssignmentOperator::BitwiseOrAssign),
            oxc::AssignmentOperator::BitwiseXOR => Some(AssignmentOperator::BitwiseXorAssign),
            oxc::AssignmentOperator::LogicalAnd => Some(AssignmentOperator::LogicalAndAssign),
            oxc::AssignmentOperator::LogicalOr => Some(AssignmentOperator::LogicalOrAssign),
            oxc::AssignmentOperator::LogicalNullish => Some(AssignmentOperator::NullishCoalescingAssign),
        }
    }
}

impl PropertyKey {
    pub fn from_oxc(oxc_key: &oxc::PropertyKey<'_>) -> Option<Self> {
        match oxc_key {
            oxc::PropertyKey::Identifier(id) => {
                Some(PropertyKey::Identifier(Identifier { name: id.name.to_string() }))
            }
            oxc::PropertyKey::PrivateIdentifier(private) => {
                Some(PropertyKey::PrivateName(PrivateName { name: private.name.to_string() }))
            }
            oxc::PropertyKey::StringLiteral(lit) => {
                Some(PropertyKey::Literal(Literal::String(StringLiteral { value: lit.value.to_string() })))
            }
            oxc::PropertyKey::NumericLiteral(lit) => {
                Some(PropertyKey::Literal(Literal::Number(NumberLiteral { value: lit.value })))
            }
            _ => {
                let expr = oxc_key.as_expression()?;
                Expression::from_oxc(expr).map(|e| PropertyKey::Computed(Box::new(e)))
            }
        }
    }
}

impl FunctionExpression {
    pub fn from_oxc(oxc_func: &oxc::Function<'_>) -> Option<Self> {
        let id = oxc_func.id.as_ref().map(Identifier::from_oxc);

        let params =
            oxc_func.params.items.iter().filter_map(|param| Pattern::from_oxc(&param.pattern)).collect();

        let body = BlockStatement {
            body: oxc_func.body.as_ref()?.statements.iter().filter_map(Statement::from_oxc).collect(),
        };

        Some(FunctionExpression {
            id,
            params,
            body,
            is_async: oxc_func.r#async,
            is_generator: oxc_func.generator,
        })
    }
}
