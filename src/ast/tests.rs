//! Unit tests for the AST builder.

use std::rc::Rc;

use pretty_assertions::assert_eq;

use super::{
    ast::{Program, Stmt},
    builder::build_ast,
    expressions::{BinaryOp, Expr, ExprKind, Literal, UnaryOp},
    types::Type,
};
use crate::{
    errors::errors::Error,
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    parser::{
        parser::parse,
        tree::{ParseTree, Rule},
    },
    Position, Span, MK_TOKEN,
};

fn build(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source.to_string(), Some("test.ru".to_string())).unwrap();
    let tree = parse(tokens, Rc::new("test.ru".to_string())).unwrap();
    build_ast(&tree)
}

/// Renders an expression fully parenthesized, to compare tree shapes.
fn render(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Literal(Literal::Int(value)) => value.to_string(),
        ExprKind::Literal(Literal::Float(value)) => format!("{:?}", value),
        ExprKind::Literal(Literal::String(value)) => format!("{:?}", value),
        ExprKind::Literal(Literal::Bool(value)) => value.to_string(),
        ExprKind::Symbol(name) => name.clone(),
        ExprKind::Prefix { operator, right } => format!("({}{})", operator, render(right)),
        ExprKind::Binary {
            operator,
            left,
            right,
        } => format!("({} {} {})", render(left), operator, render(right)),
        ExprKind::Call { callee, arguments } => format!(
            "{}({})",
            callee,
            arguments.iter().map(render).collect::<Vec<String>>().join(", ")
        ),
    }
}

fn expression_of(source: &str) -> Expr {
    let program = build(source).unwrap();
    match &program.body[0] {
        Stmt::Expression(stmt) => stmt.expression.clone(),
        Stmt::VarDecl(decl) => decl.assigned_value.clone().unwrap(),
        Stmt::Assignment(assignment) => assignment.value.clone(),
        other => panic!("unexpected statement {:?}", other),
    }
}

fn span_at(offset: u32) -> Span {
    let file = Rc::new("test.ru".to_string());
    Span {
        start: Position(offset, Rc::clone(&file)),
        end: Position(offset + 1, file),
    }
}

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(render(&expression_of("a - b - c;")), "((a - b) - c)");
}

#[test]
fn test_mixed_chain_is_left_associative() {
    assert_eq!(render(&expression_of("a / b * c % d;")), "(((a / b) * c) % d)");
}

#[test]
fn test_precedence_is_preserved() {
    assert_eq!(
        render(&expression_of("1 + 2 * 3 < 4 || !ok && -x == y;")),
        "(((1 + (2 * 3)) < 4) || ((!ok) && ((-x) == y)))"
    );
}

#[test]
fn test_calls_and_literals() {
    assert_eq!(
        render(&expression_of("f(1, 2.5, \"s\", true, g());")),
        "f(1, 2.5, \"s\", true, g())"
    );
}

#[test]
fn test_literals_have_provisional_types() {
    let program = build("let a = 1; let b = 1.5; let c = \"x\"; let d = false;").unwrap();

    let types: Vec<Type> = program
        .body
        .iter()
        .map(|stmt| match stmt {
            Stmt::VarDecl(decl) => match &decl.assigned_value.as_ref().unwrap().kind {
                ExprKind::Literal(literal) => literal.provisional_type(),
                other => panic!("expected literal, got {:?}", other),
            },
            other => panic!("expected declaration, got {:?}", other),
        })
        .collect();

    assert_eq!(types, vec![Type::Int, Type::Float, Type::String, Type::Bool]);
}

#[test]
fn test_expressions_start_undecorated() {
    let expr = expression_of("1 + x;");
    assert_eq!(expr.ty, None);
    assert_eq!(expr.promote_to, None);
}

#[test]
fn test_declaration_parts() {
    let program = build("const PI: float = 3.14; let n: int;").unwrap();

    let Stmt::VarDecl(pi) = &program.body[0] else {
        panic!("expected declaration");
    };
    assert!(pi.is_constant);
    assert_eq!(pi.identifier, "PI");
    assert_eq!(pi.explicit_type, Some(Type::Float));
    assert!(pi.assigned_value.is_some());
    assert_eq!(pi.var_type, None);

    let Stmt::VarDecl(n) = &program.body[1] else {
        panic!("expected declaration");
    };
    assert!(!n.is_constant);
    assert_eq!(n.explicit_type, Some(Type::Int));
    assert!(n.assigned_value.is_none());
}

#[test]
fn test_compound_assignment_is_desugared() {
    assert_eq!(render(&expression_of("x += 2 * y;")), "(x + (2 * y))");
    assert_eq!(render(&expression_of("x %= 3;")), "(x % 3)");
}

#[test]
fn test_increment_is_desugared() {
    let program = build("count++; count--;").unwrap();

    let Stmt::Assignment(increment) = &program.body[0] else {
        panic!("expected assignment");
    };
    assert_eq!(increment.identifier, "count");
    assert_eq!(render(&increment.value), "(count + 1)");

    let Stmt::Assignment(decrement) = &program.body[1] else {
        panic!("expected assignment");
    };
    assert_eq!(render(&decrement.value), "(count - 1)");
}

#[test]
fn test_function_definition() {
    let program = build("fn float scale(int x, float factor) { return x * factor; }").unwrap();
    let func = program.functions().next().unwrap();

    assert_eq!(func.identifier, "scale");
    assert_eq!(func.return_type, Type::Float);
    assert_eq!(func.parameter_types(), vec![Type::Int, Type::Float]);
    assert_eq!(func.parameters[1].name, "factor");
    assert_eq!(func.body.body.len(), 1);
}

#[test]
fn test_source_order_is_preserved() {
    let program = build("print(1); fn void f() { } let x = 2; { x = 3; }").unwrap();

    let kinds: Vec<&str> = program
        .body
        .iter()
        .map(|stmt| match stmt {
            Stmt::FnDecl(_) => "fn",
            Stmt::VarDecl(_) => "let",
            Stmt::Assignment(_) => "assign",
            Stmt::Print(_) => "print",
            Stmt::Return(_) => "return",
            Stmt::Expression(_) => "expr",
            Stmt::Block(_) => "block",
        })
        .collect();

    assert_eq!(kinds, vec!["print", "fn", "let", "block"]);
}

#[test]
fn test_unary_nesting() {
    let expr = expression_of("- -x;");
    let ExprKind::Prefix { operator, right } = &expr.kind else {
        panic!("expected prefix");
    };

    assert_eq!(*operator, UnaryOp::Negate);
    assert!(matches!(
        right.kind,
        ExprKind::Prefix {
            operator: UnaryOp::Negate,
            ..
        }
    ));
}

#[test]
fn test_binary_span_covers_operands() {
    let expr = expression_of("ab + cd;");
    let ExprKind::Binary { operator, .. } = &expr.kind else {
        panic!("expected binary");
    };

    assert_eq!(*operator, BinaryOp::Add);
    assert_eq!(expr.span.start.0, 0);
    assert_eq!(expr.span.end.0, 7);
}

#[test]
fn test_integer_overflow_is_number_parse_error() {
    let error = build("let x = 99999999999;").unwrap_err();
    assert_eq!(error.get_error_name(), "NumberParseError");
    assert_eq!(error.get_position().0, 8);
}

#[test]
fn test_negative_integer_literal_is_folded() {
    let expr = expression_of("let x = -2147483648;");
    assert_eq!(expr.kind, ExprKind::Literal(Literal::Int(i32::MIN)));
    assert_eq!((expr.span.start.0, expr.span.end.0), (8, 19));

    assert_eq!(render(&expression_of("let x = 1 - -3;")), "(1 - -3)");
    assert_eq!(render(&expression_of("let x = - -3;")), "(--3)");

    let error = build("let x = -2147483649;").unwrap_err();
    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_unknown_tree_shape_is_structure_error() {
    let stray = MK_TOKEN!(TokenKind::Comma, String::from(","), span_at(0));
    let tree = ParseTree::node(Rule::Program, vec![ParseTree::Leaf(stray)], span_at(0));

    let error = build_ast(&tree).unwrap_err();
    assert_eq!(error.get_error_name(), "SyntaxStructureError");
}

#[test]
fn test_operator_from_wrong_level_is_structure_error() {
    let token = |kind: TokenKind, value: &str, offset: u32| {
        ParseTree::Leaf(MK_TOKEN!(kind, String::from(value), span_at(offset)))
    };

    let chain = ParseTree::node(
        Rule::Additive,
        vec![
            token(TokenKind::Integer, "1", 0),
            token(TokenKind::Star, "*", 2),
            token(TokenKind::Integer, "2", 4),
        ],
        span_at(0),
    );
    let stmt = ParseTree::node(Rule::ExprStmt, vec![chain], span_at(0));
    let tree = ParseTree::node(Rule::Program, vec![stmt], span_at(0));

    let error = build_ast(&tree).unwrap_err();
    assert_eq!(error.get_error_name(), "SyntaxStructureError");
}
