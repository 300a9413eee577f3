//! Unit tests for the parser module.

use std::rc::Rc;

use super::{
    parser::parse,
    tree::{ParseTree, Rule},
};
use crate::{errors::errors::Error, lexer::lexer::tokenize, lexer::tokens::TokenKind};

fn parse_source(source: &str) -> Result<ParseTree, Error> {
    let tokens = tokenize(source.to_string(), Some("test.ru".to_string())).unwrap();
    parse(tokens, Rc::new("test.ru".to_string()))
}

/// The first top-level item of a program.
fn first_item(source: &str) -> ParseTree {
    let tree = parse_source(source).unwrap();
    assert_eq!(tree.rule(), Some(Rule::Program));
    tree.children()[0].clone()
}

/// Rules and token kinds in prefix order, for comparing tree shapes.
fn shape(tree: &ParseTree) -> String {
    match tree {
        ParseTree::Leaf(token) => match token.kind {
            TokenKind::Identifier | TokenKind::Integer | TokenKind::Float => token.value.clone(),
            kind => format!("{}", kind),
        },
        ParseTree::Node { rule, children, .. } => format!(
            "{:?}[{}]",
            rule,
            children.iter().map(shape).collect::<Vec<String>>().join(" ")
        ),
    }
}

#[test]
fn test_parse_variable_declaration() {
    let decl = first_item("let x = 42;");
    assert_eq!(shape(&decl), "DeclarationStmt[Let x 42]");
}

#[test]
fn test_parse_const_declaration_with_type() {
    let decl = first_item("const PI: float = 3.14;");
    assert_eq!(
        shape(&decl),
        "DeclarationStmt[Const PI TypeSpecifier[FloatType] 3.14]"
    );
}

#[test]
fn test_parse_declaration_without_initializer() {
    let decl = first_item("let x: int;");
    assert_eq!(shape(&decl), "DeclarationStmt[Let x TypeSpecifier[IntType]]");
}

#[test]
fn test_parse_function_definition() {
    let func = first_item("fn int add(int a, int b) { return a + b; }");
    assert_eq!(
        shape(&func),
        "FuncDef[TypeSpecifier[IntType] add Params[Param[TypeSpecifier[IntType] a] Param[TypeSpecifier[IntType] b]] Block[ReturnStmt[Additive[a Plus b]]]]"
    );
}

#[test]
fn test_parse_function_without_params() {
    let func = first_item("fn void hello() { print(\"hi\"); }");
    assert_eq!(func.children().len(), 3);
    assert_eq!(func.children()[2].rule(), Some(Rule::Block));
}

#[test]
fn test_operator_chain_is_flat() {
    let stmt = first_item("a - b - c;");
    assert_eq!(shape(&stmt), "ExprStmt[Additive[a Dash b Dash c]]");
}

#[test]
fn test_single_operand_levels_are_inlined() {
    let stmt = first_item("x;");
    assert_eq!(shape(&stmt), "ExprStmt[x]");
}

#[test]
fn test_precedence_levels() {
    let stmt = first_item("let r = 5 + 3 * 2 < 10 == true || !done && x;");
    assert_eq!(
        shape(&stmt),
        "DeclarationStmt[Let r LogicalOr[Equality[Relational[Additive[5 Plus Multiplicative[3 Star 2]] Less 10] Equals True] Or LogicalAnd[Unary[Not done] And x]]]"
    );
}

#[test]
fn test_parenthesized_expression() {
    let stmt = first_item("let result = (5 + 3) * 2;");
    assert_eq!(
        shape(&stmt),
        "DeclarationStmt[Let result Multiplicative[Additive[5 Plus 3] Star 2]]"
    );
}

#[test]
fn test_nested_unary() {
    let stmt = first_item("let n = - -x;");
    assert_eq!(shape(&stmt), "DeclarationStmt[Let n Unary[Dash Unary[Dash x]]]");
}

#[test]
fn test_call_expression() {
    let stmt = first_item("let r = square(5, y + 1);");
    assert_eq!(
        shape(&stmt),
        "DeclarationStmt[Let r Call[square Args[5 Additive[y Plus 1]]]]"
    );

    let stmt = first_item("tick();");
    assert_eq!(shape(&stmt), "ExprStmt[Call[tick]]");
}

#[test]
fn test_print_with_multiple_arguments() {
    let stmt = first_item("print(1, 2.5, \"s\");");
    assert_eq!(shape(&stmt), "PrintStmt[Args[1 2.5 String]]");
}

#[test]
fn test_assignment_statements() {
    assert_eq!(shape(&first_item("x = 42;")), "AssignmentStmt[x Assignment 42]");
    assert_eq!(shape(&first_item("x += 5;")), "AssignmentStmt[x PlusEquals 5]");
    assert_eq!(shape(&first_item("x %= 2;")), "AssignmentStmt[x PercentEquals 2]");
    assert_eq!(shape(&first_item("x++;")), "IncrementStmt[x PlusPlus]");
    assert_eq!(shape(&first_item("x--;")), "IncrementStmt[x MinusMinus]");
}

#[test]
fn test_return_statement() {
    assert_eq!(shape(&first_item("return 42;")), "ReturnStmt[42]");
    assert_eq!(shape(&first_item("return;")), "ReturnStmt[]");
}

#[test]
fn test_nested_blocks() {
    let block = first_item("{ let x = 10; { let y = 20; } }");
    assert_eq!(
        shape(&block),
        "Block[DeclarationStmt[Let x 10] Block[DeclarationStmt[Let y 20]]]"
    );
}

#[test]
fn test_program_keeps_source_order() {
    let tree = parse_source("let x = 1; fn int f() { return x; } print(f());").unwrap();
    let rules: Vec<Option<Rule>> = tree.children().iter().map(|c| c.rule()).collect();

    assert_eq!(
        rules,
        vec![
            Some(Rule::DeclarationStmt),
            Some(Rule::FuncDef),
            Some(Rule::PrintStmt)
        ]
    );
}

#[test]
fn test_node_spans() {
    let stmt = first_item("let x = 1 + 2;");
    let value = &stmt.children()[2];

    assert_eq!(stmt.span().start.0, 0);
    assert_eq!(stmt.span().end.0, 14);
    assert_eq!(value.span().start.0, 8);
    assert_eq!(value.span().end.0, 13);
}

#[test]
fn test_parse_empty_program() {
    let tree = parse_source("").unwrap();
    assert!(tree.children().is_empty());
}

#[test]
fn test_parse_syntax_error_missing_semicolon() {
    let error = parse_source("let x = 42").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_parse_syntax_error_missing_identifier() {
    let error = parse_source("let = 42;").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(error.get_position().0, 4);
}

#[test]
fn test_parse_error_unclosed_block() {
    assert!(parse_source("fn void f() { print(1);").is_err());
}

#[test]
fn test_nested_function_is_rejected() {
    assert!(parse_source("fn void f() { fn void g() { } }").is_err());
}

#[test]
fn test_function_requires_return_type() {
    let error = parse_source("fn f() { }").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}
