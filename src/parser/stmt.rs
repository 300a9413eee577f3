use crate::{errors::errors::Error, lexer::tokens::TokenKind};

use super::{
    expr::{parse_args, parse_expr},
    parser::Parser,
    tree::{ParseTree, Rule},
    types::parse_type_specifier,
};

pub fn parse_stmt(parser: &mut Parser) -> Result<ParseTree, Error> {
    let kind = parser.current_token_kind();
    if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
        return handler(parser);
    }

    if parser.current_token_kind() == TokenKind::Identifier {
        let next = parser.peek_kind(1);

        if next.is_assignment_operator() {
            return parse_assignment_stmt(parser);
        }

        if next == TokenKind::PlusPlus || next == TokenKind::MinusMinus {
            return parse_increment_stmt(parser);
        }
    }

    if parser.current_token_kind() == TokenKind::Fn {
        return Err(parser.unexpected_detailed("functions can only be defined at the top level"));
    }

    parse_expr_stmt(parser)
}

pub fn parse_expr_stmt(parser: &mut Parser) -> Result<ParseTree, Error> {
    let start = parser.get_position();
    let expr = parse_expr(parser)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(ParseTree::node(Rule::ExprStmt, vec![expr], parser.span_from(start)))
}

/// `fn type_specifier IDENTIFIER "(" params? ")" block`
pub fn parse_func_def(parser: &mut Parser) -> Result<ParseTree, Error> {
    let start = parser.expect(TokenKind::Fn)?.span.start;

    let return_type = parse_type_specifier(parser)?;

    let error = parser.unexpected_detailed("expected function name");
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?;

    parser.expect(TokenKind::OpenParen)?;

    let mut children = vec![return_type, ParseTree::Leaf(identifier)];
    if parser.current_token_kind() != TokenKind::CloseParen {
        children.push(parse_params(parser)?);
    }

    parser.expect(TokenKind::CloseParen)?;

    children.push(parse_block(parser)?);

    Ok(ParseTree::node(Rule::FuncDef, children, parser.span_from(start)))
}

pub fn parse_params(parser: &mut Parser) -> Result<ParseTree, Error> {
    let start = parser.get_position();
    let mut params = vec![parse_param(parser)?];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        params.push(parse_param(parser)?);
    }

    Ok(ParseTree::node(Rule::Params, params, parser.span_from(start)))
}

fn parse_param(parser: &mut Parser) -> Result<ParseTree, Error> {
    let start = parser.get_position();
    let ty = parse_type_specifier(parser)?;

    let error = parser.unexpected_detailed("expected parameter name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(ParseTree::node(
        Rule::Param,
        vec![ty, ParseTree::Leaf(name)],
        parser.span_from(start),
    ))
}

pub fn parse_block(parser: &mut Parser) -> Result<ParseTree, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut statements = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected_detailed("expected `}`"));
        }

        statements.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(ParseTree::node(Rule::Block, statements, parser.span_from(start)))
}

/// `("let" | "const") IDENTIFIER (":" type_specifier)? ("=" expr)? ";"`
pub fn parse_declaration_stmt(parser: &mut Parser) -> Result<ParseTree, Error> {
    let keyword = parser.advance().clone();
    let start = keyword.span.start.clone();

    let error = parser.unexpected_detailed("expected identifier during variable declaration");
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let mut children = vec![ParseTree::Leaf(keyword), ParseTree::Leaf(identifier)];

    if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        children.push(parse_type_specifier(parser)?);
    }

    if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        children.push(parse_expr(parser)?);
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(ParseTree::node(
        Rule::DeclarationStmt,
        children,
        parser.span_from(start),
    ))
}

/// `IDENTIFIER ("=" | "+=" | "-=" | "*=" | "/=" | "%=") expr ";"`
pub fn parse_assignment_stmt(parser: &mut Parser) -> Result<ParseTree, Error> {
    let identifier = parser.expect(TokenKind::Identifier)?;
    let start = identifier.span.start.clone();
    let operator = parser.advance().clone();

    let value = parse_expr(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(ParseTree::node(
        Rule::AssignmentStmt,
        vec![ParseTree::Leaf(identifier), ParseTree::Leaf(operator), value],
        parser.span_from(start),
    ))
}

/// `IDENTIFIER ("++" | "--") ";"`
pub fn parse_increment_stmt(parser: &mut Parser) -> Result<ParseTree, Error> {
    let identifier = parser.expect(TokenKind::Identifier)?;
    let start = identifier.span.start.clone();
    let operator = parser.advance().clone();

    parser.expect(TokenKind::Semicolon)?;

    Ok(ParseTree::node(
        Rule::IncrementStmt,
        vec![ParseTree::Leaf(identifier), ParseTree::Leaf(operator)],
        parser.span_from(start),
    ))
}

/// `"print" "(" args ")" ";"`
pub fn parse_print_stmt(parser: &mut Parser) -> Result<ParseTree, Error> {
    let start = parser.expect(TokenKind::Print)?.span.start;

    parser.expect(TokenKind::OpenParen)?;
    let args = parse_args(parser)?;
    parser.expect(TokenKind::CloseParen)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(ParseTree::node(Rule::PrintStmt, vec![args], parser.span_from(start)))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<ParseTree, Error> {
    let start = parser.expect(TokenKind::Return)?.span.start;

    let mut children = vec![];
    if parser.current_token_kind() != TokenKind::Semicolon {
        children.push(parse_expr(parser)?);
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(ParseTree::node(Rule::ReturnStmt, children, parser.span_from(start)))
}
