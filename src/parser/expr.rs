use crate::{errors::errors::Error, lexer::tokens::TokenKind};

use super::{
    lookups::BindingPower,
    parser::Parser,
    tree::{ParseTree, Rule},
};

/// Parses a full expression (`logical_or`).
pub fn parse_expr(parser: &mut Parser) -> Result<ParseTree, Error> {
    parse_level(parser, BindingPower::LogicalOr)
}

/// Parses one binary precedence level.
///
/// Operands are parsed at the next tighter level. A level that matched a
/// single operand returns that operand unchanged; otherwise the operands and
/// operator leaves form one flat chain node, e.g. `Additive[a, -, b, +, c]`.
pub fn parse_level(parser: &mut Parser, bp: BindingPower) -> Result<ParseTree, Error> {
    if bp == BindingPower::Unary {
        return parse_unary_expr(parser);
    }

    let start = parser.get_position();
    let first = parse_level(parser, bp.next())?;

    if parser.current_bp() != bp {
        return Ok(first);
    }

    let mut children = vec![first];
    while parser.current_bp() == bp {
        let operator = parser.advance().clone();
        children.push(ParseTree::Leaf(operator));
        children.push(parse_level(parser, bp.next())?);
    }

    let rule = match bp.rule() {
        Some(rule) => rule,
        None => return Err(parser.unexpected()),
    };

    Ok(ParseTree::node(rule, children, parser.span_from(start)))
}

pub fn parse_unary_expr(parser: &mut Parser) -> Result<ParseTree, Error> {
    match parser.current_token_kind() {
        TokenKind::Dash | TokenKind::Not => {
            let operator = parser.advance().clone();
            let start = operator.span.start.clone();
            let operand = parse_unary_expr(parser)?;

            Ok(ParseTree::node(
                Rule::Unary,
                vec![ParseTree::Leaf(operator), operand],
                parser.span_from(start),
            ))
        }
        _ => parse_primary_expr(parser),
    }
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<ParseTree, Error> {
    match parser.current_token_kind() {
        TokenKind::Integer
        | TokenKind::Float
        | TokenKind::String
        | TokenKind::True
        | TokenKind::False => Ok(ParseTree::Leaf(parser.advance().clone())),
        TokenKind::Identifier => {
            if parser.peek_kind(1) == TokenKind::OpenParen {
                parse_call_expr(parser)
            } else {
                Ok(ParseTree::Leaf(parser.advance().clone()))
            }
        }
        TokenKind::OpenParen => parse_grouping_expr(parser),
        _ => Err(parser.unexpected_detailed("expected an expression")),
    }
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<ParseTree, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser) -> Result<ParseTree, Error> {
    let callee = parser.expect(TokenKind::Identifier)?;
    let start = callee.span.start.clone();
    parser.expect(TokenKind::OpenParen)?;

    let mut children = vec![ParseTree::Leaf(callee)];
    if parser.current_token_kind() != TokenKind::CloseParen {
        children.push(parse_args(parser)?);
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(ParseTree::node(Rule::Call, children, parser.span_from(start)))
}

/// Parses `expr ("," expr)*` into an `Args` node.
pub fn parse_args(parser: &mut Parser) -> Result<ParseTree, Error> {
    let start = parser.get_position();
    let mut args = vec![parse_expr(parser)?];

    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        args.push(parse_expr(parser)?);
    }

    Ok(ParseTree::node(Rule::Args, args, parser.span_from(start)))
}
