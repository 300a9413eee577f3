//! Type specifier parsing.
//!
//! The language only has the five builtin scalar specifiers, so a type is a
//! single keyword wrapped in a `TypeSpecifier` node.

use crate::errors::errors::Error;

use super::{
    parser::Parser,
    tree::{ParseTree, Rule},
};

pub fn parse_type_specifier(parser: &mut Parser) -> Result<ParseTree, Error> {
    if !parser.current_token_kind().is_type_specifier() {
        return Err(parser.unexpected_detailed("expected a type (int, float, string, bool, void)"));
    }

    let token = parser.advance().clone();
    let span = token.span.clone();

    Ok(ParseTree::node(
        Rule::TypeSpecifier,
        vec![ParseTree::Leaf(token)],
        span,
    ))
}
