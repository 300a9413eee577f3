use std::collections::HashMap;

use crate::{errors::errors::Error, lexer::tokens::TokenKind};

use super::{
    parser::Parser,
    stmt::*,
    tree::{ParseTree, Rule},
};

/// Precedence levels of the binary operator chains, loosest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    LogicalOr,
    LogicalAnd,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Primary,
}

impl BindingPower {
    /// The next tighter level.
    pub fn next(self) -> BindingPower {
        match self {
            BindingPower::Default => BindingPower::LogicalOr,
            BindingPower::LogicalOr => BindingPower::LogicalAnd,
            BindingPower::LogicalAnd => BindingPower::Equality,
            BindingPower::Equality => BindingPower::Relational,
            BindingPower::Relational => BindingPower::Additive,
            BindingPower::Additive => BindingPower::Multiplicative,
            BindingPower::Multiplicative => BindingPower::Unary,
            BindingPower::Unary | BindingPower::Primary => BindingPower::Primary,
        }
    }

    /// The parse tree rule for a chain at this level.
    pub fn rule(self) -> Option<Rule> {
        match self {
            BindingPower::LogicalOr => Some(Rule::LogicalOr),
            BindingPower::LogicalAnd => Some(Rule::LogicalAnd),
            BindingPower::Equality => Some(Rule::Equality),
            BindingPower::Relational => Some(Rule::Relational),
            BindingPower::Additive => Some(Rule::Additive),
            BindingPower::Multiplicative => Some(Rule::Multiplicative),
            BindingPower::Unary => Some(Rule::Unary),
            BindingPower::Default | BindingPower::Primary => None,
        }
    }
}

pub type StmtHandler = fn(&mut Parser) -> Result<ParseTree, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Logical
    parser.binary(TokenKind::Or, BindingPower::LogicalOr);
    parser.binary(TokenKind::And, BindingPower::LogicalAnd);

    // Equality and relational
    parser.binary(TokenKind::Equals, BindingPower::Equality);
    parser.binary(TokenKind::NotEquals, BindingPower::Equality);
    parser.binary(TokenKind::Less, BindingPower::Relational);
    parser.binary(TokenKind::LessEquals, BindingPower::Relational);
    parser.binary(TokenKind::Greater, BindingPower::Relational);
    parser.binary(TokenKind::GreaterEquals, BindingPower::Relational);

    // Additive and multiplicative
    parser.binary(TokenKind::Plus, BindingPower::Additive);
    parser.binary(TokenKind::Dash, BindingPower::Additive);
    parser.binary(TokenKind::Star, BindingPower::Multiplicative);
    parser.binary(TokenKind::Slash, BindingPower::Multiplicative);
    parser.binary(TokenKind::Percent, BindingPower::Multiplicative);

    // Statements
    parser.stmt(TokenKind::Let, parse_declaration_stmt);
    parser.stmt(TokenKind::Const, parse_declaration_stmt);
    parser.stmt(TokenKind::Print, parse_print_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::OpenCurly, parse_block);
}

pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
