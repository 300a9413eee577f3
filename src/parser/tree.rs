//! Concrete parse tree produced by the parser.
//!
//! The tree mirrors the grammar rules: every rule that matched with more
//! than one operand becomes a [`ParseTree::Node`], punctuation is dropped and
//! meaningful tokens (identifiers, literals, operators, `let`/`const`) stay
//! as [`ParseTree::Leaf`]s. Precedence levels that matched a single operand
//! are inlined, so `1 + 2` is an `Additive` node but `1` alone is just a leaf.

use crate::{lexer::tokens::Token, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Program,
    FuncDef,
    Params,
    Param,
    Block,
    DeclarationStmt,
    AssignmentStmt,
    IncrementStmt,
    PrintStmt,
    ReturnStmt,
    ExprStmt,
    LogicalOr,
    LogicalAnd,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Call,
    Args,
    TypeSpecifier,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseTree {
    Node {
        rule: Rule,
        children: Vec<ParseTree>,
        span: Span,
    },
    Leaf(Token),
}

impl ParseTree {
    pub fn node(rule: Rule, children: Vec<ParseTree>, span: Span) -> Self {
        ParseTree::Node {
            rule,
            children,
            span,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            ParseTree::Node { span, .. } => span,
            ParseTree::Leaf(token) => &token.span,
        }
    }

    /// The rule of a node, `None` for leaves.
    pub fn rule(&self) -> Option<Rule> {
        match self {
            ParseTree::Node { rule, .. } => Some(*rule),
            ParseTree::Leaf(_) => None,
        }
    }

    pub fn children(&self) -> &[ParseTree] {
        match self {
            ParseTree::Node { children, .. } => children,
            ParseTree::Leaf(_) => &[],
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            ParseTree::Leaf(token) => Some(token),
            ParseTree::Node { .. } => None,
        }
    }
}
