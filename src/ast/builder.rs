//! Builds the AST from the parser's concrete parse tree.
//!
//! The builder is a pure tree walk. It keeps source order, folds flat
//! operator chains into left-leaning binary trees and desugars compound
//! assignments and `++`/`--`. A tree shape the builder does not recognise
//! is a `SyntaxStructureError`: the parser and the builder disagree about
//! the grammar, so building stops immediately.

use log::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    parser::tree::{ParseTree, Rule},
    Span,
};

use super::{
    ast::{Program, Stmt},
    expressions::{BinaryOp, Expr, ExprKind, Literal, UnaryOp},
    statements::{
        AssignmentStmt, BlockStmt, ExpressionStmt, FnDeclStmt, Param, PrintStmt, ReturnStmt,
        VarDeclStmt,
    },
    types::Type,
};

fn structure_error(tree: &ParseTree, message: &str) -> Error {
    Error::new(
        ErrorImpl::SyntaxStructureError {
            message: format!("{} (found {})", message, describe(tree)),
        },
        tree.span().start.clone(),
    )
}

fn describe(tree: &ParseTree) -> String {
    match tree {
        ParseTree::Node { rule, children, .. } => {
            format!("{:?} with {} children", rule, children.len())
        }
        ParseTree::Leaf(token) => format!("token {}", token),
    }
}

fn expect_rule<'a>(tree: &'a ParseTree, rule: Rule) -> Result<&'a [ParseTree], Error> {
    if tree.rule() == Some(rule) {
        Ok(tree.children())
    } else {
        Err(structure_error(tree, &format!("expected {:?}", rule)))
    }
}

fn expect_leaf(tree: &ParseTree, kind: TokenKind) -> Result<&Token, Error> {
    match tree.token() {
        Some(token) if token.kind == kind => Ok(token),
        _ => Err(structure_error(tree, &format!("expected {} token", kind))),
    }
}

/// Builds a [`Program`] from a `Program` parse tree.
pub fn build_ast(tree: &ParseTree) -> Result<Program, Error> {
    let children = expect_rule(tree, Rule::Program)?;

    let mut body = Vec::with_capacity(children.len());
    for child in children {
        let stmt = match child.rule() {
            Some(Rule::FuncDef) => Stmt::FnDecl(build_func_def(child)?),
            _ => build_stmt(child)?,
        };
        body.push(stmt);
    }

    trace!("built {} top-level statements", body.len());

    Ok(Program {
        body,
        span: tree.span().clone(),
    })
}

pub fn build_stmt(tree: &ParseTree) -> Result<Stmt, Error> {
    match tree.rule() {
        Some(Rule::DeclarationStmt) => Ok(Stmt::VarDecl(build_declaration(tree)?)),
        Some(Rule::AssignmentStmt) => Ok(Stmt::Assignment(build_assignment(tree)?)),
        Some(Rule::IncrementStmt) => Ok(Stmt::Assignment(build_increment(tree)?)),
        Some(Rule::PrintStmt) => Ok(Stmt::Print(build_print(tree)?)),
        Some(Rule::ReturnStmt) => Ok(Stmt::Return(build_return(tree)?)),
        Some(Rule::Block) => Ok(Stmt::Block(build_block(tree)?)),
        Some(Rule::ExprStmt) => {
            let [expression] = expect_rule(tree, Rule::ExprStmt)? else {
                return Err(structure_error(tree, "expression statement needs one expression"));
            };

            Ok(Stmt::Expression(ExpressionStmt {
                expression: build_expr(expression)?,
                span: tree.span().clone(),
            }))
        }
        _ => Err(structure_error(tree, "expected a statement")),
    }
}

pub fn build_func_def(tree: &ParseTree) -> Result<FnDeclStmt, Error> {
    let children = expect_rule(tree, Rule::FuncDef)?;

    let (return_type, identifier, params, body) = match children {
        [return_type, identifier, body] => (return_type, identifier, None, body),
        [return_type, identifier, params, body] => (return_type, identifier, Some(params), body),
        _ => return Err(structure_error(tree, "malformed function definition")),
    };

    let parameters = match params {
        Some(params) => expect_rule(params, Rule::Params)?
            .iter()
            .map(build_param)
            .collect::<Result<Vec<Param>, Error>>()?,
        None => vec![],
    };

    Ok(FnDeclStmt {
        identifier: expect_leaf(identifier, TokenKind::Identifier)?.value.clone(),
        parameters,
        return_type: build_type(return_type)?,
        body: build_block(body)?,
        span: tree.span().clone(),
    })
}

fn build_param(tree: &ParseTree) -> Result<Param, Error> {
    let [ty, name] = expect_rule(tree, Rule::Param)? else {
        return Err(structure_error(tree, "parameter needs a type and a name"));
    };

    Ok(Param {
        name: expect_leaf(name, TokenKind::Identifier)?.value.clone(),
        ty: build_type(ty)?,
        span: tree.span().clone(),
    })
}

pub fn build_type(tree: &ParseTree) -> Result<Type, Error> {
    let [specifier] = expect_rule(tree, Rule::TypeSpecifier)? else {
        return Err(structure_error(tree, "type specifier needs one token"));
    };

    match specifier.token().map(|token| token.kind) {
        Some(TokenKind::IntType) => Ok(Type::Int),
        Some(TokenKind::FloatType) => Ok(Type::Float),
        Some(TokenKind::BoolType) => Ok(Type::Bool),
        Some(TokenKind::StringType) => Ok(Type::String),
        Some(TokenKind::VoidType) => Ok(Type::Void),
        _ => Err(structure_error(specifier, "unknown type specifier")),
    }
}

pub fn build_block(tree: &ParseTree) -> Result<BlockStmt, Error> {
    let body = expect_rule(tree, Rule::Block)?
        .iter()
        .map(build_stmt)
        .collect::<Result<Vec<Stmt>, Error>>()?;

    Ok(BlockStmt {
        body,
        span: tree.span().clone(),
    })
}

pub fn build_declaration(tree: &ParseTree) -> Result<VarDeclStmt, Error> {
    let children = expect_rule(tree, Rule::DeclarationStmt)?;

    let (keyword, identifier, rest) = match children {
        [keyword, identifier, rest @ ..] if rest.len() <= 2 => (keyword, identifier, rest),
        _ => return Err(structure_error(tree, "malformed declaration")),
    };

    let is_constant = match keyword.token().map(|token| token.kind) {
        Some(TokenKind::Let) => false,
        Some(TokenKind::Const) => true,
        _ => return Err(structure_error(keyword, "expected `let` or `const`")),
    };

    let mut explicit_type = None;
    let mut assigned_value = None;

    for child in rest {
        let is_type = child.rule() == Some(Rule::TypeSpecifier);

        if is_type && explicit_type.is_none() && assigned_value.is_none() {
            explicit_type = Some(build_type(child)?);
        } else if assigned_value.is_none() {
            assigned_value = Some(build_expr(child)?);
        } else {
            return Err(structure_error(child, "unexpected declaration part"));
        }
    }

    Ok(VarDeclStmt {
        identifier: expect_leaf(identifier, TokenKind::Identifier)?.value.clone(),
        is_constant,
        explicit_type,
        assigned_value,
        var_type: None,
        span: tree.span().clone(),
    })
}

/// `x op= e` becomes `x = x op e`.
pub fn build_assignment(tree: &ParseTree) -> Result<AssignmentStmt, Error> {
    let [identifier, operator, value] = expect_rule(tree, Rule::AssignmentStmt)? else {
        return Err(structure_error(tree, "malformed assignment"));
    };

    let target = expect_leaf(identifier, TokenKind::Identifier)?;
    let value = build_expr(value)?;

    let compound = match operator.token().map(|token| token.kind) {
        Some(TokenKind::Assignment) => None,
        Some(TokenKind::PlusEquals) => Some(BinaryOp::Add),
        Some(TokenKind::MinusEquals) => Some(BinaryOp::Subtract),
        Some(TokenKind::StarEquals) => Some(BinaryOp::Multiply),
        Some(TokenKind::SlashEquals) => Some(BinaryOp::Divide),
        Some(TokenKind::PercentEquals) => Some(BinaryOp::Modulo),
        _ => return Err(structure_error(operator, "unknown assignment operator")),
    };

    let value = match compound {
        Some(op) => desugar_update(target, op, value, tree.span()),
        None => value,
    };

    Ok(AssignmentStmt {
        identifier: target.value.clone(),
        value,
        span: tree.span().clone(),
    })
}

/// `x++` becomes `x = x + 1`, `x--` becomes `x = x - 1`.
pub fn build_increment(tree: &ParseTree) -> Result<AssignmentStmt, Error> {
    let [identifier, operator] = expect_rule(tree, Rule::IncrementStmt)? else {
        return Err(structure_error(tree, "malformed increment"));
    };

    let target = expect_leaf(identifier, TokenKind::Identifier)?;
    let operator_token = match operator.token() {
        Some(token) => token,
        None => return Err(structure_error(operator, "expected `++` or `--`")),
    };

    let op = match operator_token.kind {
        TokenKind::PlusPlus => BinaryOp::Add,
        TokenKind::MinusMinus => BinaryOp::Subtract,
        _ => return Err(structure_error(operator, "expected `++` or `--`")),
    };

    let one = Expr::new(ExprKind::Literal(Literal::Int(1)), operator_token.span.clone());

    Ok(AssignmentStmt {
        identifier: target.value.clone(),
        value: desugar_update(target, op, one, tree.span()),
        span: tree.span().clone(),
    })
}

fn desugar_update(target: &Token, op: BinaryOp, value: Expr, span: &Span) -> Expr {
    let current = Expr::new(ExprKind::Symbol(target.value.clone()), target.span.clone());

    Expr::new(
        ExprKind::Binary {
            operator: op,
            left: Box::new(current),
            right: Box::new(value),
        },
        span.clone(),
    )
}

pub fn build_print(tree: &ParseTree) -> Result<PrintStmt, Error> {
    let [args] = expect_rule(tree, Rule::PrintStmt)? else {
        return Err(structure_error(tree, "print needs an argument list"));
    };

    Ok(PrintStmt {
        arguments: build_args(args)?,
        span: tree.span().clone(),
    })
}

pub fn build_return(tree: &ParseTree) -> Result<ReturnStmt, Error> {
    let value = match expect_rule(tree, Rule::ReturnStmt)? {
        [] => None,
        [value] => Some(build_expr(value)?),
        _ => return Err(structure_error(tree, "return takes at most one value")),
    };

    Ok(ReturnStmt {
        value,
        span: tree.span().clone(),
    })
}

fn build_args(tree: &ParseTree) -> Result<Vec<Expr>, Error> {
    let args = expect_rule(tree, Rule::Args)?;
    if args.is_empty() {
        return Err(structure_error(tree, "argument list is empty"));
    }

    args.iter().map(build_expr).collect()
}

pub fn build_expr(tree: &ParseTree) -> Result<Expr, Error> {
    match tree {
        ParseTree::Leaf(token) => build_leaf(tree, token),
        ParseTree::Node {
            rule,
            children,
            span,
        } => match rule {
            Rule::LogicalOr
            | Rule::LogicalAnd
            | Rule::Equality
            | Rule::Relational
            | Rule::Additive
            | Rule::Multiplicative => fold_chain(tree, *rule, children),
            Rule::Unary => {
                let [operator, operand] = children.as_slice() else {
                    return Err(structure_error(tree, "unary needs an operator and an operand"));
                };

                // `-` directly on an integer literal is one literal, so
                // `-2147483648` fits in `i32`.
                if let (Some(TokenKind::Dash), Some(literal)) =
                    (operator.token().map(|token| token.kind), operand.token())
                {
                    if literal.kind == TokenKind::Integer {
                        let value = parse_int(&format!("-{}", literal.value), literal)?;
                        return Ok(Expr::new(
                            ExprKind::Literal(Literal::Int(value)),
                            span.clone(),
                        ));
                    }
                }

                let operator = match operator.token().map(|token| token.kind) {
                    Some(TokenKind::Dash) => UnaryOp::Negate,
                    Some(TokenKind::Not) => UnaryOp::Not,
                    _ => return Err(structure_error(operator, "unknown unary operator")),
                };

                Ok(Expr::new(
                    ExprKind::Prefix {
                        operator,
                        right: Box::new(build_expr(operand)?),
                    },
                    span.clone(),
                ))
            }
            Rule::Call => {
                let (callee, arguments) = match children.as_slice() {
                    [callee] => (callee, vec![]),
                    [callee, args] => (callee, build_args(args)?),
                    _ => return Err(structure_error(tree, "malformed call")),
                };

                Ok(Expr::new(
                    ExprKind::Call {
                        callee: expect_leaf(callee, TokenKind::Identifier)?.value.clone(),
                        arguments,
                    },
                    span.clone(),
                ))
            }
            _ => Err(structure_error(tree, "expected an expression")),
        },
    }
}

fn build_leaf(tree: &ParseTree, token: &Token) -> Result<Expr, Error> {
    let kind = match token.kind {
        TokenKind::Integer => ExprKind::Literal(Literal::Int(parse_int(&token.value, token)?)),
        TokenKind::Float => match token.value.parse::<f64>() {
            Ok(value) => ExprKind::Literal(Literal::Float(value)),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                ))
            }
        },
        TokenKind::String => ExprKind::Literal(Literal::String(token.value.clone())),
        TokenKind::True => ExprKind::Literal(Literal::Bool(true)),
        TokenKind::False => ExprKind::Literal(Literal::Bool(false)),
        TokenKind::Identifier => ExprKind::Symbol(token.value.clone()),
        _ => return Err(structure_error(tree, "expected a literal or identifier")),
    };

    Ok(Expr::new(kind, token.span.clone()))
}

fn parse_int(text: &str, token: &Token) -> Result<i32, Error> {
    text.parse::<i32>().map_err(|_| {
        Error::new(
            ErrorImpl::NumberParseError {
                token: String::from(text),
            },
            token.span.start.clone(),
        )
    })
}

/// Folds `operand (op operand)*` into a left-leaning tree, so `a - b - c`
/// becomes `(a - b) - c`.
fn fold_chain(tree: &ParseTree, rule: Rule, children: &[ParseTree]) -> Result<Expr, Error> {
    if children.len() < 3 || children.len() % 2 == 0 {
        return Err(structure_error(tree, "operator chain needs operands around each operator"));
    }

    let mut left = build_expr(&children[0])?;

    for pair in children[1..].chunks(2) {
        let [operator, operand] = pair else {
            return Err(structure_error(tree, "dangling operator"));
        };

        let operator = chain_operator(rule, operator)?;
        let right = build_expr(operand)?;

        let span = Span {
            start: left.span.start.clone(),
            end: right.span.end.clone(),
        };

        left = Expr::new(
            ExprKind::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        );
    }

    Ok(left)
}

/// Maps an operator leaf to its [`BinaryOp`], checking it belongs to the
/// chain's precedence level.
fn chain_operator(rule: Rule, operator: &ParseTree) -> Result<BinaryOp, Error> {
    let kind = operator.token().map(|token| token.kind);

    let op = match (rule, kind) {
        (Rule::LogicalOr, Some(TokenKind::Or)) => BinaryOp::Or,
        (Rule::LogicalAnd, Some(TokenKind::And)) => BinaryOp::And,
        (Rule::Equality, Some(TokenKind::Equals)) => BinaryOp::Equals,
        (Rule::Equality, Some(TokenKind::NotEquals)) => BinaryOp::NotEquals,
        (Rule::Relational, Some(TokenKind::Less)) => BinaryOp::Less,
        (Rule::Relational, Some(TokenKind::LessEquals)) => BinaryOp::LessEquals,
        (Rule::Relational, Some(TokenKind::Greater)) => BinaryOp::Greater,
        (Rule::Relational, Some(TokenKind::GreaterEquals)) => BinaryOp::GreaterEquals,
        (Rule::Additive, Some(TokenKind::Plus)) => BinaryOp::Add,
        (Rule::Additive, Some(TokenKind::Dash)) => BinaryOp::Subtract,
        (Rule::Multiplicative, Some(TokenKind::Star)) => BinaryOp::Multiply,
        (Rule::Multiplicative, Some(TokenKind::Slash)) => BinaryOp::Divide,
        (Rule::Multiplicative, Some(TokenKind::Percent)) => BinaryOp::Modulo,
        _ => {
            return Err(structure_error(
                operator,
                &format!("operator does not belong to {:?}", rule),
            ))
        }
    };

    Ok(op)
}
