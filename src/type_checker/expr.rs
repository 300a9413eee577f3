use crate::{
    ast::{
        expressions::{BinaryOp, Expr, ExprKind, UnaryOp},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    scope::symbol::SymbolKind,
    Span,
};

use super::type_checker::TypeChecker;

/// Checks that `expr` (already type checked) can be stored where `target` is
/// expected, recording an `int` to `float` promotion when one is needed.
///
/// An expression whose own check failed is accepted silently. Otherwise a
/// `void` value is a `VoidValue` error and any other mismatch is reported
/// with the error built by `make_error(expected, received)`.
pub fn coerce(
    type_checker: &mut TypeChecker,
    expr: &mut Expr,
    target: Type,
    make_error: impl FnOnce(Type, Type) -> ErrorImpl,
) -> bool {
    let Some(received) = expr.ty else {
        return true;
    };

    if received == Type::Void {
        type_checker.report(Error::new(
            ErrorImpl::VoidValue {
                context: String::from("value"),
            },
            expr.span.start.clone(),
        ));
        return false;
    }

    if !received.is_assignable_to(target) {
        type_checker.report(Error::new(
            make_error(target, received),
            expr.span.start.clone(),
        ));
        return false;
    }

    if received != target {
        expr.promote_to = Some(target);
    }

    true
}

/// Type checks an expression bottom-up and records the result in `expr.ty`.
///
/// # Returns
///
/// The resolved type, or `None` if the expression (or one of its operands)
/// failed to check. Checks that depend on a `None` type are skipped, so one
/// mistake is reported once.
pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &mut Expr) -> Option<Type> {
    expr.promote_to = None;

    let ty = match &mut expr.kind {
        ExprKind::Literal(literal) => Some(literal.provisional_type()),
        ExprKind::Symbol(name) => type_check_symbol(type_checker, name, &expr.span),
        ExprKind::Prefix { operator, right } => {
            type_check_prefix(type_checker, *operator, right, &expr.span)
        }
        ExprKind::Binary {
            operator,
            left,
            right,
        } => type_check_binary(type_checker, *operator, left, right, &expr.span),
        ExprKind::Call { callee, arguments } => {
            type_check_call(type_checker, callee, arguments, &expr.span)
        }
    };

    expr.ty = ty;
    ty
}

fn type_check_symbol(type_checker: &mut TypeChecker, name: &str, span: &Span) -> Option<Type> {
    let symbol = type_checker.scopes.lookup(name).cloned();

    match symbol {
        Some(symbol) if !symbol.is_function() => symbol.ty,
        other => {
            type_checker.report(Error::new(
                ErrorImpl::UndefinedName {
                    name: String::from(name),
                    is_function: other.is_some(),
                },
                span.start.clone(),
            ));
            None
        }
    }
}

fn operator_error(operator: String, operands: Vec<Type>, span: &Span) -> Error {
    Error::new(
        ErrorImpl::OperatorType { operator, operands },
        span.start.clone(),
    )
}

fn void_operand_error(operator: String, span: &Span) -> Error {
    Error::new(
        ErrorImpl::VoidValue {
            context: format!("operand of `{}`", operator),
        },
        span.start.clone(),
    )
}

fn type_check_prefix(
    type_checker: &mut TypeChecker,
    operator: UnaryOp,
    right: &mut Expr,
    span: &Span,
) -> Option<Type> {
    let operand = type_check_expr(type_checker, right)?;

    if operand == Type::Void {
        type_checker.report(void_operand_error(operator.to_string(), span));
        return None;
    }

    match (operator, operand) {
        (UnaryOp::Negate, ty) if ty.is_numeric() => Some(ty),
        (UnaryOp::Not, Type::Bool) => Some(Type::Bool),
        _ => {
            type_checker.report(operator_error(operator.to_string(), vec![operand], span));
            None
        }
    }
}

fn type_check_binary(
    type_checker: &mut TypeChecker,
    operator: BinaryOp,
    left: &mut Expr,
    right: &mut Expr,
    span: &Span,
) -> Option<Type> {
    // Both sides are checked so errors in either are reported.
    let left_type = type_check_expr(type_checker, left);
    let right_type = type_check_expr(type_checker, right);
    let (left_type, right_type) = (left_type?, right_type?);

    if left_type == Type::Void || right_type == Type::Void {
        type_checker.report(void_operand_error(operator.to_string(), span));
        return None;
    }

    let numeric = Type::common_numeric(left_type, right_type);

    let result = if operator.is_arithmetic() {
        numeric
    } else if operator.is_logical() {
        (left_type == Type::Bool && right_type == Type::Bool).then_some(Type::Bool)
    } else {
        let comparable = numeric.is_some()
            || (left_type == Type::String && right_type == Type::String)
            || (left_type == Type::Bool && right_type == Type::Bool && operator.is_equality());

        comparable.then_some(Type::Bool)
    };

    let Some(result) = result else {
        type_checker.report(operator_error(
            operator.to_string(),
            vec![left_type, right_type],
            span,
        ));
        return None;
    };

    // Mixed int/float operands: the int side is promoted.
    if numeric == Some(Type::Float) && !operator.is_logical() {
        if left_type == Type::Int {
            left.promote_to = Some(Type::Float);
        }
        if right_type == Type::Int {
            right.promote_to = Some(Type::Float);
        }
    }

    Some(result)
}

fn type_check_call(
    type_checker: &mut TypeChecker,
    callee: &str,
    arguments: &mut [Expr],
    span: &Span,
) -> Option<Type> {
    let argument_types: Vec<Option<Type>> = arguments
        .iter_mut()
        .map(|argument| type_check_expr(type_checker, argument))
        .collect();

    let symbol = type_checker.scopes.lookup(callee).cloned();

    let Some(SymbolKind::Function {
        parameters,
        return_type,
    }) = symbol.map(|symbol| symbol.kind)
    else {
        type_checker.report(Error::new(
            ErrorImpl::UndefinedName {
                name: String::from(callee),
                is_function: false,
            },
            span.start.clone(),
        ));
        return None;
    };

    if parameters.len() != arguments.len() {
        type_checker.report(Error::new(
            ErrorImpl::ArgumentCount {
                function: String::from(callee),
                expected: parameters.len(),
                received: arguments.len(),
            },
            span.start.clone(),
        ));
        return Some(return_type);
    }

    for (index, (argument, expected)) in arguments.iter_mut().zip(parameters).enumerate() {
        if argument_types[index].is_none() {
            continue;
        }

        coerce(type_checker, argument, expected, |expected, received| {
            ErrorImpl::ArgumentType {
                function: String::from(callee),
                index,
                expected,
                received,
            }
        });
    }

    Some(return_type)
}
