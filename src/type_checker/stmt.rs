use crate::{
    ast::{
        ast::Stmt,
        statements::{
            AssignmentStmt, BlockStmt, FnDeclStmt, PrintStmt, ReturnStmt, VarDeclStmt,
        },
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    scope::{
        scope::{ScopeKind, ScopeOwner},
        symbol::Symbol,
    },
};

use super::{
    expr::{coerce, type_check_expr},
    type_checker::{ends_with_return, FunctionContext, TypeChecker},
};

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &mut Stmt) {
    match stmt {
        Stmt::FnDecl(func) => type_check_fn_decl(type_checker, func),
        Stmt::VarDecl(decl) => type_check_var_decl(type_checker, decl),
        Stmt::Assignment(assignment) => type_check_assignment(type_checker, assignment),
        Stmt::Print(print) => type_check_print(type_checker, print),
        Stmt::Return(ret) => type_check_return(type_checker, ret),
        Stmt::Expression(stmt) => {
            type_check_expr(type_checker, &mut stmt.expression);
        }
        Stmt::Block(block) => type_checker.with_scope(ScopeKind::Block, |type_checker| {
            type_check_block_body(type_checker, block)
        }),
    }
}

/// Checks the statements of a block in the current scope.
fn type_check_block_body(type_checker: &mut TypeChecker, block: &mut BlockStmt) {
    for stmt in block.iter_mut() {
        type_check_stmt(type_checker, stmt);
    }
}

/// The signature was registered up front; this checks the body. Parameters
/// and the body's top-level declarations share the function scope.
pub fn type_check_fn_decl(type_checker: &mut TypeChecker, func: &mut FnDeclStmt) {
    let context = FunctionContext {
        name: func.identifier.clone(),
        return_type: func.return_type,
    };

    type_checker.with_scope(ScopeKind::Function, |type_checker| {
        for param in func.parameters.iter() {
            type_checker.declare(Symbol::parameter(
                &param.name,
                param.ty,
                param.span.start.clone(),
            ));
        }

        type_checker.in_function(context, |type_checker| {
            type_check_block_body(type_checker, &mut func.body)
        });
    });

    if func.return_type != Type::Void && !ends_with_return(&func.body.body) {
        type_checker.report(Error::new(
            ErrorImpl::MissingReturn {
                function: func.identifier.clone(),
                return_type: func.return_type,
            },
            func.body.span.end.clone(),
        ));
    }
}

pub fn type_check_var_decl(type_checker: &mut TypeChecker, decl: &mut VarDeclStmt) {
    // The initializer is checked before the name exists, so `let x = x;`
    // refers to an outer `x`.
    let value_type = decl
        .assigned_value
        .as_mut()
        .map(|value| type_check_expr(type_checker, value));

    if decl.is_constant && decl.assigned_value.is_none() {
        type_checker.report(Error::new(
            ErrorImpl::MissingInitializer {
                name: decl.identifier.clone(),
            },
            decl.span.start.clone(),
        ));
    }

    let declared_type = match decl.explicit_type {
        Some(Type::Void) => {
            type_checker.report(Error::new(
                ErrorImpl::VoidValue {
                    context: format!("type of variable `{}`", decl.identifier),
                },
                decl.span.start.clone(),
            ));
            None
        }
        Some(explicit) => {
            if let Some(value) = decl.assigned_value.as_mut() {
                coerce(type_checker, value, explicit, |expected, received| {
                    ErrorImpl::TypeMismatch { expected, received }
                });
            }
            Some(explicit)
        }
        None => match value_type {
            Some(Some(Type::Void)) => {
                type_checker.report(Error::new(
                    ErrorImpl::VoidValue {
                        context: format!("initial value of `{}`", decl.identifier),
                    },
                    decl.span.start.clone(),
                ));
                None
            }
            Some(inferred) => inferred,
            None => {
                type_checker.report(Error::new(
                    ErrorImpl::MissingType {
                        name: decl.identifier.clone(),
                    },
                    decl.span.start.clone(),
                ));
                None
            }
        },
    };

    decl.var_type = declared_type;

    type_checker.declare(Symbol::variable(
        &decl.identifier,
        declared_type,
        decl.is_constant,
        decl.span.start.clone(),
    ));
}

/// The target is resolved before the value. When it is undefined or names a
/// function, the value is checked with the target bound to an untyped
/// placeholder, so `y += 1` on an undeclared `y` reports `y` once.
pub fn type_check_assignment(type_checker: &mut TypeChecker, assignment: &mut AssignmentStmt) {
    let target = type_checker.scopes.lookup(&assignment.identifier).cloned();

    let target = match target {
        Some(target) if !target.is_function() => target,
        other => {
            type_checker.report(Error::new(
                ErrorImpl::UndefinedName {
                    name: assignment.identifier.clone(),
                    is_function: other.is_some(),
                },
                assignment.span.start.clone(),
            ));

            let placeholder = Symbol::variable(
                &assignment.identifier,
                None,
                false,
                assignment.span.start.clone(),
            );
            type_checker.with_scope(ScopeKind::Block, |type_checker| {
                type_checker.declare(placeholder);
                type_check_expr(type_checker, &mut assignment.value);
            });
            return;
        }
    };

    type_check_expr(type_checker, &mut assignment.value);

    if target.is_constant() {
        type_checker.report(Error::new(
            ErrorImpl::ConstantAssignment {
                name: assignment.identifier.clone(),
            },
            assignment.span.start.clone(),
        ));
        return;
    }

    if let Some(target_type) = target.ty {
        coerce(
            type_checker,
            &mut assignment.value,
            target_type,
            |expected, received| ErrorImpl::TypeMismatch { expected, received },
        );
    }
}

pub fn type_check_print(type_checker: &mut TypeChecker, print: &mut PrintStmt) {
    for argument in print.arguments.iter_mut() {
        if type_check_expr(type_checker, argument) == Some(Type::Void) {
            type_checker.report(Error::new(
                ErrorImpl::VoidValue {
                    context: String::from("print argument"),
                },
                argument.span.start.clone(),
            ));
        }
    }
}

pub fn type_check_return(type_checker: &mut TypeChecker, ret: &mut ReturnStmt) {
    let value_type = ret
        .value
        .as_mut()
        .map(|value| type_check_expr(type_checker, value));

    let Some(function) = type_checker.function.clone() else {
        type_checker.report(Error::new(
            ErrorImpl::ReturnOutsideFunction,
            ret.span.start.clone(),
        ));
        return;
    };

    let expected = function.return_type;

    match (ret.value.as_mut(), value_type.flatten()) {
        (Some(value), Some(Type::Void)) => {
            type_checker.report(Error::new(
                ErrorImpl::VoidValue {
                    context: String::from("return value"),
                },
                value.span.start.clone(),
            ));
        }
        (None, _) if expected != Type::Void => {
            type_checker.report(Error::new(
                ErrorImpl::ReturnType {
                    expected,
                    received: Type::Void,
                },
                ret.span.start.clone(),
            ));
        }
        (Some(value), Some(received)) if expected == Type::Void => {
            type_checker.report(Error::new(
                ErrorImpl::ReturnType { expected, received },
                value.span.start.clone(),
            ));
        }
        (Some(value), Some(_)) => {
            coerce(type_checker, value, expected, |expected, received| {
                ErrorImpl::ReturnType { expected, received }
            });
        }
        _ => {}
    }
}
