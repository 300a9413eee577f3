use inkwell::values::BasicValueEnum;
use log::trace;

use crate::{
    ast::{
        ast::Stmt,
        expressions::ExprKind,
        statements::{AssignmentStmt, ReturnStmt, VarDeclStmt},
        types::Type,
    },
    errors::errors::Error,
    scope::scope::{ScopeKind, ScopeOwner},
};

use super::{
    compiler::{internal_error, lowering_error, Compiler},
    expr::{gen_call, gen_expression},
    runtime::gen_print,
};

/// Generates a sequence of statements in the current scope.
///
/// Generation stops once the current block is terminated; anything after a
/// `return` in the same block is unreachable and is not emitted.
pub fn gen_block_body<'ctx>(compiler: &mut Compiler<'ctx>, body: &[Stmt]) -> Result<(), Error> {
    for (index, stmt) in body.iter().enumerate() {
        if compiler.block_is_terminated() {
            trace!("skipping {} unreachable statements", body.len() - index);
            break;
        }

        gen_statement(compiler, stmt)?;
    }

    Ok(())
}

pub fn gen_statement<'ctx>(compiler: &mut Compiler<'ctx>, stmt: &Stmt) -> Result<(), Error> {
    match stmt {
        Stmt::VarDecl(decl) => gen_var_decl(compiler, decl),
        Stmt::Assignment(assignment) => gen_assignment(compiler, assignment),
        Stmt::Print(print) => gen_print(compiler, print),
        Stmt::Return(ret) => gen_return(compiler, ret),
        Stmt::Expression(stmt) => {
            match &stmt.expression.kind {
                // A call is the only expression that may produce no value.
                ExprKind::Call { callee, arguments } => {
                    gen_call(compiler, callee, arguments)?;
                }
                _ => {
                    gen_expression(compiler, &stmt.expression)?;
                }
            }
            Ok(())
        }
        Stmt::Block(block) => compiler.with_scope(ScopeKind::Block, |compiler| {
            gen_block_body(compiler, &block.body)
        }),
        Stmt::FnDecl(func) => Err(internal_error(format!(
            "function `{}` defined inside a body",
            func.identifier
        ))),
    }
}

fn gen_var_decl<'ctx>(compiler: &mut Compiler<'ctx>, decl: &VarDeclStmt) -> Result<(), Error> {
    let ty = decl
        .var_type
        .ok_or_else(|| internal_error(format!("`{}` has no resolved type", decl.identifier)))?;

    // Top-level variables are globals declared up front.
    if compiler.variables.is_global() {
        let global = compiler.lookup_variable(&decl.identifier)?;
        if let Some(value) = &decl.assigned_value {
            let value = gen_expression(compiler, value)?;
            compiler
                .builder
                .build_store(global, value)
                .map_err(lowering_error)?;
        }
        return Ok(());
    }

    // The initializer is generated before the name is bound, so it sees any
    // outer variable of the same name.
    let value: BasicValueEnum<'ctx> = match &decl.assigned_value {
        Some(value) => gen_expression(compiler, value)?,
        None => compiler.zero_value(ty)?,
    };

    let slot = compiler.create_entry_alloca(ty, &decl.identifier)?;
    compiler
        .builder
        .build_store(slot, value)
        .map_err(lowering_error)?;

    compiler.declare_variable(&decl.identifier, slot)
}

fn gen_assignment<'ctx>(compiler: &mut Compiler<'ctx>, assignment: &AssignmentStmt) -> Result<(), Error> {
    let value = gen_expression(compiler, &assignment.value)?;
    let slot = compiler.lookup_variable(&assignment.identifier)?;

    compiler
        .builder
        .build_store(slot, value)
        .map_err(lowering_error)?;

    Ok(())
}

fn gen_return<'ctx>(compiler: &mut Compiler<'ctx>, ret: &ReturnStmt) -> Result<(), Error> {
    match &ret.value {
        Some(value) => {
            let value = gen_expression(compiler, value)?;
            compiler
                .builder
                .build_return(Some(&value))
                .map_err(lowering_error)?;
        }
        None => {
            compiler.builder.build_return(None).map_err(lowering_error)?;
        }
    }

    Ok(())
}

/// Terminates a function body that fell off its end.
pub fn gen_function_exit<'ctx>(
    compiler: &mut Compiler<'ctx>,
    return_type: Type,
    name: &str,
) -> Result<(), Error> {
    if compiler.block_is_terminated() {
        return Ok(());
    }

    if return_type != Type::Void {
        return Err(internal_error(format!(
            "function `{}` can reach its end without returning",
            name
        )));
    }

    compiler.builder.build_return(None).map_err(lowering_error)?;
    Ok(())
}
