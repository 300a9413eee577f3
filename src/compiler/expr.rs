use inkwell::{
    values::{BasicMetadataValueEnum, BasicValueEnum, IntValue},
    FloatPredicate, IntPredicate,
};

use crate::{
    ast::{
        expressions::{BinaryOp, Expr, ExprKind, Literal, UnaryOp},
        types::Type,
    },
    errors::errors::Error,
};

use super::{
    compiler::{internal_error, lowering_error, Compiler},
    runtime::gen_string_compare,
};

fn resolved_type(expr: &Expr) -> Result<Type, Error> {
    expr.ty
        .ok_or_else(|| internal_error("expression reached code generation without a type"))
}

/// Generates LLVM IR for the given expression, applying the `int` to `float`
/// promotion the type checker recorded for it.
pub fn gen_expression<'ctx>(
    compiler: &Compiler<'ctx>,
    expr: &Expr,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let value = match &expr.kind {
        ExprKind::Literal(literal) => gen_literal(compiler, literal)?,
        ExprKind::Symbol(name) => {
            let slot = compiler.lookup_variable(name)?;
            compiler
                .builder
                .build_load(slot, name)
                .map_err(lowering_error)?
        }
        ExprKind::Prefix { operator, right } => gen_prefix(compiler, *operator, right)?,
        ExprKind::Binary {
            operator,
            left,
            right,
        } => gen_binary(compiler, *operator, left, right)?,
        ExprKind::Call { callee, arguments } => gen_call(compiler, callee, arguments)?
            .ok_or_else(|| internal_error(format!("`{}` returns no value", callee)))?,
    };

    match (resolved_type(expr)?, expr.promote_to) {
        (Type::Int, Some(Type::Float)) => Ok(compiler
            .builder
            .build_signed_int_to_float(value.into_int_value(), compiler.context.f64_type(), "promoted")
            .map_err(lowering_error)?
            .into()),
        _ => Ok(value),
    }
}

fn gen_literal<'ctx>(compiler: &Compiler<'ctx>, literal: &Literal) -> Result<BasicValueEnum<'ctx>, Error> {
    Ok(match literal {
        Literal::Int(value) => compiler
            .context
            .i32_type()
            .const_int(*value as u64, true)
            .into(),
        Literal::Float(value) => compiler.context.f64_type().const_float(*value).into(),
        Literal::Bool(value) => compiler
            .context
            .bool_type()
            .const_int(*value as u64, false)
            .into(),
        Literal::String(value) => compiler
            .builder
            .build_global_string_ptr(value, "str")
            .map_err(lowering_error)?
            .as_pointer_value()
            .into(),
    })
}

fn gen_prefix<'ctx>(
    compiler: &Compiler<'ctx>,
    operator: UnaryOp,
    right: &Expr,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let operand = gen_expression(compiler, right)?;
    let builder = &compiler.builder;

    let value: BasicValueEnum<'ctx> = match (operator, right.final_type()) {
        (UnaryOp::Negate, Some(Type::Int)) => builder
            .build_int_neg(operand.into_int_value(), "neg")
            .map_err(lowering_error)?
            .into(),
        (UnaryOp::Negate, Some(Type::Float)) => builder
            .build_float_neg(operand.into_float_value(), "neg")
            .map_err(lowering_error)?
            .into(),
        (UnaryOp::Not, Some(Type::Bool)) => builder
            .build_not(operand.into_int_value(), "not")
            .map_err(lowering_error)?
            .into(),
        (operator, ty) => {
            return Err(internal_error(format!(
                "no lowering for `{}` on {:?}",
                operator, ty
            )))
        }
    };

    Ok(value)
}

fn int_predicate(operator: BinaryOp) -> Option<IntPredicate> {
    match operator {
        BinaryOp::Equals => Some(IntPredicate::EQ),
        BinaryOp::NotEquals => Some(IntPredicate::NE),
        BinaryOp::Less => Some(IntPredicate::SLT),
        BinaryOp::LessEquals => Some(IntPredicate::SLE),
        BinaryOp::Greater => Some(IntPredicate::SGT),
        BinaryOp::GreaterEquals => Some(IntPredicate::SGE),
        _ => None,
    }
}

fn float_predicate(operator: BinaryOp) -> Option<FloatPredicate> {
    match operator {
        BinaryOp::Equals => Some(FloatPredicate::OEQ),
        BinaryOp::NotEquals => Some(FloatPredicate::UNE),
        BinaryOp::Less => Some(FloatPredicate::OLT),
        BinaryOp::LessEquals => Some(FloatPredicate::OLE),
        BinaryOp::Greater => Some(FloatPredicate::OGT),
        BinaryOp::GreaterEquals => Some(FloatPredicate::OGE),
        _ => None,
    }
}

fn gen_binary<'ctx>(
    compiler: &Compiler<'ctx>,
    operator: BinaryOp,
    left: &Expr,
    right: &Expr,
) -> Result<BasicValueEnum<'ctx>, Error> {
    if operator.is_logical() {
        return Ok(gen_short_circuit(compiler, operator, left, right)?.into());
    }

    // Operands already carry their promotions, so both sides share a type.
    let operand_type = left.final_type();
    let left = gen_expression(compiler, left)?;
    let right = gen_expression(compiler, right)?;
    let builder = &compiler.builder;

    let value: BasicValueEnum<'ctx> = match operand_type {
        Some(Type::Int) | Some(Type::Bool) => {
            let (l, r) = (left.into_int_value(), right.into_int_value());
            match operator {
                BinaryOp::Add => builder.build_int_add(l, r, "add"),
                BinaryOp::Subtract => builder.build_int_sub(l, r, "sub"),
                BinaryOp::Multiply => builder.build_int_mul(l, r, "mul"),
                BinaryOp::Divide => builder.build_int_signed_div(l, r, "div"),
                BinaryOp::Modulo => builder.build_int_signed_rem(l, r, "rem"),
                comparison => {
                    let predicate = int_predicate(comparison).ok_or_else(|| {
                        internal_error(format!("`{}` is not a comparison", comparison))
                    })?;
                    builder.build_int_compare(predicate, l, r, "cmp")
                }
            }
            .map_err(lowering_error)?
            .into()
        }
        Some(Type::Float) => {
            let (l, r) = (left.into_float_value(), right.into_float_value());
            match operator {
                BinaryOp::Add => builder.build_float_add(l, r, "fadd").map(BasicValueEnum::from),
                BinaryOp::Subtract => builder.build_float_sub(l, r, "fsub").map(BasicValueEnum::from),
                BinaryOp::Multiply => builder.build_float_mul(l, r, "fmul").map(BasicValueEnum::from),
                BinaryOp::Divide => builder.build_float_div(l, r, "fdiv").map(BasicValueEnum::from),
                BinaryOp::Modulo => builder.build_float_rem(l, r, "frem").map(BasicValueEnum::from),
                comparison => {
                    let predicate = float_predicate(comparison).ok_or_else(|| {
                        internal_error(format!("`{}` is not a comparison", comparison))
                    })?;
                    builder
                        .build_float_compare(predicate, l, r, "fcmp")
                        .map(BasicValueEnum::from)
                }
            }
            .map_err(lowering_error)?
        }
        Some(Type::String) => {
            let predicate = int_predicate(operator)
                .ok_or_else(|| internal_error(format!("no lowering for `{}` on strings", operator)))?;
            gen_string_compare(compiler, predicate, left, right)?.into()
        }
        other => {
            return Err(internal_error(format!(
                "no lowering for `{}` on {:?}",
                operator, other
            )))
        }
    };

    Ok(value)
}

/// `&&` and `||`: the right operand is only evaluated when the left one does
/// not already decide the result. Both paths meet in a block with a `phi`.
fn gen_short_circuit<'ctx>(
    compiler: &Compiler<'ctx>,
    operator: BinaryOp,
    left: &Expr,
    right: &Expr,
) -> Result<IntValue<'ctx>, Error> {
    let is_and = operator == BinaryOp::And;
    let prefix = if is_and { "and" } else { "or" };

    let left = gen_expression(compiler, left)?.into_int_value();
    let left_end = compiler
        .builder
        .get_insert_block()
        .ok_or_else(|| internal_error("builder is not positioned"))?;

    let rhs_block = compiler.append_block(&format!("{}.rhs", prefix))?;
    let merge_block = compiler.append_block(&format!("{}.end", prefix))?;

    if is_and {
        compiler
            .builder
            .build_conditional_branch(left, rhs_block, merge_block)
    } else {
        compiler
            .builder
            .build_conditional_branch(left, merge_block, rhs_block)
    }
    .map_err(lowering_error)?;

    compiler.builder.position_at_end(rhs_block);
    let right = gen_expression(compiler, right)?.into_int_value();
    let right_end = compiler
        .builder
        .get_insert_block()
        .ok_or_else(|| internal_error("builder is not positioned"))?;
    compiler
        .builder
        .build_unconditional_branch(merge_block)
        .map_err(lowering_error)?;

    compiler.builder.position_at_end(merge_block);
    let decided = compiler.context.bool_type().const_int(!is_and as u64, false);
    let phi = compiler
        .builder
        .build_phi(compiler.context.bool_type(), prefix)
        .map_err(lowering_error)?;
    phi.add_incoming(&[(&decided, left_end), (&right, right_end)]);

    Ok(phi.as_basic_value().into_int_value())
}

/// Generates a call to a user function.
///
/// # Returns
///
/// The call's value, or `None` for a `void` function.
pub fn gen_call<'ctx>(
    compiler: &Compiler<'ctx>,
    callee: &str,
    arguments: &[Expr],
) -> Result<Option<BasicValueEnum<'ctx>>, Error> {
    let function = compiler.lookup_function(callee)?;

    let arguments = arguments
        .iter()
        .map(|argument| gen_expression(compiler, argument).map(BasicMetadataValueEnum::from))
        .collect::<Result<Vec<BasicMetadataValueEnum<'ctx>>, Error>>()?;

    // Calls returning void must stay unnamed.
    let name = match function.get_type().get_return_type() {
        Some(_) => "call",
        None => "",
    };

    let call = compiler
        .builder
        .build_call(function, &arguments, name)
        .map_err(lowering_error)?;

    Ok(call.try_as_basic_value().left())
}
