//! The C functions generated code relies on, and the statements lowered to
//! calls into them.

use inkwell::{
    context::Context,
    module::{Linkage, Module},
    values::{BasicMetadataValueEnum, BasicValueEnum, FunctionValue, IntValue, PointerValue},
    AddressSpace, IntPredicate,
};

use crate::{
    ast::{statements::PrintStmt, types::Type},
    errors::errors::Error,
};

use super::{
    compiler::{internal_error, lowering_error, Compiler},
    expr::gen_expression,
};

/// Declarations of the libc functions used by generated code. They are added
/// before any user function so they keep their C names.
pub struct Runtime<'ctx> {
    /// `i32 printf(i8*, ...)`
    pub printf: FunctionValue<'ctx>,
    /// `i32 strcmp(i8*, i8*)`
    pub strcmp: FunctionValue<'ctx>,
    /// Constant `""`, the value of a string variable that was never assigned.
    pub empty_string: PointerValue<'ctx>,
}

impl<'ctx> Runtime<'ctx> {
    pub fn declare(context: &'ctx Context, module: &Module<'ctx>) -> Self {
        let i8_ptr_type = context.i8_type().ptr_type(AddressSpace::default());

        let printf_type = context.i32_type().fn_type(&[i8_ptr_type.into()], true);
        let printf = module.add_function("printf", printf_type, Some(Linkage::External));

        let strcmp_type = context
            .i32_type()
            .fn_type(&[i8_ptr_type.into(), i8_ptr_type.into()], false);
        let strcmp = module.add_function("strcmp", strcmp_type, Some(Linkage::External));

        let empty = context.const_string(b"", true);
        let empty_global = module.add_global(empty.get_type(), None, "empty_string");
        empty_global.set_initializer(&empty);
        empty_global.set_constant(true);
        empty_global.set_linkage(Linkage::Private);
        let empty_string = empty_global.as_pointer_value().const_cast(i8_ptr_type);

        Runtime {
            printf,
            strcmp,
            empty_string,
        }
    }
}

/// The `printf` conversion used to print a value of `ty`. Booleans are
/// printed as the strings `true` and `false`.
pub fn format_specifier(ty: Type) -> Result<&'static str, Error> {
    match ty {
        Type::Int => Ok("%d"),
        Type::Float => Ok("%g"),
        Type::String | Type::Bool => Ok("%s"),
        Type::Void => Err(internal_error("cannot print a `void` value")),
    }
}

/// Lowers `print(a, b, ...)` to a single `printf` call. Arguments are
/// separated by one space and the line ends with a newline.
pub fn gen_print<'ctx>(compiler: &Compiler<'ctx>, print: &PrintStmt) -> Result<(), Error> {
    let mut specifiers = Vec::with_capacity(print.arguments.len());
    let mut values: Vec<BasicMetadataValueEnum<'ctx>> = Vec::with_capacity(print.arguments.len() + 1);

    for argument in print.arguments.iter() {
        let ty = argument
            .final_type()
            .ok_or_else(|| internal_error("print argument has no type"))?;
        specifiers.push(format_specifier(ty)?);

        let value = gen_expression(compiler, argument)?;
        let value = match ty {
            Type::Bool => gen_bool_string(compiler, value.into_int_value())?,
            _ => value,
        };
        values.push(value.into());
    }

    let format = format!("{}\n", specifiers.join(" "));
    let format = compiler
        .builder
        .build_global_string_ptr(&format, "fmt")
        .map_err(lowering_error)?;

    let mut arguments: Vec<BasicMetadataValueEnum<'ctx>> = vec![format.as_pointer_value().into()];
    arguments.extend(values);

    compiler
        .builder
        .build_call(compiler.runtime.printf, &arguments, "printed")
        .map_err(lowering_error)?;

    Ok(())
}

fn gen_bool_string<'ctx>(
    compiler: &Compiler<'ctx>,
    value: IntValue<'ctx>,
) -> Result<BasicValueEnum<'ctx>, Error> {
    let true_string = compiler
        .builder
        .build_global_string_ptr("true", "true")
        .map_err(lowering_error)?;
    let false_string = compiler
        .builder
        .build_global_string_ptr("false", "false")
        .map_err(lowering_error)?;

    compiler
        .builder
        .build_select(
            value,
            true_string.as_pointer_value(),
            false_string.as_pointer_value(),
            "bool_str",
        )
        .map_err(lowering_error)
}

/// Compares two strings with `strcmp`, then compares its result with zero
/// using `predicate`.
pub fn gen_string_compare<'ctx>(
    compiler: &Compiler<'ctx>,
    predicate: IntPredicate,
    left: BasicValueEnum<'ctx>,
    right: BasicValueEnum<'ctx>,
) -> Result<IntValue<'ctx>, Error> {
    let ordering = compiler
        .builder
        .build_call(compiler.runtime.strcmp, &[left.into(), right.into()], "strcmp")
        .map_err(lowering_error)?
        .try_as_basic_value()
        .left()
        .ok_or_else(|| internal_error("`strcmp` returned no value"))?
        .into_int_value();

    compiler
        .builder
        .build_int_compare(
            predicate,
            ordering,
            compiler.context.i32_type().const_zero(),
            "strcmp_cmp",
        )
        .map_err(lowering_error)
}
