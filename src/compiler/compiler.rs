//! Main compiler module.
//!
//! Lowers a type-checked [`Program`] to an LLVM module. Generation runs in
//! passes over the top level: prototypes for every function (and the module
//! initializer), zero-initialized globals for every top-level `let`, function
//! bodies, and finally the top-level statements themselves.

use std::collections::HashMap;

use inkwell::{
    attributes::{Attribute, AttributeLoc},
    basic_block::BasicBlock,
    builder::{Builder, BuilderError},
    context::Context,
    module::{Linkage, Module},
    types::{BasicMetadataTypeEnum, BasicType, BasicTypeEnum, FunctionType},
    values::{BasicValueEnum, FunctionValue, PointerValue},
    AddressSpace, OptimizationLevel,
};
use log::{debug, info, trace};

use crate::{
    ast::{
        ast::{Program, Stmt},
        statements::FnDeclStmt,
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    scope::scope::{ScopeKind, ScopeOwner, ScopeStack},
    Position,
};

use super::{
    backend::{run_passes, verify_module},
    runtime::Runtime,
    stmt::{gen_block_body, gen_function_exit},
};

/// Name of the function holding top-level statements when the program
/// defines its own `main`.
pub const MODULE_INIT: &str = "__module_init";

/// Settings for one compilation unit.
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Name given to the LLVM module.
    pub module_name: String,
    /// Level used for the function pass pipeline; `None` skips it.
    pub optimization: OptimizationLevel,
    /// Whether the finished module is run through the LLVM verifier.
    pub verify: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            module_name: String::from("main"),
            optimization: OptimizationLevel::None,
            verify: true,
        }
    }
}

/// The state of code generation for one module.
///
/// # Type Parameters
///
/// * `'ctx` - Lifetime of the LLVM context
pub struct Compiler<'ctx> {
    /// Reference to the LLVM context
    pub context: &'ctx Context,
    /// The LLVM module being built
    pub module: Module<'ctx>,
    /// The LLVM IR builder
    pub builder: Builder<'ctx>,

    /// Storage of every visible variable: entry-block allocas for locals and
    /// parameters, module globals for top-level `let`s.
    pub variables: ScopeStack<PointerValue<'ctx>>,
    /// User functions by source name.
    pub functions: HashMap<String, FunctionValue<'ctx>>,
    /// External C functions the generated code calls.
    pub runtime: Runtime<'ctx>,
    /// The function whose body is being generated.
    pub function: Option<FunctionValue<'ctx>>,
    /// `__module_init`, present only when the program defines `main`.
    pub module_init: Option<FunctionValue<'ctx>>,
}

impl<'ctx> Compiler<'ctx> {
    /// Creates a new Compiler with the runtime functions already declared.
    ///
    /// # Arguments
    ///
    /// * `context` - Reference to the LLVM context
    /// * `module_name` - Name of the module to create
    pub fn new(context: &'ctx Context, module_name: &str) -> Self {
        let module = context.create_module(module_name);
        let runtime = Runtime::declare(context, &module);

        Compiler {
            context,
            module,
            builder: context.create_builder(),
            variables: ScopeStack::new(),
            functions: HashMap::new(),
            runtime,
            function: None,
            module_init: None,
        }
    }

    /// The module as textual LLVM IR.
    pub fn print_ir(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Converts a language type to an LLVM basic type.
    ///
    /// # Returns
    ///
    /// The LLVM type, or an `InternalLoweringError` for `void`, which has no
    /// value representation.
    pub fn basic_type(&self, ty: Type) -> Result<BasicTypeEnum<'ctx>, Error> {
        match ty {
            Type::Int => Ok(self.context.i32_type().into()),
            Type::Float => Ok(self.context.f64_type().into()),
            Type::Bool => Ok(self.context.bool_type().into()),
            Type::String => Ok(self
                .context
                .i8_type()
                .ptr_type(AddressSpace::default())
                .into()),
            Type::Void => Err(internal_error("`void` has no value representation")),
        }
    }

    pub fn zero_value(&self, ty: Type) -> Result<BasicValueEnum<'ctx>, Error> {
        match ty {
            Type::Int => Ok(self.context.i32_type().const_zero().into()),
            Type::Float => Ok(self.context.f64_type().const_zero().into()),
            Type::Bool => Ok(self.context.bool_type().const_zero().into()),
            Type::String => Ok(self.runtime.empty_string.into()),
            Type::Void => Err(internal_error("`void` has no zero value")),
        }
    }

    fn function_type(
        &self,
        return_type: Type,
        parameters: &[Type],
    ) -> Result<FunctionType<'ctx>, Error> {
        let parameters = parameters
            .iter()
            .map(|ty| self.basic_type(*ty).map(BasicMetadataTypeEnum::from))
            .collect::<Result<Vec<BasicMetadataTypeEnum<'ctx>>, Error>>()?;

        Ok(match return_type {
            Type::Void => self.context.void_type().fn_type(&parameters, false),
            ty => self.basic_type(ty)?.fn_type(&parameters, false),
        })
    }

    /// The function currently being generated.
    pub fn current_function(&self) -> Result<FunctionValue<'ctx>, Error> {
        self.function
            .ok_or_else(|| internal_error("code generated outside of a function"))
    }

    /// Whether the builder's current block already ends in a terminator, in
    /// which case nothing more may be emitted into it.
    pub fn block_is_terminated(&self) -> bool {
        self.builder
            .get_insert_block()
            .and_then(|block| block.get_terminator())
            .is_some()
    }

    pub fn append_block(&self, name: &str) -> Result<BasicBlock<'ctx>, Error> {
        Ok(self.context.append_basic_block(self.current_function()?, name))
    }

    /// Allocates a stack slot in the entry block of the current function, so
    /// every local has one slot however often its declaration runs.
    pub fn create_entry_alloca(&self, ty: Type, name: &str) -> Result<PointerValue<'ctx>, Error> {
        let function = self.current_function()?;
        let entry = function
            .get_first_basic_block()
            .ok_or_else(|| internal_error(format!("no entry block to allocate `{}` in", name)))?;

        let builder = self.context.create_builder();
        match entry.get_first_instruction() {
            Some(instruction) => builder.position_before(&instruction),
            None => builder.position_at_end(entry),
        }

        builder
            .build_alloca(self.basic_type(ty)?, name)
            .map_err(lowering_error)
    }

    /// Declares `name` in the innermost scope of the generator.
    pub fn declare_variable(&mut self, name: &str, pointer: PointerValue<'ctx>) -> Result<(), Error> {
        self.variables
            .declare(name, pointer, Position::null())
            .map_err(|error| internal_error(error.to_string()))
    }

    pub fn lookup_variable(&self, name: &str) -> Result<PointerValue<'ctx>, Error> {
        self.variables
            .lookup(name)
            .copied()
            .ok_or_else(|| internal_error(format!("no storage for variable `{}`", name)))
    }

    pub fn lookup_function(&self, name: &str) -> Result<FunctionValue<'ctx>, Error> {
        self.functions
            .get(name)
            .copied()
            .ok_or_else(|| internal_error(format!("function `{}` was never declared", name)))
    }

    /// Adds an externally visible function with the usual attributes.
    fn create_function(&self, name: &str, function_type: FunctionType<'ctx>) -> FunctionValue<'ctx> {
        let function = self
            .module
            .add_function(name, function_type, Some(Linkage::External));

        let attributes = [
            self.context
                .create_enum_attribute(Attribute::get_named_enum_kind_id("uwtable"), 0),
            self.context
                .create_enum_attribute(Attribute::get_named_enum_kind_id("nounwind"), 0),
        ];

        for attribute in attributes.iter() {
            function.add_attribute(AttributeLoc::Function, *attribute);
        }

        function
    }

    /// First pass: every user function plus the function that will hold the
    /// top-level statements.
    fn declare_functions(&mut self, program: &Program) -> Result<FunctionValue<'ctx>, Error> {
        for func in program.functions() {
            let function_type = self.function_type(func.return_type, &func.parameter_types())?;
            let function = self.create_function(&func.identifier, function_type);
            trace!("declared function `{}`", func.identifier);

            self.functions.insert(func.identifier.clone(), function);
        }

        if self.functions.contains_key("main") {
            let init = self.create_function(MODULE_INIT, self.context.void_type().fn_type(&[], false));
            self.module_init = Some(init);
            Ok(init)
        } else {
            Ok(self.create_function("main", self.context.i32_type().fn_type(&[], false)))
        }
    }

    /// Every top-level `let` becomes a zero-initialized module global.
    fn declare_globals(&mut self, program: &Program) -> Result<(), Error> {
        for stmt in program.body.iter() {
            let Stmt::VarDecl(decl) = stmt else {
                continue;
            };

            let ty = decl
                .var_type
                .ok_or_else(|| internal_error(format!("`{}` has no resolved type", decl.identifier)))?;

            let global = self
                .module
                .add_global(self.basic_type(ty)?, None, &decl.identifier);
            global.set_initializer(&self.zero_value(ty)?);

            self.declare_variable(&decl.identifier, global.as_pointer_value())?;
        }

        Ok(())
    }

    /// Generates the body of a user function.
    fn gen_function(&mut self, func: &FnDeclStmt) -> Result<(), Error> {
        let function = self.lookup_function(&func.identifier)?;
        debug!("generating function `{}`", func.identifier);

        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);
        self.function = Some(function);

        let result = self.with_scope(ScopeKind::Function, |compiler| {
            compiler.gen_function_body(func, function)
        });
        self.function = None;

        result
    }

    fn gen_function_body(&mut self, func: &FnDeclStmt, function: FunctionValue<'ctx>) -> Result<(), Error> {
        for (param, value) in func.parameters.iter().zip(function.get_params()) {
            let slot = self.create_entry_alloca(param.ty, &param.name)?;
            self.builder.build_store(slot, value).map_err(lowering_error)?;
            self.declare_variable(&param.name, slot)?;
        }

        if func.identifier == "main" {
            if let Some(init) = self.module_init {
                self.builder
                    .build_call(init, &[], "")
                    .map_err(lowering_error)?;
            }
        }

        gen_block_body(self, &func.body.body)?;
        gen_function_exit(self, func.return_type, &func.identifier)
    }

    /// Generates the top-level statements into `function` (`main` or the
    /// module initializer) and terminates it.
    fn gen_top_level(&mut self, program: &Program, function: FunctionValue<'ctx>) -> Result<(), Error> {
        let entry = self.context.append_basic_block(function, "entry");
        self.builder.position_at_end(entry);
        self.function = Some(function);

        let statements: Vec<Stmt> = program
            .body
            .iter()
            .filter(|stmt| !matches!(stmt, Stmt::FnDecl(_)))
            .cloned()
            .collect();

        gen_block_body(self, &statements)?;

        if !self.block_is_terminated() {
            if self.module_init.is_some() {
                self.builder.build_return(None).map_err(lowering_error)?;
            } else {
                let zero = self.context.i32_type().const_zero();
                self.builder
                    .build_return(Some(&zero))
                    .map_err(lowering_error)?;
            }
        }

        self.function = None;
        Ok(())
    }
}

impl<'ctx> ScopeOwner for Compiler<'ctx> {
    type Entry = PointerValue<'ctx>;

    fn scopes(&mut self) -> &mut ScopeStack<PointerValue<'ctx>> {
        &mut self.variables
    }
}

/// A builder call failed; the generator emitted something malformed.
pub fn lowering_error(error: BuilderError) -> Error {
    internal_error(format!("{:?}", error))
}

pub fn internal_error(message: impl Into<String>) -> Error {
    Error::new(
        ErrorImpl::InternalLoweringError {
            message: message.into(),
        },
        Position::null(),
    )
}

/// Lowers a type-checked program into a new LLVM module.
///
/// # Arguments
///
/// * `program` - A program that passed [`type_check`](crate::type_checker::type_checker::type_check)
/// * `context` - Reference to the LLVM context that owns the module
/// * `config` - Module name, optimization level and verification switch
///
/// # Returns
///
/// The compiler holding the finished module, or an `InternalLoweringError`
/// if generation or verification failed.
pub fn compile<'ctx>(
    program: &Program,
    context: &'ctx Context,
    config: &CompilerConfig,
) -> Result<Compiler<'ctx>, Error> {
    let mut compiler = Compiler::new(context, &config.module_name);

    let top_level = compiler.declare_functions(program)?;
    compiler.declare_globals(program)?;

    for func in program.functions() {
        compiler.gen_function(func)?;
    }

    compiler.gen_top_level(program, top_level)?;

    if config.verify {
        verify_module(&compiler.module).map_err(|error| internal_error(error.to_string()))?;
    }

    run_passes(&compiler.module, config.optimization);

    info!(
        "generated module `{}` with {} functions",
        config.module_name,
        compiler.functions.len()
    );

    Ok(compiler)
}
