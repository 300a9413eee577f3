//! What happens to a finished module: verification, the optimization
//! pipeline, object file emission and JIT execution.

use std::path::Path;

use inkwell::{
    module::Module,
    passes::PassManager,
    values::FunctionValue,
    targets::{CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine},
    OptimizationLevel,
};
use log::{debug, info};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

type MainFunction = unsafe extern "C" fn() -> i32;
type VoidMainFunction = unsafe extern "C" fn();

fn backend_error(message: impl Into<String>) -> Error {
    Error::new(
        ErrorImpl::BackendError {
            message: message.into(),
        },
        Position::null(),
    )
}

pub fn verify_module(module: &Module) -> Result<(), Error> {
    module
        .verify()
        .map_err(|message| backend_error(message.to_string()))
}

/// Runs the function pass pipeline over every defined function.
///
/// Does nothing at `OptimizationLevel::None`.
pub fn run_passes(module: &Module, level: OptimizationLevel) {
    if matches!(level, OptimizationLevel::None) {
        return;
    }

    let fpm: PassManager<FunctionValue> = PassManager::create(module);

    fpm.add_promote_memory_to_register_pass(); // Promote stack allocations to registers
    fpm.add_instruction_combining_pass();
    fpm.add_reassociate_pass(); // Reorder expressions to enable better optimizations
    fpm.add_gvn_pass(); // Eliminate redundant calculations
    fpm.add_cfg_simplification_pass(); // Simplify the control flow graph

    fpm.initialize();
    for function in module.get_functions() {
        if function.count_basic_blocks() > 0 {
            fpm.run_on(&function);
        }
    }
    fpm.finalize();

    debug!("ran function passes at {:?}", level);
}

/// Creates a target machine for the host.
fn host_target_machine(level: OptimizationLevel) -> Result<TargetMachine, Error> {
    Target::initialize_native(&InitializationConfig::default()).map_err(backend_error)?;

    let target_triple = TargetMachine::get_default_triple();
    let target =
        Target::from_triple(&target_triple).map_err(|message| backend_error(message.to_string()))?;

    target
        .create_target_machine(
            &target_triple,
            "generic",
            "",
            level,
            RelocMode::PIC,
            CodeModel::Default,
        )
        .ok_or_else(|| backend_error(format!("no target machine for {:?}", target_triple)))
}

/// Writes `module` as a native object file at `path`.
pub fn write_object_file(module: &Module, path: &Path, level: OptimizationLevel) -> Result<(), Error> {
    let target_machine = host_target_machine(level)?;

    module.set_triple(&target_machine.get_triple());
    module.set_data_layout(&target_machine.get_target_data().get_data_layout());

    target_machine
        .write_to_file(module, FileType::Object, path)
        .map_err(|message| backend_error(message.to_string()))?;

    info!("wrote object file {}", path.display());
    Ok(())
}

/// Writes `module` as textual LLVM IR at `path`.
pub fn write_ir_file(module: &Module, path: &Path) -> Result<(), Error> {
    module
        .print_to_file(path)
        .map_err(|message| backend_error(message.to_string()))
}

/// JIT-compiles `module` and calls its `main`.
///
/// # Returns
///
/// The value `main` returned; `0` when `main` returns nothing.
pub fn run_jit_main(module: &Module) -> Result<i32, Error> {
    let main = module
        .get_function("main")
        .ok_or_else(|| backend_error("module has no `main` function"))?;

    if main.count_params() != 0 {
        return Err(backend_error("`main` must not take parameters"));
    }

    let engine = module
        .create_jit_execution_engine(OptimizationLevel::None)
        .map_err(|message| backend_error(message.to_string()))?;

    match main.get_type().get_return_type() {
        None => {
            let main = unsafe { engine.get_function::<VoidMainFunction>("main") }
                .map_err(|error| backend_error(format!("{:?}", error)))?;
            unsafe { main.call() };
            Ok(0)
        }
        Some(ty) if ty.is_int_type() && ty.into_int_type().get_bit_width() == 32 => {
            let main = unsafe { engine.get_function::<MainFunction>("main") }
                .map_err(|error| backend_error(format!("{:?}", error)))?;
            Ok(unsafe { main.call() })
        }
        Some(_) => Err(backend_error("`main` must return `int` or `void`")),
    }
}
