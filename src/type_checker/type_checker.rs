use log::debug;

use crate::{
    ast::{ast::Program, ast::Stmt, types::Type},
    errors::errors::{Error, ErrorImpl},
    scope::{
        scope::{ScopeOwner, ScopeStack},
        symbol::Symbol,
    },
};

use super::stmt::type_check_stmt;

/// The function whose body is being checked.
#[derive(Debug, Clone)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
}

#[derive(Debug, Default)]
pub struct TypeChecker {
    pub scopes: ScopeStack<Symbol>,
    pub errors: Vec<Error>,
    pub function: Option<FunctionContext>,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            scopes: ScopeStack::new(),
            errors: vec![],
            function: None,
        }
    }

    pub fn report(&mut self, error: Error) {
        debug!("semantic error: {}", error);
        self.errors.push(error);
    }

    /// Declares `symbol` in the innermost scope, reporting a duplicate.
    pub fn declare(&mut self, symbol: Symbol) {
        let name = symbol.name.clone();
        let position = symbol.position.clone();

        if let Err(error) = self.scopes.declare(&name, symbol, position) {
            self.report(error);
        }
    }

    /// Runs `f` with `function` as the enclosing function, restoring the
    /// previous one afterwards.
    pub fn in_function<R>(
        &mut self,
        function: FunctionContext,
        f: impl FnOnce(&mut TypeChecker) -> R,
    ) -> R {
        let previous = self.function.replace(function);
        let result = f(self);
        self.function = previous;
        result
    }
}

impl ScopeOwner for TypeChecker {
    type Entry = Symbol;

    fn scopes(&mut self) -> &mut ScopeStack<Symbol> {
        &mut self.scopes
    }
}

/// Registers every function signature in the global scope, so functions can
/// be called before (and from within) their own definition.
fn register_functions(type_checker: &mut TypeChecker, program: &Program) {
    for func in program.functions() {
        for param in func.parameters.iter() {
            if param.ty == Type::Void {
                type_checker.report(Error::new(
                    ErrorImpl::VoidValue {
                        context: format!("type of parameter `{}`", param.name),
                    },
                    param.span.start.clone(),
                ));
            }
        }

        type_checker.declare(Symbol::function(
            &func.identifier,
            func.parameter_types(),
            func.return_type,
            func.span.start.clone(),
        ));
    }
}

/// Type checks `program`, decorating it in place.
///
/// # Returns
///
/// `Ok(())` if the program is well typed, otherwise every semantic error
/// found, in source order of discovery.
pub fn type_check(program: &mut Program) -> Result<(), Vec<Error>> {
    let mut type_checker = TypeChecker::new();

    register_functions(&mut type_checker, program);

    for stmt in program.body.iter_mut() {
        type_check_stmt(&mut type_checker, stmt);
    }

    debug!(
        "type checked {} top-level items, {} errors",
        program.body.len(),
        type_checker.errors.len()
    );

    if type_checker.errors.is_empty() {
        Ok(())
    } else {
        Err(type_checker.errors)
    }
}

/// Whether a block ends in a `return`, directly or as the last statement of
/// a trailing nested block.
pub fn ends_with_return(body: &[Stmt]) -> bool {
    match body.last() {
        Some(Stmt::Return(_)) => true,
        Some(Stmt::Block(block)) => ends_with_return(&block.body),
        _ => false,
    }
}
