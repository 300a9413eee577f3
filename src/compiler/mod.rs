//! Code generation module for the compiler.
//!
//! Transforms a type-checked AST into LLVM IR using inkwell, and hands the
//! finished module to the backend for verification, optimization, object
//! emission or JIT execution.

pub mod backend;
pub mod compiler;
pub mod expr;
pub mod runtime;
pub mod stmt;
