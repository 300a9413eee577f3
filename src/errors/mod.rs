//! Error types and error handling for the compiler.
//!
//! Every stage reports problems through the same positioned [`errors::Error`]:
//!
//! - lexer, parser and AST builder errors abort the pipeline immediately
//! - semantic errors are collected by the type checker and reported together
//! - lowering and backend errors signal a compiler defect or an LLVM failure

pub mod errors;

#[cfg(test)]
mod tests;
