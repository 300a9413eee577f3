//! Type checking and semantic analysis module.
//!
//! The checker walks the AST once, after registering every function
//! signature, and decorates it in place: each expression gets its resolved
//! type and any implicit `int` to `float` promotion, each `let` gets its
//! declared type. Semantic errors are collected for the whole program
//! rather than stopping at the first one.

pub mod expr;
pub mod stmt;
pub mod type_checker;
