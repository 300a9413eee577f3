//! Parser module producing the concrete parse tree.
//!
//! Statements are dispatched through a token lookup table. Expressions are
//! parsed by precedence climbing over the binding power of each operator,
//! one loop per precedence level, which yields the flat operator chains the
//! AST builder folds into left-associative binary trees.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tests;
