//! Lexical analysis module for the compiler.
//!
//! Converts source text into a stream of tokens for the parser. It handles
//! keywords, type specifiers, identifiers, numeric and string literals,
//! operators (including compound assignment and `++`/`--`), `//` comments
//! and whitespace. Every token carries its source span.

pub mod lexer;
pub mod tokens;

#[cfg(test)]
mod tests;
