//! Lexical scopes shared by the type checker and the code generator.
//!
//! A [`scope::ScopeStack`] maps names to whatever a pass needs to know about
//! them: the checker stores [`symbol::Symbol`]s, the generator stores the
//! storage slot of each variable.

pub mod scope;
pub mod symbol;

#[cfg(test)]
mod tests;
