/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The program root and the statement enum
/// - builder: Builds the AST from the parser's concrete parse tree
/// - expressions: Expression nodes, literals and operators
/// - statements: Statement nodes
/// - types: The language's value types
pub mod ast;
pub mod builder;
pub mod expressions;
pub mod statements;
pub mod types;

#[cfg(test)]
mod tests;
