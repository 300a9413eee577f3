use crate::Span;

use super::statements::{
    AssignmentStmt, BlockStmt, ExpressionStmt, FnDeclStmt, PrintStmt, ReturnStmt, VarDeclStmt,
};

/// A whole source file: top-level function definitions and statements in
/// source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &FnDeclStmt> {
        self.body.iter().filter_map(|stmt| match stmt {
            Stmt::FnDecl(func) => Some(func),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    FnDecl(FnDeclStmt),
    VarDecl(VarDeclStmt),
    Assignment(AssignmentStmt),
    Print(PrintStmt),
    Return(ReturnStmt),
    Expression(ExpressionStmt),
    Block(BlockStmt),
}
