use crate::{ast::types::Type, Position};

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Variable { constant: bool },
    Parameter,
    Function {
        parameters: Vec<Type>,
        return_type: Type,
    },
}

/// A declared name as the type checker sees it.
///
/// `ty` is `None` when the declaration itself was rejected and its type could
/// not be determined. Uses of such a symbol are not reported again.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: Option<Type>,
    pub kind: SymbolKind,
    pub position: Position,
}

impl Symbol {
    pub fn variable(name: &str, ty: Option<Type>, constant: bool, position: Position) -> Self {
        Symbol {
            name: String::from(name),
            ty,
            kind: SymbolKind::Variable { constant },
            position,
        }
    }

    pub fn parameter(name: &str, ty: Type, position: Position) -> Self {
        Symbol {
            name: String::from(name),
            ty: Some(ty),
            kind: SymbolKind::Parameter,
            position,
        }
    }

    /// A function symbol; its `ty` is the return type.
    pub fn function(name: &str, parameters: Vec<Type>, return_type: Type, position: Position) -> Self {
        Symbol {
            name: String::from(name),
            ty: Some(return_type),
            kind: SymbolKind::Function {
                parameters,
                return_type,
            },
            position,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function { .. })
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, SymbolKind::Variable { constant: true })
    }
}
