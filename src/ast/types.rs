//! The language's value types.
//!
//! Every expression resolves to one of these after type checking. `Void` is
//! only ever the result of calling a function that returns nothing.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    Void,
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    /// Whether a value of type `self` may be stored where `target` is expected.
    ///
    /// Only `int` widens (to `float`); every other type converts to itself only.
    pub fn is_assignable_to(&self, target: Type) -> bool {
        *self == target || (*self == Type::Int && target == Type::Float)
    }

    /// The type both operands of an arithmetic or comparison operator are
    /// brought to before the operation, if there is one.
    pub fn common_numeric(left: Type, right: Type) -> Option<Type> {
        match (left, right) {
            (Type::Int, Type::Int) => Some(Type::Int),
            (Type::Float, Type::Float) | (Type::Int, Type::Float) | (Type::Float, Type::Int) => {
                Some(Type::Float)
            }
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Bool => "bool",
            Type::String => "string",
            Type::Void => "void",
        };

        write!(f, "{}", name)
    }
}
