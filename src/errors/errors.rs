use std::fmt::Display;

use thiserror::Error;

use crate::{ast::types::Type, Position};

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    /// Semantic errors are accumulated; everything else aborts the pipeline.
    pub fn is_semantic(&self) -> bool {
        !matches!(
            self.internal_error,
            ErrorImpl::UnrecognisedToken { .. }
                | ErrorImpl::UnexpectedToken { .. }
                | ErrorImpl::UnexpectedTokenDetailed { .. }
                | ErrorImpl::NumberParseError { .. }
                | ErrorImpl::SyntaxStructureError { .. }
                | ErrorImpl::InternalLoweringError { .. }
                | ErrorImpl::BackendError { .. }
        )
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::SyntaxStructureError { .. } => "SyntaxStructureError",
            ErrorImpl::DuplicateDeclaration { .. } => "DuplicateDeclarationError",
            ErrorImpl::UndefinedName { .. } => "UndefinedNameError",
            ErrorImpl::MissingType { .. } => "MissingTypeError",
            ErrorImpl::MissingInitializer { .. } => "MissingInitializerError",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatchError",
            ErrorImpl::OperatorType { .. } => "OperatorTypeError",
            ErrorImpl::ReturnType { .. } => "ReturnTypeError",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunctionError",
            ErrorImpl::MissingReturn { .. } => "MissingReturnError",
            ErrorImpl::ArgumentCount { .. } | ErrorImpl::ArgumentType { .. } => {
                "ArgumentMismatchError"
            }
            ErrorImpl::ConstantAssignment { .. } => "ConstantAssignmentError",
            ErrorImpl::VoidValue { .. } => "VoidValueError",
            ErrorImpl::InternalLoweringError { .. } => "InternalLoweringError",
            ErrorImpl::BackendError { .. } => "BackendError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::SyntaxStructureError { .. } => ErrorTip::Suggestion(String::from(
                "The parser and the AST builder disagree about the grammar",
            )),
            ErrorImpl::DuplicateDeclaration { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", name))
            }
            ErrorImpl::UndefinedName { name, is_function } => {
                if *is_function {
                    ErrorTip::Suggestion(format!("`{}` is a function, call it instead", name))
                } else {
                    ErrorTip::Suggestion(format!("`{}` is not declared", name))
                }
            }
            ErrorImpl::MissingType { name } => ErrorTip::Suggestion(format!(
                "Give `{}` an explicit type or an initial value",
                name
            )),
            ErrorImpl::MissingInitializer { name } => {
                ErrorTip::Suggestion(format!("Constant `{}` needs an initial value", name))
            }
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::OperatorType { operator, operands } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to {}",
                operator,
                operands
                    .iter()
                    .map(|ty| format!("`{}`", ty))
                    .collect::<Vec<String>>()
                    .join(" and ")
            )),
            ErrorImpl::ReturnType { expected, received } => ErrorTip::Suggestion(format!(
                "Function returns `{}`, but this returns `{}`",
                expected, received
            )),
            ErrorImpl::ReturnOutsideFunction => ErrorTip::None,
            ErrorImpl::MissingReturn { function, .. } => ErrorTip::Suggestion(format!(
                "Add a `return` at the end of `{}`",
                function
            )),
            ErrorImpl::ArgumentCount {
                function,
                expected,
                received,
            } => ErrorTip::Suggestion(format!(
                "`{}` expects {} arguments, received {}",
                function, expected, received
            )),
            ErrorImpl::ArgumentType {
                expected, received, ..
            } => ErrorTip::Suggestion(format!(
                "Expected argument type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ConstantAssignment { name } => {
                ErrorTip::Suggestion(format!("Declare `{}` with `let` to reassign it", name))
            }
            ErrorImpl::VoidValue { .. } => ErrorTip::None,
            ErrorImpl::InternalLoweringError { .. } => ErrorTip::Suggestion(String::from(
                "This is a compiler bug, please report it",
            )),
            ErrorImpl::BackendError { .. } => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} (at {}:{})",
            self.get_error_name(),
            self.internal_error,
            self.position.1,
            self.position.0
        )
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("unrecognised parse tree shape: {message}")]
    SyntaxStructureError { message: String },
    #[error("{name:?} already declared in this scope")]
    DuplicateDeclaration { name: String },
    #[error("{name:?} not declared")]
    UndefinedName { name: String, is_function: bool },
    #[error("cannot determine the type of {name:?}")]
    MissingType { name: String },
    #[error("constant {name:?} has no initial value")]
    MissingInitializer { name: String },
    #[error("types do not match: expected {expected}, received {received}")]
    TypeMismatch { expected: Type, received: Type },
    #[error("operator {operator} cannot be applied to {operands:?}")]
    OperatorType { operator: String, operands: Vec<Type> },
    #[error("return type does not match: expected {expected}, received {received}")]
    ReturnType { expected: Type, received: Type },
    #[error("return statement outside of a function")]
    ReturnOutsideFunction,
    #[error("function {function:?} does not return a {return_type} value on every path")]
    MissingReturn { function: String, return_type: Type },
    #[error("{function:?} expects {expected} arguments, received {received}")]
    ArgumentCount {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("argument {index} of {function:?} has type {received}, expected {expected}")]
    ArgumentType {
        function: String,
        index: usize,
        expected: Type,
        received: Type,
    },
    #[error("cannot assign to constant {name:?}")]
    ConstantAssignment { name: String },
    #[error("void value used as {context}")]
    VoidValue { context: String },
    #[error("internal lowering error: {message}")]
    InternalLoweringError { message: String },
    #[error("backend error: {message}")]
    BackendError { message: String },
}
