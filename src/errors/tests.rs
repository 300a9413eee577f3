//! Unit tests for error handling.

use crate::ast::types::Type;
use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.ru".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 10);
    assert!(!error.is_semantic());
}

#[test]
fn test_semantic_error_names() {
    let cases = vec![
        (
            ErrorImpl::DuplicateDeclaration {
                name: "x".to_string(),
            },
            "DuplicateDeclarationError",
        ),
        (
            ErrorImpl::UndefinedName {
                name: "y".to_string(),
                is_function: false,
            },
            "UndefinedNameError",
        ),
        (
            ErrorImpl::MissingType {
                name: "z".to_string(),
            },
            "MissingTypeError",
        ),
        (
            ErrorImpl::OperatorType {
                operator: "==".to_string(),
                operands: vec![Type::Int, Type::String],
            },
            "OperatorTypeError",
        ),
        (
            ErrorImpl::ReturnType {
                expected: Type::Int,
                received: Type::Void,
            },
            "ReturnTypeError",
        ),
        (
            ErrorImpl::MissingReturn {
                function: "f".to_string(),
                return_type: Type::Int,
            },
            "MissingReturnError",
        ),
        (
            ErrorImpl::ArgumentCount {
                function: "f".to_string(),
                expected: 2,
                received: 3,
            },
            "ArgumentMismatchError",
        ),
    ];

    for (error_impl, name) in cases {
        let error = Error::new(error_impl, at(0));
        assert_eq!(error.get_error_name(), name);
        assert!(error.is_semantic());
    }
}

#[test]
fn test_internal_lowering_error_is_fatal() {
    let error = Error::new(
        ErrorImpl::InternalLoweringError {
            message: "no type".to_string(),
        },
        at(0),
    );

    assert_eq!(error.get_error_name(), "InternalLoweringError");
    assert!(!error.is_semantic());
}

#[test]
fn test_operator_error_tip_names_operands() {
    let error = Error::new(
        ErrorImpl::OperatorType {
            operator: "==".to_string(),
            operands: vec![Type::Int, Type::String],
        },
        at(0),
    );

    assert_eq!(
        error.get_tip().to_string(),
        "Operator `==` cannot be applied to `int` and `string`"
    );
}

#[test]
fn test_undefined_function_value_tip() {
    let error = Error::new(
        ErrorImpl::UndefinedName {
            name: "square".to_string(),
            is_function: true,
        },
        at(0),
    );

    assert_eq!(
        error.get_tip().to_string(),
        "`square` is a function, call it instead"
    );
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display_includes_name_and_position() {
    let error = Error::new(
        ErrorImpl::TypeMismatch {
            expected: Type::Int,
            received: Type::Float,
        },
        at(7),
    );

    assert_eq!(
        error.to_string(),
        "TypeMismatchError: types do not match: expected int, received float (at test.ru:7)"
    );
}
