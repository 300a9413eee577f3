//! Unit tests for scopes and symbols.

use std::rc::Rc;

use super::{
    scope::{ScopeKind, ScopeOwner, ScopeStack},
    symbol::Symbol,
};
use crate::{ast::types::Type, Position};

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.ru".to_string()))
}

fn int_var(name: &str) -> Symbol {
    Symbol::variable(name, Some(Type::Int), false, at(0))
}

#[test]
fn test_declare_and_lookup() {
    let mut scopes = ScopeStack::new();
    scopes.declare("x", int_var("x"), at(0)).unwrap();

    let symbol = scopes.lookup("x").unwrap();
    assert_eq!(symbol.ty, Some(Type::Int));
    assert!(scopes.lookup("y").is_none());
}

#[test]
fn test_duplicate_in_same_scope_is_rejected() {
    let mut scopes = ScopeStack::new();
    scopes.declare("x", int_var("x"), at(0)).unwrap();

    let error = scopes.declare("x", int_var("x"), at(12)).unwrap_err();
    assert_eq!(error.get_error_name(), "DuplicateDeclarationError");
    assert_eq!(error.get_position().0, 12);
}

#[test]
fn test_shadowing_resolves_to_inner_declaration() {
    let mut scopes = ScopeStack::new();
    scopes.declare("x", int_var("x"), at(0)).unwrap();

    scopes.push_scope(ScopeKind::Block);
    scopes
        .declare("x", Symbol::variable("x", Some(Type::String), false, at(5)), at(5))
        .unwrap();
    assert_eq!(scopes.lookup("x").unwrap().ty, Some(Type::String));

    scopes.pop_scope();
    assert_eq!(scopes.lookup("x").unwrap().ty, Some(Type::Int));
}

#[test]
fn test_inner_declarations_disappear_after_pop() {
    let mut scopes: ScopeStack<Symbol> = ScopeStack::new();

    scopes.with_scope(ScopeKind::Block, |scopes| {
        scopes.declare("tmp", int_var("tmp"), at(0)).unwrap();
        assert!(scopes.lookup("tmp").is_some());
    });

    assert!(scopes.lookup("tmp").is_none());
    assert_eq!(scopes.depth(), 1);
}

#[test]
fn test_with_scope_pops_on_early_error() {
    let mut scopes: ScopeStack<i32> = ScopeStack::new();

    let result: Result<(), crate::errors::errors::Error> =
        scopes.with_scope(ScopeKind::Function, |scopes| {
            scopes.declare("a", 1, at(0))?;
            scopes.declare("a", 2, at(1))?;
            Ok(())
        });

    assert!(result.is_err());
    assert!(scopes.is_global());
}

#[test]
fn test_global_scope_is_never_popped() {
    let mut scopes: ScopeStack<i32> = ScopeStack::new();
    assert!(scopes.pop_scope().is_none());
    assert_eq!(scopes.depth(), 1);
}

#[test]
fn test_lookup_reports_scope_kind() {
    let mut scopes: ScopeStack<i32> = ScopeStack::new();
    scopes.declare("g", 1, at(0)).unwrap();
    scopes.push_scope(ScopeKind::Function);
    scopes.declare("p", 2, at(0)).unwrap();
    scopes.push_scope(ScopeKind::Block);

    assert_eq!(scopes.lookup_with_kind("g"), Some((&1, ScopeKind::Global)));
    assert_eq!(scopes.lookup_with_kind("p"), Some((&2, ScopeKind::Function)));
    assert_eq!(scopes.current().parent, Some(1));
}

#[test]
fn test_symbol_kinds() {
    let function = Symbol::function("square", vec![Type::Int], Type::Int, at(0));
    assert!(function.is_function());
    assert_eq!(function.ty, Some(Type::Int));

    let constant = Symbol::variable("PI", Some(Type::Float), true, at(0));
    assert!(constant.is_constant());
    assert!(!Symbol::parameter("x", Type::Int, at(0)).is_constant());
}
