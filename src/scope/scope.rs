use std::collections::HashMap;

use log::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    Block,
}

#[derive(Debug)]
pub struct Scope<T> {
    pub kind: ScopeKind,
    /// Index of the enclosing scope in the stack, `None` for the global scope.
    pub parent: Option<usize>,
    entries: HashMap<String, T>,
}

impl<T> Scope<T> {
    pub fn new(kind: ScopeKind, parent: Option<usize>) -> Self {
        Scope {
            kind,
            parent,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

/// A stack of nested scopes. The global scope is always at the bottom and is
/// never popped.
#[derive(Debug)]
pub struct ScopeStack<T> {
    scopes: Vec<Scope<T>>,
}

impl<T> Default for ScopeStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScopeStack<T> {
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![Scope::new(ScopeKind::Global, None)],
        }
    }

    fn current_index(&self) -> usize {
        self.scopes.len() - 1
    }

    pub fn current(&self) -> &Scope<T> {
        &self.scopes[self.current_index()]
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self, kind: ScopeKind) {
        let parent = Some(self.current_index());
        self.scopes.push(Scope::new(kind, parent));
        trace!("entered {:?} scope at depth {}", kind, self.depth());
    }

    /// Leaves the innermost scope, discarding its entries.
    pub fn pop_scope(&mut self) -> Option<Scope<T>> {
        if self.scopes.len() == 1 {
            return None;
        }

        let scope = self.scopes.pop();
        trace!("left scope, depth now {}", self.depth());
        scope
    }

    /// Declares `name` in the innermost scope.
    ///
    /// Fails with `DuplicateDeclaration` at `position` if the innermost scope
    /// already has an entry for `name`; outer scopes may be shadowed freely.
    pub fn declare(&mut self, name: &str, value: T, position: Position) -> Result<(), Error> {
        let index = self.current_index();
        let scope = &mut self.scopes[index];

        if scope.contains(name) {
            return Err(Error::new(
                ErrorImpl::DuplicateDeclaration {
                    name: String::from(name),
                },
                position,
            ));
        }

        scope.entries.insert(String::from(name), value);
        Ok(())
    }

    /// Finds the nearest declaration of `name`, innermost scope first.
    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.lookup_with_kind(name).map(|(value, _)| value)
    }

    /// Like [`ScopeStack::lookup`], also returning the kind of scope the
    /// declaration was found in.
    pub fn lookup_with_kind(&self, name: &str) -> Option<(&T, ScopeKind)> {
        let mut index = Some(self.current_index());

        while let Some(current) = index {
            let scope = &self.scopes[current];
            if let Some(value) = scope.get(name) {
                return Some((value, scope.kind));
            }
            index = scope.parent;
        }

        None
    }

    pub fn is_global(&self) -> bool {
        self.current().kind == ScopeKind::Global
    }
}

/// Anything that owns a [`ScopeStack`] and walks nested scopes with it.
pub trait ScopeOwner {
    type Entry;

    fn scopes(&mut self) -> &mut ScopeStack<Self::Entry>;

    /// Runs `f` inside a fresh scope of `kind`, popping it afterwards whatever
    /// `f` returns.
    fn with_scope<R>(&mut self, kind: ScopeKind, f: impl FnOnce(&mut Self) -> R) -> R
    where
        Self: Sized,
    {
        self.scopes().push_scope(kind);
        let result = f(self);
        self.scopes().pop_scope();
        result
    }
}

impl<T> ScopeOwner for ScopeStack<T> {
    type Entry = T;

    fn scopes(&mut self) -> &mut ScopeStack<T> {
        self
    }
}
