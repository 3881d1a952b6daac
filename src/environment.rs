use crate::value::{EvalError, Result, Value};
use std::collections::HashMap;

/// One lexical scope. A child scope borrows its enclosing scope, so the
/// parent always outlives it.
#[derive(Debug, Default, Clone)]
pub struct Environment<'a> {
    store: HashMap<String, Value>,
    outer: Option<&'a Environment<'a>>,
}

impl<'a> Environment<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    /// The root scope of an evaluation, seeded with `true`, `false` and `null`.
    pub fn global() -> Self {
        let mut store = HashMap::new();
        store.insert("true".to_owned(), Value::Boolean(true));
        store.insert("false".to_owned(), Value::Boolean(false));
        store.insert("null".to_owned(), Value::Null);

        Self { store, outer: None }
    }

    pub fn with_enclosed(outer: &'a Environment<'a>) -> Self {
        Self {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    /// Looks `name` up in this scope, then in each enclosing scope in turn.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.store
            .get(name)
            .or_else(|| self.outer.and_then(|outer| outer.get(name)))
    }

    pub fn resolve(&self, name: &str) -> Result<&Value> {
        self.get(name).ok_or_else(|| EvalError::IdentifierNotFound {
            name: name.to_owned(),
        })
    }

    /// Binds `name` in this scope. A name can be bound once per scope; it may
    /// still shadow a binding of an enclosing scope.
    pub fn declare(&mut self, name: impl Into<String>, value: Value) -> Result<()> {
        let name = name.into();
        if self.store.contains_key(&name) {
            return Err(EvalError::AlreadyDeclared { name });
        }
        self.store.insert(name, value);
        Ok(())
    }
}
