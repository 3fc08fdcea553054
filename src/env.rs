use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::builtin::builtins;
use crate::eval::LispError;
use crate::value::Value;

/// One scope in the environment chain, consulted innermost-first. Children
/// hold a shared reference to their parent and are safe to drop
/// independently; a closure keeps its captured chain alive. Scopes are
/// shared, never copied.
pub struct Env {
    vars: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Env>>,
}

impl Env {
    /// The root scope holding the builtin library and the `@t`/`@f`/`nil`
    /// literals.
    pub fn root() -> Env {
        Env {
            vars: RefCell::new(builtins()),
            outer: None,
        }
    }

    /// A child scope with `params` bound to `args`.
    pub fn nested(params: Vec<String>, args: Vec<Value>, outer: Option<Rc<Env>>) -> Env {
        Env {
            vars: RefCell::new(params.into_iter().zip(args).collect()),
            outer,
        }
    }

    /// Insert or overwrite in this scope only.
    pub fn define(&self, name: &str, value: Value) {
        self.vars.borrow_mut().insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Result<Value, LispError> {
        if let Some(value) = self.vars.borrow().get(name) {
            return Ok(value.clone());
        }
        match &self.outer {
            Some(outer) => outer.get(name),
            None => Err(LispError::Name(name.to_string())),
        }
    }

    /// Overwrite the nearest enclosing binding; unlike `define` this never
    /// creates one.
    pub fn set_existing(&self, name: &str, value: Value) -> Result<(), LispError> {
        {
            let mut vars = self.vars.borrow_mut();
            if vars.contains_key(name) {
                vars.insert(name.to_string(), value);
                return Ok(());
            }
        }
        match &self.outer {
            Some(outer) => outer.set_existing(name, value),
            None => Err(LispError::Name(name.to_string())),
        }
    }

    /// Remove and return the nearest enclosing binding.
    pub fn delete(&self, name: &str) -> Result<Value, LispError> {
        if let Some(value) = self.vars.borrow_mut().remove(name) {
            return Ok(value);
        }
        match &self.outer {
            Some(outer) => outer.delete(name),
            None => Err(LispError::Name(name.to_string())),
        }
    }
}
