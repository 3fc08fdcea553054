use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::procedure::Procedure;

/// A runtime value. Pairs are shared mutable cells: mutation through one
/// alias is visible through every other.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Nil,
    Pair(Rc<RefCell<Pair>>),
    Proc(Rc<Procedure>),
}

#[derive(Clone, PartialEq)]
pub struct Pair {
    pub head: Value,
    pub tail: Value,
}

impl Value {
    pub fn pair(head: Value, tail: Value) -> Value {
        Value::Pair(Rc::new(RefCell::new(Pair { head, tail })))
    }

    /// Build a proper list, right to left.
    pub fn list_from(items: Vec<Value>) -> Value {
        items
            .into_iter()
            .rev()
            .fold(Value::Nil, |tail, head| Value::pair(head, tail))
    }

    /// Only false, 0 and 0.0 are falsy; nil, pairs and procedures are truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            _ => true,
        }
    }
}

// Structural for data, identity for procedures. Comparing a cyclic chain
// against itself short-circuits on pointer equality; two distinct cyclic
// chains must not be compared.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Pair(a), Value::Pair(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Proc(a), Value::Proc(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut seen = HashSet::new();
        fmt_value(self, f, &mut seen)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn fmt_value(
    value: &Value,
    f: &mut fmt::Formatter,
    seen: &mut HashSet<*const RefCell<Pair>>,
) -> fmt::Result {
    match value {
        Value::Int(n) => write!(f, "{}", n),
        Value::Float(x) => write!(f, "{:?}", x),
        Value::Bool(true) => write!(f, "@t"),
        Value::Bool(false) => write!(f, "@f"),
        Value::Nil => write!(f, "nil"),
        Value::Pair(cell) => fmt_chain(cell, f, seen),
        Value::Proc(p) => write!(f, "{:?}", p),
    }
}

// "(1 2 3)" for proper chains, "(1 . 2)" for improper tails, "..." at a
// revisited cell so cyclic chains never hang the printer
fn fmt_chain(
    cell: &Rc<RefCell<Pair>>,
    f: &mut fmt::Formatter,
    seen: &mut HashSet<*const RefCell<Pair>>,
) -> fmt::Result {
    write!(f, "(")?;
    let mut cursor = cell.clone();
    loop {
        if !seen.insert(Rc::as_ptr(&cursor)) {
            write!(f, "...")?;
            break;
        }
        let (head, tail) = {
            let pair = cursor.borrow();
            (pair.head.clone(), pair.tail.clone())
        };
        fmt_value(&head, f, seen)?;
        match tail {
            Value::Nil => break,
            Value::Pair(next) => {
                write!(f, " ")?;
                cursor = next;
            }
            other => {
                write!(f, " . ")?;
                fmt_value(&other, f, seen)?;
                break;
            }
        }
    }
    write!(f, ")")
}
