use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::env::Env;
use crate::eval::{eval_str, LispError};
use crate::value::{Pair, Value};

fn scope() -> Rc<Env> {
    Rc::new(Env::nested(
        Vec::new(),
        Vec::new(),
        Some(Rc::new(Env::root())),
    ))
}

fn ints(items: &[i64]) -> Value {
    Value::list_from(items.iter().map(|n| Value::Int(*n)).collect())
}

fn cell_at(value: &Value, index: usize) -> Rc<RefCell<Pair>> {
    let mut cursor = value.clone();
    for _ in 0..index {
        cursor = match cursor {
            Value::Pair(cell) => cell.borrow().tail.clone(),
            other => panic!("ran off the chain at {}", other),
        };
    }
    match cursor {
        Value::Pair(cell) => cell,
        other => panic!("expected a pair, got {}", other),
    }
}

#[test]
fn concat_copies_every_cell() {
    let env = scope();
    eval_str("(define a (list 1 2))", &env).unwrap();
    eval_str("(define b (list 3 4))", &env).unwrap();
    let joined = eval_str("(concat a b)", &env).unwrap();

    // mutate the result in place, both in the copy of a and the copy of b
    cell_at(&joined, 0).borrow_mut().head = Value::Int(99);
    cell_at(&joined, 2).borrow_mut().head = Value::Int(77);

    assert_eq!(eval_str("a", &env).unwrap(), ints(&[1, 2]));
    assert_eq!(eval_str("b", &env).unwrap(), ints(&[3, 4]));
    assert_eq!(joined, ints(&[99, 2, 77, 4]));
}

#[test]
fn pair_mutation_is_visible_through_aliases() {
    let env = scope();
    eval_str("(define p (pair 1 2))", &env).unwrap();
    let alias = eval_str("p", &env).unwrap();
    match &alias {
        Value::Pair(cell) => cell.borrow_mut().tail = Value::Int(9),
        other => panic!("expected a pair, got {}", other),
    }
    assert_eq!(eval_str("(tail p)", &env).unwrap(), Value::Int(9));
}

#[test]
fn cyclic_chains_fail_instead_of_hanging() {
    let env = scope();
    let looped = eval_str("(define l (list 1 2 3))", &env).unwrap();
    cell_at(&looped, 2).borrow_mut().tail = looped.clone();

    assert!(matches!(eval_str("(length l)", &env), Err(LispError::Eval(_))));
    assert!(matches!(eval_str("(map not l)", &env), Err(LispError::Eval(_))));
    assert!(matches!(eval_str("(concat l)", &env), Err(LispError::Eval(_))));
    assert_eq!(eval_str("(list? l)", &env).unwrap(), Value::Bool(false));
    // the printer marks the repeated cell instead of looping
    assert!(format!("{}", looped).contains("..."));
}
