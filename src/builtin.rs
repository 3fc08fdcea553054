use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::eval::LispError;
use crate::procedure::{Fp, Procedure};
use crate::value::{Pair, Value};

/// Bindings for the root environment: the primitive procedures plus the
/// `@t` / `@f` / `nil` literals.
pub fn builtins() -> HashMap<String, Value> {
    let mut vars: HashMap<String, Value> = HashMap::new();
    vars.insert("@t".to_string(), Value::Bool(true));
    vars.insert("@f".to_string(), Value::Bool(false));
    vars.insert("nil".to_string(), Value::Nil);

    register(&mut vars, "+", Rc::new(add));
    register(&mut vars, "-", Rc::new(sub));
    register(&mut vars, "*", Rc::new(mul));
    register(&mut vars, "/", Rc::new(div));
    register(&mut vars, ">", Rc::new(|args: &[Value]| fold_cmp(args, |a, b| a > b)));
    register(&mut vars, ">=", Rc::new(|args: &[Value]| fold_cmp(args, |a, b| a >= b)));
    register(&mut vars, "<", Rc::new(|args: &[Value]| fold_cmp(args, |a, b| a < b)));
    register(&mut vars, "<=", Rc::new(|args: &[Value]| fold_cmp(args, |a, b| a <= b)));
    register(&mut vars, "=?", Rc::new(all_equal));
    register(&mut vars, "not", Rc::new(not));
    register(&mut vars, "head", Rc::new(head));
    register(&mut vars, "tail", Rc::new(tail));
    register(&mut vars, "list?", Rc::new(is_list));
    register(&mut vars, "length", Rc::new(length));
    register(&mut vars, "nth", Rc::new(nth));
    register(&mut vars, "concat", Rc::new(concat));
    register(&mut vars, "map", Rc::new(map));
    register(&mut vars, "filter", Rc::new(filter));
    register(&mut vars, "reduce", Rc::new(reduce));
    register(&mut vars, "begin", Rc::new(begin));
    vars
}

fn register(vars: &mut HashMap<String, Value>, name: &str, fp: Fp) {
    vars.insert(name.to_string(), Value::Proc(Rc::new(Procedure::builtin(fp))));
}

// the two numeric kinds; arithmetic stays integral until a float appears
#[derive(Copy, Clone)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn from_value(value: &Value) -> Result<Num, LispError> {
        match value {
            Value::Int(n) => Ok(Num::Int(*n)),
            Value::Float(f) => Ok(Num::Float(*f)),
            other => Err(LispError::Eval(format!("{} is not a number", other))),
        }
    }

    fn to_value(self) -> Value {
        match self {
            Num::Int(n) => Value::Int(n),
            Num::Float(f) => Value::Float(f),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(f) => f,
        }
    }

    fn checked(op: &str, result: Option<i64>) -> Result<Num, LispError> {
        result
            .map(Num::Int)
            .ok_or_else(|| LispError::Eval(format!("integer overflow in {}", op)))
    }

    fn add(self, other: Num) -> Result<Num, LispError> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => Self::checked("+", a.checked_add(b)),
            _ => Ok(Num::Float(self.as_f64() + other.as_f64())),
        }
    }

    fn sub(self, other: Num) -> Result<Num, LispError> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => Self::checked("-", a.checked_sub(b)),
            _ => Ok(Num::Float(self.as_f64() - other.as_f64())),
        }
    }

    fn mul(self, other: Num) -> Result<Num, LispError> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => Self::checked("*", a.checked_mul(b)),
            _ => Ok(Num::Float(self.as_f64() * other.as_f64())),
        }
    }

    fn neg(self) -> Result<Num, LispError> {
        match self {
            Num::Int(n) => Self::checked("-", n.checked_neg()),
            Num::Float(f) => Ok(Num::Float(-f)),
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Num::Int(n) => n == 0,
            Num::Float(f) => f == 0.0,
        }
    }
}

impl PartialEq for Num {
    fn eq(&self, other: &Num) -> bool {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => a == b,
            (a, b) => a.as_f64() == b.as_f64(),
        }
    }
}

impl PartialOrd for Num {
    fn partial_cmp(&self, other: &Num) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => a.partial_cmp(b),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

fn numbers(args: &[Value]) -> Result<Vec<Num>, LispError> {
    args.iter().map(Num::from_value).collect()
}

fn add(args: &[Value]) -> Result<Value, LispError> {
    let mut acc = Num::Int(0);
    for n in numbers(args)? {
        acc = acc.add(n)?;
    }
    Ok(acc.to_value())
}

// unary minus negates; otherwise the first operand minus the sum of the rest
fn sub(args: &[Value]) -> Result<Value, LispError> {
    let nums = numbers(args)?;
    match nums.split_first() {
        None => Err(LispError::Eval("- takes at least one operand".to_string())),
        Some((first, [])) => Ok(first.neg()?.to_value()),
        Some((first, rest)) => {
            let mut total = Num::Int(0);
            for n in rest {
                total = total.add(*n)?;
            }
            Ok(first.sub(total)?.to_value())
        }
    }
}

fn mul(args: &[Value]) -> Result<Value, LispError> {
    let mut acc = Num::Int(1);
    for n in numbers(args)? {
        acc = acc.mul(n)?;
    }
    Ok(acc.to_value())
}

// the first operand divided by the product of the rest, always a float;
// a single operand passes through untouched
fn div(args: &[Value]) -> Result<Value, LispError> {
    let nums = numbers(args)?;
    match nums.split_first() {
        None => Err(LispError::Eval("/ takes at least one operand".to_string())),
        Some((first, [])) => Ok(first.to_value()),
        Some((first, rest)) => {
            let mut divisor = Num::Int(1);
            for n in rest {
                divisor = divisor.mul(*n)?;
            }
            if divisor.is_zero() {
                return Err(LispError::Eval("division by zero".to_string()));
            }
            Ok(Value::Float(first.as_f64() / divisor.as_f64()))
        }
    }
}

// the relation must hold across every consecutive operand pair
fn fold_cmp<F>(args: &[Value], op: F) -> Result<Value, LispError>
where
    F: Fn(&Num, &Num) -> bool,
{
    let nums = numbers(args)?;
    if nums.is_empty() {
        return Err(LispError::Eval(
            "comparison takes at least one operand".to_string(),
        ));
    }
    Ok(Value::Bool(nums.windows(2).all(|w| op(&w[0], &w[1]))))
}

fn all_equal(args: &[Value]) -> Result<Value, LispError> {
    if args.is_empty() {
        return Err(LispError::Eval("=? takes at least one operand".to_string()));
    }
    Ok(Value::Bool(args.windows(2).all(|w| loose_eq(&w[0], &w[1]))))
}

// numeric kinds compare across; pairs and procedures by identity;
// mismatched kinds are unequal, never an error
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            match (Num::from_value(a), Num::from_value(b)) {
                (Ok(x), Ok(y)) => x == y,
                _ => false,
            }
        }
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Nil, Value::Nil) => true,
        (Value::Pair(x), Value::Pair(y)) => Rc::ptr_eq(x, y),
        (Value::Proc(x), Value::Proc(y)) => Rc::ptr_eq(x, y),
        _ => false,
    }
}

fn not(args: &[Value]) -> Result<Value, LispError> {
    match args {
        [value] => Ok(Value::Bool(!value.is_truthy())),
        _ => Err(LispError::Eval("not takes exactly one operand".to_string())),
    }
}

fn head(args: &[Value]) -> Result<Value, LispError> {
    match args {
        [Value::Pair(cell)] => Ok(cell.borrow().head.clone()),
        [other] => Err(LispError::Eval(format!("head of non-pair {}", other))),
        _ => Err(LispError::Eval("head takes exactly one operand".to_string())),
    }
}

fn tail(args: &[Value]) -> Result<Value, LispError> {
    match args {
        [Value::Pair(cell)] => Ok(cell.borrow().tail.clone()),
        [other] => Err(LispError::Eval(format!("tail of non-pair {}", other))),
        _ => Err(LispError::Eval("tail takes exactly one operand".to_string())),
    }
}

// Collect the cells of a proper list. Improper termination and cyclic
// chains (possible through tail mutation) are evaluation errors, not hangs.
fn list_cells(value: &Value) -> Result<Vec<Rc<RefCell<Pair>>>, LispError> {
    let mut cells = Vec::new();
    let mut seen: HashSet<*const RefCell<Pair>> = HashSet::new();
    let mut cursor = value.clone();
    loop {
        match cursor {
            Value::Nil => return Ok(cells),
            Value::Pair(cell) => {
                if !seen.insert(Rc::as_ptr(&cell)) {
                    return Err(LispError::Eval("cyclic list".to_string()));
                }
                let next = cell.borrow().tail.clone();
                cells.push(cell);
                cursor = next;
            }
            other => return Err(LispError::Eval(format!("{} is not a list", other))),
        }
    }
}

fn list_values(value: &Value) -> Result<Vec<Value>, LispError> {
    Ok(list_cells(value)?
        .iter()
        .map(|cell| cell.borrow().head.clone())
        .collect())
}

fn is_list(args: &[Value]) -> Result<Value, LispError> {
    match args {
        [value] => Ok(Value::Bool(list_cells(value).is_ok())),
        _ => Err(LispError::Eval("list? takes exactly one operand".to_string())),
    }
}

fn length(args: &[Value]) -> Result<Value, LispError> {
    match args {
        [value] => Ok(Value::Int(list_cells(value)?.len() as i64)),
        _ => Err(LispError::Eval("length takes exactly one operand".to_string())),
    }
}

// zero-indexed chain walk; tolerates an improper tail but not a short one
fn nth(args: &[Value]) -> Result<Value, LispError> {
    let (value, index) = match args {
        [value, Value::Int(index)] if *index >= 0 => (value, *index),
        [_, other] => {
            return Err(LispError::Eval(format!("invalid list index {}", other)));
        }
        _ => return Err(LispError::Eval("nth takes a list and an index".to_string())),
    };
    let mut cursor = value.clone();
    for _ in 0..index {
        cursor = match cursor {
            Value::Pair(cell) => cell.borrow().tail.clone(),
            other => return Err(LispError::Eval(format!("{} has no next element", other))),
        };
    }
    match cursor {
        Value::Pair(cell) => Ok(cell.borrow().head.clone()),
        other => Err(LispError::Eval(format!("{} has no head", other))),
    }
}

// a fresh copy of every consumed cell: the result never aliases an input
fn concat(args: &[Value]) -> Result<Value, LispError> {
    let mut values = Vec::new();
    for arg in args {
        values.extend(list_values(arg)?);
    }
    Ok(Value::list_from(values))
}

fn as_procedure(value: &Value, who: &str) -> Result<Rc<Procedure>, LispError> {
    match value {
        Value::Proc(p) => Ok(p.clone()),
        other => Err(LispError::Eval(format!(
            "{} expects a function, got {}",
            who, other
        ))),
    }
}

// builds a fresh result list; the input list is never mutated
fn map(args: &[Value]) -> Result<Value, LispError> {
    let (f, list) = match args {
        [f, list] => (f, list),
        _ => return Err(LispError::Eval("map takes a function and a list".to_string())),
    };
    let f = as_procedure(f, "map")?;
    let mut mapped = Vec::new();
    for value in list_values(list)? {
        mapped.push(f.call(vec![value])?);
    }
    Ok(Value::list_from(mapped))
}

fn filter(args: &[Value]) -> Result<Value, LispError> {
    let (f, list) = match args {
        [f, list] => (f, list),
        _ => {
            return Err(LispError::Eval(
                "filter takes a function and a list".to_string(),
            ))
        }
    };
    let f = as_procedure(f, "filter")?;
    let mut kept = Vec::new();
    for value in list_values(list)? {
        if f.call(vec![value.clone()])?.is_truthy() {
            kept.push(value);
        }
    }
    Ok(Value::list_from(kept))
}

fn reduce(args: &[Value]) -> Result<Value, LispError> {
    let (f, list, init) = match args {
        [f, list, init] => (f, list, init),
        _ => {
            return Err(LispError::Eval(
                "reduce takes a function, a list and an initial value".to_string(),
            ))
        }
    };
    let f = as_procedure(f, "reduce")?;
    let mut acc = init.clone();
    for value in list_values(list)? {
        acc = f.call(vec![acc, value])?;
    }
    Ok(acc)
}

fn begin(args: &[Value]) -> Result<Value, LispError> {
    match args.last() {
        Some(last) => Ok(last.clone()),
        None => Err(LispError::Eval("begin takes at least one operand".to_string())),
    }
}
