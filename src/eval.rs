use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace};

use crate::env::Env;
use crate::parser::{Expr, ParseError, Parser};
use crate::procedure::Procedure;
use crate::value::Value;

/// The single error category of the language: every failure is a syntax,
/// name-resolution or evaluation error. Errors propagate unchanged to the
/// embedding loop; side effects applied before the failure remain.
#[derive(Clone, PartialEq, Debug, Error)]
pub enum LispError {
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),
    #[error("name '{0}' is not defined")]
    Name(String),
    #[error("evaluation error: {0}")]
    Eval(String),
}

/// Tokenize, parse and evaluate `source` in `env`.
pub fn eval_str(source: &str, env: &Rc<Env>) -> Result<Value, LispError> {
    let expr = Parser::parse_str(source)?;
    debug!(?expr, "parsed");
    eval(&expr, env)
}

/// Evaluate a parsed expression. Recursion depth is bounded only by the
/// host stack; runaway user recursion aborts the process.
pub fn eval(expr: &Expr, env: &Rc<Env>) -> Result<Value, LispError> {
    match expr {
        Expr::Int(n) => Ok(Value::Int(*n)),
        Expr::Float(f) => Ok(Value::Float(*f)),
        Expr::Symbol(name) => env.get(name),
        Expr::Define { name, value } => {
            let value = eval(value, env)?;
            env.define(name, value.clone());
            Ok(value)
        }
        Expr::Function { params, body } => Ok(Value::Proc(Rc::new(Procedure::closure(
            params.clone(),
            body.clone(),
            env.clone(),
        )))),
        Expr::And(ops) => {
            for op in ops {
                if !eval(op, env)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }
        Expr::Or(ops) => {
            for op in ops {
                if eval(op, env)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        Expr::If { cond, then, alt } => {
            if eval(cond, env)?.is_truthy() {
                eval(then, env)
            } else {
                eval(alt, env)
            }
        }
        Expr::Pair(ops) => match &ops[..] {
            [head, tail] => {
                let head = eval(head, env)?;
                let tail = eval(tail, env)?;
                Ok(Value::pair(head, tail))
            }
            _ => Err(LispError::Eval(format!(
                "pair takes 2 operands, got {}",
                ops.len()
            ))),
        },
        Expr::List(ops) => {
            let items = ops
                .iter()
                .map(|op| eval(op, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::list_from(items))
        }
        Expr::Del(name) => env.delete(name),
        Expr::Let { bindings, body } => {
            let scope = Rc::new(Env::nested(Vec::new(), Vec::new(), Some(env.clone())));
            for (name, value) in bindings {
                // binding values see the outer scope, not each other
                let value = eval(value, env)?;
                scope.define(name, value);
            }
            eval(body, &scope)
        }
        Expr::Set { name, value } => {
            let value = eval(value, env)?;
            env.set_existing(name, value.clone())?;
            Ok(value)
        }
        Expr::Call(items) => {
            let (head, args) = match items.split_first() {
                Some(split) => split,
                None => return Err(LispError::Eval("nothing to apply in ()".to_string())),
            };
            // the head is evaluated exactly once; its errors propagate as-is
            let callee = eval(head, env)?;
            let mut evaluated = Vec::with_capacity(args.len());
            for arg in args {
                evaluated.push(eval(arg, env)?);
            }
            match callee {
                Value::Proc(procedure) => {
                    trace!(?procedure, argc = evaluated.len(), "apply");
                    procedure.call(evaluated)
                }
                other => Err(LispError::Eval(format!("{} is not callable", other))),
            }
        }
    }
}
