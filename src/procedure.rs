use std::fmt;
use std::rc::Rc;

use crate::env::Env;
use crate::eval::{eval, LispError};
use crate::parser::Expr;
use crate::value::Value;

pub type Fp = Rc<dyn Fn(&[Value]) -> Result<Value, LispError>>;

enum Body {
    Lisp(Rc<Expr>),
    Builtin(Fp),
}

/// A callable value: a user closure (parameter names, body and the
/// environment captured when the function form was evaluated) or a builtin
/// primitive.
pub struct Procedure {
    params: Vec<String>,
    body: Body,
    env: Option<Rc<Env>>,
}

impl Procedure {
    pub fn closure(params: Vec<String>, body: Rc<Expr>, env: Rc<Env>) -> Procedure {
        Procedure {
            params,
            body: Body::Lisp(body),
            env: Some(env),
        }
    }

    pub fn builtin(fp: Fp) -> Procedure {
        Procedure {
            params: Vec::new(),
            body: Body::Builtin(fp),
            env: None,
        }
    }

    /// Apply to already-evaluated arguments. Closure calls require an exact
    /// arity match and bind parameters in a fresh child of the captured
    /// environment, never the caller's.
    pub fn call(&self, args: Vec<Value>) -> Result<Value, LispError> {
        match &self.body {
            Body::Builtin(fp) => fp(&args),
            Body::Lisp(body) => {
                if args.len() != self.params.len() {
                    return Err(LispError::Eval(format!(
                        "expected {} arguments, got {}",
                        self.params.len(),
                        args.len()
                    )));
                }
                let env = Env::nested(self.params.clone(), args, self.env.clone());
                eval(body, &Rc::new(env))
            }
        }
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.body {
            Body::Lisp(_) => write!(f, "(function ({}) ...)", self.params.join(" ")),
            Body::Builtin(_) => write!(f, "#<builtin>"),
        }
    }
}
