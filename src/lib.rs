mod builtin;
mod env;
mod eval;
mod lexer;
mod parser;
mod procedure;
mod value;

pub use builtin::builtins;
pub use env::Env;
pub use eval::{eval, eval_str, LispError};
pub use lexer::{tokenize, Token};
pub use parser::{Expr, ParseError, Parser};
pub use procedure::{Fp, Procedure};
pub use value::{Pair, Value};

#[cfg(test)]
mod lexer_test;
#[cfg(test)]
mod parser_test;
#[cfg(test)]
mod builtin_test;
