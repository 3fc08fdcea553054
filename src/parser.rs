use std::rc::Rc;

use thiserror::Error;

use crate::lexer::{tokenize, Token};

#[derive(Clone, PartialEq, Debug, Error)]
pub enum ParseError {
    #[error("unbalanced parentheses")]
    UnbalancedParens,
    #[error("multi-token expression must start with '('")]
    MissingOParen,
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("'{0}' is not a valid name")]
    InvalidName(String),
    #[error("malformed {0} form")]
    Malformed(&'static str),
}

/// A parsed expression. Special forms are classified here, once, so the
/// evaluator dispatches on a closed enum instead of re-testing head symbols.
#[derive(Clone, PartialEq, Debug)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Symbol(String),
    Define { name: String, value: Box<Expr> },
    Function { params: Vec<String>, body: Rc<Expr> },
    And(Vec<Expr>),
    Or(Vec<Expr>),
    If { cond: Box<Expr>, then: Box<Expr>, alt: Box<Expr> },
    Pair(Vec<Expr>),
    List(Vec<Expr>),
    Del(String),
    Let { bindings: Vec<(String, Expr)>, body: Box<Expr> },
    Set { name: String, value: Box<Expr> },
    Call(Vec<Expr>),
}

// raw tree produced by the descent, before special forms are classified
enum Sexp {
    Int(i64),
    Float(f64),
    Sym(String),
    List(Vec<Sexp>),
}

pub struct Parser;

impl Parser {
    pub fn parse_str(source: &str) -> Result<Expr, ParseError> {
        Self::parse(&tokenize(source))
    }

    /// Build one expression from the token sequence; tokens past the first
    /// complete expression are ignored.
    pub fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
        let opens = tokens.iter().filter(|t| **t == Token::OParen).count();
        let closes = tokens.iter().filter(|t| **t == Token::CParen).count();
        if opens != closes {
            return Err(ParseError::UnbalancedParens);
        }
        if tokens.len() > 1 && tokens[0] != Token::OParen {
            return Err(ParseError::MissingOParen);
        }
        match Self::parse_expression(tokens, 0)? {
            (Some(sexp), _) => Self::analyze(&sexp),
            // cannot happen once the counts above matched
            (None, _) => Err(ParseError::UnbalancedParens),
        }
    }

    // one expression starting at `index`; None signals a closing paren
    fn parse_expression(tokens: &[Token], index: usize) -> Result<(Option<Sexp>, usize), ParseError> {
        match tokens.get(index) {
            None => Err(ParseError::UnexpectedEof),
            Some(Token::CParen) => Ok((None, index + 1)),
            Some(Token::Atom(tok)) => Ok((Some(Self::atom(tok)), index + 1)),
            Some(Token::OParen) => {
                let mut items = Vec::new();
                let mut cursor = index + 1;
                loop {
                    let (element, next) = Self::parse_expression(tokens, cursor)?;
                    cursor = next;
                    match element {
                        Some(e) => items.push(e),
                        None => break,
                    }
                }
                Ok((Some(Sexp::List(items)), cursor))
            }
        }
    }

    // best-effort numeric promotion: integer, else float, else symbol
    fn atom(token: &str) -> Sexp {
        if let Ok(n) = token.parse::<i64>() {
            Sexp::Int(n)
        } else if let Ok(f) = token.parse::<f64>() {
            Sexp::Float(f)
        } else {
            Sexp::Sym(token.to_string())
        }
    }

    fn analyze(sexp: &Sexp) -> Result<Expr, ParseError> {
        let items = match sexp {
            Sexp::Int(n) => return Ok(Expr::Int(*n)),
            Sexp::Float(f) => return Ok(Expr::Float(*f)),
            Sexp::Sym(s) => return Ok(Expr::Symbol(s.clone())),
            Sexp::List(items) => &items[..],
        };
        match items.first() {
            Some(Sexp::Sym(head)) => match head.as_str() {
                "define" => Self::analyze_define(items),
                "function" | "lambda" => Self::analyze_function(items),
                "and" => Ok(Expr::And(Self::analyze_all(&items[1..])?)),
                "or" => Ok(Expr::Or(Self::analyze_all(&items[1..])?)),
                "if" => match items {
                    [_, cond, then, alt] => Ok(Expr::If {
                        cond: Box::new(Self::analyze(cond)?),
                        then: Box::new(Self::analyze(then)?),
                        alt: Box::new(Self::analyze(alt)?),
                    }),
                    _ => Err(ParseError::Malformed("if")),
                },
                "pair" => Ok(Expr::Pair(Self::analyze_all(&items[1..])?)),
                "list" => Ok(Expr::List(Self::analyze_all(&items[1..])?)),
                "del" => match items {
                    [_, Sexp::Sym(name)] => Ok(Expr::Del(name.clone())),
                    _ => Err(ParseError::Malformed("del")),
                },
                "let" => Self::analyze_let(items),
                "set!" => match items {
                    [_, Sexp::Sym(name), value] => Ok(Expr::Set {
                        name: name.clone(),
                        value: Box::new(Self::analyze(value)?),
                    }),
                    _ => Err(ParseError::Malformed("set!")),
                },
                _ => Ok(Expr::Call(Self::analyze_all(items)?)),
            },
            _ => Ok(Expr::Call(Self::analyze_all(items)?)),
        }
    }

    fn analyze_all(items: &[Sexp]) -> Result<Vec<Expr>, ParseError> {
        items.iter().map(Self::analyze).collect()
    }

    // (define name value) or the (define (name p1 ...) body) shorthand,
    // which rewrites to a function binding here rather than in the evaluator
    fn analyze_define(items: &[Sexp]) -> Result<Expr, ParseError> {
        let (target, value) = match items {
            [_, target, value] => (target, value),
            _ => return Err(ParseError::Malformed("define")),
        };
        match target {
            Sexp::Sym(name) => Ok(Expr::Define {
                name: name.clone(),
                value: Box::new(Self::analyze(value)?),
            }),
            Sexp::List(parts) => {
                let mut names = Self::names(parts)?;
                if names.is_empty() {
                    return Err(ParseError::Malformed("define"));
                }
                let name = names.remove(0);
                Ok(Expr::Define {
                    name,
                    value: Box::new(Expr::Function {
                        params: names,
                        body: Rc::new(Self::analyze(value)?),
                    }),
                })
            }
            other => Err(ParseError::InvalidName(Self::describe(other))),
        }
    }

    // (function (p1 ...) body)
    fn analyze_function(items: &[Sexp]) -> Result<Expr, ParseError> {
        match items {
            [_, Sexp::List(parts), body] => Ok(Expr::Function {
                params: Self::names(parts)?,
                body: Rc::new(Self::analyze(body)?),
            }),
            _ => Err(ParseError::Malformed("function")),
        }
    }

    // (let ((n1 e1) (n2 e2) ...) body)
    fn analyze_let(items: &[Sexp]) -> Result<Expr, ParseError> {
        let (bindings, body) = match items {
            [_, Sexp::List(bindings), body] => (bindings, body),
            _ => return Err(ParseError::Malformed("let")),
        };
        let mut bound = Vec::with_capacity(bindings.len());
        for binding in bindings {
            match binding {
                Sexp::List(pair) => match &pair[..] {
                    [Sexp::Sym(name), value] => bound.push((name.clone(), Self::analyze(value)?)),
                    _ => return Err(ParseError::Malformed("let")),
                },
                _ => return Err(ParseError::Malformed("let")),
            }
        }
        Ok(Expr::Let {
            bindings: bound,
            body: Box::new(Self::analyze(body)?),
        })
    }

    // a bound name is any token that did not promote to a number; parens
    // and spaces can never survive tokenization into a symbol
    fn names(parts: &[Sexp]) -> Result<Vec<String>, ParseError> {
        parts
            .iter()
            .map(|part| match part {
                Sexp::Sym(s) => Ok(s.clone()),
                other => Err(ParseError::InvalidName(Self::describe(other))),
            })
            .collect()
    }

    fn describe(sexp: &Sexp) -> String {
        match sexp {
            Sexp::Int(n) => n.to_string(),
            Sexp::Float(f) => format!("{:?}", f),
            Sexp::Sym(s) => s.clone(),
            Sexp::List(_) => "(...)".to_string(),
        }
    }
}
