use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::lexer::tokenize;
use crate::parser::{Expr, ParseError, Parser};

fn sym(s: &str) -> Expr {
    Expr::Symbol(s.to_string())
}

#[test]
fn round_trip_nesting() {
    let parsed = Parser::parse(&tokenize("(cat (dog (tomato)))")).unwrap();
    assert_eq!(
        parsed,
        Expr::Call(vec![
            sym("cat"),
            Expr::Call(vec![sym("dog"), Expr::Call(vec![sym("tomato")])]),
        ])
    );
}

#[test]
fn numeric_promotion_is_best_effort() {
    assert_eq!(Parser::parse_str("8").unwrap(), Expr::Int(8));
    assert_eq!(Parser::parse_str("-5.32").unwrap(), Expr::Float(-5.32));
    assert_eq!(Parser::parse_str("1.2.3.4").unwrap(), sym("1.2.3.4"));
    assert_eq!(Parser::parse_str("x").unwrap(), sym("x"));
}

#[test]
fn parenthesis_validation() {
    assert_eq!(Parser::parse_str("(+ 1 2"), Err(ParseError::UnbalancedParens));
    assert_eq!(Parser::parse_str("+ 1 2)"), Err(ParseError::UnbalancedParens));
    assert_eq!(Parser::parse_str("+ 1 2"), Err(ParseError::MissingOParen));
    assert_eq!(Parser::parse_str(") ("), Err(ParseError::MissingOParen));
    assert_eq!(Parser::parse_str(""), Err(ParseError::UnexpectedEof));
}

#[test]
fn define_shapes() {
    assert_eq!(
        Parser::parse_str("(define x 5)").unwrap(),
        Expr::Define {
            name: "x".to_string(),
            value: Box::new(Expr::Int(5)),
        }
    );
    // the shorthand rewrites to a function binding at parse time
    assert_eq!(
        Parser::parse_str("(define (id x) x)").unwrap(),
        Expr::Define {
            name: "id".to_string(),
            value: Box::new(Expr::Function {
                params: vec!["x".to_string()],
                body: Rc::new(sym("x")),
            }),
        }
    );
    assert_eq!(
        Parser::parse_str("(define 5 5)"),
        Err(ParseError::InvalidName("5".to_string()))
    );
    assert_eq!(Parser::parse_str("(define x)"), Err(ParseError::Malformed("define")));
    assert_eq!(
        Parser::parse_str("(define x 5 6)"),
        Err(ParseError::Malformed("define"))
    );
    assert_eq!(
        Parser::parse_str("(define () 5)"),
        Err(ParseError::Malformed("define"))
    );
    assert_eq!(
        Parser::parse_str("(define (f 5) 1)"),
        Err(ParseError::InvalidName("5".to_string()))
    );
}

#[test]
fn function_shapes() {
    assert_eq!(
        Parser::parse_str("(function (x y) (+ x y))").unwrap(),
        Expr::Function {
            params: vec!["x".to_string(), "y".to_string()],
            body: Rc::new(Expr::Call(vec![sym("+"), sym("x"), sym("y")])),
        }
    );
    // lambda is an alias
    assert_eq!(
        Parser::parse_str("(lambda () 1)").unwrap(),
        Expr::Function {
            params: vec![],
            body: Rc::new(Expr::Int(1)),
        }
    );
    assert_eq!(
        Parser::parse_str("(function x x)"),
        Err(ParseError::Malformed("function"))
    );
    assert_eq!(
        Parser::parse_str("(function (x 7) x)"),
        Err(ParseError::InvalidName("7".to_string()))
    );
    assert_eq!(
        Parser::parse_str("(function (x) x x)"),
        Err(ParseError::Malformed("function"))
    );
}

#[test]
fn special_form_shapes() {
    assert_eq!(
        Parser::parse_str("(if @t 1 2)").unwrap(),
        Expr::If {
            cond: Box::new(sym("@t")),
            then: Box::new(Expr::Int(1)),
            alt: Box::new(Expr::Int(2)),
        }
    );
    assert_eq!(Parser::parse_str("(if @t 1)"), Err(ParseError::Malformed("if")));
    assert_eq!(Parser::parse_str("(del x)").unwrap(), Expr::Del("x".to_string()));
    assert_eq!(Parser::parse_str("(del 5)"), Err(ParseError::Malformed("del")));
    assert_eq!(
        Parser::parse_str("(let ((x 5)) x)").unwrap(),
        Expr::Let {
            bindings: vec![("x".to_string(), Expr::Int(5))],
            body: Box::new(sym("x")),
        }
    );
    assert_eq!(Parser::parse_str("(let (x 5) x)"), Err(ParseError::Malformed("let")));
    assert_eq!(
        Parser::parse_str("(set! x 5)").unwrap(),
        Expr::Set {
            name: "x".to_string(),
            value: Box::new(Expr::Int(5)),
        }
    );
    assert_eq!(Parser::parse_str("(set! 5 5)"), Err(ParseError::Malformed("set!")));
}

#[test]
fn binding_forms_validate_at_any_depth() {
    assert_eq!(
        Parser::parse_str("(list (define x))"),
        Err(ParseError::Malformed("define"))
    );
}

#[test]
fn empty_and_trailing_forms() {
    assert_eq!(Parser::parse_str("()").unwrap(), Expr::Call(vec![]));
    // tokens past the first complete expression are ignored
    assert_eq!(
        Parser::parse_str("(+ 1 1) (+ 2 2)").unwrap(),
        Expr::Call(vec![sym("+"), Expr::Int(1), Expr::Int(1)])
    );
}
