use pretty_assertions::assert_eq;

use crate::lexer::Token::{CParen, OParen};
use crate::lexer::{tokenize, Token};

fn atom(s: &str) -> Token {
    Token::Atom(s.to_string())
}

#[test]
fn nested_expression() {
    assert_eq!(
        tokenize("(cat (dog (tomato)))"),
        vec![
            OParen,
            atom("cat"),
            OParen,
            atom("dog"),
            OParen,
            atom("tomato"),
            CParen,
            CParen,
            CParen,
        ]
    );
}

#[test]
fn minus_binds_to_literals() {
    assert_eq!(tokenize("-5"), vec![atom("-5")]);
    assert_eq!(
        tokenize("(- 5 3)"),
        vec![OParen, atom("-"), atom("5"), atom("3"), CParen]
    );
    assert_eq!(tokenize("-"), vec![atom("-")]);
}

#[test]
fn comments_run_to_end_of_line() {
    assert_eq!(
        tokenize("(+ 1 2) # add\n(+ 3 4)"),
        vec![
            OParen,
            atom("+"),
            atom("1"),
            atom("2"),
            CParen,
            OParen,
            atom("+"),
            atom("3"),
            atom("4"),
            CParen,
        ]
    );
    // a comment terminates the pending atom like a space would
    assert_eq!(tokenize("abc#ignored\ndef"), vec![atom("abc"), atom("def")]);
    assert_eq!(tokenize("x # trailing comment"), vec![atom("x")]);
}

#[test]
fn double_star_is_its_own_token() {
    assert_eq!(
        tokenize("(** 2 8)"),
        vec![OParen, atom("**"), atom("2"), atom("8"), CParen]
    );
    assert_eq!(tokenize("2**8"), vec![atom("2"), atom("**"), atom("8")]);
    assert_eq!(
        tokenize("(* 2 8)"),
        vec![OParen, atom("*"), atom("2"), atom("8"), CParen]
    );
}

#[test]
fn dots_accumulate() {
    assert_eq!(
        tokenize("3.25 .5 1.2.3.4"),
        vec![atom("3.25"), atom(".5"), atom("1.2.3.4")]
    );
}

#[test]
fn whitespace_runs_and_trailing_buffer() {
    assert_eq!(tokenize("  a   b \n c"), vec![atom("a"), atom("b"), atom("c")]);
    assert_eq!(tokenize(""), Vec::<Token>::new());
    assert_eq!(tokenize("x-"), vec![atom("x-")]);
}
