use lexers::Scanner;

/// A lexical unit: parens are structural, everything else is an
/// uninterpreted atom the parser resolves.
#[derive(Clone, PartialEq, Debug)]
pub enum Token {
    OParen,
    CParen,
    Atom(String),
}

/// Split source text into tokens.
///
/// `#` starts a line comment. Parens, spaces and newlines delimit atoms; a
/// `**` pair forms its own token. Everything else accumulates, so `-5` and
/// `1.2.3.4` each scan as a single atom while `-` followed by a space
/// stands alone.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut src = Scanner::new(source.chars());
    let mut out = Vec::new();
    let mut buf = String::new();
    while let Some(ch) = src.next() {
        match ch {
            // the newline stays put so it can terminate the pending atom
            '#' => {
                while let Some(nx) = src.peek() {
                    if nx == '\n' {
                        break;
                    }
                    src.next();
                }
            }
            ' ' | '\n' => flush(&mut buf, &mut out),
            '(' => {
                flush(&mut buf, &mut out);
                out.push(Token::OParen);
            }
            ')' => {
                flush(&mut buf, &mut out);
                out.push(Token::CParen);
            }
            '*' if src.peek() == Some('*') => {
                src.next();
                flush(&mut buf, &mut out);
                out.push(Token::Atom("**".to_string()));
            }
            _ => buf.push(ch),
        }
    }
    flush(&mut buf, &mut out);
    out
}

fn flush(buf: &mut String, out: &mut Vec<Token>) {
    if !buf.is_empty() {
        out.push(Token::Atom(std::mem::take(buf)));
    }
}
