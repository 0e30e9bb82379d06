#![deny(warnings)]

use crate::scanner::Scanner;
use std::fmt;


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Token {
    OParen,
    CParen,
    /// Any maximal run of characters that are neither whitespace nor parens.
    Atom(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::OParen => write!(f, "("),
            Token::CParen => write!(f, ")"),
            Token::Atom(a) => write!(f, "{}", a),
        }
    }
}

fn is_delimiter(c: &char) -> bool {
    c.is_whitespace() || *c == '(' || *c == ')'
}

/// Splits source text into parens and whitespace-separated atoms.
///
/// There is no string, comment or quote syntax: `"`, `;` and `'` are plain
/// atom characters.
pub struct SchemeTokenizer<I: Iterator<Item=char>>(Scanner<I>);

impl SchemeTokenizer<std::vec::IntoIter<char>> {
    pub fn scanner(source: &str) -> Scanner<Self> {
        Scanner::new(SchemeTokenizer(Scanner::from_str(source)))
    }
}

impl<I: Iterator<Item=char>> SchemeTokenizer<I> {
    pub fn new(source: I) -> Self {
        SchemeTokenizer(Scanner::new(source))
    }
}

impl<I: Iterator<Item=char>> Iterator for SchemeTokenizer<I> {
    type Item = Token;
    fn next(&mut self) -> Option<Self::Item> {
        self.0.skip_whitespace();
        if let Some(paren) = self.0.accept_if(|c| *c == '(' || *c == ')') {
            self.0.ignore();
            match paren {
                '(' => Some(Token::OParen),
                _ => Some(Token::CParen),
            }
        } else if self.0.until(is_delimiter) {
            Some(Token::Atom(self.0.extract_string()))
        } else {
            None
        }
    }
}

pub fn tokenize(source: &str) -> Vec<Token> {
    SchemeTokenizer::new(source.chars()).collect()
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{tokenize, SchemeTokenizer, Token};

    fn atom(s: &str) -> Token { Token::Atom(s.to_string()) }

    #[test]
    fn tokenize_nested() {
        let tokens = tokenize("(define r (* 2 3.5))");
        assert_eq!(tokens, vec![
            Token::OParen, atom("define"), atom("r"),
            Token::OParen, atom("*"), atom("2"), atom("3.5"),
            Token::CParen, Token::CParen,
        ]);
    }

    #[test]
    fn parens_need_no_spacing() {
        let tokens = tokenize("((a)b)");
        assert_eq!(tokens, vec![
            Token::OParen, Token::OParen, atom("a"), Token::CParen,
            atom("b"), Token::CParen,
        ]);
    }

    #[test]
    fn no_special_characters() {
        let tokens = tokenize("'x \"hi there\" ;c");
        assert_eq!(tokens, vec![
            atom("'x"), atom("\"hi"), atom("there\""), atom(";c"),
        ]);
    }

    #[test]
    fn whitespace_only() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\r\n ").is_empty());
    }

    #[test]
    fn lazy_scanner_matches_eager() {
        let src = "(+ 1 2)\n(car (list x y))";
        let lazy: Vec<Token> = SchemeTokenizer::scanner(src).collect();
        assert_eq!(lazy, tokenize(src));
    }
}
