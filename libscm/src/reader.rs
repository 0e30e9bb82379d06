use crate::error::ParseError;
use crate::value::Value;
use lexers::{Scanner, SchemeTokenizer, Token};
use std::str::FromStr;

pub struct Reader;

impl Reader {
    /// Read one top-level expression and drop its tokens from `tokens`.
    ///
    /// Whatever follows the expression stays buffered, so calling `read`
    /// again yields the next expression on the same input.
    pub fn read<I>(tokens: &mut Scanner<I>) -> Result<Value, ParseError>
            where I: Iterator<Item=Token> {
        let expr = Self::read_expr(tokens);
        tokens.ignore();
        expr
    }

    pub fn is_exhausted<I>(tokens: &mut Scanner<I>) -> bool
            where I: Iterator<Item=Token> {
        tokens.is_exhausted()
    }

    fn read_expr<I>(tokens: &mut Scanner<I>) -> Result<Value, ParseError>
            where I: Iterator<Item=Token> {
        match tokens.next() {
            None                  => Err(ParseError::UnexpectedEOF),
            Some(Token::CParen)   => Err(ParseError::UnexpectedCParen),
            Some(Token::Atom(a))  => Ok(atom(a)),
            Some(Token::OParen)   => {
                let mut list = Vec::new();
                while tokens.peek() != Some(Token::CParen) { // None errors below
                    list.push(Self::read_expr(tokens)?);
                }
                tokens.next(); // get over that CParen
                Ok(Value::list(list))
            },
        }
    }
}

/// Integers first, then floats, anything else is a symbol.
pub fn atom(token: String) -> Value {
    if let Ok(n) = i64::from_str(&token) {
        Value::Int(n)
    } else if let Ok(n) = f64::from_str(&token) {
        Value::Float(n)
    } else {
        Value::Symbol(token)
    }
}

/// Read the first expression in `source`.
pub fn parse(source: &str) -> Result<Value, ParseError> {
    Reader::read(&mut SchemeTokenizer::scanner(source))
}

/// Read every expression in `source`.
pub fn parse_all(source: &str) -> Result<Vec<Value>, ParseError> {
    let mut tokens = SchemeTokenizer::scanner(source);
    let mut exprs = Vec::new();
    while !Reader::is_exhausted(&mut tokens) {
        exprs.push(Reader::read(&mut tokens)?);
    }
    Ok(exprs)
}
