use std::fmt;

#[derive(thiserror::Error, PartialEq, Debug, Clone)]
pub enum ParseError {
    #[error("unexpected EOF while reading")]
    UnexpectedEOF,
    #[error("unexpected )")]
    UnexpectedCParen,
}

/// How many arguments a procedure or special form takes.
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    Between(usize, usize),
}

impl Arity {
    pub fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exactly(e) => n == e,
            Arity::AtLeast(lo) => n >= lo,
            Arity::Between(lo, hi) => lo <= n && n <= hi,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
            Arity::Between(lo, hi) => write!(f, "{} to {}", lo, hi),
        }
    }
}

#[derive(thiserror::Error, PartialEq, Debug, Clone)]
pub enum EvalErr {
    #[error("syntax error: {0}")]
    Parse(#[from] ParseError),
    #[error("unbound variable: {0}")]
    UnboundVariable(String),
    #[error("{callee} expects {expected} argument(s), got {got}")]
    ArityMismatch { callee: String, expected: Arity, got: usize },
    #[error("invalid form: {0}")]
    InvalidForm(String),
    #[error("type error: {0}")]
    TypeError(String),
    #[error("domain error: {0}")]
    DomainError(String),
    /// Raised by host code (usually a recovery hook) to stop evaluation.
    #[error("aborted: {0}")]
    Aborted(String),
}

impl EvalErr {
    pub(crate) fn arity(callee: &str, expected: Arity, got: usize) -> EvalErr {
        EvalErr::ArityMismatch { callee: callee.to_string(), expected, got }
    }
}
