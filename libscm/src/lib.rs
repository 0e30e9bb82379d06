mod error;
mod value;
mod reader;
mod env;
mod procedure;
mod eval;
mod builtins;
mod math;
pub mod repl;

pub use error::{Arity, EvalErr, ParseError};
pub use value::Value;
pub use reader::{atom, parse, parse_all, Reader};
pub use env::Env;
pub use procedure::{Fp, Procedure};
pub use eval::{Interpreter, RecoveryHook, SpecialForm};
pub use builtins::builtins;
pub use lexers::{tokenize, Token};
