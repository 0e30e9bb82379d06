use crate::error::EvalErr;
use crate::eval::Interpreter;
use crate::reader::Reader;
use crate::value::Value;
use lexers::{tokenize, Scanner};

pub const DEFAULT_PROMPT: &str = "scheme> ";
pub const PROMPT_VAR: &str = "LIBSCM_PROMPT";

#[derive(Clone, PartialEq, Debug)]
pub struct ReplConfig {
    pub prompt: String,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig { prompt: DEFAULT_PROMPT.to_string() }
    }
}

impl ReplConfig {
    /// Defaults, with the prompt overridden by `LIBSCM_PROMPT` when set.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut config = ReplConfig::default();
        if let Some(prompt) = lookup(PROMPT_VAR) {
            config.prompt = prompt;
        }
        config
    }
}

/// Read and evaluate every expression on `line`, passing each non-void
/// result to `emit`. The first error stops the rest of the line.
pub fn run_line<F>(interp: &Interpreter, line: &str, mut emit: F) -> Result<(), EvalErr>
        where F: FnMut(&Value) {
    let tokens = tokenize(line);
    tracing::debug!(tokens = ?tokens, "read line");
    let mut tokens = Scanner::new(tokens.into_iter());
    while !Reader::is_exhausted(&mut tokens) {
        let expr = Reader::read(&mut tokens)?;
        let value = interp.eval(&expr)?;
        if !value.is_void() {
            emit(&value);
        }
    }
    Ok(())
}

///////////////////////////////////////////////////////////////////////////////
