use crate::env::Env;
use crate::error::{Arity, EvalErr};
use crate::eval::Interpreter;
use crate::value::Value;
use std::{fmt, ptr};
use std::rc::Rc;

pub type Fp = Rc<dyn Fn(&[Value]) -> Result<Value, EvalErr>>;

enum Body {
    Builtin { name: String, arity: Arity, fp: Fp },
    Lambda { params: Vec<String>, body: Value, env: Rc<Env> },
}

pub struct Procedure {
    body: Body,
}

impl PartialEq for Procedure {
    fn eq(&self, other: &Procedure) -> bool { ptr::eq(self, other) }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.body {
            Body::Builtin { name, .. } => write!(f, "#<procedure {}>", name),
            Body::Lambda { params, .. } => write!(f, "#<lambda ({})>", params.join(" ")),
        }
    }
}

impl Procedure {
    pub fn lambda(params: Vec<String>, body: Value, env: Rc<Env>) -> Procedure {
        Procedure { body: Body::Lambda { params, body, env } }
    }

    pub fn builtin<F>(name: &str, arity: Arity, fp: F) -> Procedure
            where F: Fn(&[Value]) -> Result<Value, EvalErr> + 'static {
        Procedure { body: Body::Builtin { name: name.to_string(), arity, fp: Rc::new(fp) } }
    }

    pub fn arity(&self) -> Arity {
        match &self.body {
            Body::Builtin { arity, .. } => *arity,
            Body::Lambda { params, .. } => Arity::Exactly(params.len()),
        }
    }

    pub fn name(&self) -> &str {
        match &self.body {
            Body::Builtin { name, .. } => name,
            Body::Lambda { .. } => "lambda",
        }
    }

    /// Invoke with already evaluated arguments.
    ///
    /// A closure call binds its parameters in a fresh frame whose outer link
    /// is the environment captured at definition time.
    pub fn call(&self, interp: &Interpreter, args: Vec<Value>) -> Result<Value, EvalErr> {
        if !self.arity().accepts(args.len()) {
            return Err(EvalErr::arity(self.name(), self.arity(), args.len()));
        }
        match &self.body {
            Body::Builtin { fp, .. } => fp(&args[..]),
            Body::Lambda { params, body, env } => {
                tracing::debug!(params = ?params, "calling closure");
                let frame = Env::nested(params.clone(), args, env.clone());
                interp.eval_in(body, &Rc::new(frame))
            }
        }
    }
}
