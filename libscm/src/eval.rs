use crate::builtins::builtins;
use crate::env::Env;
use crate::error::{Arity, EvalErr};
use crate::procedure::Procedure;
use crate::reader::parse_all;
use crate::value::Value;
use std::rc::Rc;

/// Host callback run when a variable is unbound everywhere on the chain.
///
/// It gets the missing name and may bind it (usually with
/// `add_global_var`) before returning `Ok`, or return `Err` to abort the
/// evaluation.
pub type RecoveryHook = Rc<dyn Fn(&Interpreter, &str) -> Result<(), EvalErr>>;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SpecialForm {
    Quote,
    If,
    Set,
    Define,
    Lambda,
    Begin,
}

impl SpecialForm {
    pub fn from_symbol(sym: &str) -> Option<SpecialForm> {
        match sym {
            "quote" => Some(SpecialForm::Quote),
            "if" => Some(SpecialForm::If),
            "set!" => Some(SpecialForm::Set),
            "define" => Some(SpecialForm::Define),
            "lambda" => Some(SpecialForm::Lambda),
            "begin" => Some(SpecialForm::Begin),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            SpecialForm::Quote => "quote",
            SpecialForm::If => "if",
            SpecialForm::Set => "set!",
            SpecialForm::Define => "define",
            SpecialForm::Lambda => "lambda",
            SpecialForm::Begin => "begin",
        }
    }

    fn operands(&self) -> Arity {
        match self {
            SpecialForm::Quote => Arity::Exactly(1),
            SpecialForm::If => Arity::Exactly(3),
            SpecialForm::Set | SpecialForm::Define | SpecialForm::Lambda => Arity::Exactly(2),
            SpecialForm::Begin => Arity::AtLeast(1),
        }
    }
}

/// A list expression with its shape checked, ready to evaluate.
enum Form<'a> {
    Quote(&'a Value),
    If { test: &'a Value, conseq: &'a Value, alt: &'a Value },
    Set { var: &'a str, expr: &'a Value },
    Define { var: &'a str, expr: &'a Value },
    Lambda { params: Vec<String>, body: &'a Value },
    Begin(&'a [Value]),
    Application(&'a [Value]),
}

fn target(form: SpecialForm, var: &Value) -> Result<&str, EvalErr> {
    var.as_symbol().ok_or_else(|| EvalErr::InvalidForm(
        format!("{} target must be a symbol, got {}", form.keyword(), var)))
}

impl<'a> Form<'a> {
    fn classify(list: &'a [Value]) -> Result<Form<'a>, EvalErr> {
        let form = match list.first().and_then(Value::as_symbol).and_then(SpecialForm::from_symbol) {
            Some(form) => form,
            None => return Ok(Form::Application(list)),
        };
        let operands = &list[1..];
        if !form.operands().accepts(operands.len()) {
            return Err(EvalErr::arity(form.keyword(), form.operands(), operands.len()));
        }
        Ok(match form {
            SpecialForm::Quote => Form::Quote(&operands[0]),
            SpecialForm::If => Form::If {
                test: &operands[0], conseq: &operands[1], alt: &operands[2],
            },
            SpecialForm::Set => Form::Set { var: target(form, &operands[0])?, expr: &operands[1] },
            SpecialForm::Define => Form::Define { var: target(form, &operands[0])?, expr: &operands[1] },
            SpecialForm::Lambda => {
                let params = operands[0].as_list().ok_or_else(|| EvalErr::InvalidForm(
                    format!("lambda parameters must be a list, got {}", operands[0])))?;
                let params = params.iter()
                    .map(|p| p.as_symbol().map(str::to_string).ok_or_else(|| EvalErr::InvalidForm(
                        format!("lambda parameter must be a symbol, got {}", p))))
                    .collect::<Result<Vec<_>, _>>()?;
                Form::Lambda { params, body: &operands[1] }
            }
            SpecialForm::Begin => Form::Begin(operands),
        })
    }
}

/// An interpreter instance: the global environment plus the recovery hook.
///
/// Instances are independent of each other; nothing is process-global.
pub struct Interpreter {
    global: Rc<Env>,
    recovery: Option<RecoveryHook>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter {
            global: Rc::new(Env::with_bindings(builtins())),
            recovery: None,
        }
    }

    pub fn global(&self) -> &Rc<Env> {
        &self.global
    }

    /// Bind or overwrite `name` in the global environment.
    pub fn add_global_var(&self, name: &str, value: Value) {
        tracing::debug!(name, "adding global");
        self.global.define(name, value);
    }

    /// Expose a host function as a global procedure.
    pub fn add_global_fn<F>(&self, name: &str, arity: Arity, f: F)
            where F: Fn(&[Value]) -> Result<Value, EvalErr> + 'static {
        self.add_global_var(name, Value::Proc(Rc::new(Procedure::builtin(name, arity, f))));
    }

    pub fn set_err_handler<F>(&mut self, hook: F)
            where F: Fn(&Interpreter, &str) -> Result<(), EvalErr> + 'static {
        self.recovery = Some(Rc::new(hook));
    }

    pub fn clear_err_handler(&mut self) {
        self.recovery = None;
    }

    // Run the recovery hook at most once, then retry from the same frame.
    fn recover<T, F>(&self, sym: &str, attempt: F) -> Result<T, EvalErr>
            where F: Fn() -> Option<T> {
        if let Some(found) = attempt() {
            return Ok(found);
        }
        let hook = match self.recovery {
            Some(ref hook) => hook.clone(),
            None => return Err(EvalErr::UnboundVariable(sym.to_string())),
        };
        tracing::debug!(sym, "invoking recovery hook");
        hook(self, sym)?;
        attempt().ok_or_else(|| EvalErr::UnboundVariable(sym.to_string()))
    }

    pub fn lookup(&self, sym: &str, env: &Env) -> Result<Value, EvalErr> {
        self.recover(sym, || env.lookup(sym))
    }

    fn assign(&self, sym: &str, value: Value, env: &Env) -> Result<(), EvalErr> {
        let frame = self.recover(sym, || env.find(sym))?;
        frame.assign(sym, value)
    }

    /// Evaluate in the global environment.
    pub fn eval(&self, expr: &Value) -> Result<Value, EvalErr> {
        self.eval_in(expr, &self.global)
    }

    /// Parse and evaluate every expression in `source`, returning the last result.
    pub fn eval_str(&self, source: &str) -> Result<Value, EvalErr> {
        let mut result = Value::Void;
        for expr in parse_all(source)? {
            result = self.eval(&expr)?;
        }
        Ok(result)
    }

    pub fn apply(&self, proc: &Value, args: Vec<Value>) -> Result<Value, EvalErr> {
        match proc {
            Value::Proc(p) => p.call(self, args),
            other => Err(EvalErr::TypeError(format!("{} is not a procedure", other))),
        }
    }

    pub fn eval_in(&self, expr: &Value, env: &Rc<Env>) -> Result<Value, EvalErr> {
        tracing::trace!(%expr, "eval");
        let list = match expr {
            Value::Symbol(sym) => return self.lookup(sym, env),
            Value::List(list) => list,
            other => return Ok(other.clone()),
        };
        match Form::classify(list)? {
            Form::Quote(exp) => Ok(exp.clone()),
            Form::If { test, conseq, alt } => {
                let branch = if self.eval_in(test, env)?.is_truthy() { conseq } else { alt };
                self.eval_in(branch, env)
            }
            Form::Set { var, expr } => {
                let value = self.eval_in(expr, env)?;
                tracing::debug!(var, "set!");
                self.assign(var, value, env)?;
                Ok(Value::Void)
            }
            Form::Define { var, expr } => {
                let value = self.eval_in(expr, env)?;
                tracing::debug!(var, "define");
                env.define(var, value);
                Ok(Value::Void)
            }
            Form::Lambda { params, body } => Ok(Value::Proc(Rc::new(
                Procedure::lambda(params, body.clone(), env.clone())))),
            Form::Begin(exprs) => {
                let mut result = Value::Void;
                for exp in exprs {
                    result = self.eval_in(exp, env)?;
                }
                Ok(result)
            }
            Form::Application(exprs) => {
                let mut values = Vec::with_capacity(exprs.len());
                for exp in exprs {
                    values.push(self.eval_in(exp, env)?);
                }
                if values.is_empty() {
                    return Err(EvalErr::TypeError(format!("cannot apply {}", expr)));
                }
                let proc = values.remove(0);
                self.apply(&proc, values)
            }
        }
    }
}
