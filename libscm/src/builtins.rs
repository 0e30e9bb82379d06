use crate::error::{Arity, EvalErr};
use crate::math;
use crate::procedure::Procedure;
use crate::value::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

pub(crate) fn type_err(name: &str, expected: &str, got: &Value) -> EvalErr {
    EvalErr::TypeError(format!("{} expects {}, got {} {}", name, expected, got.type_name(), got))
}

fn binop(name: &str, lhs: &Value, rhs: &Value,
         iop: fn(i64, i64) -> Option<i64>, fop: fn(f64, f64) -> f64) -> Result<Value, EvalErr> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => iop(*a, *b)
            .map(Value::Int)
            .ok_or_else(|| EvalErr::DomainError(format!("integer overflow in {}", name))),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(fop(a, b))),
            (None, _) => Err(type_err(name, "numbers", lhs)),
            (_, None) => Err(type_err(name, "numbers", rhs)),
        },
    }
}

pub(crate) fn foldop(name: &str, base: Value, args: &[Value],
          iop: fn(i64, i64) -> Option<i64>, fop: fn(f64, f64) -> f64) -> Result<Value, EvalErr> {
    args.iter().try_fold(base, |acc, arg| binop(name, &acc, arg, iop, fop))
}

fn divide(lhs: &Value, rhs: &Value) -> Result<Value, EvalErr> {
    match (lhs.as_f64(), rhs.as_f64()) {
        (Some(_), Some(b)) if b == 0.0 => Err(EvalErr::DomainError(format!("division by zero"))),
        (Some(a), Some(b)) => Ok(Value::Float(a / b)),
        (None, _) => Err(type_err("/", "numbers", lhs)),
        (_, None) => Err(type_err("/", "numbers", rhs)),
    }
}

fn compare(name: &str, lhs: &Value, rhs: &Value) -> Result<Option<Ordering>, EvalErr> {
    match (lhs, rhs) {
        (Value::Symbol(a), Value::Symbol(b)) => Ok(Some(a.cmp(b))),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(_), Some(_)) => Ok(lhs.num_cmp(rhs)),
            (None, _) => Err(type_err(name, "comparable values", lhs)),
            (_, None) => Err(type_err(name, "comparable values", rhs)),
        },
    }
}

fn foldcmp(name: &str, args: &[Value], op: fn(Ordering) -> bool) -> Result<Value, EvalErr> {
    for win in args.windows(2) {
        match compare(name, &win[0], &win[1])? {
            Some(ord) if op(ord) => continue,
            _ => return Ok(Value::Bool(false)),
        }
    }
    Ok(Value::Bool(true))
}

fn list_arg<'a>(name: &str, arg: &'a Value) -> Result<&'a [Value], EvalErr> {
    arg.as_list().ok_or_else(|| type_err(name, "a list", arg))
}

fn car(args: &[Value]) -> Result<Value, EvalErr> {
    match list_arg("car", &args[0])? {
        [first, ..] => Ok(first.clone()),
        [] => Err(EvalErr::DomainError(format!("car of empty list"))),
    }
}

fn cdr(args: &[Value]) -> Result<Value, EvalErr> {
    match list_arg("cdr", &args[0])? {
        [_, rest @ ..] => Ok(Value::list(rest.to_vec())),
        [] => Err(EvalErr::DomainError(format!("cdr of empty list"))),
    }
}

fn cons(args: &[Value]) -> Result<Value, EvalErr> {
    let tail = list_arg("cons", &args[1])?;
    let mut list = Vec::with_capacity(tail.len() + 1);
    list.push(args[0].clone());
    list.extend(tail.iter().cloned());
    Ok(Value::list(list))
}

fn append(args: &[Value]) -> Result<Value, EvalErr> {
    let mut list = Vec::new();
    for arg in args {
        list.extend(list_arg("append", arg)?.iter().cloned());
    }
    Ok(Value::list(list))
}

fn length(args: &[Value]) -> Result<Value, EvalErr> {
    let len = match &args[0] {
        Value::List(l) => l.len(),
        Value::Symbol(s) => s.chars().count(),
        other => return Err(type_err("length", "a list", other)),
    };
    Ok(Value::Int(len as i64))
}

pub(crate) fn register<F>(procs: &mut HashMap<String, Value>, name: &str, arity: Arity, f: F)
        where F: Fn(&[Value]) -> Result<Value, EvalErr> + 'static {
    procs.insert(name.to_string(), Value::Proc(Rc::new(Procedure::builtin(name, arity, f))));
}

/// The initial global bindings.
pub fn builtins() -> HashMap<String, Value> {
    use Arity::*;
    let mut procs = HashMap::new();

    register(&mut procs, "+", AtLeast(0),
             |args| foldop("+", Value::Int(0), args, i64::checked_add, |a, b| a + b));
    register(&mut procs, "*", AtLeast(0),
             |args| foldop("*", Value::Int(1), args, i64::checked_mul, |a, b| a * b));
    register(&mut procs, "-", AtLeast(1), |args| match args {
        [only] => binop("-", &Value::Int(0), only, i64::checked_sub, |a, b| a - b),
        [first, rest @ ..] => foldop("-", first.clone(), rest, i64::checked_sub, |a, b| a - b),
        [] => Err(EvalErr::arity("-", AtLeast(1), 0)),
    });
    register(&mut procs, "/", AtLeast(1), |args| match args {
        [only] => divide(&Value::Int(1), only),
        [first, rest @ ..] => rest.iter().try_fold(first.clone(), |acc, arg| divide(&acc, arg)),
        [] => Err(EvalErr::arity("/", AtLeast(1), 0)),
    });

    register(&mut procs, "<", AtLeast(2), |args| foldcmp("<", args, Ordering::is_lt));
    register(&mut procs, ">", AtLeast(2), |args| foldcmp(">", args, Ordering::is_gt));
    register(&mut procs, "<=", AtLeast(2), |args| foldcmp("<=", args, Ordering::is_le));
    register(&mut procs, ">=", AtLeast(2), |args| foldcmp(">=", args, Ordering::is_ge));
    for name in ["=", "equal?"] {
        register(&mut procs, name, AtLeast(2), |args| Ok(Value::Bool(
            args.windows(2).all(|win| win[0].equals(&win[1])))));
    }
    register(&mut procs, "eq?", Exactly(2), |args| Ok(Value::Bool(args[0].is_same(&args[1]))));
    register(&mut procs, "not", Exactly(1), |args| Ok(Value::Bool(!args[0].is_truthy())));

    register(&mut procs, "car", Exactly(1), car);
    register(&mut procs, "cdr", Exactly(1), cdr);
    register(&mut procs, "cons", Exactly(2), cons);
    register(&mut procs, "append", AtLeast(0), append);
    register(&mut procs, "length", Exactly(1), length);
    register(&mut procs, "list", AtLeast(0), |args| Ok(Value::list(args.to_vec())));
    register(&mut procs, "list?", Exactly(1), |args| Ok(Value::Bool(args[0].as_list().is_some())));
    register(&mut procs, "null?", Exactly(1), |args| Ok(Value::Bool(
        args[0].as_list().map_or(false, <[Value]>::is_empty))));
    register(&mut procs, "symbol?", Exactly(1), |args| Ok(Value::Bool(args[0].as_symbol().is_some())));

    math::install(&mut procs);
    procs
}
