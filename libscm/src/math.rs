use crate::builtins::{foldop, register, type_err};
use crate::error::{Arity, EvalErr};
use crate::value::Value;
use std::collections::HashMap;
use std::f64::consts;

fn real(name: &str, v: &Value) -> Result<f64, EvalErr> {
    v.as_f64().ok_or_else(|| type_err(name, "a real number", v))
}

fn integer(name: &str, v: &Value) -> Result<i64, EvalErr> {
    match v {
        Value::Int(n) => Ok(*n),
        other => Err(type_err(name, "an integer", other)),
    }
}

// Refuse to hand back NaN or inf unless an input already was one.
fn checked(inputs: &[f64], result: f64) -> Result<Value, EvalErr> {
    if result.is_nan() && !inputs.iter().any(|x| x.is_nan()) {
        return Err(EvalErr::DomainError(format!("math domain error")));
    }
    if result.is_infinite() && inputs.iter().all(|x| x.is_finite()) {
        return Err(EvalErr::DomainError(format!("math range error")));
    }
    Ok(Value::Float(result))
}

fn to_integer(name: &str, x: f64) -> Result<Value, EvalErr> {
    if !x.is_finite() || x < i64::MIN as f64 || x >= i64::MAX as f64 {
        return Err(EvalErr::DomainError(format!("{} cannot convert {:?} to integer", name, x)));
    }
    Ok(Value::Int(x as i64))
}

fn fmod(x: f64, y: f64) -> f64 { x % y }

fn ulp(x: f64) -> f64 {
    let x = x.abs();
    if !x.is_finite() {
        return x;
    }
    let up = libm::nextafter(x, f64::INFINITY);
    if up.is_infinite() {
        return x - libm::nextafter(x, -f64::INFINITY);
    }
    up - x
}

const UNARY: &[(&str, fn(f64) -> f64)] = &[
    ("sin", f64::sin), ("cos", f64::cos), ("tan", f64::tan),
    ("asin", f64::asin), ("acos", f64::acos), ("atan", f64::atan),
    ("sinh", f64::sinh), ("cosh", f64::cosh), ("tanh", f64::tanh),
    ("asinh", f64::asinh), ("acosh", f64::acosh), ("atanh", f64::atanh),
    ("exp", f64::exp), ("exp2", f64::exp2), ("expm1", f64::exp_m1),
    ("log2", f64::log2), ("log10", f64::log10), ("log1p", f64::ln_1p),
    ("sqrt", f64::sqrt), ("cbrt", f64::cbrt), ("fabs", f64::abs),
    ("degrees", f64::to_degrees), ("radians", f64::to_radians),
    ("erf", libm::erf), ("erfc", libm::erfc),
    ("gamma", libm::tgamma), ("lgamma", libm::lgamma),
    ("ulp", ulp),
];

const BINARY: &[(&str, fn(f64, f64) -> f64)] = &[
    ("atan2", f64::atan2), ("pow", f64::powf), ("hypot", f64::hypot),
    ("fmod", fmod), ("copysign", f64::copysign),
    ("remainder", libm::remainder), ("nextafter", libm::nextafter),
];

const ROUNDING: &[(&str, fn(f64) -> f64)] = &[
    ("floor", f64::floor), ("ceil", f64::ceil), ("trunc", f64::trunc),
];

const PREDICATES: &[(&str, fn(f64) -> bool)] = &[
    ("isnan", f64::is_nan), ("isinf", f64::is_infinite), ("isfinite", f64::is_finite),
];

fn log(args: &[Value]) -> Result<Value, EvalErr> {
    let x = real("log", &args[0])?;
    match args.get(1) {
        None => checked(&[x], x.ln()),
        Some(base) => {
            let b = real("log", base)?;
            if b <= 0.0 || b == 1.0 {
                return Err(EvalErr::DomainError(format!("math domain error")));
            }
            checked(&[x, b], x.ln() / b.ln())
        }
    }
}

fn factorial(args: &[Value]) -> Result<Value, EvalErr> {
    let n = integer("factorial", &args[0])?;
    if n < 0 {
        return Err(EvalErr::DomainError(format!("factorial not defined for negative values")));
    }
    (2..=n).try_fold(1i64, |acc, k| acc.checked_mul(k))
        .map(Value::Int)
        .ok_or_else(|| EvalErr::DomainError(format!("integer overflow in factorial")))
}

fn gcd(args: &[Value]) -> Result<Value, EvalErr> {
    let mut acc: u64 = 0;
    for arg in args {
        let mut b = integer("gcd", arg)?.unsigned_abs();
        while b != 0 {
            let t = acc % b;
            acc = b;
            b = t;
        }
    }
    i64::try_from(acc)
        .map(Value::Int)
        .map_err(|_| EvalErr::DomainError(format!("integer overflow in gcd")))
}

fn natural(name: &str, v: &Value) -> Result<i64, EvalErr> {
    match integer(name, v)? {
        n if n < 0 => Err(EvalErr::DomainError(format!("{} not defined for negative values", name))),
        n => Ok(n),
    }
}

fn overflow(name: &str) -> EvalErr {
    EvalErr::DomainError(format!("integer overflow in {}", name))
}

fn lcm(args: &[Value]) -> Result<Value, EvalErr> {
    let mut acc: i64 = 1;
    for arg in args {
        let n = integer("lcm", arg)?;
        if n == 0 || acc == 0 {
            acc = 0;
            continue;
        }
        let (mut a, mut b) = (acc.unsigned_abs(), n.unsigned_abs());
        while b != 0 {
            let t = a % b;
            a = b;
            b = t;
        }
        acc = i64::try_from(a)
            .ok()
            .and_then(|g| (acc / g).checked_mul(n))
            .and_then(i64::checked_abs)
            .ok_or_else(|| overflow("lcm"))?;
    }
    Ok(Value::Int(acc))
}

fn isqrt(args: &[Value]) -> Result<Value, EvalErr> {
    let n = natural("isqrt", &args[0])?;
    // the float estimate is off by at most a few units near i64::MAX
    let mut r = (n as f64).sqrt() as i64;
    while r.checked_mul(r).map_or(true, |sq| sq > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).map_or(false, |sq| sq <= n) {
        r += 1;
    }
    Ok(Value::Int(r))
}

// n! / (n - k)!, divided by k! when counting combinations.
fn choose(name: &str, n: i64, k: i64, unordered: bool) -> Result<Value, EvalErr> {
    if k > n {
        return Ok(Value::Int(0));
    }
    let k = if unordered { k.min(n - k) } else { k };
    let mut acc: i128 = 1;
    for i in 0..k {
        acc = acc.checked_mul((n - i) as i128).ok_or_else(|| overflow(name))?;
        if unordered {
            acc /= (i + 1) as i128;
        }
    }
    i64::try_from(acc).map(Value::Int).map_err(|_| overflow(name))
}

fn comb(args: &[Value]) -> Result<Value, EvalErr> {
    choose("comb", natural("comb", &args[0])?, natural("comb", &args[1])?, true)
}

fn perm(args: &[Value]) -> Result<Value, EvalErr> {
    let n = natural("perm", &args[0])?;
    let k = match args.get(1) {
        Some(k) => natural("perm", k)?,
        None => n,
    };
    choose("perm", n, k, false)
}

fn ldexp(args: &[Value]) -> Result<Value, EvalErr> {
    let x = real("ldexp", &args[0])?;
    let exp = integer("ldexp", &args[1])?.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
    checked(&[x], libm::ldexp(x, exp))
}

fn frexp(args: &[Value]) -> Result<Value, EvalErr> {
    let x = real("frexp", &args[0])?;
    if !x.is_finite() {
        return Ok(Value::list(vec![Value::Float(x), Value::Int(0)]));
    }
    let (mantissa, exp) = libm::frexp(x);
    Ok(Value::list(vec![Value::Float(mantissa), Value::Int(exp as i64)]))
}

// (fractional integral), both carrying the sign of x
fn modf(args: &[Value]) -> Result<Value, EvalErr> {
    let x = real("modf", &args[0])?;
    let whole = x.trunc();
    let frac = if x.is_infinite() { 0.0f64.copysign(x) } else { x - whole };
    Ok(Value::list(vec![Value::Float(frac), Value::Float(whole)]))
}

fn isclose(args: &[Value]) -> Result<Value, EvalErr> {
    let (a, b) = (real("isclose", &args[0])?, real("isclose", &args[1])?);
    let rel_tol = args.get(2).map_or(Ok(1e-9), |v| real("isclose", v))?;
    let abs_tol = args.get(3).map_or(Ok(0.0), |v| real("isclose", v))?;
    if rel_tol < 0.0 || abs_tol < 0.0 {
        return Err(EvalErr::DomainError(format!("tolerances must be non-negative")));
    }
    if a == b {
        return Ok(Value::Bool(true));
    }
    if a.is_infinite() || b.is_infinite() {
        return Ok(Value::Bool(false));
    }
    let diff = (b - a).abs();
    let close = diff <= (rel_tol * b.abs()) || diff <= (rel_tol * a.abs()) || diff <= abs_tol;
    Ok(Value::Bool(close))
}

fn reals(name: &str, v: &Value) -> Result<Vec<f64>, EvalErr> {
    v.as_list()
        .ok_or_else(|| type_err(name, "a list", v))?
        .iter()
        .map(|x| real(name, x))
        .collect()
}

// Shewchuk's exact partial sums, rounded once at the end.
fn fsum(args: &[Value]) -> Result<Value, EvalErr> {
    let xs = reals("fsum", &args[0])?;
    if xs.iter().any(|x| !x.is_finite()) {
        return checked(&xs, xs.iter().sum());
    }
    let mut partials: Vec<f64> = Vec::new();
    for &item in &xs {
        let mut x = item;
        let mut kept = 0;
        for j in 0..partials.len() {
            let mut y = partials[j];
            if x.abs() < y.abs() {
                std::mem::swap(&mut x, &mut y);
            }
            let hi = x + y;
            let lo = y - (hi - x);
            if lo != 0.0 {
                partials[kept] = lo;
                kept += 1;
            }
            x = hi;
        }
        partials.truncate(kept);
        partials.push(x);
    }
    checked(&xs, partials.iter().sum())
}

fn prod(args: &[Value]) -> Result<Value, EvalErr> {
    let items = args[0].as_list().ok_or_else(|| type_err("prod", "a list", &args[0]))?;
    let start = args.get(1).cloned().unwrap_or(Value::Int(1));
    foldop("prod", start, items, i64::checked_mul, |a, b| a * b)
}

fn dist(args: &[Value]) -> Result<Value, EvalErr> {
    let (p, q) = (reals("dist", &args[0])?, reals("dist", &args[1])?);
    if p.len() != q.len() {
        return Err(EvalErr::DomainError(format!("both points must have the same number of dimensions")));
    }
    let inputs: Vec<f64> = p.iter().chain(q.iter()).copied().collect();
    let d = p.iter().zip(q.iter()).fold(0.0, |acc: f64, (a, b)| acc.hypot(a - b));
    checked(&inputs, d)
}

fn abs(args: &[Value]) -> Result<Value, EvalErr> {
    match &args[0] {
        Value::Int(n) => n.checked_abs()
            .map(Value::Int)
            .ok_or_else(|| EvalErr::DomainError(format!("integer overflow in abs"))),
        other => Ok(Value::Float(real("abs", other)?.abs())),
    }
}

// Returns the winning argument itself, so ints stay ints.
fn extremum(name: &str, args: &[Value], keep_new: fn(f64, f64) -> bool) -> Result<Value, EvalErr> {
    let mut best = &args[0];
    let mut best_x = real(name, best)?;
    for arg in &args[1..] {
        let x = real(name, arg)?;
        if keep_new(x, best_x) {
            best = arg;
            best_x = x;
        }
    }
    Ok(best.clone())
}

/// Constants and functions of the numeric library.
pub fn install(procs: &mut HashMap<String, Value>) {
    use Arity::*;

    for (name, value) in [
        ("pi", consts::PI), ("e", consts::E), ("tau", consts::TAU),
        ("inf", f64::INFINITY), ("nan", f64::NAN),
    ] {
        procs.insert(name.to_string(), Value::Float(value));
    }

    for &(name, f) in UNARY {
        register(procs, name, Exactly(1), move |args| {
            let x = real(name, &args[0])?;
            checked(&[x], f(x))
        });
    }
    for &(name, f) in BINARY {
        register(procs, name, Exactly(2), move |args| {
            let (x, y) = (real(name, &args[0])?, real(name, &args[1])?);
            checked(&[x, y], f(x, y))
        });
    }
    for &(name, f) in ROUNDING {
        register(procs, name, Exactly(1), move |args| match &args[0] {
            Value::Int(n) => Ok(Value::Int(*n)),
            other => to_integer(name, f(real(name, other)?)),
        });
    }
    for &(name, f) in PREDICATES {
        register(procs, name, Exactly(1), move |args| Ok(Value::Bool(f(real(name, &args[0])?))));
    }

    register(procs, "log", Between(1, 2), log);
    register(procs, "factorial", Exactly(1), factorial);
    register(procs, "gcd", AtLeast(0), gcd);
    register(procs, "lcm", AtLeast(0), lcm);
    register(procs, "isqrt", Exactly(1), isqrt);
    register(procs, "comb", Exactly(2), comb);
    register(procs, "perm", Between(1, 2), perm);
    register(procs, "ldexp", Exactly(2), ldexp);
    register(procs, "frexp", Exactly(1), frexp);
    register(procs, "modf", Exactly(1), modf);
    register(procs, "isclose", Between(2, 4), isclose);
    register(procs, "fsum", Exactly(1), fsum);
    register(procs, "prod", Between(1, 2), prod);
    register(procs, "dist", Exactly(2), dist);
    register(procs, "abs", Exactly(1), abs);
    register(procs, "min", AtLeast(1), |args| extremum("min", args, |x, best| x < best));
    register(procs, "max", AtLeast(1), |args| extremum("max", args, |x, best| x > best));
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::error::EvalErr;
    use crate::eval::Interpreter;
    use crate::value::Value;

    fn eval(src: &str) -> Result<Value, EvalErr> {
        Interpreter::new().eval_str(src)
    }

    #[test]
    fn constants() {
        assert_eq!(eval("pi"), Ok(Value::Float(std::f64::consts::PI)));
        assert_eq!(eval("(* 2 pi)"), eval("tau"));
    }

    #[test]
    fn float_functions() {
        assert_eq!(eval("(sqrt 16)"), Ok(Value::Float(4.0)));
        assert_eq!(eval("(pow 2 10)"), Ok(Value::Float(1024.0)));
        assert_eq!(eval("(log 8 2)"), Ok(Value::Float(3.0)));
        assert_eq!(eval("(sin 0)"), Ok(Value::Float(0.0)));
        assert_eq!(eval("(fmod 7 3)"), Ok(Value::Float(1.0)));
    }

    #[test]
    fn rounding_yields_integers() {
        assert_eq!(eval("(floor 2.7)"), Ok(Value::Int(2)));
        assert_eq!(eval("(ceil 2.1)"), Ok(Value::Int(3)));
        assert_eq!(eval("(trunc -2.7)"), Ok(Value::Int(-2)));
        assert_eq!(eval("(floor 5)"), Ok(Value::Int(5)));
        assert!(matches!(eval("(floor inf)"), Err(EvalErr::DomainError(_))));
    }

    #[test]
    fn domain_errors() {
        assert!(matches!(eval("(sqrt -1)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(log 0)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(exp 1000)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(factorial -1)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(log 8 0)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(log 8 -2)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(log 8 1)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(gamma 0)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(gamma -2)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(remainder 1 0)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(isqrt -1)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(comb -1 2)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(ldexp 1 5000)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(fsum (list inf (- inf)))"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(dist (list 1 2) (list 1))"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(isclose 1 1 -1)"), Err(EvalErr::DomainError(_))));
        assert!(matches!(eval("(sqrt x)"), Err(EvalErr::UnboundVariable(_))));
        assert!(matches!(eval("(sqrt (quote x))"), Err(EvalErr::TypeError(_))));
        // non finite inputs pass through
        assert_eq!(eval("(isnan (sqrt nan))"), Ok(Value::Bool(true)));
    }

    #[test]
    fn integer_functions() {
        assert_eq!(eval("(factorial 5)"), Ok(Value::Int(120)));
        assert_eq!(eval("(factorial 0)"), Ok(Value::Int(1)));
        assert_eq!(eval("(gcd 12 18 -8)"), Ok(Value::Int(2)));
        assert_eq!(eval("(abs -3)"), Ok(Value::Int(3)));
        assert_eq!(eval("(abs -3.5)"), Ok(Value::Float(3.5)));
        assert_eq!(eval("(max 1 7.5 3)"), Ok(Value::Float(7.5)));
        assert_eq!(eval("(min 4 1 3)"), Ok(Value::Int(1)));
        assert_eq!(eval("(lcm 4 6)"), Ok(Value::Int(12)));
        assert_eq!(eval("(lcm 4 0 6)"), Ok(Value::Int(0)));
        assert_eq!(eval("(lcm)"), Ok(Value::Int(1)));
        assert_eq!(eval("(isqrt 17)"), Ok(Value::Int(4)));
        assert_eq!(eval("(isqrt 9223372036854775807)"), Ok(Value::Int(3037000499)));
        assert_eq!(eval("(comb 5 2)"), Ok(Value::Int(10)));
        assert_eq!(eval("(comb 2 5)"), Ok(Value::Int(0)));
        assert_eq!(eval("(comb 60 30)"), Ok(Value::Int(118264581564861424)));
        assert_eq!(eval("(perm 5 2)"), Ok(Value::Int(20)));
        assert_eq!(eval("(perm 4)"), Ok(Value::Int(24)));
        assert_eq!(eval("(prod (list 2 3 4))"), Ok(Value::Int(24)));
        assert_eq!(eval("(prod (list 2 0.5) 3)"), Ok(Value::Float(3.0)));
        assert_eq!(eval("(prod (list))"), Ok(Value::Int(1)));
    }

    #[test]
    fn special_functions() {
        assert_eq!(eval("(gamma 5)"), Ok(Value::Float(24.0)));
        assert_eq!(eval("(erf 0)"), Ok(Value::Float(0.0)));
        assert_eq!(eval("(erfc 0)"), Ok(Value::Float(1.0)));
        assert_eq!(eval("(lgamma 1)"), Ok(Value::Float(0.0)));
        assert_eq!(eval("(isclose (erf 1) 0.8427007929497149)"), Ok(Value::Bool(true)));
        assert_eq!(eval("(exp2 3)"), Ok(Value::Float(8.0)));
        assert_eq!(eval("(remainder 7 2)"), Ok(Value::Float(-1.0)));
        assert_eq!(eval("(ldexp 1 3)"), Ok(Value::Float(8.0)));
        assert_eq!(eval("(nextafter 1 2)"), Ok(Value::Float(1.0 + f64::EPSILON)));
        assert_eq!(eval("(ulp 1)"), Ok(Value::Float(f64::EPSILON)));
    }

    #[test]
    fn decompositions_return_lists() {
        assert_eq!(eval("(modf 1.5)"), Ok(Value::list(vec![Value::Float(0.5), Value::Float(1.0)])));
        assert_eq!(eval("(modf -2.25)"), Ok(Value::list(vec![Value::Float(-0.25), Value::Float(-2.0)])));
        assert_eq!(eval("(frexp 8)"), Ok(Value::list(vec![Value::Float(0.5), Value::Int(4)])));
        assert_eq!(eval("(frexp 0)"), Ok(Value::list(vec![Value::Float(0.0), Value::Int(0)])));
    }

    #[test]
    fn sums_and_distances() {
        assert_eq!(eval("(fsum (list 0.1 0.1 0.1 0.1 0.1 0.1 0.1 0.1 0.1 0.1))"), Ok(Value::Float(1.0)));
        assert_eq!(eval("(fsum (list 1e100 1.0 -1e100))"), Ok(Value::Float(1.0)));
        assert_eq!(eval("(dist (list 0 0) (list 3 4))"), Ok(Value::Float(5.0)));
        assert_eq!(eval("(isclose 1.0 1.0000000001)"), Ok(Value::Bool(true)));
        assert_eq!(eval("(isclose 1.0 1.1)"), Ok(Value::Bool(false)));
        assert_eq!(eval("(isclose 1.0 1.1 0.2)"), Ok(Value::Bool(true)));
        assert_eq!(eval("(isclose inf inf)"), Ok(Value::Bool(true)));
    }
}
