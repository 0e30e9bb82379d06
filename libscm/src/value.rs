use crate::procedure::Procedure;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Both the reader's expression trees and the evaluator's results.
///
/// Lists are immutable once built and shared through `Rc`; every list
/// operation builds a fresh vector.
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Symbol(String),
    List(Rc<Vec<Value>>),
    Proc(Rc<Procedure>),
    Void,
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items))
    }

    pub fn nil() -> Value {
        Value::list(Vec::new())
    }

    pub fn sym<S: Into<String>>(name: S) -> Value {
        Value::Symbol(name.into())
    }

    /// `#f`, zero and the empty list are false, everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::List(l) => !l.is_empty(),
            _ => true,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(l) => Some(&l[..]),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Structural equality where numbers compare by value across int and float.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int(_), Value::Float(_))
            | (Value::Float(_), Value::Int(_))
            | (Value::Float(_), Value::Float(_)) => self.num_cmp(other) == Some(Ordering::Equal),
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
            }
            (a, b) => a == b,
        }
    }

    /// Numeric ordering, exact across int and float. `None` for NaN and
    /// non-numbers.
    pub fn num_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => int_float_cmp(*a, *b),
            (Value::Float(a), Value::Int(b)) => int_float_cmp(*b, *a).map(Ordering::reverse),
            _ => None,
        }
    }

    /// Identity: lists and procedures must be the same object.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Proc(a), Value::Proc(b)) => Rc::ptr_eq(a, b),
            (a, b) => a == b,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Proc(_) => "procedure",
            Value::Void => "void",
        }
    }
}

// i64 -> f64 rounds above 2^53, so compare integral parts as i64 instead.
fn int_float_cmp(a: i64, b: f64) -> Option<Ordering> {
    const TWO_63: f64 = 9_223_372_036_854_775_808.0;
    if b.is_nan() {
        return None;
    }
    if b >= TWO_63 {
        return Some(Ordering::Less);
    }
    if b < -TWO_63 {
        return Some(Ordering::Greater);
    }
    let whole = b.trunc();
    match a.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&b),
        ord => Some(ord),
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self { Value::Int(n) }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Float(n) }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self { Value::list(items) }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            // Debug keeps the fraction or exponent so it reads back as a float
            Value::Float(n) => write!(f, "{:?}", n),
            Value::Bool(true) => write!(f, "#t"),
            Value::Bool(false) => write!(f, "#f"),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "(")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 { write!(f, " ")?; }
                    write!(f, "{}", item)?;
                }
                write!(f, ")")
            }
            Value::Proc(p) => write!(f, "{}", p),
            Value::Void => write!(f, "#<void>"),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Value;
    use std::cmp::Ordering;

    #[test]
    fn print_nested_lists() {
        let v = Value::list(vec![
            Value::sym("a"),
            Value::list(vec![Value::Int(1), Value::Float(2.5)]),
            Value::nil(),
        ]);
        assert_eq!(v.to_string(), "(a (1 2.5) ())");
    }

    #[test]
    fn print_floats_keep_their_kind() {
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(1e21).to_string(), "1e21");
        assert_eq!(Value::Float(-0.5).to_string(), "-0.5");
        assert_eq!(Value::Float(f64::INFINITY).to_string(), "inf");
    }

    #[test]
    fn truthiness() {
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::nil().is_truthy());
        assert!(Value::Int(10).is_truthy());
        assert!(Value::sym("x").is_truthy());
        assert!(Value::list(vec![Value::nil()]).is_truthy());
    }

    #[test]
    fn equality_and_identity() {
        assert!(Value::Int(1).equals(&Value::Float(1.0)));
        assert!(!Value::Int(1).equals(&Value::sym("1")));
        let a = Value::list(vec![Value::Int(1), Value::Int(2)]);
        let b = Value::list(vec![Value::Float(1.0), Value::Int(2)]);
        assert!(a.equals(&b));
        assert!(!a.is_same(&b));
        assert!(a.is_same(&a.clone()));
        assert!(Value::sym("x").is_same(&Value::sym("x")));
    }

    #[test]
    fn mixed_numbers_compare_exactly() {
        let big = Value::Int(9_007_199_254_740_993);
        let near = Value::Float(9_007_199_254_740_992.0);
        assert!(!big.equals(&near));
        assert_eq!(big.num_cmp(&near), Some(Ordering::Greater));
        assert_eq!(near.num_cmp(&big), Some(Ordering::Less));
        assert_eq!(Value::Int(3).num_cmp(&Value::Float(3.5)), Some(Ordering::Less));
        assert_eq!(Value::Int(-3).num_cmp(&Value::Float(-3.5)), Some(Ordering::Greater));
        assert_eq!(Value::Int(i64::MAX).num_cmp(&Value::Float(9.3e18)), Some(Ordering::Less));
        assert_eq!(Value::Int(i64::MIN).num_cmp(&Value::Float(-9.3e18)), Some(Ordering::Greater));
        assert_eq!(Value::Int(1).num_cmp(&Value::Float(f64::NAN)), None);
        assert_eq!(Value::sym("a").num_cmp(&Value::Int(1)), None);
    }
}
