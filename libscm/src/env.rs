use crate::error::EvalErr;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// One frame of the scope chain.
///
/// Frames are shared through `Rc`: a closure keeps its defining frame alive
/// after the call that created it returns. Bindings sit behind a `RefCell`
/// so `define`/`set!` through any holder are visible to every other holder.
#[derive(Default)]
pub struct Env {
    bindings: RefCell<HashMap<String, Value>>,
    outer: Option<Rc<Env>>,
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut names: Vec<String> = self.bindings.borrow().keys().cloned().collect();
        names.sort();
        f.debug_struct("Env")
            .field("bindings", &names)
            .field("outer", &self.outer)
            .finish()
    }
}

impl Env {
    pub fn new() -> Env {
        Env::default()
    }

    pub fn with_bindings(bindings: HashMap<String, Value>) -> Env {
        Env { bindings: RefCell::new(bindings), outer: None }
    }

    /// A call frame binding `params` to `args` positionally.
    pub fn nested(params: Vec<String>, args: Vec<Value>, outer: Rc<Env>) -> Env {
        Env {
            bindings: RefCell::new(params.into_iter().zip(args).collect()),
            outer: Some(outer),
        }
    }

    pub fn outer(&self) -> Option<&Rc<Env>> {
        self.outer.as_ref()
    }

    /// Whether this frame (not its outer frames) binds `sym`.
    pub fn contains(&self, sym: &str) -> bool {
        self.bindings.borrow().contains_key(sym)
    }

    /// The innermost frame on the chain that binds `sym`.
    pub fn find(&self, sym: &str) -> Option<&Env> {
        if self.contains(sym) {
            Some(self)
        } else if let Some(ref outer) = self.outer {
            outer.find(sym)
        } else {
            None
        }
    }

    pub fn lookup(&self, sym: &str) -> Option<Value> {
        self.find(sym)
            .and_then(|frame| frame.bindings.borrow().get(sym).cloned())
    }

    /// Bind in this frame only, shadowing any outer binding.
    pub fn define(&self, sym: &str, value: Value) {
        self.bindings.borrow_mut().insert(sym.to_string(), value);
    }

    /// Overwrite the existing binding of `sym` in whichever frame owns it.
    pub fn assign(&self, sym: &str, value: Value) -> Result<(), EvalErr> {
        match self.find(sym) {
            Some(frame) => {
                frame.bindings.borrow_mut().insert(sym.to_string(), value);
                Ok(())
            }
            None => Err(EvalErr::UnboundVariable(sym.to_string())),
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.bindings.borrow().keys().cloned().collect()
    }
}

///////////////////////////////////////////////////////////////////////////////
