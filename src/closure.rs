//! Lexical environments: a singly-linked chain of binding vectors.

use std::rc::Rc;

use crate::error::RuntimeError;
use crate::value::Value;

/// A node in the lexically-chained environment. The root closure has an
/// empty bindings vector and no parent.
#[derive(Debug)]
pub struct Closure {
    bindings: Vec<Value>,
    parent: Option<Rc<Closure>>,
}

impl Closure {
    /// The empty root environment.
    pub fn root() -> Rc<Closure> {
        Closure::from_parts(Vec::new(), None)
    }

    /// A new environment binding `bindings`, enclosed by `parent`.
    pub fn new(bindings: Vec<Value>, parent: Rc<Closure>) -> Rc<Closure> {
        Closure::from_parts(bindings, Some(parent))
    }

    /// A new environment binding `bindings`, enclosed by `parent` if any.
    /// Used by `rcur`, which re-derives a closure's parent link rather than
    /// always nesting one level deeper.
    pub fn from_parts(bindings: Vec<Value>, parent: Option<Rc<Closure>>) -> Rc<Closure> {
        Rc::new(Closure { bindings, parent })
    }

    /// The enclosing environment, if any.
    pub fn parent(&self) -> Option<Rc<Closure>> {
        self.parent.clone()
    }

    /// Resolve lexical address `(n, i)`: walk `n` parent links, then select
    /// binding `i`. Fails if the chain is shorter than `n` parents or the
    /// chosen bindings vector has no `i`-th entry.
    pub fn lexaddr(self: &Rc<Self>, n: u32, i: u32) -> Result<Value, RuntimeError> {
        let mut env = self.clone();
        for _ in 0..n {
            env = env.parent.clone().ok_or(RuntimeError::LexicalAddressPastRoot { n, i })?;
        }
        env.bindings
            .get(i as usize)
            .cloned()
            .ok_or(RuntimeError::LexicalAddressPastRoot { n, i })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexaddr_walks_parents_then_indexes() {
        let root = Closure::root();
        let mid = Closure::new(vec![Value::Int(1), Value::Int(2)], root);
        let leaf = Closure::new(vec![Value::Int(3)], mid);

        assert!(matches!(leaf.lexaddr(0, 0), Ok(Value::Int(3))));
        assert!(matches!(leaf.lexaddr(1, 1), Ok(Value::Int(2))));
        assert!(leaf.lexaddr(1, 5).is_err());
        assert!(leaf.lexaddr(9, 0).is_err());
    }
}
