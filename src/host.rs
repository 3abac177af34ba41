//! The host-callable contract (§6): a unary function from one [`Value`] to
//! one `Value`, invoked by the `host` opcode.
//!
//! A host-callable must be pure with respect to VM state — it must not
//! reach back into registers, frames or closures — so it is modeled as a
//! plain `Fn(&Value) -> Value` rather than anything that takes the `Vm`
//! itself. How a hosting application seeds a [`HostFn`] into a register
//! before `load`/`run` is deployment-specific and out of scope here.

use std::rc::Rc;

use crate::value::Value;

/// A host-supplied callable, as placed into a register by a hosting
/// application.
pub type HostFn = Rc<dyn Fn(&Value) -> Value>;
