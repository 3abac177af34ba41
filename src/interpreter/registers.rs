//! Register and scratch-stack moves, literal loads, and the host-callable
//! bridge (`host`).

use super::Vm;
use crate::error::RuntimeError;
use crate::instruction::Literal;
use crate::value::Value;

impl Vm {
    pub(super) fn exec_loadl(&mut self, d: u32, lit: &Literal) -> Result<(), RuntimeError> {
        self.set_reg(d, literal_to_value(lit), "loadl")
    }

    pub(super) fn exec_loadr(&mut self, d: u32, s: u32) -> Result<(), RuntimeError> {
        let v = self.reg(s, "loadr")?;
        self.set_reg(d, v, "loadr")
    }

    pub(super) fn exec_loadm(&mut self, d: u32, n: u32, i: u32) -> Result<(), RuntimeError> {
        let closure = self.current_frame().borrow().closure.clone();
        let v = closure.lexaddr(n, i)?;
        self.set_reg(d, v, "loadm")
    }

    pub(super) fn exec_savr(&mut self, r: u32) -> Result<(), RuntimeError> {
        let v = self.reg(r, "savr")?;
        self.current_frame().borrow_mut().vstack.push(v);
        Ok(())
    }

    pub(super) fn exec_rstr(&mut self, r: u32) -> Result<(), RuntimeError> {
        let popped = self
            .current_frame()
            .borrow_mut()
            .vstack
            .pop()
            .ok_or(RuntimeError::ScratchStackUnderflow { pc: self.pc() })?;
        self.set_reg(r, popped, "rstr")
    }

    pub(super) fn exec_getv(&mut self, d: u32) -> Result<(), RuntimeError> {
        let v = self.val.clone();
        self.set_reg(d, v, "getv")
    }

    pub(super) fn exec_host(&mut self, d: u32, f: u32, a: u32) -> Result<(), RuntimeError> {
        let func = match self.reg(f, "host")? {
            Value::Host(func) => func,
            other => {
                return Err(RuntimeError::TypeMismatch {
                    opcode: "host",
                    pc: self.pc(),
                    expected: "host",
                    found: other.type_name(),
                })
            }
        };
        let arg = self.reg(a, "host")?;
        let result = func(&arg);
        self.val = result.clone();
        self.set_reg(d, result, "host")
    }
}

fn literal_to_value(lit: &Literal) -> Value {
    match lit {
        Literal::Int(v) => Value::Int(*v),
        Literal::Str(s) => Value::Str(s.clone()),
        Literal::Nil => Value::Nil,
        Literal::Code(insts) => Value::Code(insts.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::frame::Frame;
    use crate::host::HostFn;
    use crate::interpreter::DEFAULT_REGISTER_COUNT;

    fn vm_with_frame() -> Vm {
        let mut vm = Vm::new(DEFAULT_REGISTER_COUNT);
        vm.frame = Some(Rc::new(RefCell::new(Frame::root(Rc::from(vec![])))));
        vm
    }

    #[test]
    fn savr_then_rstr_round_trips_through_the_scratch_stack() {
        let mut vm = vm_with_frame();
        vm.registers[0] = Value::Int(42);
        vm.exec_savr(0).unwrap();
        vm.registers[0] = Value::Nil;
        vm.exec_rstr(1).unwrap();
        assert!(matches!(vm.registers[1], Value::Int(42)));
    }

    #[test]
    fn rstr_on_an_empty_stack_is_reported() {
        let mut vm = vm_with_frame();
        let err = vm.exec_rstr(0).unwrap_err();
        assert!(matches!(err, RuntimeError::ScratchStackUnderflow { .. }));
    }

    #[test]
    fn host_invokes_the_callable_and_sets_val() {
        let mut vm = vm_with_frame();
        let double: HostFn = Rc::new(|v: &Value| match v {
            Value::Int(n) => Value::Int(n * 2),
            other => other.clone(),
        });
        vm.registers[0] = Value::Host(double);
        vm.registers[1] = Value::Int(21);
        vm.exec_host(2, 0, 1).unwrap();
        assert!(matches!(vm.registers[2], Value::Int(42)));
        assert!(matches!(vm.val, Value::Int(42)));
    }

    #[test]
    fn host_rejects_a_non_host_function_register() {
        let mut vm = vm_with_frame();
        vm.registers[0] = Value::Nil;
        vm.registers[1] = Value::Int(1);
        let err = vm.exec_host(2, 0, 1).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { .. }));
    }
}
