//! Control flow: application, tail recursion, return, continuations, and
//! the conditional-skip/jump pair.

use std::cell::RefCell;
use std::rc::Rc;

use super::{log, Vm};
use crate::closure::Closure;
use crate::error::RuntimeError;
use crate::frame::Frame;
use crate::value::Value;

impl Vm {
    pub(super) fn exec_clos(&mut self, d: u32, c: u32) -> Result<(), RuntimeError> {
        let code = match self.reg(c, "clos")? {
            Value::Code(code) => code,
            other => {
                return Err(RuntimeError::TypeMismatch {
                    opcode: "clos",
                    pc: self.pc(),
                    expected: "code",
                    found: other.type_name(),
                })
            }
        };
        let env = self.current_frame().borrow().closure.clone();
        self.set_reg(d, Value::Closure(env, code), "clos")
    }

    pub(super) fn exec_appl(&mut self, f: u32, bs: u32) -> Result<(), RuntimeError> {
        let fnval = self.reg(f, "appl")?;
        let argsval = self.reg(bs, "appl")?;
        self.apply(fnval, argsval, true)
    }

    /// `ccc fn`: capture the live frame by reference and apply `fn` to a
    /// one-element argument vector holding it.
    ///
    /// The call-out to `fn` never reuses the frame in place, even when `ccc`
    /// is its program's last instruction: doing so would mutate the very
    /// frame object just captured as the continuation, corrupting the
    /// position a later resumption must return to.
    pub(super) fn exec_ccc(&mut self, f: u32) -> Result<(), RuntimeError> {
        let fnval = self.reg(f, "ccc")?;
        let captured = self.current_frame();
        log::trace_continuation_captured(captured.borrow().pc);
        let args = Value::Vector(Rc::new(RefCell::new(vec![Value::Continuation(captured)])));
        self.apply(fnval, args, false)
    }

    pub(super) fn exec_rcur(&mut self, bs: u32) -> Result<(), RuntimeError> {
        let argsval = self.reg(bs, "rcur")?;
        let bindings = self.vector_contents(argsval, "rcur")?;
        let current = self.current_frame();
        let mut frame = current.borrow_mut();
        let parent = frame.closure.parent();
        frame.closure = Closure::from_parts(bindings, parent);
        frame.pc = -1;
        Ok(())
    }

    pub(super) fn exec_rtrn(&mut self, v: u32) -> Result<(), RuntimeError> {
        let value = self.reg(v, "rtrn")?;
        self.val = value;
        let parent = self.current_frame().borrow().parent.clone();
        self.frame = parent;
        Ok(())
    }

    pub(super) fn exec_cond(&mut self, r: u32) -> Result<(), RuntimeError> {
        let truthy = self.reg(r, "cond")?.is_truthy();
        if !truthy {
            self.current_frame().borrow_mut().pc += 1;
        }
        Ok(())
    }

    pub(super) fn exec_jmp(&mut self, r: u32) -> Result<(), RuntimeError> {
        let target = match self.reg(r, "jmp")? {
            Value::Int(v) => v,
            other => {
                return Err(RuntimeError::TypeMismatch {
                    opcode: "jmp",
                    pc: self.pc(),
                    expected: "int",
                    found: other.type_name(),
                })
            }
        };
        let current = self.current_frame();
        let len = current.borrow().prog.len() as i64;
        // `target` names the instruction *before* the intended one (the
        // following `pc += 1` in the dispatch loop lands on it), so `-1`
        // (jump to index 0) and `len - 1` (jump off the end, same as
        // falling through) are both in range.
        if target < -1 || target > len - 1 {
            return Err(RuntimeError::JumpOutOfRange {
                pc: self.pc(),
                target,
                len: len as usize,
            });
        }
        current.borrow_mut().pc = target;
        Ok(())
    }

    /// Apply `fnval` to `argsval`, per the `appl` semantics in §4.4.
    /// `allow_tail` gates whether a closure application may reuse the
    /// current frame in place; `exec_ccc` always passes `false`.
    fn apply(&mut self, fnval: Value, argsval: Value, allow_tail: bool) -> Result<(), RuntimeError> {
        match fnval {
            Value::Continuation(target) => {
                let arg0 = self.first_element(argsval, "appl")?;
                self.val = arg0;
                log::trace_continuation_resumed(target.borrow().pc);
                self.frame = Some(target);
                Ok(())
            }
            Value::Closure(env, body) => {
                let bindings = self.vector_contents(argsval, "appl")?;
                let new_env = Closure::new(bindings, env);
                let current = self.current_frame();
                let is_tail = allow_tail && current.borrow().at_last_instruction();

                if is_tail {
                    log::trace_tail_call(current.borrow().pc);
                    let mut frame = current.borrow_mut();
                    frame.closure = new_env;
                    frame.prog = body;
                    frame.pc = -1;
                    frame.vstack.clear();
                } else {
                    log::trace_frame_push(current.borrow().pc);
                    let new_frame = Frame::new(new_env, body, current);
                    self.frame = Some(Rc::new(RefCell::new(new_frame)));
                }
                Ok(())
            }
            other => Err(RuntimeError::NotCallable {
                pc: self.pc(),
                found: other.type_name(),
            }),
        }
    }

    fn vector_contents(&self, v: Value, opcode: &'static str) -> Result<Vec<Value>, RuntimeError> {
        match v {
            Value::Vector(rc) => Ok(rc.borrow().clone()),
            other => Err(RuntimeError::TypeMismatch {
                opcode,
                pc: self.pc(),
                expected: "vector",
                found: other.type_name(),
            }),
        }
    }

    fn first_element(&self, v: Value, opcode: &'static str) -> Result<Value, RuntimeError> {
        match v {
            Value::Vector(rc) => rc.borrow().first().cloned().ok_or(RuntimeError::EmptyArguments { opcode, pc: self.pc() }),
            other => Err(RuntimeError::TypeMismatch {
                opcode,
                pc: self.pc(),
                expected: "vector",
                found: other.type_name(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::instruction::Instruction;
    use crate::interpreter::DEFAULT_REGISTER_COUNT;
    use crate::loader::load;

    fn run_program(src: &str) -> Value {
        let prog = load(&assemble(src).unwrap()).unwrap();
        let mut vm = Vm::new(DEFAULT_REGISTER_COUNT);
        vm.load(Rc::from(prog));
        vm.run().unwrap()
    }

    #[test]
    fn tail_call_reuses_the_frame_in_place() {
        let mut vm = Vm::new(DEFAULT_REGISTER_COUNT);
        let body: Rc<[Instruction]> = Rc::from(vec![Instruction::Rtrn(0)]);
        // A one-instruction root program: the only `appl` is, trivially, the
        // last instruction of its frame.
        let root_prog: Rc<[Instruction]> = Rc::from(vec![Instruction::Appl(0, 1)]);
        vm.load(root_prog);
        vm.frame.as_ref().unwrap().borrow_mut().pc = 0;

        vm.registers[0] = Value::Closure(Closure::root(), body);
        vm.registers[1] = Value::Vector(Rc::new(RefCell::new(Vec::new())));

        let before = vm.frame.clone().unwrap();
        vm.exec_appl(0, 1).unwrap();
        let after = vm.frame.clone().unwrap();

        assert!(Rc::ptr_eq(&before, &after), "tail call must reuse the existing frame");
        assert_eq!(after.borrow().prog.len(), 1);
        assert_eq!(after.borrow().pc, -1);
    }

    #[test]
    fn non_tail_call_pushes_a_new_frame() {
        let mut vm = Vm::new(DEFAULT_REGISTER_COUNT);
        let body: Rc<[Instruction]> = Rc::from(vec![Instruction::Rtrn(0)]);
        // Two instructions: the `appl` at index 0 is not the last, so this
        // must push rather than reuse.
        let root_prog: Rc<[Instruction]> = Rc::from(vec![Instruction::Appl(0, 1), Instruction::Rtrn(0)]);
        vm.load(root_prog);
        vm.frame.as_ref().unwrap().borrow_mut().pc = 0;

        vm.registers[0] = Value::Closure(Closure::root(), body);
        vm.registers[1] = Value::Vector(Rc::new(RefCell::new(Vec::new())));

        let before = vm.frame.clone().unwrap();
        vm.exec_appl(0, 1).unwrap();
        let after = vm.frame.clone().unwrap();

        assert!(!Rc::ptr_eq(&before, &after), "non-tail call must push a new frame");
        assert!(Rc::ptr_eq(&after.borrow().parent.clone().unwrap(), &before));
    }

    #[test]
    fn cond_skips_the_next_instruction_when_falsy() {
        let src = "\
            loadl 0 2 x\n\
            cond 0\n\
            loadl 1 0 1\n\
            loadl 1 0 2\n\
            rtrn 1\n";
        let val = run_program(src);
        assert!(matches!(val, Value::Int(2)));
    }

    /// `jmp`'s target is the index *before* the intended instruction: jumping
    /// with `R[1] = 3` lands on index 4, skipping index 3 entirely.
    #[test]
    fn jmp_skips_to_its_target() {
        let src = "\
            loadl 0 0 1\n\
            loadl 1 0 3\n\
            jmp   1\n\
            loadl 2 0 99\n\
            loadl 2 0 7\n\
            rtrn  2\n";
        let val = run_program(src);
        assert!(matches!(val, Value::Int(7)));
    }

    #[test]
    fn jmp_out_of_range_is_reported() {
        let src = "\
            loadl 0 0 50\n\
            jmp   0\n";
        let prog = load(&assemble(src).unwrap()).unwrap();
        let mut vm = Vm::new(DEFAULT_REGISTER_COUNT);
        vm.load(Rc::from(prog));
        let err = vm.run().unwrap_err();
        assert!(matches!(err, RuntimeError::JumpOutOfRange { .. }));
    }
}
