//! Byte stream → decoded instructions; the bit-exact inverse of the
//! assembler for programs it produced.

use std::rc::Rc;

use crate::error::LoadError;
use crate::instruction::{decode_signed, unpack, Instruction, Literal, WORD_LEN};
use crate::opcode::{Mode, Op};

/// Decode a complete byte stream into its sequence of instructions.
pub fn load(bytes: &[u8]) -> Result<Vec<Instruction>, LoadError> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let (inst, consumed) = load_one(bytes, pos)?;
        out.push(inst);
        pos += consumed;
    }
    Ok(out)
}

fn load_one(bytes: &[u8], pos: usize) -> Result<(Instruction, usize), LoadError> {
    if bytes.len() - pos < WORD_LEN {
        return Err(LoadError::Truncated {
            offset: pos,
            expected: WORD_LEN,
            found: bytes.len() - pos,
        });
    }

    let word = u32::from_be_bytes(bytes[pos..pos + WORD_LEN].try_into().expect("checked above"));
    let (opcode, a, b, c) = unpack(word);
    let op = Op::from_code(opcode).ok_or(LoadError::UnknownOpcode { offset: pos, code: opcode })?;

    match op.mode() {
        Mode::One => Ok((build_one(op, a), WORD_LEN)),
        Mode::Two => Ok((build_two(op, a, b), WORD_LEN)),
        Mode::Three => Ok((build_three(op, a, b, c), WORD_LEN)),
        Mode::Literal => {
            let len = c as usize;
            let payload_start = pos + WORD_LEN;
            let remaining = bytes.len().saturating_sub(payload_start);
            if remaining < len {
                return Err(LoadError::Truncated {
                    offset: payload_start,
                    expected: len,
                    found: remaining,
                });
            }
            let payload = &bytes[payload_start..payload_start + len];
            let literal = decode_literal(b, payload, payload_start)?;
            Ok((Instruction::Loadl(a, literal), WORD_LEN + len))
        }
    }
}

fn decode_literal(kind: u8, payload: &[u8], offset: usize) -> Result<Literal, LoadError> {
    match kind {
        0 => Ok(Literal::Int(decode_signed(payload))),
        1 => Ok(Literal::Str(Rc::from(String::from_utf8_lossy(payload).into_owned()))),
        2 => Ok(Literal::Nil),
        3 => Ok(Literal::Code(Rc::from(load(payload)?))),
        _ => Err(LoadError::UnknownLiteralKind { offset, kind }),
    }
}

fn build_one(op: Op, a: u8) -> Instruction {
    match op {
        Op::Savr => Instruction::Savr(a),
        Op::Rstr => Instruction::Rstr(a),
        Op::Rcur => Instruction::Rcur(a),
        Op::Rtrn => Instruction::Rtrn(a),
        Op::Cond => Instruction::Cond(a),
        Op::Jmp => Instruction::Jmp(a),
        Op::Getv => Instruction::Getv(a),
        Op::Ccc => Instruction::Ccc(a),
        _ => unreachable!("{op} is not a mode-1 opcode"),
    }
}

fn build_two(op: Op, a: u8, b: u8) -> Instruction {
    match op {
        Op::Clos => Instruction::Clos(a, b),
        Op::Appl => Instruction::Appl(a, b),
        Op::Loadr => Instruction::Loadr(a, b),
        Op::Vecl => Instruction::Vecl(a, b),
        Op::Vec => Instruction::Vec(a, b),
        Op::Not => Instruction::Not(a, b),
        _ => unreachable!("{op} is not a mode-2 opcode"),
    }
}

fn build_three(op: Op, a: u8, b: u8, c: u16) -> Instruction {
    match op {
        Op::Loadm => Instruction::Loadm(a, b, c),
        Op::Svecl => Instruction::Svecl(a, b, c),
        Op::Svec => Instruction::Svec(a, b, c),
        Op::Gvecl => Instruction::Gvecl(a, b, c),
        Op::Gvec => Instruction::Gvec(a, b, c),
        Op::Eq => Instruction::Eq(a, b, c),
        Op::Lt => Instruction::Lt(a, b, c),
        Op::Add => Instruction::Add(a, b, c),
        Op::Mul => Instruction::Mul(a, b, c),
        Op::Sub => Instruction::Sub(a, b, c),
        Op::Div => Instruction::Div(a, b, c),
        Op::And => Instruction::And(a, b, c),
        Op::Or => Instruction::Or(a, b, c),
        Op::Cons => Instruction::Cons(a, b, c),
        Op::Host => Instruction::Host(a, b, c),
        _ => unreachable!("{op} is not a mode-3 opcode"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;

    fn assemble_and_load(src: &str) -> Vec<Instruction> {
        load(&assemble(src).unwrap()).unwrap()
    }

    #[test]
    fn integer_literal_round_trips() {
        let insts = assemble_and_load("loadl 0 0 51452145\nloadl 1 0 -145146\n");
        assert_eq!(insts, vec![Instruction::Loadl(0, Literal::Int(51452145)), Instruction::Loadl(1, Literal::Int(-145146))]);
    }

    #[test]
    fn nil_literal_round_trips() {
        let insts = assemble_and_load("loadl 0 2 anything\n");
        assert_eq!(insts, vec![Instruction::Loadl(0, Literal::Nil)]);
    }

    #[test]
    fn string_literal_round_trips() {
        let insts = assemble_and_load("loadl 0 1 hello\n");
        assert_eq!(insts, vec![Instruction::Loadl(0, Literal::Str(Rc::from("hello")))]);
    }

    #[test]
    fn nested_code_literal_round_trips() {
        let insts = assemble_and_load("loadl 0 3 1\nadd 2 3 4\n");
        match &insts[..] {
            [Instruction::Loadl(0, Literal::Code(nested))] => {
                assert_eq!(nested.as_ref(), &[Instruction::Add(2, 3, 4)]);
            }
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let err = load(&[0x00, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, LoadError::Truncated { .. }));
    }

    #[test]
    fn truncated_literal_payload_is_rejected() {
        // loadl 0 1 3 claims a 3-byte string payload but supplies none.
        let word = crate::instruction::pack(Op::Loadl.code(), 0, 1, 3);
        let err = load(&word.to_be_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Truncated { .. }));
    }

    #[test]
    fn unknown_opcode_index_is_rejected() {
        let word = crate::instruction::pack(63, 0, 0, 0);
        let err = load(&word.to_be_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::UnknownOpcode { .. }));
    }
}
