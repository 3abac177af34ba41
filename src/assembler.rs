//! Text → byte stream.
//!
//! One instruction per non-empty line; `;` begins a line comment. Operand
//! tokens are interpreted per the named opcode's [`Mode`](crate::opcode::Mode).
//! Mode-4 (`loadl`) lines carry a register, a literal-kind tag, and a third
//! token whose meaning depends on that tag — including, for kind 3, a count
//! of *following source instructions* to absorb and nest.

use crate::error::AssembleError;
use crate::instruction::{encode_signed_minimal, pack};
use crate::opcode::{Mode, Op};

const MAX_FIELD_5BIT: i64 = 32;
const MAX_FIELD_16BIT: i64 = 65536;

/// Assemble a complete textual program into its byte-stream encoding.
pub fn assemble(src: &str) -> Result<Vec<u8>, AssembleError> {
    let lines = instruction_lines(src);
    let mut out = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        i += assemble_one(&lines, i, &mut out)?;
    }
    Ok(out)
}

/// Strip comments and blank lines, keeping `(1-based line number, trimmed text)`
/// for every remaining instruction line.
fn instruction_lines(src: &str) -> Vec<(usize, String)> {
    src.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let stripped = raw.split(';').next().unwrap_or("").trim();
            (!stripped.is_empty()).then(|| (i + 1, stripped.to_string()))
        })
        .collect()
}

/// Assemble the instruction at `lines[idx]`, appending its bytes to `out`.
/// Returns how many entries of `lines` were consumed (more than one only for
/// a kind-3 literal, which recursively absorbs following instructions).
fn assemble_one(lines: &[(usize, String)], idx: usize, out: &mut Vec<u8>) -> Result<usize, AssembleError> {
    let (line, text) = &lines[idx];
    let line = *line;
    let mut tokens = text.split_whitespace();
    let opname = tokens.next().expect("instruction_lines only keeps non-blank lines");
    let op = Op::from_name(opname).ok_or_else(|| AssembleError::UnknownOpcode {
        line,
        token: opname.to_string(),
    })?;
    let rest: Vec<&str> = tokens.collect();

    match op.mode() {
        Mode::One | Mode::Two | Mode::Three => {
            let arity = op.mode().arity();
            if rest.len() != arity {
                return Err(AssembleError::WrongOperandCount {
                    line,
                    opcode: op.name(),
                    expected: arity,
                    got: rest.len(),
                });
            }

            let a = parse_field(line, rest[0], MAX_FIELD_5BIT)?;
            let b = if arity >= 2 { parse_field(line, rest[1], MAX_FIELD_5BIT)? } else { 0 };
            let c = if arity >= 3 { parse_field(line, rest[2], MAX_FIELD_16BIT)? } else { 0 };

            out.extend(pack(op.code(), a as u8, b as u8, c as u16).to_be_bytes());
            Ok(1)
        }

        Mode::Literal => {
            if rest.len() != 3 {
                return Err(AssembleError::WrongOperandCount {
                    line,
                    opcode: op.name(),
                    expected: 3,
                    got: rest.len(),
                });
            }

            let reg = parse_field(line, rest[0], MAX_FIELD_5BIT)?;
            let kind = parse_int(line, rest[1])?;
            let lit_token = rest[2];

            match kind {
                0 => {
                    let v = parse_int(line, lit_token)?;
                    let payload = encode_signed_minimal(v);
                    emit_literal(out, line, reg, kind, &payload)?;
                    Ok(1)
                }
                1 => {
                    emit_literal(out, line, reg, kind, lit_token.as_bytes())?;
                    Ok(1)
                }
                2 => {
                    emit_literal(out, line, reg, kind, &[])?;
                    Ok(1)
                }
                3 => {
                    let n = parse_int(line, lit_token)?;
                    if n < 0 {
                        return Err(AssembleError::OperandOutOfRange { line, value: n, max: i64::MAX });
                    }
                    let mut payload = Vec::new();
                    let mut consumed = 1usize;
                    for _ in 0..n {
                        let at = idx + consumed;
                        if at >= lines.len() {
                            return Err(AssembleError::NestedLiteralTruncated {
                                line,
                                want: n as usize,
                                available: lines.len() - idx - 1,
                            });
                        }
                        consumed += assemble_one(lines, at, &mut payload)?;
                    }
                    emit_literal(out, line, reg, kind, &payload)?;
                    Ok(consumed)
                }
                _ => Err(AssembleError::UnknownLiteralKind { line, kind }),
            }
        }
    }
}

/// Pack a `loadl` word plus its payload, rejecting a payload whose length
/// doesn't fit the word's 16-bit `C` field instead of silently truncating it.
fn emit_literal(out: &mut Vec<u8>, line: usize, reg: i64, kind: i64, payload: &[u8]) -> Result<(), AssembleError> {
    if payload.len() > u16::MAX as usize {
        return Err(AssembleError::OperandOutOfRange {
            line,
            value: payload.len() as i64,
            max: MAX_FIELD_16BIT,
        });
    }
    let word = pack(Op::Loadl.code(), reg as u8, kind as u8, payload.len() as u16);
    out.extend(word.to_be_bytes());
    out.extend(payload);
    Ok(())
}

fn parse_int(line: usize, token: &str) -> Result<i64, AssembleError> {
    token.parse::<i64>().map_err(|_| AssembleError::NotAnInteger {
        line,
        token: token.to_string(),
    })
}

fn parse_field(line: usize, token: &str, max_exclusive: i64) -> Result<i64, AssembleError> {
    let v = parse_int(line, token)?;
    if v < 0 || v >= max_exclusive {
        return Err(AssembleError::OperandOutOfRange {
            line,
            value: v,
            max: max_exclusive,
        });
    }
    Ok(v)
}
