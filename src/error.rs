//! Typed errors for each pipeline stage. The bytecode language itself has no
//! in-band error value (§7): every error here is fatal to the stage that
//! raised it, surfaced through the host language's normal failure channel.

use thiserror::Error;

/// Errors raised while translating textual assembly into a byte stream.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// The first token on a line didn't name a known opcode.
    #[error("line {line}: unknown opcode {token:?}")]
    UnknownOpcode {
        /// 1-based source line number.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// A line had the wrong number of tokens for its opcode's mode.
    #[error("line {line}: {opcode} expects {expected} operand(s), got {got}")]
    WrongOperandCount {
        /// 1-based source line number.
        line: usize,
        /// The opcode named on that line.
        opcode: &'static str,
        /// Number of operands its mode requires.
        expected: usize,
        /// Number of tokens actually present.
        got: usize,
    },
    /// A token that should have been a decimal integer wasn't.
    #[error("line {line}: expected an integer, found {token:?}")]
    NotAnInteger {
        /// 1-based source line number.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// An operand fell outside the range its field can encode.
    #[error("line {line}: operand {value} out of range for field (max {max})")]
    OperandOutOfRange {
        /// 1-based source line number.
        line: usize,
        /// The value that didn't fit.
        value: i64,
        /// The field's maximum (exclusive).
        max: i64,
    },
    /// A mode-4 literal's `K` tag named an unknown literal kind.
    #[error("line {line}: unknown literal kind {kind}")]
    UnknownLiteralKind {
        /// 1-based source line number.
        line: usize,
        /// The offending kind tag.
        kind: i64,
    },
    /// A kind-3 literal asked to absorb more source instructions than remain.
    #[error("line {line}: nested code literal wants {want} instructions, only {available} remain")]
    NestedLiteralTruncated {
        /// 1-based source line number.
        line: usize,
        /// Instructions requested.
        want: usize,
        /// Instructions actually available.
        available: usize,
    },
}

/// Errors raised while decoding a byte stream into instructions.
#[derive(Debug, Error)]
pub enum LoadError {
    /// An instruction word named an opcode index outside the table.
    #[error("byte offset {offset}: unknown opcode index {code}")]
    UnknownOpcode {
        /// Byte offset of the instruction word.
        offset: usize,
        /// The unrecognised opcode index.
        code: u8,
    },
    /// A mode-4 word's literal kind isn't one of the four known kinds.
    #[error("byte offset {offset}: unknown literal kind {kind}")]
    UnknownLiteralKind {
        /// Byte offset of the instruction word.
        offset: usize,
        /// The unrecognised kind tag.
        kind: u8,
    },
    /// Fewer bytes remain in the stream than an instruction or its literal
    /// payload claims to need.
    #[error("byte offset {offset}: truncated stream, expected {expected} more byte(s), found {found}")]
    Truncated {
        /// Byte offset at which the read started.
        offset: usize,
        /// Bytes the read needed.
        expected: usize,
        /// Bytes actually available.
        found: usize,
    },
}

/// Errors raised by the execution engine. Every variant records the opcode
/// and frame `pc` at the point of failure, per §7.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// A register index fell outside `[0, register_count)`.
    #[error("at pc={pc} in `{opcode}`: register {register} out of range (file has {register_count} registers)")]
    RegisterOutOfRange {
        /// The opcode being executed.
        opcode: &'static str,
        /// The frame's `pc` at the point of failure.
        pc: i64,
        /// The offending register index.
        register: u32,
        /// The size of the register file.
        register_count: usize,
    },
    /// An opcode required a value of one type but found another.
    #[error("at pc={pc} in `{opcode}`: expected a {expected}, found a {found}")]
    TypeMismatch {
        /// The opcode being executed.
        opcode: &'static str,
        /// The frame's `pc` at the point of failure.
        pc: i64,
        /// The type the opcode required.
        expected: &'static str,
        /// The type actually found.
        found: &'static str,
    },
    /// `gvec`/`svec` (or their literal-index variants) addressed outside the
    /// vector's fixed length.
    #[error("at pc={pc} in `{opcode}`: vector index {index} out of range (length {length})")]
    VectorIndexOutOfRange {
        /// The opcode being executed.
        opcode: &'static str,
        /// The frame's `pc` at the point of failure.
        pc: i64,
        /// The offending index.
        index: i64,
        /// The vector's length.
        length: usize,
    },
    /// A lexical address walked past the root environment, or indexed past
    /// the end of the chosen bindings vector.
    #[error("lexical address (n={n}, i={i}) walks past the root environment")]
    LexicalAddressPastRoot {
        /// Parent-hops requested.
        n: u32,
        /// Binding index requested.
        i: u32,
    },
    /// `rstr` was executed against an empty scratch stack.
    #[error("at pc={pc} in `rstr`: scratch stack is empty")]
    ScratchStackUnderflow {
        /// The frame's `pc` at the point of failure.
        pc: i64,
    },
    /// `jmp` targeted an instruction index outside the current program.
    #[error("at pc={pc} in `jmp`: target {target} out of range (program has {len} instructions)")]
    JumpOutOfRange {
        /// The frame's `pc` at the point of failure.
        pc: i64,
        /// The requested jump target.
        target: i64,
        /// Length of the current program.
        len: usize,
    },
    /// `appl` was applied to a value that was neither a closure nor a
    /// continuation.
    #[error("at pc={pc} in `appl`: cannot apply a {found}")]
    NotCallable {
        /// The frame's `pc` at the point of failure.
        pc: i64,
        /// The type actually found in the function register.
        found: &'static str,
    },
    /// An `appl`/`ccc` argument vector was the wrong shape for its use.
    #[error("at pc={pc} in `{opcode}`: argument vector is empty")]
    EmptyArguments {
        /// The opcode being executed.
        opcode: &'static str,
        /// The frame's `pc` at the point of failure.
        pc: i64,
    },
    /// `div` was asked to divide by an integer zero. Left unspecified by the
    /// opcode table's "overflow-wrapping is unspecified" note, but a `div`-by-zero
    /// host panic would be worse than a reported error.
    #[error("at pc={pc} in `div`: division by zero")]
    DivisionByZero {
        /// The frame's `pc` at the point of failure.
        pc: i64,
    },
}
