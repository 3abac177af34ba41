//! The fixed opcode table that drives the codec, assembler, loader and
//! interpreter alike.
//!
//! Opcodes are assigned indices by declaration order below; that order is a
//! binding contract (see the bit-exact check in the crate's test suite) and
//! must never be reshuffled. Adding a new opcode means appending a new
//! variant, never renumbering an existing one.

use std::fmt;

/// Operand shape of an opcode: how many of the word's `(A, B, C)` fields it
/// consumes, or whether it carries a trailing literal payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Takes `A` only.
    One,
    /// Takes `A, B`.
    Two,
    /// Takes `A, B, C`.
    Three,
    /// Takes `A` as a register and `B, C` as a literal-kind/byte-length pair,
    /// with the literal payload trailing the word.
    Literal,
}

impl Mode {
    /// Number of plain integer operands taken from `(A, B, C)`. `Mode::Literal`
    /// is not representable this way; see [`Op::mode`] callers for that case.
    pub const fn arity(self) -> usize {
        match self {
            Mode::One => 1,
            Mode::Two => 2,
            Mode::Three => 3,
            Mode::Literal => 0,
        }
    }
}

macro_rules! opcodes {
    ($($variant:ident = $code:literal, $name:literal, $mode:expr;)*) => {
        /// An opcode index into the fixed table.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Op {
            $($variant = $code,)*
        }

        impl Op {
            /// All opcodes, in declaration (= binding-contract) order.
            pub const ALL: &'static [Op] = &[$(Op::$variant,)*];

            /// The assembly mnemonic for this opcode.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Op::$variant => $name,)*
                }
            }

            /// The opcode's operand mode.
            pub const fn mode(self) -> Mode {
                match self {
                    $(Op::$variant => $mode,)*
                }
            }

            /// The numeric opcode, as packed into bits `[26, 32)` of an
            /// instruction word.
            pub const fn code(self) -> u8 {
                self as u8
            }

            /// Look up an opcode by its numeric code.
            pub fn from_code(code: u8) -> Option<Op> {
                match code {
                    $($code => Some(Op::$variant),)*
                    _ => None,
                }
            }

            /// Look up an opcode by its case-sensitive mnemonic.
            pub fn from_name(name: &str) -> Option<Op> {
                match name {
                    $($name => Some(Op::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

opcodes! {
    Clos  = 0,  "clos",  Mode::Two;
    Savr  = 1,  "savr",  Mode::One;
    Rstr  = 2,  "rstr",  Mode::One;
    Appl  = 3,  "appl",  Mode::Two;
    Loadm = 4,  "loadm", Mode::Three;
    Loadr = 5,  "loadr", Mode::Two;
    Vecl  = 6,  "vecl",  Mode::Two;
    Vec   = 7,  "vec",   Mode::Two;
    Svecl = 8,  "svecl", Mode::Three;
    Svec  = 9,  "svec",  Mode::Three;
    Gvecl = 10, "gvecl", Mode::Three;
    Gvec  = 11, "gvec",  Mode::Three;
    Eq    = 12, "eq",    Mode::Three;
    Lt    = 13, "lt",    Mode::Three;
    Not   = 14, "not",   Mode::Two;
    Rcur  = 15, "rcur",  Mode::One;
    Rtrn  = 16, "rtrn",  Mode::One;
    Cond  = 17, "cond",  Mode::One;
    Add   = 18, "add",   Mode::Three;
    Mul   = 19, "mul",   Mode::Three;
    Sub   = 20, "sub",   Mode::Three;
    Div   = 21, "div",   Mode::Three;
    And   = 22, "and",   Mode::Three;
    Or    = 23, "or",    Mode::Three;
    Jmp   = 24, "jmp",   Mode::One;
    Loadl = 25, "loadl", Mode::Literal;
    Cons  = 26, "cons",  Mode::Three;
    Getv  = 27, "getv",  Mode::One;
    Ccc   = 28, "ccc",   Mode::One;
    Host  = 29, "host",  Mode::Three;
}

/// Number of opcodes currently registered. Opcode indices must stay below
/// `64` (the 6-bit opcode field); this is far below that ceiling.
pub const OPCODE_COUNT: usize = Op::ALL.len();

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
