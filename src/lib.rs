//! A register-oriented virtual machine for a small, dynamically-typed,
//! closure-bearing language, together with the assembler and loader for its
//! fixed-width bytecode.
//!
//! Three components, leaves first: the [`instruction`] codec and [`opcode`]
//! table, the [`assembler`]/[`loader`] pair that translate between textual
//! assembly and the binary stream, and the [`interpreter`] that runs decoded
//! programs to a terminal [`value::Value`].

pub mod assembler;
pub mod closure;
pub mod error;
pub mod frame;
pub mod host;
pub mod instruction;
pub mod interpreter;
pub mod loader;
pub mod opcode;
pub mod value;

pub use assembler::assemble;
pub use error::{AssembleError, LoadError, RuntimeError};
pub use interpreter::{Vm, DEFAULT_REGISTER_COUNT};
pub use loader::load;
pub use value::Value;
