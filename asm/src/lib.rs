//! Semantic analysis and code generation for the fass 6502 language.
//!
//! The front end hands over a parse tree ([`ast::Program`]); [`assemble`]
//! sizes it once to place every label, then walks it again to write the 64K
//! memory image.

pub mod assembler;
pub mod ast;
pub mod codegen;
pub mod error;
pub mod listing;
pub mod literal;
pub mod memory;
pub mod symbol;

pub use assembler::{assemble, emit_pass, size_pass, Assembled};
pub use error::Error;
pub use literal::{Endian, Value};
pub use memory::{Memory, DEFAULT_FILLER, MEMORY_SIZE};
pub use symbol::{Label, Symbol, Symbols};
