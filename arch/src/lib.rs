//! Instruction set of the MOS 6502: mnemonics, addressing modes and the
//! opcode table shared by the assembler and its listing.

pub mod mode;
pub mod op;
pub mod table;

pub use mode::Mode;
pub use op::Mnemonic;
pub use table::{decode, encode, lookup};
