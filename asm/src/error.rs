use color_print::cprintln;
use thiserror::Error;

use crate::ast::Pos;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Name `{1}` is already defined")]
    DuplicateName(Pos, String),

    #[error("Undefined name: `{1}`")]
    UndefinedName(Pos, String),

    #[error("{1}")]
    Range(Pos, String),

    #[error("Can't set new address ${1:04X} lower than current address ${2:04X}")]
    BackwardAddress(Pos, u32, u32),

    #[error("Writing {2} byte(s) at ${1:04X} overflows the 64K address space")]
    Overflow(Pos, u32, usize),

    #[error("{1}")]
    UnsupportedOperation(Pos, String),

    #[error("Cannot parse `{1}` as {2}")]
    InvalidLiteral(Pos, String, &'static str),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to read parse tree: {0}")]
    Tree(String, #[source] serde_yaml::Error),

    #[error("Failed to write file: {0}")]
    FileWrite(String, #[source] std::io::Error),
}

impl Error {
    /// Source position of the node that triggered a user-facing error.
    pub fn pos(&self) -> Option<Pos> {
        match self {
            Error::DuplicateName(pos, _)
            | Error::UndefinedName(pos, _)
            | Error::Range(pos, _)
            | Error::BackwardAddress(pos, _, _)
            | Error::Overflow(pos, _, _)
            | Error::UnsupportedOperation(pos, _)
            | Error::InvalidLiteral(pos, _, _) => Some(*pos),
            Error::Internal(_) | Error::FileOpen(..) | Error::Tree(..) | Error::FileWrite(..) => {
                None
            }
        }
    }

    /// Moves an error raised by a node without a position of its own to `at`.
    pub fn or_at(mut self, at: Pos) -> Self {
        match &mut self {
            Error::DuplicateName(pos, _)
            | Error::UndefinedName(pos, _)
            | Error::Range(pos, _)
            | Error::BackwardAddress(pos, _, _)
            | Error::Overflow(pos, _, _)
            | Error::UnsupportedOperation(pos, _)
            | Error::InvalidLiteral(pos, _, _) => {
                if *pos == Pos::default() {
                    *pos = at;
                }
            }
            Error::Internal(_) | Error::FileOpen(..) | Error::Tree(..) | Error::FileWrite(..) => {}
        }
        self
    }

    /// Print error with diagnostic information showing the source location
    pub fn print_diag(&self, file: &str) {
        match self {
            Error::Internal(_) => cprintln!("<red,bold>internal error</>: {}", self),
            _ => cprintln!("<red,bold>error</>: {}", self),
        }
        if let Some(pos) = self.pos() {
            cprintln!("     <blue>--></> <underline>{}:{}</>", file, pos);
        }
        if let Error::Internal(_) = self {
            cprintln!("      <blue>=</> <green,bold>note</>: this is a bug in the assembler, not in the program");
        }
    }
}
