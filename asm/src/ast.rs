//! Parse-tree nodes handed over by the front end.
//!
//! The tree is plain data: the grammar front end (or a YAML file, for the
//! command line tool) produces it, the assembler only walks it.

use arch::Mode;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(line: usize, col: usize) -> Self {
        Pos { line, col }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stmt {
    #[serde(default)]
    pub pos: Pos,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Stmt {
            pos: Pos::default(),
            kind,
        }
    }

    pub fn at(mut self, line: usize, col: usize) -> Self {
        self.pos = Pos::new(line, col);
        self
    }
}

// ----------------------------------------------------------------------------
// Statement

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum StmtKind {
    Const {
        name: Name,
        value: StaticValue,
    },
    Label {
        name: Name,
    },
    RemoteLabel {
        name: Name,
        address: StaticValue,
    },
    Origin {
        address: Address,
    },
    /// `value` is absent for the `default` keyword.
    Filler {
        #[serde(default)]
        value: Option<StaticValue>,
    },
    Data {
        values: Vec<StaticValue>,
    },
    FlagSet {
        flag: Flag,
        bit: Bit,
    },
    Stack {
        op: StackOp,
        target: StackTarget,
    },
    Goto {
        target: Reference,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    Carry,
    InterruptDisable,
    DecimalMode,
    Overflow,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TryFromPrimitive, IntoPrimitive,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Bit {
    Clear = 0,
    Set = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackOp {
    Push,
    Pull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackTarget {
    A,
    Flags,
}

// ----------------------------------------------------------------------------
// Expression

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    #[serde(default)]
    pub pos: Pos,
    pub text: String,
}

impl Name {
    pub fn new(text: &str) -> Self {
        Name {
            pos: Pos::default(),
            text: text.to_string(),
        }
    }

    /// Names are compared case-insensitively.
    pub fn key(&self) -> String {
        self.text.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "literal", rename_all = "snake_case")]
pub enum Literal {
    /// `$`-prefixed hexadecimal
    Hex {
        #[serde(default)]
        pos: Pos,
        text: String,
    },
    Decimal {
        #[serde(default)]
        pos: Pos,
        text: String,
    },
    /// `%`-prefixed binary
    Binary {
        #[serde(default)]
        pos: Pos,
        text: String,
    },
    Negative {
        #[serde(default)]
        pos: Pos,
        text: String,
    },
    Opcode {
        #[serde(default)]
        pos: Pos,
        mnemonic: String,
        /// Addressing mode name, checked when the literal is evaluated.
        #[serde(default)]
        mode: Option<String>,
    },
}

impl Literal {
    pub fn hex(text: &str) -> Self {
        Literal::Hex {
            pos: Pos::default(),
            text: text.to_string(),
        }
    }

    pub fn decimal(text: &str) -> Self {
        Literal::Decimal {
            pos: Pos::default(),
            text: text.to_string(),
        }
    }

    pub fn binary(text: &str) -> Self {
        Literal::Binary {
            pos: Pos::default(),
            text: text.to_string(),
        }
    }

    pub fn negative(text: &str) -> Self {
        Literal::Negative {
            pos: Pos::default(),
            text: text.to_string(),
        }
    }

    pub fn opcode(mnemonic: &str, mode: Option<Mode>) -> Self {
        Literal::Opcode {
            pos: Pos::default(),
            mnemonic: mnemonic.to_string(),
            mode: mode.map(|mode| mode.to_string()),
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            Literal::Hex { pos, .. }
            | Literal::Decimal { pos, .. }
            | Literal::Binary { pos, .. }
            | Literal::Negative { pos, .. }
            | Literal::Opcode { pos, .. } => *pos,
        }
    }
}

/// A literal or the name of a previously declared constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StaticValue {
    Literal(Literal),
    Name(Name),
}

impl StaticValue {
    pub fn pos(&self) -> Pos {
        match self {
            StaticValue::Literal(lit) => lit.pos(),
            StaticValue::Name(name) => name.pos,
        }
    }
}

impl From<Literal> for StaticValue {
    fn from(lit: Literal) -> Self {
        StaticValue::Literal(lit)
    }
}

impl From<Name> for StaticValue {
    fn from(name: Name) -> Self {
        StaticValue::Name(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "literal", rename_all = "snake_case")]
pub enum Address {
    Hex {
        #[serde(default)]
        pos: Pos,
        text: String,
    },
    Decimal {
        #[serde(default)]
        pos: Pos,
        text: String,
    },
}

impl Address {
    pub fn hex(text: &str) -> Self {
        Address::Hex {
            pos: Pos::default(),
            text: text.to_string(),
        }
    }

    pub fn decimal(text: &str) -> Self {
        Address::Decimal {
            pos: Pos::default(),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Reference {
    Direct { name: Name },
    Indirect { name: Name },
}

impl Reference {
    pub fn name(&self) -> &Name {
        match self {
            Reference::Direct { name } | Reference::Indirect { name } => name,
        }
    }
}
