use arch::{Mnemonic, Mode};
use serde::Serialize;

use crate::{
    ast::{Bit, Flag, Name, Pos, Reference, StackOp, StackTarget, StaticValue, Stmt, StmtKind},
    error::Error,
    literal::{eval_address, eval_static_value, Value},
    memory::Memory,
    symbol::{Label, Symbol, Symbols},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Sizes statements and records label addresses; writes nothing.
    Size,
    /// Resolves every reference against the complete table and writes bytes.
    Emit,
}

/// Bytes emitted by one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub pos: Pos,
    pub address: u32,
    pub bytes: Vec<u8>,
}

/// State threaded through one pass over the program.
#[derive(Debug)]
pub struct Context {
    pass: Pass,
    symbols: Symbols,
    memory: Memory,
    records: Vec<Record>,
}

impl Context {
    pub fn sizing() -> Self {
        Context {
            pass: Pass::Size,
            symbols: Symbols::new(),
            memory: Memory::dry(),
            records: vec![],
        }
    }

    /// `symbols` must be the table produced by the sizing pass.
    pub fn emitting(symbols: Symbols) -> Self {
        Context {
            pass: Pass::Emit,
            symbols,
            memory: Memory::new(),
            records: vec![],
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn into_parts(self) -> (Symbols, Memory, Vec<Record>) {
        (self.symbols, self.memory, self.records)
    }

    /// Errors from nested nodes without a position report the statement's.
    pub fn stmt(&mut self, stmt: &Stmt) -> Result<(), Error> {
        let pos = stmt.pos;
        let address = self.memory.address();
        self.dispatch(stmt).map_err(|err| err.or_at(pos))?;

        let emits = matches!(
            stmt.kind,
            StmtKind::Data { .. }
                | StmtKind::FlagSet { .. }
                | StmtKind::Stack { .. }
                | StmtKind::Goto { .. }
        );
        if emits && self.pass == Pass::Emit {
            let end = self.memory.address();
            self.records.push(Record {
                pos,
                address,
                bytes: self.memory.image()[address as usize..end as usize].to_vec(),
            });
        }
        Ok(())
    }

    fn dispatch(&mut self, stmt: &Stmt) -> Result<(), Error> {
        let pos = stmt.pos;
        match &stmt.kind {
            StmtKind::Const { name, value } => self.const_stmt(name, value),
            StmtKind::Label { name } => self.label_stmt(name, pos),
            StmtKind::RemoteLabel { name, address } => self.remote_label_stmt(name, address),
            StmtKind::Origin { address } => self.memory.set_origin(eval_address(address)?, pos),
            StmtKind::Filler { value } => self.filler_stmt(value.as_ref(), pos),
            StmtKind::Data { values } => self.data_stmt(values, pos),
            StmtKind::FlagSet { flag, bit } => self.flag_set_stmt(*flag, *bit, pos),
            StmtKind::Stack { op, target } => self.stack_stmt(*op, *target, pos),
            StmtKind::Goto { target } => self.goto_stmt(target, pos),
        }
    }

    // ------------------------------------------------------------------------
    // Declarations

    fn const_stmt(&mut self, name: &Name, value: &StaticValue) -> Result<(), Error> {
        let value = eval_static_value(value, &self.symbols)?;
        match self.pass {
            Pass::Size => self.symbols.declare_const(name, value),
            Pass::Emit => match self.symbols.constant(&name.key()) {
                Some(known) if *known == value => Ok(()),
                _ => Err(Error::Internal(format!(
                    "constant `{}` evaluated differently in the emitting pass",
                    name.text
                ))),
            },
        }
    }

    fn label_stmt(&mut self, name: &Name, pos: Pos) -> Result<(), Error> {
        let address = self.memory.address();
        let address = u16::try_from(address).map_err(|_| {
            Error::Range(
                pos,
                format!("Label `{}` at ${address:X} is outside the address space", name.text),
            )
        })?;
        self.declare_label(name, address)
    }

    fn remote_label_stmt(&mut self, name: &Name, address: &StaticValue) -> Result<(), Error> {
        let value = eval_static_value(address, &self.symbols)?;
        let address = u16::try_from(value.data).map_err(|_| {
            Error::Range(
                address.pos(),
                format!("Address {} of label `{}` is negative", value.data, name.text),
            )
        })?;
        self.declare_label(name, address)
    }

    fn declare_label(&mut self, name: &Name, address: u16) -> Result<(), Error> {
        match self.pass {
            Pass::Size => self.symbols.declare_label(name, address),
            Pass::Emit => match self.symbols.label(&name.key()) {
                Some(label) if label.address == Some(address) => Ok(()),
                other => Err(Error::Internal(format!(
                    "label `{}` moved from {:?} to ${:04X} between passes",
                    name.text,
                    other.and_then(|label| label.address),
                    address
                ))),
            },
        }
    }

    fn filler_stmt(&mut self, value: Option<&StaticValue>, pos: Pos) -> Result<(), Error> {
        match value {
            Some(value) => {
                let value = eval_static_value(value, &self.symbols)?;
                self.memory.set_filler(Some(&value), pos)
            }
            None => self.memory.set_filler(None, pos),
        }
    }

    // ------------------------------------------------------------------------
    // Statements

    fn data_stmt(&mut self, values: &[StaticValue], pos: Pos) -> Result<(), Error> {
        for value in values {
            let value = eval_static_value(value, &self.symbols)?;
            self.memory.write(&value, pos)?;
        }
        Ok(())
    }

    fn flag_set_stmt(&mut self, flag: Flag, bit: Bit, pos: Pos) -> Result<(), Error> {
        let mnemonic = match (flag, bit) {
            (Flag::Carry, Bit::Clear) => Mnemonic::CLC,
            (Flag::Carry, Bit::Set) => Mnemonic::SEC,
            (Flag::InterruptDisable, Bit::Clear) => Mnemonic::CLI,
            (Flag::InterruptDisable, Bit::Set) => Mnemonic::SEI,
            (Flag::DecimalMode, Bit::Clear) => Mnemonic::CLD,
            (Flag::DecimalMode, Bit::Set) => Mnemonic::SED,
            (Flag::Overflow, Bit::Clear) => Mnemonic::CLV,
            (Flag::Overflow, Bit::Set) => {
                return Err(Error::UnsupportedOperation(
                    pos,
                    "The overflow flag can't be set programmatically".to_string(),
                ))
            }
        };
        self.opcode(mnemonic, Mode::Implied, pos)
    }

    fn stack_stmt(&mut self, op: StackOp, target: StackTarget, pos: Pos) -> Result<(), Error> {
        let mnemonic = match (op, target) {
            (StackOp::Push, StackTarget::A) => Mnemonic::PHA,
            (StackOp::Push, StackTarget::Flags) => Mnemonic::PHP,
            (StackOp::Pull, StackTarget::A) => Mnemonic::PLA,
            (StackOp::Pull, StackTarget::Flags) => Mnemonic::PLP,
        };
        self.opcode(mnemonic, Mode::Implied, pos)
    }

    fn goto_stmt(&mut self, target: &Reference, pos: Pos) -> Result<(), Error> {
        let address = self.resolve_label(target.name())?;
        let mode = match target {
            Reference::Direct { .. } => Mode::Absolute,
            Reference::Indirect { .. } => Mode::Indirect,
        };
        self.opcode(Mnemonic::JMP, mode, pos)?;
        self.memory.write(&Value::word_le(address), pos)
    }

    // ------------------------------------------------------------------------
    // Helpers

    fn opcode(&mut self, mnemonic: Mnemonic, mode: Mode, pos: Pos) -> Result<(), Error> {
        let byte = arch::encode(mnemonic, mode)
            .ok_or_else(|| Error::Internal(format!("no opcode for {mnemonic} in {mode} mode")))?;
        self.memory.write(&Value::byte(byte), pos)
    }

    /// While sizing, an undeclared label leaves a placeholder and resolves to
    /// zero. While emitting, every label must have its final address.
    fn resolve_label(&mut self, name: &Name) -> Result<u16, Error> {
        match self.pass {
            Pass::Size => {
                let offset = self.memory.offset();
                let address = self.symbols.resolve_label_reference(name, offset)?;
                Ok(address.unwrap_or(0))
            }
            Pass::Emit => match self.symbols.get(&name.key()) {
                Some(Symbol::Label(Label {
                    address: Some(address),
                    ..
                })) => Ok(*address),
                Some(Symbol::Const(_)) => Err(Error::UnsupportedOperation(
                    name.pos,
                    format!("`{}` is a constant and can't be used as a jump target", name.text),
                )),
                _ => Err(Error::UndefinedName(name.pos, name.text.clone())),
            },
        }
    }
}
