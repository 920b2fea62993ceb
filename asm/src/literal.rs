use arch::Mode;
use serde::{Deserialize, Serialize};
use std::num::IntErrorKind;

use crate::{
    ast::{Address, Literal, Pos, StaticValue},
    error::Error,
    symbol::Symbols,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endian {
    #[default]
    Big,
    Little,
}

/// A literal, constant or opcode byte ready to be written.
///
/// `data` always fits in `length` bytes. Negative data only comes from
/// negative literals (-128..-1, one byte) and is emitted as two's complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    pub data: i32,
    pub length: usize,
    pub endian: Endian,
}

impl Value {
    pub fn byte(data: u8) -> Self {
        Value {
            data: data as i32,
            length: 1,
            endian: Endian::Big,
        }
    }

    /// Two byte little-endian operand, as used for jump targets.
    pub fn word_le(data: u16) -> Self {
        Value {
            data: data as i32,
            length: 2,
            endian: Endian::Little,
        }
    }

    fn unsigned(data: u16) -> Self {
        Value {
            data: data as i32,
            length: if data > 0xFF { 2 } else { 1 },
            endian: Endian::Big,
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        let raw = self.data as u16;
        match (self.length, self.endian) {
            (1, _) => vec![raw as u8],
            (_, Endian::Big) => raw.to_be_bytes().to_vec(),
            (_, Endian::Little) => raw.to_le_bytes().to_vec(),
        }
    }
}

// ----------------------------------------------------------------------------
// Literals

fn parse_unsigned(digits: &str, radix: u32, what: &'static str, pos: Pos) -> Result<u32, Error> {
    u32::from_str_radix(digits, radix).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => Error::Range(
            pos,
            format!("Value {digits} not allowed, it's larger than 16 bits"),
        ),
        _ => Error::InvalidLiteral(pos, digits.to_string(), what),
    })
}

pub fn eval_hex(text: &str, pos: Pos) -> Result<Value, Error> {
    let hex = text.strip_prefix('$').unwrap_or(text);
    let value = parse_unsigned(hex, 16, "hexadecimal", pos)?;
    if value > 0xFFFF {
        return Err(Error::Range(
            pos,
            format!("Value ${hex} not allowed, it's larger than $FFFF (16 bits)"),
        ));
    }
    Ok(Value::unsigned(value as u16))
}

pub fn eval_decimal(text: &str, pos: Pos) -> Result<Value, Error> {
    let value = parse_unsigned(text, 10, "decimal", pos)?;
    if value > 0xFFFF {
        return Err(Error::Range(
            pos,
            format!("Value {text} not allowed, it's larger than 65535 (16 bits)"),
        ));
    }
    Ok(Value::unsigned(value as u16))
}

pub fn eval_binary(text: &str, pos: Pos) -> Result<Value, Error> {
    let bin = text.strip_prefix('%').unwrap_or(text);
    let value = parse_unsigned(bin, 2, "binary", pos)?;
    if value > 0xFFFF {
        return Err(Error::Range(
            pos,
            format!("Value %{bin} not allowed, it's larger than 65535 (16 bits)"),
        ));
    }
    Ok(Value::unsigned(value as u16))
}

/// Negative literals must fit one signed byte. The value is kept signed;
/// framing happens when the bytes are written.
pub fn eval_negative(text: &str, pos: Pos) -> Result<Value, Error> {
    let out_of_range = || {
        Error::Range(
            pos,
            format!(
                "Value {text} not allowed, negative values must be in range -128..-1 (8 bits with sign bit set to 1)"
            ),
        )
    };
    let neg = text.parse::<i32>().map_err(|e| match e.kind() {
        IntErrorKind::NegOverflow | IntErrorKind::PosOverflow => out_of_range(),
        _ => Error::InvalidLiteral(pos, text.to_string(), "negative decimal"),
    })?;
    if !(-128..=-1).contains(&neg) {
        return Err(out_of_range());
    }
    Ok(Value {
        data: neg,
        length: 1,
        endian: Endian::Big,
    })
}

pub fn eval_opcode(mnemonic: &str, mode: Option<Mode>, pos: Pos) -> Result<Value, Error> {
    match arch::lookup(mnemonic, mode) {
        Some(byte) => Ok(Value::byte(byte)),
        None => Err(Error::UnsupportedOperation(
            pos,
            match mode {
                Some(mode) => format!("No opcode for `{mnemonic}` in {mode} mode"),
                None => format!("No operand-less opcode for `{mnemonic}`"),
            },
        )),
    }
}

pub fn eval_literal(lit: &Literal) -> Result<Value, Error> {
    match lit {
        Literal::Hex { pos, text } => eval_hex(text, *pos),
        Literal::Decimal { pos, text } => eval_decimal(text, *pos),
        Literal::Binary { pos, text } => eval_binary(text, *pos),
        Literal::Negative { pos, text } => eval_negative(text, *pos),
        Literal::Opcode {
            pos,
            mnemonic,
            mode,
        } => eval_opcode(mnemonic, eval_mode(mode.as_deref(), *pos)?, *pos),
    }
}

fn eval_mode(mode: Option<&str>, pos: Pos) -> Result<Option<Mode>, Error> {
    mode.map(|text| {
        text.parse::<Mode>().map_err(|_| {
            Error::UnsupportedOperation(pos, format!("Unknown addressing mode `{text}`"))
        })
    })
    .transpose()
}

/// Evaluates a literal or a constant name. Constants are never
/// forward-referenced: the name must already be declared.
pub fn eval_static_value(value: &StaticValue, symbols: &Symbols) -> Result<Value, Error> {
    match value {
        StaticValue::Literal(lit) => eval_literal(lit),
        StaticValue::Name(name) => symbols
            .constant(&name.key())
            .copied()
            .ok_or_else(|| Error::UndefinedName(name.pos, name.text.clone())),
    }
}

pub fn eval_address(address: &Address) -> Result<u16, Error> {
    let value = match address {
        Address::Hex { pos, text } => eval_hex(text, *pos)?,
        Address::Decimal { pos, text } => eval_decimal(text, *pos)?,
    };
    Ok(value.data as u16)
}
