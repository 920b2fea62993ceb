use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Documented 6502 mnemonics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
pub enum Mnemonic {
    ADC,
    AND,
    ASL,
    BCC,
    BCS,
    BEQ,
    BIT,
    BMI,
    BNE,
    BPL,
    BRK,
    BVC,
    BVS,
    CLC,
    CLD,
    CLI,
    CLV,
    CMP,
    CPX,
    CPY,
    DEC,
    DEX,
    DEY,
    EOR,
    INC,
    INX,
    INY,
    JMP,
    JSR,
    LDA,
    LDX,
    LDY,
    LSR,
    NOP,
    ORA,
    PHA,
    PHP,
    PLA,
    PLP,
    ROL,
    ROR,
    RTI,
    RTS,
    SBC,
    SEC,
    SED,
    SEI,
    STA,
    STX,
    STY,
    TAX,
    TAY,
    TSX,
    TXA,
    TXS,
    TYA,
}

impl Mnemonic {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_uppercase().parse::<Self>() {
            Ok(m) => Ok(m),
            Err(_) => Err(format!("Unknown mnemonic: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_case() {
        assert_eq!(Mnemonic::parse("jmp"), Ok(Mnemonic::JMP));
        assert_eq!(Mnemonic::parse("Sec"), Ok(Mnemonic::SEC));
        assert!(Mnemonic::parse("hoge").is_err());
    }

    #[test]
    fn display_is_upper_case() {
        assert_eq!(Mnemonic::PHA.to_string(), "PHA");
    }
}
