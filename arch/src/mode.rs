use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Addressing modes of the 6502.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Mode {
    #[default]
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndirectX,
    IndirectY,
}

impl Mode {
    /// Operand syntax used when printing a decoded instruction.
    pub fn operand_hint(&self) -> &'static str {
        match self {
            Mode::Implied => "",
            Mode::Accumulator => "A",
            Mode::Immediate => "#nn",
            Mode::ZeroPage => "nn",
            Mode::ZeroPageX => "nn,X",
            Mode::ZeroPageY => "nn,Y",
            Mode::Relative => "rel",
            Mode::Absolute => "nnnn",
            Mode::AbsoluteX => "nnnn,X",
            Mode::AbsoluteY => "nnnn,Y",
            Mode::Indirect => "(nnnn)",
            Mode::IndirectX => "(nn,X)",
            Mode::IndirectY => "(nn),Y",
        }
    }
}

#[test]
fn test() {
    assert_eq!("indirect".parse::<Mode>(), Ok(Mode::Indirect));
    assert_eq!("Zero_Page_X".parse::<Mode>(), Ok(Mode::ZeroPageX));
    assert_eq!(Mode::AbsoluteY.to_string(), "absolute_y");
    assert!("sideways".parse::<Mode>().is_err());
}
