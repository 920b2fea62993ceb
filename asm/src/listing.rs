use color_print::cformat;

use crate::{
    assembler::Assembled,
    ast::{Address, Literal, Program, Reference, StaticValue, StmtKind},
    codegen::Record,
    symbol::Symbol,
};

fn literal(lit: &Literal) -> String {
    match lit {
        Literal::Hex { text, .. }
        | Literal::Decimal { text, .. }
        | Literal::Binary { text, .. }
        | Literal::Negative { text, .. } => cformat!("<y>{}</>", text),
        Literal::Opcode { mnemonic, mode, .. } => match mode {
            Some(mode) => cformat!("<r>{}</>.{}", mnemonic.to_uppercase(), mode),
            None => cformat!("<r>{}</>", mnemonic.to_uppercase()),
        },
    }
}

fn value(value: &StaticValue) -> String {
    match value {
        StaticValue::Literal(lit) => literal(lit),
        StaticValue::Name(name) => cformat!("<c>{}</>", name.text),
    }
}

fn address(address: &Address) -> String {
    match address {
        Address::Hex { text, .. } | Address::Decimal { text, .. } => cformat!("<y>{}</>", text),
    }
}

fn stmt(kind: &StmtKind) -> String {
    match kind {
        StmtKind::Const { name, value: v } => cformat!("<c>#{}</> = {}", name.text, value(v)),
        StmtKind::Label { name } => cformat!("<g>{}:</>", name.text),
        StmtKind::RemoteLabel { name, address } => {
            cformat!("<g>{}:</> @ {}", name.text, value(address))
        }
        StmtKind::Origin { address: a } => cformat!("<b>origin</> {}", address(a)),
        StmtKind::Filler { value: v } => match v {
            Some(v) => cformat!("<b>filler</> {}", value(v)),
            None => cformat!("<b>filler</> default"),
        },
        StmtKind::Data { values } => {
            let values: Vec<String> = values.iter().map(value).collect();
            cformat!("<b>data</> {}", values.join(", "))
        }
        StmtKind::FlagSet { flag, bit } => {
            cformat!("<b>set</> {:?} <y>{}</>", flag, u8::from(*bit))
        }
        StmtKind::Stack { op, target } => cformat!("<b>{:?}</> {:?}", op, target),
        StmtKind::Goto { target } => match target {
            Reference::Direct { name } => cformat!("<b>goto</> <g>{}</>", name.text),
            Reference::Indirect { name } => cformat!("<b>goto</> (<g>{}</>)", name.text),
        },
    }
}

/// Mnemonic of the opcode a statement starts with, for instruction statements.
fn decoded(kind: &StmtKind, record: &Record) -> String {
    let is_inst = matches!(
        kind,
        StmtKind::FlagSet { .. } | StmtKind::Stack { .. } | StmtKind::Goto { .. }
    );
    match record.bytes.first().and_then(|&b| arch::decode(b)) {
        Some((mnemonic, mode)) if is_inst => {
            cformat!("  <s>; {} {}</>", mnemonic, mode.operand_hint())
        }
        _ => String::new(),
    }
}

fn bytes(record: &Record) -> String {
    let shown: Vec<String> = record
        .bytes
        .iter()
        .take(3)
        .map(|b| format!("{:02X}", b))
        .collect();
    let more = if record.bytes.len() > 3 { "+" } else { " " };
    format!("{:<8}{}", shown.join(" "), more)
}

/// One row per statement: address and bytes for emitting statements,
/// followed by the symbol table.
pub fn format_dump(program: &Program, out: &Assembled) -> Vec<String> {
    let mut rows = vec![];
    let mut records = out.records.iter();
    for s in &program.stmts {
        let emits = matches!(
            s.kind,
            StmtKind::Data { .. }
                | StmtKind::FlagSet { .. }
                | StmtKind::Stack { .. }
                | StmtKind::Goto { .. }
        );
        let record = if emits { records.next() } else { None };
        let row = match record {
            Some(record) => format!(
                "[{:04X}] {} | {:>4}:   {}{}",
                record.address,
                bytes(record),
                s.pos.line,
                stmt(&s.kind),
                decoded(&s.kind, record)
            ),
            None => format!("{:16}| {:>4}: {}", "", s.pos.line, stmt(&s.kind)),
        };
        rows.push(row);
    }
    rows.push(format!("{}+{}", "-".repeat(16), "-".repeat(40)));

    for (name, symbol) in out.symbols.iter() {
        let row = match symbol {
            Symbol::Label(label) => match label.address {
                Some(addr) => cformat!("<g>{:04X}</>            | {}", addr, name),
                None => cformat!("<r,s>????</>            | {}", name),
            },
            Symbol::Const(v) => cformat!(
                "<c>{:<16}</>| #{} ({} byte, {:?})",
                v.data,
                name,
                v.length,
                v.endian
            ),
        };
        rows.push(row);
    }
    rows
}

pub fn print_dump(program: &Program, out: &Assembled) {
    for row in format_dump(program, out) {
        println!("{}", row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::ast::{Bit, Flag, Name, Stmt};

    #[test]
    fn dump_rows() {
        let program = Program {
            stmts: vec![
                Stmt::new(StmtKind::Origin {
                    address: Address::hex("$0600"),
                })
                .at(1, 1),
                Stmt::new(StmtKind::Goto {
                    target: Reference::Direct {
                        name: Name::new("loop"),
                    },
                })
                .at(2, 1),
                Stmt::new(StmtKind::Label {
                    name: Name::new("loop"),
                })
                .at(3, 1),
                Stmt::new(StmtKind::FlagSet {
                    flag: Flag::Carry,
                    bit: Bit::Set,
                })
                .at(4, 1),
            ],
        };
        let out = assemble(&program).unwrap();
        let rows = format_dump(&program, &out);
        assert_eq!(rows.len(), 4 + 1 + 1);
        assert!(rows[1].starts_with("[0600] 4C 03 06"));
        assert!(rows[1].contains("; JMP nnnn"));
        assert!(rows[3].starts_with("[0603] 38"));
        assert!(rows[3].contains("; SEC"));
        assert!(rows[5].contains("0603"));
        assert!(rows[5].ends_with("loop"));
    }
}
