use crate::{
    ast::Program,
    codegen::{Context, Record},
    error::Error,
    symbol::Symbols,
};

/// Result of a complete assembly run.
#[derive(Debug, Clone)]
pub struct Assembled {
    /// The full 64K memory image.
    pub image: Vec<u8>,
    pub symbols: Symbols,
    /// Address of the first byte of the program.
    pub start: u16,
    /// Address one past the last byte of the program.
    pub end: u32,
    pub records: Vec<Record>,
}

impl Assembled {
    /// The image trimmed to `[start, end)`.
    pub fn program(&self) -> &[u8] {
        &self.image[self.start as usize..self.end as usize]
    }
}

/// First pass: walks the program with a dry cursor and returns the symbol
/// table with every declared label's final address.
pub fn size_pass(program: &Program) -> Result<Symbols, Error> {
    tracing::trace!("starting pass 1");
    let mut ctx = Context::sizing();
    for stmt in &program.stmts {
        ctx.stmt(stmt)?;
    }
    let (symbols, memory, _) = ctx.into_parts();
    let (labels, consts) = symbols.count();
    tracing::debug!(
        "pass 1: {} labels, {} constants, program ${:04X}..${:04X}",
        labels,
        consts,
        memory.start(),
        memory.address()
    );
    for name in symbols.undefined_labels() {
        tracing::debug!("label `{}` is referenced but never declared", name);
    }
    Ok(symbols)
}

/// Second pass: walks the program again against a complete table and writes
/// the image.
pub fn emit_pass(program: &Program, symbols: Symbols) -> Result<Assembled, Error> {
    tracing::trace!("starting pass 2");
    let mut ctx = Context::emitting(symbols);
    for stmt in &program.stmts {
        ctx.stmt(stmt)?;
    }
    let (symbols, memory, records) = ctx.into_parts();
    let (start, end) = (memory.start(), memory.address());
    tracing::debug!("pass 2: {} bytes emitted", end - start as u32);
    Ok(Assembled {
        image: memory.into_image(),
        symbols,
        start,
        end,
        records,
    })
}

/// Assembles `program`, stopping at the first error.
pub fn assemble(program: &Program) -> Result<Assembled, Error> {
    let symbols = size_pass(program)?;
    emit_pass(program, symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Address, Literal, Name, Reference, Stmt, StmtKind};
    use crate::symbol::Label;

    fn program(stmts: Vec<StmtKind>) -> Program {
        Program {
            stmts: stmts.into_iter().map(Stmt::new).collect(),
        }
    }

    #[test]
    fn size_pass_alone_yields_table() {
        let prog = program(vec![
            StmtKind::Origin {
                address: Address::hex("$C000"),
            },
            StmtKind::Label {
                name: Name::new("start"),
            },
            StmtKind::Goto {
                target: Reference::Direct {
                    name: Name::new("start"),
                },
            },
        ]);
        let symbols = size_pass(&prog).unwrap();
        assert_eq!(
            symbols.label("start"),
            Some(&Label {
                address: Some(0xC000),
                offset: None
            })
        );
    }

    #[test]
    fn program_slice() {
        let prog = program(vec![
            StmtKind::Origin {
                address: Address::hex("$0600"),
            },
            StmtKind::Data {
                values: vec![Literal::hex("$01").into(), Literal::decimal("2").into()],
            },
        ]);
        let out = assemble(&prog).unwrap();
        assert_eq!(out.image.len(), 0x10000);
        assert_eq!((out.start, out.end), (0x0600, 0x0602));
        assert_eq!(out.program(), &[0x01, 0x02]);
    }

    #[test]
    fn empty_program() {
        let out = assemble(&Program::default()).unwrap();
        assert!(out.program().is_empty());
        assert!(out.symbols.is_empty());
    }
}
