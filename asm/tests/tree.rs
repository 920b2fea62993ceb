use fass::ast::{Bit, Pos, Program, StmtKind};
use fass::{assemble, Error};

const TREE: &str = r#"
stmts:
  - pos: {line: 1, col: 1}
    kind:
      stmt: origin
      address: {literal: hex, text: "$0600"}
  - pos: {line: 2, col: 1}
    kind:
      stmt: const
      name: {text: Answer}
      value: {literal: decimal, text: "42"}
  - pos: {line: 3, col: 1}
    kind:
      stmt: data
      values:
        - {text: answer}
        - {literal: opcode, mnemonic: jmp, mode: indirect}
        - {literal: negative, text: "-1"}
  - kind: {stmt: flag_set, flag: carry, bit: 1}
  - kind: {stmt: stack, op: push, target: a}
  - kind:
      stmt: goto
      target: {mode: indirect, name: {text: vector}}
  - kind: {stmt: filler}
  - kind:
      stmt: remote_label
      name: {text: vector}
      address: {literal: hex, text: "$FFFC"}
"#;

#[test]
fn decode_and_assemble() {
    let program: Program = serde_yaml::from_str(TREE).unwrap();
    assert_eq!(program.stmts.len(), 8);
    assert_eq!(program.stmts[2].pos.line, 3);
    assert!(matches!(
        program.stmts[3].kind,
        StmtKind::FlagSet { bit: Bit::Set, .. }
    ));
    assert!(matches!(program.stmts[6].kind, StmtKind::Filler { value: None }));

    let out = assemble(&program).unwrap();
    assert_eq!(out.program(), &[0x2A, 0x6C, 0xFF, 0x38, 0x48, 0x6C, 0xFC, 0xFF]);
}

#[test]
fn bit_must_be_zero_or_one() {
    let tree = "stmts:\n  - kind: {stmt: flag_set, flag: carry, bit: 2}\n";
    assert!(serde_yaml::from_str::<Program>(tree).is_err());
}

#[test]
fn unknown_statement_is_rejected() {
    let tree = "stmts:\n  - kind: {stmt: macro}\n";
    assert!(serde_yaml::from_str::<Program>(tree).is_err());
}

#[test]
fn symbol_map_lists_labels_and_constants() {
    let program: Program = serde_yaml::from_str(TREE).unwrap();
    let out = assemble(&program).unwrap();
    let map = serde_yaml::to_string(&out.symbols).unwrap();
    assert!(map.contains("answer"));
    assert!(map.contains("vector"));
    assert!(map.contains("65532"));
}

#[test]
fn range_error_points_at_statement() {
    let tree = r#"
stmts:
  - pos: {line: 7, col: 3}
    kind:
      stmt: data
      values:
        - {literal: hex, text: "$10000"}
"#;
    let program: Program = serde_yaml::from_str(tree).unwrap();
    let err = assemble(&program).unwrap_err();
    assert!(matches!(err, Error::Range(pos, _) if pos == Pos::new(7, 3)));
}

#[test]
fn unknown_mode_points_at_statement() {
    let tree = r#"
stmts:
  - pos: {line: 4, col: 1}
    kind:
      stmt: data
      values:
        - {literal: opcode, mnemonic: lda, mode: sideways}
"#;
    let program: Program = serde_yaml::from_str(tree).unwrap();
    let err = assemble(&program).unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperation(pos, _) if pos == Pos::new(4, 1)));
}
