//! Property tests for literal range checking.

use fass::ast::Pos;
use fass::literal::{eval_binary, eval_decimal, eval_hex, eval_negative};
use fass::Error;
use proptest::prelude::*;

proptest! {
    #[test]
    fn unsigned_in_range(v in 0u32..=0xFFFF) {
        let expected_len = if v <= 0xFF { 1 } else { 2 };
        for value in [
            eval_hex(&format!("${:X}", v), Pos::default()).unwrap(),
            eval_decimal(&v.to_string(), Pos::default()).unwrap(),
            eval_binary(&format!("%{:b}", v), Pos::default()).unwrap(),
        ] {
            prop_assert_eq!(value.data, v as i32);
            prop_assert_eq!(value.length, expected_len);
        }
    }

    #[test]
    fn unsigned_out_of_range(v in 0x10000u32..) {
        let hex = eval_hex(&format!("${:X}", v), Pos::default());
        let dec = eval_decimal(&v.to_string(), Pos::default());
        let bin = eval_binary(&format!("%{:b}", v), Pos::default());
        prop_assert!(matches!(hex, Err(Error::Range(..))));
        prop_assert!(matches!(dec, Err(Error::Range(..))));
        prop_assert!(matches!(bin, Err(Error::Range(..))));
    }

    #[test]
    fn negative_in_range(n in -128i32..=-1) {
        let value = eval_negative(&n.to_string(), Pos::default()).unwrap();
        prop_assert_eq!(value.data, n);
        prop_assert_eq!(value.bytes(), vec![n as u8]);
    }

    #[test]
    fn negative_out_of_range(n in i32::MIN..-128) {
        let result = eval_negative(&n.to_string(), Pos::default());
        prop_assert!(matches!(result, Err(Error::Range(..))));
    }
}
