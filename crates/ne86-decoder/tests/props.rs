#![cfg(not(target_arch = "wasm32"))]

use ne86_decoder::{decode, DecodeContext, Decoder, InvalidReason, Operand, MAX_INST_LEN};
use proptest::prelude::*;

fn ctx(offset: u16) -> DecodeContext {
    DecodeContext::real_mode(0x1000, u32::from(offset))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2048,
        .. ProptestConfig::default()
    })]

    #[test]
    fn decode_consumes_a_prefix_of_the_source(
        bytes in prop::collection::vec(any::<u8>(), 0..40),
        offset in any::<u16>(),
    ) {
        let inst = decode(&bytes[..], 0, ctx(offset));
        prop_assert!(inst.len() <= bytes.len());
        prop_assert_eq!(inst.bytes(), &bytes[..inst.len()]);
        if inst.len() > MAX_INST_LEN {
            prop_assert!(inst.is_invalid());
        }
        if bytes.is_empty() {
            prop_assert_eq!(inst.invalid_reason(), Some(InvalidReason::Truncated));
        } else {
            prop_assert!(!inst.is_empty());
        }
    }

    #[test]
    fn result_depends_only_on_consumed_bytes(
        bytes in prop::collection::vec(any::<u8>(), 1..24),
        offset in any::<u16>(),
    ) {
        let inst = decode(&bytes[..], 0, ctx(offset));
        let again = decode(inst.bytes(), 0, ctx(offset));
        prop_assert_eq!(again, inst);
    }

    #[test]
    fn short_jump_targets_wrap_in_the_segment(offset in any::<u16>(), disp in any::<i8>()) {
        let inst = decode(&[0xeb, disp as u8][..], 0, ctx(offset));
        let expected = (i32::from(offset) + 2 + i32::from(disp)) as u32 & 0xffff;
        prop_assert_eq!(inst.branch_target(), Some(expected));
        prop_assert_eq!(inst.next_offset(), u32::from(offset) + 2);
    }

    #[test]
    fn near_call_targets_wrap_in_the_segment(offset in any::<u16>(), disp in any::<i16>()) {
        let [lo, hi] = disp.to_le_bytes();
        let inst = decode(&[0xe8, lo, hi][..], 0, ctx(offset));
        let expected = (i32::from(offset) + 3 + i32::from(disp)) as u32 & 0xffff;
        prop_assert_eq!(inst.branch_target(), Some(expected));
    }

    #[test]
    fn operand_size_prefix_widens_relative_targets(offset in any::<u16>(), disp in any::<i32>()) {
        let mut code = vec![0x66, 0xe9];
        code.extend_from_slice(&disp.to_le_bytes());
        let inst = decode(&code[..], 0, ctx(offset));
        let expected = u32::from(offset).wrapping_add(6).wrapping_add(disp as u32);
        let Some(Operand::Target { target, .. }) = inst.operand(0) else {
            return Err(TestCaseError::fail(format!("{inst}")));
        };
        prop_assert_eq!(*target, expected);
    }

    #[test]
    fn sweep_partitions_the_source(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let total: usize = Decoder::default()
            .sweep(&bytes[..], 0, ctx(0))
            .map(|i| i.len().max(1))
            .sum();
        prop_assert_eq!(total, bytes.len());
    }
}
