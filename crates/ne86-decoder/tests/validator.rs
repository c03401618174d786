//! Prefix applicability, reserved registers and processor limits.

mod common;

use common::{assert_valid, dec, dec_with};
use ne86_decoder::{Cpu, DecodeOptions, InvalidReason, Op, RepKind};

fn reason(bytes: &[u8]) -> Option<InvalidReason> {
    dec(bytes).invalid_reason()
}

#[test]
fn rep_on_string_instructions() {
    for bytes in [
        &[0xf3u8, 0xa4][..],
        &[0xf3, 0xa5],
        &[0xf3, 0xaa],
        &[0xf3, 0xac],
        &[0xf3, 0x6c],
        &[0xf3, 0x6f],
        &[0xf3, 0xa6],
        &[0xf2, 0xa6],
        &[0xf2, 0xae],
        &[0xf3, 0xaf],
    ] {
        let inst = dec(bytes);
        assert_valid(&inst, bytes);
        assert_ne!(inst.rep(), RepKind::None);
    }
}

#[test]
fn rep_elsewhere_is_rejected() {
    assert_eq!(reason(&[0xf3, 0x01, 0xc0]), Some(InvalidReason::BadRepPrefix));
    assert_eq!(reason(&[0xf3, 0x90]), Some(InvalidReason::BadRepPrefix));
    assert_eq!(reason(&[0xf2, 0xeb, 0x00]), Some(InvalidReason::BadRepPrefix));
}

#[test]
fn repne_only_on_compare_strings() {
    for bytes in [[0xf2u8, 0xa4], [0xf2, 0xaa], [0xf2, 0xac], [0xf2, 0x6c]] {
        assert_eq!(reason(&bytes), Some(InvalidReason::BadRepPrefix), "{bytes:02x?}");
    }
    assert_eq!(dec(&[0xf2, 0xae]).rep(), RepKind::Repne);
}

#[test]
fn lock_on_memory_read_modify_write() {
    for bytes in [
        &[0xf0u8, 0x01, 0x07][..],
        &[0xf0, 0x80, 0x07, 0x01],
        &[0xf0, 0xfe, 0x07],
        &[0xf0, 0xf7, 0x17],
        &[0xf0, 0x86, 0x07],
        &[0xf0, 0x0f, 0xab, 0x07],
    ] {
        let inst = dec(bytes);
        assert_valid(&inst, bytes);
        assert!(inst.lock());
    }
}

#[test]
fn lock_elsewhere_is_rejected() {
    // Register destination, a plain move, a compare, and a non-RMW opcode.
    for bytes in [
        &[0xf0u8, 0x01, 0xc0][..],
        &[0xf0, 0x89, 0x07],
        &[0xf0, 0x39, 0x07],
        &[0xf0, 0x90],
    ] {
        assert_eq!(reason(bytes), Some(InvalidReason::BadLockPrefix), "{bytes:02x?}");
    }
}

#[test]
fn relaxed_lock_accepts_anything() {
    let relaxed = DecodeOptions {
        strict_lock: false,
        ..DecodeOptions::default()
    };
    let inst = dec_with(relaxed, &[0xf0, 0x01, 0xc0]);
    assert!(!inst.is_invalid());
    assert!(inst.lock());
}

#[test]
fn segment_register_encodings() {
    assert_eq!(reason(&[0x8e, 0xc8]), Some(InvalidReason::ReservedRegister));
    assert_eq!(reason(&[0x8e, 0xf0]), Some(InvalidReason::ReservedRegister));
    assert_eq!(reason(&[0x8c, 0xf8]), Some(InvalidReason::ReservedRegister));
    // Storing CS is fine.
    assert_valid(&dec(&[0x8c, 0xc8]), &[0x8c, 0xc8]);

    let fs = dec(&[0x8e, 0xe0]);
    assert!(!fs.is_invalid());
    assert_eq!(fs.cpu(), Cpu::I80386);
    assert_eq!(dec(&[0x8e, 0xd8]).cpu(), Cpu::I8086);
}

#[test]
fn special_register_indices() {
    for cr in [1u8, 4, 5, 6, 7] {
        let modrm = 0xc0 | (cr << 3);
        assert_eq!(reason(&[0x0f, 0x20, modrm]), Some(InvalidReason::ReservedRegister), "cr{cr}");
    }
    for tr in 0u8..6 {
        let modrm = 0xc0 | (tr << 3);
        assert_eq!(reason(&[0x0f, 0x24, modrm]), Some(InvalidReason::ReservedRegister), "tr{tr}");
    }
    for dr in 0u8..8 {
        let modrm = 0xc0 | (dr << 3);
        assert_eq!(reason(&[0x0f, 0x21, modrm]), None, "dr{dr}");
    }
}

#[test]
fn processor_limit() {
    let limit = |max_cpu| DecodeOptions {
        max_cpu,
        ..DecodeOptions::default()
    };
    let cases: &[(&[u8], Cpu)] = &[
        (&[0xc8, 0x04, 0x00, 0x00], Cpu::I80186),
        (&[0x0f, 0x01, 0xe0], Cpu::I80286),
        (&[0x0f, 0xb6, 0xc0], Cpu::I80386),
        (&[0x66, 0x40], Cpu::I80386),
        (&[0x64, 0x8b, 0x07], Cpu::I80386),
    ];
    for &(bytes, needs) in cases {
        let inst = dec(bytes);
        assert_eq!(inst.cpu(), needs, "{bytes:02x?}");
        assert!(!inst.is_invalid());

        let below = match needs {
            Cpu::I80186 => Cpu::I8086,
            Cpu::I80286 => Cpu::I80186,
            _ => Cpu::I80286,
        };
        let limited = dec_with(limit(below), bytes);
        assert_eq!(limited.invalid_reason(), Some(InvalidReason::CpuNotAllowed), "{bytes:02x?}");
        assert_eq!(limited.len(), bytes.len());
        assert!(!dec_with(limit(needs), bytes).is_invalid());
    }
}

#[test]
fn operand_size_prefix_raises_the_tag_of_old_opcodes() {
    let inst = dec(&[0x66, 0x01, 0xc0]);
    assert_eq!(inst.op(), Op::Add);
    assert_eq!(inst.cpu(), Cpu::I80386);
}

#[test]
fn first_reason_wins() {
    // The ModRM read runs off the end before the REP check happens.
    assert_eq!(reason(&[0xf3, 0x01]), Some(InvalidReason::Truncated));
    // A register where memory is required is found before the LOCK check.
    assert_eq!(reason(&[0xf0, 0x8d, 0xc0]), Some(InvalidReason::RegisterWhereMemoryRequired));
}
