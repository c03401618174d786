mod common;

use common::{assert_valid, dec, dec32, r16};
use ne86_decoder::{AddrMode, Gpr, InvalidReason, MemRef, Op, Operand, SegReg, Size, Width};

fn mem(inst: &ne86_decoder::DecodedInstruction, idx: usize) -> MemRef {
    match inst.operand(idx) {
        Some(Operand::Mem(m)) => *m,
        other => panic!("operand {idx} is not memory: {other:?} in {inst}"),
    }
}

#[test]
fn all_24_memory_forms() {
    for mod_bits in 0..3u8 {
        for rm in 0..8u8 {
            let modrm = (mod_bits << 6) | rm;
            let mut bytes = vec![0x8b, modrm];
            let direct = mod_bits == 0 && rm == 6;
            match (mod_bits, direct) {
                (_, true) | (2, _) => bytes.extend([0x34, 0x82]),
                (1, _) => bytes.push(0x85),
                _ => {}
            }
            let inst = dec(&bytes);
            assert_valid(&inst, &bytes);
            assert_eq!(inst.op(), Op::Mov);
            assert_eq!(inst.operand(0), Some(&r16(Gpr::Ax)));

            let m = mem(&inst, 1);
            assert_eq!(m.mode.index(), mod_bits * 8 + rm);
            assert_eq!(m.size, Size::Word);
            let expected_disp = match (mod_bits, direct) {
                (_, true) => 0x8234,
                (1, _) => -0x7b,
                (2, _) => 0x8234u16 as i16 as i32,
                _ => 0,
            };
            assert_eq!(m.disp, expected_disp, "modrm {modrm:02x}");
        }
    }
}

#[test]
fn direct_address_ignores_operand_size() {
    for bytes in [
        vec![0x8a, 0x06, 0x10, 0x20],
        vec![0x8b, 0x06, 0x10, 0x20],
        vec![0x66, 0x8b, 0x06, 0x10, 0x20],
    ] {
        let inst = dec(&bytes);
        assert_valid(&inst, &bytes);
        let m = mem(&inst, 1);
        assert!(m.mode.is_direct());
        assert_eq!(m.mode.base(), None);
        assert_eq!(m.mode.index_reg(), None);
        assert_eq!(m.disp, 0x2010);
    }
}

#[test]
fn bp_based_forms_default_to_ss() {
    // mov ax, [bp+si]; mov ax, [bp+di+4]; mov ax, [bp+0x100]
    for bytes in [vec![0x8b, 0x02], vec![0x8b, 0x43, 0x04], vec![0x8b, 0x86, 0x00, 0x01]] {
        let inst = dec(&bytes);
        let m = mem(&inst, 1);
        assert_eq!(m.default_segment, SegReg::Ss);
        assert_eq!(m.segment, SegReg::Ss);
        assert!(!m.is_overridden());
    }
    // mov ax, [bx+si]
    let m = mem(&dec(&[0x8b, 0x00]), 1);
    assert_eq!(m.default_segment, SegReg::Ds);
}

#[test]
fn segment_override_keeps_default_for_reference() {
    let inst = dec(&[0x26, 0x8b, 0x46, 0x02]);
    let m = mem(&inst, 1);
    assert_eq!(m.segment, SegReg::Es);
    assert_eq!(m.default_segment, SegReg::Ss);
    assert!(m.is_overridden());
    assert_eq!(inst.segment_override(), Some(SegReg::Es));
    assert_eq!(inst.operand(1).map(ToString::to_string).as_deref(), Some("es:[bp+0x2]"));
}

#[test]
fn register_direct_uses_operand_size() {
    let inst = dec(&[0x66, 0x8b, 0xc1]);
    assert_eq!(inst.operands(), &[Operand::reg(Gpr::Ax, Width::W32), Operand::reg(Gpr::Cx, Width::W32)]);
    assert_eq!(inst.operand_size(), Width::W32);
    let inst = dec(&[0x8a, 0xe3]);
    assert_eq!(inst.operands(), &[Operand::reg(Gpr::Sp, Width::W8), Operand::reg(Gpr::Bx, Width::W8)]);
    assert_eq!(inst.operand(0).map(ToString::to_string).as_deref(), Some("ah"));
}

#[test]
fn memory_only_forms_reject_registers() {
    // lea ax, bx
    let inst = dec(&[0x8d, 0xc3]);
    assert_eq!(inst.op(), Op::Lea);
    assert_eq!(inst.invalid_reason(), Some(InvalidReason::RegisterWhereMemoryRequired));
    assert!(matches!(inst.operand(1), Some(Operand::Lea(m)) if m.mode == AddrMode::DIRECT));
    assert_eq!(inst.len(), 2);

    // les / lds / lgdt with a register
    for bytes in [&[0xc4u8, 0xc0][..], &[0xc5, 0xc0], &[0x0f, 0x01, 0xd0], &[0x0f, 0xb2, 0xc0]] {
        assert_eq!(
            dec(bytes).invalid_reason(),
            Some(InvalidReason::RegisterWhereMemoryRequired),
            "{bytes:02x?}"
        );
    }
}

#[test]
fn lea_is_address_only() {
    let bytes = [0x8d, 0x47, 0xfe];
    let inst = dec(&bytes);
    assert_valid(&inst, &bytes);
    match inst.operand(1) {
        Some(Operand::Lea(m)) => {
            assert_eq!(m.mode.base(), Some(Gpr::Bx));
            assert_eq!(m.disp, -2);
        }
        other => panic!("expected lea operand, got {other:?}"),
    }
    assert!(!inst.operand(1).is_some_and(Operand::is_memory));
}

#[test]
fn address_size_override_is_soft_invalid() {
    // 67 8B 04 => mov ax, [esi] in 32-bit addressing; not implemented.
    let inst = dec(&[0x67, 0x8b, 0x04, 0x00]);
    assert_eq!(inst.invalid_reason(), Some(InvalidReason::Addressing32));
    assert_eq!(inst.address_size(), Width::W32);
    let m = mem(&inst, 1);
    assert_eq!(m.mode, AddrMode::DIRECT);
    assert_eq!(m.disp, 0);
    // The SIB byte is consumed so a sweep stays in step.
    assert_eq!(inst.len(), 4);

    // 32-bit default code hits the same path without a prefix.
    let inst = dec32(&[0x8b, 0x00]);
    assert_eq!(inst.invalid_reason(), Some(InvalidReason::Addressing32));

    // Register-direct forms never touch the addressing path.
    let inst = dec(&[0x67, 0x8b, 0xc0]);
    assert!(!inst.is_invalid());
}
