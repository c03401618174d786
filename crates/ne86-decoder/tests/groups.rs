mod common;

use common::{assert_valid, dec};
use ne86_decoder::{Cpu, Gpr, InvalidReason, Op, Operand, Size, Width};

/// `[opcode, modrm(reg = slot, rm = bx), tail...]`
fn group_bytes(opcode: &[u8], slot: u8, tail: &[u8]) -> Vec<u8> {
    let mut bytes = opcode.to_vec();
    bytes.push(0xc3 | (slot << 3));
    bytes.extend_from_slice(tail);
    bytes
}

#[track_caller]
fn check_group(opcode: &[u8], tail: &[u8], slots: [Option<(Op, Cpu)>; 8]) {
    for (slot, expected) in slots.into_iter().enumerate() {
        let bytes = group_bytes(opcode, slot as u8, tail);
        let inst = dec(&bytes);
        match expected {
            Some((op, cpu)) => {
                assert_valid(&inst, &bytes);
                assert_eq!(inst.op(), op, "{bytes:02x?}");
                assert_eq!(inst.cpu(), cpu, "{bytes:02x?}");
            }
            None => {
                assert_eq!(inst.invalid_reason(), Some(InvalidReason::UnknownOpcode), "{bytes:02x?}");
            }
        }
    }
}

const A: Cpu = Cpu::I8086;

#[test]
fn group1_immediate_arithmetic() {
    let slots = [Op::Add, Op::Or, Op::Adc, Op::Sbb, Op::And, Op::Sub, Op::Xor, Op::Cmp].map(|op| Some((op, A)));
    check_group(&[0x80], &[0x01], slots);
    check_group(&[0x81], &[0x01, 0x02], slots);
    check_group(&[0x82], &[0x01], slots);
    check_group(&[0x83], &[0x01], slots);
}

#[test]
fn group1_sign_extends_byte_immediate() {
    // add bx, -1
    let inst = dec(&[0x83, 0xc3, 0xff]);
    assert_eq!(
        inst.operands(),
        &[Operand::reg(Gpr::Bx, Width::W16), Operand::Imm { value: 0xffff, size: Size::Word }]
    );
    // add ebx, -1
    let inst = dec(&[0x66, 0x83, 0xc3, 0xff]);
    assert_eq!(inst.operand(1), Some(&Operand::Imm { value: 0xffff_ffff, size: Size::Dword }));
    // 0x80 keeps the byte as-is.
    let inst = dec(&[0x80, 0xc3, 0xff]);
    assert_eq!(inst.operand(1), Some(&Operand::Imm { value: 0xff, size: Size::Byte }));
}

#[test]
fn group2_shifts_and_rotates() {
    let ops = [Op::Rol, Op::Ror, Op::Rcl, Op::Rcr, Op::Shl, Op::Shr, Op::Invalid, Op::Sar];
    let slots = |cpu| ops.map(|op| (op != Op::Invalid).then_some((op, cpu)));
    check_group(&[0xd0], &[], slots(A));
    check_group(&[0xd1], &[], slots(A));
    check_group(&[0xd2], &[], slots(A));
    check_group(&[0xd3], &[], slots(A));
    check_group(&[0xc0], &[0x04], slots(Cpu::I80186));
    check_group(&[0xc1], &[0x04], slots(Cpu::I80186));
}

#[test]
fn shift_count_operands() {
    let one = dec(&[0xd1, 0xe0]);
    assert_eq!(one.op(), Op::Shl);
    assert_eq!(one.operand(1), Some(&Operand::Imm { value: 1, size: Size::Byte }));
    let cl = dec(&[0xd3, 0xe0]);
    assert_eq!(cl.operand(1), Some(&Operand::reg(Gpr::Cx, Width::W8)));
    let imm = dec(&[0xc1, 0xe0, 0x04]);
    assert_eq!(imm.operand(1), Some(&Operand::Imm { value: 4, size: Size::Byte }));
}

#[test]
fn group3_unary() {
    let slots = [
        Some((Op::Test, A)),
        None,
        Some((Op::Not, A)),
        Some((Op::Neg, A)),
        Some((Op::Mul, A)),
        Some((Op::Imul, A)),
        Some((Op::Div, A)),
        Some((Op::Idiv, A)),
    ];
    // TEST carries an immediate, so it is checked apart from the other slots.
    let test = dec(&[0xf6, 0xc3, 0x80]);
    assert_eq!(test.op(), Op::Test);
    assert_eq!(test.len(), 3);
    let test = dec(&[0xf7, 0xc3, 0x00, 0x80]);
    assert_eq!(test.len(), 4);
    for (slot, expected) in slots.into_iter().enumerate().skip(2) {
        for opcode in [0xf6u8, 0xf7] {
            let bytes = group_bytes(&[opcode], slot as u8, &[]);
            let inst = dec(&bytes);
            assert_valid(&inst, &bytes);
            assert_eq!(Some((inst.op(), inst.cpu())), expected);
        }
    }
    assert!(dec(&[0xf6, 0xcb, 0x00]).is_invalid());
}

#[test]
fn groups_4_and_5() {
    check_group(&[0xfe], &[], [Some((Op::Inc, A)), Some((Op::Dec, A)), None, None, None, None, None, None]);

    // FF with a register: far forms need memory.
    let ok = |op| Some((op, A));
    for (slot, expected) in [ok(Op::Inc), ok(Op::Dec), ok(Op::Call), None, ok(Op::Jmp), None, ok(Op::Push)]
        .into_iter()
        .enumerate()
    {
        let bytes = group_bytes(&[0xff], slot as u8, &[]);
        let inst = dec(&bytes);
        match expected {
            Some((op, _)) => {
                assert_valid(&inst, &bytes);
                assert_eq!(inst.op(), op);
            }
            None => assert_eq!(inst.invalid_reason(), Some(InvalidReason::RegisterWhereMemoryRequired)),
        }
    }
    // call far [bx]
    let bytes = [0xff, 0x1f];
    let inst = dec(&bytes);
    assert_valid(&inst, &bytes);
    assert_eq!(inst.op(), Op::Callf);
    assert_eq!(inst.operand(0).map(Operand::size), Some(Size::Dword));
    assert!(dec(&[0xff, 0xff]).is_invalid());
}

#[test]
fn pop_and_mov_groups_use_slot_zero_only() {
    check_group(&[0x8f], &[], [Some((Op::Pop, A)), None, None, None, None, None, None, None]);
    check_group(&[0xc6], &[0x01], [Some((Op::Mov, A)), None, None, None, None, None, None, None]);
    check_group(&[0xc7], &[0x01, 0x00], [Some((Op::Mov, A)), None, None, None, None, None, None, None]);
}

#[test]
fn system_groups() {
    let p = Cpu::I80286;
    check_group(
        &[0x0f, 0x00],
        &[],
        [
            Some((Op::Sldt, p)),
            Some((Op::Str, p)),
            Some((Op::Lldt, p)),
            Some((Op::Ltr, p)),
            Some((Op::Verr, p)),
            Some((Op::Verw, p)),
            None,
            None,
        ],
    );

    // 0F 01 with memory operands.
    for (slot, op) in [(0u8, Op::Sgdt), (1, Op::Sidt), (2, Op::Lgdt), (3, Op::Lidt), (4, Op::Smsw), (6, Op::Lmsw)] {
        let bytes = [0x0f, 0x01, 0x07 | (slot << 3)];
        let inst = dec(&bytes);
        assert_valid(&inst, &bytes);
        assert_eq!(inst.op(), op);
        assert_eq!(inst.cpu(), p);
    }
    let lgdt = dec(&[0x0f, 0x01, 0x17]);
    assert_eq!(lgdt.operand(0).map(Operand::size), Some(Size::Fword));
    assert!(dec(&[0x0f, 0x01, 0x2f]).is_invalid());
    assert!(dec(&[0x0f, 0x01, 0x3f]).is_invalid());
}

#[test]
fn bit_test_group() {
    let r = Cpu::I80386;
    check_group(
        &[0x0f, 0xba],
        &[0x05],
        [None, None, None, None, Some((Op::Bt, r)), Some((Op::Bts, r)), Some((Op::Btr, r)), Some((Op::Btc, r))],
    );
}
