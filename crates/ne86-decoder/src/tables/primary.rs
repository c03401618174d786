//! One-byte opcode table.

use ne86_types::{Cpu, SegReg};

use super::groups;
use super::{Action, Entry, Form, Leaf, Sz};
use crate::effects::{self as fx, FlagEffects};
use crate::op::Op;

const fn i86(op: Op, desc: &'static str, size: Sz, form: Form, flags: FlagEffects) -> Leaf {
    Leaf::new(op, Cpu::I8086, desc, size, form, flags)
}

const fn i186(op: Op, desc: &'static str, size: Sz, form: Form, flags: FlagEffects) -> Leaf {
    Leaf::new(op, Cpu::I80186, desc, size, form, flags)
}

const fn i286(op: Op, desc: &'static str, size: Sz, form: Form, flags: FlagEffects) -> Leaf {
    Leaf::new(op, Cpu::I80286, desc, size, form, flags)
}

const NONE: FlagEffects = FlagEffects::NONE;

/// `op r/m8,r8` / `op r/m,r` and their bit-1 reversed forms.
const fn alu_rm_b(base: u8, op: Op, desc: &'static str, flags: FlagEffects) -> Entry {
    Entry::masked(base, 0xfd, i86(op, desc, Sz::B, Form::RmReg, flags).dir())
}

const fn alu_rm_v(base: u8, op: Op, desc: &'static str, flags: FlagEffects) -> Entry {
    Entry::masked(base | 1, 0xfd, i86(op, desc, Sz::V, Form::RmReg, flags).dir())
}

const fn alu_acc_b(base: u8, op: Op, desc: &'static str, flags: FlagEffects) -> Entry {
    Entry::one(base | 4, i86(op, desc, Sz::B, Form::AccImm, flags))
}

const fn alu_acc_v(base: u8, op: Op, desc: &'static str, flags: FlagEffects) -> Entry {
    Entry::one(base | 5, i86(op, desc, Sz::V, Form::AccImm, flags))
}

static PRIMARY: &[Entry] = &[
    // 0x00..=0x3F: arithmetic/logic block, segment push/pop and decimal adjust.
    alu_rm_b(0x00, Op::Add, "Add", fx::ARITH),
    alu_rm_v(0x00, Op::Add, "Add", fx::ARITH),
    alu_acc_b(0x00, Op::Add, "Add", fx::ARITH),
    alu_acc_v(0x00, Op::Add, "Add", fx::ARITH),
    Entry::one(0x06, i86(Op::Push, "Push segment register", Sz::W, Form::FixedSeg(SegReg::Es), NONE)),
    Entry::one(0x07, i86(Op::Pop, "Pop segment register", Sz::W, Form::FixedSeg(SegReg::Es), NONE)),
    alu_rm_b(0x08, Op::Or, "Logical inclusive OR", fx::LOGIC),
    alu_rm_v(0x08, Op::Or, "Logical inclusive OR", fx::LOGIC),
    alu_acc_b(0x08, Op::Or, "Logical inclusive OR", fx::LOGIC),
    alu_acc_v(0x08, Op::Or, "Logical inclusive OR", fx::LOGIC),
    Entry::one(0x0e, i86(Op::Push, "Push segment register", Sz::W, Form::FixedSeg(SegReg::Cs), NONE)),
    Entry {
        pattern: 0x0f,
        mask: 0xff,
        action: Action::Escape,
    },
    alu_rm_b(0x10, Op::Adc, "Add with carry", fx::ARITH),
    alu_rm_v(0x10, Op::Adc, "Add with carry", fx::ARITH),
    alu_acc_b(0x10, Op::Adc, "Add with carry", fx::ARITH),
    alu_acc_v(0x10, Op::Adc, "Add with carry", fx::ARITH),
    Entry::one(0x16, i86(Op::Push, "Push segment register", Sz::W, Form::FixedSeg(SegReg::Ss), NONE)),
    Entry::one(0x17, i86(Op::Pop, "Pop segment register", Sz::W, Form::FixedSeg(SegReg::Ss), NONE)),
    alu_rm_b(0x18, Op::Sbb, "Subtract with borrow", fx::ARITH),
    alu_rm_v(0x18, Op::Sbb, "Subtract with borrow", fx::ARITH),
    alu_acc_b(0x18, Op::Sbb, "Subtract with borrow", fx::ARITH),
    alu_acc_v(0x18, Op::Sbb, "Subtract with borrow", fx::ARITH),
    Entry::one(0x1e, i86(Op::Push, "Push segment register", Sz::W, Form::FixedSeg(SegReg::Ds), NONE)),
    Entry::one(0x1f, i86(Op::Pop, "Pop segment register", Sz::W, Form::FixedSeg(SegReg::Ds), NONE)),
    alu_rm_b(0x20, Op::And, "Logical AND", fx::LOGIC),
    alu_rm_v(0x20, Op::And, "Logical AND", fx::LOGIC),
    alu_acc_b(0x20, Op::And, "Logical AND", fx::LOGIC),
    alu_acc_v(0x20, Op::And, "Logical AND", fx::LOGIC),
    Entry::one(0x27, i86(Op::Daa, "Decimal adjust AL after addition", Sz::B, Form::None, fx::DECIMAL_ADJUST)),
    alu_rm_b(0x28, Op::Sub, "Subtract", fx::ARITH),
    alu_rm_v(0x28, Op::Sub, "Subtract", fx::ARITH),
    alu_acc_b(0x28, Op::Sub, "Subtract", fx::ARITH),
    alu_acc_v(0x28, Op::Sub, "Subtract", fx::ARITH),
    Entry::one(0x2f, i86(Op::Das, "Decimal adjust AL after subtraction", Sz::B, Form::None, fx::DECIMAL_ADJUST)),
    alu_rm_b(0x30, Op::Xor, "Logical exclusive OR", fx::LOGIC),
    alu_rm_v(0x30, Op::Xor, "Logical exclusive OR", fx::LOGIC),
    alu_acc_b(0x30, Op::Xor, "Logical exclusive OR", fx::LOGIC),
    alu_acc_v(0x30, Op::Xor, "Logical exclusive OR", fx::LOGIC),
    Entry::one(0x37, i86(Op::Aaa, "ASCII adjust AL after addition", Sz::B, Form::None, fx::ASCII_ADJUST)),
    alu_rm_b(0x38, Op::Cmp, "Compare", fx::ARITH),
    alu_rm_v(0x38, Op::Cmp, "Compare", fx::ARITH),
    alu_acc_b(0x38, Op::Cmp, "Compare", fx::ARITH),
    alu_acc_v(0x38, Op::Cmp, "Compare", fx::ARITH),
    Entry::one(0x3f, i86(Op::Aas, "ASCII adjust AL after subtraction", Sz::B, Form::None, fx::ASCII_ADJUST)),
    // 0x40..=0x5F: register INC/DEC/PUSH/POP.
    Entry::masked(0x40, 0xf8, i86(Op::Inc, "Increment by 1", Sz::V, Form::OpReg, fx::INC_DEC)),
    Entry::masked(0x48, 0xf8, i86(Op::Dec, "Decrement by 1", Sz::V, Form::OpReg, fx::INC_DEC)),
    Entry::masked(0x50, 0xf8, i86(Op::Push, "Push word onto the stack", Sz::V, Form::OpReg, NONE)),
    Entry::masked(0x58, 0xf8, i86(Op::Pop, "Pop word from the stack", Sz::V, Form::OpReg, NONE)),
    // 0x60..=0x6F
    Entry::one(0x60, i186(Op::Pusha, "Push all general registers", Sz::V, Form::None, NONE)),
    Entry::one(0x61, i186(Op::Popa, "Pop all general registers", Sz::V, Form::None, NONE)),
    Entry::one(0x62, i186(Op::Bound, "Check array index against bounds", Sz::V, Form::RegMemPair, NONE)),
    Entry::one(0x63, i286(Op::Arpl, "Adjust RPL field of selector", Sz::W, Form::RmReg, fx::ZF_ONLY)),
    Entry::one(0x68, i186(Op::Push, "Push immediate", Sz::V, Form::Imm, NONE)),
    Entry::one(0x69, i186(Op::Imul, "Signed multiply by immediate", Sz::V, Form::RegRmImm, fx::MUL)),
    Entry::one(0x6a, i186(Op::Push, "Push sign-extended immediate byte", Sz::V, Form::Imm8s, NONE)),
    Entry::one(0x6b, i186(Op::Imul, "Signed multiply by sign-extended immediate byte", Sz::V, Form::RegRmImm8s, fx::MUL)),
    Entry::one(0x6c, i186(Op::Ins, "Input string from port DX", Sz::B, Form::None, NONE)),
    Entry::one(0x6d, i186(Op::Ins, "Input string from port DX", Sz::V, Form::None, NONE)),
    Entry::one(0x6e, i186(Op::Outs, "Output string to port DX", Sz::B, Form::None, NONE)),
    Entry::one(0x6f, i186(Op::Outs, "Output string to port DX", Sz::V, Form::None, NONE)),
    // 0x70..=0x7F: short conditional jumps.
    Entry::masked(0x70, 0xf0, i86(Op::Jcc, "Jump short if condition is met", Sz::V, Form::CondRel8, NONE)),
    // 0x80..=0x8F
    Entry::group(0x80, &groups::GROUP1_EB_IB),
    Entry::group(0x81, &groups::GROUP1_EV_IV),
    Entry::group(0x82, &groups::GROUP1_EB_IB),
    Entry::group(0x83, &groups::GROUP1_EV_IB),
    Entry::one(0x84, i86(Op::Test, "Logical compare", Sz::B, Form::RmReg, fx::LOGIC)),
    Entry::one(0x85, i86(Op::Test, "Logical compare", Sz::V, Form::RmReg, fx::LOGIC)),
    Entry::one(0x86, i86(Op::Xchg, "Exchange", Sz::B, Form::RmReg, NONE)),
    Entry::one(0x87, i86(Op::Xchg, "Exchange", Sz::V, Form::RmReg, NONE)),
    Entry::masked(0x88, 0xfd, i86(Op::Mov, "Move", Sz::B, Form::RmReg, NONE).dir()),
    Entry::masked(0x89, 0xfd, i86(Op::Mov, "Move", Sz::V, Form::RmReg, NONE).dir()),
    Entry::masked(0x8c, 0xfd, i86(Op::Mov, "Move segment register", Sz::W, Form::RmSeg, NONE).dir()),
    Entry::one(0x8d, i86(Op::Lea, "Load effective address", Sz::V, Form::RegLea, NONE)),
    Entry::group(0x8f, &groups::GROUP1A),
    // 0x90..=0x9F
    Entry::one(0x90, i86(Op::Nop, "No operation", Sz::V, Form::None, NONE)),
    Entry::masked(0x90, 0xf8, i86(Op::Xchg, "Exchange register with accumulator", Sz::V, Form::AccOpReg, NONE)),
    Entry::one(0x98, i86(Op::Cbw, "Sign-extend accumulator", Sz::V, Form::None, NONE)),
    Entry::one(0x99, i86(Op::Cwd, "Sign-extend accumulator into DX", Sz::V, Form::None, NONE)),
    Entry::one(0x9a, i86(Op::Callf, "Call far procedure", Sz::V, Form::FarPtr, NONE)),
    Entry::one(0x9b, Leaf::new(Op::Wait, Cpu::I8087, "Wait for coprocessor", Sz::V, Form::None, NONE)),
    Entry::one(0x9c, i86(Op::Pushf, "Push flags register", Sz::V, Form::None, NONE)),
    Entry::one(0x9d, i86(Op::Popf, "Pop flags register", Sz::V, Form::None, fx::ALL)),
    Entry::one(0x9e, i86(Op::Sahf, "Store AH into flags", Sz::B, Form::None, fx::LOAD_AH)),
    Entry::one(0x9f, i86(Op::Lahf, "Load flags into AH", Sz::B, Form::None, NONE)),
    // 0xA0..=0xAF: moffs moves and string instructions.
    Entry::masked(0xa0, 0xfd, i86(Op::Mov, "Move memory offset to/from accumulator", Sz::B, Form::AccMoffs, NONE).dir()),
    Entry::masked(0xa1, 0xfd, i86(Op::Mov, "Move memory offset to/from accumulator", Sz::V, Form::AccMoffs, NONE).dir()),
    Entry::one(0xa4, i86(Op::Movs, "Move string", Sz::B, Form::None, NONE)),
    Entry::one(0xa5, i86(Op::Movs, "Move string", Sz::V, Form::None, NONE)),
    Entry::one(0xa6, i86(Op::Cmps, "Compare strings", Sz::B, Form::None, fx::ARITH)),
    Entry::one(0xa7, i86(Op::Cmps, "Compare strings", Sz::V, Form::None, fx::ARITH)),
    Entry::one(0xa8, i86(Op::Test, "Logical compare", Sz::B, Form::AccImm, fx::LOGIC)),
    Entry::one(0xa9, i86(Op::Test, "Logical compare", Sz::V, Form::AccImm, fx::LOGIC)),
    Entry::one(0xaa, i86(Op::Stos, "Store string", Sz::B, Form::None, NONE)),
    Entry::one(0xab, i86(Op::Stos, "Store string", Sz::V, Form::None, NONE)),
    Entry::one(0xac, i86(Op::Lods, "Load string", Sz::B, Form::None, NONE)),
    Entry::one(0xad, i86(Op::Lods, "Load string", Sz::V, Form::None, NONE)),
    Entry::one(0xae, i86(Op::Scas, "Scan string", Sz::B, Form::None, fx::ARITH)),
    Entry::one(0xaf, i86(Op::Scas, "Scan string", Sz::V, Form::None, fx::ARITH)),
    // 0xB0..=0xBF: move immediate to register.
    Entry::masked(0xb0, 0xf8, i86(Op::Mov, "Move immediate to register", Sz::B, Form::OpRegImm, NONE)),
    Entry::masked(0xb8, 0xf8, i86(Op::Mov, "Move immediate to register", Sz::V, Form::OpRegImm, NONE)),
    // 0xC0..=0xCF
    Entry::group(0xc0, &groups::GROUP2_EB_IB),
    Entry::group(0xc1, &groups::GROUP2_EV_IB),
    Entry::one(0xc2, i86(Op::Ret, "Near return, releasing stack bytes", Sz::W, Form::Imm, NONE)),
    Entry::one(0xc3, i86(Op::Ret, "Near return", Sz::V, Form::None, NONE)),
    Entry::one(0xc4, i86(Op::Les, "Load far pointer using ES", Sz::V, Form::RegMemFar, NONE)),
    Entry::one(0xc5, i86(Op::Lds, "Load far pointer using DS", Sz::V, Form::RegMemFar, NONE)),
    Entry::group(0xc6, &groups::GROUP11_EB),
    Entry::group(0xc7, &groups::GROUP11_EV),
    Entry::one(0xc8, i186(Op::Enter, "Make stack frame", Sz::V, Form::Imm16Imm8, NONE)),
    Entry::one(0xc9, i186(Op::Leave, "Release stack frame", Sz::V, Form::None, NONE)),
    Entry::one(0xca, i86(Op::Retf, "Far return, releasing stack bytes", Sz::W, Form::Imm, NONE)),
    Entry::one(0xcb, i86(Op::Retf, "Far return", Sz::V, Form::None, NONE)),
    Entry::one(0xcc, i86(Op::Int3, "Breakpoint interrupt", Sz::V, Form::None, fx::INTERRUPT)),
    Entry::one(0xcd, i86(Op::Int, "Software interrupt", Sz::B, Form::Imm, fx::INTERRUPT)),
    Entry::one(0xce, i86(Op::Into, "Interrupt on overflow", Sz::V, Form::None, fx::INTERRUPT)),
    Entry::one(0xcf, i86(Op::Iret, "Interrupt return", Sz::V, Form::None, fx::ALL)),
    // 0xD0..=0xDF
    Entry::group(0xd0, &groups::GROUP2_EB_1),
    Entry::group(0xd1, &groups::GROUP2_EV_1),
    Entry::group(0xd2, &groups::GROUP2_EB_CL),
    Entry::group(0xd3, &groups::GROUP2_EV_CL),
    Entry::one(0xd4, i86(Op::Aam, "ASCII adjust AX after multiply", Sz::B, Form::Imm, fx::ASCII_MUL_DIV)),
    Entry::one(0xd5, i86(Op::Aad, "ASCII adjust AX before division", Sz::B, Form::Imm, fx::ASCII_MUL_DIV)),
    Entry::one(0xd7, i86(Op::Xlat, "Table look-up translation", Sz::B, Form::None, NONE)),
    Entry {
        pattern: 0xd8,
        mask: 0xf8,
        action: Action::Fpu,
    },
    // 0xE0..=0xEF: loops, I/O, calls and jumps.
    Entry::one(0xe0, i86(Op::Loopne, "Loop while not equal", Sz::V, Form::Rel8, NONE)),
    Entry::one(0xe1, i86(Op::Loope, "Loop while equal", Sz::V, Form::Rel8, NONE)),
    Entry::one(0xe2, i86(Op::Loop, "Loop according to CX", Sz::V, Form::Rel8, NONE)),
    Entry::one(0xe3, i86(Op::Jcxz, "Jump short if CX is zero", Sz::V, Form::Rel8, NONE)),
    Entry::one(0xe4, i86(Op::In, "Input from port", Sz::B, Form::AccPort, NONE)),
    Entry::one(0xe5, i86(Op::In, "Input from port", Sz::V, Form::AccPort, NONE)),
    Entry::one(0xe6, i86(Op::Out, "Output to port", Sz::B, Form::PortAcc, NONE)),
    Entry::one(0xe7, i86(Op::Out, "Output to port", Sz::V, Form::PortAcc, NONE)),
    Entry::one(0xe8, i86(Op::Call, "Call near procedure", Sz::V, Form::RelV, NONE)),
    Entry::one(0xe9, i86(Op::Jmp, "Jump near", Sz::V, Form::RelV, NONE)),
    Entry::one(0xea, i86(Op::Jmpf, "Jump far", Sz::V, Form::FarPtr, NONE)),
    Entry::one(0xeb, i86(Op::Jmp, "Jump short", Sz::V, Form::Rel8, NONE)),
    Entry::one(0xec, i86(Op::In, "Input from port DX", Sz::B, Form::AccDx, NONE)),
    Entry::one(0xed, i86(Op::In, "Input from port DX", Sz::V, Form::AccDx, NONE)),
    Entry::one(0xee, i86(Op::Out, "Output to port DX", Sz::B, Form::DxAcc, NONE)),
    Entry::one(0xef, i86(Op::Out, "Output to port DX", Sz::V, Form::DxAcc, NONE)),
    // 0xF0..=0xFF
    Entry::one(0xf4, i86(Op::Hlt, "Halt", Sz::V, Form::None, NONE)),
    Entry::one(0xf5, i86(Op::Cmc, "Complement carry flag", Sz::V, Form::None, fx::TOGGLE_CF)),
    Entry::group(0xf6, &groups::GROUP3_EB),
    Entry::group(0xf7, &groups::GROUP3_EV),
    Entry::one(0xf8, i86(Op::Clc, "Clear carry flag", Sz::V, Form::None, fx::CLEAR_CF)),
    Entry::one(0xf9, i86(Op::Stc, "Set carry flag", Sz::V, Form::None, fx::SET_CF)),
    Entry::one(0xfa, i86(Op::Cli, "Clear interrupt flag", Sz::V, Form::None, fx::CLEAR_IF)),
    Entry::one(0xfb, i86(Op::Sti, "Set interrupt flag", Sz::V, Form::None, fx::SET_IF)),
    Entry::one(0xfc, i86(Op::Cld, "Clear direction flag", Sz::V, Form::None, fx::CLEAR_DF)),
    Entry::one(0xfd, i86(Op::Std, "Set direction flag", Sz::V, Form::None, fx::SET_DF)),
    Entry::group(0xfe, &groups::GROUP4),
    Entry::group(0xff, &groups::GROUP5),
];

/// The one-byte opcode entries, in match order.
#[must_use]
pub fn primary_entries() -> &'static [Entry] {
    PRIMARY
}
