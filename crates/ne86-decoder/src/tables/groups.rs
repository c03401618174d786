//! ModRM-reg keyed opcode groups.

use ne86_types::Cpu;

use super::{Form, Group, Leaf, Sz};
use crate::effects::{self as fx, FlagEffects};
use crate::op::Op;
use crate::operand::Size;

const NONE: FlagEffects = FlagEffects::NONE;

const fn leaf(cpu: Cpu, op: Op, desc: &'static str, size: Sz, form: Form, flags: FlagEffects) -> Option<Leaf> {
    Some(Leaf::new(op, cpu, desc, size, form, flags))
}

/// 0x80..=0x83: immediate arithmetic.
const fn group1(size: Sz, form: Form) -> Group {
    let c = Cpu::I8086;
    [
        leaf(c, Op::Add, "Add", size, form, fx::ARITH),
        leaf(c, Op::Or, "Logical inclusive OR", size, form, fx::LOGIC),
        leaf(c, Op::Adc, "Add with carry", size, form, fx::ARITH),
        leaf(c, Op::Sbb, "Subtract with borrow", size, form, fx::ARITH),
        leaf(c, Op::And, "Logical AND", size, form, fx::LOGIC),
        leaf(c, Op::Sub, "Subtract", size, form, fx::ARITH),
        leaf(c, Op::Xor, "Logical exclusive OR", size, form, fx::LOGIC),
        leaf(c, Op::Cmp, "Compare", size, form, fx::ARITH),
    ]
}

pub(super) static GROUP1_EB_IB: Group = group1(Sz::B, Form::RmImm);
pub(super) static GROUP1_EV_IV: Group = group1(Sz::V, Form::RmImm);
pub(super) static GROUP1_EV_IB: Group = group1(Sz::V, Form::RmImm8s);

/// 0xC0, 0xC1, 0xD0..=0xD3: rotates and shifts. Slot 6 is undocumented and left empty.
const fn group2(cpu: Cpu, size: Sz, form: Form) -> Group {
    [
        leaf(cpu, Op::Rol, "Rotate left", size, form, fx::ROTATE),
        leaf(cpu, Op::Ror, "Rotate right", size, form, fx::ROTATE),
        leaf(cpu, Op::Rcl, "Rotate left through carry", size, form, fx::ROTATE),
        leaf(cpu, Op::Rcr, "Rotate right through carry", size, form, fx::ROTATE),
        leaf(cpu, Op::Shl, "Shift left", size, form, fx::SHIFT),
        leaf(cpu, Op::Shr, "Shift logical right", size, form, fx::SHIFT),
        None,
        leaf(cpu, Op::Sar, "Shift arithmetic right", size, form, fx::SHIFT),
    ]
}

pub(super) static GROUP2_EB_IB: Group = group2(Cpu::I80186, Sz::B, Form::RmImm8);
pub(super) static GROUP2_EV_IB: Group = group2(Cpu::I80186, Sz::V, Form::RmImm8);
pub(super) static GROUP2_EB_1: Group = group2(Cpu::I8086, Sz::B, Form::RmOne);
pub(super) static GROUP2_EV_1: Group = group2(Cpu::I8086, Sz::V, Form::RmOne);
pub(super) static GROUP2_EB_CL: Group = group2(Cpu::I8086, Sz::B, Form::RmCl);
pub(super) static GROUP2_EV_CL: Group = group2(Cpu::I8086, Sz::V, Form::RmCl);

/// 0xF6, 0xF7: unary arithmetic. Slot 1 is an undocumented TEST alias and left empty.
const fn group3(size: Sz) -> Group {
    let c = Cpu::I8086;
    [
        leaf(c, Op::Test, "Logical compare", size, Form::RmImm, fx::LOGIC),
        None,
        leaf(c, Op::Not, "One's complement negation", size, Form::Rm, NONE),
        leaf(c, Op::Neg, "Two's complement negation", size, Form::Rm, fx::ARITH),
        leaf(c, Op::Mul, "Unsigned multiply", size, Form::Rm, fx::MUL),
        leaf(c, Op::Imul, "Signed multiply", size, Form::Rm, fx::MUL),
        leaf(c, Op::Div, "Unsigned divide", size, Form::Rm, fx::DIV),
        leaf(c, Op::Idiv, "Signed divide", size, Form::Rm, fx::DIV),
    ]
}

pub(super) static GROUP3_EB: Group = group3(Sz::B);
pub(super) static GROUP3_EV: Group = group3(Sz::V);

/// 0xFE
pub(super) static GROUP4: Group = [
    leaf(Cpu::I8086, Op::Inc, "Increment by 1", Sz::B, Form::Rm, fx::INC_DEC),
    leaf(Cpu::I8086, Op::Dec, "Decrement by 1", Sz::B, Form::Rm, fx::INC_DEC),
    None,
    None,
    None,
    None,
    None,
    None,
];

/// 0xFF
pub(super) static GROUP5: Group = [
    leaf(Cpu::I8086, Op::Inc, "Increment by 1", Sz::V, Form::Rm, fx::INC_DEC),
    leaf(Cpu::I8086, Op::Dec, "Decrement by 1", Sz::V, Form::Rm, fx::INC_DEC),
    leaf(Cpu::I8086, Op::Call, "Call near procedure, indirect", Sz::V, Form::Rm, NONE),
    leaf(Cpu::I8086, Op::Callf, "Call far procedure, indirect", Sz::V, Form::MemFar, NONE),
    leaf(Cpu::I8086, Op::Jmp, "Jump near, indirect", Sz::V, Form::Rm, NONE),
    leaf(Cpu::I8086, Op::Jmpf, "Jump far, indirect", Sz::V, Form::MemFar, NONE),
    leaf(Cpu::I8086, Op::Push, "Push word onto the stack", Sz::V, Form::Rm, NONE),
    None,
];

/// 0x8F
pub(super) static GROUP1A: Group = [
    leaf(Cpu::I8086, Op::Pop, "Pop word from the stack", Sz::V, Form::Rm, NONE),
    None,
    None,
    None,
    None,
    None,
    None,
    None,
];

const fn group11(size: Sz) -> Group {
    [
        leaf(Cpu::I8086, Op::Mov, "Move immediate", size, Form::RmImm, NONE),
        None,
        None,
        None,
        None,
        None,
        None,
        None,
    ]
}

/// 0xC6
pub(super) static GROUP11_EB: Group = group11(Sz::B);
/// 0xC7
pub(super) static GROUP11_EV: Group = group11(Sz::V);

/// 0x0F 0x00: descriptor-table register access.
pub(super) static GROUP6: Group = [
    leaf(Cpu::I80286, Op::Sldt, "Store local descriptor table register", Sz::W, Form::Rm, NONE),
    leaf(Cpu::I80286, Op::Str, "Store task register", Sz::W, Form::Rm, NONE),
    leaf(Cpu::I80286, Op::Lldt, "Load local descriptor table register", Sz::W, Form::Rm, NONE),
    leaf(Cpu::I80286, Op::Ltr, "Load task register", Sz::W, Form::Rm, NONE),
    leaf(Cpu::I80286, Op::Verr, "Verify segment for reading", Sz::W, Form::Rm, fx::ZF_ONLY),
    leaf(Cpu::I80286, Op::Verw, "Verify segment for writing", Sz::W, Form::Rm, fx::ZF_ONLY),
    None,
    None,
];

/// 0x0F 0x01
pub(super) static GROUP7: Group = [
    leaf(Cpu::I80286, Op::Sgdt, "Store global descriptor table register", Sz::V, Form::Mem(Size::Fword), NONE),
    leaf(Cpu::I80286, Op::Sidt, "Store interrupt descriptor table register", Sz::V, Form::Mem(Size::Fword), NONE),
    leaf(Cpu::I80286, Op::Lgdt, "Load global descriptor table register", Sz::V, Form::Mem(Size::Fword), NONE),
    leaf(Cpu::I80286, Op::Lidt, "Load interrupt descriptor table register", Sz::V, Form::Mem(Size::Fword), NONE),
    leaf(Cpu::I80286, Op::Smsw, "Store machine status word", Sz::W, Form::Rm, NONE),
    None,
    leaf(Cpu::I80286, Op::Lmsw, "Load machine status word", Sz::W, Form::Rm, NONE),
    None,
];

/// 0x0F 0xBA: bit test with immediate index.
pub(super) static GROUP8: Group = [
    None,
    None,
    None,
    None,
    leaf(Cpu::I80386, Op::Bt, "Bit test", Sz::V, Form::RmImm8, fx::BIT_TEST),
    leaf(Cpu::I80386, Op::Bts, "Bit test and set", Sz::V, Form::RmImm8, fx::BIT_TEST),
    leaf(Cpu::I80386, Op::Btr, "Bit test and reset", Sz::V, Form::RmImm8, fx::BIT_TEST),
    leaf(Cpu::I80386, Op::Btc, "Bit test and complement", Sz::V, Form::RmImm8, fx::BIT_TEST),
];
