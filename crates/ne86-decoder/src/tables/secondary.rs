//! Two-byte (0x0F-prefixed) opcode table.

use ne86_types::{Cpu, SegReg};

use super::groups;
use super::{Entry, Form, Leaf, Sz};
use crate::effects::{self as fx, FlagEffects};
use crate::op::Op;
use crate::operand::SpecialClass;

const NONE: FlagEffects = FlagEffects::NONE;

const fn i286(op: Op, desc: &'static str, size: Sz, form: Form, flags: FlagEffects) -> Leaf {
    Leaf::new(op, Cpu::I80286, desc, size, form, flags)
}

const fn i386(op: Op, desc: &'static str, size: Sz, form: Form, flags: FlagEffects) -> Leaf {
    Leaf::new(op, Cpu::I80386, desc, size, form, flags)
}

static SECONDARY: &[Entry] = &[
    Entry::group(0x00, &groups::GROUP6),
    Entry::group(0x01, &groups::GROUP7),
    Entry::one(0x02, i286(Op::Lar, "Load access rights", Sz::V, Form::RegRmSrc(Sz::W), fx::ZF_ONLY)),
    Entry::one(0x03, i286(Op::Lsl, "Load segment limit", Sz::V, Form::RegRmSrc(Sz::W), fx::ZF_ONLY)),
    Entry::one(0x06, i286(Op::Clts, "Clear task-switched flag", Sz::V, Form::None, NONE)),
    // Bit 1 selects "to special register".
    Entry::masked(0x20, 0xfd, i386(Op::Mov, "Move to/from control register", Sz::D, Form::RegSpecial(SpecialClass::Control), fx::STATUS_UNDEFINED).dir()),
    Entry::masked(0x21, 0xfd, i386(Op::Mov, "Move to/from debug register", Sz::D, Form::RegSpecial(SpecialClass::Debug), fx::STATUS_UNDEFINED).dir()),
    Entry::masked(0x24, 0xfd, i386(Op::Mov, "Move to/from test register", Sz::D, Form::RegSpecial(SpecialClass::Test), fx::STATUS_UNDEFINED).dir()),
    Entry::masked(0x80, 0xf0, i386(Op::Jcc, "Jump near if condition is met", Sz::V, Form::CondRelV, NONE)),
    Entry::masked(0x90, 0xf0, i386(Op::Setcc, "Set byte on condition", Sz::B, Form::CondRm, NONE)),
    Entry::one(0xa0, i386(Op::Push, "Push segment register", Sz::W, Form::FixedSeg(SegReg::Fs), NONE)),
    Entry::one(0xa1, i386(Op::Pop, "Pop segment register", Sz::W, Form::FixedSeg(SegReg::Fs), NONE)),
    Entry::one(0xa3, i386(Op::Bt, "Bit test", Sz::V, Form::RmReg, fx::BIT_TEST)),
    Entry::one(0xa4, i386(Op::Shld, "Double precision shift left", Sz::V, Form::RmRegImm8, fx::SHIFT)),
    Entry::one(0xa5, i386(Op::Shld, "Double precision shift left", Sz::V, Form::RmRegCl, fx::SHIFT)),
    Entry::one(0xa8, i386(Op::Push, "Push segment register", Sz::W, Form::FixedSeg(SegReg::Gs), NONE)),
    Entry::one(0xa9, i386(Op::Pop, "Pop segment register", Sz::W, Form::FixedSeg(SegReg::Gs), NONE)),
    Entry::one(0xab, i386(Op::Bts, "Bit test and set", Sz::V, Form::RmReg, fx::BIT_TEST)),
    Entry::one(0xac, i386(Op::Shrd, "Double precision shift right", Sz::V, Form::RmRegImm8, fx::SHIFT)),
    Entry::one(0xad, i386(Op::Shrd, "Double precision shift right", Sz::V, Form::RmRegCl, fx::SHIFT)),
    Entry::one(0xaf, i386(Op::Imul, "Signed multiply", Sz::V, Form::RegRm, fx::MUL)),
    Entry::one(0xb2, i386(Op::Lss, "Load far pointer using SS", Sz::V, Form::RegMemFar, NONE)),
    Entry::one(0xb3, i386(Op::Btr, "Bit test and reset", Sz::V, Form::RmReg, fx::BIT_TEST)),
    Entry::one(0xb4, i386(Op::Lfs, "Load far pointer using FS", Sz::V, Form::RegMemFar, NONE)),
    Entry::one(0xb5, i386(Op::Lgs, "Load far pointer using GS", Sz::V, Form::RegMemFar, NONE)),
    Entry::one(0xb6, i386(Op::Movzx, "Move with zero-extension", Sz::V, Form::RegRmSrc(Sz::B), NONE)),
    Entry::one(0xb7, i386(Op::Movzx, "Move with zero-extension", Sz::V, Form::RegRmSrc(Sz::W), NONE)),
    Entry::group(0xba, &groups::GROUP8),
    Entry::one(0xbb, i386(Op::Btc, "Bit test and complement", Sz::V, Form::RmReg, fx::BIT_TEST)),
    Entry::one(0xbc, i386(Op::Bsf, "Bit scan forward", Sz::V, Form::RegRm, fx::BIT_SCAN)),
    Entry::one(0xbd, i386(Op::Bsr, "Bit scan reverse", Sz::V, Form::RegRm, fx::BIT_SCAN)),
    Entry::one(0xbe, i386(Op::Movsx, "Move with sign-extension", Sz::V, Form::RegRmSrc(Sz::B), NONE)),
    Entry::one(0xbf, i386(Op::Movsx, "Move with sign-extension", Sz::V, Form::RegRmSrc(Sz::W), NONE)),
];

/// The 0x0F-escaped entries, in match order.
#[must_use]
pub fn secondary_entries() -> &'static [Entry] {
    SECONDARY
}
