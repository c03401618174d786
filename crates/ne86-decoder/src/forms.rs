//! Operand construction: interprets a leaf's [`Form`] against the byte stream.
//!
//! Operands come out in the leaf's canonical order; direction-bit reversal happens later
//! in the validator.

use ne86_types::{Cond, Cpu, Gpr, SegReg, Width};

use crate::inst::InvalidReason;
use crate::modrm::{mem_operand, reg_operand, rm_operand};
use crate::operand::{AddrMode, MemRef, Operand, Size, SpecialClass};
use crate::reader::{widen, ByteSource};
use crate::state::DecodeState;
use crate::tables::{Form, Leaf};

pub(crate) fn build<S: ByteSource + ?Sized>(
    state: &mut DecodeState<'_, S>,
    leaf: &Leaf,
) -> Vec<Operand> {
    let op_size = state.operand_size;
    let width = leaf.size.resolve(op_size);
    let acc = Operand::reg(Gpr::Ax, width);

    match leaf.form {
        Form::None => Vec::new(),
        Form::RmReg => {
            let rm = rm_operand(state, width);
            vec![rm, reg_operand(state, width)]
        }
        Form::RegRm => {
            let rm = rm_operand(state, width);
            vec![reg_operand(state, width), rm]
        }
        Form::RegRmSrc(src) => {
            let rm = rm_operand(state, src.resolve(op_size));
            vec![reg_operand(state, width), rm]
        }
        Form::Rm => vec![rm_operand(state, width)],
        Form::RmImm => {
            let rm = rm_operand(state, width);
            vec![rm, immediate(state, width)]
        }
        Form::RmImm8s => {
            let rm = rm_operand(state, width);
            vec![rm, immediate_sx8(state, width)]
        }
        Form::RmImm8 => {
            let rm = rm_operand(state, width);
            vec![rm, immediate(state, Width::W8)]
        }
        Form::RmOne => vec![rm_operand(state, width), Operand::imm(1, Width::W8)],
        Form::RmCl => vec![
            rm_operand(state, width),
            Operand::reg(Gpr::Cx, Width::W8),
        ],
        Form::RmRegImm8 => {
            let rm = rm_operand(state, width);
            let reg = reg_operand(state, width);
            vec![rm, reg, immediate(state, Width::W8)]
        }
        Form::RmRegCl => {
            let rm = rm_operand(state, width);
            vec![
                rm,
                reg_operand(state, width),
                Operand::reg(Gpr::Cx, Width::W8),
            ]
        }
        Form::RegRmImm => {
            let rm = rm_operand(state, width);
            let reg = reg_operand(state, width);
            vec![reg, rm, immediate(state, width)]
        }
        Form::RegRmImm8s => {
            let rm = rm_operand(state, width);
            let reg = reg_operand(state, width);
            vec![reg, rm, immediate_sx8(state, width)]
        }
        Form::AccImm => vec![acc, immediate(state, width)],
        Form::OpReg => vec![opcode_reg(state, width)],
        Form::OpRegImm => {
            let reg = opcode_reg(state, width);
            vec![reg, immediate(state, width)]
        }
        Form::AccOpReg => vec![acc, opcode_reg(state, width)],
        Form::FixedSeg(seg) => vec![Operand::Seg(seg)],
        Form::Imm => vec![immediate(state, width)],
        Form::Imm8s => vec![immediate_sx8(state, width)],
        Form::Imm16Imm8 => {
            let frame = immediate(state, Width::W16);
            vec![frame, immediate(state, Width::W8)]
        }
        Form::Rel8 => vec![relative(state, Width::W8)],
        Form::RelV => vec![relative(state, op_size)],
        Form::CondRel8 => vec![condition(state), relative(state, Width::W8)],
        Form::CondRelV => vec![condition(state), relative(state, op_size)],
        Form::CondRm => {
            let cond = condition(state);
            vec![cond, rm_operand(state, Width::W8)]
        }
        Form::FarPtr => vec![far_pointer(state)],
        Form::AccMoffs => vec![acc, moffs(state, width)],
        Form::RmSeg => {
            let rm = rm_operand(state, Width::W16);
            vec![rm, segment_reg(state)]
        }
        Form::RegLea => {
            let mem = mem_operand(state, width.into());
            vec![reg_operand(state, width), Operand::Lea(mem)]
        }
        Form::RegMemFar => {
            let mem = mem_operand(state, far_size(width));
            vec![reg_operand(state, width), Operand::Mem(mem)]
        }
        Form::RegMemPair => {
            let pair = match width {
                Width::W32 => Size::Qword,
                _ => Size::Dword,
            };
            let mem = mem_operand(state, pair);
            vec![reg_operand(state, width), Operand::Mem(mem)]
        }
        Form::Mem(size) => vec![Operand::Mem(mem_operand(state, size))],
        Form::MemFar => vec![Operand::Mem(mem_operand(state, far_size(width)))],
        Form::AccPort => vec![acc, immediate(state, Width::W8)],
        Form::PortAcc => vec![immediate(state, Width::W8), acc],
        Form::AccDx => vec![acc, Operand::reg(Gpr::Dx, Width::W16)],
        Form::DxAcc => vec![Operand::reg(Gpr::Dx, Width::W16), acc],
        Form::RegSpecial(class) => special(state, class),
        Form::St0Sti => {
            state.fpu_dest_st0 = true;
            vec![Operand::St(0), stack_slot(state)]
        }
        Form::StiSt0 => vec![stack_slot(state), Operand::St(0)],
        Form::Sti => vec![stack_slot(state)],
        Form::Ax => vec![Operand::reg(Gpr::Ax, Width::W16)],
    }
}

fn immediate<S: ByteSource + ?Sized>(state: &mut DecodeState<'_, S>, width: Width) -> Operand {
    Operand::imm(state.read(width), width)
}

/// An imm8 sign-extended to `width`.
fn immediate_sx8<S: ByteSource + ?Sized>(state: &mut DecodeState<'_, S>, width: Width) -> Operand {
    let raw = u32::from(state.read_u8());
    Operand::imm(widen(raw, Width::W8, width), width)
}

/// Reads a signed displacement and resolves it against the end of the instruction. Every
/// relative form ends its instruction, so the consumed count is final here.
fn relative<S: ByteSource + ?Sized>(state: &mut DecodeState<'_, S>, disp: Width) -> Operand {
    let delta = widen(state.read(disp), disp, Width::W32);
    let next = state.ctx.offset.wrapping_add(state.consumed() as u32);
    let target = state.operand_size.truncate(next.wrapping_add(delta));
    Operand::Target {
        target,
        size: state.operand_size.into(),
    }
}

fn condition<S: ByteSource + ?Sized>(state: &DecodeState<'_, S>) -> Operand {
    Operand::Cond(Cond::from_cc(state.opcode))
}

fn opcode_reg<S: ByteSource + ?Sized>(state: &DecodeState<'_, S>, width: Width) -> Operand {
    Operand::reg(Gpr::from_u3(state.opcode), width)
}

/// Offset first, then the 16-bit segment.
fn far_pointer<S: ByteSource + ?Sized>(state: &mut DecodeState<'_, S>) -> Operand {
    let width = state.operand_size;
    let offset = state.read(width);
    let segment = state.read_u16();
    Operand::Far {
        segment,
        offset,
        size: far_size(width),
    }
}

const fn far_size(width: Width) -> Size {
    match width {
        Width::W32 => Size::Fword,
        _ => Size::Dword,
    }
}

/// Absolute memory offset of A0..=A3, sized by the address size.
fn moffs<S: ByteSource + ?Sized>(state: &mut DecodeState<'_, S>, width: Width) -> Operand {
    let address_size = state.address_size;
    let disp = state.read(address_size) as i32;
    Operand::Mem(MemRef {
        mode: AddrMode::DIRECT,
        disp,
        size: width.into(),
        segment: state.segment_for(SegReg::Ds),
        default_segment: SegReg::Ds,
    })
}

fn segment_reg<S: ByteSource + ?Sized>(state: &mut DecodeState<'_, S>) -> Operand {
    let code = state.modrm().reg;
    let Some(seg) = SegReg::from_u3(code) else {
        state.invalidate(InvalidReason::ReservedRegister);
        return Operand::Seg(SegReg::Ds);
    };
    if matches!(seg, SegReg::Fs | SegReg::Gs) {
        state.require(Cpu::I80386);
    }
    // Bit 1 set is the load direction (8E); CS cannot be loaded that way.
    if seg == SegReg::Cs && state.opcode & 0x02 != 0 {
        state.invalidate(InvalidReason::ReservedRegister);
    }
    Operand::Seg(seg)
}

/// `[r32, special]`. The r/m field always names a register whatever the mod bits say.
fn special<S: ByteSource + ?Sized>(state: &mut DecodeState<'_, S>, class: SpecialClass) -> Vec<Operand> {
    let modrm = state.modrm();
    let implemented = match class {
        SpecialClass::Control => matches!(modrm.reg, 0 | 2 | 3),
        SpecialClass::Debug => true,
        SpecialClass::Test => matches!(modrm.reg, 6 | 7),
    };
    if !implemented {
        state.invalidate(InvalidReason::ReservedRegister);
    }
    vec![
        Operand::reg(Gpr::from_u3(modrm.rm), Width::W32),
        Operand::Special {
            class,
            index: modrm.reg,
        },
    ]
}

fn stack_slot<S: ByteSource + ?Sized>(state: &mut DecodeState<'_, S>) -> Operand {
    Operand::St(state.modrm().rm)
}
