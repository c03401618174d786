//! ModRM addressing resolver (16-bit forms).

use ne86_types::{Gpr, SegReg, Width};

use crate::inst::InvalidReason;
use crate::operand::{AddrMode, MemRef, Operand, Size};
use crate::reader::ByteSource;
use crate::state::DecodeState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ModRm {
    pub(crate) mod_bits: u8,
    pub(crate) reg: u8,
    pub(crate) rm: u8,
}

impl ModRm {
    pub(crate) const fn parse(byte: u8) -> Self {
        Self {
            mod_bits: (byte >> 6) & 0x3,
            reg: (byte >> 3) & 0x7,
            rm: byte & 0x7,
        }
    }

    pub(crate) const fn is_register(self) -> bool {
        self.mod_bits == 3
    }

    pub(crate) const fn byte(self) -> u8 {
        (self.mod_bits << 6) | (self.reg << 3) | self.rm
    }
}

/// The r/m operand: a register when `mod = 3`, memory otherwise.
pub(crate) fn rm_operand<S: ByteSource + ?Sized>(
    state: &mut DecodeState<'_, S>,
    width: Width,
) -> Operand {
    let modrm = state.modrm();
    if modrm.is_register() {
        return Operand::reg(Gpr::from_u3(modrm.rm), width);
    }
    Operand::Mem(memory_ref(state, modrm, width.into()))
}

/// The r/m operand of an opcode that requires memory. A register encoding marks the
/// instruction invalid and yields a placeholder reference.
pub(crate) fn mem_operand<S: ByteSource + ?Sized>(
    state: &mut DecodeState<'_, S>,
    size: Size,
) -> MemRef {
    let modrm = state.modrm();
    if modrm.is_register() {
        state.invalidate(InvalidReason::RegisterWhereMemoryRequired);
        return placeholder(state, size);
    }
    memory_ref(state, modrm, size)
}

/// The register named by the reg field.
pub(crate) fn reg_operand<S: ByteSource + ?Sized>(
    state: &mut DecodeState<'_, S>,
    width: Width,
) -> Operand {
    let modrm = state.modrm();
    Operand::reg(Gpr::from_u3(modrm.reg), width)
}

fn memory_ref<S: ByteSource + ?Sized>(
    state: &mut DecodeState<'_, S>,
    modrm: ModRm,
    size: Size,
) -> MemRef {
    if state.address_size == Width::W32 {
        state.invalidate(InvalidReason::Addressing32);
        skip_addressing32(state, modrm);
        return placeholder(state, size);
    }
    let Some(mode) = AddrMode::new(modrm.mod_bits, modrm.rm) else {
        return placeholder(state, size);
    };

    // mod=0 rm=6 carries a disp16 even though mod=0 otherwise means "no displacement".
    let disp = match mode.disp_width() {
        None => 0,
        Some(_) if mode.is_direct() => i32::from(state.read_u16()),
        Some(Width::W8) => i32::from(state.read_u8() as i8),
        Some(_) => i32::from(state.read_u16() as i16),
    };

    let default_segment = mode.default_segment();
    MemRef {
        mode,
        disp,
        size,
        segment: state.segment_for(default_segment),
        default_segment,
    }
}

/// Consume the SIB byte and displacement of a 32-bit memory form without decoding them,
/// so the instruction length stays right.
fn skip_addressing32<S: ByteSource + ?Sized>(state: &mut DecodeState<'_, S>, modrm: ModRm) {
    let sib_base = if modrm.rm == 4 {
        Some(state.read_u8() & 0x07)
    } else {
        None
    };
    let disp = match modrm.mod_bits {
        1 => Some(Width::W8),
        2 => Some(Width::W32),
        0 if modrm.rm == 5 || sib_base == Some(5) => Some(Width::W32),
        _ => None,
    };
    if let Some(width) = disp {
        let _ = state.read(width);
    }
}

fn placeholder<S: ByteSource + ?Sized>(state: &DecodeState<'_, S>, size: Size) -> MemRef {
    MemRef {
        mode: AddrMode::DIRECT,
        disp: 0,
        size,
        segment: state.segment_for(SegReg::Ds),
        default_segment: SegReg::Ds,
    }
}
