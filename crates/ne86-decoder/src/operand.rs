//! Typed operand model.

use core::fmt;

use ne86_types::{Cond, Gpr, SegReg, Width};

/// Size tag carried by every operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Size {
    Byte,
    Word,
    Dword,
    /// 48-bit pseudo-descriptor or 16:32 far pointer.
    Fword,
    Qword,
    /// 80-bit extended real or packed BCD.
    Tword,
    /// FPU environment/state images and other size-less memory blocks.
    Unsized,
}

impl Size {
    #[must_use]
    pub const fn bytes(self) -> Option<usize> {
        match self {
            Size::Byte => Some(1),
            Size::Word => Some(2),
            Size::Dword => Some(4),
            Size::Fword => Some(6),
            Size::Qword => Some(8),
            Size::Tword => Some(10),
            Size::Unsized => None,
        }
    }
}

impl From<Width> for Size {
    fn from(width: Width) -> Self {
        match width {
            Width::W8 => Size::Byte,
            Width::W16 => Size::Word,
            Width::W32 => Size::Dword,
        }
    }
}

/// One of the 24 canonical 16-bit ModRM memory forms.
///
/// The index is `mod * 8 + rm` for `mod` in `0..=2`. Index 6 (`mod=0, rm=6`) is the direct
/// 16-bit address rather than `[bp]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddrMode(u8);

impl AddrMode {
    /// `[disp16]`
    pub const DIRECT: AddrMode = AddrMode(6);

    #[must_use]
    pub const fn new(mod_bits: u8, rm: u8) -> Option<AddrMode> {
        if mod_bits > 2 {
            return None;
        }
        Some(AddrMode(mod_bits * 8 + (rm & 7)))
    }

    #[must_use]
    pub const fn from_index(index: u8) -> Option<AddrMode> {
        if index < 24 {
            Some(AddrMode(index))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn rm(self) -> u8 {
        self.0 & 7
    }

    #[must_use]
    pub const fn is_direct(self) -> bool {
        self.0 == 6
    }

    /// Width of the displacement that follows the ModRM byte.
    #[must_use]
    pub const fn disp_width(self) -> Option<Width> {
        if self.is_direct() {
            return Some(Width::W16);
        }
        match self.0 / 8 {
            0 => None,
            1 => Some(Width::W8),
            _ => Some(Width::W16),
        }
    }

    #[must_use]
    pub const fn base(self) -> Option<Gpr> {
        match self.rm() {
            0 | 1 | 7 => Some(Gpr::Bx),
            2 | 3 => Some(Gpr::Bp),
            6 if !self.is_direct() => Some(Gpr::Bp),
            _ => None,
        }
    }

    #[must_use]
    pub const fn index_reg(self) -> Option<Gpr> {
        match self.rm() {
            0 | 2 | 4 => Some(Gpr::Si),
            1 | 3 | 5 => Some(Gpr::Di),
            _ => None,
        }
    }

    /// SS for every form built on BP, DS otherwise.
    #[must_use]
    pub const fn default_segment(self) -> SegReg {
        match self.base() {
            Some(Gpr::Bp) => SegReg::Ss,
            _ => SegReg::Ds,
        }
    }
}

impl fmt::Display for AddrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self
            .base()
            .into_iter()
            .chain(self.index_reg())
            .map(|r| r.name(Width::W16));
        match parts.next() {
            Some(first) => {
                f.write_str(first)?;
                for p in parts {
                    write!(f, "+{p}")?;
                }
                Ok(())
            }
            None => f.write_str("disp16"),
        }
    }
}

/// A ModRM-derived (or moffs) memory reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemRef {
    pub mode: AddrMode,
    /// Signed displacement; for [`AddrMode::DIRECT`] the absolute offset.
    pub disp: i32,
    pub size: Size,
    /// Segment actually used (after any override).
    pub segment: SegReg,
    /// Segment the addressing form implies without an override.
    pub default_segment: SegReg,
}

impl MemRef {
    #[must_use]
    pub fn is_overridden(&self) -> bool {
        self.segment != self.default_segment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialClass {
    Control,
    Debug,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSlot {
    Local,
    Param,
}

/// One decoded argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Imm { value: u32, size: Size },
    Reg { reg: Gpr, width: Width },
    Seg(SegReg),
    Cond(Cond),
    Mem(MemRef),
    /// Address-only reference (LEA): no implicit load.
    Lea(MemRef),
    Far { segment: u16, offset: u32, size: Size },
    St(u8),
    /// Absolute branch target resolved from a relative displacement.
    Target { target: u32, size: Size },
    /// 80386 control/debug/test register.
    Special { class: SpecialClass, index: u8 },
    /// Frame-relative variable. Produced by analysis layers, never by the decoder.
    Frame {
        slot: FrameSlot,
        disp: i32,
        index: Option<Gpr>,
        size: Size,
    },
}

impl Operand {
    #[must_use]
    pub const fn reg(reg: Gpr, width: Width) -> Operand {
        Operand::Reg { reg, width }
    }

    #[must_use]
    pub const fn imm(value: u32, width: Width) -> Operand {
        Operand::Imm {
            value: width.truncate(value),
            size: match width {
                Width::W8 => Size::Byte,
                Width::W16 => Size::Word,
                Width::W32 => Size::Dword,
            },
        }
    }

    #[must_use]
    pub fn size(&self) -> Size {
        match *self {
            Operand::Imm { size, .. }
            | Operand::Far { size, .. }
            | Operand::Target { size, .. }
            | Operand::Frame { size, .. } => size,
            Operand::Reg { width, .. } => width.into(),
            Operand::Seg(_) => Size::Word,
            Operand::Cond(_) => Size::Unsized,
            Operand::Mem(m) | Operand::Lea(m) => m.size,
            Operand::St(_) => Size::Tword,
            Operand::Special { .. } => Size::Dword,
        }
    }

    /// The raw value: register number, addressing-mode index, immediate or target value,
    /// or FPU stack index.
    #[must_use]
    pub fn value(&self) -> u32 {
        match *self {
            Operand::Imm { value, .. } => value,
            Operand::Reg { reg, .. } => u32::from(reg.code()),
            Operand::Seg(seg) => u32::from(seg.code()),
            Operand::Cond(cond) => u32::from(cond.code()),
            Operand::Mem(m) | Operand::Lea(m) => u32::from(m.mode.index()),
            Operand::Far { offset, .. } => offset,
            Operand::St(i) => u32::from(i),
            Operand::Target { target, .. } => target,
            Operand::Special { index, .. } => u32::from(index),
            Operand::Frame { disp, .. } => disp as u32,
        }
    }

    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Operand::Mem(_))
    }

    #[must_use]
    pub const fn mem(&self) -> Option<&MemRef> {
        match self {
            Operand::Mem(m) | Operand::Lea(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Imm { value, .. } => write!(f, "0x{value:x}"),
            Operand::Reg { reg, width } => f.write_str(reg.name(*width)),
            Operand::Seg(seg) => write!(f, "{seg}"),
            Operand::Cond(cond) => write!(f, "{cond}"),
            Operand::Mem(m) | Operand::Lea(m) => {
                if m.is_overridden() {
                    write!(f, "{}:", m.segment)?;
                }
                if m.mode.is_direct() {
                    return write!(f, "[0x{:x}]", m.disp as u32);
                }
                write!(f, "[{}", m.mode)?;
                match m.disp {
                    0 => {}
                    d if d < 0 => write!(f, "-0x{:x}", d.unsigned_abs())?,
                    d => write!(f, "+0x{d:x}")?,
                }
                f.write_str("]")
            }
            Operand::Far { segment, offset, .. } => write!(f, "0x{segment:x}:0x{offset:x}"),
            Operand::St(i) => write!(f, "st({i})"),
            Operand::Target { target, .. } => write!(f, "0x{target:x}"),
            Operand::Special { class, index } => {
                let prefix = match class {
                    SpecialClass::Control => "cr",
                    SpecialClass::Debug => "dr",
                    SpecialClass::Test => "tr",
                };
                write!(f, "{prefix}{index}")
            }
            Operand::Frame {
                slot, disp, index, ..
            } => {
                let name = match slot {
                    FrameSlot::Local => "local",
                    FrameSlot::Param => "param",
                };
                write!(f, "{name}[{disp}")?;
                if let Some(index) = index {
                    write!(f, "+{index}")?;
                }
                f.write_str("]")
            }
        }
    }
}
