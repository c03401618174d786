//! Shared vocabulary for the ne86 decoder: register names, widths, condition codes, the
//! condition-flag set and CPU generation tags.
//!
//! These types are deliberately free of decoding logic so the rendering and control-flow
//! layers can depend on them without pulling in the decoder tables.

use core::fmt;

use bitflags::bitflags;

/// Operand or address width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Width {
    W8,
    W16,
    W32,
}

impl Width {
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
        }
    }

    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Width::W8 => 1,
            Width::W16 => 2,
            Width::W32 => 4,
        }
    }

    #[must_use]
    pub const fn mask(self) -> u32 {
        match self {
            Width::W8 => 0xff,
            Width::W16 => 0xffff,
            Width::W32 => 0xffff_ffff,
        }
    }

    #[must_use]
    pub const fn truncate(self, value: u32) -> u32 {
        value & self.mask()
    }

    /// Sign-extend a value of this width to 32 bits.
    #[must_use]
    pub const fn sign_extend(self, value: u32) -> u32 {
        match self {
            Width::W8 => value as u8 as i8 as i32 as u32,
            Width::W16 => value as u16 as i16 as i32 as u32,
            Width::W32 => value,
        }
    }

    /// Parse a bitness (8, 16 or 32).
    #[must_use]
    pub const fn from_bits(bits: u32) -> Option<Width> {
        match bits {
            8 => Some(Width::W8),
            16 => Some(Width::W16),
            32 => Some(Width::W32),
            _ => None,
        }
    }

    /// The other width reachable through an operand/address-size override prefix.
    #[must_use]
    pub const fn toggled(self) -> Width {
        match self {
            Width::W32 => Width::W16,
            _ => Width::W32,
        }
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

/// General purpose register, by its 3-bit encoding.
///
/// For 8-bit operands encodings 4..=7 name AH/CH/DH/BH; see [`Gpr::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Gpr {
    Ax = 0,
    Cx = 1,
    Dx = 2,
    Bx = 3,
    Sp = 4,
    Bp = 5,
    Si = 6,
    Di = 7,
}

impl Gpr {
    #[must_use]
    pub const fn from_u3(code: u8) -> Gpr {
        match code & 7 {
            0 => Gpr::Ax,
            1 => Gpr::Cx,
            2 => Gpr::Dx,
            3 => Gpr::Bx,
            4 => Gpr::Sp,
            5 => Gpr::Bp,
            6 => Gpr::Si,
            _ => Gpr::Di,
        }
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Register name at the given width.
    #[must_use]
    pub const fn name(self, width: Width) -> &'static str {
        const R8: [&str; 8] = ["al", "cl", "dl", "bl", "ah", "ch", "dh", "bh"];
        const R16: [&str; 8] = ["ax", "cx", "dx", "bx", "sp", "bp", "si", "di"];
        const R32: [&str; 8] = ["eax", "ecx", "edx", "ebx", "esp", "ebp", "esi", "edi"];
        let idx = self as usize;
        match width {
            Width::W8 => R8[idx],
            Width::W16 => R16[idx],
            Width::W32 => R32[idx],
        }
    }
}

impl fmt::Display for Gpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name(Width::W16))
    }
}

/// Segment register, by its 3-bit encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegReg {
    Es = 0,
    Cs = 1,
    Ss = 2,
    Ds = 3,
    Fs = 4,
    Gs = 5,
}

impl SegReg {
    /// Decode a segment register field. Encodings 6 and 7 are reserved.
    #[must_use]
    pub const fn from_u3(code: u8) -> Option<SegReg> {
        match code & 7 {
            0 => Some(SegReg::Es),
            1 => Some(SegReg::Cs),
            2 => Some(SegReg::Ss),
            3 => Some(SegReg::Ds),
            4 => Some(SegReg::Fs),
            5 => Some(SegReg::Gs),
            _ => None,
        }
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SegReg::Es => "es",
            SegReg::Cs => "cs",
            SegReg::Ss => "ss",
            SegReg::Ds => "ds",
            SegReg::Fs => "fs",
            SegReg::Gs => "gs",
        }
    }
}

impl fmt::Display for SegReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Condition code used by `Jcc` and `SETcc`, in encoding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cond {
    O = 0,
    No = 1,
    B = 2,
    Ae = 3,
    E = 4,
    Ne = 5,
    Be = 6,
    A = 7,
    S = 8,
    Ns = 9,
    P = 10,
    Np = 11,
    L = 12,
    Ge = 13,
    Le = 14,
    G = 15,
}

impl Cond {
    /// Decode the low four bits of a condition-code opcode.
    #[must_use]
    pub const fn from_cc(cc: u8) -> Cond {
        match cc & 0xf {
            0 => Cond::O,
            1 => Cond::No,
            2 => Cond::B,
            3 => Cond::Ae,
            4 => Cond::E,
            5 => Cond::Ne,
            6 => Cond::Be,
            7 => Cond::A,
            8 => Cond::S,
            9 => Cond::Ns,
            10 => Cond::P,
            11 => Cond::Np,
            12 => Cond::L,
            13 => Cond::Ge,
            14 => Cond::Le,
            _ => Cond::G,
        }
    }

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// The condition with the opposite sense (`E` <-> `Ne`, ...).
    #[must_use]
    pub const fn negate(self) -> Cond {
        Cond::from_cc(self as u8 ^ 1)
    }

    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Cond::O => "o",
            Cond::No => "no",
            Cond::B => "b",
            Cond::Ae => "ae",
            Cond::E => "e",
            Cond::Ne => "ne",
            Cond::Be => "be",
            Cond::A => "a",
            Cond::S => "s",
            Cond::Ns => "ns",
            Cond::P => "p",
            Cond::Np => "np",
            Cond::L => "l",
            Cond::Ge => "ge",
            Cond::Le => "le",
            Cond::G => "g",
        }
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

bitflags! {
    /// Condition and control flags, at their FLAGS register bit positions.
    #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct Flags: u16 {
        const CF = 1 << 0;
        const PF = 1 << 2;
        const AF = 1 << 4;
        const ZF = 1 << 6;
        const SF = 1 << 7;
        const TF = 1 << 8;
        const IF = 1 << 9;
        const DF = 1 << 10;
        const OF = 1 << 11;
    }
}

impl Flags {
    /// The six arithmetic status flags.
    pub const STATUS: Flags = Flags::from_bits_retain(
        Flags::CF.bits()
            | Flags::PF.bits()
            | Flags::AF.bits()
            | Flags::ZF.bits()
            | Flags::SF.bits()
            | Flags::OF.bits(),
    );
}

/// Minimum processor generation an encoding requires.
///
/// The coprocessor tags sit next to the integer generation they shipped with, so
/// [`Cpu::rank`] orders `I8087` with `I8086`, `I80287` with `I80286` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Cpu {
    I8086,
    I8087,
    I80186,
    I80286,
    I80287,
    I80386,
    I80387,
}

impl Cpu {
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Cpu::I8086 | Cpu::I8087 => 0,
            Cpu::I80186 => 1,
            Cpu::I80286 | Cpu::I80287 => 2,
            Cpu::I80386 | Cpu::I80387 => 3,
        }
    }

    #[must_use]
    pub const fn is_fpu(self) -> bool {
        matches!(self, Cpu::I8087 | Cpu::I80287 | Cpu::I80387)
    }

    /// Whether code tagged `self` runs on a machine of generation `limit`.
    #[must_use]
    pub const fn runs_on(self, limit: Cpu) -> bool {
        self.rank() <= limit.rank()
    }

    /// The later of two tags, keeping a coprocessor tag when ranks tie.
    #[must_use]
    pub fn max_with(self, other: Cpu) -> Cpu {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Cpu::I8086 => "8086",
            Cpu::I8087 => "8087",
            Cpu::I80186 => "80186",
            Cpu::I80286 => "80286",
            Cpu::I80287 => "80287",
            Cpu::I80386 => "80386",
            Cpu::I80387 => "80387",
        };
        f.write_str(s)
    }
}
