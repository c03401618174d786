//! Legacy prefix recognition and accumulation.

use ne86_types::SegReg;

use crate::inst::RepKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prefix {
    Segment(SegReg),
    OperandSize,
    AddressSize,
    Lock,
    Repne,
    Repe,
}

impl Prefix {
    pub(crate) const fn classify(b: u8) -> Option<Prefix> {
        match b {
            0x26 => Some(Prefix::Segment(SegReg::Es)),
            0x2e => Some(Prefix::Segment(SegReg::Cs)),
            0x36 => Some(Prefix::Segment(SegReg::Ss)),
            0x3e => Some(Prefix::Segment(SegReg::Ds)),
            0x64 => Some(Prefix::Segment(SegReg::Fs)),
            0x65 => Some(Prefix::Segment(SegReg::Gs)),
            0x66 => Some(Prefix::OperandSize),
            0x67 => Some(Prefix::AddressSize),
            0xf0 => Some(Prefix::Lock),
            0xf2 => Some(Prefix::Repne),
            0xf3 => Some(Prefix::Repe),
            _ => None,
        }
    }
}

/// Prefix state accumulated before the opcode byte.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Prefixes {
    /// Last segment override seen.
    pub segment: Option<SegReg>,
    pub operand_size_override: bool,
    pub address_size_override: bool,
    pub lock: bool,
    /// Last of REPE/REPNE seen.
    pub rep: RepKind,
}

impl Prefixes {
    pub(crate) fn apply(&mut self, prefix: Prefix) {
        match prefix {
            Prefix::Segment(seg) => self.segment = Some(seg),
            Prefix::OperandSize => self.operand_size_override = true,
            Prefix::AddressSize => self.address_size_override = true,
            Prefix::Lock => self.lock = true,
            Prefix::Repne => self.rep = RepKind::Repne,
            Prefix::Repe => self.rep = RepKind::Repe,
        }
    }

    /// Whether any prefix needs an 80386.
    pub(crate) fn needs_386(&self) -> bool {
        self.operand_size_override
            || self.address_size_override
            || matches!(self.segment, Some(SegReg::Fs | SegReg::Gs))
    }
}
