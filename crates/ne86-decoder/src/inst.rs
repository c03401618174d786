use core::fmt;

use ne86_types::{Cpu, SegReg, Width};

use crate::effects::FlagEffects;
use crate::op::Op;
use crate::operand::Operand;

/// Segment:offset of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub segment: u16,
    pub offset: u32,
}

impl Location {
    /// Segment and offset combined into one orderable value (segment in the high half).
    #[must_use]
    pub const fn linear(self) -> u64 {
        ((self.segment as u64) << 32) | self.offset as u64
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.segment, self.offset)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepKind {
    #[default]
    None,
    Repe,
    Repne,
}

/// First reason an instruction was flagged invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidReason {
    /// The source ended before the instruction was complete.
    Truncated,
    /// More than 15 bytes of prefixes and opcode.
    TooLong,
    /// No table entry for the opcode / sub-opcode combination.
    UnknownOpcode,
    /// A register was encoded where the operation needs memory.
    RegisterWhereMemoryRequired,
    /// 32-bit ModRM addressing, which this decoder does not implement.
    Addressing32,
    BadRepPrefix,
    BadLockPrefix,
    /// Reserved segment/control/test register encoding, or a write to CS.
    ReservedRegister,
    /// The encoding needs a newer processor than the decoder was configured for.
    CpuNotAllowed,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvalidReason::Truncated => "truncated instruction",
            InvalidReason::TooLong => "instruction exceeds 15 bytes",
            InvalidReason::UnknownOpcode => "unknown opcode",
            InvalidReason::RegisterWhereMemoryRequired => "register operand where memory is required",
            InvalidReason::Addressing32 => "32-bit addressing is not supported",
            InvalidReason::BadRepPrefix => "repeat prefix on a non-string instruction",
            InvalidReason::BadLockPrefix => "lock prefix on a non-lockable instruction",
            InvalidReason::ReservedRegister => "reserved register encoding",
            InvalidReason::CpuNotAllowed => "instruction requires a newer processor",
        };
        f.write_str(s)
    }
}

/// One decoded instruction.
///
/// Built in a single decode call and read-only afterwards, apart from the jump-target
/// bookkeeping owned by control-flow consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub(crate) location: Location,
    pub(crate) cpu: Cpu,
    pub(crate) op: Op,
    pub(crate) description: &'static str,
    pub(crate) operands: Vec<Operand>,
    pub(crate) operand_size: Width,
    pub(crate) address_size: Width,
    pub(crate) segment: SegReg,
    pub(crate) segment_override: Option<SegReg>,
    pub(crate) lock: bool,
    pub(crate) rep: RepKind,
    pub(crate) flags: FlagEffects,
    pub(crate) bytes: Vec<u8>,
    pub(crate) invalid: Option<InvalidReason>,
    pub(crate) fpu_dest_st0: bool,
    pub(crate) jump_target: bool,
    pub(crate) label: Option<u32>,
}

impl DecodedInstruction {
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub fn linear(&self) -> u64 {
        self.location.linear()
    }

    #[must_use]
    pub fn cpu(&self) -> Cpu {
        self.cpu
    }

    #[must_use]
    pub fn op(&self) -> Op {
        self.op
    }

    /// Human-readable description of the operation.
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description
    }

    #[must_use]
    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    #[must_use]
    pub fn operand(&self, idx: usize) -> Option<&Operand> {
        self.operands.get(idx)
    }

    #[must_use]
    pub fn operand_size(&self) -> Width {
        self.operand_size
    }

    #[must_use]
    pub fn address_size(&self) -> Width {
        self.address_size
    }

    /// Segment applied to memory operands without a form-specific default.
    #[must_use]
    pub fn segment(&self) -> SegReg {
        self.segment
    }

    #[must_use]
    pub fn segment_override(&self) -> Option<SegReg> {
        self.segment_override
    }

    #[must_use]
    pub fn lock(&self) -> bool {
        self.lock
    }

    #[must_use]
    pub fn rep(&self) -> RepKind {
        self.rep
    }

    #[must_use]
    pub fn flags(&self) -> FlagEffects {
        self.flags
    }

    /// Every byte consumed, prefixes included.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.invalid.is_some()
    }

    #[must_use]
    pub fn invalid_reason(&self) -> Option<InvalidReason> {
        self.invalid
    }

    /// Two-operand FPU form whose destination is ST(0).
    #[must_use]
    pub fn fpu_dest_st0(&self) -> bool {
        self.fpu_dest_st0
    }

    /// Offset of the following instruction.
    #[must_use]
    pub fn next_offset(&self) -> u32 {
        self.location.offset.wrapping_add(self.bytes.len() as u32)
    }

    /// Resolved target of a relative branch, an offset in the current code segment.
    #[must_use]
    pub fn branch_target(&self) -> Option<u32> {
        if !self.op.is_branch() {
            return None;
        }
        self.operands.iter().find_map(|op| match *op {
            Operand::Target { target, .. } => Some(target),
            _ => None,
        })
    }

    /// `(segment, offset)` of a direct intersegment CALL or JMP.
    #[must_use]
    pub fn far_target(&self) -> Option<(u16, u32)> {
        if !self.op.is_branch() {
            return None;
        }
        self.operands.iter().find_map(|op| match *op {
            Operand::Far { segment, offset, .. } => Some((segment, offset)),
            _ => None,
        })
    }

    #[must_use]
    pub fn is_jump_target(&self) -> bool {
        self.jump_target
    }

    #[must_use]
    pub fn label(&self) -> Option<u32> {
        self.label
    }

    /// Record that another instruction branches here, optionally with a label ordinal.
    pub fn mark_jump_target(&mut self, label: Option<u32>) {
        self.jump_target = true;
        if label.is_some() {
            self.label = label;
        }
    }
}

impl fmt::Display for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.location, self.op)?;
        for (i, operand) in self.operands.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{operand}")?;
        }
        if let Some(reason) = self.invalid {
            write!(f, " ; invalid: {reason}")?;
        }
        Ok(())
    }
}
