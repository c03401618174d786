use ne86_types::{Cpu, Width};

use crate::error::{DecodeError, Result};

/// Addressing context for one decode call, supplied by the executable reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecodeContext {
    pub segment: u16,
    pub offset: u32,
    /// Native width of the code segment; both operand and address size start here.
    pub default_width: Width,
}

impl DecodeContext {
    /// Build a context for a code segment of the given width.
    pub fn new(segment: u16, offset: u32, default_width: Width) -> Result<Self> {
        match default_width {
            Width::W16 | Width::W32 => Ok(Self {
                segment,
                offset,
                default_width,
            }),
            Width::W8 => Err(DecodeError::UnsupportedWidth(8)),
        }
    }

    /// Build a context from a bitness (16 or 32).
    pub fn with_bitness(segment: u16, offset: u32, bitness: u32) -> Result<Self> {
        let width = Width::from_bits(bitness).ok_or(DecodeError::UnsupportedWidth(bitness))?;
        Self::new(segment, offset, width)
    }

    /// 16-bit real-mode context.
    #[must_use]
    pub const fn real_mode(segment: u16, offset: u32) -> Self {
        Self {
            segment,
            offset,
            default_width: Width::W16,
        }
    }

    #[must_use]
    pub const fn at(self, offset: u32) -> Self {
        Self { offset, ..self }
    }
}

/// Decoder-wide options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Newest processor generation the code may target; encodings that need a later one
    /// are reported invalid.
    pub max_cpu: Cpu,
    /// Reject LOCK outside the lockable read-modify-write forms. The 8086 accepted LOCK
    /// on anything, so disassembling very old code may want this off.
    pub strict_lock: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_cpu: Cpu::I80387,
            strict_lock: true,
        }
    }
}
