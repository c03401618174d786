//! Byte source abstraction and the per-instruction field reader.

use ne86_types::Width;

use crate::error::{DecodeError, Result};

/// Random-access view of a code region.
///
/// The decoder keeps its own cursor, so a single source can be shared by any number of
/// decode calls at different positions.
pub trait ByteSource {
    /// The byte at `pos`, or `None` past the end of the region.
    fn byte_at(&self, pos: usize) -> Option<u8>;
}

impl ByteSource for [u8] {
    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.get(pos).copied()
    }
}

impl<const N: usize> ByteSource for [u8; N] {
    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.get(pos).copied()
    }
}

impl ByteSource for Vec<u8> {
    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.get(pos).copied()
    }
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
    fn byte_at(&self, pos: usize) -> Option<u8> {
        (**self).byte_at(pos)
    }
}

/// Little-endian field reader for one instruction.
///
/// Every byte successfully read is logged in `raw`. Reading past the end of the source
/// sets the truncated flag and yields zero for the missing bytes so table walking can
/// finish deterministically. The zero fill is not logged: `raw` holds exactly the bytes
/// consumed from the source, so it is always a prefix of it.
pub(crate) struct Reader<'a, S: ByteSource + ?Sized> {
    source: &'a S,
    pos: usize,
    raw: Vec<u8>,
    truncated: bool,
}

impl<'a, S: ByteSource + ?Sized> Reader<'a, S> {
    pub(crate) fn new(source: &'a S, pos: usize) -> Self {
        Self {
            source,
            pos,
            raw: Vec::with_capacity(8),
            truncated: false,
        }
    }

    pub(crate) fn read_u8(&mut self) -> u8 {
        if self.truncated {
            return 0;
        }
        match self.source.byte_at(self.pos) {
            Some(b) => {
                self.pos += 1;
                self.raw.push(b);
                b
            }
            None => {
                self.truncated = true;
                0
            }
        }
    }

    pub(crate) fn read_u16(&mut self) -> u16 {
        let lo = self.read_u8();
        let hi = self.read_u8();
        u16::from_le_bytes([lo, hi])
    }

    pub(crate) fn read_u32(&mut self) -> u32 {
        let lo = self.read_u16();
        let hi = self.read_u16();
        u32::from(lo) | (u32::from(hi) << 16)
    }

    /// Read a field of the given width, zero-extended to 32 bits.
    pub(crate) fn read(&mut self, width: Width) -> u32 {
        match width {
            Width::W8 => u32::from(self.read_u8()),
            Width::W16 => u32::from(self.read_u16()),
            Width::W32 => self.read_u32(),
        }
    }

    /// Number of bytes consumed so far, prefixes included.
    pub(crate) fn consumed(&self) -> usize {
        self.raw.len()
    }

    pub(crate) fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub(crate) fn into_raw(self) -> Vec<u8> {
        self.raw
    }
}

/// Widen `value` from `from` to `to`, propagating the sign bit.
///
/// Supported widenings are 8→16, 8→32, 16→32 and the 16→16 no-op. Anything else is a
/// caller error.
pub fn sign_extend(value: u32, from: Width, to: Width) -> Result<u32> {
    match (from, to) {
        (Width::W8, Width::W16) | (Width::W8, Width::W32) | (Width::W16, Width::W32) => {
            Ok(widen(value, from, to))
        }
        (Width::W16, Width::W16) => Ok(value & 0xffff),
        _ => Err(DecodeError::UnsupportedSignExtension { from, to }),
    }
}

/// Infallible core of [`sign_extend`] for the decoder's own call sites.
pub(crate) const fn widen(value: u32, from: Width, to: Width) -> u32 {
    to.truncate(from.sign_extend(value))
}
