use ne86_types::Width;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Caller errors raised by the public helpers.
///
/// Malformed machine code never produces a `DecodeError`: it yields an instruction with its
/// invalid flag set (see [`crate::InvalidReason`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("cannot sign-extend a {from} value to {to}")]
    UnsupportedSignExtension { from: Width, to: Width },

    #[error("unsupported code segment width: {0} bits (expected 16 or 32)")]
    UnsupportedWidth(u32),
}
