//! Real-mode x86 instruction decoder (8086 through 80386, with 8087/80287/80387).
//!
//! Decoding is table driven: prefixes are accumulated into per-call decode state, the
//! opcode byte selects an entry in the primary, 0x0F or coprocessor [`tables`], and the
//! entry's operand form pulls ModRM, displacement and immediate fields from the source.
//! Malformed input never fails a decode; the returned [`DecodedInstruction`] carries an
//! [`InvalidReason`] instead.
//!
//! ```
//! use ne86_decoder::{decode_bytes, Op, Operand, Size};
//!
//! let inst = decode_bytes(&[0xb8, 0x34, 0x12], 0x100);
//! assert_eq!(inst.op(), Op::Mov);
//! assert_eq!(
//!     inst.operand(1),
//!     Some(&Operand::Imm { value: 0x1234, size: Size::Word })
//! );
//! assert_eq!(inst.len(), 3);
//! ```

mod config;
mod decoder;
pub mod effects;
mod error;
mod forms;
mod inst;
mod modrm;
mod op;
mod operand;
mod prefix;
mod reader;
mod state;
pub mod tables;
mod validate;

pub use config::{DecodeContext, DecodeOptions};
pub use decoder::{Decoder, Sweep};
pub use effects::FlagEffects;
pub use error::{DecodeError, Result};
pub use inst::{DecodedInstruction, InvalidReason, Location, RepKind};
pub use op::Op;
pub use operand::{AddrMode, FrameSlot, MemRef, Operand, Size, SpecialClass};
pub use reader::{sign_extend, ByteSource};
pub use state::MAX_INST_LEN;

pub use ne86_types::{Cond, Cpu, Flags, Gpr, SegReg, Width};

/// Decode one instruction at `pos` with default options.
pub fn decode<S: ByteSource + ?Sized>(
    source: &S,
    pos: usize,
    ctx: DecodeContext,
) -> DecodedInstruction {
    Decoder::default().decode(source, pos, ctx)
}

/// Decode the instruction at the start of `bytes`, as 16-bit code at `0000:offset`.
pub fn decode_bytes(bytes: &[u8], offset: u32) -> DecodedInstruction {
    decode(bytes, 0, DecodeContext::real_mode(0, offset))
}
