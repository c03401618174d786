// Shared helpers. Integration tests compile as separate crates, so this lives in a
// submodule instead of becoming its own test target.
#![allow(dead_code)]

use ne86_decoder::{
    decode, DecodeContext, DecodeOptions, DecodedInstruction, Decoder, Gpr, Operand, Width,
};

/// Decode 16-bit code at `0000:0000`.
pub fn dec(bytes: &[u8]) -> DecodedInstruction {
    decode(bytes, 0, DecodeContext::real_mode(0, 0))
}

/// Decode 16-bit code at `0000:offset`.
pub fn dec_at(bytes: &[u8], offset: u32) -> DecodedInstruction {
    decode(bytes, 0, DecodeContext::real_mode(0, offset))
}

/// Decode 32-bit-default code at `0000:0000`.
pub fn dec32(bytes: &[u8]) -> DecodedInstruction {
    let ctx = DecodeContext::new(0, 0, Width::W32).expect("32-bit context");
    decode(bytes, 0, ctx)
}

pub fn dec_with(options: DecodeOptions, bytes: &[u8]) -> DecodedInstruction {
    Decoder::new(options).decode(bytes, 0, DecodeContext::real_mode(0, 0))
}

/// Assert the instruction decoded cleanly and consumed exactly `bytes`.
#[track_caller]
pub fn assert_valid(inst: &DecodedInstruction, bytes: &[u8]) {
    assert!(
        !inst.is_invalid(),
        "{bytes:02x?} decoded invalid: {:?}",
        inst.invalid_reason()
    );
    assert_eq!(inst.bytes(), bytes, "{inst}");
}

pub fn r16(reg: Gpr) -> Operand {
    Operand::reg(reg, Width::W16)
}

pub fn r8(reg: Gpr) -> Operand {
    Operand::reg(reg, Width::W8)
}

/// Tiny deterministic PRNG (xorshift64*) so byte-soup tests are reproducible.
pub struct XorShift64(pub u64);

impl XorShift64 {
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545_f491_4f6c_dd1d)
    }

    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(len);
        while out.len() < len {
            out.extend_from_slice(&self.next_u64().to_le_bytes());
        }
        out.truncate(len);
        out
    }
}
