//! Decode entry points and the linear-sweep iterator.

use ne86_types::SegReg;
use tracing::debug;

use crate::config::{DecodeContext, DecodeOptions};
use crate::effects::FlagEffects;
use crate::forms;
use crate::inst::{DecodedInstruction, InvalidReason, Location};
use crate::op::Op;
use crate::reader::ByteSource;
use crate::state::DecodeState;
use crate::tables::{
    fpu_memory_leaf, lookup, lookup_fpu_register, primary_entries, secondary_entries, Action,
    Group, Leaf,
};
use crate::validate;

/// Instruction decoder configured with [`DecodeOptions`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    #[must_use]
    pub const fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub const fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode one instruction starting at `pos` in `source`.
    ///
    /// Never fails: malformed or truncated encodings come back flagged invalid, with the
    /// bytes that were consumed.
    pub fn decode<S: ByteSource + ?Sized>(
        &self,
        source: &S,
        pos: usize,
        ctx: DecodeContext,
    ) -> DecodedInstruction {
        let mut state = DecodeState::new(source, pos, ctx);

        let leaf = match state.scan_prefixes() {
            Some(opcode) => resolve(&mut state, opcode),
            None => None,
        };
        let Some(leaf) = leaf else {
            state.invalidate(InvalidReason::UnknownOpcode);
            return unknown(state);
        };

        let operands = forms::build(&mut state, &leaf);
        let (operands, cpu) = validate::finish(&mut state, &leaf, operands, &self.options);

        let prefixes = state.prefixes;
        DecodedInstruction {
            location: Location {
                segment: ctx.segment,
                offset: ctx.offset,
            },
            cpu,
            op: leaf.op,
            description: leaf.description,
            operands,
            operand_size: leaf.size.resolve(state.operand_size),
            address_size: state.address_size,
            segment: state.segment_for(SegReg::Ds),
            segment_override: prefixes.segment,
            lock: prefixes.lock,
            rep: prefixes.rep,
            flags: leaf.flags,
            invalid: state.invalid(),
            fpu_dest_st0: state.fpu_dest_st0,
            jump_target: false,
            label: None,
            bytes: state.into_bytes(),
        }
    }

    /// Decode consecutive instructions from `pos` until the source ends. `ctx.offset` is
    /// the offset of the byte at `pos`.
    pub fn sweep<'a, S: ByteSource + ?Sized>(
        &self,
        source: &'a S,
        pos: usize,
        ctx: DecodeContext,
    ) -> Sweep<'a, S> {
        Sweep {
            decoder: *self,
            source,
            pos,
            ctx,
        }
    }
}

/// Find the table leaf for `opcode`, reading the secondary opcode byte or ModRM as the
/// tables require.
fn resolve<S: ByteSource + ?Sized>(state: &mut DecodeState<'_, S>, opcode: u8) -> Option<Leaf> {
    match lookup(primary_entries(), opcode)?.action {
        Action::Leaf(leaf) => Some(leaf),
        Action::Group(group) => group_leaf(state, group),
        Action::Escape => {
            let second = state.read_u8();
            if state.invalid().is_some() {
                return None;
            }
            state.opcode = second;
            match lookup(secondary_entries(), second)?.action {
                Action::Leaf(leaf) => Some(leaf),
                Action::Group(group) => group_leaf(state, group),
                Action::Escape | Action::Fpu => None,
            }
        }
        Action::Fpu => {
            let modrm = state.modrm();
            if modrm.is_register() {
                lookup_fpu_register(opcode, modrm.byte()).copied()
            } else {
                fpu_memory_leaf(opcode, modrm.reg).copied()
            }
        }
    }
}

fn group_leaf<S: ByteSource + ?Sized>(
    state: &mut DecodeState<'_, S>,
    group: &'static Group,
) -> Option<Leaf> {
    let reg = state.modrm().reg;
    group[usize::from(reg)]
}

fn unknown<S: ByteSource + ?Sized>(state: DecodeState<'_, S>) -> DecodedInstruction {
    let ctx = state.ctx;
    let prefixes = state.prefixes;
    DecodedInstruction {
        location: Location {
            segment: ctx.segment,
            offset: ctx.offset,
        },
        cpu: state.cpu_floor(),
        op: Op::Invalid,
        description: "Invalid or unsupported opcode",
        operands: Vec::new(),
        operand_size: state.operand_size,
        address_size: state.address_size,
        segment: state.segment_for(SegReg::Ds),
        segment_override: prefixes.segment,
        lock: prefixes.lock,
        rep: prefixes.rep,
        flags: FlagEffects::NONE,
        invalid: state.invalid(),
        fpu_dest_st0: false,
        jump_target: false,
        label: None,
        bytes: state.into_bytes(),
    }
}

/// Iterator returned by [`Decoder::sweep`].
#[derive(Debug)]
pub struct Sweep<'a, S: ?Sized> {
    decoder: Decoder,
    source: &'a S,
    pos: usize,
    ctx: DecodeContext,
}

impl<S: ByteSource + ?Sized> Sweep<'_, S> {
    /// Source position of the next instruction.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Context (offset) the next instruction will be decoded at.
    #[must_use]
    pub fn context(&self) -> DecodeContext {
        self.ctx
    }
}

impl<S: ByteSource + ?Sized> Iterator for Sweep<'_, S> {
    type Item = DecodedInstruction;

    fn next(&mut self) -> Option<Self::Item> {
        self.source.byte_at(self.pos)?;
        let inst = self.decoder.decode(self.source, self.pos, self.ctx);
        let step = inst.len().max(1);
        if let Some(reason) = inst.invalid_reason() {
            debug!(
                location = %inst.location(),
                %reason,
                step,
                "sweep resynchronising after invalid instruction"
            );
        }
        self.pos += step;
        self.ctx = self.ctx.at(self.ctx.offset.wrapping_add(step as u32));
        Some(inst)
    }
}

#[cfg(test)]
mod tests {
    use ne86_types::Cpu;

    use super::*;

    fn decode(bytes: &[u8]) -> DecodedInstruction {
        Decoder::default().decode(bytes, 0, DecodeContext::real_mode(0, 0))
    }

    #[test]
    fn escape_reads_second_opcode_byte() {
        let inst = decode(&[0x0f, 0xa2]);
        assert!(inst.is_invalid());
        assert_eq!(inst.op(), Op::Invalid);
        assert_eq!(inst.len(), 2);

        let inst = decode(&[0x0f, 0x84, 0x10, 0x00]);
        assert_eq!(inst.op(), Op::Jcc);
        assert_eq!(inst.cpu(), Cpu::I80386);
        assert_eq!(inst.branch_target(), Some(0x14));
    }

    #[test]
    fn empty_group_slot_is_unknown() {
        let inst = decode(&[0xfe, 0xd0]);
        assert_eq!(inst.invalid_reason(), Some(InvalidReason::UnknownOpcode));
        assert_eq!(inst.len(), 2);
    }

    #[test]
    fn empty_source() {
        let inst = decode(&[]);
        assert_eq!(inst.invalid_reason(), Some(InvalidReason::Truncated));
        assert!(inst.is_empty());
    }

    #[test]
    fn prefix_only_source_is_truncated() {
        let inst = decode(&[0x26, 0x66]);
        assert_eq!(inst.invalid_reason(), Some(InvalidReason::Truncated));
        assert_eq!(inst.len(), 2);
    }

    #[test]
    fn sweep_steps_over_invalid_bytes() {
        let bytes = [0x90u8, 0x0f, 0xff, 0xc3];
        let ops: Vec<(u32, Op)> = Decoder::default()
            .sweep(&bytes[..], 0, DecodeContext::real_mode(0x1000, 0x100))
            .map(|i| (i.location().offset, i.op()))
            .collect();
        assert_eq!(
            ops,
            vec![(0x100, Op::Nop), (0x101, Op::Invalid), (0x103, Op::Ret)]
        );
    }

    #[test]
    fn cpu_limit_rejects_later_encodings() {
        let decoder = Decoder::new(DecodeOptions {
            max_cpu: Cpu::I8086,
            ..DecodeOptions::default()
        });
        assert_eq!(decoder.options().max_cpu, Cpu::I8086);
        assert!(decoder.options().strict_lock);
        assert_eq!(Decoder::default().options(), &DecodeOptions::default());
        let ctx = DecodeContext::real_mode(0, 0);
        let push_imm = decoder.decode(&[0x6a, 0x01][..], 0, ctx);
        assert_eq!(push_imm.invalid_reason(), Some(InvalidReason::CpuNotAllowed));
        assert_eq!(push_imm.cpu(), Cpu::I80186);
        let fadd = decoder.decode(&[0xd8, 0xc1][..], 0, ctx);
        assert!(!fadd.is_invalid());
        assert_eq!(fadd.cpu(), Cpu::I8087);
    }
}
