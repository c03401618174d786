//! Data-driven opcode dispatch tables.
//!
//! Each table is a list of `{pattern, mask, action}` entries: an entry matches byte `b`
//! when `b & mask == pattern`, and the first match wins. Group opcodes route to an
//! eight-slot table keyed by the ModRM reg field; the FPU escapes have their own memory
//! and register-form tables. Every leaf carries the operation kind, CPU tag, description,
//! operand form and flag effects together, so nothing is patched in later.

use ne86_types::{Cpu, SegReg, Width};

use crate::effects::FlagEffects;
use crate::op::Op;
use crate::operand::{Size, SpecialClass};

mod fpu;
mod groups;
mod primary;
mod secondary;

pub use fpu::{fpu_memory_leaf, fpu_register_entries};
pub use primary::primary_entries;
pub use secondary::secondary_entries;

/// Operand size selector for a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sz {
    /// Byte.
    B,
    /// Current operand size (16 or 32).
    V,
    /// Always 16-bit.
    W,
    /// Always 32-bit.
    D,
}

impl Sz {
    #[must_use]
    pub const fn resolve(self, operand_size: Width) -> Width {
        match self {
            Sz::B => Width::W8,
            Sz::V => operand_size,
            Sz::W => Width::W16,
            Sz::D => Width::W32,
        }
    }
}

/// Operand template. Lists are in the operation's order before direction-bit reversal;
/// "size" is the leaf's resolved [`Sz`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    None,
    /// `[r/m, reg]`
    RmReg,
    /// `[reg, r/m]`
    RegRm,
    /// `[reg, r/m]` with the r/m at a fixed source size (MOVZX, MOVSX, LAR, LSL).
    RegRmSrc(Sz),
    /// `[r/m]`
    Rm,
    /// `[r/m, imm]`
    RmImm,
    /// `[r/m, imm8 sign-extended to size]`
    RmImm8s,
    /// `[r/m, imm8]`
    RmImm8,
    /// `[r/m, 1]`
    RmOne,
    /// `[r/m, cl]`
    RmCl,
    /// `[r/m, reg, imm8]`
    RmRegImm8,
    /// `[r/m, reg, cl]`
    RmRegCl,
    /// `[reg, r/m, imm]`
    RegRmImm,
    /// `[reg, r/m, imm8 sign-extended]`
    RegRmImm8s,
    /// `[acc, imm]`
    AccImm,
    /// `[reg]` from the low three opcode bits.
    OpReg,
    /// `[reg, imm]` with the register from the low three opcode bits.
    OpRegImm,
    /// `[acc, reg]` with the register from the low three opcode bits.
    AccOpReg,
    /// `[seg]`
    FixedSeg(SegReg),
    /// `[imm]`
    Imm,
    /// `[imm8 sign-extended to size]`
    Imm8s,
    /// `[imm16, imm8]` (ENTER)
    Imm16Imm8,
    /// `[target]` from a rel8.
    Rel8,
    /// `[target]` from an operand-size relative displacement.
    RelV,
    /// `[cond, target]` from a rel8; condition in the low opcode nibble.
    CondRel8,
    /// `[cond, target]` from an operand-size displacement.
    CondRelV,
    /// `[cond, r/m8]` (SETcc)
    CondRm,
    /// `[seg:offset]` immediate far pointer.
    FarPtr,
    /// `[acc, moffs]`
    AccMoffs,
    /// `[r/m16, sreg]`
    RmSeg,
    /// `[reg, address]` (LEA)
    RegLea,
    /// `[reg, m16:size]` (LDS, LES, LSS, LFS, LGS)
    RegMemFar,
    /// `[reg, m-size&size]` (BOUND)
    RegMemPair,
    /// `[mem]` of a fixed size; register encodings are invalid.
    Mem(Size),
    /// `[m16:size]` (indirect far CALL/JMP)
    MemFar,
    /// `[acc, imm8 port]`
    AccPort,
    /// `[imm8 port, acc]`
    PortAcc,
    /// `[acc, dx]`
    AccDx,
    /// `[dx, acc]`
    DxAcc,
    /// `[r32, special]`
    RegSpecial(SpecialClass),
    /// `[st(0), st(i)]`
    St0Sti,
    /// `[st(i), st(0)]`
    StiSt0,
    /// `[st(i)]`
    Sti,
    /// `[ax]`
    Ax,
}

/// A fully specified table leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf {
    pub op: Op,
    pub cpu: Cpu,
    pub description: &'static str,
    pub size: Sz,
    pub form: Form,
    pub flags: FlagEffects,
    /// Opcode bit 1 selects the reversed operand order.
    pub direction: bool,
}

impl Leaf {
    pub(crate) const fn new(
        op: Op,
        cpu: Cpu,
        description: &'static str,
        size: Sz,
        form: Form,
        flags: FlagEffects,
    ) -> Self {
        Self {
            op,
            cpu,
            description,
            size,
            form,
            flags,
            direction: false,
        }
    }

    pub(crate) const fn dir(self) -> Self {
        Self {
            direction: true,
            ..self
        }
    }
}

/// Eight leaves keyed by the ModRM reg field.
pub type Group = [Option<Leaf>; 8];

#[derive(Debug, Clone, Copy)]
pub enum Action {
    Leaf(Leaf),
    Group(&'static Group),
    /// 0x0F: continue in the secondary table.
    Escape,
    /// 0xD8..=0xDF: coprocessor escape.
    Fpu,
}

#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub pattern: u8,
    pub mask: u8,
    pub action: Action,
}

impl Entry {
    pub(crate) const fn one(byte: u8, leaf: Leaf) -> Self {
        Self::masked(byte, 0xff, leaf)
    }

    pub(crate) const fn masked(pattern: u8, mask: u8, leaf: Leaf) -> Self {
        Self {
            pattern,
            mask,
            action: Action::Leaf(leaf),
        }
    }

    pub(crate) const fn group(byte: u8, group: &'static Group) -> Self {
        Self {
            pattern: byte,
            mask: 0xff,
            action: Action::Group(group),
        }
    }

    #[must_use]
    pub const fn matches(&self, byte: u8) -> bool {
        byte & self.mask == self.pattern
    }
}

/// Register-form (`mod = 3`) coprocessor entry; pattern and mask apply to the ModRM byte.
#[derive(Debug, Clone, Copy)]
pub struct FpuRegEntry {
    pub escape: u8,
    pub pattern: u8,
    pub mask: u8,
    pub leaf: Leaf,
}

pub(crate) fn lookup(entries: &'static [Entry], byte: u8) -> Option<&'static Entry> {
    entries.iter().find(|e| e.matches(byte))
}

pub(crate) fn lookup_fpu_register(escape: u8, modrm: u8) -> Option<&'static Leaf> {
    fpu_register_entries()
        .iter()
        .find(|e| e.escape == escape && modrm & e.mask == e.pattern)
        .map(|e| &e.leaf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(entries: &[Entry]) -> Vec<(u8, usize, usize)> {
        let mut out = Vec::new();
        for byte in 0..=0xffu8 {
            let hits: Vec<usize> = entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.matches(byte))
                .map(|(i, _)| i)
                .collect();
            if hits.len() > 1 {
                out.push((byte, hits[0], hits[1]));
            }
        }
        out
    }

    #[test]
    fn primary_entries_only_overlap_on_nop() {
        // 0x90 is both NOP and XCHG AX,AX; the NOP entry comes first.
        let overlaps = overlaps(primary_entries());
        assert_eq!(overlaps.len(), 1, "{overlaps:x?}");
        assert_eq!(overlaps[0].0, 0x90);
        let first = lookup(primary_entries(), 0x90).unwrap();
        assert!(matches!(first.action, Action::Leaf(l) if l.op == Op::Nop));
    }

    #[test]
    fn secondary_entries_do_not_overlap() {
        assert!(overlaps(secondary_entries()).is_empty());
    }

    #[test]
    fn fpu_register_entries_do_not_overlap() {
        for escape in 0xd8..=0xdfu8 {
            for modrm in 0xc0..=0xffu8 {
                let hits = fpu_register_entries()
                    .iter()
                    .filter(|e| e.escape == escape && modrm & e.mask == e.pattern)
                    .count();
                assert!(hits <= 1, "escape {escape:02x} modrm {modrm:02x}");
            }
        }
    }

    #[test]
    fn patterns_are_within_their_masks() {
        for e in primary_entries().iter().chain(secondary_entries()) {
            assert_eq!(e.pattern & !e.mask, 0, "pattern {:02x}", e.pattern);
        }
        for e in fpu_register_entries() {
            assert_eq!(e.pattern & !e.mask, 0);
            assert_eq!(e.pattern & 0xc0, 0xc0);
        }
    }

    #[test]
    fn leaf_flag_effects_are_disjoint() {
        let mut leaves: Vec<Leaf> = Vec::new();
        for e in primary_entries().iter().chain(secondary_entries()) {
            match e.action {
                Action::Leaf(l) => leaves.push(l),
                Action::Group(g) => leaves.extend(g.iter().flatten().copied()),
                Action::Escape | Action::Fpu => {}
            }
        }
        leaves.extend(fpu_register_entries().iter().map(|e| e.leaf));
        for escape in 0xd8..=0xdfu8 {
            for reg in 0..8 {
                leaves.extend(fpu_memory_leaf(escape, reg).copied());
            }
        }
        assert!(leaves.len() > 250);
        for leaf in leaves {
            assert!(leaf.flags.is_disjoint(), "{:?}", leaf.op);
            assert!(!leaf.description.is_empty());
            assert_ne!(leaf.op, Op::Invalid);
            if leaf.op.is_fpu() {
                assert!(leaf.cpu.is_fpu(), "{:?}", leaf.op);
                assert!(leaf.flags.is_none());
            }
        }
    }

    #[test]
    fn every_escape_and_prefix_byte_is_routed() {
        assert!(matches!(lookup(primary_entries(), 0x0f).unwrap().action, Action::Escape));
        for b in 0xd8..=0xdfu8 {
            assert!(matches!(lookup(primary_entries(), b).unwrap().action, Action::Fpu));
        }
        // Prefix bytes are consumed before dispatch and have no entries.
        for b in [0x26u8, 0x2e, 0x36, 0x3e, 0x64, 0x65, 0x66, 0x67, 0xf0, 0xf2, 0xf3] {
            assert!(lookup(primary_entries(), b).is_none(), "{b:02x}");
        }
    }
}
