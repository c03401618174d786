//! Decode-local cursor and state, threaded through one decode call.

use ne86_types::{Cpu, SegReg, Width};
use tracing::trace;

use crate::config::DecodeContext;
use crate::inst::InvalidReason;
use crate::modrm::ModRm;
use crate::prefix::{Prefix, Prefixes};
use crate::reader::{ByteSource, Reader};

/// Architectural instruction length limit.
pub const MAX_INST_LEN: usize = 15;

pub(crate) struct DecodeState<'a, S: ByteSource + ?Sized> {
    reader: Reader<'a, S>,
    pub(crate) ctx: DecodeContext,
    pub(crate) prefixes: Prefixes,
    pub(crate) operand_size: Width,
    pub(crate) address_size: Width,
    /// Last opcode byte read (the second byte for 0x0F opcodes).
    pub(crate) opcode: u8,
    pub(crate) fpu_dest_st0: bool,
    modrm: Option<ModRm>,
    cpu_floor: Cpu,
    invalid: Option<InvalidReason>,
}

impl<'a, S: ByteSource + ?Sized> DecodeState<'a, S> {
    pub(crate) fn new(source: &'a S, pos: usize, ctx: DecodeContext) -> Self {
        Self {
            reader: Reader::new(source, pos),
            ctx,
            prefixes: Prefixes::default(),
            operand_size: ctx.default_width,
            address_size: ctx.default_width,
            opcode: 0,
            fpu_dest_st0: false,
            modrm: None,
            cpu_floor: Cpu::I8086,
            invalid: None,
        }
    }

    /// Consume legacy prefixes and return the first opcode byte, or `None` when the
    /// source ends or the prefix run exceeds the length limit.
    pub(crate) fn scan_prefixes(&mut self) -> Option<u8> {
        loop {
            let b = self.read_u8();
            if self.reader.is_truncated() {
                return None;
            }
            let Some(prefix) = Prefix::classify(b) else {
                self.opcode = b;
                break;
            };
            self.prefixes.apply(prefix);
            if self.consumed() >= MAX_INST_LEN {
                self.invalidate(InvalidReason::TooLong);
                return None;
            }
        }

        let default = self.ctx.default_width;
        if self.prefixes.operand_size_override {
            self.operand_size = default.toggled();
        }
        if self.prefixes.address_size_override {
            self.address_size = default.toggled();
        }
        if self.prefixes.needs_386() {
            self.require(Cpu::I80386);
        }
        Some(self.opcode)
    }

    pub(crate) fn read_u8(&mut self) -> u8 {
        let v = self.reader.read_u8();
        self.check_truncation();
        v
    }

    pub(crate) fn read_u16(&mut self) -> u16 {
        let v = self.reader.read_u16();
        self.check_truncation();
        v
    }

    pub(crate) fn read(&mut self, width: Width) -> u32 {
        let v = self.reader.read(width);
        self.check_truncation();
        v
    }

    /// The ModRM byte, read on first use.
    pub(crate) fn modrm(&mut self) -> ModRm {
        if let Some(m) = self.modrm {
            return m;
        }
        let m = ModRm::parse(self.read_u8());
        self.modrm = Some(m);
        m
    }

    pub(crate) fn consumed(&self) -> usize {
        self.reader.consumed()
    }

    /// Segment for a memory operand whose addressing form defaults to `default`.
    pub(crate) fn segment_for(&self, default: SegReg) -> SegReg {
        self.prefixes.segment.unwrap_or(default)
    }

    /// Raise the minimum CPU generation.
    pub(crate) fn require(&mut self, cpu: Cpu) {
        self.cpu_floor = self.cpu_floor.max_with(cpu);
    }

    pub(crate) fn cpu_floor(&self) -> Cpu {
        self.cpu_floor
    }

    /// Flag the instruction invalid. Only the first reason is kept.
    pub(crate) fn invalidate(&mut self, reason: InvalidReason) {
        if self.invalid.is_none() {
            trace!(
                segment = self.ctx.segment,
                offset = self.ctx.offset,
                opcode = self.opcode,
                ?reason,
                "instruction marked invalid"
            );
            self.invalid = Some(reason);
        }
    }

    pub(crate) fn invalid(&self) -> Option<InvalidReason> {
        self.invalid
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.reader.into_raw()
    }

    fn check_truncation(&mut self) {
        if self.reader.is_truncated() {
            self.invalidate(InvalidReason::Truncated);
        }
    }
}
