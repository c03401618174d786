//! Post-decode checks that span more than one table entry.

use ne86_types::Cpu;

use crate::config::DecodeOptions;
use crate::inst::{InvalidReason, RepKind};
use crate::op::Op;
use crate::operand::Operand;
use crate::reader::ByteSource;
use crate::state::{DecodeState, MAX_INST_LEN};
use crate::tables::Leaf;

/// Apply direction-bit reversal and the prefix and CPU rules. Returns the final operand
/// list and the instruction's CPU tag.
pub(crate) fn finish<S: ByteSource + ?Sized>(
    state: &mut DecodeState<'_, S>,
    leaf: &Leaf,
    operands: Vec<Operand>,
    options: &DecodeOptions,
) -> (Vec<Operand>, Cpu) {
    if state.consumed() > MAX_INST_LEN {
        state.invalidate(InvalidReason::TooLong);
    }

    let reversed = leaf.direction && state.opcode & 0x02 != 0;
    let operands = orient(operands, reversed);

    if !rep_allowed(state.prefixes.rep, leaf.op) {
        state.invalidate(InvalidReason::BadRepPrefix);
    }
    if state.prefixes.lock && options.strict_lock && !lock_allowed(leaf.op, &operands) {
        state.invalidate(InvalidReason::BadLockPrefix);
    }

    let cpu = leaf.cpu.max_with(state.cpu_floor());
    if !cpu.runs_on(options.max_cpu) {
        state.invalidate(InvalidReason::CpuNotAllowed);
    }
    (operands, cpu)
}

/// Swap the first two operands when `reversed`; any third operand stays last.
pub(crate) fn orient(operands: Vec<Operand>, reversed: bool) -> Vec<Operand> {
    if !reversed {
        return operands;
    }
    let mut rest = operands.into_iter();
    match (rest.next(), rest.next()) {
        (Some(first), Some(second)) => [second, first].into_iter().chain(rest).collect(),
        (first, second) => first.into_iter().chain(second).chain(rest).collect(),
    }
}

pub(crate) const fn rep_allowed(rep: RepKind, op: Op) -> bool {
    match rep {
        RepKind::None => true,
        RepKind::Repe => op.is_string(),
        RepKind::Repne => op.accepts_repne(),
    }
}

fn lock_allowed(op: Op, operands: &[Operand]) -> bool {
    op.is_lockable() && operands.first().is_some_and(Operand::is_memory)
}
