//! Coprocessor escape tables (0xD8..=0xDF).
//!
//! Memory forms (`mod != 3`) are keyed by escape byte and ModRM reg field. Register forms
//! match the whole ModRM byte against a pattern/mask, which covers both the `st(i)`
//! families (`mask = 0xF8`) and the fixed single-byte encodings (`mask = 0xFF`).

use ne86_types::Cpu;

use super::{Form, FpuRegEntry, Leaf, Sz};
use crate::effects::FlagEffects;
use crate::op::Op;
use crate::operand::Size;

const fn fpu(op: Op, cpu: Cpu, desc: &'static str, form: Form) -> Leaf {
    Leaf::new(op, cpu, desc, Sz::V, form, FlagEffects::NONE)
}

const fn m(op: Op, desc: &'static str, size: Size) -> Option<Leaf> {
    Some(fpu(op, Cpu::I8087, desc, Form::Mem(size)))
}

/// The eight arithmetic memory forms shared by D8/DC (real) and DA/DE (integer).
const fn arith_mem(real: bool, size: Size) -> [Option<Leaf>; 8] {
    if real {
        [
            m(Op::Fadd, "Add real", size),
            m(Op::Fmul, "Multiply real", size),
            m(Op::Fcom, "Compare real", size),
            m(Op::Fcomp, "Compare real and pop", size),
            m(Op::Fsub, "Subtract real", size),
            m(Op::Fsubr, "Reverse subtract real", size),
            m(Op::Fdiv, "Divide real", size),
            m(Op::Fdivr, "Reverse divide real", size),
        ]
    } else {
        [
            m(Op::Fiadd, "Add integer", size),
            m(Op::Fimul, "Multiply integer", size),
            m(Op::Ficom, "Compare integer", size),
            m(Op::Ficomp, "Compare integer and pop", size),
            m(Op::Fisub, "Subtract integer", size),
            m(Op::Fisubr, "Reverse subtract integer", size),
            m(Op::Fidiv, "Divide integer", size),
            m(Op::Fidivr, "Reverse divide integer", size),
        ]
    }
}

static FPU_MEM: [[Option<Leaf>; 8]; 8] = [
    // D8
    arith_mem(true, Size::Dword),
    // D9
    [
        m(Op::Fld, "Load real", Size::Dword),
        None,
        m(Op::Fst, "Store real", Size::Dword),
        m(Op::Fstp, "Store real and pop", Size::Dword),
        m(Op::Fldenv, "Load environment", Size::Unsized),
        m(Op::Fldcw, "Load control word", Size::Word),
        m(Op::Fstenv, "Store environment", Size::Unsized),
        m(Op::Fstcw, "Store control word", Size::Word),
    ],
    // DA
    arith_mem(false, Size::Dword),
    // DB
    [
        m(Op::Fild, "Load integer", Size::Dword),
        None,
        m(Op::Fist, "Store integer", Size::Dword),
        m(Op::Fistp, "Store integer and pop", Size::Dword),
        None,
        m(Op::Fld, "Load extended real", Size::Tword),
        None,
        m(Op::Fstp, "Store extended real and pop", Size::Tword),
    ],
    // DC
    arith_mem(true, Size::Qword),
    // DD
    [
        m(Op::Fld, "Load real", Size::Qword),
        None,
        m(Op::Fst, "Store real", Size::Qword),
        m(Op::Fstp, "Store real and pop", Size::Qword),
        m(Op::Frstor, "Restore coprocessor state", Size::Unsized),
        None,
        m(Op::Fsave, "Save coprocessor state", Size::Unsized),
        m(Op::Fstsw, "Store status word", Size::Word),
    ],
    // DE
    arith_mem(false, Size::Word),
    // DF
    [
        m(Op::Fild, "Load integer", Size::Word),
        None,
        m(Op::Fist, "Store integer", Size::Word),
        m(Op::Fistp, "Store integer and pop", Size::Word),
        m(Op::Fbld, "Load packed BCD", Size::Tword),
        m(Op::Fild, "Load long integer", Size::Qword),
        m(Op::Fbstp, "Store packed BCD and pop", Size::Tword),
        m(Op::Fistp, "Store long integer and pop", Size::Qword),
    ],
];

/// Memory-form leaf for `escape` (0xD8..=0xDF) and ModRM reg field `reg`.
#[must_use]
pub fn fpu_memory_leaf(escape: u8, reg: u8) -> Option<&'static Leaf> {
    let row = FPU_MEM.get(usize::from(escape.checked_sub(0xd8)?))?;
    row.get(usize::from(reg))?.as_ref()
}

const fn sti(escape: u8, pattern: u8, op: Op, cpu: Cpu, desc: &'static str, form: Form) -> FpuRegEntry {
    FpuRegEntry {
        escape,
        pattern,
        mask: 0xf8,
        leaf: fpu(op, cpu, desc, form),
    }
}

const fn fixed(escape: u8, modrm: u8, op: Op, cpu: Cpu, desc: &'static str) -> FpuRegEntry {
    FpuRegEntry {
        escape,
        pattern: modrm,
        mask: 0xff,
        leaf: fpu(op, cpu, desc, Form::None),
    }
}

const I87: Cpu = Cpu::I8087;
const I287: Cpu = Cpu::I80287;
const I387: Cpu = Cpu::I80387;

static FPU_REG: &[FpuRegEntry] = &[
    // D8: st(0) = st(0) op st(i)
    sti(0xd8, 0xc0, Op::Fadd, I87, "Add real", Form::St0Sti),
    sti(0xd8, 0xc8, Op::Fmul, I87, "Multiply real", Form::St0Sti),
    sti(0xd8, 0xd0, Op::Fcom, I87, "Compare real", Form::Sti),
    sti(0xd8, 0xd8, Op::Fcomp, I87, "Compare real and pop", Form::Sti),
    sti(0xd8, 0xe0, Op::Fsub, I87, "Subtract real", Form::St0Sti),
    sti(0xd8, 0xe8, Op::Fsubr, I87, "Reverse subtract real", Form::St0Sti),
    sti(0xd8, 0xf0, Op::Fdiv, I87, "Divide real", Form::St0Sti),
    sti(0xd8, 0xf8, Op::Fdivr, I87, "Reverse divide real", Form::St0Sti),
    // D9
    sti(0xd9, 0xc0, Op::Fld, I87, "Push st(i)", Form::Sti),
    sti(0xd9, 0xc8, Op::Fxch, I87, "Exchange registers", Form::Sti),
    fixed(0xd9, 0xd0, Op::Fnop, I87, "No operation"),
    fixed(0xd9, 0xe0, Op::Fchs, I87, "Change sign"),
    fixed(0xd9, 0xe1, Op::Fabs, I87, "Absolute value"),
    fixed(0xd9, 0xe4, Op::Ftst, I87, "Test against zero"),
    fixed(0xd9, 0xe5, Op::Fxam, I87, "Examine"),
    fixed(0xd9, 0xe8, Op::Fld1, I87, "Load +1.0"),
    fixed(0xd9, 0xe9, Op::Fldl2t, I87, "Load log2(10)"),
    fixed(0xd9, 0xea, Op::Fldl2e, I87, "Load log2(e)"),
    fixed(0xd9, 0xeb, Op::Fldpi, I87, "Load pi"),
    fixed(0xd9, 0xec, Op::Fldlg2, I87, "Load log10(2)"),
    fixed(0xd9, 0xed, Op::Fldln2, I87, "Load ln(2)"),
    fixed(0xd9, 0xee, Op::Fldz, I87, "Load +0.0"),
    fixed(0xd9, 0xf0, Op::F2xm1, I87, "Compute 2^x - 1"),
    fixed(0xd9, 0xf1, Op::Fyl2x, I87, "Compute y * log2(x)"),
    fixed(0xd9, 0xf2, Op::Fptan, I87, "Partial tangent"),
    fixed(0xd9, 0xf3, Op::Fpatan, I87, "Partial arctangent"),
    fixed(0xd9, 0xf4, Op::Fxtract, I87, "Extract exponent and significand"),
    fixed(0xd9, 0xf5, Op::Fprem1, I387, "IEEE partial remainder"),
    fixed(0xd9, 0xf6, Op::Fdecstp, I87, "Decrement stack pointer"),
    fixed(0xd9, 0xf7, Op::Fincstp, I87, "Increment stack pointer"),
    fixed(0xd9, 0xf8, Op::Fprem, I87, "Partial remainder"),
    fixed(0xd9, 0xf9, Op::Fyl2xp1, I87, "Compute y * log2(x + 1)"),
    fixed(0xd9, 0xfa, Op::Fsqrt, I87, "Square root"),
    fixed(0xd9, 0xfb, Op::Fsincos, I387, "Sine and cosine"),
    fixed(0xd9, 0xfc, Op::Frndint, I87, "Round to integer"),
    fixed(0xd9, 0xfd, Op::Fscale, I87, "Scale by power of two"),
    fixed(0xd9, 0xfe, Op::Fsin, I387, "Sine"),
    fixed(0xd9, 0xff, Op::Fcos, I387, "Cosine"),
    // DA
    fixed(0xda, 0xe9, Op::Fucompp, I387, "Unordered compare and pop twice"),
    // DB
    fixed(0xdb, 0xe0, Op::Feni, I87, "Enable interrupts"),
    fixed(0xdb, 0xe1, Op::Fdisi, I87, "Disable interrupts"),
    fixed(0xdb, 0xe2, Op::Fclex, I87, "Clear exceptions"),
    fixed(0xdb, 0xe3, Op::Finit, I87, "Initialize coprocessor"),
    fixed(0xdb, 0xe4, Op::Fsetpm, I287, "Set protected mode"),
    // DC: st(i) = st(i) op st(0); the SUB/DIV pairs are swapped relative to D8.
    sti(0xdc, 0xc0, Op::Fadd, I87, "Add real", Form::StiSt0),
    sti(0xdc, 0xc8, Op::Fmul, I87, "Multiply real", Form::StiSt0),
    sti(0xdc, 0xe0, Op::Fsubr, I87, "Reverse subtract real", Form::StiSt0),
    sti(0xdc, 0xe8, Op::Fsub, I87, "Subtract real", Form::StiSt0),
    sti(0xdc, 0xf0, Op::Fdivr, I87, "Reverse divide real", Form::StiSt0),
    sti(0xdc, 0xf8, Op::Fdiv, I87, "Divide real", Form::StiSt0),
    // DD
    sti(0xdd, 0xc0, Op::Ffree, I87, "Free register", Form::Sti),
    sti(0xdd, 0xd0, Op::Fst, I87, "Store to st(i)", Form::Sti),
    sti(0xdd, 0xd8, Op::Fstp, I87, "Store to st(i) and pop", Form::Sti),
    sti(0xdd, 0xe0, Op::Fucom, I387, "Unordered compare", Form::Sti),
    sti(0xdd, 0xe8, Op::Fucomp, I387, "Unordered compare and pop", Form::Sti),
    // DE
    sti(0xde, 0xc0, Op::Faddp, I87, "Add real and pop", Form::StiSt0),
    sti(0xde, 0xc8, Op::Fmulp, I87, "Multiply real and pop", Form::StiSt0),
    fixed(0xde, 0xd9, Op::Fcompp, I87, "Compare real and pop twice"),
    sti(0xde, 0xe0, Op::Fsubrp, I87, "Reverse subtract real and pop", Form::StiSt0),
    sti(0xde, 0xe8, Op::Fsubp, I87, "Subtract real and pop", Form::StiSt0),
    sti(0xde, 0xf0, Op::Fdivrp, I87, "Reverse divide real and pop", Form::StiSt0),
    sti(0xde, 0xf8, Op::Fdivp, I87, "Divide real and pop", Form::StiSt0),
    // DF
    FpuRegEntry {
        escape: 0xdf,
        pattern: 0xe0,
        mask: 0xff,
        leaf: fpu(Op::Fstsw, I287, "Store status word in AX", Form::Ax),
    },
];

/// Register-form (`mod = 3`) entries for all eight escapes.
#[must_use]
pub fn fpu_register_entries() -> &'static [FpuRegEntry] {
    FPU_REG
}
