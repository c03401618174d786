//! Operation kinds.

use core::fmt;

macro_rules! ops {
    ($($name:ident => $mnemonic:literal,)*) => {
        /// Operation kind of a decoded instruction.
        ///
        /// Size variants (`movsb`/`movsw`/`movsd`, `cbw`/`cwde`, ...) share one kind; the
        /// instruction's operand size selects the spelling.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Op {
            $($name,)*
        }

        impl Op {
            pub const ALL: &'static [Op] = &[$(Op::$name,)*];

            /// Lower-case base mnemonic.
            #[must_use]
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(Op::$name => $mnemonic,)*
                }
            }
        }
    };
}

ops! {
    Invalid => "(bad)",
    // Integer unit.
    Aaa => "aaa",
    Aad => "aad",
    Aam => "aam",
    Aas => "aas",
    Adc => "adc",
    Add => "add",
    And => "and",
    Arpl => "arpl",
    Bound => "bound",
    Bsf => "bsf",
    Bsr => "bsr",
    Bt => "bt",
    Btc => "btc",
    Btr => "btr",
    Bts => "bts",
    Call => "call",
    Callf => "callf",
    Cbw => "cbw",
    Clc => "clc",
    Cld => "cld",
    Cli => "cli",
    Clts => "clts",
    Cmc => "cmc",
    Cmp => "cmp",
    Cmps => "cmps",
    Cwd => "cwd",
    Daa => "daa",
    Das => "das",
    Dec => "dec",
    Div => "div",
    Enter => "enter",
    Hlt => "hlt",
    Idiv => "idiv",
    Imul => "imul",
    In => "in",
    Inc => "inc",
    Ins => "ins",
    Int => "int",
    Int3 => "int3",
    Into => "into",
    Iret => "iret",
    Jcc => "j",
    Jcxz => "jcxz",
    Jmp => "jmp",
    Jmpf => "jmpf",
    Lahf => "lahf",
    Lar => "lar",
    Lds => "lds",
    Lea => "lea",
    Leave => "leave",
    Les => "les",
    Lfs => "lfs",
    Lgdt => "lgdt",
    Lgs => "lgs",
    Lidt => "lidt",
    Lldt => "lldt",
    Lmsw => "lmsw",
    Lods => "lods",
    Loop => "loop",
    Loope => "loope",
    Loopne => "loopne",
    Lsl => "lsl",
    Lss => "lss",
    Ltr => "ltr",
    Mov => "mov",
    Movs => "movs",
    Movsx => "movsx",
    Movzx => "movzx",
    Mul => "mul",
    Neg => "neg",
    Nop => "nop",
    Not => "not",
    Or => "or",
    Out => "out",
    Outs => "outs",
    Pop => "pop",
    Popa => "popa",
    Popf => "popf",
    Push => "push",
    Pusha => "pusha",
    Pushf => "pushf",
    Rcl => "rcl",
    Rcr => "rcr",
    Ret => "ret",
    Retf => "retf",
    Rol => "rol",
    Ror => "ror",
    Sahf => "sahf",
    Sar => "sar",
    Sbb => "sbb",
    Scas => "scas",
    Setcc => "set",
    Sgdt => "sgdt",
    Shl => "shl",
    Shld => "shld",
    Shr => "shr",
    Shrd => "shrd",
    Sidt => "sidt",
    Sldt => "sldt",
    Smsw => "smsw",
    Stc => "stc",
    Std => "std",
    Sti => "sti",
    Stos => "stos",
    Str => "str",
    Sub => "sub",
    Test => "test",
    Verr => "verr",
    Verw => "verw",
    Wait => "wait",
    Xchg => "xchg",
    Xlat => "xlat",
    Xor => "xor",
    // Floating-point unit. Keep `F2xm1` first: `is_fpu` relies on the ordering.
    F2xm1 => "f2xm1",
    Fabs => "fabs",
    Fadd => "fadd",
    Faddp => "faddp",
    Fbld => "fbld",
    Fbstp => "fbstp",
    Fchs => "fchs",
    Fclex => "fnclex",
    Fcom => "fcom",
    Fcomp => "fcomp",
    Fcompp => "fcompp",
    Fcos => "fcos",
    Fdecstp => "fdecstp",
    Fdisi => "fndisi",
    Fdiv => "fdiv",
    Fdivp => "fdivp",
    Fdivr => "fdivr",
    Fdivrp => "fdivrp",
    Feni => "fneni",
    Ffree => "ffree",
    Fiadd => "fiadd",
    Ficom => "ficom",
    Ficomp => "ficomp",
    Fidiv => "fidiv",
    Fidivr => "fidivr",
    Fild => "fild",
    Fimul => "fimul",
    Fincstp => "fincstp",
    Finit => "fninit",
    Fist => "fist",
    Fistp => "fistp",
    Fisub => "fisub",
    Fisubr => "fisubr",
    Fld => "fld",
    Fld1 => "fld1",
    Fldcw => "fldcw",
    Fldenv => "fldenv",
    Fldl2e => "fldl2e",
    Fldl2t => "fldl2t",
    Fldlg2 => "fldlg2",
    Fldln2 => "fldln2",
    Fldpi => "fldpi",
    Fldz => "fldz",
    Fmul => "fmul",
    Fmulp => "fmulp",
    Fnop => "fnop",
    Fpatan => "fpatan",
    Fprem => "fprem",
    Fprem1 => "fprem1",
    Fptan => "fptan",
    Frndint => "frndint",
    Frstor => "frstor",
    Fsave => "fnsave",
    Fscale => "fscale",
    Fsetpm => "fsetpm",
    Fsin => "fsin",
    Fsincos => "fsincos",
    Fsqrt => "fsqrt",
    Fst => "fst",
    Fstcw => "fnstcw",
    Fstenv => "fnstenv",
    Fstp => "fstp",
    Fstsw => "fnstsw",
    Fsub => "fsub",
    Fsubp => "fsubp",
    Fsubr => "fsubr",
    Fsubrp => "fsubrp",
    Ftst => "ftst",
    Fucom => "fucom",
    Fucomp => "fucomp",
    Fucompp => "fucompp",
    Fxam => "fxam",
    Fxch => "fxch",
    Fxtract => "fxtract",
    Fyl2x => "fyl2x",
    Fyl2xp1 => "fyl2xp1",
}

impl Op {
    #[must_use]
    pub fn is_fpu(self) -> bool {
        self >= Op::F2xm1
    }

    /// String instructions: the only kinds that accept REPE.
    #[must_use]
    pub const fn is_string(self) -> bool {
        matches!(
            self,
            Op::Cmps | Op::Lods | Op::Movs | Op::Scas | Op::Stos | Op::Ins | Op::Outs
        )
    }

    /// The string instructions that also accept REPNE.
    #[must_use]
    pub const fn accepts_repne(self) -> bool {
        matches!(self, Op::Cmps | Op::Scas)
    }

    /// Read-modify-write kinds that accept LOCK with a memory destination.
    #[must_use]
    pub const fn is_lockable(self) -> bool {
        matches!(
            self,
            Op::Add
                | Op::Adc
                | Op::And
                | Op::Btc
                | Op::Btr
                | Op::Bts
                | Op::Dec
                | Op::Inc
                | Op::Neg
                | Op::Not
                | Op::Or
                | Op::Sbb
                | Op::Sub
                | Op::Xchg
                | Op::Xor
        )
    }

    /// Control transfers whose target is encoded in the instruction or its operand.
    #[must_use]
    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            Op::Jmp
                | Op::Jmpf
                | Op::Jcc
                | Op::Jcxz
                | Op::Loop
                | Op::Loope
                | Op::Loopne
                | Op::Call
                | Op::Callf
        )
    }

    /// Unconditional transfers after which execution does not fall through.
    #[must_use]
    pub const fn ends_flow(self) -> bool {
        matches!(
            self,
            Op::Jmp | Op::Jmpf | Op::Ret | Op::Retf | Op::Iret | Op::Hlt | Op::Invalid
        )
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
