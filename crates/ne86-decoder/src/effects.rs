//! Condition-flag effects attached to each table leaf.

use ne86_types::Flags;

/// What an operation does to each flag.
///
/// Well-formed table entries keep the four sets pairwise disjoint.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagEffects {
    pub cleared: Flags,
    pub set: Flags,
    pub modified: Flags,
    pub undefined: Flags,
}

impl FlagEffects {
    pub const NONE: FlagEffects = FlagEffects::new(
        Flags::empty(),
        Flags::empty(),
        Flags::empty(),
        Flags::empty(),
    );

    #[must_use]
    pub const fn new(cleared: Flags, set: Flags, modified: Flags, undefined: Flags) -> Self {
        Self {
            cleared,
            set,
            modified,
            undefined,
        }
    }

    /// Every flag the operation touches in any way.
    #[must_use]
    pub const fn affected(&self) -> Flags {
        self.cleared
            .union(self.set)
            .union(self.modified)
            .union(self.undefined)
    }

    #[must_use]
    pub const fn is_disjoint(&self) -> bool {
        let sets = [self.cleared, self.set, self.modified, self.undefined];
        let mut i = 0;
        while i < sets.len() {
            let mut j = i + 1;
            while j < sets.len() {
                if sets[i].intersects(sets[j]) {
                    return false;
                }
                j += 1;
            }
            i += 1;
        }
        true
    }

    #[must_use]
    pub const fn is_none(&self) -> bool {
        self.affected().is_empty()
    }
}

const fn f(flags: &[Flags]) -> Flags {
    let mut out = Flags::empty();
    let mut i = 0;
    while i < flags.len() {
        out = out.union(flags[i]);
        i += 1;
    }
    out
}

const NO: Flags = Flags::empty();

/// ADD ADC SUB SBB CMP NEG CMPS SCAS
pub const ARITH: FlagEffects = FlagEffects::new(NO, NO, Flags::STATUS, NO);
/// AND OR XOR TEST
pub const LOGIC: FlagEffects = FlagEffects::new(
    f(&[Flags::CF, Flags::OF]),
    NO,
    f(&[Flags::SF, Flags::ZF, Flags::PF]),
    Flags::AF,
);
/// INC DEC (CF is preserved)
pub const INC_DEC: FlagEffects = FlagEffects::new(
    NO,
    NO,
    f(&[Flags::OF, Flags::SF, Flags::ZF, Flags::AF, Flags::PF]),
    NO,
);
/// SHL SHR SAR SHLD SHRD
pub const SHIFT: FlagEffects = FlagEffects::new(
    NO,
    NO,
    f(&[Flags::CF, Flags::OF, Flags::SF, Flags::ZF, Flags::PF]),
    Flags::AF,
);
/// ROL ROR RCL RCR
pub const ROTATE: FlagEffects = FlagEffects::new(NO, NO, f(&[Flags::CF, Flags::OF]), NO);
/// MUL IMUL
pub const MUL: FlagEffects = FlagEffects::new(
    NO,
    NO,
    f(&[Flags::CF, Flags::OF]),
    f(&[Flags::SF, Flags::ZF, Flags::AF, Flags::PF]),
);
/// DIV IDIV
pub const DIV: FlagEffects = FlagEffects::new(NO, NO, NO, Flags::STATUS);
/// DAA DAS
pub const DECIMAL_ADJUST: FlagEffects = FlagEffects::new(
    NO,
    NO,
    f(&[Flags::CF, Flags::AF, Flags::SF, Flags::ZF, Flags::PF]),
    Flags::OF,
);
/// AAA AAS
pub const ASCII_ADJUST: FlagEffects = FlagEffects::new(
    NO,
    NO,
    f(&[Flags::AF, Flags::CF]),
    f(&[Flags::OF, Flags::SF, Flags::ZF, Flags::PF]),
);
/// AAM AAD
pub const ASCII_MUL_DIV: FlagEffects = FlagEffects::new(
    NO,
    NO,
    f(&[Flags::SF, Flags::ZF, Flags::PF]),
    f(&[Flags::OF, Flags::AF, Flags::CF]),
);
pub const CLEAR_CF: FlagEffects = FlagEffects::new(Flags::CF, NO, NO, NO);
pub const SET_CF: FlagEffects = FlagEffects::new(NO, Flags::CF, NO, NO);
pub const TOGGLE_CF: FlagEffects = FlagEffects::new(NO, NO, Flags::CF, NO);
pub const CLEAR_DF: FlagEffects = FlagEffects::new(Flags::DF, NO, NO, NO);
pub const SET_DF: FlagEffects = FlagEffects::new(NO, Flags::DF, NO, NO);
pub const CLEAR_IF: FlagEffects = FlagEffects::new(Flags::IF, NO, NO, NO);
pub const SET_IF: FlagEffects = FlagEffects::new(NO, Flags::IF, NO, NO);
/// SAHF loads the low status byte.
pub const LOAD_AH: FlagEffects = FlagEffects::new(
    NO,
    NO,
    f(&[Flags::SF, Flags::ZF, Flags::AF, Flags::PF, Flags::CF]),
    NO,
);
/// POPF IRET
pub const ALL: FlagEffects = FlagEffects::new(NO, NO, Flags::all(), NO);
/// INT INT3 INTO
pub const INTERRUPT: FlagEffects = FlagEffects::new(f(&[Flags::IF, Flags::TF]), NO, NO, NO);
/// BT BTS BTR BTC
pub const BIT_TEST: FlagEffects = FlagEffects::new(
    NO,
    NO,
    Flags::CF,
    f(&[Flags::OF, Flags::SF, Flags::AF, Flags::PF]),
);
/// BSF BSR
pub const BIT_SCAN: FlagEffects = FlagEffects::new(
    NO,
    NO,
    Flags::ZF,
    f(&[Flags::CF, Flags::OF, Flags::SF, Flags::AF, Flags::PF]),
);
/// ARPL LAR LSL VERR VERW
pub const ZF_ONLY: FlagEffects = FlagEffects::new(NO, NO, Flags::ZF, NO);
/// MOV to or from a control, debug or test register
pub const STATUS_UNDEFINED: FlagEffects = FlagEffects::new(NO, NO, NO, Flags::STATUS);
