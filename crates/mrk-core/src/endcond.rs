//! End-condition codes.
//!
//! The simulation tags every final state with a bit-flag code recording why
//! the marker stopped.  A marker can in principle trip several conditions in
//! the same step, in which case several bits are set.  Code 0 means the
//! marker never reached a regular end condition, i.e. it was aborted.

use std::fmt;
use std::ops::BitOr;

/// Bit-flag end-condition code.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EndCond(pub u32);

impl EndCond {
    /// Aborted: no end condition was reached.
    pub const NONE:   EndCond = EndCond(0);
    /// Simulation time limit.
    pub const TLIM:   EndCond = EndCond(0x1);
    /// Minimum energy.
    pub const EMIN:   EndCond = EndCond(0x2);
    /// Thermalized.
    pub const THERM:  EndCond = EndCond(0x4);
    /// Hit the wall.
    pub const WALL:   EndCond = EndCond(0x8);
    /// Below minimum normalized radius.
    pub const RHOMIN: EndCond = EndCond(0x10);
    /// Exceeded maximum normalized radius.
    pub const RHOMAX: EndCond = EndCond(0x20);
    /// Poloidal turn limit.
    pub const POLMAX: EndCond = EndCond(0x40);
    /// Toroidal turn limit.
    pub const TORMAX: EndCond = EndCond(0x80);
    /// Wall-clock (CPU) time limit.
    pub const CPUMAX: EndCond = EndCond(0x100);

    /// Every single-flag condition with its canonical name, in bit order.
    pub const FLAGS: [(EndCond, &'static str); 9] = [
        (EndCond::TLIM,   "tlim"),
        (EndCond::EMIN,   "emin"),
        (EndCond::THERM,  "therm"),
        (EndCond::WALL,   "wall"),
        (EndCond::RHOMIN, "rhomin"),
        (EndCond::RHOMAX, "rhomax"),
        (EndCond::POLMAX, "polmax"),
        (EndCond::TORMAX, "tormax"),
        (EndCond::CPUMAX, "cpumax"),
    ];

    /// Union of every known flag bit.
    pub const KNOWN_BITS: u32 = 0x1ff;

    /// `true` for the aborted code.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// `true` if any bit of `flags` is set in `self`.
    #[inline]
    pub fn intersects(self, flags: EndCond) -> bool {
        self.0 & flags.0 != 0
    }

    /// `true` if the code only uses known flag bits.
    #[inline]
    pub fn is_known(self) -> bool {
        self.0 & !Self::KNOWN_BITS == 0
    }

    /// Parse a single-flag name (`"wall"`, `"rhomax"`, ...).  `"none"` and
    /// `"aborted"` both map to [`EndCond::NONE`].
    pub fn from_name(name: &str) -> Option<EndCond> {
        match name.trim() {
            "none" | "aborted" => Some(EndCond::NONE),
            n => Self::FLAGS
                .iter()
                .find(|(_, flag_name)| *flag_name == n)
                .map(|(flag, _)| *flag),
        }
    }

    /// Iterate over the single flags set in this code, lowest bit first.
    pub fn flags(self) -> impl Iterator<Item = (EndCond, &'static str)> {
        Self::FLAGS
            .into_iter()
            .filter(move |(flag, _)| self.intersects(*flag))
    }
}

impl BitOr for EndCond {
    type Output = EndCond;
    #[inline]
    fn bitor(self, rhs: EndCond) -> EndCond {
        EndCond(self.0 | rhs.0)
    }
}

impl fmt::Display for EndCond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}
