//! Strongly typed identifier wrappers.
//!
//! Marker IDs are positive integers assigned by the simulation and unique
//! within a run.  Wall-tile IDs are 1-based indices into the wall geometry;
//! tile 0 means "no tile was hit".
//!
//! Both IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// The raw integer value.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(n: $inner) -> $name {
                $name(n)
            }
        }
    };
}

typed_id! {
    /// Simulation marker identifier.
    pub struct MarkerId(u64);
}

typed_id! {
    /// Wall-tile identifier (1-based; `TileId::NONE` marks "no hit").
    pub struct TileId(u32);
}

impl TileId {
    /// Sentinel stored in `walltile` for markers that never touched the wall.
    pub const NONE: TileId = TileId(0);

    /// Zero-based index into a dense per-tile array, or `None` for
    /// [`TileId::NONE`].
    #[inline]
    pub fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}
