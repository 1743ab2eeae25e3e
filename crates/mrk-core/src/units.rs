//! Magnitude-prefixed display units.

use std::fmt;

/// A value rescaled by a power-of-thousand prefix, e.g. `3.2 MJ/m^2`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaledValue {
    pub value: f64,
    pub unit:  String,
}

const PREFIXES: [(f64, &str); 3] = [(1e9, "G"), (1e6, "M"), (1e3, "K")];

impl ScaledValue {
    /// Rescale `value` to the largest of {1, K, M, G} that keeps the
    /// magnitude at or above one.  `unit` is the base unit (`"J"`) and
    /// `per` an optional denominator (`"m^2"`).
    pub fn by_magnitude(value: f64, unit: &str, per: Option<&str>) -> Self {
        let (scaled, prefix) = PREFIXES
            .iter()
            .find(|(factor, _)| value.abs() >= *factor)
            .map(|(factor, prefix)| (value / factor, *prefix))
            .unwrap_or((value, ""));
        let unit = match per {
            Some(per) => format!("{prefix}{unit}/{per}"),
            None      => format!("{prefix}{unit}"),
        };
        Self { value: scaled, unit }
    }
}

impl fmt::Display for ScaledValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit)
    }
}
