//! Transport mode enum.

use std::fmt;
use std::str::FromStr;

/// Travel mode of a plan leg.
///
/// `Car` legs are routed over the link network; `Walk`, `Bike`, and `Pt`
/// legs are teleported (beeline distance × detour factor at a fixed mode
/// speed) during preparation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Mode {
    Car,
    Pt,
    Walk,
    Bike,
}

impl Mode {
    /// All modes, in a stable order (useful for per-mode tables).
    pub const ALL: [Mode; 4] = [Mode::Car, Mode::Pt, Mode::Walk, Mode::Bike];

    /// The lowercase wire name used in CSV files and status output.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Car  => "car",
            Mode::Pt   => "pt",
            Mode::Walk => "walk",
            Mode::Bike => "bike",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = crate::PrepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "car"  => Ok(Mode::Car),
            "pt"   => Ok(Mode::Pt),
            "walk" => Ok(Mode::Walk),
            "bike" => Ok(Mode::Bike),
            other => Err(crate::PrepError::Parse(format!(
                "unknown mode {other:?}: expected car, pt, walk, or bike"
            ))),
        }
    }
}
