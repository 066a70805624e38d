use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lower edge (inclusive) of the `Hot` band, in degrees.
pub const HOT_THRESHOLD: f64 = 30.0;

/// Lower edge (inclusive) of the `Warm` band, in degrees.
pub const WARM_THRESHOLD: f64 = 20.0;

/// A temperature band.
///
/// Variant order is the display order, so the derived `Ord` sorts
/// `Hot < Warm < Cool` and a `BTreeMap<Band, _>` iterates in display order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Band {
    Hot,
    Warm,
    Cool,
}

impl Band {
    /// All bands in display order.
    pub const ALL: [Band; 3] = [Band::Hot, Band::Warm, Band::Cool];

    /// Display color for this band.
    pub fn color(self) -> &'static str {
        match self {
            Band::Hot => "#FF5722",
            Band::Warm => "#FFC107",
            Band::Cool => "#2196F3",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Band::Hot => "Hot",
            Band::Warm => "Warm",
            Band::Cool => "Cool",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a band.
#[derive(Error, Debug, PartialEq, Clone)]
#[error("unknown band '{0}' (expected hot, warm or cool)")]
pub struct UnknownBand(pub String);

impl FromStr for Band {
    type Err = UnknownBand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hot" => Ok(Band::Hot),
            "warm" => Ok(Band::Warm),
            "cool" => Ok(Band::Cool),
            _ => Err(UnknownBand(s.to_string())),
        }
    }
}

/// Classify a temperature into its band.
///
/// 30 and 20 are cut points belonging to the hotter band. Total over all
/// floats; NaN compares false against both edges and lands in `Cool`.
pub fn classify(temp: f64) -> Band {
    if temp >= HOT_THRESHOLD {
        Band::Hot
    } else if temp >= WARM_THRESHOLD {
        Band::Warm
    } else {
        Band::Cool
    }
}
