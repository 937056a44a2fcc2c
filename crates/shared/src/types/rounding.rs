//! Rounding modes supported by the rounding engine.

use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// Tie-break policy applied when a value is reduced to a currency scale.
///
/// The non-tie modes (`Up`, `Down`, `Ceiling`, `Floor`) look only at whether
/// anything is discarded. The `Half*` modes round to the nearest value and
/// only differ in how an exact half is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingMode {
    /// Away from zero: `1.21 -> 1.3`, `-1.21 -> -1.3`.
    Up,
    /// Towards zero: `1.29 -> 1.2`, `-1.29 -> -1.2`.
    Down,
    /// Towards positive infinity.
    Ceiling,
    /// Towards negative infinity.
    Floor,
    /// Nearest, ties away from zero.
    HalfUp,
    /// Nearest, ties towards zero.
    HalfDown,
    /// Nearest, ties to the even neighbour (Banker's Rounding).
    #[default]
    HalfEven,
    /// Nearest, ties towards positive infinity.
    HalfCeiling,
    /// Nearest, ties towards negative infinity.
    HalfFloor,
}

impl RoundingMode {
    /// Every supported mode, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Up,
        Self::Down,
        Self::Ceiling,
        Self::Floor,
        Self::HalfUp,
        Self::HalfDown,
        Self::HalfEven,
        Self::HalfCeiling,
        Self::HalfFloor,
    ];

    /// Returns true for the modes that round to nearest and break ties.
    #[must_use]
    pub const fn is_tie_breaking(self) -> bool {
        matches!(
            self,
            Self::HalfUp | Self::HalfDown | Self::HalfEven | Self::HalfCeiling | Self::HalfFloor
        )
    }

    /// Returns the equivalent `rust_decimal` strategy, if one exists.
    ///
    /// `rust_decimal` has no half-towards-infinity strategies, so
    /// `HalfCeiling` and `HalfFloor` map to `None`.
    #[must_use]
    pub const fn to_strategy(self) -> Option<RoundingStrategy> {
        match self {
            Self::Up => Some(RoundingStrategy::AwayFromZero),
            Self::Down => Some(RoundingStrategy::ToZero),
            Self::Ceiling => Some(RoundingStrategy::ToPositiveInfinity),
            Self::Floor => Some(RoundingStrategy::ToNegativeInfinity),
            Self::HalfUp => Some(RoundingStrategy::MidpointAwayFromZero),
            Self::HalfDown => Some(RoundingStrategy::MidpointTowardZero),
            Self::HalfEven => Some(RoundingStrategy::MidpointNearestEven),
            Self::HalfCeiling | Self::HalfFloor => None,
        }
    }

    /// Returns the canonical upper-case name, e.g. `HALF_EVEN`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Ceiling => "CEILING",
            Self::Floor => "FLOOR",
            Self::HalfUp => "HALF_UP",
            Self::HalfDown => "HALF_DOWN",
            Self::HalfEven => "HALF_EVEN",
            Self::HalfCeiling => "HALF_CEILING",
            Self::HalfFloor => "HALF_FLOOR",
        }
    }
}

impl std::fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RoundingMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| CalcError::InvalidRoundingMode(s.to_string()))
    }
}
