#![forbid(unsafe_code)]

//! Quantized allocation levels.
//!
//! A panel never holds an arbitrary share of its container. It holds one of
//! four levels, each worth a whole number of units out of a fixed
//! [`BUDGET`] of three:
//!
//! | Level       | Units | Wire form |
//! |-------------|-------|-----------|
//! | `Closed`    | 0     | `"0"`     |
//! | `Third`     | 1     | `"1/3"`   |
//! | `TwoThirds` | 2     | `"2/3"`   |
//! | `Full`      | 3     | `"3/3"`   |
//!
//! The wire form is what the persistence layer writes, so it must stay
//! stable across releases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Total number of units shared by every panel of a set.
pub const BUDGET: u8 = 3;

/// One of the four quantized proportions a panel may hold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum AllocationLevel {
    /// Collapsed to a handle; holds no units.
    #[default]
    #[serde(rename = "0")]
    Closed,
    #[serde(rename = "1/3")]
    Third,
    #[serde(rename = "2/3")]
    TwoThirds,
    #[serde(rename = "3/3")]
    Full,
}

impl AllocationLevel {
    /// All levels in ascending unit order.
    pub const ALL: [Self; 4] = [Self::Closed, Self::Third, Self::TwoThirds, Self::Full];

    /// Number of budget units this level occupies.
    #[must_use]
    pub const fn units(self) -> u8 {
        match self {
            Self::Closed => 0,
            Self::Third => 1,
            Self::TwoThirds => 2,
            Self::Full => 3,
        }
    }

    /// Map a unit count back to a level.
    ///
    /// Total: anything above [`BUDGET`] falls back to `Closed`.
    #[must_use]
    pub const fn from_units(units: u8) -> Self {
        match Self::checked_from_units(units) {
            Some(level) => level,
            None => Self::Closed,
        }
    }

    /// Map a unit count back to a level, rejecting out-of-range input.
    #[must_use]
    pub const fn checked_from_units(units: u8) -> Option<Self> {
        match units {
            0 => Some(Self::Closed),
            1 => Some(Self::Third),
            2 => Some(Self::TwoThirds),
            3 => Some(Self::Full),
            _ => None,
        }
    }

    /// The level holding the units left over after `self` in a two-panel split.
    #[must_use]
    pub const fn complement(self) -> Self {
        Self::from_units(BUDGET - self.units())
    }

    /// Wire form used in persisted records (`"0"`, `"1/3"`, `"2/3"`, `"3/3"`).
    #[must_use]
    pub const fn fraction(self) -> &'static str {
        match self {
            Self::Closed => "0",
            Self::Third => "1/3",
            Self::TwoThirds => "2/3",
            Self::Full => "3/3",
        }
    }

    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        !self.is_closed()
    }
}

impl fmt::Display for AllocationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fraction())
    }
}

/// Error returned when a string is not one of the four wire forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    pub input: String,
}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid allocation level {:?} (expected \"0\", \"1/3\", \"2/3\" or \"3/3\")",
            self.input
        )
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for AllocationLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.fraction() == s.trim())
            .ok_or_else(|| ParseLevelError {
                input: s.to_owned(),
            })
    }
}
