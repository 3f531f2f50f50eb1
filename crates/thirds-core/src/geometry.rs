#![forbid(unsafe_code)]

//! Layout metrics: turning an allocation level into a dimension.
//!
//! Closed panels are never zero-sized. They keep a fixed handle of
//! [`CLOSED_SIZE_PX`] so they stay clickable, and open panels share what is
//! left (`100% - closed_count * CLOSED_SIZE_PX`) in proportion to their units.
//!
//! # Invariants
//!
//! 1. A closed panel's metric is always `Pixels(closed_size)`.
//! 2. Open metrics of one config resolve to lengths that, together with the
//!    closed handles, never exceed the available length.
//! 3. Formatting is deterministic: fractions are printed with at most three
//!    decimals and no trailing zeros.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::level::{AllocationLevel, BUDGET};

/// Default pixel size of a collapsed panel handle.
pub const CLOSED_SIZE_PX: u16 = 40;

/// The axis a panel set is laid out on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Panels sit side by side and share the width.
    #[default]
    Horizontal,
    /// Panels are stacked and share the height.
    Vertical,
}

impl Axis {
    /// CSS property the axis sizes.
    #[must_use]
    pub const fn css_property(self) -> &'static str {
        match self {
            Self::Horizontal => "width",
            Self::Vertical => "height",
        }
    }

    /// Utility-class prefix for the axis (`w` or `h`).
    #[must_use]
    pub const fn class_prefix(self) -> &'static str {
        match self {
            Self::Horizontal => "w",
            Self::Vertical => "h",
        }
    }
}

/// The value half of a [`Metric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValue {
    /// Fixed handle size of a closed panel.
    Pixels(u16),
    /// Proportional share of what the closed handles leave behind.
    Share {
        /// Units held by the panel (1..=3).
        units: u8,
        /// Total pixels taken by closed handles in the same set.
        closed_px: u32,
    },
}

impl MetricValue {
    /// Resolve to a concrete length inside a container of `available` pixels.
    ///
    /// Shares round down; callers that need an exact partition hand the
    /// remainder to one panel.
    #[must_use]
    pub fn resolve(self, available: u32) -> u32 {
        match self {
            Self::Pixels(px) => u32::from(px).min(available),
            Self::Share { units, closed_px } => {
                let remaining = u64::from(available.saturating_sub(closed_px));
                (remaining * u64::from(units) / u64::from(BUDGET)) as u32
            }
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Pixels(px) => write!(f, "{px}px"),
            Self::Share { units, closed_px } => {
                let pct = f64::from(units) * 100.0 / f64::from(BUDGET);
                if closed_px == 0 {
                    write!(f, "{}%", trim_decimal(pct))
                } else {
                    let px = f64::from(closed_px) * f64::from(units) / f64::from(BUDGET);
                    write!(f, "calc({}% - {}px)", trim_decimal(pct), trim_decimal(px))
                }
            }
        }
    }
}

/// A dimension for one panel: which property to set and to what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metric {
    pub property: &'static str,
    pub value: MetricValue,
}

impl Metric {
    /// Compute the metric for a panel at `level`.
    ///
    /// `closed_count` is the number of closed panels in the same set,
    /// including this one when it is closed.
    #[must_use]
    pub fn for_level(
        level: AllocationLevel,
        axis: Axis,
        closed_size_px: u16,
        closed_count: usize,
    ) -> Self {
        let value = if level.is_closed() {
            MetricValue::Pixels(closed_size_px)
        } else {
            let closed_px = u32::from(closed_size_px).saturating_mul(closed_count as u32);
            MetricValue::Share {
                units: level.units(),
                closed_px,
            }
        };
        Self {
            property: axis.css_property(),
            value,
        }
    }

    /// Shorthand for [`MetricValue::resolve`].
    #[must_use]
    pub fn resolve(&self, available: u32) -> u32 {
        self.value.resolve(available)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)
    }
}

/// Utility class names for a panel at `level` on `axis`.
///
/// Closed panels get a fixed `10` (40px) handle that never shrinks.
#[must_use]
pub fn class_for(level: AllocationLevel, axis: Axis) -> String {
    let prefix = axis.class_prefix();
    match level {
        AllocationLevel::Closed => format!("{prefix}-10 shrink-0"),
        AllocationLevel::Third => format!("{prefix}-1/3"),
        AllocationLevel::TwoThirds => format!("{prefix}-2/3"),
        AllocationLevel::Full => format!("{prefix}-full"),
    }
}

fn trim_decimal(value: f64) -> String {
    let s = format!("{value:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_owned()
}
