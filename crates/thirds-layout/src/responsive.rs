#![forbid(unsafe_code)]

//! Advisory responsive policy: viewport classes and per-class hints.
//!
//! [`Responsive<T>`] maps [`Viewport`] tiers to values of any type, with
//! inheritance from smaller tiers. If no value is set for a given viewport,
//! the value from the next smaller viewport is used.
//!
//! [`ResponsivePolicy`] combines width thresholds with a [`Responsive`] table
//! of [`ViewportHints`]. It never calls into an engine; consumers read it to
//! decide which operations to offer (for example, hiding the close
//! affordance on phones).
//!
//! # Usage
//!
//! ```
//! use thirds_layout::responsive::{Responsive, ResponsivePolicy, Viewport};
//!
//! let gap = Responsive::new(8).at(Viewport::Desktop, 16);
//! assert_eq!(gap.resolve(Viewport::Tablet), &8);
//! assert_eq!(gap.resolve(Viewport::Desktop), &16);
//!
//! let policy = ResponsivePolicy::default();
//! assert_eq!(policy.classify(375), Viewport::Mobile);
//! assert!(!policy.offers_close(Viewport::Mobile));
//! ```
//!
//! # Invariants
//!
//! 1. `Mobile` always has a value (set via `new()`).
//! 2. A missing tier inherits from the nearest smaller tier with a value.
//! 3. `resolve()` never fails.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Viewport class, ordered from narrowest to widest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Viewport {
    Mobile,
    Tablet,
    Desktop,
}

impl Viewport {
    pub const ALL: [Self; 3] = [Self::Mobile, Self::Tablet, Self::Desktop];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Tablet => "tablet",
            Self::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Minimum widths (in pixels) at which each larger viewport starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    pub tablet: u32,
    pub desktop: u32,
}

impl Breakpoints {
    pub const DEFAULT: Self = Self {
        tablet: 768,
        desktop: 1024,
    };

    #[must_use]
    pub const fn classify(self, width_px: u32) -> Viewport {
        if width_px >= self.desktop {
            Viewport::Desktop
        } else if width_px >= self.tablet {
            Viewport::Tablet
        } else {
            Viewport::Mobile
        }
    }

    #[must_use]
    pub fn is_ordered(self) -> bool {
        self.tablet < self.desktop
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Responsive<T>
// ---------------------------------------------------------------------------

/// A viewport-aware value with inheritance from smaller tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Responsive<T> {
    /// Values indexed by `Viewport` ordinal. Slot 0 is always `Some`.
    values: [Option<T>; 3],
}

impl<T: Clone> Responsive<T> {
    /// Create a responsive value with a base value for `Mobile`.
    #[must_use]
    pub fn new(base: T) -> Self {
        Self {
            values: [Some(base), None, None],
        }
    }

    /// Set the value for a specific viewport (builder pattern).
    #[must_use]
    pub fn at(mut self, viewport: Viewport, value: T) -> Self {
        self.values[viewport as usize] = Some(value);
        self
    }

    pub fn set(&mut self, viewport: Viewport, value: T) {
        self.values[viewport as usize] = Some(value);
    }

    /// Clear an override, reverting to inheritance. Clearing `Mobile` is a no-op.
    pub fn clear(&mut self, viewport: Viewport) {
        if viewport != Viewport::Mobile {
            self.values[viewport as usize] = None;
        }
    }

    /// Walk down from `viewport` to `Mobile` until an explicit value is found.
    #[must_use]
    pub fn resolve(&self, viewport: Viewport) -> &T {
        let mut slots = self.values[..=viewport as usize].iter().rev();
        slots
            .find_map(Option::as_ref)
            .unwrap_or_else(|| unreachable!("Mobile always has a value"))
    }

    #[must_use]
    pub fn has_explicit(&self, viewport: Viewport) -> bool {
        self.values[viewport as usize].is_some()
    }
}

// ---------------------------------------------------------------------------
// Hints
// ---------------------------------------------------------------------------

/// Per-viewport layout hints.
///
/// Fields missing from a deserialized table take their [`ViewportHints::MOBILE`]
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportHints {
    /// Smallest height a stacked panel should be given.
    pub min_panel_height_px: u32,
    /// Closed handles waste too much space; prefer maximize over close.
    pub avoid_closed: bool,
    /// Duration of proportion transitions.
    pub animation_ms: u32,
}

impl ViewportHints {
    pub const MOBILE: Self = Self {
        min_panel_height_px: 200,
        avoid_closed: true,
        animation_ms: 200,
    };
    pub const TABLET: Self = Self {
        min_panel_height_px: 250,
        avoid_closed: false,
        animation_ms: 250,
    };
    pub const DESKTOP: Self = Self {
        min_panel_height_px: 300,
        avoid_closed: false,
        animation_ms: 300,
    };
}

impl Default for ViewportHints {
    fn default() -> Self {
        Self::MOBILE
    }
}

/// Thresholds plus hints.
#[derive(Debug, Clone)]
pub struct ResponsivePolicy {
    breakpoints: Breakpoints,
    hints: Responsive<ViewportHints>,
}

impl ResponsivePolicy {
    #[must_use]
    pub fn new(breakpoints: Breakpoints, hints: Responsive<ViewportHints>) -> Self {
        Self { breakpoints, hints }
    }

    /// Same hints with different thresholds.
    #[must_use]
    pub fn with_breakpoints(mut self, breakpoints: Breakpoints) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    #[must_use]
    pub fn breakpoints(&self) -> Breakpoints {
        self.breakpoints
    }

    #[must_use]
    pub fn classify(&self, width_px: u32) -> Viewport {
        self.breakpoints.classify(width_px)
    }

    #[must_use]
    pub fn hints_for(&self, viewport: Viewport) -> ViewportHints {
        *self.hints.resolve(viewport)
    }

    /// Classify `width_px` and return its hints.
    #[must_use]
    pub fn hints(&self, width_px: u32) -> (Viewport, ViewportHints) {
        let viewport = self.classify(width_px);
        (viewport, self.hints_for(viewport))
    }

    /// Whether consumers should show a close affordance on `viewport`.
    #[must_use]
    pub fn offers_close(&self, viewport: Viewport) -> bool {
        !self.hints_for(viewport).avoid_closed
    }
}

impl Default for ResponsivePolicy {
    fn default() -> Self {
        Self::new(
            Breakpoints::DEFAULT,
            Responsive::new(ViewportHints::MOBILE)
                .at(Viewport::Tablet, ViewportHints::TABLET)
                .at(Viewport::Desktop, ViewportHints::DESKTOP),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_value_at_all_viewports() {
        let r = Responsive::new(42);
        for viewport in Viewport::ALL {
            assert_eq!(r.resolve(viewport), &42);
        }
    }

    #[test]
    fn override_inherits_upward() {
        let r = Responsive::new(1).at(Viewport::Tablet, 2);
        assert_eq!(r.resolve(Viewport::Mobile), &1);
        assert_eq!(r.resolve(Viewport::Tablet), &2);
        assert_eq!(r.resolve(Viewport::Desktop), &2);
        assert!(!r.has_explicit(Viewport::Desktop));
    }

    #[test]
    fn clear_reverts_and_mobile_is_sticky() {
        let mut r = Responsive::new(1).at(Viewport::Desktop, 3);
        r.clear(Viewport::Desktop);
        assert_eq!(r.resolve(Viewport::Desktop), &1);
        r.clear(Viewport::Mobile);
        assert_eq!(r.resolve(Viewport::Mobile), &1);
        r.set(Viewport::Tablet, 9);
        assert_eq!(r.resolve(Viewport::Desktop), &9);
    }

    #[test]
    fn classify_boundaries() {
        let bp = Breakpoints::DEFAULT;
        assert_eq!(bp.classify(0), Viewport::Mobile);
        assert_eq!(bp.classify(767), Viewport::Mobile);
        assert_eq!(bp.classify(768), Viewport::Tablet);
        assert_eq!(bp.classify(1023), Viewport::Tablet);
        assert_eq!(bp.classify(1024), Viewport::Desktop);
        assert!(bp.is_ordered());
    }

    #[test]
    fn default_hints_per_viewport() {
        let policy = ResponsivePolicy::default();
        let (viewport, hints) = policy.hints(1440);
        assert_eq!(viewport, Viewport::Desktop);
        assert_eq!(hints.min_panel_height_px, 300);
        assert!(policy.offers_close(Viewport::Desktop));

        let (viewport, hints) = policy.hints(400);
        assert_eq!(viewport, Viewport::Mobile);
        assert!(hints.avoid_closed);
        assert!(!policy.offers_close(viewport));
    }

    #[test]
    fn viewport_display() {
        assert_eq!(Viewport::Tablet.to_string(), "tablet");
    }

    #[test]
    fn serde_forms() {
        assert_eq!(serde_json::to_string(&Viewport::Desktop).unwrap(), "\"desktop\"");
        let viewport: Viewport = serde_json::from_str("\"tablet\"").unwrap();
        assert_eq!(viewport, Viewport::Tablet);

        let bp: Breakpoints = serde_json::from_str(r#"{"desktop": 1280}"#).unwrap();
        assert_eq!(
            bp,
            Breakpoints {
                tablet: 768,
                desktop: 1280
            }
        );

        let hints: ViewportHints = serde_json::from_str(r#"{"animation_ms": 0}"#).unwrap();
        assert_eq!(
            hints,
            ViewportHints {
                animation_ms: 0,
                ..ViewportHints::MOBILE
            }
        );
        let json = serde_json::to_string(&ViewportHints::DESKTOP).unwrap();
        assert_eq!(serde_json::from_str::<ViewportHints>(&json).unwrap(), ViewportHints::DESKTOP);
    }

    #[test]
    fn with_breakpoints_keeps_hints() {
        let policy = ResponsivePolicy::default().with_breakpoints(Breakpoints {
            tablet: 600,
            desktop: 900,
        });
        assert_eq!(policy.hints(650), (Viewport::Tablet, ViewportHints::TABLET));
        assert_eq!(policy.hints(900).0, Viewport::Desktop);
    }
}
