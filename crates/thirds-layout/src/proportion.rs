#![forbid(unsafe_code)]

//! Proportion configs: one allocation level per panel of a set.
//!
//! A [`ProportionConfig`] is total by construction: it always holds exactly
//! one level for every panel of `P`. It is *not* valid by construction. The
//! budget invariant is checked by [`ProportionConfig::validate`], which the
//! engine calls on every write.
//!
//! # Invariants (checked by `validate`)
//!
//! 1. Budget: the units of all panels sum to [`BUDGET`].
//! 2. Liveness: at least one panel is open.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use thirds_core::{AllocationLevel, BUDGET};

use crate::panel::PanelSet;

/// Levels for a subset of panels, as restored from storage.
pub type PartialConfig<P> = BTreeMap<P, AllocationLevel>;

/// A level for every panel of `P`, stored in key order.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProportionConfig<P: PanelSet> {
    levels: Vec<AllocationLevel>,
    _panels: PhantomData<P>,
}

impl<P: PanelSet> ProportionConfig<P> {
    /// Build a config by asking `f` for each panel's level.
    #[must_use]
    pub fn from_fn(mut f: impl FnMut(P) -> AllocationLevel) -> Self {
        Self {
            levels: P::ALL.iter().map(|&panel| f(panel)).collect(),
            _panels: PhantomData,
        }
    }

    /// Every panel at the same level.
    #[must_use]
    pub fn uniform(level: AllocationLevel) -> Self {
        Self::from_fn(|_| level)
    }

    /// Build a config from `(panel, level)` pairs.
    ///
    /// Every panel must be named; later pairs override earlier ones.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (P, AllocationLevel)>,
    ) -> Result<Self, ConfigError> {
        let mut slots: Vec<Option<AllocationLevel>> = vec![None; P::count()];
        for (panel, level) in pairs {
            slots[panel.index()] = Some(level);
        }
        let mut levels = Vec::with_capacity(slots.len());
        for (panel, slot) in P::ALL.iter().zip(slots) {
            match slot {
                Some(level) => levels.push(level),
                None => return Err(ConfigError::MissingPanel { key: panel.key() }),
            }
        }
        Ok(Self {
            levels,
            _panels: PhantomData,
        })
    }

    /// Overlay `partial` on top of `base`.
    #[must_use]
    pub fn merged(base: &Self, partial: &PartialConfig<P>) -> Self {
        let mut merged = base.clone();
        for (&panel, &level) in partial {
            merged.set(panel, level);
        }
        merged
    }

    #[must_use]
    pub fn level(&self, panel: P) -> AllocationLevel {
        self.levels[panel.index()]
    }

    pub fn set(&mut self, panel: P, level: AllocationLevel) {
        self.levels[panel.index()] = level;
    }

    /// Builder-style [`ProportionConfig::set`].
    #[must_use]
    pub fn with(mut self, panel: P, level: AllocationLevel) -> Self {
        self.set(panel, level);
        self
    }

    /// `(panel, level)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (P, AllocationLevel)> + '_ {
        P::ALL.iter().copied().zip(self.levels.iter().copied())
    }

    /// Sum of units across all panels.
    #[must_use]
    pub fn total_units(&self) -> u32 {
        self.levels.iter().map(|level| u32::from(level.units())).sum()
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.levels.iter().filter(|level| level.is_open()).count()
    }

    #[must_use]
    pub fn closed_count(&self) -> usize {
        self.levels.len() - self.open_count()
    }

    /// Open panels in key order.
    #[must_use]
    pub fn open_panels(&self) -> Vec<P> {
        self.iter()
            .filter(|(_, level)| level.is_open())
            .map(|(panel, _)| panel)
            .collect()
    }

    /// First panel holding the most units.
    #[must_use]
    pub fn largest(&self) -> Option<P> {
        let mut best: Option<(P, AllocationLevel)> = None;
        for (panel, level) in self.iter() {
            if best.is_none_or(|(_, held)| level > held) {
                best = Some((panel, level));
            }
        }
        best.map(|(panel, _)| panel)
    }

    /// Check the budget and liveness invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let total = self.total_units();
        if total != u32::from(BUDGET) {
            return Err(ConfigError::BudgetMismatch { total });
        }
        if !self.levels.is_empty() && self.open_count() == 0 {
            return Err(ConfigError::NoOpenPanel);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Levels keyed by storage key, as written to persisted records.
    #[must_use]
    pub fn to_key_map(&self) -> BTreeMap<String, AllocationLevel> {
        self.iter()
            .map(|(panel, level)| (panel.key().to_owned(), level))
            .collect()
    }

    /// Pick the entries of `map` whose keys belong to `P`.
    ///
    /// Keys from other panel sets, or from an older schema, are ignored.
    #[must_use]
    pub fn partial_from_key_map(map: &BTreeMap<String, AllocationLevel>) -> PartialConfig<P> {
        map.iter()
            .filter_map(|(key, &level)| P::from_key(key).map(|panel| (panel, level)))
            .collect()
    }
}

impl<P: PanelSet> fmt::Debug for ProportionConfig<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(panel, level)| (panel.key(), level.fraction())))
            .finish()
    }
}

impl<P: PanelSet> fmt::Display for ProportionConfig<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (panel, level) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{panel}={level}")?;
            first = false;
        }
        Ok(())
    }
}

/// Reasons a config is malformed or violates the allocation invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Units do not add up to the budget.
    BudgetMismatch { total: u32 },
    /// Every panel is closed.
    NoOpenPanel,
    /// A panel of the set was not given a level.
    MissingPanel { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BudgetMismatch { total } => {
                write!(f, "allocation uses {total} units (expected {BUDGET})")
            }
            Self::NoOpenPanel => write!(f, "at least one panel must stay open"),
            Self::MissingPanel { key } => write!(f, "no level given for panel {key:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{DrawerPanel, VerticalPanel};
    use AllocationLevel::{Closed, Full, Third, TwoThirds};

    #[test]
    fn uniform_thirds_is_valid() {
        let config = ProportionConfig::<DrawerPanel>::uniform(Third);
        assert_eq!(config.total_units(), 3);
        assert!(config.is_valid());
        assert_eq!(config.open_count(), 3);
    }

    #[test]
    fn budget_mismatch_is_reported() {
        let config = ProportionConfig::<DrawerPanel>::uniform(TwoThirds);
        assert_eq!(
            config.validate(),
            Err(ConfigError::BudgetMismatch { total: 6 })
        );
        let closed = ProportionConfig::<DrawerPanel>::uniform(Closed);
        assert_eq!(
            closed.validate(),
            Err(ConfigError::BudgetMismatch { total: 0 })
        );
    }

    #[test]
    fn from_pairs_requires_every_panel() {
        let err = ProportionConfig::from_pairs([
            (DrawerPanel::Posts, Full),
            (DrawerPanel::Messages, Closed),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingPanel { key: "events" });

        let ok = ProportionConfig::from_pairs([
            (VerticalPanel::Communication, TwoThirds),
            (VerticalPanel::Presentation, Third),
        ])
        .unwrap();
        assert_eq!(ok.level(VerticalPanel::Presentation), Third);
    }

    #[test]
    fn largest_prefers_first_on_ties() {
        let config = ProportionConfig::<DrawerPanel>::uniform(Third);
        assert_eq!(config.largest(), Some(DrawerPanel::Posts));

        let config = config
            .with(DrawerPanel::Posts, Closed)
            .with(DrawerPanel::Events, TwoThirds);
        assert_eq!(config.largest(), Some(DrawerPanel::Events));
    }

    #[test]
    fn key_map_filters_foreign_keys() {
        let mut map = BTreeMap::new();
        map.insert("posts".to_owned(), Full);
        map.insert("sidebar".to_owned(), Third);
        let partial = ProportionConfig::<DrawerPanel>::partial_from_key_map(&map);
        assert_eq!(partial.len(), 1);
        assert_eq!(partial.get(&DrawerPanel::Posts), Some(&Full));
    }

    #[test]
    fn merged_overlays_partial() {
        let base = ProportionConfig::<DrawerPanel>::uniform(Third);
        let partial = PartialConfig::from([(DrawerPanel::Events, Closed)]);
        let merged = ProportionConfig::merged(&base, &partial);
        assert_eq!(merged.level(DrawerPanel::Events), Closed);
        assert_eq!(merged.level(DrawerPanel::Posts), Third);
        assert!(!merged.is_valid());
    }

    #[test]
    fn display_and_debug_use_keys() {
        let config = ProportionConfig::<VerticalPanel>::from_fn(|panel| match panel {
            VerticalPanel::Presentation => Third,
            VerticalPanel::Communication => TwoThirds,
        });
        assert_eq!(config.to_string(), "presentation=1/3 communication=2/3");
        assert_eq!(
            format!("{config:?}"),
            r#"{"presentation": "1/3", "communication": "2/3"}"#
        );
    }
}
