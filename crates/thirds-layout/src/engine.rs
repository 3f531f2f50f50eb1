#![forbid(unsafe_code)]

//! The proportion engine: owned state plus a single validated write path.
//!
//! [`ProportionEngine`] holds the current [`ProportionConfig`] for one UI
//! surface. Every operation computes a candidate with a pure function from
//! [`crate::transitions`] and hands it to [`ProportionEngine::set_config`],
//! which validates, bumps the version, and notifies observers.
//!
//! # Invariants
//!
//! 1. `config()` always satisfies the budget and liveness invariants.
//! 2. `version()` increments by exactly 1 on each config-changing write.
//! 3. A write that produces the current config is an identity: no version
//!    bump and no notification.
//! 4. A refused operation returns `Err` and leaves the state untouched.
//! 5. Observers run in registration order, after the new config is stored.
//!
//! # Failure Modes
//!
//! Refusals are logged at debug level under the `thirds.engine` target and
//! returned as [`TransitionError`]; nothing panics.

use std::collections::BTreeMap;
use std::fmt;

use thirds_core::{AllocationLevel, Axis, BUDGET, CLOSED_SIZE_PX, Metric, class_for};

use crate::panel::PanelSet;
use crate::policy::{SplitPolicy, TransitionPolicy};
use crate::proportion::ProportionConfig;
use crate::transitions::{self, TransitionError};

/// Callback run after every config change.
pub type ChangeObserver<P> = Box<dyn FnMut(&ProportionConfig<P>)>;

/// Read-only summary of the current config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProportionStats<P: PanelSet> {
    pub open_count: usize,
    /// The config equals the policy's balanced config.
    pub is_balanced: bool,
    /// Some panel holds the whole budget.
    pub has_maximized: bool,
    pub is_valid: bool,
    /// First panel holding the most units.
    pub largest: Option<P>,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Construction options for a [`ProportionEngine`].
pub struct EngineBuilder<P: PanelSet, T: TransitionPolicy<P> = SplitPolicy> {
    axis: Axis,
    policy: T,
    initial: Option<ProportionConfig<P>>,
    restored: Option<ProportionConfig<P>>,
    presets: Vec<(String, ProportionConfig<P>)>,
    closed_size_px: u16,
}

impl<P: PanelSet> EngineBuilder<P, SplitPolicy> {
    /// Builder with the even-split policy and no initial config.
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            policy: SplitPolicy,
            initial: None,
            restored: None,
            presets: Vec::new(),
            closed_size_px: CLOSED_SIZE_PX,
        }
    }
}

impl<P: PanelSet, T: TransitionPolicy<P>> EngineBuilder<P, T> {
    /// Replace the transition policy.
    #[must_use]
    pub fn policy<U: TransitionPolicy<P>>(self, policy: U) -> EngineBuilder<P, U> {
        EngineBuilder {
            axis: self.axis,
            policy,
            initial: self.initial,
            restored: self.restored,
            presets: self.presets,
            closed_size_px: self.closed_size_px,
        }
    }

    /// Default config; the policy's balanced config is used when unset.
    #[must_use]
    pub fn initial(mut self, config: ProportionConfig<P>) -> Self {
        self.initial = Some(config);
        self
    }

    /// Start from a previously saved config instead of the default.
    ///
    /// An invalid restored config is discarded at build time.
    #[must_use]
    pub fn restore(mut self, config: ProportionConfig<P>) -> Self {
        self.restored = Some(config);
        self
    }

    /// Register a named preset for [`ProportionEngine::apply_preset`].
    #[must_use]
    pub fn preset(mut self, name: impl Into<String>, config: ProportionConfig<P>) -> Self {
        self.presets.push((name.into(), config));
        self
    }

    /// Pixel size of a closed panel's handle.
    #[must_use]
    pub fn closed_size_px(mut self, px: u16) -> Self {
        self.closed_size_px = px;
        self
    }

    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The config the engine falls back to: `initial`, or the policy's balance.
    #[must_use]
    pub fn default_config(&self) -> ProportionConfig<P> {
        self.initial
            .clone()
            .unwrap_or_else(|| self.policy.balanced())
    }

    /// Validate the default and every preset, then build the engine.
    pub fn build(self) -> Result<ProportionEngine<P, T>, TransitionError> {
        let default = self.default_config();
        default.validate()?;

        let mut presets = BTreeMap::new();
        for (name, config) in self.presets {
            if let Err(reason) = config.validate() {
                return Err(TransitionError::InvalidPreset { name, reason });
            }
            presets.insert(name, config);
        }

        let config = match self.restored {
            Some(restored) if restored.is_valid() => restored,
            Some(restored) => {
                tracing::debug!(
                    target: "thirds.engine",
                    restored = %restored,
                    "restored config rejected, using default"
                );
                default.clone()
            }
            None => default.clone(),
        };

        Ok(ProportionEngine {
            config,
            default,
            axis: self.axis,
            closed_size_px: self.closed_size_px,
            policy: self.policy,
            presets,
            version: 0,
            observers: Vec::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owned proportion state for one panel set.
pub struct ProportionEngine<P: PanelSet, T: TransitionPolicy<P> = SplitPolicy> {
    config: ProportionConfig<P>,
    default: ProportionConfig<P>,
    axis: Axis,
    closed_size_px: u16,
    policy: T,
    presets: BTreeMap<String, ProportionConfig<P>>,
    version: u64,
    observers: Vec<ChangeObserver<P>>,
}

impl<P: PanelSet, T: TransitionPolicy<P>> fmt::Debug for ProportionEngine<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProportionEngine")
            .field("config", &self.config)
            .field("axis", &self.axis)
            .field("version", &self.version)
            .field("presets", &self.presets.keys().collect::<Vec<_>>())
            .field("observer_count", &self.observers.len())
            .finish()
    }
}

impl<P: PanelSet> ProportionEngine<P, SplitPolicy> {
    /// Shorthand for [`EngineBuilder::new`].
    #[must_use]
    pub fn builder(axis: Axis) -> EngineBuilder<P, SplitPolicy> {
        EngineBuilder::new(axis)
    }
}

impl<P: PanelSet, T: TransitionPolicy<P>> ProportionEngine<P, T> {
    // --- Reads ------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &ProportionConfig<P> {
        &self.config
    }

    #[must_use]
    pub fn default_config(&self) -> &ProportionConfig<P> {
        &self.default
    }

    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    #[must_use]
    pub fn policy(&self) -> &T {
        &self.policy
    }

    /// Number of config-changing writes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn level(&self, panel: P) -> AllocationLevel {
        self.config.level(panel)
    }

    #[must_use]
    pub fn is_closed(&self, panel: P) -> bool {
        self.config.level(panel).is_closed()
    }

    #[must_use]
    pub fn open_count(&self) -> usize {
        self.config.open_count()
    }

    #[must_use]
    pub fn open_panels(&self) -> Vec<P> {
        self.config.open_panels()
    }

    /// Whether `config` would be accepted by [`ProportionEngine::set_config`].
    #[must_use]
    pub fn validate(&self, config: &ProportionConfig<P>) -> bool {
        config.is_valid()
    }

    #[must_use]
    pub fn stats(&self) -> ProportionStats<P> {
        ProportionStats {
            open_count: self.config.open_count(),
            is_balanced: self.config == self.policy.balanced(),
            has_maximized: self
                .config
                .iter()
                .any(|(_, level)| level == AllocationLevel::Full),
            is_valid: self.config.is_valid(),
            largest: self.config.largest(),
        }
    }

    /// Registered preset names, sorted.
    pub fn preset_names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    // --- Metrics ----------------------------------------------------------

    /// Layout dimension for `panel` under the current config.
    #[must_use]
    pub fn style_for(&self, panel: P) -> Metric {
        Metric::for_level(
            self.config.level(panel),
            self.axis,
            self.closed_size_px,
            self.config.closed_count(),
        )
    }

    /// Utility class names for `panel` under the current config.
    #[must_use]
    pub fn class_for(&self, panel: P) -> String {
        class_for(self.config.level(panel), self.axis)
    }

    /// Partition `available` pixels among the panels, in key order.
    ///
    /// Lengths always sum to `available`. Closed handles get
    /// `closed_size_px` but never more than half of `available` between
    /// them; open panels share the rest by units, and rounding slack goes
    /// to the largest panel.
    #[must_use]
    pub fn split(&self, available: u32) -> Vec<(P, u32)> {
        let closed_count = u32::try_from(self.config.closed_count()).unwrap_or(u32::MAX);
        let handle = match closed_count {
            0 => 0,
            n => u32::from(self.closed_size_px).min(available / 2 / n),
        };
        let open_space = u64::from(available - handle * closed_count);

        let mut lengths: Vec<(P, u32)> = self
            .config
            .iter()
            .map(|(panel, level)| {
                if level.is_closed() {
                    return (panel, handle);
                }
                let share = open_space * u64::from(level.units()) / u64::from(BUDGET);
                (panel, u32::try_from(share).unwrap_or(available))
            })
            .collect();

        let used: u32 = lengths.iter().map(|&(_, len)| len).sum();
        if let Some(largest) = self.config.largest() {
            lengths[largest.index()].1 += available.saturating_sub(used);
        }
        lengths
    }

    // --- Writes -----------------------------------------------------------

    /// Register a callback run after every config change.
    pub fn on_change(&mut self, observer: impl FnMut(&ProportionConfig<P>) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// The single write path: validate, store, notify.
    pub fn set_config(
        &mut self,
        config: ProportionConfig<P>,
    ) -> Result<&ProportionConfig<P>, TransitionError> {
        self.commit("set_config", config)
    }

    /// Open `panel` if closed, close it if open.
    pub fn toggle(&mut self, panel: P) -> Result<&ProportionConfig<P>, TransitionError> {
        let next = transitions::toggle(&self.config, panel, &self.policy.balanced());
        self.apply("toggle", next)
    }

    /// Give `panel` the whole budget.
    pub fn maximize(&mut self, panel: P) -> Result<&ProportionConfig<P>, TransitionError> {
        self.commit("maximize", transitions::maximize(panel))
    }

    /// Return to the policy's balanced config.
    pub fn balance(&mut self) -> Result<&ProportionConfig<P>, TransitionError> {
        self.commit("balance", self.policy.balanced())
    }

    /// Move the larger share to `panel`.
    pub fn swap_focus(&mut self, panel: P) -> Result<&ProportionConfig<P>, TransitionError> {
        let next = transitions::swap_focus(&self.config, panel);
        self.apply("swap_focus", next)
    }

    /// Step `panel` up one level (two-panel sets only). From `Full` the
    /// cycle returns to the construction-time default.
    pub fn escalate(&mut self, panel: P) -> Result<&ProportionConfig<P>, TransitionError> {
        let next = transitions::escalate(&self.config, panel, &self.default);
        self.apply("escalate", next)
    }

    /// The policy's primary click action for `panel`.
    pub fn activate(&mut self, panel: P) -> Result<&ProportionConfig<P>, TransitionError> {
        let next = self.policy.activate(&self.config, panel, &self.default);
        self.apply("activate", next)
    }

    /// Apply a preset registered at build time.
    pub fn apply_preset(&mut self, name: &str) -> Result<&ProportionConfig<P>, TransitionError> {
        match self.presets.get(name) {
            Some(config) => {
                let config = config.clone();
                self.commit("apply_preset", config)
            }
            None => {
                let err = TransitionError::UnknownPreset {
                    name: name.to_owned(),
                };
                self.apply("apply_preset", Err(err))
            }
        }
    }

    /// Return to the construction-time default.
    pub fn reset(&mut self) -> Result<&ProportionConfig<P>, TransitionError> {
        self.commit("reset", self.default.clone())
    }

    fn apply(
        &mut self,
        op: &'static str,
        next: Result<ProportionConfig<P>, TransitionError>,
    ) -> Result<&ProportionConfig<P>, TransitionError> {
        match next {
            Ok(config) => self.commit(op, config),
            Err(err) => {
                tracing::debug!(
                    target: "thirds.engine",
                    op,
                    config = %self.config,
                    error = %err,
                    "transition refused"
                );
                Err(err)
            }
        }
    }

    fn commit(
        &mut self,
        op: &'static str,
        config: ProportionConfig<P>,
    ) -> Result<&ProportionConfig<P>, TransitionError> {
        if let Err(reason) = config.validate() {
            tracing::debug!(
                target: "thirds.engine",
                op,
                rejected = %config,
                error = %reason,
                "config rejected"
            );
            return Err(TransitionError::InvalidConfig(reason));
        }
        if config == self.config {
            return Ok(&self.config);
        }

        self.config = config;
        self.version += 1;
        tracing::debug!(
            target: "thirds.engine",
            op,
            config = %self.config,
            version = self.version,
            "config changed"
        );
        for observer in &mut self.observers {
            observer(&self.config);
        }
        Ok(&self.config)
    }
}
