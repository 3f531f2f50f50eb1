#![forbid(unsafe_code)]

//! Transition policies: what "balance" and "activate" mean for a panel set.
//!
//! Horizontal three-panel layouts use [`SplitPolicy`]: balance is an even
//! split and activating a panel toggles it. Vertical two-panel layouts use
//! [`EscalatePolicy`]: balance returns to a resting split and activating a
//! panel steps it up one level.

use crate::panel::PanelSet;
use crate::proportion::{ConfigError, ProportionConfig};
use crate::transitions::{self, TransitionError};

/// Engine-specific meaning of `balance` and of the primary click action.
pub trait TransitionPolicy<P: PanelSet> {
    /// The config `balance()` produces. Must satisfy the budget invariant.
    fn balanced(&self) -> ProportionConfig<P>;

    /// Primary action for a click on `panel`.
    ///
    /// The last argument is the owning engine's construction-time config.
    fn activate(
        &self,
        config: &ProportionConfig<P>,
        panel: P,
        _default: &ProportionConfig<P>,
    ) -> Result<ProportionConfig<P>, TransitionError> {
        transitions::toggle(config, panel, &self.balanced())
    }
}

/// Even split; activation toggles.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitPolicy;

impl<P: PanelSet> TransitionPolicy<P> for SplitPolicy {
    fn balanced(&self) -> ProportionConfig<P> {
        transitions::even_split()
    }
}

/// Resting split for a two-panel set; activation escalates.
///
/// `balance()` goes to the resting split, while a completed escalation
/// cycle returns to the engine's default.
#[derive(Debug, Clone)]
pub struct EscalatePolicy<P: PanelSet> {
    resting: ProportionConfig<P>,
}

impl<P: PanelSet> EscalatePolicy<P> {
    /// Create a policy that balances to `resting`.
    pub fn new(resting: ProportionConfig<P>) -> Result<Self, ConfigError> {
        resting.validate()?;
        Ok(Self { resting })
    }

    /// Skip validation for resting configs known to be valid.
    ///
    /// `EngineBuilder::build` still rejects an engine whose default is invalid.
    pub(crate) fn from_valid(resting: ProportionConfig<P>) -> Self {
        debug_assert!(resting.is_valid());
        Self { resting }
    }

    #[must_use]
    pub fn resting(&self) -> &ProportionConfig<P> {
        &self.resting
    }
}

impl<P: PanelSet> TransitionPolicy<P> for EscalatePolicy<P> {
    fn balanced(&self) -> ProportionConfig<P> {
        self.resting.clone()
    }

    fn activate(
        &self,
        config: &ProportionConfig<P>,
        panel: P,
        default: &ProportionConfig<P>,
    ) -> Result<ProportionConfig<P>, TransitionError> {
        transitions::escalate(config, panel, default)
    }
}
