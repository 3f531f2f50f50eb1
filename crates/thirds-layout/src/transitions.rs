#![forbid(unsafe_code)]

//! Pure transition functions over [`ProportionConfig`].
//!
//! Every function takes the current config by reference and returns the next
//! one. None of them mutate anything, log anything, or look at storage; the
//! engine funnels their output through its single validated write path.
//!
//! # Policies
//!
//! The open/close policy depends on how many panels are open *before* the
//! action:
//!
//! | Action           | open = 1                   | open = 2                 | open = 3                          |
//! |------------------|----------------------------|--------------------------|-----------------------------------|
//! | open closed `k`  | open → 2/3, `k` → 1/3      | all involved → 1/3       | refused (budget exhausted)        |
//! | close open `k`   | refused (last open panel)  | other → 3/3              | remaining → 2/3, 1/3 in key order |
//! | swap focus `k`   | identity                   | `k` → 2/3, other → 1/3   | `k` → 2/3, first other → 1/3, last → closed |
//!
//! With three panels, "all involved → 1/3" is exactly the balanced split.

use std::fmt;

use thirds_core::{AllocationLevel, BUDGET};

use crate::panel::PanelSet;
use crate::proportion::{ConfigError, ProportionConfig};

use AllocationLevel::{Closed, Full, Third, TwoThirds};

/// Why a transition was refused. The engine keeps its prior state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Closing the only open panel would leave nothing visible.
    LastOpenPanel { key: &'static str },
    /// Opening another panel would need more units than the budget holds.
    BudgetExhausted { key: &'static str },
    /// Focus cannot move to a closed panel without opening it.
    PanelClosed { key: &'static str },
    /// The operation is only defined for a specific number of panels.
    UnsupportedArity { expected: usize, found: usize },
    /// No preset is registered under this name.
    UnknownPreset { name: String },
    /// A preset failed validation when it was registered.
    InvalidPreset { name: String, reason: ConfigError },
    /// The produced or supplied config violates the allocation invariants.
    InvalidConfig(ConfigError),
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastOpenPanel { key } => {
                write!(f, "cannot close {key:?}: it is the last open panel")
            }
            Self::BudgetExhausted { key } => {
                write!(f, "cannot open {key:?}: no units left to allocate")
            }
            Self::PanelClosed { key } => {
                write!(f, "cannot focus {key:?}: the panel is closed")
            }
            Self::UnsupportedArity { expected, found } => write!(
                f,
                "operation needs exactly {expected} panels (this set has {found})"
            ),
            Self::UnknownPreset { name } => write!(f, "no preset named {name:?}"),
            Self::InvalidPreset { name, reason } => {
                write!(f, "preset {name:?} is invalid: {reason}")
            }
            Self::InvalidConfig(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for TransitionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPreset { reason, .. } | Self::InvalidConfig(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<ConfigError> for TransitionError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

/// Check the budget and liveness invariants.
pub fn validate<P: PanelSet>(config: &ProportionConfig<P>) -> Result<(), TransitionError> {
    config.validate().map_err(TransitionError::from)
}

/// Distribute the budget round-robin in key order.
///
/// Three panels get a third each; two panels get `[2/3, 1/3]`; a single
/// panel gets everything; panels past the third stay closed.
#[must_use]
pub fn even_split<P: PanelSet>() -> ProportionConfig<P> {
    let count = P::count();
    let mut units = vec![0u8; count];
    if count > 0 {
        for i in 0..usize::from(BUDGET) {
            units[i % count] += 1;
        }
    }
    ProportionConfig::from_fn(|panel: P| AllocationLevel::from_units(units[panel.index()]))
}

/// `panel` takes the whole budget; every other panel closes.
#[must_use]
pub fn maximize<P: PanelSet>(panel: P) -> ProportionConfig<P> {
    ProportionConfig::from_fn(|p| if p == panel { Full } else { Closed })
}

/// Open `panel` if it is closed, close it otherwise.
///
/// `balanced` is used as a fallback when nothing is open, which a valid
/// config never allows.
pub fn toggle<P: PanelSet>(
    config: &ProportionConfig<P>,
    panel: P,
    balanced: &ProportionConfig<P>,
) -> Result<ProportionConfig<P>, TransitionError> {
    let open = config.open_panels();

    if config.level(panel).is_closed() {
        return match open.as_slice() {
            [] => Ok(balanced.clone()),
            [single] => Ok(config
                .clone()
                .with(*single, TwoThirds)
                .with(panel, Third)),
            [first, second] => Ok(ProportionConfig::uniform(Closed)
                .with(*first, Third)
                .with(*second, Third)
                .with(panel, Third)),
            _ => Err(TransitionError::BudgetExhausted { key: panel.key() }),
        };
    }

    let remaining: Vec<P> = open.into_iter().filter(|&p| p != panel).collect();
    match remaining.as_slice() {
        [] => Err(TransitionError::LastOpenPanel { key: panel.key() }),
        [other] => Ok(config.clone().with(panel, Closed).with(*other, Full)),
        [first, second, rest @ ..] => {
            let mut next = config
                .clone()
                .with(panel, Closed)
                .with(*first, TwoThirds)
                .with(*second, Third);
            for &p in rest {
                next.set(p, Closed);
            }
            Ok(next)
        }
    }
}

/// Give `panel` the larger share without opening or closing anything new.
///
/// On a three-way split the last other panel closes, so the result is a
/// two-way split favouring `panel`.
pub fn swap_focus<P: PanelSet>(
    config: &ProportionConfig<P>,
    panel: P,
) -> Result<ProportionConfig<P>, TransitionError> {
    let open = config.open_panels();
    if open.len() <= 1 {
        return Ok(config.clone());
    }
    if config.level(panel).is_closed() {
        return Err(TransitionError::PanelClosed { key: panel.key() });
    }

    let others: Vec<P> = open.into_iter().filter(|&p| p != panel).collect();
    let mut next = config.clone().with(panel, TwoThirds);
    for (i, &other) in others.iter().enumerate() {
        next.set(other, if i == 0 { Third } else { Closed });
    }
    Ok(next)
}

/// Step `panel` up one level in a two-panel set; the other panel gets the
/// complement. From `Full` the cycle returns to `resting`.
///
/// `Closed → Third → TwoThirds → Full → resting`
pub fn escalate<P: PanelSet>(
    config: &ProportionConfig<P>,
    panel: P,
    resting: &ProportionConfig<P>,
) -> Result<ProportionConfig<P>, TransitionError> {
    let found = P::count();
    if found != 2 {
        return Err(TransitionError::UnsupportedArity { expected: 2, found });
    }

    let next_level = match config.level(panel) {
        Closed => Third,
        Third => TwoThirds,
        TwoThirds => Full,
        Full => return Ok(resting.clone()),
    };
    Ok(ProportionConfig::from_fn(|p| {
        if p == panel {
            next_level
        } else {
            next_level.complement()
        }
    }))
}
