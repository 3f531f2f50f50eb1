#![forbid(unsafe_code)]

//! thirds public facade crate.
//!
//! Re-exports the common types of the internal crates and a prelude for
//! day-to-day use.
//!
//! ```
//! use std::rc::Rc;
//! use thirds::prelude::*;
//!
//! fn run() -> thirds::Result<()> {
//!     let store = ProportionStore::new(Rc::new(MemoryStore::new()));
//!     let mut drawers = store.bind("drawers", instances::drawers())?;
//!     drawers.swap_focus(DrawerPanel::Messages)?;
//!     assert_eq!(drawers.class_for(DrawerPanel::Messages), "w-2/3");
//!     Ok(())
//! }
//! run().unwrap();
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use thirds_core::{
    AllocationLevel, Axis, BUDGET, CLOSED_SIZE_PX, Clock, ManualClock, Metric, MetricValue,
    ParseLevelError, SystemClock, class_for,
};

// --- Layout re-exports -----------------------------------------------------

pub use thirds_layout::{
    Breakpoints, ConfigError, CreationPanel, DrawerPanel, EngineBuilder, EscalatePolicy,
    GroupPanel, PanelSet, PartialConfig, ProportionConfig, ProportionEngine, ProportionStats,
    Responsive, ResponsivePolicy, SplitPolicy, TransitionError, TransitionPolicy, VerticalPanel,
    Viewport, ViewportHints, instances, panel_set, transitions,
};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use thirds_runtime::{
    DisabledStore, FileStore, KeyValueStore, LoggingError, MemoryStore, PersistedProportions,
    PersistenceError, ProportionStore, Settings, SettingsError, StoreError,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for thirds apps.
#[derive(Debug)]
pub enum Error {
    /// A transition or engine build was refused.
    Transition(TransitionError),
    /// Reading or writing persisted proportions failed.
    #[cfg(feature = "runtime")]
    Persistence(PersistenceError),
    /// Opening a storage backend failed.
    #[cfg(feature = "runtime")]
    Store(StoreError),
    /// Settings could not be loaded.
    #[cfg(feature = "runtime")]
    Settings(SettingsError),
    /// The logging subscriber could not be installed.
    #[cfg(feature = "runtime")]
    Logging(LoggingError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transition(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Persistence(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Store(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Settings(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Logging(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transition(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Persistence(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Store(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Settings(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Logging(err) => Some(err),
        }
    }
}

impl From<TransitionError> for Error {
    fn from(err: TransitionError) -> Self {
        Self::Transition(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Transition(err.into())
    }
}

#[cfg(feature = "runtime")]
impl From<PersistenceError> for Error {
    fn from(err: PersistenceError) -> Self {
        Self::Persistence(err)
    }
}

#[cfg(feature = "runtime")]
impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

#[cfg(feature = "runtime")]
impl From<SettingsError> for Error {
    fn from(err: SettingsError) -> Self {
        Self::Settings(err)
    }
}

#[cfg(feature = "runtime")]
impl From<LoggingError> for Error {
    fn from(err: LoggingError) -> Self {
        Self::Logging(err)
    }
}

/// Standard result type for thirds APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Startup ----------------------------------------------------------------

/// Install logging and open the proportion store described by `settings`.
///
/// Engines bound through the returned store use the configured
/// `engine.closed_size_px`.
#[cfg(feature = "runtime")]
pub fn start(settings: &Settings) -> Result<ProportionStore> {
    let errors = settings.validate();
    if !errors.is_empty() {
        return Err(SettingsError::Validation(errors).into());
    }
    thirds_runtime::logging::init(&settings.logging)?;
    Ok(settings.open_store()?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AllocationLevel, Axis, CreationPanel, DrawerPanel, Error, GroupPanel, PanelSet,
        ProportionConfig, ProportionEngine, Result, TransitionError, VerticalPanel, Viewport,
        instances,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{MemoryStore, ProportionStore, Settings};

    pub use crate::{core, layout};

    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use thirds_core as core;
pub use thirds_layout as layout;
#[cfg(feature = "runtime")]
pub use thirds_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn transition_errors_convert() {
        let err: Error = TransitionError::LastOpenPanel { key: "posts" }.into();
        assert!(err.to_string().contains("posts"));
        assert!(err.source().is_some());
    }

    #[test]
    fn config_errors_wrap_as_transition_errors() {
        let err: Error = ConfigError::NoOpenPanel.into();
        assert!(matches!(
            err,
            Error::Transition(TransitionError::InvalidConfig(ConfigError::NoOpenPanel))
        ));
    }

    #[cfg(feature = "runtime")]
    #[test]
    fn start_rejects_invalid_settings() {
        let mut settings = Settings::default();
        settings.persistence.retention_days = 0;
        assert!(matches!(
            start(&settings),
            Err(Error::Settings(SettingsError::Validation(_)))
        ));
    }
}
