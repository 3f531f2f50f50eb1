#![forbid(unsafe_code)]

//! Runtime settings loaded from TOML or JSON.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```toml
//! [engine]
//! closed_size_px = 48
//!
//! [persistence]
//! directory = "/var/lib/app/layout"
//! retention_days = 14
//!
//! [responsive.breakpoints]
//! tablet = 800
//!
//! [logging]
//! filter = "thirds=debug"
//! json = true
//! ```
//!
//! Loading does not validate. Call [`Settings::validate`] and decide what
//! to do with the messages, or use [`Settings::load`] which rejects
//! invalid settings.

use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thirds_core::CLOSED_SIZE_PX;
use thirds_layout::{Breakpoints, Responsive, ResponsivePolicy, Viewport, ViewportHints};

use crate::persistence::{DEFAULT_STORAGE_KEY, ProportionStore};
use crate::store::{DisabledStore, FileStore, KeyValueStore, MemoryStore, StoreError};

const DAY_SECS: u64 = 24 * 60 * 60;

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineSettings,
    pub persistence: PersistenceSettings,
    pub responsive: ResponsiveSettings,
    pub logging: LoggingSettings,
}

/// Engine presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Size of a closed panel's handle.
    pub closed_size_px: u16,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            closed_size_px: CLOSED_SIZE_PX,
        }
    }
}

/// Where and how long proportions are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    /// `false` swaps in a store that refuses every write.
    pub enabled: bool,
    /// Directory for the file store. In-memory when unset.
    pub directory: Option<PathBuf>,
    pub storage_key: String,
    pub retention_days: u32,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: None,
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            retention_days: 7,
        }
    }
}

impl PersistenceSettings {
    #[must_use]
    pub fn retention(&self) -> Duration {
        Duration::from_secs(u64::from(self.retention_days) * DAY_SECS)
    }

    /// Open the configured backend.
    pub fn open_backend(&self) -> Result<Rc<dyn KeyValueStore>, StoreError> {
        if !self.enabled {
            return Ok(Rc::new(DisabledStore));
        }
        match &self.directory {
            Some(dir) => Ok(Rc::new(FileStore::open(dir)?)),
            None => Ok(Rc::new(MemoryStore::new())),
        }
    }

    /// Open the backend and wrap it with the configured key and retention.
    pub fn open(&self) -> Result<ProportionStore, StoreError> {
        Ok(ProportionStore::new(self.open_backend()?)
            .with_storage_key(self.storage_key.clone())
            .with_retention(self.retention()))
    }
}

/// Breakpoints and per-viewport hints.
///
/// With no tier given the built-in hints apply. Otherwise a missing
/// `tablet` or `desktop` entry inherits from the next smaller tier, and a
/// missing `mobile` entry is [`ViewportHints::MOBILE`]. Fields left out of
/// a tier table take their mobile defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsiveSettings {
    pub breakpoints: Breakpoints,
    pub mobile: Option<ViewportHints>,
    pub tablet: Option<ViewportHints>,
    pub desktop: Option<ViewportHints>,
}

impl ResponsiveSettings {
    #[must_use]
    pub fn to_policy(&self) -> ResponsivePolicy {
        if self.mobile.is_none() && self.tablet.is_none() && self.desktop.is_none() {
            return ResponsivePolicy::default().with_breakpoints(self.breakpoints);
        }
        let mut hints = Responsive::new(self.mobile.unwrap_or(ViewportHints::MOBILE));
        if let Some(tablet) = self.tablet {
            hints.set(Viewport::Tablet, tablet);
        }
        if let Some(desktop) = self.desktop {
            hints.set(Viewport::Desktop, desktop);
        }
        ResponsivePolicy::new(self.breakpoints, hints)
    }
}

/// Subscriber settings for [`crate::logging::init`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
    /// One JSON object per line instead of the human-readable format.
    pub json: bool,
    pub ansi: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
            json: false,
            ansi: true,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Errors from loading settings.
#[derive(Debug)]
pub enum SettingsError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl Settings {
    /// Open the configured store. Engines bound through it use
    /// `engine.closed_size_px` for closed handles.
    pub fn open_store(&self) -> Result<ProportionStore, StoreError> {
        Ok(self
            .persistence
            .open()?
            .with_closed_size_px(self.engine.closed_size_px))
    }

    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        toml::from_str(s).map_err(SettingsError::Toml)
    }

    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(s).map_err(SettingsError::Json)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(SettingsError::Io)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path).map_err(SettingsError::Io)?;
        Self::from_json_str(&contents)
    }

    /// Load by extension (`.json` is JSON, anything else TOML) and validate.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let settings = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path)?,
            _ => Self::from_toml_file(path)?,
        };
        let errors = settings.validate();
        if errors.is_empty() {
            Ok(settings)
        } else {
            Err(SettingsError::Validation(errors))
        }
    }

    /// Problems with the current values. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.engine.closed_size_px == 0 {
            errors.push("engine.closed_size_px must be > 0".to_owned());
        }

        if self.persistence.storage_key.trim().is_empty() {
            errors.push("persistence.storage_key must not be empty".to_owned());
        }
        if self.persistence.retention_days == 0 {
            errors.push("persistence.retention_days must be > 0".to_owned());
        }

        let bp = self.responsive.breakpoints;
        if bp.tablet == 0 {
            errors.push("responsive.breakpoints.tablet must be > 0".to_owned());
        }
        if !bp.is_ordered() {
            errors.push(format!(
                "responsive.breakpoints.tablet ({}) must be below desktop ({})",
                bp.tablet, bp.desktop
            ));
        }

        if self.logging.filter.trim().is_empty() {
            errors.push("logging.filter must not be empty".to_owned());
        }

        errors
    }
}
