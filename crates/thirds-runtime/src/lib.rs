#![forbid(unsafe_code)]

//! Persistence, settings, and logging for thirds engines.
//!
//! # Role in thirds
//! `thirds-runtime` connects a [`ProportionEngine`](thirds_layout::ProportionEngine)
//! to the outside world. [`ProportionStore`] keeps per-context proportions
//! in a [`KeyValueStore`] with a retention window, and
//! [`ProportionStore::bind`] builds an engine that restores its saved
//! proportions and writes back every change.
//!
//! # How it fits in the system
//! The engine itself never touches storage. Storage failures are logged
//! under `thirds.persist` and never reach the caller of a transition.
//!
//! ```
//! use std::rc::Rc;
//! use thirds_layout::{instances, DrawerPanel};
//! use thirds_runtime::{MemoryStore, ProportionStore};
//!
//! let store = ProportionStore::new(Rc::new(MemoryStore::new()));
//! let mut engine = store.bind("drawers", instances::drawers()).unwrap();
//! engine.toggle(DrawerPanel::Events).unwrap();
//!
//! // A later session picks up where this one left off.
//! let restored = store.bind("drawers", instances::drawers()).unwrap();
//! assert!(restored.is_closed(DrawerPanel::Events));
//! ```

pub mod logging;
pub mod persistence;
pub mod settings;
pub mod store;

pub use logging::LoggingError;
pub use persistence::{
    DEFAULT_RETENTION, DEFAULT_STORAGE_KEY, PersistedProportions, PersistenceError,
    ProportionStore, is_expired,
};
pub use settings::{
    EngineSettings, LoggingSettings, PersistenceSettings, ResponsiveSettings, Settings,
    SettingsError,
};
pub use store::{DisabledStore, FileStore, KeyValueStore, MemoryStore, StoreError};
