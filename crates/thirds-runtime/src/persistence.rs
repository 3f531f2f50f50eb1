#![forbid(unsafe_code)]

//! Persisted proportions with a retention window.
//!
//! All contexts share one record stored under a single key:
//!
//! ```json
//! {
//!   "proportions": {
//!     "drawers": { "posts": "1/3", "messages": "2/3", "events": "0" },
//!     "vertical": { "presentation": "1/3", "communication": "2/3" }
//!   },
//!   "timestamp": 1760000000000
//! }
//! ```
//!
//! `timestamp` is the epoch-millisecond time of the last write to any
//! context. A record older than the retention window (7 days by default)
//! is treated as absent and deleted on load, as is a record that does not
//! parse.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thirds_core::{AllocationLevel, Clock, SystemClock};
use thirds_layout::{
    EngineBuilder, PanelSet, PartialConfig, ProportionConfig, ProportionEngine, TransitionError,
    TransitionPolicy,
};

use crate::store::{KeyValueStore, StoreError};

/// Storage key of the shared record.
pub const DEFAULT_STORAGE_KEY: &str = "panel-proportions";

/// How long a record stays usable after its last write.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// The record written to storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedProportions {
    /// Context name to panel key to level.
    pub proportions: BTreeMap<String, BTreeMap<String, AllocationLevel>>,
    /// Epoch milliseconds of the last write.
    pub timestamp: u64,
}

impl PersistedProportions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.proportions.is_empty()
    }
}

/// Whether a record written at `timestamp_ms` is past `retention` at `now_ms`.
///
/// A timestamp in the future counts as fresh.
#[must_use]
pub fn is_expired(timestamp_ms: u64, now_ms: u64, retention: Duration) -> bool {
    let age = now_ms.saturating_sub(timestamp_ms);
    u128::from(age) > retention.as_millis()
}

/// Errors from reading or writing the persisted record.
#[derive(Debug)]
pub enum PersistenceError {
    /// The backend failed.
    Store(StoreError),
    /// The stored value is not a valid record.
    Corrupt(serde_json::Error),
    /// The record is older than the retention window.
    Expired { age_ms: u64 },
    /// The record could not be encoded.
    Encode(serde_json::Error),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(e) => write!(f, "{e}"),
            Self::Corrupt(e) => write!(f, "corrupt proportions record: {e}"),
            Self::Expired { age_ms } => {
                write!(f, "proportions record expired ({age_ms} ms old)")
            }
            Self::Encode(e) => write!(f, "failed to encode proportions record: {e}"),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            Self::Corrupt(e) | Self::Encode(e) => Some(e),
            Self::Expired { .. } => None,
        }
    }
}

impl From<StoreError> for PersistenceError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

/// Reads and writes per-context proportions in a [`KeyValueStore`].
///
/// Cloning is cheap: clones share the backend and clock.
#[derive(Clone)]
pub struct ProportionStore {
    store: Rc<dyn KeyValueStore>,
    storage_key: String,
    retention: Duration,
    clock: Rc<dyn Clock>,
    closed_size_px: Option<u16>,
}

impl fmt::Debug for ProportionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProportionStore")
            .field("storage_key", &self.storage_key)
            .field("retention", &self.retention)
            .field("closed_size_px", &self.closed_size_px)
            .finish_non_exhaustive()
    }
}

impl ProportionStore {
    /// Store with the default key, retention, and the system clock.
    #[must_use]
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            retention: DEFAULT_RETENTION,
            clock: Rc::new(SystemClock),
            closed_size_px: None,
        }
    }

    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    #[must_use]
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Handle size given to every engine built by [`bind`](Self::bind).
    #[must_use]
    pub fn with_closed_size_px(mut self, px: u16) -> Self {
        self.closed_size_px = Some(px);
        self
    }

    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    #[must_use]
    pub fn retention(&self) -> Duration {
        self.retention
    }

    #[must_use]
    pub fn closed_size_px(&self) -> Option<u16> {
        self.closed_size_px
    }

    /// Read the record. A missing record is an empty one.
    ///
    /// Unlike [`load`](Self::load) this leaves bad records in place.
    pub fn try_load(&self) -> Result<PersistedProportions, PersistenceError> {
        let Some(raw) = self.store.get_item(&self.storage_key)? else {
            return Ok(PersistedProportions::default());
        };
        let record: PersistedProportions =
            serde_json::from_str(&raw).map_err(PersistenceError::Corrupt)?;
        let now = self.clock.now_ms();
        if is_expired(record.timestamp, now, self.retention) {
            return Err(PersistenceError::Expired {
                age_ms: now.saturating_sub(record.timestamp),
            });
        }
        Ok(record)
    }

    /// Read the record, or an empty one if it is missing, corrupt, expired,
    /// or the backend fails. Corrupt and expired records are deleted.
    #[must_use]
    pub fn load(&self) -> PersistedProportions {
        match self.try_load() {
            Ok(record) => record,
            Err(err @ PersistenceError::Expired { .. }) => {
                tracing::debug!(
                    target: "thirds.persist",
                    key = %self.storage_key,
                    reason = %err,
                    "discarding stale proportions"
                );
                self.discard();
                PersistedProportions::default()
            }
            Err(err @ PersistenceError::Corrupt(_)) => {
                tracing::warn!(
                    target: "thirds.persist",
                    key = %self.storage_key,
                    reason = %err,
                    "discarding unreadable proportions"
                );
                self.discard();
                PersistedProportions::default()
            }
            Err(err) => {
                tracing::warn!(
                    target: "thirds.persist",
                    key = %self.storage_key,
                    error = %err,
                    "failed to read proportions"
                );
                PersistedProportions::default()
            }
        }
    }

    fn discard(&self) {
        if let Err(err) = self.store.remove_item(&self.storage_key) {
            tracing::warn!(
                target: "thirds.persist",
                key = %self.storage_key,
                error = %err,
                "failed to delete proportions"
            );
        }
    }

    /// Write `record` as-is.
    pub fn save(&self, record: &PersistedProportions) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(record).map_err(PersistenceError::Encode)?;
        self.store.set_item(&self.storage_key, &json)?;
        Ok(())
    }

    /// Saved levels of `context` for the panels of `P`.
    ///
    /// Keys that do not belong to `P` are dropped.
    #[must_use]
    pub fn get_context<P: PanelSet>(&self, context: &str) -> PartialConfig<P> {
        self.load()
            .proportions
            .get(context)
            .map(ProportionConfig::partial_from_key_map)
            .unwrap_or_default()
    }

    /// Replace the saved levels of `context` and refresh the timestamp.
    ///
    /// Other contexts in the record are kept.
    pub fn set_context<P: PanelSet>(
        &self,
        context: &str,
        config: &ProportionConfig<P>,
    ) -> Result<(), PersistenceError> {
        let mut record = self.load();
        record
            .proportions
            .insert(context.to_owned(), config.to_key_map());
        record.timestamp = self.clock.now_ms();
        self.save(&record)
    }

    /// Forget `context`. The record is deleted once no context remains.
    pub fn clear_context(&self, context: &str) -> Result<(), PersistenceError> {
        let mut record = self.load();
        if record.proportions.remove(context).is_none() {
            return Ok(());
        }
        if record.is_empty() {
            return self.clear_all();
        }
        self.save(&record)
    }

    /// Delete the whole record.
    pub fn clear_all(&self) -> Result<(), PersistenceError> {
        self.store.remove_item(&self.storage_key)?;
        Ok(())
    }

    /// Build an engine for `context` and keep it in sync with storage.
    ///
    /// Saved levels are merged over the builder's default config. If the
    /// merged config breaks the budget the engine starts from the default.
    /// Every later change is written back; write failures are logged and
    /// otherwise ignored. A handle size set with
    /// [`with_closed_size_px`](Self::with_closed_size_px) replaces the
    /// builder's.
    pub fn bind<P, T>(
        &self,
        context: &str,
        builder: EngineBuilder<P, T>,
    ) -> Result<ProportionEngine<P, T>, TransitionError>
    where
        P: PanelSet,
        T: TransitionPolicy<P> + 'static,
    {
        let builder = match self.closed_size_px {
            Some(px) => builder.closed_size_px(px),
            None => builder,
        };
        let saved = self.get_context::<P>(context);
        let builder = if saved.is_empty() {
            builder
        } else {
            let restored = ProportionConfig::merged(&builder.default_config(), &saved);
            tracing::debug!(
                target: "thirds.persist",
                context,
                restored = %restored,
                "restoring proportions"
            );
            builder.restore(restored)
        };

        let mut engine = builder.build()?;
        let store = self.clone();
        let context = context.to_owned();
        engine.on_change(move |config| {
            if let Err(err) = store.set_context(&context, config) {
                tracing::warn!(
                    target: "thirds.persist",
                    context = %context,
                    error = %err,
                    "failed to persist proportions"
                );
            }
        });
        Ok(engine)
    }
}
