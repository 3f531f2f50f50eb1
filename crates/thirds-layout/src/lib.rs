#![forbid(unsafe_code)]

//! Panel sets, proportion configs, and the transition engine.
//!
//! # Role in thirds
//! `thirds-layout` is the state machine. A fixed [`PanelSet`] shares a
//! budget of three units; user actions (toggle, maximize, balance, swap
//! focus, escalate) go through pure functions in [`transitions`] and are
//! committed by a [`ProportionEngine`] that keeps the budget invariant.
//!
//! # How it fits in the system
//! Levels and metrics come from `thirds-core`. Persistence lives in
//! `thirds-runtime`, which binds an [`EngineBuilder`] to a storage context
//! and mirrors every change through [`ProportionEngine::on_change`].
//!
//! ```
//! use thirds_layout::instances;
//! use thirds_layout::panel::DrawerPanel;
//!
//! let mut engine = instances::drawers().build().unwrap();
//! engine.toggle(DrawerPanel::Events).unwrap();
//! assert_eq!(engine.open_count(), 2);
//!
//! // Closing the last open panel is refused and leaves the state alone.
//! engine.maximize(DrawerPanel::Posts).unwrap();
//! assert!(engine.toggle(DrawerPanel::Posts).is_err());
//! assert_eq!(engine.open_panels(), vec![DrawerPanel::Posts]);
//! ```

pub mod engine;
pub mod instances;
pub mod panel;
pub mod policy;
pub mod proportion;
pub mod responsive;
pub mod transitions;

pub use engine::{ChangeObserver, EngineBuilder, ProportionEngine, ProportionStats};
pub use panel::{CreationPanel, DrawerPanel, GroupPanel, PanelSet, VerticalPanel};
pub use policy::{EscalatePolicy, SplitPolicy, TransitionPolicy};
pub use proportion::{ConfigError, PartialConfig, ProportionConfig};
pub use responsive::{Breakpoints, Responsive, ResponsivePolicy, Viewport, ViewportHints};
pub use transitions::TransitionError;

pub use thirds_core::{AllocationLevel, Axis, Metric, MetricValue};
