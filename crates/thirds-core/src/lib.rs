#![forbid(unsafe_code)]

//! Core: the size quantizer for the thirds panel-proportion engine.
//!
//! # Role in thirds
//! `thirds-core` owns the vocabulary every other crate speaks: the four
//! quantized [`AllocationLevel`]s, the [`Axis`] a panel set is laid out on,
//! and the translation from a level to a layout [`Metric`] or class name.
//! It also defines the [`Clock`] used by the persistence layer.
//!
//! # How it fits in the system
//! The engine (`thirds-layout`) only manipulates levels and units. Turning a
//! level into a CSS dimension or a concrete pixel length is delegated here so
//! that consumers can render panels without knowing the transition policy.

pub mod clock;
pub mod geometry;
pub mod level;

pub use clock::{Clock, ManualClock, SystemClock};
pub use geometry::{Axis, CLOSED_SIZE_PX, Metric, MetricValue, class_for};
pub use level::{AllocationLevel, BUDGET, ParseLevelError};
