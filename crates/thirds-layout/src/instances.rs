#![forbid(unsafe_code)]

//! Ready-made engine builders for the built-in panel sets.
//!
//! Each builder carries the surface's default config and its named presets.
//! Callers can still adjust it (closed handle size, extra presets) before
//! calling `build()`, or hand it to the persistence layer to bind it to a
//! storage context.

use thirds_core::AllocationLevel::{Closed, Third, TwoThirds};
use thirds_core::Axis;

use crate::engine::EngineBuilder;
use crate::panel::{CreationPanel, DrawerPanel, GroupPanel, PanelSet, VerticalPanel};
use crate::policy::{EscalatePolicy, SplitPolicy};
use crate::proportion::ProportionConfig;
use crate::transitions;

/// `panel` at two thirds and the next panel (wrapping) at one third.
fn focus<P: PanelSet>(panel: P) -> ProportionConfig<P> {
    let next = P::ALL[(panel.index() + 1) % P::count()];
    ProportionConfig::uniform(Closed)
        .with(next, Third)
        .with(panel, TwoThirds)
}

/// Horizontal builder with `balanced`, `focus-<key>` and `<key>-only` presets.
fn three_panel<P: PanelSet>() -> EngineBuilder<P, SplitPolicy> {
    let mut builder =
        EngineBuilder::new(Axis::Horizontal).preset("balanced", transitions::even_split());
    for &panel in P::ALL {
        builder = builder
            .preset(format!("focus-{}", panel.key()), focus(panel))
            .preset(format!("{}-only", panel.key()), transitions::maximize(panel));
    }
    builder
}

/// Feed drawers: posts, messages, and events side by side, evenly split.
#[must_use]
pub fn drawers() -> EngineBuilder<DrawerPanel, SplitPolicy> {
    three_panel()
}

/// Group content: posts lead, members and events share the rest.
#[must_use]
pub fn group_content() -> EngineBuilder<GroupPanel, SplitPolicy> {
    three_panel().initial(focus(GroupPanel::Posts))
}

/// Creation flow: the composer leads, the preview follows, options start closed.
#[must_use]
pub fn creation() -> EngineBuilder<CreationPanel, SplitPolicy> {
    three_panel()
        .initial(focus(CreationPanel::Compose))
        .preset("review", focus(CreationPanel::Preview))
}

/// Resting split of the vertical layout: communication gets two thirds.
#[must_use]
pub fn vertical_resting() -> ProportionConfig<VerticalPanel> {
    ProportionConfig::uniform(Third).with(VerticalPanel::Communication, TwoThirds)
}

/// Vertical presentation/communication split with the escalate policy.
#[must_use]
pub fn vertical_split() -> EngineBuilder<VerticalPanel, EscalatePolicy<VerticalPanel>> {
    let resting = vertical_resting();
    let presentation =
        ProportionConfig::uniform(Third).with(VerticalPanel::Presentation, TwoThirds);
    EngineBuilder::new(Axis::Vertical)
        .policy(EscalatePolicy::from_valid(resting.clone()))
        .initial(resting.clone())
        .preset("presentation", presentation)
        .preset("communication", resting)
}
