#![forbid(unsafe_code)]

//! Diagnostics emitted by the engine under the `thirds.engine` target.
//!
//! Refused transitions are silent to the user but must leave a debug-level
//! trail; successful changes log the new config and version.
//!
//! Run:
//!   cargo test -p thirds-layout --test refusal_diagnostics

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thirds_layout::instances;
use thirds_layout::{DrawerPanel, ProportionConfig};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    message: String,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned().unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message,
            fields,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

#[test]
fn last_close_refusal_is_logged_at_debug() {
    let events = capture(|| {
        let mut engine = instances::drawers().build().unwrap();
        engine.maximize(DrawerPanel::Events).unwrap();
        assert!(engine.toggle(DrawerPanel::Events).is_err());
    });

    let refused: Vec<_> = events
        .iter()
        .filter(|e| e.message == "transition refused")
        .collect();
    assert_eq!(refused.len(), 1, "events: {events:?}");
    let event = refused[0];
    assert_eq!(event.level, tracing::Level::DEBUG);
    assert_eq!(event.target, "thirds.engine");
    assert_eq!(event.fields.get("op").map(String::as_str), Some("toggle"));
    assert!(event.fields["error"].contains("last open panel"));
}

#[test]
fn changes_log_config_and_version() {
    let events = capture(|| {
        let mut engine = instances::drawers().build().unwrap();
        engine.toggle(DrawerPanel::Posts).unwrap();
    });

    let changed = events
        .iter()
        .find(|e| e.message == "config changed")
        .expect("change event");
    assert_eq!(changed.fields["version"], "1");
    assert_eq!(changed.fields["config"], "posts=0 messages=2/3 events=1/3");
}

#[test]
fn rejected_set_config_names_the_violation() {
    let events = capture(|| {
        let mut engine = instances::drawers().build().unwrap();
        let bad = ProportionConfig::uniform(thirds_layout::AllocationLevel::Full);
        assert!(engine.set_config(bad).is_err());
    });

    let rejected = events
        .iter()
        .find(|e| e.message == "config rejected")
        .expect("rejection event");
    assert!(rejected.fields["error"].contains("9 units"));
}

#[test]
fn identity_writes_are_silent() {
    let events = capture(|| {
        let mut engine = instances::drawers().build().unwrap();
        engine.balance().unwrap();
    });
    assert!(
        events.iter().all(|e| e.message != "config changed"),
        "events: {events:?}"
    );
}
