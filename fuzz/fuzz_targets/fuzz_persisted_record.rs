#![no_main]

use std::rc::Rc;

use libfuzzer_sys::fuzz_target;
use thirds_core::ManualClock;
use thirds_layout::{DrawerPanel, PanelSet, instances};
use thirds_runtime::{DEFAULT_STORAGE_KEY, KeyValueStore, MemoryStore, ProportionStore};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    let backend = Rc::new(MemoryStore::new());
    let _ = backend.set_item(DEFAULT_STORAGE_KEY, raw);
    let store = ProportionStore::new(backend.clone()).with_clock(Rc::new(ManualClock::new(0)));

    // Whatever is stored, binding must yield a valid engine.
    let Ok(drawers) = store.bind("drawers", instances::drawers()) else {
        return;
    };
    assert!(drawers.config().is_valid());
    for (panel, _) in store.get_context::<DrawerPanel>("drawers") {
        assert!(DrawerPanel::ALL.contains(&panel));
    }

    let Ok(vertical) = store.bind("vertical", instances::vertical_split()) else {
        return;
    };
    assert!(vertical.config().is_valid());
});
