#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use campaign_runtime::CampaignSetting;
use editor_core::{HandleAllocator, HandleId};

static INIT: Once = Once::new();

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn ensure_test_config() {
    INIT.call_once(|| {
        let config_path = fixture_path("test_editor_config.json");

        debug_assert!(
            config_path.exists(),
            "missing test editor config at {}",
            config_path.display()
        );

        std::env::set_var(editor_core::EDITOR_CONFIG_ENV, &config_path);
    });
}

pub fn load_fixture_campaign() -> CampaignSetting {
    CampaignSetting::from_file(&fixture_path("ogre_valley.json")).expect("fixture campaign loads")
}

/// Allocator whose outstanding handle count stays observable after the
/// registry holding it has been dropped.
pub struct CountingAllocator {
    next: u32,
    live: Arc<AtomicUsize>,
}

impl CountingAllocator {
    pub fn new(live: Arc<AtomicUsize>) -> Self {
        Self { next: 0, live }
    }
}

impl HandleAllocator for CountingAllocator {
    fn allocate(&mut self) -> HandleId {
        self.next += 1;
        self.live.fetch_add(1, Ordering::SeqCst);
        HandleId(self.next)
    }

    fn release(&mut self, _handle: HandleId) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }

    fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}
