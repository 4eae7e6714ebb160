//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use nibble_a11y::{ElementId, FocusHost, FocusableElement, RegionId, SharedFocusHost};
use nibble_core::{ManualClock, Rect, Scheduler};
use parking_lot::Mutex;

pub const DIALOG: RegionId = RegionId(1);

/// Route engine diagnostics to the test output. `RUST_LOG` overrides the filter.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("nibble_a11y=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// An in-memory document with a single region.
#[derive(Debug, Default)]
pub struct TestHost {
    pub elements: Vec<FocusableElement>,
    pub active: Option<ElementId>,
    pub detached: HashSet<ElementId>,
    /// Attached elements whose `focus` call fails anyway.
    pub refused: HashSet<ElementId>,
    /// Every successful `focus` call, oldest first.
    pub focus_calls: Vec<ElementId>,
}

impl FocusHost for TestHost {
    fn focusable_candidates(&self, region: RegionId) -> Vec<FocusableElement> {
        if region != DIALOG {
            return Vec::new();
        }
        self.elements
            .iter()
            .filter(|el| !self.detached.contains(&el.id))
            .cloned()
            .collect()
    }

    fn active_element(&self) -> Option<ElementId> {
        self.active
    }

    fn focus(&mut self, id: ElementId) -> bool {
        if self.detached.contains(&id) || self.refused.contains(&id) {
            return false;
        }
        self.active = Some(id);
        self.focus_calls.push(id);
        true
    }

    fn is_attached(&self, id: ElementId) -> bool {
        !self.detached.contains(&id)
    }
}

/// A 48x48 button stacked vertically by id.
pub fn button(id: u64) -> FocusableElement {
    FocusableElement::new(ElementId(id), Rect::new(0.0, id as f32 * 56.0, 48.0, 48.0))
}

/// Deterministic time, a scheduler and a host.
pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub scheduler: Scheduler,
    pub host: Arc<Mutex<TestHost>>,
}

impl Harness {
    pub fn new(elements: Vec<FocusableElement>) -> Self {
        init_tracing();
        let clock = Arc::new(ManualClock::new());
        let scheduler = Scheduler::new(clock.clone());
        let host = Arc::new(Mutex::new(TestHost {
            elements,
            ..TestHost::default()
        }));
        Self { clock, scheduler, host }
    }

    pub fn with_buttons(ids: &[u64]) -> Self {
        Self::new(ids.iter().copied().map(button).collect())
    }

    /// The host as the engine sees it.
    pub fn shared_host(&self) -> SharedFocusHost {
        self.host.clone()
    }

    pub fn active(&self) -> Option<ElementId> {
        self.host.lock().active
    }

    pub fn set_active(&self, id: u64) {
        self.host.lock().active = Some(ElementId(id));
    }

    pub fn detach(&self, id: u64) {
        self.host.lock().detached.insert(ElementId(id));
    }

    pub fn refuse_focus(&self, id: u64) {
        self.host.lock().refused.insert(ElementId(id));
    }

    /// Advance time and run whatever became due.
    pub fn advance(&self, ms: u64) -> usize {
        self.clock.advance(Duration::from_millis(ms));
        self.scheduler.run_ready()
    }
}
