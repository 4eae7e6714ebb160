//! Screen-reader announcements through a single live region.
//!
//! An [`Announcer`] owns one output channel, a [`LiveRegion`]. Announcing a
//! message runs a fixed sequence:
//!
//! 1. set the region's politeness;
//! 2. clear its content;
//! 3. after the settle delay (100 ms by default), write the message;
//! 4. after the clear delay (1000 ms by default, counted from the write's
//!    deadline), clear the content again.
//!
//! Clearing first and writing later is what makes assistive technology notice
//! a repeat of the same text.
//!
//! The announcer holds a single pending message. A new announcement replaces
//! the pending one and cancels its timers, so of two announcements made within
//! the settle delay only the second ever reaches the region.
//!
//! Without a region (a headless or non-interactive environment) every
//! announcement is a silent no-op.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use nibble_core::{ManualClock, Scheduler};
//! use nibble_a11y::announcer::{Announcer, MemoryLiveRegion};
//!
//! let clock = Arc::new(ManualClock::new());
//! let scheduler = Scheduler::new(clock.clone());
//! let announcer = Announcer::new(scheduler.clone());
//!
//! let region = MemoryLiveRegion::new();
//! announcer.attach(region.clone());
//!
//! announcer.announce_polite("Meal saved");
//! clock.advance(Duration::from_millis(100));
//! scheduler.run_ready();
//! assert_eq!(region.text(), "Meal saved");
//! ```

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Instant;

use nibble_core::logging::targets;
use nibble_core::{Scheduler, TaskHandle};
use parking_lot::Mutex;

use crate::config::AnnouncerConfig;

/// How urgently assistive technology should speak a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Politeness {
    /// Wait for the user to be idle.
    #[default]
    Polite,
    /// Interrupt current speech.
    Assertive,
}

impl Politeness {
    /// The `aria-live` attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
        }
    }
}

/// A message waiting to be written to the live region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementMessage {
    pub text: String,
    pub priority: Politeness,
    pub created_at: Instant,
}

/// The output channel of an [`Announcer`].
///
/// In a browser this is a visually hidden element with `aria-live` and
/// `aria-atomic="true"`.
pub trait LiveRegion: Send {
    /// Set the `aria-live` politeness.
    fn set_politeness(&mut self, politeness: Politeness);

    /// Replace the region's text content.
    fn set_text(&mut self, text: &str);

    /// Remove the region's text content.
    fn clear(&mut self);
}

/// One change applied to a [`MemoryLiveRegion`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionMutation {
    Politeness(Politeness),
    Text(String),
    Cleared,
}

#[derive(Debug, Default)]
struct MemoryRegionState {
    politeness: Politeness,
    text: String,
    history: Vec<RegionMutation>,
}

/// An in-memory live region that records every mutation.
///
/// Clones share state: attach one clone and inspect another.
#[derive(Debug, Clone, Default)]
pub struct MemoryLiveRegion {
    state: Arc<Mutex<MemoryRegionState>>,
}

impl MemoryLiveRegion {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current text content.
    pub fn text(&self) -> String {
        self.state.lock().text.clone()
    }

    /// The current politeness.
    pub fn politeness(&self) -> Politeness {
        self.state.lock().politeness
    }

    /// Every mutation so far, oldest first.
    pub fn history(&self) -> Vec<RegionMutation> {
        self.state.lock().history.clone()
    }

    /// Every text ever written, oldest first.
    pub fn texts_written(&self) -> Vec<String> {
        self.state
            .lock()
            .history
            .iter()
            .filter_map(|mutation| match mutation {
                RegionMutation::Text(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl LiveRegion for MemoryLiveRegion {
    fn set_politeness(&mut self, politeness: Politeness) {
        let mut state = self.state.lock();
        state.politeness = politeness;
        state.history.push(RegionMutation::Politeness(politeness));
    }

    fn set_text(&mut self, text: &str) {
        let mut state = self.state.lock();
        state.text = text.to_owned();
        state.history.push(RegionMutation::Text(text.to_owned()));
    }

    fn clear(&mut self) {
        let mut state = self.state.lock();
        state.text.clear();
        state.history.push(RegionMutation::Cleared);
    }
}

struct AnnouncerState {
    scheduler: Scheduler,
    config: AnnouncerConfig,
    region: Option<Box<dyn LiveRegion>>,
    /// The single pending message.
    slot: Option<AnnouncementMessage>,
    write_task: Option<TaskHandle>,
    clear_task: Option<TaskHandle>,
}

impl AnnouncerState {
    /// Drop both timers. The handles cancel on drop.
    fn cancel_timers(&mut self) {
        self.write_task = None;
        self.clear_task = None;
    }
}

/// Delivers messages to assistive technology.
///
/// Cloning produces another handle to the same announcer; independently
/// constructed announcers share nothing. When the last handle is dropped,
/// pending timers are cancelled.
#[derive(Clone)]
pub struct Announcer {
    state: Arc<Mutex<AnnouncerState>>,
}

impl Announcer {
    /// Create an announcer with default timings.
    pub fn new(scheduler: Scheduler) -> Self {
        Self::with_config(scheduler, AnnouncerConfig::default())
    }

    /// Create an announcer with explicit timings.
    pub fn with_config(scheduler: Scheduler, config: AnnouncerConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(AnnouncerState {
                scheduler,
                config,
                region: None,
                slot: None,
                write_task: None,
                clear_task: None,
            })),
        }
    }

    /// Install a live region unless one exists already.
    ///
    /// The factory only runs when no region is attached. Returns `true` if a
    /// region was created.
    pub fn ensure_region<R, F>(&self, factory: F) -> bool
    where
        R: LiveRegion + 'static,
        F: FnOnce() -> R,
    {
        let mut state = self.state.lock();
        if state.region.is_some() {
            return false;
        }
        state.region = Some(Box::new(factory()));
        tracing::trace!(target: targets::ANNOUNCER, "live region created");
        true
    }

    /// Install a live region, replacing any existing one.
    pub fn attach<R: LiveRegion + 'static>(&self, region: R) {
        self.state.lock().region = Some(Box::new(region));
    }

    /// Remove the live region and drop any pending announcement.
    pub fn detach(&self) -> Option<Box<dyn LiveRegion>> {
        let mut state = self.state.lock();
        state.cancel_timers();
        state.slot = None;
        state.region.take()
    }

    /// Check if a live region is attached.
    pub fn is_attached(&self) -> bool {
        self.state.lock().region.is_some()
    }

    /// The message waiting for the settle delay, if any.
    pub fn pending(&self) -> Option<AnnouncementMessage> {
        self.state.lock().slot.clone()
    }

    /// Announce a message with polite priority.
    pub fn announce_polite(&self, message: &str) {
        self.announce(message, Politeness::Polite);
    }

    /// Announce a message.
    ///
    /// Empty and whitespace-only messages are ignored. Supersedes any
    /// announcement that has not been written yet.
    pub fn announce(&self, message: &str, priority: Politeness) {
        if message.trim().is_empty() {
            return;
        }

        let mut state = self.state.lock();
        let state = &mut *state;
        let Some(region) = state.region.as_mut() else {
            tracing::debug!(target: targets::ANNOUNCER, "no live region, announcement dropped");
            return;
        };

        region.set_politeness(priority);
        region.clear();

        state.cancel_timers();
        state.slot = Some(AnnouncementMessage {
            text: message.to_owned(),
            priority,
            created_at: state.scheduler.now(),
        });

        let weak = Arc::downgrade(&self.state);
        state.write_task = Some(
            state
                .scheduler
                .schedule_once(state.config.settle_delay(), move || write_pending(&weak)),
        );
        tracing::trace!(target: targets::ANNOUNCER, ?priority, "announcement queued");
    }
}

fn write_pending(weak: &Weak<Mutex<AnnouncerState>>) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let mut state = shared.lock();
    let state = &mut *state;
    state.write_task = None;

    let Some(message) = state.slot.take() else {
        return;
    };
    let Some(region) = state.region.as_mut() else {
        return;
    };
    region.set_text(&message.text);
    tracing::trace!(target: targets::ANNOUNCER, priority = message.priority.as_str(), "announcement written");

    let weak = weak.clone();
    state.clear_task = Some(
        state
            .scheduler
            .schedule_once(state.config.clear_delay(), move || clear_region(&weak)),
    );
}

fn clear_region(weak: &Weak<Mutex<AnnouncerState>>) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let mut state = shared.lock();
    state.clear_task = None;
    if let Some(region) = state.region.as_mut() {
        region.clear();
    }
}

impl fmt::Debug for Announcer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Announcer")
            .field("attached", &state.region.is_some())
            .field("pending", &state.slot)
            .field("config", &state.config)
            .finish()
    }
}

static_assertions::assert_impl_all!(Announcer: Send, Sync);

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use nibble_core::ManualClock;

    use super::*;

    fn setup() -> (Arc<ManualClock>, Scheduler, Announcer, MemoryLiveRegion) {
        let clock = Arc::new(ManualClock::new());
        let scheduler = Scheduler::new(clock.clone());
        let announcer = Announcer::new(scheduler.clone());
        let region = MemoryLiveRegion::new();
        announcer.attach(region.clone());
        (clock, scheduler, announcer, region)
    }

    fn tick(clock: &ManualClock, scheduler: &Scheduler, ms: u64) {
        clock.advance(Duration::from_millis(ms));
        scheduler.run_ready();
    }

    #[test]
    fn test_sequence() {
        let (clock, scheduler, announcer, region) = setup();

        announcer.announce("Item deleted", Politeness::Assertive);
        assert_eq!(region.politeness(), Politeness::Assertive);
        assert_eq!(region.text(), "");
        assert_eq!(announcer.pending().map(|m| m.text), Some("Item deleted".to_owned()));

        tick(&clock, &scheduler, 99);
        assert_eq!(region.text(), "");

        tick(&clock, &scheduler, 1);
        assert_eq!(region.text(), "Item deleted");
        assert!(announcer.pending().is_none());

        tick(&clock, &scheduler, 999);
        assert_eq!(region.text(), "Item deleted");

        tick(&clock, &scheduler, 1);
        assert_eq!(region.text(), "");
        assert_eq!(
            region.history(),
            vec![
                RegionMutation::Politeness(Politeness::Assertive),
                RegionMutation::Cleared,
                RegionMutation::Text("Item deleted".to_owned()),
                RegionMutation::Cleared,
            ]
        );
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_last_write_wins() {
        let (clock, scheduler, announcer, region) = setup();

        announcer.announce_polite("first");
        tick(&clock, &scheduler, 50);
        announcer.announce_polite("second");
        tick(&clock, &scheduler, 2000);

        assert_eq!(region.texts_written(), vec!["second".to_owned()]);
    }

    #[test]
    fn test_late_tick_does_not_delay_clear() {
        let (clock, scheduler, announcer, region) = setup();

        announcer.announce_polite("hello");
        // One late wake-up covers both the write (due at 100) and the clear (due at 1100)
        tick(&clock, &scheduler, 1150);
        assert_eq!(region.texts_written(), vec!["hello".to_owned()]);
        assert_eq!(region.text(), "");
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_clear_follows_write_deadline() {
        let (clock, scheduler, announcer, region) = setup();

        announcer.announce_polite("hello");
        tick(&clock, &scheduler, 400);
        assert_eq!(region.text(), "hello");

        // Clear is due 1000ms after the write was due, not after it ran
        tick(&clock, &scheduler, 699);
        assert_eq!(region.text(), "hello");
        tick(&clock, &scheduler, 1);
        assert_eq!(region.text(), "");
    }

    #[test]
    fn test_new_announcement_cancels_pending_clear() {
        let (clock, scheduler, announcer, region) = setup();

        announcer.announce_polite("first");
        tick(&clock, &scheduler, 100);
        assert_eq!(region.text(), "first");

        announcer.announce_polite("second");
        assert_eq!(scheduler.pending_count(), 1);
        tick(&clock, &scheduler, 100);
        assert_eq!(region.text(), "second");
    }

    #[test]
    fn test_empty_messages_ignored() {
        let (_clock, scheduler, announcer, region) = setup();
        announcer.announce_polite("");
        announcer.announce("   \n", Politeness::Assertive);
        assert!(region.history().is_empty());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_no_region_is_noop() {
        let scheduler = Scheduler::new(Arc::new(ManualClock::new()));
        let announcer = Announcer::new(scheduler.clone());
        announcer.announce_polite("nobody hears this");
        assert!(!announcer.is_attached());
        assert!(announcer.pending().is_none());
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_ensure_region_is_idempotent() {
        let scheduler = Scheduler::new(Arc::new(ManualClock::new()));
        let announcer = Announcer::new(scheduler);
        let mut calls = 0;

        assert!(announcer.ensure_region(|| {
            calls += 1;
            MemoryLiveRegion::new()
        }));
        assert!(!announcer.ensure_region(|| {
            calls += 1;
            MemoryLiveRegion::new()
        }));
        assert_eq!(calls, 1);
        assert!(announcer.is_attached());
    }

    #[test]
    fn test_detach_cancels_pending() {
        let (clock, scheduler, announcer, region) = setup();
        announcer.announce_polite("gone");
        assert!(announcer.detach().is_some());
        assert_eq!(scheduler.pending_count(), 0);

        tick(&clock, &scheduler, 200);
        assert!(region.texts_written().is_empty());
    }

    #[test]
    fn test_dropping_last_handle_cancels_timers() {
        let (_clock, scheduler, announcer, _region) = setup();
        let clone = announcer.clone();
        announcer.announce_polite("hello");

        drop(announcer);
        assert_eq!(scheduler.pending_count(), 1);
        drop(clone);
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_independent_instances() {
        let (clock, scheduler, first, first_region) = setup();
        let second = Announcer::new(scheduler.clone());
        let second_region = MemoryLiveRegion::new();
        second.attach(second_region.clone());

        first.announce_polite("one");
        second.announce_polite("two");
        tick(&clock, &scheduler, 100);

        assert_eq!(first_region.text(), "one");
        assert_eq!(second_region.text(), "two");
    }

    #[test]
    fn test_custom_timings() {
        let clock = Arc::new(ManualClock::new());
        let scheduler = Scheduler::new(clock.clone());
        let announcer = Announcer::with_config(
            scheduler.clone(),
            AnnouncerConfig {
                settle_delay_ms: 10,
                clear_delay_ms: 20,
            },
        );
        let region = MemoryLiveRegion::new();
        announcer.attach(region.clone());

        announcer.announce_polite("fast");
        tick(&clock, &scheduler, 10);
        assert_eq!(region.text(), "fast");
        tick(&clock, &scheduler, 20);
        assert_eq!(region.text(), "");
    }

    #[test]
    fn test_politeness_names() {
        assert_eq!(Politeness::default(), Politeness::Polite);
        assert_eq!(Politeness::Polite.as_str(), "polite");
        assert_eq!(Politeness::Assertive.as_str(), "assertive");
    }
}
