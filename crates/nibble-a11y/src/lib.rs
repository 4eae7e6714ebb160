//! Accessibility and interaction-compliance engine for Nibble.
//!
//! This crate keeps the meal-logging UI usable from the keyboard and with
//! assistive technology. It owns no UI: the rendering layer reports elements
//! and events through small traits, and the engine answers with focus moves,
//! announcements and diagnostics.
//!
//! - **Focus**: [`FocusTrapSession`] traps Tab inside dialogs and restores
//!   focus on teardown.
//! - **Navigation**: [`next_index`] moves through lists and grids with the
//!   arrow keys.
//! - **Announcements**: [`Announcer`] writes messages to a single live region.
//! - **Validation**: [`validate_contrast`] and [`validate_touch_target`]
//!   check WCAG contrast ratios and touch-target sizes.
//! - **Interaction**: [`InteractionOrchestrator`] routes raw events for one
//!   region to all of the above.
//!
//! Deferred work (announcement timing, auto-focus, focus restoration) runs on
//! a [`nibble_core::Scheduler`] that the host's event loop drives.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use nibble_core::{ManualClock, Scheduler};
//! use nibble_a11y::{Announcer, MemoryLiveRegion, Politeness, validate_contrast};
//!
//! let clock = Arc::new(ManualClock::new());
//! let scheduler = Scheduler::new(clock.clone());
//!
//! let announcer = Announcer::new(scheduler.clone());
//! let region = MemoryLiveRegion::new();
//! announcer.ensure_region(|| region.clone());
//!
//! announcer.announce("3 meals logged today", Politeness::Polite);
//! clock.advance(Duration::from_millis(100));
//! scheduler.run_ready();
//! assert_eq!(region.text(), "3 meals logged today");
//!
//! assert!(validate_contrast("#1A1A1A", "#FFFFFF", false).passes);
//! ```

pub mod announcer;
pub mod config;
pub mod contrast;
pub mod element;
mod error;
pub mod feedback;
pub mod focus;
pub mod geometry;
pub mod interaction;
pub mod keyboard;
pub mod navigation;
pub mod preferences;

pub use announcer::{AnnouncementMessage, Announcer, LiveRegion, MemoryLiveRegion, Politeness, RegionMutation};
pub use config::{A11yConfig, AnnouncerConfig, FeedbackConfig, FocusConfig, TouchTargetConfig};
pub use contrast::{ContrastLevel, ContrastResult, contrast_ratio, relative_luminance, try_validate_contrast, validate_contrast};
pub use element::{ElementId, FocusableElement, RegionId};
pub use error::{Error, Result};
pub use feedback::{FeedbackError, FeedbackSink, NullFeedback};
pub use focus::{FocusHost, FocusTrapSession, SessionState, SharedFocusHost, shared_host};
pub use geometry::{MIN_TOUCH_TARGET, RECOMMENDED_TOUCH_TARGET, TouchTargetResult, audit_touch_target, validate_touch_target};
pub use interaction::{InteractionOrchestrator, InteractionOrchestratorBuilder};
pub use keyboard::{Key, KeyInput, KeyOutcome, KeyboardModifiers};
pub use navigation::{Axis, NavigationGroup, NavigationTopology, next_index};
pub use preferences::{EnvironmentPreferences, SharedPreferences, StaticPreferences};

static_assertions::assert_impl_all!(InteractionOrchestrator: Send);
static_assertions::assert_impl_all!(SharedPreferences: Send, Sync);
