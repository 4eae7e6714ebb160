//! Focus trapping for modal regions.
//!
//! A [`FocusTrapSession`] confines sequential keyboard focus to one region of
//! the UI (a dialog, a bottom sheet) while it is active, and hands focus back
//! to whatever had it before once the region goes away.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──activate()──▶ Active ──deactivate() / drop──▶ TornDown
//! ```
//!
//! - On activation the currently focused element is remembered as the
//!   restoration target. With `auto_focus` the first eligible element is
//!   focused after the settle delay, and its label is announced.
//! - While active, Tab on the last element wraps to the first and Shift+Tab on
//!   the first wraps to the last. Escape is never consumed so that the owner
//!   of the region can close it.
//! - On teardown a pending auto-focus is cancelled and the restoration target
//!   is refocused on the next tick, provided it is still attached.
//!
//! # Eligibility
//!
//! The host reports candidates in document order. An element takes part in
//! the tab sequence if it is enabled, not `aria-hidden`, visible, has a
//! non-empty box, and a non-negative `tab_order`. The list is queried from the
//! host on every call and never cached: regions re-render between key presses
//! and a stale list would trap focus on detached elements.

use std::fmt;
use std::sync::{Arc, Weak};

use nibble_core::logging::targets;
use nibble_core::{Scheduler, TaskHandle};
use parking_lot::Mutex;

use crate::announcer::Announcer;
use crate::config::FocusConfig;
use crate::element::{ElementId, FocusableElement, RegionId, tab_sequence};
use crate::keyboard::{Key, KeyInput, KeyOutcome};

/// The rendering layer's view of focus.
pub trait FocusHost: Send {
    /// Every focusable candidate inside `region`, in document order.
    fn focusable_candidates(&self, region: RegionId) -> Vec<FocusableElement>;

    /// The element that currently has focus, if any.
    fn active_element(&self) -> Option<ElementId>;

    /// Move focus to `id`. Returns `false` if the element could not be focused.
    fn focus(&mut self, id: ElementId) -> bool;

    /// Check if `id` is still part of the document.
    fn is_attached(&self, id: ElementId) -> bool;
}

/// A focus host shared between sessions, the orchestrator and deferred tasks.
pub type SharedFocusHost = Arc<Mutex<dyn FocusHost>>;

/// Wrap a host for sharing.
pub fn shared_host<H: FocusHost + 'static>(host: H) -> SharedFocusHost {
    Arc::new(Mutex::new(host))
}

/// Lifecycle state of a [`FocusTrapSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active,
    TornDown,
}

#[derive(Default)]
struct SessionInner {
    state: SessionState,
    restore_target: Option<ElementId>,
    auto_focus_task: Option<TaskHandle>,
}

/// One focus trap over one region.
pub struct FocusTrapSession {
    region: RegionId,
    host: SharedFocusHost,
    scheduler: Scheduler,
    announcer: Option<Announcer>,
    options: FocusConfig,
    inner: Arc<Mutex<SessionInner>>,
}

impl FocusTrapSession {
    /// Create an idle session over `region`.
    pub fn new(region: RegionId, host: SharedFocusHost, scheduler: Scheduler, options: FocusConfig) -> Self {
        Self {
            region,
            host,
            scheduler,
            announcer: None,
            options,
            inner: Arc::new(Mutex::new(SessionInner::default())),
        }
    }

    /// Announce the label of the auto-focused element through `announcer`.
    pub fn with_announcer(mut self, announcer: Announcer) -> Self {
        self.announcer = Some(announcer);
        self
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn options(&self) -> &FocusConfig {
        &self.options
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// The element that will regain focus on teardown.
    pub fn restore_target(&self) -> Option<ElementId> {
        self.inner.lock().restore_target
    }

    /// Enter the trap.
    ///
    /// Does nothing unless the session is idle.
    #[tracing::instrument(skip(self), fields(region = %self.region), target = "nibble_a11y::focus", level = "trace")]
    pub fn activate(&self) {
        let mut inner = self.inner.lock();
        if inner.state != SessionState::Idle {
            return;
        }
        inner.state = SessionState::Active;

        if self.options.restore_focus {
            inner.restore_target = self.host.lock().active_element();
        }

        if self.options.auto_focus {
            let task = AutoFocus {
                session: Arc::downgrade(&self.inner),
                region: self.region,
                host: self.host.clone(),
                announcer: self
                    .announcer
                    .clone()
                    .filter(|_| self.options.announce_auto_focus),
            };
            inner.auto_focus_task = Some(
                self.scheduler
                    .schedule_once(self.options.settle_delay(), move || task.run()),
            );
        }

        tracing::trace!(
            target: targets::FOCUS,
            restore_target = ?inner.restore_target,
            auto_focus = self.options.auto_focus,
            "focus trap activated"
        );
    }

    /// Leave the trap.
    ///
    /// Cancels a pending auto-focus and schedules focus restoration. The
    /// restoration runs even if the session is dropped right after.
    #[tracing::instrument(skip(self), fields(region = %self.region), target = "nibble_a11y::focus", level = "trace")]
    pub fn deactivate(&self) {
        let (was_active, auto_focus_task, restore_target) = {
            let mut inner = self.inner.lock();
            let was_active = inner.state == SessionState::Active;
            inner.state = SessionState::TornDown;
            (was_active, inner.auto_focus_task.take(), inner.restore_target.take())
        };
        drop(auto_focus_task);

        if !was_active {
            return;
        }

        if let Some(target) = restore_target.filter(|_| self.options.restore_focus) {
            let host = self.host.clone();
            self.scheduler
                .schedule_once(self.options.restore_delay(), move || restore_focus(&host, target))
                .detach();
        }
        tracing::trace!(target: targets::FOCUS, ?restore_target, "focus trap deactivated");
    }

    /// The current tab sequence of the region.
    pub fn focusable_elements(&self) -> Vec<FocusableElement> {
        eligible_elements(&self.host, self.region)
    }

    /// Check if `id` is one of the region's candidates, eligible or not.
    pub fn contains(&self, id: ElementId) -> bool {
        self.host
            .lock()
            .focusable_candidates(self.region)
            .iter()
            .any(|el| el.id == id)
    }

    /// Focus the first element of the tab sequence.
    ///
    /// Returns the focused element, or `None` if the sequence is empty or the
    /// host refused focus.
    pub fn focus_first(&self) -> Option<ElementId> {
        let first = self.focusable_elements().first().map(|el| el.id)?;
        self.host.lock().focus(first).then_some(first)
    }

    /// Focus the last element of the tab sequence.
    pub fn focus_last(&self) -> Option<ElementId> {
        let last = self.focusable_elements().last().map(|el| el.id)?;
        self.host.lock().focus(last).then_some(last)
    }

    /// React to a key press inside the region.
    ///
    /// Returns [`KeyOutcome::Handled`] when focus was moved and the caller must
    /// suppress the browser default.
    pub fn handle_key(&self, input: KeyInput) -> KeyOutcome {
        if self.state() != SessionState::Active || input.modifiers.has_command() {
            return KeyOutcome::Ignored;
        }

        match input.key {
            Key::Tab if self.options.trap_focus => self.cycle(input.modifiers.shift),
            Key::Home => outcome(self.focus_first()),
            Key::End => outcome(self.focus_last()),
            _ => KeyOutcome::Ignored,
        }
    }

    fn cycle(&self, backward: bool) -> KeyOutcome {
        let mut host = self.host.lock();
        let candidates = host.focusable_candidates(self.region);
        let elements = tab_sequence(candidates.clone());
        let (Some(first), Some(last)) = (elements.first(), elements.last()) else {
            return KeyOutcome::Ignored;
        };

        if let Some(active) = host.active_element() {
            if default_stays_inside(&candidates, &elements, active, backward) {
                return KeyOutcome::Ignored;
            }
        }

        let target = if backward { last.id } else { first.id };
        if !host.focus(target) {
            tracing::debug!(target: targets::FOCUS, element = %target, "host refused focus, Tab not trapped");
            return KeyOutcome::Ignored;
        }
        tracing::trace!(target: targets::FOCUS, element = %target, backward, "focus wrapped");
        KeyOutcome::Handled
    }
}

/// Check if the browser's own Tab move from `active` lands inside the region.
///
/// Members of the tab sequence defer to the sequence. Candidates outside it
/// (roving `tabindex="-1"` members) move to the next eligible candidate in
/// document order.
fn default_stays_inside(
    candidates: &[FocusableElement],
    sequence: &[FocusableElement],
    active: ElementId,
    backward: bool,
) -> bool {
    if let Some(i) = sequence.iter().position(|el| el.id == active) {
        return if backward { i > 0 } else { i + 1 < sequence.len() };
    }
    let Some(doc) = candidates.iter().position(|el| el.id == active) else {
        return false;
    };
    let mut neighbours = if backward {
        candidates[..doc].iter()
    } else {
        candidates[doc + 1..].iter()
    };
    neighbours.any(FocusableElement::is_eligible)
}

fn outcome(focused: Option<ElementId>) -> KeyOutcome {
    match focused {
        Some(_) => KeyOutcome::Handled,
        None => KeyOutcome::Ignored,
    }
}

fn eligible_elements(host: &SharedFocusHost, region: RegionId) -> Vec<FocusableElement> {
    let candidates = host.lock().focusable_candidates(region);
    tab_sequence(candidates)
}

fn restore_focus(host: &SharedFocusHost, target: ElementId) {
    let mut host = host.lock();
    if host.is_attached(target) {
        host.focus(target);
        tracing::trace!(target: targets::FOCUS, element = %target, "focus restored");
    } else {
        tracing::debug!(target: targets::FOCUS, element = %target, "restore target detached, focus not restored");
    }
}

/// Deferred auto-focus of a freshly activated region.
struct AutoFocus {
    session: Weak<Mutex<SessionInner>>,
    region: RegionId,
    host: SharedFocusHost,
    announcer: Option<Announcer>,
}

impl AutoFocus {
    fn run(self) {
        let Some(session) = self.session.upgrade() else {
            return;
        };
        {
            let mut inner = session.lock();
            if inner.state != SessionState::Active {
                return;
            }
            inner.auto_focus_task = None;
        }

        let Some(first) = eligible_elements(&self.host, self.region).into_iter().next() else {
            return;
        };
        if !self.host.lock().focus(first.id) {
            return;
        }
        tracing::trace!(target: targets::FOCUS, element = %first.id, "auto-focused first element");

        if let (Some(announcer), Some(label)) = (&self.announcer, &first.label) {
            announcer.announce_polite(label);
        }
    }
}

impl Drop for FocusTrapSession {
    fn drop(&mut self) {
        if self.state() == SessionState::Active {
            self.deactivate();
        }
    }
}

impl fmt::Debug for FocusTrapSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("FocusTrapSession")
            .field("region", &self.region)
            .field("state", &inner.state)
            .field("restore_target", &inner.restore_target)
            .field("options", &self.options)
            .finish()
    }
}

static_assertions::assert_impl_all!(FocusTrapSession: Send, Sync);
