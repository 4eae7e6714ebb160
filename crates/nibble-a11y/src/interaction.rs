//! Event glue for one composed region.
//!
//! The [`InteractionOrchestrator`] receives raw key, pointer and resize
//! events for a region and routes them:
//!
//! - Tab and Shift+Tab go to the region's [`FocusTrapSession`], if any.
//! - Arrow keys move focus within the navigation group via
//!   [`next_index`](crate::navigation::next_index).
//! - Home and End move within the group when focus is in it, and otherwise
//!   go to the focus trap.
//! - Pointer-down focuses the pressed element and plays press feedback unless
//!   the user prefers reduced motion.
//! - Resize re-audits the group's touch targets.
//!
//! Chorded presses (Ctrl, Alt, Meta) are never consumed so that platform
//! shortcuts keep working.

use std::fmt;
use std::sync::Arc;

use nibble_core::logging::targets;
use nibble_core::{PerfSpan, Point};

use crate::announcer::Announcer;
use crate::config::A11yConfig;
use crate::element::{ElementId, FocusableElement, RegionId};
use crate::feedback::{FeedbackSink, NullFeedback};
use crate::focus::{FocusTrapSession, SharedFocusHost};
use crate::geometry::{TouchTargetResult, audit_touch_target, validate_touch_target};
use crate::keyboard::{Key, KeyInput, KeyOutcome};
use crate::navigation::{NavigationTopology, next_index};
use crate::preferences::{EnvironmentPreferences, StaticPreferences};

/// Routes UI events for one region to focus, navigation and feedback.
pub struct InteractionOrchestrator {
    host: SharedFocusHost,
    region: RegionId,
    group: Vec<ElementId>,
    topology: NavigationTopology,
    session: Option<FocusTrapSession>,
    announcer: Option<Announcer>,
    preferences: Arc<dyn EnvironmentPreferences>,
    feedback: Box<dyn FeedbackSink>,
    config: A11yConfig,
}

impl InteractionOrchestrator {
    /// Start building an orchestrator for `region`.
    pub fn builder(host: SharedFocusHost, region: RegionId) -> InteractionOrchestratorBuilder {
        InteractionOrchestratorBuilder::new(host, region)
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn topology(&self) -> &NavigationTopology {
        &self.topology
    }

    pub fn config(&self) -> &A11yConfig {
        &self.config
    }

    /// The region's focus trap, if it has one.
    pub fn session(&self) -> Option<&FocusTrapSession> {
        self.session.as_ref()
    }

    /// Replace the navigation group.
    ///
    /// An empty group means every interactive element of the region.
    pub fn set_group(&mut self, group: Vec<ElementId>) {
        self.group = group;
    }

    /// The navigation group's current members, in navigation order.
    ///
    /// Members that are disabled, hidden, or have an empty box are skipped.
    /// Queried from the host on every call.
    pub fn group_elements(&self) -> Vec<FocusableElement> {
        let candidates = self.host.lock().focusable_candidates(self.region);
        if self.group.is_empty() {
            return candidates.into_iter().filter(FocusableElement::is_interactive).collect();
        }
        self.group
            .iter()
            .filter_map(|id| candidates.iter().find(|el| el.id == *id))
            .filter(|el| el.is_interactive())
            .cloned()
            .collect()
    }

    /// Route a key press.
    pub fn on_key(&self, input: KeyInput) -> KeyOutcome {
        if input.modifiers.has_command() {
            return KeyOutcome::Ignored;
        }

        match input.key {
            Key::Tab => self.delegate_to_session(input),
            key if key.is_arrow() => self.navigate(key).unwrap_or(KeyOutcome::Ignored),
            Key::Home | Key::End => self
                .navigate(input.key)
                .unwrap_or_else(|| self.delegate_to_session(input)),
            _ => KeyOutcome::Ignored,
        }
    }

    fn delegate_to_session(&self, input: KeyInput) -> KeyOutcome {
        self.session
            .as_ref()
            .map_or(KeyOutcome::Ignored, |session| session.handle_key(input))
    }

    /// Move within the group. `None` if focus is not in the group.
    fn navigate(&self, key: Key) -> Option<KeyOutcome> {
        let elements = self.group_elements();
        let active = self.host.lock().active_element()?;
        let current = elements.iter().position(|el| el.id == active)?;

        let next = next_index(key, current, elements.len(), &self.topology);
        if next == current {
            return Some(KeyOutcome::Ignored);
        }

        let target = &elements[next];
        if !self.host.lock().focus(target.id) {
            return Some(KeyOutcome::Ignored);
        }
        tracing::trace!(target: targets::NAVIGATION, ?key, from = current, to = next, element = %target.id, "focus moved");

        if let (true, Some(announcer), Some(label)) =
            (self.config.feedback.announce_navigation, &self.announcer, &target.label)
        {
            announcer.announce_polite(label);
        }
        Some(KeyOutcome::Handled)
    }

    /// Handle a press on `id` at `origin` (element-local units).
    ///
    /// Returns `true` if the element belongs to the group and was focused.
    pub fn on_pointer_down(&mut self, id: ElementId, origin: Point) -> bool {
        if !self.group_elements().iter().any(|el| el.id == id) {
            return false;
        }
        if !self.host.lock().focus(id) {
            return false;
        }

        if self.preferences.prefers_reduced_motion() {
            tracing::trace!(target: targets::INTERACTION, element = %id, "reduced motion, feedback skipped");
            return true;
        }

        let config = &self.config.feedback;
        if config.ripple {
            if let Err(err) = self.feedback.ripple(id, origin) {
                tracing::debug!(target: targets::INTERACTION, element = %id, %err, "ripple unavailable");
            }
        }
        if config.haptics {
            if let Err(err) = self.feedback.haptic_pulse(config.haptic_pulse()) {
                tracing::debug!(target: targets::INTERACTION, element = %id, %err, "haptic pulse unavailable");
            }
        }
        true
    }

    /// Re-validate every group member's touch target after a layout change.
    pub fn on_resize(&self) -> Vec<(ElementId, TouchTargetResult)> {
        let _span = PerfSpan::new("touch_target_audit");
        let warn = self.config.touch_targets.warn_below_minimum;

        self.group_elements()
            .into_iter()
            .map(|el| {
                let result = if warn {
                    audit_touch_target(el.id, el.rect)
                } else {
                    validate_touch_target(el.rect)
                };
                (el.id, result)
            })
            .collect()
    }

    /// Check if a forced-colors palette is active.
    pub fn forced_colors_active(&self) -> bool {
        self.preferences.forced_colors_active()
    }

    pub fn prefers_reduced_motion(&self) -> bool {
        self.preferences.prefers_reduced_motion()
    }
}

impl fmt::Debug for InteractionOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionOrchestrator")
            .field("region", &self.region)
            .field("group", &self.group)
            .field("topology", &self.topology)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Builder for [`InteractionOrchestrator`].
pub struct InteractionOrchestratorBuilder {
    host: SharedFocusHost,
    region: RegionId,
    group: Vec<ElementId>,
    topology: NavigationTopology,
    session: Option<FocusTrapSession>,
    announcer: Option<Announcer>,
    preferences: Arc<dyn EnvironmentPreferences>,
    feedback: Box<dyn FeedbackSink>,
    config: A11yConfig,
}

impl InteractionOrchestratorBuilder {
    fn new(host: SharedFocusHost, region: RegionId) -> Self {
        Self {
            host,
            region,
            group: Vec::new(),
            topology: NavigationTopology::default(),
            session: None,
            announcer: None,
            preferences: Arc::new(StaticPreferences::default()),
            feedback: Box::new(NullFeedback),
            config: A11yConfig::default(),
        }
    }

    /// Restrict arrow navigation to these elements, in this order.
    pub fn group(mut self, group: impl IntoIterator<Item = ElementId>) -> Self {
        self.group = group.into_iter().collect();
        self
    }

    pub fn topology(mut self, topology: NavigationTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Trap focus in the region with `session`.
    pub fn session(mut self, session: FocusTrapSession) -> Self {
        self.session = Some(session);
        self
    }

    pub fn announcer(mut self, announcer: Announcer) -> Self {
        self.announcer = Some(announcer);
        self
    }

    pub fn preferences(mut self, preferences: Arc<dyn EnvironmentPreferences>) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn feedback<F: FeedbackSink + 'static>(mut self, feedback: F) -> Self {
        self.feedback = Box::new(feedback);
        self
    }

    pub fn config(mut self, config: A11yConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> InteractionOrchestrator {
        InteractionOrchestrator {
            host: self.host,
            region: self.region,
            group: self.group,
            topology: self.topology,
            session: self.session,
            announcer: self.announcer,
            preferences: self.preferences,
            feedback: self.feedback,
            config: self.config,
        }
    }
}
