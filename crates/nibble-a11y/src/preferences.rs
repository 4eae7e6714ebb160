//! User environment preferences.
//!
//! The engine consults two environment flags: `prefers-reduced-motion`
//! (suppresses ripple and haptic feedback) and `forced-colors` (exposed to the
//! styling layer). They are read through the [`EnvironmentPreferences`] trait
//! so that the host can back them with whatever platform query it has.
//!
//! ```
//! use nibble_a11y::preferences::{EnvironmentPreferences, StaticPreferences};
//!
//! let prefs = StaticPreferences::new().with_reduced_motion(true);
//! assert!(prefs.prefers_reduced_motion());
//! assert!(prefs.matches("(prefers-reduced-motion: reduce)"));
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Source of the user's environment preferences.
pub trait EnvironmentPreferences: Send + Sync {
    /// The user asked the platform to minimize non-essential motion.
    fn prefers_reduced_motion(&self) -> bool;

    /// A forced-colors (high contrast) palette is active.
    fn forced_colors_active(&self) -> bool;
}

/// Fixed preference values.
///
/// Useful headless, in tests, and for hosts that read the platform once at
/// startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticPreferences {
    pub reduced_motion: bool,
    pub forced_colors: bool,
}

impl StaticPreferences {
    /// No preferences expressed.
    pub const fn new() -> Self {
        Self {
            reduced_motion: false,
            forced_colors: false,
        }
    }

    pub const fn with_reduced_motion(mut self, reduced_motion: bool) -> Self {
        self.reduced_motion = reduced_motion;
        self
    }

    pub const fn with_forced_colors(mut self, forced_colors: bool) -> Self {
        self.forced_colors = forced_colors;
        self
    }

    /// Evaluate a single media feature such as `(prefers-reduced-motion: reduce)`.
    ///
    /// Only the two features the engine tracks are recognized. A bare feature
    /// name matches when the preference is active. Unknown features and
    /// values never match.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        let query = query
            .strip_prefix('(')
            .and_then(|q| q.strip_suffix(')'))
            .unwrap_or(query);
        let (feature, value) = match query.split_once(':') {
            Some((feature, value)) => (feature.trim(), Some(value.trim())),
            None => (query.trim(), None),
        };

        match (feature.to_ascii_lowercase().as_str(), value.map(str::to_ascii_lowercase).as_deref()) {
            ("prefers-reduced-motion", None | Some("reduce")) => self.reduced_motion,
            ("prefers-reduced-motion", Some("no-preference")) => !self.reduced_motion,
            ("forced-colors", None | Some("active")) => self.forced_colors,
            ("forced-colors", Some("none")) => !self.forced_colors,
            _ => false,
        }
    }
}

impl EnvironmentPreferences for StaticPreferences {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn forced_colors_active(&self) -> bool {
        self.forced_colors
    }
}

/// Preferences that can change while the application runs.
///
/// Cloning produces another handle to the same values, so the host keeps one
/// handle to update from its platform change notifications and gives another
/// to the engine.
#[derive(Debug, Clone, Default)]
pub struct SharedPreferences {
    inner: Arc<RwLock<StaticPreferences>>,
}

impl SharedPreferences {
    pub fn new(initial: StaticPreferences) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial)),
        }
    }

    /// A copy of the current values.
    pub fn snapshot(&self) -> StaticPreferences {
        *self.inner.read()
    }

    pub fn set_reduced_motion(&self, reduced_motion: bool) {
        self.inner.write().reduced_motion = reduced_motion;
    }

    pub fn set_forced_colors(&self, forced_colors: bool) {
        self.inner.write().forced_colors = forced_colors;
    }
}

impl EnvironmentPreferences for SharedPreferences {
    fn prefers_reduced_motion(&self) -> bool {
        self.inner.read().reduced_motion
    }

    fn forced_colors_active(&self) -> bool {
        self.inner.read().forced_colors
    }
}
