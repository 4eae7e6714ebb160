//! Engine configuration.
//!
//! Every field has a default, so a configuration file only needs the values it
//! changes:
//!
//! ```
//! use std::time::Duration;
//! use nibble_a11y::config::A11yConfig;
//!
//! let config = A11yConfig::from_toml_str(r#"
//!     [announcer]
//!     clear_delay_ms = 2500
//!
//!     [focus]
//!     auto_focus = true
//! "#).unwrap();
//!
//! assert_eq!(config.announcer.clear_delay(), Duration::from_millis(2500));
//! assert_eq!(config.announcer.settle_delay(), Duration::from_millis(100));
//! assert!(config.focus.auto_focus);
//! assert!(config.focus.trap_focus);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct A11yConfig {
    pub announcer: AnnouncerConfig,
    pub focus: FocusConfig,
    pub feedback: FeedbackConfig,
    pub touch_targets: TouchTargetConfig,
}

impl A11yConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&source)
    }

    /// Serialize as pretty-printed TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let source = self.to_toml_string()?;
        std::fs::write(path, source).map_err(|e| Error::io(path, e))
    }
}

/// Live-region timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncerConfig {
    /// Delay between clearing the region and writing the message, so that
    /// assistive technology notices the change.
    pub settle_delay_ms: u64,
    /// How long a written message stays in the region.
    pub clear_delay_ms: u64,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 100,
            clear_delay_ms: 1000,
        }
    }
}

impl AnnouncerConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }
}

/// Default focus-trap behavior for new sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Keep Tab and Shift+Tab cycling inside the region.
    pub trap_focus: bool,
    /// Return focus to the previously focused element on teardown.
    pub restore_focus: bool,
    /// Focus the first element after activation.
    pub auto_focus: bool,
    /// Delay before auto-focus, giving the region time to render.
    pub settle_delay_ms: u64,
    /// Delay before focus is restored on teardown.
    pub restore_delay_ms: u64,
    /// Announce the label of the auto-focused element.
    pub announce_auto_focus: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            trap_focus: true,
            restore_focus: true,
            auto_focus: false,
            settle_delay_ms: 100,
            restore_delay_ms: 0,
            announce_auto_focus: true,
        }
    }
}

impl FocusConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn restore_delay(&self) -> Duration {
        Duration::from_millis(self.restore_delay_ms)
    }
}

/// Press feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Show a ripple on pointer-down.
    pub ripple: bool,
    /// Vibrate on pointer-down.
    pub haptics: bool,
    pub haptic_pulse_ms: u64,
    /// Announce the label of the element reached by arrow navigation.
    pub announce_navigation: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            ripple: true,
            haptics: true,
            haptic_pulse_ms: 10,
            announce_navigation: false,
        }
    }
}

impl FeedbackConfig {
    pub fn haptic_pulse(&self) -> Duration {
        Duration::from_millis(self.haptic_pulse_ms)
    }
}

/// Touch-target auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchTargetConfig {
    /// Emit a warning for each element below the minimum size.
    pub warn_below_minimum: bool,
}

impl Default for TouchTargetConfig {
    fn default() -> Self {
        Self {
            warn_below_minimum: true,
        }
    }
}
