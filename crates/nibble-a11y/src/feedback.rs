//! Tactile and visual press feedback.
//!
//! On pointer-down the engine asks a [`FeedbackSink`] for a ripple at the
//! press point and a short haptic pulse. Both are cosmetic: an error from the
//! sink is logged and otherwise ignored by the caller.

use std::time::Duration;

use nibble_core::Point;

use crate::element::ElementId;

/// Errors reported by a feedback sink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedbackError {
    /// The platform has no such capability (no vibration motor, no compositor).
    #[error("{0} feedback is not supported on this platform")]
    Unsupported(&'static str),

    /// The platform call failed.
    #[error("feedback failed: {0}")]
    Failed(String),
}

impl FeedbackError {
    /// Create a failure error.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Host-side feedback effects.
pub trait FeedbackSink: Send {
    /// Start a ripple on `element` centered at `origin` (element-local units).
    fn ripple(&mut self, element: ElementId, origin: Point) -> Result<(), FeedbackError>;

    /// Vibrate for `duration`.
    fn haptic_pulse(&mut self, duration: Duration) -> Result<(), FeedbackError>;
}

/// A sink without any feedback capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn ripple(&mut self, _element: ElementId, _origin: Point) -> Result<(), FeedbackError> {
        Err(FeedbackError::Unsupported("ripple"))
    }

    fn haptic_pulse(&mut self, _duration: Duration) -> Result<(), FeedbackError> {
        Err(FeedbackError::Unsupported("haptic"))
    }
}
