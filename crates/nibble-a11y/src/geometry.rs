//! Touch-target size validation.
//!
//! Interactive controls need a hit area of at least 44×44 density-independent
//! units, and 48×48 is recommended. Both dimensions must meet a threshold for
//! it to count.
//!
//! Validation is O(1) and side-effect free. Layout can change at any time, so
//! results are never cached: the caller re-validates on resize.

use nibble_core::Rect;
use nibble_core::logging::targets;

use crate::element::ElementId;

/// Minimum touch-target edge length.
pub const MIN_TOUCH_TARGET: f32 = 44.0;
/// Recommended touch-target edge length.
pub const RECOMMENDED_TOUCH_TARGET: f32 = 48.0;

/// The measured size of a touch target and whether it meets each threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchTargetResult {
    pub width: f32,
    pub height: f32,
    pub meets_minimum: bool,
    pub meets_recommended: bool,
}

/// Sanitize a measured dimension: NaN, infinite, and negative sizes count as zero.
#[inline]
fn dimension(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Validate an element's bounding box against the touch-target thresholds.
pub fn validate_touch_target(rect: Rect) -> TouchTargetResult {
    let width = dimension(rect.width());
    let height = dimension(rect.height());
    let smallest = width.min(height);

    TouchTargetResult {
        width,
        height,
        meets_minimum: smallest >= MIN_TOUCH_TARGET,
        meets_recommended: smallest >= RECOMMENDED_TOUCH_TARGET,
    }
}

/// Validate a touch target and report undersized elements.
///
/// Elements below the minimum produce a `warn`-level diagnostic naming the
/// element. The interaction itself is never blocked.
pub fn audit_touch_target(id: ElementId, rect: Rect) -> TouchTargetResult {
    let result = validate_touch_target(rect);
    if !result.meets_minimum {
        tracing::warn!(
            target: targets::GEOMETRY,
            element = %id,
            width = result.width,
            height = result.height,
            minimum = MIN_TOUCH_TARGET,
            "touch target below minimum size"
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_minimum() {
        let result = validate_touch_target(Rect::from_size(40.0, 40.0));
        assert!(!result.meets_minimum);
        assert!(!result.meets_recommended);
    }

    #[test]
    fn test_minimum_only() {
        let result = validate_touch_target(Rect::from_size(44.0, 44.0));
        assert!(result.meets_minimum);
        assert!(!result.meets_recommended);
    }

    #[test]
    fn test_recommended() {
        let result = validate_touch_target(Rect::new(12.0, 80.0, 48.0, 48.0));
        assert!(result.meets_minimum);
        assert!(result.meets_recommended);
        assert_eq!(result.width, 48.0);
        assert_eq!(result.height, 48.0);
    }

    #[test]
    fn test_both_dimensions_required() {
        let wide = validate_touch_target(Rect::from_size(200.0, 30.0));
        assert!(!wide.meets_minimum);

        let tall = validate_touch_target(Rect::from_size(44.0, 120.0));
        assert!(tall.meets_minimum);
        assert!(!tall.meets_recommended);
    }

    #[test]
    fn test_degenerate_sizes() {
        let nan = validate_touch_target(Rect::from_size(f32::NAN, 50.0));
        assert_eq!(nan.width, 0.0);
        assert!(!nan.meets_minimum);

        let negative = validate_touch_target(Rect::from_size(-48.0, -48.0));
        assert_eq!(negative.width, 0.0);
        assert_eq!(negative.height, 0.0);

        let infinite = validate_touch_target(Rect::from_size(f32::INFINITY, 48.0));
        assert!(!infinite.meets_minimum);
    }

    #[test]
    fn test_audit_matches_validate() {
        let rect = Rect::from_size(30.0, 30.0);
        assert_eq!(audit_touch_target(ElementId(7), rect), validate_touch_target(rect));
    }
}
