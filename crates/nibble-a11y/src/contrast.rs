//! Color contrast validation against WCAG 2.x thresholds.
//!
//! Contrast is computed from the relative luminance of two sRGB colors:
//!
//! ```text
//! c = channel / 255
//! c' = c <= 0.03928 ? c / 12.92 : ((c + 0.055) / 1.055) ^ 2.4
//! L  = 0.2126 R' + 0.7152 G' + 0.0722 B'
//! ratio = (L_lighter + 0.05) / (L_darker + 0.05)
//! ```
//!
//! The ratio is symmetric in its arguments and always lies in `[1, 21]`.
//!
//! These functions are a best-effort diagnostic. A malformed color never
//! raises: it is treated as producing the minimum ratio of `1.0`, which
//! fails every threshold.
//!
//! # Example
//!
//! ```
//! use nibble_a11y::contrast::{validate_contrast, ContrastLevel};
//!
//! let result = validate_contrast("#FFFFFF", "#000000", false);
//! assert_eq!(result.ratio, 21.0);
//! assert!(result.passes);
//! assert_eq!(result.level, ContrastLevel::Aaa);
//! ```

use nibble_core::Rgb;
use nibble_core::logging::targets;

use crate::error::Result;

/// The lowest possible contrast ratio (identical colors).
pub const MIN_RATIO: f64 = 1.0;
/// The highest possible contrast ratio (black on white).
pub const MAX_RATIO: f64 = 21.0;

/// AA threshold for normal-size text.
pub const AA_NORMAL_TEXT: f64 = 4.5;
/// AA threshold for large text and UI components.
pub const AA_LARGE_TEXT: f64 = 3.0;
/// AAA threshold for normal-size text.
pub const AAA_NORMAL_TEXT: f64 = 7.0;
/// AAA threshold for large text.
pub const AAA_LARGE_TEXT: f64 = 4.5;

/// WCAG conformance level reached by a color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContrastLevel {
    /// Meets the enhanced (AAA) threshold.
    Aaa,
    /// Meets the minimum (AA) threshold only.
    Aa,
    /// Below the AA threshold.
    Fail,
}

impl ContrastLevel {
    /// Returns the level name as used in audit reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aaa => "AAA",
            Self::Aa => "AA",
            Self::Fail => "fail",
        }
    }
}

/// The outcome of validating a foreground/background pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContrastResult {
    /// The contrast ratio, in `[1, 21]`.
    pub ratio: f64,
    /// The AA ratio required for the requested text size.
    pub required_ratio: f64,
    /// Whether the pair meets AA for the requested text size.
    pub passes: bool,
    /// The highest level reached.
    pub level: ContrastLevel,
}

/// Thresholds for one text size.
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    aa: f64,
    aaa: f64,
}

impl Thresholds {
    fn for_text(is_large_text: bool) -> Self {
        if is_large_text {
            Self {
                aa: AA_LARGE_TEXT,
                aaa: AAA_LARGE_TEXT,
            }
        } else {
            Self {
                aa: AA_NORMAL_TEXT,
                aaa: AAA_NORMAL_TEXT,
            }
        }
    }
}

/// Gamma-expand one sRGB channel given as a fraction.
#[inline]
fn linearize(c: f64) -> f64 {
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Calculate the relative luminance of a color.
pub fn relative_luminance(color: Rgb) -> f64 {
    let [r, g, b] = color.to_unit();
    0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
}

/// Contrast ratio between two parsed colors.
pub fn contrast_ratio_rgb(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    ((lighter + 0.05) / (darker + 0.05)).clamp(MIN_RATIO, MAX_RATIO)
}

/// Contrast ratio between two hex color strings.
///
/// Returns [`MIN_RATIO`] if either color is malformed.
pub fn contrast_ratio(a: &str, b: &str) -> f64 {
    match (parse_lenient(a), parse_lenient(b)) {
        (Some(a), Some(b)) => contrast_ratio_rgb(a, b),
        _ => MIN_RATIO,
    }
}

/// Validate a foreground/background pair.
///
/// Normal text needs 4.5:1 (AA) and 7:1 (AAA); large text and UI components
/// need 3:1 (AA) and 4.5:1 (AAA).
pub fn validate_contrast(foreground: &str, background: &str, is_large_text: bool) -> ContrastResult {
    classify(contrast_ratio(foreground, background), is_large_text)
}

/// Validate a foreground/background pair, rejecting malformed colors.
///
/// Use this in tooling (design-token linting, theme checks) where a typo in a
/// color should be reported instead of failing silently.
pub fn try_validate_contrast(foreground: &str, background: &str, is_large_text: bool) -> Result<ContrastResult> {
    let foreground = Rgb::from_hex(foreground)?;
    let background = Rgb::from_hex(background)?;
    Ok(validate_contrast_rgb(foreground, background, is_large_text))
}

/// Validate a pair of parsed colors.
pub fn validate_contrast_rgb(foreground: Rgb, background: Rgb, is_large_text: bool) -> ContrastResult {
    classify(contrast_ratio_rgb(foreground, background), is_large_text)
}

fn classify(ratio: f64, is_large_text: bool) -> ContrastResult {
    let thresholds = Thresholds::for_text(is_large_text);
    let level = if ratio >= thresholds.aaa {
        ContrastLevel::Aaa
    } else if ratio >= thresholds.aa {
        ContrastLevel::Aa
    } else {
        ContrastLevel::Fail
    };

    ContrastResult {
        ratio,
        required_ratio: thresholds.aa,
        passes: level != ContrastLevel::Fail,
        level,
    }
}

fn parse_lenient(input: &str) -> Option<Rgb> {
    match Rgb::from_hex(input) {
        Ok(color) => Some(color),
        Err(err) => {
            tracing::debug!(target: targets::CONTRAST, %err, "malformed color, using minimum contrast");
            None
        }
    }
}
