//! Element snapshots supplied by the rendering layer.
//!
//! The engine never owns UI controls. The host hands it transient
//! [`FocusableElement`] snapshots and identifies elements by opaque
//! [`ElementId`] handles.

use std::fmt;

use nibble_core::Rect;

/// An opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ElementId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

/// An opaque handle to a host container (a dialog, a sheet, a toolbar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "region#{}", self.0)
    }
}

/// A snapshot of a focusable control.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusableElement {
    pub id: ElementId,
    /// Bounding box in density-independent units.
    pub rect: Rect,
    pub disabled: bool,
    pub aria_hidden: bool,
    /// CSS visibility. `false` for `visibility: hidden` or `display: none`.
    pub visible: bool,
    /// The `tabindex` hint.
    ///
    /// Positive values come first in ascending order, then zero in document
    /// order. Negative values are focusable programmatically but excluded
    /// from the tab sequence.
    pub tab_order: i32,
    /// Accessible name, used for announcements.
    pub label: Option<String>,
}

impl FocusableElement {
    /// A visible, enabled element in document order.
    pub fn new(id: ElementId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            disabled: false,
            aria_hidden: false,
            visible: true,
            tab_order: 0,
            label: None,
        }
    }

    /// Set the accessible name.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the `tabindex` hint.
    pub fn with_tab_order(mut self, tab_order: i32) -> Self {
        self.tab_order = tab_order;
        self
    }

    /// Mark the element disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Mark the element `aria-hidden`.
    pub fn aria_hidden(mut self) -> Self {
        self.aria_hidden = true;
        self
    }

    /// Mark the element invisible.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Check if the element can receive focus at all.
    ///
    /// Ignores `tab_order`: roving-tabindex groups park their inactive
    /// members at `-1` but still move focus to them with the arrow keys.
    pub fn is_interactive(&self) -> bool {
        !self.disabled
            && !self.aria_hidden
            && self.visible
            && self.rect.width() > 0.0
            && self.rect.height() > 0.0
    }

    /// Check if the element can take part in sequential focus navigation.
    pub fn is_eligible(&self) -> bool {
        self.is_interactive() && self.tab_order >= 0
    }
}

/// Filter and order candidates into the tab sequence.
///
/// Positive `tab_order` values come first (ascending, ties in document
/// order), then `tab_order == 0` in document order.
pub(crate) fn tab_sequence(candidates: Vec<FocusableElement>) -> Vec<FocusableElement> {
    let (mut positive, natural): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .filter(FocusableElement::is_eligible)
        .partition(|el| el.tab_order > 0);
    // sort_by_key is stable
    positive.sort_by_key(|el| el.tab_order);
    positive.extend(natural);
    positive
}
