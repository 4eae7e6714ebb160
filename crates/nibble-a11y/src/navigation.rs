//! Arrow-key navigation across lists and grids.
//!
//! [`next_index`] is a pure, total state transition: given a key, the current
//! index, the number of items, and a [`NavigationTopology`], it returns the
//! index that should receive focus. It never panics and never fails:
//!
//! - an empty group or an unrecognized key leaves the index unchanged;
//! - `Home` and `End` jump to the first and last item;
//! - in a list, Left/Up step back and Right/Down step forward;
//! - in a grid, Left/Right step through the flattened order and Up/Down move
//!   a whole row, keeping the column.
//!
//! At a boundary, `wrap` moves to the opposite end (or opposite row in a grid);
//! without `wrap` the index stays put.
//!
//! # Ragged grids
//!
//! The last row of a grid may be short. A vertical move whose target would be
//! past the end clamps to the last item rather than wrapping into another
//! column, so focus never lands on a cell that does not exist:
//!
//! ```
//! use nibble_a11y::keyboard::Key;
//! use nibble_a11y::navigation::{next_index, NavigationTopology};
//!
//! // 0 1 2
//! // 3 4 5
//! // 6
//! let grid = NavigationTopology::grid(3, false);
//! assert_eq!(next_index(Key::ArrowDown, 1, 7, &grid), 4);
//! assert_eq!(next_index(Key::ArrowDown, 4, 7, &grid), 6);
//! ```

use crate::keyboard::Key;

/// Which arrow keys a group responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// Left/Right only.
    Horizontal,
    /// Up/Down only.
    Vertical,
    /// All four arrows.
    #[default]
    Both,
}

impl Axis {
    fn horizontal(self) -> bool {
        matches!(self, Axis::Horizontal | Axis::Both)
    }

    fn vertical(self) -> bool {
        matches!(self, Axis::Vertical | Axis::Both)
    }
}

/// The shape of a navigation group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigationTopology {
    /// Number of columns for a grid; `None` (or zero) for a list.
    pub columns: Option<usize>,
    /// Wrap around at the boundaries instead of stopping.
    pub wrap: bool,
    /// Which arrow keys are active.
    pub axis: Axis,
}

impl Default for NavigationTopology {
    fn default() -> Self {
        Self::linear(true)
    }
}

impl NavigationTopology {
    /// A one-dimensional list.
    pub const fn linear(wrap: bool) -> Self {
        Self {
            columns: None,
            wrap,
            axis: Axis::Both,
        }
    }

    /// A row-major grid with `columns` columns.
    pub const fn grid(columns: usize, wrap: bool) -> Self {
        Self {
            columns: Some(columns),
            wrap,
            axis: Axis::Both,
        }
    }

    /// Restrict which arrow keys the group responds to.
    pub const fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// The column count, if this is a usable grid.
    pub fn grid_columns(&self) -> Option<usize> {
        self.columns.filter(|&c| c > 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Backward,
    Forward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motion {
    First,
    Last,
    Item(Step),
    Row(Step, usize),
}

fn motion_for(key: Key, topology: &NavigationTopology) -> Option<Motion> {
    let axis = topology.axis;
    let vertical_step = |step| match topology.grid_columns() {
        Some(columns) => Motion::Row(step, columns),
        None => Motion::Item(step),
    };

    match key {
        Key::Home => Some(Motion::First),
        Key::End => Some(Motion::Last),
        Key::ArrowLeft if axis.horizontal() => Some(Motion::Item(Step::Backward)),
        Key::ArrowRight if axis.horizontal() => Some(Motion::Item(Step::Forward)),
        Key::ArrowUp if axis.vertical() => Some(vertical_step(Step::Backward)),
        Key::ArrowDown if axis.vertical() => Some(vertical_step(Step::Forward)),
        _ => None,
    }
}

/// Compute the index that should receive focus after `key`.
///
/// `current` past the end is treated as the last item. See the
/// [module documentation](self) for the full rules.
pub fn next_index(key: Key, current: usize, count: usize, topology: &NavigationTopology) -> usize {
    if count == 0 {
        return current;
    }
    let Some(motion) = motion_for(key, topology) else {
        return current;
    };

    let last = count - 1;
    let current = current.min(last);
    let wrap = topology.wrap;

    match motion {
        Motion::First => 0,
        Motion::Last => last,
        Motion::Item(Step::Forward) => {
            if current < last {
                current + 1
            } else if wrap {
                0
            } else {
                last
            }
        }
        Motion::Item(Step::Backward) => {
            if current > 0 {
                current - 1
            } else if wrap {
                last
            } else {
                0
            }
        }
        Motion::Row(step, columns) => row_step(step, current, last, columns, wrap),
    }
}

fn row_step(step: Step, current: usize, last: usize, columns: usize, wrap: bool) -> usize {
    let row = current / columns;
    let col = current % columns;
    let last_row = last / columns;

    match step {
        Step::Forward if row < last_row => (current + columns).min(last),
        // Row 0 is always full up to `col` because `current` is in it or below it.
        Step::Forward if wrap => col,
        Step::Backward if row > 0 => current - columns,
        Step::Backward if wrap => (last_row * columns + col).min(last),
        _ => current,
    }
}

/// A navigation group that tracks its own current index.
///
/// Convenience wrapper around [`next_index`] for callers that keep roving
/// focus state themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationGroup {
    topology: NavigationTopology,
    count: usize,
    current: usize,
}

impl NavigationGroup {
    /// Create a group of `count` items with the first item current.
    pub fn new(topology: NavigationTopology, count: usize) -> Self {
        Self {
            topology,
            count,
            current: 0,
        }
    }

    /// The current index.
    pub fn current(&self) -> usize {
        self.current
    }

    /// The number of items.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if the group has no items.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn topology(&self) -> &NavigationTopology {
        &self.topology
    }

    /// Set the current index, clamped to the group.
    pub fn set_current(&mut self, index: usize) {
        self.current = index.min(self.count.saturating_sub(1));
    }

    /// Update the item count after the content changed.
    pub fn set_len(&mut self, count: usize) {
        self.count = count;
        self.set_current(self.current);
    }

    /// Apply a key press.
    ///
    /// Returns the new index if it changed.
    pub fn handle_key(&mut self, key: Key) -> Option<usize> {
        let next = next_index(key, self.current, self.count, &self.topology);
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }
}
