//! Reach rules for tool selections.
//!
//! A selection is a rectangle of north-relative offsets around the tool
//! holder. Tools without `reach_behind` can only target rows in front of
//! the holder.

use crate::components::Tool;
use crate::geometry::{CellOffset, Rect};

/// Offsets orthogonally adjacent to the holder.
const ADJACENT: [CellOffset; 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Normalized rectangle spanning two corner cells given as `(dy, dx)`.
pub fn selection_bounds(start: CellOffset, end: CellOffset) -> Rect {
    let (top, bottom) = (start.0.min(end.0), start.0.max(end.0));
    let (left, right) = (start.1.min(end.1), start.1.max(end.1));
    Rect::new(
        left,
        top,
        right.abs_diff(left).saturating_add(1),
        bottom.abs_diff(top).saturating_add(1),
    )
}

impl Tool {
    /// Whether a single cell lies within the tool's reach.
    pub fn is_cell_in_reach(&self, dy: i32, dx: i32) -> bool {
        let v = self.v_reach as i32;
        let h = self.h_reach as i32;
        let row_ok = (-v..=0).contains(&dy) || (self.reach_behind && (0..=v).contains(&dy));
        row_ok && (-h..=h).contains(&dx)
    }

    /// Whether a selection rectangle can be used with this tool.
    ///
    /// Without reach-behind the selection must stay strictly in front of the
    /// holder's row. Any selection must touch a cell next to the holder.
    pub fn is_selection_valid(&self, rect: Rect) -> bool {
        if !self.reach_behind && rect.bottom() - 1 >= 0 {
            return false;
        }
        ADJACENT.iter().any(|&(dy, dx)| rect.contains(dy, dx))
    }

    /// Whether every cell of the selection is within reach.
    pub fn is_rect_in_reach(&self, rect: Rect) -> bool {
        rect.cells().all(|(dy, dx)| self.is_cell_in_reach(dy, dx))
    }
}
