//! Grid geometry for reach rectangles.
//!
//! All offsets are `(dy, dx)` pairs relative to the acting entity's cell.
//! Rows grow towards the south, so the cells in front of a north-facing actor
//! have a negative `dy`. Reach rectangles are always expressed as if the actor
//! faced north and are rotated into place with [`rotate_offset`].

use serde::{Deserialize, Serialize};

/// A cell offset `(dy, dx)` relative to an origin cell.
pub type CellOffset = (i32, i32);

/// Facing direction of an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction from a clockwise step count (0 = north), wrapping modulo 4.
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.rem_euclid(4) as usize]
    }

    pub fn index(self) -> i32 {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// Rotate one step clockwise (west wraps to north).
    pub fn rotated_cw(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Rotate one step counter-clockwise (north wraps to west).
    pub fn rotated_ccw(self) -> Self {
        Self::from_index(self.index() - 1)
    }
}

/// Map a north-relative offset to the offset for the given facing.
#[inline]
pub fn rotate_offset(dy: i32, dx: i32, direction: Direction) -> CellOffset {
    match direction {
        Direction::North => (dy, dx),
        Direction::East => (dx, -dy),
        Direction::South => (-dy, -dx),
        Direction::West => (-dx, dy),
    }
}

/// Upper bound on the cells `sweep` reserves up front.
const MAX_PREALLOCATED_CELLS: usize = 4096;

fn clamp_extent(extent: u32) -> i32 {
    i32::try_from(extent.max(1)).unwrap_or(i32::MAX)
}

/// Integer rectangle in cell-offset coordinates.
///
/// `x`/`y` is the top-left cell; `right()` and `bottom()` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Rect {
    /// Create a rectangle. Width and height are raised to at least one cell
    /// and capped at `i32::MAX`.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width: clamp_extent(width),
            height: clamp_extent(height),
        }
    }

    /// The single cell the actor stands on.
    pub fn single() -> Self {
        Self::new(0, 0, 1, 1)
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn is_single_cell(&self) -> bool {
        self.width == 1 && self.height == 1
    }

    pub fn contains(&self, dy: i32, dx: i32) -> bool {
        dx >= self.x && dx < self.right() && dy >= self.y && dy < self.bottom()
    }

    /// All cells in row-major order, top row first.
    pub fn cells(&self) -> impl Iterator<Item = CellOffset> + '_ {
        (self.y..self.bottom()).flat_map(move |dy| (self.x..self.right()).map(move |dx| (dy, dx)))
    }
}

/// Bounding rectangle of `rect` after every cell is rotated by `direction`.
pub fn rotate_rect(rect: Rect, direction: Direction) -> Rect {
    let (w, h) = (rect.width(), rect.height());
    match direction {
        Direction::North => rect,
        Direction::East => Rect::new((rect.bottom() - 1).saturating_neg(), rect.x(), h, w),
        Direction::South => Rect::new(
            (rect.right() - 1).saturating_neg(),
            (rect.bottom() - 1).saturating_neg(),
            w,
            h,
        ),
        Direction::West => Rect::new(rect.y(), (rect.right() - 1).saturating_neg(), h, w),
    }
}

/// Re-express a rectangle given relative to a selection anchor relative to
/// the anchor itself.
pub fn offset_rect(rect: Rect, anchor_x: i32, anchor_y: i32) -> Rect {
    Rect::new(
        rect.x() - anchor_x,
        rect.y() - anchor_y,
        rect.width(),
        rect.height(),
    )
}

/// Ordered cell sequence covering `rect`.
///
/// A rectangle that reaches from the actor's row into the rows behind it is
/// swept in two passes: columns left to right walking from the actor's row
/// up to the top, then columns right to left walking the rows behind the
/// actor downwards. Any other rectangle is swept column by column, bottom
/// row first. A 1x1 rectangle always yields only `(0, 0)`.
pub fn sweep(rect: Rect, yield_center: bool) -> Vec<CellOffset> {
    if rect.is_single_cell() {
        return vec![(0, 0)];
    }

    let top = rect.y();
    let last_row = rect.bottom() - 1;
    let columns = rect.x()..rect.right();
    let keep = |cell: &CellOffset| yield_center || *cell != (0, 0);

    let mut cells = Vec::with_capacity(rect.cell_count().min(MAX_PREALLOCATED_CELLS));
    if top <= 0 && last_row > 0 {
        for dx in columns.clone() {
            cells.extend((top..=0).rev().map(|dy| (dy, dx)).filter(keep));
        }
        for dx in columns.rev() {
            cells.extend((1..=last_row).map(|dy| (dy, dx)));
        }
    } else {
        for dx in columns {
            cells.extend((top..=last_row).rev().map(|dy| (dy, dx)).filter(keep));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_direction_wraps() {
        assert_eq!(Direction::West.rotated_cw(), Direction::North);
        assert_eq!(Direction::North.rotated_ccw(), Direction::West);
        assert_eq!(Direction::from_index(5), Direction::East);
        assert_eq!(Direction::from_index(-1), Direction::West);
        for dir in Direction::ALL {
            assert_eq!(dir.rotated_cw().rotated_ccw(), dir);
        }
    }

    #[test]
    fn test_rotation_is_cyclic_of_order_four() {
        for &(dy, dx) in &[(-1, 0), (-2, 3), (4, -1), (0, 0), (7, 7)] {
            let mut cell = (dy, dx);
            for _ in 0..4 {
                cell = rotate_offset(cell.0, cell.1, Direction::East);
            }
            assert_eq!(cell, (dy, dx));

            let east_twice = {
                let once = rotate_offset(dy, dx, Direction::East);
                rotate_offset(once.0, once.1, Direction::East)
            };
            assert_eq!(east_twice, rotate_offset(dy, dx, Direction::South));
        }
    }

    #[test]
    fn test_rotation_facing() {
        // The cell straight ahead of a north-facing actor.
        assert_eq!(rotate_offset(-1, 0, Direction::North), (-1, 0));
        assert_eq!(rotate_offset(-1, 0, Direction::East), (0, 1));
        assert_eq!(rotate_offset(-1, 0, Direction::South), (1, 0));
        assert_eq!(rotate_offset(-1, 0, Direction::West), (0, -1));
    }

    #[test]
    fn test_sweep_single_cell() {
        assert_eq!(sweep(Rect::single(), false), vec![(0, 0)]);
        assert_eq!(sweep(Rect::new(2, -3, 1, 1), false), vec![(0, 0)]);
        assert_eq!(sweep(Rect::new(2, -3, 1, 1), true), vec![(0, 0)]);
    }

    #[test]
    fn test_sweep_around_actor_order() {
        let cells = sweep(Rect::new(-1, -1, 3, 3), false);
        assert_eq!(
            cells,
            vec![
                (0, -1),
                (-1, -1),
                (-1, 0),
                (0, 1),
                (-1, 1),
                (1, 1),
                (1, 0),
                (1, -1),
            ]
        );
    }

    #[test]
    fn test_sweep_in_front_order() {
        let cells = sweep(Rect::new(-1, -2, 3, 2), false);
        assert_eq!(
            cells,
            vec![(-1, -1), (-2, -1), (-1, 0), (-2, 0), (-1, 1), (-2, 1)]
        );
    }

    #[test]
    fn test_sweep_visits_every_cell_once() {
        let rects = [
            Rect::new(-3, -3, 7, 7),
            Rect::new(-3, -3, 7, 4),
            Rect::new(0, 1, 2, 3),
            Rect::new(-2, -5, 5, 2),
            Rect::new(1, -1, 1, 4),
        ];
        for rect in rects {
            let cells = sweep(rect, true);
            let unique: HashSet<_> = cells.iter().copied().collect();
            assert_eq!(cells.len(), rect.cell_count(), "{:?}", rect);
            assert_eq!(unique.len(), cells.len(), "{:?}", rect);
            assert!(cells.iter().all(|&(dy, dx)| rect.contains(dy, dx)));

            let without_center = sweep(rect, false);
            let expected = if rect.contains(0, 0) {
                rect.cell_count() - 1
            } else {
                rect.cell_count()
            };
            assert_eq!(without_center.len(), expected, "{:?}", rect);
            assert!(!without_center.contains(&(0, 0)));
        }
    }

    #[test]
    fn test_rotate_rect_matches_offsets() {
        let rect = Rect::new(-2, -3, 5, 4);
        for dir in Direction::ALL {
            let rotated = rotate_rect(rect, dir);
            assert_eq!(rotated.cell_count(), rect.cell_count());
            for (dy, dx) in rect.cells() {
                let (ry, rx) = rotate_offset(dy, dx, dir);
                assert!(rotated.contains(ry, rx), "{:?} {:?}", dir, (dy, dx));
            }
        }
    }

    #[test]
    fn test_offset_rect() {
        let rect = offset_rect(Rect::new(4, 2, 3, 2), 5, 4);
        assert_eq!(rect, Rect::new(-1, -2, 3, 2));
    }

    #[test]
    fn test_rect_minimum_size() {
        let rect = Rect::new(0, 0, 0, 0);
        assert!(rect.is_single_cell());
    }

    #[test]
    fn test_rect_extent_is_capped() {
        let rect = Rect::new(0, 0, u32::MAX, 3_000_000_000);
        assert_eq!(rect.width(), i32::MAX as u32);
        assert_eq!(rect.height(), i32::MAX as u32);
        assert_eq!(rect.right(), i32::MAX);
        assert!(rect.cell_count() > 0);
    }
}
