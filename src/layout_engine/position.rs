use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Direction, GridLayout, Orientation};

/// A span of grid cells given by cut-line indices.
///
/// Indices are signed so that stepping past the grid produces an out of
/// range value that [`fit_position`] can clamp, rather than wrapping.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl GridPosition {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Windows whose positions share a cascade id occupy the same cell and
    /// are stacked together. The bottom edge is deliberately not part of it.
    pub fn cascade_id(self, layout: &GridLayout) -> (i32, i32, i32) {
        let fitted = fit_position(self, layout);
        (fitted.left, fitted.top, fitted.right)
    }

    pub fn is_full_grid(self, layout: &GridLayout) -> bool {
        fit_position(self, layout) == preset(Direction::Up, layout)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.left, self.top, self.right, self.bottom)
    }
}

/// Clamps every index into the legal range for `layout`.
///
/// Axes are clamped independently. If that leaves an axis empty or inverted
/// (`left >= right`), the trailing index is moved to one past the leading
/// one, which is always in range because the leading index is at most the
/// second to last cut line.
pub fn fit_position(position: GridPosition, layout: &GridLayout) -> GridPosition {
    let last_v = layout.last_v().max(1);
    let last_h = layout.last_h().max(1);
    let left = position.left.clamp(0, last_v - 1);
    let top = position.top.clamp(0, last_h - 1);
    let mut right = position.right.clamp(1, last_v);
    let mut bottom = position.bottom.clamp(1, last_h);
    if left >= right {
        right = left + 1;
    }
    if top >= bottom {
        bottom = top + 1;
    }
    GridPosition { left, top, right, bottom }
}

/// The canonical position a first press in `direction` lands on.
pub fn preset(direction: Direction, layout: &GridLayout) -> GridPosition {
    let last_v = layout.last_v();
    let last_h = layout.last_h();
    match direction {
        Direction::Left => GridPosition::new(0, 0, 1, last_h),
        Direction::Right => GridPosition::new(last_v - 1, 0, last_v, last_h),
        Direction::Up => GridPosition::new(0, 0, last_v, last_h),
        Direction::Down => GridPosition::new(0, last_h - 1, last_v, last_h),
    }
}

/// Computes where a move in `direction` takes a window.
///
/// `current` is the window's tracked position, if any. An untracked window
/// that is full-screen starts from the full grid so the first press shrinks
/// it; any other untracked window jumps to the direction's preset.
///
/// A tracked window's position may come from a larger grid (after a layout
/// switch or a group change), so it is fitted to `layout` first. It then
/// moves one unit in `direction`. Its trailing edge follows
/// unless it is already at the grid boundary, in which case only the leading
/// edge moves and the window shrinks. When the leading edge cannot move any
/// further either, the window snaps to the preset for `direction`.
pub fn next_position(
    current: Option<GridPosition>,
    direction: Direction,
    layout: &GridLayout,
    fullscreen: bool,
) -> GridPosition {
    let current = match current {
        Some(position) => fit_position(position, layout),
        None if fullscreen => preset(Direction::Up, layout),
        None => return preset(direction, layout),
    };

    let GridPosition { mut left, mut top, mut right, mut bottom } = current;
    let at_boundary = match direction {
        Direction::Right => left == layout.last_v() - 1,
        Direction::Left => right == 1,
        Direction::Up => bottom == 1,
        Direction::Down => top == layout.last_h() - 1,
    };
    if at_boundary {
        return preset(direction, layout);
    }

    let step = direction.step();
    match direction.orientation() {
        Orientation::Horizontal => {
            left += step;
            right += step;
        }
        Orientation::Vertical => {
            top += step;
            bottom += step;
        }
    }

    fit_position(GridPosition { left, top, right, bottom }, layout)
}
