use super::{GridLayout, GridPosition, fit_position};
use crate::sys::geometry::Rect;

/// A window's place within the cascade of its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CascadeSlot {
    pub rank: usize,
    pub len: usize,
}

impl CascadeSlot {
    pub const ALONE: CascadeSlot = CascadeSlot { rank: 0, len: 1 };

    fn leading(self) -> f64 { self.rank as f64 }

    fn trailing(self) -> f64 { self.len.saturating_sub(self.rank + 1) as f64 }
}

/// Maps a grid position to a frame inside `area`.
///
/// The gap is doubled on sides that touch the outer grid edge so the margin
/// to the screen edge matches the spacing between neighbouring windows. A
/// window at `rank` is inset by `rank` indents from the cell's leading edges
/// and leaves room for the windows cascaded after it on the trailing edges,
/// so the last window of the stack ends exactly where the cell does.
pub fn cell_rect(position: GridPosition, layout: &GridLayout, area: Rect, slot: CascadeSlot) -> Rect {
    let GridPosition { left, top, right, bottom } = fit_position(position, layout);
    let gap = layout.gap;
    let indent = layout.cascade_indent;
    let edge_gap = |outer: bool| if outer { gap * 2.0 } else { gap };
    let cut_x = |i: i32| area.x + (layout.v_edges[i as usize] * area.width).round();
    let cut_y = |i: i32| area.y + (layout.h_edges[i as usize] * area.height).round();

    let x = cut_x(left) + edge_gap(left == 0) + slot.leading() * indent;
    let y = cut_y(top) + edge_gap(top == 0) + slot.leading() * indent;
    let width = cut_x(right) - x - edge_gap(right == layout.last_v()) - slot.trailing() * indent;
    let height = cut_y(bottom) - y - edge_gap(bottom == layout.last_h()) - slot.trailing() * indent;

    Rect::new(x, y, width, height)
}
