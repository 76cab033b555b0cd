use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{GridLayout, GridPosition, fit_position};
use crate::sys::geometry::{Rect, RectExt};

/// Smallest cell a resize may leave between two cut lines, in pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MinCellSize {
    pub width: f64,
    pub height: f64,
}

/// Pixel movements below this are noise from rounding, not a resize.
const MIN_DELTA: f64 = 0.5;

/// Reinterprets a finished interactive resize as a move of the cut lines the
/// window's sides sit on.
///
/// `old` and `new` are the window's frame before and after the gesture. Each
/// side that moved shifts its cut line by the same fraction of the usable
/// area, clamped so at least `min_cell` remains to the neighbouring cut lines.
/// The outermost cut lines are anchored to the screen and never move.
///
/// Returns the reshaped layout, or `None` if no cut line moved.
pub fn adjust_edges(
    layout: &GridLayout,
    position: GridPosition,
    old: Rect,
    new: Rect,
    area: Rect,
    min_cell: MinCellSize,
) -> Option<GridLayout> {
    if area.width <= 0.0 || area.height <= 0.0 {
        return None;
    }
    let GridPosition { left, top, right, bottom } = fit_position(position, layout);
    let delta = old.edge_delta(&new);

    let mut adjusted = layout.clone();
    let mut changed = false;
    changed |= shift_cut(&mut adjusted.v_edges, left, delta.left, area.width, min_cell.width);
    changed |= shift_cut(&mut adjusted.v_edges, right, delta.right, area.width, min_cell.width);
    changed |= shift_cut(&mut adjusted.h_edges, top, delta.top, area.height, min_cell.height);
    changed |= shift_cut(&mut adjusted.h_edges, bottom, delta.bottom, area.height, min_cell.height);

    changed.then_some(adjusted)
}

fn shift_cut(edges: &mut [f64], index: i32, pixels: f64, extent: f64, min_pixels: f64) -> bool {
    let index = index as usize;
    if index == 0 || index + 1 >= edges.len() || pixels.abs() < MIN_DELTA {
        return false;
    }
    let margin = min_pixels / extent;
    let lower = edges[index - 1] + margin;
    let upper = edges[index + 1] - margin;
    if lower > upper {
        trace!(index, "cut line has no room to move");
        return false;
    }
    let moved = (edges[index] + pixels / extent).clamp(lower, upper);
    if moved == edges[index] {
        return false;
    }
    edges[index] = moved;
    true
}
