use super::{CascadeSlot, GridLayout, GridPosition};
use crate::sys::host::WindowId;

/// A tiled, visible window of the group being cascaded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CascadeCandidate {
    pub wid: WindowId,
    pub position: GridPosition,
    /// The host's full-screen flag.
    pub fullscreen: bool,
}

impl CascadeCandidate {
    /// Full-screen according to the host *and* tiled to the whole grid.
    pub fn is_true_fullscreen(&self, layout: &GridLayout) -> bool {
        self.fullscreen && self.position.is_full_grid(layout)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellPlacement {
    Cell(CascadeSlot),
    /// Covers the output's full-screen area, outside any cascade.
    Fullscreen,
}

/// Picks the candidates sharing `reference`'s cell and assigns each a place.
///
/// `candidates` must already be in tracking order. True full-screen windows
/// never stack against anything and are returned as [`CellPlacement::Fullscreen`].
pub fn plan_cascade(
    candidates: &[CascadeCandidate],
    reference: GridPosition,
    layout: &GridLayout,
) -> Vec<(CascadeCandidate, CellPlacement)> {
    let cell = reference.cascade_id(layout);
    let (fullscreen, stacked): (Vec<CascadeCandidate>, Vec<CascadeCandidate>) = candidates
        .iter()
        .copied()
        .filter(|c| c.position.cascade_id(layout) == cell)
        .partition(|c| c.is_true_fullscreen(layout));

    let len = stacked.len();
    stacked
        .into_iter()
        .enumerate()
        .map(|(rank, c)| (c, CellPlacement::Cell(CascadeSlot { rank, len })))
        .chain(fullscreen.into_iter().map(|c| (c, CellPlacement::Fullscreen)))
        .collect()
}
