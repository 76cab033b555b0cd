//! The grid engine: layout resolution, grid position algebra, geometry
//! mapping, cascading and edge adjustment. Everything here is pure; the
//! reactor owns the state and talks to the host.

pub mod cascade;
mod direction;
pub mod edges;
pub mod grid;
pub mod placement;
pub mod position;

pub use cascade::{CascadeCandidate, CellPlacement, plan_cascade};
pub use direction::{Direction, LayoutStep, Orientation};
pub use edges::{MinCellSize, adjust_edges};
pub use grid::{GridLayout, LayoutCatalog, LayoutSelections};
pub use placement::{CascadeSlot, cell_rect};
pub use position::{GridPosition, fit_position, next_position, preset};

#[cfg(test)]
mod tests;
