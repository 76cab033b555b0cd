pub mod client;
pub mod filter;
pub mod group;
pub mod placement;

pub use client::{OriginalState, TrackedClient};
pub use filter::{RuleFilter, WindowFilter};
pub use group::GroupKey;
pub use placement::PlacementMemory;
