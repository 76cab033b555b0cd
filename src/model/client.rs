use serde::{Deserialize, Serialize};

use super::GroupKey;
use crate::layout_engine::GridPosition;
use crate::sys::geometry::Rect;
use crate::sys::host::{SubscriptionId, WindowId, WindowSnapshot};

/// What a window looked like before it was first tiled.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct OriginalState {
    pub frame: Rect,
    pub no_border: bool,
    pub fullscreen: bool,
}

impl OriginalState {
    pub fn capture(window: &WindowSnapshot) -> Self {
        Self {
            frame: window.frame,
            no_border: window.no_border,
            fullscreen: window.fullscreen,
        }
    }
}

/// Engine-side record of a tiled window. Exists exactly as long as the
/// window is tiled.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedClient {
    pub wid: WindowId,
    pub app_id: String,
    pub original: OriginalState,
    pub position: GridPosition,
    pub group: GroupKey,
    /// Last frame the engine wrote. Baseline for interpreting resizes.
    pub previous_frame: Rect,
    /// Where the window was tiled when the host made it full-screen.
    pub position_before_fullscreen: Option<GridPosition>,
    /// The host's full-screen flag as last seen or set by the engine.
    pub fullscreen: bool,
    pub subscription: SubscriptionId,
    /// Tracking order within the reactor; lower values were tiled earlier.
    pub seq: u64,
}

impl TrackedClient {
    pub fn new(
        window: &WindowSnapshot,
        position: GridPosition,
        subscription: SubscriptionId,
        seq: u64,
    ) -> Self {
        Self {
            wid: window.id,
            app_id: window.app_id.clone(),
            original: OriginalState::capture(window),
            position,
            group: GroupKey::of(window),
            previous_frame: window.frame,
            position_before_fullscreen: None,
            fullscreen: window.fullscreen,
            subscription,
            seq,
        }
    }
}
