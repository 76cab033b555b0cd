//! The seam between the tiling engine and the window manager hosting it.
//!
//! The engine never owns windows. Everything it knows about a window comes
//! from a [`WindowSnapshot`] taken through [`Host::window`], and everything it
//! changes goes back through the mutation methods. Calls are synchronous; a
//! host that drives the engine from callbacks must deliver one event at a
//! time and wait for [`crate::actor::reactor::Reactor::handle_event`] to
//! return.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{Rect, Size};

/// Stable handle of a host window for as long as the window exists.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WindowId(pub u64);

impl WindowId {
    pub const fn new(raw: u64) -> Self { Self(raw) }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

slotmap::new_key_type! {
    /// Handle for the per-window signal subscription taken when a window
    /// becomes tiled. Handing it back to [`Host::unsubscribe`] tears every
    /// signal of that subscription down.
    pub struct SubscriptionId;
}

/// Per-window signals the engine listens to while a window is tiled.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum WindowSignal {
    MoveStarted,
    ResizeFinished,
    MinimizedChanged,
    DesktopChanged,
    OutputChanged,
    FullscreenChanged,
    MaximizedChanged,
}

impl WindowSignal {
    pub const TILED: &'static [WindowSignal] = &[
        WindowSignal::MoveStarted,
        WindowSignal::ResizeFinished,
        WindowSignal::MinimizedChanged,
        WindowSignal::DesktopChanged,
        WindowSignal::OutputChanged,
        WindowSignal::FullscreenChanged,
        WindowSignal::MaximizedChanged,
    ];
}

/// Point-in-time copy of the host's view of a window.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct WindowSnapshot {
    pub id: WindowId,
    pub frame: Rect,
    pub min_size: Size,
    pub no_border: bool,
    pub fullscreen: bool,
    pub minimized: bool,
    pub maximized: bool,
    pub output: u32,
    pub desktop: u32,
    #[serde(default)]
    pub activities: Vec<String>,
    /// Application identity, e.g. the window class. Stable across relaunches.
    pub app_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub transient: bool,
    #[serde(default = "yes")]
    pub resizable: bool,
}

fn yes() -> bool { true }

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HostError {
    #[error("Window {0} does not exist")]
    WindowNotFound(WindowId),
    #[error("No output for window {0}")]
    NoOutput(WindowId),
    #[error("Host rejected {op} for window {wid}: {reason}")]
    Rejected {
        op: &'static str,
        wid: WindowId,
        reason: String,
    },
}

/// Everything the engine consumes from the host window manager.
pub trait Host {
    fn active_window(&self) -> Option<WindowId>;
    /// All windows the host currently knows, in creation order.
    fn windows(&self) -> Vec<WindowId>;
    fn window(&self, wid: WindowId) -> Result<WindowSnapshot, HostError>;
    /// Area of the window's output that windows may occupy (excludes panels).
    fn usable_area(&self, wid: WindowId) -> Result<Rect, HostError>;
    /// Area a full-screen window on the window's output covers.
    fn fullscreen_area(&self, wid: WindowId) -> Result<Rect, HostError>;

    fn set_frame(&mut self, wid: WindowId, frame: Rect) -> Result<(), HostError>;
    /// Resizes the window, leaving its position wherever the host keeps it.
    fn set_size(&mut self, wid: WindowId, size: Size) -> Result<(), HostError>;
    fn set_no_border(&mut self, wid: WindowId, no_border: bool) -> Result<(), HostError>;
    fn set_fullscreen(&mut self, wid: WindowId, fullscreen: bool) -> Result<(), HostError>;

    fn subscribe(
        &mut self,
        wid: WindowId,
        signals: &[WindowSignal],
    ) -> Result<SubscriptionId, HostError>;
    fn unsubscribe(&mut self, subscription: SubscriptionId);
}
