//! An in-memory [`Host`] used by the replay tool and the tests.
//!
//! It models outputs as plain rectangles and applies every mutation exactly,
//! without emitting signals of its own. Whoever drives it is responsible for
//! feeding the matching [`crate::actor::reactor::Event`]s to the reactor.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use tracing::trace;

use super::geometry::{Rect, Size};
use super::host::{Host, HostError, SubscriptionId, WindowId, WindowSignal, WindowSnapshot};
use crate::common::collections::{BTreeMap, HashSet};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Output {
    pub index: u32,
    /// Full output rectangle, used for full-screen windows.
    pub frame: Rect,
    /// Output rectangle minus panels and docks.
    pub usable: Rect,
}

impl Output {
    pub fn new(index: u32, frame: Rect) -> Self { Self { index, frame, usable: frame } }

    pub fn with_usable(mut self, usable: Rect) -> Self {
        self.usable = usable;
        self
    }
}

/// Initial state for a headless session.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub windows: Vec<WindowSnapshot>,
    #[serde(default)]
    pub active: Option<WindowId>,
}

/// A change made to the headless host on behalf of the "user" or the "window
/// manager", as opposed to a change requested by the engine.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum HostChange {
    AddWindow(WindowSnapshot),
    RemoveWindow(WindowId),
    Activate(Option<WindowId>),
    SetFrame(WindowId, Rect),
    SetMinimized(WindowId, bool),
    SetFullscreen(WindowId, bool),
    SetMaximized(WindowId, bool),
    SetDesktop(WindowId, u32),
    SetOutput(WindowId, u32),
    SetOutputs(Vec<Output>),
}

#[derive(Debug, Default)]
pub struct HeadlessHost {
    outputs: Vec<Output>,
    windows: BTreeMap<WindowId, WindowSnapshot>,
    active: Option<WindowId>,
    subscriptions: SlotMap<SubscriptionId, (WindowId, Vec<WindowSignal>)>,
    writes: usize,
    frozen: HashSet<WindowId>,
}

impl HeadlessHost {
    pub fn new(scene: Scene) -> Self {
        Self {
            outputs: scene.outputs,
            windows: scene.windows.into_iter().map(|w| (w.id, w)).collect(),
            active: scene.active,
            ..Default::default()
        }
    }

    pub fn apply(&mut self, change: HostChange) -> Result<(), HostError> {
        trace!(?change, "headless host change");
        match change {
            HostChange::AddWindow(window) => {
                self.windows.insert(window.id, window);
            }
            HostChange::RemoveWindow(wid) => {
                self.windows.remove(&wid);
                self.subscriptions.retain(|_, (owner, _)| *owner != wid);
                if self.active == Some(wid) {
                    self.active = None;
                }
            }
            HostChange::Activate(wid) => self.active = wid,
            HostChange::SetFrame(wid, frame) => self.get_mut(wid)?.frame = frame,
            HostChange::SetMinimized(wid, minimized) => self.get_mut(wid)?.minimized = minimized,
            HostChange::SetFullscreen(wid, fullscreen) => {
                let full = self.fullscreen_area(wid)?;
                let window = self.get_mut(wid)?;
                window.fullscreen = fullscreen;
                if fullscreen {
                    window.frame = full;
                }
            }
            HostChange::SetMaximized(wid, maximized) => self.get_mut(wid)?.maximized = maximized,
            HostChange::SetDesktop(wid, desktop) => self.get_mut(wid)?.desktop = desktop,
            HostChange::SetOutput(wid, output) => self.get_mut(wid)?.output = output,
            HostChange::SetOutputs(outputs) => self.outputs = outputs,
        }
        Ok(())
    }

    pub fn snapshot(&self, wid: WindowId) -> Option<&WindowSnapshot> { self.windows.get(&wid) }

    pub fn frames(&self) -> impl Iterator<Item = (WindowId, Rect)> + '_ {
        self.windows.values().map(|w| (w.id, w.frame))
    }

    pub fn is_subscribed(&self, wid: WindowId, signal: WindowSignal) -> bool {
        self.subscriptions
            .values()
            .any(|(owner, signals)| *owner == wid && signals.contains(&signal))
    }

    /// Number of geometry writes requested by the engine so far.
    pub fn frame_writes(&self) -> usize { self.writes }

    /// Makes every engine mutation of `wid` fail until unfrozen.
    pub fn freeze(&mut self, wid: WindowId, frozen: bool) {
        if frozen {
            self.frozen.insert(wid);
        } else {
            self.frozen.remove(&wid);
        }
    }

    fn writable(&mut self, op: &'static str, wid: WindowId) -> Result<&mut WindowSnapshot, HostError> {
        if self.frozen.contains(&wid) {
            return Err(HostError::Rejected { op, wid, reason: "window is frozen".into() });
        }
        self.get_mut(wid)
    }

    fn get_mut(&mut self, wid: WindowId) -> Result<&mut WindowSnapshot, HostError> {
        self.windows.get_mut(&wid).ok_or(HostError::WindowNotFound(wid))
    }

    fn output_for(&self, wid: WindowId) -> Result<&Output, HostError> {
        let window = self.windows.get(&wid).ok_or(HostError::WindowNotFound(wid))?;
        self.outputs
            .iter()
            .find(|o| o.index == window.output)
            .ok_or(HostError::NoOutput(wid))
    }
}

impl Host for HeadlessHost {
    fn active_window(&self) -> Option<WindowId> { self.active }

    fn windows(&self) -> Vec<WindowId> { self.windows.keys().copied().collect() }

    fn window(&self, wid: WindowId) -> Result<WindowSnapshot, HostError> {
        self.windows.get(&wid).cloned().ok_or(HostError::WindowNotFound(wid))
    }

    fn usable_area(&self, wid: WindowId) -> Result<Rect, HostError> {
        self.output_for(wid).map(|o| o.usable)
    }

    fn fullscreen_area(&self, wid: WindowId) -> Result<Rect, HostError> {
        self.output_for(wid).map(|o| o.frame)
    }

    fn set_frame(&mut self, wid: WindowId, frame: Rect) -> Result<(), HostError> {
        self.writes += 1;
        self.writable("set_frame", wid)?.frame = frame;
        Ok(())
    }

    fn set_size(&mut self, wid: WindowId, size: Size) -> Result<(), HostError> {
        self.writes += 1;
        let window = self.writable("set_size", wid)?;
        window.frame.width = size.width;
        window.frame.height = size.height;
        Ok(())
    }

    fn set_no_border(&mut self, wid: WindowId, no_border: bool) -> Result<(), HostError> {
        self.writable("set_no_border", wid)?.no_border = no_border;
        Ok(())
    }

    fn set_fullscreen(&mut self, wid: WindowId, fullscreen: bool) -> Result<(), HostError> {
        self.writable("set_fullscreen", wid)?.fullscreen = fullscreen;
        Ok(())
    }

    fn subscribe(
        &mut self,
        wid: WindowId,
        signals: &[WindowSignal],
    ) -> Result<SubscriptionId, HostError> {
        if !self.windows.contains_key(&wid) {
            return Err(HostError::WindowNotFound(wid));
        }
        Ok(self.subscriptions.insert((wid, signals.to_vec())))
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        self.subscriptions.remove(subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(id: u64) -> WindowSnapshot {
        WindowSnapshot {
            id: WindowId::new(id),
            frame: Rect::new(10.0, 10.0, 300.0, 200.0),
            min_size: Size::default(),
            no_border: false,
            fullscreen: false,
            minimized: false,
            maximized: false,
            output: 0,
            desktop: 1,
            activities: vec![],
            app_id: "term".into(),
            title: String::new(),
            special: false,
            transient: false,
            resizable: true,
        }
    }

    #[test]
    fn subscriptions_are_dropped_with_the_window() {
        let mut host = HeadlessHost::new(Scene {
            outputs: vec![Output::new(0, Rect::new(0.0, 0.0, 1000.0, 800.0))],
            windows: vec![window(1)],
            active: None,
        });
        let wid = WindowId::new(1);
        host.subscribe(wid, WindowSignal::TILED).unwrap();
        assert!(host.is_subscribed(wid, WindowSignal::ResizeFinished));
        host.apply(HostChange::RemoveWindow(wid)).unwrap();
        assert!(!host.is_subscribed(wid, WindowSignal::ResizeFinished));
        assert_eq!(host.window(wid), Err(HostError::WindowNotFound(wid)));
    }

    #[test]
    fn fullscreen_change_covers_the_output() {
        let full = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let mut host = HeadlessHost::new(Scene {
            outputs: vec![Output::new(0, full).with_usable(Rect::new(0.0, 30.0, 1000.0, 770.0))],
            windows: vec![window(1)],
            active: None,
        });
        let wid = WindowId::new(1);
        host.apply(HostChange::SetFullscreen(wid, true)).unwrap();
        assert_eq!(host.snapshot(wid).unwrap().frame, full);
        assert_eq!(host.usable_area(wid).unwrap(), Rect::new(0.0, 30.0, 1000.0, 770.0));
    }

    #[test]
    fn frozen_windows_reject_writes() {
        let mut host = HeadlessHost::new(Scene {
            outputs: vec![Output::new(0, Rect::new(0.0, 0.0, 1000.0, 800.0))],
            windows: vec![window(1)],
            active: None,
        });
        let wid = WindowId::new(1);
        host.freeze(wid, true);
        assert!(matches!(
            host.set_frame(wid, Rect::new(0.0, 0.0, 1.0, 1.0)),
            Err(HostError::Rejected { op: "set_frame", .. })
        ));
        assert_eq!(host.snapshot(wid).unwrap().frame, Rect::new(10.0, 10.0, 300.0, 200.0));
        host.freeze(wid, false);
        host.set_size(wid, Size::new(50.0, 60.0)).unwrap();
        assert_eq!(host.snapshot(wid).unwrap().frame, Rect::new(10.0, 10.0, 50.0, 60.0));
    }

    #[test]
    fn missing_output_is_an_error() {
        let mut w = window(1);
        w.output = 3;
        let host = HeadlessHost::new(Scene {
            outputs: vec![Output::new(0, Rect::new(0.0, 0.0, 1000.0, 800.0))],
            windows: vec![w],
            active: None,
        });
        assert_eq!(host.usable_area(WindowId::new(1)), Err(HostError::NoOutput(WindowId::new(1))));
    }
}
