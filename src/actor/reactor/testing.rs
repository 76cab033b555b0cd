use super::{Command, Event, Reactor};
use crate::common::collections::BTreeMap;
use crate::common::config::{Config, IgnoreRules, LayoutDefaults, LayoutSpec, Settings};
use crate::model::PlacementMemory;
use crate::sys::geometry::{Rect, Size};
use crate::sys::headless::{HeadlessHost, HostChange, Output, Scene};
use crate::sys::host::{WindowId, WindowSnapshot};

pub const SCREEN: Rect = Rect::new(0.0, 0.0, 1200.0, 900.0);

pub fn wid(id: u64) -> WindowId { WindowId::new(id) }

pub fn window(id: u64, app_id: &str) -> WindowSnapshot {
    WindowSnapshot {
        id: wid(id),
        frame: Rect::new(100.0, 100.0, 400.0, 300.0),
        min_size: Size::new(50.0, 50.0),
        no_border: false,
        fullscreen: false,
        minimized: false,
        maximized: false,
        output: 0,
        desktop: 1,
        activities: vec![],
        app_id: app_id.into(),
        title: format!("{app_id} {id}"),
        special: false,
        transient: false,
        resizable: true,
    }
}

pub fn scene(windows: Vec<WindowSnapshot>) -> Scene {
    Scene {
        outputs: vec![Output::new(0, SCREEN)],
        windows,
        active: None,
    }
}

/// Evenly spaced grid.
pub fn grid(columns: usize, rows: usize, gap: f64, cascade_indent: f64) -> LayoutSpec {
    let edges = |n: usize| (0..=n).map(|i| i as f64 / n as f64).collect();
    LayoutSpec {
        name: None,
        v_edges: Some(edges(columns)),
        h_edges: Some(edges(rows)),
        gap: Some(gap),
        cascade_indent: Some(cascade_indent),
        no_border: None,
    }
}

pub fn config_with(layouts: Vec<LayoutSpec>) -> Config {
    Config {
        settings: Settings::default(),
        defaults: LayoutDefaults::default(),
        layouts,
        ignore: IgnoreRules::default(),
        keys: BTreeMap::new(),
    }
}

/// A 2x2 grid cascading by 30px, then a 4x3 grid without cascading.
pub fn two_layout_config() -> Config {
    config_with(vec![grid(2, 2, 0.0, 30.0), grid(4, 3, 0.0, 0.0)])
}

pub fn reactor(config: &Config, windows: Vec<WindowSnapshot>) -> Reactor<HeadlessHost> {
    Reactor::new(HeadlessHost::new(scene(windows)), config, PlacementMemory::new())
}

pub fn apply(reactor: &mut Reactor<HeadlessHost>, change: HostChange) {
    reactor.host_mut().apply(change).unwrap();
}

/// Activates window `id` and runs `command` on it.
pub fn press(reactor: &mut Reactor<HeadlessHost>, id: u64, command: Command) {
    apply(reactor, HostChange::Activate(Some(wid(id))));
    reactor.handle_event(Event::Command(command));
}

pub fn frame(reactor: &Reactor<HeadlessHost>, id: u64) -> Rect {
    reactor.host().snapshot(wid(id)).expect("window exists").frame
}

pub fn snapshot(reactor: &Reactor<HeadlessHost>, id: u64) -> WindowSnapshot {
    reactor.host().snapshot(wid(id)).expect("window exists").clone()
}
