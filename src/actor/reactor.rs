//! The client lifecycle state machine.
//!
//! A [`Reactor`] owns every tiled window's [`TrackedClient`] record and each
//! group's layout selection. Hosts deliver one [`Event`] at a time through
//! [`Reactor::handle_event`], which processes it to completion (including all
//! geometry writes) before returning. Failures are logged there and never
//! leave other windows' records half-updated.

mod error;
mod events;
mod managers;
pub mod replay;

#[cfg(test)]
mod testing;

pub use error::ReactorError;
use events::command::CommandEventHandler;
use events::system::SystemEventHandler;
use events::window::WindowEventHandler;
pub use managers::{ClientManager, LayoutManager};
pub use replay::{Record, Step, replay};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, trace, warn};

use crate::common::config::{Config, Settings};
use crate::layout_engine::{
    CascadeCandidate, CellPlacement, Direction, GridLayout, GridPosition, LayoutStep, cell_rect,
    fit_position, plan_cascade,
};
use crate::model::{GroupKey, PlacementMemory, RuleFilter, TrackedClient, WindowFilter};
use crate::sys::geometry::{Rect, RectExt};
use crate::sys::host::{Host, HostError, WindowId, WindowSignal, WindowSnapshot};

/// User-invoked operations, bound to host triggers such as key chords. Each
/// acts on the host's active window.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Move(Direction),
    SwitchLayout(LayoutStep),
    Restore,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// A window appeared.
    WindowAdded(WindowId),
    /// A window is going away. It may already be gone from the host.
    WindowRemoved(WindowId),

    // Per-window signals. Only delivered for windows subscribed while tiled.
    WindowMoveStarted(WindowId),
    WindowResizeFinished(WindowId),
    WindowMinimizedChanged(WindowId),
    WindowDesktopChanged(WindowId),
    WindowOutputChanged(WindowId),
    WindowFullscreenChanged(WindowId),
    WindowMaximizedChanged(WindowId),

    /// Outputs were added, removed or resized.
    OutputsChanged,
    ActiveDesktopChanged,

    Command(Command),
}

impl Event {
    pub fn for_signal(wid: WindowId, signal: WindowSignal) -> Event {
        match signal {
            WindowSignal::MoveStarted => Event::WindowMoveStarted(wid),
            WindowSignal::ResizeFinished => Event::WindowResizeFinished(wid),
            WindowSignal::MinimizedChanged => Event::WindowMinimizedChanged(wid),
            WindowSignal::DesktopChanged => Event::WindowDesktopChanged(wid),
            WindowSignal::OutputChanged => Event::WindowOutputChanged(wid),
            WindowSignal::FullscreenChanged => Event::WindowFullscreenChanged(wid),
            WindowSignal::MaximizedChanged => Event::WindowMaximizedChanged(wid),
        }
    }
}

pub struct Reactor<H: Host> {
    host: H,
    settings: Settings,
    layout_manager: LayoutManager,
    client_manager: ClientManager,
    memory: PlacementMemory,
    filter: Box<dyn WindowFilter>,
    record: Record,
}

impl<H: Host> Reactor<H> {
    pub fn new(host: H, config: &Config, memory: PlacementMemory) -> Self {
        Reactor {
            host,
            settings: config.settings.clone(),
            layout_manager: LayoutManager::new(config),
            client_manager: ClientManager::new(),
            memory,
            filter: Box::new(RuleFilter::new(&config.ignore)),
            record: Record::default(),
        }
    }

    /// Replaces the configured ignore rules.
    pub fn with_filter(mut self, filter: impl WindowFilter + 'static) -> Self {
        self.filter = Box::new(filter);
        self
    }

    pub fn with_record(mut self, record: Record) -> Self {
        self.record = record;
        self
    }

    pub fn host(&self) -> &H { &self.host }

    pub fn host_mut(&mut self) -> &mut H { &mut self.host }

    pub fn memory(&self) -> &PlacementMemory { &self.memory }

    pub fn into_parts(self) -> (H, PlacementMemory) { (self.host, self.memory) }

    pub fn client(&self, wid: WindowId) -> Option<&TrackedClient> { self.client_manager.get(wid) }

    pub fn is_tiled(&self, wid: WindowId) -> bool { self.client_manager.contains(wid) }

    /// Tiled windows in tracking order.
    pub fn tiled_windows(&self) -> Vec<WindowId> {
        self.client_manager.all().into_iter().map(|c| c.wid).collect()
    }

    /// The layout currently in effect for `group`, given its usable area.
    pub fn layout(&self, group: &GroupKey, area: Rect) -> GridLayout {
        self.layout_manager.resolve(group, area)
    }

    pub fn handle_events(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.handle_event(event);
        }
    }

    /// Auto-tiles the windows that were open before the engine started.
    pub fn adopt_existing(&mut self) {
        for wid in self.host.windows() {
            self.handle_event(Event::WindowAdded(wid));
        }
    }

    #[instrument(name = "reactor::handle_event", skip(self))]
    pub fn handle_event(&mut self, event: Event) {
        self.record.on_event(&event);
        if let Err(e) = self.dispatch(event) {
            error!(?event, "{e}");
        }
    }

    fn dispatch(&mut self, event: Event) -> Result<(), ReactorError> {
        match event {
            Event::WindowAdded(wid) => WindowEventHandler::handle_window_added(self, wid),
            Event::WindowRemoved(wid) => WindowEventHandler::handle_window_removed(self, wid),
            Event::WindowMoveStarted(wid) => WindowEventHandler::handle_move_started(self, wid),
            Event::WindowResizeFinished(wid) => {
                WindowEventHandler::handle_resize_finished(self, wid)
            }
            Event::WindowMinimizedChanged(wid) => {
                WindowEventHandler::handle_minimized_changed(self, wid)
            }
            Event::WindowDesktopChanged(wid) | Event::WindowOutputChanged(wid) => {
                WindowEventHandler::handle_group_changed(self, wid)
            }
            Event::WindowFullscreenChanged(wid) => {
                WindowEventHandler::handle_fullscreen_changed(self, wid)
            }
            Event::WindowMaximizedChanged(wid) => {
                WindowEventHandler::handle_maximized_changed(self, wid)
            }
            Event::OutputsChanged => SystemEventHandler::handle_outputs_changed(self),
            Event::ActiveDesktopChanged => SystemEventHandler::handle_active_desktop_changed(self),
            Event::Command(Command::Move(direction)) => {
                CommandEventHandler::handle_move(self, direction)
            }
            Event::Command(Command::SwitchLayout(step)) => {
                CommandEventHandler::handle_switch_layout(self, step)
            }
            Event::Command(Command::Restore) => CommandEventHandler::handle_restore(self),
        }
    }

    fn group_of(&self, window: &WindowSnapshot) -> GroupKey {
        match self.client_manager.get(window.id) {
            Some(client) => client.group.clone(),
            None => GroupKey::of(window),
        }
    }

    /// Puts `wid` at `position`, tracking it first if needed.
    fn tile(&mut self, wid: WindowId, position: GridPosition) -> Result<(), ReactorError> {
        let window = self.host.window(wid)?;
        if self.filter.ignores(&window) {
            debug!(%wid, app_id = %window.app_id, "ignoring window");
            return Ok(());
        }
        let area = self.host.usable_area(wid)?;
        let group = self.group_of(&window);
        let layout = self.layout_manager.resolve(&group, area);
        let position = fit_position(position, &layout);

        let previous = match self.client_manager.get_mut(wid) {
            Some(client) => Some(std::mem::replace(&mut client.position, position)),
            None => {
                let subscription = self.host.subscribe(wid, WindowSignal::TILED)?;
                let seq = self.client_manager.next_seq();
                self.client_manager.insert(TrackedClient::new(&window, position, subscription, seq));
                if let Err(e) = self.host.set_no_border(wid, layout.no_border) {
                    warn!(%wid, "could not apply border policy: {e}");
                }
                None
            }
        };

        let mut fullscreen = window.fullscreen;
        if fullscreen && !position.is_full_grid(&layout) {
            self.host.set_fullscreen(wid, false)?;
            fullscreen = false;
        }
        if let Some(client) = self.client_manager.get_mut(wid) {
            client.fullscreen = fullscreen;
        }

        debug!(%wid, %position, ?previous, "tiling window");
        self.cascade(&group, position)?;
        if let Some(previous) = previous
            && layout.cascade_indent != 0.0
            && previous.cascade_id(&layout) != position.cascade_id(&layout)
        {
            self.cascade(&group, previous)?;
        }

        if !fullscreen {
            self.memory.remember(&window.app_id, position);
        }
        Ok(())
    }

    /// Stops tracking `wid`, putting it back the way it was before tiling.
    fn untile(
        &mut self,
        wid: WindowId,
        restore_position: bool,
        forget_app: bool,
    ) -> Result<(), ReactorError> {
        let Some(client) = self.client_manager.remove(wid) else {
            trace!(%wid, "window is not tiled");
            return Ok(());
        };
        self.host.unsubscribe(client.subscription);
        if forget_app {
            self.memory.forget(&client.app_id);
        }
        debug!(%wid, restore_position, forget_app, "untiling window");

        let restored = self.restore(&client, restore_position);
        let repacked = self.cascade(&client.group, client.position);
        restored.and(repacked)
    }

    fn restore(&mut self, client: &TrackedClient, restore_position: bool) -> Result<(), ReactorError> {
        let wid = client.wid;
        let window = self.host.window(wid)?;
        // The output may have changed since the window was tiled.
        let area = self.host.usable_area(wid)?;
        let frame = client.original.frame.clamp_into(&area, window.min_size);
        if restore_position {
            self.host.set_frame(wid, frame)?;
        } else {
            self.host.set_size(wid, frame.size())?;
        }
        self.host.set_no_border(wid, client.original.no_border)?;
        if window.fullscreen != client.original.fullscreen {
            self.host.set_fullscreen(wid, client.original.fullscreen)?;
        }
        Ok(())
    }

    /// Stops tracking `wid` without touching its geometry, for when the host
    /// has taken over placing it.
    fn drop_tracking(&mut self, wid: WindowId) -> Result<(), ReactorError> {
        let Some(client) = self.client_manager.remove(wid) else {
            return Ok(());
        };
        self.host.unsubscribe(client.subscription);
        debug!(%wid, "host took over the window, dropping it");

        let border = self
            .host
            .set_no_border(wid, client.original.no_border)
            .map_err(ReactorError::from);
        let repacked = self.cascade(&client.group, client.position);
        border.and(repacked)
    }

    /// Fresh host snapshot of a tracked window, or `None` if `wid` is not
    /// tiled. A tiled window the host no longer knows is dropped and its cell
    /// repacked.
    fn tracked_window(&mut self, wid: WindowId) -> Result<Option<WindowSnapshot>, ReactorError> {
        if !self.client_manager.contains(wid) {
            return Ok(None);
        }
        match self.host.window(wid) {
            Ok(window) => Ok(Some(window)),
            Err(HostError::WindowNotFound(_)) => {
                if let Some(client) = self.forget_stale(wid)
                    && let Err(e) = self.cascade(&client.group, client.position)
                {
                    warn!(%wid, "could not repack after stale window: {e}");
                }
                Err(ReactorError::StaleState(wid))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn forget_stale(&mut self, wid: WindowId) -> Option<TrackedClient> {
        let client = self.client_manager.remove(wid)?;
        self.host.unsubscribe(client.subscription);
        Some(client)
    }

    /// Lays out every visible member of `group` sharing `reference`'s cell.
    ///
    /// Windows whose geometry cannot be written are logged and skipped so the
    /// rest of the cell is still placed.
    fn cascade(&mut self, group: &GroupKey, reference: GridPosition) -> Result<(), ReactorError> {
        let mut area = None;
        let mut candidates = Vec::new();
        for client in self.client_manager.in_group(group) {
            let window = match self.host.window(client.wid) {
                Ok(window) => window,
                Err(e) => {
                    warn!(wid = %client.wid, "skipping window in cascade: {e}");
                    continue;
                }
            };
            if window.minimized {
                continue;
            }
            if area.is_none() {
                area = Some(self.host.usable_area(client.wid)?);
            }
            candidates.push(CascadeCandidate {
                wid: client.wid,
                position: client.position,
                fullscreen: window.fullscreen,
            });
        }
        let Some(area) = area else {
            return Ok(());
        };

        let layout = self.layout_manager.resolve(group, area);
        for (candidate, placement) in plan_cascade(&candidates, reference, &layout) {
            let wid = candidate.wid;
            let frame = match placement {
                CellPlacement::Cell(slot) => cell_rect(candidate.position, &layout, area, slot),
                CellPlacement::Fullscreen => match self.host.fullscreen_area(wid) {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!(%wid, "no full-screen area: {e}");
                        continue;
                    }
                },
            };
            trace!(%wid, ?placement, ?frame, "placing window");
            if let Err(e) = self.host.set_frame(wid, frame) {
                warn!(%wid, "failed to place window: {e}");
                continue;
            }
            if let Some(client) = self.client_manager.get_mut(wid) {
                client.previous_frame = frame;
            }
        }
        Ok(())
    }

    /// Re-applies border policy and geometry to every member of `group`,
    /// writing each window once.
    fn refit_group(&mut self, group: &GroupKey) -> Result<(), ReactorError> {
        let members: Vec<(WindowId, GridPosition)> = self
            .client_manager
            .in_group(group)
            .into_iter()
            .map(|c| (c.wid, c.position))
            .collect();
        let Some(&(first, _)) = members.first() else {
            return Ok(());
        };
        let area = self.host.usable_area(first)?;
        let layout = self.layout_manager.resolve(group, area);
        debug!(%group, members = members.len(), "refitting group");

        let mut cells = Vec::new();
        for (wid, position) in members {
            if let Err(e) = self.host.set_no_border(wid, layout.no_border) {
                warn!(%wid, "could not apply border policy: {e}");
            }
            let cell = position.cascade_id(&layout);
            if !cells.contains(&cell) {
                cells.push(cell);
                self.cascade(group, position)?;
            }
        }
        Ok(())
    }

    /// Re-derives every record's group from the host and refits all groups.
    fn refit_all(&mut self) -> Result<(), ReactorError> {
        let mut groups: Vec<GroupKey> = Vec::new();
        let mut note = |group: GroupKey| {
            if !groups.contains(&group) {
                groups.push(group);
            }
        };

        for wid in self.tiled_windows() {
            match self.host.window(wid) {
                Ok(window) => {
                    let group = GroupKey::of(&window);
                    if let Some(client) = self.client_manager.get_mut(wid)
                        && client.group != group
                    {
                        debug!(%wid, from = %client.group, to = %group, "window changed group");
                        note(std::mem::replace(&mut client.group, group.clone()));
                    }
                    note(group);
                }
                Err(HostError::WindowNotFound(_)) => {
                    warn!(%wid, "{}", ReactorError::StaleState(wid));
                    if let Some(client) = self.forget_stale(wid) {
                        note(client.group);
                    }
                }
                Err(e) => warn!(%wid, "could not query window: {e}"),
            }
        }

        for group in groups {
            if let Err(e) = self.refit_group(&group) {
                warn!(%group, "refit failed: {e}");
            }
        }
        Ok(())
    }
}
