use tracing::{debug, trace};

use crate::actor::reactor::{Reactor, ReactorError};
use crate::layout_engine::{Direction, adjust_edges, preset};
use crate::model::GroupKey;
use crate::sys::geometry::SameAs;
use crate::sys::host::{Host, HostError, WindowId};

pub struct WindowEventHandler;

impl WindowEventHandler {
    /// Auto-tiles the window where its application was last tiled.
    pub fn handle_window_added<H: Host>(
        reactor: &mut Reactor<H>,
        wid: WindowId,
    ) -> Result<(), ReactorError> {
        if !reactor.settings.auto_tile || reactor.client_manager.contains(wid) {
            return Ok(());
        }
        let window = reactor.host.window(wid)?;
        if reactor.filter.ignores(&window) {
            return Ok(());
        }
        let Some(position) = reactor.memory.get(&window.app_id) else {
            trace!(%wid, app_id = %window.app_id, "no remembered placement");
            return Ok(());
        };
        debug!(%wid, app_id = %window.app_id, %position, "auto-tiling window");
        reactor.tile(wid, position)
    }

    pub fn handle_window_removed<H: Host>(
        reactor: &mut Reactor<H>,
        wid: WindowId,
    ) -> Result<(), ReactorError> {
        match reactor.untile(wid, true, false) {
            Err(ReactorError::Host(HostError::WindowNotFound(_))) => {
                debug!(%wid, "window was gone before it could be restored");
                Ok(())
            }
            result => result,
        }
    }

    /// A manual drag always takes the window out of the grid.
    pub fn handle_move_started<H: Host>(
        reactor: &mut Reactor<H>,
        wid: WindowId,
    ) -> Result<(), ReactorError> {
        reactor.untile(wid, false, true)
    }

    /// Turns a finished interactive resize into new cut lines for the group.
    pub fn handle_resize_finished<H: Host>(
        reactor: &mut Reactor<H>,
        wid: WindowId,
    ) -> Result<(), ReactorError> {
        let Some(window) = reactor.tracked_window(wid)? else {
            return Ok(());
        };
        let Some(client) = reactor.client_manager.get_mut(wid) else {
            return Ok(());
        };
        let baseline = client.previous_frame;
        if window.frame.size().same_as(baseline.size()) {
            trace!(%wid, "size unchanged, treating as a move");
            return Ok(());
        }
        client.previous_frame = window.frame;
        let group = client.group.clone();
        let position = client.position;

        let area = reactor.host.usable_area(wid)?;
        let layout = reactor.layout_manager.resolve(&group, area);
        let min_cell = reactor.settings.min_cell();
        match adjust_edges(&layout, position, baseline, window.frame, area, min_cell) {
            Some(adjusted) => {
                debug!(
                    %wid, %group,
                    v_edges = ?adjusted.v_edges,
                    h_edges = ?adjusted.h_edges,
                    "resize reshaped the grid"
                );
                reactor.layout_manager.customize(&group, adjusted, area);
                reactor.refit_group(&group)
            }
            None => {
                debug!(%wid, "resize moved no cut line, snapping back");
                reactor.cascade(&group, position)
            }
        }
    }

    pub fn handle_minimized_changed<H: Host>(
        reactor: &mut Reactor<H>,
        wid: WindowId,
    ) -> Result<(), ReactorError> {
        if reactor.tracked_window(wid)?.is_none() {
            return Ok(());
        }
        let Some(client) = reactor.client_manager.get(wid) else {
            return Ok(());
        };
        let (group, position) = (client.group.clone(), client.position);
        reactor.cascade(&group, position)
    }

    /// Handles both desktop and output moves: the window leaves one group and
    /// joins another.
    pub fn handle_group_changed<H: Host>(
        reactor: &mut Reactor<H>,
        wid: WindowId,
    ) -> Result<(), ReactorError> {
        let Some(window) = reactor.tracked_window(wid)? else {
            return Ok(());
        };
        let Some(client) = reactor.client_manager.get_mut(wid) else {
            return Ok(());
        };
        let joined = GroupKey::of(&window);
        let left = std::mem::replace(&mut client.group, joined.clone());
        let position = client.position;
        debug!(%wid, from = %left, to = %joined, "window changed group");

        let closed = if left != joined {
            reactor.cascade(&left, position)
        } else {
            Ok(())
        };
        let placed = reactor.cascade(&joined, position);

        let area = reactor.host.usable_area(wid)?;
        let no_border = reactor.layout_manager.resolve(&joined, area).no_border;
        reactor.host.set_no_border(wid, no_border)?;
        closed.and(placed)
    }

    pub fn handle_fullscreen_changed<H: Host>(
        reactor: &mut Reactor<H>,
        wid: WindowId,
    ) -> Result<(), ReactorError> {
        let Some(window) = reactor.tracked_window(wid)? else {
            return Ok(());
        };
        let area = reactor.host.usable_area(wid)?;
        let Some(client) = reactor.client_manager.get_mut(wid) else {
            return Ok(());
        };
        if window.fullscreen == client.fullscreen {
            trace!(%wid, "full-screen state unchanged");
            return Ok(());
        }
        client.fullscreen = window.fullscreen;
        let group = client.group.clone();
        let layout = reactor.layout_manager.resolve(&group, area);
        let full_grid = preset(Direction::Up, &layout);

        if window.fullscreen {
            let vacated = std::mem::replace(&mut client.position, full_grid);
            client.position_before_fullscreen = Some(vacated);
            debug!(%wid, %vacated, "window entered full-screen");
            reactor.cascade(&group, full_grid)?;
            if vacated.cascade_id(&layout) != full_grid.cascade_id(&layout) {
                reactor.cascade(&group, vacated)?;
            }
            return Ok(());
        }

        match client.position_before_fullscreen.take() {
            Some(position) => {
                client.position = position;
                debug!(%wid, %position, "window left full-screen");
                reactor.cascade(&group, position)?;
                if position.cascade_id(&layout) != full_grid.cascade_id(&layout) {
                    reactor.cascade(&group, full_grid)?;
                }
                Ok(())
            }
            None => {
                debug!(%wid, "left full-screen with no prior cell");
                reactor.drop_tracking(wid)
            }
        }
    }

    /// The host maximizing a tiled window takes it over.
    ///
    /// Un-maximize reports are ignored: when the engine calls `set_frame` on a
    /// maximized window, the host clears the maximized state and echoes an
    /// un-maximize back, which must not drop the window from tiling.
    pub fn handle_maximized_changed<H: Host>(
        reactor: &mut Reactor<H>,
        wid: WindowId,
    ) -> Result<(), ReactorError> {
        let Some(window) = reactor.tracked_window(wid)? else {
            return Ok(());
        };
        if !window.maximized {
            return Ok(());
        }
        reactor.drop_tracking(wid)
    }
}
