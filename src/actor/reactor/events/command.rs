use tracing::{debug, info};

use crate::actor::reactor::{Reactor, ReactorError};
use crate::layout_engine::{Direction, LayoutStep, next_position};
use crate::sys::geometry::SameAs;
use crate::sys::host::{Host, WindowId};

pub struct CommandEventHandler;

impl CommandEventHandler {
    pub fn handle_move<H: Host>(
        reactor: &mut Reactor<H>,
        direction: Direction,
    ) -> Result<(), ReactorError> {
        let Some(wid) = active_window(reactor) else {
            return Ok(());
        };
        let window = reactor.host.window(wid)?;
        let area = reactor.host.usable_area(wid)?;
        let group = reactor.group_of(&window);
        let layout = reactor.layout_manager.resolve(&group, area);
        let current = reactor.client_manager.get(wid).map(|c| c.position);
        let covers_area = window.fullscreen || window.maximized || window.frame.same_as(area);

        let next = next_position(current, direction, &layout, covers_area);
        info!(%wid, %direction, %next, "move");
        reactor.tile(wid, next)
    }

    pub fn handle_switch_layout<H: Host>(
        reactor: &mut Reactor<H>,
        step: LayoutStep,
    ) -> Result<(), ReactorError> {
        let Some(wid) = active_window(reactor) else {
            return Ok(());
        };
        let window = reactor.host.window(wid)?;
        let area = reactor.host.usable_area(wid)?;
        let group = reactor.group_of(&window);
        let index = reactor.layout_manager.switch(&group, step, area);
        info!(%group, ?step, index, "switch layout");
        reactor.refit_group(&group)
    }

    pub fn handle_restore<H: Host>(reactor: &mut Reactor<H>) -> Result<(), ReactorError> {
        let Some(wid) = active_window(reactor) else {
            return Ok(());
        };
        info!(%wid, "restore");
        reactor.untile(wid, true, true)
    }
}

fn active_window<H: Host>(reactor: &Reactor<H>) -> Option<WindowId> {
    let active = reactor.host.active_window();
    if active.is_none() {
        debug!("no active window");
    }
    active
}
