use tracing::debug;

use crate::actor::reactor::{Reactor, ReactorError};
use crate::sys::host::Host;

pub struct SystemEventHandler;

impl SystemEventHandler {
    pub fn handle_outputs_changed<H: Host>(reactor: &mut Reactor<H>) -> Result<(), ReactorError> {
        debug!(tiled = reactor.client_manager.len(), "outputs changed");
        reactor.refit_all()
    }

    pub fn handle_active_desktop_changed<H: Host>(
        reactor: &mut Reactor<H>,
    ) -> Result<(), ReactorError> {
        if reactor.client_manager.is_empty() {
            return Ok(());
        }
        debug!("active desktop changed");
        reactor.refit_all()
    }
}
