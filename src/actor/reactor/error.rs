use thiserror::Error;

use crate::sys::host::{HostError, WindowId};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReactorError {
    #[error(transparent)]
    Host(#[from] HostError),
    /// A tracked window vanished from the host without a removal event. The
    /// record has already been dropped when this is returned.
    #[error("Tracked window {0} is no longer known to the host")]
    StaleState(WindowId),
}
