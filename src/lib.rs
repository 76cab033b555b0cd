//! Grid tiling for stacking window managers.
//!
//! Windows are pushed into cells of a configurable grid, cascaded when they
//! share a cell, remembered per application, and interactive resizes reshape
//! the grid itself. The host window manager is reached only through
//! [`sys::host::Host`].

pub mod actor;
pub mod common;
pub mod layout_engine;
pub mod model;
pub mod sys;
