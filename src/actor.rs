//! The engine's stateful side. Hosts feed [`reactor::Event`]s into a
//! [`reactor::Reactor`] one at a time.

pub mod reactor;
