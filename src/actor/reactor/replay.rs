//! Session recording and replay.
//!
//! A recording is a text file of ron values, one per line. The first line is
//! the headless [`Scene`] the session starts from; every following line is a
//! [`Step`]: either something the host did on its own or an [`Event`] fed to
//! the reactor.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Event, Reactor};
use crate::common::config::Config;
use crate::model::PlacementMemory;
use crate::sys::headless::{HeadlessHost, HostChange, Scene};
use crate::sys::host::HostError;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Host(HostChange),
    Event(Event),
}

#[derive(Default)]
pub struct Record {
    file: Option<File>,
}

impl Record {
    /// Starts recording to `path`, truncating it. `None` records nothing.
    pub fn new(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => Some(
                File::create(path)
                    .with_context(|| format!("creating recording {}", path.display()))?,
            ),
            None => None,
        };
        Ok(Self { file })
    }

    pub fn is_recording(&self) -> bool { self.file.is_some() }

    pub fn start(&mut self, scene: &Scene) { self.write(scene) }

    pub(super) fn on_event(&mut self, event: &Event) { self.write(&Step::Event(*event)) }

    pub(super) fn on_host_change(&mut self, change: &HostChange) {
        self.write(&Step::Host(change.clone()))
    }

    fn write<T: Serialize>(&mut self, value: &T) {
        let Some(file) = self.file.as_mut() else { return };
        let written = ron::ser::to_string(value)
            .map_err(anyhow::Error::from)
            .and_then(|line| Ok(writeln!(file, "{line}")?));
        if let Err(e) = written {
            warn!("stopping recording: {e}");
            self.file = None;
        }
    }
}

impl Reactor<HeadlessHost> {
    /// Applies one step of a session.
    pub fn step(&mut self, step: Step) -> Result<(), HostError> {
        match step {
            Step::Host(change) => {
                self.record.on_host_change(&change);
                self.host.apply(change)
            }
            Step::Event(event) => {
                self.handle_event(event);
                Ok(())
            }
        }
    }
}

/// Replays the recording at `path` against a fresh headless host and returns
/// the reactor in its final state. `record` receives the session again as it
/// is replayed.
pub fn replay(
    path: &Path,
    config: &Config,
    memory: PlacementMemory,
    mut record: Record,
) -> anyhow::Result<Reactor<HeadlessHost>> {
    let file = BufReader::new(
        File::open(path).with_context(|| format!("opening recording {}", path.display()))?,
    );
    let mut lines = file.lines();
    let Some(first) = lines.next() else {
        bail!("{} is empty", path.display());
    };
    let scene: Scene = ron::from_str(&first?).context("line 1: expected a scene")?;
    record.start(&scene);

    let mut reactor = Reactor::new(HeadlessHost::new(scene), config, memory).with_record(record);
    for (index, line) in lines.enumerate() {
        let number = index + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let step: Step = ron::from_str(&line).with_context(|| format!("line {number}"))?;
        if let Err(e) = reactor.step(step) {
            warn!(line = number, "host change failed: {e}");
        }
    }
    Ok(reactor)
}
