use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::collections::BTreeMap;
use crate::layout_engine::GridPosition;

/// Last grid position each application was tiled to, keyed by application
/// identity. New windows of a remembered application are auto-tiled there.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct PlacementMemory {
    positions: BTreeMap<String, GridPosition>,
}

impl PlacementMemory {
    pub fn new() -> Self { Self::default() }

    pub fn remember(&mut self, app_id: &str, position: GridPosition) {
        if app_id.is_empty() {
            return;
        }
        debug!(app_id, %position, "remembering placement");
        self.positions.insert(app_id.to_owned(), position);
    }

    pub fn get(&self, app_id: &str) -> Option<GridPosition> { self.positions.get(app_id).copied() }

    pub fn forget(&mut self, app_id: &str) -> Option<GridPosition> {
        let removed = self.positions.remove(app_id);
        if removed.is_some() {
            debug!(app_id, "forgot placement");
        }
        removed
    }

    pub fn len(&self) -> usize { self.positions.len() }

    pub fn is_empty(&self) -> bool { self.positions.is_empty() }

    /// Reads a memory file. A missing file is an empty memory.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let buf = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&buf)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let buf = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(path, buf)?;
        Ok(())
    }
}
