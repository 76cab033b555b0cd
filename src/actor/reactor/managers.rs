use tracing::trace;

use crate::common::collections::HashMap;
use crate::common::config::Config;
use crate::layout_engine::{GridLayout, LayoutCatalog, LayoutSelections, LayoutStep};
use crate::model::{GroupKey, TrackedClient};
use crate::sys::geometry::Rect;
use crate::sys::host::WindowId;

/// Configured layouts plus what each group selected or reshaped.
pub struct LayoutManager {
    pub catalog: LayoutCatalog,
    pub selections: LayoutSelections,
}

impl LayoutManager {
    pub fn new(config: &Config) -> Self {
        LayoutManager {
            catalog: LayoutCatalog::from_config(config),
            selections: LayoutSelections::default(),
        }
    }

    pub fn resolve(&self, group: &GroupKey, area: Rect) -> GridLayout {
        self.selections.resolve(group, &self.catalog, area)
    }

    pub fn switch(&mut self, group: &GroupKey, step: LayoutStep, area: Rect) -> usize {
        self.selections.switch(group, step, &self.catalog, area)
    }

    pub fn customize(&mut self, group: &GroupKey, layout: GridLayout, area: Rect) {
        self.selections.customize(group, layout, &self.catalog, area)
    }
}

/// Records of every tiled window.
#[derive(Default)]
pub struct ClientManager {
    clients: HashMap<WindowId, TrackedClient>,
    next_seq: u64,
}

impl ClientManager {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, wid: WindowId) -> Option<&TrackedClient> { self.clients.get(&wid) }

    pub fn get_mut(&mut self, wid: WindowId) -> Option<&mut TrackedClient> {
        self.clients.get_mut(&wid)
    }

    pub fn contains(&self, wid: WindowId) -> bool { self.clients.contains_key(&wid) }

    pub fn len(&self) -> usize { self.clients.len() }

    pub fn is_empty(&self) -> bool { self.clients.is_empty() }

    pub fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    pub fn insert(&mut self, client: TrackedClient) {
        trace!(wid = %client.wid, group = %client.group, "tracking window");
        self.clients.insert(client.wid, client);
    }

    pub fn remove(&mut self, wid: WindowId) -> Option<TrackedClient> {
        let removed = self.clients.remove(&wid);
        if removed.is_some() {
            trace!(%wid, "untracking window");
        }
        removed
    }

    /// Members of `group` in tracking order.
    pub fn in_group(&self, group: &GroupKey) -> Vec<&TrackedClient> {
        let mut members: Vec<_> = self.clients.values().filter(|c| &c.group == group).collect();
        members.sort_by_key(|c| c.seq);
        members
    }

    /// Every record in tracking order.
    pub fn all(&self) -> Vec<&TrackedClient> {
        let mut all: Vec<_> = self.clients.values().collect();
        all.sort_by_key(|c| c.seq);
        all
    }
}
