use serde::{Deserialize, Serialize};
use tracing::debug;

use super::LayoutStep;
use crate::common::collections::HashMap;
use crate::common::config::{AspectDefault, Config, LayoutDefaults, LayoutSpec};
use crate::model::GroupKey;
use crate::sys::geometry::Rect;

/// A fully resolved grid: every parameter present.
///
/// `v_edges` and `h_edges` are fractional cut lines across the usable area,
/// left to right and top to bottom. Column `i` spans `v_edges[i]..v_edges[i + 1]`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GridLayout {
    pub v_edges: Vec<f64>,
    pub h_edges: Vec<f64>,
    pub gap: f64,
    pub cascade_indent: f64,
    pub no_border: bool,
}

impl GridLayout {
    pub fn resolve(spec: &LayoutSpec, defaults: &LayoutDefaults) -> Self {
        Self {
            v_edges: spec.v_edges.clone().unwrap_or_else(|| defaults.v_edges.clone()),
            h_edges: spec.h_edges.clone().unwrap_or_else(|| defaults.h_edges.clone()),
            gap: spec.gap.unwrap_or(defaults.gap),
            cascade_indent: spec.cascade_indent.unwrap_or(defaults.cascade_indent),
            no_border: spec.no_border.unwrap_or(defaults.no_border),
        }
    }

    /// Index of the right-most vertical cut line.
    pub fn last_v(&self) -> i32 { self.v_edges.len() as i32 - 1 }

    /// Index of the bottom-most horizontal cut line.
    pub fn last_h(&self) -> i32 { self.h_edges.len() as i32 - 1 }

    pub fn columns(&self) -> usize { self.v_edges.len().saturating_sub(1) }

    pub fn rows(&self) -> usize { self.h_edges.len().saturating_sub(1) }
}

impl From<&LayoutDefaults> for GridLayout {
    fn from(defaults: &LayoutDefaults) -> Self {
        Self::resolve(&LayoutSpec::default(), defaults)
    }
}

/// The configured layouts with defaults already applied.
#[derive(Clone, Debug)]
pub struct LayoutCatalog {
    layouts: Vec<GridLayout>,
    fallback: GridLayout,
    aspect_defaults: Vec<AspectDefault>,
}

impl LayoutCatalog {
    pub fn new(
        layouts: Vec<GridLayout>,
        fallback: GridLayout,
        aspect_defaults: Vec<AspectDefault>,
    ) -> Self {
        Self { layouts, fallback, aspect_defaults }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.layouts.iter().map(|spec| GridLayout::resolve(spec, &config.defaults)).collect(),
            GridLayout::from(&config.defaults),
            config.settings.aspect_defaults.clone(),
        )
    }

    pub fn len(&self) -> usize { self.layouts.len().max(1) }

    /// Layout at `index`, falling back to the first layout, then to the
    /// default parameters when no layouts are configured.
    pub fn get(&self, index: usize) -> &GridLayout {
        self.layouts.get(index).or(self.layouts.first()).unwrap_or(&self.fallback)
    }

    /// Initial layout for a group whose usable area is `area`: the entry of
    /// `aspect_defaults` with the largest `min_ratio` not above the area's
    /// aspect ratio, or the first layout.
    pub fn default_index(&self, area: Rect) -> usize {
        let ratio = area.aspect_ratio();
        self.aspect_defaults
            .iter()
            .filter(|d| d.min_ratio <= ratio && d.layout < self.len())
            .max_by(|a, b| a.min_ratio.total_cmp(&b.min_ratio))
            .map(|d| d.layout)
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug, PartialEq)]
struct GroupLayout {
    index: usize,
    /// Edges reshaped by interactive resizes; wins over `index` until the
    /// next layout switch.
    custom: Option<GridLayout>,
}

/// Per-group layout selection and customization.
#[derive(Clone, Debug, Default)]
pub struct LayoutSelections {
    groups: HashMap<GroupKey, GroupLayout>,
}

impl LayoutSelections {
    /// The layout in effect for `group`. Groups never seen before resolve to
    /// the catalog's default for `area` without being recorded.
    pub fn resolve(&self, group: &GroupKey, catalog: &LayoutCatalog, area: Rect) -> GridLayout {
        match self.groups.get(group) {
            Some(GroupLayout { custom: Some(custom), .. }) => custom.clone(),
            Some(GroupLayout { index, .. }) => catalog.get(*index).clone(),
            None => catalog.get(catalog.default_index(area)).clone(),
        }
    }

    pub fn selected_index(&self, group: &GroupKey) -> Option<usize> {
        self.groups.get(group).map(|g| g.index)
    }

    pub fn is_customized(&self, group: &GroupKey) -> bool {
        self.groups.get(group).is_some_and(|g| g.custom.is_some())
    }

    /// Moves the group's selection one step, clamped to the catalog, and
    /// discards any customization. Returns the new index.
    pub fn switch(
        &mut self,
        group: &GroupKey,
        step: LayoutStep,
        catalog: &LayoutCatalog,
        area: Rect,
    ) -> usize {
        let entry = self.entry(group, catalog, area);
        let last = catalog.len() as isize - 1;
        entry.index = (entry.index as isize + step.offset()).clamp(0, last) as usize;
        entry.custom = None;
        debug!(%group, index = entry.index, "switched layout");
        entry.index
    }

    pub fn customize(
        &mut self,
        group: &GroupKey,
        layout: GridLayout,
        catalog: &LayoutCatalog,
        area: Rect,
    ) {
        self.entry(group, catalog, area).custom = Some(layout);
    }

    fn entry(&mut self, group: &GroupKey, catalog: &LayoutCatalog, area: Rect) -> &mut GroupLayout {
        self.groups.entry(group.clone()).or_insert_with(|| GroupLayout {
            index: catalog.default_index(area),
            custom: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn defaults() -> LayoutDefaults { LayoutDefaults::default() }

    fn catalog() -> LayoutCatalog {
        let specs = [
            LayoutSpec {
                v_edges: Some(vec![0.0, 0.3, 0.7, 1.0]),
                gap: Some(20.0),
                ..Default::default()
            },
            LayoutSpec {
                v_edges: Some(vec![0.0, 0.4, 1.0]),
                no_border: Some(true),
                ..Default::default()
            },
        ];
        LayoutCatalog::new(
            specs.iter().map(|s| GridLayout::resolve(s, &defaults())).collect(),
            GridLayout::from(&defaults()),
            vec![AspectDefault { min_ratio: 2.0, layout: 1 }],
        )
    }

    fn area() -> Rect { Rect::new(0.0, 0.0, 1600.0, 900.0) }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let layout = catalog().get(0).clone();
        assert_eq!(layout.v_edges, vec![0.0, 0.3, 0.7, 1.0]);
        assert_eq!(layout.h_edges, defaults().h_edges);
        assert_eq!(layout.gap, 20.0);
        assert_eq!(layout.cascade_indent, defaults().cascade_indent);
        assert!(!layout.no_border);
    }

    #[test]
    fn empty_catalog_uses_default_record() {
        let catalog = LayoutCatalog::new(vec![], GridLayout::from(&defaults()), vec![]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(5), &GridLayout::from(&defaults()));
    }

    #[test]
    fn switching_clamps_at_both_ends() {
        let catalog = catalog();
        let mut selections = LayoutSelections::default();
        let group = GroupKey::plain(0, 1);
        assert_eq!(selections.switch(&group, LayoutStep::Prev, &catalog, area()), 0);
        assert_eq!(selections.switch(&group, LayoutStep::Next, &catalog, area()), 1);
        assert_eq!(selections.switch(&group, LayoutStep::Next, &catalog, area()), 1);
        assert_eq!(selections.resolve(&group, &catalog, area()).v_edges, vec![0.0, 0.4, 1.0]);
    }

    #[test]
    fn switching_discards_customization() {
        let catalog = catalog();
        let mut selections = LayoutSelections::default();
        let group = GroupKey::plain(0, 1);
        let mut custom = catalog.get(0).clone();
        custom.v_edges[1] = 0.35;
        selections.customize(&group, custom.clone(), &catalog, area());
        assert!(selections.is_customized(&group));
        assert_eq!(selections.resolve(&group, &catalog, area()), custom);

        selections.switch(&group, LayoutStep::Next, &catalog, area());
        assert!(!selections.is_customized(&group));
    }

    #[test]
    fn wide_outputs_start_on_their_aspect_default() {
        let catalog = catalog();
        let selections = LayoutSelections::default();
        let ultrawide = Rect::new(0.0, 0.0, 3440.0, 1440.0);
        assert_eq!(catalog.default_index(ultrawide), 1);
        assert_eq!(catalog.default_index(area()), 0);
        assert_eq!(
            selections.resolve(&GroupKey::plain(1, 1), &catalog, ultrawide).v_edges,
            vec![0.0, 0.4, 1.0]
        );
        assert_eq!(selections.selected_index(&GroupKey::plain(1, 1)), None);
    }
}
