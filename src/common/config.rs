use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::{Deserialize, Serialize};

use super::collections::BTreeMap;
use crate::actor::reactor::Command;
use crate::layout_engine::MinCellSize;

pub fn data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(std::env::temp_dir).join("flexgrid")
}
pub fn placement_file() -> PathBuf { data_dir().join("placements.ron") }
pub fn config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flexgrid")
        .join("config.toml")
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    /// Parameters every layout inherits unless it sets its own.
    #[serde(default)]
    pub defaults: LayoutDefaults,
    #[serde(default)]
    pub layouts: Vec<LayoutSpec>,
    #[serde(default)]
    pub ignore: IgnoreRules,
    /// Host-level trigger (e.g. a key chord) to command.
    #[serde(default)]
    pub keys: BTreeMap<String, Command>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Re-tile newly opened windows where their application was last tiled.
    #[serde(default = "yes")]
    pub auto_tile: bool,
    /// Narrowest column an interactive resize may leave, in pixels.
    #[serde(default = "default_min_cell")]
    pub min_cell_width: f64,
    /// Shortest row an interactive resize may leave, in pixels.
    #[serde(default = "default_min_cell")]
    pub min_cell_height: f64,
    /// Initial layout per output shape. A group starts on the layout of the
    /// entry with the largest `min_ratio` not above its width / height.
    #[serde(default)]
    pub aspect_defaults: Vec<AspectDefault>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_tile: true,
            min_cell_width: default_min_cell(),
            min_cell_height: default_min_cell(),
            aspect_defaults: Vec::new(),
        }
    }
}

impl Settings {
    pub fn min_cell(&self) -> MinCellSize {
        MinCellSize {
            width: self.min_cell_width,
            height: self.min_cell_height,
        }
    }

    pub fn validate(&self, layout_count: usize) -> Vec<String> {
        let mut issues = Vec::new();

        if self.min_cell_width < 0.0 {
            issues.push(format!(
                "min_cell_width must be non-negative, got {}",
                self.min_cell_width
            ));
        }
        if self.min_cell_height < 0.0 {
            issues.push(format!(
                "min_cell_height must be non-negative, got {}",
                self.min_cell_height
            ));
        }

        for (index, aspect) in self.aspect_defaults.iter().enumerate() {
            if aspect.min_ratio <= 0.0 {
                issues.push(format!(
                    "aspect_defaults[{index}].min_ratio must be positive, got {}",
                    aspect.min_ratio
                ));
            }
            if aspect.layout >= layout_count.max(1) {
                issues.push(format!(
                    "aspect_defaults[{index}] references layout {} but only {} are configured",
                    aspect.layout,
                    layout_count.max(1)
                ));
            }
        }

        issues
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct AspectDefault {
    pub min_ratio: f64,
    pub layout: usize,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LayoutDefaults {
    #[serde(default = "default_edges")]
    pub v_edges: Vec<f64>,
    #[serde(default = "default_edges")]
    pub h_edges: Vec<f64>,
    #[serde(default)]
    pub gap: f64,
    #[serde(default = "default_cascade_indent")]
    pub cascade_indent: f64,
    #[serde(default)]
    pub no_border: bool,
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            v_edges: default_edges(),
            h_edges: default_edges(),
            gap: 0.0,
            cascade_indent: default_cascade_indent(),
            no_border: false,
        }
    }
}

/// One configured grid. Unset fields come from [`LayoutDefaults`].
///
/// `v_edges` and `h_edges` are cut lines relative to the usable area: 0 is
/// the left (top) edge, 1 the right (bottom) edge. Both need at least two
/// strictly increasing values.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct LayoutSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub v_edges: Option<Vec<f64>>,
    #[serde(default)]
    pub h_edges: Option<Vec<f64>>,
    /// Pixels between windows; doubled at the screen edge.
    #[serde(default)]
    pub gap: Option<f64>,
    /// Pixels each cascaded window is offset from the one before it.
    #[serde(default)]
    pub cascade_indent: Option<f64>,
    #[serde(default)]
    pub no_border: Option<bool>,
}

/// Which windows are never tiled.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct IgnoreRules {
    /// Docks, panels, desktops, notifications.
    #[serde(default = "yes")]
    pub special: bool,
    /// Dialogs and other windows attached to a parent.
    #[serde(default = "yes")]
    pub transient: bool,
    #[serde(default = "yes")]
    pub unresizable: bool,
    /// Application ids (window classes) matched exactly.
    #[serde(default)]
    pub app_ids: Vec<String>,
    /// Regular expressions matched against window titles.
    #[serde(default)]
    pub title_regex: Vec<String>,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            special: true,
            transient: true,
            unresizable: true,
            app_ids: Vec::new(),
            title_regex: Vec::new(),
        }
    }
}

impl IgnoreRules {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for (index, app_id) in self.app_ids.iter().enumerate() {
            if app_id.is_empty() {
                issues.push(format!("ignore.app_ids[{index}] is empty"));
            }
        }
        for (index, pattern) in self.title_regex.iter().enumerate() {
            if pattern.is_empty() {
                issues.push(format!("ignore.title_regex[{index}] is empty"));
            } else if let Err(e) = regex::Regex::new(pattern) {
                issues.push(format!("ignore.title_regex[{index}] is invalid: {e}"));
            }
        }
        issues
    }
}

fn validate_edges(what: &str, edges: &[f64]) -> Vec<String> {
    let mut issues = Vec::new();
    if edges.len() < 2 {
        issues.push(format!("{what} needs at least two cut points, got {}", edges.len()));
    }
    if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
        issues.push(format!("{what} must be strictly increasing, got {edges:?}"));
    }
    if edges.iter().any(|e| !(0.0..=1.0).contains(e)) {
        issues.push(format!("{what} must lie between 0 and 1, got {edges:?}"));
    }
    issues
}

fn validate_spacing(what: &str, gap: Option<f64>, cascade_indent: Option<f64>) -> Vec<String> {
    let mut issues = Vec::new();
    if let Some(gap) = gap
        && gap < 0.0
    {
        issues.push(format!("{what}.gap must be non-negative, got {gap}"));
    }
    if let Some(indent) = cascade_indent
        && indent < 0.0
    {
        issues.push(format!("{what}.cascade_indent must be non-negative, got {indent}"));
    }
    issues
}

impl LayoutDefaults {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = validate_edges("defaults.v_edges", &self.v_edges);
        issues.extend(validate_edges("defaults.h_edges", &self.h_edges));
        issues.extend(validate_spacing("defaults", Some(self.gap), Some(self.cascade_indent)));
        issues
    }
}

impl LayoutSpec {
    pub fn validate(&self, index: usize) -> Vec<String> {
        let label = match &self.name {
            Some(name) => format!("layouts[{index}] ({name})"),
            None => format!("layouts[{index}]"),
        };
        let mut issues = Vec::new();
        if let Some(v_edges) = &self.v_edges {
            issues.extend(validate_edges(&format!("{label}.v_edges"), v_edges));
        }
        if let Some(h_edges) = &self.h_edges {
            issues.extend(validate_edges(&format!("{label}.h_edges"), h_edges));
        }
        issues.extend(validate_spacing(&label, self.gap, self.cascade_indent));
        issues
    }
}

fn yes() -> bool { true }

fn default_min_cell() -> f64 { 100.0 }

fn default_cascade_indent() -> f64 { 30.0 }

fn default_edges() -> Vec<f64> { vec![0.0, 0.5, 1.0] }

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)?;
        Self::parse(&buf)
    }

    pub fn default() -> Config {
        Self::parse(include_str!("../../flexgrid.default.toml"))
            .expect("bundled default config is valid")
    }

    /// Save the current config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;
        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        issues.extend(self.settings.validate(self.layouts.len()));
        issues.extend(self.defaults.validate());
        for (index, layout) in self.layouts.iter().enumerate() {
            issues.extend(layout.validate(index));
        }
        issues.extend(self.ignore.validate());

        for key in self.keys.keys() {
            if key.trim().is_empty() {
                issues.push("Empty key binding".to_string());
            }
        }

        issues
    }

    /// Parses and validates. Layouts that would make the engine misbehave are
    /// rejected here rather than at tiling time.
    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        let config: Config = match toml::from_str(buf) {
            Ok(config) => config,
            Err(e) => bail!("{e}"),
        };
        let issues = config.validate();
        if !issues.is_empty() {
            bail!("Invalid configuration:\n  {}", issues.join("\n  "));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::layout_engine::{Direction, LayoutStep};

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        let issues = config.validate();
        assert!(issues.is_empty(), "Expected no issues, got: {:?}", issues);
        assert_eq!(config.layouts.len(), 4);
        assert_eq!(config.defaults.cascade_indent, 30.0);
        assert_eq!(config.keys.get("Meta+Right"), Some(&Command::Move(Direction::Right)));
        assert_eq!(
            config.keys.get("Meta+Ctrl+Left"),
            Some(&Command::SwitchLayout(LayoutStep::Prev))
        );
        assert_eq!(config.keys.get("Meta+End"), Some(&Command::Restore));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.layouts.is_empty());
        assert_eq!(config.defaults, LayoutDefaults::default());
        assert_eq!(config.settings, Settings::default());
        assert_eq!(config.ignore, IgnoreRules::default());
    }

    #[test]
    fn test_layouts_parse_with_partial_fields() {
        let config = Config::parse(
            r#"
            [defaults]
            gap = 4

            [[layouts]]
            name = "wide"
            v_edges = [0, 0.3, 0.7, 1]
            gap = 20

            [[layouts]]
            no_border = true
            "#,
        )
        .unwrap();
        assert_eq!(config.defaults.gap, 4.0);
        assert_eq!(config.layouts[0].v_edges, Some(vec![0.0, 0.3, 0.7, 1.0]));
        assert_eq!(config.layouts[0].h_edges, None);
        assert_eq!(config.layouts[1].no_border, Some(true));
    }

    #[test]
    fn test_single_cut_point_is_rejected() {
        let err = Config::parse("[[layouts]]\nv_edges = [0.5]\n").unwrap_err();
        assert!(err.to_string().contains("at least two cut points"), "{err}");
    }

    #[test]
    fn test_non_increasing_cut_points_are_rejected() {
        let spec = LayoutSpec {
            h_edges: Some(vec![0.0, 0.6, 0.6, 1.0]),
            ..Default::default()
        };
        let issues = spec.validate(2);
        assert!(issues.iter().any(|i| i.contains("layouts[2].h_edges must be strictly increasing")));
    }

    #[test]
    fn test_out_of_range_cut_points_are_rejected() {
        let mut defaults = LayoutDefaults::default();
        defaults.v_edges = vec![-0.1, 0.5, 1.2];
        let issues = defaults.validate();
        assert!(issues.iter().any(|i| i.contains("between 0 and 1")));
    }

    #[test]
    fn test_negative_spacing_is_rejected() {
        let spec = LayoutSpec {
            name: Some("tight".into()),
            gap: Some(-1.0),
            cascade_indent: Some(-2.0),
            ..Default::default()
        };
        let issues = spec.validate(0);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].starts_with("layouts[0] (tight).gap"));
    }

    #[test]
    fn test_aspect_default_must_reference_a_layout() {
        let mut settings = Settings::default();
        settings.aspect_defaults.push(AspectDefault { min_ratio: 2.0, layout: 3 });
        let issues = settings.validate(2);
        assert!(issues.iter().any(|i| i.contains("references layout 3")));
        assert!(settings.validate(4).is_empty());
    }

    #[test]
    fn test_invalid_title_regex_is_reported() {
        let mut ignore = IgnoreRules::default();
        ignore.title_regex.push("([unclosed".into());
        ignore.app_ids.push(String::new());
        let issues = ignore.validate();
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(Config::parse("[settings]\nauto_tiel = false\n").is_err());
    }

    #[test]
    fn test_save_round_trips_through_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::default();
        config.save(&path).unwrap();
        assert_eq!(Config::read(&path).unwrap(), config);
    }
}
