use regex::Regex;
use tracing::warn;

use crate::common::collections::HashSet;
use crate::common::config::IgnoreRules;
use crate::sys::host::WindowSnapshot;

/// Decides which windows the engine leaves alone.
pub trait WindowFilter {
    fn ignores(&self, window: &WindowSnapshot) -> bool;
}

impl<F> WindowFilter for F
where F: Fn(&WindowSnapshot) -> bool
{
    fn ignores(&self, window: &WindowSnapshot) -> bool { self(window) }
}

/// The configured `[ignore]` rules.
#[derive(Debug, Default)]
pub struct RuleFilter {
    special: bool,
    transient: bool,
    unresizable: bool,
    app_ids: HashSet<String>,
    titles: Vec<Regex>,
}

impl RuleFilter {
    /// Compiles the rules. Patterns that fail to compile are skipped; config
    /// validation reports them before this point.
    pub fn new(rules: &IgnoreRules) -> Self {
        let titles = rules
            .title_regex
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    warn!(pattern, "skipping invalid title pattern: {e}");
                    None
                }
            })
            .collect();
        Self {
            special: rules.special,
            transient: rules.transient,
            unresizable: rules.unresizable,
            app_ids: rules.app_ids.iter().cloned().collect(),
            titles,
        }
    }
}

impl WindowFilter for RuleFilter {
    fn ignores(&self, window: &WindowSnapshot) -> bool {
        (self.special && window.special)
            || (self.transient && window.transient)
            || (self.unresizable && !window.resizable)
            || self.app_ids.contains(&window.app_id)
            || self.titles.iter().any(|re| re.is_match(&window.title))
    }
}
