use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sys::host::WindowSnapshot;

/// The scope layout selection and cascading apply to: one output, one
/// desktop, one set of activities.
///
/// Activities are kept sorted and deduplicated so two windows that belong to
/// the same activities compare equal no matter the order the host reports
/// them in.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub output: u32,
    pub desktop: u32,
    pub activities: Vec<String>,
}

impl GroupKey {
    pub fn new(output: u32, desktop: u32, activities: impl IntoIterator<Item = String>) -> Self {
        let mut activities: Vec<String> = activities.into_iter().collect();
        activities.sort();
        activities.dedup();
        Self { output, desktop, activities }
    }

    /// A group without activities.
    pub fn plain(output: u32, desktop: u32) -> Self {
        Self { output, desktop, activities: Vec::new() }
    }

    pub fn of(window: &WindowSnapshot) -> Self {
        Self::new(window.output, window.desktop, window.activities.iter().cloned())
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.output, self.desktop)?;
        if !self.activities.is_empty() {
            write!(f, "_{}", self.activities.join("+"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_order_does_not_matter() {
        let a = GroupKey::new(0, 1, ["work".to_string(), "home".to_string()]);
        let b = GroupKey::new(0, 1, ["home".to_string(), "work".to_string(), "home".to_string()]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "0_1_home+work");
    }

    #[test]
    fn outputs_and_desktops_separate_groups() {
        assert_ne!(GroupKey::plain(0, 1), GroupKey::plain(1, 1));
        assert_ne!(GroupKey::plain(0, 1), GroupKey::plain(0, 2));
        assert_eq!(GroupKey::plain(2, 3).to_string(), "2_3");
    }
}
