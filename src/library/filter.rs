//! Material name filters.

use crate::config::Preferences;

/// Case-insensitive include/ignore filter for material names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaterialFilter {
    /// Substring a name must contain. Empty accepts everything.
    pub include: String,
    /// Exact names to leave out.
    pub ignore: Vec<String>,
    /// Accept every name regardless of the filters.
    pub bypass: bool,
}

/// Result of [`MaterialFilter::apply`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// Accepted names, input order.
    pub accepted: Vec<String>,
    /// How many names were filtered out.
    pub filtered: usize,
}

impl MaterialFilter {
    /// Filter configured in `prefs`.
    pub fn from_preferences(prefs: &Preferences, bypass: bool) -> Self {
        Self {
            include: prefs.material_filter.to_lowercase(),
            ignore: prefs.ignore_list(),
            bypass,
        }
    }

    /// Check a single name.
    pub fn accepts(&self, name: &str) -> bool {
        if self.bypass {
            return true;
        }
        let lower = name.to_lowercase();
        lower.contains(&self.include.to_lowercase())
            && !self.ignore.iter().any(|i| i.to_lowercase() == lower)
    }

    /// Filter a list of names.
    pub fn apply<S: AsRef<str>>(&self, names: &[S]) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();
        for name in names {
            let name = name.as_ref();
            if self.accepts(name) {
                outcome.accepted.push(name.to_string());
            } else {
                outcome.filtered += 1;
            }
        }
        outcome
    }
}
