//! Optional platform "solutions" and the set of currently enabled ones
//!
//! A solution is a named feature toggle. Pages consult the enabled set to
//! decide which extra sections to show. The set accepts arbitrary strings;
//! unknown identifiers are kept but never referenced by any page.

use std::collections::BTreeSet;

pub const PREDICTIVE_MAINTENANCE: &str = "predictive-maintenance";
pub const QUALITY_VISION: &str = "quality-vision";
pub const ENERGY_OPTIMIZATION: &str = "energy-optimization";
pub const PRODUCTION_SCHEDULING: &str = "production-scheduling";

/// Catalog entry for a known solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    pub id: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
}

/// Solutions the demo knows how to render
pub const CATALOG: [Solution; 4] = [
    Solution {
        id: PREDICTIVE_MAINTENANCE,
        name: "Predictive Maintenance",
        summary: "Forecasts asset failures from vibration and thermal telemetry",
    },
    Solution {
        id: QUALITY_VISION,
        name: "Quality Vision",
        summary: "Inline camera inspection with automatic defect classification",
    },
    Solution {
        id: ENERGY_OPTIMIZATION,
        name: "Energy Optimization",
        summary: "Shifts flexible loads away from tariff peaks",
    },
    Solution {
        id: PRODUCTION_SCHEDULING,
        name: "Production Scheduling",
        summary: "Re-sequences orders around predicted downtime",
    },
];

impl Solution {
    /// Looks up a catalog entry by identifier
    pub fn lookup(id: &str) -> Option<&'static Solution> {
        CATALOG.iter().find(|solution| solution.id == id)
    }
}

/// Set of enabled solution identifiers
///
/// Ordered so that rendering and reports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionSet {
    ids: BTreeSet<String>,
}

impl SolutionSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `id` is enabled
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Symmetric-difference update with a single identifier
    ///
    /// # Returns
    /// true if `id` is enabled after the call
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SolutionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_original_set() {
        let original: SolutionSet = [PREDICTIVE_MAINTENANCE, QUALITY_VISION].into_iter().collect();

        for id in [PREDICTIVE_MAINTENANCE, ENERGY_OPTIMIZATION, "not-a-solution"] {
            let mut set = original.clone();
            set.toggle(id);
            assert_ne!(set, original);
            set.toggle(id);
            assert_eq!(set, original);
        }
    }

    #[test]
    fn toggle_reports_new_state() {
        let mut set = SolutionSet::new();
        assert!(set.toggle(QUALITY_VISION));
        assert!(set.contains(QUALITY_VISION));
        assert!(!set.toggle(QUALITY_VISION));
        assert!(set.is_empty());
    }

    #[test]
    fn unknown_ids_are_accepted() {
        let mut set = SolutionSet::new();
        set.toggle("made-up");
        assert!(set.contains("made-up"));
        assert!(Solution::lookup("made-up").is_none());
    }

    #[test]
    fn iteration_is_sorted() {
        let set: SolutionSet = [QUALITY_VISION, ENERGY_OPTIMIZATION].into_iter().collect();
        let ids: Vec<_> = set.iter().collect();
        assert_eq!(ids, vec![ENERGY_OPTIMIZATION, QUALITY_VISION]);
    }

    #[test]
    fn catalog_lookup() {
        let solution = Solution::lookup(PREDICTIVE_MAINTENANCE).unwrap();
        assert_eq!(solution.name, "Predictive Maintenance");
    }
}
