use crate::haplogroup::tree::HaplogroupTree;
use std::collections::{HashMap, HashSet};

/// Collapses assignments to a coarser reporting level. Each haplogroup maps to
/// its nearest ancestor-or-self found in the stop-list, or to itself when
/// nothing on its lineage is listed.
#[derive(Debug, Clone, Default)]
pub struct TruncationMap {
    stops: HashSet<String>,
    mapped: HashMap<String, String>,
}

impl TruncationMap {
    pub fn identity() -> Self {
        Self::default()
    }

    /// Precomputes the mapping for every name in `haplogroups`.
    pub fn new<'a>(
        stops: impl IntoIterator<Item = String>,
        haplogroups: impl IntoIterator<Item = &'a str>,
        tree: &HaplogroupTree,
    ) -> Self {
        let stops: HashSet<String> = stops.into_iter().collect();
        let mapped = haplogroups
            .into_iter()
            .map(|hg| (hg.to_string(), nearest_stop(&stops, hg, tree).to_string()))
            .collect();
        Self { stops, mapped }
    }

    pub fn is_identity(&self) -> bool {
        self.stops.is_empty()
    }

    /// Reported name for `hg`. Names outside the precomputed set are resolved
    /// on demand.
    pub fn truncate(&self, hg: &str, tree: &HaplogroupTree) -> String {
        if self.is_identity() {
            return hg.to_string();
        }
        match self.mapped.get(hg) {
            Some(truncated) => truncated.clone(),
            None => nearest_stop(&self.stops, hg, tree).to_string(),
        }
    }
}

fn nearest_stop<'a>(stops: &HashSet<String>, hg: &'a str, tree: &'a HaplogroupTree) -> &'a str {
    if stops.contains(hg) {
        return hg;
    }
    tree.ancestors(hg)
        .into_iter()
        .find(|a| stops.contains(*a))
        .unwrap_or(hg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(stops: &[&str], hgs: &[&str], tree: &HaplogroupTree) -> TruncationMap {
        TruncationMap::new(
            stops.iter().map(|s| s.to_string()),
            hgs.iter().copied(),
            tree,
        )
    }

    #[test]
    fn maps_to_nearest_listed_ancestor() {
        let tree = HaplogroupTree::default();
        let trunc = map(&["R1b", "R1b1a2"], &["R1b1a2a1", "R1b1c", "R1a1", "R1b"], &tree);
        assert_eq!(trunc.truncate("R1b1a2a1", &tree), "R1b1a2");
        assert_eq!(trunc.truncate("R1b1c", &tree), "R1b");
        assert_eq!(trunc.truncate("R1a1", &tree), "R1a1");
        assert_eq!(trunc.truncate("R1b", &tree), "R1b");
    }

    #[test]
    fn uncatalogued_names_resolve_on_demand() {
        let tree = HaplogroupTree::default();
        let trunc = map(&["E1b"], &["E1b1"], &tree);
        assert_eq!(trunc.truncate("E1b1b1a", &tree), "E1b");
        assert_eq!(trunc.truncate("A0-T", &tree), "A0-T");
    }

    #[test]
    fn truncation_is_idempotent() {
        let tree = HaplogroupTree::new(
            [("R".to_string(), "P".to_string())].into_iter().collect(),
        )
        .unwrap();
        let hgs = ["R1b1a2", "R1", "P1", "Q1a", "P"];
        let trunc = map(&["P", "R1b"], &hgs, &tree);
        for hg in hgs {
            let once = trunc.truncate(hg, &tree);
            assert_eq!(trunc.truncate(&once, &tree), once);
        }
        assert_eq!(trunc.truncate("R1", &tree), "P");
    }

    #[test]
    fn identity_without_stop_list() {
        let tree = HaplogroupTree::default();
        let trunc = TruncationMap::identity();
        assert!(trunc.is_identity());
        assert_eq!(trunc.truncate("R1b1a2", &tree), "R1b1a2");
    }
}
