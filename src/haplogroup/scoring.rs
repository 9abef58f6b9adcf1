use crate::haplogroup::tally::TallyMatrix;
use crate::haplogroup::tree::HaplogroupTree;
use crate::haplogroup::types::{CleanedCatalog, HaplogroupScores, ScoredHaplogroup};

/// Number of ancestral haplogroups checked for derived support by default.
pub const DEFAULT_ANCESTRAL_HG_DEPTH: usize = 2;

/// Scores haplogroups for one sample at a time against a shared tally.
///
/// A haplogroup's score is the fraction of genotyped markers called derived,
/// pooled over the haplogroup and every catalogued ancestor. Haplogroups whose
/// parent or grandparent (up to `ancestral_hg_depth` steps) carries derived
/// calls of its own are preferred; when none qualify every scored haplogroup is
/// returned instead.
pub struct HaplogroupScorer<'a> {
    catalog: &'a CleanedCatalog,
    tally: &'a TallyMatrix,
    /// Per haplogroup: itself plus its catalogued ancestors, nearest first.
    lineages: Vec<Vec<usize>>,
    /// Per haplogroup: catalogued ancestors within `ancestral_hg_depth` steps.
    support: Vec<Vec<usize>>,
}

impl<'a> HaplogroupScorer<'a> {
    pub fn new(
        catalog: &'a CleanedCatalog,
        tree: &HaplogroupTree,
        tally: &'a TallyMatrix,
        ancestral_hg_depth: usize,
    ) -> Self {
        let mut lineages = Vec::with_capacity(catalog.len());
        let mut support = Vec::with_capacity(catalog.len());

        for (idx, hg) in catalog.iter().enumerate() {
            let mut lineage = vec![idx];
            lineage.extend(
                tree.ancestors(&hg.name)
                    .into_iter()
                    .filter_map(|a| catalog.index_of(a)),
            );
            lineages.push(lineage);

            let mut near = Vec::new();
            let mut current = hg.name.as_str();
            for _ in 0..ancestral_hg_depth {
                let Some(parent) = tree.parent(current) else {
                    break;
                };
                if let Some(idx) = catalog.index_of(parent) {
                    near.push(idx);
                }
                current = parent;
            }
            support.push(near);
        }

        Self {
            catalog,
            tally,
            lineages,
            support,
        }
    }

    pub fn score_sample(&self, sample: usize) -> HaplogroupScores {
        let (strict, all) = self.score_both(sample);
        if strict.is_empty() {
            HaplogroupScores::new(all, false)
        } else {
            HaplogroupScores::new(strict, true)
        }
    }

    /// The parent-supported and unfiltered score lists, in catalog order.
    pub fn score_both(&self, sample: usize) -> (Vec<ScoredHaplogroup>, Vec<ScoredHaplogroup>) {
        let own = self.tally.derived_row(sample);
        let mut strict = Vec::new();
        let mut all = Vec::new();

        for (idx, &own_derived) in own.iter().enumerate() {
            if own_derived == 0 {
                continue;
            }

            let (derived, genotyped) = self.lineages[idx]
                .iter()
                .fold((0u32, 0u32), |(d, g), &a| {
                    (
                        d + self.tally.derived(sample, a),
                        g + self.tally.genotyped(sample, a),
                    )
                });
            if genotyped == 0 {
                continue;
            }

            let scored = ScoredHaplogroup {
                name: self.catalog.name(idx).to_string(),
                score: derived as f64 / genotyped as f64,
                derived,
                genotyped,
            };
            if self.support[idx].iter().any(|&a| own[a] > 0) {
                strict.push(scored.clone());
            }
            all.push(scored);
        }

        (strict, all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haplogroup::tally::{build_tally, clean_catalog};
    use crate::haplogroup::types::{AllelePair, MarkerCatalog, SampleGenotypes};
    use crate::reference::MarkerPanel;

    // Each haplogroup gets markers "<hg>.<i>" at positions "<hg>:<i>", derived allele T.
    fn fixture(hgs: &[(&str, usize)]) -> (CleanedCatalog, MarkerPanel) {
        let mut panel = MarkerPanel::default();
        let mut catalog = MarkerCatalog::new();
        for (hg, n) in hgs {
            let mut markers = Vec::new();
            for i in 0..*n {
                let id = format!("{hg}.{i}");
                let pos = format!("{hg}:{i}");
                panel.insert_id(id.clone(), pos.clone());
                panel.insert_alleles(
                    pos,
                    AllelePair { ancestral: "C".into(), derived: "T".into() },
                );
                markers.push(id);
            }
            catalog.push(*hg, markers);
        }
        (clean_catalog(&catalog, &panel), panel)
    }

    #[test]
    fn scores_pool_ancestral_markers() {
        let (catalog, _) = fixture(&[("R1b", 2), ("R1b1", 2)]);
        let tree = HaplogroupTree::default();
        let sample = SampleGenotypes::new("S1")
            .with_call("R1b:0", "T")
            .with_call("R1b:1", "C")
            .with_call("R1b1:0", "T")
            .with_no_call("R1b1:1");
        let tally = build_tally(&[sample], &catalog);
        let scorer = HaplogroupScorer::new(&catalog, &tree, &tally, DEFAULT_ANCESTRAL_HG_DEPTH);

        let scores = scorer.score_sample(0);
        assert!(scores.is_strict());
        // only R1b1 has a derived parent
        assert_eq!(scores.len(), 1);
        assert!((scores.get("R1b1").unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn falls_back_to_all_without_parent_support() {
        let (catalog, _) = fixture(&[("J2", 1), ("E1b", 1)]);
        let tree = HaplogroupTree::default();
        let sample = SampleGenotypes::new("S1")
            .with_call("J2:0", "T")
            .with_call("E1b:0", "C");
        let tally = build_tally(&[sample], &catalog);
        let scorer = HaplogroupScorer::new(&catalog, &tree, &tally, DEFAULT_ANCESTRAL_HG_DEPTH);

        let (strict, all) = scorer.score_both(0);
        assert!(strict.is_empty());
        assert_eq!(all.len(), 1);

        let scores = scorer.score_sample(0);
        assert!(!scores.is_strict());
        assert_eq!(scores.get("J2"), Some(1.0));
        assert_eq!(scores.get("E1b"), None);
    }

    #[test]
    fn strict_is_subset_of_all_and_scores_are_fractions() {
        let (catalog, _) = fixture(&[("R", 1), ("R1", 2), ("R1b", 3), ("R1b1a", 1), ("I1", 2)]);
        let tree = HaplogroupTree::default();
        let sample = SampleGenotypes::new("S1")
            .with_call("R:0", "T")
            .with_call("R1:0", "C")
            .with_call("R1:1", "T")
            .with_call("R1b:0", "T")
            .with_call("R1b:1", "T")
            .with_no_call("R1b:2")
            .with_call("R1b1a:0", "T")
            .with_call("I1:0", "T");
        let tally = build_tally(&[sample], &catalog);
        let scorer = HaplogroupScorer::new(&catalog, &tree, &tally, DEFAULT_ANCESTRAL_HG_DEPTH);

        let (strict, all) = scorer.score_both(0);
        for s in &strict {
            assert!(all.contains(s));
        }
        for s in &all {
            assert!(s.score > 0.0 && s.score <= 1.0, "{} out of range", s.name);
        }
        // R1b1a's parent R1b1 is not catalogued, grandparent R1b is derived
        assert!(strict.iter().any(|s| s.name == "R1b1a"));
        // R has no catalogued ancestor with derived calls
        assert!(!strict.iter().any(|s| s.name == "R"));
    }

    #[test]
    fn depth_zero_disables_parent_support() {
        let (catalog, _) = fixture(&[("R1", 1), ("R1b", 1)]);
        let tree = HaplogroupTree::default();
        let sample = SampleGenotypes::new("S1")
            .with_call("R1:0", "T")
            .with_call("R1b:0", "T");
        let tally = build_tally(&[sample], &catalog);
        let scorer = HaplogroupScorer::new(&catalog, &tree, &tally, 0);

        let scores = scorer.score_sample(0);
        assert!(!scores.is_strict());
        assert_eq!(scores.len(), 2);
    }
}
