use crate::haplogroup::tree::HaplogroupTree;
use crate::haplogroup::types::{Assignment, HaplogroupScores, ScoredHaplogroup, ROOT};
use std::collections::HashSet;

pub const DEFAULT_MIN_HAP_SCORE: f64 = 0.75;
pub const DEFAULT_MIN_DEEP_SCORE: f64 = 0.8;

fn name_len(hg: &ScoredHaplogroup) -> usize {
    hg.name.chars().count()
}

/// Haplogroups scoring at least `min_hap_score` that are not an ancestor of
/// another such haplogroup. Roots never qualify.
pub fn find_leaves<'s>(
    scores: &'s HaplogroupScores,
    tree: &HaplogroupTree,
    min_hap_score: f64,
) -> Vec<&'s ScoredHaplogroup> {
    let candidates: Vec<&ScoredHaplogroup> = scores
        .iter()
        .filter(|s| s.score >= min_hap_score && tree.parent(&s.name).is_some())
        .collect();

    let dominated: HashSet<&str> = candidates
        .iter()
        .flat_map(|c| tree.ancestors(&c.name))
        .collect();

    candidates
        .into_iter()
        .filter(|c| !dominated.contains(c.name.as_str()))
        .collect()
}

/// Picks the final haplogroup for one sample.
///
/// The best-scoring leaf wins, unless a strictly longer-named leaf still
/// reaches `min_deep_score`. Without any leaf the sample falls back to `A0-T`.
pub fn select_leaf(
    scores: &HaplogroupScores,
    tree: &HaplogroupTree,
    min_hap_score: f64,
    min_deep_score: f64,
) -> Assignment {
    if scores.is_empty() {
        return Assignment::NoMatch;
    }

    let leaves = find_leaves(scores, tree, min_hap_score);
    let Some((&first, rest)) = leaves.split_first() else {
        return Assignment::RootFallback {
            haplogroup: ROOT.to_string(),
            score: scores.get(ROOT).unwrap_or(0.0),
        };
    };

    let mut best = first;
    let mut longest = first;
    for &leaf in rest {
        if leaf.score > best.score {
            best = leaf;
        }
        if name_len(leaf) > name_len(longest) {
            longest = leaf;
        }
    }

    if name_len(best) < name_len(longest) && longest.score >= min_deep_score {
        best = longest;
    }

    Assignment::Leaf {
        haplogroup: best.name.clone(),
        score: best.score,
    }
}
