use crate::haplogroup::types::{HaplogroupScores, ScoredHaplogroup};

/// All scored haplogroups, best first: score descending, then longer (more
/// specific) names first. Remaining ties list later catalog entries first.
pub fn rank_candidates(scores: &HaplogroupScores) -> Vec<ScoredHaplogroup> {
    let mut ranked: Vec<ScoredHaplogroup> = scores.iter().rev().cloned().collect();
    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.name.chars().count().cmp(&a.name.chars().count()))
    });
    ranked
}

/// Rounds to 3 decimal places.
pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// Shortest decimal form of the rounded score, always with a fractional part
/// (`1.0`, `0.5`, `0.667`).
pub fn format_score(score: f64) -> String {
    format!("{:?}", round_score(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_score_then_name_length() {
        let scores = HaplogroupScores::from_pairs([
            ("R1", 1.0),
            ("R1b1a2", 0.9),
            ("R1b", 1.0),
            ("I2", 0.9),
            ("J", 0.5),
        ]);
        let names: Vec<String> = rank_candidates(&scores).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["R1b", "R1", "R1b1a2", "I2", "J"]);
    }

    #[test]
    fn equal_score_and_length_lists_later_entries_first() {
        let scores = HaplogroupScores::from_pairs([("R1a", 0.8), ("R1b", 0.8)]);
        let names: Vec<String> = rank_candidates(&scores).into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["R1b", "R1a"]);
    }

    #[test]
    fn formats_like_rounded_decimals() {
        assert_eq!(format_score(1.0), "1.0");
        assert_eq!(format_score(0.5), "0.5");
        assert_eq!(format_score(2.0 / 3.0), "0.667");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(0.8571428), "0.857");
    }
}
