//! The two tab-separated output streams: `.out` holds one assignment per
//! sample, `.all` the ranked scores behind it.

use crate::error::{SnappyError, SnappyResult};
use crate::haplogroup::ranking::format_score;
use crate::haplogroup::types::{Assignment, SampleAssignment, ScoredHaplogroup};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const NO_MATCH: &str = "no match";

/// `sample, haplogroup, score, markers` or `sample, no match`.
pub fn format_assignment_line(result: &SampleAssignment) -> String {
    match &result.assignment {
        Assignment::NoMatch => format!("{}\t{}", result.sample_id, NO_MATCH),
        Assignment::Leaf { haplogroup, score } | Assignment::RootFallback { haplogroup, score } => {
            format!(
                "{}\t{}\t{}\t{}",
                result.sample_id,
                result.reported_haplogroup.as_deref().unwrap_or(haplogroup),
                format_score(*score),
                result.markers.join(",")
            )
        }
    }
}

/// `sample` followed by `haplogroup:score` for every ranked haplogroup.
pub fn format_ranking_line(sample_id: &str, ranked: &[ScoredHaplogroup]) -> String {
    let pairs: Vec<String> = ranked
        .iter()
        .map(|s| format!("{}:{}", s.name, format_score(s.score)))
        .collect();
    format!("{}\t{}", sample_id, pairs.join("\t"))
}

/// Parses a `.all` line back into the sample id and its scores.
pub fn parse_ranking_line(line: &str) -> SnappyResult<(String, Vec<(String, f64)>)> {
    let mut fields = line.trim_end_matches(['\r', '\n']).split('\t');
    let sample_id = fields.next().unwrap_or_default().to_string();

    let mut scores = Vec::new();
    for field in fields.filter(|f| !f.is_empty()) {
        let parsed = field
            .rsplit_once(':')
            .and_then(|(hg, score)| score.parse::<f64>().ok().map(|s| (hg.to_string(), s)));
        match parsed {
            Some(pair) => scores.push(pair),
            None => {
                return Err(SnappyError::Parse {
                    file: "ranking line".to_string(),
                    line: 1,
                    message: format!("malformed haplogroup:score pair '{}'", field),
                })
            }
        }
    }
    Ok((sample_id, scores))
}

/// Writes both output streams in sample order.
pub struct AssignmentWriter<W: Write> {
    out: W,
    all: W,
}

impl AssignmentWriter<BufWriter<File>> {
    /// Creates `<prefix>.out` and `<prefix>.all`.
    pub fn create(prefix: &Path) -> SnappyResult<Self> {
        let (out_path, all_path) = output_paths(prefix);
        Ok(Self::new(
            BufWriter::new(File::create(out_path)?),
            BufWriter::new(File::create(all_path)?),
        ))
    }
}

impl<W: Write> AssignmentWriter<W> {
    pub fn new(out: W, all: W) -> Self {
        Self { out, all }
    }

    pub fn write(&mut self, result: &SampleAssignment) -> SnappyResult<()> {
        writeln!(self.out, "{}", format_assignment_line(result))?;
        writeln!(
            self.all,
            "{}",
            format_ranking_line(&result.sample_id, &result.ranked)
        )?;
        Ok(())
    }

    pub fn finish(mut self) -> SnappyResult<(W, W)> {
        self.out.flush()?;
        self.all.flush()?;
        Ok((self.out, self.all))
    }
}

pub fn output_paths(prefix: &Path) -> (PathBuf, PathBuf) {
    let with_ext = |ext: &str| {
        let mut path = prefix.as_os_str().to_owned();
        path.push(ext);
        PathBuf::from(path)
    };
    (with_ext(".out"), with_ext(".all"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haplogroup::types::HaplogroupScores;
    use crate::haplogroup::ranking::rank_candidates;

    fn sample(assignment: Assignment, reported: Option<&str>, markers: &[&str]) -> SampleAssignment {
        SampleAssignment {
            sample_id: "S1".into(),
            assignment,
            reported_haplogroup: reported.map(str::to_string),
            markers: markers.iter().map(|m| m.to_string()).collect(),
            ranked: Vec::new(),
            strict: false,
        }
    }

    #[test]
    fn assignment_lines() {
        let leaf = sample(
            Assignment::Leaf { haplogroup: "R1b1a2".into(), score: 1.0 },
            Some("R1b"),
            &["M269", "S3/PF6399"],
        );
        assert_eq!(format_assignment_line(&leaf), "S1\tR1b\t1.0\tM269,S3/PF6399");

        let none = sample(Assignment::NoMatch, None, &[]);
        assert_eq!(format_assignment_line(&none), "S1\tno match");

        let root = sample(
            Assignment::RootFallback { haplogroup: "A0-T".into(), score: 0.0 },
            Some("A0-T"),
            &[],
        );
        assert_eq!(format_assignment_line(&root), "S1\tA0-T\t0.0\t");
    }

    #[test]
    fn ranking_line_parses_back() {
        let scores = HaplogroupScores::from_pairs([
            ("R1b1a2", 2.0 / 3.0),
            ("R1b", 1.0),
            ("I1", 0.25),
        ]);
        let ranked = rank_candidates(&scores);
        let line = format_ranking_line("S7", &ranked);
        assert_eq!(line, "S7\tR1b:1.0\tR1b1a2:0.667\tI1:0.25");

        let (sample_id, parsed) = parse_ranking_line(&line).unwrap();
        assert_eq!(sample_id, "S7");
        assert_eq!(parsed.len(), scores.len());
        for (hg, score) in parsed {
            let expected = scores.get(&hg).unwrap();
            assert!((expected - score).abs() <= 0.0005);
        }
    }

    #[test]
    fn writer_emits_both_streams() {
        let mut writer = AssignmentWriter::new(Vec::new(), Vec::new());
        let mut result = sample(Assignment::NoMatch, None, &[]);
        result.sample_id = "S2".into();
        writer.write(&result).unwrap();
        let (out, all) = writer.finish().unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "S2\tno match\n");
        assert_eq!(String::from_utf8(all).unwrap(), "S2\t\n");
    }

    #[test]
    fn output_paths_keep_dotted_prefixes() {
        let (out, all) = output_paths(Path::new("results/chrY_hgs.v1"));
        assert_eq!(out, PathBuf::from("results/chrY_hgs.v1.out"));
        assert_eq!(all, PathBuf::from("results/chrY_hgs.v1.all"));
    }
}
