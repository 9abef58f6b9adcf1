use crate::haplogroup::options::AssignOptions;
use crate::haplogroup::ranking::round_score;
use crate::haplogroup::types::{SampleAssignment, ScoredHaplogroup};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HaplogroupExport {
    pub analysis_type: HaplogroupType,
    pub parameters: ScoringParameters,
    pub samples: Vec<SampleResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum HaplogroupType {
    #[serde(rename = "Y-DNA")]
    YDna,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoringParameters {
    pub min_hap_score: f64,
    pub min_deep_score: f64,
    pub ancestral_hg_depth: usize,
    pub truncate_haps: Option<String>,
}

impl From<&AssignOptions> for ScoringParameters {
    fn from(options: &AssignOptions) -> Self {
        Self {
            min_hap_score: options.min_hap_score,
            min_deep_score: options.min_deep_score,
            ancestral_hg_depth: options.ancestral_hg_depth,
            truncate_haps: options
                .truncate_haps
                .as_ref()
                .map(|p| p.display().to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SampleResult {
    pub sample_id: String,
    pub status: String, // "leaf", "root_fallback", "no_match"
    pub haplogroup: Option<String>,
    pub reported_haplogroup: Option<String>,
    pub score: Option<f64>,
    pub defining_markers: Vec<String>,
    /// Whether candidates were restricted to haplogroups with derived ancestors.
    pub parent_supported: bool,
    pub candidates: Vec<CandidateScore>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CandidateScore {
    pub haplogroup: String,
    pub score: f64,
    pub derived_markers: u32,
    pub genotyped_markers: u32,
}

impl From<&ScoredHaplogroup> for CandidateScore {
    fn from(scored: &ScoredHaplogroup) -> Self {
        Self {
            haplogroup: scored.name.clone(),
            score: round_score(scored.score),
            derived_markers: scored.derived,
            genotyped_markers: scored.genotyped,
        }
    }
}

impl From<&SampleAssignment> for SampleResult {
    fn from(result: &SampleAssignment) -> Self {
        Self {
            sample_id: result.sample_id.clone(),
            status: result.assignment.status().to_string(),
            haplogroup: result.assignment.haplogroup().map(str::to_string),
            reported_haplogroup: result.reported_haplogroup.clone(),
            score: result.assignment.score().map(round_score),
            defining_markers: result.markers.clone(),
            parent_supported: result.strict,
            candidates: result.ranked.iter().map(CandidateScore::from).collect(),
        }
    }
}
