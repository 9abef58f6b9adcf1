pub mod formats;
pub mod tsv;

use crate::error::SnappyResult;
use crate::export::formats::haplogroup::{
    HaplogroupExport, HaplogroupType, SampleResult, ScoringParameters,
};
use crate::haplogroup::options::AssignOptions;
use crate::haplogroup::types::SampleAssignment;
use chrono::{DateTime, Utc};
use serde::de::{Deserializer, Error};
use serde::{Deserialize, Serialize, Serializer};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub const EXPORT_VERSION: &str = "1.0";

/// Root structure of the JSON run export
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisExport {
    pub version: String,
    #[serde(serialize_with = "serialize_datetime", deserialize_with = "deserialize_datetime")]
    pub created_at: DateTime<Utc>,
    pub tool_version: String,

    #[serde(flatten)]
    pub data: HaplogroupExport,

    pub metadata: ExportMetadata,
}

fn serialize_datetime<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339())
}

fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(D::Error::custom)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub genotype_input: String,
    pub reference_dir: String,
}

impl AnalysisExport {
    pub fn new(
        results: &[SampleAssignment],
        options: &AssignOptions,
        metadata: ExportMetadata,
    ) -> Self {
        Self {
            version: EXPORT_VERSION.to_string(),
            created_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            data: HaplogroupExport {
                analysis_type: HaplogroupType::YDna,
                parameters: ScoringParameters::from(options),
                samples: results.iter().map(SampleResult::from).collect(),
            },
            metadata,
        }
    }

    pub fn write_json(&self, path: &Path) -> SnappyResult<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haplogroup::types::{Assignment, ScoredHaplogroup};

    #[test]
    fn export_round_trips_through_json() {
        let results = vec![SampleAssignment {
            sample_id: "S1".into(),
            assignment: Assignment::Leaf { haplogroup: "R1b1a2".into(), score: 2.0 / 3.0 },
            reported_haplogroup: Some("R1b".into()),
            markers: vec!["M269".into()],
            ranked: vec![ScoredHaplogroup {
                name: "R1b1a2".into(),
                score: 2.0 / 3.0,
                derived: 2,
                genotyped: 3,
            }],
            strict: true,
        }];
        let export = AnalysisExport::new(
            &results,
            &AssignOptions::default(),
            ExportMetadata {
                genotype_input: "chrY".into(),
                reference_dir: "ref_files".into(),
            },
        );

        let json = serde_json::to_string(&export).unwrap();
        assert!(json.contains("\"analysis_type\":\"Y-DNA\""));

        let parsed: AnalysisExport = serde_json::from_str(&json).unwrap();
        let sample = &parsed.data.samples[0];
        assert_eq!(sample.status, "leaf");
        assert_eq!(sample.reported_haplogroup.as_deref(), Some("R1b"));
        assert!((sample.score.unwrap() - 0.667).abs() < 1e-9);
        assert_eq!(sample.candidates[0].genotyped_markers, 3);
        assert_eq!(parsed.created_at.timestamp(), export.created_at.timestamp());
    }
}
