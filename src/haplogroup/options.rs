use crate::error::{SnappyError, SnappyResult};
use crate::haplogroup::scoring::DEFAULT_ANCESTRAL_HG_DEPTH;
use crate::haplogroup::selection::{DEFAULT_MIN_DEEP_SCORE, DEFAULT_MIN_HAP_SCORE};
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AssignOptions {
    pub min_hap_score: f64,
    pub min_deep_score: f64,
    pub ancestral_hg_depth: usize,
    pub truncate_haps: Option<PathBuf>,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_HAP_SCORE,
            DEFAULT_MIN_DEEP_SCORE,
            DEFAULT_ANCESTRAL_HG_DEPTH,
        )
    }
}

impl AssignOptions {
    pub fn new(min_hap_score: f64, min_deep_score: f64, ancestral_hg_depth: usize) -> Self {
        Self {
            min_hap_score,
            min_deep_score,
            ancestral_hg_depth,
            truncate_haps: None,
        }
    }

    pub fn with_truncation(mut self, truncate_haps: Option<PathBuf>) -> Self {
        self.truncate_haps = truncate_haps;
        self
    }

    pub fn validate(&self) -> SnappyResult<()> {
        for (name, value) in [
            ("min_hap_score", self.min_hap_score),
            ("min_deep_score", self.min_deep_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SnappyError::InvalidConfig(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
