pub mod options;
pub mod ranking;
pub mod scoring;
pub mod selection;
pub mod tally;
pub mod tree;
pub mod truncation;
pub mod types;
pub mod validation;

use crate::error::SnappyResult;
use crate::reference::{read_haplogroup_list, ReferenceData};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use options::AssignOptions;
use rayon::prelude::*;
use scoring::HaplogroupScorer;
use tree::HaplogroupTree;
use truncation::TruncationMap;
use types::{Assignment, CleanedCatalog, SampleAssignment, SampleGenotypes};

/// Scores every sample against the reference tree and picks one haplogroup
/// per sample. Results keep the input sample order.
pub fn analyze_haplogroups(
    samples: &[SampleGenotypes],
    reference: &ReferenceData,
    options: &AssignOptions,
    progress: &ProgressBar,
) -> SnappyResult<Vec<SampleAssignment>> {
    options.validate()?;
    validation::warn_on_empty_samples(samples);

    progress.set_message("Cleaning marker catalog...");
    let catalog = tally::clean_catalog(&reference.catalog, &reference.panel);
    validation::validate_reference(&catalog)?;
    info!(
        "{} of {} haplogroups have scorable markers",
        catalog.scorable_haplogroups(),
        catalog.len()
    );

    let truncation = match &options.truncate_haps {
        Some(path) => {
            let stops = read_haplogroup_list(path)?;
            info!("Truncating assignments at {} haplogroups from {}", stops.len(), path.display());
            TruncationMap::new(stops, catalog.iter().map(|hg| hg.name.as_str()), &reference.tree)
        }
        None => TruncationMap::identity(),
    };

    progress.set_message("Tallying derived markers...");
    let tally = tally::build_tally(samples, &catalog);

    info!("Minimum considered haplogroup score = {}", options.min_hap_score);
    info!("Minimum switch to deeper node score = {}", options.min_deep_score);
    progress.set_message(format!("Assigning haplogroups for {} samples...", samples.len()));

    let engine = AssignmentEngine {
        catalog: &catalog,
        tree: &reference.tree,
        scorer: HaplogroupScorer::new(
            &catalog,
            &reference.tree,
            &tally,
            options.ancestral_hg_depth,
        ),
        truncation: &truncation,
        options,
    };

    let results = samples
        .par_iter()
        .enumerate()
        .map(|(n, sample)| {
            let result = engine.assign(n, &sample.sample_id);
            progress.inc(1);
            result
        })
        .collect();

    Ok(results)
}

struct AssignmentEngine<'a> {
    catalog: &'a CleanedCatalog,
    tree: &'a HaplogroupTree,
    scorer: HaplogroupScorer<'a>,
    truncation: &'a TruncationMap,
    options: &'a AssignOptions,
}

impl AssignmentEngine<'_> {
    fn assign(&self, sample: usize, sample_id: &str) -> SampleAssignment {
        let scores = self.scorer.score_sample(sample);
        let assignment = selection::select_leaf(
            &scores,
            self.tree,
            self.options.min_hap_score,
            self.options.min_deep_score,
        );

        match &assignment {
            Assignment::NoMatch => warn!("No match: {}", sample_id),
            Assignment::RootFallback { score, .. } if *score < self.options.min_hap_score => warn!(
                "{}: No supported leaf haplogroup available. Assigning default root haplogroup {}. See .all file for best assignments.",
                sample_id,
                types::ROOT
            ),
            Assignment::RootFallback { .. } => {}
            Assignment::Leaf { haplogroup, score } => {
                debug!("{}: {} ({:.3})", sample_id, haplogroup, score)
            }
        }

        let reported_haplogroup = assignment
            .haplogroup()
            .map(|hg| self.truncation.truncate(hg, self.tree));
        let markers = assignment
            .haplogroup()
            .map(|hg| self.catalog.marker_labels(hg))
            .unwrap_or_default();

        SampleAssignment {
            sample_id: sample_id.to_string(),
            reported_haplogroup,
            markers,
            ranked: ranking::rank_candidates(&scores),
            strict: scores.is_strict(),
            assignment,
        }
    }
}
