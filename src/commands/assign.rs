use crate::cli::AssignArgs;
use crate::config::Config;
use crate::export::tsv::{output_paths, AssignmentWriter};
use crate::export::{AnalysisExport, ExportMetadata};
use crate::genotype::PlinkDataset;
use crate::haplogroup::analyze_haplogroups;
use crate::haplogroup::options::AssignOptions;
use crate::haplogroup::types::{Assignment, SampleAssignment};
use crate::reference::{ReferenceData, ReferenceFiles};
use crate::utils::external_tools::ensure_raw;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Everything `assign` needs once flags and config are merged.
#[derive(Debug, Clone)]
pub struct AssignSettings {
    pub dataset: PlinkDataset,
    pub reference_dir: PathBuf,
    pub reference: ReferenceFiles,
    pub options: AssignOptions,
    pub out: PathBuf,
    pub json: Option<PathBuf>,
    pub threads: Option<usize>,
}

impl AssignSettings {
    pub fn resolve(args: AssignArgs, config: &Config) -> Self {
        let reference_dir = args
            .ref_files_dir
            .unwrap_or_else(|| config.ref_files_dir.clone());
        let reference = ReferenceFiles::in_dir(
            &reference_dir,
            args.id2pos.as_deref().unwrap_or(&config.id2pos),
            args.pos2allele.as_deref().unwrap_or(&config.pos2allele),
            args.hg2snp.as_deref().unwrap_or(&config.hg2snp),
            args.tree_strct.as_deref().unwrap_or(&config.tree_strct),
        );
        let options = AssignOptions::new(
            args.min_hap_score.unwrap_or(config.min_hap_score),
            args.min_deep_score.unwrap_or(config.min_deep_score),
            args.ancestral_hg_depth.unwrap_or(config.ancestral_hg_depth),
        )
        .with_truncation(args.truncate_haps.or_else(|| config.truncate_haps.clone()));

        Self {
            dataset: PlinkDataset::new(args.infile),
            reference_dir,
            reference,
            options,
            out: PathBuf::from(args.out.unwrap_or_else(|| config.out.clone())),
            json: args.json,
            threads: args.threads,
        }
    }
}

pub fn run(args: AssignArgs, config: &Config, quiet_progress: bool) -> Result<()> {
    let settings = AssignSettings::resolve(args, config);
    settings
        .options
        .validate()
        .context("Invalid scoring thresholds")?;

    ensure_raw(&settings.dataset)?;
    let samples = settings.dataset.load().with_context(|| {
        format!(
            "Failed to read genotypes for {}",
            settings.dataset.prefix().display()
        )
    })?;
    info!("Loaded genotypes for {} samples", samples.len());

    let reference = ReferenceData::load(&settings.reference).with_context(|| {
        format!(
            "Failed to load reference files from {}",
            settings.reference_dir.display()
        )
    })?;

    let progress = ProgressBarBuilder::new("Scoring haplogroups...")
        .with_length(samples.len() as u64)
        .with_tick()
        .hidden(quiet_progress)
        .build()?;

    let results = match settings.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .context("Failed to start worker threads")?
            .install(|| analyze_haplogroups(&samples, &reference, &settings.options, &progress)),
        None => analyze_haplogroups(&samples, &reference, &settings.options, &progress),
    }?;
    progress.finish_with_message("Haplogroups assigned");

    write_results(&settings, &results)?;
    log_summary(&results);
    Ok(())
}

fn write_results(settings: &AssignSettings, results: &[SampleAssignment]) -> Result<()> {
    let (out_path, all_path) = output_paths(&settings.out);
    let mut writer = AssignmentWriter::create(&settings.out)
        .with_context(|| format!("Failed to create {}", out_path.display()))?;
    for result in results {
        writer.write(result)?;
    }
    writer.finish()?;
    info!(
        "Wrote {} and {}",
        out_path.display(),
        all_path.display()
    );

    if let Some(json_path) = &settings.json {
        let export = AnalysisExport::new(
            results,
            &settings.options,
            ExportMetadata {
                genotype_input: settings.dataset.prefix().display().to_string(),
                reference_dir: settings.reference_dir.display().to_string(),
            },
        );
        export
            .write_json(json_path)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
        info!("Wrote {}", json_path.display());
    }
    Ok(())
}

fn log_summary(results: &[SampleAssignment]) {
    let (mut leaves, mut fallbacks, mut unmatched) = (0, 0, 0);
    for result in results {
        match result.assignment {
            Assignment::Leaf { .. } => leaves += 1,
            Assignment::RootFallback { .. } => fallbacks += 1,
            Assignment::NoMatch => unmatched += 1,
        }
    }
    info!(
        "{} samples: {} assigned, {} root fallback, {} no match",
        results.len(),
        leaves,
        fallbacks,
        unmatched
    );
}
