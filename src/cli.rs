use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Read defaults from this config file instead of the user config
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Assign Y-DNA haplogroups to every sample of a chrY PLINK dataset
    Assign(AssignArgs),

    /// Write a config file holding the default settings
    InitConfig {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },
}

/// Unset options fall back to the config file, then to built-in defaults.
#[derive(ClapArgs, Debug)]
pub struct AssignArgs {
    /// Prefix of the PLINK library (.bim/.bed/.fam), .raw file or .vcf
    #[arg(long)]
    pub infile: PathBuf,

    /// Prefix for the .out and .all result files [default: chrY_hgs]
    #[arg(long)]
    pub out: Option<String>,

    /// Minimum score for a haplogroup to be considered [default: 0.75]
    #[arg(long)]
    pub min_hap_score: Option<f64>,

    /// Minimum score to switch to a deeper leaf [default: 0.8]
    #[arg(long)]
    pub min_deep_score: Option<f64>,

    /// How many generations up a derived ancestor may sit [default: 2]
    #[arg(long)]
    pub ancestral_hg_depth: Option<usize>,

    /// Directory holding the reference files [default: ref_files]
    #[arg(long)]
    pub ref_files_dir: Option<PathBuf>,

    /// Marker id to position table
    #[arg(long)]
    pub id2pos: Option<String>,

    /// Position to ancestral/derived allele table
    #[arg(long)]
    pub pos2allele: Option<String>,

    /// Haplogroup to defining markers table
    #[arg(long)]
    pub hg2snp: Option<String>,

    /// Parent overrides for the haplogroup tree
    #[arg(long)]
    pub tree_strct: Option<String>,

    /// List of haplogroups to truncate assignments at
    #[arg(long, value_name = "FILE")]
    pub truncate_haps: Option<PathBuf>,

    /// Also write the results as JSON
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Worker threads for scoring (defaults to all cores)
    #[arg(long)]
    pub threads: Option<usize>,
}
