use crate::error::{SnappyError, SnappyResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults for `assign`, read from `config.toml` in the user config dir.
/// Command-line flags take precedence over every field here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_min_hap_score")]
    pub min_hap_score: f64,
    #[serde(default = "default_min_deep_score")]
    pub min_deep_score: f64,
    #[serde(default = "default_ancestral_hg_depth")]
    pub ancestral_hg_depth: usize,
    #[serde(default = "default_ref_files_dir")]
    pub ref_files_dir: PathBuf,
    #[serde(default = "default_id2pos")]
    pub id2pos: String,
    #[serde(default = "default_pos2allele")]
    pub pos2allele: String,
    #[serde(default = "default_hg2snp")]
    pub hg2snp: String,
    #[serde(default = "default_tree_strct")]
    pub tree_strct: String,
    #[serde(default = "default_out")]
    pub out: String,
    #[serde(default)]
    pub truncate_haps: Option<PathBuf>,
}

fn default_min_hap_score() -> f64 {
    0.75
}

fn default_min_deep_score() -> f64 {
    0.8
}

fn default_ancestral_hg_depth() -> usize {
    2
}

fn default_ref_files_dir() -> PathBuf {
    PathBuf::from("ref_files")
}

fn default_id2pos() -> String {
    "id_to_pos.txt".to_string()
}

fn default_pos2allele() -> String {
    "pos_to_allele.txt".to_string()
}

fn default_hg2snp() -> String {
    "y_hg_and_snps.sort".to_string()
}

fn default_tree_strct() -> String {
    "tree_structure.txt".to_string()
}

fn default_out() -> String {
    "chrY_hgs".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_hap_score: default_min_hap_score(),
            min_deep_score: default_min_deep_score(),
            ancestral_hg_depth: default_ancestral_hg_depth(),
            ref_files_dir: default_ref_files_dir(),
            id2pos: default_id2pos(),
            pos2allele: default_pos2allele(),
            hg2snp: default_hg2snp(),
            tree_strct: default_tree_strct(),
            out: default_out(),
            truncate_haps: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "snappy", "snappy-tools")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    /// Loads the user config, falling back to defaults when it is absent or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(config) => return config,
                    Err(e) => log::warn!("Ignoring {}: {}", config_path.display(), e),
                }
            }
        }
        Config::default()
    }

    pub fn load_from(path: &Path) -> SnappyResult<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| SnappyError::InvalidConfig(format!("{}: {}", path.display(), e)))
    }

    pub fn save_to(&self, path: &Path) -> SnappyResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SnappyError::InvalidConfig(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}
