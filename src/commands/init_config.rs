use crate::config::Config;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// Writes the default settings to `path`, or to the user config dir.
pub fn run(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = match path.or_else(Config::default_path) {
        Some(path) => path,
        None => bail!("Could not determine a config directory; pass --config"),
    };

    if path.exists() && !force {
        bail!(
            "Config file {} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    Config::default()
        .save_to(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        run(Some(path.clone()), false).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        assert!(run(Some(path.clone()), false).is_err());
        run(Some(path), true).unwrap();
    }
}
