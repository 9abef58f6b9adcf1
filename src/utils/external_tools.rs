use crate::genotype::PlinkDataset;
use anyhow::{bail, Context, Result};
use log::info;
use std::ffi::OsStr;
use std::process::Command;

pub fn check_plink() -> Result<()> {
    Command::new("plink")
        .arg("--version")
        .output()
        .context("plink not found. Please install PLINK 1.9 (https://www.cog-genomics.org/plink/) and ensure it's in your PATH")
        .map(|_| ())
}

fn run_plink(args: &[&OsStr]) -> Result<()> {
    let status = Command::new("plink")
        .args(args)
        .status()
        .context("failed to launch plink")?;
    if !status.success() {
        bail!("plink exited with {}", status);
    }
    Ok(())
}

/// Creates `<prefix>.raw` when it is missing, converting from a binary PLINK
/// library or, failing that, a VCF with the same prefix. The VCF route also
/// writes the `.bim` the `.raw` reader needs.
pub fn ensure_raw(dataset: &PlinkDataset) -> Result<()> {
    if dataset.raw_path().exists() {
        return Ok(());
    }

    let prefix = dataset.prefix().as_os_str();
    let vcf = dataset.vcf_path();
    if !dataset.bed_path().exists() && !vcf.exists() {
        bail!(
            "Unable to find suitable genotype files for processing. Please ensure that there is a plink library or vcf with the prefix provided ({})",
            dataset.prefix().display()
        );
    }

    check_plink()?;
    if !dataset.bed_path().exists() {
        info!("Using plink to create a binary library from {}", vcf.display());
        run_plink(&[
            OsStr::new("--vcf"),
            vcf.as_os_str(),
            OsStr::new("--make-bed"),
            OsStr::new("--out"),
            prefix,
        ])?;
    }

    info!("Using plink to create .raw file from {}", dataset.prefix().display());
    run_plink(&[
        OsStr::new("--bfile"),
        prefix,
        OsStr::new("--recodeAD"),
        OsStr::new("--out"),
        prefix,
    ])
    .with_context(|| format!("plink --recodeAD failed for {}", dataset.prefix().display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn existing_raw_needs_no_plink() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("chrY.raw"), "FID IID PAT MAT SEX PHENOTYPE\n").unwrap();
        ensure_raw(&PlinkDataset::new(dir.path().join("chrY"))).unwrap();
    }

    #[test]
    fn missing_inputs_fail_before_running_plink() {
        let dir = tempdir().unwrap();
        let err = ensure_raw(&PlinkDataset::new(dir.path().join("chrY"))).unwrap_err();
        assert!(err.to_string().contains("Unable to find suitable genotype files"));
    }
}
