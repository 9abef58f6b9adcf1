//! PLINK inputs: the `.bim` variant table and the `--recodeAD` `.raw` matrix.

use crate::error::{SnappyError, SnappyResult};
use crate::haplogroup::types::{Genotype, Position, SampleGenotypes};
use log::{debug, info};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Columns before the genotype columns in a `.raw` file.
const RAW_LEADING_COLUMNS: usize = 6;

/// The files of a PLINK dataset sharing one prefix.
#[derive(Debug, Clone)]
pub struct PlinkDataset {
    prefix: PathBuf,
}

impl PlinkDataset {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    fn with_extension(&self, ext: &str) -> PathBuf {
        let mut path = self.prefix.clone().into_os_string();
        path.push(".");
        path.push(ext);
        PathBuf::from(path)
    }

    pub fn raw_path(&self) -> PathBuf {
        self.with_extension("raw")
    }

    pub fn bim_path(&self) -> PathBuf {
        self.with_extension("bim")
    }

    pub fn bed_path(&self) -> PathBuf {
        self.with_extension("bed")
    }

    pub fn vcf_path(&self) -> PathBuf {
        self.with_extension("vcf")
    }

    pub fn load(&self) -> SnappyResult<Vec<SampleGenotypes>> {
        let bim = read_bim(&self.bim_path())?;
        read_raw(&self.raw_path(), &bim)
    }
}

/// Variant ids and alleles from a `.bim` file.
#[derive(Debug, Clone, Default)]
pub struct BimIndex {
    id_to_pos: HashMap<String, Position>,
    alleles: HashMap<Position, (String, String)>,
}

impl BimIndex {
    pub fn insert(&mut self, id: &str, position: &str, a1: &str, a2: &str) {
        self.id_to_pos.insert(id.to_string(), position.to_string());
        self.alleles
            .insert(position.to_string(), (a1.to_string(), a2.to_string()));
    }

    pub fn len(&self) -> usize {
        self.id_to_pos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_pos.is_empty()
    }

    fn lookup(&self, id: &str) -> Option<(&Position, &(String, String))> {
        let position = self.id_to_pos.get(id)?;
        Some((position, self.alleles.get(position)?))
    }
}

fn open_lines(path: &Path) -> SnappyResult<BufReader<Box<dyn std::io::Read>>> {
    let file = File::open(path).map_err(|_| SnappyError::FileNotFound(path.to_path_buf()))?;
    let (reader, _format) =
        niffler::get_reader(Box::new(file)).map_err(|source| SnappyError::Decompress {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(BufReader::new(reader))
}

/// Reads `chrom id cm pos a1 a2` rows. Variants with both alleles missing
/// (`0`) are skipped.
pub fn read_bim(path: &Path) -> SnappyResult<BimIndex> {
    let mut bim = BimIndex::default();
    for (line_no, line) in open_lines(path)?.lines().enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 6 {
            return Err(SnappyError::Parse {
                file: path.display().to_string(),
                line: line_no as u64 + 1,
                message: format!("expected 6 columns, found {}", fields.len()),
            });
        }
        let (id, pos, a1, a2) = (fields[1], fields[3], fields[4], fields[5]);
        if a1 != "0" || a2 != "0" {
            bim.insert(id, pos, a1, a2);
        }
    }
    info!("Read {} genotyped variants from {}", bim.len(), path.display());
    Ok(bim)
}

/// Decodes one additive-coded haploid genotype. `counted` is the allele
/// whose copies `dosage` counts; heterozygous and missing values are no-calls.
pub fn decode_dosage(counted: &str, a1: &str, a2: &str, dosage: &str) -> Option<Genotype> {
    let other = if counted == a1 {
        a2
    } else if counted == a2 {
        a1
    } else if counted == "0" {
        return (dosage == "0").then(|| Genotype::Called(a2.to_string()));
    } else {
        return None;
    };

    Some(match dosage {
        "2" => Genotype::Called(counted.to_string()),
        "0" => Genotype::Called(other.to_string()),
        _ => Genotype::NoCall,
    })
}

/// A `.raw` genotype column: variant id and the allele it counts. Dominance
/// (`_HET`) columns yield `None`.
fn split_column(column: &str) -> Option<(&str, &str)> {
    let (id, allele) = column.rsplit_once('_')?;
    if allele == "HET" || id.is_empty() {
        return None;
    }
    Some((id, allele))
}

/// Reads per-sample calls from a `plink --recodeAD` file. Sample ids come from
/// the IID column.
pub fn read_raw(path: &Path, bim: &BimIndex) -> SnappyResult<Vec<SampleGenotypes>> {
    let mut lines = open_lines(path)?.lines();
    let header = match lines.next() {
        Some(line) => line?,
        None => return Ok(Vec::new()),
    };

    // (column offset, allele counted, a1, a2, position) for usable columns
    let columns: Vec<(usize, &str, &str, &str, &Position)> = header
        .split_whitespace()
        .skip(RAW_LEADING_COLUMNS)
        .enumerate()
        .filter_map(|(i, column)| {
            let (id, counted) = split_column(column)?;
            let (position, (a1, a2)) = bim.lookup(id)?;
            Some((i, counted, a1.as_str(), a2.as_str(), position))
        })
        .collect();
    debug!(
        "{} of the genotype columns in {} map to known variants",
        columns.len(),
        path.display()
    );

    let mut samples = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < RAW_LEADING_COLUMNS {
            return Err(SnappyError::Parse {
                file: path.display().to_string(),
                line: line_no as u64 + 2,
                message: format!("expected at least {} columns", RAW_LEADING_COLUMNS),
            });
        }

        let data = &fields[RAW_LEADING_COLUMNS..];
        let mut sample = SampleGenotypes::new(fields[1]);
        for &(i, counted, a1, a2, position) in &columns {
            let Some(dosage) = data.get(i) else {
                continue;
            };
            if let Some(genotype) = decode_dosage(counted, a1, a2, dosage) {
                sample.calls.insert(position.clone(), genotype);
            }
        }
        samples.push(sample);
    }

    info!("Read genotypes for {} samples from {}", samples.len(), path.display());
    Ok(samples)
}
