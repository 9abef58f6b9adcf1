//! Loaders for the reference tables: marker id -> position, position ->
//! alleles, haplogroup -> defining markers, and the parent override table.

use crate::error::{SnappyError, SnappyResult};
use crate::haplogroup::tree::HaplogroupTree;
use crate::haplogroup::types::{AllelePair, MarkerCatalog, Position};
use log::{info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Marker ids and the alleles at their positions.
#[derive(Debug, Clone, Default)]
pub struct MarkerPanel {
    id_to_pos: HashMap<String, Position>,
    alleles: HashMap<Position, AllelePair>,
}

impl MarkerPanel {
    /// Records a marker position. The first mapping for an id wins.
    pub fn insert_id(&mut self, id: impl Into<String>, position: impl Into<Position>) -> bool {
        let id = id.into();
        if self.id_to_pos.contains_key(&id) {
            return false;
        }
        self.id_to_pos.insert(id, position.into());
        true
    }

    /// Records the alleles at a position. The first entry wins.
    pub fn insert_alleles(&mut self, position: impl Into<Position>, alleles: AllelePair) -> bool {
        let position = position.into();
        if self.alleles.contains_key(&position) {
            return false;
        }
        self.alleles.insert(position, alleles);
        true
    }

    /// Position of a catalog marker. `/`-joined synonyms are tried in order.
    pub fn resolve(&self, label: &str) -> Option<&Position> {
        label
            .split('/')
            .find_map(|id| self.id_to_pos.get(id))
            .or_else(|| self.id_to_pos.get(label))
    }

    pub fn alleles(&self, position: &str) -> Option<&AllelePair> {
        self.alleles.get(position)
    }

    pub fn id_count(&self) -> usize {
        self.id_to_pos.len()
    }

    pub fn position_count(&self) -> usize {
        self.alleles.len()
    }
}

/// Locations of the four reference tables.
#[derive(Debug, Clone)]
pub struct ReferenceFiles {
    pub id_to_pos: PathBuf,
    pub pos_to_allele: PathBuf,
    pub hg_to_snps: PathBuf,
    pub tree_structure: PathBuf,
}

impl ReferenceFiles {
    pub fn in_dir(
        dir: impl AsRef<Path>,
        id_to_pos: &str,
        pos_to_allele: &str,
        hg_to_snps: &str,
        tree_structure: &str,
    ) -> Self {
        let dir = dir.as_ref();
        Self {
            id_to_pos: dir.join(id_to_pos),
            pos_to_allele: dir.join(pos_to_allele),
            hg_to_snps: dir.join(hg_to_snps),
            tree_structure: dir.join(tree_structure),
        }
    }
}

/// All reference data needed for assignment, resident in memory.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub panel: MarkerPanel,
    pub catalog: MarkerCatalog,
    pub tree: HaplogroupTree,
}

impl ReferenceData {
    pub fn load(files: &ReferenceFiles) -> SnappyResult<Self> {
        let mut panel = read_id_to_pos(&files.id_to_pos)?;
        read_pos_to_allele(&files.pos_to_allele, &mut panel)?;
        let catalog = read_hg_to_snps(&files.hg_to_snps)?;
        let tree = HaplogroupTree::new(read_tree_structure(&files.tree_structure)?)?;

        info!(
            "Loaded {} marker ids, {} allele positions, {} haplogroups, {} parent overrides",
            panel.id_count(),
            panel.position_count(),
            catalog.len(),
            tree.override_count()
        );

        Ok(Self {
            panel,
            catalog,
            tree,
        })
    }
}

fn open_tsv(path: &Path, has_headers: bool) -> SnappyResult<csv::Reader<Box<dyn Read>>> {
    let file = File::open(path).map_err(|_| SnappyError::FileNotFound(path.to_path_buf()))?;
    let (reader, _format) =
        niffler::get_reader(Box::new(file)).map_err(|source| SnappyError::Decompress {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader))
}

fn parse_error(path: &Path, record: &csv::StringRecord, message: String) -> SnappyError {
    SnappyError::Parse {
        file: path.display().to_string(),
        line: record.position().map(|p| p.line()).unwrap_or_default(),
        message,
    }
}

/// Reads `id<TAB>pos` rows (one header line).
pub fn read_id_to_pos(path: &Path) -> SnappyResult<MarkerPanel> {
    info!("Creating id to position map from {}", path.display());
    let mut reader = open_tsv(path, true)?;
    let mut panel = MarkerPanel::default();

    for result in reader.records() {
        let record = result?;
        if record.len() < 2 {
            return Err(parse_error(
                path,
                &record,
                format!("expected 2 columns, found {}", record.len()),
            ));
        }
        if !panel.insert_id(&record[0], &record[1]) {
            warn!("Marker id {} is duplicated; keeping the first position", &record[0]);
        }
    }
    Ok(panel)
}

/// Reads `pos<TAB>ancestral<TAB>derived` rows (one header line) into `panel`.
pub fn read_pos_to_allele(path: &Path, panel: &mut MarkerPanel) -> SnappyResult<()> {
    info!("Creating position to allele map from {}", path.display());
    let mut reader = open_tsv(path, true)?;

    for result in reader.records() {
        let record = result?;
        if record.len() < 3 {
            return Err(parse_error(
                path,
                &record,
                format!("expected 3 columns, found {}", record.len()),
            ));
        }
        let alleles = AllelePair {
            ancestral: record[1].to_string(),
            derived: record[2].to_string(),
        };
        if !panel.insert_alleles(&record[0], alleles) {
            warn!("Position {} is duplicated; keeping the first alleles", &record[0]);
        }
    }
    Ok(())
}

/// Reads `haplogroup<TAB>id,id,...` rows (one header line), keeping file order.
pub fn read_hg_to_snps(path: &Path) -> SnappyResult<MarkerCatalog> {
    info!("Reading haplogroup-informative markers from {}", path.display());
    let mut reader = open_tsv(path, true)?;
    let mut catalog = MarkerCatalog::new();

    for result in reader.records() {
        let record = result?;
        if record.len() < 2 {
            return Err(parse_error(
                path,
                &record,
                format!("expected 2 columns, found {}", record.len()),
            ));
        }
        let markers = record[1]
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        if !catalog.push(&record[0], markers) {
            warn!("Haplogroup {} is listed twice; keeping the first entry", &record[0]);
        }
    }
    Ok(catalog)
}

/// Reads `haplogroup<TAB>parent` rows (no header) for names outside the
/// truncation naming convention.
pub fn read_tree_structure(path: &Path) -> SnappyResult<HashMap<String, String>> {
    let mut reader = open_tsv(path, false)?;
    let mut overrides = HashMap::new();

    for result in reader.records() {
        let record = result?;
        if record.len() < 2 {
            return Err(parse_error(
                path,
                &record,
                format!("expected haplogroup and parent, found {} columns", record.len()),
            ));
        }
        overrides.insert(record[0].to_string(), record[1].to_string());
    }
    Ok(overrides)
}

/// One haplogroup name per line; blank lines are ignored.
pub fn read_haplogroup_list(path: &Path) -> SnappyResult<Vec<String>> {
    let mut reader = open_tsv(path, false)?;
    let mut names = Vec::new();
    for result in reader.records() {
        let record = result?;
        if let Some(name) = record.get(0).filter(|n| !n.is_empty()) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn duplicate_ids_keep_first_position() {
        let file = write_file("id\tpos\nM343\t2887824\nM343\t1\nL21\t14059547\n");
        let panel = read_id_to_pos(file.path()).unwrap();
        assert_eq!(panel.id_count(), 2);
        assert_eq!(panel.resolve("M343").map(String::as_str), Some("2887824"));
    }

    #[test]
    fn synonyms_resolve_in_listed_order() {
        let mut panel = MarkerPanel::default();
        panel.insert_id("S145", "1");
        panel.insert_id("L21", "2");
        assert_eq!(panel.resolve("M529/S145/L21").map(String::as_str), Some("1"));
        assert_eq!(panel.resolve("M529"), None);
    }

    #[test]
    fn catalog_keeps_file_order_and_handles_crlf() {
        let file = write_file("#haplogroup\tSNPs\r\nR1b\tM343,P25\r\nR1a\tM420\r\nR1\tM173,\r\n");
        let catalog = read_hg_to_snps(file.path()).unwrap();
        let names: Vec<&str> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["R1b", "R1a", "R1"]);
        assert_eq!(catalog.get("R1").unwrap().markers, vec!["M173".to_string()]);
    }

    #[test]
    fn short_allele_row_is_a_parse_error() {
        let file = write_file("pos\tancestral_allele\tderived_allele\n100\tC\n");
        let mut panel = MarkerPanel::default();
        let err = read_pos_to_allele(file.path(), &mut panel).unwrap_err();
        assert!(matches!(err, SnappyError::Parse { line: 2, .. }));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_tree_structure(Path::new("/nonexistent/tree_structure.txt")).unwrap_err();
        assert!(matches!(err, SnappyError::FileNotFound(_)));
    }
}
