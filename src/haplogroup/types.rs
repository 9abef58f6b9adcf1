use std::collections::HashMap;

/// Fallback assignment when no leaf clears the score threshold.
pub const ROOT: &str = "A0-T";

/// Names with no parent; the tree is rooted logically at `A0-T`.
pub const ROOTS: [&str; 2] = ["A0-T", "A00"];

/// Physical position key, shared by the reference tables and the genotype calls.
pub type Position = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllelePair {
    pub ancestral: String,
    pub derived: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Genotype {
    Called(String),
    NoCall,
}

/// One sample's calls keyed by position. Positions missing from `calls` were
/// not genotyped at all.
#[derive(Debug, Clone, Default)]
pub struct SampleGenotypes {
    pub sample_id: String,
    pub calls: HashMap<Position, Genotype>,
}

impl SampleGenotypes {
    pub fn new(sample_id: impl Into<String>) -> Self {
        Self {
            sample_id: sample_id.into(),
            calls: HashMap::new(),
        }
    }

    pub fn with_call(mut self, position: impl Into<Position>, allele: impl Into<String>) -> Self {
        self.calls
            .insert(position.into(), Genotype::Called(allele.into()));
        self
    }

    pub fn with_no_call(mut self, position: impl Into<Position>) -> Self {
        self.calls.insert(position.into(), Genotype::NoCall);
        self
    }

    /// Called allele at `position`, `None` for no-calls and untyped positions.
    pub fn called_allele(&self, position: &str) -> Option<&str> {
        match self.calls.get(position) {
            Some(Genotype::Called(allele)) => Some(allele.as_str()),
            _ => None,
        }
    }
}

/// A haplogroup as listed in the marker catalog. Marker ids may be `/`-joined
/// synonym groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub markers: Vec<String>,
}

/// Haplogroup -> defining marker ids, in file order.
#[derive(Debug, Clone, Default)]
pub struct MarkerCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl MarkerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a haplogroup. Returns false (and keeps the first entry) when the
    /// name is already present.
    pub fn push(&mut self, name: impl Into<String>, markers: Vec<String>) -> bool {
        let name = name.into();
        if self.index.contains_key(&name) {
            return false;
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(CatalogEntry { name, markers });
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<String>)> for MarkerCatalog {
    fn from_iter<I: IntoIterator<Item = (S, Vec<String>)>>(iter: I) -> Self {
        let mut catalog = MarkerCatalog::new();
        for (name, markers) in iter {
            catalog.push(name, markers);
        }
        catalog
    }
}

/// A defining marker that resolved to a position with known alleles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMarker {
    /// Id as listed in the catalog, synonyms included.
    pub label: String,
    pub position: Position,
    pub derived: String,
}

#[derive(Debug, Clone)]
pub struct CleanedHaplogroup {
    pub name: String,
    pub markers: Vec<ResolvedMarker>,
}

/// The marker catalog after unscorable markers were dropped. Immutable once
/// built; haplogroup order follows the source catalog.
#[derive(Debug, Clone, Default)]
pub struct CleanedCatalog {
    haplogroups: Vec<CleanedHaplogroup>,
    index: HashMap<String, usize>,
    pruned: usize,
}

impl CleanedCatalog {
    pub(crate) fn new(haplogroups: Vec<CleanedHaplogroup>, pruned: usize) -> Self {
        let index = haplogroups
            .iter()
            .enumerate()
            .map(|(i, hg)| (hg.name.clone(), i))
            .collect();
        Self {
            haplogroups,
            index,
            pruned,
        }
    }

    pub fn len(&self) -> usize {
        self.haplogroups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.haplogroups.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn haplogroup(&self, idx: usize) -> &CleanedHaplogroup {
        &self.haplogroups[idx]
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.haplogroups[idx].name
    }

    pub fn iter(&self) -> impl Iterator<Item = &CleanedHaplogroup> {
        self.haplogroups.iter()
    }

    /// Marker labels of `name`, empty when the haplogroup is not catalogued.
    pub fn marker_labels(&self, name: &str) -> Vec<String> {
        self.index_of(name)
            .map(|i| {
                self.haplogroups[i]
                    .markers
                    .iter()
                    .map(|m| m.label.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of markers dropped while cleaning.
    pub fn pruned_count(&self) -> usize {
        self.pruned
    }

    pub fn scorable_haplogroups(&self) -> usize {
        self.haplogroups
            .iter()
            .filter(|hg| !hg.markers.is_empty())
            .count()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHaplogroup {
    pub name: String,
    pub score: f64,
    /// Derived calls summed over the haplogroup and its catalogued ancestors.
    pub derived: u32,
    /// Genotyped markers summed over the same lineage.
    pub genotyped: u32,
}

/// Per-sample haplogroup scores, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HaplogroupScores {
    entries: Vec<ScoredHaplogroup>,
    strict: bool,
}

impl HaplogroupScores {
    pub(crate) fn new(entries: Vec<ScoredHaplogroup>, strict: bool) -> Self {
        Self { entries, strict }
    }

    /// Builds a score map from plain `(name, score)` pairs.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        let entries = pairs
            .into_iter()
            .map(|(name, score)| ScoredHaplogroup {
                name: name.into(),
                score,
                derived: 0,
                genotyped: 0,
            })
            .collect();
        Self {
            entries,
            strict: false,
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.score)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, ScoredHaplogroup> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when only haplogroups with a derived parent or grandparent were kept.
    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    /// No haplogroup had any derived evidence.
    NoMatch,
    Leaf { haplogroup: String, score: f64 },
    /// No leaf cleared the threshold; reported as the root.
    RootFallback { haplogroup: String, score: f64 },
}

impl Assignment {
    pub fn haplogroup(&self) -> Option<&str> {
        match self {
            Assignment::NoMatch => None,
            Assignment::Leaf { haplogroup, .. } | Assignment::RootFallback { haplogroup, .. } => {
                Some(haplogroup)
            }
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            Assignment::NoMatch => None,
            Assignment::Leaf { score, .. } | Assignment::RootFallback { score, .. } => Some(*score),
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Assignment::NoMatch => "no_match",
            Assignment::Leaf { .. } => "leaf",
            Assignment::RootFallback { .. } => "root_fallback",
        }
    }
}

/// Everything reported for one sample.
#[derive(Debug, Clone)]
pub struct SampleAssignment {
    pub sample_id: String,
    pub assignment: Assignment,
    /// Assigned haplogroup after truncation.
    pub reported_haplogroup: Option<String>,
    /// Cleaned defining markers of the untruncated assignment.
    pub markers: Vec<String>,
    pub ranked: Vec<ScoredHaplogroup>,
    pub strict: bool,
}
