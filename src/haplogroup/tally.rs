use crate::haplogroup::types::{
    CleanedCatalog, CleanedHaplogroup, MarkerCatalog, ResolvedMarker, SampleGenotypes,
};
use crate::reference::MarkerPanel;
use log::{debug, warn};
use rayon::prelude::*;

/// Drops markers that cannot be scored: ids with no known position, or a
/// position missing from the allele table. Haplogroups are kept even when all
/// of their markers go.
pub fn clean_catalog(catalog: &MarkerCatalog, panel: &MarkerPanel) -> CleanedCatalog {
    let mut pruned = 0usize;
    let mut haplogroups = Vec::with_capacity(catalog.len());

    for entry in catalog.entries() {
        let mut markers = Vec::with_capacity(entry.markers.len());
        for label in &entry.markers {
            let Some(position) = panel.resolve(label) else {
                debug!("{}: dropping {} (no known position)", entry.name, label);
                pruned += 1;
                continue;
            };
            let Some(alleles) = panel.alleles(position) else {
                debug!(
                    "{}: dropping {} (position {} has no allele reference)",
                    entry.name, label, position
                );
                pruned += 1;
                continue;
            };
            markers.push(ResolvedMarker {
                label: label.clone(),
                position: position.clone(),
                derived: alleles.derived.clone(),
            });
        }
        haplogroups.push(CleanedHaplogroup {
            name: entry.name.clone(),
            markers,
        });
    }

    if pruned > 0 {
        warn!(
            "Dropped {} defining markers with no usable position or allele reference",
            pruned
        );
    }
    CleanedCatalog::new(haplogroups, pruned)
}

/// Dense sample x haplogroup counts of each haplogroup's own markers.
#[derive(Debug, Clone)]
pub struct TallyMatrix {
    n_samples: usize,
    n_haplogroups: usize,
    /// Markers called in the derived state.
    derived: Vec<u32>,
    /// Markers with any call (derived or ancestral).
    genotyped: Vec<u32>,
}

impl TallyMatrix {
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_haplogroups(&self) -> usize {
        self.n_haplogroups
    }

    pub fn derived(&self, sample: usize, hg: usize) -> u32 {
        self.derived[sample * self.n_haplogroups + hg]
    }

    pub fn genotyped(&self, sample: usize, hg: usize) -> u32 {
        self.genotyped[sample * self.n_haplogroups + hg]
    }

    pub fn derived_row(&self, sample: usize) -> &[u32] {
        let start = sample * self.n_haplogroups;
        &self.derived[start..start + self.n_haplogroups]
    }
}

/// Own-marker counts for one sample, indexed like `catalog`.
pub fn tally_sample(sample: &SampleGenotypes, catalog: &CleanedCatalog) -> (Vec<u32>, Vec<u32>) {
    let mut derived = vec![0u32; catalog.len()];
    let mut genotyped = vec![0u32; catalog.len()];

    for (idx, hg) in catalog.iter().enumerate() {
        for marker in &hg.markers {
            if let Some(allele) = sample.called_allele(&marker.position) {
                genotyped[idx] += 1;
                if allele == marker.derived {
                    derived[idx] += 1;
                }
            }
        }
    }

    (derived, genotyped)
}

pub fn build_tally(samples: &[SampleGenotypes], catalog: &CleanedCatalog) -> TallyMatrix {
    let rows: Vec<(Vec<u32>, Vec<u32>)> = samples
        .par_iter()
        .map(|sample| tally_sample(sample, catalog))
        .collect();

    let n_haplogroups = catalog.len();
    let mut derived = Vec::with_capacity(samples.len() * n_haplogroups);
    let mut genotyped = Vec::with_capacity(samples.len() * n_haplogroups);
    for (d, g) in rows {
        derived.extend(d);
        genotyped.extend(g);
    }

    TallyMatrix {
        n_samples: samples.len(),
        n_haplogroups,
        derived,
        genotyped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haplogroup::types::AllelePair;

    fn panel() -> MarkerPanel {
        let mut panel = MarkerPanel::default();
        panel.insert_id("M343", "2887824");
        panel.insert_id("L21", "14059547");
        panel.insert_id("P312", "22157311");
        panel.insert_id("DF13", "9999");
        panel.insert_alleles(
            "2887824",
            AllelePair { ancestral: "C".into(), derived: "A".into() },
        );
        panel.insert_alleles(
            "14059547",
            AllelePair { ancestral: "C".into(), derived: "G".into() },
        );
        panel.insert_alleles(
            "22157311",
            AllelePair { ancestral: "C".into(), derived: "A".into() },
        );
        panel
    }

    #[test]
    fn prunes_unresolvable_markers() {
        let catalog: MarkerCatalog = vec![
            ("R1b", vec!["M343".to_string(), "Z999".to_string()]),
            ("R1b1a2a1a2c", vec!["S145/L21".to_string(), "DF13".to_string()]),
        ]
        .into_iter()
        .collect();

        let cleaned = clean_catalog(&catalog, &panel());
        assert_eq!(cleaned.marker_labels("R1b"), vec!["M343"]);
        // DF13 has a position but no alleles
        assert_eq!(cleaned.marker_labels("R1b1a2a1a2c"), vec!["S145/L21"]);
        assert_eq!(cleaned.pruned_count(), 2);
        assert_eq!(
            cleaned.haplogroup(1).markers[0].position,
            "14059547".to_string()
        );
    }

    #[test]
    fn counts_derived_and_genotyped_calls() {
        let catalog: MarkerCatalog = vec![(
            "R1b",
            vec!["M343".to_string(), "L21".to_string(), "P312".to_string()],
        )]
        .into_iter()
        .collect();
        let cleaned = clean_catalog(&catalog, &panel());

        let samples = vec![
            SampleGenotypes::new("S1")
                .with_call("2887824", "A")
                .with_call("14059547", "C")
                .with_no_call("22157311"),
            SampleGenotypes::new("S2"),
        ];
        let tally = build_tally(&samples, &cleaned);

        assert_eq!(tally.n_samples(), 2);
        assert_eq!(tally.derived(0, 0), 1);
        assert_eq!(tally.genotyped(0, 0), 2);
        assert_eq!(tally.derived(1, 0), 0);
        assert_eq!(tally.genotyped(1, 0), 0);
    }
}
