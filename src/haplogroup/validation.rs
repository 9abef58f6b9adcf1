use crate::error::{SnappyError, SnappyResult};
use crate::haplogroup::types::{CleanedCatalog, SampleGenotypes};
use log::warn;

/// Scoring needs at least one haplogroup with a usable marker.
pub fn validate_reference(catalog: &CleanedCatalog) -> SnappyResult<()> {
    if catalog.is_empty() {
        return Err(SnappyError::NoUsableReference(
            "the haplogroup catalog is empty".into(),
        ));
    }
    if catalog.scorable_haplogroups() == 0 {
        return Err(SnappyError::NoUsableReference(format!(
            "none of the {} haplogroups has a marker with a known position and alleles",
            catalog.len()
        )));
    }
    Ok(())
}

pub fn warn_on_empty_samples(samples: &[SampleGenotypes]) {
    if samples.is_empty() {
        warn!("No samples found in genotype input");
        return;
    }
    let empty = samples.iter().filter(|s| s.calls.is_empty()).count();
    if empty > 0 {
        warn!("{} of {} samples have no genotype calls", empty, samples.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haplogroup::types::{CleanedHaplogroup, ResolvedMarker};

    #[test]
    fn empty_catalog_is_fatal() {
        let catalog = CleanedCatalog::new(Vec::new(), 0);
        assert!(matches!(
            validate_reference(&catalog),
            Err(SnappyError::NoUsableReference(_))
        ));
    }

    #[test]
    fn catalog_without_markers_is_fatal() {
        let catalog = CleanedCatalog::new(
            vec![CleanedHaplogroup { name: "R1b".into(), markers: Vec::new() }],
            3,
        );
        assert!(validate_reference(&catalog).is_err());

        let catalog = CleanedCatalog::new(
            vec![CleanedHaplogroup {
                name: "R1b".into(),
                markers: vec![ResolvedMarker {
                    label: "M343".into(),
                    position: "2887824".into(),
                    derived: "A".into(),
                }],
            }],
            0,
        );
        assert!(validate_reference(&catalog).is_ok());
    }
}
