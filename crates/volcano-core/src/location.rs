//! Selecting the archive rows that belong to an alias cluster.

use volcano_model::SampleRecord;
use volcano_resolve::AliasCluster;
use volcano_standards::ArchiveOverrides;

/// Whether an archive row carries `label`.
///
/// A row matches when a `/` component of its location, or the first comma
/// segment of its location comment, equals the label ignoring case.
/// Region-qualified labels match on their configured path components only.
pub fn location_matches(sample: &SampleRecord, label: &str, archive: &ArchiveOverrides) -> bool {
    let components = sample.location_parts();
    if let Some(rule) = archive.region_rule(label) {
        return rule.matches(&components);
    }
    let label = label.trim();
    if label.is_empty() {
        return false;
    }
    components
        .iter()
        .any(|component| component.eq_ignore_ascii_case(label))
        || sample
            .location_comment
            .split(',')
            .next()
            .is_some_and(|first| first.trim().eq_ignore_ascii_case(label))
}

/// Rows of `samples` carrying any label of the cluster.
pub fn select_cluster_samples<'a>(
    samples: &'a [SampleRecord],
    cluster: &'a AliasCluster,
    archive: &'a ArchiveOverrides,
) -> impl Iterator<Item = &'a SampleRecord> {
    samples.iter().filter(move |sample| {
        cluster
            .labels()
            .any(|label| location_matches(sample, label, archive))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use volcano_standards::RegionQualifiedLabel;

    fn sumbing_rules() -> ArchiveOverrides {
        ArchiveOverrides {
            region_qualified: vec![RegionQualifiedLabel {
                label: "SUMBING - JAVA".to_string(),
                site: "SUMBING".to_string(),
                region: "JAVA".to_string(),
                site_component: 3,
                region_component: 2,
            }],
        }
    }

    #[test]
    fn test_location_component() {
        let sample = SampleRecord::new("KERMADEC ARC / RAOUL ISLAND", "K/F.csv");
        let rules = ArchiveOverrides::default();
        assert!(location_matches(&sample, "raoul island", &rules));
        assert!(!location_matches(&sample, "RAOUL", &rules));
        assert!(!location_matches(&sample, "", &rules));
    }

    #[test]
    fn test_location_comment_first_segment() {
        let sample = SampleRecord::new("KERMADEC ARC", "K/F.csv")
            .with_comment("RAOUL ISLAND, NORTH COAST, 2006");
        let rules = ArchiveOverrides::default();
        assert!(location_matches(&sample, "RAOUL ISLAND", &rules));
        assert!(!location_matches(&sample, "NORTH COAST", &rules));
    }

    #[test]
    fn test_region_qualified_label() {
        let rules = sumbing_rules();
        let java = SampleRecord::new("SUNDA ARC / INDONESIA / JAVA / SUMBING", "S/F.csv");
        let sumatra = SampleRecord::new("SUNDA ARC / INDONESIA / SUMATRA / SUMBING", "S/F.csv");
        assert!(location_matches(&java, "SUMBING - JAVA", &rules));
        assert!(!location_matches(&sumatra, "SUMBING - JAVA", &rules));
    }
}
