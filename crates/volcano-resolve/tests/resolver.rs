//! Resolver behaviour with the embedded override table.

use volcano_ingest::{MappingEntry, Registry};
use volcano_model::{Resolution, VolcanoId, VolcanoRecord};
use volcano_resolve::{NameResolver, ShortNameRule};
use volcano_standards::load_default_overrides;

fn registry() -> Registry {
    Registry::from_records(
        vec![
            VolcanoRecord::new(VolcanoId::new(360060), "Soufriere Guadeloupe"),
            VolcanoRecord::new(VolcanoId::new(241080), "Tongariro"),
            VolcanoRecord::new(VolcanoId::new(241040), "Raoul Island"),
        ],
        Vec::new(),
        Vec::new(),
    )
}

fn entries() -> Vec<MappingEntry> {
    let mut entries = Vec::new();
    for label in [
        "SOUFRIERE - TARISSAN PIT",
        "GRANDE DECOUVERTE",
        "SOUFRIERE - LA CITERNE",
        "SOUFRIERE - ECHELLE",
    ] {
        entries.push(MappingEntry::new(
            label,
            "Soufriere Guadeloupe",
            "LESSER_ANTILLES/GUADELOUPE.csv",
        ));
    }
    for label in [
        "TONGARIRO - RED CRATER",
        "TONGARIRO - NGAURUHOE CONE",
        "TONGARIRO - NORTH CRATER",
        "TONGARIRO - BLUE LAKE",
    ] {
        entries.push(MappingEntry::new(label, "Tongariro", "NEW_ZEALAND/TVZ.csv"));
    }
    entries.push(MappingEntry::new(
        "RAOUL ISLAND",
        "Raoul Island",
        "KERMADEC_ARC/KERMADEC_ARC.csv",
    ));
    entries.push(MappingEntry::new(
        "RAOUL ISLAND",
        "Raoul Island",
        "OCEAN_ISLAND_GROUPS/KERMADEC.csv",
    ));
    entries
}

fn build() -> NameResolver {
    let overrides = load_default_overrides().unwrap();
    NameResolver::build(&entries(), &registry(), &overrides.shortening)
}

#[test]
fn display_names_snapshot() {
    let resolver = build();
    let rendered = resolver
        .display_names()
        .into_iter()
        .map(|display| {
            let cluster = resolver.cluster(display).unwrap();
            format!(
                "{display} | {} | {}",
                cluster.registry_name(),
                cluster.label_count()
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    RAOUL ISLAND | Raoul Island | 1
    SOUFRIERE GUADELOUPE | Soufriere Guadeloupe | 4
    TONGARIRO (4 SITES) | Tongariro | 4
    ");
}

#[test]
fn override_precedes_repeated_token() {
    let resolver = build();
    let (cluster, short) = resolver
        .aggregated_sites()
        .find(|(cluster, _)| cluster.registry_name() == "Soufriere Guadeloupe")
        .unwrap();
    assert_eq!(short.rule, ShortNameRule::Override);
    assert!(cluster.contains_label("grande decouverte"));
    assert_eq!(
        resolver.resolve("SOUFRIERE GUADELOUPE"),
        Resolution::Resolved(VolcanoId::new(360060))
    );
}

#[test]
fn every_label_resolves_to_its_volcano() {
    let resolver = build();
    for entry in entries() {
        let expected = registry()
            .find_by_name(&entry.registry_name)
            .first()
            .map(|volcano| volcano.id)
            .unwrap();
        assert_eq!(
            resolver.resolve(&entry.archive_label).into_result(&entry.archive_label),
            Ok(expected)
        );
    }
}

#[test]
fn label_in_two_files_keeps_both_sources() {
    let resolver = build();
    let cluster = resolver.cluster("RAOUL ISLAND").unwrap();
    assert_eq!(
        cluster.sources().collect::<Vec<_>>(),
        vec![
            "KERMADEC_ARC/KERMADEC_ARC.csv",
            "OCEAN_ISLAND_GROUPS/KERMADEC.csv"
        ]
    );
    let volcano = registry().volcano(VolcanoId::new(241040)).cloned().unwrap();
    assert_eq!(
        resolver.cluster_for_volcano(&volcano).map(|c| c.label_count()),
        Some(1)
    );
}

#[test]
fn shared_display_name_keeps_first_cluster() {
    let mut entries = entries();
    for label in [
        "TONGARIRO - WEST DOME",
        "TONGARIRO - SOUTH CRATER",
        "TONGARIRO - OKATAINA VENT",
        "TONGARIRO - EAST PLATEAU",
    ] {
        entries.push(MappingEntry::new(label, "Tongariro South", "NEW_ZEALAND/TVZ.csv"));
    }
    let overrides = load_default_overrides().unwrap();
    let resolver = NameResolver::build(&entries, &registry(), &overrides.shortening);

    let south = resolver.cluster("TONGARIRO - WEST DOME").unwrap();
    assert_eq!(resolver.display_name(south), Some("TONGARIRO (4 SITES)"));
    assert_eq!(
        resolver.cluster("TONGARIRO (4 SITES)").map(|c| c.registry_name()),
        Some("Tongariro")
    );
    assert_eq!(
        resolver.resolve("tongariro (4 sites)"),
        Resolution::Resolved(VolcanoId::new(241080))
    );
}
