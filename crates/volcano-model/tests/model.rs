#![allow(missing_docs)]

use volcano_model::{
    Material, Oxide, RegistryRock, SampleIssue, SampleRecord, VolcanoId, VolcanoRecord,
    VolcanoStats,
};

#[test]
fn test_sample_record_serializes_issues_and_oxides() {
    let mut sample = SampleRecord::new("KAMCHATKA / KLYUCHEVSKOY", "KAMCHATKA/Kamchatka.csv")
        .with_oxide(Oxide::SiO2, "52.1")
        .with_comment("ERUPTION 1994");
    sample.material = Material::from_archive("WR [123]");
    sample.push_issue(SampleIssue::NonNormalizable { denominator: 0.0 });

    let json = serde_json::to_value(&sample).expect("serialize sample");
    assert_eq!(json["material"], "WholeRock");
    assert_eq!(json["raw_oxides"]["SiO2"], "52.1");
    assert_eq!(json["issues"][0]["kind"], "non_normalizable");

    let round: SampleRecord = serde_json::from_value(json).expect("deserialize sample");
    assert_eq!(round, sample);
}

#[test]
fn test_volcano_stats_rocks_by_rank() {
    let mut rock_rank = [0u8; RegistryRock::COUNT];
    let mut rock_presence = [false; RegistryRock::COUNT];
    rock_rank[RegistryRock::Dacite.index()] = 2;
    rock_presence[RegistryRock::Dacite.index()] = true;
    rock_rank[RegistryRock::AndesiteBasalticAndesite.index()] = 1;
    rock_presence[RegistryRock::AndesiteBasalticAndesite.index()] = true;

    let stats = VolcanoStats {
        volcano_id: VolcanoId::new(273083),
        volcano_name: "Pinatubo".to_string(),
        eruption_count: 0,
        vei_count: 0,
        reliability: 0.0,
        max_vei: None,
        mean_vei: None,
        min_vei: None,
        rock_rank,
        rock_presence,
    };

    assert_eq!(
        stats.rocks_by_rank(),
        vec![RegistryRock::AndesiteBasalticAndesite, RegistryRock::Dacite]
    );
    let json = serde_json::to_value(&stats).expect("serialize stats");
    assert!(json["max_vei"].is_null());
}

#[test]
fn test_volcano_coordinates() {
    let mut volcano = VolcanoRecord::new(VolcanoId::new(1), "Etna");
    assert_eq!(volcano.coordinates(), None);
    volcano.latitude = Some(37.748);
    volcano.longitude = Some(14.999);
    assert_eq!(volcano.coordinates(), Some((37.748, 14.999)));
}
