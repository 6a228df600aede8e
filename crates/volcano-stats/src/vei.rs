//! VEI statistics and rock presence vectors.

use serde::Serialize;
use tracing::trace;
use volcano_model::{
    EruptionRecord, ROCK_SLOT_COUNT, RegistryRock, VolcanoRecord, VolcanoStats,
};

/// VEI figures over a set of eruptions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VeiSummary {
    pub eruption_count: usize,
    pub vei_count: usize,
    pub reliability: f64,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub min: Option<f64>,
}

/// Summarizes VEI values, one per eruption; `None` is an unknown VEI.
pub fn vei_summary<I>(veis: I) -> VeiSummary
where
    I: IntoIterator<Item = Option<u8>>,
{
    let mut eruption_count = 0usize;
    let mut known = Vec::new();
    for vei in veis {
        eruption_count += 1;
        if let Some(vei) = vei {
            known.push(f64::from(vei));
        }
    }
    let reliability = if eruption_count == 0 {
        0.0
    } else {
        known.len() as f64 / eruption_count as f64
    };
    let max = known.iter().copied().reduce(f64::max);
    let min = known.iter().copied().reduce(f64::min);
    let mean = (!known.is_empty()).then(|| known.iter().sum::<f64>() / known.len() as f64);
    VeiSummary {
        eruption_count,
        vei_count: known.len(),
        reliability,
        max,
        mean,
        min,
    }
}

/// 1-based slot where each registry rock first appears (0 if absent), and
/// the matching presence vector.
pub fn rock_ranks(
    slots: &[Option<RegistryRock>; ROCK_SLOT_COUNT],
) -> ([u8; RegistryRock::COUNT], [bool; RegistryRock::COUNT]) {
    let mut rank = [0u8; RegistryRock::COUNT];
    for (slot, rock) in (1u8..).zip(slots.iter()) {
        if let Some(rock) = rock
            && rank[rock.index()] == 0
        {
            rank[rock.index()] = slot;
        }
    }
    (rank, rank.map(|r| r > 0))
}

/// Aggregates one volcano's eruptions and rock slots.
///
/// Eruptions of other volcanoes are ignored.
pub fn aggregate<'a, I>(volcano: &VolcanoRecord, eruptions: I) -> VolcanoStats
where
    I: IntoIterator<Item = &'a EruptionRecord>,
{
    let summary = vei_summary(
        eruptions
            .into_iter()
            .filter(|eruption| eruption.volcano_id == volcano.id)
            .map(|eruption| eruption.vei),
    );
    let (rock_rank, rock_presence) = rock_ranks(&volcano.rock_slots);
    trace!(
        volcano = %volcano.id,
        eruptions = summary.eruption_count,
        with_vei = summary.vei_count,
        "aggregated volcano"
    );
    VolcanoStats {
        volcano_id: volcano.id,
        volcano_name: volcano.name.clone(),
        eruption_count: summary.eruption_count,
        vei_count: summary.vei_count,
        reliability: summary.reliability,
        max_vei: summary.max,
        mean_vei: summary.mean,
        min_vei: summary.min,
        rock_rank,
        rock_presence,
    }
}
