use serde::{Deserialize, Serialize};

use crate::ids::VolcanoId;
use crate::rock::RegistryRock;

/// Per-volcano eruption and rock aggregate.
///
/// VEI figures are `None` when no eruption carries a numeric VEI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolcanoStats {
    pub volcano_id: VolcanoId,
    pub volcano_name: String,
    pub eruption_count: usize,
    /// Eruptions with a numeric VEI.
    pub vei_count: usize,
    /// `vei_count / eruption_count`, in `[0, 1]`.
    pub reliability: f64,
    pub max_vei: Option<f64>,
    pub mean_vei: Option<f64>,
    pub min_vei: Option<f64>,
    /// 1-based slot of each [`RegistryRock`] among the volcano's rock slots, 0 if absent.
    pub rock_rank: [u8; RegistryRock::COUNT],
    pub rock_presence: [bool; RegistryRock::COUNT],
}

impl VolcanoStats {
    pub fn rank_of(&self, rock: RegistryRock) -> u8 {
        self.rock_rank[rock.index()]
    }

    /// Rocks present, ordered by slot.
    pub fn rocks_by_rank(&self) -> Vec<RegistryRock> {
        let mut present: Vec<RegistryRock> = RegistryRock::ALL
            .iter()
            .copied()
            .filter(|rock| self.rock_presence[rock.index()])
            .collect();
        present.sort_by_key(|rock| self.rank_of(*rock));
        present
    }
}
