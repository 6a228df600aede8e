//! Map marker colours from ranked rock composition.
//!
//! Felsic rocks (rhyolite, dacite) drive the red channel; mafic and
//! intermediate rocks (basalt, andesite) drive blue and add to green. Rocks
//! ranked lower in the registry slots give darker channels, floored at 115.

use std::fmt;

use serde::Serialize;
use volcano_model::{RegistryRock, VolcanoStats};

const CHANNEL_FLOOR: i32 = 115;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RockColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RockColor {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RockColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

fn fade(top: i32, rank: u8, step: i32) -> i32 {
    (top - (i32::from(rank) - 1) * step).max(CHANNEL_FLOOR)
}

fn channel(value: i32) -> u8 {
    u8::try_from(value.clamp(0, 255)).unwrap_or(u8::MAX)
}

/// Colour of a ranked rock vector (see [`VolcanoStats::rock_rank`]).
pub fn rock_color(rank: &[u8; RegistryRock::COUNT]) -> RockColor {
    let rhyolite = rank[RegistryRock::Rhyolite.index()];
    let dacite = rank[RegistryRock::Dacite.index()];
    let basalt = rank[RegistryRock::BasaltPicroBasalt.index()];
    let andesite = rank[RegistryRock::AndesiteBasalticAndesite.index()];

    let (r, mut g) = match (rhyolite > 0, dacite > 0) {
        (true, false) => (fade(200, rhyolite, 16), 0),
        (false, true) => (fade(255, dacite, 26), 64),
        (true, true) => (fade(200, rhyolite, 16), 64),
        (false, false) => (0, 0),
    };
    let b = match (basalt > 0, andesite > 0) {
        (true, false) => fade(255, basalt, 26),
        (false, true) => {
            g += fade(191, andesite, 26);
            0
        }
        (true, true) => {
            g += fade(191, andesite, 26);
            fade(255, basalt, 26)
        }
        (false, false) => 0,
    };
    RockColor {
        r: channel(r),
        g: channel(g),
        b: channel(b),
    }
}

/// Colour of a volcano's aggregate.
pub fn stats_color(stats: &VolcanoStats) -> RockColor {
    rock_color(&stats.rock_rank)
}
