//! Rock vocabularies: TAS labels assigned from chemistry, and the coarser
//! rock categories the registry records per volcano.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Total-alkali-silica rock label.
///
/// `Undetermined` is the sentinel produced for non-positive chemistry and is
/// never one of the fifteen TAS fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RockLabel {
    Foidite,
    PicroBasalt,
    Basalt,
    Trachybasalt,
    BasalticAndesite,
    BasalticTrachyandesite,
    Andesite,
    Trachyandesite,
    Dacite,
    /// Trachyte and trachydacite share one field.
    Trachyte,
    Rhyolite,
    Tephrite,
    PhonoTephrite,
    TephriPhonolite,
    Phonolite,
    Undetermined,
}

impl RockLabel {
    /// The fifteen TAS fields in canonical order.
    pub const TAS: [RockLabel; 15] = [
        RockLabel::Foidite,
        RockLabel::PicroBasalt,
        RockLabel::Basalt,
        RockLabel::Trachybasalt,
        RockLabel::BasalticAndesite,
        RockLabel::BasalticTrachyandesite,
        RockLabel::Andesite,
        RockLabel::Trachyandesite,
        RockLabel::Dacite,
        RockLabel::Trachyte,
        RockLabel::Rhyolite,
        RockLabel::Tephrite,
        RockLabel::PhonoTephrite,
        RockLabel::TephriPhonolite,
        RockLabel::Phonolite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RockLabel::Foidite => "FOIDITE",
            RockLabel::PicroBasalt => "PICROBASALT",
            RockLabel::Basalt => "BASALT",
            RockLabel::Trachybasalt => "TRACHYBASALT",
            RockLabel::BasalticAndesite => "BASALTIC ANDESITE",
            RockLabel::BasalticTrachyandesite => "BASALTIC TRACHYANDESITE",
            RockLabel::Andesite => "ANDESITE",
            RockLabel::Trachyandesite => "TRACHYANDESITE",
            RockLabel::Dacite => "DACITE",
            RockLabel::Trachyte => "TRACHYTE",
            RockLabel::Rhyolite => "RHYOLITE",
            RockLabel::Tephrite => "TEPHRITE",
            RockLabel::PhonoTephrite => "PHONO-TEPHRITE",
            RockLabel::TephriPhonolite => "TEPHRI-PHONOLITE",
            RockLabel::Phonolite => "PHONOLITE",
            RockLabel::Undetermined => "UNDETERMINED",
        }
    }

    /// Position in [`RockLabel::TAS`]; `None` for the sentinel.
    pub fn tas_index(&self) -> Option<usize> {
        RockLabel::TAS.iter().position(|label| label == self)
    }

    pub fn is_determined(&self) -> bool {
        *self != RockLabel::Undetermined
    }
}

impl fmt::Display for RockLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RockLabel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "FOIDITE" => Ok(RockLabel::Foidite),
            "PICROBASALT" | "PICRO-BASALT" => Ok(RockLabel::PicroBasalt),
            "BASALT" => Ok(RockLabel::Basalt),
            "TRACHYBASALT" => Ok(RockLabel::Trachybasalt),
            "BASALTIC ANDESITE" => Ok(RockLabel::BasalticAndesite),
            "BASALTIC TRACHYANDESITE" => Ok(RockLabel::BasalticTrachyandesite),
            "ANDESITE" => Ok(RockLabel::Andesite),
            "TRACHYANDESITE" => Ok(RockLabel::Trachyandesite),
            "DACITE" => Ok(RockLabel::Dacite),
            "TRACHYTE" | "TRACHYDACITE" => Ok(RockLabel::Trachyte),
            "RHYOLITE" => Ok(RockLabel::Rhyolite),
            "TEPHRITE" => Ok(RockLabel::Tephrite),
            "PHONO-TEPHRITE" | "PHONOTEPHRITE" => Ok(RockLabel::PhonoTephrite),
            "TEPHRI-PHONOLITE" | "TEPHRIPHONOLITE" => Ok(RockLabel::TephriPhonolite),
            "PHONOLITE" => Ok(RockLabel::Phonolite),
            "UNDETERMINED" => Ok(RockLabel::Undetermined),
            _ => Err(ModelError::UnknownRockLabel(s.to_string())),
        }
    }
}

/// Rock category recorded in the registry's major/minor rock slots.
///
/// Variant order is the fixed presence-vector order used by the aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RegistryRock {
    TrachybasaltTephriteBasanite,
    Foidite,
    BasaltPicroBasalt,
    AndesiteBasalticAndesite,
    TrachyandesiteBasalticTrachyandesite,
    PhonoTephriteTephriPhonolite,
    Dacite,
    TrachyteTrachydacite,
    Phonolite,
    Rhyolite,
}

impl RegistryRock {
    pub const COUNT: usize = 10;

    pub const ALL: [RegistryRock; 10] = [
        RegistryRock::TrachybasaltTephriteBasanite,
        RegistryRock::Foidite,
        RegistryRock::BasaltPicroBasalt,
        RegistryRock::AndesiteBasalticAndesite,
        RegistryRock::TrachyandesiteBasalticTrachyandesite,
        RegistryRock::PhonoTephriteTephriPhonolite,
        RegistryRock::Dacite,
        RegistryRock::TrachyteTrachydacite,
        RegistryRock::Phonolite,
        RegistryRock::Rhyolite,
    ];

    /// Registry spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryRock::TrachybasaltTephriteBasanite => "Trachybasalt / Tephrite Basanite",
            RegistryRock::Foidite => "Foidite",
            RegistryRock::BasaltPicroBasalt => "Basalt / Picro-Basalt",
            RegistryRock::AndesiteBasalticAndesite => "Andesite / Basaltic Andesite",
            RegistryRock::TrachyandesiteBasalticTrachyandesite => {
                "Trachyandesite / Basaltic Trachyandesite"
            }
            RegistryRock::PhonoTephriteTephriPhonolite => "Phono-tephrite / Tephri-phonolite",
            RegistryRock::Dacite => "Dacite",
            RegistryRock::TrachyteTrachydacite => "Trachyte / Trachydacite",
            RegistryRock::Phonolite => "Phonolite",
            RegistryRock::Rhyolite => "Rhyolite",
        }
    }

    /// Short column name used for aggregate tables.
    pub fn column_name(&self) -> &'static str {
        match self {
            RegistryRock::TrachybasaltTephriteBasanite => "Tephrite Basanite",
            RegistryRock::Foidite => "Foidite",
            RegistryRock::BasaltPicroBasalt => "Basalt",
            RegistryRock::AndesiteBasalticAndesite => "Andesite",
            RegistryRock::TrachyandesiteBasalticTrachyandesite => "Trachyandesite",
            RegistryRock::PhonoTephriteTephriPhonolite => "Tephri-phonolite",
            RegistryRock::Dacite => "Dacite",
            RegistryRock::TrachyteTrachydacite => "Trachyte",
            RegistryRock::Phonolite => "Phonolite",
            RegistryRock::Rhyolite => "Rhyolite",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Parses a registry rock slot; blank and placeholder cells yield `None`.
    pub fn from_slot(raw: &str) -> Result<Option<Self>, ModelError> {
        let collapsed = collapse_whitespace(raw);
        if collapsed.is_empty() || collapsed.eq_ignore_ascii_case("No Data (checked)") {
            return Ok(None);
        }
        RegistryRock::ALL
            .iter()
            .copied()
            .find(|rock| rock.as_str().eq_ignore_ascii_case(&collapsed))
            .map(Some)
            .ok_or_else(|| ModelError::UnknownRegistryRock(raw.to_string()))
    }
}

impl fmt::Display for RegistryRock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapses runs of whitespace (including non-breaking spaces) to one space.
fn collapse_whitespace(raw: &str) -> String {
    raw.split(|ch: char| ch.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rock_label_round_trips_through_display() {
        for label in RockLabel::TAS {
            assert_eq!(label.to_string().parse::<RockLabel>(), Ok(label));
        }
        assert_eq!("trachydacite".parse::<RockLabel>(), Ok(RockLabel::Trachyte));
        assert!(RockLabel::Undetermined.tas_index().is_none());
    }

    #[test]
    fn registry_rock_slot_parsing() {
        assert_eq!(
            RegistryRock::from_slot("Phono-tephrite /  Tephri-phonolite"),
            Ok(Some(RegistryRock::PhonoTephriteTephriPhonolite))
        );
        assert_eq!(RegistryRock::from_slot("\u{a0}"), Ok(None));
        assert_eq!(RegistryRock::from_slot("No Data (checked)"), Ok(None));
        assert!(RegistryRock::from_slot("Granite").is_err());
        assert_eq!(RegistryRock::Rhyolite.index(), 9);
    }
}
