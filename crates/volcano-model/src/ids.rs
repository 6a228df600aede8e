use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Registry volcano number, stable across data releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolcanoId(u32);

impl VolcanoId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for VolcanoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VolcanoId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_registry_number(s)
            .map(Self)
            .ok_or_else(|| ModelError::InvalidVolcanoId(s.to_string()))
    }
}

/// Registry eruption number (unique key of an eruption row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EruptionNumber(u32);

impl EruptionNumber {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EruptionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EruptionNumber {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_registry_number(s)
            .map(Self)
            .ok_or_else(|| ModelError::InvalidEruptionNumber(s.to_string()))
    }
}

/// Accepts `353060` as well as spreadsheet exports such as `353060.0`.
fn parse_registry_number(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u32>() {
        return Some(value);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Some(value as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_float_numbers() {
        assert_eq!("353060".parse::<VolcanoId>(), Ok(VolcanoId::new(353060)));
        assert_eq!(" 353060.0 ".parse::<VolcanoId>(), Ok(VolcanoId::new(353060)));
        assert!("353060.5".parse::<VolcanoId>().is_err());
        assert!("".parse::<EruptionNumber>().is_err());
    }

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&VolcanoId::new(211060)).expect("serialize id");
        assert_eq!(json, "211060");
    }
}
