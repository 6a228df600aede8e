//! Total-alkali-silica (TAS) rock classification.
//!
//! A sample is a point (x = SiO2, y = Na2O + K2O). Field boundaries are lines
//! through two calibration points. Rules are evaluated in order and the last
//! matching rule wins, so broad fields come first and narrower ones refine them.

use tracing::trace;
use volcano_model::{Oxide, RockLabel, SampleIssue, SampleRecord};

/// A boundary line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    /// Line through two points with distinct x.
    pub const fn through(p1: (f64, f64), p2: (f64, f64)) -> Self {
        let slope = (p2.1 - p1.1) / (p2.0 - p1.0);
        Self {
            slope,
            intercept: p1.1 - slope * p1.0,
        }
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// `y` lies on or under the line.
    pub fn below(&self, x: f64, y: f64) -> bool {
        self.at(x) >= y
    }

    /// `y` lies strictly over the line.
    pub fn above(&self, x: f64, y: f64) -> bool {
        self.at(x) < y
    }
}

pub const AB: Line = Line::through((52.0, 5.0), (57.0, 5.9));
pub const AB2: Line = Line::through((45.0, 5.0), (49.4, 7.3));
pub const AB3: Line = Line::through((41.0, 7.0), (52.5, 14.0));
pub const CD: Line = Line::through((49.4, 7.3), (52.0, 5.0));
pub const CD2: Line = Line::through((53.0, 9.3), (57.0, 5.9));
pub const CD3: Line = Line::through((57.6, 11.7), (63.0, 7.0));
pub const EF: Line = Line::through((49.4, 7.3), (45.0, 9.4));
pub const EF2: Line = Line::through((53.0, 9.3), (48.4, 11.5));
pub const EF3: Line = Line::through((57.6, 11.7), (52.5, 14.0));
pub const D: Line = Line::through((76.0, 1.0), (69.0, 8.0));
pub const T: Line = Line::through((41.0, 7.0), (45.0, 5.0));

/// A point on the TAS plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TasPoint {
    pub silica: f64,
    pub alkali: f64,
}

type Predicate = fn(f64, f64) -> bool;

/// Ordered classification rules; the last match wins.
pub const RULES: [(RockLabel, Predicate); 15] = [
    (RockLabel::Foidite, |_, _| true),
    (RockLabel::Basalt, |x, y| (45.0..52.0).contains(&x) && y < 5.0),
    (RockLabel::BasalticAndesite, |x, y| {
        (52.0..57.0).contains(&x) && AB.below(x, y)
    }),
    (RockLabel::Andesite, |x, y| {
        (57.0..63.0).contains(&x) && AB.below(x, y)
    }),
    (RockLabel::Dacite, |x, y| {
        x >= 63.0 && D.below(x, y) && AB.below(x, y)
    }),
    (RockLabel::Trachybasalt, |x, y| {
        y >= 5.0 && CD.below(x, y) && AB2.below(x, y)
    }),
    (RockLabel::BasalticTrachyandesite, |x, y| {
        AB.above(x, y) && AB2.below(x, y) && CD.above(x, y) && CD2.below(x, y)
    }),
    (RockLabel::Trachyandesite, |x, y| {
        AB.above(x, y) && AB2.below(x, y) && CD2.above(x, y) && CD3.below(x, y)
    }),
    (RockLabel::Trachyte, |x, y| {
        AB.above(x, y) && AB2.below(x, y) && CD3.above(x, y) && x < 69.0
    }),
    (RockLabel::Rhyolite, |x, y| D.above(x, y) && x >= 69.0),
    (RockLabel::Phonolite, |x, y| AB2.above(x, y) && EF3.above(x, y)),
    (RockLabel::TephriPhonolite, |x, y| {
        AB2.above(x, y) && EF3.below(x, y) && EF2.above(x, y) && AB3.below(x, y)
    }),
    (RockLabel::PhonoTephrite, |x, y| {
        AB2.above(x, y) && EF2.below(x, y) && EF.above(x, y) && AB3.below(x, y)
    }),
    (RockLabel::Tephrite, |x, y| {
        (T.at(x) <= y && AB2.above(x, y) && AB3.below(x, y) && EF.below(x, y))
            || (T.at(x) >= y && y >= 3.0 && (41.0..45.0).contains(&x))
    }),
    (RockLabel::PicroBasalt, |x, y| y < 3.0 && (41.0..=45.0).contains(&x)),
];

/// Classifies a composition; non-positive inputs are `Undetermined`.
pub fn classify(silica: f64, na2o: f64, k2o: f64) -> RockLabel {
    if !(silica > 0.0 && na2o > 0.0 && k2o > 0.0) {
        return RockLabel::Undetermined;
    }
    classify_point(TasPoint {
        silica,
        alkali: na2o + k2o,
    })
}

/// Classifies a point already on the TAS plane.
pub fn classify_point(point: TasPoint) -> RockLabel {
    let TasPoint {
        silica: x,
        alkali: y,
    } = point;
    RULES
        .iter()
        .filter(|(_, predicate)| predicate(x, y))
        .map(|(label, _)| *label)
        .last()
        .unwrap_or(RockLabel::Undetermined)
}

/// Classifies a normalized sample in place.
///
/// Samples without normalized chemistry, or whose classification is
/// undetermined, get `RockLabel::Undetermined` and an `UndeterminedRock` issue.
pub fn classify_sample(sample: &mut SampleRecord) -> RockLabel {
    let label = sample.normalized.as_ref().map_or(RockLabel::Undetermined, |n| {
        classify(
            n.silica(),
            n.get(Oxide::Na2O).unwrap_or(0.0),
            n.get(Oxide::K2O).unwrap_or(0.0),
        )
    });
    if !label.is_determined() {
        trace!(location = %sample.location, "rock undetermined");
        sample.push_issue(SampleIssue::UndeterminedRock);
    }
    sample.rock = Some(label);
    label
}
