//! Percentile-band classification of single measurements.

use super::percentiles::{bands_at, Sex};

/// Where a weight falls relative to the five reference bands. Ordered from
/// lightest to heaviest so comparisons follow severity rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WeightClass {
    BelowP3,
    P3ToP15,
    P15ToP50,
    P50ToP85,
    P85ToP97,
    AtOrAboveP97,
}

impl WeightClass {
    /// Human-readable band label.
    pub fn label(&self) -> &'static str {
        match self {
            WeightClass::BelowP3 => "below 3rd",
            WeightClass::P3ToP15 => "3rd-15th",
            WeightClass::P15ToP50 => "15th-50th",
            WeightClass::P50ToP85 => "50th-85th",
            WeightClass::P85ToP97 => "85th-97th",
            WeightClass::AtOrAboveP97 => "97th and above",
        }
    }
}

/// Classify a weight against the reference bands at an exact age.
///
/// Buckets are decided by strict less-than against the ascending thresholds,
/// first match wins, so a weight equal to a band value lands in the bucket
/// above it. Ages past the reference table return `None` (not applicable).
pub fn classify_weight(sex: Sex, age_months: u32, weight_kg: f64) -> Option<WeightClass> {
    let bands = bands_at(sex, age_months)?;
    let class = if weight_kg < bands.p3 {
        WeightClass::BelowP3
    } else if weight_kg < bands.p15 {
        WeightClass::P3ToP15
    } else if weight_kg < bands.p50 {
        WeightClass::P15ToP50
    } else if weight_kg < bands.p85 {
        WeightClass::P50ToP85
    } else if weight_kg < bands.p97 {
        WeightClass::P85ToP97
    } else {
        WeightClass::AtOrAboveP97
    };
    Some(class)
}
