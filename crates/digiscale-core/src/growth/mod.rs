//! Weight-for-age analytics.
//!
//! Pipeline: series derivation → percentile classification → trend verdict

mod classify;
mod percentiles;

pub use classify::*;
pub use percentiles::*;

use crate::models::{DateKey, Patient};

/// Minimum number of points for a trend verdict.
const MIN_TREND_POINTS: usize = 2;

/// The trend looks at most this many of the most recent points.
const TREND_WINDOW: usize = 4;

/// Gains below this many kilograms over the window are very dangerous.
const VERY_DANGEROUS_BELOW_KG: f64 = 0.5;

/// Gains below this (but at least the very-dangerous bound) are dangerous.
const DANGEROUS_BELOW_KG: f64 = 1.0;

/// One weight measurement joined with the patient's birth date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Measurement date
    pub date: DateKey,
    /// Whole months of age at measurement
    pub age_months: u32,
    /// Measured weight
    pub weight_kg: f64,
}

/// Coarse trend over the most recent measurements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthStatus {
    NotEnoughData,
    VeryDangerous,
    Dangerous,
    Healthy,
}

impl GrowthStatus {
    /// Catalog key for the localized description.
    pub fn description_key(&self) -> &'static str {
        match self {
            GrowthStatus::NotEnoughData => "verdict.not_enough_data",
            GrowthStatus::VeryDangerous => "verdict.very_dangerous",
            GrowthStatus::Dangerous => "verdict.dangerous",
            GrowthStatus::Healthy => "verdict.healthy",
        }
    }
}

/// A weight value usable in the series. Stored data may contain anything,
/// so non-finite and non-positive values are filtered like malformed dates.
pub fn is_valid_weight(weight_kg: f64) -> bool {
    weight_kg.is_finite() && weight_kg > 0.0
}

/// Join a patient's weight map with their birth date, dropping entries whose
/// date key or weight does not validate. Drops are logged at debug level and
/// never raised. Result is sorted ascending by age (date as tiebreak).
pub fn derive_series(patient: &Patient) -> Vec<SeriesPoint> {
    let Some(birth) = patient.birth_date() else {
        log::debug!(
            "patient {} has unparseable date of birth {:?}; empty series",
            patient.patient_id,
            patient.date_of_birth
        );
        return Vec::new();
    };

    let mut points: Vec<SeriesPoint> = patient
        .weights
        .iter()
        .filter_map(|(key, &weight_kg)| {
            let Some(date) = DateKey::parse_storage(key) else {
                log::debug!(
                    "patient {}: dropping weight under malformed date key {:?}",
                    patient.patient_id,
                    key
                );
                return None;
            };
            if !is_valid_weight(weight_kg) {
                log::debug!(
                    "patient {}: dropping invalid weight {} at {}",
                    patient.patient_id,
                    weight_kg,
                    key
                );
                return None;
            }
            Some(SeriesPoint {
                date,
                age_months: date.months_since(birth),
                weight_kg,
            })
        })
        .collect();

    points.sort_by(|a, b| (a.age_months, a.date).cmp(&(b.age_months, b.date)));
    points
}

/// Gain over the recent window: mean weight of the last (up to) four points
/// minus the weight of the first of those. `None` below two points.
pub fn growth_score(points: &[SeriesPoint]) -> Option<f64> {
    if points.len() < MIN_TREND_POINTS {
        return None;
    }
    let window = &points[points.len().saturating_sub(TREND_WINDOW)..];
    let mean = window.iter().map(|p| p.weight_kg).sum::<f64>() / window.len() as f64;
    Some(mean - window[0].weight_kg)
}

/// Verdict over a series already sorted ascending by age.
pub fn assess_trend(points: &[SeriesPoint]) -> GrowthStatus {
    match growth_score(points) {
        None => GrowthStatus::NotEnoughData,
        Some(score) if score < VERY_DANGEROUS_BELOW_KG => GrowthStatus::VeryDangerous,
        Some(score) if score < DANGEROUS_BELOW_KG => GrowthStatus::Dangerous,
        Some(_) => GrowthStatus::Healthy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(weights: &[f64]) -> Vec<SeriesPoint> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &weight_kg)| SeriesPoint {
                date: DateKey::from_ymd(2022, 1, 1 + i as u32).unwrap(),
                age_months: i as u32,
                weight_kg,
            })
            .collect()
    }

    #[test]
    fn test_single_point_not_enough_data() {
        assert_eq!(assess_trend(&points(&[10.0])), GrowthStatus::NotEnoughData);
        assert_eq!(assess_trend(&[]), GrowthStatus::NotEnoughData);
        assert!(growth_score(&points(&[10.0])).is_none());
    }

    #[test]
    fn test_flat_series_very_dangerous() {
        let series = points(&[10.0, 10.1, 10.2, 10.3]);
        let score = growth_score(&series).unwrap();
        assert!((score - 0.15).abs() < 1e-9);
        assert_eq!(assess_trend(&series), GrowthStatus::VeryDangerous);
    }

    #[test]
    fn test_moderate_gain_dangerous() {
        // mean 10.6, first 10.0 -> 0.6
        let series = points(&[10.0, 10.5, 10.8, 11.1]);
        assert_eq!(assess_trend(&series), GrowthStatus::Dangerous);
    }

    #[test]
    fn test_steady_gain_healthy() {
        // mean 11.125, first 10.0 -> 1.125
        let series = points(&[10.0, 11.0, 11.5, 12.0]);
        assert_eq!(assess_trend(&series), GrowthStatus::Healthy);
    }

    #[test]
    fn test_window_ignores_older_points() {
        // Only the last four matter; the 9.0 at the front changes nothing.
        let series = points(&[9.0, 10.0, 10.1, 10.2, 10.3]);
        let score = growth_score(&series).unwrap();
        assert!((score - 0.15).abs() < 1e-9);
        assert_eq!(assess_trend(&series), GrowthStatus::VeryDangerous);
    }

    #[test]
    fn test_two_point_window() {
        let series = points(&[10.0, 11.2]);
        let score = growth_score(&series).unwrap();
        assert!((score - 0.6).abs() < 1e-9);
        assert_eq!(assess_trend(&series), GrowthStatus::Dangerous);
    }

    #[test]
    fn test_derive_series_skips_malformed_and_sorts() {
        let mut patient = Patient::new(
            "MW-0001".into(),
            "Alinafe".into(),
            "Mwale".into(),
            "06152021".into(),
        );
        patient.weights.insert("06152022".into(), 9.2); // 12 months
        patient.weights.insert("12152021".into(), 7.4); // 6 months
        patient.weights.insert("abcdefgh".into(), 5.0); // malformed key
        patient.weights.insert("061522".into(), 5.0); // 6 digits
        patient.weights.insert("09152021".into(), f64::NAN); // invalid weight
        patient.weights.insert("10152021".into(), -2.0); // invalid weight

        let series = derive_series(&patient);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].age_months, 6);
        assert_eq!(series[0].weight_kg, 7.4);
        assert_eq!(series[1].age_months, 12);
        assert_eq!(series[1].weight_kg, 9.2);
    }

    #[test]
    fn test_derive_series_bad_birth_date() {
        let mut patient = Patient::new(
            "MW-0002".into(),
            "Tamanda".into(),
            "Kachali".into(),
            "not-a-date".into(),
        );
        patient.weights.insert("06152022".into(), 9.2);
        assert!(derive_series(&patient).is_empty());
    }

    #[test]
    fn test_age_clamped_before_birth() {
        let mut patient = Patient::new(
            "MW-0003".into(),
            "Limbani".into(),
            "Jere".into(),
            "06152021".into(),
        );
        // Recorded before the birth date; age clamps to zero.
        patient.weights.insert("06012021".into(), 3.1);
        let series = derive_series(&patient);
        assert_eq!(series[0].age_months, 0);
    }
}
