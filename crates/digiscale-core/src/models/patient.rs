//! Patient models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::DateKey;

/// A child patient record with the weight series folded in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Registry identifier - scanned from a card or typed at intake
    pub patient_id: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Date of birth as an `MMDDYYYY` storage key
    pub date_of_birth: String,
    /// "M" or "F"; anything else (or absent) is treated as "F" for
    /// percentile lookup
    pub gender: Option<String>,
    /// Home village
    pub village: Option<String>,
    /// Guardian phone number
    pub phone_number: Option<String>,
    /// Weight series: `MMDDYYYY` key to kilograms
    pub weights: HashMap<String, f64>,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl Patient {
    /// Create a new patient with required intake fields.
    pub fn new(
        patient_id: String,
        first_name: String,
        last_name: String,
        date_of_birth: String,
    ) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            patient_id,
            first_name,
            last_name,
            date_of_birth,
            gender: None,
            village: None,
            phone_number: None,
            weights: HashMap::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The validated birth date, if the stored key is well formed.
    pub fn birth_date(&self) -> Option<DateKey> {
        DateKey::parse_storage(&self.date_of_birth)
    }

    /// Record a weight for a date, replacing any value already stored under
    /// that key (last write wins).
    pub fn set_weight(&mut self, date: DateKey, weight_kg: f64) {
        self.weights.insert(date.storage_key(), weight_kg);
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Patient {
        Patient::new(
            "MW-0042".into(),
            "Chikondi".into(),
            "Banda".into(),
            "06152021".into(),
        )
    }

    #[test]
    fn test_new_patient() {
        let patient = sample();
        assert_eq!(patient.full_name(), "Chikondi Banda");
        assert!(patient.weights.is_empty());
        assert!(patient.gender.is_none());
        assert_eq!(patient.birth_date().unwrap().storage_key(), "06152021");
    }

    #[test]
    fn test_set_weight_last_write_wins() {
        let mut patient = sample();
        let date = DateKey::parse_storage("01102022").unwrap();
        patient.set_weight(date, 8.1);
        patient.set_weight(date, 8.4);
        assert_eq!(patient.weights.len(), 1);
        assert_eq!(patient.weights["01102022"], 8.4);
    }

    #[test]
    fn test_birth_date_invalid_key() {
        let mut patient = sample();
        patient.date_of_birth = "junk".into();
        assert!(patient.birth_date().is_none());
    }
}
