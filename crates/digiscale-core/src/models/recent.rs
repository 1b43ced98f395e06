//! Recently viewed patients.

use serde::{Deserialize, Serialize};

use super::Patient;

/// Identity summary kept in the bounded most-recently-used list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentPatient {
    /// Registry identifier
    pub patient_id: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Date of birth storage key
    pub date_of_birth: String,
    /// "M" or "F" if known
    pub gender: Option<String>,
    /// Home village
    pub village: Option<String>,
}

impl RecentPatient {
    /// Summarize a full record for the recents list.
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            patient_id: patient.patient_id.clone(),
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            date_of_birth: patient.date_of_birth.clone(),
            gender: patient.gender.clone(),
            village: patient.village.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_patient() {
        let mut patient = Patient::new(
            "MW-0099".into(),
            "Mary".into(),
            "Phiri".into(),
            "01052020".into(),
        );
        patient.village = Some("Nkhoma".into());
        let recent = RecentPatient::from_patient(&patient);
        assert_eq!(recent.patient_id, "MW-0099");
        assert_eq!(recent.village.as_deref(), Some("Nkhoma"));
        assert!(recent.gender.is_none());
    }
}
