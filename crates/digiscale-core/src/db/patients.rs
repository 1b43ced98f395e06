//! Patient record operations.

use crate::db::{Database, DbError, DbResult};
use crate::models::{DateKey, Patient};
use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;

/// Check the identity fields a new patient must carry and parse the birth
/// date, which may arrive in either wire format.
///
/// Weight entries are not checked here; the analytics layer skips entries it
/// cannot interpret.
fn validate_intake(patient: &Patient) -> DbResult<DateKey> {
    if patient.patient_id.trim().is_empty() {
        return Err(DbError::InvalidInput("Patient id is required".to_string()));
    }
    if patient.first_name.trim().is_empty() {
        return Err(DbError::InvalidInput("First name is required".to_string()));
    }
    if patient.last_name.trim().is_empty() {
        return Err(DbError::InvalidInput("Last name is required".to_string()));
    }
    DateKey::parse_any(&patient.date_of_birth).ok_or_else(|| {
        DbError::InvalidInput("Date of birth must be a valid date (DD/MM/YYYY)".to_string())
    })
}

impl Database {
    /// Insert a new patient with any weights it already carries. The birth
    /// date is persisted in canonical `MMDDYYYY` form whichever way it
    /// arrived; the returned record is what was stored. The patient row and
    /// its weight entries commit together or not at all.
    pub fn insert_patient(&mut self, patient: &Patient) -> DbResult<Patient> {
        let birth = validate_intake(patient)?;
        let mut stored = patient.clone();
        stored.date_of_birth = birth.storage_key();

        let tx = self.transaction()?;
        tx.execute(
            "INSERT INTO patients (patient_id, first_name, last_name, date_of_birth,
                                   gender, village, phone_number, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                stored.patient_id,
                stored.first_name,
                stored.last_name,
                stored.date_of_birth,
                stored.gender,
                stored.village,
                stored.phone_number,
                stored.created_at,
                stored.updated_at,
            ],
        )?;

        for (date_key, weight_kg) in &stored.weights {
            tx.execute(
                "INSERT INTO weights (patient_id, date_key, weight_kg) VALUES (?1, ?2, ?3)",
                params![stored.patient_id, date_key, weight_kg],
            )?;
        }

        tx.commit()?;
        Ok(stored)
    }

    /// Load a patient with the weight series folded in, if present.
    fn load_patient(&self, patient_id: &str) -> DbResult<Option<Patient>> {
        let row = self
            .conn
            .query_row(
                "SELECT patient_id, first_name, last_name, date_of_birth,
                        gender, village, phone_number, created_at, updated_at
                 FROM patients WHERE patient_id = ?1",
                params![patient_id],
                |row| {
                    Ok(Patient {
                        patient_id: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        date_of_birth: row.get(3)?,
                        gender: row.get(4)?,
                        village: row.get(5)?,
                        phone_number: row.get(6)?,
                        weights: HashMap::new(),
                        created_at: row.get(7)?,
                        updated_at: row.get(8)?,
                    })
                },
            )
            .optional()?;

        let Some(mut patient) = row else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare("SELECT date_key, weight_kg FROM weights WHERE patient_id = ?1")?;
        let rows = stmt.query_map(params![patient_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
        })?;
        for row in rows {
            let (date_key, weight_kg) = row?;
            patient.weights.insert(date_key, weight_kg);
        }

        Ok(Some(patient))
    }

    /// Get a patient by id, including the weight series.
    pub fn get_patient(&self, patient_id: &str) -> DbResult<Patient> {
        self.load_patient(patient_id)?
            .ok_or_else(|| DbError::NotFound(format!("Patient not found: {}", patient_id)))
    }

    /// Check whether a patient id is already registered.
    pub fn patient_exists(&self, patient_id: &str) -> DbResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM patients WHERE patient_id = ?1",
            params![patient_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Resolve a scanned or typed id: return the stored record if the id is
    /// known, otherwise register the candidate and return it.
    ///
    /// The stored record wins entirely; candidate fields are not merged into
    /// an existing patient.
    pub fn fetch_or_create_patient(&mut self, candidate: &Patient) -> DbResult<Patient> {
        if let Some(existing) = self.load_patient(&candidate.patient_id)? {
            return Ok(existing);
        }
        self.insert_patient(candidate)
    }

    /// Record a weight for a patient on the given date. Re-weighing on the
    /// same date replaces the earlier value (last write wins).
    pub fn record_weight(&self, patient_id: &str, date: DateKey, weight_kg: f64) -> DbResult<()> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(DbError::InvalidInput(
                "Weight must be a positive number".to_string(),
            ));
        }
        if !self.patient_exists(patient_id)? {
            return Err(DbError::NotFound(format!(
                "Patient not found: {}",
                patient_id
            )));
        }

        self.conn.execute(
            "INSERT INTO weights (patient_id, date_key, weight_kg)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(patient_id, date_key)
             DO UPDATE SET weight_kg = excluded.weight_kg, recorded_at = datetime('now')",
            params![patient_id, date.storage_key(), weight_kg],
        )?;
        self.conn.execute(
            "UPDATE patients SET updated_at = datetime('now') WHERE patient_id = ?1",
            params![patient_id],
        )?;

        Ok(())
    }

    /// Record a weight for today.
    pub fn record_weight_today(&self, patient_id: &str, weight_kg: f64) -> DbResult<()> {
        self.record_weight(patient_id, DateKey::today(), weight_kg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn sample_patient() -> Patient {
        let mut patient = Patient::new(
            "MW-0042".to_string(),
            "Chikondi".to_string(),
            "Banda".to_string(),
            "06152021".to_string(),
        );
        patient.village = Some("Nkhoma".to_string());
        patient
    }

    #[test]
    fn test_insert_and_get_patient() {
        let mut db = setup_db();
        let mut patient = sample_patient();
        patient.weights.insert("06152022".to_string(), 9.2);
        patient.weights.insert("12152022".to_string(), 10.1);

        db.insert_patient(&patient).unwrap();

        let loaded = db.get_patient("MW-0042").unwrap();
        assert_eq!(loaded.first_name, "Chikondi");
        assert_eq!(loaded.village, Some("Nkhoma".to_string()));
        assert_eq!(loaded.weights.len(), 2);
        assert_eq!(loaded.weights.get("06152022"), Some(&9.2));
    }

    #[test]
    fn test_get_missing_patient() {
        let db = setup_db();
        let result = db.get_patient("nope");
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_patient_exists() {
        let mut db = setup_db();
        assert!(!db.patient_exists("MW-0042").unwrap());
        db.insert_patient(&sample_patient()).unwrap();
        assert!(db.patient_exists("MW-0042").unwrap());
    }

    #[test]
    fn test_insert_duplicate_id_fails() {
        let mut db = setup_db();
        db.insert_patient(&sample_patient()).unwrap();
        let result = db.insert_patient(&sample_patient());
        assert!(matches!(result, Err(DbError::Sqlite(_))));
    }

    #[test]
    fn test_intake_requires_identity_fields() {
        let mut db = setup_db();

        let mut patient = sample_patient();
        patient.first_name = "   ".to_string();
        assert!(matches!(
            db.insert_patient(&patient),
            Err(DbError::InvalidInput(_))
        ));

        let mut patient = sample_patient();
        patient.patient_id = String::new();
        assert!(matches!(
            db.insert_patient(&patient),
            Err(DbError::InvalidInput(_))
        ));

        let mut patient = sample_patient();
        patient.date_of_birth = "13452021".to_string();
        assert!(matches!(
            db.insert_patient(&patient),
            Err(DbError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_intake_normalizes_display_date() {
        let mut db = setup_db();
        let mut patient = sample_patient();
        patient.date_of_birth = "15/06/2021".to_string();

        let stored = db.insert_patient(&patient).unwrap();
        assert_eq!(stored.date_of_birth, "06152021");
        let loaded = db.get_patient("MW-0042").unwrap();
        assert_eq!(loaded.date_of_birth, "06152021");
    }

    #[test]
    fn test_insert_with_weights_is_atomic() {
        let mut db = setup_db();
        let mut patient = sample_patient();
        patient.weights.insert("06152022".to_string(), 9.2);
        // SQLite stores NaN as NULL, so this entry trips the NOT NULL
        // constraint partway through the weight inserts.
        patient.weights.insert("12152022".to_string(), f64::NAN);

        let result = db.insert_patient(&patient);
        assert!(matches!(result, Err(DbError::Sqlite(_))));

        // The failed intake must leave no trace, patient row included.
        assert!(!db.patient_exists("MW-0042").unwrap());
        let weight_rows: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM weights", [], |row| row.get(0))
            .unwrap();
        assert_eq!(weight_rows, 0);
    }

    #[test]
    fn test_fetch_or_create_returns_existing_unchanged() {
        let mut db = setup_db();
        db.insert_patient(&sample_patient()).unwrap();

        let mut candidate = sample_patient();
        candidate.first_name = "Different".to_string();

        let resolved = db.fetch_or_create_patient(&candidate).unwrap();
        assert_eq!(resolved.first_name, "Chikondi");
    }

    #[test]
    fn test_fetch_or_create_inserts_new() {
        let mut db = setup_db();
        let resolved = db.fetch_or_create_patient(&sample_patient()).unwrap();
        assert_eq!(resolved.patient_id, "MW-0042");
        assert!(db.patient_exists("MW-0042").unwrap());
    }

    #[test]
    fn test_record_weight_last_write_wins() {
        let mut db = setup_db();
        db.insert_patient(&sample_patient()).unwrap();

        let date = DateKey::parse_storage("06152022").unwrap();
        db.record_weight("MW-0042", date, 9.0).unwrap();
        db.record_weight("MW-0042", date, 9.4).unwrap();

        let loaded = db.get_patient("MW-0042").unwrap();
        assert_eq!(loaded.weights.len(), 1);
        assert_eq!(loaded.weights.get("06152022"), Some(&9.4));
    }

    #[test]
    fn test_record_weight_rejects_nonpositive() {
        let mut db = setup_db();
        db.insert_patient(&sample_patient()).unwrap();

        let date = DateKey::parse_storage("06152022").unwrap();
        assert!(matches!(
            db.record_weight("MW-0042", date, 0.0),
            Err(DbError::InvalidInput(_))
        ));
        assert!(matches!(
            db.record_weight("MW-0042", date, -4.0),
            Err(DbError::InvalidInput(_))
        ));
        assert!(matches!(
            db.record_weight("MW-0042", date, f64::NAN),
            Err(DbError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_record_weight_unknown_patient() {
        let db = setup_db();
        let date = DateKey::parse_storage("06152022").unwrap();
        let result = db.record_weight("ghost", date, 9.0);
        assert!(matches!(result, Err(DbError::NotFound(_))));
    }

    #[test]
    fn test_record_weight_today() {
        let mut db = setup_db();
        db.insert_patient(&sample_patient()).unwrap();
        db.record_weight_today("MW-0042", 11.3).unwrap();

        let loaded = db.get_patient("MW-0042").unwrap();
        let today = DateKey::today().storage_key();
        assert_eq!(loaded.weights.get(&today), Some(&11.3));
    }
}
