//! DigiScale Core Library
//!
//! Local-first child growth monitoring: patient records, weight capture,
//! WHO weight-for-age analytics, and chart rendering for mobile hosts.
//!
//! # Architecture
//!
//! ```text
//! BLE scale ──► weight reading         Patient intake (scanned/typed id)
//!      │                                         │
//!      └───────────────┬─────────────────────────┘
//!                      ▼
//!      [SQLite: patients + weights + recents + settings]
//!                      │
//!       ┌──────────────┼──────────────────┐
//!       ▼              ▼                  ▼
//!   Weight table   Trend verdict   Weight-for-age chart
//!   (display)      (localized)     (SVG)
//! ```
//!
//! # Core Principle
//!
//! **Records never leave the device.** All analytics run locally against the
//! on-device store; hosts bind over FFI.
//!
//! # Modules
//!
//! - [`db`]: SQLite store (patients, weights, recents, settings)
//! - [`models`]: Domain types (Patient, RecentPatient, date keys)
//! - [`growth`]: Weight-for-age classification and trend verdicts
//! - [`chart`]: Growth chart model and SVG rendering
//! - [`i18n`]: Language preference and string catalog

pub mod chart;
pub mod db;
pub mod growth;
pub mod i18n;
pub mod models;

// Re-export commonly used types
pub use chart::GrowthChart;
pub use db::Database;
pub use growth::{GrowthStatus, Sex, WeightClass};
pub use i18n::{Catalog, Language};
pub use models::{DateKey, Patient, RecentPatient};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum DigiScaleError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

impl From<db::DbError> for DigiScaleError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(msg) => DigiScaleError::NotFound(msg),
            db::DbError::InvalidInput(msg) => DigiScaleError::InvalidInput(msg),
            db::DbError::Sqlite(e) => DigiScaleError::DatabaseError(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for DigiScaleError {
    fn from(e: serde_json::Error) -> Self {
        DigiScaleError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for DigiScaleError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        DigiScaleError::LockError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<DigiScale>, DigiScaleError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(DigiScale {
        db: Arc::new(Mutex::new(db)),
    }))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<DigiScale>, DigiScaleError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(DigiScale {
        db: Arc::new(Mutex::new(db)),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct DigiScale {
    db: Arc<Mutex<Database>>,
}

#[uniffi::export]
impl DigiScale {
    // =========================================================================
    // Patient Intake
    // =========================================================================

    /// Register a new patient. The returned record is what was stored, with
    /// the birth date in canonical form.
    pub fn create_patient(&self, intake: FfiPatientIntake) -> Result<FfiPatient, DigiScaleError> {
        let mut db = self.db.lock()?;
        let patient: Patient = intake.into();
        let stored = db.insert_patient(&patient)?;
        Ok(stored.into())
    }

    /// Resolve a scanned or typed patient id: return the stored record if it
    /// exists, otherwise register the provided intake.
    pub fn fetch_or_create(&self, intake: FfiPatientIntake) -> Result<FfiPatient, DigiScaleError> {
        let mut db = self.db.lock()?;
        let candidate: Patient = intake.into();
        let patient = db.fetch_or_create_patient(&candidate)?;
        Ok(patient.into())
    }

    /// Get a patient by id, including the weight series.
    pub fn get_patient(&self, patient_id: String) -> Result<FfiPatient, DigiScaleError> {
        let db = self.db.lock()?;
        let patient = db.get_patient(&patient_id)?;
        Ok(patient.into())
    }

    /// Check whether a patient id is already registered.
    pub fn patient_exists(&self, patient_id: String) -> Result<bool, DigiScaleError> {
        let db = self.db.lock()?;
        Ok(db.patient_exists(&patient_id)?)
    }

    /// Serialize a patient record to JSON (for host-side sharing/backup).
    pub fn export_patient_json(&self, patient_id: String) -> Result<String, DigiScaleError> {
        let db = self.db.lock()?;
        let patient = db.get_patient(&patient_id)?;
        Ok(serde_json::to_string(&patient)?)
    }

    // =========================================================================
    // Weight Operations
    // =========================================================================

    /// Record a weight for a patient on the given date (storage or display
    /// form). Re-weighing on the same date replaces the earlier value.
    pub fn record_weight(
        &self,
        patient_id: String,
        date: String,
        weight_kg: f64,
    ) -> Result<(), DigiScaleError> {
        let parsed = DateKey::parse_any(&date)
            .ok_or_else(|| DigiScaleError::InvalidInput(format!("Not a valid date: {}", date)))?;
        let db = self.db.lock()?;
        db.record_weight(&patient_id, parsed, weight_kg)?;
        Ok(())
    }

    /// Record a weight for today.
    pub fn record_weight_today(
        &self,
        patient_id: String,
        weight_kg: f64,
    ) -> Result<(), DigiScaleError> {
        let db = self.db.lock()?;
        db.record_weight_today(&patient_id, weight_kg)?;
        Ok(())
    }

    /// Weight history rows for display, sorted by age.
    ///
    /// Entries with dates or weights that cannot be interpreted are left out.
    pub fn weight_table(&self, patient_id: String) -> Result<Vec<FfiWeightRow>, DigiScaleError> {
        let db = self.db.lock()?;
        let patient = db.get_patient(&patient_id)?;
        let series = growth::derive_series(&patient);
        Ok(series.into_iter().map(|p| p.into()).collect())
    }

    // =========================================================================
    // Growth Analytics
    // =========================================================================

    /// Assess the patient's recent weight trend.
    ///
    /// The description comes back in the persisted language.
    pub fn growth_verdict(&self, patient_id: String) -> Result<FfiGrowthVerdict, DigiScaleError> {
        let db = self.db.lock()?;
        let patient = db.get_patient(&patient_id)?;
        let language = db.get_language()?;
        let series = growth::derive_series(&patient);
        let status = growth::assess_trend(&series);
        Ok(FfiGrowthVerdict {
            status: format!("{:?}", status),
            growth_score: growth::growth_score(&series),
            description: i18n::translate(language, status.description_key()),
        })
    }

    /// Classify a weight against the WHO weight-for-age bands.
    ///
    /// `None` past the reference table (over 60 months).
    pub fn classify_weight(
        &self,
        gender: Option<String>,
        age_months: u32,
        weight_kg: f64,
    ) -> Option<String> {
        let sex = Sex::from_gender(gender.as_deref());
        growth::classify_weight(sex, age_months, weight_kg).map(|class| format!("{:?}", class))
    }

    /// Render the weight-for-age chart for a patient as an SVG document.
    pub fn growth_chart_svg(
        &self,
        patient_id: String,
        highlight_date: Option<String>,
    ) -> Result<String, DigiScaleError> {
        let highlight = match highlight_date {
            Some(raw) => Some(DateKey::parse_any(&raw).ok_or_else(|| {
                DigiScaleError::InvalidInput(format!("Not a valid date: {}", raw))
            })?),
            None => None,
        };
        let db = self.db.lock()?;
        let patient = db.get_patient(&patient_id)?;
        let chart = GrowthChart::for_patient(&patient, highlight);
        Ok(chart.to_svg())
    }

    // =========================================================================
    // Recent Patients
    // =========================================================================

    /// Mark a patient as recently seen.
    pub fn touch_recent(&self, patient_id: String) -> Result<(), DigiScaleError> {
        let mut db = self.db.lock()?;
        let patient = db.get_patient(&patient_id)?;
        db.touch_recent(&patient)?;
        Ok(())
    }

    /// List recently seen patients, most recent first.
    pub fn recent_patients(&self) -> Result<Vec<FfiRecentPatient>, DigiScaleError> {
        let db = self.db.lock()?;
        let recents = db.recent_patients()?;
        Ok(recents.into_iter().map(|r| r.into()).collect())
    }

    // =========================================================================
    // Language
    // =========================================================================

    /// Get the persisted language code ("en" or "ny").
    pub fn get_language(&self) -> Result<String, DigiScaleError> {
        let db = self.db.lock()?;
        Ok(db.get_language()?.code().to_string())
    }

    /// Persist the language preference. Unknown codes fall back to English.
    pub fn set_language(&self, code: String) -> Result<(), DigiScaleError> {
        let db = self.db.lock()?;
        db.set_language(Language::from_code(&code))?;
        Ok(())
    }

    /// Look up a catalog string in the persisted language.
    pub fn translate(&self, key: String) -> Result<String, DigiScaleError> {
        let db = self.db.lock()?;
        let language = db.get_language()?;
        Ok(i18n::translate(language, &key))
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient intake form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientIntake {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: Option<String>,
    pub village: Option<String>,
    pub phone_number: Option<String>,
}

impl From<FfiPatientIntake> for Patient {
    fn from(intake: FfiPatientIntake) -> Self {
        let mut patient = Patient::new(
            intake.patient_id,
            intake.first_name,
            intake.last_name,
            intake.date_of_birth,
        );
        patient.gender = intake.gender;
        patient.village = intake.village;
        patient.phone_number = intake.phone_number;
        patient
    }
}

/// FFI-safe patient record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: Option<String>,
    pub village: Option<String>,
    pub phone_number: Option<String>,
    pub weights: HashMap<String, f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            patient_id: patient.patient_id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            date_of_birth: patient.date_of_birth,
            gender: patient.gender,
            village: patient.village,
            phone_number: patient.phone_number,
            weights: patient.weights,
            created_at: patient.created_at,
            updated_at: patient.updated_at,
        }
    }
}

/// FFI-safe weight history row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWeightRow {
    /// Display form, DD/MM/YYYY.
    pub date: String,
    /// Storage key, MMDDYYYY.
    pub date_key: String,
    pub age_months: u32,
    pub weight_kg: f64,
}

impl From<growth::SeriesPoint> for FfiWeightRow {
    fn from(point: growth::SeriesPoint) -> Self {
        Self {
            date: point.date.display(),
            date_key: point.date.storage_key(),
            age_months: point.age_months,
            weight_kg: point.weight_kg,
        }
    }
}

/// FFI-safe growth trend verdict.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGrowthVerdict {
    pub status: String,
    pub growth_score: Option<f64>,
    pub description: String,
}

/// FFI-safe recent-patient summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecentPatient {
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub gender: Option<String>,
    pub village: Option<String>,
}

impl From<RecentPatient> for FfiRecentPatient {
    fn from(recent: RecentPatient) -> Self {
        Self {
            patient_id: recent.patient_id,
            first_name: recent.first_name,
            last_name: recent.last_name,
            date_of_birth: recent.date_of_birth,
            gender: recent.gender,
            village: recent.village,
        }
    }
}
