//! SQLite schema definition.

/// Complete database schema for digiscale.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    patient_id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,                 -- MMDDYYYY storage key
    gender TEXT,                                 -- 'M' or 'F' when known
    village TEXT,
    phone_number TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(last_name, first_name);

-- ============================================================================
-- Weight Series
-- ============================================================================

-- One row per (patient, date key); re-weighing the same day replaces the row
CREATE TABLE IF NOT EXISTS weights (
    patient_id TEXT NOT NULL REFERENCES patients(patient_id) ON DELETE CASCADE,
    date_key TEXT NOT NULL,                      -- MMDDYYYY storage key
    weight_kg REAL NOT NULL,
    recorded_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (patient_id, date_key)
);

CREATE INDEX IF NOT EXISTS idx_weights_patient ON weights(patient_id);

-- ============================================================================
-- Recent Patients (bounded MRU list)
-- ============================================================================

CREATE TABLE IF NOT EXISTS recent_patients (
    patient_id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,
    gender TEXT,
    village TEXT,
    touched_at INTEGER NOT NULL                  -- monotonic touch counter
);

CREATE INDEX IF NOT EXISTS idx_recents_touched ON recent_patients(touched_at);

-- ============================================================================
-- Settings
-- ============================================================================

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
