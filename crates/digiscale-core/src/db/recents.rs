//! Recent-patients cache: a bounded most-recently-used list.

use crate::db::{Database, DbResult};
use crate::models::{Patient, RecentPatient};
use rusqlite::params;

/// Maximum number of entries kept in the recent-patients list.
pub const RECENT_PATIENT_LIMIT: usize = 7;

impl Database {
    /// Mark a patient as recently seen, moving it to the front of the list.
    ///
    /// Entries are unique per patient id; re-touching replaces the stored
    /// summary fields. After every touch the list is pruned back to
    /// [`RECENT_PATIENT_LIMIT`] entries.
    pub fn touch_recent(&mut self, patient: &Patient) -> DbResult<()> {
        let summary = RecentPatient::from_patient(patient);
        let tx = self.transaction()?;

        let next: i64 = tx.query_row(
            "SELECT COALESCE(MAX(touched_at), 0) + 1 FROM recent_patients",
            [],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO recent_patients
                 (patient_id, first_name, last_name, date_of_birth, gender, village, touched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                summary.patient_id,
                summary.first_name,
                summary.last_name,
                summary.date_of_birth,
                summary.gender,
                summary.village,
                next,
            ],
        )?;
        tx.execute(
            "DELETE FROM recent_patients WHERE patient_id NOT IN
                 (SELECT patient_id FROM recent_patients ORDER BY touched_at DESC LIMIT ?1)",
            params![RECENT_PATIENT_LIMIT as i64],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// List recently seen patients, most recent first.
    pub fn recent_patients(&self) -> DbResult<Vec<RecentPatient>> {
        let mut stmt = self.conn.prepare(
            "SELECT patient_id, first_name, last_name, date_of_birth, gender, village
             FROM recent_patients ORDER BY touched_at DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![RECENT_PATIENT_LIMIT as i64], |row| {
            Ok(RecentPatient {
                patient_id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                date_of_birth: row.get(3)?,
                gender: row.get(4)?,
                village: row.get(5)?,
            })
        })?;

        let mut recents = Vec::new();
        for row in rows {
            recents.push(row?);
        }
        Ok(recents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn patient(n: u32) -> Patient {
        Patient::new(
            format!("MW-{:04}", n),
            format!("First{}", n),
            format!("Last{}", n),
            "06152021".to_string(),
        )
    }

    #[test]
    fn test_touch_and_list_most_recent_first() {
        let mut db = setup_db();
        db.touch_recent(&patient(1)).unwrap();
        db.touch_recent(&patient(2)).unwrap();
        db.touch_recent(&patient(3)).unwrap();

        let recents = db.recent_patients().unwrap();
        let ids: Vec<&str> = recents.iter().map(|r| r.patient_id.as_str()).collect();
        assert_eq!(ids, vec!["MW-0003", "MW-0002", "MW-0001"]);
    }

    #[test]
    fn test_retouch_moves_to_front() {
        let mut db = setup_db();
        db.touch_recent(&patient(1)).unwrap();
        db.touch_recent(&patient(2)).unwrap();
        db.touch_recent(&patient(3)).unwrap();
        db.touch_recent(&patient(1)).unwrap();

        let recents = db.recent_patients().unwrap();
        let ids: Vec<&str> = recents.iter().map(|r| r.patient_id.as_str()).collect();
        assert_eq!(ids, vec!["MW-0001", "MW-0003", "MW-0002"]);
        assert_eq!(recents.len(), 3);
    }

    #[test]
    fn test_retouch_updates_fields() {
        let mut db = setup_db();
        db.touch_recent(&patient(1)).unwrap();

        let mut updated = patient(1);
        updated.village = Some("Nkhoma".to_string());
        db.touch_recent(&updated).unwrap();

        let recents = db.recent_patients().unwrap();
        assert_eq!(recents.len(), 1);
        assert_eq!(recents[0].village, Some("Nkhoma".to_string()));
    }

    #[test]
    fn test_list_is_bounded() {
        let mut db = setup_db();
        for n in 1..=10 {
            db.touch_recent(&patient(n)).unwrap();
        }

        let recents = db.recent_patients().unwrap();
        assert_eq!(recents.len(), RECENT_PATIENT_LIMIT);
        // Oldest three were pruned.
        assert_eq!(recents[0].patient_id, "MW-0010");
        assert_eq!(recents.last().unwrap().patient_id, "MW-0004");
    }

    #[test]
    fn test_empty_list() {
        let db = setup_db();
        assert!(db.recent_patients().unwrap().is_empty());
    }
}
