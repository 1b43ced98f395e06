//! Key/value settings, including the persisted language preference.

use crate::db::{Database, DbResult};
use crate::i18n::Language;
use rusqlite::{params, OptionalExtension};

/// Settings key the selected language is stored under.
pub const LANGUAGE_KEY: &str = "user-language";

impl Database {
    /// Read a setting, if present.
    pub fn get_setting(&self, key: &str) -> DbResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write a setting, replacing any existing value.
    pub fn set_setting(&self, key: &str, value: &str) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key)
             DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// Read the selected language. English when nothing is stored or the
    /// stored code is not recognized.
    pub fn get_language(&self) -> DbResult<Language> {
        let code = self.get_setting(LANGUAGE_KEY)?;
        Ok(code.map(|c| Language::from_code(&c)).unwrap_or(Language::En))
    }

    /// Persist the selected language.
    pub fn set_language(&self, language: Language) -> DbResult<()> {
        self.set_setting(LANGUAGE_KEY, language.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_setting_round_trip() {
        let db = setup_db();
        db.set_setting("theme", "dark").unwrap();
        assert_eq!(db.get_setting("theme").unwrap(), Some("dark".to_string()));
    }

    #[test]
    fn test_setting_overwrite() {
        let db = setup_db();
        db.set_setting("theme", "dark").unwrap();
        db.set_setting("theme", "light").unwrap();
        assert_eq!(db.get_setting("theme").unwrap(), Some("light".to_string()));
    }

    #[test]
    fn test_missing_setting() {
        let db = setup_db();
        assert_eq!(db.get_setting("nope").unwrap(), None);
    }

    #[test]
    fn test_language_defaults_to_english() {
        let db = setup_db();
        assert_eq!(db.get_language().unwrap(), Language::En);
    }

    #[test]
    fn test_language_round_trip() {
        let db = setup_db();
        db.set_language(Language::Ny).unwrap();
        assert_eq!(db.get_language().unwrap(), Language::Ny);
    }

    #[test]
    fn test_unknown_stored_code_falls_back() {
        let db = setup_db();
        db.set_setting(LANGUAGE_KEY, "fr").unwrap();
        assert_eq!(db.get_language().unwrap(), Language::En);
    }
}
