//! Language preference and string catalog.
//!
//! Handles:
//! - Language codes (en ↔ English, ny ↔ Chichewa)
//! - Catalog lookup with English fallback
//! - Strings for growth verdicts, alerts, and intake validation

use std::collections::HashMap;
use std::sync::OnceLock;

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// English
    En,
    /// Chichewa
    Ny,
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

impl Language {
    /// Two-letter code used for persistence.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ny => "ny",
        }
    }

    /// Parse a stored code. Unrecognized codes fall back to English.
    pub fn from_code(code: &str) -> Self {
        match code {
            "ny" => Language::Ny,
            _ => Language::En,
        }
    }
}

/// String catalog for the supported languages.
pub struct Catalog {
    en: HashMap<&'static str, &'static str>,
    ny: HashMap<&'static str, &'static str>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create a catalog with the default strings.
    pub fn new() -> Self {
        Self {
            en: Self::default_en(),
            ny: Self::default_ny(),
        }
    }

    /// Look up a key in the given language.
    ///
    /// Missing translations fall back to English; keys missing from both
    /// catalogs come back as the key itself.
    pub fn translate<'a>(&self, language: Language, key: &'a str) -> &'a str {
        let table = match language {
            Language::En => &self.en,
            Language::Ny => &self.ny,
        };
        table
            .get(key)
            .or_else(|| self.en.get(key))
            .copied()
            .unwrap_or(key)
    }

    /// Default English strings.
    fn default_en() -> HashMap<&'static str, &'static str> {
        let mut map = HashMap::new();

        // Growth verdicts
        map.insert(
            "verdict.not_enough_data",
            "Not enough weight records yet. Weigh the child again to build a trend.",
        );
        map.insert(
            "verdict.very_dangerous",
            "Weight gain has stalled. Refer the child for follow-up care now.",
        );
        map.insert(
            "verdict.dangerous",
            "Weight gain is slower than expected. Schedule a follow-up visit.",
        );
        map.insert("verdict.healthy", "The child is gaining weight well.");

        // Alert titles and messages
        map.insert("alert.storage.title", "Storage Error");
        map.insert("alert.storage.message", "Could not update the patient record.");
        map.insert("alert.not_found.title", "Patient Not Found");
        map.insert("alert.not_found.message", "No record matches this patient ID.");
        map.insert("alert.missing_fields.title", "Missing Information");
        map.insert(
            "alert.missing_fields.message",
            "Please fill in all required fields.",
        );
        map.insert("alert.invalid_date.title", "Invalid Date");
        map.insert("alert.invalid_date.message", "Enter the date as DD/MM/YYYY.");
        map.insert("alert.invalid_weight.title", "Invalid Weight");
        map.insert(
            "alert.invalid_weight.message",
            "Weight must be a positive number.",
        );
        map.insert("alert.replace_weight.title", "Weight Already Recorded");
        map.insert(
            "alert.replace_weight.message",
            "A weight already exists for this date. Saving again replaces it.",
        );

        // Intake validation (same text the store's InvalidInput errors carry)
        map.insert("validation.patient_id", "Patient id is required");
        map.insert("validation.first_name", "First name is required");
        map.insert("validation.last_name", "Last name is required");
        map.insert(
            "validation.date_of_birth",
            "Date of birth must be a valid date (DD/MM/YYYY)",
        );
        map.insert("validation.weight", "Weight must be a positive number");

        map
    }

    /// Default Chichewa strings.
    fn default_ny() -> HashMap<&'static str, &'static str> {
        let mut map = HashMap::new();

        // Growth verdicts
        map.insert(
            "verdict.not_enough_data",
            "Zolemba za kulemera sizokwanira. Muyezenso mwana kuti mulondole kukula.",
        );
        map.insert(
            "verdict.very_dangerous",
            "Kulemera kwaima. Mwana afunika chithandizo mwamsanga.",
        );
        map.insert(
            "verdict.dangerous",
            "Mwana sakulemera bwino. Konzani ulendo wina wa chipatala.",
        );
        map.insert("verdict.healthy", "Mwana akukula bwino.");

        // Alert titles and messages
        map.insert("alert.storage.title", "Vuto Losunga");
        map.insert("alert.storage.message", "Zolemba za wodwala sizinasungidwe.");
        map.insert("alert.not_found.title", "Wodwala Sanapezeke");
        map.insert("alert.not_found.message", "Palibe zolemba za nambala imeneyi.");
        map.insert("alert.missing_fields.title", "Zambiri Zikusowa");
        map.insert(
            "alert.missing_fields.message",
            "Chonde lembani zofunikira zonse.",
        );
        map.insert("alert.invalid_date.title", "Tsiku Lolakwika");
        map.insert("alert.invalid_date.message", "Lembani tsiku ngati DD/MM/YYYY.");
        map.insert("alert.invalid_weight.title", "Kulemera Kolakwika");
        map.insert(
            "alert.invalid_weight.message",
            "Kulemera kuyenera kukhala nambala yoposa ziro.",
        );
        map.insert("alert.replace_weight.title", "Kulemera Kunalembedwa Kale");
        map.insert(
            "alert.replace_weight.message",
            "Tsiku limeneli linalembedwa kale. Mukasunganso, lidzasinthidwa.",
        );

        // Intake validation
        map.insert("validation.patient_id", "Nambala ya wodwala ikusowa");
        map.insert("validation.first_name", "Dzina loyamba likusowa");
        map.insert("validation.last_name", "Dzina lomaliza likusowa");
        map.insert(
            "validation.date_of_birth",
            "Tsiku lobadwa silolondola (DD/MM/YYYY)",
        );
        map.insert(
            "validation.weight",
            "Kulemera kuyenera kukhala nambala yoposa ziro",
        );

        map
    }
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Shared catalog, built on first use.
pub fn catalog() -> &'static Catalog {
    CATALOG.get_or_init(Catalog::new)
}

/// Look up a key in the shared catalog.
pub fn translate(language: Language, key: &str) -> String {
    catalog().translate(language, key).to_string()
}
