//! Calendar dates behind the two wire formats.
//!
//! Weight entries are keyed by an 8-digit `MMDDYYYY` storage key; screens
//! display and accept `DD/MM/YYYY`. Both parsers are strict: the text must
//! have the exact fixed-width shape and name a real calendar date, otherwise
//! the value is rejected with `None` and the caller decides whether to skip
//! or report.

use chrono::{Datelike, NaiveDate};

/// A validated calendar date. Construction goes through one of the parsers
/// or [`DateKey::today`], so a value of this type always renders back to a
/// well-formed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Parse an 8-digit `MMDDYYYY` storage key.
    pub fn parse_storage(key: &str) -> Option<Self> {
        if key.len() != 8 || !key.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let month: u32 = key[0..2].parse().ok()?;
        let day: u32 = key[2..4].parse().ok()?;
        let year: i32 = key[4..8].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse a `DD/MM/YYYY` display string (fixed-width, slash-delimited).
    pub fn parse_display(text: &str) -> Option<Self> {
        let mut parts = text.split('/');
        let day_part = parts.next()?;
        let month_part = parts.next()?;
        let year_part = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        if day_part.len() != 2 || month_part.len() != 2 || year_part.len() != 4 {
            return None;
        }
        let all_digits = [day_part, month_part, year_part]
            .iter()
            .all(|p| p.bytes().all(|b| b.is_ascii_digit()));
        if !all_digits {
            return None;
        }
        let day: u32 = day_part.parse().ok()?;
        let month: u32 = month_part.parse().ok()?;
        let year: i32 = year_part.parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Accept either wire format. Used at intake points where the date may
    /// come from a stored key or a typed display string.
    pub fn parse_any(text: &str) -> Option<Self> {
        Self::parse_storage(text).or_else(|| Self::parse_display(text))
    }

    /// Build from calendar components.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Today's date in the device-local calendar.
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    /// The `MMDDYYYY` storage key.
    pub fn storage_key(&self) -> String {
        format!("{:02}{:02}{:04}", self.0.month(), self.0.day(), self.0.year())
    }

    /// The `DD/MM/YYYY` display form.
    pub fn display(&self) -> String {
        format!("{:02}/{:02}/{:04}", self.0.day(), self.0.month(), self.0.year())
    }

    /// Whole months elapsed since `birth`, as a calendar-month difference:
    /// year and month deltas, minus one when the day-of-month has not yet
    /// been reached, clamped at zero. Not an elapsed-day division.
    pub fn months_since(&self, birth: DateKey) -> u32 {
        let d = self.0;
        let b = birth.0;
        let mut months =
            (d.year() - b.year()) * 12 + (d.month() as i32 - b.month() as i32);
        if d.day() < b.day() {
            months -= 1;
        }
        months.max(0) as u32
    }
}

impl std::fmt::Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
