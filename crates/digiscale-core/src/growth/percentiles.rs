//! WHO-style weight-for-age reference tables.
//!
//! Five percentile bands per sex, one weight per whole month of age from
//! birth to 60 months. Shipped as static data; lookups are exact-age only,
//! callers past the table get `None` rather than an extrapolation.

/// Last age covered by the reference tables, in months.
pub const MAX_REFERENCE_AGE_MONTHS: u32 = 60;

/// Biological sex used to select the reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Map a stored gender field. Only an explicit `"M"` selects the boys
    /// table; anything else (including absent) falls back to girls.
    pub fn from_gender(gender: Option<&str>) -> Self {
        match gender {
            Some("M") => Sex::Male,
            _ => Sex::Female,
        }
    }
}

/// One of the five reference bands, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PercentileBand {
    P3,
    P15,
    P50,
    P85,
    P97,
}

impl PercentileBand {
    /// All bands, ascending.
    pub const ALL: [PercentileBand; 5] = [
        PercentileBand::P3,
        PercentileBand::P15,
        PercentileBand::P50,
        PercentileBand::P85,
        PercentileBand::P97,
    ];

    /// Short ordinal label used on the chart.
    pub fn label(&self) -> &'static str {
        match self {
            PercentileBand::P3 => "3rd",
            PercentileBand::P15 => "15th",
            PercentileBand::P50 => "50th",
            PercentileBand::P85 => "85th",
            PercentileBand::P97 => "97th",
        }
    }
}

/// The five band values at one age.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandValues {
    pub p3: f64,
    pub p15: f64,
    pub p50: f64,
    pub p85: f64,
    pub p97: f64,
}

impl BandValues {
    /// Thresholds in ascending band order.
    pub fn ascending(&self) -> [f64; 5] {
        [self.p3, self.p15, self.p50, self.p85, self.p97]
    }
}

/// Full reference table for one sex: weights indexed by age in months.
pub struct GrowthReference {
    pub p3: [f64; 61],
    pub p15: [f64; 61],
    pub p50: [f64; 61],
    pub p85: [f64; 61],
    pub p97: [f64; 61],
}

impl GrowthReference {
    /// The curve for one band.
    pub fn band(&self, band: PercentileBand) -> &[f64; 61] {
        match band {
            PercentileBand::P3 => &self.p3,
            PercentileBand::P15 => &self.p15,
            PercentileBand::P50 => &self.p50,
            PercentileBand::P85 => &self.p85,
            PercentileBand::P97 => &self.p97,
        }
    }

    /// Band values at an exact age, or `None` past the table.
    pub fn at(&self, age_months: u32) -> Option<BandValues> {
        let i = age_months as usize;
        if i > MAX_REFERENCE_AGE_MONTHS as usize {
            return None;
        }
        Some(BandValues {
            p3: self.p3[i],
            p15: self.p15[i],
            p50: self.p50[i],
            p85: self.p85[i],
            p97: self.p97[i],
        })
    }
}

/// The table for a sex.
pub fn reference_for(sex: Sex) -> &'static GrowthReference {
    match sex {
        Sex::Male => &BOYS,
        Sex::Female => &GIRLS,
    }
}

/// Band values for a sex at an exact age.
pub fn bands_at(sex: Sex, age_months: u32) -> Option<BandValues> {
    reference_for(sex).at(age_months)
}

pub static BOYS: GrowthReference = GrowthReference {
    p3: [
        2.5, 3.4, 4.4, 5.1, 5.6, 6.1, 6.4, 6.7, 7.0, 7.2, 7.5, 7.7, // 0-11
        7.8, 8.0, 8.2, 8.4, 8.5, 8.7, 8.9, 9.0, 9.2, 9.3, 9.5, 9.7, // 12-23
        9.8, 10.0, 10.1, 10.2, 10.4, 10.5, 10.7, 10.8, 10.9, 11.1, 11.2, 11.3, // 24-35
        11.4, 11.6, 11.7, 11.8, 11.9, 12.1, 12.2, 12.3, 12.4, 12.5, 12.7, 12.8, // 36-47
        12.9, 13.0, 13.1, 13.3, 13.4, 13.5, 13.6, 13.7, 13.8, 13.9, 14.1, 14.2, // 48-59
        14.3, // 60
    ],
    p15: [
        2.9, 3.9, 4.9, 5.6, 6.2, 6.7, 7.1, 7.4, 7.7, 7.9, 8.2, 8.4, // 0-11
        8.6, 8.8, 9.0, 9.2, 9.4, 9.6, 9.7, 9.9, 10.1, 10.3, 10.5, 10.7, // 12-23
        10.9, 11.0, 11.2, 11.4, 11.5, 11.7, 11.8, 12.0, 12.1, 12.3, 12.4, 12.6, // 24-35
        12.7, 12.9, 13.0, 13.2, 13.3, 13.5, 13.6, 13.7, 13.9, 14.0, 14.2, 14.3, // 36-47
        14.4, 14.6, 14.7, 14.9, 15.0, 15.1, 15.3, 15.4, 15.5, 15.7, 15.8, 16.0, // 48-59
        16.1, // 60
    ],
    p50: [
        3.3, 4.5, 5.6, 6.4, 7.0, 7.5, 7.9, 8.3, 8.6, 8.9, 9.2, 9.4, // 0-11
        9.6, 9.9, 10.1, 10.3, 10.5, 10.7, 10.9, 11.1, 11.3, 11.5, 11.8, 12.0, // 12-23
        12.2, 12.4, 12.5, 12.7, 12.9, 13.1, 13.3, 13.5, 13.7, 13.8, 14.0, 14.2, // 24-35
        14.3, 14.5, 14.7, 14.8, 15.0, 15.2, 15.3, 15.5, 15.7, 15.8, 16.0, 16.2, // 36-47
        16.3, 16.5, 16.7, 16.8, 17.0, 17.2, 17.3, 17.5, 17.7, 17.8, 18.0, 18.2, // 48-59
        18.3, // 60
    ],
    p85: [
        3.9, 5.1, 6.3, 7.2, 7.9, 8.5, 8.9, 9.3, 9.6, 9.9, 10.2, 10.5, // 0-11
        10.7, 11.0, 11.2, 11.4, 11.7, 11.9, 12.2, 12.4, 12.6, 12.9, 13.1, 13.4, // 12-23
        13.6, 13.9, 14.1, 14.4, 14.6, 14.8, 15.1, 15.3, 15.5, 15.7, 16.0, 16.2, // 24-35
        16.4, 16.6, 16.8, 17.0, 17.3, 17.5, 17.7, 17.9, 18.1, 18.3, 18.6, 18.8, // 36-47
        19.0, 19.2, 19.4, 19.7, 19.9, 20.1, 20.3, 20.6, 20.8, 21.0, 21.2, 21.4, // 48-59
        21.6, // 60
    ],
    p97: [
        4.3, 5.7, 7.0, 7.9, 8.6, 9.1, 9.6, 10.1, 10.5, 10.9, 11.3, 11.6, // 0-11
        11.9, 12.2, 12.5, 12.8, 13.0, 13.3, 13.5, 13.8, 14.0, 14.3, 14.6, 14.9, // 12-23
        15.1, 15.4, 15.7, 15.9, 16.2, 16.5, 16.7, 17.0, 17.3, 17.6, 17.8, 18.1, // 24-35
        18.3, 18.6, 18.9, 19.1, 19.4, 19.7, 19.9, 20.2, 20.5, 20.7, 21.0, 21.3, // 36-47
        21.5, 21.8, 22.1, 22.3, 22.6, 22.9, 23.1, 23.4, 23.7, 23.9, 24.2, 24.5, // 48-59
        24.8, // 60
    ],
};

pub static GIRLS: GrowthReference = GrowthReference {
    p3: [
        2.4, 3.2, 4.0, 4.6, 5.1, 5.5, 5.8, 6.1, 6.3, 6.6, 6.8, 7.0, // 0-11
        7.2, 7.4, 7.6, 7.8, 7.9, 8.1, 8.2, 8.4, 8.5, 8.6, 8.8, 8.9, // 12-23
        9.0, 9.2, 9.3, 9.4, 9.6, 9.7, 9.8, 10.0, 10.1, 10.2, 10.4, 10.5, // 24-35
        10.6, 10.8, 10.9, 11.0, 11.1, 11.3, 11.4, 11.5, 11.6, 11.7, 11.8, 12.0, // 36-47
        12.1, 12.2, 12.3, 12.4, 12.6, 12.7, 12.8, 12.9, 13.0, 13.2, 13.3, 13.4, // 48-59
        13.5, // 60
    ],
    p15: [
        2.8, 3.6, 4.5, 5.1, 5.6, 6.0, 6.4, 6.7, 7.0, 7.2, 7.5, 7.7, // 0-11
        7.9, 8.1, 8.3, 8.5, 8.7, 8.9, 9.0, 9.2, 9.4, 9.5, 9.7, 9.8, // 12-23
        10.0, 10.1, 10.3, 10.4, 10.6, 10.7, 10.9, 11.0, 11.1, 11.3, 11.4, 11.5, // 24-35
        11.7, 11.8, 12.0, 12.1, 12.2, 12.3, 12.5, 12.6, 12.7, 12.9, 13.0, 13.1, // 36-47
        13.2, 13.4, 13.5, 13.6, 13.7, 13.9, 14.0, 14.1, 14.3, 14.4, 14.5, 14.6, // 48-59
        14.8, // 60
    ],
    p50: [
        3.2, 4.2, 5.1, 5.8, 6.4, 6.9, 7.3, 7.6, 7.9, 8.2, 8.5, 8.7, // 0-11
        8.9, 9.1, 9.4, 9.6, 9.8, 10.0, 10.2, 10.3, 10.5, 10.7, 10.9, 11.1, // 12-23
        11.3, 11.4, 11.6, 11.8, 12.0, 12.1, 12.3, 12.4, 12.6, 12.7, 12.9, 13.0, // 24-35
        13.2, 13.4, 13.5, 13.7, 13.8, 13.9, 14.1, 14.2, 14.4, 14.5, 14.7, 14.8, // 36-47
        14.9, 15.1, 15.2, 15.3, 15.4, 15.6, 15.7, 15.9, 16.0, 16.2, 16.3, 16.5, // 48-59
        16.7, // 60
    ],
    p85: [
        3.7, 4.8, 5.9, 6.7, 7.3, 7.9, 8.3, 8.7, 9.0, 9.3, 9.6, 9.9, // 0-11
        10.1, 10.4, 10.7, 10.9, 11.1, 11.4, 11.6, 11.8, 12.0, 12.3, 12.5, 12.7, // 12-23
        12.9, 13.1, 13.4, 13.6, 13.8, 14.0, 14.2, 14.4, 14.6, 14.8, 15.1, 15.3, // 24-35
        15.5, 15.7, 15.9, 16.1, 16.4, 16.6, 16.8, 17.0, 17.2, 17.4, 17.6, 17.8, // 36-47
        18.0, 18.2, 18.4, 18.6, 18.8, 19.0, 19.2, 19.4, 19.6, 19.8, 20.0, 20.2, // 48-59
        20.4, // 60
    ],
    p97: [
        4.2, 5.4, 6.5, 7.4, 8.1, 8.6, 9.1, 9.5, 9.9, 10.2, 10.6, 10.9, // 0-11
        11.2, 11.5, 11.8, 12.1, 12.3, 12.6, 12.9, 13.1, 13.4, 13.6, 13.9, 14.2, // 12-23
        14.4, 14.7, 14.9, 15.2, 15.5, 15.7, 16.0, 16.3, 16.5, 16.8, 17.1, 17.3, // 24-35
        17.6, 17.8, 18.1, 18.4, 18.7, 19.0, 19.2, 19.5, 19.8, 20.1, 20.3, 20.6, // 36-47
        20.9, 21.2, 21.4, 21.7, 22.0, 22.2, 22.5, 22.8, 23.1, 23.4, 23.7, 24.0, // 48-59
        24.2, // 60
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_gender() {
        assert_eq!(Sex::from_gender(Some("M")), Sex::Male);
        assert_eq!(Sex::from_gender(Some("F")), Sex::Female);
        assert_eq!(Sex::from_gender(Some("m")), Sex::Female);
        assert_eq!(Sex::from_gender(None), Sex::Female);
    }

    #[test]
    fn test_lookup_in_range() {
        let at_birth = bands_at(Sex::Male, 0).unwrap();
        assert_eq!(at_birth.p50, 3.3);
        let last = bands_at(Sex::Female, 60).unwrap();
        assert_eq!(last.p97, 24.2);
    }

    #[test]
    fn test_lookup_past_table() {
        assert!(bands_at(Sex::Male, 61).is_none());
        assert!(bands_at(Sex::Female, 120).is_none());
    }

    #[test]
    fn test_bands_ordered_at_every_age() {
        for sex in [Sex::Male, Sex::Female] {
            for age in 0..=MAX_REFERENCE_AGE_MONTHS {
                let bands = bands_at(sex, age).unwrap();
                let values = bands.ascending();
                for pair in values.windows(2) {
                    assert!(
                        pair[0] < pair[1],
                        "bands out of order at {:?} month {}: {:?}",
                        sex,
                        age,
                        values
                    );
                }
            }
        }
    }

    #[test]
    fn test_bands_monotonic_in_age() {
        for reference in [&BOYS, &GIRLS] {
            for band in PercentileBand::ALL {
                let curve = reference.band(band);
                assert_eq!(curve.len(), 61);
                for pair in curve.windows(2) {
                    assert!(pair[0] <= pair[1], "{:?} decreases: {:?}", band, pair);
                }
            }
        }
    }
}
