//! Growth chart model.
//!
//! Pure geometry over the reference curves and a patient's series; rendering
//! to an SVG document lives in [`svg`]. The viewport is fixed to the clinic
//! card layout: 0-60 months across, 0-25 kg up, linear scales.

mod svg;

use crate::growth::{derive_series, Sex};
use crate::models::{DateKey, Patient};

/// Viewport padding on all four sides, in pixels.
pub const PADDING: f64 = 38.0;

/// Default canvas size.
pub const DEFAULT_WIDTH: f64 = 380.0;
pub const DEFAULT_HEIGHT: f64 = 450.0;

/// Horizontal domain, months.
pub const MAX_AGE_MONTHS: f64 = 60.0;

/// Vertical domain, kilograms.
pub const MAX_WEIGHT_KG: f64 = 25.0;

/// A point to plot: age against weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub age_months: u32,
    pub weight_kg: f64,
}

impl ChartPoint {
    fn in_domain(&self) -> bool {
        f64::from(self.age_months) <= MAX_AGE_MONTHS && self.weight_kg <= MAX_WEIGHT_KG
    }
}

/// Linear pixel scales for the fixed domain.
#[derive(Debug, Clone, Copy)]
pub struct ChartScale {
    width: f64,
    height: f64,
}

impl ChartScale {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Pixel x for an age in months.
    pub fn x(&self, age_months: f64) -> f64 {
        PADDING + (age_months / MAX_AGE_MONTHS) * (self.width - PADDING * 2.0)
    }

    /// Pixel y for a weight in kilograms. The axis grows upward, so heavier
    /// is a smaller y.
    pub fn y(&self, weight_kg: f64) -> f64 {
        self.height - PADDING - (weight_kg / MAX_WEIGHT_KG) * (self.height - PADDING * 2.0)
    }
}

/// The assembled chart: reference bands for one sex plus the patient series,
/// with an optional highlighted point (the just-accepted reading).
pub struct GrowthChart {
    pub(crate) sex: Sex,
    pub(crate) points: Vec<ChartPoint>,
    pub(crate) highlight: Option<ChartPoint>,
    pub(crate) scale: ChartScale,
    pub(crate) width: f64,
    pub(crate) height: f64,
}

impl GrowthChart {
    /// Build a chart from pre-derived points. Out-of-domain points (past the
    /// reference table or above the weight axis) are clipped out rather than
    /// stretching the fixed scales.
    pub fn new(sex: Sex, points: Vec<ChartPoint>, highlight: Option<ChartPoint>) -> Self {
        let points = points.into_iter().filter(ChartPoint::in_domain).collect();
        let highlight = highlight.filter(ChartPoint::in_domain);
        Self {
            sex,
            points,
            highlight,
            scale: ChartScale::new(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    /// Build a chart straight from a patient record, optionally highlighting
    /// the entry stored under `highlight_key`.
    pub fn for_patient(patient: &Patient, highlight_key: Option<DateKey>) -> Self {
        let series = derive_series(patient);
        let highlight = highlight_key.and_then(|key| {
            series
                .iter()
                .find(|p| p.date == key)
                .map(|p| ChartPoint { age_months: p.age_months, weight_kg: p.weight_kg })
        });
        let points = series
            .iter()
            .map(|p| ChartPoint { age_months: p.age_months, weight_kg: p.weight_kg })
            .collect();
        Self::new(Sex::from_gender(patient.gender.as_deref()), points, highlight)
    }

    /// Override the canvas size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self.scale = ChartScale::new(width, height);
        self
    }

    /// The plotted patient points after clipping.
    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }
}

/// Compact SVG coordinate: two decimals with trailing zeros trimmed.
pub(crate) fn fmt(value: f64) -> String {
    let text = format!("{:.2}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_string()
}

/// `M x,y L x,y ...` through the given pixel points.
pub(crate) fn line_path(pixels: &[(f64, f64)]) -> String {
    let mut path = String::new();
    for (i, (x, y)) in pixels.iter().enumerate() {
        let op = if i == 0 { 'M' } else { 'L' };
        path.push(op);
        path.push_str(&fmt(*x));
        path.push(',');
        path.push_str(&fmt(*y));
    }
    path
}

/// Closed region between a top curve and a bottom curve: trace the top, then
/// the bottom reversed, then close.
pub(crate) fn area_path(top: &[(f64, f64)], bottom: &[(f64, f64)]) -> String {
    if top.is_empty() || bottom.is_empty() {
        return String::new();
    }
    let mut outline: Vec<(f64, f64)> = top.to_vec();
    outline.extend(bottom.iter().rev());
    let mut path = line_path(&outline);
    path.push('Z');
    path
}
