//! SVG rendering of the growth chart.

use super::{area_path, fmt, line_path, GrowthChart, MAX_AGE_MONTHS, MAX_WEIGHT_KG, PADDING};
use crate::growth::{reference_for, PercentileBand};

const BACKGROUND: &str = "#f5f6fa";
const BAND_YELLOW: &str = "#ffed5a";
const BAND_GREEN: &str = "#63e870";
const BAND_OPACITY: &str = "0.19";
const CURVE_STROKE: &str = "#222";
const MEDIAN_STROKE: &str = "#e11d48";
const MARKER_FILL: &str = "#100400";
const HIGHLIGHT_FILL: &str = "#e11d48";

impl GrowthChart {
    /// Render the chart as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = fmt(self.width),
            h = fmt(self.height),
        ));
        svg.push_str(&format!(
            "<rect width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
            fmt(self.width),
            fmt(self.height),
            BACKGROUND
        ));

        self.push_band_regions(&mut svg);
        self.push_weight_gridlines(&mut svg);
        self.push_age_ticks(&mut svg);
        self.push_axis_titles(&mut svg);
        self.push_reference_curves(&mut svg);
        self.push_patient_series(&mut svg);

        svg.push_str("</svg>\n");
        svg
    }

    fn curve_pixels(&self, band: PercentileBand) -> Vec<(f64, f64)> {
        let curve = reference_for(self.sex).band(band);
        curve
            .iter()
            .enumerate()
            .map(|(month, &weight)| (self.scale.x(month as f64), self.scale.y(weight)))
            .collect()
    }

    /// Outer bands (97-85, 15-3) yellow, inner bands (85-50, 50-15) green.
    fn push_band_regions(&self, svg: &mut String) {
        let regions = [
            (PercentileBand::P97, PercentileBand::P85, BAND_YELLOW),
            (PercentileBand::P85, PercentileBand::P50, BAND_GREEN),
            (PercentileBand::P50, PercentileBand::P15, BAND_GREEN),
            (PercentileBand::P15, PercentileBand::P3, BAND_YELLOW),
        ];
        for (top, bottom, fill) in regions {
            let path = area_path(&self.curve_pixels(top), &self.curve_pixels(bottom));
            svg.push_str(&format!(
                "<path d=\"{}\" fill=\"{}\" fill-opacity=\"{}\" stroke=\"none\"/>\n",
                path, fill, BAND_OPACITY
            ));
        }
    }

    /// Horizontal gridline per kilogram, labeled except at zero.
    fn push_weight_gridlines(&self, svg: &mut String) {
        for kg in 0..=(MAX_WEIGHT_KG as u32) {
            let y = self.scale.y(f64::from(kg));
            let stroke_width = if kg == 0 { 2.0 } else { 1.0 };
            svg.push_str(&format!(
                "<line x1=\"{}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"#ddd\" stroke-width=\"{}\"/>\n",
                fmt(PADDING),
                fmt(self.width - PADDING),
                fmt(stroke_width),
                y = fmt(y),
            ));
            if kg > 0 {
                svg.push_str(&format!(
                    "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#555\" text-anchor=\"end\">{}</text>\n",
                    fmt(PADDING - 6.0),
                    fmt(y + 3.0),
                    kg
                ));
            }
        }
    }

    /// Minor tick per month, major tick and label per year.
    fn push_age_ticks(&self, svg: &mut String) {
        let axis_y = self.height - PADDING;
        for month in 0..(MAX_AGE_MONTHS as u32) {
            let x = self.scale.x(f64::from(month));
            svg.push_str(&format!(
                "<line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\" stroke=\"#bbb\" stroke-width=\"0.7\"/>\n",
                fmt(axis_y),
                fmt(axis_y + 5.0),
                x = fmt(x),
            ));
        }
        for year in 0..=((MAX_AGE_MONTHS as u32) / 12) {
            let x = self.scale.x(f64::from(year * 12));
            svg.push_str(&format!(
                "<line x1=\"{x}\" y1=\"{}\" x2=\"{x}\" y2=\"{}\" stroke=\"#444\" stroke-width=\"1.5\"/>\n",
                fmt(axis_y),
                fmt(axis_y + 9.0),
                x = fmt(x),
            ));
            svg.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"#444\" text-anchor=\"middle\">{}</text>\n",
                fmt(x),
                fmt(axis_y + 19.0),
                year
            ));
        }
    }

    fn push_axis_titles(&self, svg: &mut String) {
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"#333\" text-anchor=\"middle\" font-weight=\"600\">Age (years)</text>\n",
            fmt(self.width / 2.0),
            fmt(self.height - 6.0),
        ));
        let label_x = PADDING - 22.0;
        let label_y = self.height / 2.0;
        svg.push_str(&format!(
            "<text x=\"{x}\" y=\"{y}\" font-size=\"12\" fill=\"#333\" text-anchor=\"middle\" font-weight=\"600\" transform=\"rotate(-90, {x}, {y})\">Weight (kg)</text>\n",
            x = fmt(label_x),
            y = fmt(label_y),
        ));
    }

    /// The five reference curves with their ordinal labels at the right edge.
    /// The median is stroked red and heavier; the others thin near-black.
    fn push_reference_curves(&self, svg: &mut String) {
        for band in PercentileBand::ALL {
            let pixels = self.curve_pixels(band);
            let (stroke, stroke_width, label_weight) = if band == PercentileBand::P50 {
                (MEDIAN_STROKE, 2.0, 700)
            } else {
                (CURVE_STROKE, 1.0, 600)
            };
            svg.push_str(&format!(
                "<path d=\"{}\" stroke=\"{}\" stroke-width=\"{}\" fill=\"none\"/>\n",
                line_path(&pixels),
                stroke,
                fmt(stroke_width),
            ));
            if let Some(&(end_x, end_y)) = pixels.last() {
                svg.push_str(&format!(
                    "<text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"{}\" font-weight=\"{}\" text-anchor=\"end\">{}</text>\n",
                    fmt(end_x - 2.0),
                    fmt(end_y + 1.0),
                    stroke,
                    label_weight,
                    band.label(),
                ));
            }
        }
    }

    fn push_patient_series(&self, svg: &mut String) {
        for point in &self.points {
            svg.push_str(&format!(
                "<circle cx=\"{}\" cy=\"{}\" r=\"4\" fill=\"{}\" stroke=\"#fff\" stroke-width=\"1\"/>\n",
                fmt(self.scale.x(f64::from(point.age_months))),
                fmt(self.scale.y(point.weight_kg)),
                MARKER_FILL,
            ));
        }
        if let Some(highlight) = self.highlight {
            svg.push_str(&format!(
                "<circle cx=\"{}\" cy=\"{}\" r=\"7\" fill=\"{}\" stroke=\"#fff\" stroke-width=\"2\"/>\n",
                fmt(self.scale.x(f64::from(highlight.age_months))),
                fmt(self.scale.y(highlight.weight_kg)),
                HIGHLIGHT_FILL,
            ));
        }
        if self.points.len() > 1 {
            let pixels: Vec<(f64, f64)> = self
                .points
                .iter()
                .map(|p| (self.scale.x(f64::from(p.age_months)), self.scale.y(p.weight_kg)))
                .collect();
            svg.push_str(&format!(
                "<path d=\"{}\" stroke=\"{}\" stroke-width=\"2\" fill=\"none\"/>\n",
                line_path(&pixels),
                MARKER_FILL,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartPoint;
    use crate::growth::Sex;

    fn sample_chart() -> GrowthChart {
        GrowthChart::new(
            Sex::Male,
            vec![
                ChartPoint { age_months: 6, weight_kg: 7.8 },
                ChartPoint { age_months: 12, weight_kg: 9.5 },
            ],
            Some(ChartPoint { age_months: 12, weight_kg: 9.5 }),
        )
    }

    #[test]
    fn test_svg_document_shape() {
        let svg = sample_chart().to_svg();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("width=\"380\""));
        assert!(svg.contains("height=\"450\""));
    }

    #[test]
    fn test_svg_band_regions() {
        let svg = sample_chart().to_svg();
        assert_eq!(svg.matches(BAND_YELLOW).count(), 2);
        assert_eq!(svg.matches(BAND_GREEN).count(), 2);
    }

    #[test]
    fn test_svg_reference_curves_and_labels() {
        let svg = sample_chart().to_svg();
        for label in ["3rd", "15th", "50th", "85th", "97th"] {
            assert!(svg.contains(&format!(">{}</text>", label)), "missing {}", label);
        }
        // Median curve is red; highlight circle is the only other red fill.
        assert!(svg.contains("stroke=\"#e11d48\" stroke-width=\"2\""));
    }

    #[test]
    fn test_svg_markers_polyline_and_highlight() {
        let svg = sample_chart().to_svg();
        assert_eq!(svg.matches("r=\"4\"").count(), 2);
        assert_eq!(svg.matches("r=\"7\"").count(), 1);
        assert!(svg.contains(&format!("fill=\"{}\"", HIGHLIGHT_FILL)));
        assert!(svg.contains(&format!("stroke=\"{}\" stroke-width=\"2\"", MARKER_FILL)));
    }

    #[test]
    fn test_svg_single_point_has_no_polyline() {
        let chart = GrowthChart::new(
            Sex::Female,
            vec![ChartPoint { age_months: 3, weight_kg: 5.6 }],
            None,
        );
        let svg = chart.to_svg();
        assert_eq!(svg.matches("r=\"4\"").count(), 1);
        assert_eq!(svg.matches("r=\"7\"").count(), 0);
        assert!(!svg.contains(&format!("stroke=\"{}\" stroke-width=\"2\"", MARKER_FILL)));
    }

    #[test]
    fn test_svg_axis_furniture() {
        let svg = sample_chart().to_svg();
        assert!(svg.contains("Age (years)"));
        assert!(svg.contains("Weight (kg)"));
        // 25 kg gridline label and the 5-year major tick label.
        assert!(svg.contains(">25</text>"));
        assert!(svg.contains(">5</text>"));
        // 60 minor ticks, one per month.
        assert_eq!(svg.matches("stroke=\"#bbb\"").count(), 60);
    }

    #[test]
    fn test_svg_custom_size() {
        let svg = sample_chart().with_size(500.0, 600.0).to_svg();
        assert!(svg.contains("viewBox=\"0 0 500 600\""));
    }
}
