use crate::format::format_decimal;
use crate::grade::Grade;
use crate::models::{CutCategory, PredictionRecord, Selection, PREDICTION_YEAR};
use crate::series::REFERENCE_LINE_COLOR;
use serde::Serialize;

pub const BAND_COLOR: &str = "dodgerblue";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutoffBand {
    pub category: CutCategory,
    pub label: &'static str,
    pub position: usize,
    pub lower: f64,
    pub upper: f64,
    pub predicted: f64,
    /// Value label drawn above the point marker.
    pub point_text: String,
    pub band_hover: String,
    pub point_hover: String,
    pub color: &'static str,
}

/// Grade line across both categorical positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryReferenceLine {
    pub y: f64,
    pub x_start: f64,
    pub x_end: f64,
    pub color: &'static str,
    pub dashed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionPanel {
    pub title: String,
    pub x_axis_title: &'static str,
    pub y_axis_title: &'static str,
    /// The grade axis always includes zero.
    pub y_axis_from_zero: bool,
    pub categories: [&'static str; 2],
    pub bands: Vec<CutoffBand>,
    pub reference_line: Option<CategoryReferenceLine>,
}

fn two_decimals(value: f64) -> String {
    format_decimal(Some(value)).to_string()
}

fn build_band(record: &PredictionRecord, category: CutCategory) -> CutoffBand {
    let forecast = record.forecast(category);
    let label = category.label();
    let lower = two_decimals(forecast.lower);
    let upper = two_decimals(forecast.upper);
    let predicted = two_decimals(forecast.predicted);

    CutoffBand {
        category,
        label,
        position: category.position(),
        lower: forecast.lower,
        upper: forecast.upper,
        predicted: forecast.predicted,
        band_hover: format!("{}<br>interval: {} ~ {}", label, lower, upper),
        point_hover: format!("{}<br>predicted: {}<br>interval: {} ~ {}", label, predicted, lower, upper),
        point_text: predicted,
        color: BAND_COLOR,
    }
}

/// Builds the prediction panel, or `None` when the table has no row for `selection`.
///
/// When several rows match, the first one is used.
pub fn build_prediction_panel(
    rows: &[PredictionRecord],
    selection: &Selection,
    grade: Option<Grade>,
) -> Option<PredictionPanel> {
    let Some(record) = rows.iter().find(|r| r.matches(selection)) else {
        tracing::debug!(
            university = %selection.university,
            track = %selection.track,
            program = %selection.program,
            "no prediction row for selection"
        );
        return None;
    };

    let bands = CutCategory::ORDER
        .iter()
        .map(|&category| build_band(record, category))
        .collect();

    let reference_line = grade.map(|grade| CategoryReferenceLine {
        y: grade.value(),
        x_start: -0.5,
        x_end: CutCategory::ORDER.len() as f64 - 0.5,
        color: REFERENCE_LINE_COLOR,
        dashed: true,
    });

    Some(PredictionPanel {
        title: format!("{} predicted cutoffs with confidence interval", PREDICTION_YEAR),
        x_axis_title: "Cutoff",
        y_axis_title: "Grade",
        y_axis_from_zero: true,
        categories: [CutCategory::Cut50.label(), CutCategory::Cut70.label()],
        bands,
        reference_line,
    })
}
