use crate::format::{format_count, format_decimal, Formatted};
use crate::grade::Grade;
use crate::models::{HistoricalRecord, Metric, Selection, REPORTING_YEARS};
use crate::palette::ColorMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Horizontal padding of the reference line beyond the first and last reporting year.
const YEAR_PADDING: f64 = 0.5;

pub const REFERENCE_LINE_COLOR: &str = "red";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
    pub capacity: Option<u32>,
    /// Label drawn above the marker.
    pub text: Formatted,
    pub hover: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub color: &'static str,
    pub points: Vec<SeriesPoint>,
}

/// Horizontal marker at the user's own grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub x_start: f64,
    pub x_end: f64,
    pub color: &'static str,
    pub dashed: bool,
}

impl ReferenceLine {
    /// Spans every reporting year, whether or not a series has points there.
    pub fn across_years(grade: Grade) -> Self {
        let first = REPORTING_YEARS[0];
        let last = REPORTING_YEARS[REPORTING_YEARS.len() - 1];
        Self {
            y: grade.value(),
            x_start: f64::from(first) - YEAR_PADDING,
            x_end: f64::from(last) + YEAR_PADDING,
            color: REFERENCE_LINE_COLOR,
            dashed: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricChart {
    pub metric: Metric,
    pub title: String,
    pub y_axis_title: &'static str,
    pub x_ticks: [i32; 5],
    pub legend_title: &'static str,
    pub series: Vec<Series>,
    pub reference_line: Option<ReferenceLine>,
}

/// Rows of `rows` belonging to `selection`.
pub fn select_rows<'a>(rows: &'a [HistoricalRecord], selection: &Selection) -> Vec<&'a HistoricalRecord> {
    rows.iter().filter(|r| r.matches(selection)).collect()
}

/// Colour map shared by every metric chart of one selection.
pub fn selection_colors(rows: &[&HistoricalRecord]) -> ColorMap {
    ColorMap::from_labels(rows.iter().filter_map(|r| r.sub_track.as_deref()))
}

/// Capacity is a head count; every other metric is shown with two decimals.
fn format_metric(metric: Metric, record: &HistoricalRecord) -> Formatted {
    match metric {
        Metric::Capacity => format_count(record.capacity),
        _ => format_decimal(record.metric_value(metric)),
    }
}

fn hover_text(metric: Metric, record: &HistoricalRecord, label: &str, text: &Formatted) -> String {
    let mut hover = format!(
        "Year: {}<br>{}: {}<br>Sub-track: {}",
        record.year,
        metric.label(),
        text,
        label
    );
    if metric != Metric::Capacity {
        hover.push_str(&format!("<br>Capacity: {}", format_count(record.capacity)));
    }
    hover
}

/// Point series per sub-track for one metric, ordered by sub-track label.
///
/// `rows` must already be restricted to one selection (see [`select_rows`]).
pub fn build_series(rows: &[&HistoricalRecord], metric: Metric, colors: &ColorMap) -> Vec<Series> {
    let mut groups: BTreeMap<&str, Vec<&HistoricalRecord>> = BTreeMap::new();
    for &record in rows {
        let (Some(label), Some(_)) = (record.sub_track.as_deref(), record.metric_value(metric)) else {
            continue;
        };
        if !REPORTING_YEARS.contains(&record.year) {
            tracing::debug!(year = record.year, label, "ignoring row outside the reporting years");
            continue;
        }
        groups.entry(label).or_default().push(record);
    }

    groups
        .into_iter()
        .map(|(label, mut records)| {
            records.sort_by_key(|r| r.year);
            let points = records
                .into_iter()
                .filter_map(|record| {
                    let value = record.metric_value(metric)?;
                    let text = format_metric(metric, record);
                    Some(SeriesPoint {
                        year: record.year,
                        value,
                        capacity: record.capacity,
                        hover: hover_text(metric, record, label, &text),
                        text,
                    })
                })
                .collect();

            Series {
                label: label.to_string(),
                color: colors.color_for(label).unwrap_or_else(|| crate::palette::color_at(0)),
                points,
            }
        })
        .collect()
}

/// One chart for `metric`; the grade line is only added to cutoff metrics.
pub fn build_chart(rows: &[&HistoricalRecord], metric: Metric, colors: &ColorMap, grade: Option<Grade>) -> MetricChart {
    let reference_line = grade
        .filter(|_| metric.has_reference_line())
        .map(ReferenceLine::across_years);

    MetricChart {
        metric,
        title: format!("{} by year", metric.label()),
        y_axis_title: metric.label(),
        x_ticks: REPORTING_YEARS,
        legend_title: "Sub-track",
        series: build_series(rows, metric, colors),
        reference_line,
    }
}

/// All five metric charts for a selection, in display order.
pub fn build_charts(rows: &[HistoricalRecord], selection: &Selection, grade: Option<Grade>) -> Vec<MetricChart> {
    let selected = select_rows(rows, selection);
    let colors = selection_colors(&selected);
    tracing::debug!(
        rows = selected.len(),
        sub_tracks = colors.len(),
        university = %selection.university,
        track = %selection.track,
        program = %selection.program,
        "building metric charts"
    );

    Metric::ALL
        .iter()
        .map(|&metric| build_chart(&selected, metric, &colors, grade))
        .collect()
}
