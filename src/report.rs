use crate::dashboard::DashboardView;
use crate::models::{Metric, OutputFormat};
use crate::selection::Level;
use anyhow::Result;

pub fn render(view: &DashboardView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(view)),
        OutputFormat::Json => render_json(view),
    }
}

pub fn render_json(view: &DashboardView) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// Lists the choices offered at each level, marking the effective one.
pub fn render_options(view: &DashboardView) -> String {
    let mut content = String::new();
    for level in Level::ALL {
        let effective = view.controls.effective.get(level);
        let options = view.controls.options(level);

        content.push_str(&format!("{} ({} options):\n", level.label(), options.len()));
        if options.is_empty() {
            content.push_str("   (no options)\n");
        }
        for option in options {
            let marker = if Some(option.as_str()) == effective { "*" } else { " " };
            content.push_str(&format!("  {} {}\n", marker, option));
        }
    }
    content
}

fn render_grade_status(view: &DashboardView, content: &mut String) {
    match (&view.grade.grade, &view.grade.error) {
        (_, Some(error)) => content.push_str(&format!("⚠️  {}\n", error)),
        (Some(grade), None) => content.push_str(&format!("📝 Your grade: {}\n", grade)),
        (None, None) => {}
    }
}

pub fn render_text(view: &DashboardView) -> String {
    let mut content = String::new();

    let Some(selection) = &view.selection else {
        content.push_str("❌ No complete selection is available in the historical table\n");
        render_grade_status(view, &mut content);
        content.push('\n');
        content.push_str(&render_options(view));
        return content;
    };

    content.push_str(&format!(
        "🎓 {} / {} / {}\n",
        selection.university, selection.track, selection.program
    ));
    content.push_str("==========================================\n");
    render_grade_status(view, &mut content);
    content.push('\n');

    for chart in &view.charts {
        content.push_str(&format!("📈 {}\n", chart.title));
        if chart.series.is_empty() {
            content.push_str("   (no data)\n");
        }
        for series in &chart.series {
            let points: Vec<String> = series
                .points
                .iter()
                .map(|point| match point.capacity {
                    Some(capacity) if chart.metric != Metric::Capacity => {
                        format!("{}: {} (capacity {})", point.year, point.text, capacity)
                    }
                    _ => format!("{}: {}", point.year, point.text),
                })
                .collect();
            content.push_str(&format!("   - {}: {}\n", series.label, points.join(", ")));
        }
        if let Some(line) = &chart.reference_line {
            content.push_str(&format!("   --- your grade: {}\n", line.y));
        }
        content.push('\n');
    }

    match (&view.prediction, &view.notice) {
        (Some(panel), _) => {
            content.push_str(&format!("🔮 {}\n", panel.title));
            for band in &panel.bands {
                content.push_str(&format!(
                    "   {}: {} (interval {:.2} ~ {:.2})\n",
                    band.label, band.point_text, band.lower, band.upper
                ));
            }
            if let Some(line) = &panel.reference_line {
                content.push_str(&format!("   --- your grade: {}\n", line.y));
            }
        }
        (None, Some(notice)) => content.push_str(&format!("⚠️  {}\n", notice)),
        (None, None) => {}
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{Dashboard, NO_PREDICTION_NOTICE};
    use crate::models::HistoricalRecord;
    use crate::selection::SelectionRequest;

    fn view(grade: &str) -> DashboardView {
        let historical = vec![HistoricalRecord {
            university: Some("A".to_string()),
            track: Some("수시".to_string()),
            program: Some("컴퓨터공학".to_string()),
            sub_track: Some("일반전형".to_string()),
            year: 2024,
            capacity: Some(15),
            competition_ratio: Some(9.25),
            fill_rank: None,
            cutoff_50: Some(1.8),
            cutoff_70: None,
        }];
        Dashboard::new(historical, Vec::new()).render(&SelectionRequest::default(), grade)
    }

    #[test]
    fn test_text_report_lists_series_and_notice() {
        let text = render_text(&view("2.5"));
        assert!(text.contains("A / 수시 / 컴퓨터공학"));
        assert!(text.contains("- 일반전형: 2024: 9.25 (capacity 15)"));
        assert!(text.contains("Fill rank by year\n   (no data)"));
        assert!(text.contains("--- your grade: 2.5"));
        assert!(text.contains(NO_PREDICTION_NOTICE));
    }

    #[test]
    fn test_text_report_shows_grade_error() {
        let text = render_text(&view("x"));
        assert!(text.contains("is not a number"));
        assert!(!text.contains("your grade"));
    }

    #[test]
    fn test_grade_error_shown_without_selection() {
        let view = Dashboard::new(Vec::new(), Vec::new()).render(&SelectionRequest::default(), "12");
        let text = render_text(&view);
        assert!(text.contains("No complete selection"));
        assert!(text.contains("12 is out of range"));
    }

    #[test]
    fn test_json_report_is_valid() {
        let json = render_json(&view("")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["charts"].as_array().unwrap().len(), 5);
        assert_eq!(value["charts"][0]["metric"], "capacity");
        assert!(value["prediction"].is_null());
    }

    #[test]
    fn test_options_mark_effective_choice() {
        let text = render_options(&view(""));
        assert!(text.contains("University (1 options):\n  * A\n"));
    }
}
