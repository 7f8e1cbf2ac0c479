use admissions_dashboard::loader::{LoadError, TableLoader};
use admissions_dashboard::models::{Config, Metric, OutputFormat, Selection};
use admissions_dashboard::{report, Dashboard, SelectionRequest};
use std::fs;
use tempfile::TempDir;

const HISTORICAL: &str = "\
Unnamed: 0,대학명,중심전형,모집단위,전형명,연도,모집인원,경쟁률,충원순위,교과 50% cut,교과 70% cut
0,A,수시,컴퓨터공학,일반전형,2024,120,8.5,4,2.1,2.456
1,A,수시,컴퓨터공학,지역균형,2022,10,5.25,,1.9,2.2
2,A,수시,컴퓨터공학,일반전형,2022,110,7.0,3,2.0,2.3
3,A,수시,컴퓨터공학,지역균형,2023,,6.0,2,1.8,
4,A,수시,컴퓨터공학,일반전형,2023,115,7.5,5,2.05,2.35
5,A,수시,경영학,일반전형,2023,30,4.0,1,3.0,3.2
6,B,정시,물리학,일반전형,2021,20,3.0,1,4.0,4.5
";

const PREDICTIONS: &str = "\
대학명 ,중심전형,모집단위,2026_교과50cut_예측,2026_교과50cut_신뢰구간하한,2026_교과50cut_신뢰구간상한,2026_교과70cut_예측,2026_교과70cut_신뢰구간하한,2026_교과70cut_신뢰구간상한
A,수시,컴퓨터공학,2.15,1.9,2.4,2.456,2.2,2.7
";

fn write_tables(dir: &TempDir) -> Config {
    fs::write(dir.path().join("history.csv"), HISTORICAL).unwrap();
    fs::write(dir.path().join("prediction.csv"), PREDICTIONS).unwrap();
    Config {
        data_directory: Some(dir.path().display().to_string()),
        historical_file: "history.csv".to_string(),
        prediction_file: "prediction.csv".to_string(),
        output_format: OutputFormat::Json,
        selection: None,
    }
}

fn request(university: &str, track: &str, program: &str) -> SelectionRequest {
    SelectionRequest {
        university: Some(university.to_string()),
        track: Some(track.to_string()),
        program: Some(program.to_string()),
    }
}

#[test]
fn test_two_sub_tracks_produce_two_sorted_series_per_metric() {
    let dir = TempDir::new().unwrap();
    let dashboard = Dashboard::load(&write_tables(&dir)).unwrap();
    let view = dashboard.render(&request("A", "수시", "컴퓨터공학"), "");

    assert_eq!(view.selection, Some(Selection::new("A", "수시", "컴퓨터공학")));
    let ratio = view.charts.iter().find(|c| c.metric == Metric::CompetitionRatio).unwrap();
    let labels: Vec<&str> = ratio.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["일반전형", "지역균형"]);
    for series in &ratio.series {
        let years: Vec<i32> = series.points.iter().map(|p| p.year).collect();
        let mut sorted = years.clone();
        sorted.sort();
        assert_eq!(years, sorted);
        assert!(years.iter().all(|y| (2022..=2024).contains(y)));
    }

    // 지역균형 has no 2023 capacity, so its capacity series is shorter but keeps its colour.
    let capacity = view.charts.iter().find(|c| c.metric == Metric::Capacity).unwrap();
    assert_eq!(capacity.series[1].points.len(), 1);
    for chart in &view.charts {
        for series in &chart.series {
            let expected = ratio.series.iter().find(|s| s.label == series.label).unwrap().color;
            assert_eq!(series.color, expected);
        }
    }
}

#[test]
fn test_hover_text_carries_capacity_or_placeholder() {
    let dir = TempDir::new().unwrap();
    let dashboard = Dashboard::load(&write_tables(&dir)).unwrap();
    let view = dashboard.render(&request("A", "수시", "컴퓨터공학"), "");

    let cut_50 = view.charts.iter().find(|c| c.metric == Metric::Cutoff50).unwrap();
    let regional = cut_50.series.iter().find(|s| s.label == "지역균형").unwrap();
    assert!(regional.points[0].hover.ends_with("Capacity: 10"));
    assert!(regional.points[1].hover.ends_with("Capacity: no data"));

    let cut_70 = view.charts.iter().find(|c| c.metric == Metric::Cutoff70).unwrap();
    let general = cut_70.series.iter().find(|s| s.label == "일반전형").unwrap();
    assert_eq!(general.points.last().unwrap().text.as_str(), "2.46");
}

#[test]
fn test_grade_adds_reference_lines_to_cutoffs_and_panel() {
    let dir = TempDir::new().unwrap();
    let dashboard = Dashboard::load(&write_tables(&dir)).unwrap();
    let view = dashboard.render(&request("A", "수시", "컴퓨터공학"), "3.0");

    let with_line: Vec<Metric> = view
        .charts
        .iter()
        .filter(|c| c.reference_line.is_some())
        .map(|c| c.metric)
        .collect();
    assert_eq!(with_line, vec![Metric::Cutoff50, Metric::Cutoff70]);
    assert!(view.charts.iter().flat_map(|c| c.reference_line).all(|l| l.y == 3.0));

    let panel = view.prediction.unwrap();
    assert_eq!(panel.bands.len(), 2);
    assert_eq!(panel.bands[1].point_text, "2.46");
    assert_eq!(panel.reference_line.unwrap().y, 3.0);
}

#[test]
fn test_missing_prediction_row_gives_notice_without_bands() {
    let dir = TempDir::new().unwrap();
    let dashboard = Dashboard::load(&write_tables(&dir)).unwrap();
    let view = dashboard.render(&request("A", "수시", "경영학"), "2");

    assert!(view.prediction.is_none());
    assert!(view.notice.is_some());
    assert_eq!(view.charts.len(), 5);
}

#[test]
fn test_render_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let dashboard = Dashboard::load(&write_tables(&dir)).unwrap();
    let first = dashboard.render(&request("A", "수시", "컴퓨터공학"), "2.5");
    let second = dashboard.render(&request("A", "수시", "컴퓨터공학"), "2.5");
    assert_eq!(first.charts, second.charts);
    assert_eq!(
        report::render(&first, OutputFormat::Json).unwrap(),
        report::render(&second, OutputFormat::Json).unwrap()
    );
}

#[test]
fn test_stale_request_falls_back_through_cascade() {
    let dir = TempDir::new().unwrap();
    let dashboard = Dashboard::load(&write_tables(&dir)).unwrap();
    let view = dashboard.render(&request("B", "수시", "컴퓨터공학"), "");
    assert_eq!(view.selection, Some(Selection::new("B", "정시", "물리학")));
    assert_eq!(view.controls.tracks, vec!["정시".to_string()]);
}

#[test]
fn test_missing_file_and_column_fail_at_startup() {
    let dir = TempDir::new().unwrap();
    let mut config = write_tables(&dir);
    config.prediction_file = "absent.csv".to_string();
    let err = Dashboard::load(&config).err().unwrap();
    assert!(err.to_string().contains("prediction table"));

    let broken = dir.path().join("broken.csv");
    fs::write(&broken, "대학명,중심전형\nA,수시\n").unwrap();
    let err = TableLoader::new().load_historical(&broken).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn { .. }));
}
