use crate::models::{CutoffForecast, HistoricalRecord, PredictionRecord};
use regex::Regex;
use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

pub const COL_UNIVERSITY: &str = "대학명";
pub const COL_TRACK: &str = "중심전형";
pub const COL_PROGRAM: &str = "모집단위";
pub const COL_SUB_TRACK: &str = "전형명";
pub const COL_YEAR: &str = "연도";
pub const COL_CAPACITY: &str = "모집인원";
pub const COL_COMPETITION: &str = "경쟁률";
pub const COL_FILL_RANK: &str = "충원순위";
pub const COL_CUT_50: &str = "교과 50% cut";
pub const COL_CUT_70: &str = "교과 70% cut";

pub const COL_PRED_50: &str = "2026_교과50cut_예측";
pub const COL_PRED_50_LOWER: &str = "2026_교과50cut_신뢰구간하한";
pub const COL_PRED_50_UPPER: &str = "2026_교과50cut_신뢰구간상한";
pub const COL_PRED_70: &str = "2026_교과70cut_예측";
pub const COL_PRED_70_LOWER: &str = "2026_교과70cut_신뢰구간하한";
pub const COL_PRED_70_UPPER: &str = "2026_교과70cut_신뢰구간상한";

/// Cell contents spreadsheets use for "no value".
const NULL_TOKENS: [&str; 5] = ["-", "nan", "NaN", "null", "N/A"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read table {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("table {path} is missing required column '{column}'")]
    MissingColumn { path: String, column: String },
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Unnamed").expect("placeholder pattern is valid"))
}

/// Header positions after whitespace trimming, with index/placeholder columns left out.
#[derive(Debug)]
struct Columns {
    source: String,
    positions: HashMap<String, usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord, source: &str) -> Self {
        let mut positions = HashMap::new();
        for (index, raw) in headers.iter().enumerate() {
            let name = raw.trim_start_matches('\u{feff}').trim();
            if name.is_empty() || placeholder_pattern().is_match(name) {
                tracing::debug!(column = index, header = raw, "dropping placeholder column");
                continue;
            }
            // First occurrence wins, as with a spreadsheet lookup by name.
            positions.entry(name.to_string()).or_insert(index);
        }

        Self {
            source: source.to_string(),
            positions,
        }
    }

    fn require(&self, column: &str) -> Result<usize, LoadError> {
        self.positions
            .get(column)
            .copied()
            .ok_or_else(|| LoadError::MissingColumn {
                path: self.source.clone(),
                column: column.to_string(),
            })
    }
}

fn text_cell(record: &csv::StringRecord, index: usize) -> Option<String> {
    let value = record.get(index)?.trim();
    if value.is_empty() || NULL_TOKENS.contains(&value) {
        None
    } else {
        Some(value.to_string())
    }
}

/// Decimal cell; a comma is read as the decimal separator.
fn decimal_cell(record: &csv::StringRecord, index: usize) -> Option<f64> {
    text_cell(record, index)?
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Integer cell; commas are thousands separators and `2023.0` style floats are accepted.
fn integer_cell(record: &csv::StringRecord, index: usize) -> Option<i64> {
    let value = text_cell(record, index)?.replace(',', "");
    if let Ok(parsed) = value.parse::<i64>() {
        return Some(parsed);
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .map(|parsed| parsed.trunc() as i64)
}

fn count_cell(record: &csv::StringRecord, index: usize) -> Option<u32> {
    integer_cell(record, index).and_then(|value| u32::try_from(value).ok())
}

/// Column positions of the prediction table; each cut is (predicted, lower, upper).
struct PredictionColumns {
    university: usize,
    track: usize,
    program: usize,
    cut_50: [usize; 3],
    cut_70: [usize; 3],
}

impl PredictionColumns {
    fn parse(&self, row: &csv::StringRecord) -> Option<PredictionRecord> {
        Some(PredictionRecord {
            university: text_cell(row, self.university)?,
            track: text_cell(row, self.track)?,
            program: text_cell(row, self.program)?,
            cutoff_50: Self::forecast(row, self.cut_50)?,
            cutoff_70: Self::forecast(row, self.cut_70)?,
        })
    }

    fn forecast(row: &csv::StringRecord, [predicted, lower, upper]: [usize; 3]) -> Option<CutoffForecast> {
        Some(CutoffForecast {
            predicted: decimal_cell(row, predicted)?,
            lower: decimal_cell(row, lower)?,
            upper: decimal_cell(row, upper)?,
        })
    }
}

pub struct TableLoader;

impl TableLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load_historical(&self, path: &Path) -> Result<Vec<HistoricalRecord>, LoadError> {
        let source = path.display().to_string();
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|source_err| LoadError::Csv {
                path: source.clone(),
                source: source_err,
            })?;
        self.read_historical(reader, &source)
    }

    pub fn load_predictions(&self, path: &Path) -> Result<Vec<PredictionRecord>, LoadError> {
        let source = path.display().to_string();
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|source_err| LoadError::Csv {
                path: source.clone(),
                source: source_err,
            })?;
        self.read_predictions(reader, &source)
    }

    pub fn read_historical<R: io::Read>(
        &self,
        mut reader: csv::Reader<R>,
        source: &str,
    ) -> Result<Vec<HistoricalRecord>, LoadError> {
        let csv_err = |err: csv::Error| LoadError::Csv {
            path: source.to_string(),
            source: err,
        };

        let headers = reader.headers().map_err(csv_err)?.clone();
        let columns = Columns::from_headers(&headers, source);

        let university = columns.require(COL_UNIVERSITY)?;
        let track = columns.require(COL_TRACK)?;
        let program = columns.require(COL_PROGRAM)?;
        let sub_track = columns.require(COL_SUB_TRACK)?;
        let year = columns.require(COL_YEAR)?;
        let capacity = columns.require(COL_CAPACITY)?;
        let competition = columns.require(COL_COMPETITION)?;
        let fill_rank = columns.require(COL_FILL_RANK)?;
        let cut_50 = columns.require(COL_CUT_50)?;
        let cut_70 = columns.require(COL_CUT_70)?;

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = row.map_err(csv_err)?;

            let Some(year_value) = integer_cell(&row, year).and_then(|y| i32::try_from(y).ok()) else {
                tracing::warn!(source, row = line + 1, "skipping row without a year");
                continue;
            };

            records.push(HistoricalRecord {
                university: text_cell(&row, university),
                track: text_cell(&row, track),
                program: text_cell(&row, program),
                sub_track: text_cell(&row, sub_track),
                year: year_value,
                capacity: count_cell(&row, capacity),
                competition_ratio: decimal_cell(&row, competition),
                fill_rank: count_cell(&row, fill_rank),
                cutoff_50: decimal_cell(&row, cut_50),
                cutoff_70: decimal_cell(&row, cut_70),
            });
        }

        tracing::info!(source, rows = records.len(), "loaded historical table");
        Ok(records)
    }

    pub fn read_predictions<R: io::Read>(
        &self,
        mut reader: csv::Reader<R>,
        source: &str,
    ) -> Result<Vec<PredictionRecord>, LoadError> {
        let csv_err = |err: csv::Error| LoadError::Csv {
            path: source.to_string(),
            source: err,
        };

        let headers = reader.headers().map_err(csv_err)?.clone();
        let columns = Columns::from_headers(&headers, source);

        let layout = PredictionColumns {
            university: columns.require(COL_UNIVERSITY)?,
            track: columns.require(COL_TRACK)?,
            program: columns.require(COL_PROGRAM)?,
            cut_50: [
                columns.require(COL_PRED_50)?,
                columns.require(COL_PRED_50_LOWER)?,
                columns.require(COL_PRED_50_UPPER)?,
            ],
            cut_70: [
                columns.require(COL_PRED_70)?,
                columns.require(COL_PRED_70_LOWER)?,
                columns.require(COL_PRED_70_UPPER)?,
            ],
        };

        let mut records = Vec::new();
        for (line, row) in reader.records().enumerate() {
            let row = row.map_err(csv_err)?;
            match layout.parse(&row) {
                Some(record) => records.push(record),
                None => tracing::warn!(source, row = line + 1, "skipping incomplete prediction row"),
            }
        }

        tracing::info!(source, rows = records.len(), "loaded prediction table");
        Ok(records)
    }
}

impl Default for TableLoader {
    fn default() -> Self {
        Self::new()
    }
}
