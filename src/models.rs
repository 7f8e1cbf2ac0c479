use serde::{Deserialize, Serialize};

/// Years shown on every metric chart, whether or not data exists for them.
pub const REPORTING_YEARS: [i32; 5] = [2021, 2022, 2023, 2024, 2025];

/// Year the prediction table forecasts.
pub const PREDICTION_YEAR: i32 = 2026;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data_directory: Option<String>,
    pub historical_file: String,
    pub prediction_file: String,
    pub output_format: OutputFormat,
    pub selection: Option<SelectionConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "json")]
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow::anyhow!("unknown output format: {}", other)),
        }
    }
}

/// Initial widget values, as a user would leave them between sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    pub university: Option<String>,
    pub track: Option<String>,
    pub program: Option<String>,
    pub grade: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_directory: Some("data".to_string()),
            historical_file: "all_years_입시결과_통합.csv".to_string(),
            prediction_file: "2026_수시입결_예측.csv".to_string(),
            output_format: OutputFormat::Text,
            selection: Some(SelectionConfig::default()),
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }

    pub fn historical_path(&self) -> std::path::PathBuf {
        self.resolve(&self.historical_file)
    }

    pub fn prediction_path(&self) -> std::path::PathBuf {
        self.resolve(&self.prediction_file)
    }

    fn resolve(&self, file: &str) -> std::path::PathBuf {
        match self.data_directory.as_deref() {
            Some(dir) => std::path::Path::new(dir).join(file),
            None => std::path::PathBuf::from(file),
        }
    }
}

/// One row of the multi-year results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub university: Option<String>,
    pub track: Option<String>,
    pub program: Option<String>,
    pub sub_track: Option<String>,
    pub year: i32,
    pub capacity: Option<u32>,
    pub competition_ratio: Option<f64>,
    pub fill_rank: Option<u32>,
    pub cutoff_50: Option<f64>,
    pub cutoff_70: Option<f64>,
}

impl HistoricalRecord {
    pub fn matches(&self, selection: &Selection) -> bool {
        self.university.as_deref() == Some(selection.university.as_str())
            && self.track.as_deref() == Some(selection.track.as_str())
            && self.program.as_deref() == Some(selection.program.as_str())
    }

    pub fn metric_value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Capacity => self.capacity.map(f64::from),
            Metric::CompetitionRatio => self.competition_ratio,
            Metric::FillRank => self.fill_rank.map(f64::from),
            Metric::Cutoff50 => self.cutoff_50,
            Metric::Cutoff70 => self.cutoff_70,
        }
    }
}

/// Forecast for one (university, track, program) in the prediction year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub university: String,
    pub track: String,
    pub program: String,
    pub cutoff_50: CutoffForecast,
    pub cutoff_70: CutoffForecast,
}

impl PredictionRecord {
    pub fn matches(&self, selection: &Selection) -> bool {
        self.university == selection.university
            && self.track == selection.track
            && self.program == selection.program
    }

    pub fn forecast(&self, category: CutCategory) -> &CutoffForecast {
        match category {
            CutCategory::Cut50 => &self.cutoff_50,
            CutCategory::Cut70 => &self.cutoff_70,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutoffForecast {
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
}

/// A fully resolved (university, track, program) choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub university: String,
    pub track: String,
    pub program: String,
}

impl Selection {
    pub fn new(university: impl Into<String>, track: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            university: university.into(),
            track: track.into(),
            program: program.into(),
        }
    }
}

/// The metrics charted per year, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Capacity,
    CompetitionRatio,
    FillRank,
    Cutoff50,
    Cutoff70,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Capacity,
        Metric::CompetitionRatio,
        Metric::FillRank,
        Metric::Cutoff50,
        Metric::Cutoff70,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Capacity => "Enrollment capacity",
            Metric::CompetitionRatio => "Competition ratio",
            Metric::FillRank => "Fill rank",
            Metric::Cutoff50 => "50% cutoff grade",
            Metric::Cutoff70 => "70% cutoff grade",
        }
    }

    /// Only the grade cutoffs are comparable with a student's own grade.
    pub fn has_reference_line(self) -> bool {
        matches!(self, Metric::Cutoff50 | Metric::Cutoff70)
    }

    pub fn is_integral(self) -> bool {
        matches!(self, Metric::Capacity | Metric::FillRank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CutCategory {
    #[serde(rename = "50% cut")]
    Cut50,
    #[serde(rename = "70% cut")]
    Cut70,
}

impl CutCategory {
    /// Fixed categorical x-axis order, never sorted by value.
    pub const ORDER: [CutCategory; 2] = [CutCategory::Cut50, CutCategory::Cut70];

    pub fn label(self) -> &'static str {
        match self {
            CutCategory::Cut50 => "50% cut",
            CutCategory::Cut70 => "70% cut",
        }
    }

    pub fn position(self) -> usize {
        match self {
            CutCategory::Cut50 => 0,
            CutCategory::Cut70 => 1,
        }
    }
}
