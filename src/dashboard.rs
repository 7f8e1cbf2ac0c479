use crate::grade::GradeStatus;
use crate::loader::TableLoader;
use crate::models::{Config, HistoricalRecord, PredictionRecord, Selection};
use crate::prediction::{build_prediction_panel, PredictionPanel};
use crate::selection::{resolve, ResolvedSelection, SelectionRequest};
use crate::series::{build_charts, MetricChart};
use anyhow::{Context, Result};
use serde::Serialize;

pub const NO_PREDICTION_NOTICE: &str = "No 2026 prediction is available for this selection.";

/// Everything drawn for one interaction.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub controls: ResolvedSelection,
    pub selection: Option<Selection>,
    pub grade: GradeStatus,
    pub charts: Vec<MetricChart>,
    pub prediction: Option<PredictionPanel>,
    pub notice: Option<String>,
}

/// The two source tables, loaded once and read by every render.
pub struct Dashboard {
    historical: Vec<HistoricalRecord>,
    predictions: Vec<PredictionRecord>,
}

impl Dashboard {
    pub fn new(historical: Vec<HistoricalRecord>, predictions: Vec<PredictionRecord>) -> Self {
        Self {
            historical,
            predictions,
        }
    }

    pub fn load(config: &Config) -> Result<Self> {
        let loader = TableLoader::new();

        let historical_path = config.historical_path();
        let historical = loader
            .load_historical(&historical_path)
            .with_context(|| format!("Failed to load historical table: {}", historical_path.display()))?;

        let prediction_path = config.prediction_path();
        let predictions = loader
            .load_predictions(&prediction_path)
            .with_context(|| format!("Failed to load prediction table: {}", prediction_path.display()))?;

        Ok(Self::new(historical, predictions))
    }

    pub fn historical(&self) -> &[HistoricalRecord] {
        &self.historical
    }

    pub fn predictions(&self) -> &[PredictionRecord] {
        &self.predictions
    }

    pub fn resolve(&self, request: &SelectionRequest) -> ResolvedSelection {
        resolve(&self.historical, request)
    }

    /// Recomputes the whole view from the widget values.
    pub fn render(&self, request: &SelectionRequest, grade_text: &str) -> DashboardView {
        let controls = self.resolve(request);
        let grade = GradeStatus::from_text(grade_text);
        let selection = controls.selection();

        let (charts, prediction, notice) = match &selection {
            Some(selection) => {
                let charts = build_charts(&self.historical, selection, grade.grade);
                let prediction = build_prediction_panel(&self.predictions, selection, grade.grade);
                let notice = prediction.is_none().then(|| NO_PREDICTION_NOTICE.to_string());
                (charts, prediction, notice)
            }
            None => {
                tracing::info!("selection incomplete, nothing to chart");
                (Vec::new(), None, None)
            }
        };

        DashboardView {
            controls,
            selection,
            grade,
            charts,
            prediction,
            notice,
        }
    }
}
