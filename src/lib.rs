//! Admission results dashboard.
//!
//! Loads a multi-year admissions table and a 2026 prediction table, lets the
//! user pick a university, track and program, and builds the per-year metric
//! charts and the prediction panel for that choice.

pub mod dashboard;
pub mod format;
pub mod grade;
pub mod loader;
pub mod models;
pub mod palette;
pub mod prediction;
pub mod report;
pub mod selection;
pub mod series;
pub mod session;

pub use dashboard::{Dashboard, DashboardView};
pub use models::{Config, Metric, Selection};
pub use selection::{Level, SelectionRequest};
