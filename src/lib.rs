//! FCF Model - Free cash flow projection engine for retail company analysis
//!
//! This library provides:
//! - Historical statement tables (built-in or loaded from CSV)
//! - Yearly revenue, EBIT, EBIAT and free cash flow projections
//! - Named scenario sets evaluated sequentially or in parallel
//! - Tabular views and CSV/JSON writers for a presentation layer

pub mod error;
pub mod history;
pub mod assumptions;
pub mod projection;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{ModelError, Result};
pub use history::{HistoricalRecord, HistoricalTable};
pub use assumptions::{ScenarioParameters, ScenarioSet, DashboardRanges};
pub use projection::{project, ProjectionEngine, ProjectionSeries, YearRecord};
pub use scenario::{evaluate_scenarios, ScenarioResult, ScenarioResults, ScenarioRunner};
