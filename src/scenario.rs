//! Scenario evaluation and comparison
//!
//! Every scenario in a set shares the base revenue and horizon but owns its
//! parameters. Scenarios are independent, so they can be evaluated
//! sequentially or on the rayon pool with identical results.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::{ScenarioParameters, ScenarioSet};
use crate::error::{ModelError, Result};
use crate::history::HistoricalTable;
use crate::projection::{project, ProjectionSeries};

/// Outcome of one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub label: String,
    pub params: ScenarioParameters,
    pub series: ProjectionSeries,
    /// Sum of FCF over the horizon
    pub accumulated_fcf: f64,
    /// Accumulated FCF divided by the number of years
    pub average_annual_fcf: f64,
}

impl ScenarioResult {
    fn from_series(label: &str, params: ScenarioParameters, series: ProjectionSeries) -> Self {
        let accumulated_fcf = series.total_fcf();
        let average_annual_fcf = accumulated_fcf / series.len() as f64;
        Self {
            label: label.to_string(),
            params,
            series,
            accumulated_fcf,
            average_annual_fcf,
        }
    }
}

/// Results keyed by label, in the order of the input set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioResults {
    results: Vec<ScenarioResult>,
}

impl ScenarioResults {
    pub fn get(&self, label: &str) -> Option<&ScenarioResult> {
        self.results.iter().find(|r| r.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.label.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScenarioResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// FCF per year, one column per scenario
    pub fn comparison(&self) -> Vec<ComparisonRow> {
        let years = self.results.iter().map(|r| r.series.len()).max().unwrap_or(0);

        (0..years)
            .map(|i| ComparisonRow {
                period: i as u32 + 1,
                fcf: self
                    .results
                    .iter()
                    .map(|r| r.series.get(i).map(|y| y.fcf))
                    .collect(),
            })
            .collect()
    }

    /// Key assumptions and FCF aggregates per scenario
    pub fn summary_rows(&self) -> Vec<ScenarioSummaryRow> {
        self.results
            .iter()
            .map(|r| ScenarioSummaryRow {
                scenario: r.label.clone(),
                revenue_growth_rate: r.params.revenue_growth_rate,
                ebit_margin: r.params.ebit_margin,
                capex_percent: r.params.capex_percent,
                accumulated_fcf: r.accumulated_fcf,
                average_annual_fcf: r.average_annual_fcf,
            })
            .collect()
    }

    fn push(&mut self, result: ScenarioResult) {
        self.results.push(result);
    }
}

impl<'a> IntoIterator for &'a ScenarioResults {
    type Item = &'a ScenarioResult;
    type IntoIter = std::slice::Iter<'a, ScenarioResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// One projected year across all scenarios. `fcf` follows the scenario order;
/// `None` where a scenario's horizon is shorter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub period: u32,
    pub fcf: Vec<Option<f64>>,
}

/// One line of the scenario summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummaryRow {
    pub scenario: String,
    pub revenue_growth_rate: f64,
    pub ebit_margin: f64,
    pub capex_percent: f64,
    pub accumulated_fcf: f64,
    pub average_annual_fcf: f64,
}

/// Evaluate every scenario in `scenarios` from the same base revenue and
/// horizon.
///
/// Stops at the first failing scenario and returns `ModelError::Scenario`
/// tagged with its label; the results computed before it travel with the
/// error.
pub fn evaluate_scenarios(base_revenue: f64, years: usize, scenarios: &ScenarioSet) -> Result<ScenarioResults> {
    let mut results = ScenarioResults::default();

    for (label, params) in scenarios.iter() {
        match project(base_revenue, years, params) {
            Ok(series) => results.push(ScenarioResult::from_series(label, *params, series)),
            Err(source) => return Err(scenario_error(label, source, results)),
        }
    }

    Ok(results)
}

fn scenario_error(label: &str, source: ModelError, completed: ScenarioResults) -> ModelError {
    ModelError::Scenario {
        label: label.to_string(),
        source: Box::new(source),
        completed,
    }
}

/// Runs projections for a fixed base revenue and horizon
///
/// # Example
/// ```
/// use fcf_model::{ScenarioRunner, ScenarioSet};
///
/// let runner = ScenarioRunner::new(715.12, 5);
/// let results = runner.evaluate(&ScenarioSet::standard()).unwrap();
/// assert_eq!(results.len(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScenarioRunner {
    base_revenue: f64,
    years: usize,
}

impl ScenarioRunner {
    pub fn new(base_revenue: f64, years: usize) -> Self {
        Self { base_revenue, years }
    }

    /// Start from the latest revenue of a historical table
    pub fn from_history(history: &HistoricalTable, years: usize) -> Result<Self> {
        Ok(Self::new(history.base_revenue()?, years))
    }

    pub fn base_revenue(&self) -> f64 {
        self.base_revenue
    }

    pub fn years(&self) -> usize {
        self.years
    }

    /// Run a single projection
    pub fn run(&self, params: &ScenarioParameters) -> Result<ProjectionSeries> {
        project(self.base_revenue, self.years, params)
    }

    /// Evaluate a scenario set one scenario at a time
    pub fn evaluate(&self, scenarios: &ScenarioSet) -> Result<ScenarioResults> {
        debug!(
            "evaluating {} scenarios sequentially over {} years",
            scenarios.len(),
            self.years
        );
        evaluate_scenarios(self.base_revenue, self.years, scenarios)
    }

    /// Evaluate a scenario set on the rayon pool.
    ///
    /// All scenarios are projected, then collected in input order, so the
    /// surfaced error and the results carried with it match `evaluate`.
    pub fn evaluate_parallel(&self, scenarios: &ScenarioSet) -> Result<ScenarioResults> {
        info!(
            "evaluating {} scenarios in parallel over {} years",
            scenarios.len(),
            self.years
        );

        let outcomes: Vec<_> = scenarios
            .entries()
            .par_iter()
            .map(|s| (s, project(self.base_revenue, self.years, &s.params)))
            .collect();

        let mut results = ScenarioResults::default();
        for (scenario, outcome) in outcomes {
            match outcome {
                Ok(series) => results.push(ScenarioResult::from_series(&scenario.label, scenario.params, series)),
                Err(source) => return Err(scenario_error(&scenario.label, source, results)),
            }
        }

        Ok(results)
    }
}
