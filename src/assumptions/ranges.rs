//! Slider ranges offered by the dashboard
//!
//! These bound what a user can pick interactively. The engine accepts values
//! outside them; the CLI reports them as warnings.

use serde::Serialize;

use super::ScenarioParameters;

/// Inclusive range with a slider step
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParameterRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// A value that falls outside its dashboard range
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeViolation {
    pub field: &'static str,
    pub value: f64,
    pub range: ParameterRange,
}

/// Ranges for every adjustable input
#[derive(Debug, Clone, Serialize)]
pub struct DashboardRanges {
    pub min_years: usize,
    pub max_years: usize,
    pub default_years: usize,
    pub revenue_growth_rate: ParameterRange,
    pub ebit_margin: ParameterRange,
    pub tax_rate: ParameterRange,
    pub da_percent: ParameterRange,
    pub capex_percent: ParameterRange,
    pub working_capital_change_percent: ParameterRange,
}

impl DashboardRanges {
    /// Ranges of the single-projection tab
    pub fn projection() -> Self {
        Self {
            min_years: 3,
            max_years: 10,
            default_years: 5,
            revenue_growth_rate: ParameterRange::new(0.0, 10.0, 0.1),
            ebit_margin: ParameterRange::new(3.0, 8.0, 0.1),
            tax_rate: ParameterRange::new(15.0, 30.0, 0.5),
            da_percent: ParameterRange::new(1.0, 3.0, 0.1),
            capex_percent: ParameterRange::new(1.0, 5.0, 0.1),
            working_capital_change_percent: ParameterRange::new(-2.0, 2.0, 0.1),
        }
    }

    /// Ranges of the scenario tab (fixed five-year horizon, wider margin and CAPEX)
    pub fn scenarios() -> Self {
        Self {
            min_years: 5,
            max_years: 5,
            default_years: 5,
            ebit_margin: ParameterRange::new(2.0, 8.0, 0.1),
            capex_percent: ParameterRange::new(1.0, 6.0, 0.1),
            ..Self::projection()
        }
    }

    /// List every input outside its range. An empty list means all inputs
    /// could have come from the sliders.
    pub fn check(&self, params: &ScenarioParameters, years: usize) -> Vec<RangeViolation> {
        let mut violations = Vec::new();

        if years < self.min_years || years > self.max_years {
            violations.push(RangeViolation {
                field: "years",
                value: years as f64,
                range: ParameterRange::new(self.min_years as f64, self.max_years as f64, 1.0),
            });
        }

        let ranges = [
            self.revenue_growth_rate,
            self.ebit_margin,
            self.tax_rate,
            self.da_percent,
            self.capex_percent,
            self.working_capital_change_percent,
        ];

        for ((field, value), range) in params.fields().into_iter().zip(ranges) {
            if !range.contains(value) {
                violations.push(RangeViolation { field, value, range });
            }
        }

        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_within_projection_ranges() {
        let ranges = DashboardRanges::projection();
        let violations = ranges.check(&ScenarioParameters::dashboard_default(), ranges.default_years);
        assert!(violations.is_empty(), "unexpected violations: {:?}", violations);
    }

    #[test]
    fn test_out_of_range_reported_in_field_order() {
        let ranges = DashboardRanges::projection();
        let params = ScenarioParameters::new(12.0, 4.5, 22.0, 1.9, 5.5, -0.3);
        let violations = ranges.check(&params, 12);

        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["years", "revenue_growth_rate", "capex_percent"]);
    }

    #[test]
    fn test_scenario_tab_allows_wider_capex() {
        let params = ScenarioParameters::new(3.0, 2.5, 22.0, 1.9, 5.5, -0.3);
        assert!(DashboardRanges::scenarios().check(&params, 5).is_empty());
        assert_eq!(DashboardRanges::projection().check(&params, 5).len(), 2);
    }
}
