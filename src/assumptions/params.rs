//! Scenario parameter bundle and its domain checks

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Assumptions driving one projection.
///
/// Every field is a percentage (5.2 means 5.2 %). Percent-of-revenue fields
/// may be negative: a negative working-capital change is a release of cash.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioParameters {
    /// Annual revenue growth (%)
    pub revenue_growth_rate: f64,

    /// EBIT as a percentage of revenue
    pub ebit_margin: f64,

    /// Tax rate applied to EBIT (%), within [0, 100]
    pub tax_rate: f64,

    /// Depreciation & amortization as a percentage of revenue
    pub da_percent: f64,

    /// Capital expenditures as a percentage of revenue
    pub capex_percent: f64,

    /// Change in working capital as a percentage of revenue
    pub working_capital_change_percent: f64,
}

impl ScenarioParameters {
    pub fn new(
        revenue_growth_rate: f64,
        ebit_margin: f64,
        tax_rate: f64,
        da_percent: f64,
        capex_percent: f64,
        working_capital_change_percent: f64,
    ) -> Self {
        Self {
            revenue_growth_rate,
            ebit_margin,
            tax_rate,
            da_percent,
            capex_percent,
            working_capital_change_percent,
        }
    }

    /// Starting values of the projection sliders
    pub fn dashboard_default() -> Self {
        Self::new(5.2, 4.5, 22.0, 1.9, 2.7, -0.3)
    }

    /// Copy with a different growth rate
    pub fn with_growth(self, revenue_growth_rate: f64) -> Self {
        Self { revenue_growth_rate, ..self }
    }

    /// Copy with a different tax rate
    pub fn with_tax_rate(self, tax_rate: f64) -> Self {
        Self { tax_rate, ..self }
    }

    /// Multiplier applied to revenue once per projected year
    pub fn growth_factor(&self) -> f64 {
        1.0 + self.revenue_growth_rate / 100.0
    }

    /// Check the fields against their domains.
    ///
    /// Only the tax rate has a bounded range. Growth may not fall below -100 %
    /// since that would turn revenue negative. Everything must be finite.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(ModelError::invalid(field, value, "must be a finite number"));
            }
        }

        if !(0.0..=100.0).contains(&self.tax_rate) {
            return Err(ModelError::invalid(
                "tax_rate",
                self.tax_rate,
                "must be within [0, 100]",
            ));
        }

        if self.revenue_growth_rate < -100.0 {
            return Err(ModelError::invalid(
                "revenue_growth_rate",
                self.revenue_growth_rate,
                "must not be below -100 (revenue would turn negative)",
            ));
        }

        Ok(())
    }

    /// Field names paired with their values, in declaration order
    pub fn fields(&self) -> [(&'static str, f64); 6] {
        [
            ("revenue_growth_rate", self.revenue_growth_rate),
            ("ebit_margin", self.ebit_margin),
            ("tax_rate", self.tax_rate),
            ("da_percent", self.da_percent),
            ("capex_percent", self.capex_percent),
            ("working_capital_change_percent", self.working_capital_change_percent),
        ]
    }
}

impl Default for ScenarioParameters {
    fn default() -> Self {
        Self::dashboard_default()
    }
}
