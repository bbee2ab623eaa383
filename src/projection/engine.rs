//! Core projection engine for yearly free cash flow projections

use log::debug;

use super::cashflows::{ProjectionSeries, YearRecord};
use crate::assumptions::ScenarioParameters;
use crate::error::{ModelError, Result};

/// Projects one parameter bundle forward from a base revenue
#[derive(Debug, Clone, Copy)]
pub struct ProjectionEngine {
    params: ScenarioParameters,
}

impl ProjectionEngine {
    pub fn new(params: ScenarioParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ScenarioParameters {
        &self.params
    }

    /// Run the projection.
    ///
    /// Revenue compounds once per year starting from `base_revenue`, so the
    /// first record is already one growth step past the base year. All other
    /// figures are ratios of that year's revenue.
    pub fn project(&self, base_revenue: f64, years: usize) -> Result<ProjectionSeries> {
        if years < 1 {
            return Err(ModelError::invalid("years", years as f64, "must be at least 1"));
        }
        if !(base_revenue > 0.0) || !base_revenue.is_finite() {
            return Err(ModelError::invalid(
                "base_revenue",
                base_revenue,
                "must be a positive finite number",
            ));
        }
        self.params.validate()?;

        let growth = self.params.growth_factor();
        let mut series = ProjectionSeries::with_capacity(years);
        let mut revenue = base_revenue;

        for period in 1..=years {
            revenue *= growth;
            if !revenue.is_finite() {
                let (field, value) = if period == 1 {
                    ("base_revenue", base_revenue)
                } else {
                    ("revenue_growth_rate", self.params.revenue_growth_rate)
                };
                return Err(ModelError::invalid(field, value, format!("projection overflows in year {}", period)));
            }
            series.push(self.calculate_year(period as u32, revenue)?);
        }

        debug!(
            "projected {} years from base revenue {:.2} at {:.2}% growth: total FCF {:.4}",
            years,
            base_revenue,
            self.params.revenue_growth_rate,
            series.total_fcf()
        );

        Ok(series)
    }

    /// Derive one year's figures from its revenue. Fails if any figure
    /// leaves the finite range, naming the assumption that drove it there.
    fn calculate_year(&self, period: u32, revenue: f64) -> Result<YearRecord> {
        let p = &self.params;

        let ebit = revenue * p.ebit_margin / 100.0;
        let taxes = ebit * p.tax_rate / 100.0;
        let ebiat = ebit - taxes;
        let da = revenue * p.da_percent / 100.0;
        let capex = revenue * p.capex_percent / 100.0;
        let wc_change = revenue * p.working_capital_change_percent / 100.0;
        let fcf = ebiat + da - capex - wc_change;

        let drivers = [
            ("ebit_margin", p.ebit_margin, ebit),
            ("tax_rate", p.tax_rate, taxes),
            ("ebit_margin", p.ebit_margin, ebiat),
            ("da_percent", p.da_percent, da),
            ("capex_percent", p.capex_percent, capex),
            ("working_capital_change_percent", p.working_capital_change_percent, wc_change),
        ];
        if let Some((field, value, _)) = drivers.iter().find(|(_, _, figure)| !figure.is_finite()) {
            return Err(ModelError::invalid(*field, *value, format!("projection overflows in year {}", period)));
        }
        if !fcf.is_finite() {
            // Every component is finite, so the sum overflowed; blame the largest
            let (field, value, _) = drivers
                .iter()
                .max_by(|a, b| a.2.abs().total_cmp(&b.2.abs()))
                .copied()
                .unwrap_or(("ebit_margin", p.ebit_margin, ebit));
            return Err(ModelError::invalid(field, value, format!("projection overflows in year {}", period)));
        }

        Ok(YearRecord {
            period,
            revenue,
            ebit,
            taxes,
            ebiat,
            da,
            capex,
            wc_change,
            fcf,
        })
    }
}

/// Project `years` years of free cash flow from `base_revenue`
pub fn project(base_revenue: f64, years: usize, params: &ScenarioParameters) -> Result<ProjectionSeries> {
    ProjectionEngine::new(*params).project(base_revenue, years)
}
