//! Historical financial statements

use serde::{Deserialize, Serialize};

use crate::assumptions::ScenarioParameters;
use crate::error::{ModelError, Result};

/// Largest gap between reported FCF and its rebuilt components that is
/// still treated as rounding in the source table
pub const FCF_RECONCILIATION_TOLERANCE: f64 = 0.02;

/// One reported (or estimated) fiscal year. Monetary values are in
/// millions of USD; ratios are percentages of revenue except the tax rate, which
/// applies to EBIT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    /// Fiscal year label, e.g. "2024" or "2025 Est"
    pub year: String,

    pub revenue: f64,
    pub revenue_growth_pct: f64,

    pub ebit: f64,
    pub ebit_margin_pct: f64,

    pub taxes: f64,
    pub tax_rate_pct: f64,
    pub ebiat: f64,

    pub da: f64,
    pub da_pct: f64,

    pub capex: f64,
    pub capex_pct: f64,

    pub wc_change: f64,
    pub wc_pct: f64,

    pub fcf: f64,
}

impl HistoricalRecord {
    /// FCF rebuilt from the reported components
    pub fn implied_fcf(&self) -> f64 {
        self.ebiat + self.da - self.capex - self.wc_change
    }

    /// Difference between reported and rebuilt FCF (rounding in the source)
    pub fn fcf_gap(&self) -> f64 {
        self.fcf - self.implied_fcf()
    }

    /// Whether reported FCF matches its components within rounding
    pub fn reconciles(&self) -> bool {
        self.fcf_gap().abs() <= FCF_RECONCILIATION_TOLERANCE
    }

    /// Leading four-digit year of the label
    pub fn fiscal_year(&self) -> Option<i32> {
        let digits: String = self.year.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.len() == 4 {
            digits.parse().ok()
        } else {
            None
        }
    }

    /// Whether the year is an estimate rather than a reported figure
    pub fn is_estimate(&self) -> bool {
        self.year.to_ascii_lowercase().contains("est")
    }

    /// The year's ratios as projection assumptions, with the given growth
    pub fn as_parameters(&self, revenue_growth_rate: f64) -> ScenarioParameters {
        ScenarioParameters {
            revenue_growth_rate,
            ebit_margin: self.ebit_margin_pct,
            tax_rate: self.tax_rate_pct,
            da_percent: self.da_pct,
            capex_percent: self.capex_pct,
            working_capital_change_percent: self.wc_pct,
        }
    }
}

/// Ordered historical records, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoricalTable {
    records: Vec<HistoricalRecord>,
}

impl HistoricalTable {
    pub fn new(records: Vec<HistoricalRecord>) -> Self {
        Self { records }
    }

    /// Walmart figures (millions of USD) the dashboard ships with
    pub fn default_walmart() -> Self {
        #[rustfmt::skip]
        let rows: [(&str, [f64; 14]); 3] = [
            //        revenue  growth  ebit   margin taxes tax   ebiat  da     da%  capex  capex% wc     wc%   fcf
            ("2023",     [648.13, 6.0, 27.01, 4.2, 5.58, 21.0, 21.43, 11.85, 1.8, 20.61, 3.2, -1.94, -0.3, 14.61]),
            ("2024",     [679.92, 4.9, 29.96, 4.4, 6.53, 22.0, 23.42, 12.72, 1.9, 22.63, 3.3, -3.52, -0.5, 17.03]),
            ("2025 Est", [715.12, 5.2, 32.01, 4.5, 6.91, 22.0, 25.09, 13.39, 1.9, 19.16, 2.7, -2.16, -0.3, 21.49]),
        ];

        let records = rows
            .iter()
            .map(|(year, v)| HistoricalRecord {
                year: year.to_string(),
                revenue: v[0],
                revenue_growth_pct: v[1],
                ebit: v[2],
                ebit_margin_pct: v[3],
                taxes: v[4],
                tax_rate_pct: v[5],
                ebiat: v[6],
                da: v[7],
                da_pct: v[8],
                capex: v[9],
                capex_pct: v[10],
                wc_change: v[11],
                wc_pct: v[12],
                fcf: v[13],
            })
            .collect();

        Self { records }
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent year
    pub fn latest(&self) -> Option<&HistoricalRecord> {
        self.records.last()
    }

    /// Revenue the projection compounds from
    pub fn base_revenue(&self) -> Result<f64> {
        self.latest()
            .map(|r| r.revenue)
            .ok_or_else(|| ModelError::InvalidData("historical table is empty".to_string()))
    }

    /// First fiscal year after the latest record
    pub fn next_fiscal_year(&self) -> Option<i32> {
        self.latest().and_then(|r| r.fiscal_year()).map(|y| y + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_table_reconciles() {
        let table = HistoricalTable::default_walmart();
        assert_eq!(table.len(), 3);

        for record in table.records() {
            assert_abs_diff_eq!(record.fcf, record.implied_fcf(), epsilon = FCF_RECONCILIATION_TOLERANCE);
            assert!(record.reconciles(), "{} does not reconcile", record.year);
        }
    }

    #[test]
    fn test_reconciliation_flags_large_gap() {
        let mut record = HistoricalTable::default_walmart().records()[1].clone();
        record.fcf += 2.0 * FCF_RECONCILIATION_TOLERANCE;
        assert!(!record.reconciles());
    }

    #[test]
    fn test_base_revenue_is_latest() {
        let table = HistoricalTable::default_walmart();
        assert_eq!(table.base_revenue().unwrap(), 715.12);
        assert_eq!(table.next_fiscal_year(), Some(2026));
        assert!(table.latest().unwrap().is_estimate());
    }

    #[test]
    fn test_empty_table() {
        let table = HistoricalTable::default();
        assert!(matches!(table.base_revenue(), Err(ModelError::InvalidData(_))));
        assert_eq!(table.next_fiscal_year(), None);
    }

    #[test]
    fn test_fiscal_year_parsing() {
        let mut record = HistoricalTable::default_walmart().records()[0].clone();
        assert_eq!(record.fiscal_year(), Some(2023));
        record.year = "FY24".to_string();
        assert_eq!(record.fiscal_year(), None);
    }

    #[test]
    fn test_latest_ratios_match_dashboard_default() {
        let latest = HistoricalTable::default_walmart().latest().cloned().unwrap();
        let params = latest.as_parameters(latest.revenue_growth_pct);
        assert_eq!(params, ScenarioParameters::dashboard_default());
    }
}
