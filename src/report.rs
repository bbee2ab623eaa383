//! Tabular views of projection and scenario output, with CSV and JSON writers

use std::io::Write;

use serde::Serialize;

use crate::assumptions::ScenarioParameters;
use crate::error::Result;
use crate::projection::ProjectionSeries;
use crate::scenario::ScenarioResults;

/// One line of the projection table: the year's figures next to the
/// assumption that produced each of them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionRow {
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

/// Label each projected year: `first_fiscal_year` for period 1 when known,
/// otherwise "Y1", "Y2", ... The "Y" form is also used when the fiscal
/// year would overflow.
pub fn year_label(first_fiscal_year: Option<i32>, period: u32) -> String {
    match first_fiscal_year {
        Some(first) => i32::try_from(period)
            .ok()
            .and_then(|p| first.checked_add(p - 1))
            .map(|year| year.to_string())
            .unwrap_or_else(|| format!("Y{}", period)),
        None => format!("Y{}", period),
    }
}

/// Build the projection table
pub fn projection_rows(
    series: &ProjectionSeries,
    params: &ScenarioParameters,
    first_fiscal_year: Option<i32>,
) -> Vec<ProjectionRow> {
    series
        .iter()
        .map(|y| ProjectionRow {
            year: year_label(first_fiscal_year, y.period),
            revenue: y.revenue,
            revenue_growth_pct: params.revenue_growth_rate,
            ebit: y.ebit,
            ebit_margin_pct: params.ebit_margin,
            taxes: y.taxes,
            tax_rate_pct: params.tax_rate,
            ebiat: y.ebiat,
            da: y.da,
            da_pct: params.da_percent,
            capex: y.capex,
            capex_pct: params.capex_percent,
            wc_change: y.wc_change,
            wc_pct: params.working_capital_change_percent,
            fcf: y.fcf,
        })
        .collect()
}

/// Write serializable rows as CSV with a header line
pub fn write_csv<T: Serialize, W: Write>(rows: &[T], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write any serializable value as pretty JSON
pub fn write_json<T: Serialize + ?Sized, W: Write>(value: &T, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Write per-year FCF with one column per scenario.
///
/// Column names are `fcf_<label>`, so the header depends on the set.
pub fn write_comparison_csv<W: Write>(
    results: &ScenarioResults,
    first_fiscal_year: Option<i32>,
    writer: W,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["year".to_string()];
    header.extend(results.labels().map(|l| format!("fcf_{}", l)));
    csv_writer.write_record(&header)?;

    for row in results.comparison() {
        let mut record = vec![year_label(first_fiscal_year, row.period)];
        record.extend(row.fcf.iter().map(|v| v.map(|f| f.to_string()).unwrap_or_default()));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::ScenarioSet;
    use crate::projection::project;
    use crate::scenario::evaluate_scenarios;

    #[test]
    fn test_year_labels() {
        assert_eq!(year_label(Some(2026), 1), "2026");
        assert_eq!(year_label(Some(2026), 5), "2030");
        assert_eq!(year_label(None, 3), "Y3");
    }

    #[test]
    fn test_year_label_overflow_falls_back() {
        assert_eq!(year_label(Some(i32::MAX), 1), i32::MAX.to_string());
        assert_eq!(year_label(Some(i32::MAX), 2), "Y2");
        assert_eq!(year_label(Some(2026), u32::MAX), "Y4294967295");
    }

    #[test]
    fn test_projection_rows_carry_assumptions() {
        let params = ScenarioParameters::dashboard_default();
        let series = project(715.12, 3, &params).unwrap();
        let rows = projection_rows(&series, &params, Some(2026));

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].year, "2028");
        assert!(rows.iter().all(|r| r.tax_rate_pct == 22.0 && r.wc_pct == -0.3));
        assert_eq!(rows[0].fcf, series.years()[0].fcf);
    }

    #[test]
    fn test_projection_csv_header() {
        let params = ScenarioParameters::dashboard_default();
        let series = project(715.12, 2, &params).unwrap();
        let mut out = Vec::new();
        write_csv(&projection_rows(&series, &params, None), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("year,revenue,revenue_growth_pct,ebit,ebit_margin_pct,taxes,tax_rate_pct,ebiat,da,da_pct,capex,capex_pct,wc_change,wc_pct,fcf")
        );
        assert!(lines.next().unwrap().starts_with("Y1,"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_comparison_csv() {
        let results = evaluate_scenarios(715.12, 5, &ScenarioSet::standard()).unwrap();
        let mut out = Vec::new();
        write_comparison_csv(&results, Some(2026), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "year,fcf_pessimistic,fcf_base,fcf_optimistic");
        assert_eq!(lines.len(), 6);
        assert!(lines[5].starts_with("2030,"));
    }

    #[test]
    fn test_summary_json() {
        let results = evaluate_scenarios(715.12, 5, &ScenarioSet::standard()).unwrap();
        let mut out = Vec::new();
        write_json(&results.summary_rows(), &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 3);
        assert_eq!(value[1]["scenario"], "base");
    }
}
