//! Load scenario sets from CSV or JSON files
//!
//! CSV columns: label, revenue_growth_rate, ebit_margin, tax_rate,
//! da_percent, capex_percent, working_capital_change_percent.
//! JSON: an array of objects with the same keys.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::Reader;
use log::{debug, info};

use super::{NamedScenario, ScenarioParameters, ScenarioSet};
use crate::error::{ModelError, Result};

/// Default directory holding `historical.csv` and `scenarios.csv`
pub const DEFAULT_DATA_PATH: &str = "data";

/// Raw CSV row for one scenario
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    label: String,
    revenue_growth_rate: f64,
    ebit_margin: f64,
    tax_rate: f64,
    da_percent: f64,
    capex_percent: f64,
    working_capital_change_percent: f64,
}

impl CsvRow {
    fn into_named(self) -> NamedScenario {
        NamedScenario {
            label: self.label.trim().to_string(),
            params: ScenarioParameters {
                revenue_growth_rate: self.revenue_growth_rate,
                ebit_margin: self.ebit_margin,
                tax_rate: self.tax_rate,
                da_percent: self.da_percent,
                capex_percent: self.capex_percent,
                working_capital_change_percent: self.working_capital_change_percent,
            },
        }
    }
}

/// Load a scenario set, choosing the format from the file extension
/// (`.json` for JSON, anything else is read as CSV)
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<ScenarioSet> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let set = if is_json {
        load_scenarios_from_json(BufReader::new(file))?
    } else {
        load_scenarios_from_reader(file)?
    };

    info!("Loaded {} scenarios from {}", set.len(), path.display());
    Ok(set)
}

/// Load scenarios from CSV on any reader (e.g., string buffer)
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<ScenarioSet> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut named = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        named.push(row.into_named());
    }

    build_set(named)
}

/// Load scenarios from a JSON array
pub fn load_scenarios_from_json<R: Read>(reader: R) -> Result<ScenarioSet> {
    let named: Vec<NamedScenario> = serde_json::from_reader(reader)?;
    build_set(named)
}

fn build_set(named: Vec<NamedScenario>) -> Result<ScenarioSet> {
    if named.is_empty() {
        return Err(ModelError::InvalidData("scenario file contains no scenarios".to_string()));
    }

    for scenario in &named {
        debug!("scenario '{}': {:?}", scenario.label, scenario.params);
    }
    ScenarioSet::try_from(named)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
label,revenue_growth_rate,ebit_margin,tax_rate,da_percent,capex_percent,working_capital_change_percent
downside,2.0,3.0,25.0,1.8,3.8,0.5
central,5.0,4.5,22.0,1.9,2.7,-0.3
";

    #[test]
    fn test_load_csv_preserves_order() {
        let set = load_scenarios_from_reader(CSV.as_bytes()).expect("valid csv");
        let labels: Vec<_> = set.labels().collect();
        assert_eq!(labels, vec!["downside", "central"]);

        let downside = set.get("downside").unwrap();
        assert_eq!(downside.tax_rate, 25.0);
        assert_eq!(downside.working_capital_change_percent, 0.5);
    }

    #[test]
    fn test_load_json() {
        let json = r#"[
            {"label": "base", "revenue_growth_rate": 5.0, "ebit_margin": 4.5, "tax_rate": 22.0,
             "da_percent": 1.9, "capex_percent": 2.7, "working_capital_change_percent": -0.3}
        ]"#;
        let set = load_scenarios_from_json(json.as_bytes()).expect("valid json");
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("base").unwrap().capex_percent, 2.7);
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let csv = format!("{}central,1.0,1.0,1.0,1.0,1.0,1.0\n", CSV);
        let err = load_scenarios_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidData(ref msg) if msg.contains("central")));
    }

    #[test]
    fn test_empty_file_rejected() {
        let header = CSV.lines().next().unwrap();
        let err = load_scenarios_from_reader(header.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidData(_)));
    }

    #[test]
    fn test_malformed_number_is_csv_error() {
        let csv = "label,revenue_growth_rate,ebit_margin,tax_rate,da_percent,capex_percent,working_capital_change_percent\nx,abc,1,1,1,1,1\n";
        let err = load_scenarios_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::Csv(_)));
    }
}
