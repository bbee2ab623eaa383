//! Load historical statements from CSV

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::Reader;
use log::{info, warn};

use super::{HistoricalRecord, HistoricalTable};
use crate::error::{ModelError, Result};

/// Load a historical table from a CSV file
pub fn load_history<P: AsRef<Path>>(path: P) -> Result<HistoricalTable> {
    let path = path.as_ref();
    let table = load_history_from_reader(File::open(path)?)?;
    info!("Loaded {} historical years from {}", table.len(), path.display());
    Ok(table)
}

/// Load a historical table from any reader (e.g., string buffer)
pub fn load_history_from_reader<R: Read>(reader: R) -> Result<HistoricalTable> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: HistoricalRecord = result?;
        if !(record.revenue > 0.0) {
            return Err(ModelError::InvalidData(format!(
                "year {}: revenue must be positive, got {}",
                record.year, record.revenue
            )));
        }
        if !record.reconciles() {
            warn!(
                "year {}: reported FCF {:.2} differs from components {:.2}",
                record.year,
                record.fcf,
                record.implied_fcf()
            );
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(ModelError::InvalidData("historical file contains no rows".to_string()));
    }

    Ok(HistoricalTable::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "year,revenue,revenue_growth_pct,ebit,ebit_margin_pct,taxes,tax_rate_pct,ebiat,da,da_pct,capex,capex_pct,wc_change,wc_pct,fcf";

    #[test]
    fn test_load_from_reader() {
        let csv = format!(
            "{}\n2024,679.92,4.9,29.96,4.4,6.53,22,23.42,12.72,1.9,22.63,3.3,-3.52,-0.5,17.03\n2025 Est,715.12,5.2,32.01,4.5,6.91,22,25.09,13.39,1.9,19.16,2.7,-2.16,-0.3,21.49\n",
            HEADER
        );
        let table = load_history_from_reader(csv.as_bytes()).expect("valid history");
        assert_eq!(table.len(), 2);
        assert_eq!(table.base_revenue().unwrap(), 715.12);
        assert_eq!(table.latest().unwrap().year, "2025 Est");
    }

    #[test]
    fn test_bundled_file_matches_builtin() {
        let csv = include_str!("../../data/historical.csv");
        let table = load_history_from_reader(csv.as_bytes()).expect("bundled history");
        assert_eq!(table, HistoricalTable::default_walmart());
    }

    #[test]
    fn test_unreconciled_year_still_loads() {
        let csv = format!("{}\n2024,679.92,4.9,29.96,4.4,6.53,22,23.42,12.72,1.9,22.63,3.3,-3.52,-0.5,18.03\n", HEADER);
        let table = load_history_from_reader(csv.as_bytes()).expect("gap is only logged");
        assert!(!table.records()[0].reconciles());
    }

    #[test]
    fn test_empty_file_rejected() {
        let err = load_history_from_reader(HEADER.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidData(_)));
    }

    #[test]
    fn test_non_positive_revenue_rejected() {
        let csv = format!("{}\n2024,0,0,0,0,0,0,0,0,0,0,0,0,0,0\n", HEADER);
        let err = load_history_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelError::InvalidData(ref msg) if msg.contains("2024")));
    }
}
