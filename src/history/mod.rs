//! Historical financial statements supplying the projection's starting point

mod data;
pub mod loader;

pub use data::{HistoricalRecord, HistoricalTable, FCF_RECONCILIATION_TOLERANCE};
pub use loader::{load_history, load_history_from_reader};
