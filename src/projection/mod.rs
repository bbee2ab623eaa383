//! Projection engine for yearly free cash flow series

mod engine;
mod cashflows;

pub use engine::{project, ProjectionEngine};
pub use cashflows::{FcfComponents, ProjectionSeries, ProjectionSummary, YearRecord};
