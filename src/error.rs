//! Error types for the FCF model

use thiserror::Error;

use crate::scenario::ScenarioResults;

/// Type alias for Result using the model error type.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors raised by the projection engine and the data loaders.
///
/// The engine raises `InvalidParameter` synchronously and never recovers
/// from it; callers decide how to present the failure.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("invalid parameter `{field}` = {value}: {reason}")]
    InvalidParameter {
        field: &'static str,
        value: f64,
        reason: String,
    },

    /// A scenario failed. `completed` holds the scenarios evaluated
    /// successfully before it, in input order.
    #[error("scenario '{label}': {source}")]
    Scenario {
        label: String,
        #[source]
        source: Box<ModelError>,
        completed: ScenarioResults,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn invalid(field: &'static str, value: f64, reason: impl Into<String>) -> Self {
        ModelError::InvalidParameter {
            field,
            value,
            reason: reason.into(),
        }
    }

    /// Name of the offending field if this is (or wraps) an `InvalidParameter`
    pub fn invalid_field(&self) -> Option<&'static str> {
        match self {
            ModelError::InvalidParameter { field, .. } => Some(field),
            ModelError::Scenario { source, .. } => source.invalid_field(),
            _ => None,
        }
    }

    /// Scenario label attached to the error, if any
    pub fn scenario_label(&self) -> Option<&str> {
        match self {
            ModelError::Scenario { label, .. } => Some(label),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let err = ModelError::invalid("years", 0.0, "must be at least 1");
        assert_eq!(err.to_string(), "invalid parameter `years` = 0: must be at least 1");
        assert_eq!(err.invalid_field(), Some("years"));
        assert_eq!(err.scenario_label(), None);
    }

    #[test]
    fn test_scenario_error_wraps_field() {
        let err = ModelError::Scenario {
            label: "optimistic".to_string(),
            source: Box::new(ModelError::invalid("tax_rate", 150.0, "must be within [0, 100]")),
            completed: ScenarioResults::default(),
        };
        assert_eq!(err.invalid_field(), Some("tax_rate"));
        assert_eq!(err.scenario_label(), Some("optimistic"));
        assert!(err.to_string().starts_with("scenario 'optimistic': invalid parameter `tax_rate`"));
    }
}
