//! Projection assumptions: parameter bundles, named scenario sets and the
//! dashboard slider ranges

mod params;
mod ranges;
pub mod loader;

pub use params::ScenarioParameters;
pub use ranges::{DashboardRanges, ParameterRange, RangeViolation};
pub use loader::{load_scenarios, load_scenarios_from_reader, DEFAULT_DATA_PATH};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Label of the downside scenario
pub const PESSIMISTIC: &str = "pessimistic";
/// Label of the central scenario
pub const BASE: &str = "base";
/// Label of the upside scenario
pub const OPTIMISTIC: &str = "optimistic";

/// A labelled parameter bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedScenario {
    pub label: String,
    #[serde(flatten)]
    pub params: ScenarioParameters,
}

/// Insertion-ordered mapping from scenario label to parameters.
///
/// Each scenario owns a complete bundle; nothing is shared between entries.
/// Deserialization rejects empty and duplicate labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NamedScenario>", into = "Vec<NamedScenario>")]
pub struct ScenarioSet {
    entries: Vec<NamedScenario>,
}

impl ScenarioSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three scenarios of the comparison tab.
    ///
    /// Only growth, margin and CAPEX differ; tax, D&A and working capital are
    /// set explicitly on each scenario to the dashboard defaults.
    pub fn standard() -> Self {
        let defaults = ScenarioParameters::dashboard_default();
        let scenario = |growth, ebit_margin, capex| ScenarioParameters {
            revenue_growth_rate: growth,
            ebit_margin,
            capex_percent: capex,
            ..defaults
        };

        let mut set = Self::new();
        set.insert(PESSIMISTIC, scenario(3.0, 3.5, 3.5));
        set.insert(BASE, scenario(5.0, 4.5, 2.7));
        set.insert(OPTIMISTIC, scenario(6.5, 5.5, 2.0));
        set
    }

    /// Add a scenario. Re-using a label replaces its parameters but keeps
    /// its original position.
    pub fn insert(&mut self, label: impl Into<String>, params: ScenarioParameters) {
        let label = label.into();
        match self.entries.iter_mut().find(|e| e.label == label) {
            Some(existing) => existing.params = params,
            None => self.entries.push(NamedScenario { label, params }),
        }
    }

    pub fn get(&self, label: &str) -> Option<&ScenarioParameters> {
        self.entries.iter().find(|e| e.label == label).map(|e| &e.params)
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut ScenarioParameters> {
        self.entries.iter_mut().find(|e| e.label == label).map(|e| &mut e.params)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScenarioParameters)> {
        self.entries.iter().map(|e| (e.label.as_str(), &e.params))
    }

    pub fn entries(&self) -> &[NamedScenario] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<NamedScenario>> for ScenarioSet {
    type Error = ModelError;

    /// Build a set from a list, requiring unique non-empty labels
    fn try_from(named: Vec<NamedScenario>) -> Result<Self, Self::Error> {
        let mut set = Self::new();
        for scenario in named {
            if scenario.label.trim().is_empty() {
                return Err(ModelError::InvalidData("scenario label must not be empty".to_string()));
            }
            if set.contains(&scenario.label) {
                return Err(ModelError::InvalidData(format!(
                    "duplicate scenario label '{}'",
                    scenario.label
                )));
            }
            set.entries.push(scenario);
        }
        Ok(set)
    }
}

impl From<ScenarioSet> for Vec<NamedScenario> {
    fn from(set: ScenarioSet) -> Self {
        set.entries
    }
}

impl<S: Into<String>> FromIterator<(S, ScenarioParameters)> for ScenarioSet {
    fn from_iter<I: IntoIterator<Item = (S, ScenarioParameters)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (label, params) in iter {
            set.insert(label, params);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set_order_and_values() {
        let set = ScenarioSet::standard();
        let labels: Vec<_> = set.labels().collect();
        assert_eq!(labels, vec![PESSIMISTIC, BASE, OPTIMISTIC]);

        let pessimistic = set.get(PESSIMISTIC).unwrap();
        assert_eq!(pessimistic.revenue_growth_rate, 3.0);
        assert_eq!(pessimistic.ebit_margin, 3.5);
        assert_eq!(pessimistic.capex_percent, 3.5);
        assert_eq!(pessimistic.tax_rate, 22.0);
        assert_eq!(pessimistic.working_capital_change_percent, -0.3);

        let optimistic = set.get(OPTIMISTIC).unwrap();
        assert_eq!(optimistic.revenue_growth_rate, 6.5);
        assert_eq!(optimistic.capex_percent, 2.0);
    }

    #[test]
    fn test_insert_existing_label_keeps_position() {
        let mut set = ScenarioSet::standard();
        let updated = ScenarioParameters::dashboard_default().with_growth(9.0);
        set.insert(PESSIMISTIC, updated);

        assert_eq!(set.len(), 3);
        assert_eq!(set.labels().next(), Some(PESSIMISTIC));
        assert_eq!(set.get(PESSIMISTIC), Some(&updated));
    }

    #[test]
    fn test_scenarios_do_not_share_parameters() {
        let mut set = ScenarioSet::standard();
        set.get_mut(BASE).unwrap().tax_rate = 35.0;

        assert_eq!(set.get(BASE).unwrap().tax_rate, 35.0);
        assert_eq!(set.get(PESSIMISTIC).unwrap().tax_rate, 22.0);
        assert_eq!(set.get(OPTIMISTIC).unwrap().tax_rate, 22.0);
    }

    #[test]
    fn test_deserialize_rejects_duplicate_labels() {
        let json = r#"[
            {"label": "base", "revenue_growth_rate": 5.0, "ebit_margin": 4.5, "tax_rate": 22.0,
             "da_percent": 1.9, "capex_percent": 2.7, "working_capital_change_percent": -0.3},
            {"label": "base", "revenue_growth_rate": 9.0, "ebit_margin": 4.5, "tax_rate": 22.0,
             "da_percent": 1.9, "capex_percent": 2.7, "working_capital_change_percent": -0.3}
        ]"#;
        let err = serde_json::from_str::<ScenarioSet>(json).unwrap_err();
        assert!(err.to_string().contains("duplicate scenario label 'base'"));
    }

    #[test]
    fn test_deserialize_rejects_empty_label() {
        let json = r#"[{"label": " ", "revenue_growth_rate": 5.0, "ebit_margin": 4.5, "tax_rate": 22.0,
             "da_percent": 1.9, "capex_percent": 2.7, "working_capital_change_percent": -0.3}]"#;
        let err = serde_json::from_str::<ScenarioSet>(json).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let set = ScenarioSet::standard();
        let json = serde_json::to_string(&set).unwrap();
        let back: ScenarioSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }

    #[test]
    fn test_json_shape() {
        let set: ScenarioSet = vec![("bull", ScenarioParameters::dashboard_default())]
            .into_iter()
            .collect();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json[0]["label"], "bull");
        assert_eq!(json[0]["tax_rate"], 22.0);
    }
}
