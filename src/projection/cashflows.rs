//! Projection output structures

use serde::{Deserialize, Serialize};

/// Projected figures for one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    /// Years after the base year (1 = first projected year)
    pub period: u32,

    pub revenue: f64,
    pub ebit: f64,
    pub taxes: f64,
    pub ebiat: f64,
    pub da: f64,
    pub capex: f64,
    pub wc_change: f64,
    pub fcf: f64,
}

impl YearRecord {
    /// Signed contributions to FCF, as stacked in the breakdown chart
    pub fn components(&self) -> FcfComponents {
        FcfComponents {
            period: self.period,
            ebiat: self.ebiat,
            da: self.da,
            capex: -self.capex,
            wc_change: -self.wc_change,
        }
    }
}

/// FCF split into signed parts: EBIAT and D&A add, CAPEX and the
/// working-capital change subtract
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FcfComponents {
    pub period: u32,
    pub ebiat: f64,
    pub da: f64,
    pub capex: f64,
    pub wc_change: f64,
}

impl FcfComponents {
    pub fn total(&self) -> f64 {
        self.ebiat + self.da + self.capex + self.wc_change
    }
}

/// Ordered yearly records. The base year is never included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectionSeries {
    years: Vec<YearRecord>,
}

impl ProjectionSeries {
    pub(crate) fn with_capacity(years: usize) -> Self {
        Self {
            years: Vec::with_capacity(years),
        }
    }

    pub(crate) fn push(&mut self, record: YearRecord) {
        self.years.push(record);
    }

    pub fn years(&self) -> &[YearRecord] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&YearRecord> {
        self.years.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, YearRecord> {
        self.years.iter()
    }

    pub fn revenues(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.revenue).collect()
    }

    pub fn fcf(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.fcf).collect()
    }

    /// Sum of FCF over all years
    pub fn total_fcf(&self) -> f64 {
        self.years.iter().map(|y| y.fcf).sum()
    }

    pub fn components(&self) -> Vec<FcfComponents> {
        self.years.iter().map(YearRecord::components).collect()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let total_revenue: f64 = self.years.iter().map(|y| y.revenue).sum();
        let total_ebiat: f64 = self.years.iter().map(|y| y.ebiat).sum();
        let total_capex: f64 = self.years.iter().map(|y| y.capex).sum();
        let total_fcf = self.total_fcf();

        let average_fcf = if self.years.is_empty() {
            0.0
        } else {
            total_fcf / self.years.len() as f64
        };

        ProjectionSummary {
            total_years: self.years.len() as u32,
            total_revenue,
            total_ebiat,
            total_capex,
            total_fcf,
            average_fcf,
            final_revenue: self.years.last().map(|y| y.revenue).unwrap_or(0.0),
        }
    }
}

impl<'a> IntoIterator for &'a ProjectionSeries {
    type Item = &'a YearRecord;
    type IntoIter = std::slice::Iter<'a, YearRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.years.iter()
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_years: u32,
    pub total_revenue: f64,
    pub total_ebiat: f64,
    pub total_capex: f64,
    pub total_fcf: f64,
    pub average_fcf: f64,
    pub final_revenue: f64,
}
