use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

use crate::types::{ClassId, Metric};

/// Fixed per-metric cut points splitting an axis into low / medium / high.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub low: f64,
    pub high: f64,
}

impl Thresholds {
    pub const fn new(low: f64, high: f64) -> Self { Self { low, high } }

    /// 0 below `low`, 1 in `[low, high)`, 2 at or above `high`.
    #[inline]
    pub fn bucket(&self, value: f64) -> usize {
        if value < self.low { 0 } else if value < self.high { 1 } else { 2 }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() {
            bail!("thresholds must be finite (low={}, high={})", self.low, self.high);
        }
        if self.low > self.high {
            bail!("low threshold {} exceeds high threshold {}", self.low, self.high);
        }
        Ok(())
    }
}

/// Level names for the three buckets of an axis.
pub(crate) const LEVELS: [&str; 3] = ["Low", "Medium", "High"];

/// Grid cell `y * 3 + x` of the 3x3 bivariate matrix, or [`ClassId::NO_DATA`]
/// when either value is missing.
pub fn bivariate_class(x: Option<f64>, y: Option<f64>, x_thresholds: &Thresholds, y_thresholds: &Thresholds) -> ClassId {
    let (Some(x), Some(y)) = (x.filter(|v| !v.is_nan()), y.filter(|v| !v.is_nan())) else {
        return ClassId::NO_DATA
    };
    ClassId::new(y_thresholds.bucket(y) * 3 + x_thresholds.bucket(x))
}

/// Per-metric bivariate thresholds. Supporting a new metric means adding a row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    rows: BTreeMap<Metric, Thresholds>,
}

impl ThresholdTable {
    pub fn empty() -> Self { Self { rows: BTreeMap::new() } }

    pub fn insert(&mut self, metric: Metric, thresholds: Thresholds) -> Option<Thresholds> {
        self.rows.insert(metric, thresholds)
    }

    #[inline] pub fn get(&self, metric: Metric) -> Option<&Thresholds> { self.rows.get(&metric) }

    /// Add or replace rows from `other`, keeping every row it does not name.
    pub fn merge(&mut self, other: ThresholdTable) {
        self.rows.extend(other.rows);
    }

    pub fn require(&self, metric: Metric) -> Result<&Thresholds> {
        self.get(metric).ok_or_else(|| anyhow!("No bivariate thresholds registered for metric '{metric}'"))
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.insert(Metric::PartisanLean, Thresholds::new(-10.0, 10.0));
        table.insert(Metric::SwingPotential, Thresholds::new(15.0, 30.0));
        table.insert(Metric::Turnout, Thresholds::new(45.0, 65.0));
        for metric in [Metric::GotvPriority, Metric::PersuasionOpportunity, Metric::CombinedScore, Metric::Confidence] {
            table.insert(metric, Thresholds::new(40.0, 70.0));
        }
        table.insert(Metric::CollegePct, Thresholds::new(25.0, 50.0));
        table.insert(Metric::HomeownerPct, Thresholds::new(50.0, 75.0));
        table.insert(Metric::MinorityPct, Thresholds::new(15.0, 35.0));
        table.insert(Metric::MedianIncome, Thresholds::new(45_000.0, 85_000.0));
        table
    }
}
