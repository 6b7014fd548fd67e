use std::fmt;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{classify::{RampTable, ThresholdTable}, types::Metric};

fn default_min_alpha() -> f64 { 0.2 }
fn default_max_alpha() -> f64 { 1.0 }
fn default_min_size() -> f64 { 4.0 }
fn default_max_size() -> f64 { 40.0 }

/// One classification to compute for every feature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ClassificationRequest {
    /// Single-metric thematic color.
    Univariate { metric: Metric },
    /// Two metrics on a 3x3 matrix.
    Bivariate { x: Metric, y: Metric },
    /// Color from `value`, opacity from the 0-100 `alpha` metric.
    ValueByAlpha {
        value: Metric,
        alpha: Metric,
        #[serde(default = "default_min_alpha")]
        min_alpha: f64,
        #[serde(default = "default_max_alpha")]
        max_alpha: f64,
        #[serde(default)]
        invert: bool,
    },
    /// Symbol sized by `size` and colored by `color`. Without a `domain`,
    /// the size domain is taken from the batch.
    ProportionalSize {
        size: Metric,
        color: Metric,
        #[serde(default = "default_min_size")]
        min_size: f64,
        #[serde(default = "default_max_size")]
        max_size: f64,
        #[serde(default)]
        domain: Option<[f64; 2]>,
    },
}

impl ClassificationRequest {
    pub fn univariate(metric: Metric) -> Self {
        Self::Univariate { metric }
    }

    pub fn bivariate(x: Metric, y: Metric) -> Self {
        Self::Bivariate { x, y }
    }

    pub fn value_by_alpha(value: Metric, alpha: Metric) -> Self {
        Self::ValueByAlpha { value, alpha, min_alpha: default_min_alpha(), max_alpha: default_max_alpha(), invert: false }
    }

    pub fn proportional_size(size: Metric, color: Metric) -> Self {
        Self::ProportionalSize { size, color, min_size: default_min_size(), max_size: default_max_size(), domain: None }
    }

    /// Metrics this request reads.
    pub fn metrics(&self) -> Vec<Metric> {
        match *self {
            Self::Univariate { metric } => vec![metric],
            Self::Bivariate { x, y } => vec![x, y],
            Self::ValueByAlpha { value, alpha, .. } => vec![value, alpha],
            Self::ProportionalSize { size, color, .. } => vec![size, color],
        }
    }

    fn validate(&self, config: &EnrichConfig) -> Result<()> {
        match self {
            Self::Univariate { metric } => {
                config.ramps.require(*metric)?.validate()?;
            }
            Self::Bivariate { x, y } => {
                config.thresholds.require(*x)?.validate()?;
                config.thresholds.require(*y)?.validate()?;
            }
            Self::ValueByAlpha { value, min_alpha, max_alpha, .. } => {
                config.ramps.require(*value)?.validate()?;
                if !(0.0..=1.0).contains(min_alpha) || !(0.0..=1.0).contains(max_alpha) {
                    bail!("alpha bounds must lie in [0, 1] (got {min_alpha}..{max_alpha})");
                }
                if min_alpha > max_alpha {
                    bail!("min_alpha {min_alpha} exceeds max_alpha {max_alpha}; use `invert` to flip the mapping");
                }
            }
            Self::ProportionalSize { color, min_size, max_size, domain, .. } => {
                config.ramps.require(*color)?.validate()?;
                if !min_size.is_finite() || !max_size.is_finite() || *min_size < 0.0 {
                    bail!("symbol sizes must be finite and non-negative (got {min_size}..{max_size})");
                }
                if min_size > max_size {
                    bail!("min_size {min_size} exceeds max_size {max_size}");
                }
                if let Some([lo, hi]) = domain {
                    if !lo.is_finite() || !hi.is_finite() || lo > hi {
                        bail!("size domain [{lo}, {hi}] must be finite and ascending");
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for ClassificationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Univariate { metric } => write!(f, "Univariate(metric='{metric}')"),
            Self::Bivariate { x, y } => write!(f, "Bivariate(x='{x}', y='{y}')"),
            Self::ValueByAlpha { value, alpha, invert, .. } =>
                write!(f, "ValueByAlpha(value='{value}', alpha='{alpha}', invert={invert})"),
            Self::ProportionalSize { size, color, .. } =>
                write!(f, "ProportionalSize(size='{size}', color='{color}')"),
        }
    }
}

/// GeoJSON property names carrying the boundary name and jurisdiction type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    pub name: String,
    pub jurisdiction_type: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self { name: "name".to_string(), jurisdiction_type: "jurisdiction_type".to_string() }
    }
}

/// Per-call enrichment settings.
///
/// `thresholds` and `ramps` given in JSON are laid over the built-in tables:
/// a row for a metric replaces that metric's row, and every other built-in row
/// stays. Build the struct directly to start from an empty table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    pub classifications: Vec<ClassificationRequest>,
    #[serde(deserialize_with = "thresholds_over_builtin")]
    pub thresholds: ThresholdTable,
    #[serde(deserialize_with = "ramps_over_builtin")]
    pub ramps: RampTable,
    pub fields: FieldNames,
}

fn thresholds_over_builtin<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<ThresholdTable, D::Error> {
    let mut table = ThresholdTable::default();
    table.merge(ThresholdTable::deserialize(deserializer)?);
    Ok(table)
}

fn ramps_over_builtin<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<RampTable, D::Error> {
    let mut table = RampTable::default();
    table.merge(RampTable::deserialize(deserializer)?);
    Ok(table)
}

impl EnrichConfig {
    /// Config with the built-in tables and a single request.
    pub fn new(request: ClassificationRequest) -> Self {
        Self { classifications: vec![request], ..Default::default() }
    }

    pub fn with(mut self, request: ClassificationRequest) -> Self {
        self.classifications.push(request);
        self
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).context("[EnrichConfig::from_json] Invalid enrichment config")
    }

    /// Every metric named by any request, sorted and deduplicated.
    pub fn metrics(&self) -> Vec<Metric> {
        let mut metrics: Vec<Metric> = self.classifications.iter().flat_map(|r| r.metrics()).collect();
        metrics.sort();
        metrics.dedup();
        metrics
    }

    /// Check that every request can be served by the configured tables.
    pub fn validate(&self) -> Result<()> {
        if self.classifications.is_empty() {
            bail!("No classifications requested");
        }
        for (i, request) in self.classifications.iter().enumerate() {
            request.validate(self).with_context(|| format!("Invalid classification #{i}: {request}"))?;
        }
        Ok(())
    }
}
