use std::collections::BTreeMap;

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::metric::Metric;

/// Precinct-level analytic scores. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRecord {
    // Continuous metrics (mean when aggregated)
    #[serde(deserialize_with = "lenient_number")]
    pub partisan_lean: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub swing_potential: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub turnout: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub gotv_priority: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub persuasion_opportunity: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub combined_score: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub confidence: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub median_income: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub college_pct: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub homeowner_pct: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub minority_pct: Option<f64>,

    // Extensive counts (sum when aggregated)
    #[serde(deserialize_with = "lenient_count")]
    pub registered_voters: Option<u64>,
    #[serde(deserialize_with = "lenient_count")]
    pub active_voters: Option<u64>,
    #[serde(deserialize_with = "lenient_count")]
    pub total_population: Option<u64>,

    // Categorical (mode when aggregated)
    #[serde(deserialize_with = "lenient_text")]
    pub targeting_strategy: Option<String>,

    // Free text (first non-null when aggregated)
    #[serde(deserialize_with = "lenient_text")]
    pub lean_label: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub turnout_label: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub recommendation: Option<String>,
}

// Score snapshots are hand-exported and messy: a bad field value becomes a
// missing value instead of rejecting the whole snapshot.

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    let number = number.filter(|v| v.is_finite());
    if number.is_none() { debug!("[ScoreRecord] Ignoring non-numeric value {value}") }
    Ok(number)
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let count = match &value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v < u64::MAX as f64)
                .map(|v| v as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    if count.is_none() { debug!("[ScoreRecord] Ignoring invalid count {value}") }
    Ok(count)
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Null => None,
        other => {
            debug!("[ScoreRecord] Ignoring non-text value {other}");
            None
        }
    })
}

impl ScoreRecord {
    /// Value of `metric`, with non-finite numbers reported as missing.
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        let value = match metric {
            Metric::PartisanLean => self.partisan_lean,
            Metric::SwingPotential => self.swing_potential,
            Metric::Turnout => self.turnout,
            Metric::GotvPriority => self.gotv_priority,
            Metric::PersuasionOpportunity => self.persuasion_opportunity,
            Metric::CombinedScore => self.combined_score,
            Metric::Confidence => self.confidence,
            Metric::MedianIncome => self.median_income,
            Metric::CollegePct => self.college_pct,
            Metric::HomeownerPct => self.homeowner_pct,
            Metric::MinorityPct => self.minority_pct,
            Metric::RegisteredVoters => self.registered_voters.map(|v| v as f64),
            Metric::ActiveVoters => self.active_voters.map(|v| v as f64),
            Metric::TotalPopulation => self.total_population.map(|v| v as f64),
        };
        value.filter(|v| v.is_finite())
    }
}

/// Key -> record mapping for one dataset snapshot.
/// Keys are kept sorted so order-dependent lookups are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreIndex {
    records: BTreeMap<String, ScoreRecord>,
}

impl ScoreIndex {
    pub fn new() -> Self { Self::default() }

    /// Parse a JSON object of `{ "<precinct name>": { ...scores } }`.
    pub fn from_json(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone())
            .context("[ScoreIndex::from_json] Expected an object of score records keyed by precinct name")
    }

    pub fn insert(&mut self, key: impl Into<String>, record: ScoreRecord) -> Option<ScoreRecord> {
        self.records.insert(key.into(), record)
    }

    #[inline] pub fn get(&self, key: &str) -> Option<&ScoreRecord> { self.records.get(key) }

    #[inline] pub fn contains_key(&self, key: &str) -> bool { self.records.contains_key(key) }

    #[inline] pub fn len(&self) -> usize { self.records.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScoreRecord)> + '_ {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, ScoreRecord)> for ScoreIndex {
    fn from_iter<I: IntoIterator<Item = (K, ScoreRecord)>>(iter: I) -> Self {
        Self { records: iter.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_deserialize_as_none() {
        let record: ScoreRecord = serde_json::from_value(json!({ "turnout": 52.5 })).unwrap();
        assert_eq!(record.turnout, Some(52.5));
        assert_eq!(record.partisan_lean, None);
        assert_eq!(record.registered_voters, None);
    }

    #[test]
    fn non_finite_metrics_are_missing() {
        let record = ScoreRecord { gotv_priority: Some(f64::NAN), ..Default::default() };
        assert_eq!(record.metric(Metric::GotvPriority), None);
    }

    #[test]
    fn counts_are_exposed_as_floats() {
        let record = ScoreRecord { registered_voters: Some(1200), ..Default::default() };
        assert_eq!(record.metric(Metric::RegisteredVoters), Some(1200.0));
    }

    #[test]
    fn index_from_json_keeps_keys_sorted() {
        let index = ScoreIndex::from_json(&json!({
            "Mason Precinct 1": { "turnout": 60.0 },
            "Alaiedon Township Precinct 1": { "turnout": 55.0 },
        })).unwrap();
        let keys: Vec<&str> = index.keys().collect();
        assert_eq!(keys, vec!["Alaiedon Township Precinct 1", "Mason Precinct 1"]);
    }

    #[test]
    fn bad_field_values_become_missing() {
        let index = ScoreIndex::from_json(&json!({
            "Mason Precinct 1": { "registered_voters": 1234.0, "active_voters": -5, "total_population": "N/A" },
            "Mason Precinct 2": { "registered_voters": 10.5, "turnout": "61.5", "partisan_lean": "n/a", "recommendation": 7 },
            "Mason Precinct 3": { "registered_voters": "900", "active_voters": [1] },
        })).unwrap();

        let first = index.get("Mason Precinct 1").unwrap();
        assert_eq!(first.registered_voters, Some(1234));
        assert_eq!(first.active_voters, None);
        assert_eq!(first.total_population, None);

        let second = index.get("Mason Precinct 2").unwrap();
        assert_eq!(second.registered_voters, None);
        assert_eq!(second.turnout, Some(61.5));
        assert_eq!(second.partisan_lean, None);
        assert_eq!(second.recommendation, None);

        let third = index.get("Mason Precinct 3").unwrap();
        assert_eq!(third.registered_voters, Some(900));
        assert_eq!(third.active_voters, None);
    }

    #[test]
    fn index_from_json_rejects_arrays() {
        assert!(ScoreIndex::from_json(&json!([1, 2, 3])).is_err());
    }
}
