use std::{fmt, str::FromStr};

use anyhow::{bail, Result};
use serde::{Deserialize, Deserializer, Serialize};

/// Broad family a metric belongs to, used to pick bivariate color schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricCategory {
    Partisan,
    Turnout,
    Opportunity,
    Demographic,
    Count,
}

/// Identity of a classifiable score metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    PartisanLean,
    SwingPotential,
    Turnout,
    GotvPriority,
    PersuasionOpportunity,
    CombinedScore,
    Confidence,
    MedianIncome,
    CollegePct,
    HomeownerPct,
    MinorityPct,
    RegisteredVoters,
    ActiveVoters,
    TotalPopulation,
}

impl Metric {
    pub const ALL: [Metric; 14] = [
        Metric::PartisanLean,
        Metric::SwingPotential,
        Metric::Turnout,
        Metric::GotvPriority,
        Metric::PersuasionOpportunity,
        Metric::CombinedScore,
        Metric::Confidence,
        Metric::MedianIncome,
        Metric::CollegePct,
        Metric::HomeownerPct,
        Metric::MinorityPct,
        Metric::RegisteredVoters,
        Metric::ActiveVoters,
        Metric::TotalPopulation,
    ];

    pub fn category(self) -> MetricCategory {
        match self {
            Metric::PartisanLean | Metric::SwingPotential => MetricCategory::Partisan,
            Metric::Turnout => MetricCategory::Turnout,
            Metric::GotvPriority
            | Metric::PersuasionOpportunity
            | Metric::CombinedScore
            | Metric::Confidence => MetricCategory::Opportunity,
            Metric::MedianIncome
            | Metric::CollegePct
            | Metric::HomeownerPct
            | Metric::MinorityPct => MetricCategory::Demographic,
            Metric::RegisteredVoters
            | Metric::ActiveVoters
            | Metric::TotalPopulation => MetricCategory::Count,
        }
    }

    /// Stable snake_case identifier, matching the serde representation.
    pub fn id(self) -> &'static str {
        match self {
            Metric::PartisanLean => "partisan_lean",
            Metric::SwingPotential => "swing_potential",
            Metric::Turnout => "turnout",
            Metric::GotvPriority => "gotv_priority",
            Metric::PersuasionOpportunity => "persuasion_opportunity",
            Metric::CombinedScore => "combined_score",
            Metric::Confidence => "confidence",
            Metric::MedianIncome => "median_income",
            Metric::CollegePct => "college_pct",
            Metric::HomeownerPct => "homeowner_pct",
            Metric::MinorityPct => "minority_pct",
            Metric::RegisteredVoters => "registered_voters",
            Metric::ActiveVoters => "active_voters",
            Metric::TotalPopulation => "total_population",
        }
    }

    /// Human-readable name for legends and class descriptions.
    pub fn label(self) -> &'static str {
        match self {
            Metric::PartisanLean => "Partisan Lean",
            Metric::SwingPotential => "Swing Potential",
            Metric::Turnout => "Turnout",
            Metric::GotvPriority => "GOTV Priority",
            Metric::PersuasionOpportunity => "Persuasion Opportunity",
            Metric::CombinedScore => "Combined Score",
            Metric::Confidence => "Confidence",
            Metric::MedianIncome => "Median Income",
            Metric::CollegePct => "College Educated",
            Metric::HomeownerPct => "Homeowners",
            Metric::MinorityPct => "Minority Population",
            Metric::RegisteredVoters => "Registered Voters",
            Metric::ActiveVoters => "Active Voters",
            Metric::TotalPopulation => "Total Population",
        }
    }
}

impl FromStr for Metric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        if let Some(metric) = Metric::ALL.iter().copied().find(|m| m.id() == key) {
            return Ok(metric)
        }
        Ok(match key.as_str() {
            "lean" | "partisan" => Metric::PartisanLean,
            "swing" => Metric::SwingPotential,
            "turnout_pct" | "turnout_rate" => Metric::Turnout,
            "gotv" => Metric::GotvPriority,
            "persuasion" => Metric::PersuasionOpportunity,
            "combined" => Metric::CombinedScore,
            "income" => Metric::MedianIncome,
            "population" => Metric::TotalPopulation,
            _ => bail!("Unknown metric identifier '{s}'"),
        })
    }
}

/// Deserializes through `FromStr` so configs accept the same aliases.
impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
