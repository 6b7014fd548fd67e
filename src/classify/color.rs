//! Discrete color ramps for single-metric thematic maps.

use std::{collections::BTreeMap, fmt};

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{ClassId, Metric};
use super::breaks::univariate_class;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Fill for features without data.
pub const NO_DATA_COLOR: Rgb = Rgb::new(204, 204, 204);

/// `0xrrggbb` literal to color.
const fn rgb(hex: u32) -> Rgb {
    Rgb::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        let bytes = hex::decode(digits).with_context(|| format!("Invalid hex color '{s}'"))?;
        match bytes.as_slice() {
            &[r, g, b] => Ok(Self::new(r, g, b)),
            _ => bail!("Invalid hex color '{s}': expected 6 hex digits"),
        }
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Rgb::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

/// Whether a ramp runs one way or diverges from a neutral center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RampKind {
    Sequential,
    Diverging { center: f64 },
}

/// One step of a ramp: values from `threshold` up to the next step take `color`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RampStep {
    pub threshold: f64,
    pub color: Rgb,
    pub label: String,
}

/// Ordered list of (threshold, color) steps closed by an upper bound.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorRamp {
    pub kind: RampKind,
    pub steps: Vec<RampStep>,
    pub upper: f64,
}

impl ColorRamp {
    /// Break values: every step threshold, then the upper bound.
    pub fn breaks(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.threshold).chain(std::iter::once(self.upper)).collect()
    }

    #[inline]
    pub fn classify(&self, value: Option<f64>) -> ClassId {
        univariate_class(value, &self.breaks())
    }

    pub fn step(&self, class: ClassId) -> Option<&RampStep> {
        class.index().and_then(|i| self.steps.get(i))
    }

    /// Class holding the center of a diverging ramp.
    pub fn neutral_class(&self) -> Option<ClassId> {
        match self.kind {
            RampKind::Sequential => None,
            RampKind::Diverging { center } => Some(self.classify(Some(center))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.steps.first() else { bail!("ramp has no steps") };
        let breaks = self.breaks();
        if breaks.iter().any(|b| !b.is_finite()) {
            bail!("ramp breaks must be finite");
        }
        if breaks.windows(2).any(|w| w[0] > w[1]) || self.steps.windows(2).any(|w| w[0].threshold >= w[1].threshold) {
            bail!("ramp thresholds must be strictly ascending and end at or below the upper bound");
        }
        if let RampKind::Diverging { center } = self.kind {
            if !(first.threshold..=self.upper).contains(&center) {
                bail!("diverging center {center} lies outside [{}, {}]", first.threshold, self.upper);
            }
        }
        Ok(())
    }

    fn from_stops(kind: RampKind, upper: f64, stops: &[(f64, Rgb, &str)]) -> Self {
        let steps = stops.iter()
            .map(|&(threshold, color, label)| RampStep { threshold, color, label: label.to_string() })
            .collect();
        Self { kind, steps, upper }
    }
}

/// Per-metric color ramps. Supporting a new metric means adding a row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RampTable {
    ramps: BTreeMap<Metric, ColorRamp>,
}

impl RampTable {
    pub fn empty() -> Self { Self { ramps: BTreeMap::new() } }

    pub fn insert(&mut self, metric: Metric, ramp: ColorRamp) -> Option<ColorRamp> {
        self.ramps.insert(metric, ramp)
    }

    #[inline] pub fn get(&self, metric: Metric) -> Option<&ColorRamp> { self.ramps.get(&metric) }

    /// Add or replace ramps from `other`, keeping every ramp it does not name.
    pub fn merge(&mut self, other: RampTable) {
        self.ramps.extend(other.ramps);
    }

    pub fn require(&self, metric: Metric) -> Result<&ColorRamp> {
        self.get(metric).ok_or_else(|| anyhow!("No color ramp registered for metric '{metric}'"))
    }

    fn builtin() -> Self {
        use RampKind::*;

        const OPPORTUNITY: &[(f64, Rgb, &str)] = &[
            (0.0,  rgb(0xf7fbff), "Very Low"),
            (20.0, rgb(0xc6dbef), "Low"),
            (40.0, rgb(0x6baed6), "Moderate"),
            (60.0, rgb(0x2171b5), "High"),
            (80.0, rgb(0x08306b), "Very High"),
        ];
        const PERCENT: &[(f64, Rgb, &str)] = &[
            (0.0,  rgb(0xfff5eb), "0-20%"),
            (20.0, rgb(0xfdd0a2), "20-40%"),
            (40.0, rgb(0xfd8d3c), "40-60%"),
            (60.0, rgb(0xd94801), "60-80%"),
            (80.0, rgb(0x7f2704), "80-100%"),
        ];

        let mut table = Self::empty();
        table.insert(Metric::PartisanLean, ColorRamp::from_stops(Diverging { center: 0.0 }, 100.0, &[
            (-100.0, rgb(0xb2182b), "Strong R"),
            (-20.0,  rgb(0xef8a62), "Lean R"),
            (-5.0,   rgb(0xf7f7f7), "Tossup"),
            (5.0,    rgb(0x67a9cf), "Lean D"),
            (20.0,   rgb(0x2166ac), "Strong D"),
        ]));
        table.insert(Metric::SwingPotential, ColorRamp::from_stops(Sequential, 100.0, &[
            (0.0,  rgb(0xf2f0f7), "Stable"),
            (15.0, rgb(0xcbc9e2), "Low Swing"),
            (30.0, rgb(0x9e9ac8), "Moderate Swing"),
            (50.0, rgb(0x6a51a3), "High Swing"),
        ]));
        table.insert(Metric::Turnout, ColorRamp::from_stops(Sequential, 100.0, &[
            (0.0,  rgb(0xfee5d9), "Very Low"),
            (35.0, rgb(0xfcae91), "Low"),
            (45.0, rgb(0xfb6a4a), "Average"),
            (55.0, rgb(0xde2d26), "High"),
            (65.0, rgb(0xa50f15), "Very High"),
        ]));
        for metric in [Metric::GotvPriority, Metric::PersuasionOpportunity, Metric::CombinedScore, Metric::Confidence] {
            table.insert(metric, ColorRamp::from_stops(Sequential, 100.0, OPPORTUNITY));
        }
        for metric in [Metric::CollegePct, Metric::HomeownerPct, Metric::MinorityPct] {
            table.insert(metric, ColorRamp::from_stops(Sequential, 100.0, PERCENT));
        }
        table.insert(Metric::MedianIncome, ColorRamp::from_stops(Sequential, 250_000.0, &[
            (0.0,      rgb(0xedf8e9), "Under $35k"),
            (35_000.0, rgb(0xbae4b3), "$35k-$55k"),
            (55_000.0, rgb(0x74c476), "$55k-$75k"),
            (75_000.0, rgb(0x31a354), "$75k-$100k"),
            (100_000.0, rgb(0x006d2c), "Over $100k"),
        ]));
        for metric in [Metric::RegisteredVoters, Metric::ActiveVoters, Metric::TotalPopulation] {
            table.insert(metric, ColorRamp::from_stops(Sequential, 10_000.0, &[
                (0.0,    rgb(0xf7f4f9), "Under 500"),
                (500.0,  rgb(0xd4b9da), "500-1,500"),
                (1500.0, rgb(0xc994c7), "1,500-3,000"),
                (3000.0, rgb(0xdf65b0), "3,000-5,000"),
                (5000.0, rgb(0x980043), "Over 5,000"),
            ]));
        }
        table
    }
}

impl Default for RampTable {
    fn default() -> Self { Self::builtin() }
}

/// Discrete color for `value` on `metric`'s ramp; gray when the value is missing
/// or the metric has no ramp.
pub fn color_select_for(ramps: &RampTable, metric: Metric, value: Option<f64>) -> Rgb {
    ramps.get(metric)
        .and_then(|ramp| ramp.step(ramp.classify(value)))
        .map_or(NO_DATA_COLOR, |step| step.color)
}
