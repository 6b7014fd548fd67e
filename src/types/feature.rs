use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Administrative level of a boundary, as reported by the boundary dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JurisdictionType {
    Precinct,
    Township,
    City,
    Village,
    Other(String),
}

impl JurisdictionType {
    /// True when this boundary covers several score records (1:N).
    #[inline]
    pub fn is_aggregate(&self) -> bool {
        matches!(self, JurisdictionType::Township | JurisdictionType::City | JurisdictionType::Village)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JurisdictionType::Precinct => "precinct",
            JurisdictionType::Township => "township",
            JurisdictionType::City => "city",
            JurisdictionType::Village => "village",
            JurisdictionType::Other(raw) => raw,
        }
    }
}

impl FromStr for JurisdictionType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Ok(match lower.as_str() {
            "precinct" | "vtd" => JurisdictionType::Precinct,
            "township" | "charter township" | "charter_township" => JurisdictionType::Township,
            "city" => JurisdictionType::City,
            "village" => JurisdictionType::Village,
            _ => JurisdictionType::Other(s.trim().to_string()),
        })
    }
}

impl fmt::Display for JurisdictionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for JurisdictionType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JurisdictionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let Ok(ty) = raw.parse::<JurisdictionType>();
        Ok(ty)
    }
}

/// A boundary polygon awaiting enrichment.
/// `geometry` is carried as raw GeoJSON and may be null or malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFeature {
    pub name: String,
    pub jurisdiction_type: JurisdictionType,
    #[serde(default)]
    pub geometry: Value,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl BoundaryFeature {
    pub fn new(name: impl Into<String>, jurisdiction_type: JurisdictionType) -> Self {
        Self {
            name: name.into(),
            jurisdiction_type,
            geometry: Value::Null,
            properties: Map::new(),
        }
    }

    pub fn with_geometry(mut self, geometry: Value) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}
