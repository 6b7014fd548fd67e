use anyhow::{anyhow, Context, Result};
use serde_json::{json, Map, Value};

use crate::{
    enrich::{EnrichedFeature, FieldNames},
    types::{BoundaryFeature, JurisdictionType},
};

/// Read boundary features from a GeoJSON FeatureCollection.
///
/// Every entry of `features` yields exactly one boundary, even when its
/// properties or geometry are missing: a missing name becomes the empty string
/// (and will not resolve) and a missing jurisdiction type is read as a precinct.
pub fn features_from_geojson(collection: &Value, fields: &FieldNames) -> Result<Vec<BoundaryFeature>> {
    if collection["type"].as_str() != Some("FeatureCollection") {
        return Err(anyhow!("[features_from_geojson] Expected a GeoJSON FeatureCollection"));
    }
    let features = collection["features"].as_array()
        .context("[features_from_geojson] FeatureCollection has no features array")?;

    Ok(features.iter().map(|feature| {
        let properties = feature["properties"].as_object().cloned().unwrap_or_default();
        let name = properties.get(&fields.name)
            .map(|v| match v {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .unwrap_or_default();
        let jurisdiction_type = properties.get(&fields.jurisdiction_type)
            .and_then(Value::as_str)
            .map_or(JurisdictionType::Precinct, |raw| {
                let Ok(ty) = raw.parse::<JurisdictionType>();
                ty
            });

        BoundaryFeature {
            name,
            jurisdiction_type,
            geometry: feature.get("geometry").cloned().unwrap_or(Value::Null),
            properties,
        }
    }).collect())
}

/// Write enriched features as a GeoJSON FeatureCollection.
///
/// Properties carry the input passthrough properties plus `feature_index`,
/// `resolved_names`, `provenance_count`, one entry per requested metric, the
/// first classification's `class`/`description`, and the full `classifications`.
pub fn to_geojson(features: &[EnrichedFeature]) -> Value {
    let features: Vec<Value> = features.iter().enumerate().map(|(idx, enriched)| {
        let mut properties: Map<String, Value> = enriched.feature.properties.clone();

        properties.insert("feature_index".to_string(), json!(idx));
        properties.insert("resolved_names".to_string(), json!(enriched.resolved_names()));
        properties.insert("provenance_count".to_string(), json!(enriched.provenance_count()));

        for (metric, value) in &enriched.metrics {
            properties.insert(metric.id().to_string(), json!(value));
        }

        if let Some(primary) = enriched.classifications.first() {
            properties.insert("class".to_string(), json!(primary.class));
            properties.insert("description".to_string(), json!(primary.description));
        }
        properties.insert("classifications".to_string(), json!(enriched.classifications));

        json!({
            "type": "Feature",
            "geometry": enriched.feature.geometry,
            "properties": properties,
        })
    }).collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}
