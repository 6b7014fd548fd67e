use anyhow::Result;
use log::{debug, info};
use serde_json::Value;

use crate::{
    aggregate::{aggregate, AggregatedRecord},
    classify::{
        alpha_encode, bivariate_class, color_select_for, scheme_select, size_encode,
        ClassificationResult, Encoding, LEVELS,
    },
    geom::symbol_anchor,
    io::{features_from_geojson, to_geojson},
    resolve::{NameResolver, ResolvedMatch},
    types::{BoundaryFeature, ClassId, Metric, ScoreIndex, ScoreRecord},
};
use super::{config::{ClassificationRequest, EnrichConfig}, enriched::EnrichedFeature};

const NO_DATA: &str = "No data";

/// Runs resolution, aggregation and classification over boundary collections
/// with a configuration validated once up front.
#[derive(Clone, Debug)]
pub struct Enricher {
    config: EnrichConfig,
}

impl Enricher {
    /// Validate `config` and build an enricher from it.
    pub fn new(config: EnrichConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline] pub fn config(&self) -> &EnrichConfig { &self.config }

    /// Enrich every feature, in input order. Never drops a feature.
    pub fn enrich(&self, features: &[BoundaryFeature], scores: &ScoreIndex) -> Vec<EnrichedFeature> {
        let resolver = NameResolver::from_scores(scores);

        let resolved: Vec<(ResolvedMatch, Option<AggregatedRecord>)> = features.iter()
            .map(|feature| {
                let matched = resolver.resolve(&feature.name, &feature.jurisdiction_type);
                let records: Vec<&ScoreRecord> = matched.keys().iter()
                    .filter_map(|key| scores.get(key))
                    .collect();
                if records.is_empty() {
                    debug!("[enrich] No scores for '{}' ({})", feature.name, feature.jurisdiction_type);
                }
                (matched, aggregate(&records))
            })
            .collect();

        let domains: Vec<Option<(f64, f64)>> = self.config.classifications.iter()
            .map(|request| match request {
                ClassificationRequest::ProportionalSize { size, domain, .. } => Some(match domain {
                    Some([lo, hi]) => (*lo, *hi),
                    None => batch_domain(resolved.iter().map(|(_, agg)| agg.as_ref()), *size),
                }),
                _ => None,
            })
            .collect();

        let needs_anchor = domains.iter().any(Option::is_some);
        let metrics = self.config.metrics();

        let enriched: Vec<EnrichedFeature> = features.iter().zip(resolved)
            .map(|(feature, (resolved, record))| {
                let scores = record.as_ref().map(|agg| &agg.record);

                let anchor = if needs_anchor { anchor_for(feature) } else { None };
                let classifications = self.config.classifications.iter().zip(&domains)
                    .map(|(request, domain)| self.classify(request, scores, *domain, anchor))
                    .collect();

                EnrichedFeature {
                    feature: feature.clone(),
                    resolved,
                    metrics: metrics.iter().map(|&m| (m, scores.and_then(|r| r.metric(m)))).collect(),
                    record,
                    classifications,
                }
            })
            .collect();

        let unresolved = enriched.iter().filter(|f| !f.is_resolved()).count();
        let aggregated = enriched.iter().filter(|f| f.provenance_count() > 1).count();
        info!(
            "[enrich] {} features: {} resolved, {} unresolved, {} aggregated",
            enriched.len(), enriched.len() - unresolved, unresolved, aggregated,
        );
        enriched
    }

    /// Enrich a GeoJSON FeatureCollection, returning an enriched FeatureCollection.
    pub fn enrich_geojson(&self, collection: &Value, scores: &ScoreIndex) -> Result<Value> {
        let features = features_from_geojson(collection, &self.config.fields)?;
        Ok(to_geojson(&self.enrich(&features, scores)))
    }

    fn classify(
        &self,
        request: &ClassificationRequest,
        scores: Option<&ScoreRecord>,
        domain: Option<(f64, f64)>,
        anchor: Option<[f64; 2]>,
    ) -> ClassificationResult {
        let value = |metric: Metric| scores.and_then(|r| r.metric(metric));
        let ramps = &self.config.ramps;

        match *request {
            ClassificationRequest::Univariate { metric } => {
                let (class, description) = self.thematic(metric, value(metric));
                let color = color_select_for(ramps, metric, value(metric));
                ClassificationResult { class, description, encoding: Encoding::Univariate { color } }
            }
            ClassificationRequest::Bivariate { x, y } => {
                let thresholds = &self.config.thresholds;
                let class = match (thresholds.get(x), thresholds.get(y)) {
                    (Some(tx), Some(ty)) => bivariate_class(value(x), value(y), tx, ty),
                    _ => ClassId::NO_DATA,
                };
                let scheme = scheme_select(x, y);
                let description = match class.index() {
                    Some(cell) => format!(
                        "{} {} / {} {}",
                        LEVELS[cell / 3], y.label(), LEVELS[cell % 3], x.label(),
                    ),
                    None => NO_DATA.to_string(),
                };
                ClassificationResult { class, description, encoding: Encoding::Bivariate { scheme, color: scheme.color(class) } }
            }
            ClassificationRequest::ValueByAlpha { value: metric, alpha, min_alpha, max_alpha, invert } => {
                let (class, description) = self.thematic(metric, value(metric));
                let color = color_select_for(ramps, metric, value(metric));
                let alpha = alpha_encode(value(alpha), min_alpha, max_alpha, invert);
                ClassificationResult { class, description, encoding: Encoding::ValueByAlpha { color, alpha } }
            }
            ClassificationRequest::ProportionalSize { size, color: metric, min_size, max_size, .. } => {
                let (class, description) = self.thematic(metric, value(metric));
                let color = color_select_for(ramps, metric, value(metric));
                let (lo, hi) = domain.unwrap_or_default();
                let size = size_encode(value(size), lo, hi, min_size, max_size);
                ClassificationResult { class, description, encoding: Encoding::ProportionalSize { color, size, anchor } }
            }
        }
    }

    /// Ramp class and "<Metric>: <step label>" description for one value.
    fn thematic(&self, metric: Metric, value: Option<f64>) -> (ClassId, String) {
        let Some(ramp) = self.config.ramps.get(metric) else { return (ClassId::NO_DATA, NO_DATA.to_string()) };
        let class = ramp.classify(value);
        let description = ramp.step(class)
            .map_or_else(|| NO_DATA.to_string(), |step| format!("{}: {}", metric.label(), step.label));
        (class, description)
    }
}

/// Min/max of `metric` over the resolved records; (0, 0) when nothing resolved.
fn batch_domain<'a, I>(records: I, metric: Metric) -> (f64, f64)
where
    I: IntoIterator<Item = Option<&'a AggregatedRecord>>,
{
    records.into_iter()
        .flatten()
        .filter_map(|agg| agg.record.metric(metric))
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0))
}

fn anchor_for(feature: &BoundaryFeature) -> Option<[f64; 2]> {
    match symbol_anchor(&feature.geometry) {
        Ok(anchor) => anchor,
        Err(err) => {
            debug!("[enrich] No symbol anchor for '{}': {err}", feature.name);
            None
        }
    }
}

/// Validate `config` and enrich `features` against `scores` in one call.
pub fn enrich(features: &[BoundaryFeature], scores: &ScoreIndex, config: &EnrichConfig) -> Result<Vec<EnrichedFeature>> {
    Ok(Enricher::new(config.clone())?.enrich(features, scores))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify::NO_DATA_COLOR, types::JurisdictionType};

    fn scores() -> ScoreIndex {
        [
            ("Alaiedon Township Precinct 1", ScoreRecord { partisan_lean: Some(-12.0), registered_voters: Some(1000), ..Default::default() }),
            ("Alaiedon Township Precinct 2", ScoreRecord { partisan_lean: Some(-4.0), registered_voters: Some(3000), ..Default::default() }),
            ("Mason Precinct 1", ScoreRecord { partisan_lean: Some(8.0), registered_voters: Some(500), ..Default::default() }),
        ].into_iter().collect()
    }

    #[test]
    fn township_boundaries_are_aggregated() {
        let enricher = Enricher::new(EnrichConfig::new(ClassificationRequest::univariate(Metric::PartisanLean))).unwrap();
        let out = enricher.enrich(&[BoundaryFeature::new("Alaiedon Township", JurisdictionType::Township)], &scores());

        assert_eq!(out[0].provenance_count(), 2);
        assert_eq!(out[0].metric(Metric::PartisanLean), Some(-8.0));
        assert_eq!(out[0].classifications[0].description, "Partisan Lean: Lean R");
    }

    #[test]
    fn batch_domain_drives_symbol_size() {
        let enricher = Enricher::new(EnrichConfig::new(
            ClassificationRequest::proportional_size(Metric::RegisteredVoters, Metric::PartisanLean),
        )).unwrap();
        let features = [
            BoundaryFeature::new("Mason Precinct 1", JurisdictionType::Precinct),
            BoundaryFeature::new("Alaiedon Township", JurisdictionType::Township),
        ];
        let out = enricher.enrich(&features, &scores());

        let size = |i: usize| match out[i].classifications[0].encoding {
            Encoding::ProportionalSize { size, .. } => size,
            _ => unreachable!(),
        };
        assert_eq!(size(0), 4.0);
        assert_eq!(size(1), 40.0);
    }

    #[test]
    fn missing_bivariate_axis_is_no_data() {
        let enricher = Enricher::new(EnrichConfig::new(ClassificationRequest::bivariate(Metric::PartisanLean, Metric::Turnout))).unwrap();
        let out = enricher.enrich(&[BoundaryFeature::new("Mason Precinct 1", JurisdictionType::Precinct)], &scores());
        let result = &out[0].classifications[0];
        assert!(result.is_no_data());
        assert_eq!(result.description, "No data");
        assert_eq!(result.encoding, Encoding::Bivariate { scheme: crate::classify::BivariateScheme::Diverging, color: NO_DATA_COLOR });
    }

    #[test]
    fn invalid_config_fails_before_any_feature() {
        let mut config = EnrichConfig::new(ClassificationRequest::univariate(Metric::Turnout));
        config.ramps = crate::classify::RampTable::empty();
        assert!(enrich(&[], &scores(), &config).is_err());
    }
}
