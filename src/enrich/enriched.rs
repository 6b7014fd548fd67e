use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    aggregate::AggregatedRecord,
    classify::ClassificationResult,
    resolve::ResolvedMatch,
    types::{BoundaryFeature, Metric},
};

/// A boundary feature with its resolved scores and classifications attached.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnrichedFeature {
    pub feature: BoundaryFeature,
    pub resolved: ResolvedMatch,
    /// Resolved (and, for 1:N boundaries, aggregated) scores; `None` when unresolved.
    pub record: Option<AggregatedRecord>,
    /// Raw value of every requested metric.
    pub metrics: BTreeMap<Metric, Option<f64>>,
    /// One result per request, in request order.
    pub classifications: Vec<ClassificationResult>,
}

impl EnrichedFeature {
    #[inline] pub fn resolved_names(&self) -> &[String] { self.resolved.keys() }

    #[inline] pub fn is_resolved(&self) -> bool { self.record.is_some() }

    /// Number of score records behind this feature (0 when unresolved).
    #[inline] pub fn provenance_count(&self) -> usize { self.record.as_ref().map_or(0, |r| r.count) }

    #[inline] pub fn metric(&self, metric: Metric) -> Option<f64> { self.metrics.get(&metric).copied().flatten() }
}
