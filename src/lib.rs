#![doc = "Precinct Atlas public API"]
mod aggregate;
mod classify;
mod enrich;
mod geom;
mod io;
mod resolve;
mod types;

#[doc(inline)]
pub use types::{BoundaryFeature, ClassId, JurisdictionType, Metric, MetricCategory, ScoreIndex, ScoreRecord};

#[doc(inline)]
pub use resolve::{build_index, normalize, NameIndex, NameResolver, ResolvedMatch};

#[doc(inline)]
pub use aggregate::{aggregate, AggregatedRecord};

#[doc(inline)]
pub use classify::{
    alpha_encode, bivariate_class, color_select_for, scheme_select, size_encode, univariate_class,
    BivariateScheme, ClassificationResult, ColorRamp, Encoding, RampKind, RampStep, RampTable, Rgb,
    ThresholdTable, Thresholds, NO_DATA_COLOR,
};

#[doc(inline)]
pub use enrich::{enrich, ClassificationRequest, EnrichConfig, EnrichedFeature, Enricher, FieldNames};

#[doc(inline)]
pub use io::{features_from_geojson, to_geojson};
