mod config;
mod enriched;
mod enricher;

pub use config::{ClassificationRequest, EnrichConfig, FieldNames};
pub use enriched::EnrichedFeature;
pub use enricher::{enrich, Enricher};
