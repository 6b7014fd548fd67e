mod class;
mod feature;
mod metric;
mod record;

pub use class::ClassId;
pub use feature::{BoundaryFeature, JurisdictionType};
pub use metric::{Metric, MetricCategory};
pub use record::{ScoreIndex, ScoreRecord};
