mod aggregate;

pub use aggregate::{aggregate, AggregatedRecord};
