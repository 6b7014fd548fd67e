mod bivariate;
mod breaks;
mod color;
mod encode;
mod result;
mod scheme;

pub use bivariate::{bivariate_class, Thresholds, ThresholdTable};
pub(crate) use bivariate::LEVELS;
pub use breaks::univariate_class;
pub use color::{color_select_for, ColorRamp, RampKind, RampStep, RampTable, Rgb, NO_DATA_COLOR};
pub use encode::{alpha_encode, size_encode};
pub use result::{ClassificationResult, Encoding};
pub use scheme::{scheme_select, BivariateScheme};
