use serde::Serialize;

use crate::types::ClassId;
use super::{color::Rgb, scheme::BivariateScheme};

/// Mode-specific values handed to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Encoding {
    Univariate { color: Rgb },
    Bivariate { scheme: BivariateScheme, color: Rgb },
    ValueByAlpha { color: Rgb, alpha: f64 },
    ProportionalSize {
        color: Rgb,
        size: f64,
        /// Interior point `[lon, lat]` to place the symbol at, when geometry allows.
        anchor: Option<[f64; 2]>,
    },
}

/// One classification of one feature.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub class: ClassId,
    pub description: String,
    pub encoding: Encoding,
}

impl ClassificationResult {
    #[inline] pub fn is_no_data(&self) -> bool { self.class.is_no_data() }
}
