use serde::{Deserialize, Serialize};

use crate::types::{ClassId, Metric, MetricCategory};
use super::color::{Rgb, NO_DATA_COLOR};

/// Predefined 3x3 palettes for two-metric maps. Cell `y * 3 + x`, low/low first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BivariateScheme {
    Diverging,
    Qualitative,
    Quantitative,
}

const DIVERGING: [Rgb; 9] = [
    Rgb::new(0xe8, 0xe8, 0xe8), Rgb::new(0xe4, 0xac, 0xac), Rgb::new(0xc8, 0x5a, 0x5a),
    Rgb::new(0xb0, 0xd5, 0xdf), Rgb::new(0xad, 0x9e, 0xa5), Rgb::new(0x98, 0x53, 0x56),
    Rgb::new(0x64, 0xac, 0xbe), Rgb::new(0x62, 0x7f, 0x8c), Rgb::new(0x57, 0x42, 0x49),
];

const QUALITATIVE: [Rgb; 9] = [
    Rgb::new(0xe8, 0xe8, 0xe8), Rgb::new(0xac, 0xe4, 0xe4), Rgb::new(0x5a, 0xc8, 0xc8),
    Rgb::new(0xdf, 0xb0, 0xd6), Rgb::new(0xa5, 0xad, 0xd3), Rgb::new(0x56, 0x98, 0xb9),
    Rgb::new(0xbe, 0x64, 0xac), Rgb::new(0x8c, 0x62, 0xaa), Rgb::new(0x3b, 0x49, 0x94),
];

const QUANTITATIVE: [Rgb; 9] = [
    Rgb::new(0xe8, 0xe8, 0xe8), Rgb::new(0xb5, 0xc0, 0xda), Rgb::new(0x6c, 0x83, 0xb5),
    Rgb::new(0xb8, 0xd6, 0xbe), Rgb::new(0x90, 0xb2, 0xb3), Rgb::new(0x56, 0x79, 0x94),
    Rgb::new(0x73, 0xae, 0x80), Rgb::new(0x5a, 0x91, 0x78), Rgb::new(0x2a, 0x5a, 0x5b),
];

impl BivariateScheme {
    pub fn palette(self) -> &'static [Rgb; 9] {
        match self {
            BivariateScheme::Diverging => &DIVERGING,
            BivariateScheme::Qualitative => &QUALITATIVE,
            BivariateScheme::Quantitative => &QUANTITATIVE,
        }
    }

    pub fn color(self, cell: ClassId) -> Rgb {
        cell.index().and_then(|i| self.palette().get(i)).copied().unwrap_or(NO_DATA_COLOR)
    }
}

/// Pick a palette for an (x, y) metric pair. Partisan axes win over everything,
/// then two opportunity axes, then any demographic axis.
pub fn scheme_select(x: Metric, y: Metric) -> BivariateScheme {
    let (cx, cy) = (x.category(), y.category());
    let either = |c: MetricCategory| cx == c || cy == c;

    if either(MetricCategory::Partisan) {
        BivariateScheme::Diverging
    } else if cx == MetricCategory::Opportunity && cy == MetricCategory::Opportunity {
        BivariateScheme::Qualitative
    } else if either(MetricCategory::Demographic) {
        BivariateScheme::Quantitative
    } else {
        BivariateScheme::Diverging
    }
}
