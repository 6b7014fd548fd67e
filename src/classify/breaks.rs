use crate::types::ClassId;

/// Index of the interval `[breaks[i], breaks[i+1])` holding `value`; the last
/// interval is closed on the right. Values outside the break range clamp to the
/// first or last class. Missing/NaN values, or fewer than two breaks, yield
/// [`ClassId::NO_DATA`].
pub fn univariate_class(value: Option<f64>, breaks: &[f64]) -> ClassId {
    let Some(value) = value.filter(|v| !v.is_nan()) else { return ClassId::NO_DATA };
    if breaks.len() < 2 { return ClassId::NO_DATA }

    let classes = breaks.len() - 1;
    // Number of interior breaks at or below `value`.
    let above = breaks[1..classes].partition_point(|&b| b <= value);
    ClassId::new(above)
}
