/// Map a 0-100 secondary metric linearly onto `[min_alpha, max_alpha]`.
/// `invert` flips the direction. A missing value is treated as the least
/// confident case and always maps to `min_alpha`.
pub fn alpha_encode(value: Option<f64>, min_alpha: f64, max_alpha: f64, invert: bool) -> f64 {
    let Some(value) = value.filter(|v| !v.is_nan()) else { return min_alpha };
    let t = (value / 100.0).clamp(0.0, 1.0);
    let t = if invert { 1.0 - t } else { t };
    min_alpha + t * (max_alpha - min_alpha)
}

/// Symbol size for `value` on `[domain_min, domain_max]`, scaled by the square
/// root of the normalized value so symbol area tracks the data linearly.
/// A zero-width domain always yields the midpoint size; a missing value
/// otherwise yields `min_size`.
pub fn size_encode(value: Option<f64>, domain_min: f64, domain_max: f64, min_size: f64, max_size: f64) -> f64 {
    if domain_min == domain_max { return (min_size + max_size) / 2.0 }
    let Some(value) = value.filter(|v| !v.is_nan()) else { return min_size };
    let t = ((value - domain_min) / (domain_max - domain_min)).clamp(0.0, 1.0);
    min_size + t.sqrt() * (max_size - min_size)
}
