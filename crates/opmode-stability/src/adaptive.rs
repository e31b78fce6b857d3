//! Noise-adaptive control-limit width

use crate::types::AdaptiveKParameters;

/// Map a noise ratio to a control-limit multiplier
///
/// `k_min` at or below the low end of the noise band, `k_max` at or above
/// the high end, and an exponential saturation curve in between:
/// `k_min + (k_max - k_min) * (1 - exp(-alpha * t))` with `t` the position
/// inside the band. The curve is continuous at the low end only when
/// `exp(-alpha)` is negligible at the high end; with the default alpha of 5
/// the jump at the high end is `1.5 * e^-5 ≈ 0.01`.
pub fn adaptive_k(noise_ratio: f64, params: &AdaptiveKParameters) -> f64 {
    if noise_ratio <= params.noise_ratio_low {
        params.k_min
    } else if noise_ratio >= params.noise_ratio_high {
        params.k_max
    } else {
        let normalized = (noise_ratio - params.noise_ratio_low)
            / (params.noise_ratio_high - params.noise_ratio_low);
        let scaled = 1.0 - (-params.alpha * normalized).exp();
        params.k_min + (params.k_max - params.k_min) * scaled
    }
}
