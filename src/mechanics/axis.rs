/// Axis mechanics: the evaluation window [0.1, 1.0) and its inverse.

/// Lower edge of the normalized evaluation window.
pub const AXIS_LO: f64 = 0.1;
/// Width of the normalized evaluation window.
pub const AXIS_SPAN: f64 = 0.9;

/// Normalized coordinate of cell `k` out of `resolution`: 0.1 + 0.9 * k / R.
#[inline]
pub fn coord(k: usize, resolution: usize) -> f64 {
    AXIS_LO + AXIS_SPAN * (k as f64) / (resolution as f64)
}

/// Round half up, floor(x + 0.5), also for negative x.
#[inline]
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Nearest cell for a normalized coordinate. May fall outside [0, R).
#[inline]
pub fn cell_of(normalized: f64, resolution: usize) -> i64 {
    round_half_up(resolution as f64 * (normalized - AXIS_LO) / AXIS_SPAN)
}
