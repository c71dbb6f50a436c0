/// Color mechanics: clipping and gray levels.

/// Clip to [0, 1]. NaN maps to 0.
#[inline]
pub fn clip(value: f64) -> f64 {
    if value > 1.0 {
        1.0
    } else if value >= 0.0 {
        value
    } else {
        0.0
    }
}

/// 8-bit channel for an intensity in [0, 1] (rounds half up).
#[inline]
pub fn channel(value: f64) -> u8 {
    (clip(value) * 255.0 + 0.5) as u8
}

/// Gray RGB triple with R = G = B.
#[inline]
pub fn gray(value: f64) -> [u8; 3] {
    let c = channel(value);
    [c, c, c]
}
