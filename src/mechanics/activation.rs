/// Activation mechanics for the sigmoid regressor.

/// Logistic sigmoid 1 / (1 + e^-x).
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid slope expressed through its own output: y * (1 - y).
#[inline]
pub fn sigmoid_slope(y: f64) -> f64 {
    y * (1.0 - y)
}
