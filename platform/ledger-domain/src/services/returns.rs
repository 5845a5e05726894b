/// Log returns over a circular shift of `prices`: `r[i] = ln(p[(i + 1) % n] / p[i])`.
///
/// The last element compares the final price with the first one; drop it when a
/// plain "next price" series is wanted. Zero or negative prices yield infinities
/// or NaN.
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    let n = prices.len();
    (0..n)
        .map(|i| (prices[(i + 1) % n] / prices[i]).ln())
        .collect()
}
