//! Threshold signal: price above its own trailing mean.

/// Emit 1 where `close > rolling_mean`, else 0.
///
/// A row with an undefined mean (warm-up or a gap in the data) or a missing
/// close never fires, so it contributes 0 to the signal rate. Slices of
/// unequal length are compared up to the shorter one.
pub fn generate_signals(close: &[Option<f64>], rolling_mean: &[Option<f64>]) -> Vec<u8> {
    close
        .iter()
        .zip(rolling_mean)
        .map(|(&price, &mean)| u8::from(is_above_mean(price, mean)))
        .collect()
}

fn is_above_mean(price: Option<f64>, mean: Option<f64>) -> bool {
    match (price, mean) {
        (Some(price), Some(mean)) => price > mean,
        _ => false,
    }
}
