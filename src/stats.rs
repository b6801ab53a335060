use anyhow::{Result, anyhow};
use statrs::statistics::Statistics;

/// Running sum with Kahan compensation, so a long slide does not drift.
#[derive(Debug, Default, Clone, Copy)]
struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    fn add(&mut self, value: f64) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    fn value(&self) -> f64 {
        self.sum
    }
}

/// Calculate the trailing arithmetic mean over a fixed window
///
/// # Arguments
/// * `values` - Time-ordered series; `None` (or NaN) marks a missing value
/// * `window` - Number of observations in each window
///
/// # Returns
/// One entry per input position. A position is `None` until `window`
/// values are available, and whenever its window holds a missing value.
/// Partial windows are never averaged. A window of zero yields all `None`.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let present = |value: Option<f64>| value.filter(|v| !v.is_nan());

    let mut means = Vec::with_capacity(values.len());
    let mut sum = CompensatedSum::default();
    let mut observations = 0usize;

    // Length of the run of identical values ending at the current position.
    // A full window of one value averages to exactly that value.
    let mut run_value: Option<f64> = None;
    let mut run_len = 0usize;

    for (i, &raw) in values.iter().enumerate() {
        let value = present(raw);

        if let Some(v) = value {
            sum.add(v);
            observations += 1;
        }
        if i >= window {
            if let Some(old) = present(values[i - window]) {
                sum.add(-old);
                observations -= 1;
            }
        }
        if observations == 0 {
            sum = CompensatedSum::default();
        }

        match value {
            Some(v) if run_value == Some(v) => run_len += 1,
            Some(v) => {
                run_value = Some(v);
                run_len = 1;
            }
            None => {
                run_value = None;
                run_len = 0;
            }
        }

        let mean = if observations == window {
            if run_len >= window {
                run_value
            } else {
                Some(sum.value() / window as f64)
            }
        } else {
            None
        };
        means.push(mean);
    }

    means
}

/// Fraction of rows carrying a positive signal
pub fn signal_rate(signals: &[u8]) -> Result<f64> {
    if signals.is_empty() {
        return Err(anyhow!("Cannot calculate signal rate for empty signals"));
    }

    let values: Vec<f64> = signals.iter().map(|&s| f64::from(s)).collect();
    Ok(values.mean())
}

/// Round half away from zero to a fixed number of decimals.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
