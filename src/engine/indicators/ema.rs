//! Exponential moving average.

use super::MovingAverage;
use crate::engine::point::{ComputedPoint, ExtractedPoint};

/// One exponential smoothing pass over an optional-valued series.
///
/// Seeds with the simple average of the first `period` present values
/// and emits that seed at the period-th value's position. From then on
/// every present value produces `value * k + prev * (1 - k)` with
/// `k = 2 / (period + 1)`. Absent positions emit nothing and leave the
/// running state untouched.
///
/// This is the shared building block for EMA, DEMA, and TEMA: the
/// chained variants feed one pass's output into the next.
pub(crate) fn ema_over(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let multiplier = 2.0 / (period as f64 + 1.0);
    let mut seen = 0usize;
    let mut ma = 0.0;

    for (index, value) in values.iter().enumerate() {
        if let Some(value) = value {
            seen += 1;
            if seen > period {
                ma = value * multiplier + ma * (1.0 - multiplier);
                out[index] = Some(ma);
            } else {
                ma += value / period as f64;
                if seen == period {
                    out[index] = Some(ma);
                }
            }
        }
    }

    out
}

/// Exponentially weighted mean seeded by a simple average.
pub struct Ema;

impl MovingAverage for Ema {
    fn name(&self) -> &'static str {
        "EMA"
    }

    fn compute(&self, data: &[ExtractedPoint], period: usize) -> Vec<ComputedPoint> {
        let values: Vec<Option<f64>> = data.iter().map(|point| point.value).collect();
        data.iter()
            .zip(ema_over(&values, period))
            .map(|(point, value)| ComputedPoint { x: point.x, value })
            .collect()
    }
}
