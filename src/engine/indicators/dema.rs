//! Double exponential moving average.

use super::ema::ema_over;
use super::MovingAverage;
use crate::engine::point::{ComputedPoint, ExtractedPoint};

/// `2 * ema - ema2`, where `ema2` is an EMA of the `ema` series.
///
/// Built by composition: the first smoothing pass runs over the
/// extracted values, the second over the first pass's output. The second
/// pass seeds on `period` valid `ema` values, so DEMA's warm-up is
/// strictly longer than EMA's. Both intermediate series are materialized
/// explicitly; nothing is mutated in place.
pub struct Dema;

impl MovingAverage for Dema {
    fn name(&self) -> &'static str {
        "DEMA"
    }

    fn compute(&self, data: &[ExtractedPoint], period: usize) -> Vec<ComputedPoint> {
        let values: Vec<Option<f64>> = data.iter().map(|point| point.value).collect();
        let ema = ema_over(&values, period);
        let ema2 = ema_over(&ema, period);

        data.iter()
            .zip(ema.iter().zip(&ema2))
            .map(|(point, smoothed)| ComputedPoint {
                x: point.x,
                value: match smoothed {
                    (Some(e1), Some(e2)) => Some(2.0 * e1 - e2),
                    _ => None,
                },
            })
            .collect()
    }
}
