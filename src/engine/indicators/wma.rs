//! Weighted moving average.

use super::{absent_output, MovingAverage};
use crate::engine::point::{ComputedPoint, ExtractedPoint};

/// Linearly weighted mean of the last `period` valid values.
///
/// Once `period` valid values exist, each output point is produced by a
/// fresh backward scan from its position: the most recent valid value
/// gets weight `period`, the next `period - 1`, down to `1`. Absent
/// positions are skipped without consuming a weight slot, and the result
/// is normalized by the sum of the weights actually assigned. The scan
/// is O(n * period); every pass recomputes from scratch.
pub struct Wma;

impl MovingAverage for Wma {
    fn name(&self) -> &'static str {
        "WMA"
    }

    fn compute(&self, data: &[ExtractedPoint], period: usize) -> Vec<ComputedPoint> {
        let mut out = absent_output(data);
        if period == 0 {
            return out;
        }

        let mut seen = 0usize;

        for (index, point) in data.iter().enumerate() {
            if point.value.is_none() {
                continue;
            }
            seen += 1;
            if seen < period {
                continue;
            }

            let mut sum = 0.0;
            let mut weight_total = 0.0;
            let mut used = 0usize;
            for earlier in data[..=index].iter().rev() {
                if let Some(value) = earlier.value {
                    let weight = (period - used) as f64;
                    sum += value * weight;
                    weight_total += weight;
                    used += 1;
                    if used == period {
                        break;
                    }
                }
            }

            out[index].value = Some(sum / weight_total);
        }

        out
    }
}
