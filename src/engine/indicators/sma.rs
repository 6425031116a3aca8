//! Simple moving average.

use super::{absent_output, MovingAverage};
use crate::engine::point::{ComputedPoint, ExtractedPoint};

/// Arithmetic mean of the last `period` valid values.
///
/// The running sum is maintained incrementally across a single
/// left-to-right pass. Absent values neither advance the warm-up counter
/// nor touch the sum, so gaps extend the warm-up. The value falling out
/// of the trailing window is addressed by array position; when that
/// outgoing value is absent its subtraction is skipped, leaving its
/// stale share in the sum until a later valid value displaces it.
pub struct Sma;

impl MovingAverage for Sma {
    fn name(&self) -> &'static str {
        "SMA"
    }

    fn compute(&self, data: &[ExtractedPoint], period: usize) -> Vec<ComputedPoint> {
        let mut out = absent_output(data);
        if period == 0 {
            return out;
        }

        let divisor = period as f64;
        let mut seen = 0usize;
        let mut sum = 0.0;

        for (index, point) in data.iter().enumerate() {
            if let Some(value) = point.value {
                seen += 1;
                sum += value / divisor;

                if seen >= period {
                    if seen > period {
                        if let Some(outgoing) = data[index - period].value {
                            sum -= outgoing / divisor;
                        }
                    }
                    out[index].value = Some(sum);
                }
            }
        }

        out
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::engine::test_util::{assert_approx, extracted};

    fn values(data: &[ComputedPoint]) -> Vec<Option<f64>> {
        data.iter().map(|p| p.value).collect()
    }

    #[test]
    fn warm_up_then_rolling_average() {
        let data = extracted(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
        let out = Sma.compute(&data, 3);
        assert_eq!(
            values(&out),
            vec![None, None, Some(2.0), Some(3.0), Some(4.0)]
        );
    }

    #[test]
    fn output_mirrors_input_length_and_x() {
        let data = extracted(&[Some(1.0), None, Some(2.0)]);
        let out = Sma.compute(&data, 2);
        assert_eq!(out.len(), 3);
        for (input, output) in data.iter().zip(&out) {
            assert_eq!(input.x, output.x);
        }
    }

    #[test]
    fn gap_extends_warm_up() {
        // Two valid values separated by a gap: period 3 is only reached
        // at the fourth valid value's position.
        let data = extracted(&[Some(1.0), None, Some(2.0), Some(3.0), Some(4.0)]);
        let out = Sma.compute(&data, 3);
        assert_eq!(values(&out)[..3], [None, None, None]);
        assert_eq!(out[3].value, Some(2.0));
    }

    #[test]
    fn running_sum_keeps_stale_share_when_outgoing_value_is_absent() {
        // The value leaving the window at index 4 sits at array position
        // 1, which is absent, so nothing is subtracted: the emitted
        // average still contains 1/3 from the very first value instead
        // of covering only the last three valid values.
        let data = extracted(&[Some(1.0), None, Some(2.0), Some(3.0), Some(4.0)]);
        let out = Sma.compute(&data, 3);
        assert_approx!(out[4].value.unwrap(), 10.0 / 3.0);
    }

    #[test]
    fn stale_share_persists_in_later_windows() {
        // One step later the outgoing position is valid again and gets
        // subtracted normally, but the 1/3 that was never removed at
        // index 4 stays in the sum: (3+4+5)/3 plus the stale 1/3.
        let data = extracted(&[
            Some(1.0),
            None,
            Some(2.0),
            Some(3.0),
            Some(4.0),
            Some(5.0),
        ]);
        let out = Sma.compute(&data, 3);
        assert_approx!(out[5].value.unwrap(), 13.0 / 3.0);
    }

    #[test]
    fn period_zero_emits_nothing() {
        let data = extracted(&[Some(1.0), Some(2.0), Some(3.0)]);
        let out = Sma.compute(&data, 0);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn insufficient_data_emits_nothing() {
        let data = extracted(&[Some(1.0), Some(2.0)]);
        let out = Sma.compute(&data, 5);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn period_one_echoes_valid_values() {
        let data = extracted(&[Some(1.5), None, Some(3.0)]);
        let out = Sma.compute(&data, 1);
        assert_eq!(values(&out), vec![Some(1.5), None, Some(3.0)]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let out = Sma.compute(&[], 3);
        assert!(out.is_empty());
    }
}
