//! Triple exponential moving average.

use super::ema::ema_over;
use super::MovingAverage;
use crate::engine::point::{ComputedPoint, ExtractedPoint};

/// `3 * ema - 3 * ema2 + ema3`, three chained smoothing passes.
///
/// Extends DEMA's composition with a third pass over `ema2`. Each layer
/// seeds on `period` valid values of the layer below, so the warm-up
/// compounds: TEMA's first output lands strictly after DEMA's, which
/// lands strictly after EMA's.
pub struct Tema;

impl MovingAverage for Tema {
    fn name(&self) -> &'static str {
        "TEMA"
    }

    fn compute(&self, data: &[ExtractedPoint], period: usize) -> Vec<ComputedPoint> {
        let values: Vec<Option<f64>> = data.iter().map(|point| point.value).collect();
        let ema = ema_over(&values, period);
        let ema2 = ema_over(&ema, period);
        let ema3 = ema_over(&ema2, period);

        data.iter()
            .enumerate()
            .map(|(index, point)| ComputedPoint {
                x: point.x,
                value: match (ema[index], ema2[index], ema3[index]) {
                    (Some(e1), Some(e2), Some(e3)) => Some(3.0 * e1 - 3.0 * e2 + e3),
                    _ => None,
                },
            })
            .collect()
    }
}
