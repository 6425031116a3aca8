//! Moving-average algorithms.
//!
//! Each algorithm consumes the full extracted sequence in one pass and
//! returns an output sequence of the same length; positions inside the
//! warm-up window (and positions whose input value is absent) carry
//! `None`. Algorithms keep no state between passes: every recomputation
//! starts from scratch over the current snapshot.

use crate::engine::point::{ComputedPoint, ExtractedPoint};

pub mod dema;
pub mod ema;
pub mod sma;
pub mod tema;
pub mod wma;

/// A batch moving-average computation.
pub trait MovingAverage {
    /// Display name of the algorithm, e.g. `"EMA"`.
    fn name(&self) -> &'static str;

    /// Computes the full output sequence for `data`.
    ///
    /// The result always has `data.len()` entries. With `period == 0`
    /// every entry is absent: the indicator is not yet configured.
    fn compute(&self, data: &[ExtractedPoint], period: usize) -> Vec<ComputedPoint>;
}

/// Output sequence mirroring `data` with every value absent.
pub(crate) fn absent_output(data: &[ExtractedPoint]) -> Vec<ComputedPoint> {
    data.iter()
        .map(|point| ComputedPoint {
            x: point.x,
            value: None,
        })
        .collect()
}
