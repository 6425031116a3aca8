use crate::engine::point::{DataPoint, ExtractedPoint, Timestamp};

/// Asserts that two `f64` values are approximately equal using a
/// relative epsilon of `4 * f64::EPSILON`.
macro_rules! assert_approx {
    ($actual:expr, $expected:expr) => {{
        let (a, e) = ($actual, $expected);
        assert!(
            (a - e).abs() < e.abs() * 4.0 * f64::EPSILON,
            "assert_approx failed: actual={a}, expected={e}, diff={}",
            (a - e).abs(),
        );
    }};
}

pub(crate) use assert_approx;

/// Full OHLC bar at a given timestamp.
pub fn bar(x: Timestamp, open: f64, high: f64, low: f64, close: f64) -> DataPoint {
    DataPoint {
        x,
        open: Some(open),
        high: Some(high),
        low: Some(low),
        close: Some(close),
    }
}

/// Bar with only a close price; the other fields stay absent.
pub fn close_only(x: Timestamp, close: f64) -> DataPoint {
    DataPoint {
        x,
        open: None,
        high: None,
        low: None,
        close: Some(close),
    }
}

/// Bar with no values at all, occupying a position on the axis.
pub fn empty(x: Timestamp) -> DataPoint {
    DataPoint {
        x,
        open: None,
        high: None,
        low: None,
        close: None,
    }
}

/// Extracted sequence from optional scalars, with timestamps 0, 1, 2, ...
pub fn extracted(values: &[Option<f64>]) -> Vec<ExtractedPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| ExtractedPoint {
            x: i as Timestamp,
            value: *v,
        })
        .collect()
}

/// Close-only data points from plain scalars, with timestamps 0, 1, 2, ...
pub fn close_series(closes: &[f64]) -> Vec<DataPoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, c)| close_only(i as Timestamp, *c))
        .collect()
}
