//! Point types flowing through the indicator pipeline.
//!
//! A raw [`DataPoint`] comes from the upstream data provider, is reduced
//! to an [`ExtractedPoint`] by the configured price field, and comes out
//! of an algorithm as a [`ComputedPoint`]. All three stay index-aligned:
//! every stage produces exactly one point per input point.

use serde::{Deserialize, Serialize};

/// Ordering key of a point, typically a unix timestamp in milliseconds.
///
/// The provider guarantees keys are monotonically non-decreasing.
pub type Timestamp = i64;

/// A single OHLC bar as delivered by the upstream data provider.
///
/// Every price field is optional: a point may be present on the axis
/// while one or more of its values never arrived. Missing values stay
/// missing through the whole pipeline, they are never substituted with
/// zero or NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Ordering key.
    pub x: Timestamp,
    /// Opening price.
    #[serde(default)]
    pub open: Option<f64>,
    /// Highest price.
    #[serde(default)]
    pub high: Option<f64>,
    /// Lowest price.
    #[serde(default)]
    pub low: Option<f64>,
    /// Closing price.
    #[serde(default)]
    pub close: Option<f64>,
}

/// One scalar extracted from a [`DataPoint`] by a price-field formula.
///
/// `value` is `None` when any source field the formula references was
/// absent on the point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractedPoint {
    /// Ordering key, mirrored from the source point.
    pub x: Timestamp,
    /// Extracted scalar, if all referenced fields were present.
    pub value: Option<f64>,
}

/// One output point of an indicator algorithm.
///
/// `value` is `None` for positions inside the warm-up window or where
/// the input provided no value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComputedPoint {
    /// Ordering key, mirrored from the source point.
    pub x: Timestamp,
    /// Indicator value, once enough history exists.
    pub value: Option<f64>,
}
