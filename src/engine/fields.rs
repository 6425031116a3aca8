//! Price-field selection and extraction.
//!
//! Indicators do not consume raw OHLC bars directly; each bar is first
//! reduced to a single scalar by the configured [`PriceField`] formula.
//! Extraction is a pure function over one point and propagates absence:
//! if any field a formula references is missing, the result is missing.

use crate::engine::config::OptionError;
use crate::engine::point::{DataPoint, ExtractedPoint};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which price value (or derived value) to feed into an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceField {
    /// Opening price.
    #[serde(rename = "open")]
    Open,
    /// Highest price.
    #[serde(rename = "high")]
    High,
    /// Lowest price.
    #[serde(rename = "low")]
    Low,
    /// Closing price.
    #[default]
    #[serde(rename = "close")]
    Close,
    /// Median price: `(high + low) / 2`.
    #[serde(rename = "hl/2", alias = "hl2")]
    Hl2,
    /// Typical price: `(high + low + close) / 3`.
    #[serde(rename = "hlc/3", alias = "hlc3")]
    Hlc3,
    /// Weighted close: `(high + low + close + close) / 4`.
    #[serde(rename = "hlcc/4", alias = "hlcc4")]
    Hlcc4,
    /// Average price: `(open + high + low + close) / 4`.
    #[serde(rename = "ohlc/4", alias = "ohlc4")]
    Ohlc4,
}

impl PriceField {
    /// Chart-facing name of the field, e.g. `"hl/2"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Hl2 => "hl/2",
            Self::Hlc3 => "hlc/3",
            Self::Hlcc4 => "hlcc/4",
            Self::Ohlc4 => "ohlc/4",
        }
    }

    /// Extracts this field's scalar from a single point.
    ///
    /// Returns `None` when any referenced source field is absent; no
    /// partial arithmetic is performed in that case.
    #[must_use]
    pub fn extract(self, point: &DataPoint) -> Option<f64> {
        match self {
            Self::Open => point.open,
            Self::High => point.high,
            Self::Low => point.low,
            Self::Close => point.close,
            Self::Hl2 => Some((point.high? + point.low?) / 2.0),
            Self::Hlc3 => Some((point.high? + point.low? + point.close?) / 3.0),
            Self::Hlcc4 => {
                let close = point.close?;
                Some((point.high? + point.low? + close + close) / 4.0)
            }
            Self::Ohlc4 => Some((point.open? + point.high? + point.low? + point.close?) / 4.0),
        }
    }
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceField {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            "close" => Ok(Self::Close),
            "hl/2" | "hl2" => Ok(Self::Hl2),
            "hlc/3" | "hlc3" => Ok(Self::Hlc3),
            "hlcc/4" | "hlcc4" => Ok(Self::Hlcc4),
            "ohlc/4" | "ohlc4" => Ok(Self::Ohlc4),
            _ => Err(OptionError::UnknownField(s.to_string())),
        }
    }
}

/// Extracts one scalar per input point, preserving order and count.
///
/// With no field selected every extracted value is absent; the sequence
/// still mirrors the input so downstream stages stay index-aligned.
#[must_use]
pub fn extract_series(points: &[DataPoint], field: Option<PriceField>) -> Vec<ExtractedPoint> {
    points
        .iter()
        .map(|point| ExtractedPoint {
            x: point.x,
            value: field.and_then(|f| f.extract(point)),
        })
        .collect()
}
