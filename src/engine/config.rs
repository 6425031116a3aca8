//! Indicator configuration: kind selection, options, and their parsing.
//!
//! Options arrive from untyped surfaces (CLI flags, TOML files, JSON) and
//! are validated into typed values here. The computational core itself
//! never fails on configuration: a missing or non-positive period simply
//! means "not yet configured" and produces an all-absent output.

use crate::engine::fields::PriceField;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default window length when none is configured.
pub const DEFAULT_PERIOD: usize = 14;

#[derive(Debug, Error)]
pub enum OptionError {
    #[error("unknown indicator kind: {0}")]
    UnknownKind(String),
    #[error("unknown price field: {0}")]
    UnknownField(String),
    #[error("invalid color literal: {0}")]
    InvalidColor(String),
}

/// Which moving-average algorithm an indicator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorKind {
    /// Simple moving average.
    Sma,
    /// Weighted moving average.
    Wma,
    /// Exponential moving average.
    #[default]
    Ema,
    /// Double exponential moving average.
    Dema,
    /// Triple exponential moving average.
    Tema,
}

impl IndicatorKind {
    /// Conventional display name, e.g. `"EMA"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sma => "SMA",
            Self::Wma => "WMA",
            Self::Ema => "EMA",
            Self::Dema => "DEMA",
            Self::Tema => "TEMA",
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorKind {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sma" | "ma" => Ok(Self::Sma),
            "wma" => Ok(Self::Wma),
            "ema" => Ok(Self::Ema),
            "dema" => Ok(Self::Dema),
            "tema" => Ok(Self::Tema),
            _ => Err(OptionError::UnknownKind(s.to_string())),
        }
    }
}

/// An RGB color carried for rendering collaborators.
///
/// The core never interprets the color; it only stores it and hands it
/// out as a CSS hex string. Changing it does not invalidate computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[must_use]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex form, e.g. `"#ff9900"`.
    #[must_use]
    pub fn to_css_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(OptionError::InvalidColor(s.to_string()));
        }
        let channel = |range| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| OptionError::InvalidColor(s.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl TryFrom<String> for Color {
    type Error = OptionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_css_hex()
    }
}

/// Options recognized by an indicator.
///
/// `field` may be cleared entirely; extraction then yields no values and
/// the output goes all-absent on the next recomputation. `name`,
/// `short_name`, and `series_color` are display metadata for legend and
/// renderer collaborators and never affect computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorOptions {
    /// Window length in valid values.
    #[serde(default = "default_period")]
    pub period: usize,
    /// Price field fed into the algorithm.
    #[serde(default = "default_field")]
    pub field: Option<PriceField>,
    /// Display name, e.g. `"Moving Average"`.
    #[serde(default)]
    pub name: Option<String>,
    /// Abbreviated display name, e.g. `"MA"`.
    #[serde(default)]
    pub short_name: Option<String>,
    /// Stroke/fill color for the rendered series.
    #[serde(default)]
    pub series_color: Option<Color>,
}

fn default_period() -> usize {
    DEFAULT_PERIOD
}

fn default_field() -> Option<PriceField> {
    Some(PriceField::Close)
}

impl Default for IndicatorOptions {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            field: Some(PriceField::Close),
            name: None,
            short_name: None,
            series_color: None,
        }
    }
}
