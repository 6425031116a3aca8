//! Moving-average indicator engine for OHLC chart series.
//!
//! Computes SMA, WMA, EMA, DEMA, and TEMA over ordered OHLC data and
//! decides when a recomputation is required: an
//! [`Indicator`](engine::indicator::Indicator) observes its upstream
//! [series](engine::series::SeriesHandle) and its own configuration,
//! and rebuilds its full output sequence only when something actually
//! changed. Output stays index-aligned with the input; positions inside
//! an algorithm's warm-up window, or fed by absent source values, carry
//! explicit `None`s rather than sentinels.

pub mod engine;
