//! Indicator orchestration and invalidation.
//!
//! An [`Indicator`] owns its configuration, its references to the
//! upstream price/volume series, and the derived output sequence. Any
//! qualifying change (a series reference swap, a series lifecycle
//! event, a period change, a field change to a set value) flips a
//! dirty flag; the next [`evaluate`](Indicator::evaluate) then runs one
//! full recomputation pass and swaps the output in as a unit. There is
//! no partial recomputation: dirty means the whole sequence is rebuilt.

use crate::engine::config::{Color, IndicatorKind, IndicatorOptions};
use crate::engine::fields::{extract_series, PriceField};
use crate::engine::indicators::{
    dema::Dema, ema::Ema, sma::Sma, tema::Tema, wma::Wma, MovingAverage,
};
use crate::engine::point::ComputedPoint;
use crate::engine::series::{SeriesHandle, Subscription};

use serde::Serialize;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, instrument};

/// Metadata attached to the indicator's output after each evaluation,
/// for consumers that label or export the current configuration
/// alongside the values.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CustomData {
    pub period: usize,
    pub field: Option<String>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    /// CSS hex form of the configured series color.
    pub series_color: Option<String>,
}

/// Plain display values pushed to a legend collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub name: String,
    pub short_name: String,
    pub period: usize,
    pub field: Option<String>,
    /// CSS hex color, when one is configured.
    pub color: Option<String>,
}

/// A configured moving-average indicator over one price series.
///
/// Dropping the indicator releases its series subscriptions; a replaced
/// or disposed indicator can never be dirtied by stale notifications.
pub struct Indicator {
    kind: IndicatorKind,
    options: IndicatorOptions,
    algorithm: Box<dyn MovingAverage>,
    price_series: Option<SeriesHandle>,
    volume_series: Option<SeriesHandle>,
    price_subscription: Option<Subscription>,
    volume_subscription: Option<Subscription>,
    dirty: Rc<Cell<bool>>,
    output: Rc<Vec<ComputedPoint>>,
    custom_data: CustomData,
}

impl Indicator {
    /// Creates an indicator of the given kind. It starts dirty and
    /// without data sources; attach a price series and call
    /// [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn new(kind: IndicatorKind, options: IndicatorOptions) -> Self {
        debug!(%kind, period = options.period, "creating indicator");

        let algorithm: Box<dyn MovingAverage> = match kind {
            IndicatorKind::Sma => Box::new(Sma),
            IndicatorKind::Wma => Box::new(Wma),
            IndicatorKind::Ema => Box::new(Ema),
            IndicatorKind::Dema => Box::new(Dema),
            IndicatorKind::Tema => Box::new(Tema),
        };

        let mut indicator = Self {
            kind,
            options,
            algorithm,
            price_series: None,
            volume_series: None,
            price_subscription: None,
            volume_subscription: None,
            dirty: Rc::new(Cell::new(true)),
            output: Rc::new(Vec::new()),
            custom_data: CustomData::default(),
        };
        indicator.refresh_custom_data();
        indicator
    }

    /// Attaches, replaces, or detaches the price series.
    ///
    /// The old subscription is released before the new series is
    /// observed. Passing the handle already attached is a no-op.
    #[instrument(skip(self, series))]
    pub fn set_price_series(&mut self, series: Option<SeriesHandle>) {
        if same_reference(&self.price_series, &series) {
            return;
        }
        self.price_subscription.take();
        self.price_series = series;
        if let Some(handle) = &self.price_series {
            self.price_subscription = Some(watch(handle, &self.dirty));
        }
        self.mark_dirty();
    }

    /// Attaches, replaces, or detaches the volume series.
    ///
    /// Moving averages read no volume values, but volume lifecycle
    /// events still invalidate the output like price events do.
    #[instrument(skip(self, series))]
    pub fn set_volume_series(&mut self, series: Option<SeriesHandle>) {
        if same_reference(&self.volume_series, &series) {
            return;
        }
        self.volume_subscription.take();
        self.volume_series = series;
        if let Some(handle) = &self.volume_series {
            self.volume_subscription = Some(watch(handle, &self.dirty));
        }
        self.mark_dirty();
    }

    /// Sets the window length. A changed value invalidates the output.
    pub fn set_period(&mut self, period: usize) {
        if self.options.period != period {
            debug!(period, "period changed");
            self.options.period = period;
            self.mark_dirty();
        }
        self.refresh_custom_data();
    }

    /// Sets or clears the price field.
    ///
    /// Changing to a set field invalidates the output. Clearing the
    /// field does not; the cleared selector only takes effect on the
    /// next recomputation triggered elsewhere.
    pub fn set_field(&mut self, field: Option<PriceField>) {
        if self.options.field != field {
            self.options.field = field;
            if let Some(field) = field {
                debug!(%field, "field changed");
                self.mark_dirty();
            }
        }
        self.refresh_custom_data();
    }

    /// Sets the display name. Display metadata never invalidates.
    pub fn set_name(&mut self, name: Option<String>) {
        self.options.name = name;
        self.refresh_custom_data();
    }

    /// Sets the abbreviated display name.
    pub fn set_short_name(&mut self, short_name: Option<String>) {
        self.options.short_name = short_name;
        self.refresh_custom_data();
    }

    /// Sets the series color. Colors affect rendering collaborators
    /// only; computation is untouched.
    pub fn set_series_color(&mut self, color: Option<Color>) {
        self.options.series_color = color;
        self.refresh_custom_data();
    }

    /// Recomputes if dirty, otherwise returns the cached output.
    ///
    /// The returned sequence is index-aligned with the price series'
    /// current data and is replaced wholesale on recomputation: a
    /// clone of the `Rc` taken before a recompute keeps observing the
    /// old, fully consistent sequence.
    #[instrument(skip(self), fields(kind = %self.kind))]
    pub fn evaluate(&mut self) -> Rc<Vec<ComputedPoint>> {
        if !self.dirty.get() {
            debug!("state clean, returning cached output");
            return Rc::clone(&self.output);
        }

        let extracted = match &self.price_series {
            Some(series) => extract_series(&series.points(), self.options.field),
            None => Vec::new(),
        };
        let computed = self.algorithm.compute(&extracted, self.options.period);
        debug!(
            points = computed.len(),
            emitted = computed.iter().filter(|p| p.value.is_some()).count(),
            "recomputed indicator output"
        );

        self.output = Rc::new(computed);
        self.refresh_custom_data();
        self.dirty.set(false);
        Rc::clone(&self.output)
    }

    /// Last computed output without recomputing. O(1).
    #[must_use]
    pub fn output(&self) -> Rc<Vec<ComputedPoint>> {
        Rc::clone(&self.output)
    }

    /// Whether the next [`evaluate`](Self::evaluate) will recompute.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    #[must_use]
    pub fn kind(&self) -> IndicatorKind {
        self.kind
    }

    #[must_use]
    pub fn options(&self) -> &IndicatorOptions {
        &self.options
    }

    /// Metadata attached after the latest evaluation.
    #[must_use]
    pub fn custom_data(&self) -> &CustomData {
        &self.custom_data
    }

    /// Display name: the configured name, or the algorithm's.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.options.name.as_deref().unwrap_or_else(|| self.kind.as_str())
    }

    /// Plain values for a legend collaborator.
    #[must_use]
    pub fn legend_entry(&self) -> LegendEntry {
        LegendEntry {
            name: self.display_name().to_string(),
            short_name: self
                .options
                .short_name
                .clone()
                .unwrap_or_else(|| self.kind.as_str().to_string()),
            period: self.options.period,
            field: self.options.field.map(|f| f.as_str().to_string()),
            color: self.options.series_color.map(Color::to_css_hex),
        }
    }

    fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    fn refresh_custom_data(&mut self) {
        self.custom_data = CustomData {
            period: self.options.period,
            field: self.options.field.map(|f| f.as_str().to_string()),
            name: self.options.name.clone(),
            short_name: self.options.short_name.clone(),
            series_color: self.options.series_color.map(Color::to_css_hex),
        };
    }
}

impl fmt::Debug for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Indicator")
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("dirty", &self.dirty.get())
            .field("output_len", &self.output.len())
            .finish()
    }
}

fn watch(series: &SeriesHandle, dirty: &Rc<Cell<bool>>) -> Subscription {
    let dirty = Rc::clone(dirty);
    series.subscribe(move |_event| dirty.set(true))
}

fn same_reference(current: &Option<SeriesHandle>, next: &Option<SeriesHandle>) -> bool {
    match (current, next) {
        (Some(a), Some(b)) => a.same_series(b),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_util::{bar, close_series};

    fn price_series() -> SeriesHandle {
        SeriesHandle::new(close_series(&[1.0, 2.0, 3.0, 4.0, 5.0]))
    }

    fn sma3() -> Indicator {
        Indicator::new(
            IndicatorKind::Sma,
            IndicatorOptions {
                period: 3,
                ..IndicatorOptions::default()
            },
        )
    }

    #[test]
    fn evaluate_computes_the_configured_average() {
        let mut indicator = sma3();
        indicator.set_price_series(Some(price_series()));
        let out = indicator.evaluate();
        let values: Vec<Option<f64>> = out.iter().map(|p| p.value).collect();
        assert_eq!(
            values,
            vec![None, None, Some(2.0), Some(3.0), Some(4.0)]
        );
        assert!(!indicator.is_dirty());
    }

    #[test]
    fn clean_evaluate_returns_the_same_allocation() {
        let mut indicator = sma3();
        indicator.set_price_series(Some(price_series()));
        let first = indicator.evaluate();
        let second = indicator.evaluate();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn forced_recompute_on_unchanged_input_is_deterministic() {
        let series = price_series();
        let mut indicator = sma3();
        indicator.set_price_series(Some(series.clone()));
        let first = indicator.evaluate();

        // A validation event with no actual edit forces a recompute.
        series.update_data(|_| {});
        assert!(indicator.is_dirty());
        let second = indicator.evaluate();

        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn period_change_invalidates_and_recomputes() {
        let mut indicator = sma3();
        indicator.set_price_series(Some(price_series()));
        let first = indicator.evaluate();

        indicator.set_period(2);
        assert!(indicator.is_dirty());
        let second = indicator.evaluate();
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(second[1].value, Some(1.5));

        // Same period again: no invalidation.
        indicator.set_period(2);
        assert!(!indicator.is_dirty());
    }

    #[test]
    fn setting_a_field_invalidates_clearing_does_not() {
        let mut indicator = sma3();
        indicator.set_price_series(Some(SeriesHandle::new(vec![
            bar(0, 1.0, 4.0, 0.0, 1.0),
            bar(1, 2.0, 6.0, 0.0, 2.0),
            bar(2, 3.0, 8.0, 0.0, 3.0),
        ])));
        let close_out = indicator.evaluate();
        assert_eq!(close_out[2].value, Some(2.0));

        indicator.set_field(Some(PriceField::Hl2));
        assert!(indicator.is_dirty());
        let hl2_out = indicator.evaluate();
        assert_eq!(hl2_out[2].value, Some(3.0));

        // Clearing the field leaves the output untouched until the next
        // recomputation triggered elsewhere.
        indicator.set_field(None);
        assert!(!indicator.is_dirty());
        assert!(Rc::ptr_eq(&indicator.evaluate(), &hl2_out));

        indicator.set_period(2);
        let cleared_out = indicator.evaluate();
        assert!(cleared_out.iter().all(|p| p.value.is_none()));
    }

    #[test]
    fn data_events_invalidate() {
        let series = price_series();
        let mut indicator = sma3();
        indicator.set_price_series(Some(series.clone()));
        indicator.evaluate();

        series.update_data(|points| points.push(bar(5, 6.0, 6.0, 6.0, 6.0)));
        assert!(indicator.is_dirty());
        let out = indicator.evaluate();
        assert_eq!(out.len(), 6);
        assert_eq!(out[5].value, Some(5.0));

        series.set_data(close_series(&[9.0, 9.0, 9.0]));
        assert!(indicator.is_dirty());
        assert_eq!(indicator.evaluate().len(), 3);
    }

    #[test]
    fn volume_events_invalidate_without_affecting_values() {
        let volume = SeriesHandle::new(Vec::new());
        let mut indicator = sma3();
        indicator.set_price_series(Some(price_series()));
        indicator.set_volume_series(Some(volume.clone()));
        let first = indicator.evaluate();

        volume.update_data(|_| {});
        assert!(indicator.is_dirty());
        let second = indicator.evaluate();
        assert_eq!(*first, *second);
    }

    #[test]
    fn replaced_series_stops_dirtying_the_indicator() {
        let old = price_series();
        let new = SeriesHandle::new(close_series(&[7.0, 8.0, 9.0]));
        let mut indicator = sma3();
        indicator.set_price_series(Some(old.clone()));
        indicator.evaluate();

        indicator.set_price_series(Some(new.clone()));
        assert_eq!(old.listener_count(), 0);
        assert_eq!(new.listener_count(), 1);
        indicator.evaluate();

        // Stale notifications from the old series are structurally gone.
        old.set_data(Vec::new());
        assert!(!indicator.is_dirty());
    }

    #[test]
    fn reattaching_the_same_series_is_a_no_op() {
        let series = price_series();
        let mut indicator = sma3();
        indicator.set_price_series(Some(series.clone()));
        indicator.evaluate();

        indicator.set_price_series(Some(series.clone()));
        assert!(!indicator.is_dirty());
        assert_eq!(series.listener_count(), 1);
    }

    #[test]
    fn dropping_the_indicator_releases_subscriptions() {
        let series = price_series();
        let mut indicator = sma3();
        indicator.set_price_series(Some(series.clone()));
        assert_eq!(series.listener_count(), 1);
        drop(indicator);
        assert_eq!(series.listener_count(), 0);
    }

    #[test]
    fn no_price_series_means_empty_output() {
        let mut indicator = sma3();
        let out = indicator.evaluate();
        assert!(out.is_empty());
    }

    #[test]
    fn display_metadata_never_invalidates() {
        let mut indicator = sma3();
        indicator.set_price_series(Some(price_series()));
        let first = indicator.evaluate();

        indicator.set_name(Some("Simple MA".to_string()));
        indicator.set_short_name(Some("SMA(3)".to_string()));
        indicator.set_series_color(Some(Color::new(0, 0, 0)));
        assert!(!indicator.is_dirty());
        assert!(Rc::ptr_eq(&first, &indicator.evaluate()));
        assert_eq!(indicator.custom_data().series_color.as_deref(), Some("#000000"));
    }

    #[test]
    fn custom_data_reflects_configuration() {
        let mut indicator = Indicator::new(
            IndicatorKind::Dema,
            IndicatorOptions {
                period: 9,
                field: Some(PriceField::Hl2),
                name: Some("Double EMA".to_string()),
                short_name: Some("DEMA".to_string()),
                series_color: Some(Color::new(0xff, 0x99, 0x00)),
            },
        );
        indicator.set_price_series(Some(price_series()));
        indicator.evaluate();

        let custom = indicator.custom_data();
        assert_eq!(custom.period, 9);
        assert_eq!(custom.field.as_deref(), Some("hl/2"));
        assert_eq!(custom.name.as_deref(), Some("Double EMA"));
        assert_eq!(custom.short_name.as_deref(), Some("DEMA"));
        assert_eq!(custom.series_color.as_deref(), Some("#ff9900"));
    }

    #[test]
    fn legend_entry_falls_back_to_kind_names() {
        let indicator = Indicator::new(IndicatorKind::Tema, IndicatorOptions::default());
        let entry = indicator.legend_entry();
        assert_eq!(entry.name, "TEMA");
        assert_eq!(entry.short_name, "TEMA");
        assert_eq!(entry.period, crate::engine::config::DEFAULT_PERIOD);
        assert_eq!(entry.field.as_deref(), Some("close"));
        assert_eq!(entry.color, None);
    }
}
