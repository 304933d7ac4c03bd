//! The shared model pipeline.
//!
//! fetch -> cut -> extreme candle -> ATR -> range -> ladder -> intersect.
//! Nothing here retries; every failure is returned to the caller as-is.

use super::error::ModelError;
use super::params::{LadderSpec, ModelParams};
use super::result::{LadderInfo, ModelResult, PeriodReference};
use crate::data::{CandleProvider, DataError};
use crate::domain::CandleSeries;
use crate::indicators::{Atr, Indicator};
use crate::levels::{
    build_range, find_extreme_candle, intersect, round_price, Divider, LevelSequence, PeriodSpan,
    SequenceError,
};
use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

/// Candles of the cut window included in every result.
pub const RECENT_CANDLES: usize = 10;

/// Run one model for `params` with the ladder described by `ladder`.
///
/// Only candles dated strictly before `params.analysis_date` influence the
/// result. The prior-year ladder is the one exception that needs a second
/// fetch; it only ever asks for a calendar year that ended before the
/// analysis date.
pub fn run_model(
    provider: &dyn CandleProvider,
    params: &ModelParams,
    ladder: &LadderSpec,
) -> Result<ModelResult, ModelError> {
    params.validate()?;
    let ticker = params.ticker.trim();
    let kind = ladder.kind();
    let (start, end) = params.fetch_window()?;
    debug!(%kind, ticker, %start, %end, provider = provider.name(), "fetching candles");

    let history = provider
        .fetch_daily_candles(ticker, start, end)
        .map_err(|e| ModelError::from_data(ticker, e))?;
    if history.is_empty() {
        return Err(ModelError::NoData {
            ticker: ticker.to_string(),
        });
    }

    let cut = history.before(params.analysis_date);
    if cut.is_empty() {
        return Err(ModelError::NoDataBeforeCutoff {
            ticker: ticker.to_string(),
            analysis_date: params.analysis_date,
        });
    }

    let extreme =
        find_extreme_candle(&cut, params.mode).ok_or_else(|| ModelError::InsufficientHistory {
            ticker: ticker.to_string(),
            available: cut.len(),
        })?;

    let insufficient_atr = || ModelError::InsufficientAtrData {
        ticker: ticker.to_string(),
        period: params.atr_period,
        available: cut.len(),
        analysis_date: params.analysis_date,
    };
    let atr = Atr::new(params.atr_period)
        .current(cut.candles())
        .ok_or_else(insufficient_atr)?;
    let range = build_range(
        &extreme.candle,
        atr,
        params.volatility.multiplier(),
        params.mode,
    )
    .ok_or_else(insufficient_atr)?;
    debug!(
        %kind,
        reference = %extreme.candle.date,
        atr,
        lower = range.lower,
        upper = range.upper,
        "volatility range"
    );

    let (sequence, reference) = build_ladder(provider, params, ladder, &history)?;
    debug!(
        %kind,
        start = sequence.start(),
        step = sequence.step(),
        len = sequence.len(),
        "level sequence"
    );

    let levels = intersect(&sequence, &range, params.mode, ladder.expansion_policy());
    info!(
        %kind,
        ticker,
        in_range = levels.in_range.len(),
        expansions = levels.expansions.len(),
        "model complete"
    );

    Ok(ModelResult {
        kind,
        ticker: ticker.to_string(),
        analysis_date: params.analysis_date,
        mode: params.mode,
        volatility: params.volatility,
        in_range_levels: levels.in_range,
        expansion_levels: levels.expansions,
        range,
        basis: round_price(extreme.candle.midpoint()),
        reference_candle_date: extreme.candle.date,
        atr_value: round_price(atr),
        ladder: LadderInfo {
            start: sequence.start(),
            step: sequence.step(),
            len: sequence.len(),
            reference,
        },
        recent_candles: cut.tail(RECENT_CANDLES).to_vec(),
    })
}

fn build_ladder(
    provider: &dyn CandleProvider,
    params: &ModelParams,
    ladder: &LadderSpec,
    history: &CandleSeries,
) -> Result<(LevelSequence, Option<PeriodReference>), ModelError> {
    let ticker = params.ticker.trim();
    match *ladder {
        LadderSpec::FixedGrid { step } => {
            let sequence = LevelSequence::fixed_grid(step)
                .map_err(|e| ModelError::InvalidParameter(format!("fixed grid: {e}")))?;
            Ok((sequence, None))
        }
        LadderSpec::PriorYear { divider } => {
            let year = params.analysis_date.year() - 1;
            let (start, end) = NaiveDate::from_ymd_opt(year, 1, 1)
                .zip(NaiveDate::from_ymd_opt(year, 12, 31))
                .ok_or_else(|| ModelError::InvalidParameter(format!("year {year} out of range")))?;
            debug!(ticker, year, "fetching prior year");
            let series = match provider.fetch_daily_candles(ticker, start, end) {
                Ok(series) => series.in_year(year),
                Err(DataError::NoData { .. }) => CandleSeries::empty(),
                Err(source) => {
                    return Err(ModelError::Provider {
                        ticker: ticker.to_string(),
                        source,
                    })
                }
            };
            period_ladder(ticker, year.to_string(), &series, divider)
        }
        LadderSpec::PriorMonth { divider } => {
            let (year, month) = previous_month(params.analysis_date);
            let series = history.in_month(year, month);
            period_ladder(ticker, format!("{year}-{month:02}"), &series, divider)
        }
    }
}

fn period_ladder(
    ticker: &str,
    label: String,
    series: &CandleSeries,
    divider: Divider,
) -> Result<(LevelSequence, Option<PeriodReference>), ModelError> {
    let Some(span) = PeriodSpan::from_series(series) else {
        return Err(ModelError::MissingPeriodData {
            ticker: ticker.to_string(),
            period: label,
        });
    };

    let sequence = LevelSequence::range_derived(span, divider).map_err(|e| match e {
        SequenceError::DegenerateSpan { low, high } => ModelError::InvalidPeriodSpan {
            ticker: ticker.to_string(),
            period: label.clone(),
            low,
            high,
        },
        other => ModelError::InvalidParameter(format!("{label} ladder: {other}")),
    })?;

    let reference = PeriodReference {
        label,
        low: span.low,
        high: span.high,
        span: round_price(span.span()),
        divider: divider.value(),
    };
    Ok((sequence, Some(reference)))
}

fn previous_month(date: NaiveDate) -> (i32, u32) {
    match date.month() {
        1 => (date.year() - 1, 12),
        m => (date.year(), m - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryProvider;
    use crate::domain::{Candle, SearchMode};
    use chrono::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Flat daily candles from `start` for `days` days: range 10, midpoint 100.
    fn flat(start: NaiveDate, days: i64) -> CandleSeries {
        CandleSeries::new(
            (0..days)
                .map(|i| Candle::new(start + Duration::days(i), 100.0, 105.0, 95.0, 100.0))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn previous_month_wraps_year() {
        assert_eq!(previous_month(d(2024, 1, 15)), (2023, 12));
        assert_eq!(previous_month(d(2024, 3, 1)), (2024, 2));
    }

    #[test]
    fn fixed_grid_on_flat_market() {
        let provider = InMemoryProvider::new().with_series("FLAT", flat(d(2024, 1, 1), 60));
        let params = ModelParams::new("FLAT", d(2024, 2, 20));
        let result = run_model(&provider, &params, &LadderSpec::FixedGrid { step: 5.0 }).unwrap();

        // TR = 10 every day, band = [100, 110]
        assert_eq!(result.atr_value, 10.0);
        assert_eq!(result.range.lower, 100.0);
        assert_eq!(result.range.upper, 110.0);
        assert_eq!(result.in_range_levels, vec![110.0, 105.0, 100.0]);
        assert_eq!(result.expansion_levels, vec![130.0, 125.0, 120.0, 115.0]);
        // ties resolve to the earliest of the last three candles
        assert_eq!(result.reference_candle_date, d(2024, 2, 17));
        assert_eq!(result.recent_candles.len(), RECENT_CANDLES);
        assert_eq!(result.recent_candles.last().unwrap().date, d(2024, 2, 19));
        assert!(result.ladder.reference.is_none());
    }

    #[test]
    fn prior_month_flat_span_is_invalid() {
        let provider = InMemoryProvider::new().with_series("FLAT", flat(d(2024, 1, 1), 60));
        let params = ModelParams::new("FLAT", d(2024, 2, 20));
        // every January candle has low 95 and high 105, so this is fine
        let ok = run_model(
            &provider,
            &params,
            &LadderSpec::PriorMonth {
                divider: Divider::Sixteen,
            },
        )
        .unwrap();
        let reference = ok.ladder.reference.unwrap();
        assert_eq!(reference.label, "2024-01");
        assert_eq!(reference.span, 10.0);
        assert_eq!(ok.ladder.step, 0.625);

        let degenerate = CandleSeries::new(
            (0..60)
                .map(|i| Candle::new(d(2024, 1, 1) + Duration::days(i), 100.0, 100.0, 100.0, 100.0))
                .collect(),
        )
        .unwrap();
        let provider = InMemoryProvider::new().with_series("FLAT", degenerate);
        let err = run_model(
            &provider,
            &params,
            &LadderSpec::PriorMonth {
                divider: Divider::Sixteen,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidPeriodSpan { .. }));
    }
}
