use stochboard_core::indicator::entity::{EnrichedCandle, EnrichedSeries, IndicatorParams, Signal};
use stochboard_core::indicator::error::IndicatorError;
use stochboard_core::market::entity::{Candle, Series};
use tracing::{debug, warn};

use crate::crossover::mark_crossovers;
use crate::rolling::{rolling_max, rolling_mean, rolling_min};

/// # Summary
/// 计算随机震荡指标、可选均线及买卖信号。
///
/// # Logic
/// 1. 校验窗口参数，非法参数直接返回配置错误。
/// 2. 以 `period` 为窗口计算区间最高价与最低价。
/// 3. 计算快线 %K，价格区间为零时记为未定义。
/// 4. 以 `smoothing` 为窗口对 %K 求均值得到慢线 %D。
/// 5. 若给定 `moving_average`，计算收盘价简单均线。
/// 6. 丢弃任一字段未定义的行，其余行按原相对顺序连续排列并打上信号。
/// 7. 在结果序列上标记超买/超卖区域的交叉。
///
/// # Arguments
/// * `series`: 标准化后的 K 线序列。
/// * `params`: 窗口与阈值参数。
///
/// # Returns
/// 成功返回增强序列 (可能为空)，参数非法返回 IndicatorError。
pub fn compute_indicators(
    series: &Series,
    params: &IndicatorParams,
) -> Result<EnrichedSeries, IndicatorError> {
    params.validate()?;

    let column = |f: fn(&Candle) -> Option<f64>| -> Vec<Option<f64>> {
        series.candles.iter().map(f).collect()
    };
    let closes = column(|c| c.close);

    let period_high = rolling_max(&column(|c| c.high), params.period);
    let period_low = rolling_min(&column(|c| c.low), params.period);
    let pct_k: Vec<Option<f64>> = closes
        .iter()
        .zip(period_high.iter().zip(&period_low))
        .map(|(close, (high, low))| fast_oscillator((*close)?, (*high)?, (*low)?))
        .collect();
    let pct_d = rolling_mean(&pct_k, params.smoothing);
    let moving_average = params.moving_average.map(|w| rolling_mean(&closes, w));

    let mut candles = Vec::with_capacity(series.len());
    for (i, candle) in series.candles.iter().enumerate() {
        let ma = match &moving_average {
            // 未要求均线时该列整体省略
            None => Some(None),
            Some(values) => values.get(i).copied().flatten().map(Some),
        };
        let row = ma.and_then(|ma| {
            enrich(
                candle,
                period_high.get(i).copied().flatten()?,
                period_low.get(i).copied().flatten()?,
                pct_k.get(i).copied().flatten()?,
                pct_d.get(i).copied().flatten()?,
                ma,
            )
        });
        if let Some(row) = row {
            candles.push(row);
        }
    }

    mark_crossovers(&mut candles, params.oversold, params.overbought);

    let dropped = series.len() - candles.len();
    debug!(
        pair = %series.pair,
        interval = %series.interval,
        input = series.len(),
        emitted = candles.len(),
        dropped,
        "computed stochastic oscillator"
    );
    if candles.is_empty() && !series.is_empty() {
        warn!(
            pair = %series.pair,
            input = series.len(),
            period = params.period,
            smoothing = params.smoothing,
            "every row was dropped; windows exceed usable history"
        );
    }

    Ok(EnrichedSeries {
        pair: series.pair.clone(),
        interval: series.interval,
        params: *params,
        candles,
        dropped,
    })
}

/// # Summary
/// 快线 %K = (close - low) * 100 / (high - low)。
///
/// # Returns
/// 区间宽度恰好为 0 (横盘) 或结果非有限数时返回 None。
pub fn fast_oscillator(close: f64, period_high: f64, period_low: f64) -> Option<f64> {
    let range = period_high - period_low;
    if range == 0.0 {
        return None;
    }
    let value = (close - period_low) * 100.0 / range;
    value.is_finite().then_some(value)
}

fn enrich(
    candle: &Candle,
    period_high: f64,
    period_low: f64,
    pct_k: f64,
    pct_d: f64,
    moving_average: Option<f64>,
) -> Option<EnrichedCandle> {
    Some(EnrichedCandle {
        date: candle.date?,
        open: candle.open?,
        high: candle.high?,
        low: candle.low?,
        close: candle.close?,
        volume: candle.volume?,
        period_high,
        period_low,
        pct_k,
        pct_d,
        moving_average,
        signal: if pct_k > pct_d { Signal::Buy } else { Signal::Sell },
        crossover: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use stochboard_core::common::{AssetPair, Interval};

    fn series(rows: &[(f64, f64, f64)]) -> Series {
        let candles = rows
            .iter()
            .zip(0_i64..)
            .map(|(&(high, low, close), day)| Candle {
                date: DateTime::from_timestamp(1_700_000_000 + day * 86_400, 0),
                open: Some(close),
                high: Some(high),
                low: Some(low),
                close: Some(close),
                volume: Some(1.0),
            })
            .collect();
        Series {
            pair: AssetPair::new("SOLUSD").unwrap(),
            interval: Interval::Day1,
            candles,
        }
    }

    fn params(period: u32, smoothing: u32, ma: Option<u32>) -> IndicatorParams {
        IndicatorParams {
            period,
            smoothing,
            moving_average: ma,
            ..IndicatorParams::default()
        }
    }

    #[test]
    fn test_fast_oscillator_bounds() {
        assert_eq!(fast_oscillator(9.0, 13.0, 8.0), Some(20.0));
        assert_eq!(fast_oscillator(13.0, 13.0, 8.0), Some(100.0));
        assert_eq!(fast_oscillator(8.0, 13.0, 8.0), Some(0.0));
        assert_eq!(fast_oscillator(8.0, 8.0, 8.0), None);
    }

    #[test]
    fn test_four_day_scenario() {
        let s = series(&[(11.0, 9.0, 10.0), (13.0, 11.0, 12.0), (10.0, 8.0, 9.0), (16.0, 14.0, 15.0)]);
        let out = compute_indicators(&s, &params(2, 2, None)).unwrap();

        assert_eq!(out.candles.len(), 2);
        assert_eq!(out.dropped, 2);

        let row2 = &out.candles[0];
        assert_eq!(row2.period_high, 13.0);
        assert_eq!(row2.period_low, 8.0);
        assert!((row2.pct_k - 20.0).abs() < 1e-9);

        let row3 = &out.candles[1];
        assert_eq!(row3.period_high, 16.0);
        assert_eq!(row3.period_low, 8.0);
        assert!((row3.pct_k - 87.5).abs() < 1e-9);
        assert!((row3.pct_d - 53.75).abs() < 1e-9);
        assert_eq!(row3.signal, Signal::Buy);
        assert_eq!(row3.moving_average, None);
    }

    #[test]
    fn test_flat_range_row_is_dropped() {
        // 前两根完全横盘，%K 未定义
        let s = series(&[(5.0, 5.0, 5.0), (5.0, 5.0, 5.0), (7.0, 5.0, 6.0), (8.0, 6.0, 7.0)]);
        let out = compute_indicators(&s, &params(2, 1, None)).unwrap();

        assert_eq!(out.candles.len(), 2);
        assert_eq!(out.dropped, 2);
        assert!(out.candles.iter().all(|c| c.period_high > c.period_low));
    }

    #[test]
    fn test_moving_average_extends_drop() {
        let rows: Vec<(f64, f64, f64)> = (0..10)
            .map(|i| {
                let base = 10.0 + f64::from(i);
                (base + 1.0, base - 1.0, base)
            })
            .collect();
        let s = series(&rows);
        let out = compute_indicators(&s, &params(2, 2, Some(5))).unwrap();

        // 均线要求前 4 行被丢弃，比 %K/%D 的 2 行更多
        assert_eq!(out.candles.len(), 6);
        let first = &out.candles[0];
        assert!((first.moving_average.unwrap() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_windows_exceeding_history_yield_empty() {
        let s = series(&[(11.0, 9.0, 10.0), (13.0, 11.0, 12.0)]);
        let out = compute_indicators(&s, &params(14, 3, None)).unwrap();
        assert!(out.candles.is_empty());
        assert_eq!(out.dropped, 2);
    }

    #[test]
    fn test_zero_window_is_configuration_error() {
        let s = series(&[(11.0, 9.0, 10.0)]);
        let err = compute_indicators(&s, &params(0, 3, None)).unwrap_err();
        assert_eq!(err, IndicatorError::ZeroWindow { name: "period" });
    }

    #[test]
    fn test_undefined_price_drops_dependent_rows() {
        let mut s = series(&[
            (11.0, 9.0, 10.0),
            (13.0, 11.0, 12.0),
            (10.0, 8.0, 9.0),
            (16.0, 14.0, 15.0),
            (17.0, 15.0, 16.0),
        ]);
        s.candles[1].high = None;
        let out = compute_indicators(&s, &params(2, 1, None)).unwrap();
        // 第 1、2 行的窗口都包含缺失的 high
        assert_eq!(out.candles.len(), 2);
        assert_eq!(out.candles[0].close, 15.0);
    }
}
