use chrono::NaiveDate;
use stochboard_core::indicator::entity::{Crossover, EnrichedCandle, SeriesSummary, Signal};

/// # Summary
/// 按日期闭区间筛选用于展示的行。
///
/// # Logic
/// 1. 指标在完整历史上计算完毕后才调用本函数，窗口不受筛选影响。
/// 2. 以 UTC 日期比较，`start`/`end` 缺省表示不设边界。
///
/// # Returns
/// 落在区间内的行，`start > end` 时为空。
pub fn filter_range(
    candles: &[EnrichedCandle],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<EnrichedCandle> {
    candles
        .iter()
        .filter(|c| {
            let day = c.date.date_naive();
            start.is_none_or(|s| day >= s) && end.is_none_or(|e| day <= e)
        })
        .cloned()
        .collect()
}

/// # Summary
/// 汇总仪表盘指标卡片所需的统计量。
///
/// # Logic
/// 1. 统计 Buy / Sell 信号及交叉事件的数量。
/// 2. 逐期收益率 `close[i] / close[i-1] - 1` 求均值，跳过前值为 0 的无效点。
/// 3. 收盘价求均值。
///
/// # Returns
/// 行数不足时对应的均值为 None。
pub fn summarize(candles: &[EnrichedCandle]) -> SeriesSummary {
    let count_signal = |s: Signal| candles.iter().filter(|c| c.signal == s).count();
    let count_cross = |x: Crossover| candles.iter().filter(|c| c.crossover == Some(x)).count();

    let returns: Vec<f64> = candles
        .windows(2)
        .filter_map(|w| match w {
            [prev, cur] if prev.close != 0.0 => Some(cur.close / prev.close - 1.0),
            _ => None,
        })
        .collect();

    SeriesSummary {
        rows: candles.len(),
        buy_count: count_signal(Signal::Buy),
        sell_count: count_signal(Signal::Sell),
        buy_crossovers: count_cross(Crossover::Buy),
        sell_crossovers: count_cross(Crossover::Sell),
        mean_return: mean(returns.iter().copied()),
        mean_close: mean(candles.iter().map(|c| c.close)),
        last_signal: candles.last().map(|c| c.signal),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0_u32), |(sum, n), v| (sum + v, n.saturating_add(1)));
    (n > 0).then(|| sum / f64::from(n))
}
