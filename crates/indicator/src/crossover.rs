use stochboard_core::indicator::entity::{Crossover, EnrichedCandle};

/// # Summary
/// 在增强序列上标记 %K 与 %D 的交叉事件。
///
/// # Logic
/// 1. 第 i 行 (i > 0) 若 %K 上穿 %D 且 %K 低于 `oversold`，记为买入交叉。
/// 2. 若 %K 下穿 %D 且 %K 高于 `overbought`，记为卖出交叉。
/// 3. 首行没有前一行可比较，不会产生交叉。
///
/// # Arguments
/// * `candles`: 已丢弃未定义行的序列，原地写入 `crossover`。
/// * `oversold`: 超卖阈值。
/// * `overbought`: 超买阈值。
pub fn mark_crossovers(candles: &mut [EnrichedCandle], oversold: f64, overbought: f64) {
    let events: Vec<Option<Crossover>> = candles
        .windows(2)
        .map(|pair| match pair {
            [prev, cur] => detect(prev, cur, oversold, overbought),
            _ => None,
        })
        .collect();

    if let Some(first) = candles.first_mut() {
        first.crossover = None;
    }
    for (candle, event) in candles.iter_mut().skip(1).zip(events) {
        candle.crossover = event;
    }
}

fn detect(
    prev: &EnrichedCandle,
    cur: &EnrichedCandle,
    oversold: f64,
    overbought: f64,
) -> Option<Crossover> {
    if cur.pct_k > cur.pct_d && prev.pct_k < prev.pct_d && cur.pct_k < oversold {
        Some(Crossover::Buy)
    } else if cur.pct_k < cur.pct_d && prev.pct_k > prev.pct_d && cur.pct_k > overbought {
        Some(Crossover::Sell)
    } else {
        None
    }
}
