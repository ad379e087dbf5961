use chrono::{DateTime, Utc};
use serde_json::Value;
use stochboard_core::common::{AssetPair, Interval};
use stochboard_core::market::entity::{Candle, RawOhlcRow, Series};
use tracing::debug;

/// # Summary
/// 将交易所原始行标准化为 K 线序列。
///
/// # Logic
/// 1. 只保留 time、open、high、low、close、volume 六个字段，time 更名为 date。
/// 2. 逐字段解析为数值，解析失败的字段记为未定义，不影响同行其它字段。
/// 3. 保持输入顺序，不丢弃任何行。
///
/// # Arguments
/// * `pair`: 交易对。
/// * `interval`: 采样周期。
/// * `rows`: 上游返回的原始行。
///
/// # Returns
/// 与输入等长、顺序一致的 Series。
pub fn normalize(pair: &AssetPair, interval: Interval, rows: &[RawOhlcRow]) -> Series {
    let candles: Vec<Candle> = rows.iter().map(normalize_row).collect();

    let undefined: usize = candles.iter().map(Candle::undefined_fields).sum();
    if undefined > 0 {
        debug!(
            pair = %pair,
            rows = candles.len(),
            undefined,
            "normalized series contains undefined fields"
        );
    }

    Series {
        pair: pair.clone(),
        interval,
        candles,
    }
}

fn normalize_row(row: &RawOhlcRow) -> Candle {
    Candle {
        date: parse_timestamp(&row.time),
        open: parse_number(&row.open),
        high: parse_number(&row.high),
        low: parse_number(&row.low),
        close: parse_number(&row.close),
        volume: parse_number(&row.volume),
    }
}

/// # Summary
/// 将 JSON 数字或数字字符串解析为有限浮点数。
///
/// # Returns
/// 非数字、null、NaN、无穷大均返回 None。
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// # Summary
/// 将整数 unix 秒 (数字或字符串) 解析为 UTC 时间。
///
/// # Returns
/// 带小数、越界或非数字时返回 None。
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let secs = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    DateTime::from_timestamp(secs, 0)
}
