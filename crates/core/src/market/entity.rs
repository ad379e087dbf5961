use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{AssetPair, Interval};

/// # Summary
/// 交易所返回的单行原始 OHLC 数据，字段保持上游的原始 JSON 形态。
///
/// # Invariants
/// - 不做任何类型约束：价格可能是数字、数字字符串，也可能是脏数据。
/// - `vwap` 与 `count` 仅随行携带，标准化阶段会被丢弃。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOhlcRow {
    // 周期开始时间 (unix 秒)
    pub time: Value,
    pub open: Value,
    pub high: Value,
    pub low: Value,
    pub close: Value,
    // 成交量加权均价
    pub vwap: Value,
    pub volume: Value,
    // 成交笔数
    pub count: Value,
}

/// # Summary
/// 标准化后的单根 K 线。
///
/// # Invariants
/// - `None` 表示该字段无法解析 (未定义)，不代表整行无效。
/// - 上游数据可信，不强制 `low <= open,close <= high`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    // K 线开始时间
    pub date: Option<DateTime<Utc>>,
    // 开盘价
    pub open: Option<f64>,
    // 最高价
    pub high: Option<f64>,
    // 最低价
    pub low: Option<f64>,
    // 收盘价
    pub close: Option<f64>,
    // 成交量
    pub volume: Option<f64>,
}

impl Candle {
    /// 统计该行未定义字段的数量
    pub fn undefined_fields(&self) -> usize {
        let prices = [self.open, self.high, self.low, self.close, self.volume];
        prices.iter().filter(|v| v.is_none()).count() + usize::from(self.date.is_none())
    }
}

/// # Summary
/// 单个交易对、单个周期下的有序 K 线序列。
///
/// # Invariants
/// - 顺序与上游请求的时间升序一致，本结构不重新排序。
/// - 构造后不可变，每次抓取生成新的序列。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub pair: AssetPair,
    pub interval: Interval,
    pub candles: Vec<Candle>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}
