use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{AssetPair, Interval};
use crate::indicator::error::IndicatorError;

/// # Summary
/// 随机震荡指标的窗口与阈值参数。
///
/// # Invariants
/// - `period`、`smoothing` 以及给定的 `moving_average` 必须大于 0。
/// - `0 <= oversold < overbought <= 100`。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    // 高低区间回看窗口 (%K)
    pub period: u32,
    // %K 的平滑窗口 (%D)
    pub smoothing: u32,
    // 收盘价简单移动平均窗口，None 表示不计算
    pub moving_average: Option<u32>,
    // 金叉信号要求的 %K 上限
    pub oversold: f64,
    // 死叉信号要求的 %K 下限
    pub overbought: f64,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            period: 14,
            smoothing: 3,
            moving_average: Some(26),
            oversold: 20.0,
            overbought: 80.0,
        }
    }
}

impl IndicatorParams {
    /// # Summary
    /// 在计算前校验参数。
    ///
    /// # Returns
    /// 任一窗口为 0 或阈值越界时返回 IndicatorError。
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.period == 0 {
            return Err(IndicatorError::ZeroWindow { name: "period" });
        }
        if self.smoothing == 0 {
            return Err(IndicatorError::ZeroWindow { name: "smoothing" });
        }
        if self.moving_average == Some(0) {
            return Err(IndicatorError::ZeroWindow {
                name: "moving_average",
            });
        }
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(self.oversold) || !in_range(self.overbought) || self.oversold >= self.overbought {
            return Err(IndicatorError::InvalidThresholds {
                oversold: self.oversold,
                overbought: self.overbought,
            });
        }
        Ok(())
    }
}

/// # Summary
/// 基于 %K 与 %D 相对位置的买卖方向。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Buy,
    Sell,
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::Buy => write!(f, "Buy"),
            Signal::Sell => write!(f, "Sell"),
        }
    }
}

/// # Summary
/// %K 穿越 %D 的交叉事件，只在超卖/超买区域内触发。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Crossover {
    // 超卖区金叉
    Buy,
    // 超买区死叉
    Sell,
}

/// # Summary
/// 附加了指标列的完整 K 线。
///
/// # Invariants
/// - 所有字段均已定义；存在未定义字段的行在计算阶段即被丢弃。
/// - `moving_average` 仅在参数要求计算均线时存在。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCandle {
    pub date: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    // 回看窗口内的最高价
    pub period_high: f64,
    // 回看窗口内的最低价
    pub period_low: f64,
    // 快线 %K
    pub pct_k: f64,
    // 慢线 %D
    pub pct_d: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub moving_average: Option<f64>,
    pub signal: Signal,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub crossover: Option<Crossover>,
}

/// # Summary
/// 指标计算结果序列。
///
/// # Invariants
/// - `candles` 仅包含完整行，按输入相对顺序连续排列。
/// - `dropped` 为被丢弃的输入行数，`candles.len() + dropped` 等于输入长度。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedSeries {
    pub pair: AssetPair,
    pub interval: Interval,
    pub params: IndicatorParams,
    pub candles: Vec<EnrichedCandle>,
    pub dropped: usize,
}

/// # Summary
/// 面向仪表盘指标卡片的汇总统计。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesSummary {
    pub rows: usize,
    pub buy_count: usize,
    pub sell_count: usize,
    pub buy_crossovers: usize,
    pub sell_crossovers: usize,
    // 逐期收益率均值
    pub mean_return: Option<f64>,
    // 收盘价均值
    pub mean_close: Option<f64>,
    pub last_signal: Option<Signal>,
}
