//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use stochboard_core::indicator::entity::{
    EnrichedCandle, EnrichedSeries, IndicatorParams, SeriesSummary,
};
use stochboard_core::market::entity::{Candle, Series};

// ============================================================
//  通用响应 DTO
// ============================================================

/// 统一 API 响应包装器
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T: Serialize + ToSchema> {
    /// 是否成功
    pub success: bool,
    /// 数据载荷 (成功时)
    pub data: Option<T>,
    /// 错误信息 (失败时)
    pub error: Option<String>,
}

impl<T: Serialize + ToSchema> ApiResponse<T> {
    /// 构建成功响应
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// 构建失败响应 (不含泛型载荷)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}

/// 健康检查
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

// ============================================================
//  行情相关 DTO
// ============================================================

/// 指标参数 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParamsResponse {
    /// 最高/最低价回看窗口
    #[schema(example = 14)]
    pub period: u32,
    /// %D 平滑窗口
    #[schema(example = 3)]
    pub smoothing: u32,
    /// 收盘价均线窗口，关闭时为 null
    #[schema(example = 26)]
    pub moving_average: Option<u32>,
    #[schema(example = 20.0)]
    pub oversold: f64,
    #[schema(example = 80.0)]
    pub overbought: f64,
}

/// 可选交易对 DTO - 对应仪表盘顶部下拉框
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PairsResponse {
    #[schema(example = json!(["XBTUSD", "ETHUSD"]))]
    pub pairs: Vec<String>,
    /// 默认周期 (简写，如 1d)
    #[schema(example = "1d")]
    pub interval: String,
    /// 默认指标参数
    pub defaults: ParamsResponse,
}

/// 标准化后的 K 线 DTO，未定义的字段为 null
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CandleResponse {
    /// 时间戳 (ISO 8601)
    #[schema(example = "2024-01-01T00:00:00Z")]
    pub date: Option<String>,
    #[schema(example = 42150.3)]
    pub open: Option<f64>,
    #[schema(example = 42890.0)]
    pub high: Option<f64>,
    #[schema(example = 41800.1)]
    pub low: Option<f64>,
    #[schema(example = 42600.0)]
    pub close: Option<f64>,
    #[schema(example = 1520.25)]
    pub volume: Option<f64>,
}

/// 标准化序列 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CandleSeriesResponse {
    #[schema(example = "XBTUSD")]
    pub pair: String,
    #[schema(example = "1d")]
    pub interval: String,
    pub candles: Vec<CandleResponse>,
}

/// 带指标列的 K 线 DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCandleResponse {
    #[schema(example = "2024-01-01T00:00:00Z")]
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub period_high: f64,
    pub period_low: f64,
    #[schema(example = 87.5)]
    pub pct_k: f64,
    #[schema(example = 53.75)]
    pub pct_d: f64,
    /// 均线关闭时不输出该字段
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moving_average: Option<f64>,
    /// Buy / Sell
    #[schema(example = "Buy")]
    pub signal: String,
    /// 超买超卖区的交叉事件
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Buy")]
    pub crossover: Option<String>,
}

/// 区间汇总 DTO - 对应仪表盘的指标卡片
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub rows: usize,
    pub buy_count: usize,
    pub sell_count: usize,
    pub buy_crossovers: usize,
    pub sell_crossovers: usize,
    /// 平均日收益率
    pub mean_return: Option<f64>,
    pub mean_close: Option<f64>,
    #[schema(example = "Sell")]
    pub last_signal: Option<String>,
}

/// 指标接口完整响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorResponse {
    #[schema(example = "XBTUSD")]
    pub pair: String,
    #[schema(example = "1d")]
    pub interval: String,
    pub params: ParamsResponse,
    /// 因窗口预热或数据缺失被丢弃的行数 (区间过滤前)
    pub dropped: usize,
    pub candles: Vec<EnrichedCandleResponse>,
    pub summary: SummaryResponse,
}

// ============================================================
//  领域模型 → DTO 惯用转换 (impl From<T>)
// ============================================================

fn iso(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl From<IndicatorParams> for ParamsResponse {
    fn from(p: IndicatorParams) -> Self {
        Self {
            period: p.period,
            smoothing: p.smoothing,
            moving_average: p.moving_average,
            oversold: p.oversold,
            overbought: p.overbought,
        }
    }
}

impl From<&Candle> for CandleResponse {
    fn from(c: &Candle) -> Self {
        Self {
            date: c.date.map(iso),
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
        }
    }
}

impl From<Series> for CandleSeriesResponse {
    fn from(s: Series) -> Self {
        Self {
            pair: s.pair.to_string(),
            interval: s.interval.to_string(),
            candles: s.candles.iter().map(CandleResponse::from).collect(),
        }
    }
}

impl From<EnrichedCandle> for EnrichedCandleResponse {
    fn from(c: EnrichedCandle) -> Self {
        Self {
            date: iso(c.date),
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
            period_high: c.period_high,
            period_low: c.period_low,
            pct_k: c.pct_k,
            pct_d: c.pct_d,
            moving_average: c.moving_average,
            signal: c.signal.to_string(),
            crossover: c.crossover.map(|x| format!("{:?}", x)),
        }
    }
}

impl From<SeriesSummary> for SummaryResponse {
    fn from(s: SeriesSummary) -> Self {
        Self {
            rows: s.rows,
            buy_count: s.buy_count,
            sell_count: s.sell_count,
            buy_crossovers: s.buy_crossovers,
            sell_crossovers: s.sell_crossovers,
            mean_return: s.mean_return,
            mean_close: s.mean_close,
            last_signal: s.last_signal.map(|x| x.to_string()),
        }
    }
}

impl IndicatorResponse {
    /// 由完整序列、展示区间内的行与其汇总组装响应
    pub fn new(series: &EnrichedSeries, visible: Vec<EnrichedCandle>, summary: SeriesSummary) -> Self {
        Self {
            pair: series.pair.to_string(),
            interval: series.interval.to_string(),
            params: series.params.into(),
            dropped: series.dropped,
            candles: visible.into_iter().map(Into::into).collect(),
            summary: summary.into(),
        }
    }
}
