use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use stochboard_core::common::{AssetPair, Interval};
use stochboard_core::indicator::entity::IndicatorParams;
use stochboard_indicator::{compute_indicators, filter_range, normalize, summarize};

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{
    ApiErrorResponse, ApiResponse, CandleSeriesResponse, IndicatorResponse, PairsResponse,
};

/// K 线查询参数
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct CandlesQuery {
    /// 周期，分钟数或简写 (1h, 1d ...)，缺省取配置值
    pub interval: Option<String>,
}

/// 指标查询参数
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct IndicatorQuery {
    /// 周期，分钟数或简写，缺省取配置值
    pub interval: Option<String>,
    /// 展示区间起始日 (YYYY-MM-DD，含)
    pub start: Option<String>,
    /// 展示区间结束日 (YYYY-MM-DD，含)
    pub end: Option<String>,
    /// 最高/最低价回看窗口
    pub period: Option<String>,
    /// %D 平滑窗口
    pub smoothing: Option<String>,
    /// 均线窗口；`none` 关闭均线
    pub ma: Option<String>,
}

/// # Summary
/// 校验路径中的交易对：格式非法返回 400，不在配置集合内返回 404。
fn resolve_pair(state: &AppState, raw: &str) -> Result<AssetPair, ApiError> {
    let pair = AssetPair::new(raw).map_err(ApiError::BadRequest)?;
    if !state.config.is_known_pair(&pair) {
        return Err(ApiError::NotFound(format!("pair {} is not configured", pair)));
    }
    Ok(pair)
}

fn resolve_interval(state: &AppState, raw: Option<&str>) -> Result<Interval, ApiError> {
    match raw {
        Some(s) => s.parse().map_err(ApiError::BadRequest),
        None => Ok(state.config.market.interval),
    }
}

fn parse_date(raw: Option<&str>, name: &str) -> Result<Option<NaiveDate>, ApiError> {
    raw.map(|s| {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| ApiError::BadRequest(format!("{} must be YYYY-MM-DD, got {:?}", name, s)))
    })
    .transpose()
}

/// 解析窗口长度查询参数，缺省时取默认值；非整数一律 400 并走统一响应体
fn parse_window(raw: Option<&str>, name: &str, default: u32) -> Result<u32, ApiError> {
    match raw.map(str::trim) {
        None => Ok(default),
        Some(s) => s.parse::<u32>().map_err(|_| {
            ApiError::BadRequest(format!("{} must be a positive integer, got {:?}", name, s))
        }),
    }
}

/// # Summary
/// 以配置中的默认参数为基础，叠加查询参数得到本次计算参数。
///
/// # Logic
/// - `ma` 缺省沿用默认值，`none` 关闭均线，其余按正整数解析 (0 由参数校验拒绝)。
fn resolve_params(defaults: IndicatorParams, query: &IndicatorQuery) -> Result<IndicatorParams, ApiError> {
    let moving_average = match query.ma.as_deref().map(str::trim) {
        None => defaults.moving_average,
        Some(s) if s.eq_ignore_ascii_case("none") => None,
        Some(s) => Some(
            s.parse::<u32>()
                .map_err(|_| ApiError::BadRequest(format!("ma must be a window length or none, got {:?}", s)))?,
        ),
    };
    let params = IndicatorParams {
        period: parse_window(query.period.as_deref(), "period", defaults.period)?,
        smoothing: parse_window(query.smoothing.as_deref(), "smoothing", defaults.smoothing)?,
        moving_average,
        ..defaults
    };
    params.validate()?;
    Ok(params)
}

/// 获取仪表盘可选的交易对与默认参数
#[utoipa::path(
    get,
    path = "/api/v1/pairs",
    tag = "行情 (Market)",
    responses(
        (status = 200, description = "配置的交易对集合", body = ApiResponse<PairsResponse>)
    )
)]
pub async fn list_pairs(State(state): State<AppState>) -> Json<ApiResponse<PairsResponse>> {
    let market = &state.config.market;
    Json(ApiResponse::ok(PairsResponse {
        pairs: market.pairs.iter().map(ToString::to_string).collect(),
        interval: market.interval.to_string(),
        defaults: state.config.indicator.into(),
    }))
}

/// 获取标准化后的 K 线序列
#[utoipa::path(
    get,
    path = "/api/v1/candles/{pair}",
    tag = "行情 (Market)",
    params(
        ("pair" = String, Path, description = "交易对，如 XBTUSD"),
        CandlesQuery
    ),
    responses(
        (status = 200, description = "标准化序列", body = ApiResponse<CandleSeriesResponse>),
        (status = 400, description = "参数错误", body = ApiErrorResponse),
        (status = 404, description = "交易对未配置", body = ApiErrorResponse),
        (status = 503, description = "行情暂不可用", body = ApiErrorResponse)
    )
)]
pub async fn get_candles(
    State(state): State<AppState>,
    Path(pair): Path<String>,
    Query(query): Query<CandlesQuery>,
) -> Result<Json<ApiResponse<CandleSeriesResponse>>, ApiError> {
    let pair = resolve_pair(&state, &pair)?;
    let interval = resolve_interval(&state, query.interval.as_deref())?;

    let rows = state.provider.fetch_ohlc(&pair, interval).await?;
    let series = normalize(&pair, interval, &rows);
    Ok(Json(ApiResponse::ok(series.into())))
}

/// # Summary
/// 计算随机指标并返回展示区间内的行与汇总。
///
/// # Logic
/// 1. 校验交易对、周期、日期与参数，任一非法即 400/404，不访问上游。
/// 2. 抓取原始行并标准化。
/// 3. 在完整序列上计算指标，再按日期区间过滤，保证窗口看到全部历史。
/// 4. 对过滤后的行做汇总。
#[utoipa::path(
    get,
    path = "/api/v1/indicators/{pair}",
    tag = "行情 (Market)",
    params(
        ("pair" = String, Path, description = "交易对，如 XBTUSD"),
        IndicatorQuery
    ),
    responses(
        (status = 200, description = "带指标的序列与汇总", body = ApiResponse<IndicatorResponse>),
        (status = 400, description = "参数错误", body = ApiErrorResponse),
        (status = 404, description = "交易对未配置", body = ApiErrorResponse),
        (status = 503, description = "行情暂不可用", body = ApiErrorResponse)
    )
)]
pub async fn get_indicators(
    State(state): State<AppState>,
    Path(pair): Path<String>,
    Query(query): Query<IndicatorQuery>,
) -> Result<Json<ApiResponse<IndicatorResponse>>, ApiError> {
    let pair = resolve_pair(&state, &pair)?;
    let interval = resolve_interval(&state, query.interval.as_deref())?;
    let start = parse_date(query.start.as_deref(), "start")?;
    let end = parse_date(query.end.as_deref(), "end")?;
    match (start, end) {
        (Some(s), Some(e)) if s > e => {
            return Err(ApiError::BadRequest(format!("start {} is after end {}", s, e)));
        }
        _ => {}
    }
    let params = resolve_params(state.config.indicator, &query)?;

    let rows = state.provider.fetch_ohlc(&pair, interval).await?;
    let series = normalize(&pair, interval, &rows);
    let enriched = compute_indicators(&series, &params)?;

    let visible = filter_range(&enriched.candles, start, end);
    let summary = summarize(&visible);
    tracing::debug!(
        pair = %pair,
        total = enriched.candles.len(),
        visible = visible.len(),
        dropped = enriched.dropped,
        "indicators computed"
    );
    Ok(Json(ApiResponse::ok(IndicatorResponse::new(
        &enriched, visible, summary,
    ))))
}
