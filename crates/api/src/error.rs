//! # API 统一错误处理
//!
//! 将下层各 crate 的错误类型统一映射到 HTTP 状态码与 JSON 响应体。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use stochboard_core::indicator::error::IndicatorError;
use stochboard_core::market::error::MarketError;

use crate::types::ApiErrorResponse;

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 资源未找到 (404)
    #[error("not found: {0}")]
    NotFound(String),

    /// 请求参数错误 (400)
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 上游行情不可用 (503)，仪表盘据此展示无数据状态
    #[error("data unavailable: {0}")]
    DataUnavailable(String),
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::DataUnavailable(detail) => {
                tracing::warn!(detail = %detail, "market data unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        let body = Json(ApiErrorResponse::from_msg(self.to_string()));
        (status, body).into_response()
    }
}

/// 从 `MarketError` 转换，任何抓取失败对调用方而言都是数据暂不可用
impl From<MarketError> for ApiError {
    fn from(err: MarketError) -> Self {
        ApiError::DataUnavailable(err.to_string())
    }
}

/// 从 `IndicatorError` 转换
impl From<IndicatorError> for ApiError {
    fn from(err: IndicatorError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::from(MarketError::NotFound), StatusCode::SERVICE_UNAVAILABLE),
            (
                ApiError::from(IndicatorError::ZeroWindow { name: "period" }),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::NotFound("DOGEUSD".into()), StatusCode::NOT_FOUND),
            (ApiError::BadRequest("ma".into()), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_market_error_message() {
        let err = ApiError::from(MarketError::Network("timeout".into()));
        assert!(err.to_string().starts_with("data unavailable"));
    }
}
