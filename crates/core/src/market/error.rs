use thiserror::Error;

/// # Summary
/// 行情抓取错误枚举，覆盖网络、上游业务错误、解析及数据缺失。
///
/// # Invariants
/// - 调用方据此区分 "暂无数据" 与参数错误，不得静默吞掉。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    // 网络层错误，包含底层 HTTP 客户端错误信息或非 2xx 状态
    #[error("Network error: {0}")]
    Network(String),
    // 交易所在响应体中返回的错误列表
    #[error("Upstream error: {0}")]
    Upstream(String),
    // 响应结构不符合预期
    #[error("Parse error: {0}")]
    Parse(String),
    // 请求的数据不存在或为空
    #[error("Data not found")]
    NotFound,
}
