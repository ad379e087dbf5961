use crate::common::{AssetPair, Interval};
use crate::market::entity::RawOhlcRow;
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 行情数据提供者接口 (原始数据源)。
///
/// # Invariants
/// - 返回的行必须按时间升序排列。
/// - 失败时返回带类型的 `MarketError`，不做重试。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取指定交易对、指定周期的 OHLC 原始行。
    ///
    /// # Logic
    /// 1. 构建数据源请求。
    /// 2. 执行网络请求并解析响应结构。
    /// 3. 按原样返回行数据，不做数值转换。
    ///
    /// # Arguments
    /// * `pair`: 交易对。
    /// * `interval`: 采样周期。
    ///
    /// # Returns
    /// 成功返回原始行列表，失败返回 MarketError。
    async fn fetch_ohlc(
        &self,
        pair: &AssetPair,
        interval: Interval,
    ) -> Result<Vec<RawOhlcRow>, MarketError>;
}
