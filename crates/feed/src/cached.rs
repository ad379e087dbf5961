use async_trait::async_trait;
use chrono::TimeDelta;
use std::sync::Arc;
use stochboard_core::cache::port::{Cache, CacheExt};
use stochboard_core::common::time::TimeProvider;
use stochboard_core::common::{AssetPair, Interval};
use stochboard_core::market::entity::RawOhlcRow;
use stochboard_core::market::error::MarketError;
use stochboard_core::market::port::MarketDataProvider;
use tracing::{debug, warn};

/// # Summary
/// 为任意行情提供者增加按 (交易对, 周期) 维度的过期缓存。
///
/// # Invariants
/// - 只缓存成功结果，失败不会写入缓存。
/// - 缓存读写失败只记录告警并回源，不影响主流程。
/// - 当前时间统一取自 `TimeProvider`。
pub struct CachedProvider<P> {
    inner: P,
    cache: Arc<dyn Cache>,
    clock: Arc<dyn TimeProvider>,
    ttl: TimeDelta,
}

impl<P: MarketDataProvider> CachedProvider<P> {
    /// # Summary
    /// 包装一个行情提供者。
    ///
    /// # Arguments
    /// * `inner`: 被包装的上游提供者。
    /// * `cache`: 缓存存储。
    /// * `clock`: 时间供给器。
    /// * `ttl`: 条目有效期，零表示永不命中。
    pub fn new(
        inner: P,
        cache: Arc<dyn Cache>,
        clock: Arc<dyn TimeProvider>,
        ttl: std::time::Duration,
    ) -> Self {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        Self {
            inner,
            cache,
            clock,
            ttl,
        }
    }

    fn cache_key(pair: &AssetPair, interval: Interval) -> String {
        format!("ohlc:{}:{}", pair, interval.minutes())
    }
}

#[async_trait]
impl<P: MarketDataProvider> MarketDataProvider for CachedProvider<P> {
    /// # Summary
    /// 优先返回未过期的缓存，否则回源并写入缓存。
    ///
    /// # Logic
    /// 1. 读取缓存条目，`now - stored_at < ttl` 视为命中。
    /// 2. 未命中时调用上游，错误直接透传。
    /// 3. 成功结果以当前时间写入缓存。
    async fn fetch_ohlc(
        &self,
        pair: &AssetPair,
        interval: Interval,
    ) -> Result<Vec<RawOhlcRow>, MarketError> {
        let key = Self::cache_key(pair, interval);
        let now = self.clock.now();

        match self.cache.get::<Vec<RawOhlcRow>>(&key).await {
            Ok(Some(entry)) if now - entry.stored_at < self.ttl => {
                debug!(key = %key, "ohlc cache hit");
                return Ok(entry.value);
            }
            Ok(_) => {}
            Err(e) => warn!(key = %key, error = %e, "ohlc cache read failed"),
        }

        let rows = self.inner.fetch_ohlc(pair, interval).await?;
        if let Err(e) = self.cache.put(&key, &rows, now).await {
            warn!(key = %key, error = %e, "ohlc cache write failed");
        }
        Ok(rows)
    }
}
