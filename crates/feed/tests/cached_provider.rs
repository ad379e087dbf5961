use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use stochboard_cache::mem::MemCache;
use stochboard_core::common::time::FakeClockProvider;
use stochboard_core::common::{AssetPair, Interval};
use stochboard_core::market::entity::RawOhlcRow;
use stochboard_core::market::error::MarketError;
use stochboard_core::market::port::MarketDataProvider;
use stochboard_feed::cached::CachedProvider;

/// 记录调用次数的上游，可切换为失败模式
struct CountingProvider {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

#[async_trait]
impl MarketDataProvider for CountingProvider {
    async fn fetch_ohlc(
        &self,
        _pair: &AssetPair,
        _interval: Interval,
    ) -> Result<Vec<RawOhlcRow>, MarketError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MarketError::Network("connection reset".into()));
        }
        Ok(vec![RawOhlcRow {
            time: json!(1700000000),
            open: json!("1.0"),
            high: json!("2.0"),
            low: json!("0.5"),
            close: json!(format!("{}.0", n + 1)),
            vwap: json!("1.2"),
            volume: json!("10"),
            count: json!(3),
        }])
    }
}

struct Fixture {
    provider: CachedProvider<CountingProvider>,
    calls: Arc<AtomicUsize>,
    clock: Arc<FakeClockProvider>,
}

fn fixture(ttl_secs: u64, fail: bool) -> Fixture {
    let calls = Arc::new(AtomicUsize::new(0));
    let clock = Arc::new(FakeClockProvider::new(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    ));
    let provider = CachedProvider::new(
        CountingProvider {
            calls: calls.clone(),
            fail,
        },
        Arc::new(MemCache::new()),
        clock.clone(),
        std::time::Duration::from_secs(ttl_secs),
    );
    Fixture {
        provider,
        calls,
        clock,
    }
}

fn xbt() -> AssetPair {
    AssetPair::new("XBTUSD").unwrap()
}

#[tokio::test]
async fn test_hit_within_ttl() {
    let f = fixture(300, false);

    let first = f.provider.fetch_ohlc(&xbt(), Interval::Day1).await.unwrap();
    f.clock.advance(Duration::seconds(299));
    let second = f.provider.fetch_ohlc(&xbt(), Interval::Day1).await.unwrap();

    assert_eq!(f.calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_refetch_after_expiry() {
    let f = fixture(300, false);

    f.provider.fetch_ohlc(&xbt(), Interval::Day1).await.unwrap();
    f.clock.advance(Duration::seconds(300));
    let rows = f.provider.fetch_ohlc(&xbt(), Interval::Day1).await.unwrap();

    assert_eq!(f.calls.load(Ordering::SeqCst), 2);
    assert_eq!(rows[0].close, json!("2.0"));
}

#[tokio::test]
async fn test_keys_separate_pair_and_interval() {
    let f = fixture(300, false);
    let eth = AssetPair::new("ETHUSD").unwrap();

    f.provider.fetch_ohlc(&xbt(), Interval::Day1).await.unwrap();
    f.provider.fetch_ohlc(&eth, Interval::Day1).await.unwrap();
    f.provider.fetch_ohlc(&xbt(), Interval::Hour1).await.unwrap();
    f.provider.fetch_ohlc(&xbt(), Interval::Day1).await.unwrap();

    assert_eq!(f.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_errors_are_not_cached() {
    let f = fixture(300, true);

    assert!(f.provider.fetch_ohlc(&xbt(), Interval::Day1).await.is_err());
    assert!(f.provider.fetch_ohlc(&xbt(), Interval::Day1).await.is_err());

    assert_eq!(f.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_zero_ttl_never_hits() {
    let f = fixture(0, false);

    f.provider.fetch_ohlc(&xbt(), Interval::Day1).await.unwrap();
    f.provider.fetch_ohlc(&xbt(), Interval::Day1).await.unwrap();

    assert_eq!(f.calls.load(Ordering::SeqCst), 2);
}
