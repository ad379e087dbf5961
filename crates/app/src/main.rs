mod logging;
mod settings;

use std::sync::Arc;
use std::time::Duration;

use stochboard_api::server::{AppState, start_server};
use stochboard_cache::mem::MemCache;
use stochboard_core::common::time::RealTimeProvider;
use stochboard_core::config::AppConfig;
use stochboard_core::market::error::MarketError;
use stochboard_core::market::port::MarketDataProvider;
use stochboard_feed::cached::CachedProvider;
use stochboard_feed::kraken::KrakenProvider;
use tracing::{error, info, warn};

/// # Summary
/// 应用启动入口，纯粹的组装层。
/// 负责实例化具体实现组件并通过 Arc<dyn Trait> 注入到 API 层。
///
/// # Logic
/// 1. 加载并校验配置。
/// 2. 初始化全局日志。
/// 3. 安装 TLS 加密后端，实例化行情数据源 (按需包装缓存)。
/// 4. 启动 HTTP 服务，等待 Ctrl-C 优雅退出。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 配置
    let config = settings::load()?;

    // 2. 日志 (守卫需持有到进程结束)
    let _log_guard = logging::init(&config.log)?;
    info!(
        pairs = ?config.market.pairs,
        interval = %config.market.interval,
        "Stochboard starting..."
    );

    // 3. 基础设施
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        warn!("rustls crypto provider was already installed");
    }
    let provider = build_provider(&config)?;

    // 4. 服务
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        provider,
        config: Arc::new(config),
    };
    start_server(state, &bind_addr, shutdown_signal()).await?;

    info!("Shutdown complete. Exiting...");
    Ok(())
}

/// 构造行情数据源，缓存有效期为 0 时直连交易所
fn build_provider(config: &AppConfig) -> Result<Arc<dyn MarketDataProvider>, MarketError> {
    let kraken = KrakenProvider::new(config.market.base_url.clone())?;
    let ttl = config.market.cache_ttl_secs;
    if ttl == 0 {
        return Ok(Arc::new(kraken));
    }

    info!(ttl_secs = ttl, "OHLC cache enabled");
    Ok(Arc::new(CachedProvider::new(
        kraken,
        Arc::new(MemCache::new()),
        Arc::new(RealTimeProvider),
        Duration::from_secs(ttl),
    )))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received.");
}
