use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::{AssetPair, Interval};
use crate::indicator::entity::IndicatorParams;
use crate::indicator::error::IndicatorError;

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub market: MarketConfig,
    pub indicator: IndicatorParams,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 行情数据源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    // 仪表盘可选的交易对集合
    pub pairs: Vec<AssetPair>,
    // 采样周期 (分钟)
    pub interval: Interval,
    // 原始行缓存的有效期 (秒)，0 表示不缓存
    pub cache_ttl_secs: u64,
    // 交易所 REST 接口根地址
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    // 默认日志级别，RUST_LOG 优先
    pub level: String,
    // 滚动日志目录，None 表示只输出到终端
    pub dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        let pairs = ["XBTUSD", "ETHUSD", "SOLUSD", "ADAUSD", "DOTUSD"]
            .into_iter()
            .filter_map(|s| AssetPair::new(s).ok())
            .collect();
        Self {
            pairs,
            interval: Interval::Day1,
            cache_ttl_secs: 300,
            base_url: "https://api.kraken.com".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

/// # Summary
/// 配置校验错误。
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("market.pairs must not be empty")]
    EmptyPairs,
    #[error("server.port must not be 0")]
    InvalidPort,
    #[error("market.base_url must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),
    #[error("indicator: {0}")]
    Indicator(#[from] IndicatorError),
}

impl AppConfig {
    /// # Summary
    /// 启动前校验整份配置。
    ///
    /// # Logic
    /// 1. 交易对集合非空 (单个交易对在反序列化时已校验)。
    /// 2. 端口非 0，数据源地址为 http(s)。
    /// 3. 指标窗口与阈值合法。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market.pairs.is_empty() {
            return Err(ConfigError::EmptyPairs);
        }
        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        let url = &self.market.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(url.clone()));
        }
        self.indicator.validate()?;
        Ok(())
    }

    /// 判断交易对是否在配置的可选集合内
    pub fn is_known_pair(&self, pair: &AssetPair) -> bool {
        self.market.pairs.contains(pair)
    }
}
