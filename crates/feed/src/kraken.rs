use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use stochboard_core::common::{AssetPair, Interval};
use stochboard_core::market::entity::RawOhlcRow;
use stochboard_core::market::error::MarketError;
use stochboard_core::market::port::MarketDataProvider;
use tracing::{debug, warn};

/// 单行 OHLC 数组的固定列数: time, open, high, low, close, vwap, volume, count
const OHLC_COLUMNS: usize = 8;

/// # Summary
/// Kraken 公共 OHLC 接口的行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端通讯，不做重试与退避。
/// - `base_url` 不以 `/` 结尾。
#[derive(Clone)]
pub struct KrakenProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// 接口根地址，例如 `https://api.kraken.com`
    base_url: String,
}

impl KrakenProvider {
    /// # Summary
    /// 创建一个新的 KrakenProvider 实例。
    ///
    /// # Logic
    /// 1. 配置 10 秒超时与 User-Agent。
    /// 2. 初始化 reqwest 客户端 (要求进程已安装 rustls CryptoProvider)。
    ///
    /// # Arguments
    /// * `base_url`: 接口根地址。
    ///
    /// # Returns
    /// 客户端构建失败时返回 `MarketError::Network`。
    pub fn new(base_url: impl Into<String>) -> Result<Self, MarketError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(concat!("stochboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MarketError::Network(e.to_string()))?;
        Ok(Self::with_client(base_url, client))
    }

    /// 使用外部构造好的客户端创建实例 (测试中指向 mock 服务)
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }
}

/// # Summary
/// Kraken API 响应顶层结构。
///
/// # Invariants
/// - `result` 中除 `last` 游标外只有一个键，键名为交易所内部的交易对名 (如 `XXBTZUSD`)。
#[derive(Deserialize, Debug)]
struct KrakenResponse {
    #[serde(default)]
    error: Vec<String>,
    result: Option<Map<String, Value>>,
}

/// # Summary
/// 从响应的 result 对象中取出 OHLC 行。
///
/// # Logic
/// 1. 跳过 `last` 游标，取第一个数组类型的值。
/// 2. 每个元素必须是 8 列数组，否则视为结构错误。
/// 3. 所有时间戳均为整数时按时间稳定排序，保证升序。
fn extract_rows(result: Map<String, Value>) -> Result<Vec<RawOhlcRow>, MarketError> {
    let entries = result
        .into_iter()
        .filter(|(key, _)| key != "last")
        .find_map(|(_, value)| match value {
            Value::Array(items) => Some(items),
            _ => None,
        })
        .ok_or(MarketError::NotFound)?;

    let mut rows = entries
        .into_iter()
        .map(|entry| match entry {
            Value::Array(cols) if cols.len() == OHLC_COLUMNS => {
                let mut cols = cols.into_iter();
                let mut next = || cols.next().unwrap_or(Value::Null);
                Ok(RawOhlcRow {
                    time: next(),
                    open: next(),
                    high: next(),
                    low: next(),
                    close: next(),
                    vwap: next(),
                    volume: next(),
                    count: next(),
                })
            }
            other => Err(MarketError::Parse(format!("Unexpected OHLC entry: {}", other))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if rows.iter().all(|r| r.time.is_i64()) {
        rows.sort_by_key(|r| r.time.as_i64());
    }
    Ok(rows)
}

#[async_trait]
impl MarketDataProvider for KrakenProvider {
    /// # Summary
    /// 从 Kraken 抓取 OHLC 原始行。
    ///
    /// # Logic
    /// 1. 以分钟数作为 interval 参数请求 `/0/public/OHLC`。
    /// 2. 非 2xx 状态视为网络错误，响应体无法解码视为解析错误。
    /// 3. `error` 列表非空视为上游错误。
    /// 4. 提取并返回原始行，数值转换交给标准化阶段。
    ///
    /// # Arguments
    /// * `pair`: 交易对。
    /// * `interval`: 周期。
    ///
    /// # Returns
    /// 成功返回原始行列表，失败返回 MarketError。
    async fn fetch_ohlc(
        &self,
        pair: &AssetPair,
        interval: Interval,
    ) -> Result<Vec<RawOhlcRow>, MarketError> {
        let url = format!("{}/0/public/OHLC", self.base_url);
        debug!(pair = %pair, interval = interval.minutes(), "requesting OHLC");

        let result = async {
            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("pair", pair.as_str().to_string()),
                    ("interval", interval.minutes().to_string()),
                ])
                .send()
                .await
                .map_err(|e| MarketError::Network(e.to_string()))?;

            if !resp.status().is_success() {
                return Err(MarketError::Network(format!("HTTP {}", resp.status())));
            }

            let json: KrakenResponse = resp
                .json()
                .await
                .map_err(|e| MarketError::Parse(e.to_string()))?;

            if !json.error.is_empty() {
                return Err(MarketError::Upstream(json.error.join("; ")));
            }

            extract_rows(json.result.ok_or(MarketError::NotFound)?)
        }
        .await;

        match &result {
            Ok(rows) => debug!(pair = %pair, rows = rows.len(), "OHLC received"),
            Err(e) => warn!(pair = %pair, error = %e, "OHLC fetch failed"),
        }
        result
    }
}
