use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use stochboard_api::server::{AppState, build_router};
use stochboard_api::types::{ApiResponse, PairsResponse};
use stochboard_core::common::{AssetPair, Interval};
use stochboard_core::config::AppConfig;
use stochboard_core::market::entity::RawOhlcRow;
use stochboard_core::market::error::MarketError;
use stochboard_core::market::port::MarketDataProvider;
use tokio::net::TcpListener;

/// 2024-01-01T00:00:00Z
const START_TS: i64 = 1_704_067_200;
const DAYS: i64 = 40;

/// 固定行情：ETHUSD 模拟上游故障，其余交易对返回 40 根日线
struct MockProvider;

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn fetch_ohlc(
        &self,
        pair: &AssetPair,
        _interval: Interval,
    ) -> Result<Vec<RawOhlcRow>, MarketError> {
        if pair.as_str() == "ETHUSD" {
            return Err(MarketError::Network("connection refused".into()));
        }
        Ok((0..DAYS)
            .map(|i| {
                let step = f64::from(u32::try_from(i).unwrap());
                let close = 100.0 + 10.0 * (step / 3.0).sin() + step * 0.5;
                RawOhlcRow {
                    time: json!(START_TS + i * 86_400),
                    open: json!(format!("{:.2}", close - 0.5)),
                    high: json!(format!("{:.2}", close + 2.0)),
                    low: json!(format!("{:.2}", close - 2.0)),
                    close: json!(format!("{:.2}", close)),
                    vwap: json!(format!("{:.2}", close)),
                    volume: json!("12.5"),
                    count: json!(42),
                }
            })
            .collect())
    }
}

// 帮助函数：在随机端口启动测试服务器
async fn spawn_test_server() -> String {
    drop(rustls::crypto::ring::default_provider().install_default());

    let state = AppState {
        provider: Arc::new(MockProvider),
        config: Arc::new(AppConfig::default()),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum_serve(listener, state).await;
    });
    addr
}

async fn axum_serve(listener: TcpListener, state: AppState) {
    let app = build_router(state);
    axum::serve(listener, app).await.unwrap();
}

async fn get_json(client: &reqwest::Client, url: String) -> (StatusCode, Value) {
    let res = client.get(url).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn test_full_api_workflow() {
    let _guard = tracing::subscriber::set_default(
        tracing_subscriber::fmt().with_env_filter("debug").finish(),
    );

    let base_url = spawn_test_server().await;
    let client = reqwest::Client::new();

    // ============================================
    // Case 1: 健康检查与页面
    // ============================================
    let (status, body) = get_json(&client, format!("{}/health", base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let html = client.get(format!("{}/", base_url)).send().await.unwrap();
    assert_eq!(html.status(), StatusCode::OK);
    assert!(html.text().await.unwrap().contains("plotly"));

    let (status, doc) = get_json(&client, format!("{}/api-docs/openapi.json", base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/indicators/{pair}"].is_object());

    // ============================================
    // Case 2: 交易对列表
    // ============================================
    let res = client
        .get(format!("{}/api/v1/pairs", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let pairs: ApiResponse<PairsResponse> = res.json().await.unwrap();
    let pairs = pairs.data.unwrap();
    assert!(pairs.pairs.contains(&"XBTUSD".to_string()));
    assert_eq!(pairs.interval, "1d");
    assert_eq!(pairs.defaults.moving_average, Some(26));

    // ============================================
    // Case 3: 标准化 K 线
    // ============================================
    let (status, body) = get_json(&client, format!("{}/api/v1/candles/xbtusd", base_url)).await;
    assert_eq!(status, StatusCode::OK);
    let candles = body["data"]["candles"].as_array().unwrap();
    assert_eq!(candles.len(), 40);
    assert_eq!(candles[0]["date"], "2024-01-01T00:00:00Z");
    assert_eq!(body["data"]["pair"], "XBTUSD");

    // ============================================
    // Case 4: 关闭均线，只丢弃指标预热行 (14 + 3 - 2)
    // ============================================
    let (status, body) = get_json(
        &client,
        format!("{}/api/v1/indicators/XBTUSD?ma=none", base_url),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["dropped"], 15);
    let rows = data["candles"].as_array().unwrap();
    assert_eq!(rows.len(), 25);
    assert_eq!(rows[0]["date"], "2024-01-16T00:00:00Z");
    assert!(rows.iter().all(|r| r.get("movingAverage").is_none()));
    for r in rows {
        let k = r["pctK"].as_f64().unwrap();
        let d = r["pctD"].as_f64().unwrap();
        let expected = if k > d { "Buy" } else { "Sell" };
        assert_eq!(r["signal"], expected);
    }
    assert_eq!(data["summary"]["rows"], 25);

    // ============================================
    // Case 5: 默认均线 26 使丢弃扩大到前 25 行
    // ============================================
    let (status, body) =
        get_json(&client, format!("{}/api/v1/indicators/XBTUSD", base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["dropped"], 25);
    let rows = body["data"]["candles"].as_array().unwrap();
    assert_eq!(rows.len(), 15);
    assert!(rows.iter().all(|r| r["movingAverage"].is_f64()));

    // ============================================
    // Case 6: 展示区间过滤在计算之后进行
    // ============================================
    let (status, body) = get_json(
        &client,
        format!(
            "{}/api/v1/indicators/XBTUSD?ma=none&start=2024-01-20&end=2024-01-29",
            base_url
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["candles"].as_array().unwrap().len(), 10);
    assert_eq!(body["data"]["summary"]["rows"], 10);
    assert_eq!(body["data"]["dropped"], 15);

    // ============================================
    // Case 7: 参数与交易对错误
    // ============================================
    for (query, expected) in [
        ("DOGEUSD", StatusCode::NOT_FOUND),
        ("X!", StatusCode::BAD_REQUEST),
        ("XBTUSD?period=0", StatusCode::BAD_REQUEST),
        ("XBTUSD?period=-1", StatusCode::BAD_REQUEST),
        ("XBTUSD?period=abc", StatusCode::BAD_REQUEST),
        ("XBTUSD?smoothing=abc", StatusCode::BAD_REQUEST),
        ("XBTUSD?smoothing=1.5", StatusCode::BAD_REQUEST),
        ("XBTUSD?ma=0", StatusCode::BAD_REQUEST),
        ("XBTUSD?start=2024-02-01&end=2024-01-01", StatusCode::BAD_REQUEST),
        ("XBTUSD?start=yesterday", StatusCode::BAD_REQUEST),
        ("XBTUSD?interval=7m", StatusCode::BAD_REQUEST),
    ] {
        let (status, body) =
            get_json(&client, format!("{}/api/v1/indicators/{}", base_url, query)).await;
        assert_eq!(status, expected, "query {}", query);
        assert_eq!(body["success"], false);
    }

    // ============================================
    // Case 8: 上游故障 → 数据不可用
    // ============================================
    let (status, body) =
        get_json(&client, format!("{}/api/v1/indicators/ETHUSD", base_url)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("data unavailable"));
}

#[tokio::test]
async fn test_windows_longer_than_series_yield_empty_result() {
    let base_url = spawn_test_server().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(
        &client,
        format!("{}/api/v1/indicators/SOLUSD?period=50&ma=none", base_url),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["candles"], json!([]));
    assert_eq!(body["data"]["dropped"], 40);
    assert_eq!(body["data"]["summary"]["rows"], 0);
    assert!(body["data"]["summary"]["meanClose"].is_null());
}
