//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI 与仪表盘页面、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 组装依赖后调用。

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use stochboard_core::config::AppConfig;
use stochboard_core::market::port::MarketDataProvider;

use crate::routes::{dashboard, health, market};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - `provider` 与 `config` 在服务启动前注入，生命周期与进程等同。
#[derive(Clone)]
pub struct AppState {
    /// 行情数据源 (可能已被缓存装饰)
    pub provider: Arc<dyn MarketDataProvider>,
    /// 已校验的全局配置
    pub config: Arc<AppConfig>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stochboard API",
        version = "0.1.0",
        description = "Kraken 行情的随机指标 (Stochastic Oscillator) 计算与仪表盘数据接口。",
        license(name = "MIT")
    ),
    tags(
        (name = "行情 (Market)", description = "交易对、标准化 K 线与指标序列"),
        (name = "系统 (System)", description = "健康检查")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// # Summary
/// 构建完整的 axum 应用路由树。
///
/// # Logic
/// 1. 以 `OpenApiRouter` 注册带文档的 JSON 接口并收集 OpenAPI Doc。
/// 2. 挂载 Swagger UI 与仪表盘页面。
/// 3. 应用 CORS。
pub fn build_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health::health))
        .routes(routes!(market::list_pairs))
        .routes(routes!(market::get_candles))
        .routes(routes!(market::get_indicators))
        .with_state(state)
        .split_for_parts();

    // 仪表盘只读取公开接口，允许所有来源
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .route("/", get(dashboard::index))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// 绑定端口并启动 HTTP 监听，直到 `shutdown` 完成。
///
/// # Arguments
/// * `state` - 由外部组装的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8080"`
/// * `shutdown` - 优雅停机信号
pub async fn start_server(
    state: AppState,
    bind_addr: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("Stochboard listening on http://{}", listener.local_addr()?);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
