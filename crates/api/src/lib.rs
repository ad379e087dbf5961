//! # `stochboard-api` - HTTP API 网关
//!
//! 本 crate 是 Stochboard 的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 向浏览器提供内嵌的仪表盘页面
//! - 调用 `MarketDataProvider` 抓取行情，经标准化与指标计算后返回
//! - 将领域模型转换为 DTO 返回给前端

pub mod error;
pub mod routes;
pub mod server;
pub mod types;
