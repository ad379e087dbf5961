//! # `stochboard-core` - 领域核心
//!
//! 定义行情、指标、缓存三个领域的实体、错误与端口 (Port) 契约，
//! 以及全局配置结构。本 crate 不包含任何 I/O 实现。

pub mod cache;
pub mod common;
pub mod config;
pub mod indicator;
pub mod market;
