//! # `stochboard-feed` - 行情数据源
//!
//! 交易所 REST 行情抓取 (`kraken`) 与带过期时间的缓存装饰器 (`cached`)，
//! 二者都实现 `MarketDataProvider` 端口，可由 app 层自由组合。

pub mod cached;
pub mod kraken;
