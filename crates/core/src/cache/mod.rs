//! 缓存领域：带写入时间戳的字节级 KV 端口。

pub mod error;
pub mod port;
