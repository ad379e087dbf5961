//! # `stochboard-cache` - 缓存实现
//!
//! 提供 `Cache` 端口的进程内实现。

pub mod mem;
