//! 行情领域：原始行、标准化 K 线、抓取错误与数据源端口。

pub mod entity;
pub mod error;
pub mod port;
