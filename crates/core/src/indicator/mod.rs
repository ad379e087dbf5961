//! 指标领域：随机震荡指标参数、增强 K 线、买卖信号与汇总统计。

pub mod entity;
pub mod error;
