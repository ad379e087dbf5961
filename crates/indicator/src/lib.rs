//! # `stochboard-indicator` - 指标计算
//!
//! 行情标准化与随机震荡指标 (%K / %D) 的纯函数实现。
//! 所有函数无副作用、无 I/O，对相同输入与参数的输出完全可复现。

pub mod crossover;
pub mod normalize;
pub mod rolling;
pub mod stochastic;
pub mod summary;

pub use normalize::normalize;
pub use stochastic::compute_indicators;
pub use summary::{filter_range, summarize};
