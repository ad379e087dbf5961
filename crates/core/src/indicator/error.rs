use thiserror::Error;

/// # Summary
/// 指标计算的配置错误。
///
/// # Invariants
/// - 只在计算开始前的参数校验阶段产生。
/// - 窗口超过序列长度、价格区间为零等退化情况不属于错误，表现为被丢弃的行。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    // 窗口长度为 0
    #[error("Window `{name}` must be a positive integer")]
    ZeroWindow { name: &'static str },
    // 超买/超卖阈值不合法
    #[error("Invalid thresholds: oversold={oversold}, overbought={overbought}")]
    InvalidThresholds { oversold: f64, overbought: f64 },
}
