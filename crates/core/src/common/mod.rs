use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod time;

/// # Summary
/// 交易对标识，代表系统关注的特定加密资产报价对 (例如 `SOLUSD`)。
///
/// # Invariants
/// - 仅包含大写 ASCII 字母与数字，长度在 3 到 16 之间。
/// - 构造时统一转为大写，因此 `solusd` 与 `SOLUSD` 等价。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetPair(String);

impl AssetPair {
    /// # Summary
    /// 校验并构造交易对。
    ///
    /// # Logic
    /// 1. 去除首尾空白并转为大写。
    /// 2. 校验长度与字符集。
    ///
    /// # Arguments
    /// * `symbol`: 原始交易对代码。
    ///
    /// # Returns
    /// 合法时返回 AssetPair，否则返回错误描述。
    pub fn new(symbol: &str) -> Result<Self, String> {
        let normalized = symbol.trim().to_ascii_uppercase();
        if !(3..=16).contains(&normalized.len()) {
            return Err(format!("Invalid pair length: {:?}", symbol));
        }
        if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!("Invalid pair symbol: {:?}", symbol));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AssetPair {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AssetPair {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<AssetPair> for String {
    fn from(pair: AssetPair) -> Self {
        pair.0
    }
}

impl std::fmt::Display for AssetPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// # Summary
/// K 线采样周期，取值限定为交易所支持的分钟数集合。
///
/// # Invariants
/// - 序列化形式为分钟数 (例如日线为 `1440`)。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(try_from = "u32", into = "u32")]
pub enum Interval {
    // 1分钟
    Minute1,
    // 5分钟
    Minute5,
    // 15分钟
    Minute15,
    // 30分钟
    Minute30,
    // 1小时
    Hour1,
    // 4小时
    Hour4,
    // 1日
    #[default]
    Day1,
    // 1周
    Week1,
    // 15日
    Day15,
}

impl Interval {
    /// 全部受支持的周期，按时长升序排列
    pub const ALL: [Interval; 9] = [
        Interval::Minute1,
        Interval::Minute5,
        Interval::Minute15,
        Interval::Minute30,
        Interval::Hour1,
        Interval::Hour4,
        Interval::Day1,
        Interval::Week1,
        Interval::Day15,
    ];

    /// 周期对应的分钟数
    pub fn minutes(self) -> u32 {
        match self {
            Interval::Minute1 => 1,
            Interval::Minute5 => 5,
            Interval::Minute15 => 15,
            Interval::Minute30 => 30,
            Interval::Hour1 => 60,
            Interval::Hour4 => 240,
            Interval::Day1 => 1440,
            Interval::Week1 => 10080,
            Interval::Day15 => 21600,
        }
    }

    /// # Summary
    /// 根据分钟数查找周期。
    ///
    /// # Returns
    /// 不在支持集合内时返回 None。
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.minutes() == minutes)
    }
}

impl TryFrom<u32> for Interval {
    type Error = String;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::from_minutes(minutes).ok_or_else(|| format!("Unsupported interval: {} minutes", minutes))
    }
}

impl From<Interval> for u32 {
    fn from(interval: Interval) -> Self {
        interval.minutes()
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        if let Ok(minutes) = lowered.parse::<u32>() {
            return Interval::try_from(minutes);
        }
        match lowered.as_str() {
            "1m" | "minute1" => Ok(Interval::Minute1),
            "5m" | "minute5" => Ok(Interval::Minute5),
            "15m" | "minute15" => Ok(Interval::Minute15),
            "30m" | "minute30" => Ok(Interval::Minute30),
            "1h" | "hour1" => Ok(Interval::Hour1),
            "4h" | "hour4" => Ok(Interval::Hour4),
            "1d" | "day1" => Ok(Interval::Day1),
            "1w" | "week1" => Ok(Interval::Week1),
            "15d" | "day15" => Ok(Interval::Day15),
            _ => Err(format!("Unknown Interval: {}", s)),
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interval::Minute1 => write!(f, "1m"),
            Interval::Minute5 => write!(f, "5m"),
            Interval::Minute15 => write!(f, "15m"),
            Interval::Minute30 => write!(f, "30m"),
            Interval::Hour1 => write!(f, "1h"),
            Interval::Hour4 => write!(f, "4h"),
            Interval::Day1 => write!(f, "1d"),
            Interval::Week1 => write!(f, "1w"),
            Interval::Day15 => write!(f, "15d"),
        }
    }
}
