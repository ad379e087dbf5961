/// # Summary
/// 固定容量的滚动窗口，保存最近 N 个可能缺失的数值。
///
/// # Invariants
/// - 内存空间在初始化时一次性分配，后续不再扩容。
/// - 只有在窗口已满且所有值均已定义时才产生聚合结果。
#[derive(Debug, Clone)]
pub struct RollingWindow {
    // 内部存储容器
    data: Vec<Option<f64>>,
    // 最大容量
    capacity: usize,
    // 已满后的下一个覆盖位置
    cursor: usize,
}

impl RollingWindow {
    /// # Summary
    /// 创建一个新的滚动窗口。
    ///
    /// # Arguments
    /// * `capacity`: 窗口长度，调用方保证大于 0。
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// # Summary
    /// 推入新值，窗口已满时覆盖最旧的值。
    pub fn push(&mut self, item: Option<f64>) {
        if self.data.len() < self.capacity {
            self.data.push(item);
        } else if let Some(slot) = self.data.get_mut(self.cursor) {
            *slot = item;
            self.cursor = (self.cursor + 1) % self.capacity;
        }
    }

    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.data.len() == self.capacity
    }

    /// # Summary
    /// 取出窗口内全部已定义的值。
    ///
    /// # Returns
    /// 窗口未满或存在缺失值时返回 None。
    fn defined(&self) -> Option<Vec<f64>> {
        if !self.is_full() {
            return None;
        }
        self.data.iter().copied().collect()
    }

    /// 窗口最大值
    pub fn max(&self) -> Option<f64> {
        self.defined()?.into_iter().reduce(f64::max)
    }

    /// 窗口最小值
    pub fn min(&self) -> Option<f64> {
        self.defined()?.into_iter().reduce(f64::min)
    }

    /// 窗口算术平均
    pub fn mean(&self) -> Option<f64> {
        let values = self.defined()?;
        let n = u32::try_from(values.len()).ok().map(f64::from)?;
        Some(values.iter().sum::<f64>() / n)
    }
}

/// # Summary
/// 在整个序列上滑动窗口并逐点计算聚合值。
///
/// # Logic
/// 1. 每个位置推入当前值。
/// 2. 以窗口状态调用聚合函数，得到与输入等长的结果。
///
/// # Arguments
/// * `values`: 可能缺失的输入序列。
/// * `window`: 窗口长度。
/// * `aggregate`: 聚合函数 (max / min / mean)。
///
/// # Returns
/// 与输入等长的结果，前 `window - 1` 个位置恒为 None。
pub fn rolling(
    values: &[Option<f64>],
    window: u32,
    aggregate: impl Fn(&RollingWindow) -> Option<f64>,
) -> Vec<Option<f64>> {
    let Ok(capacity) = usize::try_from(window) else {
        return vec![None; values.len()];
    };
    let mut buffer = RollingWindow::new(capacity);
    values
        .iter()
        .map(|v| {
            buffer.push(*v);
            aggregate(&buffer)
        })
        .collect()
}

pub fn rolling_max(values: &[Option<f64>], window: u32) -> Vec<Option<f64>> {
    rolling(values, window, RollingWindow::max)
}

pub fn rolling_min(values: &[Option<f64>], window: u32) -> Vec<Option<f64>> {
    rolling(values, window, RollingWindow::min)
}

pub fn rolling_mean(values: &[Option<f64>], window: u32) -> Vec<Option<f64>> {
    rolling(values, window, RollingWindow::mean)
}
