use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use stochboard_core::cache::error::CacheError;
use stochboard_core::cache::port::{Cache, CacheEntry};

/// # Summary
/// 基于 DashMap 的内存缓存实现。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
/// - 不做过期淘汰，条目只携带写入时间，新鲜度由调用方判断。
pub struct MemCache {
    // 键 -> (写入时间, 字节)
    storage: DashMap<String, CacheEntry<Vec<u8>>>,
}

impl MemCache {
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }
}

impl Default for MemCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for MemCache {
    /// # Summary
    /// 写入原始字节数据。
    ///
    /// # Logic
    /// 将 Key 转换为 String 后与条目一并插入哈希表，同名 Key 覆盖旧条目 (包括写入时间)。
    async fn put_raw(
        &self,
        key: &str,
        value: Vec<u8>,
        stored_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        self.storage
            .insert(key.to_string(), CacheEntry { stored_at, value });
        Ok(())
    }

    /// # Summary
    /// 读取原始字节数据。
    ///
    /// # Returns
    /// 存在则返回克隆的条目，否则返回 None。
    async fn get_raw(&self, key: &str) -> Result<Option<CacheEntry<Vec<u8>>>, CacheError> {
        Ok(self.storage.get(key).map(|entry| entry.value().clone()))
    }
}
