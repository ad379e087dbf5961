use crate::cache::error::CacheError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

/// # Summary
/// 缓存条目，携带写入时间供上游判断是否过期。
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub stored_at: DateTime<Utc>,
    pub value: T,
}

/// # Summary
/// 业务无关的异步 KV 存储接口 (Port)。
///
/// # Invariants
/// - 处理原始字节，确保 Trait 是对象安全的。
/// - 本端口不负责过期淘汰，是否仍然新鲜由调用方根据 `stored_at` 判断。
#[async_trait]
pub trait Cache: Send + Sync {
    /// # Summary
    /// 写入原始字节并记录写入时间，同名 Key 直接覆盖。
    async fn put_raw(
        &self,
        key: &str,
        value: Vec<u8>,
        stored_at: DateTime<Utc>,
    ) -> Result<(), CacheError>;

    /// # Summary
    /// 读取原始字节及其写入时间。
    ///
    /// # Returns
    /// 存在则返回条目，否则返回 `None`。
    async fn get_raw(&self, key: &str) -> Result<Option<CacheEntry<Vec<u8>>>, CacheError>;
}

/// # Summary
/// 缓存泛型扩展接口，以 JSON 形式存取强类型对象。
///
/// # Invariants
/// - 自动为所有实现 `Cache` 的类型提供支持。
#[async_trait]
pub trait CacheExt: Cache {
    /// 序列化为 JSON 后写入
    async fn put<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        stored_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value).map_err(|e| CacheError::Serialize(e.to_string()))?;
        self.put_raw(key, bytes, stored_at).await
    }

    /// 读取并反序列化为目标类型
    async fn get<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> Result<Option<CacheEntry<T>>, CacheError> {
        match self.get_raw(key).await? {
            Some(entry) => {
                let value = serde_json::from_slice(&entry.value)
                    .map_err(|e| CacheError::Deserialize(e.to_string()))?;
                Ok(Some(CacheEntry {
                    stored_at: entry.stored_at,
                    value,
                }))
            }
            None => Ok(None),
        }
    }
}

impl<T: Cache + ?Sized> CacheExt for T {}
