//! 对象缓存
//!
//! 目前只用于缓存通过 JWT 认证的用户及其角色，避免每个请求都查询数据库。

pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::AppConfig;

pub use memory::MokaCacheWrapper;

#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 根据配置创建缓存实例
pub fn create_cache() -> Arc<dyn ObjectCache> {
    let config = AppConfig::get();
    Arc::new(MokaCacheWrapper::new(
        config.cache.max_capacity,
        config.cache.default_ttl,
    ))
}
