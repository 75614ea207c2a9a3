//! 内容目录访问模块
//!
//! 练习和关卡定义由内容子系统所有，本核心只读。
//! ContentCatalog 是接入点；CachedCatalog 在其上叠加对象缓存，
//! 因为定义近乎不可变，短 TTL 的缓存几乎总是命中。

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::{CacheResult, ObjectCache};
use crate::errors::Result;
use crate::models::exercises::entities::{ExerciseDefinition, Level};

pub use memory::InMemoryCatalog;

/// 内容目录只读接口
#[async_trait]
pub trait ContentCatalog: Send + Sync {
    async fn get_exercise(&self, exercise_id: i64) -> Result<Option<ExerciseDefinition>>;
    async fn get_level(&self, level_id: i64) -> Result<Option<Level>>;
}

/// 带对象缓存的目录装饰器
pub struct CachedCatalog {
    inner: Arc<dyn ContentCatalog>,
    cache: Arc<dyn ObjectCache>,
    ttl: u64,
}

impl CachedCatalog {
    pub fn new(inner: Arc<dyn ContentCatalog>, cache: Arc<dyn ObjectCache>, ttl: u64) -> Self {
        Self { inner, cache, ttl }
    }

    fn exercise_key(exercise_id: i64) -> String {
        format!("catalog:exercise:{exercise_id}")
    }

    fn level_key(level_id: i64) -> String {
        format!("catalog:level:{level_id}")
    }
}

#[async_trait]
impl ContentCatalog for CachedCatalog {
    async fn get_exercise(&self, exercise_id: i64) -> Result<Option<ExerciseDefinition>> {
        let key = Self::exercise_key(exercise_id);
        if let CacheResult::Found(exercise) = self.cache.get_json(&key).await {
            return Ok(Some(exercise));
        }
        // 未命中和不存在都落到底层；不存在不缓存，内容上线后立即可见
        let exercise = self.inner.get_exercise(exercise_id).await?;
        if let Some(ref exercise) = exercise {
            self.cache.insert_json(key, exercise, self.ttl).await;
        }
        Ok(exercise)
    }

    async fn get_level(&self, level_id: i64) -> Result<Option<Level>> {
        let key = Self::level_key(level_id);
        if let CacheResult::Found(level) = self.cache.get_json(&key).await {
            return Ok(Some(level));
        }
        let level = self.inner.get_level(level_id).await?;
        if let Some(ref level) = level {
            self.cache.insert_json(key, level, self.ttl).await;
        }
        Ok(level)
    }
}
