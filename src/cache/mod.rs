//! 对象缓存模块
//!
//! 通过插件注册表解耦缓存后端，进程启动时按配置挑选后端。
//! 内容目录的练习/关卡定义是主要的缓存对象。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    // 后端暂时不可用等情况，调用方按未命中处理
    ExistsButNoValue,
}

/// 对象缓存后端接口
///
/// 以字符串为原始存储单元，类型化读写通过 JSON 编解码包装。
#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

impl dyn ObjectCache {
    /// 读取并反序列化；解码失败视为未命中并顺手清掉坏条目
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> CacheResult<T> {
        match self.get_raw(key).await {
            CacheResult::Found(raw) => match serde_json::from_str(&raw) {
                Ok(value) => CacheResult::Found(value),
                Err(e) => {
                    tracing::warn!("缓存条目反序列化失败，已清除: key={key}, error={e}");
                    self.remove(key).await;
                    CacheResult::NotFound
                }
            },
            CacheResult::NotFound => CacheResult::NotFound,
            CacheResult::ExistsButNoValue => CacheResult::ExistsButNoValue,
        }
    }

    /// 序列化并写入；序列化失败只记日志，缓存写入永不阻断业务
    pub async fn insert_json<T: Serialize>(&self, key: String, value: &T, ttl: u64) {
        match serde_json::to_string(value) {
            Ok(raw) => self.insert_raw(key, raw, ttl).await,
            Err(e) => tracing::warn!("缓存条目序列化失败，跳过写入: key={key}, error={e}"),
        }
    }
}

/// 声明一个缓存后端插件
///
/// 在 ctor 阶段把构造器注册进全局注册表，后端类型需实现 Default。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $plugin:ident) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_object_cache_plugin_ $plugin:snake>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    std::sync::Arc::new(|| {
                        Box::pin(async {
                            Ok(Box::new(<$plugin>::default())
                                as Box<dyn $crate::cache::ObjectCache>)
                        })
                            as $crate::cache::register::BoxedObjectCacheFuture
                    }),
                );
            }
        }
    };
}
