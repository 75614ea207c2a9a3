//! 按键互斥锁
//!
//! 同一 (user, exercise) 对的提交在进程内先串行化，减少存储层
//! 乐观锁的冲突重试；跨进程的正确性仍由 lock_version CAS 保证。

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct KeyedLocks {
    locks: DashMap<(i64, i64), Arc<Mutex<()>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// 获取某个键的互斥锁，guard 释放即解锁
    ///
    /// 锁条目只增不删：键空间是活跃的 (user, exercise) 对，量级有限，
    /// 且复用同一把锁比删除/重建更不容易出现竞态。
    pub async fn acquire(&self, user_id: i64, exercise_id: i64) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry((user_id, exercise_id))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks.len()
    }
}
