//! 业务服务模块
//!
//! 进度累积、游戏化、任务跟踪和提交编排四个服务。
//! 写路径统一走 lock_version CAS + 有界退避重试。

pub mod gamification;
pub mod progress;
pub mod submissions;
pub mod tasks;

use std::time::Duration;

use crate::config::AppConfig;

/// CAS 冲突后的退避等待，带随机抖动避免活锁
pub(crate) async fn cas_backoff(attempt: u32) {
    let base = AppConfig::get().gamification.cas_retry_backoff_ms;
    let jitter = rand::random_range(0..=base);
    tokio::time::sleep(Duration::from_millis(base * u64::from(attempt) + jitter)).await;
}

pub(crate) fn cas_max_retries() -> u32 {
    AppConfig::get().gamification.cas_max_retries
}
